//! Guest buyer details submitted with a purchase.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::CoreError;

/// Maximum length of a buyer's display name.
pub const MAX_BUYER_NAME_LEN: usize = 120;

/// Maximum length of a gift message.
pub const MAX_GIFT_MESSAGE_LEN: usize = 500;

/// Loose phone shape: digits plus common punctuation, 7-20 characters.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9()\-.\s]{7,20}$").expect("valid regex"));

/// Who is buying, plus the optional note left for the registry owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gift_message: Option<String>,
    #[serde(default)]
    pub is_surprise: bool,
}

impl BuyerInfo {
    /// Trim every field, drop blank optionals, and validate the result.
    pub fn validated(self) -> Result<Self, CoreError> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();
        let phone = non_blank(self.phone);
        let gift_message = non_blank(self.gift_message);

        if name.is_empty() {
            return Err(CoreError::Validation("buyer name is required".into()));
        }
        if name.chars().count() > MAX_BUYER_NAME_LEN {
            return Err(CoreError::Validation(format!(
                "buyer name must be at most {MAX_BUYER_NAME_LEN} characters"
            )));
        }
        if email.is_empty() {
            return Err(CoreError::Validation("buyer email is required".into()));
        }
        if !email.validate_email() {
            return Err(CoreError::Validation(format!(
                "'{email}' is not a valid email address"
            )));
        }
        if let Some(phone) = &phone {
            let digits = phone.chars().filter(char::is_ascii_digit).count();
            if !PHONE_RE.is_match(phone) || digits < 7 {
                return Err(CoreError::Validation(format!(
                    "'{phone}' is not a valid phone number"
                )));
            }
        }
        if let Some(message) = &gift_message {
            if message.chars().count() > MAX_GIFT_MESSAGE_LEN {
                return Err(CoreError::Validation(format!(
                    "gift message must be at most {MAX_GIFT_MESSAGE_LEN} characters"
                )));
            }
        }

        Ok(Self {
            name,
            email,
            phone,
            gift_message,
            is_surprise: self.is_surprise,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn buyer(name: &str, email: &str) -> BuyerInfo {
        BuyerInfo {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            gift_message: None,
            is_surprise: false,
        }
    }

    #[test]
    fn trims_and_accepts_well_formed_buyer() {
        let mut input = buyer("  Ana  ", " ana@example.com ");
        input.phone = Some("  ".into());
        input.gift_message = Some(" Congrats! ".into());

        let out = input.validated().unwrap();
        assert_eq!(out.name, "Ana");
        assert_eq!(out.email, "ana@example.com");
        assert_eq!(out.phone, None);
        assert_eq!(out.gift_message.as_deref(), Some("Congrats!"));
    }

    #[test]
    fn rejects_blank_name() {
        assert_matches!(
            buyer("   ", "a@example.com").validated(),
            Err(CoreError::Validation(msg)) if msg.contains("name")
        );
    }

    #[test]
    fn rejects_malformed_email() {
        assert_matches!(
            buyer("Ana", "not-an-email").validated(),
            Err(CoreError::Validation(msg)) if msg.contains("email")
        );
        assert_matches!(buyer("Ana", "").validated(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn phone_is_optional_but_checked_when_present() {
        let mut input = buyer("Ana", "ana@example.com");
        input.phone = Some("+1 (555) 010-2030".into());
        assert!(input.clone().validated().is_ok());

        input.phone = Some("call me".into());
        assert_matches!(input.clone().validated(), Err(CoreError::Validation(_)));

        input.phone = Some("12-34".into());
        assert_matches!(input.validated(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_overlong_gift_message() {
        let mut input = buyer("Ana", "ana@example.com");
        input.gift_message = Some("x".repeat(MAX_GIFT_MESSAGE_LEN + 1));
        assert_matches!(input.validated(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn surprise_defaults_to_false_when_omitted() {
        let parsed: BuyerInfo =
            serde_json::from_str(r#"{"name":"Ana","email":"ana@example.com"}"#).unwrap();
        assert!(!parsed.is_surprise);
        assert!(parsed.phone.is_none());
    }
}
