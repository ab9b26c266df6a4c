//! Guest-facing text for purchase failures.
//!
//! Messages tell the guest what to change before retrying. English is the
//! default; Spanish is selected from an `Accept-Language` header.

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    /// Pick the first supported language from an `Accept-Language` value.
    ///
    /// Quality weights are ignored; order of appearance wins.
    pub fn from_accept_language(header: &str) -> Self {
        header
            .split(',')
            .filter_map(|part| part.split(';').next())
            .map(|tag| tag.trim().to_ascii_lowercase())
            .find_map(|tag| match tag.split('-').next() {
                Some("en") => Some(Locale::En),
                Some("es") => Some(Locale::Es),
                _ => None,
            })
            .unwrap_or_default()
    }
}

/// Human-readable message for a purchase error.
pub fn guest_message(err: &CoreError, locale: Locale) -> String {
    match (err, locale) {
        (CoreError::NotFound { .. }, Locale::En) => {
            "This gift is no longer on the registry.".to_string()
        }
        (CoreError::NotFound { .. }, Locale::Es) => {
            "Este regalo ya no está en la lista.".to_string()
        }
        (CoreError::AlreadyFulfilled { .. }, Locale::En) => {
            "Someone already bought this gift. There is nothing left to purchase.".to_string()
        }
        (CoreError::AlreadyFulfilled { .. }, Locale::Es) => {
            "Alguien ya compró este regalo. No queda nada por comprar.".to_string()
        }
        (CoreError::InsufficientRemaining { remaining, .. }, Locale::En) => {
            if *remaining == 1 {
                "Only 1 left, someone else just bought some. Lower the quantity and try again."
                    .to_string()
            } else {
                format!(
                    "Only {remaining} left, someone else just bought some. Lower the quantity and try again."
                )
            }
        }
        (CoreError::InsufficientRemaining { remaining, .. }, Locale::Es) => {
            if *remaining == 1 {
                "Solo queda 1, alguien más acaba de comprar. Reduce la cantidad e inténtalo de nuevo."
                    .to_string()
            } else {
                format!(
                    "Solo quedan {remaining}, alguien más acaba de comprar. Reduce la cantidad e inténtalo de nuevo."
                )
            }
        }
        (CoreError::Validation(msg), Locale::En) => format!("Please check your details: {msg}."),
        (CoreError::Validation(msg), Locale::Es) => format!("Revisa tus datos: {msg}."),
        (CoreError::Conflict(_), Locale::En) => {
            "This gift was just updated. Please try again.".to_string()
        }
        (CoreError::Conflict(_), Locale::Es) => {
            "Este regalo acaba de cambiar. Inténtalo de nuevo.".to_string()
        }
        (_, Locale::En) => "We couldn't save your purchase. Please try again.".to_string(),
        (_, Locale::Es) => "No pudimos guardar tu compra. Inténtalo de nuevo.".to_string(),
    }
}
