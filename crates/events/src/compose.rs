//! Plain-text email bodies for purchase notifications.
//!
//! Kept free of any transport so the wording can be tested without SMTP.

use cradle_core::notify::PurchaseNotice;

/// Subject and body of one outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub body: String,
}

/// Email telling the registry owner a guest bought something.
///
/// Surprise gifts name the buyer but never the item.
pub fn owner_gift_purchased(notice: &PurchaseNotice, registry_title: &str) -> EmailContent {
    let (subject, headline) = if notice.is_surprise {
        (
            format!("[Cradle] A surprise gift for {registry_title}"),
            format!(
                "{} bought a surprise gift from your registry. We'll keep what it is a secret.",
                notice.buyer_name
            ),
        )
    } else {
        let units = if notice.quantity_purchased == 1 {
            String::new()
        } else {
            format!(" (x{})", notice.quantity_purchased)
        };
        (
            format!("[Cradle] {} was purchased", notice.item_name),
            format!(
                "{} bought {}{} from your registry.",
                notice.buyer_name, notice.item_name, units
            ),
        )
    };

    let mut body = headline;
    if let Some(message) = &notice.gift_message {
        body.push_str(&format!("\n\nTheir message:\n{message}"));
    }
    body.push_str("\n\nOpen your registry to mark it as seen and received.");

    EmailContent { subject, body }
}

/// Email thanking the buyer on the owner's behalf.
pub fn buyer_thank_you(
    notice: &PurchaseNotice,
    owner_name: &str,
    registry_title: &str,
) -> EmailContent {
    let units = if notice.quantity_purchased == 1 {
        String::new()
    } else {
        format!(" x{}", notice.quantity_purchased)
    };
    EmailContent {
        subject: format!("[Cradle] Thank you for your gift to {registry_title}"),
        body: format!(
            "Hi {},\n\nThank you for choosing {}{} from {}'s registry. \
             Your purchase is confirmed and {} has been notified.\n",
            notice.buyer_name, notice.item_name, units, owner_name, owner_name
        ),
    }
}
