//! Quantity arithmetic for registry items.
//!
//! An item's `quantity_received` is a cached aggregate of its confirmed
//! purchases. These helpers compute what is left, whether an item is
//! fulfilled, and whether a requested claim fits.

use crate::error::CoreError;
use crate::types::DbId;

/// Smallest allowed target quantity for an item.
pub const MIN_ITEM_QUANTITY: i32 = 1;

/// Largest target quantity an owner may set on a single item.
pub const MAX_ITEM_QUANTITY: i32 = 999;

/// Units still wanted, floored at zero.
pub fn remaining(quantity: i32, quantity_received: i32) -> i32 {
    (quantity - quantity_received).max(0)
}

/// An item is fulfilled once the received count has reached the target.
pub fn is_fulfilled(quantity: i32, quantity_received: i32) -> bool {
    quantity_received >= quantity
}

/// Check a guest's claim of `requested` units against fresh item state.
///
/// Returns the remaining count before the claim on success.
pub fn check_claim(
    item_id: DbId,
    quantity: i32,
    quantity_received: i32,
    requested: i32,
) -> Result<i32, CoreError> {
    if requested < 1 {
        return Err(CoreError::Validation(format!(
            "quantity must be at least 1, got {requested}"
        )));
    }

    let current = quantity - quantity_received;
    if current <= 0 {
        return Err(CoreError::AlreadyFulfilled { item_id });
    }
    if requested > current {
        return Err(CoreError::InsufficientRemaining {
            item_id,
            requested,
            remaining: current,
        });
    }
    Ok(current)
}

/// Clamp an owner-supplied received count into `[0, quantity]`.
pub fn clamp_received(value: i32, quantity: i32) -> i32 {
    value.clamp(0, quantity.max(0))
}

/// Sum confirmed purchase quantities into the value the counter should hold.
pub fn ledger_total(confirmed: &[i32]) -> i32 {
    confirmed.iter().copied().map(|q| q.max(0)).sum()
}

/// Validate a target quantity for a new or edited item.
pub fn validate_target_quantity(quantity: i32) -> Result<(), CoreError> {
    if !(MIN_ITEM_QUANTITY..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(CoreError::Validation(format!(
            "quantity must be between {MIN_ITEM_QUANTITY} and {MAX_ITEM_QUANTITY}, got {quantity}"
        )));
    }
    Ok(())
}

/// Validate an owner edit of the target quantity.
///
/// The target may never drop below what has already been received.
pub fn validate_quantity_change(new_quantity: i32, quantity_received: i32) -> Result<(), CoreError> {
    validate_target_quantity(new_quantity)?;
    if new_quantity < quantity_received {
        return Err(CoreError::Validation(format!(
            "quantity cannot be reduced below the {quantity_received} already received"
        )));
    }
    Ok(())
}
