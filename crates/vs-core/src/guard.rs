//! Ownership guard for mutating operations.

use crate::error::{AppError, Result};
use crate::models::{Caller, Owned};

/// Allows the call iff `caller` owns `record`.
///
/// `action` completes the refusal message, e.g. "update this comment".
pub fn authorize<R: Owned + ?Sized>(record: &R, caller: &Caller, action: &str) -> Result<()> {
    if record.owner_id() == caller.user_id {
        Ok(())
    } else {
        Err(AppError::forbidden(format!("You are not allowed to {action}")))
    }
}
