//! Client-side form validation
//!
//! Forms derive [`validator::Validate`] and point their custom rules at the
//! field validators in [`validators`]. [`check`] runs a form's rules and maps
//! failures into [`AdminError::Validation`](crate::core::error::AdminError).

pub mod validators;

pub use validators::{finite_number, non_blank};

use crate::core::error::AdminResult;
use validator::Validate;

/// Validate a form, converting failures into the crate error type
pub fn check<T: Validate>(form: &T) -> AdminResult<()> {
    form.validate()?;
    Ok(())
}
