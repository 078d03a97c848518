//! Reusable field validators
//!
//! Used through `#[validate(custom(function = "..."))]` on form structs.

use validator::ValidationError;

/// Validator: string must contain something other than whitespace
pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required"))
    } else {
        Ok(())
    }
}

/// Validator: number must be finite (not NaN or infinite)
pub fn finite_number(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("not_a_number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert!(non_blank("North").is_ok());
        assert!(non_blank("").is_err());
        assert!(non_blank(" \t").is_err());
    }

    #[test]
    fn test_finite_number() {
        assert!(finite_number(0.0).is_ok());
        assert!(finite_number(-3.5).is_ok());
        assert!(finite_number(f64::INFINITY).is_err());
        assert_eq!(finite_number(f64::NAN).unwrap_err().code, "not_a_number");
    }
}
