//! Field rules shared by the create and edit requests

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::domain::models::{ProductCategory, MAX_PRICE_SCALE, PRICE_LIMIT};

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

pub fn validate_positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        return Err(rule("positive", "Price must be greater than 0."));
    }
    if price.normalize().scale() > MAX_PRICE_SCALE {
        return Err(rule("precision", "Price must have at most 2 decimal places."));
    }
    if *price >= Decimal::from(PRICE_LIMIT) {
        return Err(rule("range", "Price must be less than 10000000000000000."));
    }
    Ok(())
}

pub fn validate_name_not_blank(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(rule("not_blank", "Name must not be empty."));
    }
    Ok(())
}

pub fn validate_description_not_blank(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        return Err(rule("not_blank", "Description must not be empty."));
    }
    Ok(())
}

pub fn validate_defined_category(category: &ProductCategory) -> Result<(), ValidationError> {
    if !category.is_defined() {
        return Err(rule("defined", "Category must be a defined category."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules() {
        assert!(validate_positive_price(&Decimal::new(1, 2)).is_ok());
        assert!(validate_positive_price(&Decimal::ZERO).is_err());
        assert!(validate_positive_price(&Decimal::new(12500, 3)).is_ok());
        assert_eq!(
            validate_positive_price(&Decimal::new(1, 3)).unwrap_err().code,
            "precision"
        );
        assert!(validate_positive_price(&Decimal::new(PRICE_LIMIT * 100 - 1, 2)).is_ok());
        assert_eq!(
            validate_positive_price(&Decimal::from(PRICE_LIMIT)).unwrap_err().code,
            "range"
        );
        assert!(validate_name_not_blank("Lamp").is_ok());
        assert!(validate_name_not_blank("  ").is_err());
        assert!(validate_description_not_blank("\n").is_err());
        assert!(validate_defined_category(&ProductCategory::Food).is_ok());

        let error = validate_defined_category(&ProductCategory::Undefined).unwrap_err();
        assert_eq!(error.code, "defined");
        assert_eq!(
            error.message.as_deref(),
            Some("Category must be a defined category.")
        );
    }
}
