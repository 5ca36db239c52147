use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A product record as stored by the external document store.
///
/// Read-only to the engine. Field names on the wire are camelCase, matching
/// the store's payloads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,

    #[validate(length(min = 1))]
    pub name: String,

    pub category: String,

    #[validate(custom = "validate_amount")]
    pub price: Decimal,

    /// Current on-hand quantity
    #[validate(range(min = 0))]
    pub stock: i32,

    /// Threshold at/below which restock is warranted
    #[validate(range(min = 0))]
    pub reorder_level: i32,
}

pub(crate) fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() {
        let mut err = ValidationError::new("amount");
        err.message = Some("currency amounts must be non-negative".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product() -> Product {
        Product {
            id: "prod-1".into(),
            name: "Desk Lamp".into(),
            category: "Lighting".into(),
            price: dec!(24.99),
            stock: 12,
            reorder_level: 5,
        }
    }

    #[test]
    fn valid_product_passes() {
        assert!(product().validate().is_ok());
    }

    #[test]
    fn negative_price_rejected() {
        let mut p = product();
        p.price = dec!(-1.00);
        assert!(p.validate().is_err());
    }

    #[test]
    fn negative_stock_rejected() {
        let mut p = product();
        p.stock = -3;
        assert!(p.validate().is_err());
    }

    #[test]
    fn wire_format_is_camel_case() {
        let json = serde_json::to_value(product()).unwrap();
        assert!(json.get("reorderLevel").is_some());
        assert!(json.get("reorder_level").is_none());
    }
}
