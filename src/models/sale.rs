use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::product::validate_amount;

/// A sale record as stored by the external document store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,

    /// References a [`Product`](super::Product) by id
    pub product_id: String,

    #[validate(range(min = 1))]
    pub quantity: i32,

    #[validate(custom = "validate_amount")]
    pub unit_price: Decimal,

    #[validate(custom = "validate_amount")]
    pub total_amount: Decimal,

    pub date: SaleTimestamp,
}

impl Sale {
    /// Calendar day of the sale, in UTC.
    pub fn sale_date(&self) -> NaiveDate {
        self.date.to_utc().date_naive()
    }
}

/// A sale timestamp as it appears on the wire.
///
/// The document store emits either an RFC 3339 datetime or an object
/// wrapping epoch seconds. Both normalize to UTC here, at the ingestion
/// boundary; the engine only ever sees calendar dates derived from
/// [`SaleTimestamp::to_utc`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SaleTimestamp {
    Utc(DateTime<Utc>),
    Epoch {
        seconds: i64,
        #[serde(default)]
        nanoseconds: u32,
    },
}

impl SaleTimestamp {
    pub fn to_utc(self) -> DateTime<Utc> {
        match self {
            SaleTimestamp::Utc(dt) => dt,
            SaleTimestamp::Epoch {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(seconds, nanoseconds).unwrap_or_default(),
        }
    }
}

impl From<DateTime<Utc>> for SaleTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        SaleTimestamp::Utc(dt)
    }
}
