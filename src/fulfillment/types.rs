use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Accepts RFC 3339 (`2024-01-02T00:00:00Z`, `...+02:00`), naive date-times
/// (`2024-01-02T00:00:00`, `2024-01-02 00:00:00`) and bare dates. Naive input is UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", s)))
}

/// Fulfillment request body. PascalCase and camelCase field names are both
/// accepted.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FulfillOrderRequest {
    #[serde(rename = "IdProduct", alias = "idProduct")]
    #[schema(example = 1)]
    pub id_product: i32,
    #[serde(rename = "IdWarehouse", alias = "idWarehouse")]
    #[schema(example = 5)]
    pub id_warehouse: i32,
    /// Must be greater than 0
    #[serde(rename = "Amount", alias = "amount")]
    #[schema(example = 3)]
    pub amount: i32,
    /// Only orders created strictly before this instant are eligible
    #[serde(
        rename = "CreatedAt",
        alias = "createdAt",
        deserialize_with = "deserialize_timestamp"
    )]
    #[schema(value_type = String, example = "2024-01-02T00:00:00Z")]
    pub created_at: DateTime<Utc>,
}

/// Fulfillment success body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FulfillOrderResponse {
    #[serde(rename = "IdProductWarehouse")]
    #[schema(example = 1)]
    pub id_product_warehouse: i32,
}

/// An order eligible for fulfillment, joined with its product's unit price
#[derive(Debug, Clone, PartialEq)]
pub struct OpenOrder {
    pub id_order: i32,
    pub unit_price: Decimal,
}

/// Row to insert into `Product_Warehouse`
#[derive(Debug, Clone, PartialEq)]
pub struct NewStockMovement {
    pub id_warehouse: i32,
    pub id_product: i32,
    pub id_order: i32,
    pub amount: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}
