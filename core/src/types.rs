//! Domain model for the product catalog.
//!
//! # Design
//! `Product` is decoded from `serde_json::Value` through an explicit
//! mapping-with-defaults step instead of `#[derive(Deserialize)]`. Upstream
//! data is not trusted to be well-shaped: a missing, null or mistyped field
//! degrades to its default and decoding an object never fails.
//!
//! Wire field names are Spanish (`nombre`, `precio`, `existencia`,
//! `fechaRegistro`) and must match the server exactly.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Rendered by [`Product::formatted_registered_at`] when no timestamp is set.
pub const NO_DATE: &str = "Sin fecha";

/// Rendered by [`Product::formatted_registered_at`] when the timestamp does
/// not parse.
pub const INVALID_DATE: &str = "Fecha inválida";

const FIELD_ID: &str = "id";
const FIELD_NAME: &str = "nombre";
const FIELD_PRICE: &str = "precio";
const FIELD_STOCK: &str = "existencia";
const FIELD_REGISTERED_AT: &str = "fechaRegistro";

/// A catalog item.
///
/// The model performs no validation; see [`crate::validation`] for the
/// input boundary that enforces a non-empty name and non-negative amounts.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: Option<String>,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    registered_at: Option<String>,
}

impl Product {
    /// A product that has not been created on the server yet.
    pub fn new(name: impl Into<String>, price: f64, stock: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
            stock,
            registered_at: None,
        }
    }

    /// Returns a copy carrying the given server id, replacing any id the
    /// product already had.
    pub fn with_id(self, id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..self
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn registered_at(&self) -> Option<&str> {
        self.registered_at.as_deref()
    }

    /// Decode a product from its wire JSON object.
    ///
    /// Never fails: every absent or unusable field takes its default (empty
    /// name, zero price, zero stock, no id, no timestamp). Callers check that
    /// `value` is an object before calling when the shape matters.
    pub fn from_json(value: &Value) -> Self {
        let empty = Map::new();
        let fields = value.as_object().unwrap_or(&empty);

        Self {
            id: fields.get(FIELD_ID).and_then(decode_id),
            name: fields
                .get(FIELD_NAME)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            price: fields.get(FIELD_PRICE).map(decode_price).unwrap_or(0.0),
            stock: fields.get(FIELD_STOCK).map(decode_stock).unwrap_or(0),
            registered_at: fields
                .get(FIELD_REGISTERED_AT)
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    /// Encode the request payload for create and update.
    ///
    /// Only `nombre`, `precio` and `existencia` are written. The id travels in
    /// the URL and the registration date is owned by the server. JSON has no
    /// representation for NaN or infinity, so a non-finite price is a
    /// `Serialization` error rather than a `null` on the wire.
    pub fn to_json(&self) -> Result<Value, ApiError> {
        if !self.price.is_finite() {
            return Err(ApiError::Serialization(format!(
                "precio must be a finite number, got {}",
                self.price
            )));
        }
        serde_json::to_value(ProductPayload::from(self))
            .map_err(|e| ApiError::Serialization(e.to_string()))
    }

    /// Registration date as `day/month/year`, or a placeholder.
    pub fn formatted_registered_at(&self) -> String {
        format_registered_at(self.registered_at.as_deref())
    }
}

/// Body of create and update requests.
#[derive(Debug, Serialize)]
pub struct ProductPayload<'a> {
    #[serde(rename = "nombre")]
    pub name: &'a str,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "existencia")]
    pub stock: i64,
}

impl<'a> From<&'a Product> for ProductPayload<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            name: &product.name,
            price: product.price,
            stock: product.stock,
        }
    }
}

/// Render an optional ISO-8601 timestamp as `day/month/year` in UTC.
pub fn format_registered_at(timestamp: Option<&str>) -> String {
    let Some(raw) = timestamp else {
        return NO_DATE.to_string();
    };
    match parse_timestamp(raw.trim()) {
        Some(date) => format!("{}/{}/{}", date.day(), date.month(), date.year()),
        None => INVALID_DATE.to_string(),
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.naive_utc().date());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(naive.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn decode_id(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn decode_price(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn decode_stock(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
