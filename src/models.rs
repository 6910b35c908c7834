use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

/// Display status of an inventory item, derived from quantity and expiry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InventoryStatus {
    #[default]
    InStock,
    LowStock,
    OutOfStock,
    ExpiringSoon,
}

impl InventoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryStatus::InStock => "in-stock",
            InventoryStatus::LowStock => "low-stock",
            InventoryStatus::OutOfStock => "out-of-stock",
            InventoryStatus::ExpiringSoon => "expiring-soon",
        }
    }

    /// Title-cased label used by the status drop-down ("Low Stock").
    pub fn label(&self) -> &'static str {
        match self {
            InventoryStatus::InStock => "In Stock",
            InventoryStatus::LowStock => "Low Stock",
            InventoryStatus::OutOfStock => "Out of Stock",
            InventoryStatus::ExpiringSoon => "Expiring Soon",
        }
    }
}

impl fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for InventoryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "in-stock" => Ok(InventoryStatus::InStock),
            "low-stock" => Ok(InventoryStatus::LowStock),
            "out-of-stock" => Ok(InventoryStatus::OutOfStock),
            "expiring-soon" => Ok(InventoryStatus::ExpiringSoon),
            other => Err(format!("unknown inventory status `{other}`")),
        }
    }
}

/// A stocked item. `status` is derived and can only be set by the remote
/// store (deserialization) or by recomputation, never directly. A remote
/// record with no recognizable status is classified on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "wire::InventoryRecord")]
pub struct InventoryItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub unit: String,
    pub price: f64,
    pub expiry_date: Option<NaiveDate>,
    status: InventoryStatus,
}

impl InventoryItem {
    /// A new, not yet persisted item.
    pub fn draft(
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: i64,
        unit: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            category: category.into(),
            quantity,
            unit: unit.into(),
            price,
            expiry_date: None,
            status: InventoryStatus::InStock,
        }
    }

    pub fn with_expiry(mut self, expiry_date: NaiveDate) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }

    pub fn status(&self) -> InventoryStatus {
        self.status
    }

    pub(crate) fn set_derived_status(&mut self, status: InventoryStatus) {
        self.status = status;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

impl LineItem {
    pub fn new(name: impl Into<String>, quantity: u32, price: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
            price,
        }
    }

    pub fn subtotal(&self) -> f64 {
        f64::from(self.quantity) * self.price
    }
}

/// `items` of an order: either the full line items or only a unit count.
/// Untagged on the wire, an array or a number (possibly sent as a string).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OrderItems {
    Detailed(Vec<LineItem>),
    Summary(u32),
}

impl OrderItems {
    /// Total units across the order.
    pub fn count(&self) -> u32 {
        match self {
            OrderItems::Detailed(lines) => lines
                .iter()
                .fold(0u32, |total, line| total.saturating_add(line.quantity)),
            OrderItems::Summary(count) => *count,
        }
    }

    /// Σ quantity × price, only defined for the detailed shape.
    pub fn computed_total(&self) -> Option<f64> {
        match self {
            OrderItems::Detailed(lines) => Some(lines.iter().map(LineItem::subtotal).sum()),
            OrderItems::Summary(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for OrderItems {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Detailed(Vec<LineItem>),
            Count(u32),
            Text(String),
        }

        match Shape::deserialize(deserializer)? {
            Shape::Detailed(lines) => Ok(OrderItems::Detailed(lines)),
            Shape::Count(count) => Ok(OrderItems::Summary(count)),
            Shape::Text(text) => text
                .trim()
                .parse::<u32>()
                .map(OrderItems::Summary)
                .map_err(|_| D::Error::custom(format!("invalid item count `{text}`"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
    BankTransfer,
    Other(String),
}

impl PaymentMethod {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Other(text) => text,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

impl From<String> for PaymentMethod {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "cash" => PaymentMethod::Cash,
            "card" => PaymentMethod::Card,
            "upi" => PaymentMethod::Upi,
            "bank transfer" | "bank_transfer" | "banktransfer" => PaymentMethod::BankTransfer,
            _ => PaymentMethod::Other(value),
        }
    }
}

impl From<&str> for PaymentMethod {
    fn from(value: &str) -> Self {
        PaymentMethod::from(value.to_string())
    }
}

impl From<PaymentMethod> for String {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::Other(text) => text,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    #[serde(alias = "pending", alias = "PENDING")]
    Pending,
    #[serde(alias = "processing", alias = "PROCESSING")]
    Processing,
    #[serde(alias = "completed", alias = "COMPLETED")]
    Completed,
    #[serde(alias = "cancelled", alias = "CANCELLED")]
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "wire::id"
    )]
    pub id: Option<String>,
    pub customer_name: String,
    pub items: OrderItems,
    #[serde(default)]
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "wire::timestamp")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Order {
    /// A summary order as entered in the orders table: a unit count and a
    /// hand-typed total.
    pub fn summary(
        customer_name: impl Into<String>,
        count: u32,
        total_amount: f64,
        payment_method: impl Into<PaymentMethod>,
    ) -> Self {
        Self {
            id: None,
            customer_name: customer_name.into(),
            items: OrderItems::Summary(count),
            total_amount,
            payment_method: payment_method.into(),
            status: OrderStatus::Pending,
            date: None,
            notes: None,
        }
    }
}

/// Lenient decoders for the remote store's field formats.
mod wire {
    use serde::de::Error as _;

    use super::*;
    use crate::status::classify;

    /// Wire form of [`InventoryItem`]; the status is optional and lenient.
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InventoryRecord {
        #[serde(default, deserialize_with = "id")]
        id: Option<String>,
        name: String,
        #[serde(default)]
        category: String,
        quantity: i64,
        #[serde(default)]
        unit: String,
        #[serde(default)]
        price: f64,
        #[serde(default, deserialize_with = "date")]
        expiry_date: Option<NaiveDate>,
        #[serde(default, deserialize_with = "status")]
        status: Option<InventoryStatus>,
    }

    impl From<InventoryRecord> for InventoryItem {
        fn from(raw: InventoryRecord) -> Self {
            let status = raw.status.unwrap_or_else(|| {
                let quantity = u32::try_from(raw.quantity.max(0)).unwrap_or(u32::MAX);
                classify(quantity, raw.expiry_date, Utc::now().date_naive())
            });
            InventoryItem {
                id: raw.id,
                name: raw.name,
                category: raw.category,
                quantity: raw.quantity,
                unit: raw.unit,
                price: raw.price,
                expiry_date: raw.expiry_date,
                status,
            }
        }
    }

    /// Unknown labels decode as absent so the row is classified instead of
    /// failing the whole list.
    pub fn status<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<InventoryStatus>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|text| match text.parse::<InventoryStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                if !text.trim().is_empty() {
                    tracing::warn!(status = %text, "unrecognized inventory status, classifying locally");
                }
                None
            }
        }))
    }

    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Text(text)) if !text.trim().is_empty() => Some(text),
            Some(Raw::Number(number)) => Some(number.to_string()),
            _ => None,
        })
    }

    pub fn date<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse_date(text)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date `{text}`"))),
        }
    }

    pub fn timestamp<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse_timestamp(text)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp `{text}`"))),
        }
    }

    fn parse_date(text: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .or_else(|| parse_timestamp(text).map(|ts| ts.date_naive()))
    }

    fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
            return Some(ts.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}
