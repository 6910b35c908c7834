use chrono::NaiveDate;

use crate::models::InventoryItem;

/// Partial update of an inventory item. `status` is absent on purpose: it is
/// recomputed from the patched fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i64>,
    pub unit: Option<String>,
    pub price: Option<f64>,
    /// `Some(None)` clears the expiry date.
    pub expiry_date: Option<Option<NaiveDate>>,
}

impl InventoryPatch {
    pub fn quantity(quantity: i64) -> Self {
        Self {
            quantity: Some(quantity),
            ..Self::default()
        }
    }
}

/// Every editable field of a full record, as submitted by the edit form.
impl From<InventoryItem> for InventoryPatch {
    fn from(item: InventoryItem) -> Self {
        Self {
            name: Some(item.name),
            category: Some(item.category),
            quantity: Some(item.quantity),
            unit: Some(item.unit),
            price: Some(item.price),
            expiry_date: Some(item.expiry_date),
        }
    }
}
