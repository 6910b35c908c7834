use chrono::NaiveDate;

use crate::models::InventoryStatus;

/// Quantities at or below this are low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 10;
/// Items expiring within this many days (inclusive) are flagged.
pub const EXPIRY_WINDOW_DAYS: i64 = 30;

/// Thresholds used when deriving an item's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPolicy {
    pub low_stock_threshold: u32,
    pub expiry_window_days: i64,
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self {
            low_stock_threshold: LOW_STOCK_THRESHOLD,
            expiry_window_days: EXPIRY_WINDOW_DAYS,
        }
    }
}

impl StatusPolicy {
    /// First match wins: out of stock, low stock, expiring soon, in stock.
    ///
    /// Expiry only overrides a healthy quantity; an already expired item
    /// (negative day count) is still expiring soon.
    pub fn classify(
        &self,
        quantity: u32,
        expiry_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> InventoryStatus {
        if quantity == 0 {
            return InventoryStatus::OutOfStock;
        }
        if quantity <= self.low_stock_threshold {
            return InventoryStatus::LowStock;
        }
        match expiry_date {
            Some(expiry) if (expiry - today).num_days() <= self.expiry_window_days => {
                InventoryStatus::ExpiringSoon
            }
            _ => InventoryStatus::InStock,
        }
    }

    pub fn is_low_stock(&self, quantity: i64) -> bool {
        quantity > 0 && quantity <= i64::from(self.low_stock_threshold)
    }
}

/// Classify with the default thresholds.
pub fn classify(quantity: u32, expiry_date: Option<NaiveDate>, today: NaiveDate) -> InventoryStatus {
    StatusPolicy::default().classify(quantity, expiry_date, today)
}
