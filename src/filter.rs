use crate::models::{InventoryItem, InventoryStatus, Order};

/// Sentinel accepted by the category and status selectors.
pub const ALL: &str = "all";

/// A categorical selector: everything, or one exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn parse(raw: &str) -> Self {
        if raw == ALL {
            Selection::All
        } else {
            Selection::Only(raw.to_string())
        }
    }

    fn admits(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

impl From<&str> for Selection {
    fn from(raw: &str) -> Self {
        Selection::parse(raw)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    pub search: String,
    pub category: Selection,
    pub status: Selection,
}

impl InventoryFilter {
    pub fn new(search: impl Into<String>, category: &str, status: &str) -> Self {
        Self {
            search: search.into(),
            category: Selection::parse(category),
            status: Selection::parse(status),
        }
    }

    pub fn matches(&self, item: &InventoryItem) -> bool {
        contains_ignore_case(&item.name, &self.search)
            && self.category.admits(&item.category)
            && self.status.admits(item.status().as_str())
    }

    /// Stable: keeps the relative order of `items`.
    pub fn apply(&self, items: &[InventoryItem]) -> Vec<InventoryItem> {
        items
            .iter()
            .filter(|item| self.matches(item))
            .cloned()
            .collect()
    }
}

pub fn filter(
    items: &[InventoryItem],
    search_term: &str,
    category: &str,
    status: &str,
) -> Vec<InventoryItem> {
    InventoryFilter::new(search_term, category, status).apply(items)
}

/// Distinct categories in first-seen order.
pub fn categories(items: &[InventoryItem]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        if !seen.contains(&item.category) {
            seen.push(item.category.clone());
        }
    }
    seen
}

/// Distinct statuses in first-seen order.
pub fn statuses(items: &[InventoryItem]) -> Vec<InventoryStatus> {
    let mut seen: Vec<InventoryStatus> = Vec::new();
    for item in items {
        if !seen.contains(&item.status()) {
            seen.push(item.status());
        }
    }
    seen
}

/// Customer search plus a status selector for the orders table. Status
/// comparison ignores case since the remote store mixes "Pending"/"pending".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub search: String,
    pub status: Selection,
}

impl OrderFilter {
    pub fn new(search: impl Into<String>, status: &str) -> Self {
        Self {
            search: search.into(),
            status: Selection::parse(status),
        }
    }

    pub fn matches(&self, order: &Order) -> bool {
        let status_ok = match &self.status {
            Selection::All => true,
            Selection::Only(wanted) => wanted.eq_ignore_ascii_case(order.status.as_str()),
        };
        status_ok && contains_ignore_case(&order.customer_name, &self.search)
    }

    pub fn apply(&self, orders: &[Order]) -> Vec<Order> {
        orders
            .iter()
            .filter(|order| self.matches(order))
            .cloned()
            .collect()
    }
}
