use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    dto::{inventory::InventoryPatch, orders::OrderPatch},
    error::{AppError, AppResult},
    models::{InventoryItem, Order, OrderItems},
    status::StatusPolicy,
};

/// Inputs to normalization that come from outside the record.
#[derive(Debug, Clone, Copy)]
pub struct Submission {
    pub now: DateTime<Utc>,
    pub policy: StatusPolicy,
}

/// An entity kept in a remote collection.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Path segment of the collection, also the key a wrapped list may use.
    const RESOURCE: &'static str;

    type Patch: Send;

    fn id(&self) -> Option<&str>;

    fn with_id(self, id: String) -> Self;

    fn apply(&self, patch: Self::Patch) -> Self;

    /// Validates the record and recomputes its derived fields. Runs before
    /// every create and update; nothing reaches the remote store without it.
    fn normalize(self, submission: &Submission) -> AppResult<Self>;
}

impl Record for InventoryItem {
    const RESOURCE: &'static str = "inventory";

    type Patch = InventoryPatch;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn with_id(mut self, id: String) -> Self {
        self.id = Some(id);
        self
    }

    fn apply(&self, patch: InventoryPatch) -> Self {
        let mut item = self.clone();
        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(category) = patch.category {
            item.category = category;
        }
        if let Some(quantity) = patch.quantity {
            item.quantity = quantity;
        }
        if let Some(unit) = patch.unit {
            item.unit = unit;
        }
        if let Some(price) = patch.price {
            item.price = price;
        }
        if let Some(expiry_date) = patch.expiry_date {
            item.expiry_date = expiry_date;
        }
        item
    }

    fn normalize(mut self, submission: &Submission) -> AppResult<Self> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Please enter item name"));
        }
        if self.category.trim().is_empty() {
            return Err(AppError::validation("Please select a category"));
        }
        if self.unit.trim().is_empty() {
            return Err(AppError::validation("Please select a unit"));
        }
        let quantity = u32::try_from(self.quantity)
            .map_err(|_| AppError::validation("Quantity cannot be negative"))?;
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AppError::validation("Price cannot be negative"));
        }

        let status = submission.policy.classify(
            quantity,
            self.expiry_date,
            submission.now.date_naive(),
        );
        self.set_derived_status(status);
        Ok(self)
    }
}

impl Record for Order {
    const RESOURCE: &'static str = "orders";

    type Patch = OrderPatch;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn with_id(mut self, id: String) -> Self {
        self.id = Some(id);
        self
    }

    fn apply(&self, patch: OrderPatch) -> Self {
        let mut order = self.clone();
        if let Some(customer_name) = patch.customer_name {
            order.customer_name = customer_name;
        }
        if let Some(items) = patch.items {
            order.items = items;
        }
        if let Some(total_amount) = patch.total_amount {
            order.total_amount = total_amount;
        }
        if let Some(payment_method) = patch.payment_method {
            order.payment_method = payment_method;
        }
        if let Some(status) = patch.status {
            order.status = status;
        }
        if let Some(notes) = patch.notes {
            order.notes = Some(notes);
        }
        order
    }

    fn normalize(mut self, submission: &Submission) -> AppResult<Self> {
        if self.customer_name.trim().is_empty() {
            return Err(AppError::validation("Please enter customer name"));
        }
        if self.payment_method.is_blank() {
            return Err(AppError::validation("Please select a payment method"));
        }

        match &self.items {
            OrderItems::Detailed(lines) => {
                if lines.is_empty() {
                    return Err(AppError::validation("An order needs at least one item"));
                }
                let invalid = lines.iter().any(|line| {
                    line.name.trim().is_empty()
                        || line.quantity == 0
                        || !line.price.is_finite()
                        || line.price <= 0.0
                });
                if invalid {
                    return Err(AppError::validation(
                        "Please fill in all item details with valid values",
                    ));
                }
            }
            OrderItems::Summary(count) => {
                if *count == 0 {
                    return Err(AppError::validation("Please fill all fields"));
                }
                if !self.total_amount.is_finite() || self.total_amount <= 0.0 {
                    return Err(AppError::validation("Please fill all fields"));
                }
            }
        }

        if let Some(total) = self.items.computed_total() {
            self.total_amount = total;
        }
        if self.date.is_none() {
            self.date = Some(submission.now);
        }
        Ok(self)
    }
}
