use crate::models::{LineItem, Order, OrderItems, OrderStatus, PaymentMethod};

/// What the order form collects. The total is never typed in; it is
/// derived from the line items.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub customer_name: String,
    pub items: Vec<LineItem>,
    pub payment_method: PaymentMethod,
    pub notes: String,
}

impl OrderDraft {
    pub fn new(customer_name: impl Into<String>, payment_method: impl Into<PaymentMethod>) -> Self {
        Self {
            customer_name: customer_name.into(),
            items: Vec::new(),
            payment_method: payment_method.into(),
            notes: String::new(),
        }
    }

    pub fn item(mut self, name: impl Into<String>, quantity: u32, price: f64) -> Self {
        self.items.push(LineItem::new(name, quantity, price));
        self
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    pub fn into_order(self) -> Order {
        let total_amount = self.total();
        let notes = Some(self.notes).filter(|notes| !notes.trim().is_empty());
        Order {
            id: None,
            customer_name: self.customer_name,
            items: OrderItems::Detailed(self.items),
            total_amount,
            payment_method: self.payment_method,
            status: OrderStatus::Pending,
            date: None,
            notes,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPatch {
    pub customer_name: Option<String>,
    pub items: Option<OrderItems>,
    /// Ignored for detailed orders, whose total is always recomputed.
    pub total_amount: Option<f64>,
    pub payment_method: Option<PaymentMethod>,
    pub status: Option<OrderStatus>,
    pub notes: Option<String>,
}

impl OrderPatch {
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}
