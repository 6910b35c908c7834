use crate::{
    dto::orders::{OrderDraft, OrderPatch},
    error::AppResult,
    filter::OrderFilter,
    models::{Order, OrderStatus},
    store::{HttpStore, RemoteStore},
    sync::{CollectionSync, LoadOutcome},
};

pub struct OrderService<S = HttpStore<Order>> {
    sync: CollectionSync<Order, S>,
}

impl<S: RemoteStore<Order>> OrderService<S> {
    pub fn new(sync: CollectionSync<Order, S>) -> Self {
        Self { sync }
    }

    pub fn sync(&self) -> &CollectionSync<Order, S> {
        &self.sync
    }

    pub async fn refresh(&self) -> AppResult<LoadOutcome> {
        self.sync.load().await
    }

    /// Places an order built from the order form; status starts Pending and
    /// the total is the sum of the line items.
    pub async fn place(&self, draft: OrderDraft) -> AppResult<Order> {
        self.sync.create(draft.into_order()).await
    }

    /// Records an order entered as a summary row (count and total only).
    pub async fn record(&self, order: Order) -> AppResult<Order> {
        self.sync.create(order).await
    }

    pub async fn set_status(&self, id: &str, status: OrderStatus) -> AppResult<Order> {
        self.sync.update(id, OrderPatch::status(status)).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.sync.remove(id).await
    }

    pub fn view(&self, filter: &OrderFilter) -> Vec<Order> {
        self.sync.with_items(|orders| filter.apply(orders))
    }

    /// Revenue of every order that was not cancelled.
    pub fn revenue(&self) -> f64 {
        self.sync.with_items(|orders| {
            orders
                .iter()
                .filter(|order| order.status != OrderStatus::Cancelled)
                .map(|order| order.total_amount)
                .sum()
        })
    }
}
