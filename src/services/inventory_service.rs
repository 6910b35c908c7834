use chrono::NaiveDate;

use crate::{
    dto::inventory::InventoryPatch,
    error::AppResult,
    filter::{self, InventoryFilter},
    models::{InventoryItem, InventoryStatus},
    store::{HttpStore, RemoteStore},
    sync::{CollectionSync, LoadOutcome},
};

pub struct InventoryService<S = HttpStore<InventoryItem>> {
    sync: CollectionSync<InventoryItem, S>,
}

impl<S: RemoteStore<InventoryItem>> InventoryService<S> {
    pub fn new(sync: CollectionSync<InventoryItem, S>) -> Self {
        Self { sync }
    }

    pub fn sync(&self) -> &CollectionSync<InventoryItem, S> {
        &self.sync
    }

    pub async fn refresh(&self) -> AppResult<LoadOutcome> {
        self.sync.load().await
    }

    /// Saves the form: items without an id are created, the rest updated
    /// with every editable field.
    pub async fn submit(&self, mut item: InventoryItem) -> AppResult<InventoryItem> {
        match item.id.take().filter(|id| !id.is_empty()) {
            Some(id) => self.sync.update(&id, InventoryPatch::from(item)).await,
            None => self.sync.create(item).await,
        }
    }

    pub async fn adjust_quantity(&self, id: &str, quantity: i64) -> AppResult<InventoryItem> {
        self.sync.update(id, InventoryPatch::quantity(quantity)).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.sync.remove(id).await
    }

    pub fn view(&self, filter: &InventoryFilter) -> Vec<InventoryItem> {
        self.sync.with_items(|items| filter.apply(items))
    }

    pub fn categories(&self) -> Vec<String> {
        self.sync.with_items(filter::categories)
    }

    pub fn statuses(&self) -> Vec<InventoryStatus> {
        self.sync.with_items(filter::statuses)
    }

    /// Items still in stock but at or under the low-stock threshold.
    pub fn low_stock_alerts(&self) -> Vec<InventoryItem> {
        let policy = self.sync.policy();
        self.sync.with_items(|items| {
            items
                .iter()
                .filter(|item| policy.is_low_stock(item.quantity))
                .cloned()
                .collect()
        })
    }

    /// Items whose expiry date is at most `days` away, expired ones included.
    pub fn expiring_within(&self, today: NaiveDate, days: i64) -> Vec<InventoryItem> {
        self.sync.with_items(|items| {
            items
                .iter()
                .filter(|item| {
                    item.expiry_date
                        .is_some_and(|expiry| (expiry - today).num_days() <= days)
                })
                .cloned()
                .collect()
        })
    }
}

impl InventoryService<HttpStore<InventoryItem>> {
    pub async fn fetch_low_stock(&self, threshold: u32) -> AppResult<Vec<InventoryItem>> {
        self.sync.store().low_stock(threshold).await
    }
}
