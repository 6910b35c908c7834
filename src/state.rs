use crate::{
    client::ApiClient,
    config::AppConfig,
    error::AppResult,
    services::{inventory_service::InventoryService, order_service::OrderService},
    session::Session,
    store::HttpStore,
    sync::CollectionSync,
};

/// Everything a dashboard session works with, wired from one config.
pub struct AppState {
    pub client: ApiClient,
    pub inventory: InventoryService,
    pub orders: OrderService,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let session = match &config.api_token {
            Some(token) => Session::with_token(token.clone()),
            None => Session::new(),
        };
        let client = ApiClient::new(config, session)?;

        let inventory = InventoryService::new(
            CollectionSync::new(HttpStore::new(client.clone())).with_policy(config.status_policy),
        );
        let orders = OrderService::new(CollectionSync::new(HttpStore::new(client.clone())));

        Ok(Self {
            client,
            inventory,
            orders,
        })
    }
}
