use crate::{
    client::ApiClient,
    dto::dashboard::{Activity, DashboardStats},
    error::{AppError, AppResult},
    models::{InventoryItem, Order, OrderStatus},
    response::{decode_list, decode_record},
    status::StatusPolicy,
};

pub async fn fetch_stats(client: &ApiClient) -> AppResult<DashboardStats> {
    let url = client.endpoint(&["dashboard", "stats"])?;
    match client.get(url).await? {
        Some(body) => decode_record(body),
        None => Err(AppError::InvalidResponse("empty dashboard stats".into())),
    }
}

pub async fn fetch_recent_activity(client: &ApiClient) -> AppResult<Vec<Activity>> {
    let url = client.endpoint(&["dashboard", "recent-activity"])?;
    match client.get(url).await? {
        Some(body) => decode_list(body, "activities"),
        None => Ok(Vec::new()),
    }
}

/// The dashboard figures computed from already loaded collections.
pub fn summarize(inventory: &[InventoryItem], orders: &[Order], policy: &StatusPolicy) -> DashboardStats {
    DashboardStats {
        total_revenue: orders
            .iter()
            .filter(|order| order.status != OrderStatus::Cancelled)
            .map(|order| order.total_amount)
            .sum(),
        total_orders: orders.len() as u64,
        inventory_items: inventory.len() as u64,
        low_stock_alerts: inventory
            .iter()
            .filter(|item| policy.is_low_stock(item.quantity))
            .count() as u64,
    }
}
