pub mod auth_service;
pub mod dashboard_service;
pub mod inventory_service;
pub mod order_service;
