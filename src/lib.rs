pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod filter;
pub mod models;
pub mod record;
pub mod response;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod status;
pub mod store;
pub mod sync;
