use std::future::Future;

use crate::{error::AppResult, record::Record};

pub mod http;

pub use http::HttpStore;

/// The authoritative collection a [`CollectionSync`](crate::sync::CollectionSync)
/// mirrors. Every method is one request/response round trip.
pub trait RemoteStore<R: Record>: Send + Sync {
    fn fetch_all(&self) -> impl Future<Output = AppResult<Vec<R>>> + Send;

    /// `draft` has no id; the returned canonical record carries the one
    /// the store assigned.
    fn create(&self, draft: &R) -> impl Future<Output = AppResult<R>> + Send;

    fn update(&self, id: &str, record: &R) -> impl Future<Output = AppResult<R>> + Send;

    fn remove(&self, id: &str) -> impl Future<Output = AppResult<()>> + Send;
}
