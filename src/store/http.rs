use std::marker::PhantomData;

use crate::{
    client::ApiClient,
    error::{AppError, AppResult},
    models::InventoryItem,
    record::Record,
    response::{decode_list, decode_record},
    store::RemoteStore,
};

/// REST adapter: `GET/POST {base}/{resource}`, `PUT/DELETE {base}/{resource}/{id}`.
#[derive(Debug, Clone)]
pub struct HttpStore<R> {
    client: ApiClient,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> HttpStore<R> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _record: PhantomData,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

impl<R: Record> RemoteStore<R> for HttpStore<R> {
    async fn fetch_all(&self) -> AppResult<Vec<R>> {
        let url = self.client.endpoint(&[R::RESOURCE])?;
        let body = self.client.get(url).await?.ok_or_else(|| {
            AppError::InvalidResponse(format!("empty response listing {}", R::RESOURCE))
        })?;
        let records = decode_list(body, R::RESOURCE)?;
        tracing::debug!(resource = R::RESOURCE, count = records.len(), "fetched collection");
        Ok(records)
    }

    async fn create(&self, draft: &R) -> AppResult<R> {
        let url = self.client.endpoint(&[R::RESOURCE])?;
        let body = self.client.post(url, draft).await?.ok_or_else(|| {
            AppError::InvalidResponse(format!("empty response creating {}", R::RESOURCE))
        })?;
        decode_record(body)
    }

    async fn update(&self, id: &str, record: &R) -> AppResult<R> {
        let url = self.client.endpoint(&[R::RESOURCE, id])?;
        let body = self.client.put(url, record).await?.ok_or_else(|| {
            AppError::InvalidResponse(format!("empty response updating {}", R::RESOURCE))
        })?;
        decode_record(body)
    }

    async fn remove(&self, id: &str) -> AppResult<()> {
        let url = self.client.endpoint(&[R::RESOURCE, id])?;
        self.client.delete(url).await?;
        Ok(())
    }
}

impl HttpStore<InventoryItem> {
    /// Items the remote store considers low on stock.
    pub async fn low_stock(&self, threshold: u32) -> AppResult<Vec<InventoryItem>> {
        let mut url = self.client.endpoint(&[InventoryItem::RESOURCE, "low-stock"])?;
        url.query_pairs_mut()
            .append_pair("threshold", &threshold.to_string());
        let body = self
            .client
            .get(url)
            .await?
            .ok_or_else(|| AppError::InvalidResponse("empty low-stock response".into()))?;
        decode_list(body, InventoryItem::RESOURCE)
    }
}
