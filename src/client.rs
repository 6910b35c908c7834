use anyhow::anyhow;
use reqwest::{Client, Method, header::AUTHORIZATION};
use serde::Serialize;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    session::Session,
};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared HTTP plumbing for every remote call: base URL, timeout, session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &AppConfig, session: Session) -> AppResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base: config.api_url.clone(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// `segments` appended to the base path, each percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal(anyhow!("API base URL cannot carry a path")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get(&self, url: Url) -> AppResult<Option<Value>> {
        self.dispatch(Method::GET, url, None).await
    }

    pub async fn post<B: Serialize>(&self, url: Url, body: &B) -> AppResult<Option<Value>> {
        let body = to_body(body)?;
        self.dispatch(Method::POST, url, Some(body)).await
    }

    pub async fn put<B: Serialize>(&self, url: Url, body: &B) -> AppResult<Option<Value>> {
        let body = to_body(body)?;
        self.dispatch(Method::PUT, url, Some(body)).await
    }

    pub async fn delete(&self, url: Url) -> AppResult<Option<Value>> {
        self.dispatch(Method::DELETE, url, None).await
    }

    /// Sends one request. Returns `None` for an empty success body.
    async fn dispatch(&self, method: Method, url: Url, body: Option<Value>) -> AppResult<Option<Value>> {
        let request_id = Uuid::new_v4().to_string();
        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .header(REQUEST_ID_HEADER, request_id.as_str());
        if let Some(authorization) = self.session.authorization() {
            builder = builder.header(AUTHORIZATION, authorization);
        }
        if let Some(body) = body.as_ref() {
            builder = builder.json(body);
        }

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            uri = %url,
            "request started"
        );

        let response = builder.send().await.inspect_err(|err| {
            tracing::warn!(request_id = %request_id, error = %err, "request failed");
        })?;
        let status = response.status();
        let text = response.text().await?;

        tracing::debug!(
            request_id = %request_id,
            status = %status,
            "request finished"
        );

        if !status.is_success() {
            return Err(AppError::from_response(status, &text));
        }
        if text.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|err| AppError::InvalidResponse(err.to_string()))
    }
}

fn to_body<B: Serialize>(body: &B) -> AppResult<Value> {
    serde_json::to_value(body).map_err(|err| AppError::Internal(err.into()))
}
