use serde_json::Value;

use crate::{
    client::ApiClient,
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest},
    error::{AppError, AppResult},
    response::decode_record,
};

pub async fn register_user(client: &ApiClient, payload: RegisterRequest) -> AppResult<Value> {
    let url = client.endpoint(&["auth", "register"])?;
    let body = client.post(url, &payload).await?.unwrap_or(Value::Null);
    tracing::info!(email = %payload.email, "user registered");
    Ok(body)
}

/// Logs in and stores the issued token in the client's session.
pub async fn login_user(client: &ApiClient, payload: LoginRequest) -> AppResult<LoginResponse> {
    let url = client.endpoint(&["auth", "login"])?;
    let body = client
        .post(url, &payload)
        .await?
        .ok_or_else(|| AppError::InvalidResponse("empty login response".into()))?;
    let resp: LoginResponse = decode_record(body)?;
    if resp.token.trim().is_empty() {
        return Err(AppError::InvalidResponse("login response has an empty token".into()));
    }

    client.session().set(resp.token.clone());
    tracing::info!(email = %payload.email, "logged in");
    Ok(resp)
}

pub fn logout_user(client: &ApiClient) {
    client.session().clear();
    tracing::info!("logged out");
}
