use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};

use inventory_dashboard_client::{
    client::ApiClient,
    config::AppConfig,
    dto::{auth::LoginRequest, dashboard::ActivityKind},
    error::AppError,
    models::{InventoryItem, Order, OrderItems},
    services::{auth_service, dashboard_service},
    session::Session,
    store::{HttpStore, RemoteStore},
};

#[derive(Default)]
struct MockState {
    inventory: Vec<Value>,
    next_id: i64,
    authorization: Vec<String>,
    request_ids: Vec<String>,
}

type Shared = Arc<Mutex<MockState>>;

fn record_headers(state: &Shared, headers: &HeaderMap) {
    let mut state = state.lock().unwrap();
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        state.authorization.push(auth.to_string());
    }
    if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        state.request_ids.push(id.to_string());
    }
}

async fn list_inventory(State(state): State<Shared>, headers: HeaderMap) -> Json<Value> {
    record_headers(&state, &headers);
    let items = state.lock().unwrap().inventory.clone();
    Json(json!({ "inventory": items }))
}

async fn create_inventory(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record_headers(&state, &headers);
    let mut state = state.lock().unwrap();
    state.next_id += 1;
    body["id"] = json!(100 + state.next_id);
    state.inventory.push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn update_inventory(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut state = state.lock().unwrap();
    let slot = state
        .inventory
        .iter_mut()
        .find(|item| item["id"] == json!(id))
        .ok_or((StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))))?;
    body["id"] = json!(id);
    *slot = body.clone();
    Ok(Json(json!({ "message": "Updated", "data": body })))
}

async fn delete_inventory(State(state): State<Shared>, Path(id): Path<i64>) -> StatusCode {
    let mut state = state.lock().unwrap();
    let before = state.inventory.len();
    state.inventory.retain(|item| item["id"] != json!(id));
    if state.inventory.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

#[derive(Deserialize)]
struct ThresholdQuery {
    threshold: i64,
}

async fn low_stock(State(state): State<Shared>, Query(query): Query<ThresholdQuery>) -> Json<Value> {
    let items: Vec<Value> = state
        .lock()
        .unwrap()
        .inventory
        .iter()
        .filter(|item| item["quantity"].as_i64().is_some_and(|q| q <= query.threshold))
        .cloned()
        .collect();
    Json(Value::Array(items))
}

async fn list_orders() -> Json<Value> {
    Json(json!([
        {
            "id": "o-1",
            "customerName": "Asha",
            "items": [{ "name": "Rice", "quantity": 2, "price": 60.0 }],
            "totalAmount": 120.0,
            "paymentMethod": "Card",
            "status": "Processing",
            "date": "2025-06-01T09:00:00Z"
        },
        {
            "id": 2,
            "customerName": "Ravi",
            "items": "5",
            "totalAmount": 450,
            "paymentMethod": "Cash",
            "status": "Pending",
            "date": "2025-06-02"
        }
    ]))
}

async fn create_order_fails() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "database is down" })),
    )
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

async fn login(Json(payload): Json<Credentials>) -> Result<Json<Value>, StatusCode> {
    if payload.email == "admin@example.com" && payload.password == "secret" {
        Ok(Json(json!({ "token": "Bearer issued-token" })))
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn stats() -> Json<Value> {
    Json(json!({ "totalRevenue": 45231.5, "totalOrders": 12 }))
}

async fn recent_activity() -> Json<Value> {
    Json(json!({
        "activities": [
            { "id": "a-1", "type": "order", "title": "New order", "time": "2 min ago" },
            { "id": "a-2", "type": "alert", "title": "Low stock: Salt" }
        ]
    }))
}

async fn spawn_mock(state: Shared) -> anyhow::Result<SocketAddr> {
    let app = Router::new()
        .route("/api/inventory", get(list_inventory).post(create_inventory))
        .route("/api/inventory/low-stock", get(low_stock))
        .route(
            "/api/inventory/{id}",
            put(update_inventory).delete(delete_inventory),
        )
        .route("/api/orders", get(list_orders).post(create_order_fails))
        .route("/api/auth/login", post(login))
        .route("/api/dashboard/stats", get(stats))
        .route("/api/dashboard/recent-activity", get(recent_activity))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    Ok(addr)
}

fn client_for(addr: SocketAddr, session: Session) -> anyhow::Result<ApiClient> {
    let config = AppConfig::new(&format!("http://{addr}/api"))?;
    Ok(ApiClient::new(&config, session)?)
}

#[tokio::test]
async fn inventory_crud_round_trips_through_http() -> anyhow::Result<()> {
    let state = Shared::default();
    let addr = spawn_mock(state.clone()).await?;
    let store = HttpStore::<InventoryItem>::new(client_for(addr, Session::new())?);

    assert!(store.fetch_all().await?.is_empty());

    let created = store
        .create(&InventoryItem::draft("Paracetamol", "Medicines", 8, "tablets", 2.5))
        .await?;
    assert_eq!(created.id.as_deref(), Some("101"));

    let mut changed = created.clone();
    changed.quantity = 80;
    let updated = store.update("101", &changed).await?;
    assert_eq!(updated.quantity, 80);
    assert_eq!(updated.id.as_deref(), Some("101"));

    let listed = store.fetch_all().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].quantity, 80);

    store.remove("101").await?;
    assert!(store.fetch_all().await?.is_empty());

    let err = store.remove("101").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn requests_carry_request_id_and_bearer_token() -> anyhow::Result<()> {
    let state = Shared::default();
    let addr = spawn_mock(state.clone()).await?;
    let session = Session::new();
    let store = HttpStore::<InventoryItem>::new(client_for(addr, session.clone())?);

    store.fetch_all().await?;
    session.set("abc");
    store.fetch_all().await?;
    session.clear();
    store.fetch_all().await?;

    let state = state.lock().unwrap();
    assert_eq!(state.authorization, vec!["Bearer abc".to_string()]);
    assert_eq!(state.request_ids.len(), 3);
    assert_ne!(state.request_ids[0], state.request_ids[1]);
    Ok(())
}

#[tokio::test]
async fn low_stock_queries_with_threshold() -> anyhow::Result<()> {
    let state = Shared::default();
    let addr = spawn_mock(state.clone()).await?;
    let store = HttpStore::<InventoryItem>::new(client_for(addr, Session::new())?);
    store
        .create(&InventoryItem::draft("Salt", "Groceries", 3, "kg", 20.0))
        .await?;
    store
        .create(&InventoryItem::draft("Rice", "Groceries", 300, "kg", 60.0))
        .await?;

    let low = store.low_stock(10).await?;

    assert_eq!(low.len(), 1);
    assert_eq!(low[0].name, "Salt");
    Ok(())
}

#[tokio::test]
async fn orders_decode_both_item_shapes() -> anyhow::Result<()> {
    let addr = spawn_mock(Shared::default()).await?;
    let store = HttpStore::<Order>::new(client_for(addr, Session::new())?);

    let orders = store.fetch_all().await?;

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].items.count(), 2);
    assert_eq!(orders[1].id.as_deref(), Some("2"));
    assert_eq!(orders[1].items, OrderItems::Summary(5));
    Ok(())
}

#[tokio::test]
async fn server_errors_surface_the_server_message() -> anyhow::Result<()> {
    let addr = spawn_mock(Shared::default()).await?;
    let store = HttpStore::<Order>::new(client_for(addr, Session::new())?);

    let err = store
        .create(&Order::summary("Ravi", 2, 100.0, "Cash"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Error 500: database is down");
    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() -> anyhow::Result<()> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    let store = HttpStore::<InventoryItem>::new(client_for(addr, Session::new())?);

    let err = store.fetch_all().await.unwrap_err();

    assert!(matches!(err, AppError::Transport(_)));
    assert_eq!(err.user_message(), "Network or server error");
    Ok(())
}

#[tokio::test]
async fn login_stores_token_and_logout_clears_it() -> anyhow::Result<()> {
    let state = Shared::default();
    let addr = spawn_mock(state.clone()).await?;
    let client = client_for(addr, Session::new())?;

    let err = auth_service::login_user(
        &client,
        LoginRequest {
            email: "admin@example.com".into(),
            password: "wrong".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
    assert!(!client.session().is_authenticated());

    auth_service::login_user(
        &client,
        LoginRequest {
            email: "admin@example.com".into(),
            password: "secret".into(),
        },
    )
    .await?;
    assert_eq!(
        client.session().authorization().as_deref(),
        Some("Bearer issued-token")
    );

    HttpStore::<InventoryItem>::new(client.clone()).fetch_all().await?;
    assert_eq!(
        state.lock().unwrap().authorization,
        vec!["Bearer issued-token".to_string()]
    );

    auth_service::logout_user(&client);
    assert!(!client.session().is_authenticated());
    Ok(())
}

#[tokio::test]
async fn dashboard_stats_default_missing_fields() -> anyhow::Result<()> {
    let addr = spawn_mock(Shared::default()).await?;
    let client = client_for(addr, Session::new())?;

    let stats = dashboard_service::fetch_stats(&client).await?;

    assert_eq!(stats.total_revenue, 45231.5);
    assert_eq!(stats.total_orders, 12);
    assert_eq!(stats.inventory_items, 0);
    Ok(())
}

#[tokio::test]
async fn recent_activity_unwraps_the_activities_key() -> anyhow::Result<()> {
    let addr = spawn_mock(Shared::default()).await?;
    let client = client_for(addr, Session::new())?;

    let activity = dashboard_service::fetch_recent_activity(&client).await?;

    assert_eq!(activity.len(), 2);
    assert_eq!(activity[0].kind, ActivityKind::Order);
    assert_eq!(activity[1].id, "a-2");
    assert!(activity[1].description.is_empty());
    Ok(())
}
