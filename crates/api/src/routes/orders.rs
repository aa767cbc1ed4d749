//! Checkout and order query endpoints.

use std::str::FromStr;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use checkout::{CheckoutOrchestrator, OrderQueries};
use common::{OrderId, UserId};
use domain::{Order, OrderStatus};
use ledger::OrderLedger;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<L: OrderLedger> {
    pub orchestrator: Arc<CheckoutOrchestrator<L>>,
    pub queries: OrderQueries<L>,
}

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct ListOrdersParams {
    pub user_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: String,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: String,
    pub user_id: String,
    pub status: String,
    pub lines: Vec<OrderLineResponse>,
    pub total_cents: i64,
    pub created_at: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    pub product_id: u64,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        let lines = order
            .lines
            .iter()
            .map(|line| OrderLineResponse {
                product_id: line.product_id.value(),
                quantity: line.quantity,
                unit_price_cents: line.unit_price.cents(),
                line_total_cents: line.line_total().cents(),
            })
            .collect();

        OrderResponse {
            order_id: order.order_id.to_string(),
            user_id: order.user_id.as_str().to_string(),
            status: order.status.to_string(),
            lines,
            total_cents: order.total.cents(),
            created_at: order.created_at.to_rfc3339(),
        }
    }
}

// -- Handlers --

/// POST /checkout — run the checkout workflow for a user.
///
/// The workflow runs in a spawned task: once the order is committed to
/// the ledger, a client disconnect must not cancel the payment and
/// settlement steps mid-flight.
#[tracing::instrument(skip(state, req))]
pub async fn checkout<L: OrderLedger + 'static>(
    State(state): State<Arc<AppState<L>>>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    if req.user_id.trim().is_empty() {
        return Err(ApiError::BadRequest("userId must not be empty".to_string()));
    }

    let orchestrator = Arc::clone(&state.orchestrator);
    let user_id = UserId::new(req.user_id);

    let order = tokio::spawn(async move { orchestrator.checkout(user_id).await })
        .await
        .map_err(|e| ApiError::Internal(format!("checkout task failed: {e}")))??;

    Ok(Json(OrderResponse::from(&order)))
}

/// GET /orders/:id — load an order by ID.
#[tracing::instrument(skip(state))]
pub async fn get<L: OrderLedger + 'static>(
    State(state): State<Arc<AppState<L>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state
        .queries
        .get(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;

    Ok(Json(OrderResponse::from(&order)))
}

/// GET /orders?user_id= — list a user's orders, oldest first.
#[tracing::instrument(skip(state, params))]
pub async fn list<L: OrderLedger + 'static>(
    State(state): State<Arc<AppState<L>>>,
    Query(params): Query<ListOrdersParams>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let user_id = UserId::new(params.user_id);
    let orders = state.queries.list_by_user(&user_id).await?;

    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

/// PUT /orders/:id/status — move an order to a new status.
#[tracing::instrument(skip(state, req))]
pub async fn update_status<L: OrderLedger + 'static>(
    State(state): State<Arc<AppState<L>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let status = OrderStatus::from_str(&req.status)
        .map_err(|_| ApiError::BadRequest(format!("Unknown order status '{}'", req.status)))?;

    let order = state.queries.update_status(order_id, status).await?;

    Ok(Json(OrderResponse::from(&order)))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order ID format: {e}")))?;
    Ok(OrderId::from(uuid))
}
