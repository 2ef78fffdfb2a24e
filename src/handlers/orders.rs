use actix_web::{web, HttpResponse};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::order_service::OrderService;
use crate::db::DbPool;
use crate::domain::order::{Order, OrderChanges, OrderInput};
use crate::domain::timing::{self, STORE_TZ};
use crate::errors::AppError;
use crate::infrastructure::order_repo::DieselOrderRepository;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    /// Placement time, ISO-8601. Values without a UTC offset are read as
    /// store-local wall time.
    pub timestamp: String,
    /// Preparation time in minutes. Defaults to 15; negative values are
    /// rejected.
    pub prep_time: Option<i32>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub order_details: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub completed: Option<bool>,
    pub prep_time: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    /// Placement time, ISO-8601 with the store-zone offset.
    pub timestamp: String,
    /// Deadline, ISO-8601 with the store-zone offset.
    pub due_time: String,
    /// One of "On Time", "Due Soon", "Late", "Completed".
    pub status: String,
    pub completed: bool,
    pub customer_name: String,
    pub order_details: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            timestamp: order.placed_at.to_rfc3339(),
            due_time: order.due_at.to_rfc3339(),
            status: order.status.to_string(),
            completed: order.completed,
            customer_name: order.customer_name,
            order_details: order.order_details,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArchiveResponse {
    pub archived: usize,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

fn order_service(pool: &DbPool) -> OrderService<DieselOrderRepository> {
    OrderService::new(DieselOrderRepository::new(pool.clone()))
}

fn now_in_store_tz() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&STORE_TZ)
}

/// POST /api/orders
///
/// Creates an order. The deadline and the initial status are computed before
/// anything is persisted.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Missing or unparseable timestamp, or negative prep time"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    pool: web::Data<DbPool>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    log::debug!("Creating order placed at '{}'", body.timestamp);

    let order = web::block(move || {
        let placed_at = timing::parse_timestamp(&body.timestamp)?;
        let input = OrderInput {
            placed_at,
            prep_minutes: body.prep_time,
            customer_name: body.customer_name,
            order_details: body.order_details,
        };
        order_service(&pool).create_order(input, now_in_store_tz())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    log::debug!("Created order {}", order.id);
    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// PUT /api/orders/{id}
///
/// Applies a partial update; the deadline is recomputed when the prep time
/// changes and the status is reclassified on every call.
#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Negative prep time"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let body = body.into_inner();
    log::debug!("Updating order {order_id}");

    let order = web::block(move || {
        let changes = OrderChanges {
            completed: body.completed,
            prep_minutes: body.prep_time,
        };
        order_service(&pool).update_order(order_id, changes, now_in_store_tz())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /api/orders
///
/// All orders ascending by deadline, every status freshly classified.
#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Orders ascending by due time", body = [OrderResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    log::debug!("Listing orders");

    let orders = web::block(move || order_service(&pool).list_orders(now_in_store_tz()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/orders/archive
///
/// Deletes orders placed more than 24 hours ago and reports how many went.
#[utoipa::path(
    post,
    path = "/api/orders/archive",
    responses(
        (status = 200, description = "Count of archived orders", body = ArchiveResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn archive_orders(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let archived = web::block(move || order_service(&pool).archive_older_than(now_in_store_tz()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    log::debug!("Archived {archived} orders");
    Ok(HttpResponse::Ok().json(ArchiveResponse { archived }))
}
