use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::errors::DomainError;
use crate::domain::order::{OrderItemInput, OrderView, PlaceOrder};
use crate::domain::user::Role;
use crate::errors::AppError;
use crate::identity::Identity;
use crate::AppState;

use super::{default_limit, default_page};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    /// Requested quantity; must be a positive integer.
    #[validate(range(min = 1))]
    pub qty: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(length(min = 1), nested)]
    pub items: Vec<OrderItemRequest>,
    #[serde(default)]
    pub is_emergency: bool,
    #[serde(default)]
    pub is_tax_exempt: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub qty: i32,
    pub unit_price_cents: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub total_cents: i64,
    pub is_emergency: bool,
    pub is_tax_exempt: bool,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(order: OrderView) -> Self {
        OrderResponse {
            id: order.id,
            user_id: order.user_id,
            status: order.status,
            total_cents: order.total_cents,
            is_emergency: order.is_emergency,
            is_tax_exempt: order.is_tax_exempt,
            created_at: order.created_at.to_rfc3339(),
            items: order
                .items
                .into_iter()
                .map(|i| OrderItemResponse {
                    id: i.id,
                    product_id: i.product_id,
                    variant_id: i.variant_id,
                    qty: i.qty,
                    unit_price_cents: i.unit_price_cents,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Places an order for the authenticated caller. Validation (product
/// existence, prescription approval, stock) runs against current reads;
/// the order, its items, the inventory decrements and the audit entry are
/// then committed in a single database transaction.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = OrderResponse),
        (status = 400, description = "Validation or domain rule failure"),
        (status = 401, description = "Missing or invalid identity"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let cmd = PlaceOrder {
        items: body
            .items
            .iter()
            .map(|i| OrderItemInput {
                product_id: i.product_id,
                variant_id: i.variant_id,
                qty: i.qty,
            })
            .collect(),
        is_emergency: body.is_emergency,
        is_tax_exempt: body.is_tax_exempt,
    };

    let orders = state.orders.clone();
    let order = web::block(move || orders.place_order(identity.user_id, cmd))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(json!({ "order": OrderResponse::from(order) })))
}

/// GET /orders/{id}
///
/// Returns the order with its items. Owners see their own orders; doctors
/// and admins see all.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 403, description = "Caller may not view this order"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let orders = state.orders.clone();
    let order = web::block(move || orders.get_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??
        .ok_or(DomainError::NotFound("Order"))?;

    if !identity.can_view(order.user_id) {
        return Err(AppError::Forbidden);
    }

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /orders
///
/// Paginated list of all orders, optionally filtered by user. Reviewer-only.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
        ("userId" = Option<Uuid>, Query, description = "Filter by owning user"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 403, description = "Caller is not a reviewer"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    identity.require(&[Role::HospitalAdmin, Role::Doctor])?;

    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let orders = state.orders.clone();
    let result = web::block(move || orders.list_orders(params.user_id, page, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(OrderResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// GET /orders/mine
///
/// Paginated list of the caller's own orders.
#[utoipa::path(
    get,
    path = "/orders/mine",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of the caller's orders", body = ListOrdersResponse),
        (status = 401, description = "Missing or invalid identity"),
    ),
    tag = "orders"
)]
pub async fn my_orders(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let orders = state.orders.clone();
    let result = web::block(move || orders.list_orders(Some(identity.user_id), page, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(OrderResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}
