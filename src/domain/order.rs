use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The only status ever written by order placement; transitions (payment,
/// fulfilment, cancellation) are handled by downstream systems.
pub const ORDER_STATUS_PENDING: &str = "PENDING";

#[derive(Debug, Clone)]
pub struct OrderItemInput {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub qty: i32,
}

#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub items: Vec<OrderItemInput>,
    pub is_emergency: bool,
    pub is_tax_exempt: bool,
}

/// One order line with the unit price captured at validation time. The price
/// is copied onto the line so later catalog price changes never alter a
/// stored order.
#[derive(Debug, Clone)]
pub struct PricedItem {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub qty: i32,
    pub unit_price_cents: i32,
}

/// A fully validated and priced order, ready for the atomic commit.
#[derive(Debug, Clone)]
pub struct PricedOrder {
    pub user_id: Uuid,
    pub total_cents: i64,
    pub is_emergency: bool,
    pub is_tax_exempt: bool,
    pub items: Vec<PricedItem>,
}

#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub qty: i32,
    pub unit_price_cents: i32,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub total_cents: i64,
    pub is_emergency: bool,
    pub is_tax_exempt: bool,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
}
