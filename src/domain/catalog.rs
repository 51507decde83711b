use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The slice of a product that order validation needs.
#[derive(Debug, Clone)]
pub struct ProductSummary {
    pub id: Uuid,
    pub title: String,
    pub price_cents: i32,
    pub inventory: i32,
    pub prescription_required: bool,
    pub variant_ids: Vec<Uuid>,
}

#[derive(Debug, Clone)]
pub struct VariantView {
    pub id: Uuid,
    pub size: Option<String>,
    pub model: Option<String>,
    pub certifications: Vec<String>,
    pub additional_price_cents: i32,
}

#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub description: String,
    pub price_cents: i32,
    pub inventory: i32,
    pub prescription_required: bool,
    pub emergency_item: bool,
    pub created_at: DateTime<Utc>,
    pub variants: Vec<VariantView>,
}

#[derive(Debug, Clone)]
pub struct NewVariant {
    pub size: Option<String>,
    pub model: Option<String>,
    pub certifications: Vec<String>,
    pub additional_price_cents: i32,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: Uuid,
    pub title: String,
    pub description: String,
    pub price_cents: i32,
    pub inventory: i32,
    pub prescription_required: bool,
    pub emergency_item: bool,
    pub variants: Vec<NewVariant>,
}

/// Partial product update; `None` leaves the field unchanged. A supplied
/// variant list replaces the existing set.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub category_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i32>,
    pub inventory: Option<i32>,
    pub prescription_required: Option<bool>,
    pub emergency_item: Option<bool>,
    pub variants: Option<Vec<NewVariant>>,
}

#[derive(Debug, Clone)]
pub struct ProductFilter {
    pub page: i64,
    pub limit: i64,
    pub category_id: Option<Uuid>,
    pub certification: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CategoryView {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub product_count: i64,
    pub created_at: DateTime<Utc>,
}

/// A category together with its direct children.
#[derive(Debug, Clone)]
pub struct CategoryDetail {
    pub category: CategoryView,
    pub children: Vec<CategoryView>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
}
