use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::catalog::{
    NewProduct, NewVariant, ProductFilter, ProductPatch, ProductView, VariantView,
};
use crate::domain::errors::DomainError;
use crate::domain::user::Role;
use crate::errors::AppError;
use crate::identity::Identity;
use crate::AppState;

use super::{default_limit, default_page};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariantRequest {
    #[validate(length(min = 1, max = 64))]
    pub size: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub model: Option<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub additional_price_cents: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub category_id: Uuid,
    #[validate(length(min = 2, max = 160))]
    pub title: String,
    #[validate(length(min = 2, max = 5000))]
    pub description: String,
    /// Unit price in integer cents.
    #[validate(range(min = 0))]
    pub price_cents: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub inventory: i32,
    #[serde(default)]
    pub prescription_required: bool,
    #[serde(default)]
    pub emergency_item: bool,
    #[serde(default)]
    #[validate(nested)]
    pub variants: Vec<VariantRequest>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub category_id: Option<Uuid>,
    #[validate(length(min = 2, max = 160))]
    pub title: Option<String>,
    #[validate(length(min = 2, max = 5000))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price_cents: Option<i32>,
    #[validate(range(min = 0))]
    pub inventory: Option<i32>,
    pub prescription_required: Option<bool>,
    pub emergency_item: Option<bool>,
    /// When present, replaces the product's variant set.
    #[validate(nested)]
    pub variants: Option<Vec<VariantRequest>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariantResponse {
    pub id: Uuid,
    pub size: Option<String>,
    pub model: Option<String>,
    pub certifications: Vec<String>,
    pub additional_price_cents: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub description: String,
    pub price_cents: i32,
    pub inventory: i32,
    pub prescription_required: bool,
    pub emergency_item: bool,
    pub created_at: String,
    pub variants: Vec<VariantResponse>,
}

impl From<VariantView> for VariantResponse {
    fn from(v: VariantView) -> Self {
        VariantResponse {
            id: v.id,
            size: v.size,
            model: v.model,
            certifications: v.certifications,
            additional_price_cents: v.additional_price_cents,
        }
    }
}

impl From<ProductView> for ProductResponse {
    fn from(p: ProductView) -> Self {
        ProductResponse {
            id: p.id,
            category_id: p.category_id,
            title: p.title,
            description: p.description,
            price_cents: p.price_cents,
            inventory: p.inventory,
            prescription_required: p.prescription_required,
            emergency_item: p.emergency_item,
            created_at: p.created_at.to_rfc3339(),
            variants: p.variants.into_iter().map(VariantResponse::from).collect(),
        }
    }
}

fn variant_input(v: VariantRequest) -> NewVariant {
    NewVariant {
        size: v.size,
        model: v.model,
        certifications: v.certifications,
        additional_price_cents: v.additional_price_cents,
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub category_id: Option<Uuid>,
    /// Matches products with a variant carrying this certification label.
    pub certification: Option<String>,
    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListProductsResponse {
    pub items: Vec<ProductResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /products
#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created successfully", body = ProductResponse),
        (status = 400, description = "Validation failure or unknown category"),
        (status = 403, description = "Caller may not manage the catalog"),
    ),
    tag = "products"
)]
pub async fn create_product(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require(&[Role::HospitalAdmin, Role::Doctor])?;
    let body = body.into_inner();
    body.validate()?;

    let input = NewProduct {
        category_id: body.category_id,
        title: body.title,
        description: body.description,
        price_cents: body.price_cents,
        inventory: body.inventory,
        prescription_required: body.prescription_required,
        emergency_item: body.emergency_item,
        variants: body.variants.into_iter().map(variant_input).collect(),
    };

    let catalog = state.catalog.clone();
    let product = web::block(move || catalog.create_product(identity.user_id, input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

/// PATCH /products/{id}
#[utoipa::path(
    patch,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn update_product(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require(&[Role::HospitalAdmin, Role::Doctor])?;
    let product_id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let patch = ProductPatch {
        category_id: body.category_id,
        title: body.title,
        description: body.description,
        price_cents: body.price_cents,
        inventory: body.inventory,
        prescription_required: body.prescription_required,
        emergency_item: body.emergency_item,
        variants: body
            .variants
            .map(|vs| vs.into_iter().map(variant_input).collect()),
    };

    let catalog = state.catalog.clone();
    let product = web::block(move || catalog.update_product(identity.user_id, product_id, patch))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// DELETE /products/{id}
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    identity.require(&[Role::HospitalAdmin, Role::Doctor])?;
    let product_id = path.into_inner();

    let catalog = state.catalog.clone();
    web::block(move || catalog.delete_product(identity.user_id, product_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();

    let catalog = state.catalog.clone();
    let product = web::block(move || catalog.get_product(product_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??
        .ok_or(DomainError::NotFound("Product"))?;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// GET /products
///
/// Public, paginated catalog listing with category, certification and title
/// filters.
#[utoipa::path(
    get,
    path = "/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
        ("categoryId" = Option<Uuid>, Query, description = "Filter by category"),
        ("certification" = Option<String>, Query, description = "Filter by variant certification label"),
        ("search" = Option<String>, Query, description = "Title substring filter"),
    ),
    responses(
        (status = 200, description = "Paginated list of products", body = ListProductsResponse),
    ),
    tag = "products"
)]
pub async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ListProductsParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);
    let filter = ProductFilter {
        page,
        limit,
        category_id: params.category_id,
        certification: params.certification,
        search: params.search,
    };

    let catalog = state.catalog.clone();
    let result = web::block(move || catalog.list_products(&filter))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListProductsResponse {
        items: result.items.into_iter().map(ProductResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}
