use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::catalog::{CategoryPatch, CategoryView, NewCategory};
use crate::domain::errors::DomainError;
use crate::domain::user::Role;
use crate::errors::AppError;
use crate::identity::Identity;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[validate(length(min = 2, max = 160))]
    pub name: String,
    #[validate(length(min = 1, max = 160))]
    pub slug: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 2, max = 160))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 160))]
    pub slug: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub product_count: i64,
    pub created_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetailResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub product_count: i64,
    pub created_at: String,
    pub children: Vec<CategoryResponse>,
}

impl From<CategoryView> for CategoryResponse {
    fn from(c: CategoryView) -> Self {
        CategoryResponse {
            id: c.id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            parent_id: c.parent_id,
            product_count: c.product_count,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /categories
#[utoipa::path(
    post,
    path = "/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created successfully", body = CategoryResponse),
        (status = 400, description = "Validation failure or unknown parent"),
        (status = 409, description = "Slug already in use"),
    ),
    tag = "categories"
)]
pub async fn create_category(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require(&[Role::HospitalAdmin])?;
    let body = body.into_inner();
    body.validate()?;

    let input = NewCategory {
        name: body.name,
        slug: body.slug,
        description: body.description,
        parent_id: body.parent_id,
    };

    let catalog = state.catalog.clone();
    let category = web::block(move || catalog.create_category(identity.user_id, input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CategoryResponse::from(category)))
}

/// PATCH /categories/{id}
#[utoipa::path(
    patch,
    path = "/categories/{id}",
    params(("id" = Uuid, Path, description = "Category UUID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Slug already in use"),
    ),
    tag = "categories"
)]
pub async fn update_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require(&[Role::HospitalAdmin])?;
    let category_id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let patch = CategoryPatch {
        name: body.name,
        slug: body.slug,
        description: body.description,
        parent_id: body.parent_id,
    };

    let catalog = state.catalog.clone();
    let category = web::block(move || catalog.update_category(identity.user_id, category_id, patch))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CategoryResponse::from(category)))
}

/// DELETE /categories/{id}
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    params(("id" = Uuid, Path, description = "Category UUID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category still has products"),
    ),
    tag = "categories"
)]
pub async fn delete_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    identity.require(&[Role::HospitalAdmin])?;
    let category_id = path.into_inner();

    let catalog = state.catalog.clone();
    web::block(move || catalog.delete_category(identity.user_id, category_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /categories/{id}
#[utoipa::path(
    get,
    path = "/categories/{id}",
    params(("id" = Uuid, Path, description = "Category UUID")),
    responses(
        (status = 200, description = "Category found", body = CategoryDetailResponse),
        (status = 404, description = "Category not found"),
    ),
    tag = "categories"
)]
pub async fn get_category(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let category_id = path.into_inner();

    let catalog = state.catalog.clone();
    let detail = web::block(move || catalog.get_category(category_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??
        .ok_or(DomainError::NotFound("Category"))?;

    let category = detail.category;
    Ok(HttpResponse::Ok().json(CategoryDetailResponse {
        id: category.id,
        name: category.name,
        slug: category.slug,
        description: category.description,
        parent_id: category.parent_id,
        product_count: category.product_count,
        created_at: category.created_at.to_rfc3339(),
        children: detail
            .children
            .into_iter()
            .map(CategoryResponse::from)
            .collect(),
    }))
}

/// GET /categories
#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "All categories in name order", body = [CategoryResponse]),
    ),
    tag = "categories"
)]
pub async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.clone();
    let categories = web::block(move || catalog.list_categories())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<CategoryResponse> = categories.into_iter().map(CategoryResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}
