use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::errors::DomainError;
use crate::domain::user::{NewUser, Role, UserView};
use crate::errors::AppError;
use crate::identity::Identity;
use crate::AppState;

use super::{default_limit, default_page};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// HOSPITAL_ADMIN, DOCTOR or PATIENT.
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub created_at: String,
}

impl From<UserView> for UserResponse {
    fn from(u: UserView) -> Self {
        UserResponse {
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role.as_str().to_string(),
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListUsersParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListUsersResponse {
    pub items: Vec<UserResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /users
///
/// Admin-only user creation with an explicit role. Credentials are managed
/// by the upstream gateway, never here.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation failure or unknown role"),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "users"
)]
pub async fn create_user(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require(&[Role::HospitalAdmin])?;
    let body = body.into_inner();
    body.validate()?;

    let role = body
        .role
        .parse::<Role>()
        .map_err(DomainError::InvalidInput)?;
    let input = NewUser {
        email: body.email,
        name: body.name,
        role,
    };

    let users = state.users.clone();
    let user = web::block(move || users.create_user(identity.user_id, input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// GET /users/{id}
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 403, description = "Caller may not view this user"),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn get_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    if identity.user_id != user_id && identity.role != Role::HospitalAdmin {
        return Err(AppError::Forbidden);
    }

    let users = state.users.clone();
    let user = web::block(move || users.get_user(user_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??
        .ok_or(DomainError::NotFound("User"))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// GET /users
#[utoipa::path(
    get,
    path = "/users",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of users", body = ListUsersResponse),
        (status = 403, description = "Caller is not an admin"),
    ),
    tag = "users"
)]
pub async fn list_users(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<ListUsersParams>,
) -> Result<HttpResponse, AppError> {
    identity.require(&[Role::HospitalAdmin])?;

    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let users = state.users.clone();
    let result = web::block(move || users.list_users(page, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListUsersResponse {
        items: result.items.into_iter().map(UserResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}
