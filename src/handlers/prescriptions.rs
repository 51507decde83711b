use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::errors::DomainError;
use crate::domain::prescription::{PrescriptionFilter, PrescriptionStatus, PrescriptionView};
use crate::domain::user::Role;
use crate::errors::AppError;
use crate::identity::Identity;
use crate::AppState;

use super::{default_limit, default_page};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrescriptionRequest {
    pub product_id: Uuid,
    /// Reference into the external document store, e.g. an object key.
    #[validate(length(min = 1, max = 512))]
    pub document_ref: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub status: String,
    pub document_ref: Option<String>,
    pub created_at: String,
}

impl From<PrescriptionView> for PrescriptionResponse {
    fn from(p: PrescriptionView) -> Self {
        PrescriptionResponse {
            id: p.id,
            user_id: p.user_id,
            product_id: p.product_id,
            status: p.status.as_str().to_string(),
            document_ref: p.document_ref,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyPrescriptionResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_title: String,
    pub status: String,
    pub document_ref: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionDetailResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub user_name: Option<String>,
    pub product_id: Uuid,
    pub product_title: String,
    pub status: String,
    pub document_ref: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListPrescriptionsParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// PENDING, APPROVED or REJECTED.
    pub status: Option<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListPrescriptionsResponse {
    pub items: Vec<PrescriptionDetailResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /prescriptions
///
/// Submits a prescription for a restricted product. The document itself
/// lives in the external store; only its reference is recorded.
#[utoipa::path(
    post,
    path = "/prescriptions",
    request_body = CreatePrescriptionRequest,
    responses(
        (status = 201, description = "Prescription submitted", body = PrescriptionResponse),
        (status = 400, description = "Product does not require a prescription"),
        (status = 404, description = "Product not found"),
    ),
    tag = "prescriptions"
)]
pub async fn create_prescription(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePrescriptionRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let prescriptions = state.prescriptions.clone();
    let prescription = web::block(move || {
        prescriptions.submit(identity.user_id, body.product_id, body.document_ref)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created()
        .json(json!({ "prescription": PrescriptionResponse::from(prescription) })))
}

/// GET /prescriptions/mine
#[utoipa::path(
    get,
    path = "/prescriptions/mine",
    responses(
        (status = 200, description = "The caller's prescriptions, newest first", body = [MyPrescriptionResponse]),
        (status = 401, description = "Missing or invalid identity"),
    ),
    tag = "prescriptions"
)]
pub async fn my_prescriptions(
    state: web::Data<AppState>,
    identity: Identity,
) -> Result<HttpResponse, AppError> {
    let prescriptions = state.prescriptions.clone();
    let items = web::block(move || prescriptions.mine(identity.user_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<MyPrescriptionResponse> = items
        .into_iter()
        .map(|p| MyPrescriptionResponse {
            id: p.prescription.id,
            product_id: p.prescription.product_id,
            product_title: p.product_title,
            status: p.prescription.status.as_str().to_string(),
            document_ref: p.prescription.document_ref,
            created_at: p.prescription.created_at.to_rfc3339(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({ "items": items })))
}

/// GET /prescriptions
///
/// Reviewer listing with status and user filters.
#[utoipa::path(
    get,
    path = "/prescriptions",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
        ("status" = Option<String>, Query, description = "PENDING, APPROVED or REJECTED"),
        ("userId" = Option<Uuid>, Query, description = "Filter by submitting user"),
    ),
    responses(
        (status = 200, description = "Paginated list of prescriptions", body = ListPrescriptionsResponse),
        (status = 403, description = "Caller is not a reviewer"),
    ),
    tag = "prescriptions"
)]
pub async fn list_prescriptions(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<ListPrescriptionsParams>,
) -> Result<HttpResponse, AppError> {
    identity.require(&[Role::HospitalAdmin, Role::Doctor])?;

    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);
    let status = params
        .status
        .as_deref()
        .map(str::parse::<PrescriptionStatus>)
        .transpose()
        .map_err(DomainError::InvalidInput)?;

    let filter = PrescriptionFilter {
        page,
        limit,
        status,
        user_id: params.user_id,
    };

    let prescriptions = state.prescriptions.clone();
    let result = web::block(move || prescriptions.list(&filter))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListPrescriptionsResponse {
        items: result
            .items
            .into_iter()
            .map(|d| PrescriptionDetailResponse {
                id: d.prescription.id,
                user_id: d.prescription.user_id,
                user_email: d.user_email,
                user_name: d.user_name,
                product_id: d.prescription.product_id,
                product_title: d.product_title,
                status: d.prescription.status.as_str().to_string(),
                document_ref: d.prescription.document_ref,
                created_at: d.prescription.created_at.to_rfc3339(),
            })
            .collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// POST /prescriptions/{id}/approve
#[utoipa::path(
    post,
    path = "/prescriptions/{id}/approve",
    params(("id" = Uuid, Path, description = "Prescription UUID")),
    responses(
        (status = 200, description = "Prescription approved", body = PrescriptionResponse),
        (status = 403, description = "Caller is not a reviewer"),
        (status = 404, description = "Prescription not found"),
    ),
    tag = "prescriptions"
)]
pub async fn approve_prescription(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    review(state, identity, path.into_inner(), true).await
}

/// POST /prescriptions/{id}/reject
#[utoipa::path(
    post,
    path = "/prescriptions/{id}/reject",
    params(("id" = Uuid, Path, description = "Prescription UUID")),
    responses(
        (status = 200, description = "Prescription rejected", body = PrescriptionResponse),
        (status = 403, description = "Caller is not a reviewer"),
        (status = 404, description = "Prescription not found"),
    ),
    tag = "prescriptions"
)]
pub async fn reject_prescription(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    review(state, identity, path.into_inner(), false).await
}

async fn review(
    state: web::Data<AppState>,
    identity: Identity,
    id: Uuid,
    approve: bool,
) -> Result<HttpResponse, AppError> {
    identity.require(&[Role::HospitalAdmin, Role::Doctor])?;

    let prescriptions = state.prescriptions.clone();
    let prescription = web::block(move || prescriptions.review(identity.user_id, id, approve))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(json!({ "prescription": PrescriptionResponse::from(prescription) })))
}
