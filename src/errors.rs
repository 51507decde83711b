use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

fn domain_response(e: &DomainError) -> HttpResponse {
    match e {
        DomainError::NotFound(_) => HttpResponse::NotFound().json(json!({
            "message": e.to_string()
        })),
        DomainError::InvalidProduct { product_id } => HttpResponse::BadRequest().json(json!({
            "message": e.to_string(),
            "code": "INVALID_PRODUCT",
            "productId": product_id,
        })),
        DomainError::InvalidVariant { product_id, .. } => HttpResponse::BadRequest().json(json!({
            "message": e.to_string(),
            "code": "INVALID_VARIANT",
            "productId": product_id,
        })),
        DomainError::PrescriptionRequired { product_id, .. } => {
            HttpResponse::BadRequest().json(json!({
                "message": e.to_string(),
                "code": "PRESCRIPTION_REQUIRED",
                "productId": product_id,
            }))
        }
        DomainError::InsufficientStock { product_id, .. } => {
            HttpResponse::BadRequest().json(json!({
                "message": e.to_string(),
                "code": "INSUFFICIENT_STOCK",
                "productId": product_id,
            }))
        }
        DomainError::Conflict(_) => HttpResponse::Conflict().json(json!({
            "message": e.to_string()
        })),
        DomainError::InvalidInput(_) => HttpResponse::BadRequest().json(json!({
            "message": e.to_string()
        })),
        DomainError::Internal(detail) => {
            log::error!("Internal error: {detail}");
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal server error"
            }))
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(errors) => HttpResponse::BadRequest().json(json!({
                "message": "Validation error",
                "errors": errors,
            })),
            AppError::Domain(e) => domain_response(e),
            AppError::Unauthorized(message) => HttpResponse::Unauthorized().json(json!({
                "message": message
            })),
            AppError::Forbidden => HttpResponse::Forbidden().json(json!({
                "message": "Forbidden"
            })),
            AppError::Internal(detail) => {
                log::error!("Internal error: {detail}");
                HttpResponse::InternalServerError().json(json!({
                    "message": "Internal server error"
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn not_found_returns_404() {
        let err: AppError = DomainError::NotFound("Order").into();
        assert_eq!(err.error_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn domain_rule_violations_return_400() {
        let product_id = Uuid::new_v4();
        for err in [
            DomainError::InvalidProduct { product_id },
            DomainError::PrescriptionRequired {
                product_id,
                title: "Ventilator".to_string(),
            },
            DomainError::InsufficientStock {
                product_id,
                title: "Ventilator".to_string(),
            },
            DomainError::InvalidInput("bad".to_string()),
        ] {
            let app_err: AppError = err.into();
            assert_eq!(app_err.error_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn conflict_returns_409() {
        let err: AppError = DomainError::Conflict("User already exists".to_string()).into();
        assert_eq!(err.error_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn internal_error_returns_500_with_generic_body() {
        let err = AppError::Internal("pool exhausted".to_string());
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unauthorized_and_forbidden_map_to_401_and_403() {
        let unauthorized = AppError::Unauthorized("No identity provided".to_string());
        assert_eq!(
            unauthorized.error_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Forbidden.error_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn prescription_required_display_names_the_product() {
        let err = DomainError::PrescriptionRequired {
            product_id: Uuid::new_v4(),
            title: "Home ventilator".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Prescription required and not approved for product 'Home ventilator'."
        );
    }
}
