use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Invalid product: {product_id}")]
    InvalidProduct { product_id: Uuid },
    #[error("Invalid variant {variant_id} for product {product_id}")]
    InvalidVariant { product_id: Uuid, variant_id: Uuid },
    #[error("Prescription required and not approved for product '{title}'.")]
    PrescriptionRequired { product_id: Uuid, title: String },
    #[error("Insufficient stock for '{title}'.")]
    InsufficientStock { product_id: Uuid, title: String },
    #[error("{0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
