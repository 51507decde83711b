pub mod categories;
pub mod orders;
pub mod prescriptions;
pub mod products;
pub mod users;

use actix_web::HttpResponse;

/// GET /health
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub(crate) fn default_page() -> i64 {
    1
}

pub(crate) fn default_limit() -> i64 {
    20
}
