use actix_web::{get, web, HttpResponse, Responder};
use tracing::warn;

use crate::store::Store;

/// Health check endpoint that verifies store connectivity
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Store reachable"),
        (status = 503, description = "Store unreachable")
    )
)]
#[get("/health")]
pub async fn health_check(store: web::Data<dyn Store>) -> impl Responder {
    match store.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "store": "connected"
        })),
        Err(e) => {
            warn!("Health check failed: {e}");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "store": "disconnected"
            }))
        }
    }
}
