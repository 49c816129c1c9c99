use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::database::Database;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub database: String,
    pub timestamp: i64,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service status, including database reachability", body = HealthResponse)
    )
)]
pub async fn health_check(db: web::Data<Database>) -> impl Responder {
    // Ping no banco; o endpoint responde 200 mesmo com o banco fora
    let database = match sqlx::query("SELECT 1").execute(db.pool()).await {
        Ok(_) => "up".to_string(),
        Err(e) => {
            log::warn!("⚠️ Health check: database unreachable: {}", e);
            "down".to_string()
        }
    };

    let status = if database == "up" { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        service: "post-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        timestamp: chrono::Utc::now().timestamp(),
    })
}
