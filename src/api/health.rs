use crate::utils::QueryCache;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: i64,
    /// Entradas no cache de buscas (ausente se o cache não estiver montado)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_cache_entries: Option<usize>,
}

/// Não consulta Sanity nem Duffel; só indica que o processo está de pé
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(cache: Option<web::Data<QueryCache>>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp(),
        lookup_cache_entries: cache.map(|c| c.stats().entries),
    })
}
