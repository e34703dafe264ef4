pub mod health;
pub mod metrics;
pub mod places;
pub mod search;
pub mod swagger;

use crate::utils::AppError;
use actix_web::web;

/// Corpo JSON inválido ou ausente vira 422 no formato `{error}`
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::warn!("⚠️  Rejected JSON body: {}", err);
        AppError::Validation(err.to_string()).into()
    })
}

/// Tabela de rotas compartilhada entre o servidor e os testes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Metrics
        .route("/metrics", web::get().to(metrics::get_metrics))
        // ==================== CMS LOOKUPS (Sanity) ====================
        .route("/airports", web::get().to(places::get_airports))
        .route("/airlines", web::get().to(places::get_airlines))
        // ==================== OFFERS (Duffel) ====================
        .route("/search", web::post().to(search::search_offers))
        .route("/book/itinerary/{id}", web::get().to(search::get_itinerary));
}
