mod api;
mod config;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use services::{DuffelClient, SanityClient};
use utils::QueryCache;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn build_cors(allowed_origins: &[String]) -> Cors {
    let cors = if allowed_origins.iter().any(|o| o == "*") {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::ACCEPT,
            actix_web::http::header::CACHE_CONTROL,
        ])
        .expose_headers(vec![actix_web::http::header::CONTENT_TYPE])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = config::AppConfig::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("🚀 Starting Flight Search Service...");
    log::info!("🗂️  Sanity: {} (dataset {})", config.sanity.base_url(), config.sanity.dataset);
    log::info!("✈️  Duffel: {} ({})", config.duffel.api_url, config.duffel.api_version);
    log::info!(
        "📦 Lookup cache: {} entries, TTL {}s",
        config.cache.capacity,
        config.cache.ttl.as_secs()
    );

    let to_io = |e: utils::AppError| std::io::Error::new(std::io::ErrorKind::Other, e.to_string());

    let sanity = web::Data::new(SanityClient::new(&config.sanity, config.upstream_timeout).map_err(to_io)?);
    let duffel = web::Data::new(DuffelClient::new(&config.duffel, config.upstream_timeout).map_err(to_io)?);
    let cache = web::Data::new(QueryCache::new(config.cache.capacity, config.cache.ttl));

    let host = config.host.clone();
    let port = config.port;
    let allowed_origins = config.cors_allowed_origins.clone();

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(sanity.clone())
            .app_data(duffel.clone())
            .app_data(cache.clone())
            .wrap(build_cors(&allowed_origins))
            .wrap(middleware::RequestMetrics)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi),
            )
            .configure(api::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
