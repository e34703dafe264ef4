use crate::services::sanity_service::{LookupKind, SanityClient};
use crate::utils::{normalize_query, AppError, QueryCache};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LookupQuery {
    /// Texto livre; casa por prefixo com nome, cidade ou código IATA
    #[serde(default)]
    pub q: Option<String>,
}

/// Consulta o CMS passando pelo cache; resultado vazio vira 404 e não é cacheado
async fn cached_lookup(
    kind: LookupKind,
    q: &str,
    sanity: &SanityClient,
    cache: &QueryCache,
) -> Result<Value, AppError> {
    if let Some(cached) = cache.get(kind.namespace(), q) {
        return Ok(cached);
    }

    let results = sanity.fetch(&kind.build_query(q)).await?;

    let empty = match &results {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    };
    if empty {
        return Err(AppError::NotFound("No matching results found".to_string()));
    }

    cache.insert(kind.namespace(), q, results.clone());
    Ok(results)
}

async fn respond(
    kind: LookupKind,
    query: web::Query<LookupQuery>,
    sanity: web::Data<SanityClient>,
    cache: web::Data<QueryCache>,
) -> Result<HttpResponse, AppError> {
    let q = normalize_query(query.q.as_deref().unwrap_or_default());

    match cached_lookup(kind, &q, &sanity, &cache).await {
        Ok(results) => {
            let count = results.as_array().map(Vec::len).unwrap_or(1);
            log::info!("✅ {} lookup '{}': {} results", kind.namespace(), q, count);
            Ok(HttpResponse::Ok().json(results))
        }
        Err(AppError::NotFound(msg)) => {
            log::info!("🔍 {} lookup '{}': no matches", kind.namespace(), q);
            Err(AppError::NotFound(msg))
        }
        Err(e) => {
            log::error!("❌ Error fetching {} from Sanity: {}", kind.namespace(), e);
            Err(e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/airports",
    tag = "Places",
    params(LookupQuery),
    responses(
        (status = 200, description = "Matching airport and city records"),
        (status = 404, description = "No matching results found"),
        (status = 500, description = "CMS or server error")
    )
)]
pub async fn get_airports(
    query: web::Query<LookupQuery>,
    sanity: web::Data<SanityClient>,
    cache: web::Data<QueryCache>,
) -> Result<HttpResponse, AppError> {
    log::info!("🛫 GET /airports?q={}", query.q.as_deref().unwrap_or_default());
    respond(LookupKind::Airports, query, sanity, cache).await
}

#[utoipa::path(
    get,
    path = "/airlines",
    tag = "Places",
    params(LookupQuery),
    responses(
        (status = 200, description = "Matching airlines with a frequent flyer program"),
        (status = 404, description = "No matching results found"),
        (status = 500, description = "CMS or server error")
    )
)]
pub async fn get_airlines(
    query: web::Query<LookupQuery>,
    sanity: web::Data<SanityClient>,
    cache: web::Data<QueryCache>,
) -> Result<HttpResponse, AppError> {
    log::info!("🏷️  GET /airlines?q={}", query.q.as_deref().unwrap_or_default());
    respond(LookupKind::Airlines, query, sanity, cache).await
}
