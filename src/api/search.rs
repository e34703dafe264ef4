use crate::models::{SearchRequest, SearchResponse, Slice};
use crate::services::duffel_service::DuffelClient;
use crate::utils::AppError;
use actix_web::{web, HttpResponse};
use serde_json::Value;

/// Cria o offer request e lista a primeira página (ou a página após o cursor)
async fn find_offers(
    duffel: &DuffelClient,
    request: &SearchRequest,
    slices: &[Slice],
) -> Result<Value, AppError> {
    let offer_request_id = duffel
        .create_offer_request(slices, &request.passengers, request.cabin_class.as_deref())
        .await?;

    duffel.list_offers(&offer_request_id, request.cursor()).await
}

#[utoipa::path(
    post,
    path = "/search",
    tag = "Offers",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "One page of offers for the itinerary", body = SearchResponse),
        (status = 422, description = "Outbound origin, destination or date missing"),
        (status = 500, description = "Server error")
    )
)]
pub async fn search_offers(
    body: web::Json<SearchRequest>,
    duffel: web::Data<DuffelClient>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔎 POST /search - body: {:?}", body);

    let slices = body.slices().map_err(|msg| {
        log::warn!("⚠️  Rejected search: {}", msg);
        AppError::Validation(msg)
    })?;

    match find_offers(&duffel, &body, &slices).await {
        Ok(results) => {
            let count = results["data"].as_array().map(Vec::len).unwrap_or(0);
            log::info!("✅ After: {}", results["meta"]["after"]);
            log::info!("✅ Results: {}", count);
            Ok(HttpResponse::Ok().json(SearchResponse { results }))
        }
        Err(e) => {
            log::error!("❌ Offer search failed: {}", e);
            Err(e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/book/itinerary/{id}",
    tag = "Offers",
    params(
        ("id" = String, Path, description = "Offer identifier")
    ),
    responses(
        (status = 200, description = "Offer with available services expanded"),
        (status = 500, description = "Server error")
    )
)]
pub async fn get_itinerary(
    path: web::Path<String>,
    duffel: web::Data<DuffelClient>,
) -> Result<HttpResponse, AppError> {
    let offer_id = path.into_inner();
    log::info!("🧾 GET /book/itinerary/{}", offer_id);

    match duffel.get_offer(&offer_id).await {
        Ok(offer) => {
            log::info!("✅ Itinerary retrieved for {}", offer_id);
            log::debug!("{}", offer);
            Ok(HttpResponse::Ok().json(offer))
        }
        Err(e) => {
            log::error!("❌ Error fetching itinerary {}: {}", offer_id, e);
            Err(e)
        }
    }
}
