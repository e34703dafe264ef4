use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Flight Search Service API",
        version = "1.0.0",
        description = "Backend for flight search.\n\n**Features:**\n- Airport, city and airline lookup (Sanity CMS)\n- Flight offer search with pagination (Duffel)\n- Itinerary retrieval with available services\n- Health monitoring and metrics"
    ),
    paths(
        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Places
        crate::api::places::get_airports,
        crate::api::places::get_airlines,

        // Offers
        crate::api::search::search_offers,
        crate::api::search::get_itinerary,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::models::SearchRequest,
            crate::models::SliceInput,
            crate::models::SearchResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check and system metrics endpoints for monitoring service status."),
        (name = "Places", description = "Prefix lookup of airports, cities and airlines. Results are cached in memory."),
        (name = "Offers", description = "Flight offer search and itinerary retrieval, relayed from the flight API."),
    )
)]
pub struct ApiDoc;
