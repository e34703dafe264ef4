use crate::utils::QueryCache;
use actix_web::{web, HttpResponse};
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Prometheus text metrics", body = String, content_type = "text/plain")
    )
)]
pub async fn get_metrics(cache: Option<web::Data<QueryCache>>) -> HttpResponse {
    let requests = REQUEST_COUNT.load(Ordering::Relaxed);
    let errors = ERROR_COUNT.load(Ordering::Relaxed);

    let mut metrics = format!(
        "# HELP http_requests_total Total number of HTTP requests\n\
         # TYPE http_requests_total counter\n\
         http_requests_total {}\n\
         \n\
         # HELP http_errors_total Total number of HTTP responses with status >= 400\n\
         # TYPE http_errors_total counter\n\
         http_errors_total {}\n",
        requests, errors
    );

    if let Some(cache) = cache {
        let stats = cache.stats();
        metrics.push_str(&format!(
            "\n\
             # HELP lookup_cache_hits_total Lookups served from the in-memory cache\n\
             # TYPE lookup_cache_hits_total counter\n\
             lookup_cache_hits_total {}\n\
             \n\
             # HELP lookup_cache_misses_total Lookups that went to the CMS\n\
             # TYPE lookup_cache_misses_total counter\n\
             lookup_cache_misses_total {}\n\
             \n\
             # HELP lookup_cache_entries Entries currently cached\n\
             # TYPE lookup_cache_entries gauge\n\
             lookup_cache_entries {}\n",
            stats.hits, stats.misses, stats.entries
        ));
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use std::time::Duration;

    #[actix_rt::test]
    async fn test_metrics_include_cache_stats() {
        let cache = web::Data::new(QueryCache::new(10, Duration::from_secs(60)));
        cache.insert("airports", "lhr", serde_json::json!([1]));
        let _ = cache.get("airports", "lhr");
        let _ = cache.get("airports", "jfk");

        let app = test::init_service(App::new().app_data(cache).configure(crate::api::configure)).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/metrics").to_request()).await;
        assert!(res.status().is_success());

        let body = test::read_body(res).await;
        let text = std::str::from_utf8(&body).unwrap();
        assert!(text.contains("http_requests_total"));
        assert!(text.contains("lookup_cache_hits_total 1"));
        assert!(text.contains("lookup_cache_misses_total 1"));
        assert!(text.contains("lookup_cache_entries 1"));
    }
}
