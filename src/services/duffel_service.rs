use crate::config::DuffelConfig;
use crate::models::{DataEnvelope, OfferRequestCreated, OfferRequestPayload, Slice};
use crate::utils::AppError;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Tamanho de página usado ao listar ofertas
pub const OFFERS_PAGE_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
struct DuffelErrorMeta {
    status: u16,
}

/// Formato documentado de erro da API: `{ "meta": { "status" }, "errors": [...] }`
#[derive(Debug, Deserialize)]
struct DuffelErrorBody {
    meta: DuffelErrorMeta,
    #[serde(default)]
    errors: Vec<Value>,
}

/// Parâmetros de `GET /air/offers`; `after` só entra quando presente
pub fn offers_list_params(offer_request_id: &str, after: Option<&str>) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("offer_request_id", offer_request_id.to_string()),
        ("limit", OFFERS_PAGE_LIMIT.to_string()),
    ];

    if let Some(after) = after.filter(|a| !a.is_empty()) {
        params.push(("after", after.to_string()));
    }

    params
}

pub struct DuffelClient {
    http: reqwest::Client,
    api_url: String,
    access_token: String,
    api_version: String,
}

impl DuffelClient {
    pub fn new(config: &DuffelConfig, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build Duffel HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            api_version: config.api_version.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.api_url, path))
            .bearer_auth(&self.access_token)
            .header("Duffel-Version", &self.api_version)
            .header("Accept", "application/json")
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, AppError> {
        let response = builder
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to reach Duffel: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(|e| {
                AppError::Internal(format!("Duffel API error {} (failed to read body: {})", status, e))
            })?;

            return Err(match serde_json::from_str::<DuffelErrorBody>(&body) {
                Ok(parsed) => AppError::Upstream {
                    status: parsed.meta.status,
                    errors: parsed.errors,
                },
                Err(_) => AppError::Internal(format!("Duffel API error {}: {}", status, body)),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to parse Duffel response: {}", e)))
    }

    /// Cria o offer request sem ofertas embutidas e devolve o id
    pub async fn create_offer_request(
        &self,
        slices: &[Slice],
        passengers: &[Value],
        cabin_class: Option<&str>,
    ) -> Result<String, AppError> {
        let body = DataEnvelope {
            data: OfferRequestPayload {
                slices,
                passengers,
                cabin_class,
            },
        };

        let builder = self
            .request(Method::POST, "/air/offer_requests")
            .query(&[("return_offers", "false")])
            .json(&body);

        let created: DataEnvelope<OfferRequestCreated> = self.send(builder).await?;
        log::info!("✈️  Offer request created: {}", created.data.id);

        Ok(created.data.id)
    }

    /// Lista uma página de ofertas; devolve o payload completo (`data` + `meta`)
    pub async fn list_offers(&self, offer_request_id: &str, after: Option<&str>) -> Result<Value, AppError> {
        let builder = self
            .request(Method::GET, "/air/offers")
            .query(&offers_list_params(offer_request_id, after));

        self.send(builder).await
    }

    /// Busca uma oferta com os serviços disponíveis (bagagem, assentos, ...)
    pub async fn get_offer(&self, offer_id: &str) -> Result<Value, AppError> {
        let path = format!("/air/offers/{}", urlencoding::encode(offer_id));
        let builder = self
            .request(Method::GET, &path)
            .query(&[("return_available_services", "true")]);

        let offer: DataEnvelope<Value> = self.send(builder).await?;
        Ok(offer.data)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub(crate) fn client_for(server: &MockServer) -> DuffelClient {
        let config = DuffelConfig {
            api_url: server.uri(),
            access_token: "duffel_test_token".to_string(),
            api_version: "v2".to_string(),
        };
        DuffelClient::new(&config, Duration::from_secs(5)).unwrap()
    }

    fn lhr_jfk() -> Vec<Slice> {
        vec![Slice {
            origin: "LHR".into(),
            destination: "JFK".into(),
            departure_date: "2026-12-01".into(),
        }]
    }

    #[test]
    fn test_list_params_without_cursor() {
        let params = offers_list_params("orq_123", None);
        assert_eq!(
            params,
            vec![("offer_request_id", "orq_123".to_string()), ("limit", "50".to_string())]
        );
        assert_eq!(offers_list_params("orq_123", Some("")).len(), 2);
    }

    #[test]
    fn test_list_params_with_cursor() {
        let params = offers_list_params("orq_123", Some("g2wAAAAC"));
        assert_eq!(params.last(), Some(&("after", "g2wAAAAC".to_string())));
    }

    #[tokio::test]
    async fn test_create_offer_request_sends_headers_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/air/offer_requests"))
            .and(query_param("return_offers", "false"))
            .and(header("Authorization", "Bearer duffel_test_token"))
            .and(header("Duffel-Version", "v2"))
            .and(body_partial_json(serde_json::json!({
                "data": {
                    "slices": [{ "origin": "LHR", "destination": "JFK", "departure_date": "2026-12-01" }],
                    "cabin_class": "business"
                }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": { "id": "orq_0000AbC", "slices": [] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let passengers = vec![serde_json::json!({ "type": "adult" })];
        let id = client_for(&server)
            .create_offer_request(&lhr_jfk(), &passengers, Some("business"))
            .await
            .unwrap();

        assert_eq!(id, "orq_0000AbC");
    }

    #[tokio::test]
    async fn test_list_offers_omits_missing_cursor() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/air/offers"))
            .and(query_param("offer_request_id", "orq_1"))
            .and(query_param("limit", "50"))
            .and(query_param_is_missing("after"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "id": "off_1" }],
                "meta": { "after": "next", "before": null, "limit": 50 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server).list_offers("orq_1", None).await.unwrap();
        assert_eq!(page["meta"]["after"], "next");
    }

    #[tokio::test]
    async fn test_error_body_is_surfaced_as_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/air/offers/off_expired"))
            .and(query_param("return_available_services", "true"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "meta": { "status": 404, "request_id": "FZW0H3HdJwKk5HMAAKxB" },
                "errors": [{ "code": "not_found", "title": "Not found", "type": "invalid_request_error" }]
            })))
            .mount(&server)
            .await;

        match client_for(&server).get_offer("off_expired").await {
            Err(AppError::Upstream { status, errors }) => {
                assert_eq!(status, 404);
                assert_eq!(errors[0]["code"], "not_found");
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unrecognized_error_body_is_internal() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        match client_for(&server).get_offer("off_1").await {
            Err(AppError::Internal(msg)) => {
                assert!(msg.contains("502"), "status missing from '{}'", msg);
                assert!(msg.contains("Bad Gateway"), "body missing from '{}'", msg);
            }
            other => panic!("expected internal error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_offer_unwraps_data() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/air/offers/off_42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "id": "off_42", "available_services": [] }
            })))
            .mount(&server)
            .await;

        let offer = client_for(&server).get_offer("off_42").await.unwrap();
        assert_eq!(offer["id"], "off_42");
    }
}
