use crate::config::SanityConfig;
use crate::utils::AppError;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Tipo de busca no CMS; também serve de namespace no cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Airports,
    Airlines,
}

impl LookupKind {
    pub fn namespace(&self) -> &'static str {
        match self {
            LookupKind::Airports => "airports",
            LookupKind::Airlines => "airlines",
        }
    }

    /// Monta a consulta GROQ de prefixo para o texto já normalizado
    pub fn build_query(&self, q: &str) -> String {
        let q = escape_groq_string(q);
        match self {
            LookupKind::Airports => format!(
                r#"*[_type in ["airport", "city"] && (name match "{q}*" || city_name match "{q}*" || iata_code match "{q}*")]"#
            ),
            LookupKind::Airlines => format!(
                r#"*[_type in ["airline"] && (name match "{q}*" || frequent_flyer_program.program_name match "{q}*" || iata_code match "{q}*") && defined(frequent_flyer_program.program_name)]"#
            ),
        }
    }
}

/// Escapa o texto interpolado dentro de uma string GROQ entre aspas
pub fn escape_groq_string(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' | '\r' | '\t' => escaped.push(' '),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Debug, Deserialize)]
struct SanityQueryResponse {
    #[serde(default)]
    result: Value,
}

/// Cliente somente-leitura da API de consultas do Sanity
pub struct SanityClient {
    http: reqwest::Client,
    base_url: String,
    dataset: String,
    api_version: String,
}

impl SanityClient {
    pub fn new(config: &SanityConfig, timeout: Duration) -> Result<Self, AppError> {
        Self::with_base_url(&config.base_url(), &config.dataset, &config.api_version, timeout)
    }

    pub fn with_base_url(
        base_url: &str,
        dataset: &str,
        api_version: &str,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build Sanity HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            dataset: dataset.to_string(),
            api_version: api_version.trim_start_matches('v').to_string(),
        })
    }

    fn query_url(&self, query: &str) -> String {
        format!(
            "{}/v{}/data/query/{}?query={}",
            self.base_url,
            self.api_version,
            self.dataset,
            urlencoding::encode(query)
        )
    }

    /// Executa uma consulta GROQ e devolve o campo `result`
    pub async fn fetch(&self, query: &str) -> Result<Value, AppError> {
        log::debug!("🗂️  Sanity query: {}", query);

        let response = self
            .http
            .get(self.query_url(query))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to reach Sanity: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Sanity(format!("Sanity API error: {}", response.status())));
        }

        let body: SanityQueryResponse = response
            .json()
            .await
            .map_err(|e| AppError::Sanity(format!("Failed to parse Sanity response: {}", e)))?;

        Ok(body.result)
    }
}
