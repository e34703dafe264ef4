use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// `null` e ausência viram lista vazia
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Um trecho como chega do cliente; campos opcionais para validar com 422
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SliceInput {
    pub origin: Option<String>,
    pub destination: Option<String>,
    /// Data de partida (YYYY-MM-DD)
    pub date: Option<String>,
}

impl SliceInput {
    /// Devolve o trecho da API somente se todos os campos vierem preenchidos
    pub fn to_slice(&self) -> Option<Slice> {
        let filled = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        Some(Slice {
            origin: filled(&self.origin)?,
            destination: filled(&self.destination)?,
            departure_date: filled(&self.date)?,
        })
    }
}

/// Trecho no formato da API de ofertas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Slice {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SearchRequest {
    pub outbound: Option<SliceInput>,
    #[serde(default)]
    pub inbound: Option<SliceInput>,
    /// Classe de cabine repassada sem alteração (economy, business, ...)
    #[serde(default)]
    pub cabin_class: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schema(value_type = Vec<Object>)]
    pub passengers: Vec<Value>,
    /// Cursor de paginação devolvido em `results.meta.after`
    #[serde(default)]
    pub after: Option<String>,
}

impl SearchRequest {
    /// Monta os trechos: ida obrigatória, volta apenas se completa
    pub fn slices(&self) -> Result<Vec<Slice>, String> {
        let outbound = self
            .outbound
            .as_ref()
            .ok_or_else(|| "outbound is required".to_string())?
            .to_slice()
            .ok_or_else(|| "outbound requires origin, destination and date".to_string())?;

        let mut slices = vec![outbound];
        if let Some(inbound) = self.inbound.as_ref().and_then(SliceInput::to_slice) {
            slices.push(inbound);
        }

        Ok(slices)
    }

    pub fn cursor(&self) -> Option<&str> {
        self.after.as_deref().filter(|a| !a.is_empty())
    }
}

/// Corpo enviado para `POST /air/offer_requests`
#[derive(Debug, Serialize)]
pub struct OfferRequestPayload<'a> {
    pub slices: &'a [Slice],
    pub passengers: &'a [Value],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cabin_class: Option<&'a str>,
}

/// Envelope `{ "data": ... }` usado pela API de ofertas
#[derive(Debug, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct OfferRequestCreated {
    pub id: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SearchResponse {
    /// Página de ofertas como devolvida pela API (`data` + `meta`)
    #[schema(value_type = Object)]
    pub results: Value,
}
