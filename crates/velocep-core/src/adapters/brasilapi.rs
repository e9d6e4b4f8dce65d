use std::sync::Arc;

use serde::Deserialize;

use crate::http_client::{HttpClient, HttpErrorKind, HttpRequest, ReqwestHttpClient};
use crate::lookup::{CepSource, LookupError, LookupFuture};
use crate::{CanonicalAddress, ProviderId};

const DEFAULT_BASE_URL: &str = "https://brasilapi.com.br";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 1_000;

/// Adapter for the BrasilAPI CEP endpoint (`/api/cep/v1/{cep}`).
#[derive(Clone)]
pub struct BrasilApiAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    request_timeout_ms: u64,
}

impl BrasilApiAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(DEFAULT_BASE_URL),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }

    /// Point the adapter at a different host, e.g. a local test server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    fn endpoint(&self, cep: &str) -> String {
        format!(
            "{}/api/cep/v1/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(cep)
        )
    }
}

impl Default for BrasilApiAdapter {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()))
    }
}

impl CepSource for BrasilApiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::BrasilApi
    }

    fn lookup<'a>(&'a self, cep: &'a str) -> LookupFuture<'a> {
        Box::pin(async move {
            let request =
                HttpRequest::get(self.endpoint(cep)).with_timeout_ms(self.request_timeout_ms);

            let response = self.http_client.execute(request).await.map_err(|error| {
                match error.kind() {
                    HttpErrorKind::Transport => LookupError::transport(error.message()),
                    HttpErrorKind::BodyRead => LookupError::body_read(error.message()),
                }
            })?;

            if !response.is_success() {
                return Err(LookupError::upstream_status(response.status));
            }

            let payload: BrasilApiPayload = serde_json::from_str(&response.body)
                .map_err(|e| LookupError::decode(format!("invalid brasilapi body: {e}")))?;

            CanonicalAddress::new(
                payload.cep,
                payload.street,
                payload.neighborhood,
                payload.city,
                payload.state,
                ProviderId::BrasilApi,
            )
            .map_err(|e| LookupError::decode(format!("brasilapi body missing required field: {e}")))
        })
    }
}

/// BrasilAPI wire schema. `service` names the backing resolver BrasilAPI
/// itself raced; it is dropped during normalization.
#[derive(Debug, Clone, Deserialize)]
struct BrasilApiPayload {
    #[serde(default)]
    cep: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    neighborhood: String,
    #[serde(default)]
    street: String,
    #[serde(default)]
    #[allow(dead_code)]
    service: String,
}
