use std::sync::Arc;

use serde::Deserialize;

use crate::http_client::{HttpClient, HttpErrorKind, HttpRequest, ReqwestHttpClient};
use crate::lookup::{CepSource, LookupError, LookupFuture};
use crate::{CanonicalAddress, ProviderId};

const DEFAULT_BASE_URL: &str = "https://viacep.com.br";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 1_000;

/// Adapter for the ViaCEP endpoint (`/ws/{cep}/json/`).
#[derive(Clone)]
pub struct ViaCepAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    request_timeout_ms: u64,
}

impl ViaCepAdapter {
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
            "{}/ws/{}/json/",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(cep)
        )
    }
}

impl Default for ViaCepAdapter {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()))
    }
}

impl CepSource for ViaCepAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::ViaCep
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

            let payload: ViaCepPayload = serde_json::from_str(&response.body)
                .map_err(|e| LookupError::decode(format!("invalid viacep body: {e}")))?;

            // ViaCEP answers unknown postal codes with 200 and {"erro": true}.
            if payload.erro {
                return Err(LookupError::decode(
                    "viacep flagged the postal code as unknown",
                ));
            }

            CanonicalAddress::new(
                payload.cep,
                payload.logradouro,
                payload.bairro,
                payload.localidade,
                payload.uf,
                ProviderId::ViaCep,
            )
            .map_err(|e| LookupError::decode(format!("viacep body missing required field: {e}")))
        })
    }
}

/// ViaCEP wire schema. `complemento`, `ibge`, `gia`, `ddd` and `siafi` are
/// carried by the upstream but dropped during normalization.
#[derive(Debug, Clone, Deserialize)]
struct ViaCepPayload {
    #[serde(default)]
    cep: String,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    #[allow(dead_code)]
    complemento: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    #[serde(default)]
    erro: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_the_postal_code_into_the_path() {
        let adapter = ViaCepAdapter::default().with_base_url("https://viacep.test");
        assert_eq!(
            adapter.endpoint("01001000"),
            "https://viacep.test/ws/01001000/json/"
        );
    }

    #[test]
    fn wire_schema_decodes_the_erro_flag() {
        let payload: ViaCepPayload = serde_json::from_str(r#"{"erro": true}"#).expect("decodes");
        assert!(payload.erro);
        assert!(payload.localidade.is_empty());
    }
}
