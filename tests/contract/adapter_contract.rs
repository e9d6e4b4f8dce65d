//! Contract tests for the provider adapters: exact field mapping, failure
//! taxonomy, and request shaping, all against scripted HTTP transports.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use velocep_core::{
    BrasilApiAdapter, CepSource, HttpClient, HttpError, HttpRequest, HttpResponse,
    LookupErrorKind, ProviderId, ViaCepAdapter,
};

#[derive(Debug)]
struct ScriptedHttpClient {
    response: Result<HttpResponse, HttpError>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    fn with_body(body: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(HttpResponse::ok_json(body)),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn with_status(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(HttpResponse {
                status,
                body: body.to_owned(),
            }),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn with_error(error: HttpError) -> Arc<Self> {
        Arc::new(Self {
            response: Err(error),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn recorded_requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);
        let response = self.response.clone();
        Box::pin(async move { response })
    }
}

const BRASILAPI_BODY: &str = r#"{"cep":"01001000","state":"SP","city":"São Paulo","neighborhood":"Sé","street":"Praça da Sé","service":"x"}"#;

const VIACEP_BODY: &str = r#"{"cep":"01001-000","logradouro":"Praça da Sé","complemento":"lado ímpar","bairro":"Sé","localidade":"São Paulo","uf":"SP"}"#;

#[tokio::test]
async fn brasilapi_maps_fields_into_the_canonical_record() {
    let client = ScriptedHttpClient::with_body(BRASILAPI_BODY);
    let adapter = BrasilApiAdapter::new(client.clone());

    let address = adapter.lookup("01001000").await.expect("lookup succeeds");

    assert_eq!(address.cep, "01001000");
    assert_eq!(address.street, "Praça da Sé");
    assert_eq!(address.neighborhood, "Sé");
    assert_eq!(address.city, "São Paulo");
    assert_eq!(address.state, "SP");
    assert_eq!(address.source, ProviderId::BrasilApi);

    let requests = client.recorded_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url,
        "https://brasilapi.com.br/api/cep/v1/01001000"
    );
}

#[tokio::test]
async fn viacep_maps_fields_into_the_canonical_record() {
    let client = ScriptedHttpClient::with_body(VIACEP_BODY);
    let adapter = ViaCepAdapter::new(client.clone());

    let address = adapter.lookup("01001000").await.expect("lookup succeeds");

    assert_eq!(address.cep, "01001-000");
    assert_eq!(address.street, "Praça da Sé");
    assert_eq!(address.neighborhood, "Sé");
    assert_eq!(address.city, "São Paulo");
    assert_eq!(address.state, "SP");
    assert_eq!(address.source, ProviderId::ViaCep);

    let requests = client.recorded_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "https://viacep.com.br/ws/01001000/json/");
}

#[tokio::test]
async fn per_request_timeout_is_propagated_to_the_transport() {
    let client = ScriptedHttpClient::with_body(BRASILAPI_BODY);
    let adapter = BrasilApiAdapter::new(client.clone()).with_request_timeout_ms(250);

    adapter.lookup("01001000").await.expect("lookup succeeds");

    assert_eq!(client.recorded_requests()[0].timeout_ms, 250);
}

#[tokio::test]
async fn malformed_json_is_a_decode_failure() {
    for adapter in adapters_with_body("{not json") {
        let error = adapter.lookup("01001000").await.expect_err("must fail");
        assert_eq!(
            error.kind(),
            LookupErrorKind::Decode,
            "provider '{}'",
            adapter.id()
        );
    }
}

#[tokio::test]
async fn non_success_status_is_an_upstream_status_failure() {
    let client = ScriptedHttpClient::with_status(500, "internal server error");
    let adapter = BrasilApiAdapter::new(client);

    let error = adapter.lookup("01001000").await.expect_err("must fail");
    assert_eq!(error.kind(), LookupErrorKind::UpstreamStatus);
    assert!(error.message().contains("500"));
}

#[tokio::test]
async fn connection_failure_is_a_transport_failure() {
    let client = ScriptedHttpClient::with_error(HttpError::transport("connection refused"));
    let adapter = ViaCepAdapter::new(client);

    let error = adapter.lookup("01001000").await.expect_err("must fail");
    assert_eq!(error.kind(), LookupErrorKind::Transport);
}

#[tokio::test]
async fn truncated_body_is_a_body_read_failure() {
    let client = ScriptedHttpClient::with_error(HttpError::body_read("connection reset mid-body"));
    let adapter = BrasilApiAdapter::new(client);

    let error = adapter.lookup("01001000").await.expect_err("must fail");
    assert_eq!(error.kind(), LookupErrorKind::BodyRead);
}

#[tokio::test]
async fn viacep_erro_body_is_a_decode_failure() {
    let client = ScriptedHttpClient::with_body(r#"{"erro": true}"#);
    let adapter = ViaCepAdapter::new(client);

    let error = adapter.lookup("99999999").await.expect_err("must fail");
    assert_eq!(error.kind(), LookupErrorKind::Decode);
    assert!(error.message().contains("unknown"));
}

#[tokio::test]
async fn body_missing_required_fields_is_a_decode_failure() {
    let client = ScriptedHttpClient::with_body(r#"{"cep":"01001000","state":"SP"}"#);
    let adapter = BrasilApiAdapter::new(client);

    let error = adapter.lookup("01001000").await.expect_err("must fail");
    assert_eq!(error.kind(), LookupErrorKind::Decode);
}

fn adapters_with_body(body: &str) -> Vec<Arc<dyn CepSource>> {
    vec![
        Arc::new(BrasilApiAdapter::new(ScriptedHttpClient::with_body(body))),
        Arc::new(ViaCepAdapter::new(ScriptedHttpClient::with_body(body))),
    ]
}
