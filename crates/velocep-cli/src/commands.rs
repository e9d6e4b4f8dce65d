use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use velocep_core::{
    BrasilApiAdapter, CanonicalAddress, CepSource, Envelope, EnvelopeError, EnvelopeMeta,
    HttpClient, ProviderId, RaceCoordinator, RaceOutcome, ReqwestHttpClient, ViaCepAdapter,
};

use crate::cli::{Cli, SourceSelector};
use crate::error::CliError;

/// Race-level envelope error codes, shared with exit-code mapping.
pub const CODE_RACE_ALL_FAILED: &str = "race.all_failed";
pub const CODE_RACE_TIMED_OUT: &str = "race.timed_out";

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum LookupResponseData {
    Winner { address: CanonicalAddress },
    AllFailed,
    TimedOut { deadline_ms: u64 },
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let sources = build_sources(cli.source, cli.request_timeout_ms, http_client);

    let coordinator = RaceCoordinator::new(sources, cli.deadline_ms)?;
    let providers = coordinator.providers();
    let request_id = Uuid::new_v4().to_string();

    let outcome = coordinator.run(cli.cep.trim()).await;
    fold_outcome(request_id, providers, outcome)
}

/// Fold one race outcome into the response envelope: the winning record on
/// success, per-provider failures plus an aggregate `race.all_failed` error,
/// or a `race.timed_out` error.
fn fold_outcome(
    request_id: String,
    providers: Vec<ProviderId>,
    outcome: RaceOutcome,
) -> Result<Envelope<Value>, CliError> {
    let single_entrant = providers.len() == 1;

    let mut envelope = match outcome {
        RaceOutcome::Winner {
            address,
            latency_ms,
            ..
        } => {
            let meta = EnvelopeMeta::new(request_id, providers, latency_ms);
            let data = serde_json::to_value(LookupResponseData::Winner { address })?;
            Envelope::success(meta, data)
        }
        RaceOutcome::AllFailed {
            failures,
            latency_ms,
        } => {
            let meta = EnvelopeMeta::new(request_id, providers, latency_ms);
            let mut errors = vec![EnvelopeError::new(
                CODE_RACE_ALL_FAILED,
                format!("all {} provider(s) failed", failures.len()),
            )];
            errors.extend(failures.into_iter().map(|failure| {
                EnvelopeError::new(failure.error.code(), failure.error.message())
                    .with_source(failure.provider)
            }));
            let data = serde_json::to_value(LookupResponseData::AllFailed)?;
            Envelope::with_errors(meta, data, errors)
        }
        RaceOutcome::TimedOut { deadline_ms } => {
            let meta = EnvelopeMeta::new(request_id, providers, deadline_ms);
            let errors = vec![EnvelopeError::new(
                CODE_RACE_TIMED_OUT,
                format!("no provider answered within {deadline_ms}ms"),
            )];
            let data = serde_json::to_value(LookupResponseData::TimedOut { deadline_ms })?;
            Envelope::with_errors(meta, data, errors)
        }
    };

    if single_entrant {
        envelope
            .meta
            .push_warning("single-provider race: no fallback candidate");
    }

    Ok(envelope)
}

fn build_sources(
    selector: SourceSelector,
    request_timeout_ms: u64,
    http_client: Arc<dyn HttpClient>,
) -> Vec<Arc<dyn CepSource>> {
    let brasilapi = || -> Arc<dyn CepSource> {
        Arc::new(
            BrasilApiAdapter::new(http_client.clone()).with_request_timeout_ms(request_timeout_ms),
        )
    };
    let viacep = || -> Arc<dyn CepSource> {
        Arc::new(
            ViaCepAdapter::new(http_client.clone()).with_request_timeout_ms(request_timeout_ms),
        )
    };

    match selector {
        SourceSelector::Auto => vec![brasilapi(), viacep()],
        SourceSelector::Brasilapi => vec![brasilapi()],
        SourceSelector::Viacep => vec![viacep()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use velocep_core::{LookupError, LookupFailure};

    fn both_providers() -> Vec<ProviderId> {
        vec![ProviderId::BrasilApi, ProviderId::ViaCep]
    }

    #[test]
    fn all_failed_envelope_carries_aggregate_and_per_provider_codes() {
        let outcome = RaceOutcome::AllFailed {
            failures: vec![
                LookupFailure {
                    provider: ProviderId::BrasilApi,
                    error: LookupError::upstream_status(503),
                },
                LookupFailure {
                    provider: ProviderId::ViaCep,
                    error: LookupError::decode("unexpected end of input"),
                },
            ],
            latency_ms: 12,
        };

        let envelope =
            fold_outcome(String::from("req-1"), both_providers(), outcome).expect("folds");

        let codes: Vec<&str> = envelope
            .errors
            .iter()
            .map(|error| error.code.as_str())
            .collect();
        assert_eq!(
            codes,
            vec![
                CODE_RACE_ALL_FAILED,
                "lookup.upstream_status",
                "lookup.decode"
            ]
        );
        assert_eq!(envelope.errors[0].source, None);
        assert_eq!(envelope.errors[1].source, Some(ProviderId::BrasilApi));
        assert_eq!(envelope.errors[2].source, Some(ProviderId::ViaCep));
        assert_eq!(envelope.data["outcome"], "all_failed");
    }

    #[test]
    fn timed_out_envelope_carries_the_timeout_code() {
        let outcome = RaceOutcome::TimedOut { deadline_ms: 40 };

        let envelope =
            fold_outcome(String::from("req-1"), both_providers(), outcome).expect("folds");

        assert_eq!(envelope.errors.len(), 1);
        assert_eq!(envelope.errors[0].code, CODE_RACE_TIMED_OUT);
        assert_eq!(envelope.data["outcome"], "timed_out");
        assert_eq!(envelope.data["deadline_ms"], 40);
    }

    #[test]
    fn winner_envelope_has_no_errors() {
        let address = CanonicalAddress::new(
            "01001000",
            "Praça da Sé",
            "Sé",
            "São Paulo",
            "SP",
            ProviderId::ViaCep,
        )
        .expect("valid address");
        let outcome = RaceOutcome::Winner {
            address,
            provider: ProviderId::ViaCep,
            latency_ms: 8,
        };

        let envelope =
            fold_outcome(String::from("req-1"), both_providers(), outcome).expect("folds");

        assert!(envelope.errors.is_empty());
        assert!(envelope.meta.warnings.is_empty());
        assert_eq!(envelope.data["outcome"], "winner");
        assert_eq!(envelope.data["address"]["source"], "ViaCEP");
    }

    #[test]
    fn single_entrant_race_warns_about_missing_fallback() {
        let address = CanonicalAddress::new(
            "01001000",
            "Praça da Sé",
            "Sé",
            "São Paulo",
            "SP",
            ProviderId::BrasilApi,
        )
        .expect("valid address");
        let outcome = RaceOutcome::Winner {
            address,
            provider: ProviderId::BrasilApi,
            latency_ms: 8,
        };

        let envelope = fold_outcome(
            String::from("req-1"),
            vec![ProviderId::BrasilApi],
            outcome,
        )
        .expect("folds");

        assert_eq!(envelope.meta.warnings.len(), 1);
        assert!(envelope.meta.warnings[0].contains("no fallback"));
    }
}
