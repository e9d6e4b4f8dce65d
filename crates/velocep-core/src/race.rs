use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::lookup::{CepSource, LookupFailure, ProviderOutcome};
use crate::{CanonicalAddress, ProviderId, ValidationError};

pub const DEFAULT_DEADLINE_MS: u64 = 1_000;

/// Terminal result of one race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceOutcome {
    /// First adapter to deliver a valid record wins; everything else is
    /// discarded.
    Winner {
        address: CanonicalAddress,
        provider: ProviderId,
        latency_ms: u64,
    },
    /// Every adapter reported a failure before the deadline.
    AllFailed {
        failures: Vec<LookupFailure>,
        latency_ms: u64,
    },
    /// The global deadline elapsed with no winner and failures still
    /// outstanding.
    TimedOut { deadline_ms: u64 },
}

/// Races every registered adapter against the same postal code and resolves
/// the first terminal event: a success, the full failure set, or the global
/// deadline.
///
/// Each race is self-contained; the coordinator holds configuration only and
/// no state carries across calls to [`RaceCoordinator::run`].
pub struct RaceCoordinator {
    sources: Vec<Arc<dyn CepSource>>,
    deadline: Duration,
}

impl RaceCoordinator {
    pub fn new(
        sources: Vec<Arc<dyn CepSource>>,
        deadline_ms: u64,
    ) -> Result<Self, ValidationError> {
        if deadline_ms == 0 {
            return Err(ValidationError::ZeroDeadline);
        }

        Ok(Self {
            sources,
            deadline: Duration::from_millis(deadline_ms),
        })
    }

    pub fn providers(&self) -> Vec<ProviderId> {
        self.sources.iter().map(|source| source.id()).collect()
    }

    /// Run one race. Winner-takes-all: the first `Success` resolves the race
    /// immediately and later outcomes are never read. Losing tasks are not
    /// cancelled; their in-flight requests run to completion bounded by each
    /// adapter's own per-request timeout, and their buffered outcomes are
    /// dropped with the channel.
    pub async fn run(&self, cep: &str) -> RaceOutcome {
        let started = Instant::now();
        let total = self.sources.len();

        // Buffered to the adapter count so losers never block on send,
        // mirroring one-slot result channels per producer.
        let (tx, mut rx) = mpsc::channel::<ProviderOutcome>(total.max(1));

        for source in &self.sources {
            let source = Arc::clone(source);
            let cep = cep.to_owned();
            let tx = tx.clone();

            tokio::spawn(async move {
                let outcome = match source.lookup(&cep).await {
                    Ok(address) => ProviderOutcome::Success(address),
                    Err(error) => ProviderOutcome::Failure(LookupFailure {
                        provider: source.id(),
                        error,
                    }),
                };
                let _ = tx.send(outcome).await;
            });
        }
        drop(tx);

        let deadline = tokio::time::sleep(self.deadline);
        tokio::pin!(deadline);

        let mut failures = Vec::with_capacity(total);

        loop {
            tokio::select! {
                () = &mut deadline => {
                    return RaceOutcome::TimedOut {
                        deadline_ms: self.deadline.as_millis() as u64,
                    };
                }
                outcome = rx.recv() => match outcome {
                    Some(ProviderOutcome::Success(address)) => {
                        let provider = address.source;
                        return RaceOutcome::Winner {
                            address,
                            provider,
                            latency_ms: elapsed_ms(started),
                        };
                    }
                    Some(ProviderOutcome::Failure(failure)) => {
                        failures.push(failure);
                        if failures.len() == total {
                            return RaceOutcome::AllFailed {
                                failures,
                                latency_ms: elapsed_ms(started),
                            };
                        }
                    }
                    // Channel closed before every outcome arrived (a task
                    // aborted without reporting); surface what we collected.
                    None => {
                        return RaceOutcome::AllFailed {
                            failures,
                            latency_ms: elapsed_ms(started),
                        };
                    }
                },
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64
}
