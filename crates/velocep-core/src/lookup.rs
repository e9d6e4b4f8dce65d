use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{CanonicalAddress, ProviderId};

/// Adapter-level failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupErrorKind {
    /// Connection refused, DNS failure, or per-request timeout.
    Transport,
    /// Response stream could not be fully read.
    BodyRead,
    /// Body is not valid JSON or does not satisfy the provider schema.
    Decode,
    /// Upstream returned a non-success HTTP status.
    UpstreamStatus,
}

/// Structured lookup error surfaced by provider adapters. Expected failure
/// paths are values, never panics; the race coordinator aggregates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupError {
    kind: LookupErrorKind,
    message: String,
}

impl LookupError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: LookupErrorKind::Transport,
            message: message.into(),
        }
    }

    pub fn body_read(message: impl Into<String>) -> Self {
        Self {
            kind: LookupErrorKind::BodyRead,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: LookupErrorKind::Decode,
            message: message.into(),
        }
    }

    pub fn upstream_status(status: u16) -> Self {
        Self {
            kind: LookupErrorKind::UpstreamStatus,
            message: format!("upstream returned status {status}"),
        }
    }

    pub const fn kind(&self) -> LookupErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            LookupErrorKind::Transport => "lookup.transport",
            LookupErrorKind::BodyRead => "lookup.body_read",
            LookupErrorKind::Decode => "lookup.decode",
            LookupErrorKind::UpstreamStatus => "lookup.upstream_status",
        }
    }
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for LookupError {}

/// A lookup error tagged with the provider that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFailure {
    pub provider: ProviderId,
    pub error: LookupError,
}

impl Display for LookupFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.provider, self.error)
    }
}

/// Terminal event of one adapter pipeline, delivered once to the race
/// coordinator and discarded after observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    Success(CanonicalAddress),
    Failure(LookupFailure),
}

pub type LookupFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CanonicalAddress, LookupError>> + Send + 'a>>;

/// Postal code lookup contract implemented by every provider adapter.
///
/// Adapters do not validate the postal code format; malformed codes are
/// passed through to the upstream service. One outbound call per invocation,
/// no retries, no caching.
pub trait CepSource: Send + Sync {
    fn id(&self) -> ProviderId;
    fn lookup<'a>(&'a self, cep: &'a str) -> LookupFuture<'a>;
}
