//! # Velocep Core
//!
//! Core contracts for the velocep postal code lookup racer.
//!
//! Velocep resolves a Brazilian CEP by querying BrasilAPI and ViaCEP
//! concurrently and returning whichever answers first with a valid,
//! normalized address record.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (BrasilAPI, ViaCEP) |
//! | [`address`] | Canonical address record all adapters normalize into |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Validation error types |
//! | [`http_client`] | HTTP client abstraction over reqwest |
//! | [`lookup`] | Lookup contract, outcomes, and failure taxonomy |
//! | [`provider`] | Provider identifiers |
//! | [`race`] | Race coordinator and outcome types |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use velocep_core::{
//!     BrasilApiAdapter, RaceCoordinator, RaceOutcome, ReqwestHttpClient, ViaCepAdapter,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let http = Arc::new(ReqwestHttpClient::new());
//!     let coordinator = RaceCoordinator::new(
//!         vec![
//!             Arc::new(BrasilApiAdapter::new(http.clone())),
//!             Arc::new(ViaCepAdapter::new(http)),
//!         ],
//!         1_000,
//!     )
//!     .expect("non-zero deadline");
//!
//!     match coordinator.run("01001000").await {
//!         RaceOutcome::Winner { address, provider, .. } => {
//!             println!("{provider} won: {}, {} - {}", address.street, address.city, address.state);
//!         }
//!         RaceOutcome::AllFailed { failures, .. } => {
//!             for failure in failures {
//!                 eprintln!("{failure}");
//!             }
//!         }
//!         RaceOutcome::TimedOut { deadline_ms } => {
//!             eprintln!("no provider answered within {deadline_ms}ms");
//!         }
//!     }
//! }
//! ```
//!
//! ## Error Handling
//!
//! Adapter failures are ordinary values, never panics: each adapter reports
//! a structured [`lookup::LookupError`] (transport, body-read, decode, or
//! upstream status) and the coordinator aggregates them into a single
//! [`race::RaceOutcome`]. `AllFailed` and `TimedOut` are expected outcomes,
//! not exceptional conditions.

pub mod adapters;
pub mod address;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod lookup;
pub mod provider;
pub mod race;

// Re-export commonly used types at crate root for convenience

pub use adapters::{BrasilApiAdapter, ViaCepAdapter};
pub use address::CanonicalAddress;
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::ValidationError;
pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use lookup::{
    CepSource, LookupError, LookupErrorKind, LookupFailure, LookupFuture, ProviderOutcome,
};
pub use provider::ProviderId;
pub use race::{RaceCoordinator, RaceOutcome, DEFAULT_DEADLINE_MS};
