//! Provider adapters. Each adapter issues one GET against its upstream,
//! decodes the provider-specific JSON schema, and normalizes the payload
//! into a [`crate::CanonicalAddress`].

mod brasilapi;
mod viacep;

pub use brasilapi::BrasilApiAdapter;
pub use viacep::ViaCepAdapter;
