use serde::{Deserialize, Serialize};

use crate::{ProviderId, ValidationError};

/// Normalized address record shared by every provider adapter.
///
/// `street` and `neighborhood` may legitimately be empty (rural or
/// city-wide postal codes); `cep`, `city` and `state` must not be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalAddress {
    pub cep: String,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    /// Identifier of the adapter that produced this record, never inferred
    /// downstream.
    pub source: ProviderId,
}

impl CanonicalAddress {
    pub fn new(
        cep: impl Into<String>,
        street: impl Into<String>,
        neighborhood: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        source: ProviderId,
    ) -> Result<Self, ValidationError> {
        let address = Self {
            cep: cep.into(),
            street: street.into(),
            neighborhood: neighborhood.into(),
            city: city.into(),
            state: state.into(),
            source,
        };

        if address.cep.trim().is_empty() {
            return Err(ValidationError::EmptyPostalCode);
        }
        if address.city.trim().is_empty() {
            return Err(ValidationError::EmptyCity);
        }
        if address.state.trim().is_empty() {
            return Err(ValidationError::EmptyRegion);
        }

        Ok(address)
    }
}
