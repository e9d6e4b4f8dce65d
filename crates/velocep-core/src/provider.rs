use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Canonical provider identifiers used in address records and envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    #[serde(rename = "BrasilAPI")]
    BrasilApi,
    #[serde(rename = "ViaCEP")]
    ViaCep,
}

impl ProviderId {
    pub const ALL: [Self; 2] = [Self::BrasilApi, Self::ViaCep];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BrasilApi => "BrasilAPI",
            Self::ViaCep => "ViaCEP",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "brasilapi" => Ok(Self::BrasilApi),
            "viacep" => Ok(Self::ViaCep),
            other => Err(ValidationError::InvalidProvider {
                value: other.to_owned(),
            }),
        }
    }
}
