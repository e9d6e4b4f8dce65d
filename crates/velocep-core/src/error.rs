use thiserror::Error;

/// Validation errors exposed by `velocep-core` domain constructors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("postal code cannot be empty")]
    EmptyPostalCode,
    #[error("city cannot be empty")]
    EmptyCity,
    #[error("region/state code cannot be empty")]
    EmptyRegion,

    #[error("invalid provider '{value}', expected one of brasilapi, viacep")]
    InvalidProvider { value: String },

    #[error("deadline must be greater than zero")]
    ZeroDeadline,
}
