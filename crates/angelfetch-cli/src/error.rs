use angelfetch_core::{ClientError, CoercionError, CoreError, ErrorCatalog, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Broker rejection, already rendered with the catalog description.
    #[error("{0}")]
    Remote(String),

    #[error(transparent)]
    Client(ClientError),

    #[error(transparent)]
    Coercion(#[from] CoercionError),

    #[error("failed to load error catalog: {0}")]
    Catalog(CoreError),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Split a client failure into a described broker rejection or a
    /// transport-level error.
    pub fn from_client(error: ClientError, catalog: &ErrorCatalog) -> Self {
        match error {
            ClientError::Broker(broker) => Self::Remote(broker.describe(catalog)),
            other => Self::Client(other),
        }
    }

    pub fn from_core(error: CoreError, catalog: &ErrorCatalog) -> Self {
        match error {
            CoreError::Validation(error) => Self::Validation(error),
            CoreError::Client(error) => Self::from_client(error, catalog),
            CoreError::Coercion(error) => Self::Coercion(error),
            CoreError::Serialization(error) => Self::Serialization(error),
            CoreError::Io(error) => Self::Io(error),
        }
    }

    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Remote(_) => 3,
            Self::Client(ClientError::HttpStatus { .. } | ClientError::Decode(_)) => 3,
            Self::Client(_) => 4,
            Self::Coercion(_)
            | Self::Catalog(_)
            | Self::Logging(_)
            | Self::Serialization(_)
            | Self::Csv(_)
            | Self::Io(_) => 10,
        }
    }
}
