use thiserror::Error;

/// Errors from the data gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to migrate store: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("No {resource} with id {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Malformed {column} value in store: {value}")]
    Decode { column: &'static str, value: String },
}

impl GatewayError {
    pub(crate) fn decode(column: &'static str, value: impl Into<String>) -> Self {
        Self::Decode {
            column,
            value: value.into(),
        }
    }
}
