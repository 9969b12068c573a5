use thiserror::Error;
use tracing::{debug, error};

/// Errors raised by the flattening JSON parser.
#[derive(Debug, Error)]
pub enum JsonParseError {
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("expected JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Errors raised while resolving the tenant of a request.
#[derive(Debug, Error)]
pub enum TenantError {
    #[error("cannot parse {name} header value {value:?} as an unsigned integer")]
    InvalidId { name: &'static str, value: String },
}

/// Errors that can occur while executing a log query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid query request: {0}")]
    InvalidRequest(String),

    #[error("Tenant resolution failed: {0}")]
    Tenant(#[from] TenantError),

    #[error("Cannot ingest rows: {0}")]
    Ingest(#[from] JsonParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Query execution task failed: {0}")]
    Join(String),
}

impl QueryError {
    pub fn log_error(&self) {
        match self {
            QueryError::InvalidRequest(msg) => {
                error!("Invalid query request: {}", msg);
            }
            QueryError::Tenant(e) => {
                error!("Tenant resolution failed: {}", e);
                debug!("Tenant error details: {:?}", e);
            }
            QueryError::Ingest(e) => {
                error!("Cannot ingest rows: {}", e);
                debug!("Ingest error details: {:?}", e);
            }
            QueryError::Io(e) => {
                error!("I/O error during query: {}", e);
                debug!("I/O error details: {:?}", e);
            }
            QueryError::Join(msg) => {
                error!("Query execution task failed: {}", msg);
            }
        }
    }
}
