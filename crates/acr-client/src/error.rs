use serde_json::Value;
use thiserror::Error;

use acr_core::error::ValidateError;

/// Failures inside the outbound capability itself.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// Everything an invocation can surface to the caller. Nothing is retried
/// or swallowed on the way up.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("unknown domain: {0}")]
    UnknownDomain(String),

    #[error("unknown command '{member}' in domain '{domain}' (tried {tried})")]
    UnknownCommand {
        domain: String,
        member: String,
        tried: String,
    },

    #[error(transparent)]
    Validate(#[from] ValidateError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("api error {status}: {body}")]
    Api { status: u16, body: Value },
}
