use thiserror::Error;

use crate::flatten::command::HttpMethod;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

/// Fatal construction-time errors. A table built past any of these would be
/// inconsistent, so flattening aborts on the first one.
#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("operation {method} {path} has no tags")]
    MissingTag { method: HttpMethod, path: String },

    #[error("operation {method} {path} has no operationId")]
    MissingOperationId { method: HttpMethod, path: String },

    #[error("duplicate command name: {0}")]
    DuplicateCommand(String),

    #[error("missing parameter definition: {0}")]
    MissingParameterDefinition(String),

    #[error("invalid parameter reference: {0}")]
    InvalidRefFormat(String),
}

/// Argument errors raised before any request is built.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("missing required parameter '{parameter}' for '{command}'")]
    MissingRequiredParameter { command: String, parameter: String },

    #[error("parameter '{parameter}' expects {expected}, got {actual}")]
    ParameterTypeMismatch {
        parameter: String,
        expected: &'static str,
        actual: &'static str,
    },
}
