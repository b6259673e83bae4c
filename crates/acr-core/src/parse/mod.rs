pub mod components;
pub mod document;
pub mod operation;
pub mod parameter;
pub mod security;
pub mod server;

use crate::error::ParseError;
use document::ApiDocument;

/// Parse an API document from YAML.
pub fn from_yaml(input: &str) -> Result<ApiDocument, ParseError> {
    let doc: ApiDocument = serde_yaml_ng::from_str(input)?;
    validate_version(&doc)?;
    Ok(doc)
}

/// Parse an API document from JSON.
pub fn from_json(input: &str) -> Result<ApiDocument, ParseError> {
    let doc: ApiDocument = serde_json::from_str(input)?;
    validate_version(&doc)?;
    Ok(doc)
}

fn validate_version(doc: &ApiDocument) -> Result<(), ParseError> {
    if let Some(version) = &doc.openapi {
        if !version.starts_with("3.") {
            return Err(ParseError::UnsupportedVersion(version.clone()));
        }
    }
    Ok(())
}
