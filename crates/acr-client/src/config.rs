use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

/// Client configuration, built in code or loaded from `.acr.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL requests are issued against. When empty, callers fall back
    /// to the first server entry of the loaded documents.
    pub host: String,

    /// Authenticated user surfaced on the dispatcher.
    pub user: Option<String>,

    /// Deployment region surfaced on the dispatcher.
    pub region: Option<String>,

    /// Extra headers attached to every request.
    pub headers: IndexMap<String, String>,

    pub session: SessionConfig,
}

/// How the server-issued session credential travels.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Header carrying the credential on outbound requests.
    pub header: String,

    /// Response-body field a newly issued credential arrives under.
    pub field: String,

    /// Canonical name of the command that establishes a session. That call
    /// never carries the credential itself.
    pub create_command: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            header: "X-Session-Id".to_string(),
            field: "sessionId".to_string(),
            create_command: "create".to_string(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".acr.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<ClientConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: ClientConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}
