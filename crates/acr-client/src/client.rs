use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use acr_core::flatten::command::{Command, CommandTable};
use acr_core::parse::parameter::ParameterLocation;
use acr_core::resolve;
use acr_core::validate;

use crate::config::ClientConfig;
use crate::error::InvokeError;
use crate::session::SessionState;
use crate::transport::{HttpTransport, Transport, TransportRequest, TransportResponse};

/// Domain-grouped dispatcher over a flattened command table.
///
/// The table is immutable and shared; the session slot is the only mutable
/// state, so invocations take `&self` and run concurrently.
pub struct Client {
    table: Arc<CommandTable>,
    config: ClientConfig,
    transport: Box<dyn Transport>,
    session: SessionState,
}

impl Client {
    pub fn new(table: Arc<CommandTable>, config: ClientConfig) -> Self {
        Self::with_transport(table, config, Box::new(HttpTransport::new()))
    }

    pub fn with_transport(
        table: Arc<CommandTable>,
        config: ClientConfig,
        transport: Box<dyn Transport>,
    ) -> Self {
        Self {
            table,
            config,
            transport,
            session: SessionState::default(),
        }
    }

    /// Authenticated user, when configured.
    pub fn user(&self) -> Option<&str> {
        self.config.user.as_deref()
    }

    /// Deployment region, when configured.
    pub fn region(&self) -> Option<&str> {
        self.config.region.as_deref()
    }

    /// Headers attached to every outbound request.
    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.config.headers
    }

    /// Masked partial view of the current session credential. The raw
    /// value never leaves the client.
    pub fn session_preview(&self) -> Option<String> {
        self.session.masked()
    }

    /// Distinct domains in registration order.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.table.domains().iter().map(String::as_str)
    }

    /// Scope the dispatcher to one recognized domain.
    pub fn domain(&self, name: &str) -> Result<Scope<'_>, InvokeError> {
        if self.table.has_domain(name) {
            Ok(Scope {
                client: self,
                domain: name.to_string(),
            })
        } else {
            Err(InvokeError::UnknownDomain(name.to_string()))
        }
    }

    /// One-shot invocation without an intermediate scope.
    pub async fn call(
        &self,
        domain: &str,
        member: &str,
        args: Option<Map<String, Value>>,
    ) -> Result<Value, InvokeError> {
        self.domain(domain)?.call(member, args).await
    }

    async fn invoke(
        &self,
        command: &Command,
        args: &Map<String, Value>,
    ) -> Result<Value, InvokeError> {
        let request = validate::build_request(command, args)?;
        let response = self.send(command, request).await?;

        if !(200..300).contains(&response.status) {
            return Err(InvokeError::Api {
                status: response.status,
                body: response.body,
            });
        }

        self.capture_credential(&response.body);
        Ok(response.body)
    }

    async fn send(
        &self,
        command: &Command,
        values: IndexMap<String, Value>,
    ) -> Result<TransportResponse, InvokeError> {
        let mut path = command.path.clone();
        let mut query = Vec::new();
        let mut body = Map::new();
        let mut headers: Vec<(String, String)> = self
            .config
            .headers
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        for param in &command.params {
            let Some(value) = values.get(&param.name) else {
                continue;
            };
            match param.location {
                ParameterLocation::Path => {
                    let encoded = urlencoding::encode(&scalar(value)).into_owned();
                    path = path.replace(&format!("{{{}}}", param.name), &encoded);
                }
                ParameterLocation::Header => {
                    headers.push((param.name.clone(), scalar(value)));
                }
                ParameterLocation::Query | ParameterLocation::Cookie => {
                    if command.method.is_get() {
                        query.push((param.name.clone(), scalar(value)));
                    } else {
                        body.insert(param.name.clone(), value.clone());
                    }
                }
            }
        }

        if command.name != self.config.session.create_command {
            if let Some(credential) = self.session.credential() {
                headers.push((self.config.session.header.clone(), credential));
            }
        }

        let url = format!("{}{}", self.config.host.trim_end_matches('/'), path);
        log::debug!("{} {}", command.method, url);

        let response = self
            .transport
            .send(TransportRequest {
                method: command.method,
                url,
                query,
                headers,
                body: if body.is_empty() {
                    None
                } else {
                    Some(Value::Object(body))
                },
            })
            .await?;
        Ok(response)
    }

    fn capture_credential(&self, body: &Value) {
        if let Some(credential) = body
            .get(self.config.session.field.as_str())
            .and_then(Value::as_str)
        {
            self.session.store(credential.to_string());
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("host", &self.config.host)
            .field("user", &self.config.user)
            .field("region", &self.config.region)
            .field("session", &self.session.masked())
            .field("commands", &self.table.len())
            .finish()
    }
}

/// The dispatcher scoped to one domain; members resolve on invocation.
pub struct Scope<'a> {
    client: &'a Client,
    domain: String,
}

impl Scope<'_> {
    pub fn name(&self) -> &str {
        &self.domain
    }

    /// Commands registered under this domain.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.client
            .table
            .commands()
            .filter(|command| command.domain == self.domain)
    }

    /// Resolve a member and invoke it. Argument keys are the camel-cased
    /// parameter aliases; omitted optional keys are fine.
    pub async fn call(
        &self,
        member: &str,
        args: Option<Map<String, Value>>,
    ) -> Result<Value, InvokeError> {
        let Some(command) = self.client.table.resolve(&self.domain, member) else {
            return Err(InvokeError::UnknownCommand {
                domain: self.domain.clone(),
                member: member.to_string(),
                tried: resolve::candidates(&self.domain, member).join(", "),
            });
        };
        let args = args.unwrap_or_default();
        self.client.invoke(command, &args).await
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
