use std::fmt;

use indexmap::{IndexMap, IndexSet};

use crate::error::FlattenError;
use crate::parse::parameter::ParameterLocation;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// GET-style commands carry their arguments as query parameters.
    pub fn is_get(&self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Head)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declared primitive type consulted by the argument validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamType {
    /// Map a schema type tag onto a checkable primitive. Unknown or
    /// compound tags leave the parameter unconstrained.
    pub fn from_tag(tag: &str) -> Option<ParamType> {
        match tag {
            "string" => Some(ParamType::String),
            "integer" => Some(ParamType::Integer),
            "number" => Some(ParamType::Number),
            "boolean" => Some(ParamType::Boolean),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
        }
    }
}

/// A parameter flattened onto a command, with its camel-cased binding alias.
#[derive(Debug, Clone)]
pub struct ResolvedParam {
    /// Wire name as the source document declares it.
    pub name: String,
    /// camelCase alias callers bind arguments with.
    pub alias: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub deprecated: bool,
    pub declared: Option<ParamType>,
}

/// A flattened, invokable unit of the API surface. Created once at flatten
/// time; immutable for the life of the process.
#[derive(Debug, Clone)]
pub struct Command {
    /// Canonical name, unique across every input document.
    pub name: String,
    pub method: HttpMethod,
    /// Path template relative to the configured host.
    pub path: String,
    /// First declared tag of the source operation.
    pub domain: String,
    pub description: Option<String>,
    pub deprecated: bool,
    pub params: Vec<ResolvedParam>,
}

/// The unique command surface built once at startup. Read-only afterwards
/// and shareable across any number of dispatchers without synchronization.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    commands: IndexMap<String, Command>,
    domains: IndexSet<String>,
}

impl CommandTable {
    /// Insert a command; a name already present is a construction-time
    /// fatal error.
    pub fn insert(&mut self, command: Command) -> Result<(), FlattenError> {
        if self.commands.contains_key(&command.name) {
            return Err(FlattenError::DuplicateCommand(command.name));
        }
        self.domains.insert(command.domain.clone());
        self.commands.insert(command.name.clone(), command);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    /// Distinct domains in order of first appearance.
    pub fn domains(&self) -> &IndexSet<String> {
        &self.domains
    }

    pub fn has_domain(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }
}
