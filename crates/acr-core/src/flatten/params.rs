use crate::error::FlattenError;
use crate::parse::components::Components;
use crate::parse::parameter::{Parameter, ParameterOrRef};

use super::command::{ParamType, ResolvedParam};
use super::naming::param_alias;

/// Expand an operation's raw parameter lists (shared endpoint parameters
/// first, the operation's own second) into an ordered sequence of literal
/// descriptors with binding aliases attached.
pub fn resolve_parameters(
    shared: &[ParameterOrRef],
    own: &[ParameterOrRef],
    components: Option<&Components>,
) -> Result<Vec<ResolvedParam>, FlattenError> {
    let mut resolved = Vec::with_capacity(shared.len() + own.len());
    for param in shared.iter().chain(own) {
        resolved.push(resolve_one(param, components)?);
    }
    Ok(resolved)
}

fn resolve_one(
    param: &ParameterOrRef,
    components: Option<&Components>,
) -> Result<ResolvedParam, FlattenError> {
    match param {
        ParameterOrRef::Parameter(literal) => Ok(to_resolved(literal)),
        ParameterOrRef::Ref { ref_path } => {
            let literal = lookup_parameter(ref_path, components)?;
            Ok(to_resolved(&literal))
        }
    }
}

fn to_resolved(param: &Parameter) -> ResolvedParam {
    let declared = param
        .schema
        .as_ref()
        .and_then(|s| s.schema_type.as_deref())
        .and_then(ParamType::from_tag);

    ResolvedParam {
        name: param.name.clone(),
        alias: param_alias(&param.name),
        location: param.location,
        required: param.required,
        deprecated: param.deprecated.unwrap_or(false),
        declared,
    }
}

fn lookup_parameter(
    ref_path: &str,
    components: Option<&Components>,
) -> Result<Parameter, FlattenError> {
    let name = parse_ref_name(ref_path)?;
    components
        .and_then(|c| c.parameters.get(name))
        .and_then(|p| match p {
            ParameterOrRef::Parameter(param) => Some(param.clone()),
            // Transitive refs inside components are not supported.
            ParameterOrRef::Ref { .. } => None,
        })
        .ok_or_else(|| FlattenError::MissingParameterDefinition(ref_path.to_string()))
}

/// Parse a `$ref` path like `#/components/parameters/Foo` and extract the name.
fn parse_ref_name(ref_path: &str) -> Result<&str, FlattenError> {
    ref_path
        .strip_prefix("#/components/parameters/")
        .filter(|name| !name.is_empty() && !name.contains('/'))
        .ok_or_else(|| FlattenError::InvalidRefFormat(ref_path.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parameter::{ParameterLocation, ParameterSchema};

    fn literal(name: &str, required: bool, schema_type: Option<&str>) -> ParameterOrRef {
        ParameterOrRef::Parameter(Parameter {
            name: name.to_string(),
            location: ParameterLocation::Query,
            description: None,
            required,
            deprecated: None,
            schema: schema_type.map(|t| ParameterSchema {
                schema_type: Some(t.to_string()),
            }),
        })
    }

    #[test]
    fn shared_parameters_come_first() {
        let shared = vec![literal("baseUrl", false, Some("string"))];
        let own = vec![literal("start", false, Some("integer"))];

        let resolved = resolve_parameters(&shared, &own, None).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].name, "baseUrl");
        assert_eq!(resolved[1].name, "start");
        assert_eq!(resolved[1].declared, Some(ParamType::Integer));
    }

    #[test]
    fn alias_is_camel_cased() {
        let own = vec![literal("target-url", true, Some("string"))];
        let resolved = resolve_parameters(&[], &own, None).unwrap();
        assert_eq!(resolved[0].name, "target-url");
        assert_eq!(resolved[0].alias, "targetUrl");
        assert!(resolved[0].required);
    }

    #[test]
    fn unknown_type_tag_is_unconstrained() {
        let own = vec![literal("filter", false, Some("array"))];
        let resolved = resolve_parameters(&[], &own, None).unwrap();
        assert_eq!(resolved[0].declared, None);
    }

    #[test]
    fn missing_ref_target_fails() {
        let own = vec![ParameterOrRef::Ref {
            ref_path: "#/components/parameters/scanId".to_string(),
        }];
        let err = resolve_parameters(&[], &own, None).unwrap_err();
        assert!(matches!(
            err,
            FlattenError::MissingParameterDefinition(path) if path.ends_with("scanId")
        ));
    }

    #[test]
    fn malformed_ref_fails() {
        let own = vec![ParameterOrRef::Ref {
            ref_path: "#/components/schemas/Scan".to_string(),
        }];
        let err = resolve_parameters(&[], &own, None).unwrap_err();
        assert!(matches!(err, FlattenError::InvalidRefFormat(_)));
    }
}
