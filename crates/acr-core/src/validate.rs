use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::ValidateError;
use crate::flatten::command::{Command, ParamType};

/// Validate caller arguments (keyed by camel-cased alias) against a
/// command's declared parameters and produce the request mapping keyed by
/// the original wire names.
///
/// Missing required parameters fail; caller keys matching no declared
/// parameter are ignored. The asymmetry is deliberate and pinned by tests.
pub fn build_request(
    command: &Command,
    args: &Map<String, Value>,
) -> Result<IndexMap<String, Value>, ValidateError> {
    let mut request = IndexMap::new();

    for param in &command.params {
        match args.get(&param.alias) {
            None => {
                if param.required {
                    return Err(ValidateError::MissingRequiredParameter {
                        command: command.name.clone(),
                        parameter: param.alias.clone(),
                    });
                }
            }
            Some(value) => {
                if let Some(declared) = param.declared {
                    if !matches_declared(declared, value) {
                        return Err(ValidateError::ParameterTypeMismatch {
                            parameter: param.alias.clone(),
                            expected: declared.as_str(),
                            actual: value_kind(value),
                        });
                    }
                }
                request.insert(param.name.clone(), value.clone());
            }
        }
    }

    Ok(request)
}

/// `integer` and `number` are one runtime category.
fn matches_declared(declared: ParamType, value: &Value) -> bool {
    match declared {
        ParamType::String => value.is_string(),
        ParamType::Integer | ParamType::Number => value.is_number(),
        ParamType::Boolean => value.is_boolean(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::command::{HttpMethod, ResolvedParam};
    use crate::parse::parameter::ParameterLocation;
    use serde_json::json;

    fn param(name: &str, alias: &str, required: bool, declared: Option<ParamType>) -> ResolvedParam {
        ResolvedParam {
            name: name.to_string(),
            alias: alias.to_string(),
            location: ParameterLocation::Query,
            required,
            deprecated: false,
            declared,
        }
    }

    fn command(params: Vec<ResolvedParam>) -> Command {
        Command {
            name: "scanActionStart".to_string(),
            method: HttpMethod::Post,
            path: "/scan/start".to_string(),
            domain: "scan".to_string(),
            description: None,
            deprecated: false,
            params,
        }
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn missing_required_parameter_fails() {
        let cmd = command(vec![param("id", "id", true, Some(ParamType::Integer))]);
        let err = build_request(&cmd, &Map::new()).unwrap_err();
        assert!(matches!(
            err,
            ValidateError::MissingRequiredParameter { parameter, .. } if parameter == "id"
        ));
    }

    #[test]
    fn string_for_integer_fails() {
        let cmd = command(vec![param("count", "count", false, Some(ParamType::Integer))]);
        let err = build_request(&cmd, &args(json!({"count": "5"}))).unwrap_err();
        assert!(matches!(
            err,
            ValidateError::ParameterTypeMismatch { expected: "integer", actual: "string", .. }
        ));
    }

    #[test]
    fn integer_and_number_are_one_category() {
        let cmd = command(vec![
            param("count", "count", false, Some(ParamType::Integer)),
            param("ratio", "ratio", false, Some(ParamType::Number)),
        ]);
        let request = build_request(&cmd, &args(json!({"count": 5.0, "ratio": 2}))).unwrap();
        assert_eq!(request["count"], json!(5.0));
        assert_eq!(request["ratio"], json!(2));
    }

    #[test]
    fn optional_parameter_may_be_omitted() {
        let cmd = command(vec![param("recurse", "recurse", false, Some(ParamType::Boolean))]);
        let request = build_request(&cmd, &Map::new()).unwrap();
        assert!(request.is_empty());
    }

    #[test]
    fn unknown_extra_keys_are_ignored() {
        // Permissiveness preserved from the source surface: strict on
        // missing-required, silent on unknown-extra.
        let cmd = command(vec![param("id", "id", true, Some(ParamType::Integer))]);
        let request = build_request(&cmd, &args(json!({"id": 7, "unknown": true}))).unwrap();
        assert_eq!(request.len(), 1);
        assert_eq!(request["id"], json!(7));
    }

    #[test]
    fn values_are_keyed_by_original_names() {
        let cmd = command(vec![param(
            "target-url",
            "targetUrl",
            true,
            Some(ParamType::String),
        )]);
        let request = build_request(&cmd, &args(json!({"targetUrl": "http://x"}))).unwrap();
        assert_eq!(request["target-url"], json!("http://x"));
    }

    #[test]
    fn unconstrained_parameter_accepts_anything() {
        let cmd = command(vec![param("filter", "filter", false, None)]);
        let request = build_request(&cmd, &args(json!({"filter": [1, 2]}))).unwrap();
        assert_eq!(request["filter"], json!([1, 2]));
    }
}
