use heck::ToLowerCamelCase;

/// Canonical command name for an operation id. Deprecated operations get a
/// literal suffix so they never collide with a live replacement.
pub fn canonical_name(operation_id: &str, deprecated: bool) -> String {
    let base = operation_id.to_lower_camel_case();
    if deprecated {
        format!("{base}Deprecated")
    } else {
        base
    }
}

/// camelCase binding alias for a declared parameter name.
pub fn param_alias(name: &str) -> String {
    name.to_lower_camel_case()
}
