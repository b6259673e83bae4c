pub mod command;
pub mod naming;
pub mod params;

pub use command::{Command, CommandTable, HttpMethod, ParamType, ResolvedParam};

use crate::error::FlattenError;
use crate::parse::components::Components;
use crate::parse::document::ApiDocument;
use crate::parse::operation::{Operation, PathItem};
use crate::parse::parameter::ParameterOrRef;

use naming::canonical_name;
use params::resolve_parameters;

/// Flatten one or more API documents into a single command table.
///
/// Deterministic given the same documents in the same order. Untagged or
/// unidentified operations, unresolved parameter references, and colliding
/// canonical names abort the build.
pub fn flatten(docs: &[ApiDocument]) -> Result<CommandTable, FlattenError> {
    let mut table = CommandTable::default();

    for doc in docs {
        let components = doc.components.as_ref();
        for (path, item) in &doc.paths {
            collect_operations(path, item, components, &mut table)?;
        }
    }

    log::debug!(
        "flattened {} commands across {} domains",
        table.len(),
        table.domains().len()
    );
    Ok(table)
}

fn collect_operations(
    path: &str,
    item: &PathItem,
    components: Option<&Components>,
    table: &mut CommandTable,
) -> Result<(), FlattenError> {
    macro_rules! add_op {
        ($method:expr, $op:expr) => {
            if let Some(ref op) = $op {
                let command = build_command($method, path, op, &item.parameters, components)?;
                table.insert(command)?;
            }
        };
    }

    add_op!(HttpMethod::Get, item.get);
    add_op!(HttpMethod::Post, item.post);
    add_op!(HttpMethod::Put, item.put);
    add_op!(HttpMethod::Delete, item.delete);
    add_op!(HttpMethod::Patch, item.patch);
    add_op!(HttpMethod::Options, item.options);
    add_op!(HttpMethod::Head, item.head);
    add_op!(HttpMethod::Trace, item.trace);

    Ok(())
}

fn build_command(
    method: HttpMethod,
    path: &str,
    op: &Operation,
    shared: &[ParameterOrRef],
    components: Option<&Components>,
) -> Result<Command, FlattenError> {
    let domain = op.tags.first().ok_or_else(|| FlattenError::MissingTag {
        method,
        path: path.to_string(),
    })?;

    let operation_id =
        op.operation_id
            .as_deref()
            .ok_or_else(|| FlattenError::MissingOperationId {
                method,
                path: path.to_string(),
            })?;

    let params = resolve_parameters(shared, &op.parameters, components)?;
    let deprecated = op.deprecated.unwrap_or(false);

    Ok(Command {
        name: canonical_name(operation_id, deprecated),
        method,
        path: path.to_string(),
        domain: domain.clone(),
        description: op.description.clone(),
        deprecated,
        params,
    })
}
