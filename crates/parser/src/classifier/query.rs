//! GET-only query endpoints (`/pet/findByStatus`)

use super::extract::{convert_parameter, effective_parameters, response_schema, split_parameters};
use super::filtering::PathView;
use crate::naming::{is_param, is_root, segments, to_upper_camel_case};
use crate::openapi::{ref_name, OpenApiSpec};
use crate::schema::convert_schema;
use openapi_operator_gen_common::{HttpMethod, QueryEndpoint};

/// GET and nothing else among the classified methods
pub(crate) fn is_query_shape(view: &PathView<'_>) -> bool {
    view.has(HttpMethod::Get)
        && !view.has(HttpMethod::Post)
        && !view.has(HttpMethod::Put)
        && !view.has(HttpMethod::Patch)
        && !view.has(HttpMethod::Delete)
}

/// Build the query endpoint for a query-shaped path
///
/// Returns `None` for the root path when no root Kind is configured.
pub(crate) fn extract_query_endpoint(
    spec: &OpenApiSpec,
    view: &PathView<'_>,
    root_kind: Option<&str>,
) -> Option<QueryEndpoint> {
    let op = view.operation(HttpMethod::Get)?;

    let root_segment;
    let parts = if is_root(view.path) {
        root_segment = root_kind?.to_lowercase();
        vec![root_segment.as_str()]
    } else {
        segments(view.path)
    };

    let name: String = parts
        .iter()
        .filter(|part| !is_param(part))
        .map(|part| to_upper_camel_case(part))
        .collect();

    let params = effective_parameters(spec, view.item, op)
        .into_iter()
        .filter_map(|p| convert_parameter(spec, p, true));
    let (path_params, query_params) = split_parameters(params);

    let mut endpoint = QueryEndpoint {
        name: format!("{}Query", name),
        operation_id: op.operation_id.clone(),
        path: view.path.to_string(),
        base_path: format!("/{}", parts[0]),
        operation: parts[parts.len() - 1].to_string(),
        summary: op.summary.clone(),
        description: op.description.clone(),
        path_params,
        query_params,
        response_schema: None,
        response_schema_ref: None,
        response_is_array: false,
    };

    if let Some(schema) = response_schema(spec, op) {
        let resolved = spec.resolve_schema(schema);

        if resolved.is_some_and(|s| s.schema_type.contains("array")) {
            endpoint.response_is_array = true;
            endpoint.response_schema_ref = resolved
                .and_then(|s| s.items.as_deref())
                .and_then(|items| items.as_reference())
                .map(ref_name);
        } else {
            endpoint.response_schema_ref = schema.as_reference().map(ref_name);
        }

        endpoint.response_schema = convert_schema(spec, "Response", schema);
    }

    Some(endpoint)
}
