//! One-shot action endpoints (`/pet/{petId}/uploadImage`, `/user/login`)

use super::extract::{
    convert_parameter, effective_parameters, request_schema, response_schema, split_parameters,
    JSON, MULTIPART, OCTET_STREAM,
};
use super::filtering::PathView;
use crate::naming::{
    is_action_segment, is_param, is_root, is_strong_action_keyword, param_name, segments,
    singularize, to_pascal_case, to_upper_camel_case,
};
use crate::openapi::OpenApiSpec;
use crate::schema::convert_schema;
use openapi_operator_gen_common::{ActionEndpoint, HttpMethod};

/// Whether the method set and path shape describe an action
///
/// POST/PUT paths without GET/PATCH/DELETE are actions, except that a path
/// ending in a parameter never is and `/{resource}/{id}/{segment}` needs an
/// action-like last segment. A GET-only path is an action when its last
/// segment is a strong keyword such as `login`.
pub(crate) fn is_action_shape(view: &PathView<'_>) -> bool {
    let has_get = view.has(HttpMethod::Get);
    let has_write = view.has(HttpMethod::Post) || view.has(HttpMethod::Put);

    if view.has(HttpMethod::Delete) || view.has(HttpMethod::Patch) {
        return false;
    }

    let parts = segments(view.path);
    let last = parts[parts.len() - 1];

    if !has_write {
        return has_get && !is_param(last) && is_strong_action_keyword(last);
    }

    if has_get || is_param(last) {
        return false;
    }

    if parts.len() >= 3 && parts[1..parts.len() - 1].iter().any(|p| is_param(p)) {
        return is_action_segment(last);
    }

    true
}

/// Parent Kind and ID parameter of an action path
///
/// The last parameter preceded by a plain segment identifies the parent;
/// a two-segment path uses its first segment without an ID.
fn parent_of(parts: &[&str]) -> (Option<String>, Option<String>) {
    let scanned = parts[..parts.len() - 1]
        .windows(2)
        .filter(|pair| !is_param(pair[0]))
        .filter_map(|pair| param_name(pair[1]).map(|param| (pair[0], param)))
        .last();

    if let Some((resource, param)) = scanned {
        return (
            Some(singularize(&to_pascal_case(resource))),
            Some(param.to_string()),
        );
    }

    if parts.len() == 2 && !is_param(parts[0]) {
        return (Some(singularize(&to_pascal_case(parts[0]))), None);
    }

    (None, None)
}

/// Build the action endpoint for an action-shaped path
///
/// Returns `None` for the root path when no root Kind is configured.
pub(crate) fn extract_action_endpoint(
    spec: &OpenApiSpec,
    view: &PathView<'_>,
    root_kind: Option<&str>,
) -> Option<ActionEndpoint> {
    let parts = segments(view.path);

    let (name, action_name, parent_resource, parent_id_param) = if is_root(view.path) {
        let kind = root_kind?;
        (format!("{}Action", kind), kind.to_lowercase(), None, None)
    } else {
        let action_name = parts[parts.len() - 1].to_string();
        let (parent, parent_id) = parent_of(&parts);
        let name = format!(
            "{}{}Action",
            parent.as_deref().unwrap_or_default(),
            to_upper_camel_case(&action_name)
        );
        (name, action_name, parent, parent_id)
    };

    let (http_method, op) = [HttpMethod::Post, HttpMethod::Put]
        .into_iter()
        .find_map(|method| view.operation(method).map(|op| (method, op)))
        .or_else(|| {
            view.operation(HttpMethod::Get)
                .filter(|_| is_strong_action_keyword(&action_name))
                .map(|op| (HttpMethod::Get, op))
        })?;

    let mut parent_id_type = None;
    let params = effective_parameters(spec, view.item, op)
        .into_iter()
        .filter_map(|p| convert_parameter(spec, p, false))
        .filter(|p| {
            if parent_id_param.as_deref() == Some(p.name.as_str()) {
                parent_id_type = p.param_type.clone();
                return false;
            }
            true
        })
        .collect::<Vec<_>>();
    let (path_params, query_params) = split_parameters(params);

    let mut endpoint = ActionEndpoint {
        name,
        operation_id: op.operation_id.clone(),
        path: view.path.to_string(),
        parent_resource,
        parent_id_param,
        parent_id_type,
        action_name,
        http_method,
        summary: op.summary.clone(),
        description: op.description.clone(),
        path_params,
        query_params,
        request_schema: None,
        response_schema: None,
        has_binary_body: false,
        binary_content_type: None,
    };

    if let Some(schema) = request_schema(spec, op, JSON) {
        endpoint.request_schema = convert_schema(spec, "RequestBody", schema);
    }

    if let Some(schema) = request_schema(spec, op, MULTIPART) {
        endpoint.request_schema = convert_schema(spec, "RequestBody", schema);
        let has_binary_part = spec.resolve_schema(schema).is_some_and(|s| {
            s.properties.values().any(|prop| {
                spec.resolve_schema(prop)
                    .is_some_and(|p| p.format.as_deref() == Some("binary"))
            })
        });
        if has_binary_part {
            endpoint.has_binary_body = true;
            endpoint.binary_content_type = Some(MULTIPART.to_string());
        }
    }

    if let Some(schema) = request_schema(spec, op, OCTET_STREAM) {
        endpoint.request_schema = convert_schema(spec, "RequestBody", schema);
        let is_binary = spec.resolve_schema(schema).is_some_and(|s| {
            s.format.as_deref() == Some("binary") || s.schema_type.primary() == Some("string")
        });
        if is_binary {
            endpoint.has_binary_body = true;
            endpoint.binary_content_type = Some(OCTET_STREAM.to_string());
        }
    }

    endpoint.response_schema =
        response_schema(spec, op).and_then(|schema| convert_schema(spec, "Response", schema));

    Some(endpoint)
}
