//! Parameter and body extraction shared by resources, queries and actions

use crate::openapi::{OpenApiSpec, Operation, Parameter, PathItem, ReferenceOr, Schema};
use openapi_operator_gen_common::{ParamLocation, Parameter as IrParameter};

pub(crate) const JSON: &str = "application/json";
pub(crate) const MULTIPART: &str = "multipart/form-data";
pub(crate) const OCTET_STREAM: &str = "application/octet-stream";

/// Vendor extension naming the body field a path parameter merges into
pub const ID_FIELD_EXTENSION: &str = "x-k8s-id-field";

/// Status codes whose body describes the operation's result, in order
const SUCCESS_CODES: [&str; 2] = ["200", "201"];

/// Parameters in effect for an operation
///
/// Path-level parameters come first; an operation-level parameter with the
/// same name and location replaces its path-level counterpart.
pub(crate) fn effective_parameters<'a>(
    spec: &'a OpenApiSpec,
    item: &'a PathItem,
    op: &'a Operation,
) -> Vec<&'a Parameter> {
    let mut params: Vec<&Parameter> = item
        .parameters
        .iter()
        .filter_map(|p| spec.resolve_parameter(p))
        .collect();

    for param in op.parameters.iter().filter_map(|p| spec.resolve_parameter(p)) {
        match params
            .iter_mut()
            .find(|p| p.name == param.name && p.location == param.location)
        {
            Some(existing) => *existing = param,
            None => params.push(param),
        }
    }

    params
}

/// Convert a parameter, keeping only path and query locations
///
/// With `expand_arrays`, array parameters are typed `array:<item type>`.
pub(crate) fn convert_parameter(
    spec: &OpenApiSpec,
    param: &Parameter,
    expand_arrays: bool,
) -> Option<IrParameter> {
    let location = match ParamLocation::parse(&param.location)? {
        location @ (ParamLocation::Path | ParamLocation::Query) => location,
        _ => return None,
    };

    let schema = param.schema.as_ref().and_then(|s| spec.resolve_schema(s));
    let mut param_type = schema.and_then(|s| s.schema_type.primary().map(String::from));

    if expand_arrays && param_type.as_deref() == Some("array") {
        let item_type = schema
            .and_then(|s| s.items.as_deref())
            .and_then(|items| spec.resolve_schema(items))
            .and_then(|items| items.schema_type.primary());
        if let Some(item_type) = item_type {
            param_type = Some(format!("array:{}", item_type));
        }
    }

    Some(IrParameter {
        name: param.name.clone(),
        location,
        required: param.required,
        param_type,
        description: param.description.clone(),
        id_field_ref: param.extension_str(ID_FIELD_EXTENSION).map(String::from),
    })
}

/// Split converted parameters into (path, query)
pub(crate) fn split_parameters(
    params: impl IntoIterator<Item = IrParameter>,
) -> (Vec<IrParameter>, Vec<IrParameter>) {
    params
        .into_iter()
        .partition(|p| p.location == ParamLocation::Path)
}

/// Request body schema for a media type
pub(crate) fn request_schema<'a>(
    spec: &'a OpenApiSpec,
    op: &'a Operation,
    media_type: &str,
) -> Option<&'a ReferenceOr<Schema>> {
    let body = spec.resolve_request_body(op.request_body.as_ref()?)?;
    body.content.get(media_type)?.schema.as_ref()
}

/// JSON schema of the first 200/201 response that has one
pub(crate) fn response_schema<'a>(
    spec: &'a OpenApiSpec,
    op: &'a Operation,
) -> Option<&'a ReferenceOr<Schema>> {
    SUCCESS_CODES.iter().find_map(|code| {
        let response = spec.resolve_response(op.responses.get(*code)?)?;
        response
            .content
            .get(JSON)?
            .schema
            .as_ref()
            .filter(|schema| spec.resolve_schema(schema).is_some())
    })
}
