//! Resource accumulation across contributing paths

use super::extract::{
    convert_parameter, effective_parameters, request_schema, response_schema, split_parameters,
    JSON,
};
use super::filtering::PathView;
use crate::naming::{get_base_path, is_param, pluralize, segments};
use crate::openapi::{ref_name, OpenApiSpec, Operation as RawOperation, PathItem, ReferenceOr};
use crate::schema::convert_schema;
use openapi_operator_gen_common::{HttpMethod, Operation, Resource, Schema};
use std::collections::BTreeMap;

/// Collects operations for one resource Kind
#[derive(Debug)]
pub(crate) struct ResourceBuilder {
    name: String,
    path: String,

    /// Operation per method, flagged when it came from an item path
    operations: BTreeMap<HttpMethod, (Operation, bool)>,

    schema: Option<Schema>,
    description: Option<String>,
}

impl ResourceBuilder {
    /// Start a resource at its first contributing path
    pub fn new(name: &str, first_path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: get_base_path(first_path),
            operations: BTreeMap::new(),
            schema: None,
            description: None,
        }
    }

    /// Add the operations of a path
    ///
    /// An item path operation replaces one already collected for the same
    /// method; otherwise the first one seen is kept.
    pub fn contribute(&mut self, spec: &OpenApiSpec, view: &PathView<'_>) {
        let from_item_path = segments(view.path).last().is_some_and(|s| is_param(s));

        for (&method, &raw) in &view.operations {
            let replace = match self.operations.get(&method) {
                None => true,
                Some((_, existing_from_item)) => from_item_path && !existing_from_item,
            };
            if replace {
                let operation = convert_operation(spec, view.path, view.item, method, raw);
                self.operations.insert(method, (operation, from_item_path));
            }

            if self.description.is_none() {
                self.description = raw.description.clone().filter(|d| !d.is_empty());
            }
        }

        if self.schema.is_none() {
            self.schema = resource_schema(spec, view);
        }
    }

    pub fn build(self) -> Resource {
        Resource {
            plural_name: pluralize(&self.name),
            name: self.name,
            path: self.path,
            operations: self.operations.into_values().map(|(op, _)| op).collect(),
            schema: self.schema,
            description: self.description,
        }
    }
}

fn convert_operation(
    spec: &OpenApiSpec,
    path: &str,
    item: &PathItem,
    method: HttpMethod,
    raw: &RawOperation,
) -> Operation {
    let params = effective_parameters(spec, item, raw)
        .into_iter()
        .filter_map(|p| convert_parameter(spec, p, false));
    let (path_params, query_params) = split_parameters(params);

    Operation {
        method,
        path: path.to_string(),
        operation_id: raw.operation_id.clone(),
        summary: raw.summary.clone(),
        request_body: request_schema(spec, raw, JSON)
            .and_then(|schema| convert_schema(spec, "RequestBody", schema)),
        response_body: response_schema(spec, raw)
            .and_then(|schema| convert_schema(spec, "ResponseBody", schema)),
        path_params,
        query_params,
    }
}

/// Body shape from the path's POST, then PUT, JSON request body
///
/// A referenced body keeps its component name; an inline one is named
/// "Resource".
fn resource_schema(spec: &OpenApiSpec, view: &PathView<'_>) -> Option<Schema> {
    [HttpMethod::Post, HttpMethod::Put]
        .into_iter()
        .filter_map(|method| view.operation(method))
        .filter_map(|op| request_schema(spec, op, JSON))
        .find_map(|schema| match schema {
            ReferenceOr::Reference { reference } => {
                convert_schema(spec, &ref_name(reference), schema)
            }
            ReferenceOr::Item(_) => convert_schema(spec, "Resource", schema),
        })
}
