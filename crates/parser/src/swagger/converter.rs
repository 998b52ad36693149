//! Upgrades a Swagger 2.0 document to the OpenAPI 3.0 model

use super::types::{
    Operation as SwaggerOperation, Parameter as SwaggerParameter, PathItem as SwaggerPathItem,
    Response as SwaggerResponse, Swagger2Spec,
};
use crate::openapi::{
    Components, MediaType, OpenApiSpec, Operation, Parameter, PathItem, ReferenceOr, RequestBody,
    Response, Schema, Server, Types,
};
use openapi_operator_gen_common::{ParseError, Result};
use std::collections::BTreeMap;

const DEFAULT_MIME: &str = "application/json";
const MULTIPART: &str = "multipart/form-data";
const URL_ENCODED: &str = "application/x-www-form-urlencoded";

/// Convert a Swagger 2.0 document into an OpenAPI 3.0 document
///
/// Definitions, global parameters and global responses move under
/// `components`, and every reference is rewritten to match.
pub fn upgrade(doc: &Swagger2Spec) -> Result<OpenApiSpec> {
    let upgrader = Upgrader { doc };

    let paths = match &doc.paths {
        Some(paths) => {
            let mut upgraded = BTreeMap::new();
            for (path, item) in paths {
                let item = upgrader
                    .path_item(item)
                    .map_err(|e| conversion_context(e, path))?;
                upgraded.insert(path.clone(), item);
            }
            Some(upgraded)
        }
        None => None,
    };

    Ok(OpenApiSpec {
        openapi: Some("3.0.3".to_string()),
        info: doc.info.clone(),
        servers: upgrader.servers(),
        paths,
        components: Some(upgrader.components()),
    })
}

fn conversion_context(err: ParseError, path: &str) -> ParseError {
    match err {
        ParseError::Conversion(msg) => ParseError::Conversion(format!("path {}: {}", path, msg)),
        other => other,
    }
}

/// A parameter after resolving `#/parameters/...`, with its global name when referenced
type ResolvedParameter<'a> = (Option<&'a str>, &'a SwaggerParameter);

struct Upgrader<'a> {
    doc: &'a Swagger2Spec,
}

impl<'a> Upgrader<'a> {
    fn servers(&self) -> Vec<Server> {
        let base_path = self.doc.base_path.as_deref().unwrap_or_default();

        match self.doc.host.as_deref().filter(|h| !h.is_empty()) {
            Some(host) => {
                let schemes = if self.doc.schemes.is_empty() {
                    vec!["https".to_string()]
                } else {
                    self.doc.schemes.clone()
                };
                schemes
                    .iter()
                    .map(|scheme| Server {
                        url: format!("{}://{}{}", scheme, host, base_path),
                        description: None,
                    })
                    .collect()
            }
            None if !base_path.is_empty() && base_path != "/" => vec![Server {
                url: base_path.to_string(),
                description: None,
            }],
            None => Vec::new(),
        }
    }

    fn components(&self) -> Components {
        let schemas = self
            .doc
            .definitions
            .iter()
            .map(|(name, schema)| (name.clone(), upgrade_schema(schema)))
            .collect();

        let mut parameters = BTreeMap::new();
        let mut request_bodies = BTreeMap::new();
        for (name, param) in &self.doc.parameters {
            if param.is_body() {
                request_bodies.insert(
                    name.clone(),
                    ReferenceOr::Item(body_request(param, &self.doc.consumes)),
                );
            } else if !param.is_form_data() {
                parameters.insert(name.clone(), ReferenceOr::Item(convert_parameter(param)));
            }
        }

        let responses = self
            .doc
            .responses
            .iter()
            .map(|(name, response)| {
                (
                    name.clone(),
                    ReferenceOr::Item(convert_response(response, &self.doc.produces)),
                )
            })
            .collect();

        Components {
            schemas,
            parameters,
            request_bodies,
            responses,
        }
    }

    fn path_item(&self, item: &'a SwaggerPathItem) -> Result<PathItem> {
        let shared = self.resolve_parameters(&item.parameters)?;
        let convert = |op: &'a Option<SwaggerOperation>| -> Result<Option<Operation>> {
            op.as_ref()
                .map(|op| self.operation(op, &shared))
                .transpose()
        };

        Ok(PathItem {
            get: convert(&item.get)?,
            put: convert(&item.put)?,
            post: convert(&item.post)?,
            delete: convert(&item.delete)?,
            patch: convert(&item.patch)?,
            head: convert(&item.head)?,
            options: convert(&item.options)?,
            // Merged into each operation
            parameters: Vec::new(),
        })
    }

    fn resolve_parameters(
        &self,
        params: &'a [ReferenceOr<SwaggerParameter>],
    ) -> Result<Vec<ResolvedParameter<'a>>> {
        params
            .iter()
            .map(|param| match param {
                ReferenceOr::Item(param) => Ok((None, param)),
                ReferenceOr::Reference { reference } => {
                    let name = reference.strip_prefix("#/parameters/").ok_or_else(|| {
                        ParseError::Conversion(format!(
                            "unsupported parameter reference {:?}",
                            reference
                        ))
                    })?;
                    let global = self.doc.parameters.get(name).ok_or_else(|| {
                        ParseError::Conversion(format!(
                            "unresolved parameter reference {:?}",
                            reference
                        ))
                    })?;
                    Ok((Some(name), global))
                }
            })
            .collect()
    }

    fn operation(
        &self,
        op: &'a SwaggerOperation,
        shared: &[ResolvedParameter<'a>],
    ) -> Result<Operation> {
        // Operation-level parameters override path-level ones by name and location
        let mut merged: Vec<ResolvedParameter<'a>> = shared.to_vec();
        for (global, param) in self.resolve_parameters(&op.parameters)? {
            match merged
                .iter_mut()
                .find(|(_, p)| p.name == param.name && p.location == param.location)
            {
                Some(existing) => *existing = (global, param),
                None => merged.push((global, param)),
            }
        }

        let consumes = mime_types(op.consumes.as_deref(), &self.doc.consumes);
        let produces = mime_types(op.produces.as_deref(), &self.doc.produces);

        let mut parameters = Vec::new();
        let mut request_body = None;
        let mut form = Schema {
            schema_type: Types::single("object"),
            ..Default::default()
        };

        for (global, param) in merged {
            if param.is_body() {
                request_body = Some(match global {
                    Some(name) => ReferenceOr::reference(format!("#/components/requestBodies/{}", name)),
                    None => ReferenceOr::Item(body_request(param, &consumes)),
                });
            } else if param.is_form_data() {
                form.properties.insert(
                    param.name.clone(),
                    upgrade_schema(&ReferenceOr::Item(param.value_schema())),
                );
                if param.required {
                    form.required.push(param.name.clone());
                }
            } else {
                parameters.push(match global {
                    Some(name) => ReferenceOr::reference(format!("#/components/parameters/{}", name)),
                    None => ReferenceOr::Item(convert_parameter(param)),
                });
            }
        }

        if request_body.is_none() && !form.properties.is_empty() {
            let mime = if consumes.iter().any(|m| m == MULTIPART) {
                MULTIPART
            } else {
                URL_ENCODED
            };
            let required = !form.required.is_empty();
            request_body = Some(ReferenceOr::Item(RequestBody {
                description: None,
                content: BTreeMap::from([(
                    mime.to_string(),
                    MediaType {
                        schema: Some(ReferenceOr::Item(form)),
                    },
                )]),
                required,
            }));
        }

        let mut responses = BTreeMap::new();
        for (code, response) in &op.responses {
            let upgraded = match response {
                ReferenceOr::Item(response) => {
                    ReferenceOr::Item(convert_response(response, &produces))
                }
                ReferenceOr::Reference { reference } => {
                    let name = reference
                        .strip_prefix("#/responses/")
                        .filter(|name| self.doc.responses.contains_key(*name))
                        .ok_or_else(|| {
                            ParseError::Conversion(format!(
                                "unresolved response reference {:?}",
                                reference
                            ))
                        })?;
                    ReferenceOr::reference(format!("#/components/responses/{}", name))
                }
            };
            responses.insert(code.clone(), upgraded);
        }

        Ok(Operation {
            operation_id: op.operation_id.clone(),
            summary: op.summary.clone(),
            description: op.description.clone(),
            tags: op.tags.clone(),
            parameters,
            request_body,
            responses,
        })
    }
}

/// Operation MIME types, falling back to the document's, then JSON
fn mime_types(own: Option<&[String]>, document: &[String]) -> Vec<String> {
    match own.filter(|m| !m.is_empty()) {
        Some(own) => own.to_vec(),
        None if !document.is_empty() => document.to_vec(),
        None => vec![DEFAULT_MIME.to_string()],
    }
}

fn convert_parameter(param: &SwaggerParameter) -> Parameter {
    Parameter {
        name: param.name.clone(),
        location: param.location.clone(),
        description: param.description.clone(),
        required: param.required,
        schema: Some(upgrade_schema(&ReferenceOr::Item(param.value_schema()))),
        extensions: param.vendor_extensions(),
    }
}

fn body_request(param: &SwaggerParameter, consumes: &[String]) -> RequestBody {
    let content = match &param.schema {
        Some(schema) => {
            let schema = upgrade_schema(schema);
            mime_types(Some(consumes), &[])
                .into_iter()
                .map(|mime| {
                    (
                        mime,
                        MediaType {
                            schema: Some(schema.clone()),
                        },
                    )
                })
                .collect()
        }
        None => BTreeMap::new(),
    };

    RequestBody {
        description: param.description.clone(),
        content,
        required: param.required,
    }
}

fn convert_response(response: &SwaggerResponse, produces: &[String]) -> Response {
    let content = match &response.schema {
        Some(schema) => {
            let schema = upgrade_schema(schema);
            mime_types(Some(produces), &[])
                .into_iter()
                .map(|mime| {
                    (
                        mime,
                        MediaType {
                            schema: Some(schema.clone()),
                        },
                    )
                })
                .collect()
        }
        None => BTreeMap::new(),
    };

    Response {
        description: response.description.clone(),
        content,
    }
}

/// Rewrite `#/definitions/` references and `x-nullable` throughout a schema
fn upgrade_schema(schema: &ReferenceOr<Schema>) -> ReferenceOr<Schema> {
    match schema {
        ReferenceOr::Reference { reference } => ReferenceOr::reference(
            match reference.strip_prefix("#/definitions/") {
                Some(name) => format!("#/components/schemas/{}", name),
                None => reference.clone(),
            },
        ),
        ReferenceOr::Item(schema) => {
            let mut schema = schema.clone();

            if let Some(nullable) = schema.extensions.remove("x-nullable") {
                schema.nullable |= nullable.as_bool().unwrap_or(false);
            }

            schema.properties = schema
                .properties
                .iter()
                .map(|(name, prop)| (name.clone(), upgrade_schema(prop)))
                .collect();
            schema.items = schema.items.as_deref().map(|items| Box::new(upgrade_schema(items)));
            schema.all_of = schema.all_of.iter().map(upgrade_schema).collect();

            ReferenceOr::Item(schema)
        }
    }
}
