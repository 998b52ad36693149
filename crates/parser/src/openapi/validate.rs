//! Structural validation of OpenAPI 3.x documents
//!
//! Only what classification depends on is checked: required top-level
//! fields, path keys, and that every `$ref` points at an existing local
//! component. Example values are never validated.

use super::types::{
    parse_component_ref, MediaType, OpenApiSpec, Operation, Parameter, ReferenceOr, RequestBody,
    Response, Schema,
};
use openapi_operator_gen_common::{ParseError, Result};

/// Strict validation for native OpenAPI 3.x input
pub fn validate(spec: &OpenApiSpec) -> Result<()> {
    match spec.openapi.as_deref() {
        None => return Err(invalid("missing openapi version field")),
        Some(version) if !version.starts_with("3.") => {
            return Err(invalid(format!("unsupported openapi version {:?}", version)))
        }
        Some(_) => {}
    }

    if spec.info.title.is_none() {
        return Err(invalid("info.title is required"));
    }
    if spec.info.version.is_none() {
        return Err(invalid("info.version is required"));
    }

    let paths = spec
        .paths
        .as_ref()
        .ok_or_else(|| invalid("no paths defined"))?;

    let refs = RefChecker { spec };

    for (path, item) in paths {
        if !path.starts_with('/') {
            return Err(invalid(format!("path {:?} must start with '/'", path)));
        }

        for param in &item.parameters {
            refs.parameter(param)?;
        }
        for op in item.all_operations() {
            refs.operation(op)
                .map_err(|e| annotate(e, &format!("path {}", path)))?;
        }
    }

    if let Some(components) = &spec.components {
        for (name, schema) in &components.schemas {
            refs.schema(schema)
                .map_err(|e| annotate(e, &format!("schema {}", name)))?;
        }
        for param in components.parameters.values() {
            refs.parameter(param)?;
        }
        for body in components.request_bodies.values() {
            refs.request_body(body)?;
        }
        for response in components.responses.values() {
            refs.response(response)?;
        }
    }

    Ok(())
}

/// Lenient validation for documents upgraded from Swagger 2.0
///
/// Converted documents routinely carry incomplete response definitions, so
/// only the presence of the path map is required.
pub fn validate_lenient(spec: &OpenApiSpec) -> Result<()> {
    match spec.paths {
        Some(_) => Ok(()),
        None => Err(invalid("no paths defined")),
    }
}

fn invalid(message: impl Into<String>) -> ParseError {
    ParseError::Validation(message.into())
}

fn annotate(err: ParseError, context: &str) -> ParseError {
    match err {
        ParseError::Validation(msg) => ParseError::Validation(format!("{}: {}", context, msg)),
        other => other,
    }
}

struct RefChecker<'a> {
    spec: &'a OpenApiSpec,
}

impl RefChecker<'_> {
    /// A reference must be local and name an existing component of `section`
    fn check(&self, reference: &str, section: &str) -> Result<()> {
        if !reference.starts_with('#') {
            return Err(invalid(format!(
                "external reference {:?} is not supported",
                reference
            )));
        }

        let exists = match parse_component_ref(reference) {
            Some((found, name)) if found == section => {
                self.spec.components.as_ref().is_some_and(|c| match section {
                    "schemas" => c.schemas.contains_key(&name),
                    "parameters" => c.parameters.contains_key(&name),
                    "requestBodies" => c.request_bodies.contains_key(&name),
                    "responses" => c.responses.contains_key(&name),
                    _ => false,
                })
            }
            _ => false,
        };

        if exists {
            Ok(())
        } else {
            Err(invalid(format!("unresolved reference {:?}", reference)))
        }
    }

    fn operation(&self, op: &Operation) -> Result<()> {
        for param in &op.parameters {
            self.parameter(param)?;
        }
        if let Some(body) = &op.request_body {
            self.request_body(body)?;
        }
        for response in op.responses.values() {
            self.response(response)?;
        }
        Ok(())
    }

    fn parameter(&self, param: &ReferenceOr<Parameter>) -> Result<()> {
        match param {
            ReferenceOr::Reference { reference } => self.check(reference, "parameters"),
            ReferenceOr::Item(param) => match &param.schema {
                Some(schema) => self.schema(schema),
                None => Ok(()),
            },
        }
    }

    fn request_body(&self, body: &ReferenceOr<RequestBody>) -> Result<()> {
        match body {
            ReferenceOr::Reference { reference } => self.check(reference, "requestBodies"),
            ReferenceOr::Item(body) => self.content(body.content.values()),
        }
    }

    fn response(&self, response: &ReferenceOr<Response>) -> Result<()> {
        match response {
            ReferenceOr::Reference { reference } => self.check(reference, "responses"),
            ReferenceOr::Item(response) => self.content(response.content.values()),
        }
    }

    fn content<'m>(&self, media: impl Iterator<Item = &'m MediaType>) -> Result<()> {
        for media_type in media {
            if let Some(schema) = &media_type.schema {
                self.schema(schema)?;
            }
        }
        Ok(())
    }

    fn schema(&self, schema: &ReferenceOr<Schema>) -> Result<()> {
        let schema = match schema {
            ReferenceOr::Reference { reference } => return self.check(reference, "schemas"),
            ReferenceOr::Item(schema) => schema,
        };

        for prop in schema.properties.values() {
            self.schema(prop)?;
        }
        if let Some(items) = &schema.items {
            self.schema(items)?;
        }
        for member in &schema.all_of {
            self.schema(member)?;
        }
        Ok(())
    }
}
