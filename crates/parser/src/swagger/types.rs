//! Swagger 2.0 type definitions
//!
//! Only the parts that survive the upgrade to OpenAPI 3.0 are modeled.
//! Schema objects are shared with the OpenAPI 3 model.

use crate::openapi::{string_or_number, Info, ReferenceOr, Schema, Types};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Swagger 2.0 document root
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Swagger2Spec {
    /// Always "2.0"
    #[serde(default, deserialize_with = "string_or_number")]
    pub swagger: Option<String>,

    #[serde(default)]
    pub info: Info,

    /// e.g., "petstore.swagger.io"
    #[serde(default)]
    pub host: Option<String>,

    /// e.g., "/v2"
    #[serde(rename = "basePath", default)]
    pub base_path: Option<String>,

    /// http, https, ws, wss
    #[serde(default)]
    pub schemes: Vec<String>,

    /// Default request MIME types
    #[serde(default)]
    pub consumes: Vec<String>,

    /// Default response MIME types
    #[serde(default)]
    pub produces: Vec<String>,

    #[serde(default)]
    pub paths: Option<BTreeMap<String, PathItem>>,

    #[serde(default)]
    pub definitions: BTreeMap<String, ReferenceOr<Schema>>,

    /// Global parameters, referenced as `#/parameters/<name>`
    #[serde(default)]
    pub parameters: BTreeMap<String, Parameter>,

    /// Global responses, referenced as `#/responses/<name>`
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
}

/// Path item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub get: Option<Operation>,

    #[serde(default)]
    pub put: Option<Operation>,

    #[serde(default)]
    pub post: Option<Operation>,

    #[serde(default)]
    pub delete: Option<Operation>,

    #[serde(default)]
    pub patch: Option<Operation>,

    #[serde(default)]
    pub head: Option<Operation>,

    #[serde(default)]
    pub options: Option<Operation>,

    #[serde(default)]
    pub parameters: Vec<ReferenceOr<Parameter>>,
}

/// Operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId", default)]
    pub operation_id: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Overrides the document-level `consumes`
    #[serde(default)]
    pub consumes: Option<Vec<String>>,

    /// Overrides the document-level `produces`
    #[serde(default)]
    pub produces: Option<Vec<String>>,

    #[serde(default)]
    pub parameters: Vec<ReferenceOr<Parameter>>,

    #[serde(default)]
    pub responses: BTreeMap<String, ReferenceOr<Response>>,
}

/// Parameter
///
/// `body` parameters carry a `schema`; all other locations describe the
/// value inline with `type`/`format`/`items`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    /// query, header, path, formData, body
    #[serde(rename = "in")]
    pub location: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    /// Body schema
    #[serde(default)]
    pub schema: Option<ReferenceOr<Schema>>,

    #[serde(rename = "type", default)]
    pub param_type: Types,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub items: Option<Box<ReferenceOr<Schema>>>,

    #[serde(rename = "enum", default)]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(default)]
    pub default: Option<serde_json::Value>,

    #[serde(default)]
    pub minimum: Option<f64>,

    #[serde(default)]
    pub maximum: Option<f64>,

    #[serde(rename = "minLength", default)]
    pub min_length: Option<u64>,

    #[serde(rename = "maxLength", default)]
    pub max_length: Option<u64>,

    #[serde(default)]
    pub pattern: Option<String>,

    #[serde(rename = "minItems", default)]
    pub min_items: Option<u64>,

    #[serde(rename = "maxItems", default)]
    pub max_items: Option<u64>,

    /// Remaining keys, including `x-*` vendor extensions
    #[serde(flatten)]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl Parameter {
    pub fn is_body(&self) -> bool {
        self.location == "body"
    }

    pub fn is_form_data(&self) -> bool {
        self.location == "formData"
    }

    /// Inline value description as a schema
    ///
    /// `type: file` becomes a binary string.
    pub fn value_schema(&self) -> Schema {
        let (schema_type, format) = if self.param_type.contains("file") {
            (Types::single("string"), Some("binary".to_string()))
        } else {
            (self.param_type.clone(), self.format.clone())
        };

        Schema {
            schema_type,
            format,
            description: self.description.clone(),
            items: self.items.clone(),
            enum_values: self.enum_values.clone(),
            default: self.default.clone(),
            minimum: self.minimum,
            maximum: self.maximum,
            min_length: self.min_length,
            max_length: self.max_length,
            pattern: self.pattern.clone(),
            min_items: self.min_items,
            max_items: self.max_items,
            ..Default::default()
        }
    }

    /// `x-*` vendor extensions
    pub fn vendor_extensions(&self) -> BTreeMap<String, serde_json::Value> {
        self.extensions
            .iter()
            .filter(|(key, _)| key.starts_with("x-"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// Response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub schema: Option<ReferenceOr<Schema>>,
}
