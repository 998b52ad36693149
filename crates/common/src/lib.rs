//! Common types and utilities for openapi-operator-gen
//!
//! This crate contains the parsed intermediate representation (`ParsedSpec`)
//! handed to the CRD mapper, the error taxonomy shared by every parsing
//! stage, and the path/tag/operation filters supplied by callers.

mod config;
mod filter;
mod value;

pub use config::{derive_root_kind, is_version_like, ParserConfig, CONFIG_FILE_NAMES};
pub use filter::{match_operation_id, match_path, FilterConfig, GlobPathFilter, PathFilter};
pub use value::Value;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while loading and parsing an API description
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read spec {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch spec from URL: {0}")]
    Fetch(String),

    #[error("Failed to fetch spec from {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to parse spec as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to convert YAML to JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse Swagger 2.0 spec: {0}")]
    Swagger2(#[source] serde_json::Error),

    #[error("Failed to parse OpenAPI spec: {0}")]
    OpenApi(#[source] serde_json::Error),

    #[error("Failed to convert Swagger 2.0 to OpenAPI 3.0: {0}")]
    Conversion(String),

    #[error("Invalid OpenAPI spec: {0}")]
    Validation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// HTTP methods that take part in classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// All methods in display order
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter is carried in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParamLocation {
    /// Parse an OpenAPI `in` value
    pub fn parse(location: &str) -> Option<Self> {
        match location {
            "path" => Some(ParamLocation::Path),
            "query" => Some(ParamLocation::Query),
            "header" => Some(ParamLocation::Header),
            "cookie" => Some(ParamLocation::Cookie),
            _ => None,
        }
    }
}

/// Root output of a single parse
///
/// Built once per parse and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSpec {
    /// API title (`info.title`)
    pub title: String,

    /// API version (`info.version`)
    pub version: String,

    /// API description
    pub description: Option<String>,

    /// URL of the first server entry
    pub base_url: Option<String>,

    /// CRUD resources, sorted by name
    pub resources: Vec<Resource>,

    /// GET-only query endpoints, in path order
    pub query_endpoints: Vec<QueryEndpoint>,

    /// One-shot action endpoints, in path order
    pub action_endpoints: Vec<ActionEndpoint>,

    /// Converted component schemas
    pub schemas: BTreeMap<String, Schema>,
}

impl ParsedSpec {
    /// Find a resource by Kind name
    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Find a query endpoint by name
    pub fn query_endpoint(&self, name: &str) -> Option<&QueryEndpoint> {
        self.query_endpoints.iter().find(|q| q.name == name)
    }

    /// Find an action endpoint by name
    pub fn action_endpoint(&self, name: &str) -> Option<&ActionEndpoint> {
        self.action_endpoints.iter().find(|a| a.name == name)
    }
}

/// A REST entity with create/read/update/delete semantics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Singular PascalCase Kind name (e.g., "Pet")
    pub name: String,

    /// Plural form of the name (e.g., "Pets")
    pub plural_name: String,

    /// Base collection path (e.g., "/pet")
    pub path: String,

    /// At most one operation per HTTP method
    pub operations: Vec<Operation>,

    /// Body shape from the first POST/PUT request body
    pub schema: Option<Schema>,

    /// Description
    pub description: Option<String>,
}

impl Resource {
    /// Get the operation for an HTTP method
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        self.operations.iter().find(|op| op.method == method)
    }

    /// HTTP methods exposed by this resource
    pub fn methods(&self) -> Vec<HttpMethod> {
        self.operations.iter().map(|op| op.method).collect()
    }
}

/// An HTTP operation contributing to a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub method: HttpMethod,
    pub path: String,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub request_body: Option<Schema>,
    pub response_body: Option<Schema>,
    pub path_params: Vec<Parameter>,
    pub query_params: Vec<Parameter>,
}

/// A GET-only path with no CRUD semantics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEndpoint {
    /// e.g., "PetFindByTagsQuery"
    pub name: String,

    /// e.g., "findPetsByTags"
    pub operation_id: Option<String>,

    /// e.g., "/pet/findByTags"
    pub path: String,

    /// e.g., "/pet"
    pub base_path: String,

    /// Trailing path segment (e.g., "findByTags")
    pub operation: String,

    pub summary: Option<String>,
    pub description: Option<String>,
    pub path_params: Vec<Parameter>,
    pub query_params: Vec<Parameter>,
    pub response_schema: Option<Schema>,

    /// Component name when the response is, or is an array of, a `$ref`
    pub response_schema_ref: Option<String>,

    pub response_is_array: bool,
}

/// A one-shot operation (e.g., POST `/pet/{petId}/uploadImage`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEndpoint {
    /// e.g., "PetUploadImageAction"
    pub name: String,

    /// e.g., "uploadFile"
    pub operation_id: Option<String>,

    /// e.g., "/pet/{petId}/uploadImage"
    pub path: String,

    /// e.g., "Pet"; `None` for single-segment actions
    pub parent_resource: Option<String>,

    /// e.g., "petId"
    pub parent_id_param: Option<String>,

    /// OpenAPI type of the parent ID parameter (e.g., "integer")
    pub parent_id_type: Option<String>,

    /// e.g., "uploadImage"
    pub action_name: String,

    pub http_method: HttpMethod,
    pub summary: Option<String>,
    pub description: Option<String>,

    /// Path parameters, excluding the parent ID
    pub path_params: Vec<Parameter>,
    pub query_params: Vec<Parameter>,
    pub request_schema: Option<Schema>,
    pub response_schema: Option<Schema>,

    /// Request body is `application/octet-stream` or multipart with a binary part
    pub has_binary_body: bool,
    pub binary_content_type: Option<String>,
}

/// An API parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub location: ParamLocation,
    pub required: bool,

    /// OpenAPI type; array query parameters use `array:<item type>`
    pub param_type: Option<String>,
    pub description: Option<String>,

    /// Value of `x-k8s-id-field`: the body field this path parameter merges into
    pub id_field_ref: Option<String>,
}

/// Recursive schema tree
///
/// Validation bounds are `None` when the source does not set them, so a
/// zero bound is distinguishable from an absent one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,

    /// Declared type, or inferred from `properties`/`items`
    #[serde(rename = "type")]
    pub schema_type: Option<String>,
    pub format: Option<String>,
    pub description: Option<String>,
    pub required: Vec<String>,
    pub properties: BTreeMap<String, Schema>,
    pub items: Option<Box<Schema>>,

    /// Component name this node was referenced through
    #[serde(rename = "ref")]
    pub ref_name: Option<String>,

    #[serde(rename = "enum")]
    pub enum_values: Vec<Value>,
    pub default: Option<Value>,
    pub nullable: bool,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub pattern: Option<String>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

impl Schema {
    /// Whether a property is listed as required
    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
        assert_eq!(
            serde_json::to_string(&HttpMethod::Patch).unwrap(),
            "\"PATCH\""
        );
    }

    #[test]
    fn test_param_location_parse() {
        assert_eq!(ParamLocation::parse("path"), Some(ParamLocation::Path));
        assert_eq!(ParamLocation::parse("query"), Some(ParamLocation::Query));
        assert_eq!(ParamLocation::parse("body"), None);
    }

    #[test]
    fn test_resource_operation_lookup() {
        let resource = Resource {
            name: "Pet".to_string(),
            plural_name: "Pets".to_string(),
            path: "/pet".to_string(),
            operations: vec![Operation {
                method: HttpMethod::Post,
                path: "/pet".to_string(),
                operation_id: Some("addPet".to_string()),
                summary: None,
                request_body: None,
                response_body: None,
                path_params: vec![],
                query_params: vec![],
            }],
            schema: None,
            description: None,
        };

        assert!(resource.operation(HttpMethod::Post).is_some());
        assert!(resource.operation(HttpMethod::Get).is_none());
        assert_eq!(resource.methods(), vec![HttpMethod::Post]);
    }

    #[test]
    fn test_error_messages_identify_stage() {
        let err = ParseError::HttpStatus {
            url: "https://example.com/openapi.yaml".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch spec from https://example.com/openapi.yaml: HTTP 404"
        );

        let err = ParseError::Validation("no paths defined".to_string());
        assert_eq!(err.to_string(), "Invalid OpenAPI spec: no paths defined");
    }
}
