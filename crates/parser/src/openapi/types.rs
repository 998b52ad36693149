//! OpenAPI 3.x type definitions
//!
//! Simplified representation focusing on path classification. Swagger 2.0
//! documents are upgraded into these same types.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Reference chains longer than this are treated as unresolvable
const MAX_REF_DEPTH: usize = 16;

/// OpenAPI document root
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenApiSpec {
    /// OpenAPI version (e.g., "3.0.3")
    #[serde(default, deserialize_with = "string_or_number")]
    pub openapi: Option<String>,

    /// API metadata
    #[serde(default)]
    pub info: Info,

    /// Servers
    #[serde(default)]
    pub servers: Vec<Server>,

    /// API paths (endpoints); `None` when the key is absent
    #[serde(default)]
    pub paths: Option<BTreeMap<String, PathItem>>,

    /// Reusable components
    #[serde(default)]
    pub components: Option<Components>,
}

/// API information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: Option<String>,

    /// YAML documents often carry an unquoted `version: 1.0`
    #[serde(default, deserialize_with = "string_or_number")]
    pub version: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

/// Accept a string or a bare number for version-like fields
pub(crate) fn string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Repr>::deserialize(deserializer)?.map(|repr| match repr {
        Repr::Text(text) => text,
        Repr::Number(number) => number.to_string(),
    }))
}

/// Server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Either a `$ref` or an inline value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceOr<T> {
    /// Reference to a component
    Reference {
        #[serde(rename = "$ref")]
        reference: String,
    },

    /// Inline value
    Item(T),
}

impl<T> ReferenceOr<T> {
    pub fn reference(reference: impl Into<String>) -> Self {
        ReferenceOr::Reference {
            reference: reference.into(),
        }
    }

    /// The `$ref` string, if this is a reference
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            ReferenceOr::Reference { reference } => Some(reference),
            ReferenceOr::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&T> {
        match self {
            ReferenceOr::Item(item) => Some(item),
            ReferenceOr::Reference { .. } => None,
        }
    }
}

/// Path item (operations for a path)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,

    /// Parameters shared by every operation on the path
    #[serde(default)]
    pub parameters: Vec<ReferenceOr<Parameter>>,
}

impl PathItem {
    /// Every operation on the path, including HEAD and OPTIONS
    pub fn all_operations(&self) -> impl Iterator<Item = &Operation> {
        [
            &self.get,
            &self.post,
            &self.put,
            &self.delete,
            &self.patch,
            &self.head,
            &self.options,
        ]
        .into_iter()
        .flatten()
    }
}

/// HTTP operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId", default)]
    pub operation_id: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Tags (for grouping and filtering)
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub parameters: Vec<ReferenceOr<Parameter>>,

    #[serde(rename = "requestBody", default)]
    pub request_body: Option<ReferenceOr<RequestBody>>,

    /// Responses keyed by status code
    #[serde(default)]
    pub responses: BTreeMap<String, ReferenceOr<Response>>,
}

/// Parameter definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    /// Location: query, header, path, cookie
    #[serde(rename = "in")]
    pub location: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub schema: Option<ReferenceOr<Schema>>,

    /// Remaining keys, including `x-*` vendor extensions
    #[serde(flatten)]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl Parameter {
    /// String value of a vendor extension
    pub fn extension_str(&self, key: &str) -> Option<&str> {
        self.extensions.get(key).and_then(|v| v.as_str())
    }
}

/// Request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub description: Option<String>,

    /// Media types keyed by content type
    #[serde(default)]
    pub content: BTreeMap<String, MediaType>,

    #[serde(default)]
    pub required: bool,
}

/// Response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub content: BTreeMap<String, MediaType>,
}

/// Media type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Option<ReferenceOr<Schema>>,
}

/// `type` of a schema
///
/// OpenAPI 3.1 allows a list of type names; 3.0 and Swagger 2.0 use a
/// single string. Both forms deserialize into the list form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Types(pub Vec<String>);

impl Types {
    pub fn single(name: &str) -> Self {
        Types(vec![name.to_string()])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|t| t == name)
    }

    /// First type name other than `null`
    pub fn primary(&self) -> Option<&str> {
        self.0
            .iter()
            .map(String::as_str)
            .find(|t| *t != "null")
    }
}

impl<'de> Deserialize<'de> for Types {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(String),
            Many(Vec<String>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::One(name) => Types(vec![name]),
            Repr::Many(names) => Types(names),
        })
    }
}

/// Schema definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Type: string, number, integer, boolean, array, object
    #[serde(rename = "type", default, skip_serializing_if = "Types::is_empty")]
    pub schema_type: Types,

    /// Format (e.g., int32, int64, date-time, binary)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Properties (for object type)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, ReferenceOr<Schema>>,

    /// Required properties
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Items schema (for array type)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ReferenceOr<Schema>>>,

    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<ReferenceOr<Schema>>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,

    #[serde(rename = "minLength", default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    #[serde(rename = "maxLength", default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(rename = "minItems", default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    #[serde(rename = "maxItems", default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    /// Extensions (x-*, etc.)
    #[serde(flatten)]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

/// Reusable components
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: BTreeMap<String, ReferenceOr<Schema>>,

    #[serde(default)]
    pub parameters: BTreeMap<String, ReferenceOr<Parameter>>,

    #[serde(rename = "requestBodies", default)]
    pub request_bodies: BTreeMap<String, ReferenceOr<RequestBody>>,

    #[serde(default)]
    pub responses: BTreeMap<String, ReferenceOr<Response>>,
}

/// Split a local reference into its component section and name
///
/// e.g., "#/components/schemas/Pet" -> ("schemas", "Pet")
pub fn parse_component_ref(reference: &str) -> Option<(&str, String)> {
    let rest = reference.strip_prefix("#/components/")?;
    let (section, name) = rest.split_once('/')?;
    if name.is_empty() || name.contains('/') {
        return None;
    }

    // JSON pointer escapes
    Some((section, name.replace("~1", "/").replace("~0", "~")))
}

/// Last segment of a reference's fragment
///
/// e.g., "#/components/schemas/Pet" -> "Pet"; references without a
/// fragment yield an empty string.
pub fn ref_name(reference: &str) -> String {
    match reference.split_once('#') {
        Some((_, fragment)) => fragment
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string(),
        None => String::new(),
    }
}

impl OpenApiSpec {
    /// Get a schema by reference path
    /// e.g., "#/components/schemas/Pod" -> returns Pod schema
    pub fn resolve_schema_ref(&self, reference: &str) -> Option<&Schema> {
        self.follow(reference, |c| &c.schemas, "schemas")
    }

    /// Resolve an inline-or-referenced schema
    pub fn resolve_schema<'a>(&'a self, schema: &'a ReferenceOr<Schema>) -> Option<&'a Schema> {
        match schema {
            ReferenceOr::Item(item) => Some(item),
            ReferenceOr::Reference { reference } => self.resolve_schema_ref(reference),
        }
    }

    pub fn resolve_parameter<'a>(
        &'a self,
        parameter: &'a ReferenceOr<Parameter>,
    ) -> Option<&'a Parameter> {
        match parameter {
            ReferenceOr::Item(item) => Some(item),
            ReferenceOr::Reference { reference } => {
                self.follow(reference, |c| &c.parameters, "parameters")
            }
        }
    }

    pub fn resolve_request_body<'a>(
        &'a self,
        body: &'a ReferenceOr<RequestBody>,
    ) -> Option<&'a RequestBody> {
        match body {
            ReferenceOr::Item(item) => Some(item),
            ReferenceOr::Reference { reference } => {
                self.follow(reference, |c| &c.request_bodies, "requestBodies")
            }
        }
    }

    pub fn resolve_response<'a>(
        &'a self,
        response: &'a ReferenceOr<Response>,
    ) -> Option<&'a Response> {
        match response {
            ReferenceOr::Item(item) => Some(item),
            ReferenceOr::Reference { reference } => {
                self.follow(reference, |c| &c.responses, "responses")
            }
        }
    }

    /// Follow a reference chain inside one component section
    fn follow<'a, T>(
        &'a self,
        reference: &str,
        section: impl Fn(&'a Components) -> &'a BTreeMap<String, ReferenceOr<T>>,
        section_name: &str,
    ) -> Option<&'a T> {
        let components = self.components.as_ref()?;
        let map = section(components);
        let mut current = reference.to_string();

        for _ in 0..MAX_REF_DEPTH {
            let (found_section, name) = parse_component_ref(&current)?;
            if found_section != section_name {
                return None;
            }
            match map.get(&name)? {
                ReferenceOr::Item(item) => return Some(item),
                ReferenceOr::Reference { reference } => current = reference.clone(),
            }
        }

        None
    }
}
