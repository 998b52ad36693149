//! OpenAPI spec parser

use super::types::OpenApiSpec;
use super::validate::{validate, validate_lenient};
use crate::classifier::{ClassificationReport, Classifier};
use crate::loader::{detect_spec_version, read_spec, SpecVersion};
use crate::observer::{ClassificationObserver, NoopObserver};
use crate::schema::convert_schema;
use crate::swagger::{load_swagger2, stringify_yaml_keys};
use openapi_operator_gen_common::{ParseError, ParsedSpec, PathFilter, Result};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// OpenAPI specification parser
///
/// Reads OpenAPI 3.x or Swagger 2.0 documents (JSON or YAML, from a file or
/// URL) and classifies their paths into resources, query endpoints and
/// action endpoints.
///
/// # Example
/// ```rust,ignore
/// let parsed = OpenApiParser::new()
///     .with_root_kind("Petstore")
///     .parse("petstore.yaml")?;
/// ```
pub struct OpenApiParser {
    /// Kind used for the root path `/`
    root_kind: Option<String>,

    filter: Option<Box<dyn PathFilter + Send + Sync>>,
}

impl Default for OpenApiParser {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenApiParser {
    pub fn new() -> Self {
        Self {
            root_kind: None,
            filter: None,
        }
    }

    /// Set the Kind for the root path; an empty string leaves it unset
    pub fn with_root_kind(mut self, root_kind: impl Into<String>) -> Self {
        let root_kind = root_kind.into();
        self.root_kind = (!root_kind.is_empty()).then_some(root_kind);
        self
    }

    /// Restrict classification to paths and operations the filter accepts
    pub fn with_filter(mut self, filter: Box<dyn PathFilter + Send + Sync>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Parse a spec from a file path or `http(s)://` URL
    pub fn parse(&self, spec: &str) -> Result<ParsedSpec> {
        self.parse_with_report(spec).map(|(parsed, _)| parsed)
    }

    /// Parse a spec held in memory
    pub fn parse_bytes(&self, data: &[u8]) -> Result<ParsedSpec> {
        self.parse_bytes_with_report(data).map(|(parsed, _)| parsed)
    }

    /// Parse a spec and return the per-path classification outcomes alongside
    pub fn parse_with_report(&self, spec: &str) -> Result<(ParsedSpec, ClassificationReport)> {
        self.parse_observed(spec, &mut NoopObserver)
    }

    pub fn parse_bytes_with_report(
        &self,
        data: &[u8],
    ) -> Result<(ParsedSpec, ClassificationReport)> {
        self.parse_bytes_observed(data, &mut NoopObserver)
    }

    /// Parse a spec, reporting each classified path to `observer`
    ///
    /// The observer only sees progress; it never changes the results.
    pub fn parse_observed(
        &self,
        spec: &str,
        observer: &mut dyn ClassificationObserver,
    ) -> Result<(ParsedSpec, ClassificationReport)> {
        info!("Loading OpenAPI spec from {}", spec);
        let data = read_spec(spec)?;
        self.parse_bytes_observed(&data, observer)
    }

    pub fn parse_bytes_observed(
        &self,
        data: &[u8],
        observer: &mut dyn ClassificationObserver,
    ) -> Result<(ParsedSpec, ClassificationReport)> {
        let doc = load_document(data)?;
        Ok(self.build(&doc, observer))
    }

    fn build(
        &self,
        doc: &OpenApiSpec,
        observer: &mut dyn ClassificationObserver,
    ) -> (ParsedSpec, ClassificationReport) {
        let filter = self.filter.as_deref().map(|f| f as &dyn PathFilter);
        let classified = Classifier::new(doc)
            .with_root_kind(self.root_kind.as_deref())
            .with_filter(filter)
            .classify(observer);

        let schemas: BTreeMap<_, _> = doc
            .components
            .iter()
            .flat_map(|components| &components.schemas)
            .filter_map(|(name, schema)| {
                convert_schema(doc, name, schema).map(|converted| (name.clone(), converted))
            })
            .collect();

        info!(
            "Classified {} resources, {} query endpoints, {} action endpoints",
            classified.resources.len(),
            classified.query_endpoints.len(),
            classified.action_endpoints.len()
        );

        let parsed = ParsedSpec {
            title: doc.info.title.clone().unwrap_or_default(),
            version: doc.info.version.clone().unwrap_or_default(),
            description: doc.info.description.clone(),
            base_url: doc.servers.first().map(|server| server.url.clone()),
            resources: classified.resources,
            query_endpoints: classified.query_endpoints,
            action_endpoints: classified.action_endpoints,
            schemas,
        };

        (parsed, classified.report)
    }
}

/// Deserialize and validate a document of either version
///
/// Swagger 2.0 input is upgraded first and only checked for a `paths` map.
pub fn load_document(data: &[u8]) -> Result<OpenApiSpec> {
    match detect_spec_version(data) {
        SpecVersion::Swagger2 => {
            info!("Detected Swagger 2.0 specification, converting to OpenAPI 3.0");
            let doc = load_swagger2(data)?;
            validate_lenient(&doc)?;
            Ok(doc)
        }
        SpecVersion::OpenApi3 => {
            let doc = parse_openapi3(data)?;
            validate(&doc)?;
            Ok(doc)
        }
    }
}

fn parse_openapi3(data: &[u8]) -> Result<OpenApiSpec> {
    if let Ok(doc) = serde_json::from_slice::<OpenApiSpec>(data) {
        return Ok(doc);
    }

    debug!("OpenAPI document is not plain JSON, reading as YAML");
    let yaml: serde_yaml::Value = serde_yaml::from_slice(data)?;
    serde_json::from_value(stringify_yaml_keys(yaml)).map_err(ParseError::OpenApi)
}
