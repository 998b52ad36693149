//! Swagger 2.0 support
//!
//! Swagger 2.0 documents are normalized and upgraded to the OpenAPI 3.0
//! model before classification:
//!
//! 1. JSON is deserialized directly into [`Swagger2Spec`]
//! 2. Anything else is read as YAML, map keys are stringified and bare
//!    `type` strings are wrapped into lists
//! 3. The typed document is upgraded with [`upgrade`]

mod converter;
mod normalize;
mod types;

pub use converter::upgrade;
pub use normalize::{normalize_type_fields, stringify_yaml_keys};
pub use types::*;

use crate::openapi::OpenApiSpec;
use openapi_operator_gen_common::{ParseError, Result};
use tracing::debug;

/// Deserialize a Swagger 2.0 document from JSON or YAML bytes
pub fn parse_swagger2(data: &[u8]) -> Result<Swagger2Spec> {
    if let Ok(doc) = serde_json::from_slice::<Swagger2Spec>(data) {
        return Ok(doc);
    }

    debug!("Swagger 2.0 document is not plain JSON, reading as YAML");
    let yaml: serde_yaml::Value = serde_yaml::from_slice(data)?;
    let mut json = stringify_yaml_keys(yaml);
    normalize_type_fields(&mut json);

    serde_json::from_value(json).map_err(ParseError::Swagger2)
}

/// Parse and upgrade a Swagger 2.0 document
pub fn load_swagger2(data: &[u8]) -> Result<OpenApiSpec> {
    let doc = parse_swagger2(data)?;
    upgrade(&doc)
}
