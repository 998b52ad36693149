//! OpenAPI parsing for Kubernetes operator generation
//!
//! This crate turns an OpenAPI 3.x or Swagger 2.0 document into the
//! intermediate representation (`ParsedSpec`) consumed by the CRD mapper.
//!
//! ## Parsing Strategy
//!
//! 1. Load the document from a file or URL ([`loader`])
//! 2. Upgrade Swagger 2.0 input to OpenAPI 3.0 ([`swagger`])
//! 3. Validate and classify every path ([`classifier`]):
//!    - `/pet` + `/pet/{petId}` → Resource `Pet`
//!    - `/pet/findByStatus` (GET only) → QueryEndpoint `PetFindByStatusQuery`
//!    - `/pet/{petId}/uploadImage` (POST) → ActionEndpoint `PetUploadImageAction`
//! 4. Convert component schemas into IR schema trees ([`schema`])

pub mod classifier;
pub mod loader;
pub mod naming;
pub mod observer;
pub mod openapi;
pub mod schema;
pub mod swagger;

pub use classifier::{ClassificationReport, Classified, Classifier};
pub use observer::{
    Classification, ClassificationObserver, ClassificationRow, FilterReason, NoopObserver,
    TableObserver, TracingObserver,
};
pub use openapi::OpenApiParser;
pub use schema::convert_schema;

use openapi_operator_gen_common::{ParsedSpec, Result};

/// Parse a spec from a file path or URL with default settings
pub fn parse_spec(spec: &str) -> Result<ParsedSpec> {
    OpenApiParser::new().parse(spec)
}
