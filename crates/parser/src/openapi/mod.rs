//! OpenAPI 3.x document model, validation and the top-level parser
//!
//! ## Usage
//! ```rust,ignore
//! use openapi_operator_gen_parser::OpenApiParser;
//!
//! let parsed = OpenApiParser::new()
//!     .with_root_kind("Petstore")
//!     .parse("https://petstore3.swagger.io/api/v3/openapi.json")?;
//!
//! for resource in &parsed.resources {
//!     println!("{} ({})", resource.name, resource.path);
//! }
//! ```

mod parser;
mod types;
mod validate;

pub use parser::{load_document, OpenApiParser};
pub use types::*;
pub use validate::{validate, validate_lenient};
