//! Spec loading and version detection

use openapi_operator_gen_common::{ParseError, Result};
use std::fs;
use std::io::Read;
use tracing::debug;

/// Dialect of an API description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecVersion {
    /// Swagger 2.0, upgraded before classification
    Swagger2,

    /// OpenAPI 3.0 / 3.1
    OpenApi3,
}

/// Whether a spec location is an `http://` or `https://` URL
pub fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Read the raw spec from a local path or URL
///
/// URLs are fetched once; any non-2xx status is an error.
pub fn read_spec(location: &str) -> Result<Vec<u8>> {
    if is_url(location) {
        return fetch_url(location);
    }

    debug!("Reading spec from file {}", location);
    fs::read(location).map_err(|e| ParseError::Io {
        path: location.to_string(),
        source: e,
    })
}

fn fetch_url(url: &str) -> Result<Vec<u8>> {
    debug!("Fetching spec from {}", url);

    let response = match ureq::get(url).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(status, _)) => {
            return Err(ParseError::HttpStatus {
                url: url.to_string(),
                status,
            })
        }
        Err(e) => return Err(ParseError::Fetch(e.to_string())),
    };

    // ureq only treats 4xx/5xx as errors
    let status = response.status();
    if !(200..300).contains(&status) {
        return Err(ParseError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    let mut body = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut body)
        .map_err(|e| ParseError::Io {
            path: url.to_string(),
            source: e,
        })?;

    Ok(body)
}

/// Sniff the dialect from the raw bytes
///
/// A `"swagger"` JSON key or a `swagger:` YAML key means Swagger 2.0.
pub fn detect_spec_version(data: &[u8]) -> SpecVersion {
    if contains(data, br#""swagger""#) || contains(data, b"swagger:") {
        SpecVersion::Swagger2
    } else {
        SpecVersion::OpenApi3
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window == needle)
}
