//! Parser configuration loaded from YAML files
//!
//! Callers may keep the spec location, the root Kind and the filter lists in
//! a `.openapi-operator-gen.yaml` file instead of passing them as flags.

use crate::{FilterConfig, ParseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File names searched by [`ParserConfig::find`], in order
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    ".openapi-operator-gen.yaml",
    ".openapi-operator-gen.yml",
    "openapi-operator-gen.yaml",
    "openapi-operator-gen.yml",
];

const EXAMPLE_CONFIG: &str = r#"# openapi-operator-gen configuration file
# All options can be overridden by CLI flags

# OpenAPI specification path or URL
spec: ./api/openapi.yaml

# Kind name for the root "/" endpoint (derived from the spec file name if not set)
# rootKind: MyApp

# Path, tag, and operation filtering
filters:
  # Only include paths matching these patterns (glob supported)
  includePaths: []
    # - /users
    # - /pets/*

  # Exclude paths matching these patterns
  excludePaths: []
    # - /internal/*

  # Only include endpoints with these OpenAPI tags
  includeTags: []
    # - public

  # Exclude endpoints with these OpenAPI tags
  excludeTags: []
    # - deprecated

  # Only include operations with these operationIds (glob supported)
  includeOperations: []
    # - getPet*

  # Exclude operations with these operationIds
  excludeOperations: []
    # - "*Deprecated"
"#;

/// Root structure of the configuration file
///
/// Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserConfig {
    /// Path or URL of the API description
    #[serde(default)]
    pub spec: Option<String>,

    /// Kind name for the root "/" endpoint
    #[serde(default)]
    pub root_kind: Option<String>,

    /// Path, tag and operation filters
    #[serde(default)]
    pub filters: Option<FilterConfig>,
}

impl ParserConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ParseError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_yaml(&content).map_err(|e| match e {
            ParseError::Config(msg) => {
                ParseError::Config(format!("{} (in {})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file is a valid, empty configuration
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(yaml)
            .map_err(|e| ParseError::Config(format!("Failed to parse config YAML: {}", e)))
    }

    /// Find the first configuration file present in `dir`
    pub fn find(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Commented example configuration
    pub fn example() -> &'static str {
        EXAMPLE_CONFIG
    }

    /// Write the example configuration, refusing to overwrite a file
    pub fn write_example(path: &Path) -> Result<()> {
        if path.exists() {
            return Err(ParseError::Config(format!(
                "config file already exists: {}",
                path.display()
            )));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ParseError::Io {
                    path: parent.display().to_string(),
                    source: e,
                })?;
            }
        }

        fs::write(path, EXAMPLE_CONFIG).map_err(|e| ParseError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Explicit `rootKind`, or one derived from the spec file name
    pub fn effective_root_kind(&self) -> Option<String> {
        if let Some(kind) = self.root_kind.as_deref().filter(|k| !k.is_empty()) {
            return Some(kind.to_string());
        }

        self.spec
            .as_deref()
            .map(derive_root_kind)
            .filter(|kind| !kind.is_empty())
    }
}

/// Derive a Kind name from a spec file path or URL
///
/// `petstore.1.0.27.yaml` → `Petstore`, `my-api.yaml` → `MyApi`,
/// `https://example.com/` → empty.
pub fn derive_root_kind(spec_path: &str) -> String {
    let location = match spec_path
        .strip_prefix("https://")
        .or_else(|| spec_path.strip_prefix("http://"))
    {
        // Drop the host; a bare host has no file name
        Some(rest) => match rest.split_once('/') {
            Some((_, path)) => path,
            None => return String::new(),
        },
        None => spec_path,
    };

    let file_name = location.rsplit('/').next().unwrap_or_default();
    let stem = [".yaml", ".yml", ".json"]
        .iter()
        .find_map(|ext| {
            let split = file_name.len().checked_sub(ext.len())?;
            let suffix = file_name.get(split..)?;
            suffix
                .eq_ignore_ascii_case(ext)
                .then(|| &file_name[..split])
        })
        .unwrap_or(file_name);

    stem.split('.')
        .filter(|piece| !is_version_like(piece))
        .flat_map(|piece| piece.split(|c: char| c == '-' || c == '_' || c.is_whitespace()))
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect()
}

/// Whether a file name fragment looks like a version (`1`, `1.0`, `v2`)
pub fn is_version_like(s: &str) -> bool {
    let digits = s
        .strip_prefix('v')
        .or_else(|| s.strip_prefix('V'))
        .unwrap_or(s);

    !digits.is_empty()
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
