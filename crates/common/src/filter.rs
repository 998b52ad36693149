//! Path, tag and operationId filtering
//!
//! The classification engine only sees the [`PathFilter`] trait. The
//! glob-based [`GlobPathFilter`] is the implementation built from the
//! `filters` section of the configuration file or from CLI flags.
//!
//! ## Path patterns
//! - `/users` matches exactly (trailing slashes ignored)
//! - `/users/*` matches `/users` and everything below it
//! - `/users/?` matches exactly one segment below `/users`
//! - `*` inside a segment matches any characters of that segment (`/api/*/users`)
//!
//! ## Operation patterns
//! `*` matches any run of characters (`get*`, `*Pet`, `get*ById`).

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Predicates used to restrict which paths take part in classification
///
/// All methods are pure.
pub trait PathFilter {
    /// Path passes the include/exclude path patterns
    fn should_include_path(&self, path: &str) -> bool;

    /// Tags pass the include/exclude tag lists
    fn should_include_tags(&self, tags: &[String]) -> bool;

    /// OperationId passes the include/exclude operation patterns
    fn should_include_operation(&self, operation_id: &str) -> bool;

    /// Path and tags pass (no operationId check)
    fn should_include(&self, path: &str, tags: &[String]) -> bool;

    /// Path, tags and at least one operationId pass
    fn should_include_with_operations(
        &self,
        path: &str,
        tags: &[String],
        operation_ids: &[String],
    ) -> bool;

    /// Any filter is configured
    fn has_filters(&self) -> bool;

    /// Any operationId filter is configured
    fn has_operation_filters(&self) -> bool;
}

/// Filter lists, as read from the `filters` section of the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    /// Paths to include (glob patterns)
    #[serde(default)]
    pub include_paths: Vec<String>,

    /// Paths to exclude (glob patterns)
    #[serde(default)]
    pub exclude_paths: Vec<String>,

    /// Tags to include (case-insensitive)
    #[serde(default)]
    pub include_tags: Vec<String>,

    /// Tags to exclude (case-insensitive)
    #[serde(default)]
    pub exclude_tags: Vec<String>,

    /// OperationIds to include (glob patterns)
    #[serde(default)]
    pub include_operations: Vec<String>,

    /// OperationIds to exclude (glob patterns)
    #[serde(default)]
    pub exclude_operations: Vec<String>,
}

impl FilterConfig {
    /// Fill every empty list from `other`
    ///
    /// Lists already set here win, so CLI flags merged over a config file
    /// keep precedence.
    pub fn merge_missing(&mut self, other: &FilterConfig) {
        fn fill(target: &mut Vec<String>, source: &[String]) {
            if target.is_empty() {
                target.extend_from_slice(source);
            }
        }

        fill(&mut self.include_paths, &other.include_paths);
        fill(&mut self.exclude_paths, &other.exclude_paths);
        fill(&mut self.include_tags, &other.include_tags);
        fill(&mut self.exclude_tags, &other.exclude_tags);
        fill(&mut self.include_operations, &other.include_operations);
        fill(&mut self.exclude_operations, &other.exclude_operations);
    }

    pub fn is_empty(&self) -> bool {
        self.include_paths.is_empty()
            && self.exclude_paths.is_empty()
            && self.include_tags.is_empty()
            && self.exclude_tags.is_empty()
            && self.include_operations.is_empty()
            && self.exclude_operations.is_empty()
    }
}

/// Glob-based [`PathFilter`]
#[derive(Debug, Clone, Default)]
pub struct GlobPathFilter {
    config: FilterConfig,
}

impl GlobPathFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }
}

impl PathFilter for GlobPathFilter {
    fn should_include_path(&self, path: &str) -> bool {
        // Exclude wins over include
        if self
            .config
            .exclude_paths
            .iter()
            .any(|pattern| match_path(pattern, path))
        {
            return false;
        }

        self.config.include_paths.is_empty()
            || self
                .config
                .include_paths
                .iter()
                .any(|pattern| match_path(pattern, path))
    }

    fn should_include_tags(&self, tags: &[String]) -> bool {
        let has_tag = |wanted: &String| tags.iter().any(|tag| tag.eq_ignore_ascii_case(wanted));

        if self.config.exclude_tags.iter().any(has_tag) {
            return false;
        }

        self.config.include_tags.is_empty() || self.config.include_tags.iter().any(has_tag)
    }

    fn should_include_operation(&self, operation_id: &str) -> bool {
        if self
            .config
            .exclude_operations
            .iter()
            .any(|pattern| match_operation_id(pattern, operation_id))
        {
            return false;
        }

        self.config.include_operations.is_empty()
            || self
                .config
                .include_operations
                .iter()
                .any(|pattern| match_operation_id(pattern, operation_id))
    }

    fn should_include(&self, path: &str, tags: &[String]) -> bool {
        self.should_include_path(path) && self.should_include_tags(tags)
    }

    fn should_include_with_operations(
        &self,
        path: &str,
        tags: &[String],
        operation_ids: &[String],
    ) -> bool {
        if !self.should_include(path, tags) {
            return false;
        }
        if !self.has_operation_filters() {
            return true;
        }

        // Nothing to exclude, but an include list requires a match
        if operation_ids.is_empty() {
            return self.config.include_operations.is_empty();
        }

        operation_ids
            .iter()
            .any(|id| self.should_include_operation(id))
    }

    fn has_filters(&self) -> bool {
        !self.config.is_empty()
    }

    fn has_operation_filters(&self) -> bool {
        !self.config.include_operations.is_empty() || !self.config.exclude_operations.is_empty()
    }
}

/// Match a path against a path pattern
pub fn match_path(pattern: &str, path: &str) -> bool {
    let path_segments = segments(path);

    if let Some(prefix) = pattern.strip_suffix("/*") {
        let prefix_segments = segments(prefix);
        return path_segments.len() >= prefix_segments.len()
            && segments_match(&prefix_segments, &path_segments[..prefix_segments.len()]);
    }

    if let Some(prefix) = pattern.strip_suffix("/?") {
        let prefix_segments = segments(prefix);
        return path_segments.len() == prefix_segments.len() + 1
            && segments_match(&prefix_segments, &path_segments[..prefix_segments.len()]);
    }

    let pattern_segments = segments(pattern);
    pattern_segments.len() == path_segments.len()
        && segments_match(&pattern_segments, &path_segments)
}

/// Match an operationId against a glob pattern
pub fn match_operation_id(pattern: &str, operation_id: &str) -> bool {
    glob_match(pattern, operation_id)
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn segments_match(patterns: &[&str], values: &[&str]) -> bool {
    patterns
        .iter()
        .zip(values)
        .all(|(pattern, value)| glob_match(pattern, value))
}

/// Anchored glob: `*` is any run of characters, `?` a single character
fn glob_match(pattern: &str, value: &str) -> bool {
    if !pattern.contains(['*', '?']) {
        return pattern == value;
    }

    let mut expr = String::from("^");
    for ch in pattern.chars() {
        match ch {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    expr.push('$');

    Regex::new(&expr)
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}
