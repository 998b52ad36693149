//! Classification progress sinks
//!
//! The classifier reports one row per path. What happens to the rows is up
//! to the observer: nothing ([`NoopObserver`]), a boxed table on any writer
//! ([`TableObserver`]), or `tracing` events ([`TracingObserver`]).
//! Observers never influence classification results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use tracing::debug;

/// Why a path was filtered out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterReason {
    /// Path glob include/exclude
    Path,

    /// Tag include/exclude
    Tag,

    /// Every method removed by operationId filters
    Operation,
}

/// Outcome for a single path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Filtered(FilterReason),

    /// Contributes operations to a resource
    Resource,

    /// Collection path whose POST joins the resource of its item path
    ResourceCollection,

    /// Item path paired with a collection path
    ResourceItem,

    QueryEndpoint,
    ActionEndpoint,

    /// No resource name could be derived
    Skipped,

    /// Root endpoint without a configured root Kind
    Dropped,
}

impl Classification {
    /// Whether the path ended up in a `Resource`
    pub fn is_resource(&self) -> bool {
        matches!(
            self,
            Classification::Resource
                | Classification::ResourceCollection
                | Classification::ResourceItem
        )
    }

    pub fn is_filtered(&self) -> bool {
        matches!(self, Classification::Filtered(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Filtered(FilterReason::Path) => "Filtered (path)",
            Classification::Filtered(FilterReason::Tag) => "Filtered (tag)",
            Classification::Filtered(FilterReason::Operation) => "Filtered (op)",
            Classification::Resource => "Resource",
            Classification::ResourceCollection => "Resource (POST)",
            Classification::ResourceItem => "Resource (ID)",
            Classification::QueryEndpoint => "QueryEndpoint",
            Classification::ActionEndpoint => "ActionEndpoint",
            Classification::Skipped => "Skipped",
            Classification::Dropped => "Dropped",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of the classification table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRow {
    pub path: String,

    /// e.g., "GET,POST" or "GET ~DELETE(deletePet)~" when methods were filtered
    pub methods: String,

    pub classification: Classification,

    /// Resource or endpoint Kind name
    pub kind: Option<String>,

    pub parent_id_param: Option<String>,
}

/// Receives classification progress
pub trait ClassificationObserver {
    /// Called once before any row
    fn begin(&mut self, _total_paths: usize, _filtered: usize) {}

    /// Called once per path, in path order
    fn record(&mut self, row: &ClassificationRow);

    /// Called once after the last row
    fn finish(&mut self) {}
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ClassificationObserver for NoopObserver {
    fn record(&mut self, _row: &ClassificationRow) {}
}

/// Emits one `debug!` event per row
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ClassificationObserver for TracingObserver {
    fn begin(&mut self, total_paths: usize, filtered: usize) {
        debug!(total_paths, filtered, "Classifying endpoints");
    }

    fn record(&mut self, row: &ClassificationRow) {
        debug!(
            path = %row.path,
            methods = %row.methods,
            classification = %row.classification,
            kind = row.kind.as_deref().unwrap_or("-"),
            parent_id = row.parent_id_param.as_deref().unwrap_or("-"),
            "Classified endpoint"
        );
    }
}

/// Column widths: endpoint, method, classification, kind, parent ID
const COLUMN_WIDTHS: [usize; 5] = [34, 12, 18, 19, 19];

/// Renders a boxed table to a writer
///
/// Write errors are ignored.
#[derive(Debug)]
pub struct TableObserver<W: Write> {
    out: W,
}

impl<W: Write> TableObserver<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn rule(&mut self, left: char, joint: char, right: char) {
        let segments: Vec<String> = COLUMN_WIDTHS
            .iter()
            .map(|w| "─".repeat(w + 2))
            .collect();
        let _ = writeln!(self.out, "{}{}{}", left, segments.join(&joint.to_string()), right);
    }

    fn cells(&mut self, cells: [&str; 5]) {
        let wrapped: Vec<Vec<String>> = cells
            .iter()
            .zip(COLUMN_WIDTHS)
            .map(|(cell, width)| wrap_text(cell, width))
            .collect();
        let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);

        for line in 0..height {
            let mut text = String::from("│");
            for (column, width) in wrapped.iter().zip(COLUMN_WIDTHS) {
                let cell = column.get(line).map(String::as_str).unwrap_or("");
                text.push_str(&format!(" {:<width$} │", cell, width = width));
            }
            let _ = writeln!(self.out, "{}", text);
        }
    }
}

impl TableObserver<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ClassificationObserver for TableObserver<W> {
    fn begin(&mut self, total_paths: usize, filtered: usize) {
        if filtered > 0 {
            let _ = writeln!(
                self.out,
                "Filtering: {} of {} paths excluded by filter",
                filtered, total_paths
            );
        }

        let inner: usize = COLUMN_WIDTHS.iter().map(|w| w + 3).sum::<usize>() - 1;
        let title = "Endpoint Classification";
        let pad = inner.saturating_sub(title.chars().count());

        let _ = writeln!(self.out);
        let _ = writeln!(self.out, "┌{}┐", "─".repeat(inner));
        let _ = writeln!(
            self.out,
            "│{}{}{}│",
            " ".repeat(pad / 2),
            title,
            " ".repeat(pad - pad / 2)
        );
        self.rule('├', '┬', '┤');
        self.cells(["Endpoint", "Method", "Classification", "Kind", "Parent ID Param"]);
        self.rule('├', '┼', '┤');
    }

    fn record(&mut self, row: &ClassificationRow) {
        self.cells([
            &row.path,
            &row.methods,
            row.classification.label(),
            row.kind.as_deref().unwrap_or("-"),
            row.parent_id_param.as_deref().unwrap_or("-"),
        ]);
    }

    fn finish(&mut self) {
        self.rule('└', '┴', '┘');
        let _ = writeln!(self.out);
        let _ = self.out.flush();
    }
}

/// Split text into lines of at most `max_len` characters
///
/// Prefers breaking after `/`, `-`, `_` or `,` in the second half of a line.
pub fn wrap_text(s: &str, max_len: usize) -> Vec<String> {
    let mut chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len || max_len == 0 {
        return vec![s.to_string()];
    }

    let mut lines = Vec::new();
    while chars.len() > max_len {
        let break_at = (max_len / 2 + 1..max_len)
            .rev()
            .find(|&i| matches!(chars[i], '/' | '-' | '_' | ','))
            .map(|i| i + 1)
            .unwrap_or(max_len);

        let rest = chars.split_off(break_at);
        lines.push(chars.into_iter().collect());
        chars = rest;
    }

    if !chars.is_empty() {
        lines.push(chars.into_iter().collect());
    }

    lines
}
