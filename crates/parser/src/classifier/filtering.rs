//! Applies the caller's [`PathFilter`] to a path before classification

use crate::observer::FilterReason;
use crate::openapi::{Operation, PathItem};
use openapi_operator_gen_common::{HttpMethod, PathFilter};
use std::collections::{BTreeMap, BTreeSet};

/// A path and the operations that survived filtering
#[derive(Debug)]
pub(crate) struct PathView<'a> {
    pub path: &'a str,
    pub item: &'a PathItem,

    /// Classified methods, in GET, POST, PUT, PATCH, DELETE order
    pub operations: BTreeMap<HttpMethod, &'a Operation>,

    /// Methods removed by operationId filters, e.g. "DELETE(deletePet)"
    pub excluded: Vec<String>,
}

impl<'a> PathView<'a> {
    fn new(path: &'a str, item: &'a PathItem) -> Self {
        Self {
            path,
            item,
            operations: method_operations(item),
            excluded: Vec::new(),
        }
    }

    pub fn has(&self, method: HttpMethod) -> bool {
        self.operations.contains_key(&method)
    }

    pub fn operation(&self, method: HttpMethod) -> Option<&'a Operation> {
        self.operations.get(&method).copied()
    }

    /// "GET,POST", with excluded methods appended as "~DELETE(deletePet)~"
    pub fn methods_label(&self) -> String {
        let kept = join_methods(self.operations.keys().copied());
        if self.excluded.is_empty() {
            return kept;
        }

        let excluded = self.excluded.join(",");
        if kept.is_empty() {
            format!("~{}~", excluded)
        } else {
            format!("{} ~{}~", kept, excluded)
        }
    }
}

/// Result of filtering a single path
#[derive(Debug)]
pub(crate) enum FilterDecision<'a> {
    Keep(PathView<'a>),
    Drop {
        reason: FilterReason,
        methods: String,
    },
}

/// Decide whether a path takes part in classification
///
/// Path patterns are checked first, then tags, then each method's
/// operationId. Methods failing the operationId check are removed; a path
/// left without methods is dropped.
pub(crate) fn apply_filter<'a>(
    path: &'a str,
    item: &'a PathItem,
    filter: Option<&dyn PathFilter>,
) -> FilterDecision<'a> {
    let mut view = PathView::new(path, item);

    let filter = match filter {
        Some(filter) if filter.has_filters() => filter,
        _ => return FilterDecision::Keep(view),
    };

    if !filter.should_include_path(path) {
        return FilterDecision::Drop {
            reason: FilterReason::Path,
            methods: view.methods_label(),
        };
    }

    if !filter.should_include_tags(&path_tags(item)) {
        return FilterDecision::Drop {
            reason: FilterReason::Tag,
            methods: view.methods_label(),
        };
    }

    if !filter.has_operation_filters() {
        return FilterDecision::Keep(view);
    }

    let mut excluded = Vec::new();
    view.operations.retain(|method, op| {
        let operation_id = op.operation_id.as_deref().unwrap_or_default();
        if filter.should_include_operation(operation_id) {
            return true;
        }

        excluded.push(if operation_id.is_empty() {
            method.to_string()
        } else {
            format!("{}({})", method, operation_id)
        });
        false
    });
    view.excluded = excluded;

    // A path with nothing to exclude keeps its (empty) shape
    if view.operations.is_empty() && !view.excluded.is_empty() {
        return FilterDecision::Drop {
            reason: FilterReason::Operation,
            methods: view.methods_label(),
        };
    }

    FilterDecision::Keep(view)
}

fn method_operations(item: &PathItem) -> BTreeMap<HttpMethod, &Operation> {
    [
        (HttpMethod::Get, &item.get),
        (HttpMethod::Post, &item.post),
        (HttpMethod::Put, &item.put),
        (HttpMethod::Patch, &item.patch),
        (HttpMethod::Delete, &item.delete),
    ]
    .into_iter()
    .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
    .collect()
}

/// Unique, sorted tags of every operation on the path (HEAD/OPTIONS included)
pub(crate) fn path_tags(item: &PathItem) -> Vec<String> {
    item.all_operations()
        .flat_map(|op| op.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub(crate) fn join_methods(methods: impl Iterator<Item = HttpMethod>) -> String {
    methods
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(",")
}
