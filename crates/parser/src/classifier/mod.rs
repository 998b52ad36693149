//! Path classification
//!
//! Every path of a document ends up in exactly one bucket:
//!
//! 1. **Filtered** by the caller's [`PathFilter`]
//! 2. **Resource (POST)**: a collection path with POST whose item path
//!    (`/pet` → `/pet/{petId}`) exposes GET, PUT or DELETE
//! 3. **ActionEndpoint**: POST/PUT-only operations such as
//!    `/pet/{petId}/uploadImage`, or GET on a strong keyword (`/user/login`)
//! 4. **QueryEndpoint**: GET-only paths such as `/pet/findByStatus`
//! 5. **Resource**: everything else, keyed by the extracted resource name
//!
//! Paths yielding no resource name are **Skipped**; root endpoints without a
//! configured root Kind are **Dropped**.

mod action;
mod extract;
mod filtering;
mod query;
mod resource;

pub use extract::ID_FIELD_EXTENSION;

use crate::naming::{base_path_for_id_path, extract_resource_name, is_resource_id_path, is_root};
use crate::observer::{Classification, ClassificationObserver, ClassificationRow};
use crate::openapi::{OpenApiSpec, PathItem};
use action::{extract_action_endpoint, is_action_shape};
use filtering::{apply_filter, FilterDecision, PathView};
use openapi_operator_gen_common::{
    ActionEndpoint, HttpMethod, PathFilter, QueryEndpoint, Resource,
};
use query::{extract_query_endpoint, is_query_shape};
use resource::ResourceBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Per-path outcomes of a classification run, in path order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub rows: Vec<ClassificationRow>,
}

impl ClassificationReport {
    pub fn row(&self, path: &str) -> Option<&ClassificationRow> {
        self.rows.iter().find(|row| row.path == path)
    }

    /// Outcome for a path
    pub fn classification(&self, path: &str) -> Option<Classification> {
        self.row(path).map(|row| row.classification)
    }

    /// Paths with the given outcome
    pub fn paths_with(&self, classification: Classification) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|row| row.classification == classification)
            .map(|row| row.path.as_str())
            .collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.classification.is_filtered())
            .count()
    }
}

/// Result of classifying a document
#[derive(Debug, Clone, Default)]
pub struct Classified {
    /// Sorted by name
    pub resources: Vec<Resource>,
    pub query_endpoints: Vec<QueryEndpoint>,
    pub action_endpoints: Vec<ActionEndpoint>,
    pub report: ClassificationReport,
}

/// Classifies the paths of a validated document
pub struct Classifier<'a> {
    spec: &'a OpenApiSpec,
    root_kind: Option<&'a str>,
    filter: Option<&'a dyn PathFilter>,
}

impl<'a> Classifier<'a> {
    pub fn new(spec: &'a OpenApiSpec) -> Self {
        Self {
            spec,
            root_kind: None,
            filter: None,
        }
    }

    /// Kind used for the root path `/`
    pub fn with_root_kind(mut self, root_kind: Option<&'a str>) -> Self {
        self.root_kind = root_kind.filter(|kind| !kind.is_empty());
        self
    }

    pub fn with_filter(mut self, filter: Option<&'a dyn PathFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Classify every path, reporting one row per path to `observer`
    pub fn classify(&self, observer: &mut dyn ClassificationObserver) -> Classified {
        let empty = BTreeMap::new();
        let paths: &BTreeMap<String, PathItem> = self.spec.paths.as_ref().unwrap_or(&empty);

        let decisions: Vec<(&str, FilterDecision<'_>)> = paths
            .iter()
            .map(|(path, item)| (path.as_str(), apply_filter(path, item, self.filter)))
            .collect();

        let filtered = decisions
            .iter()
            .filter(|(_, d)| matches!(d, FilterDecision::Drop { .. }))
            .count();
        if filtered > 0 {
            info!(
                "Filtering: {} of {} paths excluded by filter",
                filtered,
                paths.len()
            );
        }
        observer.begin(paths.len(), filtered);

        let kept: BTreeMap<&str, &PathView<'_>> = decisions
            .iter()
            .filter_map(|(path, d)| match d {
                FilterDecision::Keep(view) => Some((*path, view)),
                FilterDecision::Drop { .. } => None,
            })
            .collect();
        let combined = combined_collection_paths(&kept);

        let mut state = ClassificationState::default();
        for (path, decision) in &decisions {
            let row = match decision {
                FilterDecision::Drop { reason, methods } => ClassificationRow {
                    path: path.to_string(),
                    methods: methods.clone(),
                    classification: Classification::Filtered(*reason),
                    kind: None,
                    parent_id_param: None,
                },
                FilterDecision::Keep(view) => self.classify_path(view, &combined, &mut state),
            };

            debug!(path = %row.path, classification = %row.classification, "Classified path");
            observer.record(&row);
            state.rows.push(row);
        }
        observer.finish();

        Classified {
            resources: state.resources.into_values().map(ResourceBuilder::build).collect(),
            query_endpoints: state.query_endpoints,
            action_endpoints: state.action_endpoints,
            report: ClassificationReport { rows: state.rows },
        }
    }

    fn classify_path(
        &self,
        view: &PathView<'_>,
        combined: &BTreeMap<&str, &str>,
        state: &mut ClassificationState,
    ) -> ClassificationRow {
        let row = |classification, kind: Option<String>, parent_id_param: Option<String>| {
            ClassificationRow {
                path: view.path.to_string(),
                methods: view.methods_label(),
                classification,
                kind,
                parent_id_param,
            }
        };

        if view.operations.is_empty() {
            return row(Classification::Skipped, None, None);
        }

        let item_path = combined.get(view.path).copied();

        if item_path.is_none() {
            if is_action_shape(view) {
                return match extract_action_endpoint(self.spec, view, self.root_kind) {
                    Some(endpoint) => {
                        let row = row(
                            Classification::ActionEndpoint,
                            Some(endpoint.name.clone()),
                            endpoint.parent_id_param.clone(),
                        );
                        state.action_endpoints.push(endpoint);
                        row
                    }
                    None => row(self.unnamed_outcome(view), None, None),
                };
            }

            if is_query_shape(view) {
                return match extract_query_endpoint(self.spec, view, self.root_kind) {
                    Some(endpoint) => {
                        let row = row(
                            Classification::QueryEndpoint,
                            Some(endpoint.name.clone()),
                            None,
                        );
                        state.query_endpoints.push(endpoint);
                        row
                    }
                    None => row(self.unnamed_outcome(view), None, None),
                };
            }
        }

        // A combined collection folds into the resource named by its item path
        let name = extract_resource_name(item_path.unwrap_or(view.path), self.root_kind);
        if name.is_empty() {
            return row(Classification::Skipped, None, None);
        }

        let classification = if item_path.is_some() {
            Classification::ResourceCollection
        } else if base_path_for_id_path(view.path)
            .is_some_and(|base| combined.contains_key(base.as_str()))
        {
            Classification::ResourceItem
        } else {
            Classification::Resource
        };

        state
            .resources
            .entry(name.clone())
            .or_insert_with(|| ResourceBuilder::new(&name, view.path))
            .contribute(self.spec, view);

        row(classification, Some(name), None)
    }

    /// Outcome for an action or query path that could not be named
    fn unnamed_outcome(&self, view: &PathView<'_>) -> Classification {
        if is_root(view.path) && self.root_kind.is_none() {
            Classification::Dropped
        } else {
            Classification::Skipped
        }
    }
}

/// Accumulated results while walking the paths
#[derive(Default)]
struct ClassificationState {
    resources: BTreeMap<String, ResourceBuilder>,
    query_endpoints: Vec<QueryEndpoint>,
    action_endpoints: Vec<ActionEndpoint>,
    rows: Vec<ClassificationRow>,
}

/// Collection paths whose POST folds into the resource of their item path,
/// mapped to that item path
///
/// Only unfiltered paths take part. When several item paths share a
/// collection path, the first in path order is paired.
fn combined_collection_paths<'a>(
    kept: &BTreeMap<&'a str, &PathView<'_>>,
) -> BTreeMap<&'a str, &'a str> {
    let mut item_paths: BTreeMap<String, &'a str> = BTreeMap::new();
    for path in kept.keys().copied().filter(|p| is_resource_id_path(p)) {
        if let Some(base) = base_path_for_id_path(path) {
            item_paths.entry(base).or_insert(path);
        }
    }

    kept.iter()
        .filter(|(_, view)| view.has(HttpMethod::Post))
        .filter_map(|(path, _)| {
            let item_path = *item_paths.get(*path)?;
            let item = kept.get(item_path)?;
            let pairs = item.has(HttpMethod::Get)
                || item.has(HttpMethod::Put)
                || item.has(HttpMethod::Delete);
            pairs.then_some((*path, item_path))
        })
        .collect()
}
