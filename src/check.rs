//! Non-interactive `--check` mode: load once, validate, and report as JSON.

use serde::Serialize;

use crate::nav_stack::NavStack;
use crate::provider::{SchemaSource, load_schema};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub types: usize,
    pub query_type: Option<String>,
    pub mutation_type: Option<String>,
    pub subscription_type: Option<String>,
    pub errors: Vec<String>,
    /// Crumb names reached by `--open`, root included; empty when no path was given.
    pub opened: Vec<String>,
}

impl CheckSummary {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Loads `source` and summarizes it. Load failures are reported in `errors` like validation
/// failures, so callers only need [`CheckSummary::is_ok`].
pub fn run_check(source: &SchemaSource, open: &[&str]) -> CheckSummary {
    let schema = match load_schema(source) {
        Ok(schema) => schema,
        Err(err) => {
            tracing::error!(source = %source.describe(), error = %err, "schema load failed");
            return CheckSummary {
                errors: vec![err.to_string()],
                ..CheckSummary::default()
            };
        }
    };

    let errors = schema.validate();
    for error in &errors {
        tracing::warn!(%error, "schema validation error");
    }

    let mut opened = Vec::new();
    if !open.is_empty() {
        let mut nav = NavStack::default();
        let resolved = nav.open_path(&schema, open);
        if resolved < open.len() {
            tracing::warn!(path = %open.join("."), resolved, "path only partially resolved");
        }
        opened = nav.crumbs().iter().map(|crumb| crumb.name.clone()).collect();
    }

    tracing::info!(
        source = %source.describe(),
        types = schema.types().len(),
        errors = errors.len(),
        "schema checked"
    );
    CheckSummary {
        types: schema.types().len(),
        query_type: schema.query_type_name().map(str::to_string),
        mutation_type: schema.mutation_type_name().map(str::to_string),
        subscription_type: schema.subscription_type_name().map(str::to_string),
        errors,
        opened,
    }
}
