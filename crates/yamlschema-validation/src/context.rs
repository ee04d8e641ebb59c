//! Per-run configuration and mutable validation state.

use crate::diagnostic::{Diagnostic, DiagnosticCollector, Severity};
use crate::error::InstancePath;
use serde::{Deserialize, Serialize};

/// Options of a validation run. All default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationOptions {
    /// Unknown keys under the `inherit` policy are errors instead of warnings
    pub strict_keys: bool,
    /// Stop at the first error
    pub stop_on_first: bool,
    /// Infer scalar types from explicit tags only; untagged scalars are strings
    pub strict_types: bool,
    /// Accept YAML 1.1 boolean literals (`yes`, `no`, `on`, `off`, `y`, `n`)
    pub yaml11_booleans: bool,
}

/// Validation context tracks state during one validation run
#[derive(Debug, Default)]
pub struct ValidationContext {
    options: ValidationOptions,
    collector: DiagnosticCollector,
    stopped: bool,
    /// Current instance path (e.g., `doc[1].spec.containers[0]`)
    instance_path: InstancePath,
}

impl ValidationContext {
    pub fn new(options: ValidationOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Add a diagnostic to the context's collector.
    ///
    /// Does nothing once the run has stopped. With `stop_on_first`, adding
    /// an error stops the run.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        if self.stopped {
            return;
        }
        let is_error = diagnostic.severity == Severity::Error;
        self.collector.add(diagnostic);
        if self.options.stop_on_first && is_error {
            self.stopped = true;
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn collector(&self) -> &DiagnosticCollector {
        &self.collector
    }

    pub fn into_collector(self) -> DiagnosticCollector {
        self.collector
    }

    pub fn instance_path(&self) -> &InstancePath {
        &self.instance_path
    }

    /// The current instance path, rendered
    pub fn path(&self) -> String {
        self.instance_path.to_string()
    }

    /// The rendered path of a child key of the current node
    pub fn key_path(&self, key: &str) -> String {
        self.instance_path.child_key(key)
    }

    /// Execute a function with a key segment pushed onto the instance path
    pub fn with_key<F, R>(&mut self, key: &str, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.instance_path.push_key(key);
        let result = f(self);
        self.instance_path.pop();
        result
    }

    /// Execute a function with an index segment pushed onto the instance path
    pub fn with_index<F, R>(&mut self, index: usize, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.instance_path.push_index(index);
        let result = f(self);
        self.instance_path.pop();
        result
    }

    /// Execute a function inside document `index` of a stream.
    ///
    /// The first document gets no path prefix.
    pub fn with_document<F, R>(&mut self, index: usize, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        if index == 0 {
            return f(self);
        }
        self.instance_path.push_document(index);
        let result = f(self);
        self.instance_path.pop();
        result
    }
}
