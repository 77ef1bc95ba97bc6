// SPDX-License-Identifier: PMPL-1.0-or-later
//! Document processing pipeline.
//!
//! A pipeline is an ordered list of plugins run once per document, after
//! parsing and before rendering. Each plugin receives the tree and a
//! diagnostic sink supplied by the host.

use crate::config::Config;
use crate::diagnostic::DiagnosticSink;
use crate::tree::Node;
use crate::validator::ValidateAlt;
use tracing::debug;

/// Trait implemented by all processing steps
pub trait Plugin: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Inspect a document tree, reporting findings to `sink`
    fn run(&self, tree: &Node, sink: &mut dyn DiagnosticSink);
}

/// Ordered set of plugins
#[derive(Default)]
pub struct Pipeline {
    plugins: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the pipeline described by a configuration
    pub fn from_config(config: &Config) -> Self {
        let mut pipeline = Self::new();
        if config.alt_text.enabled {
            pipeline.register(ValidateAlt::new(config.alt_text.policy()));
        }
        pipeline
    }

    /// Append a plugin, builder style
    pub fn with(mut self, plugin: impl Plugin + 'static) -> Self {
        self.register(plugin);
        self
    }

    /// Append a plugin
    pub fn register(&mut self, plugin: impl Plugin + 'static) {
        self.plugins.push(Box::new(plugin));
    }

    /// Names of the registered plugins, in run order
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// True when no checks are enabled
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Run every plugin over `tree`. An absent tree skips all plugins.
    pub fn run<S: DiagnosticSink>(&self, tree: Option<&Node>, sink: &mut S) {
        let Some(tree) = tree else {
            debug!("No document tree, skipping {} plugin(s)", self.plugins.len());
            return;
        };

        for plugin in &self.plugins {
            debug!("Running plugin {}", plugin.name());
            plugin.run(tree, &mut *sink);
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("plugins", &self.plugin_names())
            .finish()
    }
}
