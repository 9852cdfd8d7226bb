//! Configuration types for Stencil document processing.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as a TOML file. Every section and field falls back
//! to its default when absent.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`BuildConfig`] - How the element tree is built from a document.
//! - [`ExpandConfig`] - Which steps the symbol expansion pass performs.
//! - [`OutputConfig`] - How the expanded document is written back out.
//!
//! # Example
//!
//! ```
//! # use stencil::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.expand().scale_instances());
//! assert!(config.output().pretty());
//! ```

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Tree construction section.
    #[serde(default)]
    build: BuildConfig,

    /// Symbol expansion section.
    #[serde(default)]
    expand: ExpandConfig,

    /// Output section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(build: BuildConfig, expand: ExpandConfig, output: OutputConfig) -> Self {
        Self {
            build,
            expand,
            output,
        }
    }

    /// Returns the tree construction configuration.
    pub fn build(&self) -> &BuildConfig {
        &self.build
    }

    /// Returns the symbol expansion configuration.
    pub fn expand(&self) -> &ExpandConfig {
        &self.expand
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }
}

/// Element tree construction settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildConfig {
    /// Mark every container as storing its newest child first.
    #[serde(default)]
    first_on_top: bool,
}

impl BuildConfig {
    pub fn new(first_on_top: bool) -> Self {
        Self { first_on_top }
    }

    pub fn first_on_top(&self) -> bool {
        self.first_on_top
    }
}

/// Steps performed by the symbol expansion pass.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExpandConfig {
    /// Rescale expanded children when an instance is sized differently
    /// from its master.
    scale_instances: bool,

    /// Bind variable references to master defaults and instance assignments.
    apply_variables: bool,

    /// Apply shared styles named by `referenced_style_*` override values.
    resolve_referenced_styles: bool,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            scale_instances: true,
            apply_variables: true,
            resolve_referenced_styles: true,
        }
    }
}

impl ExpandConfig {
    pub fn new(
        scale_instances: bool,
        apply_variables: bool,
        resolve_referenced_styles: bool,
    ) -> Self {
        Self {
            scale_instances,
            apply_variables,
            resolve_referenced_styles,
        }
    }

    pub fn scale_instances(&self) -> bool {
        self.scale_instances
    }

    pub fn apply_variables(&self) -> bool {
        self.apply_variables
    }

    pub fn resolve_referenced_styles(&self) -> bool {
        self.resolve_referenced_styles
    }
}

/// Output settings for the expanded document.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print the output JSON.
    pretty: bool,

    /// Materialize children in render order for first-on-top containers.
    reverse_first_on_top: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            reverse_first_on_top: false,
        }
    }
}

impl OutputConfig {
    pub fn new(pretty: bool, reverse_first_on_top: bool) -> Self {
        Self {
            pretty,
            reverse_first_on_top,
        }
    }

    pub fn pretty(&self) -> bool {
        self.pretty
    }

    pub fn reverse_first_on_top(&self) -> bool {
        self.reverse_first_on_top
    }
}
