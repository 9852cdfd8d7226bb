//! Stencil - symbol expansion and override resolution for design documents.
//!
//! A design document defines reusable symbol masters and places them as
//! symbol instances. Each instance may override any property of any object
//! inside it, reassign the master's variables and switch to alternate masters
//! to show interactive states. Stencil loads such a document into an element
//! tree, expands every instance into a concrete subtree with unique ids and
//! writes the result back out.

pub mod config;
pub mod element;
pub mod expand;
pub mod state;

mod error;
mod overrides;
mod variables;

pub use stencil_core::{model, path};

pub use error::{OverrideError, StencilError};

use log::{debug, info, trace};

use config::AppConfig;
use element::ElementTree;
use expand::{ExpandReport, Expander};
use model::DesignModel;

/// Builder for loading, expanding and writing design documents.
///
/// Each stage is exposed on its own so callers can inspect or edit the tree
/// between them; [`DocumentBuilder::process`] runs them all.
///
/// # Examples
///
/// ```rust
/// use stencil::{DocumentBuilder, config::AppConfig};
///
/// let source = r#"{
///     "frames": [{
///         "class": "frame", "id": "page",
///         "childObjects": [
///             { "class": "symbolMaster", "id": "M", "childObjects": [
///                 { "class": "text", "id": "label", "content": "OK" }
///             ]},
///             { "class": "symbolInstance", "id": "button", "masterId": "M" }
///         ]
///     }]
/// }"#;
///
/// let builder = DocumentBuilder::new(AppConfig::default());
///
/// let model = builder.parse(source).expect("Failed to parse");
/// let mut tree = builder.build(model);
/// let report = builder.expand(&mut tree);
/// assert_eq!(report.expanded(), 1);
///
/// let json = builder
///     .render_json(&builder.to_model(&tree).expect("No document"))
///     .expect("Failed to serialize");
/// assert!(json.contains("button__label"));
/// ```
#[derive(Default)]
pub struct DocumentBuilder {
    config: AppConfig,
}

impl DocumentBuilder {
    /// Create a new document builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including build, expansion and output settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON design document.
    ///
    /// # Errors
    ///
    /// Returns `StencilError::Parse` for malformed JSON, JSON that does not
    /// match the document schema, and documents that fail validation.
    pub fn parse(&self, source: &str) -> Result<DesignModel, StencilError> {
        info!("Parsing document");

        let model = stencil_parser::parse_document(source)
            .map_err(|err| StencilError::new_parse_error(err, source))?;

        debug!(frames = model.frames.len(); "Document parsed successfully");
        trace!(model:?; "Parsed document");

        Ok(model)
    }

    /// Build the element tree of a parsed document.
    pub fn build(&self, model: DesignModel) -> ElementTree {
        info!("Building element tree");
        let mut tree = ElementTree::from_document(model);
        if self.config.build().first_on_top() {
            if let Some(root) = tree.root() {
                tree.mark_first_on_top(root);
            }
        }
        debug!(nodes = tree.len(); "Element tree built");
        tree
    }

    /// An expander that knows the masters and shared styles of `tree`.
    ///
    /// Keep it to change instance states after [`expand`](Self::expand);
    /// see [`state`].
    pub fn expander(&self, tree: &ElementTree) -> Expander {
        Expander::from_tree(tree, self.config.expand())
    }

    /// Expand every symbol instance of `tree` in place.
    ///
    /// Overrides that cannot be applied and masters that cannot be found are
    /// logged and counted in the returned report.
    pub fn expand(&self, tree: &mut ElementTree) -> ExpandReport {
        let expander = self.expander(tree);
        self.expand_with(&expander, tree)
    }

    /// Expand every symbol instance of `tree` with a prepared expander.
    pub fn expand_with(&self, expander: &Expander, tree: &mut ElementTree) -> ExpandReport {
        info!(masters = expander.masters().count(); "Expanding symbol instances");
        let report = expander.expand(tree);
        info!(
            expanded = report.expanded(),
            unresolved = report.unresolved().len(),
            overrides_skipped = report.overrides_skipped();
            "Symbol instances expanded"
        );
        trace!(report:?; "Expansion report");
        report
    }

    /// Materialize `tree` back into a document.
    ///
    /// # Errors
    ///
    /// Returns `StencilError::Expand` if the tree has no document root.
    pub fn to_model(&self, tree: &ElementTree) -> Result<DesignModel, StencilError> {
        tree.to_document(self.config.output().reverse_first_on_top())
            .ok_or_else(|| StencilError::Expand("element tree has no document root".to_string()))
    }

    /// Serialize a document to JSON.
    ///
    /// # Errors
    ///
    /// Returns `StencilError::Serialize` if serialization fails.
    pub fn render_json(&self, model: &DesignModel) -> Result<String, StencilError> {
        info!(pretty = self.config.output().pretty(); "Serializing document");
        let json = if self.config.output().pretty() {
            serde_json::to_string_pretty(model)?
        } else {
            serde_json::to_string(model)?
        };
        debug!(bytes = json.len(); "Document serialized");
        Ok(json)
    }

    /// Parse, build, expand and serialize `source` in one go.
    ///
    /// # Errors
    ///
    /// Returns the error of the first stage that fails.
    pub fn process(&self, source: &str) -> Result<String, StencilError> {
        let model = self.parse(source)?;
        let mut tree = self.build(model);
        self.expand(&mut tree);
        let model = self.to_model(&tree)?;
        self.render_json(&model)
    }
}
