//! CLI logic for the Stencil document expander.
//!
//! Reads a design document, expands every symbol instance, optionally
//! presents alternate instance states and writes the expanded document.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, StateRequest};

use std::fs;

use log::{info, warn};

use stencil::{
    DocumentBuilder, StencilError,
    element::ElementTree,
    expand::Expander,
    state,
};

/// Run the Stencil CLI application
///
/// # Errors
///
/// Returns `StencilError` for:
/// - File I/O and configuration errors
/// - Parse and validation errors
/// - `--present` requests naming an unknown instance or master
/// - Serialization errors
pub fn run(args: &Args) -> Result<(), StencilError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing document"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = DocumentBuilder::new(app_config);
    let model = builder.parse(&source)?;
    let mut tree = builder.build(model);

    let expander = builder.expander(&tree);
    let report = builder.expand_with(&expander, &mut tree);
    for master_id in report.unresolved() {
        warn!(master_id = master_id.as_str(); "Instance left unexpanded");
    }

    for request in &args.present {
        present(&mut tree, &expander, request)?;
    }

    let model = builder.to_model(&tree)?;
    let json = builder.render_json(&model)?;

    fs::write(&args.output, json)?;

    info!(output_file = args.output; "Document written successfully");

    Ok(())
}

fn present(
    tree: &mut ElementTree,
    expander: &Expander,
    request: &StateRequest,
) -> Result<(), StencilError> {
    let instance = tree
        .root()
        .and_then(|root| tree.get_element_by_key(root, &request.instance_id))
        .ok_or_else(|| {
            StencilError::Expand(format!("no object with id `{}`", request.instance_id))
        })?;

    match state::present_state(tree, expander, instance, &request.master_id)? {
        Some(change) => {
            // Nothing routes events to the previous state in a batch run.
            if let Some(snapshot) = change.snapshot() {
                tree.remove_subtree(snapshot);
            }
            info!(
                instance_id = request.instance_id,
                master_id = change.master_id();
                "State presented"
            );
        }
        None => info!(
            instance_id = request.instance_id,
            master_id = request.master_id;
            "State already presented"
        ),
    }
    Ok(())
}
