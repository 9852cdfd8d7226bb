//! Command-line argument definitions for the Stencil CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, logging verbosity and which instance states to present.

use clap::Parser;

/// Command-line arguments for the Stencil document expander
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input design document
    #[arg(help = "Path to the input JSON document")]
    pub input: String,

    /// Path to the expanded output document
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Present an alternate master in an instance after expansion.
    /// May be repeated; requests are applied in order.
    #[arg(long, value_name = "INSTANCE_ID=MASTER_ID", value_parser = parse_state_request)]
    pub present: Vec<StateRequest>,
}

/// A `--present` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateRequest {
    pub instance_id: String,
    pub master_id: String,
}

fn parse_state_request(value: &str) -> Result<StateRequest, String> {
    let (instance_id, master_id) = value
        .split_once('=')
        .ok_or_else(|| format!("expected INSTANCE_ID=MASTER_ID, got `{value}`"))?;
    let (instance_id, master_id) = (instance_id.trim(), master_id.trim());
    if instance_id.is_empty() || master_id.is_empty() {
        return Err(format!("instance and master ids must not be empty in `{value}`"));
    }
    Ok(StateRequest {
        instance_id: instance_id.to_string(),
        master_id: master_id.to_string(),
    })
}
