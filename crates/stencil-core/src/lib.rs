//! Stencil Core Types and Definitions
//!
//! This crate provides the foundational types shared by every Stencil crate:
//!
//! - **Model**: serde types mirroring the design document format ([`model`] module)
//! - **Property paths**: typed override addresses ([`path::PropertyPath`])
//! - **Sequence ids**: process-wide node identities ([`sequence::SequenceId`])

pub mod model;
pub mod path;
pub mod sequence;
