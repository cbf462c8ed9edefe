//! # Scholar
//!
//! CLI and HTTP front ends over the `scholar-core` query engine.
//!
//! The dataset is loaded and validated once at startup; both front ends
//! then share the read-only graph.

pub mod api;
pub mod cli;
