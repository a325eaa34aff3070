//! # Quill API Server
//!
//! actix-web surface over the posts repository. The binary in `main.rs`
//! wires these modules together; tests build the same `App` in-process.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;
