//! # Core Module
//!
//! Stateless building blocks of the assignment pipeline.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Residues with optional backbone atoms and typed SSE records
//! - **File I/O** ([`io`]) - Backbone coordinate tables
//! - **Utilities** ([`utils`]) - Backbone geometry helpers and the diagnostics collector

pub mod io;
pub mod models;
pub mod utils;
