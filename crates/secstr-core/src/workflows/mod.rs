//! # Workflows Module
//!
//! Top-level entry points that run the complete assignment pipeline.
//!
//! ## Overview
//!
//! A workflow takes the input residues and an [`AssignmentConfig`](crate::engine::config::AssignmentConfig),
//! prepares the backbone, detects hydrogen bonds once and hands the bond set to
//! every enabled detector. Phase events go to the supplied
//! [`ProgressReporter`](crate::engine::progress::ProgressReporter); non-fatal
//! problems are returned with the result rather than aborting the run.
//!
//! ## Architecture
//!
//! - **Assignment Workflow** ([`assign`]) - Amide hydrogen placement, bond detection,
//!   sheets with bulges and turns, helices, and the final ordering of all elements.

pub mod assign;
