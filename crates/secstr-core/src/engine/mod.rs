//! # Engine Module
//!
//! The assignment engine: hydrogen-bond detection and the detectors that turn
//! a bond set into secondary structure elements.
//!
//! ## Overview
//!
//! Bonds are computed once per run into a [`hbonds::BondIndex`]. Beta-ladders
//! are grown from characteristic bond motifs, grouped into sheets through a
//! strand graph, and checked pairwise for bulges. Helices and C7 turns are read
//! directly from the bond pattern.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Energy cutoff, search strategy and detector thresholds
//! - **Hydrogen Bonds** ([`hbonds`]) - Backbone indexing, the DSSP energy and bond search strategies
//! - **Ladders** ([`ladder`]) - Ladder growth, motif discovery and strand spans
//! - **Bulges** ([`bulge`]) - Beta-bulge classification and bulge side segments
//! - **Sheets** ([`sheet`]) - The strand graph, sheet numbering and connectivity
//! - **Helices** ([`helix`]) - G, H and I helices from `i + x -> i` bond runs
//! - **Turns** ([`turns`]) - C7 turns and wiggles
//! - **Progress Monitoring** ([`progress`]) - Phase events for front ends
//! - **Error Handling** ([`error`]) - Engine error type

pub mod bulge;
pub mod config;
pub mod error;
pub mod hbonds;
pub mod helix;
pub mod ladder;
pub mod progress;
pub mod sheet;
pub mod turns;
