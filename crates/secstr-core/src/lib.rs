//! # secstr Core Library
//!
//! Hydrogen-bond based secondary-structure assignment for protein backbones. From
//! the backbone atoms alone it finds alpha, 3-10 and pi helices, beta-ladders and
//! the sheets they form, beta-bulges, C7 turns and wiggles.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture so each stage can be
//! tested on its own.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Residue`, `Sse`), backbone
//!   geometry, the diagnostics collector and coordinate-table I/O.
//!
//! - **[`engine`]: The Logic Core.** Hydrogen-bond detection with interchangeable
//!   search strategies, ladder growth, the strand graph that groups strands into
//!   sheets, and the bulge, helix and turn detectors.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into one
//!   assignment run that returns ordered elements, sheet connectivity and the bond list.

pub mod core;
pub mod engine;
pub mod workflows;
