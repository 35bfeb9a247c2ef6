//! # Core Models Module
//!
//! Data structures shared by every stage of secondary-structure assignment.
//!
//! ## Key Components
//!
//! - [`residue`] - A residue with its five optional backbone atom positions
//! - [`sse`] - Typed secondary structure elements, their code table and joining
//!
//! ## Usage
//!
//! ```ignore
//! use secstr::core::models::residue::{BackboneAtom, Residue};
//!
//! let residue = Residue::new("A", 12, "ALA")
//!     .with_atom(BackboneAtom::N, Point3::new(0.0, 0.0, 0.0))
//!     .with_atom(BackboneAtom::CA, Point3::new(1.458, 0.0, 0.0));
//! ```

pub mod residue;
pub mod sse;
