//! Readers and writers for backbone coordinate files.
//!
//! Full structure formats (PDB, mmCIF) are parsed elsewhere; this module only
//! covers the flat backbone table consumed by the assignment workflow.

pub mod backbone_csv;
pub mod traits;
