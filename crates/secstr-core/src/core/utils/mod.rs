pub mod diagnostics;
pub mod geometry;
