//! Standalone asset-pipeline operations (one CLI tool each).

pub mod audit;
pub mod blobs;
pub mod grid;
pub mod matte;
pub mod package;
