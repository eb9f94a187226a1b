//! Core types shared across the pipeline tools.

pub mod error;
pub mod retry;

pub use error::{PipelineError, Result};
