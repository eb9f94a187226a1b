//! Spriteforge - Procedural Sprite Asset Pipeline

pub mod config;
pub mod core;
pub mod generate;
pub mod index;
pub mod ops;
