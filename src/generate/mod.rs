//! Procedural character and monster generation.

pub mod compositor;
pub mod metadata;
pub mod monster;
pub mod sheet;
pub mod traits;

pub use sheet::{GeneratedCharacter, SheetBuilder};
pub use traits::{Layer, TraitSelection};
