//! Static asset index.
//!
//! A pre-built mapping from layer category to concrete sprite sheets,
//! produced once by the indexer tool and treated as read-only by every
//! consumer. Bodies are keyed by species variant and action; all other
//! layers are flat lists of variant records carrying the tags the trait
//! selector filters on.

pub mod builder;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::Result;

/// Age tag inferred from an asset's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Age {
    Child,
    Teen,
    Adult,
}

/// Gender tag inferred from an asset's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Any,
}

/// One concrete sheet belonging to a variant, for one action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerAsset {
    pub path: PathBuf,
    /// Drawn before the body layer (capes, back hair, wings).
    #[serde(default)]
    pub behind: bool,
}

/// One selectable variant of a visual layer (a hairstyle, a torso, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantRecord {
    /// Stable identity: the asset directory up to the action segment.
    pub id: String,
    pub age: Age,
    /// Species/type tag (e.g. "human", "zombie", "generic").
    pub kind: String,
    pub gender: Gender,
    /// Action name -> sheets for that action.
    pub actions: BTreeMap<String, Vec<LayerAsset>>,
}

impl VariantRecord {
    /// Sheets for `action`, falling back through walk and idle rows the
    /// same way the compositor does when an action sheet is missing.
    pub fn assets_for(&self, action: &str) -> Option<&[LayerAsset]> {
        for name in [action, "walk", "idle"] {
            if let Some(assets) = self.actions.get(name) {
                if !assets.is_empty() {
                    return Some(assets);
                }
            }
        }
        None
    }
}

/// The full asset index: bodies plus layered variants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetIndex {
    /// Species variant key -> action name -> sheet path.
    pub bodies: BTreeMap<String, BTreeMap<String, PathBuf>>,
    /// Layer category name -> selectable variants.
    pub layers: BTreeMap<String, Vec<VariantRecord>>,
}

impl AssetIndex {
    /// Variants for a layer category; empty when the category is unknown.
    pub fn layer(&self, name: &str) -> &[VariantRecord] {
        self.layers.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Body sheet for a variant and action, with walk fallback.
    pub fn body_sheet(&self, body_key: &str, action: &str) -> Option<&PathBuf> {
        let actions = self.bodies.get(body_key)?;
        actions.get(action).or_else(|| actions.get("walk"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
