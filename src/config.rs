//! Pipeline configuration.
//!
//! Every empirically-tuned constant in the pipeline (sheet geometry, the
//! head-region integrity heuristic, species weights, cross-species
//! denylists) lives here rather than as a hardcoded module constant, so a
//! tool run against a different art set only needs a different TOML file.
//! Defaults reproduce the tuning of the shipped LPC asset set.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::Result;

/// Sprite sheet grid layout for generated characters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Edge length of one composited frame, in pixels.
    pub frame_size: u32,
    /// Number of frame columns reserved per row.
    pub frames_per_row: u32,
    /// Number of action rows.
    pub rows: u32,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            frame_size: 128,
            frames_per_row: 13,
            rows: 5,
        }
    }
}

impl SheetConfig {
    /// Full sheet width in pixels.
    pub fn width(&self) -> u32 {
        self.frame_size * self.frames_per_row
    }

    /// Full sheet height in pixels.
    pub fn height(&self) -> u32 {
        self.frame_size * self.rows
    }
}

/// Pixel rectangle, origin top-left.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Heuristic post-generation integrity check settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrityConfig {
    /// Sub-rectangle of the idle frame where a head is expected.
    pub head_region: Region,
    /// Minimum count of non-transparent pixels in the head region.
    pub min_opaque_pixels: u32,
    /// Regeneration attempts before the last sheet is accepted as-is.
    pub max_attempts: u32,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            head_region: Region {
                x: 48,
                y: 16,
                width: 32,
                height: 32,
            },
            min_opaque_pixels: 50,
            max_attempts: 5,
        }
    }
}

/// One entry in the species weight table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesSpec {
    pub name: String,
    /// Relative weight for the weighted species draw.
    pub weight: f32,
    /// Index `kind` tag that head/eye assets must carry for this species.
    pub head_type: String,
    /// Body variant keys this species may use.
    pub body_keys: Vec<String>,
}

/// Static item sprites pasted atop specific action rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemConfig {
    /// Item shown during the FEED row (a porkchop in the shipped set).
    pub feed: Option<PathBuf>,
    /// Item shown during the TRAIN row (a barbell in the shipped set).
    pub train: Option<PathBuf>,
    /// Paste offset within a frame, in pixels.
    pub offset: (u32, u32),
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            feed: None,
            train: None,
            offset: (16, 44),
        }
    }
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub sheet: SheetConfig,
    pub integrity: IntegrityConfig,
    pub species: Vec<SpeciesSpec>,
    /// Hair colors a human character may prefer.
    pub hair_colors: Vec<String>,
    /// Path/id fragments that disqualify an asset for human characters.
    pub human_denylist: Vec<String>,
    pub items: ItemConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let species = vec![
            SpeciesSpec {
                name: "human".into(),
                weight: 0.85,
                head_type: "human".into(),
                body_keys: vec![
                    "male".into(),
                    "female".into(),
                    "muscular".into(),
                    "pregnant".into(),
                    "teen".into(),
                    "child".into(),
                ],
            },
            SpeciesSpec {
                name: "skeleton".into(),
                weight: 0.08,
                head_type: "skeleton".into(),
                body_keys: vec!["skeleton".into()],
            },
            SpeciesSpec {
                name: "zombie".into(),
                weight: 0.04,
                head_type: "zombie".into(),
                body_keys: vec!["zombie".into()],
            },
            SpeciesSpec {
                name: "orc".into(),
                weight: 0.03,
                head_type: "orc".into(),
                body_keys: vec!["male".into(), "female".into()],
            },
        ];
        Self {
            sheet: SheetConfig::default(),
            integrity: IntegrityConfig::default(),
            species,
            hair_colors: [
                "black", "blonde", "brown", "red", "gray", "white", "ash", "chestnut",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            human_denylist: [
                "orc", "goblin", "green", "zombie", "skeleton", "lizard", "alien", "troll",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            items: ItemConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file; missing keys take defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_shipped_tuning() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.sheet.width(), 128 * 13);
        assert_eq!(cfg.sheet.height(), 128 * 5);
        assert_eq!(cfg.integrity.min_opaque_pixels, 50);
        assert_eq!(cfg.integrity.max_attempts, 5);
        let human = &cfg.species[0];
        assert_eq!(human.name, "human");
        assert!(human.weight > 0.8);
        assert_eq!(human.body_keys.len(), 6);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg: PipelineConfig = toml::from_str(
            r#"
            [integrity]
            min_opaque_pixels = 80
            "#,
        )
        .unwrap();
        assert_eq!(cfg.integrity.min_opaque_pixels, 80);
        // Untouched sections fall back to defaults.
        assert_eq!(cfg.integrity.max_attempts, 5);
        assert_eq!(cfg.sheet.frame_size, 128);
        assert_eq!(cfg.species.len(), 4);
    }
}
