//! Sheet assembly and the integrity retry loop.
//!
//! Arranges composited frames into the fixed 5-row action sheet the game
//! consumes, then inspects the idle frame's head region; a headless result
//! re-rolls the entire character (fresh trait draw, fresh composite) up to
//! the configured attempt cap, after which the last sheet is accepted
//! as-is.

use std::path::{Path, PathBuf};

use image::{imageops, RgbaImage};
use rand::Rng;

use crate::config::{IntegrityConfig, PipelineConfig};
use crate::core::retry::regenerate_until;
use crate::core::{PipelineError, Result};
use crate::generate::compositor::{composite_frame, LayerEntry};
use crate::generate::traits::{select_traits, Layer, TraitSelection};
use crate::index::AssetIndex;

/// Which configured item sprite a row carries, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSlot {
    None,
    Feed,
    Train,
}

/// One row of the output sheet.
#[derive(Debug, Clone, Copy)]
pub struct ActionRow {
    /// Row name as written into metadata.
    pub name: &'static str,
    /// Source action composited into this row.
    pub action: &'static str,
    pub frames: u32,
    pub row: u32,
    pub item: ItemSlot,
}

/// The fixed game-facing action rows.
pub const ACTION_ROWS: [ActionRow; 5] = [
    ActionRow {
        name: "IDLE",
        action: "walk",
        frames: 1,
        row: 0,
        item: ItemSlot::None,
    },
    ActionRow {
        name: "WALK",
        action: "walk",
        frames: 9,
        row: 1,
        item: ItemSlot::None,
    },
    ActionRow {
        name: "FEED",
        action: "thrust",
        frames: 8,
        row: 2,
        item: ItemSlot::Feed,
    },
    ActionRow {
        name: "TRAIN",
        action: "slash",
        frames: 6,
        row: 3,
        item: ItemSlot::Train,
    },
    ActionRow {
        name: "ATTACK",
        action: "spellcast",
        frames: 7,
        row: 4,
        item: ItemSlot::None,
    },
];

/// Weapon sheets name their rows after attack variants; other actions map
/// onto the closest weapon sheet available.
fn weapon_action(action: &str) -> &str {
    match action {
        "thrust" => "attack_thrust",
        "slash" => "attack_slash",
        "spellcast" => "walk",
        other => other,
    }
}

/// Body variants resolved by directory convention instead of the index.
const CONVENTION_BODIES: [&str; 2] = ["skeleton", "zombie"];

/// A finished character: sheet plus the selection that produced it.
#[derive(Debug)]
pub struct GeneratedCharacter {
    pub selection: TraitSelection,
    pub sheet: RgbaImage,
    /// Attempts the integrity loop used (1-based).
    pub attempts: u32,
    /// False when the attempt cap forced acceptance of a flawed sheet.
    pub healthy: bool,
}

/// Count of non-transparent pixels in the idle frame's head region.
pub fn head_pixel_count(sheet: &RgbaImage, integrity: &IntegrityConfig) -> u32 {
    let region = integrity.head_region;
    let head = imageops::crop_imm(sheet, region.x, region.y, region.width, region.height);
    head.to_image().pixels().filter(|p| p.0[3] > 0).count() as u32
}

/// The soft invariant: enough opaque pixels where the head should be.
pub fn passes_integrity(sheet: &RgbaImage, integrity: &IntegrityConfig) -> bool {
    head_pixel_count(sheet, integrity) > integrity.min_opaque_pixels
}

/// Assembles character sheets against one asset index.
pub struct SheetBuilder<'a> {
    cfg: &'a PipelineConfig,
    index: &'a AssetIndex,
    /// Asset tree root, needed for convention-pathed bodies.
    asset_root: &'a Path,
}

impl<'a> SheetBuilder<'a> {
    pub fn new(cfg: &'a PipelineConfig, index: &'a AssetIndex, asset_root: &'a Path) -> Self {
        Self {
            cfg,
            index,
            asset_root,
        }
    }

    /// Resolve the body sheet for one action, walk fallback included.
    fn body_sheet(&self, body_key: &str, action: &str) -> Option<PathBuf> {
        if CONVENTION_BODIES.contains(&body_key) {
            let direct = self
                .asset_root
                .join("body")
                .join("bodies")
                .join(body_key)
                .join(action)
                .join(format!("{body_key}.png"));
            if direct.exists() {
                return Some(direct);
            }
            let walk = self
                .asset_root
                .join("body")
                .join("bodies")
                .join(body_key)
                .join("walk")
                .join(format!("{body_key}.png"));
            return walk.exists().then_some(walk);
        }
        self.index.body_sheet(body_key, action).cloned()
    }

    /// Build the ordered stack for one action: behind layers, body, front
    /// layers.
    fn layer_stack(
        &self,
        selection: &TraitSelection,
        row: &ActionRow,
        body_path: PathBuf,
    ) -> Vec<LayerEntry> {
        let mut behind = Vec::new();
        let mut front = Vec::new();

        for layer in [
            Layer::Feet,
            Layer::Legs,
            Layer::Torso,
            Layer::Weapon,
            Layer::Head,
            Layer::Eyes,
            Layer::Hair,
        ] {
            // Item rows replace the weapon with the held item sprite.
            if layer == Layer::Weapon && row.item != ItemSlot::None {
                continue;
            }
            let Some(variant) = selection.layer(layer) else {
                continue;
            };

            let asset_action = if layer == Layer::Weapon {
                weapon_action(row.action)
            } else {
                row.action
            };
            let Some(assets) = variant.assets_for(asset_action) else {
                continue;
            };

            let mut candidates: Vec<_> = assets.iter().collect();
            if selection.is_human() {
                candidates.retain(|a| {
                    let path = a.path.to_string_lossy().to_lowercase();
                    !self
                        .cfg
                        .human_denylist
                        .iter()
                        .any(|word| path.contains(word.as_str()))
                });
            }
            if candidates.is_empty() {
                continue;
            }

            let picked = if layer == Layer::Hair {
                candidates
                    .iter()
                    .find(|a| {
                        a.path
                            .to_string_lossy()
                            .to_lowercase()
                            .contains(selection.hair_color.as_str())
                    })
                    .copied()
                    .unwrap_or(candidates[0])
            } else {
                candidates[0]
            };

            let entry = LayerEntry {
                path: picked.path.clone(),
                behind: picked.behind,
            };
            if picked.behind {
                behind.push(entry);
            } else {
                front.push(entry);
            }
        }

        let mut stack = behind;
        stack.push(LayerEntry {
            path: body_path,
            behind: false,
        });
        stack.extend(front);
        stack
    }

    /// Composite the full action sheet for an already-rolled selection.
    pub fn build_sheet(&self, selection: &TraitSelection) -> Result<RgbaImage> {
        // A body that resolves for no action at all is a hard failure.
        if self.body_sheet(&selection.body_key, "walk").is_none() {
            return Err(PipelineError::MissingBody(selection.body_key.clone()));
        }

        let sheet_cfg = &self.cfg.sheet;
        let mut sheet = RgbaImage::new(sheet_cfg.width(), sheet_cfg.height());

        for row in &ACTION_ROWS {
            let Some(body_path) = self.body_sheet(&selection.body_key, row.action) else {
                continue;
            };
            let stack = self.layer_stack(selection, row, body_path);

            let item = match row.item {
                ItemSlot::Feed => self.cfg.items.feed.as_deref(),
                ItemSlot::Train => self.cfg.items.train.as_deref(),
                ItemSlot::None => None,
            };
            let item_img = item
                .filter(|p| p.exists())
                .and_then(|p| image::open(p).ok())
                .map(|img| img.to_rgba8());

            for f in 0..row.frames {
                let mut frame = composite_frame(&stack, row.action, f);
                if let Some(ref item_img) = item_img {
                    let (ox, oy) = self.cfg.items.offset;
                    imageops::overlay(&mut frame, item_img, ox as i64, oy as i64);
                }
                imageops::overlay(
                    &mut sheet,
                    &frame,
                    (f * sheet_cfg.frame_size) as i64,
                    (row.row * sheet_cfg.frame_size) as i64,
                );
            }
        }
        Ok(sheet)
    }

    /// Roll and composite one character, regenerating on integrity failure.
    pub fn generate_character(&self, rng: &mut impl Rng) -> Result<GeneratedCharacter> {
        let integrity = &self.cfg.integrity;
        let outcome = regenerate_until(
            integrity.max_attempts,
            |attempt| -> Result<(TraitSelection, RgbaImage)> {
                if attempt > 1 {
                    tracing::debug!(attempt, "headless composite, regenerating");
                }
                let selection = select_traits(self.cfg, self.index, rng)?;
                let sheet = self.build_sheet(&selection)?;
                Ok((selection, sheet))
            },
            |(_, sheet)| passes_integrity(sheet, integrity),
        )?;

        let (selection, sheet) = outcome.value;
        if !outcome.accepted {
            tracing::warn!(
                attempts = outcome.attempts,
                species = %selection.species,
                "integrity check never passed, accepting last attempt"
            );
        }
        Ok(GeneratedCharacter {
            selection,
            sheet,
            attempts: outcome.attempts,
            healthy: outcome.accepted,
        })
    }

    /// The idle frame (first frame of the first row), used as hero image.
    pub fn idle_frame(&self, sheet: &RgbaImage) -> RgbaImage {
        let fs = self.cfg.sheet.frame_size;
        imageops::crop_imm(sheet, 0, 0, fs, fs).to_image()
    }
}
