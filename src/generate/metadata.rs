//! Per-character metadata records.
//!
//! One JSON side-car per character, lifecycle tied 1:1 to its sprite
//! sheet. Field names follow the game client's camelCase schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::generate::sheet::ACTION_ROWS;
use crate::generate::traits::TraitSelection;

/// One marketplace-style trait entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

/// Location of one named row within the sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowLayout {
    pub row: u32,
    pub frames: u32,
}

/// Sprite sheet layout as consumed by the game client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetLayout {
    pub src: String,
    pub frame_size: u32,
    pub frames_per_row: u32,
    pub rows: BTreeMap<String, RowLayout>,
}

/// Full per-character metadata record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub attributes: Vec<Attribute>,
    #[serde(rename = "spriteSheet")]
    pub sprite_sheet: SheetLayout,
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Build the metadata record for one generated character.
pub fn character_metadata(
    id: u64,
    selection: &TraitSelection,
    cfg: &PipelineConfig,
) -> CharacterMetadata {
    let rows = ACTION_ROWS
        .iter()
        .map(|r| {
            (
                r.name.to_string(),
                RowLayout {
                    row: r.row,
                    frames: r.frames,
                },
            )
        })
        .collect();

    CharacterMetadata {
        name: format!("NPC #{id}"),
        description: format!("A unique {} {}.", selection.species, selection.body_key),
        image: format!("/nft_heroes/{id}.png"),
        attributes: vec![
            Attribute {
                trait_type: "Species".into(),
                value: capitalize(&selection.species),
            },
            Attribute {
                trait_type: "Body Type".into(),
                value: capitalize(&selection.body_key),
            },
        ],
        sprite_sheet: SheetLayout {
            src: format!("/ai_base_chars/npc_{id:03}.png"),
            frame_size: cfg.sheet.frame_size,
            frames_per_row: cfg.sheet.frames_per_row,
            rows,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Age, Gender};

    fn selection() -> TraitSelection {
        TraitSelection {
            species: "human".into(),
            head_type: "human".into(),
            body_key: "female".into(),
            age: Age::Adult,
            gender: Gender::Female,
            hair_color: "red".into(),
            layers: Default::default(),
        }
    }

    #[test]
    fn test_metadata_fields() {
        let cfg = PipelineConfig::default();
        let meta = character_metadata(42, &selection(), &cfg);
        assert_eq!(meta.name, "NPC #42");
        assert_eq!(meta.description, "A unique human female.");
        assert_eq!(meta.image, "/nft_heroes/42.png");
        assert_eq!(meta.attributes[0].value, "Human");
        assert_eq!(meta.attributes[1].value, "Female");
        assert_eq!(meta.sprite_sheet.src, "/ai_base_chars/npc_042.png");
        assert_eq!(meta.sprite_sheet.rows["WALK"].frames, 9);
        assert_eq!(meta.sprite_sheet.rows["ATTACK"].row, 4);
    }

    #[test]
    fn test_metadata_json_schema() {
        let cfg = PipelineConfig::default();
        let meta = character_metadata(7, &selection(), &cfg);
        let json = serde_json::to_value(&meta).unwrap();
        // The game client expects exactly these camelCase keys.
        assert!(json.get("spriteSheet").is_some());
        let sheet = &json["spriteSheet"];
        assert_eq!(sheet["frameSize"], 128);
        assert_eq!(sheet["framesPerRow"], 13);
        assert_eq!(sheet["rows"]["IDLE"]["frames"], 1);
        assert_eq!(json["attributes"][0]["trait_type"], "Species");
    }
}
