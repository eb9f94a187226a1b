//! End-to-end generation tests against a synthetic asset tree.
//!
//! Builds a real on-disk LPC-style tree with tiny painted sheets, indexes
//! it, and runs the full selection -> composite -> integrity pipeline.

use std::path::Path;

use image::{Rgba, RgbaImage};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tempfile::TempDir;

use spriteforge::config::{PipelineConfig, SpeciesSpec};
use spriteforge::generate::metadata::character_metadata;
use spriteforge::generate::sheet::{head_pixel_count, passes_integrity};
use spriteforge::generate::SheetBuilder;
use spriteforge::index::builder::build_index;
use spriteforge::index::AssetIndex;

const BODY: Rgba<u8> = Rgba([210, 180, 140, 255]);
const HAIR: Rgba<u8> = Rgba([90, 50, 20, 255]);
const ITEM: Rgba<u8> = Rgba([20, 60, 220, 255]);

/// A 9x4 walk sheet of 64 px frames with an opaque block painted at the
/// same frame-local rectangle in every frame of row 2 (the row the
/// compositor reads for short sheets).
fn walk_sheet(color: Rgba<u8>, fx: u32, fy: u32, fw: u32, fh: u32) -> RgbaImage {
    let mut sheet = RgbaImage::new(576, 256);
    for col in 0..9 {
        for dy in 0..fh {
            for dx in 0..fw {
                sheet.put_pixel(col * 64 + fx + dx, 2 * 64 + fy + dy, color);
            }
        }
    }
    sheet
}

fn save(root: &Path, rel: &str, img: &RgbaImage) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    img.save(path).unwrap();
}

/// One-species config so the draw is fully deterministic.
fn test_config() -> PipelineConfig {
    PipelineConfig {
        species: vec![SpeciesSpec {
            name: "human".into(),
            weight: 1.0,
            head_type: "human".into(),
            body_keys: vec!["male".into()],
        }],
        ..PipelineConfig::default()
    }
}

/// Tree whose body content sits high in the frame: pasted at canvas
/// (48..80, 32..48), well inside the (48,16,32,32) head region.
fn healthy_tree() -> (TempDir, AssetIndex) {
    let dir = tempfile::tempdir().unwrap();
    save(dir.path(), "body/bodies/male/walk.png", &walk_sheet(BODY, 16, 0, 32, 16));
    save(dir.path(), "hair/plain/adult/walk.png", &walk_sheet(HAIR, 24, 0, 16, 8));
    let index = build_index(dir.path()).unwrap();
    (dir, index)
}

/// Tree whose body content sits entirely in the lower half of the frame,
/// so the head region stays empty on every attempt.
fn headless_tree() -> (TempDir, AssetIndex) {
    let dir = tempfile::tempdir().unwrap();
    save(dir.path(), "body/bodies/male/walk.png", &walk_sheet(BODY, 16, 48, 32, 16));
    let index = build_index(dir.path()).unwrap();
    (dir, index)
}

#[test]
fn test_healthy_character_first_attempt() {
    let (dir, index) = healthy_tree();
    let cfg = test_config();
    let builder = SheetBuilder::new(&cfg, &index, dir.path());
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let character = builder.generate_character(&mut rng).unwrap();
    assert!(character.healthy);
    assert_eq!(character.attempts, 1);
    assert_eq!(character.sheet.dimensions(), (13 * 128, 5 * 128));
    assert!(passes_integrity(&character.sheet, &cfg.integrity));

    // Walk row carries all 9 frames; frame 8 has body content too.
    let px = character.sheet.get_pixel(8 * 128 + 50, 128 + 40);
    assert!(px.0[3] > 0);
    // Frame 9 of the walk row is beyond the 9-frame span and stays empty.
    let beyond = character.sheet.get_pixel(9 * 128 + 50, 128 + 40);
    assert_eq!(beyond.0[3], 0);
}

#[test]
fn test_hair_composites_over_body() {
    let (dir, index) = healthy_tree();
    let cfg = test_config();
    let builder = SheetBuilder::new(&cfg, &index, dir.path());
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let character = builder.generate_character(&mut rng).unwrap();
    // Hair block covers canvas (56..72, 32..40) and is drawn after the
    // body, so its color wins there.
    assert_eq!(*character.sheet.get_pixel(60, 34), HAIR);
    // Body shows where hair does not cover.
    assert_eq!(*character.sheet.get_pixel(50, 44), BODY);
}

#[test]
fn test_headless_body_exhausts_attempts() {
    let (dir, index) = headless_tree();
    let cfg = test_config();
    let builder = SheetBuilder::new(&cfg, &index, dir.path());
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let character = builder.generate_character(&mut rng).unwrap();
    assert!(!character.healthy);
    assert_eq!(character.attempts, cfg.integrity.max_attempts);
    // The forced sheet is still a full, usable sheet.
    assert_eq!(character.sheet.dimensions(), (13 * 128, 5 * 128));
    assert_eq!(head_pixel_count(&character.sheet, &cfg.integrity), 0);
    // Content is present, just low.
    assert!(character.sheet.get_pixel(50, 88).0[3] > 0);
}

#[test]
fn test_feed_row_carries_item_overlay() {
    let (dir, index) = healthy_tree();
    let mut cfg = test_config();

    let item_path = dir.path().join("apple.png");
    RgbaImage::from_pixel(16, 16, ITEM).save(&item_path).unwrap();
    cfg.items.feed = Some(item_path);

    let builder = SheetBuilder::new(&cfg, &index, dir.path());
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let character = builder.generate_character(&mut rng).unwrap();

    // Feed row is row 2; the item lands at the configured (16, 44)
    // offset in every frame of that row.
    let (ox, oy) = cfg.items.offset;
    assert_eq!(*character.sheet.get_pixel(ox + 4, 2 * 128 + oy + 4), ITEM);
    // The train row has no feed item.
    assert_eq!(character.sheet.get_pixel(ox + 4, 3 * 128 + oy + 4).0[3], 0);
}

#[test]
fn test_index_round_trip_through_disk() {
    let (dir, index) = healthy_tree();
    let path = dir.path().join("index.json");
    index.save(&path).unwrap();
    let loaded = AssetIndex::load(&path).unwrap();
    assert_eq!(loaded.bodies.len(), index.bodies.len());
    assert_eq!(loaded.layer("hair").len(), 1);

    // The reloaded index drives generation identically.
    let cfg = test_config();
    let builder = SheetBuilder::new(&cfg, &loaded, dir.path());
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let character = builder.generate_character(&mut rng).unwrap();
    assert!(character.healthy);
}

#[test]
fn test_metadata_matches_generated_character() {
    let (dir, index) = healthy_tree();
    let cfg = test_config();
    let builder = SheetBuilder::new(&cfg, &index, dir.path());
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    let character = builder.generate_character(&mut rng).unwrap();
    let meta = character_metadata(5, &character.selection, &cfg);
    assert_eq!(meta.name, "NPC #5");
    assert_eq!(meta.attributes[0].value, "Human");
    assert_eq!(meta.sprite_sheet.rows.len(), 5);
    // The side-car survives a disk round trip.
    let path = dir.path().join("5.json");
    std::fs::write(&path, serde_json::to_string_pretty(&meta).unwrap()).unwrap();
    let back: spriteforge::generate::metadata::CharacterMetadata =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back.sprite_sheet.src, meta.sprite_sheet.src);
}
