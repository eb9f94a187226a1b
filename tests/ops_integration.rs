//! File-level tests for the standalone pipeline operations.

use std::collections::BTreeMap;
use std::path::Path;

use image::{Rgba, RgbaImage};

use spriteforge::config::SheetConfig;
use spriteforge::generate::metadata::{Attribute, CharacterMetadata, RowLayout, SheetLayout};
use spriteforge::ops::audit::audit_directory;
use spriteforge::ops::grid::crop_grid_files;
use spriteforge::ops::matte::clean_file;
use spriteforge::ops::package::{package_collection, LaunchConfig, LaunchMetadata};

const INK: Rgba<u8> = Rgba([40, 40, 40, 255]);

#[test]
fn test_crop_grid_files_writes_cells() {
    let dir = tempfile::tempdir().unwrap();
    let img = RgbaImage::from_fn(60, 30, |x, y| Rgba([x as u8, y as u8, 0, 255]));
    let input = dir.path().join("grid.png");
    img.save(&input).unwrap();

    let out = dir.path().join("cells");
    let count = crop_grid_files(&input, 3, 2, &out, "cell").unwrap();
    assert_eq!(count, 6);

    let first = image::open(out.join("cell_000.png")).unwrap().to_rgba8();
    assert_eq!(first.dimensions(), (30, 10));
    assert_eq!(*first.get_pixel(5, 5), Rgba([5, 5, 0, 255]));
    assert!(out.join("cell_005.png").exists());
    assert!(!out.join("cell_006.png").exists());
}

#[test]
fn test_clean_file_keys_detected_background() {
    let dir = tempfile::tempdir().unwrap();
    let bg = Rgba([40, 180, 60, 255]);
    let mut img = RgbaImage::from_pixel(32, 32, bg);
    for y in 10..22 {
        for x in 10..22 {
            img.put_pixel(x, y, Rgba([200, 30, 30, 255]));
        }
    }
    let input = dir.path().join("portrait.png");
    img.save(&input).unwrap();

    let out = clean_file(&input, 30.0).unwrap();
    assert_eq!(out, dir.path().join("portrait_clean.png"));
    let cleaned = image::open(&out).unwrap().to_rgba8();
    assert_eq!(cleaned.get_pixel(0, 0).0[3], 0);
    assert_eq!(cleaned.get_pixel(31, 31).0[3], 0);
    assert_eq!(*cleaned.get_pixel(15, 15), Rgba([200, 30, 30, 255]));
}

/// Paint a well-formed character into the first frame of each row.
fn good_sheet(cfg: &SheetConfig) -> RgbaImage {
    let mut img = RgbaImage::new(cfg.width(), cfg.height());
    for row in 0..cfg.rows {
        let base = row * cfg.frame_size;
        for y in 20..110 {
            for x in 40..88 {
                img.put_pixel(x, base + y, INK);
            }
        }
    }
    img
}

#[test]
fn test_audit_directory_reports_only_offenders() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = SheetConfig::default();

    // id 0: clean. id 1: wrong dimensions. id 2: missing on disk.
    good_sheet(&cfg).save(dir.path().join("npc_000.png")).unwrap();
    RgbaImage::new(128, 128)
        .save(dir.path().join("npc_001.png"))
        .unwrap();

    let report = dir.path().join("audit_report.json");
    let broken = audit_directory(dir.path(), 3, &cfg, &report).unwrap();
    assert_eq!(broken.len(), 2);
    assert_eq!(broken[0].id, 1);
    assert!(broken[0]
        .errors
        .iter()
        .any(|e| e.starts_with("Bad Dimensions")));
    assert_eq!(broken[1].id, 2);
    assert_eq!(broken[1].status.as_deref(), Some("MISSING_FILE"));

    // The report round-trips as JSON.
    let raw = std::fs::read_to_string(&report).unwrap();
    let parsed: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0]["id"], 1);
}

fn sample_metadata(id: u64) -> CharacterMetadata {
    let mut rows = BTreeMap::new();
    rows.insert("IDLE".to_string(), RowLayout { row: 0, frames: 1 });
    CharacterMetadata {
        name: format!("NPC #{id}"),
        description: "A unique human male.".into(),
        image: format!("/nft_heroes/{id}.png"),
        attributes: vec![Attribute {
            trait_type: "Species".into(),
            value: "Human".into(),
        }],
        sprite_sheet: SheetLayout {
            src: format!("/ai_base_chars/npc_{id:03}.png"),
            frame_size: 128,
            frames_per_row: 13,
            rows,
        },
    }
}

fn write_pair(images: &Path, metadata: &Path, id: u64) {
    RgbaImage::from_pixel(8, 8, INK)
        .save(images.join(format!("{id}.png")))
        .unwrap();
    let json = serde_json::to_string_pretty(&sample_metadata(id)).unwrap();
    std::fs::write(metadata.join(format!("{id}.json")), json).unwrap();
}

#[test]
fn test_package_collection_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("portraits");
    let metadata = dir.path().join("metadata");
    std::fs::create_dir_all(&images).unwrap();
    std::fs::create_dir_all(&metadata).unwrap();

    // ids 0 and 2 complete; id 1 has no files and is skipped.
    write_pair(&images, &metadata, 0);
    write_pair(&images, &metadata, 2);

    let out = dir.path().join("bundle");
    let cfg = LaunchConfig {
        symbol: "TAGA".into(),
        seller_fee_basis_points: 500,
        creator_address: "wallet123".into(),
    };
    let packaged = package_collection(&images, &metadata, &out, 3, &cfg).unwrap();
    assert_eq!(packaged, 2);

    assert!(out.join("images/0.png").exists());
    assert!(!out.join("images/1.png").exists());
    assert!(out.join("metadata/2.json").exists());

    let raw = std::fs::read_to_string(out.join("metadata/0.json")).unwrap();
    let launch: LaunchMetadata = serde_json::from_str(&raw).unwrap();
    assert_eq!(launch.name, "NPC #0");
    assert_eq!(launch.symbol, "TAGA");
    assert_eq!(launch.image, "0.png");
    assert_eq!(launch.properties.creators[0].address, "wallet123");
    assert_eq!(launch.sprite_sheet.rows["IDLE"].frames, 1);
}
