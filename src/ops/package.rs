//! Launch bundle packaging.
//!
//! Takes the per-character idle portraits and metadata side-cars and
//! repackages them into a marketplace-ready bundle: `images/` with the
//! PNGs and `metadata/` with the records reshaped into the standard
//! on-chain schema (symbol, royalties, file properties, creators),
//! while keeping the game-specific `spriteSheet` block for the client.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::generate::metadata::{Attribute, CharacterMetadata, SheetLayout};

/// Collection-level fields stamped into every packaged record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    pub symbol: String,
    pub seller_fee_basis_points: u32,
    pub creator_address: String,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        LaunchConfig {
            symbol: "TAGA".into(),
            seller_fee_basis_points: 500,
            creator_address: "YOUR_WALLET_ADDRESS".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub uri: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creator {
    pub address: String,
    pub share: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchProperties {
    pub files: Vec<FileEntry>,
    pub category: String,
    pub creators: Vec<Creator>,
}

/// Marketplace metadata record. The `image` and file URIs are bare
/// filenames; the uploader rewrites them to permanent URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchMetadata {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub seller_fee_basis_points: u32,
    pub image: String,
    pub attributes: Vec<Attribute>,
    pub properties: LaunchProperties,
    #[serde(rename = "spriteSheet")]
    pub sprite_sheet: SheetLayout,
}

/// Reshape one character record into the launch schema.
pub fn launch_metadata(meta: &CharacterMetadata, image_name: &str, cfg: &LaunchConfig) -> LaunchMetadata {
    LaunchMetadata {
        name: meta.name.clone(),
        symbol: cfg.symbol.clone(),
        description: meta.description.clone(),
        seller_fee_basis_points: cfg.seller_fee_basis_points,
        image: image_name.to_string(),
        attributes: meta.attributes.clone(),
        properties: LaunchProperties {
            files: vec![FileEntry {
                uri: image_name.to_string(),
                kind: "image/png".into(),
            }],
            category: "image".into(),
            creators: vec![Creator {
                address: cfg.creator_address.clone(),
                share: 100,
            }],
        },
        sprite_sheet: meta.sprite_sheet.clone(),
    }
}

/// Package one character: copy its portrait and write the reshaped
/// record. Returns `false` (skipped) when either source file is absent.
pub fn package_one(
    id: u64,
    images: &Path,
    metadata: &Path,
    out_dir: &Path,
    cfg: &LaunchConfig,
) -> Result<bool> {
    let img_name = format!("{id}.png");
    let json_name = format!("{id}.json");
    let src_img = images.join(&img_name);
    let src_json = metadata.join(&json_name);
    if !src_img.exists() || !src_json.exists() {
        tracing::debug!(id, "skipping, source files missing");
        return Ok(false);
    }

    std::fs::copy(&src_img, out_dir.join("images").join(&img_name))?;

    let raw = std::fs::read_to_string(&src_json)?;
    let meta: CharacterMetadata = serde_json::from_str(&raw)?;
    let launch = launch_metadata(&meta, &img_name, cfg);
    let json = serde_json::to_string_pretty(&launch)?;
    std::fs::write(out_dir.join("metadata").join(&json_name), json)?;
    Ok(true)
}

/// Package ids `0..count` into `out_dir/{images,metadata}`. Characters
/// with missing files are skipped. Returns the number packaged.
pub fn package_collection(
    images: &Path,
    metadata: &Path,
    out_dir: &Path,
    count: u64,
    cfg: &LaunchConfig,
) -> Result<u64> {
    std::fs::create_dir_all(out_dir.join("images"))?;
    std::fs::create_dir_all(out_dir.join("metadata"))?;

    let mut packaged = 0u64;
    for id in 0..count {
        if package_one(id, images, metadata, out_dir, cfg)? {
            packaged += 1;
        }
        if id % 100 == 0 {
            tracing::info!(id, packaged, "packaging");
        }
    }
    tracing::info!(packaged, out = %out_dir.display(), "launch package complete");
    Ok(packaged)
}
