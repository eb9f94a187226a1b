//! Asset tree indexer.
//!
//! Walks the sprite sheet tree once and emits the JSON [`AssetIndex`] the
//! generator consumes. Tags (age, gender, species kind, behind flag) are
//! inferred from path segments; sheets are recognized as action sheets when
//! either the file stem or the parent directory names a known action.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::core::Result;
use crate::index::{Age, AssetIndex, Gender, LayerAsset, VariantRecord};

/// Animation rows an asset sheet may represent.
pub const ACTIONS: [&str; 10] = [
    "walk",
    "thrust",
    "slash",
    "idle",
    "attack_thrust",
    "attack_slash",
    "attack_walk",
    "spellcast",
    "shoot",
    "hurt",
];

/// Layer categories indexed as variant lists (bodies are handled apart).
pub const LAYER_CATEGORIES: [&str; 7] =
    ["hair", "torso", "legs", "feet", "eyes", "head", "weapon"];

/// Structural folder names that are never a species/type tag.
const SKIP_KEYWORDS: [&str; 22] = [
    "heads",
    "bodies",
    "clothes",
    "bodies_human",
    "bodies_monsters",
    "adult",
    "teen",
    "child",
    "male",
    "female",
    "any",
    "behind",
    "back",
    "faces",
    "ears",
    "nose",
    "wrinkles",
    "fins",
    "horns",
    "mask",
    "jewelry",
    "glasses",
];

fn is_action(name: &str) -> bool {
    ACTIONS.contains(&name)
}

fn has_component(path: &Path, wanted: &str) -> bool {
    path.components().any(|c| match c {
        Component::Normal(os) => os.eq_ignore_ascii_case(wanted),
        _ => false,
    })
}

fn lowercase_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(os) => Some(os.to_string_lossy().to_lowercase()),
            _ => None,
        })
        .collect()
}

/// Identity of a variant: the path prefix up to the action segment.
///
/// `weapon/sword/scimitar/walk/scimitar.png` and its `slash` sibling both
/// collapse to `weapon/sword/scimitar`.
fn identity_for(path: &Path) -> Option<String> {
    let mut prefix = PathBuf::new();
    for component in path.components() {
        if let Component::Normal(os) = component {
            let name = os.to_string_lossy().to_lowercase();
            let stem = name.trim_end_matches(".png");
            if is_action(stem) {
                return Some(prefix.to_string_lossy().into_owned());
            }
        }
        prefix.push(component);
    }
    None
}

/// Species/type tag: first segment after the category directory that is
/// neither structural, an action, nor a file.
fn infer_kind(path: &Path, category: &str) -> String {
    let parts = lowercase_components(path);
    let Some(cat_idx) = parts.iter().position(|p| p == category) else {
        return "generic".into();
    };
    for part in &parts[cat_idx + 1..] {
        if !SKIP_KEYWORDS.contains(&part.as_str()) && !is_action(part) && !part.ends_with(".png") {
            return part.clone();
        }
    }
    "generic".into()
}

fn discover_layer(dir: &Path, category: &str) -> Vec<VariantRecord> {
    let mut grouped: BTreeMap<String, VariantRecord> = BTreeMap::new();

    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(name) = path.file_name().and_then(OsStr::to_str) else {
            continue;
        };
        if !name.ends_with(".png") || name.starts_with('.') {
            continue;
        }
        // Head assets proper live under a "heads" folder; faces, ears and
        // other accessory folders in the same tree are not heads.
        if category == "head" && !has_component(path, "heads") {
            continue;
        }

        let stem = name.trim_end_matches(".png").to_lowercase();
        let action = if is_action(&stem) {
            stem
        } else {
            let parent = path
                .parent()
                .and_then(Path::file_name)
                .map(|os| os.to_string_lossy().to_lowercase());
            match parent {
                Some(dir_name) if is_action(&dir_name) => dir_name,
                _ => continue,
            }
        };

        let lossy = path.to_string_lossy().to_lowercase();
        let age = if lossy.contains("child") {
            Age::Child
        } else if lossy.contains("teen") {
            Age::Teen
        } else {
            Age::Adult
        };
        let gender = if lossy.contains("female") {
            Gender::Female
        } else if lossy.contains("male") {
            Gender::Male
        } else {
            Gender::Any
        };
        let behind = lossy.contains("behind") || lossy.contains("back");
        let Some(identity) = identity_for(path) else {
            continue;
        };

        let record = grouped.entry(identity.clone()).or_insert_with(|| VariantRecord {
            id: identity,
            age,
            kind: infer_kind(path, category),
            gender,
            actions: BTreeMap::new(),
        });
        record.actions.entry(action).or_default().push(LayerAsset {
            path: path.to_path_buf(),
            behind,
        });
    }

    grouped.into_values().collect()
}

fn index_bodies(root: &Path, index: &mut AssetIndex) -> Result<()> {
    let body_dir = root.join("body").join("bodies");
    if !body_dir.is_dir() {
        return Ok(());
    }
    for entry in std::fs::read_dir(&body_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let species = entry.file_name().to_string_lossy().to_lowercase();
        let mut actions = BTreeMap::new();
        for file in WalkDir::new(entry.path()).into_iter().filter_map(|e| e.ok()) {
            if !file.file_type().is_file() {
                continue;
            }
            let Some(name) = file.path().file_name().and_then(OsStr::to_str) else {
                continue;
            };
            if !name.ends_with(".png") {
                continue;
            }
            // Action comes from the file stem (male/walk.png) or the
            // parent directory (skeleton/walk/skeleton.png).
            let stem = name.trim_end_matches(".png").to_lowercase();
            let action = if is_action(&stem) {
                stem
            } else {
                let parent = file
                    .path()
                    .parent()
                    .and_then(Path::file_name)
                    .map(|os| os.to_string_lossy().to_lowercase());
                match parent {
                    Some(dir_name) if is_action(&dir_name) => dir_name,
                    _ => continue,
                }
            };
            actions.entry(action).or_insert_with(|| file.path().to_path_buf());
        }
        index.bodies.insert(species, actions);
    }
    Ok(())
}

/// Build the full index for an asset tree rooted at `root`.
pub fn build_index(root: &Path) -> Result<AssetIndex> {
    let mut index = AssetIndex::default();

    index_bodies(root, &mut index)?;

    for category in LAYER_CATEGORIES {
        let layer_dir = root.join(category);
        let variants = if layer_dir.is_dir() {
            discover_layer(&layer_dir, category)
        } else {
            Vec::new()
        };
        tracing::debug!(category, variants = variants.len(), "indexed layer");
        index.layers.insert(category.to_string(), variants);
    }

    tracing::info!(
        species = index.bodies.len(),
        layers = index.layers.len(),
        "indexing complete"
    );
    Ok(index)
}
