//! Trait selection.
//!
//! Draws a species by weighted random choice, a body variant from that
//! species' allowed keys, and one concrete asset variant per visual layer,
//! filtered by the age/gender/species tags the indexer inferred. Filters
//! degrade gracefully: an empty pool at any stage falls back to the
//! previous pool rather than failing the draw.

use std::collections::BTreeMap;

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::config::{PipelineConfig, SpeciesSpec};
use crate::core::{PipelineError, Result};
use crate::index::{Age, AssetIndex, Gender, VariantRecord};

/// Visual layers of a composited character, in selection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Hair,
    Head,
    Torso,
    Legs,
    Feet,
    Weapon,
    Eyes,
}

impl Layer {
    pub const ALL: [Layer; 7] = [
        Layer::Hair,
        Layer::Head,
        Layer::Torso,
        Layer::Legs,
        Layer::Feet,
        Layer::Weapon,
        Layer::Eyes,
    ];

    /// Index category name for this layer.
    pub fn name(self) -> &'static str {
        match self {
            Layer::Hair => "hair",
            Layer::Head => "head",
            Layer::Torso => "torso",
            Layer::Legs => "legs",
            Layer::Feet => "feet",
            Layer::Weapon => "weapon",
            Layer::Eyes => "eyes",
        }
    }
}

/// One character's rolled traits. Ephemeral; persisted only through the
/// sheet and metadata derived from it.
#[derive(Debug, Clone)]
pub struct TraitSelection {
    pub species: String,
    pub head_type: String,
    pub body_key: String,
    pub age: Age,
    pub gender: Gender,
    /// Color fragment used to bias hair asset choice.
    pub hair_color: String,
    pub layers: BTreeMap<Layer, VariantRecord>,
}

impl TraitSelection {
    pub fn is_human(&self) -> bool {
        self.species == "human"
    }

    pub fn layer(&self, layer: Layer) -> Option<&VariantRecord> {
        self.layers.get(&layer)
    }
}

fn draw_species<'a>(species: &'a [SpeciesSpec], rng: &mut impl Rng) -> Result<&'a SpeciesSpec> {
    let dist = WeightedIndex::new(species.iter().map(|s| s.weight))
        .map_err(|e| PipelineError::Config(format!("bad species weights: {e}")))?;
    Ok(&species[dist.sample(rng)])
}

fn age_for_body(body_key: &str) -> Age {
    if body_key.contains("child") {
        Age::Child
    } else if body_key.contains("teen") {
        Age::Teen
    } else {
        Age::Adult
    }
}

fn gender_for_body(body_key: &str) -> Gender {
    if body_key.contains("female") {
        Gender::Female
    } else if body_key.contains("male") || body_key.contains("muscular") {
        Gender::Male
    } else {
        Gender::Any
    }
}

fn denylisted(id: &str, denylist: &[String]) -> bool {
    let id = id.to_lowercase();
    denylist.iter().any(|word| id.contains(word.as_str()))
}

/// Pick one variant for a layer, or `None` when the index has nothing.
///
/// Age filter falls back requested -> adult -> whole pool; gender keeps
/// matching-or-any assets when any exist; the species type tag narrows the
/// pool further, with a name denylist applied for humans to keep
/// cross-species parts off human characters.
pub fn pick_variant(
    pool: &[VariantRecord],
    age: Age,
    gender: Gender,
    head_type: &str,
    human: bool,
    denylist: &[String],
    rng: &mut impl Rng,
) -> Option<VariantRecord> {
    for age_filter in [Some(age), Some(Age::Adult), None] {
        let mut candidates: Vec<&VariantRecord> = match age_filter {
            Some(a) => pool.iter().filter(|v| v.age == a).collect(),
            None => pool.iter().collect(),
        };
        if candidates.is_empty() {
            continue;
        }

        if gender != Gender::Any {
            let gendered: Vec<&VariantRecord> = candidates
                .iter()
                .copied()
                .filter(|v| v.gender == gender || v.gender == Gender::Any)
                .collect();
            if !gendered.is_empty() {
                candidates = gendered;
            }
        }

        let mut matches: Vec<&VariantRecord> = candidates
            .iter()
            .copied()
            .filter(|v| v.kind.eq_ignore_ascii_case(head_type))
            .collect();
        if human {
            matches.retain(|v| !denylisted(&v.id, denylist));
        }
        if let Some(chosen) = matches.choose(rng) {
            return Some((*chosen).clone());
        }
        if let Some(chosen) = candidates.choose(rng) {
            return Some((*chosen).clone());
        }
    }
    None
}

/// Roll a full trait selection for one character.
pub fn select_traits(
    cfg: &PipelineConfig,
    index: &AssetIndex,
    rng: &mut impl Rng,
) -> Result<TraitSelection> {
    if cfg.species.is_empty() {
        return Err(PipelineError::Config("species table is empty".into()));
    }
    let species = draw_species(&cfg.species, rng)?;
    let body_key = species
        .body_keys
        .choose(rng)
        .ok_or_else(|| PipelineError::Config(format!("species {} has no body keys", species.name)))?
        .clone();

    let age = age_for_body(&body_key);
    let gender = gender_for_body(&body_key);
    let hair_color = cfg
        .hair_colors
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| "brown".into());
    let human = species.name == "human";

    let mut layers = BTreeMap::new();
    for layer in Layer::ALL {
        // Hair only renders sensibly on human heads.
        if layer == Layer::Hair && !human {
            continue;
        }
        let picked = pick_variant(
            index.layer(layer.name()),
            age,
            gender,
            &species.head_type,
            human,
            &cfg.human_denylist,
            rng,
        );
        if let Some(variant) = picked {
            layers.insert(layer, variant);
        }
    }

    Ok(TraitSelection {
        species: species.name.clone(),
        head_type: species.head_type.clone(),
        body_key,
        age,
        gender,
        hair_color,
        layers,
    })
}
