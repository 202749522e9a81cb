//! Read-only reference data: species, moves, items, abilities, natural-gift
//! berries and the type chart.
//!
//! A [`Catalog`] is built once, filtered to one generation, and then only
//! ever borrowed. It holds no interior mutability, so a single instance can
//! back any number of concurrent battles.

mod effect;
mod records;
pub mod sample;

pub use effect::MoveEffect;
pub use records::{
    AbilityRecord, DamageClass, FlingEffect, ItemRecord, MetaCategory, MoveFlag, MoveMeta,
    MoveRecord, MoveTarget, NaturalGiftRecord, SpeciesRecord, StatChange, TypeChartEntry,
};

use crate::error::CatalogError;
use crate::sim::types::{Type, TypeChart};
use records::RawMove;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Most recent generation the engine knows about.
pub const LATEST_GENERATION: u8 = 9;

/// On-disk layout of a catalog file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogFile {
    species: Vec<SpeciesRecord>,
    moves: Vec<RawMove>,
    items: Vec<ItemRecord>,
    abilities: Vec<AbilityRecord>,
    natural_gift: Vec<NaturalGiftRecord>,
    type_chart: Vec<TypeChartEntry>,
}

#[derive(Clone, Debug)]
pub struct Catalog {
    generation: u8,
    species: BTreeMap<u16, SpeciesRecord>,
    species_names: HashMap<String, u16>,
    moves: BTreeMap<u16, MoveRecord>,
    move_names: HashMap<String, u16>,
    items: BTreeMap<u16, ItemRecord>,
    item_names: HashMap<String, u16>,
    abilities: BTreeMap<u16, AbilityRecord>,
    ability_names: HashMap<String, u16>,
    natural_gift: HashMap<String, NaturalGiftRecord>,
    type_chart: TypeChart,
}

impl Catalog {
    pub fn from_json_str(text: &str, generation: u8) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(text)?;
        Self::from_file(file, generation)
    }

    /// Builds the catalog, keeping only rows introduced at or before
    /// `generation`.
    pub fn from_file(file: CatalogFile, generation: u8) -> Result<Self, CatalogError> {
        let mut species = BTreeMap::new();
        let mut species_names = HashMap::new();
        for record in file.species {
            if record.generation > generation {
                continue;
            }
            species_names.insert(normalize_id(&record.name), record.id);
            insert_unique(&mut species, "species", record.id, record)?;
        }

        let mut moves = BTreeMap::new();
        let mut move_names = HashMap::new();
        for raw in file.moves {
            if raw.generation() > generation {
                continue;
            }
            let record = raw.into_record()?;
            move_names.insert(normalize_id(&record.name), record.id);
            insert_unique(&mut moves, "move", record.id, record)?;
        }

        let mut items = BTreeMap::new();
        let mut item_names = HashMap::new();
        for record in file.items {
            item_names.insert(normalize_id(&record.name), record.id);
            insert_unique(&mut items, "item", record.id, record)?;
        }

        let mut abilities = BTreeMap::new();
        let mut ability_names = HashMap::new();
        for record in file.abilities {
            ability_names.insert(normalize_id(&record.name), record.id);
            insert_unique(&mut abilities, "ability", record.id, record)?;
        }

        let natural_gift = file
            .natural_gift
            .into_iter()
            .map(|record| (normalize_id(&record.item), record))
            .collect();

        let mut type_chart = TypeChart::standard(generation);
        for entry in file.type_chart {
            type_chart.set(entry.attacking, entry.defending, entry.damage_factor as f64 / 100.0);
        }

        tracing::debug!(
            generation,
            species = species.len(),
            moves = moves.len(),
            items = items.len(),
            "catalog loaded"
        );

        Ok(Self {
            generation,
            species,
            species_names,
            moves,
            move_names,
            items,
            item_names,
            abilities,
            ability_names,
            natural_gift,
            type_chart,
        })
    }

    pub fn generation(&self) -> u8 {
        self.generation
    }

    pub fn species(&self, name: &str) -> Result<&SpeciesRecord, CatalogError> {
        self.species_names
            .get(&normalize_id(name))
            .and_then(|id| self.species.get(id))
            .ok_or_else(|| CatalogError::UnknownSpecies(name.to_string()))
    }

    pub fn species_by_id(&self, id: u16) -> Option<&SpeciesRecord> {
        self.species.get(&id)
    }

    pub fn move_named(&self, name: &str) -> Result<&MoveRecord, CatalogError> {
        self.move_names
            .get(&normalize_id(name))
            .and_then(|id| self.moves.get(id))
            .ok_or_else(|| CatalogError::UnknownMove(name.to_string()))
    }

    pub fn move_by_id(&self, id: u16) -> Option<&MoveRecord> {
        self.moves.get(&id)
    }

    /// Every visible move in ascending id order.
    pub fn moves(&self) -> impl Iterator<Item = &MoveRecord> {
        self.moves.values()
    }

    pub fn item(&self, name: &str) -> Result<&ItemRecord, CatalogError> {
        self.item_names
            .get(&normalize_id(name))
            .and_then(|id| self.items.get(id))
            .ok_or_else(|| CatalogError::UnknownItem(name.to_string()))
    }

    pub fn ability(&self, name: &str) -> Result<&AbilityRecord, CatalogError> {
        self.ability_names
            .get(&normalize_id(name))
            .and_then(|id| self.abilities.get(id))
            .ok_or_else(|| CatalogError::UnknownAbility(name.to_string()))
    }

    pub fn natural_gift(&self, item_name: &str) -> Option<&NaturalGiftRecord> {
        self.natural_gift.get(&normalize_id(item_name))
    }

    pub fn type_chart(&self) -> &TypeChart {
        &self.type_chart
    }

    pub fn efficacy(&self, attacking: Type, defender_types: &[Type]) -> f64 {
        self.type_chart.efficacy(attacking, defender_types)
    }
}

fn insert_unique<T>(
    table: &mut BTreeMap<u16, T>,
    name: &'static str,
    id: u16,
    record: T,
) -> Result<(), CatalogError> {
    if table.insert(id, record).is_some() {
        return Err(CatalogError::DuplicateId { table: name, id });
    }
    Ok(())
}

/// Lookup key: lowercase ASCII alphanumerics only, so `Quick Claw`,
/// `quick-claw` and `quickclaw` all match.
pub fn normalize_id(name: &str) -> String {
    name.to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}
