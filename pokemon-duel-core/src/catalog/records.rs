//! Typed rows of the reference catalog.
//!
//! Columns that do not apply to every row are `Option`s; nothing here uses
//! sentinel values for "not applicable".

use super::effect::MoveEffect;
use crate::error::CatalogError;
use crate::sim::stats::{BaseStats, BattleStat};
use crate::sim::status::StatusId;
use crate::sim::types::Type;
use serde::{Deserialize, Serialize};

fn default_generation() -> u8 {
    1
}

fn default_happiness() -> u8 {
    70
}

fn default_pp() -> u8 {
    10
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub id: u16,
    pub name: String,
    #[serde(default = "default_generation")]
    pub generation: u8,
    pub types: Vec<Type>,
    pub base_stats: BaseStats,
    #[serde(default = "default_happiness")]
    pub base_happiness: u8,
    /// Kilograms.
    #[serde(default)]
    pub weight: f64,
    /// Eighths female, `None` for genderless species.
    #[serde(default)]
    pub gender_rate: Option<i8>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageClass {
    Status,
    Physical,
    Special,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveTarget {
    SpecificMove,
    SelectedPokemonMeFirst,
    Ally,
    UsersField,
    UserOrAlly,
    OpponentsField,
    User,
    RandomOpponent,
    AllOtherPokemon,
    SelectedPokemon,
    AllOpponents,
    EntireField,
    UserAndAllies,
    AllPokemon,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetaCategory {
    #[default]
    Damage,
    Ailment,
    NetGoodStats,
    Heal,
    DamageAilment,
    Swagger,
    DamageLower,
    DamageRaise,
    DamageHeal,
    Ohko,
    WholeFieldEffect,
    FieldEffect,
    ForceSwitch,
    Unique,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveFlag {
    Contact,
    Charge,
    Recharge,
    Protect,
    Reflectable,
    Snatch,
    Mirror,
    Punch,
    Sound,
    Gravity,
    Defrost,
    Distance,
    Heal,
    Authentic,
    Bite,
    Pulse,
}

/// Secondary metadata shared by most moves.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveMeta {
    pub category: MetaCategory,
    pub ailment: StatusId,
    pub min_hits: Option<u8>,
    pub max_hits: Option<u8>,
    pub min_turns: Option<u8>,
    pub max_turns: Option<u8>,
    /// Percent of damage dealt returned to the user; negative is recoil.
    pub drain: Option<i16>,
    /// Percent of the user's max HP restored; negative hurts the user.
    pub healing: Option<i16>,
    pub crit_rate: u8,
    pub ailment_chance: Option<u8>,
    pub flinch_chance: Option<u8>,
    pub stat_chance: Option<u8>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatChange {
    pub stat: BattleStat,
    pub change: i8,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MoveRecord {
    pub id: u16,
    pub name: String,
    pub move_type: Type,
    pub generation: u8,
    pub power: Option<u16>,
    pub pp: u8,
    pub accuracy: Option<u8>,
    pub priority: i8,
    pub target: MoveTarget,
    pub damage_class: DamageClass,
    pub effect_id: u16,
    pub effect: MoveEffect,
    pub effect_chance: Option<u8>,
    pub meta: MoveMeta,
    pub stat_changes: Vec<StatChange>,
    pub flags: Vec<MoveFlag>,
}

impl MoveRecord {
    pub fn has_flag(&self, flag: MoveFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn is_damaging(&self) -> bool {
        self.damage_class != DamageClass::Status
    }
}

/// Move row as it appears in catalog files, before the effect id is resolved.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct RawMove {
    id: u16,
    name: String,
    #[serde(rename = "type")]
    move_type: Type,
    #[serde(default = "default_generation")]
    generation: u8,
    #[serde(default)]
    power: Option<u16>,
    #[serde(default = "default_pp")]
    pp: u8,
    #[serde(default)]
    accuracy: Option<u8>,
    #[serde(default)]
    priority: i8,
    target: MoveTarget,
    damage_class: DamageClass,
    #[serde(default = "default_effect_id")]
    effect_id: u16,
    #[serde(default)]
    effect_chance: Option<u8>,
    #[serde(default)]
    meta: MoveMeta,
    #[serde(default)]
    stat_changes: Vec<StatChange>,
    #[serde(default)]
    flags: Vec<MoveFlag>,
}

fn default_effect_id() -> u16 {
    1
}

impl RawMove {
    pub(crate) fn generation(&self) -> u8 {
        self.generation
    }

    pub(crate) fn into_record(self) -> Result<MoveRecord, CatalogError> {
        let effect = MoveEffect::from_id(self.effect_id).ok_or_else(|| {
            CatalogError::UnhandledEffect {
                move_name: self.name.clone(),
                effect_id: self.effect_id,
            }
        })?;
        Ok(MoveRecord {
            id: self.id,
            name: self.name,
            move_type: self.move_type,
            generation: self.generation,
            power: self.power,
            pp: self.pp,
            accuracy: self.accuracy,
            priority: self.priority,
            target: self.target,
            damage_class: self.damage_class,
            effect_id: self.effect_id,
            effect,
            effect_chance: self.effect_chance,
            meta: self.meta,
            stat_changes: self.stat_changes,
            flags: self.flags,
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlingEffect {
    BadlyPoison,
    Burn,
    BerryEffect,
    HerbEffect,
    Paralyze,
    Poison,
    Flinch,
}

impl FlingEffect {
    /// Condition inflicted on the target when the item is flung.
    pub fn status(self) -> Option<StatusId> {
        match self {
            FlingEffect::BadlyPoison | FlingEffect::Poison => Some(StatusId::POISON),
            FlingEffect::Burn => Some(StatusId::BURN),
            FlingEffect::Paralyze => Some(StatusId::PARALYSIS),
            FlingEffect::Flinch => Some(StatusId::FLINCH),
            FlingEffect::BerryEffect | FlingEffect::HerbEffect => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: u16,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub fling_power: Option<u16>,
    #[serde(default)]
    pub fling_effect: Option<FlingEffect>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbilityRecord {
    pub id: u16,
    pub name: String,
}

/// Power and type a berry lends to natural gift.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NaturalGiftRecord {
    pub item: String,
    pub power: u16,
    #[serde(rename = "type")]
    pub move_type: Type,
}

/// One cell of the type chart, as a percent damage factor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeChartEntry {
    pub attacking: Type,
    pub defending: Type,
    pub damage_factor: u16,
}
