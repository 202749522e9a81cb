use crate::catalog::{Catalog, DamageClass, ItemRecord, MoveRecord};
use crate::error::BattleError;
use crate::sim::stats::{stage_multiplier, BaseStats, BattleStat, Nature, StatsSet};
use crate::sim::status::{StatusId, StatusLedger};
use crate::sim::types::Type;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const MAX_LEVEL: u8 = 100;
pub const MAX_IV: u8 = 31;
pub const MAX_EV: u16 = 255;
pub const MAX_EV_TOTAL: u32 = 510;
pub const MAX_MOVES: usize = 4;
const DAMAGE_HISTORY_LEN: usize = 5;

fn default_level() -> u8 {
    50
}

/// Everything needed to build a combatant from the catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CombatantSpec {
    pub species: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default = "default_level")]
    pub level: u8,
    #[serde(default)]
    pub nature: Nature,
    /// HP, Atk, Def, SpA, SpD, Spe. Defaults to 31 across the board.
    #[serde(default)]
    pub ivs: Option<Vec<u8>>,
    #[serde(default)]
    pub evs: Option<Vec<u16>>,
    #[serde(default)]
    pub ability: Option<String>,
    #[serde(default)]
    pub item: Option<String>,
    pub moves: Vec<String>,
    /// Defaults to the species' base happiness.
    #[serde(default)]
    pub happiness: Option<u8>,
}

impl CombatantSpec {
    pub fn new(species: impl Into<String>, level: u8, moves: &[&str]) -> Self {
        Self {
            species: species.into(),
            nickname: None,
            level,
            nature: Nature::default(),
            ivs: None,
            evs: None,
            ability: None,
            item: None,
            moves: moves.iter().map(|name| name.to_string()).collect(),
            happiness: None,
        }
    }

    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    pub fn with_ability(mut self, ability: impl Into<String>) -> Self {
        self.ability = Some(ability.into());
        self
    }

    pub fn with_nature(mut self, nature: Nature) -> Self {
        self.nature = nature;
        self
    }

    pub fn with_ivs(mut self, ivs: Vec<u8>) -> Self {
        self.ivs = Some(ivs);
        self
    }

    pub fn with_evs(mut self, evs: Vec<u16>) -> Self {
        self.evs = Some(evs);
        self
    }

    pub fn with_happiness(mut self, happiness: u8) -> Self {
        self.happiness = Some(happiness);
        self
    }

    /// Rolls every individual value uniformly in 0..=31.
    pub fn with_random_ivs(mut self, rng: &mut impl Rng) -> Self {
        self.ivs = Some((0..6).map(|_| rng.gen_range(0..=MAX_IV)).collect());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MoveSlot {
    pub record: MoveRecord,
    pub pp: u8,
    pub max_pp: u8,
}

impl MoveSlot {
    pub fn new(record: MoveRecord) -> Self {
        let pp = record.pp;
        Self {
            record,
            pp,
            max_pp: pp,
        }
    }

    pub fn with_pp(record: MoveRecord, pp: u8) -> Self {
        Self {
            record,
            pp,
            max_pp: pp,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DamageRecord {
    pub turn: u32,
    pub amount: u16,
    pub class: DamageClass,
}

/// Short-lived values that move effects read and write.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TurnFlags {
    /// Stockpiled energy, 0..=3.
    pub stockpile: u8,
    /// Defense and Special Defense stages gained through stockpiling.
    pub stockpile_gains: (i8, i8),
    /// Id of the last move this combatant landed.
    pub last_move: Option<u16>,
    /// Move id of a two-turn move waiting to strike.
    pub charging: Option<u16>,
}

/// One creature in battle.
///
/// `current` always equals `floor(stats × stage multiplier)` for every staged
/// stat; it is only ever written by [`Combatant::recompute_current`]. HP is
/// never staged.
#[derive(Clone, Debug)]
pub struct Combatant {
    pub species_id: u16,
    pub name: String,
    pub level: u8,
    pub types: Vec<Type>,
    pub base: BaseStats,
    pub ivs: [u8; 6],
    pub evs: [u16; 6],
    pub nature: Nature,
    pub stats: StatsSet,
    pub hp: u16,
    pub crit_stage: u8,
    pub ability: Option<String>,
    pub moves: Vec<MoveSlot>,
    pub happiness: u8,
    pub weight: f64,
    pub status: StatusLedger,
    pub flags: TurnFlags,
    /// 1 acts first this turn, 2 acts second, 0 not yet ordered.
    pub order: u8,
    item: Option<ItemRecord>,
    stages: [i8; 7],
    current: StatsSet,
    history: VecDeque<DamageRecord>,
    stage_gains: u32,
    last_end_of_turn: Option<u32>,
}

impl Combatant {
    /// Builds a combatant, validating every parameter before anything is
    /// allocated.
    pub fn from_catalog(catalog: &Catalog, spec: &CombatantSpec) -> Result<Self, BattleError> {
        if spec.level == 0 || spec.level > MAX_LEVEL {
            return Err(BattleError::InvalidLevel(spec.level));
        }
        let ivs = validate_ivs(spec.ivs.as_deref())?;
        let evs = validate_evs(spec.evs.as_deref())?;
        if spec.moves.is_empty() || spec.moves.len() > MAX_MOVES {
            return Err(BattleError::InvalidMoveCount(spec.moves.len()));
        }

        let species = catalog.species(&spec.species)?;
        let ability = spec
            .ability
            .as_deref()
            .map(|name| catalog.ability(name).map(|record| record.name.clone()))
            .transpose()?;
        let item = spec
            .item
            .as_deref()
            .map(|name| catalog.item(name).cloned())
            .transpose()?;
        let moves = spec
            .moves
            .iter()
            .map(|name| catalog.move_named(name).map(|record| MoveSlot::new(record.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        let stats = StatsSet::compute(&species.base_stats, spec.level, ivs, evs, spec.nature);
        let mut combatant = Self {
            species_id: species.id,
            name: spec.nickname.clone().unwrap_or_else(|| species.name.clone()),
            level: spec.level,
            types: species.types.clone(),
            base: species.base_stats,
            ivs,
            evs,
            nature: spec.nature,
            stats,
            hp: stats.hp,
            crit_stage: 0,
            ability,
            moves,
            happiness: spec.happiness.unwrap_or(species.base_happiness),
            weight: species.weight,
            status: StatusLedger::new(),
            flags: TurnFlags::default(),
            order: 0,
            item: None,
            stages: [0; 7],
            current: stats,
            history: VecDeque::with_capacity(DAMAGE_HISTORY_LEN),
            stage_gains: 0,
            last_end_of_turn: None,
        };
        combatant.set_item(item);
        Ok(combatant)
    }

    /// Restores the combatant to its pre-battle state.
    pub fn reset_battle_state(&mut self) {
        self.hp = self.stats.hp;
        self.stages = [0; 7];
        self.recompute_current();
        self.status.clear();
        self.flags = TurnFlags::default();
        self.order = 0;
        self.history.clear();
        self.stage_gains = 0;
        self.last_end_of_turn = None;
        self.crit_stage = item_crit_stage(self.item.as_ref(), self.species_id);
        for slot in &mut self.moves {
            slot.pp = slot.max_pp;
        }
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.hp
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        dealt
    }

    /// Returns the HP actually restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let healed = amount.min(self.stats.hp - self.hp);
        self.hp += healed;
        healed
    }

    pub fn faint(&mut self) {
        self.hp = 0;
    }

    pub fn stage(&self, stat: BattleStat) -> i8 {
        self.stages[stat.index()]
    }

    /// Current in-battle value of a staged stat. Accuracy and evasion are
    /// expressed against a baseline of 100.
    pub fn current(&self, stat: BattleStat) -> u16 {
        match self.current.staged(stat) {
            Some(value) => value,
            None => (100.0 * stage_multiplier(self.stage(stat))).floor() as u16,
        }
    }

    pub fn current_stats(&self) -> &StatsSet {
        &self.current
    }

    pub fn accuracy_factor(&self) -> f64 {
        stage_multiplier(self.stage(BattleStat::Accuracy))
    }

    pub fn evasion_factor(&self) -> f64 {
        stage_multiplier(self.stage(BattleStat::Evasion))
    }

    /// Moves a stage by `delta`, clamped to -6..=6. Returns the change that
    /// actually took effect.
    pub fn change_stage(&mut self, stat: BattleStat, delta: i8) -> i8 {
        let idx = stat.index();
        let before = self.stages[idx];
        let after = (before as i16 + delta as i16).clamp(-6, 6) as i8;
        self.stages[idx] = after;
        let applied = after - before;
        if applied > 0 && stat.is_core() {
            self.stage_gains += applied as u32;
        }
        self.recompute_current();
        applied
    }

    /// Clears every stage, as haze does.
    pub fn reset_stages(&mut self) {
        self.stages = [0; 7];
        self.stage_gains = 0;
        self.recompute_current();
    }

    /// Total positive stage change received, excluding accuracy and evasion.
    pub fn stage_gains(&self) -> u32 {
        self.stage_gains
    }

    pub fn recompute_current(&mut self) {
        let scaled = |value: u16, stage: i8| (value as f64 * stage_multiplier(stage)).floor() as u16;
        self.current = StatsSet {
            hp: self.stats.hp,
            atk: scaled(self.stats.atk, self.stage(BattleStat::Attack)),
            def: scaled(self.stats.def, self.stage(BattleStat::Defense)),
            spa: scaled(self.stats.spa, self.stage(BattleStat::SpecialAttack)),
            spd: scaled(self.stats.spd, self.stage(BattleStat::SpecialDefense)),
            spe: scaled(self.stats.spe, self.stage(BattleStat::Speed)),
        };
    }

    pub fn is_type(&self, ty: Type) -> bool {
        self.types.contains(&ty)
    }

    pub fn has_ability(&self, name: &str) -> bool {
        self.ability.as_deref() == Some(name)
    }

    pub fn item(&self) -> Option<&ItemRecord> {
        self.item.as_ref()
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.item.as_ref().is_some_and(|item| item.name == name)
    }

    /// Gives the combatant an item. The critical stage granted by the item is
    /// assigned, not added, so re-equipping never stacks.
    pub fn set_item(&mut self, item: Option<ItemRecord>) {
        self.crit_stage = item_crit_stage(item.as_ref(), self.species_id);
        self.item = item;
    }

    /// Removes and returns the held item (fling, natural gift).
    pub fn take_item(&mut self) -> Option<ItemRecord> {
        let item = self.item.take();
        self.crit_stage = item_crit_stage(None, self.species_id);
        item
    }

    pub fn non_volatile(&self) -> Option<StatusId> {
        self.status.non_volatile().map(|entry| entry.id)
    }

    pub fn slot(&self, idx: usize) -> Result<&MoveSlot, BattleError> {
        self.moves.get(idx).ok_or(BattleError::InvalidMoveSlot(idx))
    }

    pub fn slot_of(&self, move_id: u16) -> Option<usize> {
        self.moves.iter().position(|slot| slot.record.id == move_id)
    }

    pub fn record_damage(&mut self, turn: u32, amount: u16, class: DamageClass) {
        if self.history.len() == DAMAGE_HISTORY_LEN {
            self.history.pop_back();
        }
        self.history.push_front(DamageRecord { turn, amount, class });
    }

    /// Most recent damage received, newest first.
    pub fn history(&self) -> impl Iterator<Item = &DamageRecord> {
        self.history.iter()
    }

    /// The latest hit taken during `turn`, if any.
    pub fn damage_taken_on(&self, turn: u32) -> Option<&DamageRecord> {
        self.history.front().filter(|record| record.turn == turn)
    }

    pub(crate) fn end_of_turn_done(&self, turn: u32) -> bool {
        self.last_end_of_turn == Some(turn)
    }

    pub(crate) fn mark_end_of_turn(&mut self, turn: u32) {
        self.last_end_of_turn = Some(turn);
    }
}

fn item_crit_stage(item: Option<&ItemRecord>, species_id: u16) -> u8 {
    match item.map(|item| item.name.as_str()) {
        Some("scope-lens") | Some("razor-claw") => 1,
        Some("stick") if species_id == 83 => 2,
        Some("lucky-punch") if species_id == 113 => 2,
        _ => 0,
    }
}

fn validate_ivs(ivs: Option<&[u8]>) -> Result<[u8; 6], BattleError> {
    let Some(ivs) = ivs else {
        return Ok([MAX_IV; 6]);
    };
    let ivs: [u8; 6] = ivs.try_into().map_err(|_| BattleError::InvalidStatArray {
        field: "ivs",
        len: ivs.len(),
    })?;
    if let Some(bad) = ivs.iter().find(|iv| **iv > MAX_IV) {
        return Err(BattleError::IvOutOfRange(*bad));
    }
    Ok(ivs)
}

fn validate_evs(evs: Option<&[u16]>) -> Result<[u16; 6], BattleError> {
    let Some(evs) = evs else {
        return Ok([0; 6]);
    };
    let evs: [u16; 6] = evs.try_into().map_err(|_| BattleError::InvalidStatArray {
        field: "evs",
        len: evs.len(),
    })?;
    if let Some(bad) = evs.iter().find(|ev| **ev > MAX_EV) {
        return Err(BattleError::EvOutOfRange(*bad));
    }
    let total: u32 = evs.iter().map(|ev| *ev as u32).sum();
    if total > MAX_EV_TOTAL {
        return Err(BattleError::EvBudgetExceeded(total));
    }
    Ok(evs)
}
