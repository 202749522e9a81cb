//! Battle session: owns both combatants, the turn counter and the RNG.

use crate::battle_logger::{BattleEvent, BattleLogger};
use crate::catalog::{Catalog, MoveRecord};
use crate::error::BattleError;
use crate::sim::action::{execute_action, ActionContext, ActionReport};
use crate::sim::combatant::{Combatant, CombatantSpec};
use crate::sim::end_of_turn::apply_end_of_turn;
use crate::sim::order::{resolve_order, Side};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BattleResult {
    AWins,
    BWins,
    Draw,
}

/// Result of one [`Battle::play_turn`].
#[derive(Clone, Debug, Serialize)]
pub struct TurnReport {
    pub turn: u32,
    pub first: Side,
    /// Actions in the order they resolved.
    pub actions: Vec<(Side, ActionReport)>,
    /// Every event of the turn, end-of-turn effects included.
    pub events: Vec<BattleEvent>,
    pub outcome: Option<BattleResult>,
}

/// One 2-combatant battle.
///
/// The turn counter starts at 1 and is the only clock: status durations,
/// damage history and the end-of-turn guard all read it from here.
pub struct Battle<'c> {
    catalog: &'c Catalog,
    a: Combatant,
    b: Combatant,
    party_a: Vec<Combatant>,
    party_b: Vec<Combatant>,
    turn: u32,
    rng: SmallRng,
    logger: BattleLogger,
}

impl<'c> Battle<'c> {
    pub fn new(catalog: &'c Catalog, mut a: Combatant, mut b: Combatant, seed: u64) -> Self {
        a.reset_battle_state();
        b.reset_battle_state();
        Self {
            catalog,
            a,
            b,
            party_a: Vec::new(),
            party_b: Vec::new(),
            turn: 1,
            rng: SmallRng::seed_from_u64(seed),
            logger: BattleLogger::new(),
        }
    }

    /// Builds both combatants from the catalog, failing before the battle
    /// exists if either spec is invalid.
    pub fn from_specs(
        catalog: &'c Catalog,
        a: &CombatantSpec,
        b: &CombatantSpec,
        seed: u64,
    ) -> Result<Self, BattleError> {
        let a = Combatant::from_catalog(catalog, a)?;
        let b = Combatant::from_catalog(catalog, b)?;
        Ok(Self::new(catalog, a, b, seed))
    }

    /// Benched teammates. They never enter the field but join beat-up.
    pub fn with_parties(mut self, party_a: Vec<Combatant>, party_b: Vec<Combatant>) -> Self {
        self.party_a = party_a;
        self.party_b = party_b;
        self
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    pub fn logger(&self) -> &BattleLogger {
        &self.logger
    }

    pub fn into_logger(self) -> BattleLogger {
        self.logger
    }

    /// Slots `side` may choose this turn. A pending two-turn move is the
    /// only choice while it lasts.
    pub fn legal_slots(&self, side: Side) -> Vec<usize> {
        let mon = self.combatant(side);
        if let Some(idx) = mon.flags.charging.and_then(|id| mon.slot_of(id)) {
            return vec![idx];
        }
        mon.moves
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.pp > 0)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// `None` while both combatants stand.
    pub fn outcome(&self) -> Option<BattleResult> {
        match (self.a.is_fainted(), self.b.is_fainted()) {
            (false, false) => None,
            (true, true) => Some(BattleResult::Draw),
            (false, true) => Some(BattleResult::AWins),
            (true, false) => Some(BattleResult::BWins),
        }
    }

    /// Runs a full turn: order, both actions, end of turn, status decay.
    ///
    /// Both choices are validated before anything changes. The second action
    /// is skipped once either combatant has fainted.
    pub fn play_turn(&mut self, slot_a: usize, slot_b: usize) -> Result<TurnReport, BattleError> {
        if self.outcome().is_some() {
            return Err(BattleError::BattleOver);
        }
        let a_move = self.chosen_move(Side::A, slot_a)?;
        let b_move = self.chosen_move(Side::B, slot_b)?;

        let turn = self.turn;
        let mut events = vec![BattleEvent::Turn { turn }];
        let first = resolve_order(&mut self.a, &a_move, &mut self.b, &b_move, &mut self.rng);
        let second = first.opponent();
        let slot_of = |side: Side| match side {
            Side::A => slot_a,
            Side::B => slot_b,
        };
        let move_of = |side: Side| match side {
            Side::A => &a_move,
            Side::B => &b_move,
        };

        let mut actions = Vec::with_capacity(2);
        let report = self.act(first, slot_of(first), move_of(second))?;
        events.extend(report.events.iter().cloned());
        actions.push((first, report));

        if self.outcome().is_none() {
            let report = self.act(second, slot_of(second), move_of(first))?;
            events.extend(report.events.iter().cloned());
            actions.push((second, report));
        }

        for side in [first, second] {
            let mon = self.combatant_mut(side);
            events.extend(apply_end_of_turn(mon, turn)?);
        }
        for side in [Side::A, Side::B] {
            let mon = self.combatant_mut(side);
            for status in mon.status.decay(turn) {
                events.push(BattleEvent::StatusEnd {
                    target: mon.name.clone(),
                    status,
                });
            }
        }

        let outcome = self.outcome();
        tracing::debug!(turn, first = ?first, outcome = ?outcome, "turn complete");
        self.logger.extend(events.iter().cloned());
        match outcome {
            Some(BattleResult::AWins) => self.logger.log_win(&self.a.name),
            Some(BattleResult::BWins) => self.logger.log_win(&self.b.name),
            Some(BattleResult::Draw) => self.logger.log_tie(),
            None => {}
        }
        self.turn += 1;
        Ok(TurnReport {
            turn,
            first,
            actions,
            events,
            outcome,
        })
    }

    /// The move `side` will use for `slot`, validated without side effects.
    fn chosen_move(&self, side: Side, slot: usize) -> Result<MoveRecord, BattleError> {
        let mon = self.combatant(side);
        if let Some(idx) = mon.flags.charging.and_then(|id| mon.slot_of(id)) {
            return Ok(mon.moves[idx].record.clone());
        }
        let chosen = mon.slot(slot)?;
        if chosen.pp == 0 {
            return Err(BattleError::NoPpRemaining(chosen.record.name.clone()));
        }
        Ok(chosen.record.clone())
    }

    fn act(&mut self, side: Side, slot: usize, opposing: &MoveRecord) -> Result<ActionReport, BattleError> {
        let (attacker, defender, party) = match side {
            Side::A => (&mut self.a, &mut self.b, self.party_a.as_slice()),
            Side::B => (&mut self.b, &mut self.a, self.party_b.as_slice()),
        };
        let ctx = ActionContext {
            catalog: self.catalog,
            turn: self.turn,
            party,
            opposing_move: Some(opposing),
        };
        execute_action(attacker, slot, defender, &ctx, &mut self.rng)
    }

    fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }
}
