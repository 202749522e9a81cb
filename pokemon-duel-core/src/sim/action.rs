//! One combatant using one move against the other.
//!
//! [`execute_action`] is the whole pipeline for a single action: mobility,
//! PP, move substitution, two-turn moves, hit, damage, drain and secondary
//! effects. It never touches the turn order; the caller tags both
//! combatants first.

use crate::battle_logger::BattleEvent;
use crate::catalog::{Catalog, DamageClass, MoveEffect, MoveRecord};
use crate::error::BattleError;
use crate::sim::accuracy::{resolves_critical, resolves_hit};
use crate::sim::combatant::Combatant;
use crate::sim::damage::regular_damage;
use crate::sim::direct::{resolve_direct_damage, DirectContext};
use crate::sim::effects::{apply_effects, EffectContext};
use crate::sim::mobility::{check_mobility, Immobility};
use crate::sim::power::{resolve_power, PowerContext, PowerRoll};
use crate::sim::status::StatusId;
use phf::phf_set;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Moves metronome never calls.
static METRONOME_EXCLUDED: phf::Set<&'static str> = phf_set! {
    "assist",
    "chatter",
    "copycat",
    "counter",
    "covet",
    "destiny-bond",
    "detect",
    "endure",
    "feint",
    "focus-punch",
    "follow-me",
    "helping-hand",
    "me-first",
    "metronome",
    "mimic",
    "mirror-coat",
    "mirror-move",
    "protect",
    "quick-guard",
    "sketch",
    "sleep-talk",
    "snatch",
    "struggle",
    "switcheroo",
    "thief",
    "trick",
    "wide-guard",
};

/// Inputs that live outside the two combatants.
pub struct ActionContext<'a> {
    pub catalog: &'a Catalog,
    pub turn: u32,
    /// The attacker's benched teammates.
    pub party: &'a [Combatant],
    /// What the defender chose this turn.
    pub opposing_move: Option<&'a MoveRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "kebab-case")]
pub enum ActionOutcome {
    /// The attacker had already fainted.
    Skipped,
    Immobile { reason: Immobility },
    /// First turn of a two-turn move.
    Charging,
    Missed,
    Failed,
    /// A damaging move the defender's type ignores.
    Immune,
    Hit {
        damage: u16,
        critical: bool,
        effectiveness: f64,
        hits: u8,
    },
}

/// Everything one action did.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionReport {
    /// The move that actually resolved, after any substitution.
    pub move_name: Option<String>,
    pub outcome: ActionOutcome,
    pub events: Vec<BattleEvent>,
    pub attacker_fainted: bool,
    pub defender_fainted: bool,
}

impl ActionReport {
    fn new(move_name: Option<String>, outcome: ActionOutcome, events: Vec<BattleEvent>) -> Self {
        Self {
            move_name,
            outcome,
            events,
            attacker_fainted: false,
            defender_fainted: false,
        }
    }

    pub fn damage(&self) -> u16 {
        match self.outcome {
            ActionOutcome::Hit { damage, .. } => damage,
            _ => 0,
        }
    }

    pub fn connected(&self) -> bool {
        matches!(self.outcome, ActionOutcome::Hit { .. })
    }
}

/// Resolves `attacker` using the move in `slot_idx` against `defender`.
///
/// A pending two-turn move overrides the chosen slot. The slot and its PP
/// are validated before anything changes; PP is then spent once per attempt,
/// hit or miss, but never for the striking turn of a two-turn move.
pub fn execute_action(
    attacker: &mut Combatant,
    slot_idx: usize,
    defender: &mut Combatant,
    ctx: &ActionContext<'_>,
    rng: &mut impl Rng,
) -> Result<ActionReport, BattleError> {
    if attacker.is_fainted() {
        return Ok(ActionReport::new(None, ActionOutcome::Skipped, Vec::new()));
    }

    let pending = attacker
        .flags
        .charging
        .and_then(|id| attacker.slot_of(id));
    let (idx, continuing) = match pending {
        Some(idx) => (idx, true),
        None => (slot_idx, false),
    };
    let slot = attacker.slot(idx)?;
    if !continuing && slot.pp == 0 {
        return Err(BattleError::NoPpRemaining(slot.record.name.clone()));
    }
    let chosen = slot.record.clone();

    let mut events = Vec::new();
    if let Some(reason) = check_mobility(attacker, &chosen, rng) {
        tracing::debug!(mon = %attacker.name, reason = ?reason, "cannot act");
        interrupt_charge(attacker);
        events.push(BattleEvent::Immobile {
            user: attacker.name.clone(),
            reason,
        });
        if let Immobility::Confused(damage) = reason {
            events.push(BattleEvent::damage(attacker, damage));
        }
        let mut report = ActionReport::new(None, ActionOutcome::Immobile { reason }, events);
        report.attacker_fainted = push_faint(attacker, &mut report.events);
        return Ok(report);
    }

    let pp_left = if continuing {
        attacker.moves[idx].pp
    } else {
        let slot = &mut attacker.moves[idx];
        slot.pp -= 1;
        slot.pp
    };
    events.push(BattleEvent::Move {
        user: attacker.name.clone(),
        move_name: chosen.name.clone(),
        target: defender.name.clone(),
    });

    let mv = match substitute(attacker, &chosen, defender, ctx.catalog, rng) {
        Some(mv) => mv,
        None => {
            events.push(BattleEvent::fail(attacker, &chosen.name));
            return Ok(ActionReport::new(Some(chosen.name), ActionOutcome::Failed, events));
        }
    };
    if mv.id != chosen.id {
        tracing::debug!(called = %mv.name, by = %chosen.name, "move substituted");
        events.push(BattleEvent::Move {
            user: attacker.name.clone(),
            move_name: mv.name.clone(),
            target: defender.name.clone(),
        });
    }

    // A called two-turn move the user does not know strikes at once.
    if let MoveEffect::TwoTurnHide(phase) = mv.effect {
        if continuing {
            attacker.flags.charging = None;
            attacker.status.remove(phase);
        } else if attacker.slot_of(mv.id).is_some() {
            attacker.flags.charging = Some(mv.id);
            attacker.status.add(phase, None);
            events.push(BattleEvent::Charging {
                user: attacker.name.clone(),
                move_name: mv.name.clone(),
            });
            return Ok(ActionReport::new(Some(mv.name), ActionOutcome::Charging, events));
        }
    }

    if !resolves_hit(attacker, &mv, defender, rng) {
        tracing::debug!(mon = %attacker.name, move_name = %mv.name, "missed");
        events.push(BattleEvent::Miss {
            user: attacker.name.clone(),
            target: defender.name.clone(),
        });
        return Ok(ActionReport::new(Some(mv.name), ActionOutcome::Missed, events));
    }
    attacker.flags.last_move = Some(mv.id);

    let hit = match strike(attacker, &mv, defender, ctx, pp_left, rng) {
        Strike::Failed => {
            events.push(BattleEvent::fail(attacker, &mv.name));
            let mut report = ActionReport::new(Some(mv.name), ActionOutcome::Failed, events);
            report.attacker_fainted = push_faint(attacker, &mut report.events);
            return Ok(report);
        }
        Strike::Healed(amount) => {
            let healed = defender.heal(amount);
            events.push(BattleEvent::heal(defender, healed));
            let outcome = ActionOutcome::Hit {
                damage: 0,
                critical: false,
                effectiveness: 1.0,
                hits: 1,
            };
            return Ok(ActionReport::new(Some(mv.name), outcome, events));
        }
        Strike::Landed(hit) => hit,
    };

    if hit.damaging && hit.effectiveness == 0.0 {
        events.push(BattleEvent::Effectiveness {
            target: defender.name.clone(),
            factor: 0.0,
        });
        let mut report = ActionReport::new(Some(mv.name), ActionOutcome::Immune, events);
        report.attacker_fainted = push_faint(attacker, &mut report.events);
        return Ok(report);
    }

    let mut dealt = 0;
    if hit.damage > 0 {
        dealt = defender.take_damage(hit.damage);
        defender.record_damage(ctx.turn, dealt, hit.class);
        if hit.critical {
            events.push(BattleEvent::Crit {
                target: defender.name.clone(),
            });
        }
        if hit.effectiveness != 1.0 {
            events.push(BattleEvent::Effectiveness {
                target: defender.name.clone(),
                factor: hit.effectiveness,
            });
        }
        events.push(BattleEvent::damage(defender, dealt));
    }
    apply_drain(attacker, &mv, dealt, &mut events);

    let effect_ctx = EffectContext {
        catalog: ctx.catalog,
        turn: ctx.turn,
    };
    apply_effects(attacker, &mv, defender, &effect_ctx, &mut events, rng);

    tracing::debug!(
        mon = %attacker.name,
        move_name = %mv.name,
        damage = dealt,
        critical = hit.critical,
        "action resolved"
    );
    let outcome = ActionOutcome::Hit {
        damage: dealt,
        critical: hit.critical,
        effectiveness: hit.effectiveness,
        hits: hit.hits,
    };
    let mut report = ActionReport::new(Some(mv.name), outcome, events);
    report.defender_fainted = push_faint(defender, &mut report.events);
    report.attacker_fainted = push_faint(attacker, &mut report.events);
    Ok(report)
}

/// Replaces a move-calling move with the move it calls. `None` means the
/// call failed.
fn substitute(
    attacker: &Combatant,
    chosen: &MoveRecord,
    defender: &Combatant,
    catalog: &Catalog,
    rng: &mut impl Rng,
) -> Option<MoveRecord> {
    let asleep = attacker.status.has(StatusId::SLEEP);
    let called = match chosen.effect {
        MoveEffect::MirrorMove => defender
            .flags
            .last_move
            .and_then(|id| catalog.move_by_id(id))
            .cloned()?,
        MoveEffect::Metronome => {
            let candidates: Vec<&MoveRecord> = catalog
                .moves()
                .filter(|mv| !METRONOME_EXCLUDED.contains(mv.name.as_str()))
                .filter(|mv| attacker.slot_of(mv.id).is_none())
                .collect();
            (*candidates.choose(rng)?).clone()
        }
        MoveEffect::SleepTalk => {
            if !asleep {
                return None;
            }
            let candidates: Vec<&MoveRecord> = attacker
                .moves
                .iter()
                .map(|slot| &slot.record)
                .filter(|mv| mv.id != chosen.id && !calls_another_move(mv.effect))
                .filter(|mv| !matches!(mv.effect, MoveEffect::TwoTurnHide(_)))
                .collect();
            (*candidates.choose(rng)?).clone()
        }
        MoveEffect::Snore if !asleep => return None,
        _ => return Some(chosen.clone()),
    };
    (!calls_another_move(called.effect)).then_some(called)
}

fn calls_another_move(effect: MoveEffect) -> bool {
    matches!(
        effect,
        MoveEffect::MirrorMove | MoveEffect::Metronome | MoveEffect::SleepTalk
    )
}

struct Hit {
    damage: u16,
    critical: bool,
    effectiveness: f64,
    hits: u8,
    class: DamageClass,
    damaging: bool,
}

enum Strike {
    Landed(Hit),
    Healed(u16),
    Failed,
}

fn strike(
    attacker: &mut Combatant,
    mv: &MoveRecord,
    defender: &mut Combatant,
    ctx: &ActionContext<'_>,
    pp_left: u8,
    rng: &mut impl Rng,
) -> Strike {
    let direct_ctx = DirectContext {
        catalog: ctx.catalog,
        turn: ctx.turn,
        party: ctx.party,
    };
    if let Some(direct) = resolve_direct_damage(attacker, mv, defender, &direct_ctx, rng) {
        let Some(damage) = direct else {
            return Strike::Failed;
        };
        return Strike::Landed(Hit {
            damage,
            critical: false,
            effectiveness: ctx.catalog.efficacy(mv.move_type, &defender.types),
            hits: 1,
            class: mv.damage_class,
            damaging: true,
        });
    }

    if !mv.is_damaging() && mv.effect != MoveEffect::MeFirst {
        return Strike::Landed(Hit {
            damage: 0,
            critical: false,
            effectiveness: 1.0,
            hits: 1,
            class: mv.damage_class,
            damaging: false,
        });
    }

    let power_ctx = PowerContext {
        catalog: ctx.catalog,
        turn: ctx.turn,
        opposing_move: ctx.opposing_move,
        pp_left,
    };
    let strike = match resolve_power(attacker, mv, defender, &power_ctx, rng) {
        PowerRoll::Damage(strike) => strike,
        PowerRoll::HealTarget(amount) => return Strike::Healed(amount),
        PowerRoll::Failed => return Strike::Failed,
    };
    let crit = resolves_critical(attacker, mv, rng);
    let hit_range = match (mv.meta.min_hits, mv.meta.max_hits) {
        (Some(min), Some(max)) => Some((min, max.max(min))),
        (Some(min), None) => Some((min, min)),
        _ => None,
    };
    let roll = regular_damage(attacker, &strike, hit_range, defender, ctx.catalog, crit, rng);
    Strike::Landed(Hit {
        damage: roll.damage,
        critical: crit == 2,
        effectiveness: roll.effectiveness,
        hits: roll.hits,
        class: strike.class,
        damaging: true,
    })
}

/// Heals or hurts the attacker by its move's drain percent of the damage dealt.
fn apply_drain(attacker: &mut Combatant, mv: &MoveRecord, dealt: u16, events: &mut Vec<BattleEvent>) {
    let Some(drain) = mv.meta.drain else {
        return;
    };
    let amount = (drain as i32 * dealt as i32).div_euclid(100);
    if amount > 0 {
        let healed = attacker.heal(amount as u16);
        events.push(BattleEvent::heal(attacker, healed));
    } else if amount < 0 {
        let lost = attacker.take_damage(amount.unsigned_abs() as u16);
        events.push(BattleEvent::damage(attacker, lost));
    }
}

fn interrupt_charge(mon: &mut Combatant) {
    if mon.flags.charging.take().is_some() {
        if let Some(phase) = mon.status.semi_invulnerable() {
            mon.status.remove(phase);
        }
    }
}

fn push_faint(mon: &Combatant, events: &mut Vec<BattleEvent>) -> bool {
    if mon.is_fainted() {
        events.push(BattleEvent::Faint {
            target: mon.name.clone(),
        });
    }
    mon.is_fainted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample::sample_catalog;
    use crate::sim::combatant::CombatantSpec;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn catalog() -> &'static Catalog {
        sample_catalog().expect("sample catalog")
    }

    fn mon(species: &str, moves: &[&str]) -> Combatant {
        Combatant::from_catalog(catalog(), &CombatantSpec::new(species, 50, moves)).expect("valid spec")
    }

    fn ctx(turn: u32) -> ActionContext<'static> {
        ActionContext {
            catalog: catalog(),
            turn,
            party: &[],
            opposing_move: None,
        }
    }

    fn act(attacker: &mut Combatant, slot: usize, defender: &mut Combatant, seed: u64) -> ActionReport {
        let mut rng = SmallRng::seed_from_u64(seed);
        execute_action(attacker, slot, defender, &ctx(1), &mut rng).expect("legal action")
    }

    #[test]
    fn a_plain_hit_deals_damage_and_records_it() {
        let mut user = mon("snorlax", &["tackle"]);
        let mut target = mon("pikachu", &["thunderbolt"]);
        let report = act(&mut user, 0, &mut target, 1);
        assert!(report.connected());
        assert!(report.damage() > 0);
        assert_eq!(target.hp, target.max_hp() - report.damage());
        assert_eq!(target.damage_taken_on(1).map(|record| record.amount), Some(report.damage()));
        assert_eq!(user.moves[0].pp, user.moves[0].max_pp - 1);
        assert_eq!(user.flags.last_move, Some(user.moves[0].record.id));
        assert!(matches!(report.events.first(), Some(BattleEvent::Move { .. })));
    }

    #[test]
    fn pp_is_spent_on_a_miss_too() {
        let mut misses = 0;
        for seed in 0..100 {
            let mut user = mon("gengar", &["hypnosis"]);
            let mut target = mon("snorlax", &["tackle"]);
            let report = act(&mut user, 0, &mut target, seed);
            assert_eq!(user.moves[0].pp, user.moves[0].max_pp - 1);
            if report.outcome == ActionOutcome::Missed {
                misses += 1;
                assert!(target.status.is_empty());
            }
        }
        assert!(misses > 0);
    }

    #[test]
    fn illegal_slots_are_rejected_without_side_effects() {
        let mut user = mon("snorlax", &["tackle"]);
        let mut target = mon("pikachu", &["thunderbolt"]);
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(matches!(
            execute_action(&mut user, 3, &mut target, &ctx(1), &mut rng),
            Err(BattleError::InvalidMoveSlot(3))
        ));
        user.moves[0].pp = 0;
        assert!(matches!(
            execute_action(&mut user, 0, &mut target, &ctx(1), &mut rng),
            Err(BattleError::NoPpRemaining(_))
        ));
        assert_eq!(target.hp, target.max_hp());
    }

    #[test]
    fn fainted_attackers_do_nothing() {
        let mut user = mon("snorlax", &["tackle"]);
        let mut target = mon("pikachu", &["thunderbolt"]);
        user.faint();
        let report = act(&mut user, 0, &mut target, 1);
        assert_eq!(report.outcome, ActionOutcome::Skipped);
        assert_eq!(user.moves[0].pp, user.moves[0].max_pp);
        assert_eq!(target.hp, target.max_hp());
    }

    #[test]
    fn immobile_attackers_keep_their_pp() {
        let mut user = mon("snorlax", &["tackle"]);
        let mut target = mon("pikachu", &["thunderbolt"]);
        user.status.add(StatusId::SLEEP, Some(2));
        let report = act(&mut user, 0, &mut target, 1);
        assert_eq!(
            report.outcome,
            ActionOutcome::Immobile {
                reason: Immobility::Asleep
            }
        );
        assert_eq!(user.moves[0].pp, user.moves[0].max_pp);
    }

    #[test]
    fn type_immunity_blocks_damage_and_secondary_effects() {
        let mut user = mon("snorlax", &["tackle"]);
        let mut ghost = mon("gengar", &["tackle"]);
        let report = act(&mut user, 0, &mut ghost, 1);
        assert_eq!(report.outcome, ActionOutcome::Immune);
        assert_eq!(ghost.hp, ghost.max_hp());
    }

    #[test]
    fn drain_heals_and_recoil_hurts() {
        let mut user = mon("venusaur", &["absorb"]);
        let mut target = mon("blastoise", &["tackle"]);
        user.hp = 1;
        let report = act(&mut user, 0, &mut target, 3);
        assert_eq!(user.hp, 1 + report.damage() / 2);

        let mut brute = mon("snorlax", &["double-edge"]);
        let mut victim = mon("chansey", &["tackle"]);
        let report = act(&mut brute, 0, &mut victim, 3);
        let recoil = (-33i32 * report.damage() as i32).div_euclid(100).unsigned_abs() as u16;
        assert_eq!(brute.hp, brute.max_hp() - recoil);
    }

    #[test]
    fn two_turn_moves_hide_then_strike() {
        let mut user = mon("steelix", &["dig", "tackle"]);
        let mut target = mon("pikachu", &["thunderbolt"]);
        let first = act(&mut user, 0, &mut target, 1);
        assert_eq!(first.outcome, ActionOutcome::Charging);
        assert!(user.status.has(StatusId::UNDERGROUND));
        assert_eq!(user.moves[0].pp, user.moves[0].max_pp - 1);
        assert_eq!(target.hp, target.max_hp());

        // The slot argument is ignored while a charge is pending.
        let second = act(&mut user, 1, &mut target, 2);
        assert_eq!(second.move_name.as_deref(), Some("dig"));
        assert!(second.connected());
        assert!(!user.status.has(StatusId::UNDERGROUND));
        assert_eq!(user.flags.charging, None);
        assert_eq!(user.moves[0].pp, user.moves[0].max_pp - 1);
        assert_eq!(user.moves[1].pp, user.moves[1].max_pp);
    }

    #[test]
    fn hiding_targets_dodge_most_moves() {
        let mut user = mon("snorlax", &["tackle", "earthquake"]);
        let mut target = mon("steelix", &["dig"]);
        target.status.add(StatusId::UNDERGROUND, None);
        assert_eq!(act(&mut user, 0, &mut target, 1).outcome, ActionOutcome::Missed);
        assert!(act(&mut user, 1, &mut target, 1).connected());
    }

    #[test]
    fn mirror_move_replays_the_targets_last_move() {
        let mut user = mon("farfetchd", &["mirror-move"]);
        let mut target = mon("pikachu", &["thunderbolt"]);
        let failed = act(&mut user, 0, &mut target, 1);
        assert_eq!(failed.outcome, ActionOutcome::Failed);

        target.flags.last_move = Some(catalog().move_named("thunderbolt").expect("move").id);
        let report = act(&mut user, 0, &mut target, 1);
        assert_eq!(report.move_name.as_deref(), Some("thunderbolt"));
        assert!(report.damage() > 0);
    }

    #[test]
    fn metronome_never_calls_an_excluded_or_known_move() {
        for seed in 0..200 {
            let mut user = mon("chansey", &["metronome", "tackle"]);
            let mut target = mon("snorlax", &["tackle"]);
            let report = act(&mut user, 0, &mut target, seed);
            let called = report.move_name.expect("metronome always calls something");
            assert!(!METRONOME_EXCLUDED.contains(called.as_str()), "called {called}");
            assert_ne!(called, "tackle");
        }
    }

    #[test]
    fn sleep_talk_needs_sleep_and_calls_another_known_move() {
        let mut user = mon("snorlax", &["sleep-talk", "tackle"]);
        let mut target = mon("pikachu", &["thunderbolt"]);
        assert_eq!(act(&mut user, 0, &mut target, 1).outcome, ActionOutcome::Failed);

        user.status.add(StatusId::SLEEP, Some(3));
        let report = act(&mut user, 0, &mut target, 1);
        assert_eq!(report.move_name.as_deref(), Some("tackle"));
        assert!(report.damage() > 0);
    }

    #[test]
    fn snore_fails_while_awake() {
        let mut user = mon("snorlax", &["snore"]);
        let mut target = mon("pikachu", &["thunderbolt"]);
        assert_eq!(act(&mut user, 0, &mut target, 1).outcome, ActionOutcome::Failed);
        user.status.add(StatusId::SLEEP, Some(3));
        assert!(act(&mut user, 0, &mut target, 1).connected());
    }

    #[test]
    fn hyper_beam_forces_a_recharge() {
        let mut user = mon("snorlax", &["hyper-beam"]);
        let mut target = mon("chansey", &["tackle"]);
        for seed in 0..20 {
            user.status.clear();
            user.moves[0].pp = user.moves[0].max_pp;
            let report = act(&mut user, 0, &mut target, seed);
            if report.connected() {
                assert!(user.status.has(StatusId::RECHARGE));
                return;
            }
        }
        panic!("hyper beam never connected");
    }

    #[test]
    fn counter_returns_double_the_physical_hit_taken_this_turn() {
        let mut first = mon("snorlax", &["tackle"]);
        let mut second = mon("chansey", &["counter"]);
        first.order = 1;
        second.order = 2;
        let hit = act(&mut first, 0, &mut second, 4);
        let countered = act(&mut second, 0, &mut first, 5);
        assert_eq!(countered.damage(), (hit.damage() * 2).min(first.max_hp()));
    }

    #[test]
    fn knockouts_are_flagged() {
        let mut user = mon("snorlax", &["tackle"]);
        let mut target = mon("pikachu", &["thunderbolt"]);
        target.hp = 1;
        let report = act(&mut user, 0, &mut target, 1);
        assert!(report.defender_fainted);
        assert!(target.is_fainted());
        assert!(matches!(report.events.last(), Some(BattleEvent::Faint { .. })));
    }
}
