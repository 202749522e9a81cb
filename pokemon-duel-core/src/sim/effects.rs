//! Secondary effects of a move that connected.
//!
//! [`apply_effects`] runs in a fixed order: self healing, flinch, stat
//! stages, ailment, then the behaviour specific to the move's effect. Every
//! effect kind is matched exhaustively, so a new variant fails to compile
//! until it is handled here.

use crate::battle_logger::BattleEvent;
use crate::catalog::{Catalog, MetaCategory, MoveEffect, MoveRecord, MoveTarget};
use crate::sim::combatant::{Combatant, MoveSlot};
use crate::sim::power::release_stockpile;
use crate::sim::stats::BattleStat;
use crate::sim::status::StatusId;
use crate::sim::types::Type;
use phf::phf_set;
use rand::Rng;

const MAX_STOCKPILE: u8 = 3;
const MIMIC_PP: u8 = 5;
const TRICK_ROOM_TURNS: u32 = 5;

/// Moves mimic refuses to copy.
static MIMIC_EXCLUDED: phf::Set<&'static str> = phf_set! {
    "chatter",
    "metronome",
    "mimic",
    "sketch",
    "struggle",
};

pub struct EffectContext<'a> {
    pub catalog: &'a Catalog,
    pub turn: u32,
}

/// Bernoulli trial on a percent chance; `None` and 0 mean it always fires.
fn triggers(chance: Option<u8>, rng: &mut impl Rng) -> bool {
    match chance {
        None | Some(0) => true,
        Some(percent) => rng.gen_bool((percent.min(100) as f64) / 100.0),
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Recipient {
    User,
    Opponent,
    Both,
}

pub fn apply_effects(
    attacker: &mut Combatant,
    mv: &MoveRecord,
    defender: &mut Combatant,
    ctx: &EffectContext<'_>,
    events: &mut Vec<BattleEvent>,
    rng: &mut impl Rng,
) {
    apply_healing(attacker, mv, events);
    apply_flinch(mv, defender, events, rng);
    apply_stat_changes(attacker, mv, defender, events, rng);
    apply_ailment(attacker, mv, defender, events, rng);
    apply_residual(attacker, mv, defender, ctx, events);
}

fn apply_healing(attacker: &mut Combatant, mv: &MoveRecord, events: &mut Vec<BattleEvent>) {
    let Some(percent) = mv.meta.healing else {
        return;
    };
    let amount = (percent as i32 * attacker.max_hp() as i32).div_euclid(100);
    if amount > 0 {
        let healed = attacker.heal(amount as u16);
        events.push(BattleEvent::heal(attacker, healed));
    } else if amount < 0 {
        let dealt = attacker.take_damage(amount.unsigned_abs().min(u16::MAX as u32) as u16);
        events.push(BattleEvent::damage(attacker, dealt));
    }
}

fn apply_flinch(
    mv: &MoveRecord,
    defender: &mut Combatant,
    events: &mut Vec<BattleEvent>,
    rng: &mut impl Rng,
) {
    let Some(chance) = mv.meta.flinch_chance.filter(|chance| *chance > 0) else {
        return;
    };
    if defender.order != 2 || defender.status.has(StatusId::FLINCH) {
        return;
    }
    if rng.gen_bool((chance.min(100) as f64) / 100.0) {
        defender.status.add(StatusId::FLINCH, Some(1));
        events.push(BattleEvent::status(defender, StatusId::FLINCH));
    }
}

fn stat_recipient(mv: &MoveRecord) -> Recipient {
    match mv.meta.category {
        MetaCategory::DamageRaise => return Recipient::User,
        MetaCategory::DamageLower => return Recipient::Opponent,
        _ => {}
    }
    match mv.target {
        MoveTarget::User
        | MoveTarget::UserAndAllies
        | MoveTarget::Ally
        | MoveTarget::UserOrAlly
        | MoveTarget::UsersField => Recipient::User,
        MoveTarget::EntireField | MoveTarget::AllPokemon => Recipient::Both,
        _ => Recipient::Opponent,
    }
}

fn apply_stat_changes(
    attacker: &mut Combatant,
    mv: &MoveRecord,
    defender: &mut Combatant,
    events: &mut Vec<BattleEvent>,
    rng: &mut impl Rng,
) {
    if mv.stat_changes.is_empty() {
        return;
    }
    let recipient = stat_recipient(mv);
    for change in &mv.stat_changes {
        if !triggers(mv.meta.stat_chance, rng) {
            continue;
        }
        if matches!(recipient, Recipient::User | Recipient::Both) {
            let applied = attacker.change_stage(change.stat, change.change);
            events.push(BattleEvent::stat_change(attacker, change.stat, applied));
        }
        if matches!(recipient, Recipient::Opponent | Recipient::Both) {
            let applied = defender.change_stage(change.stat, change.change);
            events.push(BattleEvent::stat_change(defender, change.stat, applied));
        }
    }
}

/// Turns an ailment lasts: sampled from the move's range when it has one,
/// otherwise the usual span for sleep and confusion, otherwise open-ended.
fn ailment_turns(mv: &MoveRecord, ailment: StatusId, rng: &mut impl Rng) -> Option<u32> {
    let range = match (mv.meta.min_turns, mv.meta.max_turns) {
        (Some(min), Some(max)) => Some((min, max.max(min))),
        (Some(min), None) => Some((min, min)),
        _ if ailment == StatusId::SLEEP => Some((1, 3)),
        _ if ailment == StatusId::CONFUSION => Some((2, 5)),
        _ => None,
    };
    range.map(|(min, max)| rng.gen_range(min..=max) as u32)
}

fn apply_ailment(
    attacker: &mut Combatant,
    mv: &MoveRecord,
    defender: &mut Combatant,
    events: &mut Vec<BattleEvent>,
    rng: &mut impl Rng,
) {
    let ailment = mv.meta.ailment;
    if ailment == StatusId::NORMAL {
        return;
    }
    if !matches!(
        mv.meta.category,
        MetaCategory::Ailment | MetaCategory::DamageAilment | MetaCategory::Swagger
    ) {
        return;
    }
    if !triggers(mv.meta.ailment_chance, rng) {
        return;
    }
    let recipient = match mv.target {
        MoveTarget::User => Recipient::User,
        MoveTarget::AllPokemon => Recipient::Both,
        _ => Recipient::Opponent,
    };
    if matches!(recipient, Recipient::User | Recipient::Both) {
        let turns = ailment_turns(mv, ailment, rng);
        attacker.status.add(ailment, turns);
        events.push(BattleEvent::status(attacker, ailment));
    }
    if matches!(recipient, Recipient::Opponent | Recipient::Both) {
        let turns = ailment_turns(mv, ailment, rng);
        defender.status.add(ailment, turns);
        events.push(BattleEvent::status(defender, ailment));
    }
}

fn apply_residual(
    attacker: &mut Combatant,
    mv: &MoveRecord,
    defender: &mut Combatant,
    ctx: &EffectContext<'_>,
    events: &mut Vec<BattleEvent>,
) {
    match mv.effect {
        MoveEffect::Haze => {
            attacker.reset_stages();
            defender.reset_stages();
        }
        MoveEffect::Mimic => {
            if !mimic(attacker, mv, defender, ctx.catalog) {
                events.push(BattleEvent::fail(attacker, &mv.name));
            }
        }
        MoveEffect::LockOn => {
            defender.status.add(StatusId::TAKING_AIM, Some(2));
            events.push(BattleEvent::status(defender, StatusId::TAKING_AIM));
        }
        MoveEffect::Spite => {
            let slot = defender
                .flags
                .last_move
                .and_then(|id| defender.slot_of(id));
            match slot {
                Some(idx) if defender.moves[idx].pp > 0 => {
                    let slot = &mut defender.moves[idx];
                    slot.pp = slot.pp.saturating_sub(4);
                }
                _ => events.push(BattleEvent::fail(attacker, &mv.name)),
            }
        }
        MoveEffect::Rest => {
            if attacker.hp == attacker.max_hp() {
                events.push(BattleEvent::fail(attacker, &mv.name));
            } else {
                let healed = attacker.heal(attacker.max_hp());
                attacker.status.add(StatusId::SLEEP, Some(3));
                events.push(BattleEvent::heal(attacker, healed));
                events.push(BattleEvent::status(attacker, StatusId::SLEEP));
            }
        }
        MoveEffect::Recharge => {
            attacker.status.add(StatusId::RECHARGE, Some(2));
        }
        MoveEffect::Stockpile => {
            if attacker.flags.stockpile >= MAX_STOCKPILE {
                events.push(BattleEvent::fail(attacker, &mv.name));
            } else {
                attacker.flags.stockpile += 1;
                let def = attacker.change_stage(BattleStat::Defense, 1);
                let spd = attacker.change_stage(BattleStat::SpecialDefense, 1);
                attacker.flags.stockpile_gains.0 += def;
                attacker.flags.stockpile_gains.1 += spd;
                events.push(BattleEvent::stat_change(attacker, BattleStat::Defense, def));
                events.push(BattleEvent::stat_change(attacker, BattleStat::SpecialDefense, spd));
            }
        }
        MoveEffect::Swallow => {
            let max = attacker.max_hp();
            let amount = match attacker.flags.stockpile {
                0 => None,
                1 => Some(max / 4),
                2 => Some(max / 2),
                _ => Some(max),
            };
            match amount {
                Some(amount) => {
                    let healed = attacker.heal(amount);
                    release_stockpile(attacker);
                    events.push(BattleEvent::heal(attacker, healed));
                }
                None => events.push(BattleEvent::fail(attacker, &mv.name)),
            }
        }
        MoveEffect::TrickRoom => {
            let active = attacker.status.has(StatusId::TRICK_ROOM)
                && defender.status.has(StatusId::TRICK_ROOM);
            attacker.status.remove(StatusId::TRICK_ROOM);
            defender.status.remove(StatusId::TRICK_ROOM);
            if !active {
                attacker.status.add(StatusId::TRICK_ROOM, Some(TRICK_ROOM_TURNS));
                defender.status.add(StatusId::TRICK_ROOM, Some(TRICK_ROOM_TURNS));
                events.push(BattleEvent::status(attacker, StatusId::TRICK_ROOM));
            }
        }
        MoveEffect::Curse => {
            if attacker.is_type(Type::Ghost) {
                let dealt = attacker.take_damage(attacker.max_hp() / 2);
                events.push(BattleEvent::damage(attacker, dealt));
                defender.status.add(StatusId::CURSE, None);
                events.push(BattleEvent::status(defender, StatusId::CURSE));
            } else {
                for (stat, delta) in [
                    (BattleStat::Attack, 1),
                    (BattleStat::Defense, 1),
                    (BattleStat::Speed, -1),
                ] {
                    let applied = attacker.change_stage(stat, delta);
                    events.push(BattleEvent::stat_change(attacker, stat, applied));
                }
            }
        }
        MoveEffect::AquaRing => {
            if attacker.status.has(StatusId::AQUA_RING) {
                events.push(BattleEvent::fail(attacker, &mv.name));
            } else {
                attacker.status.add(StatusId::AQUA_RING, None);
                events.push(BattleEvent::status(attacker, StatusId::AQUA_RING));
            }
        }
        // Resolved earlier in the action pipeline, or purely metadata driven.
        MoveEffect::Standard
        | MoveEffect::MirrorMove
        | MoveEffect::Metronome
        | MoveEffect::Snore
        | MoveEffect::SleepTalk
        | MoveEffect::TwoTurnHide(_)
        | MoveEffect::Flail
        | MoveEffect::Return
        | MoveEffect::Present
        | MoveEffect::Frustration
        | MoveEffect::Magnitude
        | MoveEffect::SpitUp
        | MoveEffect::TargetWeight
        | MoveEffect::GyroBall
        | MoveEffect::NaturalGift
        | MoveEffect::Fling
        | MoveEffect::TrumpCard
        | MoveEffect::WringOut
        | MoveEffect::MeFirst
        | MoveEffect::Punishment
        | MoveEffect::WeightRatio
        | MoveEffect::Eruption
        | MoveEffect::Facade
        | MoveEffect::SmellingSalts
        | MoveEffect::Revenge
        | MoveEffect::WakeUpSlap
        | MoveEffect::Brine
        | MoveEffect::Payback
        | MoveEffect::SuperFang
        | MoveEffect::DragonRage
        | MoveEffect::LevelDamage
        | MoveEffect::Psywave
        | MoveEffect::Counter
        | MoveEffect::SonicBoom
        | MoveEffect::MirrorCoat
        | MoveEffect::BeatUp
        | MoveEffect::Endeavor
        | MoveEffect::MetalBurst
        | MoveEffect::FinalGambit
        | MoveEffect::OneHitKo => {}
    }
}

/// Replaces mimic's slot with the target's last move at 5 PP.
fn mimic(attacker: &mut Combatant, mv: &MoveRecord, defender: &Combatant, catalog: &Catalog) -> bool {
    let Some(copied) = defender.flags.last_move.and_then(|id| catalog.move_by_id(id)) else {
        return false;
    };
    if MIMIC_EXCLUDED.contains(copied.name.as_str()) || attacker.slot_of(copied.id).is_some() {
        return false;
    }
    let Some(idx) = attacker.slot_of(mv.id) else {
        return false;
    };
    attacker.moves[idx] = MoveSlot::with_pp(copied.clone(), MIMIC_PP);
    true
}
