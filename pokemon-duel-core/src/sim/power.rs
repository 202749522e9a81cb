//! Base power resolution, including the moves whose power is a formula
//! rather than a table value.

use crate::catalog::{Catalog, DamageClass, MoveEffect, MoveRecord};
use crate::sim::combatant::Combatant;
use crate::sim::stats::BattleStat;
use crate::sim::status::StatusId;
use crate::sim::types::Type;
use rand::Rng;

/// Inputs that live outside the two combatants.
pub struct PowerContext<'a> {
    pub catalog: &'a Catalog,
    pub turn: u32,
    /// The move the defender chose this turn.
    pub opposing_move: Option<&'a MoveRecord>,
    /// PP left in the slot that was used, after this use was paid for.
    pub pp_left: u8,
}

/// Everything the damage formula needs to know about the hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strike {
    pub power: u16,
    pub move_type: Type,
    pub class: DamageClass,
    /// Whether the 0.85..=1.0 random factor applies.
    pub random: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PowerRoll {
    Damage(Strike),
    /// The move heals the target by this much instead of hurting it.
    HealTarget(u16),
    Failed,
}

/// Resolves the power, type and damage class a move strikes with.
///
/// Called only once the move is known to hit: several formulas consume the
/// user's item, stored energy or the target's status as they resolve.
pub fn resolve_power(
    attacker: &mut Combatant,
    mv: &MoveRecord,
    defender: &mut Combatant,
    ctx: &PowerContext<'_>,
    rng: &mut impl Rng,
) -> PowerRoll {
    let table = mv.power.unwrap_or(0);
    let strike = |power: u16| {
        PowerRoll::Damage(Strike {
            power,
            move_type: mv.move_type,
            class: mv.damage_class,
            random: true,
        })
    };
    let doubled_if = |condition: bool| strike(if condition { table * 2 } else { table });

    let roll = match mv.effect {
        MoveEffect::Flail => strike(flail_power(attacker.hp, attacker.max_hp())),
        MoveEffect::Return => strike(happiness_power(attacker.happiness)),
        MoveEffect::Frustration => strike(happiness_power(255 - attacker.happiness)),
        MoveEffect::Present => match present_roll(rng.gen::<f64>()) {
            Some(power) => strike(power),
            None => PowerRoll::HealTarget(defender.max_hp() / 4),
        },
        MoveEffect::Magnitude => {
            let power = magnitude_power(rng.gen::<f64>());
            let underground = defender.status.has(StatusId::UNDERGROUND);
            strike(if underground { power * 2 } else { power })
        }
        MoveEffect::SpitUp => spit_up(attacker, mv),
        MoveEffect::TargetWeight => strike(target_weight_power(defender.weight)),
        MoveEffect::GyroBall => strike(gyro_ball_power(
            attacker.current(BattleStat::Speed),
            defender.current(BattleStat::Speed),
        )),
        MoveEffect::NaturalGift => natural_gift(attacker, mv, ctx.catalog),
        MoveEffect::Fling => fling(attacker, mv, defender),
        MoveEffect::TrumpCard => strike(trump_card_power(ctx.pp_left)),
        MoveEffect::WringOut => strike(wring_out_power(defender.hp, defender.max_hp())),
        MoveEffect::MeFirst => me_first(attacker, ctx.opposing_move),
        MoveEffect::Punishment => strike(punishment_power(defender.stage_gains())),
        MoveEffect::WeightRatio => strike(weight_ratio_power(attacker.weight, defender.weight)),
        MoveEffect::Eruption => strike(eruption_power(attacker.hp, attacker.max_hp())),
        MoveEffect::Facade => doubled_if(matches!(
            attacker.non_volatile(),
            Some(StatusId::BURN | StatusId::POISON | StatusId::PARALYSIS)
        )),
        MoveEffect::SmellingSalts => {
            let paralyzed = defender.status.has(StatusId::PARALYSIS);
            if paralyzed {
                defender.status.remove(StatusId::PARALYSIS);
            }
            doubled_if(paralyzed)
        }
        MoveEffect::Revenge => doubled_if(attacker.damage_taken_on(ctx.turn).is_some()),
        MoveEffect::WakeUpSlap => {
            let asleep = defender.status.has(StatusId::SLEEP);
            if asleep {
                defender.status.remove(StatusId::SLEEP);
            }
            doubled_if(asleep)
        }
        MoveEffect::Brine => doubled_if(defender.hp as u32 * 2 <= defender.max_hp() as u32),
        MoveEffect::Payback => doubled_if(attacker.order == 2),
        MoveEffect::Standard
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
        | MoveEffect::OneHitKo
        | MoveEffect::Haze
        | MoveEffect::MirrorMove
        | MoveEffect::Mimic
        | MoveEffect::Metronome
        | MoveEffect::LockOn
        | MoveEffect::Spite
        | MoveEffect::Rest
        | MoveEffect::Snore
        | MoveEffect::SleepTalk
        | MoveEffect::Recharge
        | MoveEffect::Stockpile
        | MoveEffect::Swallow
        | MoveEffect::TwoTurnHide(_)
        | MoveEffect::TrickRoom
        | MoveEffect::Curse
        | MoveEffect::AquaRing => strike(table),
    };

    if let PowerRoll::Damage(Strike { power: 0, .. }) = roll {
        tracing::warn!(move_name = %mv.name, "move resolved to zero power");
        return PowerRoll::Failed;
    }
    if roll != strike(table) {
        tracing::debug!(move_name = %mv.name, roll = ?roll, "power override");
    }
    roll
}

/// Inverse remaining-HP bands. Each bound is exclusive: a combatant sitting
/// exactly on a threshold falls into the weaker band.
pub fn flail_power(hp: u16, max_hp: u16) -> u16 {
    const BANDS: [(f64, u16); 5] = [(0.0417, 200), (0.1042, 150), (0.2083, 100), (0.3542, 80), (0.6875, 40)];
    let q = hp as f64 / max_hp.max(1) as f64;
    BANDS
        .iter()
        .find(|(bound, _)| q < *bound)
        .map_or(20, |(_, power)| *power)
}

/// `happiness × 2 / 5`, kept within 1..=102.
pub fn happiness_power(happiness: u8) -> u16 {
    (happiness as u16 * 2 / 5).clamp(1, 102)
}

/// `None` means the present heals instead.
pub fn present_roll(q: f64) -> Option<u16> {
    if q < 0.1 {
        Some(120)
    } else if q < 0.4 {
        Some(80)
    } else if q < 0.8 {
        Some(40)
    } else {
        None
    }
}

pub fn magnitude_power(q: f64) -> u16 {
    const BANDS: [(f64, u16); 6] = [
        (0.05, 10),
        (0.15, 30),
        (0.35, 50),
        (0.65, 70),
        (0.85, 90),
        (0.95, 110),
    ];
    BANDS
        .iter()
        .find(|(upper, _)| q < *upper)
        .map_or(150, |(_, power)| *power)
}

/// Bands on the target's weight in kilograms.
pub fn target_weight_power(weight: f64) -> u16 {
    if weight <= 10.0 {
        20
    } else if weight <= 25.0 {
        40
    } else if weight <= 50.0 {
        60
    } else if weight <= 100.0 {
        80
    } else if weight <= 200.0 {
        100
    } else {
        120
    }
}

/// Bands on how many times heavier the user is than the target.
pub fn weight_ratio_power(user_weight: f64, target_weight: f64) -> u16 {
    if target_weight <= 0.0 {
        return 120;
    }
    let ratio = user_weight / target_weight;
    if ratio <= 2.0 {
        40
    } else if ratio <= 3.0 {
        60
    } else if ratio <= 4.0 {
        80
    } else if ratio <= 5.0 {
        100
    } else {
        120
    }
}

pub fn gyro_ball_power(user_speed: u16, target_speed: u16) -> u16 {
    if user_speed == 0 {
        return 150;
    }
    (1 + 25 * target_speed as u32 / user_speed as u32).min(150) as u16
}

pub fn trump_card_power(pp_left: u8) -> u16 {
    match pp_left {
        0 => 200,
        1 => 80,
        2 => 60,
        3 => 50,
        _ => 40,
    }
}

pub fn wring_out_power(hp: u16, max_hp: u16) -> u16 {
    (1 + 120 * hp as u32 / max_hp.max(1) as u32).min(121) as u16
}

/// 60 plus 20 per positive stage the target has gained, capped at 200.
pub fn punishment_power(stage_gains: u32) -> u16 {
    60u32.saturating_add(stage_gains.saturating_mul(20)).min(200) as u16
}

pub fn eruption_power(hp: u16, max_hp: u16) -> u16 {
    (150 * hp as u32 / max_hp.max(1) as u32).max(1) as u16
}

fn spit_up(attacker: &mut Combatant, mv: &MoveRecord) -> PowerRoll {
    let energy = attacker.flags.stockpile;
    if energy == 0 {
        return PowerRoll::Failed;
    }
    release_stockpile(attacker);
    PowerRoll::Damage(Strike {
        power: 100 * energy as u16,
        move_type: mv.move_type,
        class: mv.damage_class,
        random: false,
    })
}

/// Drops the stored energy and takes back the defensive stages it granted.
pub(crate) fn release_stockpile(mon: &mut Combatant) {
    let (def, spd) = mon.flags.stockpile_gains;
    mon.change_stage(BattleStat::Defense, -def);
    mon.change_stage(BattleStat::SpecialDefense, -spd);
    mon.flags.stockpile = 0;
    mon.flags.stockpile_gains = (0, 0);
}

fn natural_gift(attacker: &mut Combatant, mv: &MoveRecord, catalog: &Catalog) -> PowerRoll {
    let Some(gift) = attacker
        .item()
        .and_then(|item| catalog.natural_gift(&item.name))
    else {
        return PowerRoll::Failed;
    };
    let roll = PowerRoll::Damage(Strike {
        power: gift.power,
        move_type: gift.move_type,
        class: mv.damage_class,
        random: true,
    });
    attacker.take_item();
    roll
}

fn fling(attacker: &mut Combatant, mv: &MoveRecord, defender: &mut Combatant) -> PowerRoll {
    if attacker.status.has(StatusId::EMBARGO) || attacker.has_ability("klutz") {
        return PowerRoll::Failed;
    }
    let Some(power) = attacker.item().and_then(|item| item.fling_power) else {
        return PowerRoll::Failed;
    };
    let Some(item) = attacker.take_item() else {
        return PowerRoll::Failed;
    };
    if let Some(status) = item.fling_effect.and_then(|effect| effect.status()) {
        let remaining = (status == StatusId::FLINCH).then_some(1);
        defender.status.add(status, remaining);
    }
    PowerRoll::Damage(Strike {
        power,
        move_type: mv.move_type,
        class: mv.damage_class,
        random: true,
    })
}

fn me_first(attacker: &Combatant, opposing: Option<&MoveRecord>) -> PowerRoll {
    let Some(opposing) = opposing else {
        return PowerRoll::Failed;
    };
    if attacker.order != 2 || !opposing.is_damaging() {
        return PowerRoll::Failed;
    }
    let power = opposing.power.unwrap_or(0) as u32 * 3 / 2;
    PowerRoll::Damage(Strike {
        power: power as u16,
        move_type: opposing.move_type,
        class: opposing.damage_class,
        random: true,
    })
}
