use crate::catalog::{Catalog, DamageClass, MoveEffect, MoveRecord};
use crate::sim::accuracy::resolves_critical;
use crate::sim::combatant::Combatant;
use crate::sim::damage::{base_damage, stab_modifier};
use rand::Rng;

pub struct DirectContext<'a> {
    pub catalog: &'a Catalog,
    pub turn: u32,
    /// The user's benched teammates, for beat-up.
    pub party: &'a [Combatant],
}

/// Damage for the moves that bypass the stat formula.
///
/// Returns `None` when the move is not one of them, and `Some(None)` when
/// it is but fails. Every amount goes through the type-immunity filter.
pub fn resolve_direct_damage(
    attacker: &mut Combatant,
    mv: &MoveRecord,
    defender: &Combatant,
    ctx: &DirectContext<'_>,
    rng: &mut impl Rng,
) -> Option<Option<u16>> {
    let immune = ctx.catalog.efficacy(mv.move_type, &defender.types) == 0.0;
    let filter = |damage: u16| if immune { 0 } else { damage };

    let damage = match mv.effect {
        MoveEffect::SuperFang => Some(filter((defender.hp / 2).max(1))),
        MoveEffect::DragonRage => Some(filter(40)),
        MoveEffect::SonicBoom => Some(filter(20)),
        MoveEffect::LevelDamage => Some(filter(attacker.level as u16)),
        MoveEffect::Psywave => {
            let tenths: u16 = rng.gen_range(5..=15);
            Some(filter(attacker.level as u16 * tenths / 10))
        }
        MoveEffect::Counter => countered(attacker, ctx.turn, Some(DamageClass::Physical), 2.0).map(filter),
        MoveEffect::MirrorCoat => countered(attacker, ctx.turn, Some(DamageClass::Special), 2.0).map(filter),
        MoveEffect::MetalBurst => countered(attacker, ctx.turn, None, 1.5).map(filter),
        MoveEffect::BeatUp => Some(filter(beat_up(attacker, mv, defender, ctx.party, rng))),
        MoveEffect::Endeavor => Some(filter(defender.hp.saturating_sub(attacker.hp))),
        MoveEffect::FinalGambit => {
            let damage = filter(attacker.hp);
            if damage > 0 {
                attacker.faint();
            }
            Some(damage)
        }
        MoveEffect::OneHitKo => {
            (attacker.level >= defender.level).then(|| filter(defender.hp))
        }
        MoveEffect::Standard
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
        | MoveEffect::AquaRing => return None,
    };
    tracing::debug!(move_name = %mv.name, damage = ?damage, "direct damage");
    Some(damage)
}

/// Counter-style retaliation: only while acting second, and only against a
/// hit taken this turn of the matching class (any class when `class` is
/// `None`).
fn countered(attacker: &Combatant, turn: u32, class: Option<DamageClass>, factor: f64) -> Option<u16> {
    if attacker.order != 2 {
        return None;
    }
    let record = attacker.damage_taken_on(turn)?;
    if record.amount == 0 || class.is_some_and(|class| class != record.class) {
        return None;
    }
    Some((record.amount as f64 * factor).floor().min(u16::MAX as f64) as u16)
}

/// Every healthy party member strikes once with species base stats, no
/// random factor, and its own critical roll.
fn beat_up(
    attacker: &Combatant,
    mv: &MoveRecord,
    defender: &Combatant,
    party: &[Combatant],
    rng: &mut impl Rng,
) -> u16 {
    let power = mv.power.unwrap_or(40);
    let defense = defender.base.defense;
    std::iter::once(attacker)
        .chain(party.iter())
        .filter(|member| !member.is_fainted() && member.non_volatile().is_none())
        .map(|member| {
            let crit = resolves_critical(member, mv, rng) as f64;
            let stab = stab_modifier(member, mv.move_type);
            let raw = base_damage(member.level, power, member.base.attack, defense);
            (raw * crit * stab).floor() as u32
        })
        .sum::<u32>()
        .min(u16::MAX as u32) as u16
}
