use crate::catalog::{Catalog, DamageClass};
use crate::sim::combatant::Combatant;
use crate::sim::power::Strike;
use crate::sim::stats::BattleStat;
use crate::sim::status::StatusId;
use crate::sim::types::Type;
use rand::Rng;

const CONFUSION_POWER: u16 = 40;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageModifiers {
    pub crit: f64,
    pub type_effectiveness: f64,
    pub stab: f64,
    pub burn: f64,
    pub random: f64,
    /// Weather and anything else; always 1 for now.
    pub other: f64,
}

impl Default for DamageModifiers {
    fn default() -> Self {
        Self {
            crit: 1.0,
            type_effectiveness: 1.0,
            stab: 1.0,
            burn: 1.0,
            random: 1.0,
            other: 1.0,
        }
    }
}

impl DamageModifiers {
    pub fn product(&self) -> f64 {
        self.crit * self.type_effectiveness * self.stab * self.burn * self.random * self.other
    }
}

/// `2 + floor(2 × (level/5 + 1) × power × A / D / 50)`, before modifiers.
pub fn base_damage(level: u8, power: u16, attack: u16, defense: u16) -> f64 {
    let level = level as f64;
    let defense = defense.max(1) as f64;
    let scaled = 2.0 * (level / 5.0 + 1.0) * power as f64 * attack as f64 / defense / 50.0;
    2.0 + scaled.floor()
}

pub fn calculate_damage(
    level: u8,
    power: u16,
    attack: u16,
    defense: u16,
    modifiers: DamageModifiers,
) -> u16 {
    let damage = (base_damage(level, power, attack, defense) * modifiers.product()).floor();
    damage.clamp(0.0, u16::MAX as f64) as u16
}

/// 1.5 for a move sharing one of the user's types, 2 with adaptability.
pub fn stab_modifier(attacker: &Combatant, move_type: Type) -> f64 {
    if !attacker.is_type(move_type) {
        1.0
    } else if attacker.has_ability("adaptability") {
        2.0
    } else {
        1.5
    }
}

/// Halves physical damage from a burned user unless it has guts.
pub fn burn_modifier(attacker: &Combatant, class: DamageClass) -> f64 {
    if class == DamageClass::Physical
        && attacker.status.has(StatusId::BURN)
        && !attacker.has_ability("guts")
    {
        0.5
    } else {
        1.0
    }
}

/// The typeless 40-power hit a confused combatant deals itself, using its
/// own current Attack and Defense.
pub fn confusion_damage(mon: &Combatant) -> u16 {
    calculate_damage(
        mon.level,
        CONFUSION_POWER,
        mon.current(BattleStat::Attack),
        mon.current(BattleStat::Defense),
        DamageModifiers::default(),
    )
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageRoll {
    pub damage: u16,
    pub effectiveness: f64,
    pub hits: u8,
}

/// Regular damage for a resolved strike.
///
/// A multi-hit move rolls damage once and multiplies it by the sampled hit
/// count.
pub fn regular_damage(
    attacker: &Combatant,
    strike: &Strike,
    hit_range: Option<(u8, u8)>,
    defender: &Combatant,
    catalog: &Catalog,
    crit: u8,
    rng: &mut impl Rng,
) -> DamageRoll {
    let (attack, defense) = match strike.class {
        DamageClass::Special => (
            attacker.current(BattleStat::SpecialAttack),
            defender.current(BattleStat::SpecialDefense),
        ),
        DamageClass::Physical | DamageClass::Status => (
            attacker.current(BattleStat::Attack),
            defender.current(BattleStat::Defense),
        ),
    };
    let modifiers = DamageModifiers {
        crit: crit as f64,
        type_effectiveness: catalog.efficacy(strike.move_type, &defender.types),
        stab: stab_modifier(attacker, strike.move_type),
        burn: burn_modifier(attacker, strike.class),
        random: if strike.random {
            rng.gen_range(0.85..=1.0)
        } else {
            1.0
        },
        other: 1.0,
    };
    let single = calculate_damage(attacker.level, strike.power, attack, defense, modifiers);
    let hits = match hit_range {
        Some((min, max)) if max > min => rng.gen_range(min..=max),
        Some((min, _)) => min.max(1),
        None => 1,
    };
    DamageRoll {
        damage: single.saturating_mul(hits as u16),
        effectiveness: modifiers.type_effectiveness,
        hits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample::sample_catalog;
    use crate::sim::combatant::CombatantSpec;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn mon(spec: CombatantSpec) -> Combatant {
        Combatant::from_catalog(sample_catalog().expect("sample catalog"), &spec).expect("valid spec")
    }

    fn strike(power: u16, move_type: Type, class: DamageClass, random: bool) -> Strike {
        Strike {
            power,
            move_type,
            class,
            random,
        }
    }

    #[test]
    fn reference_scenario_is_exact() {
        assert_eq!(calculate_damage(50, 40, 100, 100, DamageModifiers::default()), 19);
    }

    #[test]
    fn zero_defense_is_treated_as_one() {
        assert_eq!(base_damage(50, 40, 100, 0), base_damage(50, 40, 100, 1));
    }

    #[test]
    fn modifiers_multiply_before_the_final_floor() {
        let modifiers = DamageModifiers {
            crit: 2.0,
            stab: 1.5,
            random: 0.85,
            ..DamageModifiers::default()
        };
        assert_eq!(calculate_damage(50, 40, 100, 100, modifiers), (19.0f64 * 2.0 * 1.5 * 0.85).floor() as u16);
    }

    #[test]
    fn burn_halves_physical_damage_unless_guts() {
        let catalog = sample_catalog().expect("sample catalog");
        let target = mon(CombatantSpec::new("snorlax", 50, &["tackle"]));
        let hit = strike(80, Type::Fighting, DamageClass::Physical, true);

        let mut plain = mon(CombatantSpec::new("pikachu", 50, &["tackle"]));
        let base = regular_damage(&plain, &hit, None, &target, catalog, 1, &mut SmallRng::seed_from_u64(5));
        plain.status.add(StatusId::BURN, None);
        let burned = regular_damage(&plain, &hit, None, &target, catalog, 1, &mut SmallRng::seed_from_u64(5));

        assert_eq!(burned.damage, base.damage / 2);

        let mut gutsy = mon(CombatantSpec::new("pikachu", 50, &["tackle"]).with_ability("guts"));
        gutsy.status.add(StatusId::BURN, None);
        let unaffected = regular_damage(&gutsy, &hit, None, &target, catalog, 1, &mut SmallRng::seed_from_u64(5));
        assert_eq!(unaffected.damage, base.damage);

        let special = strike(80, Type::Fighting, DamageClass::Special, true);
        let special_base = regular_damage(&gutsy, &special, None, &target, catalog, 1, &mut SmallRng::seed_from_u64(5));
        let special_burned = regular_damage(&plain, &special, None, &target, catalog, 1, &mut SmallRng::seed_from_u64(5));
        assert_eq!(special_base.damage, special_burned.damage);
    }

    #[test]
    fn burn_modifier_values() {
        let mut mon = mon(CombatantSpec::new("pikachu", 50, &["tackle"]));
        assert_eq!(burn_modifier(&mon, DamageClass::Physical), 1.0);
        mon.status.add(StatusId::BURN, None);
        assert_eq!(burn_modifier(&mon, DamageClass::Physical), 0.5);
        assert_eq!(burn_modifier(&mon, DamageClass::Special), 1.0);
    }

    #[test]
    fn stab_levels() {
        let pikachu = mon(CombatantSpec::new("pikachu", 50, &["tackle"]));
        assert_eq!(stab_modifier(&pikachu, Type::Electric), 1.5);
        assert_eq!(stab_modifier(&pikachu, Type::Water), 1.0);
        let adaptable = mon(CombatantSpec::new("pikachu", 50, &["tackle"]).with_ability("adaptability"));
        assert_eq!(stab_modifier(&adaptable, Type::Electric), 2.0);
    }

    #[test]
    fn immunity_yields_zero() {
        let catalog = sample_catalog().expect("sample catalog");
        let user = mon(CombatantSpec::new("snorlax", 50, &["tackle"]));
        let ghost = mon(CombatantSpec::new("gengar", 50, &["tackle"]));
        let roll = regular_damage(
            &user,
            &strike(40, Type::Normal, DamageClass::Physical, true),
            None,
            &ghost,
            catalog,
            2,
            &mut SmallRng::seed_from_u64(1),
        );
        assert_eq!(roll.damage, 0);
        assert_eq!(roll.effectiveness, 0.0);
    }

    #[test]
    fn multi_hit_multiplies_a_single_roll() {
        let catalog = sample_catalog().expect("sample catalog");
        let user = mon(CombatantSpec::new("snorlax", 50, &["tackle"]));
        let target = mon(CombatantSpec::new("snorlax", 50, &["tackle"]));
        let hit = strike(30, Type::Fighting, DamageClass::Physical, false);
        let single = regular_damage(&user, &hit, None, &target, catalog, 1, &mut SmallRng::seed_from_u64(2));
        let double = regular_damage(&user, &hit, Some((2, 2)), &target, catalog, 1, &mut SmallRng::seed_from_u64(2));
        assert_eq!(double.hits, 2);
        assert_eq!(double.damage, single.damage * 2);

        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..100 {
            let roll = regular_damage(&user, &hit, Some((2, 5)), &target, catalog, 1, &mut rng);
            assert!((2..=5).contains(&roll.hits));
            assert_eq!(roll.damage, single.damage * roll.hits as u16);
        }
    }

    #[test]
    fn confusion_uses_current_stats() {
        let mut mon = mon(CombatantSpec::new("snorlax", 50, &["tackle"]));
        let before = confusion_damage(&mon);
        mon.change_stage(BattleStat::Attack, 2);
        assert!(confusion_damage(&mon) > before);
    }
}
