use crate::catalog::MoveRecord;
use crate::sim::combatant::Combatant;
use crate::sim::status::StatusId;
use phf::phf_set;
use rand::Rng;

/// Moves that still reach a target flying up high.
static HITS_FLYING: phf::Set<&'static str> = phf_set! {
    "gust",
    "hurricane",
    "sky-uppercut",
    "smack-down",
    "thousand-arrows",
    "thunder",
    "twister",
    "whirlwind",
};

static HITS_UNDERGROUND: phf::Set<&'static str> = phf_set! {
    "earthquake",
    "magnitude",
    "fissure",
};

static HITS_UNDERWATER: phf::Set<&'static str> = phf_set! {
    "surf",
    "whirlpool",
};

pub const MAX_CRIT_STAGE: u8 = 4;

/// Whether `mv` connects with `defender`.
///
/// A target that has been locked onto is always hit. A semi-invulnerable
/// target is missed unless the move reaches that phase, in which case the
/// regular accuracy roll still happens.
pub fn resolves_hit(
    attacker: &Combatant,
    mv: &MoveRecord,
    defender: &Combatant,
    rng: &mut impl Rng,
) -> bool {
    if defender.status.has(StatusId::TAKING_AIM) {
        return true;
    }
    if let Some(phase) = defender.status.semi_invulnerable() {
        if !reaches_phase(phase, &mv.name) {
            return false;
        }
    }
    let Some(accuracy) = mv.accuracy else {
        return true;
    };
    let p = accuracy as f64 / 100.0 * attacker.accuracy_factor() / defender.evasion_factor();
    rng.gen_bool(p.clamp(0.0, 1.0))
}

fn reaches_phase(phase: StatusId, move_name: &str) -> bool {
    match phase {
        StatusId::FLYING_UP_HIGH => HITS_FLYING.contains(move_name),
        StatusId::UNDERGROUND => HITS_UNDERGROUND.contains(move_name),
        StatusId::UNDERWATER => HITS_UNDERWATER.contains(move_name),
        _ => true,
    }
}

pub fn crit_chance(stage: u8) -> f64 {
    match stage.min(MAX_CRIT_STAGE) {
        0 => 1.0 / 16.0,
        1 => 1.0 / 8.0,
        2 => 1.0 / 4.0,
        3 => 1.0 / 3.0,
        _ => 1.0 / 2.0,
    }
}

/// Returns the critical multiplier, 2 on a critical hit and 1 otherwise.
///
/// The move's crit-rate bonus is added to the attacker's stage for this roll
/// only; the stored stage is left alone.
pub fn resolves_critical(attacker: &Combatant, mv: &MoveRecord, rng: &mut impl Rng) -> u8 {
    let stage = attacker
        .crit_stage
        .saturating_add(mv.meta.crit_rate)
        .min(MAX_CRIT_STAGE);
    if rng.gen_bool(crit_chance(stage)) {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample::sample_catalog;
    use crate::sim::combatant::CombatantSpec;
    use crate::sim::stats::BattleStat;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn mon(species: &str) -> Combatant {
        Combatant::from_catalog(
            sample_catalog().expect("sample catalog"),
            &CombatantSpec::new(species, 50, &["tackle"]),
        )
        .expect("valid spec")
    }

    fn named(name: &str) -> MoveRecord {
        sample_catalog().expect("sample catalog").move_named(name).expect("move").clone()
    }

    #[test]
    fn perfect_accuracy_never_misses() {
        let mut rng = SmallRng::seed_from_u64(42);
        let attacker = mon("pikachu");
        let defender = mon("snorlax");
        let tackle = named("tackle");
        assert_eq!(tackle.accuracy, Some(100));
        let hits = (0..10_000)
            .filter(|_| resolves_hit(&attacker, &tackle, &defender, &mut rng))
            .count();
        assert_eq!(hits, 10_000);
    }

    #[test]
    fn evasion_stages_lower_the_hit_rate() {
        let mut rng = SmallRng::seed_from_u64(42);
        let attacker = mon("pikachu");
        let mut defender = mon("snorlax");
        defender.change_stage(BattleStat::Evasion, 2);
        let tackle = named("tackle");
        let hits = (0..10_000)
            .filter(|_| resolves_hit(&attacker, &tackle, &defender, &mut rng))
            .count();
        let rate = hits as f64 / 10_000.0;
        assert!((rate - 0.5).abs() < 0.02, "rate {rate}");
    }

    #[test]
    fn semi_invulnerable_targets_dodge_all_but_their_exemptions() {
        let mut rng = SmallRng::seed_from_u64(1);
        let attacker = mon("pikachu");
        let mut defender = mon("snorlax");
        defender.status.add(StatusId::UNDERGROUND, Some(1));
        for _ in 0..100 {
            assert!(!resolves_hit(&attacker, &named("tackle"), &defender, &mut rng));
            assert!(resolves_hit(&attacker, &named("earthquake"), &defender, &mut rng));
        }
        assert!(!resolves_hit(&attacker, &named("gust"), &defender, &mut rng));
    }

    #[test]
    fn lock_on_overrides_everything() {
        let mut rng = SmallRng::seed_from_u64(1);
        let attacker = mon("pikachu");
        let mut defender = mon("snorlax");
        defender.status.add(StatusId::FLYING_UP_HIGH, Some(1));
        defender.status.add(StatusId::TAKING_AIM, Some(2));
        defender.change_stage(BattleStat::Evasion, 6);
        for _ in 0..100 {
            assert!(resolves_hit(&attacker, &named("fissure"), &defender, &mut rng));
        }
    }

    #[test]
    fn null_accuracy_always_hits() {
        let mut rng = SmallRng::seed_from_u64(1);
        let attacker = mon("pikachu");
        let mut defender = mon("snorlax");
        defender.change_stage(BattleStat::Evasion, 6);
        let swords_dance = named("swords-dance");
        assert_eq!(swords_dance.accuracy, None);
        assert!(resolves_hit(&attacker, &swords_dance, &defender, &mut rng));
    }

    #[test]
    fn crit_rolls_leave_the_stored_stage_alone() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut attacker = mon("pikachu");
        attacker.crit_stage = 3;
        let chop = named("karate-chop");
        for _ in 0..50 {
            let multiplier = resolves_critical(&attacker, &chop, &mut rng);
            assert!(multiplier == 1 || multiplier == 2);
        }
        assert_eq!(attacker.crit_stage, 3);
    }

    #[test]
    fn crit_rate_matches_the_stage_table() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut attacker = mon("pikachu");
        attacker.crit_stage = 2;
        let tackle = named("tackle");
        let crits = (0..20_000)
            .filter(|_| resolves_critical(&attacker, &tackle, &mut rng) == 2)
            .count();
        let rate = crits as f64 / 20_000.0;
        assert!((rate - 0.25).abs() < 0.015, "rate {rate}");
        assert_eq!(crit_chance(9), 0.5);
    }
}
