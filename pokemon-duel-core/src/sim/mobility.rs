use crate::catalog::{MoveFlag, MoveRecord};
use crate::sim::combatant::Combatant;
use crate::sim::damage::confusion_damage;
use crate::sim::status::StatusId;
use phf::phf_set;
use rand::Rng;
use serde::Serialize;

/// Moves that can be used while asleep.
static SLEEP_USABLE: phf::Set<&'static str> = phf_set! {
    "sleep-talk",
    "snore",
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Immobility {
    Recharging,
    Flinched,
    FullyParalyzed,
    Infatuated,
    Asleep,
    Frozen,
    /// Hit itself in confusion for the given damage.
    Confused(u16),
}

/// Whether the combatant may act this turn, given the move it chose.
pub fn can_act(mon: &mut Combatant, chosen: &MoveRecord, rng: &mut impl Rng) -> bool {
    check_mobility(mon, chosen, rng).is_none()
}

/// The reason the combatant cannot act, or `None` if it acts.
///
/// Checks run in a fixed order and the first matching condition decides.
/// A confused combatant that hurts itself takes the damage here.
pub fn check_mobility(
    mon: &mut Combatant,
    chosen: &MoveRecord,
    rng: &mut impl Rng,
) -> Option<Immobility> {
    let status = &mon.status;
    if status.has(StatusId::RECHARGE) {
        return Some(Immobility::Recharging);
    }
    if status.has(StatusId::FLINCH) && mon.order == 2 {
        return Some(Immobility::Flinched);
    }
    if status.has(StatusId::PARALYSIS) {
        return (!rng.gen_bool(0.75)).then_some(Immobility::FullyParalyzed);
    }
    if status.has(StatusId::INFATUATION) {
        return (!rng.gen_bool(0.5)).then_some(Immobility::Infatuated);
    }
    if status.has(StatusId::SLEEP) && !SLEEP_USABLE.contains(chosen.name.as_str()) {
        return Some(Immobility::Asleep);
    }
    if status.has(StatusId::FREEZE) && !chosen.has_flag(MoveFlag::Defrost) {
        return Some(Immobility::Frozen);
    }
    if status.has(StatusId::CONFUSION) && rng.gen_bool(0.5) {
        let damage = confusion_damage(mon);
        mon.take_damage(damage);
        tracing::debug!(mon = %mon.name, damage, "hurt itself in confusion");
        return Some(Immobility::Confused(damage));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample::sample_catalog;
    use crate::sim::combatant::CombatantSpec;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn setup() -> (Combatant, MoveRecord) {
        let catalog = sample_catalog().expect("sample catalog");
        let mon = Combatant::from_catalog(
            catalog,
            &CombatantSpec::new("snorlax", 50, &["tackle", "snore", "flame-wheel"]),
        )
        .expect("valid spec");
        (mon, catalog.move_named("tackle").expect("tackle").clone())
    }

    fn named(name: &str) -> MoveRecord {
        sample_catalog().expect("sample catalog").move_named(name).expect("move").clone()
    }

    #[test]
    fn recharge_blocks_every_move() {
        let (mut mon, tackle) = setup();
        let mut rng = SmallRng::seed_from_u64(0);
        mon.status.add(StatusId::RECHARGE, Some(2));
        assert_eq!(check_mobility(&mut mon, &tackle, &mut rng), Some(Immobility::Recharging));
    }

    #[test]
    fn flinch_only_stops_the_second_actor() {
        let (mut mon, tackle) = setup();
        let mut rng = SmallRng::seed_from_u64(0);
        mon.status.add(StatusId::FLINCH, Some(1));
        mon.order = 1;
        assert!(can_act(&mut mon, &tackle, &mut rng));
        mon.order = 2;
        assert_eq!(check_mobility(&mut mon, &tackle, &mut rng), Some(Immobility::Flinched));
    }

    #[test]
    fn sleep_allows_only_sleep_moves() {
        let (mut mon, tackle) = setup();
        let mut rng = SmallRng::seed_from_u64(0);
        mon.status.add(StatusId::SLEEP, Some(3));
        assert_eq!(check_mobility(&mut mon, &tackle, &mut rng), Some(Immobility::Asleep));
        assert!(can_act(&mut mon, &named("snore"), &mut rng));
        assert!(can_act(&mut mon, &named("sleep-talk"), &mut rng));
    }

    #[test]
    fn freeze_yields_to_defrosting_moves() {
        let (mut mon, tackle) = setup();
        let mut rng = SmallRng::seed_from_u64(0);
        mon.status.add(StatusId::FREEZE, None);
        assert_eq!(check_mobility(&mut mon, &tackle, &mut rng), Some(Immobility::Frozen));
        assert!(can_act(&mut mon, &named("flame-wheel"), &mut rng));
    }

    #[test]
    fn paralysis_stops_about_a_quarter_of_actions() {
        let (mut mon, tackle) = setup();
        let mut rng = SmallRng::seed_from_u64(11);
        mon.status.add(StatusId::PARALYSIS, None);
        let trials = 10_000;
        let stopped = (0..trials)
            .filter(|_| !can_act(&mut mon, &tackle, &mut rng))
            .count();
        let rate = stopped as f64 / trials as f64;
        assert!((rate - 0.25).abs() < 0.02, "rate {rate}");
    }

    #[test]
    fn confusion_self_hit_uses_the_fixed_formula() {
        let (mut mon, tackle) = setup();
        let mut rng = SmallRng::seed_from_u64(3);
        mon.status.add(StatusId::CONFUSION, Some(4));
        let expected = confusion_damage(&mon);
        let mut hits = 0;
        for _ in 0..200 {
            let before = mon.hp;
            if let Some(Immobility::Confused(damage)) = check_mobility(&mut mon, &tackle, &mut rng) {
                assert_eq!(damage, expected);
                assert_eq!(before - mon.hp, damage.min(before));
                hits += 1;
            }
            mon.hp = mon.max_hp();
        }
        assert!(hits > 50 && hits < 150, "hits {hits}");
    }

    #[test]
    fn infatuation_stops_about_half_of_actions() {
        let (mut mon, tackle) = setup();
        let mut rng = SmallRng::seed_from_u64(5);
        mon.status.add(StatusId::INFATUATION, None);
        let trials = 10_000;
        let stopped = (0..trials)
            .filter(|_| check_mobility(&mut mon, &tackle, &mut rng) == Some(Immobility::Infatuated))
            .count();
        let rate = stopped as f64 / trials as f64;
        assert!((rate - 0.5).abs() < 0.02, "rate {rate}");
    }

    #[test]
    fn paralysis_is_checked_before_infatuation() {
        let (mut mon, tackle) = setup();
        let mut rng = SmallRng::seed_from_u64(9);
        mon.status.add(StatusId::PARALYSIS, None);
        mon.status.add(StatusId::INFATUATION, None);
        let trials = 10_000;
        let mut paralyzed = 0;
        for _ in 0..trials {
            match check_mobility(&mut mon, &tackle, &mut rng) {
                Some(Immobility::FullyParalyzed) => paralyzed += 1,
                None => {}
                other => panic!("paralysis roll should decide alone, got {other:?}"),
            }
        }
        let rate = paralyzed as f64 / trials as f64;
        assert!((rate - 0.25).abs() < 0.02, "rate {rate}");
    }

    #[test]
    fn infatuation_is_checked_before_sleep() {
        let (mut mon, tackle) = setup();
        let mut rng = SmallRng::seed_from_u64(13);
        mon.status.add(StatusId::SLEEP, Some(3));
        mon.status.add(StatusId::INFATUATION, None);
        let mut acted = 0;
        for _ in 0..1_000 {
            match check_mobility(&mut mon, &tackle, &mut rng) {
                Some(Immobility::Infatuated) => {}
                None => acted += 1,
                other => panic!("infatuation roll should decide alone, got {other:?}"),
            }
        }
        assert!(acted > 400 && acted < 600, "acted {acted}");
    }
}

