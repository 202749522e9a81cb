use pokemon_duel_core::battle_logger::BattleLogger;
use pokemon_duel_core::catalog::Catalog;
use pokemon_duel_core::engine::{Battle, BattleResult};
use pokemon_duel_core::sim::{Combatant, CombatantSpec, Side};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Keeps the move-choice stream independent of the battle's own RNG.
const POLICY_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Clone, Copy, Debug)]
pub struct BattleOptions {
    /// Turns played before the battle is called a draw.
    pub max_turns: u32,
}

impl Default for BattleOptions {
    fn default() -> Self {
        Self { max_turns: 200 }
    }
}

/// The two combatants on the field plus their benches.
#[derive(Clone, Copy, Debug)]
pub struct Matchup<'a> {
    pub a: &'a CombatantSpec,
    pub b: &'a CombatantSpec,
    pub bench_a: &'a [CombatantSpec],
    pub bench_b: &'a [CombatantSpec],
}

#[derive(Debug)]
pub struct SimulatedBattle {
    pub result: BattleResult,
    pub turns: u32,
    pub log: BattleLogger,
}

/// Plays one battle with both sides picking uniformly among slots that still
/// have PP. Running out of moves or turns ends it in a draw.
pub fn simulate_battle(
    catalog: &Catalog,
    matchup: Matchup<'_>,
    seed: u64,
    options: BattleOptions,
) -> anyhow::Result<SimulatedBattle> {
    let build_bench = |bench: &[CombatantSpec]| {
        bench
            .iter()
            .map(|spec| Combatant::from_catalog(catalog, spec))
            .collect::<Result<Vec<_>, _>>()
    };
    let party_a = build_bench(matchup.bench_a)?;
    let party_b = build_bench(matchup.bench_b)?;
    let mut battle =
        Battle::from_specs(catalog, matchup.a, matchup.b, seed)?.with_parties(party_a, party_b);
    let mut policy_rng = SmallRng::seed_from_u64(seed ^ POLICY_SEED_SALT);

    let result = loop {
        if let Some(result) = battle.outcome() {
            break result;
        }
        if battle.turn() > options.max_turns {
            tracing::debug!(turns = options.max_turns, "turn limit reached");
            break BattleResult::Draw;
        }
        let slot_a = battle.legal_slots(Side::A).choose(&mut policy_rng).copied();
        let slot_b = battle.legal_slots(Side::B).choose(&mut policy_rng).copied();
        let (Some(slot_a), Some(slot_b)) = (slot_a, slot_b) else {
            tracing::debug!(turn = battle.turn(), "a side ran out of PP");
            break BattleResult::Draw;
        };
        battle.play_turn(slot_a, slot_b)?;
    };

    let turns = battle.turn() - 1;
    Ok(SimulatedBattle {
        result,
        turns,
        log: battle.into_logger(),
    })
}
