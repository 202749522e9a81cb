use pokemon_duel::battle::{simulate_battle, BattleOptions, Matchup};
use pokemon_duel::matrix::{compute_matrix, render_csv};
use pokemon_duel::model::{bench_of, TeamsFile};
use pokemon_duel::{load_catalog, load_teams};
use pokemon_duel_core::catalog::Catalog;
use pokemon_duel_core::engine::BattleResult;
use pokemon_duel_core::sim::CombatantSpec;
use pretty_assertions::assert_eq;
use std::path::Path;

fn catalog() -> Catalog {
    load_catalog(None, 9).expect("sample catalog")
}

fn spec(species: &str, level: u8, moves: &[&str]) -> CombatantSpec {
    CombatantSpec::new(species, level, moves)
}

fn duel<'a>(a: &'a CombatantSpec, b: &'a CombatantSpec) -> Matchup<'a> {
    Matchup {
        a,
        b,
        bench_a: &[],
        bench_b: &[],
    }
}

#[test]
fn overwhelming_attacker_wins() {
    let catalog = catalog();
    let a = spec("tyranitar", 100, &["rock-slide"]);
    let b = spec("pikachu", 5, &["tackle"]);
    let battle = simulate_battle(&catalog, duel(&a, &b), 7, BattleOptions::default()).unwrap();
    assert_eq!(battle.result, BattleResult::AWins);
    assert!(battle.turns >= 1);
    assert!(!battle.log.events().is_empty());
}

#[test]
fn same_seed_same_battle() {
    let catalog = catalog();
    let a = spec("charizard", 50, &["fire-blast", "flame-wheel"]);
    let b = spec("blastoise", 50, &["surf", "bite"]);
    let first = simulate_battle(&catalog, duel(&a, &b), 99, BattleOptions::default()).unwrap();
    let second = simulate_battle(&catalog, duel(&a, &b), 99, BattleOptions::default()).unwrap();
    assert_eq!(first.result, second.result);
    assert_eq!(first.turns, second.turns);
    assert_eq!(first.log.log_lines(), second.log.log_lines());
}

#[test]
fn turn_limit_ends_in_draw() {
    let catalog = catalog();
    // Neither side can damage the other.
    let a = spec("snorlax", 50, &["growl"]);
    let b = spec("chansey", 50, &["growl"]);
    let options = BattleOptions { max_turns: 5 };
    let battle = simulate_battle(&catalog, duel(&a, &b), 1, options).unwrap();
    assert_eq!(battle.result, BattleResult::Draw);
    assert_eq!(battle.turns, 5);
}

#[test]
fn running_out_of_pp_ends_in_draw() {
    let catalog = catalog();
    let a = spec("snorlax", 50, &["growl"]);
    let b = spec("chansey", 50, &["growl"]);
    let options = BattleOptions { max_turns: 1000 };
    let battle = simulate_battle(&catalog, duel(&a, &b), 3, options).unwrap();
    assert_eq!(battle.result, BattleResult::Draw);
    assert!(battle.turns < 1000);
}

#[test]
fn invalid_bench_member_is_rejected() {
    let catalog = catalog();
    let a = spec("charizard", 50, &["ember"]);
    let b = spec("venusaur", 50, &["absorb"]);
    let bench = [spec("missingno", 50, &["tackle"])];
    let matchup = Matchup {
        a: &a,
        b: &b,
        bench_a: &bench,
        bench_b: &[],
    };
    assert!(simulate_battle(&catalog, matchup, 0, BattleOptions::default()).is_err());
}

#[test]
fn bench_excludes_the_active_member() {
    let team = vec![
        spec("charizard", 50, &["ember"]),
        spec("snorlax", 50, &["tackle"]),
        spec("gengar", 50, &["night-shade"]),
    ];
    let bench: Vec<_> = bench_of(&team, 1).into_iter().map(|s| s.species).collect();
    assert_eq!(bench, vec!["charizard".to_string(), "gengar".to_string()]);
}

#[test]
fn matrix_is_deterministic_and_bounded() {
    let catalog = catalog();
    let teams = TeamsFile {
        team_a: vec![
            spec("tyranitar", 100, &["rock-slide"]),
            spec("pikachu", 5, &["tackle"]),
        ],
        team_b: vec![spec("farfetchd", 20, &["tackle"])],
    };
    let options = BattleOptions::default();
    let first = compute_matrix(&catalog, &teams, 8, 42, options).unwrap();
    let second = compute_matrix(&catalog, &teams, 8, 42, options).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].len(), 1);
    assert_eq!(first[0][0], 1.0);
    assert!(first.iter().flatten().all(|rate| (0.0..=1.0).contains(rate)));
}

#[test]
fn csv_has_labelled_rows_and_columns() {
    let teams = TeamsFile {
        team_a: vec![spec("charizard", 50, &["ember"]), spec("gengar", 50, &["night-shade"])],
        team_b: vec![spec("blastoise", 50, &["surf"])],
    };
    let csv = render_csv(&teams, &[vec![0.25], vec![0.5]]);
    assert_eq!(csv, ",blastoise\ncharizard,0.2500\ngengar,0.5000");
}

#[test]
fn validation_rejects_empty_and_unknown_entries() {
    let catalog = catalog();
    let empty = TeamsFile {
        team_a: vec![],
        team_b: vec![spec("chansey", 50, &["growl"])],
    };
    assert!(empty.validate(&catalog).is_err());

    let unknown_move = TeamsFile {
        team_a: vec![spec("chansey", 50, &["not-a-move"])],
        team_b: vec![spec("chansey", 50, &["growl"])],
    };
    let err = unknown_move.validate(&catalog).unwrap_err().to_string();
    assert!(err.contains("team_a[0]"), "{err}");
}

#[test]
fn demo_teams_load() {
    let catalog = catalog();
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/teams.json");
    let teams = load_teams(&path, &catalog).unwrap();
    assert_eq!(teams.team_a.len(), 3);
    assert_eq!(teams.team_b.len(), 3);
}
