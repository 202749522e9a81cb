use crate::battle::{simulate_battle, BattleOptions, Matchup};
use crate::model::{bench_of, TeamsFile};
use pokemon_duel_core::catalog::Catalog;
use pokemon_duel_core::engine::BattleResult;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Win rate of every team-A member (rows) against every team-B member
/// (columns). Draws count as half a win.
///
/// Cells run in parallel; each one seeds its own RNG from `seed` and its
/// coordinates and builds fresh combatants, so the result does not depend on
/// scheduling.
pub fn compute_matrix(
    catalog: &Catalog,
    teams: &TeamsFile,
    battles_per_cell: usize,
    seed: u64,
    options: BattleOptions,
) -> anyhow::Result<Vec<Vec<f64>>> {
    let benches_a: Vec<_> = (0..teams.team_a.len()).map(|idx| bench_of(&teams.team_a, idx)).collect();
    let benches_b: Vec<_> = (0..teams.team_b.len()).map(|idx| bench_of(&teams.team_b, idx)).collect();
    let tasks: Vec<(usize, usize)> = (0..teams.team_a.len())
        .flat_map(|a| (0..teams.team_b.len()).map(move |b| (a, b)))
        .collect();

    let cell_results: Vec<CellResult> = tasks
        .par_iter()
        .map(|&(a_idx, b_idx)| {
            let mut cell_rng = SmallRng::seed_from_u64(seed ^ ((a_idx as u64) << 32) ^ (b_idx as u64));
            let matchup = Matchup {
                a: &teams.team_a[a_idx],
                b: &teams.team_b[b_idx],
                bench_a: &benches_a[a_idx],
                bench_b: &benches_b[b_idx],
            };
            let mut a_wins = 0u64;
            let mut draws = 0u64;
            for _ in 0..battles_per_cell {
                let battle_seed = cell_rng.gen();
                match simulate_battle(catalog, matchup, battle_seed, options)?.result {
                    BattleResult::AWins => a_wins += 1,
                    BattleResult::BWins => {}
                    BattleResult::Draw => draws += 1,
                }
            }
            let total = battles_per_cell as f64;
            let win_rate = (a_wins as f64 + 0.5 * draws as f64) / total;
            tracing::debug!(a_idx, b_idx, win_rate, "cell done");
            Ok(CellResult {
                a_idx,
                b_idx,
                win_rate,
            })
        })
        .collect::<anyhow::Result<_>>()?;

    let mut matrix = vec![vec![0.0; teams.team_b.len()]; teams.team_a.len()];
    for cell in cell_results {
        matrix[cell.a_idx][cell.b_idx] = cell.win_rate;
    }
    Ok(matrix)
}

/// Writes the matrix with a header row of team-B species and one labelled
/// row per team-A member.
pub fn write_csv(teams: &TeamsFile, matrix: &[Vec<f64>], path: &std::path::Path) -> anyhow::Result<()> {
    std::fs::write(path, render_csv(teams, matrix))?;
    Ok(())
}

pub fn render_csv(teams: &TeamsFile, matrix: &[Vec<f64>]) -> String {
    let mut out = String::new();
    for spec in &teams.team_b {
        out.push(',');
        out.push_str(&spec.species);
    }
    for (spec, row) in teams.team_a.iter().zip(matrix) {
        out.push('\n');
        out.push_str(&spec.species);
        for value in row {
            out.push_str(&format!(",{value:.4}"));
        }
    }
    out
}

struct CellResult {
    a_idx: usize,
    b_idx: usize,
    win_rate: f64,
}
