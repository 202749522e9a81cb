pub mod battle;
pub mod matrix;
pub mod model;

use crate::battle::{simulate_battle, BattleOptions, Matchup};
use crate::matrix::compute_matrix;
use crate::model::{bench_of, TeamsFile};
use anyhow::Context;
use pokemon_duel_core::catalog::sample::SAMPLE_CATALOG_JSON;
use pokemon_duel_core::catalog::{Catalog, LATEST_GENERATION};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CliOptions {
    /// `None` uses the bundled sample catalog.
    pub catalog_path: Option<PathBuf>,
    pub generation: u8,
    pub teams_path: PathBuf,
    pub battles_per_cell: usize,
    pub seed: u64,
    pub max_turns: u32,
    pub output_path: PathBuf,
    /// Where to write the JSON log of one sample battle.
    pub log_path: Option<PathBuf>,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            catalog_path: None,
            generation: LATEST_GENERATION,
            teams_path: PathBuf::from("teams.json"),
            battles_per_cell: 100,
            seed: 0,
            max_turns: BattleOptions::default().max_turns,
            output_path: PathBuf::from("matrix.csv"),
            log_path: None,
        }
    }
}

pub fn load_catalog(path: Option<&Path>, generation: u8) -> anyhow::Result<Catalog> {
    let Some(path) = path else {
        return Catalog::from_json_str(SAMPLE_CATALOG_JSON, generation)
            .context("Bundled sample catalog is invalid");
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file at {}", path.display()))?;
    Catalog::from_json_str(&raw, generation)
        .with_context(|| format!("Failed to load catalog from {}", path.display()))
}

pub fn load_teams(path: &Path, catalog: &Catalog) -> anyhow::Result<TeamsFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read teams file at {}", path.display()))?;
    let parsed: TeamsFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
    parsed.validate(catalog)?;
    Ok(parsed)
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    if opts.battles_per_cell == 0 {
        anyhow::bail!("--battles must be > 0");
    }
    let catalog = load_catalog(opts.catalog_path.as_deref(), opts.generation)?;
    let teams = load_teams(&opts.teams_path, &catalog)?;
    let options = BattleOptions {
        max_turns: opts.max_turns,
    };
    tracing::info!(
        team_a = teams.team_a.len(),
        team_b = teams.team_b.len(),
        battles_per_cell = opts.battles_per_cell,
        seed = opts.seed,
        "computing matrix"
    );

    let matrix = compute_matrix(&catalog, &teams, opts.battles_per_cell, opts.seed, options)?;
    matrix::write_csv(&teams, &matrix, &opts.output_path)?;
    println!(
        "Wrote {}x{} matrix to {}",
        matrix.len(),
        matrix.first().map(|r| r.len()).unwrap_or(0),
        opts.output_path.display()
    );

    if let Some(log_path) = &opts.log_path {
        let bench_a = bench_of(&teams.team_a, 0);
        let bench_b = bench_of(&teams.team_b, 0);
        let matchup = Matchup {
            a: &teams.team_a[0],
            b: &teams.team_b[0],
            bench_a: &bench_a,
            bench_b: &bench_b,
        };
        let sample = simulate_battle(&catalog, matchup, opts.seed, options)?;
        let json = serde_json::to_string_pretty(&sample.log.to_json())?;
        std::fs::write(log_path, json)
            .with_context(|| format!("Failed to write battle log to {}", log_path.display()))?;
        println!(
            "Wrote {}-turn sample battle ({:?}) to {}",
            sample.turns,
            sample.result,
            log_path.display()
        );
    }
    Ok(())
}
