use pokemon_duel::{run, CliOptions};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!(
        "Usage: cargo run --release -- [--catalog catalog.json] [--generation N] [--teams teams.json] \
[--battles N] [--seed SEED] [--max-turns N] [--output matrix.csv] [--log battle.json]"
    );
    std::process::exit(1);
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str, what: &str) -> anyhow::Result<String> {
    args.next()
        .ok_or_else(|| anyhow::anyhow!("{flag} requires {what}"))
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut opts = CliOptions::default();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--catalog" => {
                opts.catalog_path = Some(PathBuf::from(next_value(&mut args, "--catalog", "a path")?));
            }
            "--generation" => {
                opts.generation = next_value(&mut args, "--generation", "a number")?.parse()?;
            }
            "--teams" => {
                opts.teams_path = PathBuf::from(next_value(
                    &mut args,
                    "--teams",
                    "a path (e.g. --teams demos/teams.json)",
                )?);
            }
            "--battles" => {
                opts.battles_per_cell = next_value(&mut args, "--battles", "a number")?.parse()?;
            }
            "--seed" => {
                opts.seed = next_value(&mut args, "--seed", "a number")?.parse()?;
            }
            "--max-turns" => {
                opts.max_turns = next_value(&mut args, "--max-turns", "a number")?.parse()?;
            }
            "--output" => {
                opts.output_path = PathBuf::from(next_value(
                    &mut args,
                    "--output",
                    "a path (e.g. --output matrix.csv)",
                )?);
            }
            "--log" => {
                opts.log_path = Some(PathBuf::from(next_value(&mut args, "--log", "a path")?));
            }
            "--help" | "-h" => usage(),
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }
    Ok(opts)
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let opts = parse_args()?;
    run(opts)
}
