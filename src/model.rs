use pokemon_duel_core::catalog::Catalog;
use pokemon_duel_core::sim::{Combatant, CombatantSpec};
use serde::{Deserialize, Serialize};

/// Input file for the batch runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamsFile {
    pub team_a: Vec<CombatantSpec>,
    pub team_b: Vec<CombatantSpec>,
}

impl TeamsFile {
    /// Checks that both teams are non-empty and every member can be built
    /// from `catalog`, so a bad entry fails before any battle starts.
    pub fn validate(&self, catalog: &Catalog) -> anyhow::Result<()> {
        if self.team_a.is_empty() || self.team_b.is_empty() {
            anyhow::bail!("Both teams need at least one member");
        }
        for (label, team) in [("team_a", &self.team_a), ("team_b", &self.team_b)] {
            for (idx, spec) in team.iter().enumerate() {
                Combatant::from_catalog(catalog, spec).map_err(|err| {
                    anyhow::anyhow!("{label}[{idx}] ({}) is invalid: {err}", spec.species)
                })?;
            }
        }
        Ok(())
    }
}

/// Everyone on `team` except the member at `idx`.
pub fn bench_of(team: &[CombatantSpec], idx: usize) -> Vec<CombatantSpec> {
    team.iter()
        .enumerate()
        .filter(|(other, _)| *other != idx)
        .map(|(_, spec)| spec.clone())
        .collect()
}
