//! Error taxonomy for catalog loading and battle resolution.

use thiserror::Error;

/// Failures while loading or querying the reference catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("species `{0}` is not in the catalog")]
    UnknownSpecies(String),
    #[error("move `{0}` is not in the catalog")]
    UnknownMove(String),
    #[error("item `{0}` is not in the catalog")]
    UnknownItem(String),
    #[error("ability `{0}` is not in the catalog")]
    UnknownAbility(String),
    #[error("move `{move_name}` uses effect id {effect_id}, which has no handler")]
    UnhandledEffect { move_name: String, effect_id: u16 },
    #[error("duplicate {table} id {id}")]
    DuplicateId { table: &'static str, id: u16 },
    #[error("malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Failures raised at the battle API boundary.
///
/// All of these are detected before any combatant state is touched.
#[derive(Debug, Error)]
pub enum BattleError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("level {0} is outside 1..=100")]
    InvalidLevel(u8),
    #[error("{field} must hold 6 values, got {len}")]
    InvalidStatArray { field: &'static str, len: usize },
    #[error("individual value {0} is outside 0..=31")]
    IvOutOfRange(u8),
    #[error("effort value {0} is outside 0..=255")]
    EvOutOfRange(u16),
    #[error("effort values total {0}, above the 510 budget")]
    EvBudgetExceeded(u32),
    #[error("a combatant needs 1 to 4 moves, got {0}")]
    InvalidMoveCount(usize),
    #[error("move slot {0} does not exist")]
    InvalidMoveSlot(usize),
    #[error("`{0}` has no PP left")]
    NoPpRemaining(String),
    #[error("end-of-turn effects were already applied on turn {0}")]
    EndOfTurnAlreadyApplied(u32),
    #[error("the battle is already over")]
    BattleOver,
}
