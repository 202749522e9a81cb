//! Two-combatant turn resolution for creature battles.
//!
//! The entry point for whole battles is [`engine::Battle`]; the individual
//! steps of a turn (order, mobility, a single action, end of turn) are
//! exposed under [`sim`] for callers that drive turns themselves. Reference
//! data comes in through a read-only [`catalog::Catalog`].

pub mod battle_logger;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod sim;

/// Commonly used exports for external consumers.
pub mod prelude {
    pub use crate::battle_logger::{BattleEvent, BattleLogger};
    pub use crate::catalog::sample::sample_catalog;
    pub use crate::catalog::{Catalog, MoveRecord, LATEST_GENERATION};
    pub use crate::engine::{Battle, BattleResult, TurnReport};
    pub use crate::error::{BattleError, CatalogError};
    pub use crate::sim::stats::Nature;
    pub use crate::sim::{
        apply_end_of_turn, can_act, execute_action, resolve_order, ActionContext, ActionOutcome,
        ActionReport, Combatant, CombatantSpec, Side, StatusId,
    };
}
