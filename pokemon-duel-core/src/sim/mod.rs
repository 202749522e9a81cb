//! Turn resolution, leaves first: types and stats, the status ledger, the
//! combatant model, then the per-action pipeline built on top of them.

pub mod accuracy;
pub mod action;
pub mod combatant;
pub mod damage;
pub mod direct;
pub mod effects;
pub mod end_of_turn;
pub mod mobility;
pub mod order;
pub mod power;
pub mod stats;
pub mod status;
pub mod types;

pub use action::{execute_action, ActionContext, ActionOutcome, ActionReport};
pub use combatant::{Combatant, CombatantSpec, MoveSlot};
pub use end_of_turn::apply_end_of_turn;
pub use mobility::{can_act, Immobility};
pub use order::{resolve_order, Side};
pub use status::{StatusEntry, StatusId, StatusLedger};
pub use types::Type;
