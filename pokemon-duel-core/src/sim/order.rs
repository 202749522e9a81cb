use crate::catalog::MoveRecord;
use crate::sim::combatant::Combatant;
use crate::sim::stats::BattleStat;
use crate::sim::status::StatusId;
use rand::Rng;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

const QUICK_CLAW_CHANCE: f64 = 0.2;

/// Decides which side acts first and tags both combatants with their order.
///
/// Tiers, each consulted only when the previous one is undecided: quick-claw,
/// lagging-tail/full-incense, stall, move priority, Speed. A trick room
/// active on both sides inverts only the Speed tier. Exact Speed ties go to
/// `a`.
pub fn resolve_order(
    a: &mut Combatant,
    a_move: &MoveRecord,
    b: &mut Combatant,
    b_move: &MoveRecord,
    rng: &mut impl Rng,
) -> Side {
    let first = decide(a, a_move, b, b_move, rng);
    let (a_order, b_order) = match first {
        Side::A => (1, 2),
        Side::B => (2, 1),
    };
    a.order = a_order;
    b.order = b_order;
    tracing::debug!(
        a = %a.name,
        b = %b.name,
        first = ?first,
        "turn order resolved"
    );
    first
}

fn decide(
    a: &Combatant,
    a_move: &MoveRecord,
    b: &Combatant,
    b_move: &MoveRecord,
    rng: &mut impl Rng,
) -> Side {
    match (a.has_item("quick-claw"), b.has_item("quick-claw")) {
        (true, false) if rng.gen_bool(QUICK_CLAW_CHANCE) => return Side::A,
        (false, true) if rng.gen_bool(QUICK_CLAW_CHANCE) => return Side::B,
        _ => {}
    }

    match (acts_last_item(a), acts_last_item(b)) {
        (true, false) => return Side::B,
        (false, true) => return Side::A,
        _ => {}
    }

    match (a.has_ability("stall"), b.has_ability("stall")) {
        (true, false) => return Side::B,
        (false, true) => return Side::A,
        _ => {}
    }

    if a_move.priority != b_move.priority {
        return if a_move.priority > b_move.priority {
            Side::A
        } else {
            Side::B
        };
    }

    let a_speed = a.current(BattleStat::Speed);
    let b_speed = b.current(BattleStat::Speed);
    if a_speed == b_speed {
        return Side::A;
    }
    let trick_room = a.status.has(StatusId::TRICK_ROOM) && b.status.has(StatusId::TRICK_ROOM);
    if (a_speed > b_speed) != trick_room {
        Side::A
    } else {
        Side::B
    }
}

fn acts_last_item(mon: &Combatant) -> bool {
    mon.has_item("lagging-tail") || mon.has_item("full-incense")
}
