use crate::battle_logger::BattleEvent;
use crate::error::BattleError;
use crate::sim::combatant::Combatant;
use crate::sim::status::StatusId;

/// One residual HP change and the condition that caused it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Residual {
    source: StatusId,
    delta: i32,
}

/// Every residual term that applies to `mon`, each computed from max HP.
fn residuals(mon: &Combatant) -> Vec<Residual> {
    let max = mon.max_hp() as i32;
    let has = |id| mon.status.has(id);
    let mut terms = Vec::new();

    if has(StatusId::BURN) && !mon.has_ability("guts") {
        terms.push(Residual {
            source: StatusId::BURN,
            delta: -(max / 8),
        });
    }
    if has(StatusId::POISON) || has(StatusId::LEECH_SEED) {
        let source = if has(StatusId::POISON) {
            StatusId::POISON
        } else {
            StatusId::LEECH_SEED
        };
        terms.push(Residual {
            source,
            delta: -(max / 8),
        });
    }
    if has(StatusId::INGRAIN) || has(StatusId::AQUA_RING) {
        let mut heal = (max / 16) as f64;
        if mon.has_item("big-root") {
            heal = (heal * 1.3).floor();
        }
        let source = if has(StatusId::INGRAIN) {
            StatusId::INGRAIN
        } else {
            StatusId::AQUA_RING
        };
        terms.push(Residual {
            source,
            delta: heal as i32,
        });
    }
    if (has(StatusId::NIGHTMARE) && has(StatusId::SLEEP)) || has(StatusId::CURSE) {
        let source = if has(StatusId::CURSE) {
            StatusId::CURSE
        } else {
            StatusId::NIGHTMARE
        };
        terms.push(Residual {
            source,
            delta: -(max / 4),
        });
    }
    if has(StatusId::TRAP) {
        let mut damage = max / 16;
        if mon.has_item("binding-band") {
            damage *= 2;
        }
        terms.push(Residual {
            source: StatusId::TRAP,
            delta: -damage,
        });
    }
    terms
}

/// Applies residual damage and healing from the combatant's conditions.
///
/// Runs once per combatant per turn; a second call for the same turn is
/// rejected before anything changes. Fainted combatants are skipped but
/// still marked.
pub fn apply_end_of_turn(mon: &mut Combatant, turn: u32) -> Result<Vec<BattleEvent>, BattleError> {
    if mon.end_of_turn_done(turn) {
        return Err(BattleError::EndOfTurnAlreadyApplied(turn));
    }
    mon.mark_end_of_turn(turn);

    let mut events = Vec::new();
    if mon.is_fainted() {
        return Ok(events);
    }
    for term in residuals(mon) {
        if term.delta > 0 {
            let healed = mon.heal(term.delta as u16);
            if healed > 0 {
                events.push(BattleEvent::heal(mon, healed));
            }
        } else if term.delta < 0 {
            let dealt = mon.take_damage(term.delta.unsigned_abs() as u16);
            events.push(BattleEvent::damage(mon, dealt));
        }
        tracing::debug!(mon = %mon.name, source = term.source.name(), delta = term.delta, "residual");
        if mon.is_fainted() {
            events.push(BattleEvent::Faint {
                target: mon.name.clone(),
            });
            break;
        }
    }
    Ok(events)
}
