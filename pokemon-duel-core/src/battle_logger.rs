use crate::sim::combatant::Combatant;
use crate::sim::mobility::Immobility;
use crate::sim::stats::BattleStat;
use crate::sim::status::StatusId;
use serde::Serialize;
use serde_json::json;

/// Something observable that happened during a battle.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BattleEvent {
    Turn { turn: u32 },
    Move { user: String, move_name: String, target: String },
    Charging { user: String, move_name: String },
    Damage { target: String, amount: u16, hp: u16, max_hp: u16 },
    Heal { target: String, amount: u16, hp: u16, max_hp: u16 },
    Status { target: String, status: StatusId },
    StatusEnd { target: String, status: StatusId },
    StatChange { target: String, stat: BattleStat, change: i8 },
    Miss { user: String, target: String },
    Crit { target: String },
    Effectiveness { target: String, factor: f64 },
    Immobile { user: String, reason: Immobility },
    Fail { user: String, move_name: String },
    Faint { target: String },
}

impl BattleEvent {
    pub fn damage(target: &Combatant, amount: u16) -> Self {
        BattleEvent::Damage {
            target: target.name.clone(),
            amount,
            hp: target.hp,
            max_hp: target.max_hp(),
        }
    }

    pub fn heal(target: &Combatant, amount: u16) -> Self {
        BattleEvent::Heal {
            target: target.name.clone(),
            amount,
            hp: target.hp,
            max_hp: target.max_hp(),
        }
    }

    pub fn status(target: &Combatant, status: StatusId) -> Self {
        BattleEvent::Status {
            target: target.name.clone(),
            status,
        }
    }

    pub fn stat_change(target: &Combatant, stat: BattleStat, change: i8) -> Self {
        BattleEvent::StatChange {
            target: target.name.clone(),
            stat,
            change,
        }
    }

    pub fn fail(user: &Combatant, move_name: &str) -> Self {
        BattleEvent::Fail {
            user: user.name.clone(),
            move_name: move_name.to_string(),
        }
    }

    /// The event as one pipe-delimited protocol line.
    pub fn to_line(&self) -> String {
        match self {
            BattleEvent::Turn { turn } => format!("|turn|{turn}"),
            BattleEvent::Move {
                user,
                move_name,
                target,
            } => format!("|move|{user}|{move_name}|{target}"),
            BattleEvent::Charging { user, move_name } => format!("|-prepare|{user}|{move_name}"),
            BattleEvent::Damage {
                target, hp, max_hp, ..
            } => format!("|-damage|{target}|{hp}/{max_hp}"),
            BattleEvent::Heal {
                target, hp, max_hp, ..
            } => format!("|-heal|{target}|{hp}/{max_hp}"),
            BattleEvent::Status { target, status } => {
                format!("|-status|{target}|{}", status.name())
            }
            BattleEvent::StatusEnd { target, status } => {
                format!("|-end|{target}|{}", status.name())
            }
            BattleEvent::StatChange {
                target,
                stat,
                change,
            } => {
                let verb = if *change >= 0 { "boost" } else { "unboost" };
                format!("|-{verb}|{target}|{}|{}", stat_label(*stat), change.unsigned_abs())
            }
            BattleEvent::Miss { user, target } => format!("|-miss|{user}|{target}"),
            BattleEvent::Crit { target } => format!("|-crit|{target}"),
            BattleEvent::Effectiveness { target, factor } => {
                let tag = if *factor == 0.0 {
                    "-immune"
                } else if *factor > 1.0 {
                    "-supereffective"
                } else {
                    "-resisted"
                };
                format!("|{tag}|{target}")
            }
            BattleEvent::Immobile { user, reason } => {
                format!("|cant|{user}|{}", immobility_label(*reason))
            }
            BattleEvent::Fail { user, move_name } => format!("|-fail|{user}|{move_name}"),
            BattleEvent::Faint { target } => format!("|faint|{target}"),
        }
    }
}

fn stat_label(stat: BattleStat) -> &'static str {
    match stat {
        BattleStat::Attack => "atk",
        BattleStat::Defense => "def",
        BattleStat::SpecialAttack => "spa",
        BattleStat::SpecialDefense => "spd",
        BattleStat::Speed => "spe",
        BattleStat::Accuracy => "accuracy",
        BattleStat::Evasion => "evasion",
    }
}

fn immobility_label(reason: Immobility) -> &'static str {
    match reason {
        Immobility::Recharging => "recharge",
        Immobility::Flinched => "flinch",
        Immobility::FullyParalyzed => "par",
        Immobility::Infatuated => "attract",
        Immobility::Asleep => "slp",
        Immobility::Frozen => "frz",
        Immobility::Confused(_) => "confusion",
    }
}

#[derive(Clone, Debug, Default)]
pub struct BattleLogger {
    formatid: String,
    events: Vec<BattleEvent>,
    log: Vec<String>,
}

impl BattleLogger {
    pub fn new() -> Self {
        Self::new_with_format("duel-singles")
    }

    pub fn new_with_format(formatid: impl Into<String>) -> Self {
        Self {
            formatid: formatid.into(),
            events: Vec::new(),
            log: Vec::new(),
        }
    }

    pub fn record(&mut self, event: BattleEvent) {
        self.log.push(event.to_line());
        self.events.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = BattleEvent>) {
        for event in events {
            self.record(event);
        }
    }

    pub fn log_win(&mut self, winner: &str) {
        self.log.push(format!("|win|{winner}"));
    }

    pub fn log_tie(&mut self) {
        self.log.push("|tie|".to_string());
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "format": self.formatid,
            "log": self.log,
            "events": self.events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn events_render_as_protocol_lines() {
        let mut logger = BattleLogger::new();
        logger.record(BattleEvent::Turn { turn: 1 });
        logger.record(BattleEvent::Move {
            user: "pikachu".into(),
            move_name: "thunderbolt".into(),
            target: "gyarados".into(),
        });
        logger.record(BattleEvent::Damage {
            target: "gyarados".into(),
            amount: 120,
            hp: 51,
            max_hp: 171,
        });
        logger.record(BattleEvent::StatChange {
            target: "gyarados".into(),
            stat: BattleStat::SpecialDefense,
            change: -1,
        });
        logger.record(BattleEvent::Immobile {
            user: "gyarados".into(),
            reason: Immobility::FullyParalyzed,
        });
        logger.log_win("pikachu");
        assert_eq!(
            logger.log_lines(),
            &[
                "|turn|1",
                "|move|pikachu|thunderbolt|gyarados",
                "|-damage|gyarados|51/171",
                "|-unboost|gyarados|spd|1",
                "|cant|gyarados|par",
                "|win|pikachu",
            ]
        );
        assert_eq!(logger.events().len(), 5);
    }

    #[test]
    fn json_export_keeps_structured_events() {
        let mut logger = BattleLogger::new_with_format("test");
        logger.record(BattleEvent::Status {
            target: "snorlax".into(),
            status: StatusId::BURN,
        });
        let value = logger.to_json();
        assert_eq!(value["format"], "test");
        assert_eq!(value["log"][0], "|-status|snorlax|burn");
        assert_eq!(value["events"][0]["kind"], "status");
        assert_eq!(value["events"][0]["status"], 4);
    }
}
