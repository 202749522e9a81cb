//! Status conditions and the per-combatant ledger that tracks them.
//!
//! Ids 1..=5 are the non-volatile conditions and are mutually exclusive.
//! Ids 6..=99 follow the catalog's ailment table, and 100 and above are
//! engine markers (flinch, recharge, semi-invulnerable phases, field
//! conditions) that never appear in catalog data.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusId(pub u16);

impl StatusId {
    pub const NORMAL: StatusId = StatusId(0);
    pub const PARALYSIS: StatusId = StatusId(1);
    pub const SLEEP: StatusId = StatusId(2);
    pub const FREEZE: StatusId = StatusId(3);
    pub const BURN: StatusId = StatusId(4);
    pub const POISON: StatusId = StatusId(5);
    pub const CONFUSION: StatusId = StatusId(6);
    pub const INFATUATION: StatusId = StatusId(7);
    pub const TRAP: StatusId = StatusId(8);
    pub const NIGHTMARE: StatusId = StatusId(9);
    pub const TORMENT: StatusId = StatusId(12);
    pub const DISABLE: StatusId = StatusId(13);
    pub const YAWN: StatusId = StatusId(14);
    pub const HEAL_BLOCK: StatusId = StatusId(15);
    pub const NO_TYPE_IMMUNITY: StatusId = StatusId(17);
    pub const LEECH_SEED: StatusId = StatusId(18);
    pub const EMBARGO: StatusId = StatusId(19);
    pub const PERISH_SONG: StatusId = StatusId(20);
    pub const INGRAIN: StatusId = StatusId(21);
    pub const FLINCH: StatusId = StatusId(100);
    pub const RECHARGE: StatusId = StatusId(101);
    pub const TAKING_AIM: StatusId = StatusId(102);
    pub const FLYING_UP_HIGH: StatusId = StatusId(103);
    pub const UNDERGROUND: StatusId = StatusId(104);
    pub const UNDERWATER: StatusId = StatusId(105);
    pub const TRICK_ROOM: StatusId = StatusId(106);
    pub const CURSE: StatusId = StatusId(107);
    pub const AQUA_RING: StatusId = StatusId(108);

    pub fn is_non_volatile(self) -> bool {
        (1..=5).contains(&self.0)
    }

    pub fn is_semi_invulnerable(self) -> bool {
        matches!(
            self,
            StatusId::FLYING_UP_HIGH | StatusId::UNDERGROUND | StatusId::UNDERWATER
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            StatusId::NORMAL => "normal",
            StatusId::PARALYSIS => "paralysis",
            StatusId::SLEEP => "sleep",
            StatusId::FREEZE => "freeze",
            StatusId::BURN => "burn",
            StatusId::POISON => "poison",
            StatusId::CONFUSION => "confusion",
            StatusId::INFATUATION => "infatuation",
            StatusId::TRAP => "trap",
            StatusId::NIGHTMARE => "nightmare",
            StatusId::TORMENT => "torment",
            StatusId::DISABLE => "disable",
            StatusId::YAWN => "yawn",
            StatusId::HEAL_BLOCK => "heal-block",
            StatusId::NO_TYPE_IMMUNITY => "no-type-immunity",
            StatusId::LEECH_SEED => "leech-seed",
            StatusId::EMBARGO => "embargo",
            StatusId::PERISH_SONG => "perish-song",
            StatusId::INGRAIN => "ingrain",
            StatusId::FLINCH => "flinch",
            StatusId::RECHARGE => "recharge",
            StatusId::TAKING_AIM => "taking-aim",
            StatusId::FLYING_UP_HIGH => "flying-up-high",
            StatusId::UNDERGROUND => "underground",
            StatusId::UNDERWATER => "underwater",
            StatusId::TRICK_ROOM => "trick-room",
            StatusId::CURSE => "curse",
            StatusId::AQUA_RING => "aqua-ring",
            _ => "unknown",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatusEntry {
    pub id: StatusId,
    pub name: &'static str,
    /// Turns left; `None` lasts until removed.
    pub remaining: Option<u32>,
}

impl StatusEntry {
    pub fn new(id: StatusId, remaining: Option<u32>) -> Self {
        Self {
            id,
            name: id.name(),
            remaining,
        }
    }

    pub fn is_non_volatile(&self) -> bool {
        self.id.is_non_volatile()
    }
}

/// The set of conditions afflicting one combatant.
///
/// At most one non-volatile entry is ever present: adding another replaces
/// it, and adding `NORMAL` clears it. Volatile entries accumulate.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StatusLedger {
    entries: Vec<StatusEntry>,
    #[serde(skip)]
    last_decay_turn: Option<u32>,
}

impl StatusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: StatusId, remaining: Option<u32>) {
        if id == StatusId::NORMAL {
            self.entries.retain(|entry| !entry.is_non_volatile());
            return;
        }
        if id.is_non_volatile() {
            self.entries.retain(|entry| !entry.is_non_volatile());
        }
        self.entries.push(StatusEntry::new(id, remaining));
    }

    pub fn has(&self, id: StatusId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn non_volatile(&self) -> Option<&StatusEntry> {
        self.entries.iter().find(|entry| entry.is_non_volatile())
    }

    /// Which semi-invulnerable phase the holder is in, if any.
    pub fn semi_invulnerable(&self) -> Option<StatusId> {
        self.entries
            .iter()
            .map(|entry| entry.id)
            .find(|id| id.is_semi_invulnerable())
    }

    /// Removes every entry with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: StatusId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        before != self.entries.len()
    }

    /// Ticks every bounded entry down by one and drops those that run out.
    ///
    /// Runs at most once per `turn`; repeated calls for the same turn are
    /// no-ops and return nothing.
    pub fn decay(&mut self, turn: u32) -> Vec<StatusId> {
        if self.last_decay_turn == Some(turn) {
            return Vec::new();
        }
        self.last_decay_turn = Some(turn);
        let mut expired = Vec::new();
        self.entries.retain_mut(|entry| match entry.remaining.as_mut() {
            Some(left) => {
                *left = left.saturating_sub(1);
                if *left == 0 {
                    expired.push(entry.id);
                    false
                } else {
                    true
                }
            }
            None => true,
        });
        expired
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_decay_turn = None;
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NON_VOLATILE: [StatusId; 5] = [
        StatusId::PARALYSIS,
        StatusId::SLEEP,
        StatusId::FREEZE,
        StatusId::BURN,
        StatusId::POISON,
    ];

    #[test]
    fn second_non_volatile_replaces_first_in_any_order() {
        for first in NON_VOLATILE {
            for second in NON_VOLATILE {
                let mut ledger = StatusLedger::new();
                ledger.add(first, None);
                ledger.add(StatusId::CONFUSION, Some(3));
                ledger.add(second, Some(2));
                let persistent: Vec<_> = ledger.iter().filter(|e| e.is_non_volatile()).collect();
                assert_eq!(persistent.len(), 1);
                assert_eq!(persistent[0].id, second);
                assert!(ledger.has(StatusId::CONFUSION));
            }
        }
    }

    #[test]
    fn volatile_statuses_accumulate() {
        let mut ledger = StatusLedger::new();
        ledger.add(StatusId::CONFUSION, None);
        ledger.add(StatusId::LEECH_SEED, None);
        ledger.add(StatusId::FLINCH, Some(1));
        ledger.add(StatusId::FLINCH, Some(1));
        assert_eq!(ledger.len(), 4);
        assert!(ledger.remove(StatusId::FLINCH));
        assert_eq!(ledger.len(), 2);
        assert!(!ledger.remove(StatusId::FLINCH));
    }

    #[test]
    fn normal_clears_the_non_volatile_entry() {
        let mut ledger = StatusLedger::new();
        ledger.add(StatusId::BURN, None);
        ledger.add(StatusId::INGRAIN, None);
        ledger.add(StatusId::NORMAL, None);
        assert!(ledger.non_volatile().is_none());
        assert!(ledger.has(StatusId::INGRAIN));
        assert!(!ledger.has(StatusId::NORMAL));
    }

    #[test]
    fn decay_drops_expired_entries_once_per_turn() {
        let mut ledger = StatusLedger::new();
        ledger.add(StatusId::FLINCH, Some(1));
        ledger.add(StatusId::TAKING_AIM, Some(2));
        ledger.add(StatusId::BURN, None);

        assert_eq!(ledger.decay(1), vec![StatusId::FLINCH]);
        assert!(ledger.decay(1).is_empty());
        assert!(ledger.has(StatusId::TAKING_AIM));

        assert_eq!(ledger.decay(2), vec![StatusId::TAKING_AIM]);
        assert!(ledger.has(StatusId::BURN));
    }
}
