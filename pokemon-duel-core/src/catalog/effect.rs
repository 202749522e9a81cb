//! The closed set of move behaviours, resolved from numeric effect ids when
//! the catalog is loaded.

use crate::sim::status::StatusId;
use phf::phf_set;
use serde::Serialize;

/// Effect ids whose behaviour is fully described by move metadata
/// (stat changes, ailments, drain, healing, flinch, multi-hit).
static STANDARD_EFFECTS: phf::Set<u16> = phf_set! {
    1u16, 2u16, 3u16, 4u16, 5u16, 6u16, 7u16, 11u16, 12u16, 13u16, 14u16,
    17u16, 19u16, 20u16, 21u16, 24u16, 25u16, 30u16, 32u16, 33u16, 34u16,
    37u16, 43u16, 44u16, 45u16, 49u16, 50u16, 51u16, 52u16, 53u16, 54u16,
    55u16, 59u16, 60u16, 61u16, 62u16, 63u16, 67u16, 68u16, 69u16, 70u16,
    71u16, 72u16, 73u16, 74u16, 77u16, 78u16, 85u16, 104u16, 108u16, 119u16,
    121u16, 126u16, 139u16, 140u16, 141u16, 147u16, 148u16, 150u16, 153u16,
    168u16, 182u16, 199u16, 200u16, 201u16, 209u16, 213u16, 254u16, 258u16,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveEffect {
    /// Fixed table power, everything else from metadata.
    Standard,

    // Power overrides.
    Flail,
    Return,
    Present,
    Frustration,
    Magnitude,
    SpitUp,
    TargetWeight,
    GyroBall,
    NaturalGift,
    Fling,
    TrumpCard,
    WringOut,
    MeFirst,
    Punishment,
    WeightRatio,
    Eruption,
    Facade,
    SmellingSalts,
    Revenge,
    WakeUpSlap,
    Brine,
    Payback,

    // Damage that bypasses the formula.
    SuperFang,
    DragonRage,
    LevelDamage,
    Psywave,
    Counter,
    SonicBoom,
    MirrorCoat,
    BeatUp,
    Endeavor,
    MetalBurst,
    FinalGambit,
    OneHitKo,

    // Residual behaviours.
    Haze,
    MirrorMove,
    Mimic,
    Metronome,
    LockOn,
    Spite,
    Rest,
    Snore,
    SleepTalk,
    Recharge,
    Stockpile,
    Swallow,
    /// Hide on the first turn, strike on the second.
    TwoTurnHide(StatusId),
    TrickRoom,
    Curse,
    AquaRing,
}

impl MoveEffect {
    /// Maps a catalog effect id to its behaviour. `None` means no handler
    /// exists and the catalog must be rejected.
    pub fn from_id(effect_id: u16) -> Option<Self> {
        let effect = match effect_id {
            10 => MoveEffect::MirrorMove,
            26 => MoveEffect::Haze,
            38 => MoveEffect::Rest,
            39 => MoveEffect::OneHitKo,
            41 => MoveEffect::SuperFang,
            42 => MoveEffect::DragonRage,
            81 => MoveEffect::Recharge,
            83 => MoveEffect::Mimic,
            84 => MoveEffect::Metronome,
            88 => MoveEffect::LevelDamage,
            89 => MoveEffect::Psywave,
            90 => MoveEffect::Counter,
            93 => MoveEffect::Snore,
            95 => MoveEffect::LockOn,
            98 => MoveEffect::SleepTalk,
            100 => MoveEffect::Flail,
            101 => MoveEffect::Spite,
            110 => MoveEffect::Curse,
            122 => MoveEffect::Return,
            123 => MoveEffect::Present,
            124 => MoveEffect::Frustration,
            127 => MoveEffect::Magnitude,
            131 => MoveEffect::SonicBoom,
            145 => MoveEffect::MirrorCoat,
            155 => MoveEffect::BeatUp,
            156 => MoveEffect::TwoTurnHide(StatusId::FLYING_UP_HIGH),
            161 => MoveEffect::Stockpile,
            162 => MoveEffect::SpitUp,
            163 => MoveEffect::Swallow,
            170 => MoveEffect::Facade,
            172 => MoveEffect::SmellingSalts,
            186 => MoveEffect::Revenge,
            190 => MoveEffect::Endeavor,
            191 => MoveEffect::Eruption,
            197 => MoveEffect::TargetWeight,
            218 => MoveEffect::WakeUpSlap,
            220 => MoveEffect::GyroBall,
            222 => MoveEffect::Brine,
            223 => MoveEffect::NaturalGift,
            228 => MoveEffect::MetalBurst,
            231 => MoveEffect::Payback,
            234 => MoveEffect::Fling,
            236 => MoveEffect::TrumpCard,
            238 => MoveEffect::WringOut,
            242 => MoveEffect::MeFirst,
            246 => MoveEffect::Punishment,
            252 => MoveEffect::AquaRing,
            256 => MoveEffect::TwoTurnHide(StatusId::UNDERWATER),
            257 => MoveEffect::TwoTurnHide(StatusId::UNDERGROUND),
            260 => MoveEffect::TrickRoom,
            292 => MoveEffect::WeightRatio,
            321 => MoveEffect::FinalGambit,
            id if STANDARD_EFFECTS.contains(&id) => MoveEffect::Standard,
            _ => return None,
        };
        Some(effect)
    }

    /// Whether the move skips the stat-based formula entirely.
    pub fn is_direct_damage(self) -> bool {
        matches!(
            self,
            MoveEffect::SuperFang
                | MoveEffect::DragonRage
                | MoveEffect::LevelDamage
                | MoveEffect::Psywave
                | MoveEffect::Counter
                | MoveEffect::SonicBoom
                | MoveEffect::MirrorCoat
                | MoveEffect::BeatUp
                | MoveEffect::Endeavor
                | MoveEffect::MetalBurst
                | MoveEffect::FinalGambit
                | MoveEffect::OneHitKo
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_have_no_handler() {
        assert_eq!(MoveEffect::from_id(58), None);
        assert_eq!(MoveEffect::from_id(9999), None);
    }

    #[test]
    fn plain_ids_resolve_to_standard() {
        for id in [1, 2, 5, 30, 32, 49] {
            assert_eq!(MoveEffect::from_id(id), Some(MoveEffect::Standard), "effect {id}");
        }
    }

    #[test]
    fn semi_invulnerable_moves_carry_their_phase() {
        assert_eq!(
            MoveEffect::from_id(257),
            Some(MoveEffect::TwoTurnHide(StatusId::UNDERGROUND))
        );
        assert!(MoveEffect::from_id(321).is_some_and(MoveEffect::is_direct_damage));
    }
}
