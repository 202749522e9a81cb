use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nature {
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

impl Default for Nature {
    fn default() -> Self {
        Nature::Hardy
    }
}

/// The six permanent stats, in catalog order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stat {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

/// Stats that carry an in-battle stage. HP never does.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BattleStat {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl BattleStat {
    pub const ALL: [BattleStat; 7] = [
        BattleStat::Attack,
        BattleStat::Defense,
        BattleStat::SpecialAttack,
        BattleStat::SpecialDefense,
        BattleStat::Speed,
        BattleStat::Accuracy,
        BattleStat::Evasion,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Accuracy and evasion are not counted as stat raises.
    pub fn is_core(self) -> bool {
        !matches!(self, BattleStat::Accuracy | BattleStat::Evasion)
    }
}

pub fn stat_modifier(nature: Nature, stat: Stat) -> f32 {
    use Stat::*;
    match nature {
        Nature::Hardy | Nature::Docile | Nature::Serious | Nature::Bashful | Nature::Quirky => 1.0,
        Nature::Lonely => bonus(stat, Attack, Defense),
        Nature::Brave => bonus(stat, Attack, Speed),
        Nature::Adamant => bonus(stat, Attack, SpecialAttack),
        Nature::Naughty => bonus(stat, Attack, SpecialDefense),
        Nature::Bold => bonus(stat, Defense, Attack),
        Nature::Relaxed => bonus(stat, Defense, Speed),
        Nature::Impish => bonus(stat, Defense, SpecialAttack),
        Nature::Lax => bonus(stat, Defense, SpecialDefense),
        Nature::Timid => bonus(stat, Speed, Attack),
        Nature::Hasty => bonus(stat, Speed, Defense),
        Nature::Jolly => bonus(stat, Speed, SpecialAttack),
        Nature::Naive => bonus(stat, Speed, SpecialDefense),
        Nature::Modest => bonus(stat, SpecialAttack, Attack),
        Nature::Mild => bonus(stat, SpecialAttack, Defense),
        Nature::Quiet => bonus(stat, SpecialAttack, Speed),
        Nature::Rash => bonus(stat, SpecialAttack, SpecialDefense),
        Nature::Calm => bonus(stat, SpecialDefense, Attack),
        Nature::Gentle => bonus(stat, SpecialDefense, Defense),
        Nature::Sassy => bonus(stat, SpecialDefense, Speed),
        Nature::Careful => bonus(stat, SpecialDefense, SpecialAttack),
    }
}

fn bonus(stat: Stat, boosted: Stat, lowered: Stat) -> f32 {
    if stat == boosted {
        1.1
    } else if stat == lowered {
        0.9
    } else {
        1.0
    }
}

fn scaled_base(base: u16, iv: u8, ev: u16, level: u8) -> u32 {
    let base_value = base as u32 * 2 + iv as u32 + (ev / 4) as u32;
    base_value * level as u32 / 100
}

pub fn calc_hp(base: u16, iv: u8, ev: u16, level: u8) -> u16 {
    (scaled_base(base, iv, ev, level) + level as u32 + 10) as u16
}

pub fn calc_stat(base: u16, iv: u8, ev: u16, level: u8, nature_mod: f32) -> u16 {
    let stat = (scaled_base(base, iv, ev, level) + 5) as f32 * nature_mod;
    stat.floor() as u16
}

/// Multiplier for a stage in -6..=6: 2/8 .. 2/3, 1, 3/2 .. 8/2.
pub fn stage_multiplier(stage: i8) -> f64 {
    let stage = stage.clamp(-6, 6) as f64;
    if stage >= 0.0 {
        (2.0 + stage) / 2.0
    } else {
        2.0 / (2.0 - stage)
    }
}

/// Species base stats as stored in the catalog.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub speed: u16,
}

impl BaseStats {
    pub fn get(&self, stat: Stat) -> u16 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::SpecialAttack => self.special_attack,
            Stat::SpecialDefense => self.special_defense,
            Stat::Speed => self.speed,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct StatsSet {
    pub hp: u16,
    pub atk: u16,
    pub def: u16,
    pub spa: u16,
    pub spd: u16,
    pub spe: u16,
}

impl StatsSet {
    /// Computed stats for a combatant. `ivs` and `evs` are in HP, Atk, Def,
    /// SpA, SpD, Spe order.
    pub fn compute(base: &BaseStats, level: u8, ivs: [u8; 6], evs: [u16; 6], nature: Nature) -> Self {
        let other = |idx: usize, stat: Stat| {
            calc_stat(base.get(stat), ivs[idx], evs[idx], level, stat_modifier(nature, stat))
        };
        Self {
            hp: calc_hp(base.hp, ivs[0], evs[0], level),
            atk: other(1, Stat::Attack),
            def: other(2, Stat::Defense),
            spa: other(3, Stat::SpecialAttack),
            spd: other(4, Stat::SpecialDefense),
            spe: other(5, Stat::Speed),
        }
    }

    /// Value for a staged stat. Accuracy and evasion have no computed value.
    pub fn staged(&self, stat: BattleStat) -> Option<u16> {
        match stat {
            BattleStat::Attack => Some(self.atk),
            BattleStat::Defense => Some(self.def),
            BattleStat::SpecialAttack => Some(self.spa),
            BattleStat::SpecialDefense => Some(self.spd),
            BattleStat::Speed => Some(self.spe),
            BattleStat::Accuracy | BattleStat::Evasion => None,
        }
    }
}
