use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
}

impl Type {
    pub const ALL: [Type; 18] = [
        Type::Normal,
        Type::Fighting,
        Type::Flying,
        Type::Poison,
        Type::Ground,
        Type::Rock,
        Type::Bug,
        Type::Ghost,
        Type::Steel,
        Type::Fire,
        Type::Water,
        Type::Grass,
        Type::Electric,
        Type::Psychic,
        Type::Ice,
        Type::Dragon,
        Type::Dark,
        Type::Fairy,
    ];

    /// Generation in which the type first appeared.
    pub fn introduced_in(self) -> u8 {
        match self {
            Type::Steel | Type::Dark => 2,
            Type::Fairy => 6,
            _ => 1,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Attack-type by defend-type effectiveness matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeChart {
    factors: [[f64; 18]; 18],
}

impl TypeChart {
    /// The standard chart as it stood in `generation`.
    ///
    /// Before generation 6 there is no Fairy type and Steel still resists
    /// Ghost and Dark.
    pub fn standard(generation: u8) -> Self {
        let mut factors = [[1.0; 18]; 18];
        for attacking in Type::ALL {
            for defending in Type::ALL {
                factors[attacking.index()][defending.index()] =
                    standard_effectiveness(attacking, defending);
            }
        }
        let mut chart = Self { factors };
        if generation < 6 {
            for other in Type::ALL {
                chart.set(Type::Fairy, other, 1.0);
                chart.set(other, Type::Fairy, 1.0);
            }
            chart.set(Type::Ghost, Type::Steel, 0.5);
            chart.set(Type::Dark, Type::Steel, 0.5);
        }
        chart
    }

    pub fn set(&mut self, attacking: Type, defending: Type, factor: f64) {
        self.factors[attacking.index()][defending.index()] = factor;
    }

    pub fn factor(&self, attacking: Type, defending: Type) -> f64 {
        self.factors[attacking.index()][defending.index()]
    }

    /// Effectiveness against a defender, multiplied across all of its types.
    pub fn efficacy(&self, attacking: Type, defender_types: &[Type]) -> f64 {
        defender_types
            .iter()
            .map(|defending| self.factor(attacking, *defending))
            .product()
    }
}

fn standard_effectiveness(attacking: Type, defending: Type) -> f64 {
    use Type::*;
    match attacking {
        Normal => match defending {
            Rock | Steel => 0.5,
            Ghost => 0.0,
            _ => 1.0,
        },
        Fire => match defending {
            Fire | Water | Rock | Dragon => 0.5,
            Grass | Ice | Bug | Steel => 2.0,
            _ => 1.0,
        },
        Water => match defending {
            Water | Grass | Dragon => 0.5,
            Fire | Ground | Rock => 2.0,
            _ => 1.0,
        },
        Electric => match defending {
            Electric | Grass | Dragon => 0.5,
            Water | Flying => 2.0,
            Ground => 0.0,
            _ => 1.0,
        },
        Grass => match defending {
            Fire | Grass | Poison | Flying | Bug | Dragon | Steel => 0.5,
            Water | Ground | Rock => 2.0,
            _ => 1.0,
        },
        Ice => match defending {
            Fire | Water | Ice | Steel => 0.5,
            Grass | Ground | Flying | Dragon => 2.0,
            _ => 1.0,
        },
        Fighting => match defending {
            Normal | Ice | Rock | Dark | Steel => 2.0,
            Poison | Flying | Psychic | Bug | Fairy => 0.5,
            Ghost => 0.0,
            _ => 1.0,
        },
        Poison => match defending {
            Grass | Fairy => 2.0,
            Poison | Ground | Rock | Ghost => 0.5,
            Steel => 0.0,
            _ => 1.0,
        },
        Ground => match defending {
            Fire | Electric | Poison | Rock | Steel => 2.0,
            Grass | Bug => 0.5,
            Flying => 0.0,
            _ => 1.0,
        },
        Flying => match defending {
            Grass | Fighting | Bug => 2.0,
            Electric | Rock | Steel => 0.5,
            _ => 1.0,
        },
        Psychic => match defending {
            Fighting | Poison => 2.0,
            Psychic | Steel => 0.5,
            Dark => 0.0,
            _ => 1.0,
        },
        Bug => match defending {
            Grass | Psychic | Dark => 2.0,
            Fire | Fighting | Poison | Flying | Ghost | Steel | Fairy => 0.5,
            _ => 1.0,
        },
        Rock => match defending {
            Fire | Ice | Flying | Bug => 2.0,
            Fighting | Ground | Steel => 0.5,
            _ => 1.0,
        },
        Ghost => match defending {
            Ghost | Psychic => 2.0,
            Dark => 0.5,
            Normal => 0.0,
            _ => 1.0,
        },
        Dragon => match defending {
            Dragon => 2.0,
            Steel => 0.5,
            Fairy => 0.0,
            _ => 1.0,
        },
        Dark => match defending {
            Psychic | Ghost => 2.0,
            Fighting | Dark | Fairy => 0.5,
            _ => 1.0,
        },
        Steel => match defending {
            Rock | Ice | Fairy => 2.0,
            Fire | Water | Electric | Steel => 0.5,
            _ => 1.0,
        },
        Fairy => match defending {
            Fighting | Dragon | Dark => 2.0,
            Fire | Poison | Steel => 0.5,
            _ => 1.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dual_type_effectiveness_multiplies() {
        let chart = TypeChart::standard(9);
        // Grass: 0.5 vs Fire, 2.0 vs Ground.
        assert_eq!(chart.efficacy(Type::Grass, &[Type::Fire, Type::Ground]), 1.0);
        assert_eq!(chart.efficacy(Type::Ice, &[Type::Grass, Type::Flying]), 4.0);
        assert_eq!(chart.efficacy(Type::Electric, &[Type::Water, Type::Ground]), 0.0);
    }

    #[test]
    fn every_pair_uses_known_factors() {
        let chart = TypeChart::standard(9);
        for attacking in Type::ALL {
            for defending in Type::ALL {
                let factor = chart.factor(attacking, defending);
                assert!([0.0, 0.5, 1.0, 2.0].contains(&factor));
            }
        }
    }

    #[test]
    fn early_generations_drop_fairy_and_keep_steel_resistances() {
        let gen4 = TypeChart::standard(4);
        assert_eq!(gen4.factor(Type::Dragon, Type::Fairy), 1.0);
        assert_eq!(gen4.factor(Type::Ghost, Type::Steel), 0.5);
        assert_eq!(gen4.factor(Type::Dark, Type::Steel), 0.5);

        let gen6 = TypeChart::standard(6);
        assert_eq!(gen6.factor(Type::Dragon, Type::Fairy), 0.0);
        assert_eq!(gen6.factor(Type::Ghost, Type::Steel), 1.0);
    }
}
