use serde::{Deserialize, Serialize};
use std::fmt;

/// A persistent condition afflicting a combatant for the rest of a battle.
///
/// The absence of a condition is `Option::<StatusCondition>::None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCondition {
    Paralysis,
    Burn,
    Poison,
}

impl StatusCondition {
    /// Keyword searched for in a move's lower-cased effect text.
    pub fn effect_keyword(&self) -> &'static str {
        match self {
            StatusCondition::Paralysis => "paralyze",
            StatusCondition::Burn => "burn",
            StatusCondition::Poison => "poison",
        }
    }

    /// Adjective used in battle log lines ("pikachu is now paralyzed!").
    pub fn afflicted_adjective(&self) -> &'static str {
        match self {
            StatusCondition::Paralysis => "paralyzed",
            StatusCondition::Burn => "burned",
            StatusCondition::Poison => "poisoned",
        }
    }
}

impl fmt::Display for StatusCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            StatusCondition::Paralysis => "Paralysis",
            StatusCondition::Burn => "Burn",
            StatusCondition::Poison => "Poison",
        };
        write!(f, "{}", display_name)
    }
}
