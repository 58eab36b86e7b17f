use schema::StatusCondition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_HP: u32 = 100;
pub const DEFAULT_ATTACK: u32 = 50;
pub const DEFAULT_DEFENSE: u32 = 50;
pub const DEFAULT_SPEED: u32 = 50;
pub const DEFAULT_MOVE_POWER: u32 = 50;

/// Base stats keyed by the remote source's stat names (`hp`, `attack`,
/// `special-attack`, ...). Missing stats fall back to defaults when read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaseStats(BTreeMap<String, u32>);

impl BaseStats {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, stat: &str, value: u32) -> Self {
        self.0.insert(stat.to_string(), value);
        self
    }

    pub fn get(&self, stat: &str) -> Option<u32> {
        self.0.get(stat).copied()
    }

    pub fn hp(&self) -> u32 {
        self.get("hp").unwrap_or(DEFAULT_HP)
    }

    pub fn attack(&self) -> u32 {
        self.get("attack").unwrap_or(DEFAULT_ATTACK)
    }

    /// Defense is never zero so the damage formula cannot divide by it.
    pub fn defense(&self) -> u32 {
        self.get("defense").unwrap_or(DEFAULT_DEFENSE).max(1)
    }

    pub fn speed(&self) -> u32 {
        self.get("speed").unwrap_or(DEFAULT_SPEED)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl FromIterator<(String, u32)> for BaseStats {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The single move a combatant uses for the whole battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatMove {
    pub name: String,
    pub power: Option<u32>,
    #[serde(rename = "type")]
    pub move_type: String,
    pub effect: Option<String>,
}

impl CombatMove {
    pub fn new(name: &str, power: Option<u32>, move_type: &str, effect: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            power,
            move_type: move_type.to_string(),
            effect: effect.map(str::to_string),
        }
    }

    /// Absent or zero power is treated as the default power.
    pub fn effective_power(&self) -> u32 {
        match self.power {
            Some(power) if power > 0 => power,
            _ => DEFAULT_MOVE_POWER,
        }
    }

    /// Lower-cased effect text, empty when the move has none.
    pub fn effect_text(&self) -> String {
        self.effect.as_deref().unwrap_or_default().to_lowercase()
    }
}

/// A creature prepared for battle.
///
/// Only `current_hp` and `status` change once a battle starts; `current_hp`
/// may dip below zero on the hit that knocks the combatant out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub base_stats: BaseStats,
    pub types: Vec<String>,
    #[serde(rename = "move")]
    pub combat_move: CombatMove,
    pub current_hp: i64,
    pub status: Option<StatusCondition>,
}

impl Combatant {
    pub fn new(name: &str, base_stats: BaseStats, types: Vec<String>, combat_move: CombatMove) -> Self {
        let current_hp = i64::from(base_stats.hp());
        Self {
            name: name.to_string(),
            base_stats,
            types,
            combat_move,
            current_hp,
            status: None,
        }
    }

    pub fn max_hp(&self) -> u32 {
        self.base_stats.hp()
    }

    pub fn speed(&self) -> u32 {
        self.base_stats.speed()
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp <= 0
    }

    /// HP as shown in the battle log, floored at zero.
    pub fn display_hp(&self) -> i64 {
        self.current_hp.max(0)
    }

    pub fn take_damage(&mut self, damage: u32) -> bool {
        self.current_hp -= i64::from(damage);
        self.is_fainted()
    }

    /// Sets a status unless one is already present. Returns whether it was applied.
    pub fn try_set_status(&mut self, status: StatusCondition) -> bool {
        if self.status.is_some() {
            return false;
        }
        self.status = Some(status);
        true
    }
}

impl fmt::Display for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] HP: {}/{}",
            self.name,
            self.types.join("/"),
            self.display_hp(),
            self.max_hp()
        )?;
        if let Some(status) = self.status {
            write!(f, " ({})", status)?;
        }
        write!(
            f,
            " using {} ({}, power {})",
            self.combat_move.name,
            self.combat_move.move_type,
            self.combat_move.effective_power()
        )
    }
}
