use crate::battle::combatant::{BaseStats, CombatMove, Combatant};
use crate::battle::state::{BattleEvent, BattleState, TurnRng};
use schema::StatusCondition;

/// A builder for creating test combatants with neutral defaults:
/// 100 hp, 50 in every other stat, a single `normal` type and a 50-power
/// `normal` move with no effect text.
///
/// # Example
/// ```ignore
/// let pikachu = TestCombatantBuilder::new("pikachu")
///     .with_speed(90)
///     .with_move("thunder-shock", Some(40), "electric", Some("May paralyze the target."))
///     .with_status(StatusCondition::Burn)
///     .build();
/// ```
pub struct TestCombatantBuilder {
    name: String,
    stats: BaseStats,
    types: Vec<String>,
    combat_move: CombatMove,
    status: Option<StatusCondition>,
}

impl TestCombatantBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            stats: BaseStats::new()
                .with("hp", 100)
                .with("attack", 50)
                .with("defense", 50)
                .with("speed", 50),
            types: vec!["normal".to_string()],
            combat_move: CombatMove::new("tackle", Some(50), "normal", None),
            status: None,
        }
    }

    pub fn with_hp(mut self, hp: u32) -> Self {
        self.stats = self.stats.with("hp", hp);
        self
    }

    pub fn with_attack(mut self, attack: u32) -> Self {
        self.stats = self.stats.with("attack", attack);
        self
    }

    pub fn with_defense(mut self, defense: u32) -> Self {
        self.stats = self.stats.with("defense", defense);
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.stats = self.stats.with("speed", speed);
        self
    }

    pub fn with_types(mut self, types: &[&str]) -> Self {
        self.types = types.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_move(mut self, name: &str, power: Option<u32>, move_type: &str, effect: Option<&str>) -> Self {
        self.combat_move = CombatMove::new(name, power, move_type, effect);
        self
    }

    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    pub fn build(self) -> Combatant {
        let mut combatant = Combatant::new(&self.name, self.stats, self.types, self.combat_move);
        combatant.status = self.status;
        combatant
    }
}

/// Creates a battle state with `first` as the first-listed combatant.
pub fn create_test_battle(first: Combatant, second: Combatant) -> BattleState {
    BattleState::new(first, second)
}

/// Creates a `TurnRng` instance with a long list of default values (50).
/// 50 never lands a status and never triggers a paralysis skip.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 1000])
}

/// Names of the attackers in `MoveUsed` events, in order.
pub fn attackers_in_order(events: &[BattleEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            BattleEvent::MoveUsed { attacker, .. } => Some(attacker.clone()),
            _ => None,
        })
        .collect()
}

/// Damage values of the `MoveUsed` events dealt by `attacker_name`.
pub fn damage_dealt_by(events: &[BattleEvent], attacker_name: &str) -> Vec<u32> {
    events
        .iter()
        .filter_map(|event| match event {
            BattleEvent::MoveUsed { attacker, damage, .. } if attacker == attacker_name => Some(*damage),
            _ => None,
        })
        .collect()
}
