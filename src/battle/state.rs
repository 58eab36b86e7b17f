use crate::battle::combatant::Combatant;
use crate::battle::status::describe_status_tick;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::StatusCondition;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy)]
pub enum GameState {
    InProgress,
    Player1Win,
    Player2Win,
    Stalemate,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ActionFailureReason {
    IsParalyzed,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    TurnStarted {
        turn_number: u32,
    },
    MoveUsed {
        attacker: String,
        move_name: String,
        defender: String,
        damage: u32,
        remaining_hp: i64,
    },
    ActionFailed {
        pokemon: String,
        reason: ActionFailureReason,
    },
    StatusApplied {
        target: String,
        status: StatusCondition,
    },
    StatusDamage {
        target: String,
        status: StatusCondition,
        damage: u32,
        remaining_hp: i64,
    },
    PokemonFainted {
        pokemon: String,
    },
    BattleWon {
        winner: String,
    },
    Stalemate {
        turns: u32,
    },
}

impl fmt::Display for BattleEvent {
    /// One battle-log line per event. HP values are floored at zero for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleEvent::TurnStarted { turn_number } => write!(f, "Turn {}:", turn_number),
            BattleEvent::MoveUsed {
                attacker,
                move_name,
                defender,
                damage,
                remaining_hp,
            } => write!(
                f,
                "{} uses {} and deals {} damage! ({} HP: {})",
                attacker,
                move_name,
                damage,
                defender,
                (*remaining_hp).max(0)
            ),
            BattleEvent::ActionFailed { pokemon, reason } => match reason {
                ActionFailureReason::IsParalyzed => {
                    write!(f, "{} is paralyzed and can't move!", pokemon)
                }
            },
            BattleEvent::StatusApplied { target, status } => {
                write!(f, "{} is now {}!", target, status.afflicted_adjective())
            }
            BattleEvent::StatusDamage {
                target,
                status,
                damage,
                remaining_hp,
            } => write!(
                f,
                "{}: {} (HP: {})",
                target,
                describe_status_tick(Some(*status), *damage),
                (*remaining_hp).max(0)
            ),
            BattleEvent::PokemonFainted { pokemon } => write!(f, "{} fainted!", pokemon),
            BattleEvent::BattleWon { winner } => write!(f, "Winner: {}!", winner),
            BattleEvent::Stalemate { turns } => write!(
                f,
                "No winner after {} turns. The battle ends in a stalemate.",
                turns
            ),
        }
    }
}

/// Event bus for collecting battle events in the order they happen.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        tracing::trace!(event = %event, "battle event");
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    /// Render every event as a battle-log line.
    pub fn log_lines(&self) -> Vec<String> {
        self.events.iter().map(|event| event.to_string()).collect()
    }

    /// Print all events in debug format with a custom prefix message.
    pub fn print_debug_with_message(&self, message: &str) {
        println!("{}", message);
        for event in &self.events {
            println!("  {:?}", event);
        }
    }

    /// Return true if the event bus contains no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the number of events in the bus.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl fmt::Display for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "{}", event)?;
        }
        Ok(())
    }
}

/// Source of every random decision a battle makes.
///
/// Outcomes are uniform in `1..=100`; a check with probability `p` percent
/// succeeds when the outcome is `<= p`.
pub trait BattleRng {
    fn next_outcome(&mut self, reason: &str) -> u8;

    fn roll_percent(&mut self, chance: u8, reason: &str) -> bool {
        self.next_outcome(reason) <= chance
    }
}

/// Scripted outcomes, consumed in order. Used by tests and replays.
#[derive(Debug, Clone)]
pub struct TurnRng {
    outcomes: Vec<u8>,
    index: usize,
}

impl TurnRng {
    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        Self { outcomes, index: 0 }
    }

    pub fn consumed(&self) -> usize {
        self.index
    }
}

impl BattleRng for TurnRng {
    fn next_outcome(&mut self, reason: &str) -> u8 {
        if self.index >= self.outcomes.len() {
            panic!(
                "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                reason
            );
        }
        let outcome = self.outcomes[self.index];

        #[cfg(test)]
        println!("[RNG] Consumed {} for: {}", outcome, reason);

        self.index += 1;
        outcome
    }
}

/// Pseudo-random outcomes from a seedable generator.
#[derive(Debug, Clone)]
pub struct SeededRng {
    rng: StdRng,
}

impl SeededRng {
    /// Same seed, same battle.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn new_random() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl BattleRng for SeededRng {
    fn next_outcome(&mut self, reason: &str) -> u8 {
        let outcome = self.rng.random_range(1..=100);
        tracing::debug!(outcome, reason, "rng roll");
        outcome
    }
}

impl<R: BattleRng + ?Sized> BattleRng for &mut R {
    fn next_outcome(&mut self, reason: &str) -> u8 {
        (**self).next_outcome(reason)
    }
}

/// The two combatants of one battle and its progress.
///
/// Index 0 is the first-listed combatant.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattleState {
    pub combatants: [Combatant; 2],
    pub turn_number: u32,
    pub game_state: GameState,
}

impl BattleState {
    pub fn new(first: Combatant, second: Combatant) -> Self {
        Self {
            combatants: [first, second],
            turn_number: 0,
            game_state: GameState::InProgress,
        }
    }

    pub fn is_over(&self) -> bool {
        self.game_state != GameState::InProgress
    }

    pub fn winner_index(&self) -> Option<usize> {
        match self.game_state {
            GameState::Player1Win => Some(0),
            GameState::Player2Win => Some(1),
            GameState::InProgress | GameState::Stalemate => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_event_lines() {
        let hit = BattleEvent::MoveUsed {
            attacker: "pikachu".to_string(),
            move_name: "thunder-shock".to_string(),
            defender: "squirtle".to_string(),
            damage: 30,
            remaining_hp: -4,
        };
        assert_eq!(
            hit.to_string(),
            "pikachu uses thunder-shock and deals 30 damage! (squirtle HP: 0)"
        );

        let tick = BattleEvent::StatusDamage {
            target: "squirtle".to_string(),
            status: StatusCondition::Burn,
            damage: 2,
            remaining_hp: 38,
        };
        assert_eq!(tick.to_string(), "squirtle: Burn deals 2 damage. (HP: 38)");

        let applied = BattleEvent::StatusApplied {
            target: "squirtle".to_string(),
            status: StatusCondition::Paralysis,
        };
        assert_eq!(applied.to_string(), "squirtle is now paralyzed!");
        assert_eq!(
            BattleEvent::BattleWon { winner: "pikachu".to_string() }.to_string(),
            "Winner: pikachu!"
        );
    }

    #[test]
    fn test_roll_percent_threshold() {
        let mut rng = TurnRng::new_for_test(vec![20, 21, 1, 100]);
        assert!(rng.roll_percent(20, "at threshold"));
        assert!(!rng.roll_percent(20, "above threshold"));
        assert!(rng.roll_percent(25, "lowest outcome"));
        assert!(!rng.roll_percent(25, "highest outcome"));
        assert_eq!(rng.consumed(), 4);
    }

    #[test]
    #[should_panic(expected = "TurnRng exhausted")]
    fn test_turn_rng_exhaustion_panics() {
        let mut rng = TurnRng::new_for_test(vec![]);
        rng.next_outcome("nothing scripted");
    }

    #[test]
    fn test_seeded_rng_is_reproducible_and_in_range() {
        let mut a = SeededRng::from_seed(7);
        let mut b = SeededRng::from_seed(7);
        for _ in 0..200 {
            let outcome = a.next_outcome("test");
            assert_eq!(outcome, b.next_outcome("test"));
            assert!((1..=100).contains(&outcome));
        }
    }
}
