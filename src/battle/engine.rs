use crate::battle::calculators::calculate_damage;
use crate::battle::combatant::Combatant;
use crate::battle::state::{
    ActionFailureReason, BattleEvent, BattleRng, BattleState, EventBus, GameState,
};
use crate::battle::status::{apply_status_tick, is_action_prevented, try_inflict_status};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_TURNS: u32 = 1000;

/// Knobs that sit outside the battle rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleOptions {
    /// Turns allowed before the battle is called a stalemate.
    pub max_turns: u32,
}

impl Default for BattleOptions {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum BattleOutcome {
    Victory { winner: String },
    Stalemate { turns: u32 },
}

/// Everything a caller learns from one simulated battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleReport {
    pub participants: [String; 2],
    /// Starting hp by name. A mirror match shares one entry.
    pub initial_hp: BTreeMap<String, u32>,
    pub events: Vec<BattleEvent>,
    pub battle_log: Vec<String>,
    pub outcome: BattleOutcome,
    pub turns: u32,
    /// Combatants as they stood when the battle ended.
    pub final_state: [Combatant; 2],
}

impl BattleReport {
    pub fn winner(&self) -> Option<&str> {
        match &self.outcome {
            BattleOutcome::Victory { winner } => Some(winner),
            BattleOutcome::Stalemate { .. } => None,
        }
    }
}

/// Speed order, fixed for the whole battle. Ties go to the first-listed combatant.
pub fn determine_action_order(battle_state: &BattleState) -> [usize; 2] {
    let [first, second] = &battle_state.combatants;
    if first.speed() >= second.speed() {
        [0, 1]
    } else {
        [1, 0]
    }
}

/// Mutable attacker and defender out of the pair.
fn attacker_and_defender(
    combatants: &mut [Combatant; 2],
    attacker_index: usize,
) -> (&mut Combatant, &mut Combatant) {
    let [first, second] = combatants;
    if attacker_index == 0 {
        (first, second)
    } else {
        (second, first)
    }
}

/// One attack action: the paralysis check, damage, then a status attempt on a
/// defender that has none.
pub fn execute_attack<R: BattleRng + ?Sized>(
    battle_state: &mut BattleState,
    attacker_index: usize,
    rng: &mut R,
    bus: &mut EventBus,
) {
    let (attacker, defender) = attacker_and_defender(&mut battle_state.combatants, attacker_index);

    if is_action_prevented(attacker.status, &mut *rng) {
        bus.push(BattleEvent::ActionFailed {
            pokemon: attacker.name.clone(),
            reason: ActionFailureReason::IsParalyzed,
        });
        return;
    }

    let damage = calculate_damage(attacker, defender, attacker.status);
    defender.take_damage(damage);
    bus.push(BattleEvent::MoveUsed {
        attacker: attacker.name.clone(),
        move_name: attacker.combat_move.name.clone(),
        defender: defender.name.clone(),
        damage,
        remaining_hp: defender.current_hp,
    });

    if defender.status.is_none() {
        if let Some(status) = try_inflict_status(&attacker.combat_move, &mut *rng) {
            defender.try_set_status(status);
            bus.push(BattleEvent::StatusApplied {
                target: defender.name.clone(),
                status,
            });
        }
    }
}

/// Burn or poison damage for the combatant that was just attacked.
pub fn execute_status_tick(battle_state: &mut BattleState, target_index: usize, bus: &mut EventBus) {
    let target = &mut battle_state.combatants[target_index];
    let (new_hp, damage) = apply_status_tick(target.status, target.current_hp);
    if damage == 0 {
        return;
    }
    target.current_hp = new_hp;
    if let Some(status) = target.status {
        bus.push(BattleEvent::StatusDamage {
            target: target.name.clone(),
            status,
            damage,
            remaining_hp: new_hp,
        });
    }
}

/// Ends the battle if the target is down. Returns true when it did.
fn check_fainted(battle_state: &mut BattleState, target_index: usize, bus: &mut EventBus) -> bool {
    let target = &battle_state.combatants[target_index];
    if !target.is_fainted() {
        return false;
    }
    bus.push(BattleEvent::PokemonFainted {
        pokemon: target.name.clone(),
    });
    battle_state.game_state = if target_index == 0 {
        GameState::Player2Win
    } else {
        GameState::Player1Win
    };
    true
}

/// One full turn: each combatant in `action_order` attacks, and the combatant
/// it hit takes its status tick. The turn stops as soon as someone faints.
pub fn resolve_turn<R: BattleRng + ?Sized>(
    battle_state: &mut BattleState,
    action_order: [usize; 2],
    rng: &mut R,
    bus: &mut EventBus,
) {
    battle_state.turn_number += 1;
    bus.push(BattleEvent::TurnStarted {
        turn_number: battle_state.turn_number,
    });

    for attacker_index in action_order {
        let defender_index = 1 - attacker_index;

        execute_attack(battle_state, attacker_index, &mut *rng, bus);
        if check_fainted(battle_state, defender_index, bus) {
            return;
        }

        execute_status_tick(battle_state, defender_index, bus);
        if check_fainted(battle_state, defender_index, bus) {
            return;
        }
    }

    debug!(
        turn = battle_state.turn_number,
        hp_first = battle_state.combatants[0].current_hp,
        hp_second = battle_state.combatants[1].current_hp,
        "turn resolved"
    );
}

/// Ends the battle before turn 1 if anyone enters it with no hp.
///
/// With both sides down nobody can win, so the battle is a stalemate at turn 0.
fn check_starting_faints(battle_state: &mut BattleState, bus: &mut EventBus) {
    let down = [
        battle_state.combatants[0].is_fainted(),
        battle_state.combatants[1].is_fainted(),
    ];
    match down {
        [true, true] => {
            for combatant in &battle_state.combatants {
                bus.push(BattleEvent::PokemonFainted {
                    pokemon: combatant.name.clone(),
                });
            }
            battle_state.game_state = GameState::Stalemate;
            bus.push(BattleEvent::Stalemate { turns: 0 });
        }
        [true, false] => {
            check_fainted(battle_state, 0, bus);
        }
        [false, true] => {
            check_fainted(battle_state, 1, bus);
        }
        [false, false] => {}
    }
}

/// Runs turns until a combatant faints or the turn cap is reached.
pub fn run_battle<R: BattleRng + ?Sized>(
    battle_state: &mut BattleState,
    rng: &mut R,
    options: &BattleOptions,
) -> EventBus {
    let mut bus = EventBus::new();
    let action_order = determine_action_order(battle_state);

    check_starting_faints(battle_state, &mut bus);
    while !battle_state.is_over() {
        if battle_state.turn_number >= options.max_turns {
            warn!(turns = battle_state.turn_number, "turn cap reached");
            battle_state.game_state = GameState::Stalemate;
            bus.push(BattleEvent::Stalemate {
                turns: battle_state.turn_number,
            });
            break;
        }
        resolve_turn(battle_state, action_order, &mut *rng, &mut bus);
    }

    if let Some(winner_index) = battle_state.winner_index() {
        bus.push(BattleEvent::BattleWon {
            winner: battle_state.combatants[winner_index].name.clone(),
        });
    }

    bus
}

/// Simulates a full battle between two combatants.
///
/// The combatants are consumed; their end-of-battle state comes back in the report.
#[tracing::instrument(skip_all, fields(first = %first.name, second = %second.name))]
pub fn simulate<R: BattleRng + ?Sized>(
    first: Combatant,
    second: Combatant,
    rng: &mut R,
    options: &BattleOptions,
) -> BattleReport {
    let participants = [first.name.clone(), second.name.clone()];
    let mut initial_hp = BTreeMap::new();
    initial_hp.insert(first.name.clone(), first.max_hp());
    initial_hp.insert(second.name.clone(), second.max_hp());

    let mut battle_state = BattleState::new(first, second);
    let bus = run_battle(&mut battle_state, &mut *rng, options);

    let outcome = match battle_state.winner_index() {
        Some(index) => BattleOutcome::Victory {
            winner: battle_state.combatants[index].name.clone(),
        },
        None => BattleOutcome::Stalemate {
            turns: battle_state.turn_number,
        },
    };
    info!(turns = battle_state.turn_number, outcome = ?outcome, "battle finished");

    BattleReport {
        participants,
        initial_hp,
        battle_log: bus.log_lines(),
        events: bus.into_events(),
        outcome,
        turns: battle_state.turn_number,
        final_state: battle_state.combatants,
    }
}
