use crate::battle::combatant::Combatant;
use schema::{PokemonType, StatusCondition};

/// Notional level every combatant fights at.
pub const BATTLE_LEVEL: f64 = 50.0;

/// Product of the move type's effectiveness against each defending type.
///
/// Pairs missing from the table (including unrecognised type names) count as 1.0.
pub fn type_multiplier<S: AsRef<str>>(move_type: &str, defender_types: &[S]) -> f64 {
    defender_types
        .iter()
        .map(|defending| PokemonType::effectiveness_by_name(move_type, defending.as_ref()))
        .product()
}

/// Attack stat after the attacker's status is applied. Burn halves it, rounding down.
pub fn effective_attack(attacker: &Combatant, attacker_status: Option<StatusCondition>) -> u32 {
    let attack = attacker.base_stats.attack();
    match attacker_status {
        Some(StatusCondition::Burn) => attack / 2,
        _ => attack,
    }
}

/// Damage dealt by one use of the attacker's move against the defender.
///
/// `((2 * L / 5 + 2) * power * attack / defense / 50 + 2) * type_multiplier`
/// at level `L = 50`, floored, never less than 1. No critical hits and no
/// random spread.
pub fn calculate_damage(
    attacker: &Combatant,
    defender: &Combatant,
    attacker_status: Option<StatusCondition>,
) -> u32 {
    let power = f64::from(attacker.combat_move.effective_power());
    let attack = f64::from(effective_attack(attacker, attacker_status));
    let defense = f64::from(defender.base_stats.defense());
    let multiplier = type_multiplier(&attacker.combat_move.move_type, &defender.types);

    let level_factor = 2.0 * BATTLE_LEVEL / 5.0 + 2.0;
    let raw = ((level_factor * power * attack / defense) / 50.0 + 2.0) * multiplier;

    // `as` saturates, so absurd stats cannot wrap around.
    (raw.floor() as u32).max(1)
}
