//! Status infliction, per-turn status damage and the paralysis action check.

use crate::battle::combatant::CombatMove;
use crate::battle::state::BattleRng;
use schema::StatusCondition;

/// Percent chance that a matching move effect lands its status.
pub const STATUS_INFLICT_CHANCE: u8 = 20;
/// Percent chance that a paralyzed combatant loses its action.
pub const PARALYSIS_SKIP_CHANCE: u8 = 25;

/// Keyword checks in priority order. Only the first match is ever rolled.
const INFLICTION_PRIORITY: [StatusCondition; 3] = [
    StatusCondition::Paralysis,
    StatusCondition::Burn,
    StatusCondition::Poison,
];

/// The status a move's effect text could inflict, before any roll.
pub fn status_candidate(combat_move: &CombatMove) -> Option<StatusCondition> {
    let effect = combat_move.effect_text();
    INFLICTION_PRIORITY
        .into_iter()
        .find(|status| effect.contains(status.effect_keyword()))
}

/// Rolls for the status a move may inflict.
///
/// Consumes one outcome only when the effect text names a status. The caller
/// is responsible for skipping this when the target already has a status.
pub fn try_inflict_status<R: BattleRng + ?Sized>(
    combat_move: &CombatMove,
    rng: &mut R,
) -> Option<StatusCondition> {
    let candidate = status_candidate(combat_move)?;
    if rng.roll_percent(STATUS_INFLICT_CHANCE, "status infliction") {
        Some(candidate)
    } else {
        None
    }
}

/// Applies one status tick to `hp`, returning the new hp and the damage dealt.
///
/// Burn takes 1/16 and poison 1/8 of the current hp, at least 1. Paralysis
/// and no status deal nothing here.
pub fn apply_status_tick(status: Option<StatusCondition>, hp: i64) -> (i64, u32) {
    let damage = match status {
        Some(StatusCondition::Burn) => (hp / 16).max(1),
        Some(StatusCondition::Poison) => (hp / 8).max(1),
        Some(StatusCondition::Paralysis) | None => return (hp, 0),
    };
    // Ticks only run on combatants still standing, so damage fits in u32.
    (hp - damage, u32::try_from(damage).unwrap_or(u32::MAX))
}

/// Human-readable description of a tick, empty when nothing happened.
pub fn describe_status_tick(status: Option<StatusCondition>, damage: u32) -> String {
    match status {
        Some(status @ (StatusCondition::Burn | StatusCondition::Poison)) if damage > 0 => {
            format!("{} deals {} damage.", status, damage)
        }
        _ => String::new(),
    }
}

/// Whether a combatant with `status` loses its action this turn.
///
/// Rolls only for paralyzed combatants.
pub fn is_action_prevented<R: BattleRng + ?Sized>(
    status: Option<StatusCondition>,
    rng: &mut R,
) -> bool {
    match status {
        Some(StatusCondition::Paralysis) => rng.roll_percent(PARALYSIS_SKIP_CHANCE, "paralysis check"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::{SeededRng, TurnRng};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn move_with_effect(effect: Option<&str>) -> CombatMove {
        CombatMove::new("test-move", Some(40), "normal", effect)
    }

    #[rstest]
    #[case(Some("Has a 10% chance to paralyze the target."), Some(StatusCondition::Paralysis))]
    #[case(Some("Has a 10% chance to BURN the target."), Some(StatusCondition::Burn))]
    #[case(Some("Has a 30% chance to poison the target."), Some(StatusCondition::Poison))]
    #[case(Some("May paralyze, burn, or poison the target."), Some(StatusCondition::Paralysis))]
    #[case(Some("Might burn or poison the target."), Some(StatusCondition::Burn))]
    #[case(Some("Inflicts regular damage with no additional effect."), None)]
    #[case(None, None)]
    fn test_status_candidate_priority(
        #[case] effect: Option<&str>,
        #[case] expected: Option<StatusCondition>,
    ) {
        assert_eq!(status_candidate(&move_with_effect(effect)), expected);
    }

    #[test]
    fn test_infliction_succeeds_at_twenty_percent() {
        let ember = move_with_effect(Some("Has a 10% chance to burn the target."));
        let mut rng = TurnRng::new_for_test(vec![20, 21]);

        assert_eq!(try_inflict_status(&ember, &mut rng), Some(StatusCondition::Burn));
        assert_eq!(try_inflict_status(&ember, &mut rng), None);
    }

    #[test]
    fn test_no_keyword_consumes_no_outcome() {
        let tackle = move_with_effect(Some("Inflicts regular damage."));
        let mut rng = TurnRng::new_for_test(vec![]);

        assert_eq!(try_inflict_status(&tackle, &mut rng), None);
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn test_infliction_rate_is_roughly_one_in_five() {
        let sludge = move_with_effect(Some("Has a 30% chance to poison the target."));
        let mut rng = SeededRng::from_seed(42);
        let landed = (0..10_000)
            .filter(|_| try_inflict_status(&sludge, &mut rng).is_some())
            .count();
        assert!((1_700..=2_300).contains(&landed), "landed {} of 10000", landed);
    }

    #[rstest]
    #[case(Some(StatusCondition::Burn), 160, 150, 10)]
    #[case(Some(StatusCondition::Burn), 15, 14, 1)]
    #[case(Some(StatusCondition::Poison), 160, 140, 20)]
    #[case(Some(StatusCondition::Poison), 7, 6, 1)]
    #[case(Some(StatusCondition::Poison), 1, 0, 1)]
    #[case(Some(StatusCondition::Paralysis), 100, 100, 0)]
    #[case(None, 100, 100, 0)]
    fn test_status_tick(
        #[case] status: Option<StatusCondition>,
        #[case] hp: i64,
        #[case] expected_hp: i64,
        #[case] expected_damage: u32,
    ) {
        assert_eq!(apply_status_tick(status, hp), (expected_hp, expected_damage));
    }

    #[test]
    fn test_tick_descriptions() {
        assert_eq!(
            describe_status_tick(Some(StatusCondition::Burn), 3),
            "Burn deals 3 damage."
        );
        assert_eq!(
            describe_status_tick(Some(StatusCondition::Poison), 12),
            "Poison deals 12 damage."
        );
        assert!(describe_status_tick(Some(StatusCondition::Paralysis), 0).is_empty());
        assert!(describe_status_tick(None, 0).is_empty());
    }

    #[test]
    fn test_paralysis_check() {
        let mut rng = TurnRng::new_for_test(vec![25, 26]);
        assert!(is_action_prevented(Some(StatusCondition::Paralysis), &mut rng));
        assert!(!is_action_prevented(Some(StatusCondition::Paralysis), &mut rng));

        // Other statuses never roll.
        assert!(!is_action_prevented(Some(StatusCondition::Burn), &mut rng));
        assert!(!is_action_prevented(None, &mut rng));
        assert_eq!(rng.consumed(), 2);
    }
}
