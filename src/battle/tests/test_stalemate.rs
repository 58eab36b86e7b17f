// In: src/battle/tests/test_stalemate.rs

#[cfg(test)]
mod tests {
    use crate::battle::engine::{simulate, BattleOptions, BattleOutcome};
    use crate::battle::state::{BattleEvent, SeededRng};
    use crate::battle::tests::common::{predictable_rng, TestCombatantBuilder};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_turn_cap_declares_stalemate() {
        // Arrange
        // 5 attack into 255 defense: 22 * 50 * 5 / 255 / 50 + 2 = 2.43 -> 2 damage a hit.
        let wall = |name: &str| {
            TestCombatantBuilder::new(name)
                .with_hp(60_000)
                .with_attack(5)
                .with_defense(255)
                .build()
        };
        let options = BattleOptions { max_turns: 25 };

        // Act
        let report = simulate(wall("shuckle"), wall("blissey"), &mut predictable_rng(), &options);

        // Assert
        assert_eq!(report.outcome, BattleOutcome::Stalemate { turns: 25 });
        assert_eq!(report.winner(), None);
        assert_eq!(report.turns, 25);
        assert!(matches!(report.events.last(), Some(BattleEvent::Stalemate { turns: 25 })));
        assert_eq!(
            report.battle_log.last().map(String::as_str),
            Some("No winner after 25 turns. The battle ends in a stalemate.")
        );
        assert_eq!(report.final_state[0].current_hp, 60_000 - 25 * 2);
    }

    #[test]
    fn test_cap_does_not_cut_short_a_decided_battle() {
        let options = BattleOptions { max_turns: 5 };
        let report = simulate(
            TestCombatantBuilder::new("eevee").build(),
            TestCombatantBuilder::new("meowth").build(),
            &mut predictable_rng(),
            &options,
        );
        // Five hits of 24 settle it on exactly the last allowed turn.
        assert_eq!(report.winner(), Some("eevee"));
        assert_eq!(report.turns, 5);
    }

    #[rstest]
    #[case("zero power moves", Some(0), 100)]
    #[case("absent power moves", None, 100)]
    #[case("one power moves", Some(1), 255)]
    fn test_weak_moves_still_terminate(
        #[case] desc: &str,
        #[case] power: Option<u32>,
        #[case] hp: u32,
    ) {
        // Arrange
        let weak = |name: &str| {
            TestCombatantBuilder::new(name)
                .with_hp(hp)
                .with_move("weak-move", power, "normal", None)
                .build()
        };

        // Act
        let report = simulate(weak("left"), weak("right"), &mut predictable_rng(), &BattleOptions::default());

        // Assert
        assert!(
            matches!(report.outcome, BattleOutcome::Victory { .. }),
            "{} should end with a winner",
            desc
        );
        assert!(report.turns < BattleOptions::default().max_turns);
    }

    #[test]
    fn test_minimum_damage_battle_terminates() {
        // Ghost is immune to normal, so every hit is clamped to 1.
        let ghost = |name: &str| {
            TestCombatantBuilder::new(name)
                .with_hp(300)
                .with_types(&["ghost"])
                .build()
        };
        let report = simulate(ghost("gastly"), ghost("haunter"), &mut predictable_rng(), &BattleOptions::default());

        assert_eq!(report.winner(), Some("gastly"));
        assert_eq!(report.turns, 300);
    }

    #[test]
    fn test_seeded_battles_replay_identically() {
        let build = || {
            (
                TestCombatantBuilder::new("arbok")
                    .with_hp(180)
                    .with_move("poison-sting", Some(15), "poison", Some("Has a 30% chance to poison the target."))
                    .build(),
                TestCombatantBuilder::new("raichu")
                    .with_hp(180)
                    .with_move("thunder-shock", Some(40), "electric", Some("Has a 10% chance to paralyze the target."))
                    .build(),
            )
        };

        let (a1, b1) = build();
        let (a2, b2) = build();
        let first = simulate(a1, b1, &mut SeededRng::from_seed(31337), &BattleOptions::default());
        let second = simulate(a2, b2, &mut SeededRng::from_seed(31337), &BattleOptions::default());

        assert_eq!(first.battle_log, second.battle_log);
        assert_eq!(first.outcome, second.outcome);
    }
}
