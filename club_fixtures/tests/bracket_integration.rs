//! Integration tests for knockout brackets
//!
//! These tests verify seeding, BYE handling and result-driven advancement
//! through to a champion.

#[cfg(test)]
mod bracket_tests {
    use club_fixtures::bracket::{Advancement, BracketEngine, BracketError};
    use club_fixtures::fixtures::{Entrant, Participant};

    fn seeded(n: u32) -> Vec<Participant> {
        (1..=n)
            .map(|s| Participant::new(format!("s{s}"), format!("Seed {s}"), "club").with_seed(s))
            .collect()
    }

    /// Play every ready match, higher seed (lower number) winning
    fn play_out_by_seed(bracket: &mut club_fixtures::Bracket) -> Option<Participant> {
        loop {
            let ready = bracket.ready_contests();
            if ready.is_empty() {
                return bracket.champion().cloned();
            }
            for contest in ready {
                let home = contest.home.participant().unwrap();
                let away = contest.away.participant().unwrap();
                let winner = if home.seed < away.seed { home } else { away };
                bracket.report_result(&contest.id, &winner.id).unwrap();
            }
        }
    }

    #[test]
    fn test_top_two_seeds_only_meet_in_final() {
        let mut bracket = BracketEngine::new().build_bracket(&seeded(8)).unwrap();
        assert_eq!(bracket.round_count, 3);

        // Top seeds keep winning until the final
        for round in 1..bracket.round_count {
            for contest in bracket.ready_contests() {
                assert!(!(contest.involves("s1") && contest.involves("s2")));
                assert_eq!(contest.round, round);
                let home = contest.home.participant().unwrap();
                let away = contest.away.participant().unwrap();
                let winner = if home.seed < away.seed { home } else { away };
                bracket.report_result(&contest.id, &winner.id).unwrap();
            }
        }

        let final_match = bracket.ready_contests();
        assert_eq!(final_match.len(), 1);
        assert!(final_match[0].involves("s1"));
        assert!(final_match[0].involves("s2"));
    }

    #[test]
    fn test_leaf_result_fills_parent_slot_by_parity() {
        let mut bracket = BracketEngine::new().build_bracket(&seeded(8)).unwrap();

        // ko-1-1 is a left child, ko-1-2 a right child of ko-2-1
        let left = bracket.report_result("ko-1-1", "s8").unwrap();
        assert_eq!(
            left,
            Advancement::Advanced {
                next_match: "ko-2-1".to_string(),
                slot: 0
            }
        );
        let right = bracket.report_result("ko-1-2", "s4").unwrap();
        assert_eq!(
            right,
            Advancement::Advanced {
                next_match: "ko-2-1".to_string(),
                slot: 1
            }
        );

        let semi = bracket.node("ko-2-1").unwrap();
        assert_eq!(semi.slots[0].as_ref().and_then(Entrant::id), Some("s8"));
        assert_eq!(semi.slots[1].as_ref().and_then(Entrant::id), Some("s4"));
        assert!(semi.is_playable());
    }

    #[test]
    fn test_odd_field_runs_to_champion() {
        let mut bracket = BracketEngine::new().build_bracket(&seeded(5)).unwrap();
        assert_eq!(bracket.size, 8);

        // Three BYEs: seeds 1, 2 and 3 skip the first round
        let first_round_ready = bracket
            .ready_contests()
            .into_iter()
            .filter(|c| c.round == 1)
            .count();
        assert_eq!(first_round_ready, 1);

        let champion = play_out_by_seed(&mut bracket).unwrap();
        assert_eq!(champion.id, "s1");
        assert!(bracket.is_complete());
    }

    #[test]
    fn test_two_player_final_only() {
        let mut bracket = BracketEngine::new().build_bracket(&seeded(2)).unwrap();
        assert_eq!(bracket.nodes.len(), 1);

        let result = bracket.report_result("ko-1-1", "s2").unwrap();
        assert!(matches!(result, Advancement::Champion(ref p) if p.id == "s2"));
        assert_eq!(
            bracket.report_result("ko-1-1", "s1"),
            Err(BracketError::AlreadyDecided("ko-1-1".to_string()))
        );
    }

    #[test]
    fn test_misuse_errors() {
        let mut bracket = BracketEngine::new().build_bracket(&seeded(4)).unwrap();
        assert!(matches!(
            bracket.report_result("missing", "s1"),
            Err(BracketError::UnknownMatch(_))
        ));
        assert!(matches!(
            bracket.report_result("ko-1-1", "s3"),
            Err(BracketError::InvalidWinner { .. })
        ));
        assert!(BracketEngine::new().build_bracket(&[]).is_err());
    }
}
