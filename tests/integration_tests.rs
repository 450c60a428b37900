//! Whole-game tests driven through the public engine and host APIs

mod common;

use std::collections::HashSet;

use common::{cup, play_random};
use cup_stack::core::{Board, IdSource, SimpleRng};
use cup_stack::engine::{Game, GameSnapshot, Phase, Selection, TurnError, TurnOutcome};
use cup_stack::host::{Host, Reply, Request};
use cup_stack::types::{GameEvent, LANE_COUNT, MAX_HEIGHT};

#[test]
fn opening_drops_land_in_two_lanes() {
    for seed in [1, 7, 12345, u32::MAX] {
        let (game, opening) = Game::new(seed).unwrap();
        let lanes: Vec<_> = opening
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Drop { lane, size, .. } => {
                    assert_eq!(*size, 1);
                    Some(*lane)
                }
                _ => None,
            })
            .collect();
        assert_eq!(lanes.len(), 2, "seed {}", seed);
        assert_ne!(lanes[0], lanes[1]);
        assert_ne!(Some(lanes[1]), opening.next_drop_lane);
        assert_eq!(game.board().cup_count(), 2);
    }
}

#[test]
fn seed_zero_plays_like_seed_one() {
    let (a, ra) = Game::new(0).unwrap();
    let (b, rb) = Game::new(1).unwrap();
    assert_eq!(a.board(), b.board());
    assert_eq!(ra.events, rb.events);
}

#[test]
fn replaying_a_seed_replays_the_game() {
    let record = |seed| {
        let mut reports = Vec::new();
        play_random(seed, 80, |_, report| reports.push(report.clone()));
        reports
    };
    assert_eq!(record(2024), record(2024));
    assert_ne!(record(2024), record(2025));
}

#[test]
fn random_play_keeps_board_invariants() {
    for seed in 1..=60u32 {
        let mut last_drop_lane = None;
        let mut last_turn = 0;
        play_random(seed, 120, |game, report| {
            let board = game.board();
            board.validate().unwrap();

            match report.outcome {
                TurnOutcome::Continue => {
                    assert!(board.overflowed_lane().is_none(), "seed {}\n{}", seed, board);
                    let next = report.next_drop_lane.unwrap();
                    assert!(next < LANE_COUNT);
                    assert_ne!(Some(next), last_drop_lane, "seed {}", seed);
                    last_drop_lane = Some(next);
                    assert_eq!(game.phase(), Phase::Animating);
                }
                TurnOutcome::Won => assert_eq!(game.phase(), Phase::Won),
                TurnOutcome::Lost => {
                    assert_eq!(game.phase(), Phase::Lost);
                    assert!(report.events.last().is_some_and(|e| e.is_game_over()));
                }
                TurnOutcome::Rejected => panic!("random play only picks legal moves"),
            }

            assert!(report.turn >= last_turn);
            last_turn = report.turn;
        });
    }
}

#[test]
fn cup_ids_are_never_reissued() {
    for seed in [3u32, 99, 4242] {
        let mut seen = HashSet::new();
        let mut retired = HashSet::new();
        play_random(seed, 100, |_, report| {
            for event in &report.events {
                match event {
                    GameEvent::Drop { cup, .. } => {
                        assert!(seen.insert(*cup), "drop reused {}", cup);
                    }
                    GameEvent::Merge { cup, consumed, .. } => {
                        assert!(seen.insert(*cup), "merge reused {}", cup);
                        for old in consumed {
                            assert!(retired.insert(*old), "{} consumed twice", old);
                        }
                    }
                    _ => {}
                }
            }
        });
    }
}

#[test]
fn ids_stay_below_scratch_range() {
    play_random(77, 150, |game, _| {
        if let Some(max) = game.board().max_id() {
            assert!(!IdSource::is_scratch_id(max));
        }
    });
}

#[test]
fn click_flow_through_a_turn() {
    let board = Board::with_lanes([
        vec![cup(1, 4, false)],
        vec![cup(2, 3, false)],
        vec![],
        vec![],
    ])
    .unwrap();
    let mut game = Game::restore(GameSnapshot {
        ids: IdSource::after(board.max_id()),
        board,
        rng: SimpleRng::new(31),
        seed: 31,
        next_drop_lane: 3,
        phase: Phase::SelectSource,
        turn: 0,
    })
    .unwrap();

    assert_eq!(game.select(2).unwrap(), Selection::EmptySource(2));
    assert_eq!(game.select(1).unwrap(), Selection::Source(1));

    let Selection::Turn(report) = game.select(0).unwrap() else {
        panic!("destination pick should resolve the turn");
    };
    let kinds: Vec<_> = report.events.iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec!["move", "link", "drop"]);
    assert_eq!(report.turn, 1);
    assert_eq!(game.board().moving_group_len(0), 2);

    assert_eq!(game.select(0), Err(TurnError::Busy));
    game.finish_animation().unwrap();
    assert_eq!(game.phase(), Phase::SelectSource);
}

#[test]
fn building_the_chain_wins() {
    // 5-4-3 chain in lane 0, a 2 waiting in lane 1, and the drop headed for lane 2.
    let board = Board::with_lanes([
        vec![cup(1, 5, false), cup(2, 4, true), cup(3, 3, true)],
        vec![cup(4, 2, false)],
        vec![],
        vec![cup(5, 1, false)],
    ])
    .unwrap();
    let mut game = Game::restore(GameSnapshot {
        ids: IdSource::after(board.max_id()),
        board,
        rng: SimpleRng::new(8),
        seed: 8,
        next_drop_lane: 2,
        phase: Phase::SelectSource,
        turn: 5,
    })
    .unwrap();

    let first = game.play_move(1, 0).unwrap();
    assert_eq!(first.outcome, TurnOutcome::Continue);
    game.finish_animation().unwrap();

    // The first drop went to lane 2, so lane 3 still holds its lone 1.
    let second = game.play_move(3, 0).unwrap();
    assert_eq!(second.outcome, TurnOutcome::Won);
    assert_eq!(game.phase(), Phase::Won);
    assert!(second.message.contains("Lane 1"));
    assert!(game.legal_moves().is_empty());
}

#[test]
fn moving_past_max_height_loses_immediately() {
    let tall: Vec<_> = (1..=MAX_HEIGHT as u32).map(|i| cup(i, 5, false)).collect();
    let board = Board::with_lanes([tall, vec![cup(10, 4, false)], vec![], vec![]]).unwrap();
    let mut game = Game::restore(GameSnapshot {
        ids: IdSource::after(board.max_id()),
        board,
        rng: SimpleRng::new(2),
        seed: 2,
        next_drop_lane: 2,
        phase: Phase::SelectSource,
        turn: 1,
    })
    .unwrap();

    let report = game.play_move(1, 0).unwrap();
    assert_eq!(report.outcome, TurnOutcome::Lost);
    assert!(report.events.last().unwrap().is_game_over());
    // The drop never happened.
    assert!(!report.events.iter().any(|e| e.kind() == "drop"));
    assert_eq!(game.board().height(2), 0);
}

#[test]
fn host_session_round_trip() {
    let (mut host, opening) = Host::new(5150).unwrap();
    let Reply::Turn(opening) = opening else {
        panic!("opening should be a turn");
    };
    assert_eq!(opening.turn, 0);

    let saved = match host.handle(Request::Snapshot) {
        Reply::Snapshot(snapshot) => snapshot,
        other => panic!("unexpected {:?}", other),
    };

    let after_skip = host.handle_line(r#"{"type":"skip"}"#);
    assert!(matches!(after_skip, Reply::Turn(_)));

    let restored = host.handle(Request::Restore {
        snapshot: saved.clone(),
    });
    assert_eq!(restored, Reply::Snapshot(saved.clone()));
    assert_eq!(host.handle_line(r#"{"type":"skip"}"#), after_skip);

    let err = host.handle_line(r#"{"type":"select","lane":9}"#);
    assert!(matches!(err, Reply::Error { ref code, .. } if code == "lane_out_of_range"));
}
