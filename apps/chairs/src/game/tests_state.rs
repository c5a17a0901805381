use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::GameError;
use crate::game::state::{Elimination, GameState, RoundPlan};

#[test]
fn new_state_needs_two_players() {
    assert!(matches!(GameState::new(1), Err(GameError::Config { .. })));
    assert!(matches!(GameState::new(0), Err(GameError::Config { .. })));

    let state = GameState::new(2).unwrap();
    assert_eq!(state.remaining(), 2);
    assert_eq!(state.chairs(), 1);
    assert!(state.is_active());
}

#[test]
fn first_round_uses_initial_chairs() {
    let state = GameState::new(4).unwrap();
    assert_eq!(
        state.begin_round(),
        RoundPlan {
            round: 1,
            chairs: 3,
            players: 4
        }
    );
}

#[test]
fn chairs_shrink_after_each_elimination() {
    let state = GameState::new(4).unwrap();
    let mut chairs = Vec::new();

    for loser in [2, 4, 1] {
        let plan = state.begin_round();
        chairs.push(plan.chairs);
        state.eliminate(loser, plan.round).unwrap();
        state.close_round();
    }

    assert_eq!(chairs, vec![3, 2, 1]);
    assert_eq!(state.remaining(), 1);
    assert_eq!(state.standing_players(), vec![3]);
}

#[test]
fn chairs_never_grow_or_drop_below_one() {
    let state = GameState::new(3).unwrap();

    // A round nobody reported in leaves the player count untouched.
    let first = state.begin_round();
    state.close_round();
    let second = state.begin_round();
    state.close_round();
    assert_eq!(first.chairs, 2);
    assert_eq!(second.chairs, 2);

    state.eliminate(1, second.round).unwrap();
    state.eliminate(2, second.round).unwrap();
    let third = state.begin_round();
    assert_eq!(third.chairs, 1);
}

#[test]
fn last_player_standing_cannot_be_eliminated() {
    let state = GameState::new(2).unwrap();
    let round = state.begin_round().round;
    assert_eq!(state.eliminate(1, round).unwrap(), 1);

    let err = state.eliminate(2, round).unwrap_err();
    assert!(matches!(err, GameError::NoPlayersLeft { player: 2 }));
    assert!(err.is_invariant_violation());
    assert_eq!(state.remaining(), 1);
    assert_eq!(state.standing_players(), vec![2]);
    assert_eq!(state.eliminations().len(), 1);
}

#[test]
fn close_round_records_tally() {
    let state = GameState::new(3).unwrap();
    let plan = state.begin_round();
    state.record_seated(1, plan.round);
    state.record_seated(3, plan.round);
    state.eliminate(2, plan.round).unwrap();

    let record = state.close_round();
    assert_eq!(record.round, 1);
    assert_eq!(record.chairs, 2);
    assert_eq!(record.players_at_start, 3);
    assert_eq!(record.seated, vec![1, 3]);
    assert_eq!(record.eliminated, vec![2]);
    assert_eq!(record.unreported(), 0);
    assert_eq!(state.history(), vec![record]);
    assert_eq!(
        state.eliminations(),
        vec![Elimination {
            player: 2,
            round: 1
        }]
    );
}

#[test]
fn late_reports_are_not_attributed_to_closed_round() {
    let state = GameState::new(3).unwrap();
    let plan = state.begin_round();
    state.record_seated(1, plan.round);
    let record = state.close_round();

    state.record_seated(3, plan.round);
    state.eliminate(2, plan.round).unwrap();

    assert_eq!(record.unreported(), 2);
    assert_eq!(state.history()[0].seated, vec![1]);
    assert!(state.history()[0].eliminated.is_empty());
    // The player count still reflects the late elimination.
    assert_eq!(state.remaining(), 2);
}

#[test]
fn wait_settled_returns_once_everyone_reported() {
    let state = Arc::new(GameState::new(3).unwrap());
    let plan = state.begin_round();

    let reporter = {
        let state = state.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            state.record_seated(1, plan.round);
            state.record_seated(2, plan.round);
            state.eliminate(3, plan.round).unwrap();
        })
    };

    let started = Instant::now();
    assert!(state.wait_settled(Duration::from_secs(30)));
    assert!(started.elapsed() < Duration::from_secs(10));
    reporter.join().unwrap();
}

#[test]
fn wait_settled_times_out_when_players_are_missing() {
    let state = GameState::new(3).unwrap();
    let plan = state.begin_round();
    state.record_seated(1, plan.round);

    assert!(!state.wait_settled(Duration::from_millis(20)));
}

#[test]
fn wait_settled_returns_when_game_stops() {
    let state = Arc::new(GameState::new(4).unwrap());
    state.begin_round();

    let stopper = {
        let state = state.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            state.set_active(false);
        })
    };

    let started = Instant::now();
    assert!(!state.wait_settled(Duration::from_secs(30)));
    assert!(started.elapsed() < Duration::from_secs(10));
    stopper.join().unwrap();
}

#[test]
fn wait_all_reported_outlasts_a_slow_racer() {
    let state = Arc::new(GameState::new(2).unwrap());
    let plan = state.begin_round();

    let reporter = {
        let state = state.clone();
        thread::spawn(move || {
            state.record_seated(1, plan.round);
            thread::sleep(Duration::from_millis(50));
            state.eliminate(2, plan.round).unwrap();
        })
    };

    assert!(!state.wait_settled(Duration::ZERO));
    assert!(state.wait_all_reported());
    assert_eq!(state.reported(), 2);
    reporter.join().unwrap();
}

#[test]
fn wait_all_reported_returns_when_game_stops() {
    let state = Arc::new(GameState::new(3).unwrap());
    state.begin_round();

    let stopper = {
        let state = state.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            state.set_active(false);
        })
    };

    assert!(!state.wait_all_reported());
    stopper.join().unwrap();
}
