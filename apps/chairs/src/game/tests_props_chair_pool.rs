//! Property tests for the chair pool and round bookkeeping (single-threaded).

use proptest::prelude::*;

use crate::game::chair_pool::ChairPool;
use crate::game::state::GameState;
use crate::game::test_prelude;

#[derive(Debug, Clone)]
enum PoolOp {
    Claim,
    Refill(usize),
    Release(usize),
}

fn pool_op(capacity: usize) -> impl Strategy<Value = PoolOp> {
    prop_oneof![
        3 => Just(PoolOp::Claim),
        1 => (0..=capacity).prop_map(PoolOp::Refill),
        1 => (0..=capacity * 2).prop_map(PoolOp::Release),
    ]
}

fn capacity_and_ops() -> impl Strategy<Value = (usize, Vec<PoolOp>)> {
    (1usize..=12).prop_flat_map(|capacity| {
        (Just(capacity), prop::collection::vec(pool_op(capacity), 0..64))
    })
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: the permit count stays within [0, capacity] and successful
    /// claims since the last refill never exceed what that refill (plus any
    /// sweeps) made available.
    #[test]
    fn prop_pool_never_over_allocates((capacity, ops) in capacity_and_ops()) {
        let pool = ChairPool::new(capacity);
        let mut granted = capacity;
        let mut claimed = 0usize;

        for op in ops {
            match op {
                PoolOp::Claim => {
                    if pool.try_claim() {
                        claimed += 1;
                    }
                }
                PoolOp::Refill(n) => {
                    pool.resize_and_refill(n).unwrap();
                    granted = n;
                    claimed = 0;
                }
                PoolOp::Release(n) => {
                    granted += pool.release_all(n);
                }
            }
            prop_assert!(pool.available() <= capacity);
            prop_assert!(claimed <= granted);
            prop_assert_eq!(pool.available(), granted - claimed);
        }
    }

    /// Property: refilling to the same value any number of times is idempotent.
    #[test]
    fn prop_refill_idempotent(capacity in 1usize..=20, repeats in 1usize..8, pick in any::<prop::sample::Index>()) {
        let pool = ChairPool::new(capacity);
        let target = pick.index(capacity + 1);
        for _ in 0..repeats {
            pool.resize_and_refill(target).unwrap();
            prop_assert_eq!(pool.available(), target);
        }
    }

    /// Property: with one elimination per round, chairs track players - 1
    /// (floor 1) and the player count drops by exactly one each round.
    #[test]
    fn prop_chairs_track_players(players in 2usize..=16) {
        let state = GameState::new(players).unwrap();
        let mut previous_remaining = players;

        while state.remaining() > 1 {
            let plan = state.begin_round();
            prop_assert_eq!(plan.players, state.remaining());
            prop_assert_eq!(plan.chairs, (plan.players - 1).max(1));
            prop_assert!(plan.chairs < plan.players);

            let loser = plan.round;
            let remaining = state.eliminate(loser, plan.round).unwrap();
            state.close_round();

            prop_assert_eq!(remaining, previous_remaining - 1);
            previous_remaining = remaining;
        }

        prop_assert_eq!(state.round() as usize, players - 1);
        prop_assert_eq!(state.eliminations().len(), players - 1);
    }
}
