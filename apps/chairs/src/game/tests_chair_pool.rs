use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use crate::error::GameError;
use crate::game::chair_pool::ChairPool;

#[test]
fn new_pool_starts_full() {
    let pool = ChairPool::new(3);
    assert_eq!(pool.available(), 3);
    assert_eq!(pool.capacity(), 3);
}

#[test]
fn try_claim_fails_once_empty() {
    let pool = ChairPool::new(2);
    assert!(pool.try_claim());
    assert!(pool.try_claim());
    assert!(!pool.try_claim());
    assert_eq!(pool.available(), 0);
}

#[test]
fn refill_discards_leftovers() {
    let pool = ChairPool::new(5);
    assert!(pool.try_claim());

    let drained = pool.resize_and_refill(2).unwrap();
    assert_eq!(drained, 4);
    assert_eq!(pool.available(), 2);
}

#[test]
fn refill_is_idempotent() {
    let pool = ChairPool::new(4);
    for _ in 0..5 {
        pool.resize_and_refill(3).unwrap();
        assert_eq!(pool.available(), 3);
    }
}

#[test]
fn refill_above_capacity_is_rejected() {
    let pool = ChairPool::new(3);
    let err = pool.resize_and_refill(4).unwrap_err();
    assert!(matches!(
        err,
        GameError::PoolOverflow {
            requested: 4,
            capacity: 3
        }
    ));
    assert!(err.is_invariant_violation());
    assert_eq!(pool.available(), 3, "failed refill must not touch the pool");
}

#[test]
fn release_all_saturates_at_capacity() {
    let pool = ChairPool::new(3);
    pool.resize_and_refill(1).unwrap();

    assert_eq!(pool.release_all(3), 2);
    assert_eq!(pool.available(), 3);
    assert_eq!(pool.release_all(3), 0);
}

#[test]
fn concurrent_claims_never_exceed_permits() {
    const RACERS: usize = 16;
    const CHAIRS: usize = 5;

    for _ in 0..50 {
        let pool = Arc::new(ChairPool::new(RACERS));
        pool.resize_and_refill(CHAIRS).unwrap();
        let barrier = Arc::new(Barrier::new(RACERS));
        let wins = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..RACERS)
            .map(|_| {
                let pool = pool.clone();
                let barrier = barrier.clone();
                let wins = wins.clone();
                thread::spawn(move || {
                    barrier.wait();
                    if pool.try_claim() {
                        wins.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(wins.load(Ordering::SeqCst), CHAIRS);
        assert_eq!(pool.available(), 0);
    }
}
