use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::game::round_signal::{RoundSignal, SignalState, Wake};

const PATIENCE: Duration = Duration::from_secs(5);

#[test]
fn fresh_signal_is_active_and_silent() {
    let signal = RoundSignal::new();
    assert_eq!(
        signal.snapshot(),
        SignalState {
            round: 0,
            music_stopped: false,
            active: true
        }
    );
}

#[test]
fn stop_music_wakes_every_waiter() {
    let signal = Arc::new(RoundSignal::new());
    signal.reset(1);
    let (tx, rx) = mpsc::channel();

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let signal = signal.clone();
            let tx = tx.clone();
            thread::spawn(move || tx.send(signal.wait_for_music(0)).unwrap())
        })
        .collect();

    assert_eq!(signal.stop_music(), 1);
    for _ in 0..6 {
        assert_eq!(
            rx.recv_timeout(PATIENCE).unwrap(),
            Wake::MusicStopped { round: 1 }
        );
    }
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn already_raced_round_does_not_wake_again() {
    let signal = Arc::new(RoundSignal::new());
    signal.reset(1);
    signal.stop_music();

    let (tx, rx) = mpsc::channel();
    let waiter = {
        let signal = signal.clone();
        thread::spawn(move || tx.send(signal.wait_for_music(1)).unwrap())
    };

    // Still round 1 with the music stopped: the waiter must keep sleeping.
    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());

    signal.reset(2);
    signal.stop_music();
    assert_eq!(
        rx.recv_timeout(PATIENCE).unwrap(),
        Wake::MusicStopped { round: 2 }
    );
    waiter.join().unwrap();
}

#[test]
fn shutdown_wakes_waiters_without_music() {
    let signal = Arc::new(RoundSignal::new());
    signal.reset(1);
    let (tx, rx) = mpsc::channel();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let signal = signal.clone();
            let tx = tx.clone();
            thread::spawn(move || tx.send(signal.wait_for_music(0)).unwrap())
        })
        .collect();

    signal.set_active(false);
    for _ in 0..4 {
        assert_eq!(rx.recv_timeout(PATIENCE).unwrap(), Wake::Shutdown);
    }
    for handle in handles {
        handle.join().unwrap();
    }
    assert!(!signal.is_active());
}

#[test]
fn shutdown_takes_precedence_over_music() {
    let signal = RoundSignal::new();
    signal.reset(3);
    signal.stop_music();
    signal.set_active(false);
    assert_eq!(signal.wait_for_music(0), Wake::Shutdown);
}

#[test]
fn sleep_runs_full_duration_while_active() {
    let signal = RoundSignal::new();
    let started = Instant::now();
    assert!(signal.sleep_while_active(Duration::from_millis(30)));
    assert!(started.elapsed() >= Duration::from_millis(30));
}

#[test]
fn sleep_is_cut_short_by_shutdown() {
    let signal = Arc::new(RoundSignal::new());
    let stopper = {
        let signal = signal.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            signal.set_active(false);
        })
    };

    let started = Instant::now();
    assert!(!signal.sleep_while_active(Duration::from_secs(30)));
    assert!(started.elapsed() < Duration::from_secs(10));
    stopper.join().unwrap();
}
