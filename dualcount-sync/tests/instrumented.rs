//! Checks the exclusion contract of [`SharedCounters`] with a primitive that
//! counts how many callers are inside it at once.

#![cfg(not(loom))]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use dualcount_sync::{Counters, Exclusion, Poisoned, SharedCounters};
use parking_lot::Mutex;

#[derive(Default)]
struct Instrumented {
    lock: Mutex<()>,
    holders: AtomicUsize,
    max_holders: AtomicUsize,
    entries: AtomicUsize,
}

impl Instrumented {
    fn max_holders(&self) -> usize {
        self.max_holders.load(Ordering::SeqCst)
    }

    fn entries(&self) -> usize {
        self.entries.load(Ordering::SeqCst)
    }
}

unsafe impl Exclusion for Instrumented {
    fn lock<R>(&self, f: impl FnOnce() -> R) -> Result<R, Poisoned> {
        let _guard = self.lock.lock();

        let inside = self.holders.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_holders.fetch_max(inside, Ordering::SeqCst);
        self.entries.fetch_add(1, Ordering::SeqCst);

        // Give the other side every chance to barge in.
        thread::yield_now();
        let r = f();

        self.holders.fetch_sub(1, Ordering::SeqCst);
        Ok(r)
    }
}

#[test]
fn simultaneous_entry_has_one_holder() {
    const ROUNDS: usize = 2_000;

    let shared = Arc::new(SharedCounters::with_exclusion(Instrumented::default()));
    let start = Arc::new(Barrier::new(2));

    let handles: Vec<_> = [1, -1]
        .into_iter()
        .map(|delta| {
            let shared = shared.clone();
            let start = start.clone();
            thread::spawn(move || {
                start.wait();
                for _ in 0..ROUNDS {
                    assert!(shared.update(delta).unwrap().is_balanced());
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(shared.exclusion().max_holders(), 1);
    assert_eq!(shared.exclusion().entries(), 2 * ROUNDS);
    assert_eq!(shared.snapshot(), Ok(Counters::ZERO));
}

#[test]
fn second_entry_waits_for_first_exit() {
    let x = Arc::new(Instrumented::default());

    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    let first = {
        let x = x.clone();
        thread::spawn(move || {
            x.lock(|| {
                entered_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            })
            .unwrap();
        })
    };

    entered_rx.recv().unwrap();

    let second = {
        let x = x.clone();
        thread::spawn(move || x.lock(|| ()).unwrap())
    };

    thread::sleep(Duration::from_millis(50));
    assert_eq!(x.entries(), 1, "second caller entered while first was inside");

    release_tx.send(()).unwrap();
    first.join().unwrap();
    second.join().unwrap();

    assert_eq!(x.entries(), 2);
    assert_eq!(x.max_holders(), 1);
}

#[test]
fn observer_through_exclusion_sees_whole_updates() {
    const ROUNDS: usize = 1_000;

    let shared = Arc::new(SharedCounters::with_exclusion(Instrumented::default()));

    let writers: Vec<_> = [1, -1, 1]
        .into_iter()
        .map(|delta| {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..ROUNDS {
                    shared.update(delta).unwrap();
                }
            })
        })
        .collect();

    for _ in 0..ROUNDS {
        assert!(shared.snapshot().unwrap().is_balanced());
    }

    for w in writers {
        w.join().unwrap();
    }

    let n = ROUNDS as i32;
    assert_eq!(shared.snapshot(), Ok(Counters { a: n, b: n }));
    assert_eq!(shared.exclusion().max_holders(), 1);
}
