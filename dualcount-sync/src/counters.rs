//! A pair of counters that is only ever updated as a unit.
//!
//! Example usage:
//!
//! ```rust
//! use dualcount_sync::SharedCounters;
//!
//! static SHARED: SharedCounters = SharedCounters::new();
//!
//! // Incrementing task.
//! SHARED.update(1).unwrap();
//! // Decrementing task.
//! SHARED.update(-1).unwrap();
//!
//! let seen = SHARED.snapshot().unwrap();
//! assert_eq!((seen.a, seen.b), (0, 0));
//! ```

use core::fmt;

#[cfg(not(loom))]
use portable_atomic::{AtomicI32, Ordering};

#[cfg(loom)]
use loom::sync::atomic::{AtomicI32, Ordering};

use crate::exclusion::{CriticalSection, Exclusion, Poisoned};

/// A copy of the counter pair.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Counters {
    /// First counter.
    pub a: i32,
    /// Second counter.
    pub b: i32,
}

impl Counters {
    /// Both counters at zero.
    pub const ZERO: Self = Self { a: 0, b: 0 };

    /// Whether both counters hold the same value.
    pub const fn is_balanced(&self) -> bool {
        self.a == self.b
    }
}

/// Two signed counters guarded by a single exclusion primitive.
///
/// Every [`update`](Self::update) applies the same delta to both counters in
/// one critical section, so an observer going through the same primitive never
/// sees one counter changed without the other.
///
/// The counters are stored in atomics. Inside the critical section this only
/// matters for [`snapshot_relaxed`](Self::snapshot_relaxed), which reads
/// without taking the primitive.
pub struct SharedCounters<X = CriticalSection> {
    exclusion: X,
    a: AtomicI32,
    b: AtomicI32,
}

impl SharedCounters<CriticalSection> {
    /// Create a zeroed pair guarded by the global critical section.
    #[cfg(not(loom))]
    pub const fn new() -> Self {
        Self::with_exclusion(CriticalSection)
    }

    /// Create a zeroed pair guarded by the global critical section.
    #[cfg(loom)]
    pub fn new() -> Self {
        Self::with_exclusion(CriticalSection)
    }
}

impl Default for SharedCounters<CriticalSection> {
    fn default() -> Self {
        Self::new()
    }
}

impl<X: Exclusion> SharedCounters<X> {
    /// Create a zeroed pair guarded by `exclusion`.
    #[cfg(not(loom))]
    pub const fn with_exclusion(exclusion: X) -> Self {
        Self {
            exclusion,
            a: AtomicI32::new(0),
            b: AtomicI32::new(0),
        }
    }

    /// Create a zeroed pair guarded by `exclusion`.
    #[cfg(loom)]
    pub fn with_exclusion(exclusion: X) -> Self {
        Self {
            exclusion,
            a: AtomicI32::new(0),
            b: AtomicI32::new(0),
        }
    }

    /// Add `delta` to both counters in one critical section.
    ///
    /// Arithmetic wraps on overflow. Returns the pair as it was when the
    /// critical section closed.
    pub fn update(&self, delta: i32) -> Result<Counters, Poisoned> {
        let res = self.exclusion.lock(|| {
            // Relaxed is enough: the exclusion primitive orders the sections.
            let a = self.a.load(Ordering::Relaxed).wrapping_add(delta);
            let b = self.b.load(Ordering::Relaxed).wrapping_add(delta);
            self.a.store(a, Ordering::Relaxed);
            self.b.store(b, Ordering::Relaxed);

            Counters { a, b }
        });

        if res.is_err() {
            error!("counter update of {} refused: exclusion poisoned", delta);
        }

        res
    }

    /// Read both counters in one critical section.
    pub fn snapshot(&self) -> Result<Counters, Poisoned> {
        self.exclusion.lock(|| self.load())
    }

    /// Read both counters without taking the exclusion primitive.
    ///
    /// This is a diagnostic, best-effort read. It never blocks and never
    /// fails, but it is **not** atomic: `a` and `b` may come from different
    /// updates, so the result can be unbalanced even though the pair never
    /// is at a quiescent point. Use [`snapshot`](Self::snapshot) whenever the
    /// values are used for decisions.
    pub fn snapshot_relaxed(&self) -> Counters {
        self.load()
    }

    /// The primitive guarding the pair.
    pub fn exclusion(&self) -> &X {
        &self.exclusion
    }

    fn load(&self) -> Counters {
        Counters {
            a: self.a.load(Ordering::Relaxed),
            b: self.b.load(Ordering::Relaxed),
        }
    }
}

impl<X: Exclusion> fmt::Debug for SharedCounters<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seen = self.snapshot_relaxed();
        f.debug_struct("SharedCounters")
            .field("a", &seen.a)
            .field("b", &seen.b)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "defmt-03")]
impl<X: Exclusion> defmt::Format for SharedCounters<X> {
    fn format(&self, f: defmt::Formatter) {
        let seen = self.snapshot_relaxed();
        defmt::write!(f, "SharedCounters {{ a: {}, b: {} }}", seen.a, seen.b)
    }
}
