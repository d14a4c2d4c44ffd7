//! Primitives that grant mutual exclusion over a region of code.

use core::fmt;

/// The exclusion primitive was abandoned by a holder that panicked inside its
/// critical section.
///
/// Whatever the primitive guards is of unknown validity afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Poisoned;

impl fmt::Display for Poisoned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("exclusion primitive poisoned by a panicking holder")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Poisoned {}

/// A primitive granting mutual exclusion against every other task.
///
/// # Safety
///
/// Closures passed to [`Exclusion::lock`] on the same primitive must never run
/// concurrently, whether the callers are threads, tasks or interrupt handlers.
/// Code relying on this trait uses it to make multi-word updates atomic.
pub unsafe trait Exclusion {
    /// Run `f` with exclusive access and return its result.
    ///
    /// Fails only if the primitive is fallible and a previous holder panicked
    /// while inside `f`.
    fn lock<R>(&self, f: impl FnOnce() -> R) -> Result<R, Poisoned>;
}

// SAFETY: forwards to the referenced primitive.
unsafe impl<X: Exclusion> Exclusion for &X {
    #[inline]
    fn lock<R>(&self, f: impl FnOnce() -> R) -> Result<R, Poisoned> {
        X::lock(self, f)
    }
}

/// The global critical section of the [`critical_section`] crate.
///
/// On single core targets this masks interrupts, which makes it exclusive
/// against every task of a preemptive scheduler. It never fails.
#[derive(Debug, Default, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct CriticalSection;

// SAFETY: `critical_section::with` is globally exclusive by contract.
unsafe impl Exclusion for CriticalSection {
    #[inline]
    fn lock<R>(&self, f: impl FnOnce() -> R) -> Result<R, Poisoned> {
        Ok(critical_section::with(|_| f()))
    }
}

#[cfg(feature = "std")]
pub use std_exclusion::StdExclusion;

#[cfg(feature = "std")]
mod std_exclusion {
    use super::{Exclusion, Poisoned};

    /// Exclusion through a [`std::sync::Mutex`].
    ///
    /// Unlike [`CriticalSection`](super::CriticalSection) this primitive only
    /// excludes users of the same instance, and it reports [`Poisoned`] once a
    /// holder has panicked inside its closure.
    #[derive(Debug, Default)]
    pub struct StdExclusion {
        inner: std::sync::Mutex<()>,
    }

    impl StdExclusion {
        /// Create a new, unlocked primitive.
        pub const fn new() -> Self {
            Self {
                inner: std::sync::Mutex::new(()),
            }
        }

        /// Whether a holder has panicked inside its critical section.
        pub fn is_poisoned(&self) -> bool {
            self.inner.is_poisoned()
        }
    }

    // SAFETY: the closure only runs while the mutex guard is held.
    unsafe impl Exclusion for StdExclusion {
        fn lock<R>(&self, f: impl FnOnce() -> R) -> Result<R, Poisoned> {
            let _guard = self.inner.lock().map_err(|_| Poisoned)?;
            Ok(f())
        }
    }
}
