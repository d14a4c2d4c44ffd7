//! A `critical-section` implementation backed by a loom mutex.
//!
//! Model tests build with `--cfg loom` and no `critical-section/std`, so this
//! is the only implementation linked and every critical section becomes a
//! point loom can interleave around.

use core::cell::RefCell;

use loom::sync::{Mutex, MutexGuard};

loom::lazy_static! {
    static ref SECTION: Mutex<()> = Mutex::new(());
}

loom::thread_local! {
    // `Some` while the current thread is inside the section.
    static HELD: RefCell<Option<MutexGuard<'static, ()>>> = RefCell::new(None);
}

struct LoomCriticalSection;
critical_section::set_impl!(LoomCriticalSection);

unsafe impl critical_section::Impl for LoomCriticalSection {
    unsafe fn acquire() -> bool {
        HELD.with(|held| {
            if held.borrow().is_some() {
                // Nested entry on the same thread.
                return true;
            }

            let guard = match SECTION.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            *held.borrow_mut() = Some(guard);

            false
        })
    }

    unsafe fn release(nested: bool) {
        if !nested {
            HELD.with(|held| {
                let guard = held.borrow_mut().take();
                drop(guard);
            });
        }
    }
}
