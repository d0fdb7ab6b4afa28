//! Thread-local slots shared by every random-choice call site: which trace is
//! being populated, and whether new choices start at the front of their domain.
//! Both are only ever set through guards that restore the previous value on drop.
use crate::data::*;
use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Clone, Copy, Eq, Hash, PartialEq, Debug)]
pub struct TraceId(u64);

static NEXT_TRACE: AtomicU64 = AtomicU64::new(0);

impl TraceId {
    pub fn fresh() -> TraceId {
        TraceId(NEXT_TRACE.fetch_add(1, Ordering::Relaxed))
    }
    pub fn value(&self) -> u64 {
        self.0
    }
}

thread_local! {
    static ACTIVE: Cell<Option<TraceId>> = Cell::new(None);
    static ENUMERATE: Cell<bool> = Cell::new(false);
}

pub fn active() -> Option<TraceId> {
    ACTIVE.with(|a| a.get())
}

pub fn enumerating() -> bool {
    ENUMERATE.with(|e| e.get())
}

#[must_use]
pub struct ActiveGuard {
    prev: Option<TraceId>,
}
impl Drop for ActiveGuard {
    fn drop(&mut self) {
        ACTIVE.with(|a| a.set(self.prev));
    }
}

/// Marks `id` as the trace being populated. Passes do not nest.
pub fn activate(id: TraceId) -> Result<ActiveGuard> {
    ACTIVE.with(|a| match a.get() {
        Some(_) => Err(TraceError::Reentrant()),
        None => {
            a.set(Some(id));
            Ok(ActiveGuard { prev: None })
        }
    })
}

#[must_use]
pub struct EnumerateGuard {
    prev: bool,
}
impl Drop for EnumerateGuard {
    fn drop(&mut self) {
        ENUMERATE.with(|e| e.set(self.prev));
    }
}

pub fn start_enumerate() -> EnumerateGuard {
    let prev = ENUMERATE.with(|e| e.replace(true));
    EnumerateGuard { prev }
}

pub fn stop_enumerate() -> EnumerateGuard {
    let prev = ENUMERATE.with(|e| e.replace(false));
    EnumerateGuard { prev }
}
