//! Tick-driven timer slots.
//!
//! The clock has no thread of its own. The owner calls `tick()` once per
//! interval and dispatches the returned events.
//!
//! ## Contract
//!
//! ```text
//! start_timer(kind, ticks) -> handle     (cancels the previous timer of `kind`)
//! cancel_timer(handle)                   (no-op for a stale handle)
//! tick() -> [Ticked.., Expired..]        (an expired countdown removes itself)
//! ```

use serde::{Deserialize, Serialize};

/// Timer classes. At most one timer per kind is alive at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerKind {
    /// Total attempt time, counts up without bound.
    Elapsed,
    /// Per-question countdown.
    Question,
    /// Post-answer feedback countdown.
    Feedback,
}

impl TimerKind {
    const ALL: [TimerKind; 3] = [TimerKind::Elapsed, TimerKind::Question, TimerKind::Feedback];

    fn slot(self) -> usize {
        match self {
            TimerKind::Elapsed => 0,
            TimerKind::Question => 1,
            TimerKind::Feedback => 2,
        }
    }
}

/// Identifies one started timer. A handle outlives its timer; once the timer
/// is cancelled, replaced or expired the handle is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle {
    kind: TimerKind,
    generation: u64,
}

impl TimerHandle {
    pub fn kind(&self) -> TimerKind {
        self.kind
    }
}

/// Produced by [`Clock::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    Ticked {
        handle: TimerHandle,
        elapsed: u64,
        /// `None` for unbounded timers.
        remaining: Option<u64>,
    },
    Expired {
        handle: TimerHandle,
    },
}

#[derive(Debug, Clone)]
struct Slot {
    handle: TimerHandle,
    elapsed: u64,
    remaining: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct Clock {
    next_generation: u64,
    slots: [Option<Slot>; 3],
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a timer of `kind`. `duration_ticks == None` starts an unbounded
    /// timer that only ever ticks.
    ///
    /// Any running timer of the same kind is cancelled first.
    pub fn start_timer(&mut self, kind: TimerKind, duration_ticks: Option<u64>) -> TimerHandle {
        self.next_generation += 1;
        let handle = TimerHandle {
            kind,
            generation: self.next_generation,
        };
        self.slots[kind.slot()] = Some(Slot {
            handle,
            elapsed: 0,
            remaining: duration_ticks,
        });
        handle
    }

    /// Cancel the timer behind `handle`. Returns false if it was already gone.
    pub fn cancel_timer(&mut self, handle: TimerHandle) -> bool {
        let slot = &mut self.slots[handle.kind.slot()];
        match slot {
            Some(s) if s.handle == handle => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel_all(&mut self) {
        self.slots = Default::default();
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.slot(handle.kind)
            .is_some_and(|s| s.handle == handle)
    }

    /// Handle of the live timer of `kind`, if any.
    pub fn active(&self, kind: TimerKind) -> Option<TimerHandle> {
        self.slot(kind).map(|s| s.handle)
    }

    pub fn remaining(&self, kind: TimerKind) -> Option<u64> {
        self.slot(kind).and_then(|s| s.remaining)
    }

    pub fn elapsed(&self, kind: TimerKind) -> Option<u64> {
        self.slot(kind).map(|s| s.elapsed)
    }

    /// Advance every live timer by one tick.
    ///
    /// Events come out in `Elapsed, Question, Feedback` order. A countdown
    /// whose remaining ticks reach zero reports `Expired` right after its
    /// final `Ticked` and is released.
    pub fn tick(&mut self) -> Vec<ClockEvent> {
        let mut events = Vec::new();
        for kind in TimerKind::ALL {
            let slot = &mut self.slots[kind.slot()];
            let Some(s) = slot.as_mut() else {
                continue;
            };
            s.elapsed = s.elapsed.saturating_add(1);
            s.remaining = s.remaining.map(|r| r.saturating_sub(1));
            events.push(ClockEvent::Ticked {
                handle: s.handle,
                elapsed: s.elapsed,
                remaining: s.remaining,
            });
            if s.remaining == Some(0) {
                events.push(ClockEvent::Expired { handle: s.handle });
                *slot = None;
            }
        }
        events
    }

    fn slot(&self, kind: TimerKind) -> Option<&Slot> {
        self.slots[kind.slot()].as_ref()
    }
}
