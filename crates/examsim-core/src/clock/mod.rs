mod countdown;

pub use countdown::{Clock, ClockEvent, TimerHandle, TimerKind};
