// AmfDigest - core/emitter.rs
//
// Single-event deduplication and text formatting of emitted events.
//
// The emitter remembers only the label of the last *emitted* event. State is
// passed in and handed back by `offer` rather than held globally, so two
// independent streams never share suppression memory.

use crate::core::model::Event;
use crate::util::constants::FALLBACK_TIMESTAMP_FORMAT;
use chrono::Local;

/// Suppression memory for one stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitterState {
    last_label: Option<String>,
}

impl EmitterState {
    /// Fresh state for the start of a stream: nothing emitted yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Label of the most recent emission, if any.
    pub fn last_label(&self) -> Option<&str> {
        self.last_label.as_deref()
    }
}

/// Outcome of offering a candidate event to the emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The event differs from the last emission and must be written.
    Emit(Event),
    /// Same label as the last emission; drop it.
    Suppress(Event),
}

/// Decide whether `event` is emitted, returning the updated state.
///
/// Comparison is by label only (window of one). On suppression the state is
/// returned unchanged.
pub fn offer(state: EmitterState, event: Event) -> (EmitterState, Decision) {
    if state.last_label() == Some(event.label.as_str()) {
        return (state, Decision::Suppress(event));
    }
    let next = EmitterState {
        last_label: Some(event.label.clone()),
    };
    (next, Decision::Emit(event))
}

// =============================================================================
// Timestamp resolution and text rendering
// =============================================================================

/// Source of the wall-clock fallback timestamp.
pub trait Clock {
    /// Current time rendered as `YYYY-MM-DD HH:MM:SS`.
    fn now_stamp(&self) -> String;
}

/// Local system time, read at the moment of each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_stamp(&self) -> String {
        Local::now().format(FALLBACK_TIMESTAMP_FORMAT).to_string()
    }
}

/// A clock frozen at one stamp, for reproducible output.
#[derive(Debug, Clone)]
pub struct FixedClock(pub String);

impl Clock for FixedClock {
    fn now_stamp(&self) -> String {
        self.0.clone()
    }
}

/// The line's own timestamp if it had one, otherwise the clock's.
pub fn resolve_timestamp(event: &Event, clock: &dyn Clock) -> String {
    match &event.timestamp {
        Some(ts) => ts.clone(),
        None => clock.now_stamp(),
    }
}

/// Render `[<timestamp>] <label>`.
pub fn format_line(event: &Event, clock: &dyn Clock) -> String {
    format!("[{}] {}", resolve_timestamp(event, clock), event.label)
}
