// AmfDigest - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Event (output of classification)
// =============================================================================

/// A single notable protocol or state event detected on one trace line.
///
/// At most one `Event` exists per input line. The `label` is both the
/// human-readable annotation and the deduplication key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Which rule family produced this event.
    pub category: Category,

    /// Output text, e.g. `"NAS event | Registration Accept"`.
    pub label: String,

    /// Verbatim bracketed timestamp from the triggering line, if it had one.
    /// Never parsed; carried through as text.
    pub timestamp: Option<String>,

    /// 1-based line number of the triggering line in the input stream.
    pub line_number: u64,
}

impl Event {
    pub fn new(category: Category, label: impl Into<String>) -> Self {
        Self {
            category,
            label: label.into(),
            timestamp: None,
            line_number: 0,
        }
    }

    /// Attach the line's extracted timestamp and position.
    pub fn at(mut self, timestamp: Option<&str>, line_number: u64) -> Self {
        self.timestamp = timestamp.map(str::to_string);
        self.line_number = line_number;
        self
    }
}

// =============================================================================
// Category
// =============================================================================

/// Event categories, in classifier priority order (highest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    IdentifierObserved,
    NasEvent,
    NgapEvent,
    UeState,
    UeConnected,
    ContextSetup,
    SmfPduSession,
    ErrorWarn,
}

impl Category {
    /// Returns all variants in priority order.
    pub fn all() -> &'static [Category] {
        &[
            Category::IdentifierObserved,
            Category::NasEvent,
            Category::NgapEvent,
            Category::UeState,
            Category::UeConnected,
            Category::ContextSetup,
            Category::SmfPduSession,
            Category::ErrorWarn,
        ]
    }

    /// Stable machine-readable name, as used in JSON/CSV output.
    pub fn key(&self) -> &'static str {
        match self {
            Category::IdentifierObserved => "identifier_observed",
            Category::NasEvent => "nas_event",
            Category::NgapEvent => "ngap_event",
            Category::UeState => "ue_state",
            Category::UeConnected => "ue_connected",
            Category::ContextSetup => "context_setup",
            Category::SmfPduSession => "smf_pdu_session",
            Category::ErrorWarn => "error_warn",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// Run Summary
// =============================================================================

/// Statistics for one pass over an input stream.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Raw lines read from the source.
    pub lines_read: u64,

    /// Lines that produced an event.
    pub events_classified: u64,

    /// Events written to the sink.
    pub events_emitted: u64,

    /// Events dropped as immediate repeats of the previous emission.
    pub events_suppressed: u64,

    /// Emitted events by category.
    pub emitted_by_category: HashMap<Category, u64>,

    /// Wall-clock run duration.
    pub duration: std::time::Duration,
}

impl RunSummary {
    /// Lines that matched no rule.
    pub fn lines_dropped(&self) -> u64 {
        self.lines_read - self.events_classified
    }

    pub(crate) fn record_emitted(&mut self, category: Category) {
        self.events_emitted += 1;
        *self.emitted_by_category.entry(category).or_insert(0) += 1;
    }
}
