// AmfDigest - core/classifier.rs
//
// Event classification: an ordered cascade of keyword rules mapping one raw
// trace line to at most one Event. The first rule that matches wins.
//
// RULE ORDER IS BEHAVIOUR. Identifier sightings outrank everything; protocol
// phrases go from most specific to most generic; error/warning detection is
// last, so "Registration Request failed with error" is a NAS event.

use crate::core::model::{Category, Event};
use crate::util::constants::LABEL_SEPARATOR;
use crate::util::logging::preview;

/// NAS phrases checked by the keyword rule. The first phrase present (in
/// this order, not line order) becomes the label detail.
pub const NAS_PHRASES: &[&str] = &[
    "Registration Request",
    "Registration Accept",
    "Registration Complete",
    "Authentication",
    "Security Mode",
];

/// What the rules get to look at for one line.
#[derive(Debug, Clone, Copy)]
pub struct LineFacts<'a> {
    /// The raw line, trailing newline already removed.
    pub raw: &'a str,

    /// Subscriber identifier found on the line, if any.
    pub identifier: Option<&'a str>,
}

impl<'a> LineFacts<'a> {
    pub fn new(raw: &'a str, identifier: Option<&'a str>) -> Self {
        Self { raw, identifier }
    }

    /// Case-insensitive substring test.
    fn has(&self, needle: &str) -> bool {
        contains_ignore_case(self.raw, needle)
    }

    fn has_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.has(n))
    }
}

/// ASCII case-insensitive substring search without allocating a lowered copy.
///
/// Only ASCII letters fold. All rule keywords are ASCII and non-ASCII bytes in
/// the line compare exactly, so Unicode look-alikes that full case folding
/// would equate (`ſ` for `s`, the Kelvin sign `K` for `k`) do not match.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let (h, n) = (haystack.as_bytes(), needle.as_bytes());
    if n.is_empty() {
        return true;
    }
    h.windows(n.len()).any(|w| w.eq_ignore_ascii_case(n))
}

fn labelled(prefix: &str, detail: &str) -> String {
    format!("{prefix}{LABEL_SEPARATOR}{detail}")
}

// =============================================================================
// Rule table
// =============================================================================

/// One tier of the cascade: a predicate fused with its label builder.
/// `apply` returns the label when the rule fires.
pub struct Rule {
    /// Short identifier for diagnostics.
    pub name: &'static str,
    pub category: Category,
    apply: fn(&LineFacts<'_>) -> Option<String>,
}

impl Rule {
    /// Evaluate this rule alone against a line.
    pub fn apply(&self, facts: &LineFacts<'_>) -> Option<String> {
        (self.apply)(facts)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish()
    }
}

/// The cascade, highest priority first.
pub static RULES: &[Rule] = &[
    Rule {
        name: "identifier",
        category: Category::IdentifierObserved,
        apply: |l: &LineFacts<'_>| l.identifier.map(|id| labelled("UE IMSI observed", id)),
    },
    Rule {
        name: "nas-keyword",
        category: Category::NasEvent,
        apply: |l: &LineFacts<'_>| {
            NAS_PHRASES
                .iter()
                .find(|phrase| l.has(phrase))
                .map(|phrase| labelled("NAS event", phrase))
        },
    },
    Rule {
        name: "nas-registration",
        category: Category::NasEvent,
        apply: |l: &LineFacts<'_>| {
            (l.has("Registration") && l.has_any(&["Request", "Accept", "Complete"]))
                .then(|| labelled("NAS event", "Registration"))
        },
    },
    // Shadowed by nas-keyword, which already lists both phrases.
    Rule {
        name: "nas-auth-security",
        category: Category::NasEvent,
        apply: |l: &LineFacts<'_>| {
            l.has_any(&["Authentication", "Security Mode"])
                .then(|| labelled("NAS event", "Authentication / Security Mode"))
        },
    },
    Rule {
        name: "ngap-ng-setup",
        category: Category::NgapEvent,
        apply: |l: &LineFacts<'_>| {
            l.has_any(&["NGSetupRequest", "NGSetupResponse"])
                .then(|| labelled("NGAP event", "NG Setup"))
        },
    },
    Rule {
        name: "ngap-initial-ue",
        category: Category::NgapEvent,
        apply: |l: &LineFacts<'_>| {
            l.has_any(&["Initial UE Message", "InitialContextSetup"])
                .then(|| labelled("NGAP event", "Initial UE / Context Setup"))
        },
    },
    Rule {
        name: "ngap-gnb-association",
        category: Category::NgapEvent,
        apply: |l: &LineFacts<'_>| {
            l.has_any(&["gNB", "Association"])
                .then(|| labelled("NGAP event", "gNB/Association"))
        },
    },
    Rule {
        name: "ue-registered",
        category: Category::UeState,
        apply: |l: &LineFacts<'_>| {
            l.has_any(&["5GMM-REGISTERED", "REGISTERED"])
                .then(|| labelled("UE state", "5GMM-REGISTERED"))
        },
    },
    Rule {
        name: "ue-connected",
        category: Category::UeConnected,
        apply: |l: &LineFacts<'_>| {
            l.has_any(&["CONNECTED", "UE connected"])
                .then(|| "UE connected".to_string())
        },
    },
    Rule {
        name: "context-setup-request",
        category: Category::ContextSetup,
        apply: |l: &LineFacts<'_>| {
            l.has("Initial Context Setup Request")
                .then(|| labelled("Context setup", "Initial Context Setup Request"))
        },
    },
    Rule {
        name: "context-setup-response",
        category: Category::ContextSetup,
        apply: |l: &LineFacts<'_>| {
            l.has("Initial Context Setup Response")
                .then(|| labelled("Context setup", "Initial Context Setup Response"))
        },
    },
    Rule {
        name: "smf-pdu-session",
        category: Category::SmfPduSession,
        apply: |l: &LineFacts<'_>| {
            l.has_any(&["SMF", "PDUSession", "PDU Session"])
                .then(|| "SMF / PDU Session event".to_string())
        },
    },
    // The only rule with a per-line label: the trimmed line is the detail.
    Rule {
        name: "error-warn",
        category: Category::ErrorWarn,
        apply: |l: &LineFacts<'_>| {
            (l.has_any(&["warning", "error"]) || l.raw.contains("[error]"))
                .then(|| labelled("Error/Warn", l.raw.trim()))
        },
    },
];

// =============================================================================
// Classification
// =============================================================================

/// Classify a line whose identifier has already been extracted.
///
/// Returns `None` for lines no rule recognises; those are dropped silently.
/// The returned event has no timestamp or line number yet; see [`Event::at`].
pub fn classify(raw: &str, identifier: Option<&str>) -> Option<Event> {
    let facts = LineFacts::new(raw, identifier);

    for rule in RULES {
        if let Some(label) = rule.apply(&facts) {
            tracing::trace!(rule = rule.name, line = preview(raw), "Rule matched");
            return Some(Event::new(rule.category, label));
        }
    }

    tracing::trace!(line = preview(raw), "No rule matched");
    None
}
