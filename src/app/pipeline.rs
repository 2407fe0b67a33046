// AmfDigest - app/pipeline.rs
//
// The processing loop: pull one raw line, extract its timestamp and
// identifier, classify it, offer the event to the emitter, and write it if
// emitted, before pulling the next line.
//
// Strictly sequential. The only state carried between lines is the
// EmitterState, which is threaded through `step` by value.

use crate::app::source::RawLines;
use crate::core::classifier::classify;
use crate::core::emitter::{format_line, offer, Clock, Decision, EmitterState};
use crate::core::extract::{extract_identifier, extract_timestamp};
use crate::core::model::{Category, Event, RunSummary};
use crate::core::output::{EventWriter, OutputFormat};
use crate::util::error::Result;
use std::io::{BufRead, Write};
use std::time::Instant;

/// Classify one raw line and run it past the emitter.
///
/// Returns the new state and, if the line produced an event, the emitter's
/// decision about it. Lines with no event leave the state untouched.
pub fn step(
    state: EmitterState,
    raw: &str,
    line_number: u64,
) -> (EmitterState, Option<Decision>) {
    let timestamp = extract_timestamp(raw);
    let identifier = extract_identifier(raw);

    match classify(raw, identifier) {
        Some(event) => {
            let event = event.at(timestamp, line_number);
            let (state, decision) = offer(state, event);
            (state, Some(decision))
        }
        None => (state, None),
    }
}

/// Run the full loop over `reader`, writing emitted events to `writer`.
///
/// Returns the run statistics and the writer (flushed) on success. An input
/// or output failure stops the run at that line.
pub fn run<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    format: OutputFormat,
    clock: &dyn Clock,
) -> Result<(RunSummary, W)> {
    let started = Instant::now();
    let mut summary = RunSummary::default();
    let mut state = EmitterState::new();
    let mut out = EventWriter::new(writer, format)?;

    tracing::debug!(format = %format, "Processing started");

    for item in RawLines::new(reader) {
        let (line_number, raw) = item?;
        summary.lines_read += 1;

        let (next, decision) = step(state, &raw, line_number);
        state = next;

        match decision {
            Some(Decision::Emit(event)) => {
                summary.events_classified += 1;
                out.write_event(&event, clock)?;
                summary.record_emitted(event.category);
            }
            Some(Decision::Suppress(event)) => {
                summary.events_classified += 1;
                summary.events_suppressed += 1;
                tracing::trace!(line = line_number, label = %event.label, "Repeat suppressed");
            }
            None => {}
        }
    }

    let writer = out.finish()?;
    summary.duration = started.elapsed();

    tracing::info!(
        lines = summary.lines_read,
        classified = summary.events_classified,
        emitted = summary.events_emitted,
        suppressed = summary.events_suppressed,
        dropped = summary.lines_dropped(),
        elapsed_ms = summary.duration.as_millis() as u64,
        "Processing complete"
    );
    for (category, count) in sorted_counts(&summary) {
        tracing::debug!(category = %category, count, "Emitted by category");
    }

    Ok((summary, writer))
}

/// Text-format digest of in-memory lines, one string per emitted event.
pub fn digest<'a, I>(lines: I, clock: &dyn Clock) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    emitted_events(lines)
        .iter()
        .map(|event| format_line(event, clock))
        .collect()
}

/// Emitted events (no formatting) for in-memory lines.
pub fn emitted_events<'a, I>(lines: I) -> Vec<Event>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut state = EmitterState::new();
    let mut out = Vec::new();
    for (idx, raw) in lines.into_iter().enumerate() {
        let (next, decision) = step(state, raw, idx as u64 + 1);
        state = next;
        if let Some(Decision::Emit(event)) = decision {
            out.push(event);
        }
    }
    out
}

fn sorted_counts(summary: &RunSummary) -> Vec<(Category, u64)> {
    let mut counts: Vec<_> = summary
        .emitted_by_category
        .iter()
        .map(|(c, n)| (*c, *n))
        .collect();
    counts.sort();
    counts
}
