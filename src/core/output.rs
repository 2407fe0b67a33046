// AmfDigest - core/output.rs
//
// Streaming writers for emitted events: plain text (the canonical format),
// JSON Lines, and CSV.
// Core layer: writes to any Write trait object.

use crate::core::emitter::{format_line, resolve_timestamp, Clock};
use crate::core::model::{Category, Event};
use crate::util::constants::CSV_HEADER;
use crate::util::error::OutputError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;

/// Output encoding of the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `[<timestamp>] <label>` per line.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
    /// Header row, then one record per event.
    Csv,
}

impl OutputFormat {
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Text, OutputFormat::Json, OutputFormat::Csv]
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::all()
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown output format '{s}' (expected text, json, or csv)"))
    }
}

/// Serialised shape of one event in JSON output.
#[derive(Debug, Serialize)]
struct EventRecord<'a> {
    timestamp: String,
    category: Category,
    label: &'a str,
    line_number: u64,
}

enum Sink<W: Write> {
    Text(W),
    Json(W),
    Csv(csv::Writer<W>),
}

/// Writes emitted events to `W` in the chosen format.
///
/// Every event is flushed through to `W` as soon as it is written, so a live
/// trace (`tail -f`) shows each event before the next input line arrives.
pub struct EventWriter<W: Write> {
    sink: Sink<W>,
}

impl<W: Write> EventWriter<W> {
    /// Wrap `writer`. For CSV the header row is written immediately.
    pub fn new(writer: W, format: OutputFormat) -> Result<Self, OutputError> {
        let sink = match format {
            OutputFormat::Text => Sink::Text(writer),
            OutputFormat::Json => Sink::Json(writer),
            OutputFormat::Csv => {
                let mut csv_writer = csv::Writer::from_writer(writer);
                csv_writer
                    .write_record(CSV_HEADER)
                    .map_err(|e| OutputError::Csv { source: e })?;
                csv_writer
                    .flush()
                    .map_err(|e| OutputError::Io { source: e })?;
                Sink::Csv(csv_writer)
            }
        };
        Ok(Self { sink })
    }

    /// Write one emitted event, resolving a missing timestamp from `clock`,
    /// and flush it.
    pub fn write_event(&mut self, event: &Event, clock: &dyn Clock) -> Result<(), OutputError> {
        match &mut self.sink {
            Sink::Text(w) => {
                writeln!(w, "{}", format_line(event, clock))
                    .and_then(|()| w.flush())
                    .map_err(|e| OutputError::Io { source: e })?;
            }
            Sink::Json(w) => {
                let record = EventRecord {
                    timestamp: resolve_timestamp(event, clock),
                    category: event.category,
                    label: &event.label,
                    line_number: event.line_number,
                };
                let json =
                    serde_json::to_string(&record).map_err(|e| OutputError::Json { source: e })?;
                writeln!(w, "{json}")
                    .and_then(|()| w.flush())
                    .map_err(|e| OutputError::Io { source: e })?;
            }
            Sink::Csv(w) => {
                let ts = resolve_timestamp(event, clock);
                let line = event.line_number.to_string();
                w.write_record([
                    ts.as_str(),
                    event.category.key(),
                    event.label.as_str(),
                    line.as_str(),
                ])
                .map_err(|e| OutputError::Csv { source: e })?;
                w.flush().map_err(|e| OutputError::Io { source: e })?;
            }
        }
        Ok(())
    }

    /// Flush buffered output and hand back the underlying writer.
    pub fn finish(self) -> Result<W, OutputError> {
        match self.sink {
            Sink::Text(mut w) | Sink::Json(mut w) => {
                w.flush().map_err(|e| OutputError::Io { source: e })?;
                Ok(w)
            }
            Sink::Csv(w) => w.into_inner().map_err(|e| OutputError::Io {
                source: e.into_error(),
            }),
        }
    }
}
