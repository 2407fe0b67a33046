// AmfDigest - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// The classification core is infallible; every variant here belongs to the
// I/O and configuration layers around it.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all AmfDigest operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum AmfDigestError {
    /// Reading the trace input failed.
    Input(InputError),

    /// Writing the event stream failed.
    Output(OutputError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for AmfDigestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(e) => write!(f, "Input error: {e}"),
            Self::Output(e) => write!(f, "Output error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for AmfDigestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Input(e) => Some(e),
            Self::Output(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

impl AmfDigestError {
    /// True when the downstream reader went away (e.g. `amfdigest trace.log | head`).
    /// The run is treated as a normal end of stream rather than a failure.
    pub fn is_broken_pipe(&self) -> bool {
        match self {
            Self::Output(OutputError::Io { source }) => source.kind() == io::ErrorKind::BrokenPipe,
            Self::Output(OutputError::Csv { source }) => match source.kind() {
                csv::ErrorKind::Io(e) => e.kind() == io::ErrorKind::BrokenPipe,
                _ => false,
            },
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

/// Errors related to acquiring trace lines.
#[derive(Debug)]
pub enum InputError {
    /// The input file could not be opened.
    Open { path: PathBuf, source: io::Error },

    /// Reading from the input stream failed part-way through.
    Read { line_number: u64, source: io::Error },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open '{}': {source}", path.display())
            }
            Self::Read {
                line_number,
                source,
            } => write!(f, "read failed at line {line_number}: {source}"),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Read { source, .. } => Some(source),
        }
    }
}

impl From<InputError> for AmfDigestError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

// ---------------------------------------------------------------------------
// Output errors
// ---------------------------------------------------------------------------

/// Errors related to writing emitted events.
#[derive(Debug)]
pub enum OutputError {
    /// I/O error writing or flushing the sink.
    Io { source: io::Error },

    /// CSV serialisation error.
    Csv { source: csv::Error },

    /// JSON serialisation error.
    Json { source: serde_json::Error },
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { source } => write!(f, "write failed: {source}"),
            Self::Csv { source } => write!(f, "CSV output failed: {source}"),
            Self::Json { source } => write!(f, "JSON output failed: {source}"),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source } => Some(source),
            Self::Csv { source } => Some(source),
            Self::Json { source } => Some(source),
        }
    }
}

impl From<OutputError> for AmfDigestError {
    fn from(e: OutputError) -> Self {
        Self::Output(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for AmfDigestError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for AmfDigest results.
pub type Result<T> = std::result::Result<T, AmfDigestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_open_error_display_names_path() {
        let err: AmfDigestError = InputError::Open {
            path: PathBuf::from("/nope/amf.log"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        }
        .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Input error: cannot open '"), "{msg}");
        assert!(msg.contains("amf.log"), "{msg}");
        assert!(err.source().is_some(), "chain should expose InputError");
    }

    #[test]
    fn test_broken_pipe_detected_on_io_output() {
        let err: AmfDigestError = OutputError::Io {
            source: io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"),
        }
        .into();
        assert!(err.is_broken_pipe());
    }

    #[test]
    fn test_other_io_output_is_not_broken_pipe() {
        let err: AmfDigestError = OutputError::Io {
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        }
        .into();
        assert!(!err.is_broken_pipe());
    }

    #[test]
    fn test_config_out_of_range_has_no_source() {
        let err = ConfigError::ValueOutOfRange {
            field: "[output] format".to_string(),
            value: "xml".to_string(),
            expected: "text, json, csv".to_string(),
        };
        assert!(err.source().is_none());
        assert!(err.to_string().contains("xml"));
    }
}
