// AmfDigest - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "AmfDigest";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "AmfDigest";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Event formatting
// =============================================================================

/// chrono format used for the wall-clock fallback when a line carries no
/// bracketed timestamp prefix. Second precision, no fractional part.
pub const FALLBACK_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Separator between a label's category and its detail.
pub const LABEL_SEPARATOR: &str = " | ";

/// CSV header row for `--format csv`. Column names match the JSON keys.
pub const CSV_HEADER: [&str; 4] = ["timestamp", "category", "label", "line_number"];

// =============================================================================
// Input
// =============================================================================

/// Capacity of the buffered reader wrapped around the input source.
pub const INPUT_BUFFER_SIZE: usize = 64 * 1024; // 64 KB

// =============================================================================
// Logging
// =============================================================================

/// Default log level. Diagnostics go to stderr; only warnings by default so a
/// piped event stream stays quiet on the terminal.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Maximum length of a log line included in trace output.
/// Subscriber identifiers appear in raw lines, so previews stay short.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
