// AmfDigest - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::output::OutputFormat;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for AmfDigest configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/amfdigest/ or %APPDATA%\AmfDigest\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Full path of the config file inside `config_dir`.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[logging]` section.
    pub logging: LoggingSection,
    /// `[output]` section.
    pub output: OutputSection,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// `[output]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Event stream format: "text", "json", "csv".
    pub format: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Default output format when `--format` is not given.
    pub output_format: OutputFormat,
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal
/// problems. A missing file yields defaults with no problems (first run).
/// An unreadable or unparseable file yields defaults plus one problem; each
/// invalid value is replaced by its default and reported.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<ConfigError>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);
    let mut problems: Vec<ConfigError> = Vec::new();

    if !config_path.exists() {
        return (AppConfig::default(), problems);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            problems.push(ConfigError::Io {
                path: config_path,
                source: e,
            });
            return (AppConfig::default(), problems);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            problems.push(ConfigError::TomlParse {
                path: config_path,
                source: e,
            });
            return (AppConfig::default(), problems);
        }
    };

    let (config, value_problems) = validate(raw);
    problems.extend(value_problems);
    (config, problems)
}

/// Check each raw value, keeping valid ones and reporting the rest.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<ConfigError>) {
    let mut config = AppConfig::default();
    let mut problems = Vec::new();

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        let lowered = level.to_lowercase();
        if constants::VALID_LOG_LEVELS.contains(&lowered.as_str()) {
            config.log_level = Some(lowered);
        } else {
            problems.push(ConfigError::ValueOutOfRange {
                field: "[logging] level".to_string(),
                value: level,
                expected: constants::VALID_LOG_LEVELS.join(", "),
            });
        }
    }

    // -- Output: format --
    if let Some(format) = raw.output.format {
        match format.parse::<OutputFormat>() {
            Ok(f) => config.output_format = f,
            Err(_) => problems.push(ConfigError::ValueOutOfRange {
                field: "[output] format".to_string(),
                value: format,
                expected: OutputFormat::all()
                    .iter()
                    .map(|f| f.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    (config, problems)
}
