// RUNTIME PREFERENCES
//
// Read from the environment once, when a preference struct is defaulted.
// Malformed values fall back to the built-in default.

use crate::logging::events::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Least important level that still gets written
    pub min_log_level: LogLevel,

    /// Emit one JSON object per event instead of plain lines
    pub use_structured_logging: bool,

    /// Write events to stderr at all
    pub enable_console_logging: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| LogLevel::parse(&v))
                .unwrap_or(LogLevel::Warning),
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderPreferences {
    /// Print every alias of a value instead of only the first declared name
    pub show_all_aliases: bool,

    /// Print hex digits in lower case
    pub lowercase_hex: bool,
}

impl Default for RenderPreferences {
    fn default() -> Self {
        Self {
            show_all_aliases: env::var(env_vars::RENDER_ALL_ALIASES)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            lowercase_hex: env::var(env_vars::RENDER_LOWERCASE_HEX)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub logging: LoggingPreferences,
    pub render: RenderPreferences,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::default()
    }
}

pub mod env_vars {
    pub const LOGGING_MIN_LEVEL: &str = "NTSTATUS_LOGGING_MIN_LEVEL";
    pub const LOGGING_USE_STRUCTURED: &str = "NTSTATUS_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "NTSTATUS_LOGGING_ENABLE_CONSOLE";
    pub const RENDER_ALL_ALIASES: &str = "NTSTATUS_RENDER_ALL_ALIASES";
    pub const RENDER_LOWERCASE_HEX: &str = "NTSTATUS_RENDER_LOWERCASE_HEX";

    pub const ALL: [&str; 5] = [
        LOGGING_MIN_LEVEL,
        LOGGING_USE_STRUCTURED,
        LOGGING_ENABLE_CONSOLE,
        RENDER_ALL_ALIASES,
        RENDER_LOWERCASE_HEX,
    ];
}
