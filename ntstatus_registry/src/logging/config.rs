//! Logging configuration
//!
//! Preferences can be installed once at startup; until then they are read
//! from the environment on each call.

use super::events::LogLevel;
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    validate_preferences(&preferences)?;

    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized")?;

    Ok(())
}

fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

fn validate_preferences(preferences: &LoggingPreferences) -> Result<(), String> {
    if !preferences.enable_console_logging && preferences.use_structured_logging {
        return Err(
            "Structured logging requested with console logging disabled".to_string(),
        );
    }

    Ok(())
}

pub fn get_min_log_level() -> LogLevel {
    get_runtime_preferences().min_log_level
}

pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}

pub fn validate_config() -> Result<(), String> {
    validate_preferences(&get_runtime_preferences())
}

pub fn get_config_summary() -> String {
    let preferences = get_runtime_preferences();

    format!(
        "Logging Configuration:\n\
         - Min log level: {}\n\
         - Structured logging: {}\n\
         - Console logging: {}\n\
         - Catalog: {}",
        preferences.min_log_level.as_str(),
        preferences.use_structured_logging,
        preferences.enable_console_logging,
        crate::config::build_info::source_info(),
    )
}

pub fn get_development_preferences() -> LoggingPreferences {
    LoggingPreferences {
        min_log_level: LogLevel::Debug,
        use_structured_logging: false,
        enable_console_logging: true,
    }
}

pub fn get_production_preferences() -> LoggingPreferences {
    LoggingPreferences {
        min_log_level: LogLevel::Warning,
        use_structured_logging: true,
        enable_console_logging: true,
    }
}
