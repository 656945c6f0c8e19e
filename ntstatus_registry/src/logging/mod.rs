//! Logging for the registry and its tools
//!
//! A process-wide `LoggingService` is installed once with
//! `init_global_logging`. Until then every logging call is a no-op, so the
//! library stays silent for callers that never opt in.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, NullLogger, StructuredLogger};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Install the service described by the `NTSTATUS_LOGGING_*` preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    for code in [
        codes::input::INVALID_INPUT,
        codes::catalog::DUPLICATE_NAME,
        codes::warnings::UNKNOWN_STATUS,
        codes::success::REGISTRY_LOADED,
    ] {
        if codes::get_code_metadata(code.as_str()).is_none() {
            return Err(format!("Missing metadata for code: {}", code));
        }
    }

    let logging_service = Arc::new(service::create_configured_service());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized")?;

    logging_service.log_event(
        LogEvent::success(
            codes::success::LOGGING_INITIALIZED,
            "Global logging system initialized",
        )
        .with_context("min_level", logging_service.min_level().as_str()),
    );

    Ok(())
}

/// Install a caller-built service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// MACRO BACKENDS
// ============================================================================

pub fn log_error_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_error_with_context(code, message, context);
    }
}

pub fn log_warning_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_warning_with_context(code, message, context);
    }
}

pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_success_with_context(code, message, context);
    }
}

pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    if let Some(logger) = try_get_global_logger() {
        let event = context
            .into_iter()
            .fold(LogEvent::info(message), |event, (key, value)| {
                event.with_context(key, value)
            });
        logger.log_event(event);
    }
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

pub fn get_system_diagnostics() -> String {
    let mut diagnostics = String::new();

    diagnostics.push_str("=== Logging System Diagnostics ===\n");
    diagnostics.push_str(&format!("Initialized: {}\n", is_initialized()));
    if let Some(logger) = try_get_global_logger() {
        diagnostics.push_str(&format!("Active level: {}\n", logger.min_level().as_str()));
    }
    diagnostics.push_str(&format!("Known codes: {}\n", codes::all_codes().join(", ")));
    diagnostics.push('\n');
    diagnostics.push_str(&config::get_config_summary());

    diagnostics
}

/// Log through the global service, or straight to stderr when none is installed
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_error(code, message);
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}
