//! Logging macros
//!
//! Context values may be any `Display` type:
//!
//! ```ignore
//! log_warning!(codes::warnings::UNKNOWN_STATUS, "No catalog entry", "value" => status);
//! ```

/// Format `key => value` pairs into owned strings and hand borrowed pairs to `$sink`
#[doc(hidden)]
#[macro_export]
macro_rules! __with_context {
    ($sink:expr, $($key:expr => $value:expr),+) => {{
        let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
        let context_refs: Vec<(&str, &str)> = context_strings
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .collect();
        $sink(context_refs)
    }};
}

#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::log_error_with_context($code, $message, vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        $crate::__with_context!(
            |context| $crate::logging::log_error_with_context($code, $message, context),
            $($key => $value),+
        )
    };
}

#[macro_export]
macro_rules! log_warning {
    ($code:expr, $message:expr) => {
        $crate::logging::log_warning_with_context($code, $message, vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        $crate::__with_context!(
            |context| $crate::logging::log_warning_with_context($code, $message, context),
            $($key => $value),+
        )
    };
}

#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::log_success_with_context($code, $message, vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        $crate::__with_context!(
            |context| $crate::logging::log_success_with_context($code, $message, context),
            $($key => $value),+
        )
    };
}

#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        $crate::logging::log_info_with_context($message, vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        $crate::__with_context!(
            |context| $crate::logging::log_info_with_context($message, context),
            $($key => $value),+
        )
    };
}

/// Only formats its arguments when debug output is enabled
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => {
        if $crate::logging::config::get_min_log_level() >= $crate::logging::LogLevel::Debug {
            if let Some(logger) = $crate::logging::try_get_global_logger() {
                logger.log_debug(&format!($($arg)+));
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;

    #[test]
    fn test_macro_forms_expand() {
        // Every arm must expand; events go nowhere unless a logger is installed
        log_error!(codes::input::INVALID_INPUT, "Bad input");
        log_error!(codes::input::INVALID_INPUT, "Bad input", "input" => "0xZZ", "position" => 2);
        log_warning!(codes::warnings::UNKNOWN_STATUS, "No entry", "value" => format!("0x{:08X}", 0xFFFF_FFFFu32));
        log_success!(codes::success::VALIDATION_PASSED, "Valid", "entries" => 3usize);
        log_info!("Lookup", "count" => 1);
        log_debug!("debug {}", 1);
    }
}
