use clap::{ArgGroup, Parser};
use ntstatus_registry::config::runtime::RuntimeConfig;
use ntstatus_registry::logging::{self, codes};
use ntstatus_registry::{ErrorCodeRegistry, RenderMode, Renderer};
use std::io;
use std::process::ExitCode;

mod lookup;

/// NTSTATUS lookup tool
///
/// Resolves raw Windows NTSTATUS values to their symbolic names and
/// descriptions, and symbolic names back to values. Values the catalog does
/// not know are decoded from their severity, facility and code fields.
#[derive(Parser, Debug)]
#[command(name = "ntstatus-lookup", version, about)]
#[command(group(
    ArgGroup::new("query")
        .required(true)
        .multiple(true)
        .args(["values", "names", "list", "validate"])
))]
pub struct Cli {
    /// Status values as 0x-prefixed hex or decimal (e.g. 0xC0000005, 3221225477).
    #[arg(value_name = "VALUE")]
    pub values: Vec<String>,

    /// Symbolic name to look up, e.g. STATUS_ACCESS_DENIED. Repeatable.
    #[arg(long = "name", value_name = "NAME")]
    pub names: Vec<String>,

    /// Print every name carrying a value instead of only the first declared one.
    #[arg(long, default_value_t = false)]
    pub all: bool,

    /// Emit results as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Print the whole catalog.
    #[arg(long, default_value_t = false)]
    pub list: bool,

    /// Check the catalog for duplicate names and print a summary.
    #[arg(long, default_value_t = false)]
    pub validate: bool,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = RuntimeConfig::from_env();
    install_logging(&config);

    let mut renderer = Renderer::from_preferences(&config.render);
    if cli.all {
        renderer = renderer.with_mode(RenderMode::AllAliases);
    }

    let registry = ErrorCodeRegistry::global();
    let stdout = io::stdout();
    let stderr = io::stderr();

    let outcome = lookup::run(
        &cli,
        registry,
        &renderer,
        &mut stdout.lock(),
        &mut stderr.lock(),
    )
    .map_err(|e| {
        logging::safe_log_error(e.error_code(), &e.to_string());
        e
    })?;

    if outcome.all_matched() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

/// Install logging from the `NTSTATUS_LOGGING_*` preferences.
///
/// A rejected logging setup is reported on stderr and the lookup carries on
/// without logging. Returns whether the global logger is now installed.
fn install_logging(config: &RuntimeConfig) -> bool {
    let installed = logging::config::init_runtime_preferences(config.logging.clone())
        .and_then(|()| logging::init_global_logging());

    match installed {
        Ok(()) => true,
        Err(e) => {
            logging::safe_log_error(
                codes::system::INITIALIZATION_FAILURE,
                &format!("Logging disabled: {}", e),
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_values() {
        let cli = Cli::try_parse_from(["ntstatus-lookup", "0xC0000005", "259"]).unwrap();
        assert_eq!(cli.values, ["0xC0000005", "259"]);
        assert!(!cli.all);
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "ntstatus-lookup",
            "--name",
            "STATUS_SUCCESS",
            "--name",
            "STATUS_PENDING",
            "--all",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.names, ["STATUS_SUCCESS", "STATUS_PENDING"]);
        assert!(cli.values.is_empty());
        assert!(cli.all);
        assert!(cli.json);

        let cli = Cli::try_parse_from(["ntstatus-lookup", "--list", "--validate"]).unwrap();
        assert!(cli.list);
        assert!(cli.validate);
    }

    #[test]
    fn test_query_required() {
        let err = Cli::try_parse_from(["ntstatus-lookup"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = Cli::try_parse_from(["ntstatus-lookup", "--all"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_rejected_logging_setup_is_not_fatal() {
        let mut config = RuntimeConfig::default();
        config.logging.use_structured_logging = true;
        config.logging.enable_console_logging = false;

        assert!(!install_logging(&config));
        assert!(!logging::is_initialized());

        // Lookups still run with logging switched off
        let cli = Cli::try_parse_from(["ntstatus-lookup", "0xC0000005"]).unwrap();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let outcome = lookup::run(
            &cli,
            ErrorCodeRegistry::global(),
            &Renderer::default(),
            &mut out,
            &mut err,
        )
        .unwrap();
        assert!(outcome.all_matched());
        assert!(String::from_utf8(out).unwrap().starts_with("STATUS_ACCESS_VIOLATION"));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let err = Cli::try_parse_from(["ntstatus-lookup", "--bogus", "1"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
