//! Query execution for the lookup tool

use crate::Cli;
use ntstatus_registry::catalog::GROUPS;
use ntstatus_registry::logging::{codes, Code};
use ntstatus_registry::{log_error, log_success, log_warning};
use ntstatus_registry::{
    ErrorCodeEntry, ErrorCodeRegistry, NtStatus, RegistryError, RenderMode, Renderer, Severity,
    ValidationReport,
};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Failed to serialize results: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write results: {0}")]
    Io(#[from] std::io::Error),
}

impl LookupError {
    pub fn error_code(&self) -> Code {
        match self {
            LookupError::Registry(err) => err.error_code(),
            LookupError::Json(_) => codes::output::SERIALIZATION_FAILURE,
            LookupError::Io(_) => codes::output::WRITE_FAILURE,
        }
    }
}

/// Tally of one run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub queries: usize,
    pub failed: usize,
}

impl Outcome {
    pub fn all_matched(&self) -> bool {
        self.failed == 0
    }
}

// ============================================================================
// JSON shapes
// ============================================================================

#[derive(Debug, Default, Serialize)]
struct JsonOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    validation: Option<ValidationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entries: Option<&'static [ErrorCodeEntry]>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    results: Vec<QueryReport<'a>>,
}

#[derive(Debug, Serialize)]
struct QueryReport<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<StatusFields>,
    matches: Vec<&'static ErrorCodeEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatusFields {
    value: u32,
    hex: String,
    severity: Severity,
    facility: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    facility_name: Option<&'static str>,
    code: u16,
    customer: bool,
}

impl StatusFields {
    fn new(status: NtStatus, renderer: &Renderer) -> Self {
        Self {
            value: status.value(),
            hex: renderer.hex(status.value()),
            severity: status.severity(),
            facility: status.facility().value(),
            facility_name: status.facility().name(),
            code: status.code(),
            customer: status.is_customer(),
        }
    }
}

// ============================================================================
// Execution
// ============================================================================

pub fn run<W: Write, E: Write>(
    cli: &Cli,
    registry: &ErrorCodeRegistry,
    renderer: &Renderer,
    out: &mut W,
    err: &mut E,
) -> Result<Outcome, LookupError> {
    let mut outcome = Outcome::default();
    let mut json = JsonOutput::default();

    if cli.validate {
        outcome.queries += 1;
        match registry.validate() {
            Ok(report) if cli.json => json.validation = Some(report),
            Ok(report) => writeln!(out, "Catalog valid: {}", report.summary())?,
            Err(e) => {
                outcome.failed += 1;
                if cli.json {
                    json.validation_error = Some(e.to_string());
                } else {
                    writeln!(err, "Catalog invalid: {}", e)?;
                }
            }
        }
    }

    if cli.list {
        if cli.json {
            json.entries = Some(registry.entries());
        } else {
            write_listing(renderer, out)?;
        }
    }

    for text in &cli.values {
        outcome.queries += 1;
        let report = match text.parse::<NtStatus>() {
            Ok(status) => {
                let matches = select(registry, status.value(), renderer.mode());
                if matches.is_empty() {
                    outcome.failed += 1;
                    log_warning!(
                        codes::warnings::UNKNOWN_STATUS,
                        "Status value has no catalog entry",
                        "value" => status
                    );
                }
                if !cli.json {
                    for line in renderer.render(registry, status.value()) {
                        writeln!(out, "{}", line)?;
                    }
                }
                QueryReport {
                    query: text,
                    status: Some(StatusFields::new(status, renderer)),
                    matches,
                    error: None,
                }
            }
            Err(e) => {
                outcome.failed += 1;
                log_error!(e.error_code(), "Rejected status value", "input" => text, "reason" => &e);
                if !cli.json {
                    writeln!(err, "error: {}", e)?;
                }
                QueryReport {
                    query: text,
                    status: None,
                    matches: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        };
        json.results.push(report);
    }

    for name in &cli.names {
        outcome.queries += 1;
        let found = registry.find_by_name(name);
        match found {
            Some(entry) if !cli.json => writeln!(out, "{}", renderer.describe_entry(entry))?,
            Some(_) => {}
            None => {
                outcome.failed += 1;
                log_warning!(
                    codes::warnings::UNKNOWN_NAME,
                    "Symbolic name has no catalog entry",
                    "name" => name
                );
                if !cli.json {
                    writeln!(err, "Unknown NTSTATUS name '{}'", name)?;
                }
            }
        }
        json.results.push(QueryReport {
            query: name,
            status: found.map(|entry| StatusFields::new(entry.status(), renderer)),
            matches: found.into_iter().collect(),
            error: None,
        });
    }

    if cli.json {
        serde_json::to_writer_pretty(&mut *out, &json)?;
        writeln!(out)?;
    }

    log_success!(
        codes::success::LOOKUP_COMPLETED,
        "Lookup completed",
        "queries" => outcome.queries,
        "failed" => outcome.failed
    );

    Ok(outcome)
}

fn select(
    registry: &ErrorCodeRegistry,
    value: u32,
    mode: RenderMode,
) -> Vec<&'static ErrorCodeEntry> {
    match mode {
        RenderMode::Primary => registry.primary(value).into_iter().collect(),
        RenderMode::AllAliases => registry.find_by_value(value),
    }
}

fn write_listing<W: Write>(renderer: &Renderer, out: &mut W) -> Result<(), LookupError> {
    for (index, group) in GROUPS.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        writeln!(out, "# {}", group.title())?;
        for entry in group.entries() {
            writeln!(out, "{}", renderer.describe_entry(entry))?;
        }
    }
    Ok(())
}
