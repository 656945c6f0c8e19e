//! Log event codes and their metadata
//!
//! Every code a `LogEvent` can carry is declared here together with its
//! category, impact and recommended action.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Code attached to every log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// How much an event matters to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Impact {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Critical => "Critical",
            Impact::High => "High",
            Impact::Medium => "Medium",
            Impact::Low => "Low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Critical" => Some(Impact::Critical),
            "High" => Some(Impact::High),
            "Medium" => Some(Impact::Medium),
            "Low" => Some(Impact::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub impact: Impact,
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl CodeMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        impact: Impact,
        recoverable: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            impact,
            recoverable,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

pub mod input {
    use super::Code;

    pub const INVALID_INPUT: Code = Code::new("E010");
    pub const OUT_OF_RANGE: Code = Code::new("E011");
}

pub mod catalog {
    use super::Code;

    pub const DUPLICATE_NAME: Code = Code::new("E020");
}

pub mod output {
    use super::Code;

    pub const SERIALIZATION_FAILURE: Code = Code::new("E030");
    pub const WRITE_FAILURE: Code = Code::new("E031");
}

pub mod warnings {
    use super::Code;

    pub const UNKNOWN_STATUS: Code = Code::new("W001");
    pub const UNKNOWN_NAME: Code = Code::new("W002");
}

pub mod success {
    use super::Code;

    pub const REGISTRY_LOADED: Code = Code::new("I001");
    pub const VALIDATION_PASSED: Code = Code::new("I002");
    pub const LOGGING_INITIALIZED: Code = Code::new("I003");
    pub const LOOKUP_COMPLETED: Code = Code::new("I004");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static CODE_REGISTRY: OnceLock<HashMap<&'static str, CodeMetadata>> = OnceLock::new();

fn get_code_registry() -> &'static HashMap<&'static str, CodeMetadata> {
    CODE_REGISTRY.get_or_init(|| {
        let mut registry = HashMap::new();

        // System
        registry.insert(
            "ERR001",
            CodeMetadata::new(
                "ERR001",
                "System",
                Impact::Critical,
                false,
                "Internal registry error",
                "Report the failure with the command line that triggered it",
            ),
        );
        registry.insert(
            "ERR002",
            CodeMetadata::new(
                "ERR002",
                "System",
                Impact::Critical,
                false,
                "Logging or configuration could not be initialized",
                "Check the NTSTATUS_LOGGING_* environment variables",
            ),
        );

        // Input
        registry.insert(
            "E010",
            CodeMetadata::new(
                "E010",
                "Input",
                Impact::Medium,
                true,
                "Status text is not a valid hex or decimal number",
                "Pass a 0x-prefixed hex value or a plain decimal value",
            ),
        );
        registry.insert(
            "E011",
            CodeMetadata::new(
                "E011",
                "Input",
                Impact::Medium,
                true,
                "Status value does not fit in 32 bits",
                "Pass a value in the range 0..=0xFFFFFFFF",
            ),
        );

        // Catalog
        registry.insert(
            "E020",
            CodeMetadata::new(
                "E020",
                "Catalog",
                Impact::High,
                false,
                "Two catalog entries share one name",
                "Rename or remove one of the entries in the catalog file",
            ),
        );

        // Output
        registry.insert(
            "E030",
            CodeMetadata::new(
                "E030",
                "Output",
                Impact::High,
                false,
                "Lookup results could not be serialized",
                "Retry without --json and report the failure",
            ),
        );
        registry.insert(
            "E031",
            CodeMetadata::new(
                "E031",
                "Output",
                Impact::High,
                false,
                "Lookup results could not be written",
                "Check that standard output is still open",
            ),
        );

        // Warnings
        registry.insert(
            "W001",
            CodeMetadata::new(
                "W001",
                "Lookup",
                Impact::Low,
                true,
                "Status value has no catalog entry",
                "The value is decoded from its bit fields only",
            ),
        );
        registry.insert(
            "W002",
            CodeMetadata::new(
                "W002",
                "Lookup",
                Impact::Low,
                true,
                "Symbolic name has no catalog entry",
                "Check the spelling; names are matched exactly",
            ),
        );

        // Informational
        registry.insert(
            "I001",
            CodeMetadata::new(
                "I001",
                "Registry",
                Impact::Low,
                true,
                "Registry loaded from the generated catalog",
                "No action required",
            ),
        );
        registry.insert(
            "I002",
            CodeMetadata::new(
                "I002",
                "Registry",
                Impact::Low,
                true,
                "Registry validation passed",
                "No action required",
            ),
        );
        registry.insert(
            "I003",
            CodeMetadata::new(
                "I003",
                "System",
                Impact::Low,
                true,
                "Logging initialized",
                "No action required",
            ),
        );
        registry.insert(
            "I004",
            CodeMetadata::new(
                "I004",
                "Lookup",
                Impact::Low,
                true,
                "Lookup completed",
                "No action required",
            ),
        );

        registry
    })
}

// ============================================================================
// ACCESSORS
// ============================================================================

pub fn get_code_metadata(code: &str) -> Option<&'static CodeMetadata> {
    get_code_registry().get(code)
}

pub fn get_impact(code: &str) -> Impact {
    get_code_metadata(code)
        .map(|meta| meta.impact)
        .unwrap_or(Impact::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_code_metadata(code)
        .map(|meta| meta.recoverable)
        .unwrap_or(true)
}

pub fn get_description(code: &str) -> &'static str {
    get_code_metadata(code)
        .map(|meta| meta.description)
        .unwrap_or("Unknown code")
}

pub fn get_action(code: &str) -> &'static str {
    get_code_metadata(code)
        .map(|meta| meta.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_code_metadata(code)
        .map(|meta| meta.category)
        .unwrap_or("Unknown")
}

/// Every declared code, for startup checks
pub fn all_codes() -> Vec<&'static str> {
    let mut codes: Vec<&'static str> = get_code_registry().keys().copied().collect();
    codes.sort_unstable();
    codes
}
