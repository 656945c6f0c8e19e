//! Catalog entry record

use crate::ntstatus::NtStatus;
use serde::Serialize;
use std::fmt;

/// One (name, value, description) record of the NTSTATUS catalog.
///
/// Entries are built as literal data by `build.rs` and never change after
/// construction. The description is kept verbatim: message placeholders such
/// as `%hs` or `%1` are plain text here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorCodeEntry {
    name: &'static str,
    value: u32,
    description: &'static str,
}

impl ErrorCodeEntry {
    pub const fn new(name: &'static str, value: u32, description: &'static str) -> Self {
        Self {
            name,
            value,
            description,
        }
    }

    /// Symbolic name, e.g. `STATUS_ACCESS_VIOLATION`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Raw 32-bit status value
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Decoded view of the value
    pub fn status(&self) -> NtStatus {
        NtStatus::new(self.value)
    }

    /// Whether the description carries printf/FormatMessage style placeholders
    pub fn has_placeholders(&self) -> bool {
        let bytes = self.description.as_bytes();
        bytes
            .windows(2)
            .any(|pair| pair[0] == b'%' && pair[1].is_ascii_alphanumeric())
    }
}

impl fmt::Display for ErrorCodeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:08X})", self.name, self.value)
    }
}
