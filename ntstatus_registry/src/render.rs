//! Human-readable descriptions of status values

use crate::config::runtime::RenderPreferences;
use crate::entry::ErrorCodeEntry;
use crate::ntstatus::NtStatus;
use crate::registry::ErrorCodeRegistry;
use serde::{Deserialize, Serialize};

/// How many names to print for a value carried by several entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    /// Only the first declared entry
    #[default]
    Primary,
    /// Every entry for the value, in declaration order
    AllAliases,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Renderer {
    mode: RenderMode,
    lowercase_hex: bool,
}

impl Renderer {
    pub fn new(mode: RenderMode, lowercase_hex: bool) -> Self {
        Self {
            mode,
            lowercase_hex,
        }
    }

    pub fn from_preferences(preferences: &RenderPreferences) -> Self {
        let mode = if preferences.show_all_aliases {
            RenderMode::AllAliases
        } else {
            RenderMode::Primary
        };
        Self::new(mode, preferences.lowercase_hex)
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn hex(&self, value: u32) -> String {
        if self.lowercase_hex {
            format!("0x{:08x}", value)
        } else {
            format!("0x{:08X}", value)
        }
    }

    /// `NAME (0xXXXXXXXX): description`
    pub fn describe_entry(&self, entry: &ErrorCodeEntry) -> String {
        format!(
            "{} ({}): {}",
            entry.name(),
            self.hex(entry.value()),
            entry.description()
        )
    }

    /// Fallback for a value with no catalog entry, decoded from its bit fields
    pub fn describe_unknown(&self, value: u32) -> String {
        let status = NtStatus::new(value);
        let facility = status.facility();
        let facility_text = match facility.name() {
            Some(name) => format!("facility {} 0x{:03X}", name, facility.value()),
            None => format!("facility 0x{:03X}", facility.value()),
        };
        let mut text = format!(
            "Unknown NTSTATUS {} ({}, {}, code 0x{:04X}",
            self.hex(value),
            status.severity(),
            facility_text,
            status.code()
        );
        if status.is_customer() {
            text.push_str(", customer");
        }
        text.push(')');
        text
    }

    /// Lines for `value` according to the render mode
    pub fn render(&self, registry: &ErrorCodeRegistry, value: u32) -> Vec<String> {
        let matches: Vec<&ErrorCodeEntry> = match self.mode {
            RenderMode::Primary => registry.primary(value).into_iter().collect(),
            RenderMode::AllAliases => registry.find_by_value(value),
        };

        if matches.is_empty() {
            vec![self.describe_unknown(value)]
        } else {
            matches
                .into_iter()
                .map(|entry| self.describe_entry(entry))
                .collect()
        }
    }
}

/// One line for `value`: its primary entry, or the decoded fallback
pub fn describe(registry: &ErrorCodeRegistry, value: u32) -> String {
    let renderer = Renderer::default();
    match registry.primary(value) {
        Some(entry) => renderer.describe_entry(entry),
        None => renderer.describe_unknown(value),
    }
}

/// One line per alias of `value`, or the decoded fallback
pub fn describe_all(registry: &ErrorCodeRegistry, value: u32) -> Vec<String> {
    Renderer::default()
        .with_mode(RenderMode::AllAliases)
        .render(registry, value)
}
