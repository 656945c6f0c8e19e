//! NTSTATUS registry and lookups
//!
//! A registry is a read-only view over a static slice of entries. Queries
//! scan in declaration order, so a value shared by several names always
//! comes back in the same order, and the first declared name is the primary
//! one. Queries never log; `validate` and the first use of `global` do.

use crate::catalog;
use crate::entry::ErrorCodeEntry;
use crate::error::RegistryError;
use crate::logging::codes;
use crate::ntstatus::{NtStatus, Severity};
use crate::{log_error, log_success};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

static GLOBAL_REGISTRY: OnceLock<ErrorCodeRegistry> = OnceLock::new();

pub struct ErrorCodeRegistry {
    entries: &'static [ErrorCodeEntry],
    name_index: OnceLock<HashMap<&'static str, usize>>,
}

impl ErrorCodeRegistry {
    pub const fn new(entries: &'static [ErrorCodeEntry]) -> Self {
        Self {
            entries,
            name_index: OnceLock::new(),
        }
    }

    /// Registry over the generated catalog, built on first use
    pub fn global() -> &'static ErrorCodeRegistry {
        GLOBAL_REGISTRY.get_or_init(|| {
            let registry = Self::new(catalog::ENTRIES);
            log_success!(
                codes::success::REGISTRY_LOADED,
                "NTSTATUS registry loaded",
                "entries" => registry.len(),
                "source" => catalog::CATALOG_SOURCE
            );
            registry
        })
    }

    // ========================================================================
    // Value lookups
    // ========================================================================

    /// Every entry whose value equals `value`, in declaration order.
    /// An unknown value yields an empty list.
    pub fn find_by_value(&self, value: u32) -> Vec<&'static ErrorCodeEntry> {
        let entries: &'static [ErrorCodeEntry] = self.entries;
        entries.iter().filter(|entry| entry.value() == value).collect()
    }

    pub fn find_status(&self, status: NtStatus) -> Vec<&'static ErrorCodeEntry> {
        self.find_by_value(status.value())
    }

    /// Lookup from a wider or signed integer; values outside 0..=0xFFFFFFFF
    /// are rejected before any scan
    pub fn try_find_by_value<V>(&self, value: V) -> Result<Vec<&'static ErrorCodeEntry>, RegistryError>
    where
        V: TryInto<NtStatus, Error = RegistryError>,
    {
        let status = value.try_into()?;
        Ok(self.find_status(status))
    }

    /// Lookup from hex (`0x`-prefixed) or decimal text
    pub fn find_by_text(&self, text: &str) -> Result<Vec<&'static ErrorCodeEntry>, RegistryError> {
        let status: NtStatus = text.parse()?;
        Ok(self.find_status(status))
    }

    /// First declared entry for `value`
    pub fn primary(&self, value: u32) -> Option<&'static ErrorCodeEntry> {
        let entries: &'static [ErrorCodeEntry] = self.entries;
        entries.iter().find(|entry| entry.value() == value)
    }

    pub fn contains(&self, value: u32) -> bool {
        self.entries.iter().any(|entry| entry.value() == value)
    }

    // ========================================================================
    // Name lookups
    // ========================================================================

    /// Exact, case-sensitive name lookup
    pub fn find_by_name(&self, name: &str) -> Option<&'static ErrorCodeEntry> {
        let entries: &'static [ErrorCodeEntry] = self.entries;
        self.name_index()
            .get(name)
            .and_then(|&index| entries.get(index))
    }

    fn name_index(&self) -> &HashMap<&'static str, usize> {
        self.name_index.get_or_init(|| {
            let mut index = HashMap::with_capacity(self.entries.len());
            for (position, entry) in self.entries.iter().enumerate() {
                // On a duplicate name the first declaration wins; `validate` reports it
                index.entry(entry.name()).or_insert(position);
            }
            index
        })
    }

    // ========================================================================
    // Whole-table views
    // ========================================================================

    pub fn entries(&self) -> &'static [ErrorCodeEntry] {
        self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'static, ErrorCodeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Values carried by more than one name, each with its entries in
    /// declaration order. Groups are ordered by first declaration.
    pub fn aliases(&self) -> Vec<(u32, Vec<&'static ErrorCodeEntry>)> {
        let entries: &'static [ErrorCodeEntry] = self.entries;
        let mut positions: HashMap<u32, usize> = HashMap::new();
        let mut groups: Vec<(u32, Vec<&'static ErrorCodeEntry>)> = Vec::new();

        for entry in entries {
            match positions.get(&entry.value()) {
                Some(&slot) => groups[slot].1.push(entry),
                None => {
                    positions.insert(entry.value(), groups.len());
                    groups.push((entry.value(), vec![entry]));
                }
            }
        }

        groups.retain(|(_, members)| members.len() > 1);
        groups
    }

    pub fn entries_with_severity(&self, severity: Severity) -> Vec<&'static ErrorCodeEntry> {
        let entries: &'static [ErrorCodeEntry] = self.entries;
        entries
            .iter()
            .filter(|entry| entry.status().severity() == severity)
            .collect()
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check that names are unique and summarize the table
    pub fn validate(&self) -> Result<ValidationReport, RegistryError> {
        let mut seen: HashMap<&str, usize> = HashMap::with_capacity(self.entries.len());

        for (position, entry) in self.entries.iter().enumerate() {
            if let Some(&first) = seen.get(entry.name()) {
                let err = RegistryError::DuplicateName {
                    name: entry.name().to_string(),
                    first,
                    second: position,
                };
                log_error!(
                    err.error_code(),
                    "Duplicate name in NTSTATUS catalog",
                    "name" => entry.name(),
                    "first" => first,
                    "second" => position
                );
                return Err(err);
            }
            seen.insert(entry.name(), position);
        }

        let aliases = self.aliases();
        let mut report = ValidationReport {
            entry_count: self.entries.len(),
            distinct_values: 0,
            aliased_values: aliases.len(),
            aliased_entries: aliases.iter().map(|(_, members)| members.len()).sum(),
            success: 0,
            informational: 0,
            warning: 0,
            error: 0,
        };
        report.distinct_values =
            report.entry_count - (report.aliased_entries - report.aliased_values);

        for entry in self.entries {
            match entry.status().severity() {
                Severity::Success => report.success += 1,
                Severity::Informational => report.informational += 1,
                Severity::Warning => report.warning += 1,
                Severity::Error => report.error += 1,
            }
        }

        log_success!(
            codes::success::VALIDATION_PASSED,
            "NTSTATUS registry validation passed",
            "entries" => report.entry_count,
            "aliased_values" => report.aliased_values
        );

        Ok(report)
    }
}

impl Default for ErrorCodeRegistry {
    fn default() -> Self {
        Self::new(catalog::ENTRIES)
    }
}

impl std::fmt::Debug for ErrorCodeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorCodeRegistry")
            .field("entries", &self.entries.len())
            .field("name_index_built", &self.name_index.get().is_some())
            .finish()
    }
}

impl IntoIterator for &ErrorCodeRegistry {
    type Item = &'static ErrorCodeEntry;
    type IntoIter = std::slice::Iter<'static, ErrorCodeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Summary produced by a successful `validate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub entry_count: usize,
    pub distinct_values: usize,
    /// Values carried by more than one name
    pub aliased_values: usize,
    /// Entries that share their value with another entry
    pub aliased_entries: usize,
    pub success: usize,
    pub informational: usize,
    pub warning: usize,
    pub error: usize,
}

impl ValidationReport {
    pub fn count_for(&self, severity: Severity) -> usize {
        match severity {
            Severity::Success => self.success,
            Severity::Informational => self.informational,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} entries, {} distinct values, {} aliased values\n\
             Success: {}, Informational: {}, Warning: {}, Error: {}",
            self.entry_count,
            self.distinct_values,
            self.aliased_values,
            self.success,
            self.informational,
            self.warning,
            self.error,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::status;
    use assert_matches::assert_matches;

    static SMALL: &[ErrorCodeEntry] = &[
        ErrorCodeEntry::new("STATUS_A", 0x1, "First."),
        ErrorCodeEntry::new("STATUS_B", 0xC000_0001, "Second."),
        ErrorCodeEntry::new("STATUS_A_ALIAS", 0x1, "First again."),
        ErrorCodeEntry::new("STATUS_C", 0x8000_0001, "Third."),
        ErrorCodeEntry::new("STATUS_B_ALIAS", 0xC000_0001, "Second again."),
        ErrorCodeEntry::new("STATUS_A_THIRD", 0x1, "First, third time."),
    ];

    static DUPLICATES: &[ErrorCodeEntry] = &[
        ErrorCodeEntry::new("STATUS_X", 0x10, "x"),
        ErrorCodeEntry::new("STATUS_Y", 0x20, "y"),
        ErrorCodeEntry::new("STATUS_X", 0x30, "x again"),
    ];

    fn registry() -> &'static ErrorCodeRegistry {
        ErrorCodeRegistry::global()
    }

    #[test]
    fn test_access_violation_is_unique() {
        let found = registry().find_by_value(0xC000_0005);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "STATUS_ACCESS_VIOLATION");
        assert_eq!(
            found[0].description(),
            "The instruction at 0x%08lx referenced memory at 0x%08lx. The memory could not be %s."
        );
    }

    #[test]
    fn test_success_aliases_in_declaration_order() {
        let names: Vec<&str> = registry()
            .find_by_value(0)
            .iter()
            .map(|entry| entry.name())
            .collect();
        assert_eq!(names, ["STATUS_SUCCESS", "STATUS_WAIT_0"]);

        let names: Vec<&str> = registry()
            .find_by_value(0x80)
            .iter()
            .map(|entry| entry.name())
            .collect();
        assert_eq!(names, ["STATUS_ABANDONED", "STATUS_ABANDONED_WAIT_0"]);
    }

    #[test]
    fn test_unknown_value_is_empty() {
        assert!(registry().find_by_value(0xFFFF_FFFF).is_empty());
        assert!(!registry().contains(0xFFFF_FFFF));
        assert!(registry().primary(0xFFFF_FFFF).is_none());
    }

    #[test]
    fn test_unassigned_values_have_no_match() {
        let unassigned = [
            0xFFFF_FFFF,
            0xDEAD_BEEF,
            0x7FFF_FFFF,
            0xE000_0000,
            0x4000_FFFF,
            0x8000_FFFF,
            0xC000_FFFF,
            0xC002_FFFF,
            0xC00A_FFFF,
            0xC01E_FFFF,
            0xC029_FFFF,
            0x0000_FFFF,
        ];

        for value in unassigned {
            assert!(
                registry().find_by_value(value).is_empty(),
                "0x{:08X} should have no entry",
                value
            );
        }
    }

    #[test]
    fn test_catalog_size() {
        assert!(
            catalog::CATALOG_ENTRY_COUNT >= 1_500,
            "catalog shrank to {} entries",
            catalog::CATALOG_ENTRY_COUNT
        );
        assert_eq!(registry().len(), catalog::CATALOG_ENTRY_COUNT);
    }

    #[test]
    fn test_one_code_per_facility() {
        let cases: &[(u32, &str, u16)] = &[
            (0x0001_0002, "DBG_CONTINUE", 0x001),
            (0xC000_035C, "STATUS_NETWORK_SESSION_EXPIRED", 0x000),
            (0xC000_0380, "STATUS_SMARTCARD_WRONG_PIN", 0x000),
            (0xC000_A100, "STATUS_HASH_NOT_SUPPORTED", 0x000),
            (0xC002_0003, "RPC_NT_INVALID_BINDING", 0x002),
            (0xC003_0001, "RPC_NT_NO_MORE_ENTRIES", 0x003),
            (0xC004_0036, "STATUS_PNP_TRANSLATION_FAILED", 0x004),
            (0xC00A_0001, "STATUS_CTX_WINSTATION_NAME_INVALID", 0x00A),
            (0xC00B_0001, "STATUS_MUI_FILE_NOT_FOUND", 0x00B),
            (0xC013_0001, "STATUS_CLUSTER_INVALID_NODE", 0x013),
            (0xC014_0001, "STATUS_ACPI_INVALID_OPCODE", 0x014),
            (0xC015_0001, "STATUS_SXS_SECTION_NOT_FOUND", 0x015),
            (0xC019_0001, "STATUS_TRANSACTIONAL_CONFLICT", 0x019),
            (0xC01A_0001, "STATUS_LOG_SECTOR_INVALID", 0x01A),
            (0xC01B_00EA, "STATUS_VIDEO_HUNG_DISPLAY_DRIVER_THREAD", 0x01B),
            (0xC01C_0001, "STATUS_FLT_NO_HANDLER_DEFINED", 0x01C),
            (0xC01D_0001, "STATUS_MONITOR_NO_DESCRIPTOR", 0x01D),
            (0xC01E_0100, "STATUS_GRAPHICS_NO_VIDEO_MEMORY", 0x01E),
            (0xC021_0000, "STATUS_FVE_LOCKED_VOLUME", 0x021),
            (0xC022_0001, "STATUS_FWP_CALLOUT_NOT_FOUND", 0x022),
            (0xC023_0002, "STATUS_NDIS_CLOSING", 0x023),
            (0xC029_0001, "STATUS_TPM_AUTHFAIL", 0x029),
            (0xC035_0005, "STATUS_HV_INVALID_PARAMETER", 0x035),
            (0xC03A_0001, "STATUS_VHD_DRIVE_FOOTER_MISSING", 0x03A),
        ];

        for &(value, name, facility) in cases {
            let entry = registry()
                .primary(value)
                .unwrap_or_else(|| panic!("no entry for 0x{:08X}", value));
            assert_eq!(entry.name(), name);
            assert_eq!(entry.status().facility().value(), facility, "{}", name);
            assert_eq!(registry().find_by_name(name), Some(entry));
        }
    }

    #[test]
    fn test_every_entry_finds_itself() {
        let registry = registry();
        for entry in registry {
            let found = registry.find_by_value(entry.value());
            assert!(found.contains(&entry), "{} not returned for its own value", entry);
            assert!(found.iter().all(|other| other.value() == entry.value()));
        }
    }

    #[test]
    fn test_lookup_is_repeatable() {
        let first = registry().find_by_value(status::STATUS_ACCESS_DENIED);
        let second = registry().find_by_value(status::STATUS_ACCESS_DENIED);
        assert_eq!(first, second);
    }

    #[test]
    fn test_well_known_values() {
        let cases = [
            (0x0000_0103, "STATUS_PENDING"),
            (0x0000_0102, "STATUS_TIMEOUT"),
            (0x8000_0005, "STATUS_BUFFER_OVERFLOW"),
            (0xC000_000D, "STATUS_INVALID_PARAMETER"),
            (0xC000_0022, "STATUS_ACCESS_DENIED"),
            (0xC000_0034, "STATUS_OBJECT_NAME_NOT_FOUND"),
            (0xC000_00BB, "STATUS_NOT_SUPPORTED"),
            (0xC000_0008, "STATUS_INVALID_HANDLE"),
            (0xC002_0003, "RPC_NT_INVALID_BINDING"),
        ];

        for (value, name) in cases {
            assert_eq!(registry().primary(value).map(|e| e.name()), Some(name));
        }
    }

    #[test]
    fn test_find_by_text() {
        let hex = registry().find_by_text("0xC0000005").unwrap();
        let decimal = registry().find_by_text("3221225477").unwrap();
        assert_eq!(hex, decimal);
        assert_eq!(hex[0].name(), "STATUS_ACCESS_VIOLATION");

        assert!(registry().find_by_text("0xFFFFFFFF").unwrap().is_empty());
        assert_matches!(
            registry().find_by_text("not-a-number"),
            Err(RegistryError::InvalidInput { .. })
        );
        assert_matches!(
            registry().find_by_text("0x1FFFFFFFF"),
            Err(RegistryError::OutOfRange { .. })
        );
    }

    #[test]
    fn test_try_find_by_value() {
        assert_eq!(
            registry().try_find_by_value(0xC000_0005i64).unwrap()[0].name(),
            "STATUS_ACCESS_VIOLATION"
        );
        assert_matches!(
            registry().try_find_by_value(-1i64),
            Err(RegistryError::OutOfRange { .. })
        );
        assert_matches!(
            registry().try_find_by_value(0x1_0000_0000u64),
            Err(RegistryError::OutOfRange { .. })
        );
    }

    #[test]
    fn test_find_by_name() {
        let entry = registry().find_by_name("STATUS_ACCESS_VIOLATION").unwrap();
        assert_eq!(entry.value(), 0xC000_0005);

        assert!(registry().find_by_name("status_access_violation").is_none());
        assert!(registry().find_by_name("STATUS_DOES_NOT_EXIST").is_none());

        for entry in registry() {
            assert_eq!(registry().find_by_name(entry.name()), Some(entry));
        }
    }

    #[test]
    fn test_small_registry_queries() {
        let small = ErrorCodeRegistry::new(SMALL);

        let names: Vec<&str> = small.find_by_value(0x1).iter().map(|e| e.name()).collect();
        assert_eq!(names, ["STATUS_A", "STATUS_A_ALIAS", "STATUS_A_THIRD"]);
        assert_eq!(small.primary(0xC000_0001).map(|e| e.name()), Some("STATUS_B"));
        assert_eq!(small.len(), 6);
        assert!(!small.is_empty());

        let aliases = small.aliases();
        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases[0].0, 0x1);
        assert_eq!(aliases[0].1.len(), 3);
        assert_eq!(aliases[1].0, 0xC000_0001);

        let warnings = small.entries_with_severity(Severity::Warning);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].name(), "STATUS_C");
    }

    #[test]
    fn test_catalog_aliases() {
        let values: Vec<u32> = registry().aliases().iter().map(|(value, _)| *value).collect();
        assert_eq!(values, [0x0, 0x80]);
    }

    #[test]
    fn test_validate_catalog() {
        let report = registry().validate().unwrap();
        assert_eq!(report.entry_count, registry().len());
        assert_eq!(report.aliased_values, 2);
        assert_eq!(report.aliased_entries, 4);
        assert_eq!(report.distinct_values, registry().len() - 2);

        let total: usize = Severity::ALL.iter().map(|s| report.count_for(*s)).sum();
        assert_eq!(total, report.entry_count);
        assert!(report.error > report.warning);
        assert!(report.summary().contains("distinct values"));
    }

    #[test]
    fn test_validate_small_registry() {
        let report = ErrorCodeRegistry::new(SMALL).validate().unwrap();
        assert_eq!(report.distinct_values, 3);
        assert_eq!(report.aliased_values, 2);
        assert_eq!(report.aliased_entries, 5);
        assert_eq!(report.success, 3);
        assert_eq!(report.error, 2);
        assert_eq!(report.warning, 1);
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let registry = ErrorCodeRegistry::new(DUPLICATES);
        assert_matches!(
            registry.validate(),
            Err(RegistryError::DuplicateName { ref name, first: 0, second: 2 }) if name == "STATUS_X"
        );
        // First declaration wins for name lookups
        assert_eq!(registry.find_by_name("STATUS_X").map(|e| e.value()), Some(0x10));
    }

    #[test]
    fn test_empty_registry() {
        static EMPTY: &[ErrorCodeEntry] = &[];
        let registry = ErrorCodeRegistry::new(EMPTY);
        assert!(registry.is_empty());
        assert!(registry.find_by_value(0).is_empty());
        assert!(registry.aliases().is_empty());
        assert_eq!(registry.validate().unwrap().entry_count, 0);
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(ErrorCodeRegistry::global(), ErrorCodeRegistry::global()));
        assert_eq!(ErrorCodeRegistry::default().len(), registry().len());
    }
}
