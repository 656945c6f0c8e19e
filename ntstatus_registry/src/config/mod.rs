//! Configuration for the NTSTATUS registry
//!
//! The catalog itself is fixed at build time (see `build_info`); everything
//! else is a runtime preference read from `NTSTATUS_*` environment variables.

pub mod runtime;

/// Where the compiled-in catalog came from
pub mod build_info {
    use crate::catalog;
    use std::path::Path;

    /// File name of the catalog the table was generated from
    pub fn catalog_source() -> &'static str {
        catalog::CATALOG_SOURCE
    }

    /// Full path of the catalog as resolved by `build.rs`
    pub fn catalog_path() -> &'static str {
        env!("NTSTATUS_CATALOG_PATH")
    }

    /// Path of the bundled catalog, whether or not it was used
    pub fn default_catalog_path() -> &'static str {
        env!("NTSTATUS_DEFAULT_CATALOG_PATH")
    }

    /// Whether `NTSTATUS_CATALOG` replaced the bundled catalog
    pub fn catalog_overridden() -> bool {
        is_override(catalog_path(), default_catalog_path())
    }

    pub(crate) fn is_override(resolved: &str, bundled: &str) -> bool {
        Path::new(resolved) != Path::new(bundled)
    }

    pub fn entry_count() -> usize {
        catalog::CATALOG_ENTRY_COUNT
    }

    pub fn source_info() -> String {
        let origin = if catalog_overridden() { "override" } else { "bundled" };
        format!(
            "Generated from {} ({} entries, {})",
            catalog_path(),
            entry_count(),
            origin
        )
    }

    /// OUT_DIR used for generation (for debugging)
    pub fn out_dir() -> &'static str {
        env!("OUT_DIR")
    }
}
