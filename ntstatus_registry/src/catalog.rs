//! Generated NTSTATUS catalog
//!
//! `build.rs` turns `data/ntstatus.toml` (or the file named by
//! `NTSTATUS_CATALOG` at build time) into the statics included below:
//! `ENTRIES`, `GROUPS`, the `status` constant module, `CATALOG_SOURCE`
//! and `CATALOG_ENTRY_COUNT`.

use crate::entry::ErrorCodeEntry;

/// A titled, contiguous run of `ENTRIES`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogGroup {
    title: &'static str,
    start: usize,
    len: usize,
}

impl CatalogGroup {
    pub const fn new(title: &'static str, start: usize, len: usize) -> Self {
        Self { title, start, len }
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn entries(&self) -> &'static [ErrorCodeEntry] {
        ENTRIES
            .get(self.start..self.start + self.len)
            .unwrap_or(&[])
    }
}

include!(concat!(env!("OUT_DIR"), "/catalog.rs"));
