//! Static registry of Windows NTSTATUS codes
//!
//! ```ignore
//! use ntstatus_registry::{status, ErrorCodeRegistry};
//!
//! let registry = ErrorCodeRegistry::global();
//! for entry in registry.find_by_value(status::STATUS_ACCESS_VIOLATION) {
//!     println!("{}: {}", entry.name(), entry.description());
//! }
//! ```

// Internal modules
pub mod catalog;
pub mod config;
pub mod entry;
pub mod error;
#[macro_use]
pub mod logging;
pub mod ntstatus;
pub mod registry;
pub mod render;

// Re-export key types for library consumers
pub use catalog::{status, CatalogGroup};
pub use entry::ErrorCodeEntry;
pub use error::RegistryError;
pub use ntstatus::{Facility, NtStatus, Severity};
pub use registry::{ErrorCodeRegistry, ValidationReport};
pub use render::{describe, describe_all, RenderMode, Renderer};
