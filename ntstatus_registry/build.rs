// build.rs - TOML-driven NTSTATUS catalog generation
use std::collections::HashMap;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CATALOG: &str = "data/ntstatus.toml";

#[derive(serde::Deserialize)]
struct CatalogFile {
    group: Vec<CatalogGroup>,
}

#[derive(serde::Deserialize)]
struct CatalogGroup {
    title: String,
    entries: Vec<CatalogEntry>,
}

#[derive(serde::Deserialize)]
struct CatalogEntry {
    name: String,
    value: u32,
    description: String,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=NTSTATUS_CATALOG");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is not set");
    let catalog_path = resolve_catalog_path(Path::new(&manifest_dir));

    println!("cargo:rerun-if-changed={}", catalog_path.display());
    println!("cargo:rustc-env=NTSTATUS_CATALOG_PATH={}", catalog_path.display());
    println!(
        "cargo:rustc-env=NTSTATUS_DEFAULT_CATALOG_PATH={}",
        Path::new(&manifest_dir).join(DEFAULT_CATALOG).display()
    );

    if !catalog_path.exists() {
        panic!(
            "Catalog file not found: {}\nSet NTSTATUS_CATALOG or restore {}/{}",
            catalog_path.display(),
            manifest_dir,
            DEFAULT_CATALOG
        );
    }

    let catalog_content = fs::read_to_string(&catalog_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", catalog_path.display(), e));

    let catalog: CatalogFile = toml::from_str(&catalog_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", catalog_path.display(), e));

    validate_catalog(&catalog, &catalog_path);
    generate_catalog(&catalog, &catalog_path);
}

fn resolve_catalog_path(manifest_dir: &Path) -> PathBuf {
    match env::var("NTSTATUS_CATALOG") {
        Ok(path) if Path::new(&path).is_absolute() => PathBuf::from(path),
        Ok(path) => manifest_dir.join(path),
        Err(_) => manifest_dir.join(DEFAULT_CATALOG),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn validate_catalog(catalog: &CatalogFile, path: &Path) {
    if catalog.group.iter().all(|g| g.entries.is_empty()) {
        panic!("CATALOG: {} declares no entries", path.display());
    }

    let mut seen: HashMap<&str, (&str, usize)> = HashMap::new();

    for group in &catalog.group {
        if group.title.trim().is_empty() {
            panic!("CATALOG: group with an empty title in {}", path.display());
        }

        for (index, entry) in group.entries.iter().enumerate() {
            if !is_identifier(&entry.name) {
                panic!(
                    "CATALOG: '{}' in group '{}' is not an upper-case identifier",
                    entry.name, group.title
                );
            }

            if entry.description.trim().is_empty() {
                panic!(
                    "CATALOG: '{}' in group '{}' has an empty description",
                    entry.name, group.title
                );
            }

            if let Some((first_group, first_index)) =
                seen.insert(&entry.name, (&group.title, index))
            {
                panic!(
                    "CATALOG: duplicate name '{}': first declared in '{}' (#{}), again in '{}' (#{})",
                    entry.name, first_group, first_index, group.title, index
                );
            }
        }
    }
}

fn generate_catalog(catalog: &CatalogFile, path: &Path) {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is not set");
    let output_path = Path::new(&out_dir).join("catalog.rs");

    let entry_count: usize = catalog.group.iter().map(|g| g.entries.len()).sum();
    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut constants = String::new();
    let mut entries = String::new();
    let mut groups = String::new();
    let mut start = 0usize;

    for group in &catalog.group {
        let _ = writeln!(constants, "\n    // {}", group.title);
        for entry in &group.entries {
            let _ = writeln!(
                constants,
                "    pub const {}: u32 = 0x{:08X};",
                entry.name, entry.value
            );
            let _ = writeln!(
                entries,
                "    ErrorCodeEntry::new({:?}, 0x{:08X}, {:?}),",
                entry.name, entry.value, entry.description
            );
        }

        let _ = writeln!(
            groups,
            "    CatalogGroup::new({:?}, {}, {}),",
            group.title,
            start,
            group.entries.len()
        );
        start += group.entries.len();
    }

    let catalog_code = format!(
        r#"
// Generated NTSTATUS catalog
// Source: {source}
// DO NOT EDIT - Generated by build.rs

/// Catalog file the table was generated from
pub const CATALOG_SOURCE: &str = {source:?};

/// Number of entries in the generated table
pub const CATALOG_ENTRY_COUNT: usize = {entry_count};

/// One constant per catalog name
pub mod status {{{constants}}}

/// Every catalog entry in declaration order
pub static ENTRIES: &[ErrorCodeEntry] = &[
{entries}];

/// Titled runs of `ENTRIES`, in declaration order
pub static GROUPS: &[CatalogGroup] = &[
{groups}];
"#
    );

    fs::write(&output_path, catalog_code)
        .unwrap_or_else(|e| panic!("Failed to write {}: {}", output_path.display(), e));
}
