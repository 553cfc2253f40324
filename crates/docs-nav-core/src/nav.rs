//! Navigation Synthesizer
//!
//! Merges freshly scanned categories with the category order already recorded
//! in the root `.pages`, and renders the result in awesome-pages `nav:` form.

use std::fs;
use std::path::{Path, PathBuf};

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use tracing::info;

use crate::category::{scan_categories, CategoryMapping, CategoryScan};
use crate::config::NavConfig;
use crate::error::Result;
use crate::pages::parse_group_headers;

/// A single top-level nav entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEntry {
    /// Literal page reference, e.g. `index.md`
    Leaf(String),
    /// Category header with its member folders
    Group {
        category: String,
        members: Vec<String>,
    },
}

impl Serialize for NavEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Leaf(page) => serializer.serialize_str(page),
            Self::Group { category, members } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(category, &PathList(members))?;
                map.end()
            }
        }
    }
}

struct PathList<'a>(&'a [String]);

impl Serialize for PathList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for path in self.0 {
            seq.serialize_element(&PathRef { path })?;
        }
        seq.end()
    }
}

#[derive(Serialize)]
struct PathRef<'a> {
    path: &'a str,
}

/// Ordered navigation tree written to the root `.pages`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NavTree {
    entries: Vec<NavEntry>,
}

impl NavTree {
    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    /// Number of category groups (leaf entries are not counted)
    pub fn group_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, NavEntry::Group { .. }))
            .count()
    }

    /// Category labels in nav order
    pub fn categories(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                NavEntry::Group { category, .. } => Some(category.as_str()),
                NavEntry::Leaf(_) => None,
            })
            .collect()
    }

    /// Render as awesome-pages `.pages` text
    pub fn render_pages(&self) -> String {
        let mut out = String::from("nav:\n");
        for entry in &self.entries {
            match entry {
                NavEntry::Leaf(page) => {
                    out.push_str(&format!("  - {}\n", page));
                }
                NavEntry::Group { category, members } => {
                    out.push_str(&format!("  - {}:\n", category));
                    for member in members {
                        out.push_str(&format!("      - path: {}\n", member));
                    }
                }
            }
        }
        out
    }

    /// Render as pretty JSON (inspection mode)
    pub fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Category order recorded in an existing root `.pages`
///
/// A missing file yields an empty order. Read failures on an existing file
/// are returned as errors; undecodable bytes are not.
pub fn read_existing_order(root_pages: &Path) -> Result<Vec<String>> {
    if !root_pages.is_file() {
        return Ok(Vec::new());
    }
    let bytes = fs::read(root_pages)?;
    Ok(parse_group_headers(&String::from_utf8_lossy(&bytes)))
}

/// Existing order first (dropping vanished categories), then new ones appended
pub fn resolve_order(
    mapping: &CategoryMapping,
    discovered: &[String],
    existing: &[String],
) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::new();
    for category in existing.iter().chain(discovered) {
        if mapping.contains(category) && !ordered.contains(category) {
            ordered.push(category.clone());
        }
    }
    ordered
}

pub fn build_nav(mapping: &CategoryMapping, order: &[String], index_entry: Option<&str>) -> NavTree {
    let mut entries = Vec::new();
    if let Some(index) = index_entry {
        entries.push(NavEntry::Leaf(index.to_string()));
    }

    for category in order {
        let members = match mapping.members(category) {
            Some(members) if !members.is_empty() => members,
            _ => continue,
        };
        entries.push(NavEntry::Group {
            category: category.clone(),
            members: members.to_vec(),
        });
    }

    NavTree { entries }
}

/// Result of a full generation pass
#[derive(Debug, Clone)]
pub struct Generated {
    pub tree: NavTree,
    pub scan: CategoryScan,
    pub order: Vec<String>,
}

/// Scan `content_root` and build its navigation tree
pub fn generate_navigation(content_root: &Path, config: &NavConfig) -> Result<Generated> {
    let scan = scan_categories(content_root, config)?;
    let existing = read_existing_order(&root_pages_path(content_root, config))?;
    let order = resolve_order(&scan.mapping, &scan.discovered_order, &existing);
    let tree = build_nav(&scan.mapping, &order, config.index_entry());

    info!(
        root = %content_root.display(),
        categories = tree.group_count(),
        skipped = scan.diagnostics.len(),
        "generated navigation"
    );

    Ok(Generated { tree, scan, order })
}

/// Write the rendered tree to the root `.pages`, overwriting any content
pub fn write_root_pages(content_root: &Path, config: &NavConfig, tree: &NavTree) -> Result<PathBuf> {
    let path = root_pages_path(content_root, config);
    fs::write(&path, tree.render_pages())?;
    Ok(path)
}

pub fn root_pages_path(content_root: &Path, config: &NavConfig) -> PathBuf {
    content_root.join(&config.nav.pages_file)
}
