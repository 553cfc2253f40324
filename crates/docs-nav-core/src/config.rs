use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};

const CONFIG_FILE: &str = "docs-nav.toml";

/// Filename shared by the root and per-directory navigation configs
pub const DEFAULT_PAGES_FILE: &str = ".pages";

/// Separator between category and period in a `title:` value (`News｜2024-01`)
pub const DEFAULT_SEPARATOR: &str = "｜";

/// Infrastructure folders that never form a category
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["assets", "stylesheets"];

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# docs-nav configuration file
# Location: <project>/docs-nav.toml

# MkDocs docs directory (relative to this file)
docs_dir = "docs"

[nav]
# Navigation file read from each subfolder and generated at the docs root
pages_file = ".pages"

# Category is the part of `title:` before this separator
# Example: title: "News｜2024-01" -> category "News"
separator = "｜"

# Subfolders never treated as categories (glob patterns allowed)
exclude = ["assets", "stylesheets"]

# Leading leaf entry of the generated nav
index_entry = "index.md"
include_index = true
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavConfig {
    /// Docs directory relative to the project directory
    #[serde(default = "default_docs_dir")]
    pub docs_dir: PathBuf,

    #[serde(default)]
    pub nav: NavSettings,
}

/// Navigation-generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavSettings {
    #[serde(default = "default_pages_file")]
    pub pages_file: String,

    #[serde(default = "default_separator")]
    pub separator: String,

    /// Excluded subfolder names or glob patterns
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    #[serde(default = "default_index_entry")]
    pub index_entry: String,

    #[serde(default = "default_true")]
    pub include_index: bool,
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_pages_file() -> String {
    DEFAULT_PAGES_FILE.to_string()
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

fn default_exclude() -> Vec<String> {
    DEFAULT_EXCLUDED_DIRS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_index_entry() -> String {
    "index.md".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for NavSettings {
    fn default() -> Self {
        Self {
            pages_file: default_pages_file(),
            separator: default_separator(),
            exclude: default_exclude(),
            index_entry: default_index_entry(),
            include_index: true,
        }
    }
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            docs_dir: default_docs_dir(),
            nav: NavSettings::default(),
        }
    }
}

impl NavConfig {
    /// Load config from project directory
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content).map_err(|message| NavError::ConfigParse {
            path: path.clone(),
            message,
        })
    }

    fn from_toml(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Get config file path
    pub fn path(project_dir: &Path) -> PathBuf {
        project_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    ///
    /// An existing file is left untouched.
    pub fn init(project_dir: &Path) -> Result<PathBuf> {
        let path = project_dir.join(CONFIG_FILE);
        fs::create_dir_all(project_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Render the effective config as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Resolve the docs directory against the project directory
    pub fn docs_dir_in(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.docs_dir)
    }

    /// Index leaf entry, if one should lead the nav
    pub fn index_entry(&self) -> Option<&str> {
        self.nav
            .include_index
            .then_some(self.nav.index_entry.as_str())
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Result<String> {
        self.list()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or_else(|| NavError::ConfigKeyNotFound {
                key: key.to_string(),
            })
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        vec![
            (
                "docs_dir".to_string(),
                self.docs_dir.display().to_string(),
            ),
            ("nav.pages_file".to_string(), self.nav.pages_file.clone()),
            ("nav.separator".to_string(), self.nav.separator.clone()),
            ("nav.exclude".to_string(), format!("{:?}", self.nav.exclude)),
            ("nav.index_entry".to_string(), self.nav.index_entry.clone()),
            (
                "nav.include_index".to_string(),
                self.nav.include_index.to_string(),
            ),
        ]
    }
}
