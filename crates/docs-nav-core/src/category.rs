//! # Category Mapper
//!
//! docsルート直下のサブフォルダを走査し、各フォルダの`.pages`にある
//! `title: カテゴリ｜年月` からカテゴリを読み取ってフォルダをグルーピングする。
//!
//! カテゴリを解決できないフォルダ（`.pages`が無い、titleが無い等）は
//! エラーにせずスキップし、`ScanDiagnostic`として結果に残す。
//!
//! ```rust,ignore
//! use docs_nav_core::{scan_categories, NavConfig};
//!
//! let scan = scan_categories(Path::new("docs"), &NavConfig::default())?;
//! for category in &scan.discovered_order {
//!     println!("{}: {:?}", category, scan.mapping.members(category));
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use glob::Pattern;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::NavConfig;
use crate::error::{NavError, Result};
use crate::pages::extract_category;

const HIDDEN_MARKER: char = '.';

/// カテゴリ -> 所属フォルダ一覧（降順ソート済み、重複なし）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMapping {
    categories: BTreeMap<String, Vec<String>>,
}

impl CategoryMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// フォルダをカテゴリに追加する
    ///
    /// Returns `true` if the category was seen for the first time.
    pub fn insert(&mut self, category: &str, member: &str) -> bool {
        let member = member.replace('\\', "/");
        match self.categories.get_mut(category) {
            Some(members) => {
                if !members.contains(&member) {
                    members.push(member);
                    members.sort_by(|a, b| b.cmp(a));
                }
                false
            }
            None => {
                self.categories.insert(category.to_string(), vec![member]);
                true
            }
        }
    }

    /// 所属フォルダ一覧（新しい順）
    pub fn members(&self, category: &str) -> Option<&[String]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for CategoryMapping {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (category, member) in iter {
            mapping.insert(category, member);
        }
        mapping
    }
}

/// フォルダがスキップされた理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// `.`で始まるフォルダ
    Hidden,
    /// 除外パターンに一致
    Excluded,
    /// `.pages`が存在しない
    MissingPagesFile,
    /// `.pages`を読めない（権限、非UTF-8等）
    Unreadable(String),
    /// titleが無い、または空
    NoCategory,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden => write!(f, "hidden directory"),
            Self::Excluded => write!(f, "excluded"),
            Self::MissingPagesFile => write!(f, "no pages file"),
            Self::Unreadable(message) => write!(f, "unreadable pages file: {}", message),
            Self::NoCategory => write!(f, "no category in title"),
        }
    }
}

/// スキップされたフォルダの記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDiagnostic {
    /// docsルートからの相対パス
    pub dir: String,
    pub reason: SkipReason,
}

/// 走査結果
#[derive(Debug, Clone, Default)]
pub struct CategoryScan {
    pub mapping: CategoryMapping,
    /// フォルダ名昇順で最初に出現した順のカテゴリ
    pub discovered_order: Vec<String>,
    pub diagnostics: Vec<ScanDiagnostic>,
}

impl CategoryScan {
    /// Diagnostics excluding hidden/excluded folders
    pub fn unresolved(&self) -> impl Iterator<Item = &ScanDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| !matches!(d.reason, SkipReason::Hidden | SkipReason::Excluded))
    }
}

/// Compiled exclusion patterns
#[derive(Debug, Clone)]
pub struct ExcludeSet {
    patterns: Vec<Pattern>,
}

impl ExcludeSet {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| NavError::InvalidPattern {
                    pattern: p.clone(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }
}

/// docsルート直下のサブフォルダをカテゴリ毎にグルーピングする
pub fn scan_categories(content_root: &Path, config: &NavConfig) -> Result<CategoryScan> {
    if !content_root.is_dir() {
        return Err(NavError::ContentRootNotFound {
            path: content_root.to_path_buf(),
        });
    }

    let exclude = ExcludeSet::new(&config.nav.exclude)?;
    let mut scan = CategoryScan::default();

    for entry in WalkDir::new(content_root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let dir = e
                    .path()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                skip(&mut scan, dir, SkipReason::Unreadable(e.to_string()));
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(HIDDEN_MARKER) {
            skip(&mut scan, name, SkipReason::Hidden);
            continue;
        }
        if exclude.matches(&name) {
            skip(&mut scan, name, SkipReason::Excluded);
            continue;
        }

        let pages_path = entry.path().join(&config.nav.pages_file);
        let category = match read_category(&pages_path, &config.nav.separator) {
            Ok(category) => category,
            Err(reason) => {
                skip(&mut scan, name, reason);
                continue;
            }
        };

        if scan.mapping.insert(&category, &name) {
            scan.discovered_order.push(category);
        }
    }

    Ok(scan)
}

fn read_category(pages_path: &Path, separator: &str) -> std::result::Result<String, SkipReason> {
    let content = fs::read_to_string(pages_path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SkipReason::MissingPagesFile,
        _ => SkipReason::Unreadable(e.to_string()),
    })?;
    extract_category(&content, separator).ok_or(SkipReason::NoCategory)
}

fn skip(scan: &mut CategoryScan, dir: String, reason: SkipReason) {
    debug!(dir = %dir, reason = %reason, "skipping folder");
    scan.diagnostics.push(ScanDiagnostic { dir, reason });
}
