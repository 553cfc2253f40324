pub mod category;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod nav;
pub mod pages;

pub use category::{
    scan_categories, CategoryMapping, CategoryScan, ExcludeSet, ScanDiagnostic, SkipReason,
};
pub use config::{NavConfig, NavSettings, DEFAULT_EXCLUDED_DIRS, DEFAULT_PAGES_FILE};
pub use error::{NavError, Result};
pub use lifecycle::{with_generated_nav, BuildSession, LifecycleController, Snapshot, State};
pub use nav::{
    build_nav, generate_navigation, read_existing_order, resolve_order, root_pages_path,
    write_root_pages, Generated, NavEntry, NavTree,
};
pub use pages::{extract_category, parse_group_headers};
