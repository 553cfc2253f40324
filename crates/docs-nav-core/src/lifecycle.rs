//! Build Lifecycle
//!
//! ビルド前にルート `.pages` を退避して自動生成版を書き込み、ビルド後に元へ戻す。
//!
//! ```text
//! Idle --start--> Armed (snapshot held, generated .pages live) --finish--> Idle
//! ```
//!
//! 1回のビルドは1つの `BuildSession` に対応する。`finish` で元の内容を
//! バイト単位で書き戻し、元々ファイルが無かった場合は生成ファイルを削除する。
//!
//! ビルドプロセスが `start` と `finish` の間で強制終了された場合、生成された
//! `.pages` はそのまま残り、元の内容は失われる（VCSから復元すること）。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::config::NavConfig;
use crate::error::{NavError, Result};
use crate::nav::{generate_navigation, root_pages_path, NavTree};

/// Prior content of the root `.pages`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    /// The file did not exist before the build
    Absent,
    /// Exact bytes of the file before the build
    Content(Vec<u8>),
}

impl Snapshot {
    /// Capture the current state of `path`
    pub fn capture(path: &Path) -> Result<Self> {
        match fs::read(path) {
            Ok(bytes) => Ok(Self::Content(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::Absent),
            Err(source) => Err(NavError::Snapshot {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Put `path` back into the captured state
    pub fn restore(&self, path: &Path) -> Result<()> {
        let result = match self {
            Self::Content(bytes) => fs::write(path, bytes),
            Self::Absent => match fs::remove_file(path) {
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };
        result.map_err(|source| NavError::Restore {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// One armed build: the snapshot plus the navigation written in its place
#[derive(Debug)]
pub struct BuildSession {
    pages_path: PathBuf,
    snapshot: Snapshot,
    tree: NavTree,
}

impl BuildSession {
    /// build-start: snapshot the root `.pages`, then overwrite it with generated nav
    pub fn start(content_root: &Path, config: &NavConfig) -> Result<Self> {
        let pages_path = root_pages_path(content_root, config);
        let snapshot = Snapshot::capture(&pages_path)?;

        let generated = generate_navigation(content_root, config)?;
        fs::write(&pages_path, generated.tree.render_pages())?;

        info!(
            path = %pages_path.display(),
            had_original = matches!(snapshot, Snapshot::Content(_)),
            "wrote generated navigation"
        );

        Ok(Self {
            pages_path,
            snapshot,
            tree: generated.tree,
        })
    }

    /// build-end: restore the snapshot and end the session
    pub fn finish(self) -> Result<()> {
        self.restore()
    }

    fn restore(&self) -> Result<()> {
        self.snapshot.restore(&self.pages_path)?;
        info!(path = %self.pages_path.display(), "restored navigation file");
        Ok(())
    }

    pub fn pages_path(&self) -> &Path {
        &self.pages_path
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn tree(&self) -> &NavTree {
        &self.tree
    }
}

/// Run `build` with generated navigation in place, restoring afterwards
///
/// The snapshot is restored even when `build` fails. If both fail, the build
/// error is returned and the restore error is logged.
pub fn with_generated_nav<T, F>(content_root: &Path, config: &NavConfig, build: F) -> Result<T>
where
    F: FnOnce(&BuildSession) -> Result<T>,
{
    let session = BuildSession::start(content_root, config)?;
    let outcome = build(&session);
    let restored = session.finish();

    match (outcome, restored) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(restore_err)) => {
            error!(error = %restore_err, "restore failed after build error");
            Err(e)
        }
    }
}

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Armed,
}

/// Two-hook facade for build frameworks that call "before build" and
/// "after build" without passing state between them
///
/// Holds at most one session. Starting again while armed replaces the held
/// session, so the earlier snapshot is lost.
#[derive(Debug)]
pub struct LifecycleController {
    content_root: PathBuf,
    config: NavConfig,
    session: Option<BuildSession>,
}

impl LifecycleController {
    pub fn new(content_root: PathBuf, config: NavConfig) -> Self {
        Self {
            content_root,
            config,
            session: None,
        }
    }

    pub fn state(&self) -> State {
        if self.session.is_some() {
            State::Armed
        } else {
            State::Idle
        }
    }

    pub fn on_build_start(&mut self) -> Result<&BuildSession> {
        let session = BuildSession::start(&self.content_root, &self.config)?;
        if self.session.is_some() {
            warn!(
                root = %self.content_root.display(),
                "build started while armed; previous snapshot discarded"
            );
        }
        Ok(self.session.insert(session))
    }

    /// Restore and return to idle. A failed restore stays armed.
    pub fn on_build_end(&mut self) -> Result<()> {
        match &self.session {
            Some(session) => {
                session.restore()?;
                self.session = None;
            }
            None => debug!("build ended while idle; nothing to restore"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn docs_root() -> TempDir {
        let temp = TempDir::new().unwrap();
        for (dir, title) in [
            ("news-2024-01", "News｜2024-01"),
            ("news-2024-02", "News｜2024-02"),
            ("study-2024-01", "勉強会｜2024-01"),
        ] {
            let path = temp.path().join(dir);
            fs::create_dir_all(&path).unwrap();
            fs::write(path.join(".pages"), format!("title: \"{}\"\n", title)).unwrap();
        }
        fs::create_dir_all(temp.path().join("assets")).unwrap();
        temp
    }

    #[test]
    fn test_round_trip_restores_exact_bytes() {
        let temp = docs_root();
        let pages = temp.path().join(".pages");
        let original: &[u8] = b"\xef\xbb\xbfnav:\r\n  - index.md\r\n  - \xe5\x8b\x89\xe5\xbc\xb7\xe4\xbc\x9a:\r\n\xff";
        fs::write(&pages, original).unwrap();

        let session = BuildSession::start(temp.path(), &NavConfig::default()).unwrap();
        let live = fs::read_to_string(&pages).unwrap();
        assert!(live.starts_with("nav:\n  - index.md\n"));
        assert!(live.contains("      - path: news-2024-02\n      - path: news-2024-01\n"));
        assert_eq!(session.snapshot(), &Snapshot::Content(original.to_vec()));

        session.finish().unwrap();
        assert_eq!(fs::read(&pages).unwrap(), original);
    }

    #[test]
    fn test_round_trip_absent_file_is_removed() {
        let temp = docs_root();
        let pages = temp.path().join(".pages");

        let session = BuildSession::start(temp.path(), &NavConfig::default()).unwrap();
        assert_eq!(session.snapshot(), &Snapshot::Absent);
        assert!(pages.exists());
        assert_eq!(session.tree().group_count(), 2);

        session.finish().unwrap();
        assert!(!pages.exists());
    }

    #[test]
    fn test_finish_tolerates_already_removed_file() {
        let temp = docs_root();
        let session = BuildSession::start(temp.path(), &NavConfig::default()).unwrap();
        fs::remove_file(session.pages_path()).unwrap();
        session.finish().unwrap();
    }

    #[test]
    fn test_existing_order_is_kept_in_generated_file() {
        let temp = docs_root();
        let pages = temp.path().join(".pages");
        fs::write(&pages, "nav:\n  - index.md\n  - 勉強会:\n  - News:\n").unwrap();

        let session = BuildSession::start(temp.path(), &NavConfig::default()).unwrap();
        assert_eq!(session.tree().categories(), vec!["勉強会", "News"]);
        session.finish().unwrap();
    }

    #[test]
    fn test_start_fails_for_missing_root() {
        let temp = TempDir::new().unwrap();
        let err = BuildSession::start(&temp.path().join("docs"), &NavConfig::default()).unwrap_err();
        assert!(matches!(err, NavError::ContentRootNotFound { .. }));
    }

    #[test]
    fn test_with_generated_nav_restores_after_failed_build() {
        let temp = docs_root();
        let pages = temp.path().join(".pages");
        fs::write(&pages, "nav:\n  - index.md\n").unwrap();

        let result: Result<()> = with_generated_nav(temp.path(), &NavConfig::default(), |session| {
            let live = fs::read_to_string(session.pages_path())?;
            assert!(live.contains("News:"));
            Err(NavError::BuildCommandFailed {
                command: "mkdocs build".to_string(),
                status: "exit status: 1".to_string(),
            })
        });

        assert!(matches!(result, Err(NavError::BuildCommandFailed { .. })));
        assert_eq!(fs::read_to_string(&pages).unwrap(), "nav:\n  - index.md\n");
    }

    #[test]
    fn test_with_generated_nav_returns_build_value() {
        let temp = docs_root();
        let groups = with_generated_nav(temp.path(), &NavConfig::default(), |session| {
            Ok(session.tree().group_count())
        })
        .unwrap();
        assert_eq!(groups, 2);
        assert!(!temp.path().join(".pages").exists());
    }

    #[test]
    fn test_controller_round_trip() {
        let temp = docs_root();
        let pages = temp.path().join(".pages");
        fs::write(&pages, "nav:\n  - index.md\n").unwrap();

        let mut controller = LifecycleController::new(temp.path().to_path_buf(), NavConfig::default());
        assert_eq!(controller.state(), State::Idle);

        controller.on_build_start().unwrap();
        assert_eq!(controller.state(), State::Armed);

        controller.on_build_end().unwrap();
        assert_eq!(controller.state(), State::Idle);
        assert_eq!(fs::read_to_string(&pages).unwrap(), "nav:\n  - index.md\n");

        // idle end is a no-op
        controller.on_build_end().unwrap();
        assert_eq!(fs::read_to_string(&pages).unwrap(), "nav:\n  - index.md\n");
    }

    #[test]
    fn test_controller_double_start_keeps_second_snapshot() {
        let temp = docs_root();
        let pages = temp.path().join(".pages");
        fs::write(&pages, "nav:\n  - index.md\n").unwrap();

        let mut controller = LifecycleController::new(temp.path().to_path_buf(), NavConfig::default());
        controller.on_build_start().unwrap();
        let generated = fs::read(&pages).unwrap();

        let second = controller.on_build_start().unwrap();
        assert_eq!(second.snapshot(), &Snapshot::Content(generated.clone()));

        controller.on_build_end().unwrap();
        assert_eq!(fs::read(&pages).unwrap(), generated);
    }

    #[test]
    fn test_controller_failed_restore_stays_armed() {
        let temp = docs_root();
        let pages = temp.path().join(".pages");

        let mut controller = LifecycleController::new(temp.path().to_path_buf(), NavConfig::default());
        controller.on_build_start().unwrap();

        // a directory in place of the generated file cannot be removed as a file
        fs::remove_file(&pages).unwrap();
        fs::create_dir(&pages).unwrap();

        let err = controller.on_build_end().unwrap_err();
        assert!(matches!(err, NavError::Restore { .. }));
        assert_eq!(controller.state(), State::Armed);

        fs::remove_dir(&pages).unwrap();
        controller.on_build_end().unwrap();
        assert_eq!(controller.state(), State::Idle);
    }
}
