//! Per-batch staging directory for uploaded letters.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::batch::read_bounded;
use crate::error::{ExtractionError, IntakeError};
use crate::models::config::IntakeConfig;

/// Result of staging an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeReport {
    /// Sanitized names written into the workspace.
    pub staged: Vec<String>,
    /// One entry per rejected file, e.g. `notes.md (invalid type)`.
    pub issues: Vec<String>,
}

impl fmt::Display for IntakeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Successfully uploaded {} file(s)", self.staged.len())?;
        if !self.issues.is_empty() {
            write!(f, ". Skipped {} invalid file(s)", self.issues.len())?;
        }
        Ok(())
    }
}

/// Unique temporary directory holding one batch of letters.
///
/// The directory name doubles as the batch token. The directory is removed
/// by [`close`](Self::close) or when the workspace is dropped.
pub struct BatchWorkspace {
    dir: TempDir,
    intake: IntakeConfig,
}

impl BatchWorkspace {
    /// Create a workspace under the system temporary directory.
    pub fn create(intake: IntakeConfig) -> Result<Self, IntakeError> {
        Self::create_in(&std::env::temp_dir(), intake)
    }

    /// Create a workspace under `root`.
    pub fn create_in(root: &Path, intake: IntakeConfig) -> Result<Self, IntakeError> {
        let dir = tempfile::Builder::new().prefix("rekon-").tempdir_in(root)?;
        info!("Created batch workspace {}", dir.path().display());
        Ok(Self { dir, intake })
    }

    /// Directory the letters are staged in.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Batch token: the workspace directory name.
    pub fn token(&self) -> String {
        self.dir
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Validate and write one file, returning its staged path.
    pub fn stage(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, IntakeError> {
        if !self.intake.accepts(name) {
            return Err(IntakeError::InvalidType {
                name: name.to_string(),
            });
        }

        let size = bytes.len() as u64;
        if size > self.intake.max_file_size {
            return Err(IntakeError::TooLarge {
                name: name.to_string(),
                size,
            });
        }

        let safe = sanitize_file_name(name);
        if safe.is_empty() || !self.intake.accepts(&safe) {
            return Err(IntakeError::InvalidName {
                name: name.to_string(),
            });
        }

        let path = self.dir.path().join(&safe);
        fs::write(&path, bytes)?;
        debug!("Staged {} as {}", name, safe);
        Ok(path)
    }

    /// Stage a whole upload.
    ///
    /// Individual rejections are collected; the call fails only when the
    /// upload is over the file limit or nothing was accepted.
    pub fn stage_all<N, B>(&self, files: &[(N, B)]) -> Result<IntakeReport, IntakeError>
    where
        N: AsRef<str>,
        B: AsRef<[u8]>,
    {
        self.check_count(files.len())?;
        self.collect(
            files
                .iter()
                .map(|(name, bytes)| self.stage(name.as_ref(), bytes.as_ref())),
        )
    }

    /// Stage files from disk, like [`stage_all`](Self::stage_all).
    ///
    /// The count is checked before anything is opened, and no file is read
    /// past `max_file_size` bytes.
    pub fn stage_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Result<IntakeReport, IntakeError> {
        self.check_count(paths.len())?;
        self.collect(paths.iter().map(|path| self.stage_path(path.as_ref())))
    }

    fn stage_path(&self, path: &Path) -> Result<PathBuf, IntakeError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if !self.intake.accepts(&name) {
            return Err(IntakeError::InvalidType { name });
        }

        match read_bounded(path, self.intake.max_file_size) {
            Ok(bytes) => self.stage(&name, &bytes),
            Err(ExtractionError::TooLarge { size, .. }) => Err(IntakeError::TooLarge { name, size }),
            Err(ExtractionError::Read { source, .. }) => Err(IntakeError::Io(source)),
        }
    }

    fn check_count(&self, count: usize) -> Result<(), IntakeError> {
        if count > self.intake.max_files {
            return Err(IntakeError::TooManyFiles {
                count,
                limit: self.intake.max_files,
            });
        }
        Ok(())
    }

    fn collect<I>(&self, results: I) -> Result<IntakeReport, IntakeError>
    where
        I: IntoIterator<Item = Result<PathBuf, IntakeError>>,
    {
        let mut report = IntakeReport::default();
        for result in results {
            match result {
                Ok(path) => report.staged.push(
                    path.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                ),
                Err(IntakeError::Io(e)) => return Err(IntakeError::Io(e)),
                Err(rejection) => {
                    warn!("Rejected upload: {}", rejection);
                    report.issues.push(rejection.to_string());
                }
            }
        }

        if report.staged.is_empty() {
            return Err(IntakeError::NoValidFiles {
                issues: report.issues,
            });
        }

        info!("{}", report);
        Ok(report)
    }

    /// Remove the workspace. Failures are logged, never returned.
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!("Removed batch workspace {}", path.display()),
            Err(e) => warn!("Could not remove {}: {}", path.display(), e),
        }
    }
}

/// Reduce an uploaded name to a safe single path component.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                Some(c)
            } else if c.is_whitespace() {
                Some('_')
            } else {
                None
            }
        })
        .collect();

    cleaned.trim_start_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn workspace(root: &Path) -> BatchWorkspace {
        BatchWorkspace::create_in(root, IntakeConfig::default()).unwrap()
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("JFCS2-1_FIFJIN_250107.txt"), "JFCS2-1_FIFJIN_250107.txt");
        assert_eq!(sanitize_file_name("../../etc/passwd.txt"), "passwd.txt");
        assert_eq!(sanitize_file_name("C:\\temp\\JF BNI.txt"), "JF_BNI.txt");
        assert_eq!(sanitize_file_name(".hidden.txt"), "hidden.txt");
        assert_eq!(sanitize_file_name("surat*?<>.txt"), "surat.txt");
        assert_eq!(sanitize_file_name("..."), "");
    }

    #[test]
    fn test_token_is_directory_name() {
        let root = tempfile::tempdir().unwrap();
        let ws = workspace(root.path());

        assert!(ws.token().starts_with("rekon-"));
        assert_eq!(ws.path().parent().unwrap(), root.path());
    }

    #[test]
    fn test_stage_rejections() {
        let root = tempfile::tempdir().unwrap();
        let ws = BatchWorkspace::create_in(
            root.path(),
            IntakeConfig {
                max_file_size: 8,
                ..IntakeConfig::default()
            },
        )
        .unwrap();

        assert!(matches!(ws.stage("a.pdf", b"x"), Err(IntakeError::InvalidType { .. })));
        assert!(matches!(
            ws.stage("a.txt", b"123456789"),
            Err(IntakeError::TooLarge { size: 9, .. })
        ));
        assert!(matches!(ws.stage("*?.txt", b"x"), Err(IntakeError::InvalidName { .. })));

        let path = ws.stage("JF BNI.TXT", b"x").unwrap();
        assert_eq!(path, ws.path().join("JF_BNI.TXT"));
        assert_eq!(fs::read(path).unwrap(), b"x");
    }

    #[test]
    fn test_stage_all_reports_skips() {
        let root = tempfile::tempdir().unwrap();
        let ws = workspace(root.path());

        let report = ws
            .stage_all(&[("JFCS2-1.txt", "a"), ("notes.md", "b"), ("JFBNI-1.txt", "c")])
            .unwrap();

        assert_eq!(report.staged, vec!["JFCS2-1.txt".to_string(), "JFBNI-1.txt".to_string()]);
        assert_eq!(report.issues, vec!["notes.md (invalid type)".to_string()]);
        assert_eq!(
            report.to_string(),
            "Successfully uploaded 2 file(s). Skipped 1 invalid file(s)"
        );
    }

    #[test]
    fn test_stage_all_limits() {
        let root = tempfile::tempdir().unwrap();
        let ws = BatchWorkspace::create_in(
            root.path(),
            IntakeConfig {
                max_files: 1,
                ..IntakeConfig::default()
            },
        )
        .unwrap();

        let too_many = ws.stage_all(&[("a.txt", "a"), ("b.txt", "b")]).unwrap_err();
        assert_eq!(too_many.to_string(), "Too many files. Maximum 1 files allowed");

        let none = ws.stage_all(&[("a.csv", "a")]).unwrap_err();
        assert_eq!(
            none.to_string(),
            "No valid files uploaded. Issues: a.csv (invalid type)"
        );

        let empty: [(&str, &str); 0] = [];
        let nothing = ws.stage_all(&empty).unwrap_err();
        assert_eq!(nothing.to_string(), "No valid files uploaded");
    }

    #[test]
    fn test_stage_paths_bounds_reads() {
        let root = tempfile::tempdir().unwrap();
        let source = tempfile::tempdir().unwrap();
        let small = source.path().join("JFCS2-1.txt");
        let big = source.path().join("JFBIG-1.txt");
        let other = source.path().join("notes.md");
        fs::write(&small, "1234").unwrap();
        fs::write(&big, "x".repeat(64)).unwrap();
        fs::write(&other, "x").unwrap();

        let ws = BatchWorkspace::create_in(
            root.path(),
            IntakeConfig {
                max_file_size: 16,
                ..IntakeConfig::default()
            },
        )
        .unwrap();
        let report = ws.stage_paths(&[&small, &big, &other]).unwrap();

        assert_eq!(report.staged, vec!["JFCS2-1.txt".to_string()]);
        assert_eq!(
            report.issues,
            vec![
                "JFBIG-1.txt (too large)".to_string(),
                "notes.md (invalid type)".to_string()
            ]
        );
        assert!(!ws.path().join("JFBIG-1.txt").exists());
    }

    #[test]
    fn test_stage_paths_checks_count_before_opening() {
        let root = tempfile::tempdir().unwrap();
        let ws = BatchWorkspace::create_in(
            root.path(),
            IntakeConfig {
                max_files: 1,
                ..IntakeConfig::default()
            },
        )
        .unwrap();

        // Neither file exists; only the count is looked at.
        let missing = [root.path().join("a.txt"), root.path().join("b.txt")];
        let err = ws.stage_paths(&missing).unwrap_err();

        assert!(matches!(err, IntakeError::TooManyFiles { count: 2, limit: 1 }));
    }

    #[test]
    fn test_close_removes_directory() {
        let root = tempfile::tempdir().unwrap();
        let ws = workspace(root.path());
        ws.stage("JFCS2-1.txt", b"x").unwrap();
        let path = ws.path().to_path_buf();

        ws.close();

        assert!(!path.exists());
    }
}
