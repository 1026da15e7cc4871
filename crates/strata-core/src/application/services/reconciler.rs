//! Reconciler - decides between existing and fresh content for one target.
//!
//! The policy is strict no-clobber: a file that still parses is written back
//! unchanged, whatever the current configuration would produce. Only a
//! missing or unparseable file receives the freshly built tree.

use std::fmt;
use std::path::Path;

use tracing::{debug, instrument};

use crate::{
    application::ports::Filesystem,
    domain::GeneratedArtifact,
    error::StrataResult,
    source,
};

/// What the reconciler did with one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReconcileOutcome {
    /// Nothing readable existed; fresh content was written.
    Created,
    /// A file existed but did not parse; fresh content replaced it.
    Regenerated,
    /// A parseable file existed and was written back as-is.
    Preserved,
}

impl ReconcileOutcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Regenerated => "regenerated",
            Self::Preserved => "preserved",
        }
    }
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-then-write reconciliation against a [`Filesystem`].
///
/// Not safe against concurrent runs on the same directory.
pub struct Reconciler<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> Reconciler<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Reconcile `artifact` against `root`, consuming it.
    #[instrument(skip_all, fields(path = %artifact.path, kind = %artifact.kind))]
    pub fn reconcile(
        &self,
        root: &Path,
        artifact: GeneratedArtifact,
    ) -> StrataResult<ReconcileOutcome> {
        let target = artifact.path.under(root);

        let (tree, outcome) = match self.filesystem.read_file(&target) {
            Ok(existing) => match source::parse(&existing) {
                Some(tree) => (tree, ReconcileOutcome::Preserved),
                None => {
                    debug!("Existing file does not parse, regenerating");
                    (artifact.tree, ReconcileOutcome::Regenerated)
                }
            },
            Err(e) => {
                debug!(error = %e, "No readable file, creating");
                (artifact.tree, ReconcileOutcome::Created)
            }
        };

        let bytes = source::serialize(&tree);

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(&target, &bytes)?;

        debug!(%outcome, bytes = bytes.len(), "Artifact reconciled");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ApplicationError, ports::MockFilesystem};
    use crate::domain::{ArtifactKind, RelativePath};
    use crate::error::StrataError;
    use crate::source::{FuncDecl, Signature, SourceTree};
    use mockall::predicate::*;
    use std::path::PathBuf;

    fn artifact() -> GeneratedArtifact {
        let tree = SourceTree::new("models").with(FuncDecl::new(Signature::new("Fresh")));
        GeneratedArtifact {
            kind: ArtifactKind::Model,
            path: RelativePath::try_new("internal/domain/models/widget.go").unwrap(),
            tree,
        }
    }

    fn missing() -> StrataError {
        ApplicationError::FilesystemError {
            path: PathBuf::from("x"),
            reason: "not found".into(),
        }
        .into()
    }

    #[test]
    fn missing_file_gets_fresh_content() {
        let expected = source::serialize(&artifact().tree);
        let mut fs = MockFilesystem::new();
        fs.expect_read_file().returning(|_| Err(missing()));
        fs.expect_create_dir_all()
            .with(eq(Path::new("/out/internal/domain/models")))
            .times(1)
            .returning(|_| Ok(()));
        fs.expect_write_file()
            .withf(move |path, content| {
                path == Path::new("/out/internal/domain/models/widget.go") && content == expected
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = Reconciler::new(&fs)
            .reconcile(Path::new("/out"), artifact())
            .unwrap();
        assert_eq!(outcome, ReconcileOutcome::Created);
    }

    #[test]
    fn parseable_file_is_written_back_unchanged() {
        let existing = b"package models\n\nfunc Edited() {\n\treturn\n}\n".to_vec();
        let echo = existing.clone();
        let mut fs = MockFilesystem::new();
        fs.expect_read_file().returning(move |_| Ok(echo.clone()));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file()
            .withf(move |_, content| content == existing)
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = Reconciler::new(&fs)
            .reconcile(Path::new("/out"), artifact())
            .unwrap();
        assert_eq!(outcome, ReconcileOutcome::Preserved);
    }

    #[test]
    fn unparseable_file_is_regenerated() {
        let expected = source::serialize(&artifact().tree);
        let mut fs = MockFilesystem::new();
        fs.expect_read_file()
            .returning(|_| Ok(b"this is not go\n".to_vec()));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file()
            .withf(move |_, content| content == expected)
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = Reconciler::new(&fs)
            .reconcile(Path::new("/out"), artifact())
            .unwrap();
        assert_eq!(outcome, ReconcileOutcome::Regenerated);
    }

    #[test]
    fn directory_failure_skips_the_write() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_file().returning(|_| Err(missing()));
        fs.expect_create_dir_all().returning(|path| {
            Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "permission denied".into(),
            }
            .into())
        });
        fs.expect_write_file().never();

        let result = Reconciler::new(&fs).reconcile(Path::new("/out"), artifact());
        assert!(matches!(
            result,
            Err(StrataError::Application(ApplicationError::FilesystemError { .. }))
        ));
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(ReconcileOutcome::Created.to_string(), "created");
        assert_eq!(ReconcileOutcome::Regenerated.to_string(), "regenerated");
        assert_eq!(ReconcileOutcome::Preserved.to_string(), "preserved");
    }
}
