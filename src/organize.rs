// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Organizer engine.
//!
//! The engine makes one non-recursive pass over the top-level of a
//! source directory, classifies every regular file by extension through
//! an [`ExtensionCatalog`], and relocates each file into its category
//! subdirectory, creating that subdirectory on demand. The outcome of
//! the pass comes back as a [`RunReport`].
//!
//! # Pass Semantics
//!
//! Subdirectories and hidden entries (names starting with a dot) are
//! never touched. With an age threshold active, only files strictly
//! older than the threshold qualify; a file exactly at the boundary
//! stays put. A dry run computes every decision a real run would make,
//! moves nothing, and mutates nothing.
//!
//! The pass is best-effort: a move that fails is recorded in the report
//! with its cause, and the pass continues with the next entry. Only the
//! up-front check that the source path names a directory can abort the
//! whole run.
//!
//! # Idempotence
//!
//! Because the pass never recurses, files that an earlier run already
//! relocated live under category subdirectories and fall outside the
//! top-level listing. Running the engine repeatedly over the same
//! directory moves each originally unsorted file at most once.
//!
//! The engine is single-threaded and performs blocking filesystem
//! calls. It assumes single-writer access to the source directory for
//! the duration of one run; concurrent runs over the same directory
//! are not coordinated.

use crate::{
    catalog::ExtensionCatalog,
    fs::{Filesystem, FsError, OsFilesystem},
    report::{Decision, RunReport},
};

use std::{
    path::{Path, PathBuf},
    time::SystemTime,
};
use tracing::{debug, info, instrument, warn};

/// Seconds per day, for age threshold math.
const SECONDS_PER_DAY: u64 = 86400;

/// Extension and age based directory organizer.
///
/// Holds the catalog it classifies with and the filesystem it acts
/// through. Both are injected at construction, so alternate catalogs
/// and filesystem doubles slot in without process-wide state.
#[derive(Debug)]
pub struct Organizer<F = OsFilesystem>
where
    F: Filesystem,
{
    catalog: ExtensionCatalog,
    filesystem: F,
}

impl Organizer<OsFilesystem> {
    /// Construct new organizer over the operating system's filesystem.
    pub fn new(catalog: ExtensionCatalog) -> Self {
        Self::with_filesystem(catalog, OsFilesystem::new())
    }
}

impl<F> Organizer<F>
where
    F: Filesystem,
{
    /// Construct new organizer over a specific filesystem provider.
    pub fn with_filesystem(catalog: ExtensionCatalog, filesystem: F) -> Self {
        Self {
            catalog,
            filesystem,
        }
    }

    /// Catalog this organizer classifies with.
    pub fn catalog(&self) -> &ExtensionCatalog {
        &self.catalog
    }

    /// Organize top-level files of target directory.
    ///
    /// Classifies every non-hidden regular file at the top level of
    /// `source_dir` and, unless `dry_run` is set, moves each one into
    /// its category subdirectory. With `age_threshold_days` set to a
    /// non-zero value, only files strictly older than that many days
    /// qualify. A threshold of zero behaves like no threshold at all.
    ///
    /// # Errors
    ///
    /// - Return [`OrganizeError::NotADirectory`] if `source_dir` does
    ///   not name an existing directory. Nothing is mutated.
    /// - Return [`OrganizeError::Filesystem`] if the directory listing
    ///   itself cannot be produced.
    ///
    /// Per-file move failures are not errors of the run. They land in
    /// the report as [`Decision::MoveFailed`] and the pass continues.
    #[instrument(skip(self, source_dir), level = "debug")]
    pub fn organize(
        &self,
        source_dir: impl AsRef<Path>,
        dry_run: bool,
        age_threshold_days: Option<u64>,
    ) -> Result<RunReport> {
        let source_dir = source_dir.as_ref();
        if !self.filesystem.is_dir(source_dir) {
            return Err(OrganizeError::NotADirectory {
                path: source_dir.to_path_buf(),
            });
        }

        // INVARIANT: A threshold of zero disables the filter, same as
        // the threshold being absent.
        let threshold_secs = age_threshold_days
            .filter(|days| *days > 0)
            .map(|days| days.saturating_mul(SECONDS_PER_DAY));

        info!(
            "organize {:?}{}",
            source_dir.display(),
            if dry_run { " (dry run)" } else { "" }
        );

        let now = SystemTime::now();
        let mut report = RunReport::new();
        for entry in self.filesystem.list_dir(source_dir)? {
            if entry.is_dir {
                continue;
            }

            if entry.name.starts_with('.') {
                debug!("skip hidden entry {:?}", entry.name);
                report.record(Decision::SkipHidden { name: entry.name });
                continue;
            }

            report.count_scanned();

            if let Some(threshold_secs) = threshold_secs {
                let age_secs = now
                    .duration_since(entry.modified)
                    .unwrap_or_default()
                    .as_secs();

                // INVARIANT: Strictly older than the threshold
                // qualifies. Exactly at the boundary does not.
                if age_secs <= threshold_secs {
                    info!("skip {:?}: not older than age threshold", entry.name);
                    report.record(Decision::SkipTooNew { name: entry.name });
                    continue;
                }
            }

            let extension = extension_of(&entry.name);
            let category = self.catalog.resolve(&extension);
            let target_dir = source_dir.join(category.as_path());
            let destination = target_dir.join(&entry.name);

            if dry_run {
                info!("would move {:?} to {:?}", entry.name, destination.display());
                report.record(Decision::PlannedMove {
                    name: entry.name,
                    destination,
                });
                continue;
            }

            let outcome = self
                .filesystem
                .create_dir_all(&target_dir)
                .and_then(|_| {
                    self.filesystem
                        .move_file(source_dir.join(&entry.name), &destination)
                });

            match outcome {
                Ok(()) => {
                    debug!("moved {:?} to {:?}", entry.name, destination.display());
                    report.count_moved();
                    report.record(Decision::Moved {
                        name: entry.name,
                        destination,
                    });
                }
                Err(error) => {
                    warn!("failed to move {:?}: {error}", entry.name);
                    report.record(Decision::MoveFailed {
                        name: entry.name,
                        source: error,
                    });
                }
            }
        }

        info!(
            "organization complete: scanned {}, moved {}",
            report.scanned(),
            report.moved()
        );

        Ok(report)
    }
}

/// Lower-cased suffix of a file name, leading dot included.
///
/// Names without a suffix yield the empty string, which the catalog
/// resolves to its fallback category.
fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|extension| format!(".{}", extension.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Organizer engine error types.
#[derive(Debug, thiserror::Error)]
pub enum OrganizeError {
    /// Source path does not name an existing directory.
    #[error("target path {:?} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    /// Directory listing cannot be produced.
    #[error(transparent)]
    Filesystem(#[from] FsError),
}

/// Friendly result alias :3
type Result<T, E = OrganizeError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::DirEntryInfo;

    use pretty_assertions::assert_eq;
    use simple_test_case::test_case;
    use std::{
        cell::RefCell,
        collections::BTreeSet,
        io::{Error as IoError, ErrorKind},
        time::Duration,
    };

    /// In-memory filesystem double rooted at "/downloads".
    #[derive(Debug, Default)]
    struct FakeFilesystem {
        entries: Vec<DirEntryInfo>,
        fail_moves_of: BTreeSet<String>,
        created: RefCell<BTreeSet<PathBuf>>,
        moves: RefCell<Vec<(PathBuf, PathBuf)>>,
    }

    impl FakeFilesystem {
        fn root() -> PathBuf {
            PathBuf::from("/downloads")
        }

        fn with_entries(entries: impl IntoIterator<Item = DirEntryInfo>) -> Self {
            Self {
                entries: entries.into_iter().collect(),
                ..Self::default()
            }
        }

        fn failing_moves_of(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
            self.fail_moves_of = names.into_iter().map(Into::into).collect();
            self
        }

        fn moves(&self) -> Vec<(PathBuf, PathBuf)> {
            self.moves.borrow().clone()
        }

        fn created(&self) -> BTreeSet<PathBuf> {
            self.created.borrow().clone()
        }
    }

    impl Filesystem for FakeFilesystem {
        fn list_dir(&self, _path: impl AsRef<Path>) -> crate::fs::Result<Vec<DirEntryInfo>> {
            Ok(self.entries.clone())
        }

        fn is_dir(&self, path: impl AsRef<Path>) -> bool {
            path.as_ref() == Self::root()
        }

        fn create_dir_all(&self, path: impl AsRef<Path>) -> crate::fs::Result<()> {
            self.created.borrow_mut().insert(path.as_ref().to_path_buf());
            Ok(())
        }

        fn move_file(
            &self,
            from: impl AsRef<Path>,
            to: impl AsRef<Path>,
        ) -> crate::fs::Result<()> {
            let name = from
                .as_ref()
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            if self.fail_moves_of.contains(&name) {
                return Err(FsError::MoveFile {
                    source: IoError::from(ErrorKind::PermissionDenied),
                    from: from.as_ref().to_path_buf(),
                    to: to.as_ref().to_path_buf(),
                });
            }

            self.moves
                .borrow_mut()
                .push((from.as_ref().to_path_buf(), to.as_ref().to_path_buf()));

            Ok(())
        }
    }

    fn file(name: &str, age_secs: u64) -> DirEntryInfo {
        DirEntryInfo {
            name: name.into(),
            is_dir: false,
            modified: SystemTime::now() - Duration::from_secs(age_secs),
        }
    }

    fn subdir(name: &str) -> DirEntryInfo {
        DirEntryInfo {
            name: name.into(),
            is_dir: true,
            modified: SystemTime::now(),
        }
    }

    const DAY: u64 = 86400;

    #[test]
    fn rejects_missing_directory() {
        let filesystem = FakeFilesystem::with_entries([]);
        let organizer = Organizer::with_filesystem(ExtensionCatalog::default(), filesystem);

        let result = organizer.organize("/nowhere", false, None);

        assert!(matches!(
            result,
            Err(OrganizeError::NotADirectory { path }) if path == PathBuf::from("/nowhere")
        ));
        assert!(organizer.filesystem.moves().is_empty());
        assert!(organizer.filesystem.created().is_empty());
    }

    #[test]
    fn empty_directory_yields_empty_report() -> anyhow::Result<()> {
        let filesystem = FakeFilesystem::with_entries([]);
        let organizer = Organizer::with_filesystem(ExtensionCatalog::default(), filesystem);

        let report = organizer.organize(FakeFilesystem::root(), false, None)?;

        assert_eq!(report.scanned(), 0);
        assert_eq!(report.moved(), 0);
        assert!(report.decisions().is_empty());
        assert!(organizer.filesystem.created().is_empty());

        Ok(())
    }

    #[test]
    fn moves_files_into_mapped_categories() -> anyhow::Result<()> {
        let filesystem = FakeFilesystem::with_entries([
            file("report.pdf", DAY),
            file("song.MP3", DAY),
            file("notes.xyz", DAY),
            file("README", DAY),
        ]);
        let organizer = Organizer::with_filesystem(ExtensionCatalog::default(), filesystem);

        let report = organizer.organize(FakeFilesystem::root(), false, None)?;

        assert_eq!(report.scanned(), 4);
        assert_eq!(report.moved(), 4);
        let destinations = organizer
            .filesystem
            .moves()
            .into_iter()
            .map(|(_, to)| to)
            .collect::<Vec<_>>();
        assert_eq!(
            destinations,
            vec![
                PathBuf::from("/downloads/Documents/PDFs/report.pdf"),
                PathBuf::from("/downloads/Media/Music/song.MP3"),
                PathBuf::from("/downloads/Others/notes.xyz"),
                PathBuf::from("/downloads/Others/README"),
            ]
        );
        assert!(organizer
            .filesystem
            .created()
            .contains(&PathBuf::from("/downloads/Documents/PDFs")));

        Ok(())
    }

    #[test]
    fn skips_subdirectories_and_hidden_entries() -> anyhow::Result<()> {
        let filesystem = FakeFilesystem::with_entries([
            subdir("Images"),
            file(".env", 40 * DAY),
            file("photo.png", DAY),
        ]);
        let organizer = Organizer::with_filesystem(ExtensionCatalog::default(), filesystem);

        let report = organizer.organize(FakeFilesystem::root(), false, None)?;

        // Hidden entries record a decision but never count as scanned.
        // Subdirectories do not even record one.
        assert_eq!(report.scanned(), 1);
        assert_eq!(report.moved(), 1);
        assert_eq!(report.decisions().len(), 2);
        assert!(matches!(
            report.decisions()[0],
            Decision::SkipHidden { ref name } if name == ".env"
        ));

        Ok(())
    }

    #[test]
    fn age_scenario_moves_only_old_files() -> anyhow::Result<()> {
        let filesystem = FakeFilesystem::with_entries([
            file("report.PDF", 40 * DAY),
            file("notes.txt", DAY),
        ]);
        let organizer = Organizer::with_filesystem(ExtensionCatalog::default(), filesystem);

        let report = organizer.organize(FakeFilesystem::root(), false, Some(30))?;

        assert_eq!(report.scanned(), 2);
        assert_eq!(report.moved(), 1);
        assert_eq!(
            organizer.filesystem.moves(),
            vec![(
                PathBuf::from("/downloads/report.PDF"),
                PathBuf::from("/downloads/Documents/PDFs/report.PDF"),
            )]
        );
        assert!(matches!(
            report.decisions()[1],
            Decision::SkipTooNew { ref name } if name == "notes.txt"
        ));

        Ok(())
    }

    #[test_case(30 * DAY, false; "exactly at threshold stays")]
    #[test_case(30 * DAY + 1, true; "one second older qualifies")]
    #[test]
    fn age_boundary_is_strict(age_secs: u64, eligible: bool) {
        use pretty_assertions::assert_eq;

        let filesystem = FakeFilesystem::with_entries([file("old.txt", age_secs)]);
        let organizer = Organizer::with_filesystem(ExtensionCatalog::default(), filesystem);

        let report = organizer
            .organize(FakeFilesystem::root(), false, Some(30))
            .unwrap();

        assert_eq!(report.scanned(), 1);
        assert_eq!(report.moved(), u64::from(eligible));
    }

    #[test_case(None; "absent threshold")]
    #[test_case(Some(0); "zero threshold")]
    #[test]
    fn zero_threshold_means_no_filter(age_threshold_days: Option<u64>) {
        use pretty_assertions::assert_eq;

        let filesystem = FakeFilesystem::with_entries([file("fresh.txt", 0)]);
        let organizer = Organizer::with_filesystem(ExtensionCatalog::default(), filesystem);

        let report = organizer
            .organize(FakeFilesystem::root(), false, age_threshold_days)
            .unwrap();

        assert_eq!(report.moved(), 1);
    }

    #[test]
    fn dry_run_computes_same_decisions_without_moving() -> anyhow::Result<()> {
        let entries = [
            file("report.pdf", 40 * DAY),
            file("photo.jpg", DAY),
            file("data.xyz", DAY),
        ];

        let dry = Organizer::with_filesystem(
            ExtensionCatalog::default(),
            FakeFilesystem::with_entries(entries.clone()),
        );
        let real = Organizer::with_filesystem(
            ExtensionCatalog::default(),
            FakeFilesystem::with_entries(entries),
        );

        let dry_report = dry.organize(FakeFilesystem::root(), true, None)?;
        let real_report = real.organize(FakeFilesystem::root(), false, None)?;

        assert_eq!(dry_report.scanned(), real_report.scanned());
        assert_eq!(dry_report.moved(), 0);
        assert_eq!(real_report.moved(), 3);
        assert!(dry.filesystem.moves().is_empty());
        assert!(dry.filesystem.created().is_empty());

        let dry_targets = dry_report
            .decisions()
            .iter()
            .map(|decision| decision.destination().cloned())
            .collect::<Vec<_>>();
        let real_targets = real_report
            .decisions()
            .iter()
            .map(|decision| decision.destination().cloned())
            .collect::<Vec<_>>();
        assert_eq!(dry_targets, real_targets);

        Ok(())
    }

    #[test]
    fn single_failure_does_not_abort_run() -> anyhow::Result<()> {
        let filesystem = FakeFilesystem::with_entries([
            file("stuck.pdf", DAY),
            file("song.mp3", DAY),
        ])
        .failing_moves_of(["stuck.pdf"]);
        let organizer = Organizer::with_filesystem(ExtensionCatalog::default(), filesystem);

        let report = organizer.organize(FakeFilesystem::root(), false, None)?;

        assert_eq!(report.scanned(), 2);
        assert_eq!(report.moved(), 1);
        assert!(report.has_failures());
        assert!(matches!(
            report.decisions()[0],
            Decision::MoveFailed { ref name, .. } if name == "stuck.pdf"
        ));
        assert_eq!(
            organizer.filesystem.moves(),
            vec![(
                PathBuf::from("/downloads/song.mp3"),
                PathBuf::from("/downloads/Media/Music/song.mp3"),
            )]
        );

        Ok(())
    }

    #[test_case("report.pdf", ".pdf"; "simple suffix")]
    #[test_case("report.PDF", ".pdf"; "upper case suffix")]
    #[test_case("archive.tar.gz", ".gz"; "last suffix wins")]
    #[test_case("README", ""; "no suffix")]
    #[test]
    fn extension_of_lowercases_suffix(name: &str, expect: &str) {
        use pretty_assertions::assert_eq;

        assert_eq!(extension_of(name), expect);
    }
}
