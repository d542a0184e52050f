//! # Mover Module
//!
//! Relocates planned removals into the backup directory.
//!
//! Nothing is ever deleted: every planned file is moved into
//! `<root>/backup_files`, flat, keyed by basename. A file that is already
//! gone at move time (a prior overlapping step took it) is a warning, not
//! an error. Basename collisions inside the backup get a ` (n)` suffix so
//! one backup never overwrites another.

use crate::core::reconcile::RemovalPlan;
use crate::core::scanner::BACKUP_DIR_NAME;
use crate::error::MoveError;
use crate::events::{Event, EventSender, MoveEvent};
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of a sweep's move phase
#[derive(Debug, Default)]
pub struct MoveReport {
    /// (source, destination) for each relocated file
    pub moved: Vec<(PathBuf, PathBuf)>,
    /// Planned files that were gone at move time
    pub missing: Vec<PathBuf>,
    /// Per-file move failures (non-fatal)
    pub errors: Vec<String>,
}

/// Moves planned removals into the backup directory under the scan root
pub struct BackupMover {
    backup_dir: PathBuf,
}

impl BackupMover {
    pub fn new(root: &Path) -> Self {
        Self {
            backup_dir: root.join(BACKUP_DIR_NAME),
        }
    }

    /// Where this mover puts relocated files
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Execute the plan.
    ///
    /// Failing to create the backup directory is fatal; everything past
    /// that point is best effort per file.
    pub fn execute(
        &self,
        plan: &RemovalPlan,
        events: &EventSender,
    ) -> Result<MoveReport, MoveError> {
        fs::create_dir_all(&self.backup_dir).map_err(|source| MoveError::CreateBackupDir {
            path: self.backup_dir.clone(),
            source,
        })?;

        events.send(Event::Move(MoveEvent::Started {
            total_files: plan.len(),
        }));

        let mut report = MoveReport::default();

        for removal in &plan.removals {
            let source = &removal.path;

            if !source.exists() {
                tracing::warn!(
                    path = %source.display(),
                    "planned file not found, possibly already moved"
                );
                events.send(Event::Move(MoveEvent::FileMissing {
                    path: source.clone(),
                }));
                report.missing.push(source.clone());
                continue;
            }

            let dest = self.unclaimed_destination(source);

            match move_file(source, &dest) {
                Ok(()) => {
                    events.send(Event::Move(MoveEvent::FileMoved {
                        path: source.clone(),
                        dest: dest.clone(),
                    }));
                    report.moved.push((source.clone(), dest));
                }
                Err(e) => {
                    let error = MoveError::MoveFailed {
                        path: source.clone(),
                        dest,
                        source: e,
                    };
                    tracing::warn!(error = %error, "move failed");
                    report.errors.push(error.to_string());
                }
            }
        }

        events.send(Event::Move(MoveEvent::Completed {
            moved: report.moved.len(),
            missing: report.missing.len(),
        }));

        Ok(report)
    }

    /// Destination for `source`: its basename inside the backup directory,
    /// suffixed with ` (n)` if that name is already taken.
    fn unclaimed_destination(&self, source: &Path) -> PathBuf {
        let candidate = self.backup_dir.join(source.file_name().unwrap_or_default());
        if !candidate.exists() {
            return candidate;
        }

        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = source.extension().map(|e| e.to_string_lossy().into_owned());

        for n in 1.. {
            let name = match &extension {
                Some(ext) => format!("{stem} ({n}).{ext}"),
                None => format!("{stem} ({n})"),
            };
            let candidate = self.backup_dir.join(name);
            if !candidate.exists() {
                return candidate;
            }
        }
        unreachable!("suffix search terminates at the first free name")
    }
}

/// Rename, with a copy+verify+delete fallback for cross-filesystem moves
fn move_file(source: &Path, dest: &Path) -> std::io::Result<()> {
    fs::rename(source, dest).or_else(|_| {
        let source_size = fs::metadata(source)?.len();
        fs::copy(source, dest)?;

        // Verify destination size matches source before deleting
        let dest_size = fs::metadata(dest)?.len();
        if dest_size != source_size {
            let _ = fs::remove_file(dest);
            return Err(std::io::Error::other(format!(
                "copy verification failed: source {} bytes, dest {} bytes",
                source_size, dest_size
            )));
        }

        fs::remove_file(source)
    })
}
