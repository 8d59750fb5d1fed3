//! Transfer executor module.
//!
//! Applies a planned mapping entry by entry:
//! - cut: rename
//! - copy: byte copy, overwriting the destination (links are replaced, not written through)
//! - link: hard link, falling back to a symbolic link
//!
//! Entries already applied are not rolled back when a later one fails.

use crate::models::config::TransferMode;
use crate::models::task::{TransferEntry, TransferMapping};
use crate::utils::fs::{FileOps, LocalFs};
use crate::{Error, Result};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Counts of what the executor did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionSummary {
    pub hard_links: usize,
    pub symlinks: usize,
    pub copies: usize,
    pub moves: usize,
    /// Entries whose source already is the destination.
    pub unchanged: usize,
}

impl ExecutionSummary {
    pub fn total(&self) -> usize {
        self.hard_links + self.symlinks + self.copies + self.moves + self.unchanged
    }
}

impl fmt::Display for ExecutionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hard links, {} symlinks, {} copies, {} moves",
            self.hard_links, self.symlinks, self.copies, self.moves
        )
    }
}

/// How a link entry ended up on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkKind {
    Hard,
    Symbolic,
}

/// Transfer executor.
pub struct Executor {
    fs: Arc<dyn FileOps>,
}

impl Executor {
    /// Executor on the local filesystem.
    pub fn new() -> Self {
        Self::with_fs(Arc::new(LocalFs))
    }

    /// Executor on custom filesystem primitives.
    pub fn with_fs(fs: Arc<dyn FileOps>) -> Self {
        Self { fs }
    }

    /// Apply every entry of `mapping` in order; the first failure aborts.
    pub fn execute(&self, mapping: &TransferMapping, mode: TransferMode) -> Result<ExecutionSummary> {
        tracing::info!("Executing {} transfers ({})", mapping.len(), mode);
        let mut summary = ExecutionSummary::default();

        for entry in mapping.iter() {
            if entry.source == entry.destination {
                tracing::debug!("Already in place: {}", entry.source.display());
                summary.unchanged += 1;
                continue;
            }
            self.apply(entry, mode, &mut summary)
                .map_err(|source| Error::Transfer {
                    from: entry.source.clone(),
                    to: entry.destination.clone(),
                    source,
                })?;
        }

        tracing::info!("Transfers complete: {}", summary);
        Ok(summary)
    }

    fn apply(
        &self,
        entry: &TransferEntry,
        mode: TransferMode,
        summary: &mut ExecutionSummary,
    ) -> std::io::Result<()> {
        if let Some(parent) = entry.destination.parent() {
            self.fs.create_dir_all(parent)?;
        }

        match mode {
            TransferMode::Cut => {
                // Renaming onto a hard link of itself leaves both names in place.
                if !self.fs.is_symlink(&entry.destination)
                    && self.fs.same_file(&entry.source, &entry.destination)
                {
                    tracing::debug!("Already linked in place: {}", entry.destination.display());
                    summary.unchanged += 1;
                    return Ok(());
                }
                self.fs.rename(&entry.source, &entry.destination)?;
                summary.moves += 1;
            }
            TransferMode::Copy => {
                // Copying through a link to the source would truncate the source.
                if self.fs.exists(&entry.destination)
                    && (self.fs.is_symlink(&entry.destination)
                        || self.fs.same_file(&entry.source, &entry.destination))
                {
                    self.fs.remove_file(&entry.destination)?;
                }
                self.fs.copy(&entry.source, &entry.destination)?;
                summary.copies += 1;
            }
            TransferMode::Link => match self.link(&entry.source, &entry.destination)? {
                LinkKind::Hard => summary.hard_links += 1,
                LinkKind::Symbolic => summary.symlinks += 1,
            },
        }

        tracing::debug!(
            "{}: {} -> {}",
            mode,
            entry.source.display(),
            entry.destination.display()
        );
        Ok(())
    }

    /// Hard link, else symlink, else remove whatever reappeared and symlink again.
    fn link(&self, source: &Path, destination: &Path) -> std::io::Result<LinkKind> {
        if self.fs.exists(destination) {
            let _ = self.fs.remove_file(destination);
        }

        if let Err(e) = self.fs.hard_link(source, destination) {
            tracing::debug!("Hard link failed for {}: {}", destination.display(), e);
        } else {
            return Ok(LinkKind::Hard);
        }

        if let Err(e) = self.fs.symlink(source, destination) {
            tracing::debug!("Symlink failed for {}: {}", destination.display(), e);
        } else {
            return Ok(LinkKind::Symbolic);
        }

        if self.fs.exists(destination) {
            let _ = self.fs.remove_file(destination);
        }
        self.fs.symlink(source, destination)?;
        Ok(LinkKind::Symbolic)
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}
