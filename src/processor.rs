//! Per-item decision logic and the run statistics it feeds.

use std::fmt;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crate::error::UploadError;
use crate::mapping::LocationMap;
use crate::model::{LibrarySection, MediaItem};
use crate::plex::MediaServer;
use crate::{prober, resolver};

/// Pause after each successful upload so the server is not flooded.
pub const UPLOAD_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub matched: usize,
    pub uploaded: usize,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Final report, printed once per session.
pub struct Summary<'a> {
    pub stats: &'a RunStats,
    pub dry_run: bool,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== SUMMARY ===")?;
        writeln!(f, "{:<30}{}", "Total items scanned:", self.stats.total)?;
        write!(
            f,
            "{:<30}{} of {} matched logos",
            "Logos uploaded:", self.stats.uploaded, self.stats.matched
        )?;
        if self.dry_run {
            write!(f, "\n[DRY RUN] No changes made")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    SkippedHasLogo,
    SkippedNoPath,
    SkippedUnmapped,
    SkippedNoLogoFile,
    WouldUpload(PathBuf),
    Uploaded(PathBuf),
    UploadFailed,
    UnsupportedItemType,
    Failed,
}

#[derive(Debug, Clone, Copy)]
pub struct ProcessOptions {
    /// Replace logos the server already has.
    pub force: bool,
    pub dry_run: bool,
    pub verbose: bool,
    pub upload_delay: Duration,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            force: false,
            dry_run: false,
            verbose: false,
            upload_delay: UPLOAD_DELAY,
        }
    }
}

pub struct ItemProcessor<'a, S: MediaServer + ?Sized> {
    server: &'a S,
    map: &'a LocationMap,
    options: ProcessOptions,
}

impl<'a, S: MediaServer + ?Sized> ItemProcessor<'a, S> {
    pub fn new(server: &'a S, map: &'a LocationMap, options: ProcessOptions) -> Self {
        Self {
            server,
            map,
            options,
        }
    }

    /// Run one item through skip / resolve / probe / upload and record the
    /// result in `stats`.
    pub fn process(
        &self,
        stats: &mut RunStats,
        item: &MediaItem,
        section: &LibrarySection,
    ) -> Outcome {
        stats.total += 1;
        let verbose = self.options.verbose;

        if item.has_clear_logo() && !self.options.force {
            if verbose {
                println!("  [!] Logo already exists for: {}", item.title);
            }
            tracing::debug!(title = %item.title, "Skipping, logo present");
            return Outcome::SkippedHasLogo;
        }

        let (Some(remote_path), Some(keying)) =
            (item.remote_path(&section.kind), section.kind.keying())
        else {
            if verbose {
                println!("  [!] No file or folder known for: {}", item.title);
            }
            tracing::debug!(title = %item.title, kind = %section.kind, "Skipping, no remote path");
            return Outcome::SkippedNoPath;
        };

        let local_dir = match resolver::resolve(remote_path, keying, self.map) {
            Ok(dir) => dir,
            Err(e) => {
                if verbose {
                    println!("  [!] Could not match remote path for {}: {}", item.title, e);
                }
                tracing::debug!(title = %item.title, error = %e, "Skipping, unmapped");
                return Outcome::SkippedUnmapped;
            }
        };

        let Some(logo) = prober::probe(&local_dir) else {
            if verbose {
                println!(
                    "  [!] No supported logo files found for: {} in {}",
                    item.title,
                    local_dir.display()
                );
            }
            tracing::debug!(title = %item.title, dir = %local_dir.display(), "No logo file");
            return Outcome::SkippedNoLogoFile;
        };
        stats.matched += 1;

        if self.options.dry_run {
            if verbose {
                println!(
                    "  [DRY RUN] Would upload logo for: {} from {}",
                    item.title,
                    logo.display()
                );
            }
            return Outcome::WouldUpload(logo);
        }

        match self.server.upload_logo(item, &logo) {
            Ok(()) => {
                stats.uploaded += 1;
                if verbose {
                    println!("  [+] Uploaded logo for: {}", item.title);
                }
                tracing::info!(title = %item.title, file = %logo.display(), "Uploaded logo");
                if !self.options.upload_delay.is_zero() {
                    thread::sleep(self.options.upload_delay);
                }
                Outcome::Uploaded(logo)
            }
            Err(e @ UploadError::Rejected { .. }) => {
                println!(
                    "\n  [!] Error applying logo for Item: {} -> Filepath: {}:\n {}",
                    item.title,
                    logo.display(),
                    e
                );
                tracing::warn!(title = %item.title, error = %e, "Upload rejected");
                Outcome::UploadFailed
            }
            Err(e @ UploadError::Unsupported { .. }) => {
                println!("\n  [!] Failed for {}: {}", item.title, e);
                tracing::warn!(title = %item.title, error = %e, "Upload unsupported");
                Outcome::UnsupportedItemType
            }
            Err(e) => {
                println!(
                    "\n  [!] Upload failed for -> Item: {} -> Filepath: {}:\n {}",
                    item.title,
                    logo.display(),
                    e
                );
                tracing::warn!(title = %item.title, error = %e, "Upload failed");
                Outcome::Failed
            }
        }
    }
}
