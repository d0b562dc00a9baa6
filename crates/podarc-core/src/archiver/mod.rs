//! The archive run: ensure every playable record has an audio file on disk.
//!
//! Records are processed independently. A fetch failure is logged and
//! counted, never propagated; the run always visits every record.

mod pool;

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::archive::{ArchiveLayout, Sidecar, Target};
use crate::fetch::{self, FetchOptions};
use crate::opml::EpisodeRecord;

/// What happened to one record during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeOutcome {
    /// File already present (or its path was handled earlier this run).
    Skipped,
    Downloaded,
    Failed,
}

/// Aggregate counts for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: EpisodeOutcome) {
        match outcome {
            EpisodeOutcome::Skipped => self.skipped += 1,
            EpisodeOutcome::Downloaded => self.downloaded += 1,
            EpisodeOutcome::Failed => self.failed += 1,
        }
    }

    fn absorb(&mut self, other: RunSummary) {
        self.downloaded += other.downloaded;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }

    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }
}

/// Target paths already handled this run. Claiming before the exists-check
/// makes check+write one logical unit per path, so concurrent workers (and
/// duplicate records) never fetch the same target twice.
struct Claims(Mutex<HashSet<PathBuf>>);

impl Claims {
    fn new() -> Self {
        Self(Mutex::new(HashSet::new()))
    }

    /// True if the caller now owns this path for the rest of the run.
    fn claim(&self, path: &Path) -> bool {
        self.0.lock().unwrap().insert(path.to_path_buf())
    }
}

/// Archives every record: skip if present, fetch otherwise.
///
/// `jobs > 1` processes records on a bounded pool of OS threads; `jobs <= 1`
/// runs fully sequentially in document order. Returns per-run counts; only a
/// failure to create the archive root itself is an error.
pub fn archive_episodes(
    layout: &ArchiveLayout,
    episodes: &[EpisodeRecord],
    opts: &FetchOptions,
    jobs: usize,
) -> Result<RunSummary> {
    fs::create_dir_all(layout.root())
        .with_context(|| format!("create download dir {}", layout.root().display()))?;

    let claims = Claims::new();
    let summary = if jobs > 1 {
        pool::run_pool(layout, episodes, opts, jobs, &claims)
    } else {
        let mut summary = RunSummary::default();
        for record in episodes {
            summary.record(process_episode(layout, record, opts, &claims));
        }
        summary
    };
    tracing::info!(
        "run complete: {} downloaded, {} skipped, {} failed",
        summary.downloaded,
        summary.skipped,
        summary.failed
    );
    Ok(summary)
}

fn process_episode(
    layout: &ArchiveLayout,
    record: &EpisodeRecord,
    opts: &FetchOptions,
    claims: &Claims,
) -> EpisodeOutcome {
    let feed_dir = layout.feed_dir(&record.feed_title);
    if let Err(e) = fs::create_dir_all(&feed_dir) {
        tracing::warn!("cannot create {}: {}", feed_dir.display(), e);
        return EpisodeOutcome::Failed;
    }

    let path = match layout.resolve_episode_target(record) {
        Target::Existing(path) => {
            tracing::debug!(
                "already archived \"{}\" at {}",
                record.episode_title,
                path.display()
            );
            return EpisodeOutcome::Skipped;
        }
        Target::Missing(path) => path,
    };

    if !claims.claim(&path) {
        tracing::debug!("{} already handled this run", path.display());
        return EpisodeOutcome::Skipped;
    }

    match fetch::fetch_to_path(&record.audio_url, &path, opts) {
        Ok(bytes) => {
            tracing::info!("downloaded {} ({} bytes)", path.display(), bytes);
            if let Err(e) = Sidecar::from_record(record).write_for(&path) {
                tracing::warn!("could not write sidecar for {}: {}", path.display(), e);
            }
            EpisodeOutcome::Downloaded
        }
        Err(e) => {
            tracing::warn!(
                "failed to fetch \"{}\" ({}): {}",
                record.episode_title,
                record.audio_url,
                e
            );
            EpisodeOutcome::Failed
        }
    }
}
