//! Feed snapshots: keep a copy of each feed's RSS XML in the archive.
//!
//! The snapshot lives at `<feed dir>/feed.xml` and is refreshed on every
//! `feeds` run (feeds change over time; the audio files do not). Saved
//! snapshots are what `backfill` later mines for episodes the export never
//! listed as played.

mod backfill;

pub use backfill::{backfill_from_snapshots, collect_backfill_episodes};

use std::fs;

use crate::archive::ArchiveLayout;
use crate::fetch::{self, FetchOptions};
use crate::opml::FeedRecord;

/// Counts for one snapshot run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FeedSummary {
    pub refreshed: usize,
    /// Feeds with no feed URL in the export.
    pub skipped: usize,
    pub failed: usize,
}

/// Fetches every feed's RSS XML into its archive directory.
///
/// Per-feed failures are logged and counted, never fatal; the existing
/// snapshot (if any) is kept when a refresh fails.
pub fn snapshot_feeds(
    layout: &ArchiveLayout,
    feeds: &[FeedRecord],
    opts: &FetchOptions,
) -> FeedSummary {
    let mut summary = FeedSummary::default();
    for feed in feeds {
        let Some(feed_url) = feed.feed_url.as_deref() else {
            tracing::debug!("feed \"{}\" has no feed URL; skipping snapshot", feed.title);
            summary.skipped += 1;
            continue;
        };

        let feed_dir = layout.feed_dir(&feed.title);
        if let Err(e) = fs::create_dir_all(&feed_dir) {
            tracing::warn!("cannot create {}: {}", feed_dir.display(), e);
            summary.failed += 1;
            continue;
        }

        let snapshot = layout.feed_snapshot_path(&feed.title);
        match fetch::fetch_to_path(feed_url, &snapshot, opts) {
            Ok(bytes) => {
                tracing::info!("refreshed {} ({} bytes)", snapshot.display(), bytes);
                summary.refreshed += 1;
            }
            Err(e) => {
                tracing::warn!("failed to fetch feed \"{}\" ({}): {}", feed.title, feed_url, e);
                summary.failed += 1;
            }
        }
    }
    summary
}
