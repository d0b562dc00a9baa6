//! Backfill: archive episodes found in saved feed snapshots.
//!
//! Episodes played in another app never show up in the export, but they do
//! appear in the feed XML. Walking the saved snapshots and fetching every
//! enclosure not yet on disk completes the archive.

use anyhow::Result;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use crate::archive::ArchiveLayout;
use crate::archiver::{archive_episodes, RunSummary};
use crate::fetch::FetchOptions;
use crate::opml::EpisodeRecord;

/// Builds episode records from every readable `feed.xml` under the archive.
///
/// The feed directory name stands in for the feed title (it is the
/// sanitized title from the original run, and sanitization is idempotent).
/// Items without a title or enclosure, and snapshots that fail to parse,
/// are skipped with a log line.
pub fn collect_backfill_episodes(layout: &ArchiveLayout) -> Vec<EpisodeRecord> {
    let mut episodes = Vec::new();
    let entries = match fs::read_dir(layout.root()) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("no archive at {}: {}", layout.root().display(), e);
            return episodes;
        }
    };

    for entry in entries.flatten() {
        let feed_dir = entry.path();
        if !feed_dir.is_dir() {
            continue;
        }
        let snapshot = feed_dir.join("feed.xml");
        if !snapshot.exists() {
            continue;
        }
        let feed_title = entry.file_name().to_string_lossy().into_owned();
        collect_from_snapshot(&snapshot, &feed_title, &mut episodes);
    }
    episodes
}

/// Archives everything the saved snapshots reference that is not on disk.
pub fn backfill_from_snapshots(
    layout: &ArchiveLayout,
    opts: &FetchOptions,
    jobs: usize,
) -> Result<RunSummary> {
    let episodes = collect_backfill_episodes(layout);
    tracing::info!("snapshots reference {} episodes", episodes.len());
    archive_episodes(layout, &episodes, opts, jobs)
}

fn collect_from_snapshot(snapshot: &Path, feed_title: &str, episodes: &mut Vec<EpisodeRecord>) {
    let file = match File::open(snapshot) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("cannot open {}: {}", snapshot.display(), e);
            return;
        }
    };
    let channel = match rss::Channel::read_from(BufReader::new(file)) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("unparseable feed snapshot {}: {}", snapshot.display(), e);
            return;
        }
    };

    for item in channel.items() {
        let (Some(title), Some(enclosure)) = (item.title(), item.enclosure()) else {
            tracing::debug!("snapshot item without title or enclosure; skipping");
            continue;
        };
        episodes.push(EpisodeRecord {
            feed_title: feed_title.to_string(),
            episode_title: title.to_string(),
            audio_url: enclosure.url().to_string(),
            published: item.pub_date().map(str::to_string),
            episode_id: item.guid().map(|g| g.value().to_string()),
            page_url: item.link().map(str::to_string),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED_XML: &str = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>My Show</title>
    <item>
      <title>Ep 1</title>
      <guid>tag:example.org,1</guid>
      <pubDate>Mon, 01 Jan 2001 01:01:01 GMT</pubDate>
      <enclosure url="https://example.org/files/1.mp3" length="10" type="audio/mpeg"/>
    </item>
    <item>
      <title>No enclosure</title>
    </item>
    <item>
      <enclosure url="https://example.org/files/untitled.mp3" length="10" type="audio/mpeg"/>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn collects_only_items_with_title_and_enclosure() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArchiveLayout::new(dir.path());
        fs::create_dir_all(dir.path().join("My Show")).unwrap();
        fs::write(dir.path().join("My Show/feed.xml"), FEED_XML).unwrap();

        let episodes = collect_backfill_episodes(&layout);
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].feed_title, "My Show");
        assert_eq!(episodes[0].episode_title, "Ep 1");
        assert_eq!(episodes[0].audio_url, "https://example.org/files/1.mp3");
        assert_eq!(episodes[0].episode_id.as_deref(), Some("tag:example.org,1"));
    }

    #[test]
    fn unparseable_snapshot_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArchiveLayout::new(dir.path());
        fs::create_dir_all(dir.path().join("Broken")).unwrap();
        fs::write(dir.path().join("Broken/feed.xml"), "not a feed").unwrap();
        fs::create_dir_all(dir.path().join("Good")).unwrap();
        fs::write(dir.path().join("Good/feed.xml"), FEED_XML).unwrap();

        let episodes = collect_backfill_episodes(&layout);
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].feed_title, "Good");
    }

    #[test]
    fn missing_archive_root_yields_nothing() {
        let layout = ArchiveLayout::new("/nonexistent/archive");
        assert!(collect_backfill_episodes(&layout).is_empty());
    }

    #[test]
    fn directories_without_snapshot_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArchiveLayout::new(dir.path());
        fs::create_dir_all(dir.path().join("No Snapshot")).unwrap();
        assert!(collect_backfill_episodes(&layout).is_empty());
    }
}
