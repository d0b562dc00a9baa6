//! Archive layout: deterministic on-disk paths for feeds and episodes.
//!
//! Every episode maps to `<root>/<feed>/<episode>.<ext>` via title
//! sanitization, so repeated runs resolve the same episode to the same path.
//! Presence of the final file is the archive's only completeness marker.

mod ext;
mod sanitize;
mod sidecar;

pub use ext::{audio_extension, filename_from_url_path};
pub use sanitize::sanitize_component;
pub use sidecar::Sidecar;

use std::path::{Path, PathBuf};

use crate::opml::EpisodeRecord;

/// Fallback component when a feed title sanitizes to nothing usable.
const DEFAULT_FEED_DIR: &str = "untitled-feed";
/// Fallback filename stem when neither title nor URL yields one.
const DEFAULT_EPISODE_STEM: &str = "episode";
/// Filename used for a feed's archived RSS snapshot.
const FEED_SNAPSHOT_NAME: &str = "feed.xml";

/// Where an episode should live on disk, given the current archive state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A file for this episode already exists at the path; nothing to fetch.
    Existing(PathBuf),
    /// The episode is absent; fetch and write to the path.
    Missing(PathBuf),
}

impl Target {
    pub fn path(&self) -> &Path {
        match self {
            Target::Existing(p) | Target::Missing(p) => p,
        }
    }
}

/// Root directory of the archive plus the path derivation rules.
///
/// Passed explicitly to the fetcher and the feed snapshotter; nothing in the
/// crate consults the working directory or other ambient state.
#[derive(Debug, Clone)]
pub struct ArchiveLayout {
    root: PathBuf,
}

impl ArchiveLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one feed's episodes: `<root>/<sanitized feed title>`.
    pub fn feed_dir(&self, feed_title: &str) -> PathBuf {
        self.root.join(component_or(feed_title, DEFAULT_FEED_DIR))
    }

    /// Path of a feed's archived RSS snapshot.
    pub fn feed_snapshot_path(&self, feed_title: &str) -> PathBuf {
        self.feed_dir(feed_title).join(FEED_SNAPSHOT_NAME)
    }

    /// Canonical audio path for an episode, before any collision handling:
    /// `<root>/<feed>/<episode>.<ext>` with the extension taken from the URL.
    pub fn episode_path(&self, record: &EpisodeRecord) -> PathBuf {
        let stem = self.episode_stem(record);
        let ext = audio_extension(&record.audio_url);
        self.feed_dir(&record.feed_title).join(format!("{stem}.{ext}"))
    }

    /// Resolves where an episode lives given what is already on disk.
    ///
    /// If the canonical path is taken by a *different* episode (the sidecar
    /// records another episode id), the filename gets `_<episode id>`
    /// appended before the extension. A taken path with no sidecar, or with a
    /// matching id, is treated as this episode already archived.
    pub fn resolve_episode_target(&self, record: &EpisodeRecord) -> Target {
        let path = self.episode_path(record);
        if !path.exists() {
            return Target::Missing(path);
        }

        let archived_id = Sidecar::load_for(&path).and_then(|s| s.episode_id);
        match (archived_id, record.episode_id.as_deref()) {
            (Some(ref a), Some(b)) if a != b => {
                let disambiguated = with_id_suffix(&path, b);
                if disambiguated.exists() {
                    Target::Existing(disambiguated)
                } else {
                    Target::Missing(disambiguated)
                }
            }
            _ => Target::Existing(path),
        }
    }

    fn episode_stem(&self, record: &EpisodeRecord) -> String {
        let from_title = sanitize_component(&record.episode_title);
        if is_usable(&from_title) {
            return from_title;
        }
        // Title-less entries fall back to the URL's filename, minus extension.
        let from_url = filename_from_url_path(&record.audio_url)
            .map(|name| {
                let stem = name.rsplit_once('.').map(|(s, _)| s.to_string()).unwrap_or(name);
                sanitize_component(&stem)
            })
            .unwrap_or_default();
        if is_usable(&from_url) {
            from_url
        } else {
            DEFAULT_EPISODE_STEM.to_string()
        }
    }
}

fn is_usable(component: &str) -> bool {
    !component.is_empty() && component != "." && component != ".."
}

fn component_or(title: &str, fallback: &str) -> String {
    let sanitized = sanitize_component(title);
    if is_usable(&sanitized) {
        sanitized
    } else {
        fallback.to_string()
    }
}

fn with_id_suffix(path: &Path, episode_id: &str) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(DEFAULT_EPISODE_STEM);
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("mp3");
    let id = component_or(episode_id, "alt");
    path.with_file_name(format!("{stem}_{id}.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(feed: &str, title: &str, url: &str, id: Option<&str>) -> EpisodeRecord {
        EpisodeRecord {
            feed_title: feed.to_string(),
            episode_title: title.to_string(),
            audio_url: url.to_string(),
            published: None,
            episode_id: id.map(String::from),
            page_url: None,
        }
    }

    #[test]
    fn episode_path_is_deterministic() {
        let layout = ArchiveLayout::new("/tmp/archive");
        let r = record("Feed A", "Ep 1", "https://example.org/a.mp3", None);
        assert_eq!(layout.episode_path(&r), layout.episode_path(&r));
        assert_eq!(
            layout.episode_path(&r),
            PathBuf::from("/tmp/archive/Feed A/Ep 1.mp3")
        );
    }

    #[test]
    fn unsafe_titles_never_reach_the_path() {
        let layout = ArchiveLayout::new("/tmp/archive");
        let r = record("Show: a/b?", "Ep: 1/2?", "https://example.org/a.mp3", None);
        let path = layout.episode_path(&r);
        let rendered = path.to_str().unwrap();
        // Only the root's own separators remain.
        assert_eq!(rendered.matches('/').count(), 4);
        assert!(!rendered.contains(':'));
        assert!(!rendered.contains('?'));
    }

    #[test]
    fn extension_follows_url() {
        let layout = ArchiveLayout::new("/a");
        let r = record("F", "E", "https://example.org/pod/x.m4a?sig=1", None);
        assert_eq!(layout.episode_path(&r), PathBuf::from("/a/F/E.m4a"));
    }

    #[test]
    fn empty_titles_fall_back() {
        let layout = ArchiveLayout::new("/a");
        let r = record("...", "??", "https://example.org/pod/ep-42.mp3", None);
        assert_eq!(layout.feed_dir("..."), PathBuf::from("/a/untitled-feed"));
        assert_eq!(
            layout.episode_path(&r),
            PathBuf::from("/a/untitled-feed/ep-42.mp3")
        );
    }

    #[test]
    fn resolve_missing_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArchiveLayout::new(dir.path());
        let r = record("F", "E", "https://example.org/e.mp3", Some("1"));
        match layout.resolve_episode_target(&r) {
            Target::Missing(p) => assert_eq!(p, dir.path().join("F/E.mp3")),
            t => panic!("expected Missing, got {t:?}"),
        }
    }

    #[test]
    fn resolve_existing_same_id_skips() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArchiveLayout::new(dir.path());
        let r = record("F", "E", "https://example.org/e.mp3", Some("1"));
        std::fs::create_dir_all(dir.path().join("F")).unwrap();
        std::fs::write(dir.path().join("F/E.mp3"), b"audio").unwrap();
        Sidecar::from_record(&r).write_for(&dir.path().join("F/E.mp3")).unwrap();

        assert_eq!(
            layout.resolve_episode_target(&r),
            Target::Existing(dir.path().join("F/E.mp3"))
        );
    }

    #[test]
    fn resolve_colliding_titles_get_id_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArchiveLayout::new(dir.path());
        let first = record("F", "E", "https://example.org/e.mp3", Some("1"));
        let second = record("F", "E", "https://example.org/other.mp3", Some("2"));
        std::fs::create_dir_all(dir.path().join("F")).unwrap();
        std::fs::write(dir.path().join("F/E.mp3"), b"audio").unwrap();
        Sidecar::from_record(&first).write_for(&dir.path().join("F/E.mp3")).unwrap();

        match layout.resolve_episode_target(&second) {
            Target::Missing(p) => assert_eq!(p, dir.path().join("F/E_2.mp3")),
            t => panic!("expected Missing with suffix, got {t:?}"),
        }
    }

    #[test]
    fn distinct_titles_sanitizing_alike_without_ids_resolve_to_existing() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArchiveLayout::new(dir.path());
        let first = record("F", "Ep/1", "https://example.org/a.mp3", None);
        let second = record("F", "Ep:1", "https://example.org/b.mp3", None);
        assert_eq!(layout.episode_path(&first), layout.episode_path(&second));

        std::fs::create_dir_all(dir.path().join("F")).unwrap();
        std::fs::write(layout.episode_path(&first), b"audio").unwrap();
        Sidecar::from_record(&first).write_for(&layout.episode_path(&first)).unwrap();

        // No ids to tell them apart: the occupant wins, no crash.
        assert_eq!(
            layout.resolve_episode_target(&second),
            Target::Existing(dir.path().join("F/Ep_1.mp3"))
        );
    }

    #[test]
    fn resolve_without_sidecar_treats_file_as_archived() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArchiveLayout::new(dir.path());
        let r = record("F", "E", "https://example.org/e.mp3", Some("1"));
        std::fs::create_dir_all(dir.path().join("F")).unwrap();
        std::fs::write(dir.path().join("F/E.mp3"), b"audio").unwrap();

        assert_eq!(
            layout.resolve_episode_target(&r),
            Target::Existing(dir.path().join("F/E.mp3"))
        );
    }
}
