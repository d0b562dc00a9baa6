//! JSON metadata sidecars stored next to archived audio files.
//!
//! A sidecar records where an audio file came from and which export entry it
//! belongs to. The episode id in the sidecar is what lets the archiver tell
//! "same episode, already archived" apart from "different episode whose title
//! sanitizes to the same filename".

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::opml::EpisodeRecord;

/// Episode metadata stored beside the audio file as pretty-printed JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sidecar {
    pub feed_title: String,
    pub episode_title: String,
    pub audio_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
}

impl Sidecar {
    pub fn from_record(record: &EpisodeRecord) -> Self {
        Self {
            feed_title: record.feed_title.clone(),
            episode_title: record.episode_title.clone(),
            audio_url: record.audio_url.clone(),
            published: record.published.clone(),
            episode_id: record.episode_id.clone(),
            page_url: record.page_url.clone(),
        }
    }

    /// Path of the sidecar for an audio file: the audio path with `.json` appended.
    pub fn path_for(audio_path: &Path) -> PathBuf {
        let mut name = OsString::from(audio_path.as_os_str());
        name.push(".json");
        PathBuf::from(name)
    }

    /// Loads the sidecar for `audio_path`. Missing or unreadable sidecars
    /// yield `None`; an archive written by an older run may not have them.
    pub fn load_for(audio_path: &Path) -> Option<Self> {
        let data = fs::read_to_string(Self::path_for(audio_path)).ok()?;
        serde_json::from_str(&data).ok()
    }

    /// Writes the sidecar for `audio_path`.
    pub fn write_for(&self, audio_path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(Self::path_for(audio_path), json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> EpisodeRecord {
        EpisodeRecord {
            feed_title: "My Show".to_string(),
            episode_title: "Ep 1".to_string(),
            audio_url: "https://example.net/files/1.mp3".to_string(),
            published: Some("2001-01-01T01:01:01-00:00".to_string()),
            episode_id: Some("12345".to_string()),
            page_url: None,
        }
    }

    #[test]
    fn sidecar_path_appends_json() {
        assert_eq!(
            Sidecar::path_for(Path::new("/a/Show/Ep 1.mp3")),
            PathBuf::from("/a/Show/Ep 1.mp3.json")
        );
    }

    #[test]
    fn write_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("Ep 1.mp3");
        let sidecar = Sidecar::from_record(&record());
        sidecar.write_for(&audio).unwrap();

        let loaded = Sidecar::load_for(&audio).expect("sidecar should load");
        assert_eq!(loaded.episode_id.as_deref(), Some("12345"));
        assert_eq!(loaded.audio_url, "https://example.net/files/1.mp3");
    }

    #[test]
    fn missing_sidecar_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Sidecar::load_for(&dir.path().join("nope.mp3")).is_none());
    }

    #[test]
    fn corrupt_sidecar_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("Ep 1.mp3");
        fs::write(Sidecar::path_for(&audio), "not json").unwrap();
        assert!(Sidecar::load_for(&audio).is_none());
    }
}
