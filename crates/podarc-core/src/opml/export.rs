//! Extraction of feed and episode records from the parsed outline tree.

use std::fs;
use std::path::{Path, PathBuf};

use super::parse::{OpmlDocument, OpmlOutline};

/// Fatal failure to turn an export file into records. Nothing can be
/// downloaded when this occurs; the process exits non-zero.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("read export file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed export document: {0}")]
    Malformed(#[from] quick_xml::DeError),
}

/// One played episode with everything needed to archive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRecord {
    /// Feed/show name; becomes the archive subdirectory.
    pub feed_title: String,
    /// Episode name; becomes the filename stem.
    pub episode_title: String,
    /// Absolute http(s) URI of the audio file.
    pub audio_url: String,
    /// Publication timestamp, passed through verbatim.
    pub published: Option<String>,
    /// Export-assigned episode id; drives collision disambiguation.
    pub episode_id: Option<String>,
    /// Episode web page, recorded in the sidecar only.
    pub page_url: Option<String>,
}

/// An episode node from the export: either downloadable or not.
///
/// Entries without a usable audio URL are expected (episodes never played in
/// this app), so they are a variant rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeEntry {
    Playable(EpisodeRecord),
    Unplayable {
        feed_title: String,
        episode_title: String,
    },
}

/// One feed from the export; `feed_url` points at its RSS XML when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRecord {
    pub title: String,
    pub feed_url: Option<String>,
}

/// Fully materialized view of an export document, in document order.
#[derive(Debug, Clone)]
pub struct Export {
    feeds: Vec<FeedRecord>,
    entries: Vec<EpisodeEntry>,
}

impl Export {
    /// All feeds, in document order.
    pub fn feeds(&self) -> &[FeedRecord] {
        &self.feeds
    }

    /// All episode entries (playable and not), in document order.
    pub fn entries(&self) -> &[EpisodeEntry] {
        &self.entries
    }

    /// The playable episodes only, in document order. Duplicates in the
    /// source are preserved; they resolve to the same archive path later.
    pub fn episodes(&self) -> impl Iterator<Item = &EpisodeRecord> {
        self.entries.iter().filter_map(|entry| match entry {
            EpisodeEntry::Playable(record) => Some(record),
            EpisodeEntry::Unplayable { .. } => None,
        })
    }

    fn from_document(doc: OpmlDocument) -> Self {
        tracing::debug!(
            "parsing export \"{}\" (opml {})",
            doc.head
                .as_ref()
                .and_then(|h| h.title.as_deref())
                .unwrap_or("untitled"),
            doc.version.as_deref().unwrap_or("?"),
        );
        let mut export = Export {
            feeds: Vec::new(),
            entries: Vec::new(),
        };
        for outline in &doc.body.outlines {
            export.collect(outline);
        }
        export
    }

    fn collect(&mut self, outline: &OpmlOutline) {
        if is_feed(outline) {
            let feed_title = display_title(outline);
            self.feeds.push(FeedRecord {
                title: feed_title.clone(),
                feed_url: outline.xml_url.clone(),
            });
            for child in &outline.children {
                if is_episode(child) {
                    self.entries.push(episode_entry(&feed_title, child));
                }
            }
        } else {
            // Grouping node ("feeds", "playlists", ...): descend.
            for child in &outline.children {
                self.collect(child);
            }
        }
    }
}

/// Parses export document text into records.
pub fn parse_export(text: &str) -> Result<Export, ParseError> {
    let doc: OpmlDocument = quick_xml::de::from_str(text)?;
    Ok(Export::from_document(doc))
}

/// Reads and parses an export file.
pub fn load_export(path: &Path) -> Result<Export, ParseError> {
    let text = fs::read_to_string(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_export(&text)
}

fn is_feed(outline: &OpmlOutline) -> bool {
    outline.kind.as_deref() == Some("rss") || outline.xml_url.is_some()
}

fn is_episode(outline: &OpmlOutline) -> bool {
    match outline.kind.as_deref() {
        Some("podcast-episode") | None => true,
        Some(_) => false,
    }
}

fn display_title(outline: &OpmlOutline) -> String {
    outline
        .title
        .clone()
        .or_else(|| outline.text.clone())
        .unwrap_or_default()
}

fn episode_entry(feed_title: &str, outline: &OpmlOutline) -> EpisodeEntry {
    let episode_title = display_title(outline);
    match outline.enclosure_url.as_deref().filter(|u| is_http_url(u)) {
        Some(audio_url) => EpisodeEntry::Playable(EpisodeRecord {
            feed_title: feed_title.to_string(),
            episode_title,
            audio_url: audio_url.to_string(),
            published: outline.pub_date.clone(),
            episode_id: outline.episode_id.clone(),
            page_url: outline.url.clone(),
        }),
        None => EpisodeEntry::Unplayable {
            feed_title: feed_title.to_string(),
            episode_title,
        },
    }
}

/// Audio URLs must be well-formed absolute http(s) URIs.
fn is_http_url(candidate: &str) -> bool {
    url::Url::parse(candidate)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
