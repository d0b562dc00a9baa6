//! Export parser: turn a podcast-app OPML export into episode records.
//!
//! The export is an outline tree: grouping nodes wrap feed nodes
//! (`type="rss"`), which wrap episode nodes carrying title and audio URL
//! attributes. Parsing materializes the tree once and extracts an ordered
//! sequence of [`EpisodeEntry`] values; episodes without a usable audio URL
//! become `Unplayable` instead of errors.

mod export;
mod parse;

pub use export::{
    load_export, parse_export, EpisodeEntry, EpisodeRecord, Export, FeedRecord, ParseError,
};
