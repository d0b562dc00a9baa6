//! `podarc list <export>` – show archive state per episode.

use anyhow::Result;
use podarc_core::archive::{ArchiveLayout, Target};
use podarc_core::opml::{self, EpisodeEntry};
use std::path::Path;

pub fn run_list(opml_path: &Path, layout: &ArchiveLayout) -> Result<()> {
    let export = opml::load_export(opml_path)?;
    let (mut archived, mut missing, mut unplayable) = (0usize, 0usize, 0usize);

    println!("{:<10} {:<30} {}", "STATE", "FEED", "EPISODE");
    for entry in export.entries() {
        match entry {
            EpisodeEntry::Playable(record) => {
                let state = match layout.resolve_episode_target(record) {
                    Target::Existing(_) => {
                        archived += 1;
                        "archived"
                    }
                    Target::Missing(_) => {
                        missing += 1;
                        "missing"
                    }
                };
                println!("{:<10} {:<30} {}", state, record.feed_title, record.episode_title);
            }
            EpisodeEntry::Unplayable {
                feed_title,
                episode_title,
            } => {
                unplayable += 1;
                println!("{:<10} {:<30} {}", "no-audio", feed_title, episode_title);
            }
        }
    }

    println!();
    println!("{archived} archived, {missing} missing, {unplayable} without audio");
    Ok(())
}
