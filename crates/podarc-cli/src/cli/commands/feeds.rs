//! `podarc feeds <export>` – refresh archived RSS snapshots.

use anyhow::Result;
use podarc_core::archive::ArchiveLayout;
use podarc_core::feeds;
use podarc_core::fetch::FetchOptions;
use podarc_core::opml;
use std::path::Path;

pub fn run_feeds(opml_path: &Path, layout: &ArchiveLayout, opts: &FetchOptions) -> Result<()> {
    let export = opml::load_export(opml_path)?;
    let summary = feeds::snapshot_feeds(layout, export.feeds(), opts);
    println!(
        "Refreshed {} feed snapshots ({} without a feed URL, {} failed)",
        summary.refreshed, summary.skipped, summary.failed
    );
    Ok(())
}
