//! `podarc run <export>` – archive every played episode.

use anyhow::Result;
use podarc_core::archive::ArchiveLayout;
use podarc_core::archiver;
use podarc_core::fetch::FetchOptions;
use podarc_core::opml;
use std::path::Path;

pub fn run_archive(
    opml_path: &Path,
    layout: &ArchiveLayout,
    opts: &FetchOptions,
    jobs: usize,
) -> Result<()> {
    let export = opml::load_export(opml_path)?;
    let episodes: Vec<_> = export.episodes().cloned().collect();
    println!(
        "Export lists {} episodes ({} with audio)",
        export.entries().len(),
        episodes.len()
    );

    let summary = archiver::archive_episodes(layout, &episodes, opts, jobs)?;
    println!(
        "Archived {} new episodes into {} ({} already present, {} failed)",
        summary.downloaded,
        layout.root().display(),
        summary.skipped,
        summary.failed
    );
    Ok(())
}
