//! `podarc backfill` – archive episodes found in saved feed snapshots.

use anyhow::Result;
use podarc_core::archive::ArchiveLayout;
use podarc_core::feeds;
use podarc_core::fetch::FetchOptions;

pub fn run_backfill(layout: &ArchiveLayout, opts: &FetchOptions, jobs: usize) -> Result<()> {
    let summary = feeds::backfill_from_snapshots(layout, opts, jobs)?;
    println!(
        "Backfilled {} episodes from feed snapshots ({} already present, {} failed)",
        summary.downloaded, summary.skipped, summary.failed
    );
    Ok(())
}
