//! CLI for the podarc podcast export archiver.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use podarc_core::archive::ArchiveLayout;
use podarc_core::config::{self, PodarcConfig};
use std::path::PathBuf;

use commands::{run_archive, run_backfill, run_feeds, run_list};

/// Top-level CLI for the podarc podcast export archiver.
#[derive(Debug, Parser)]
#[command(name = "podarc")]
#[command(about = "podarc: archive podcast episode audio from an app export", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every played episode in an export into the archive.
    Run {
        /// Path to the OPML export file.
        opml_path: PathBuf,

        /// Archive root ("audiofiles" unless the config says otherwise).
        #[arg(long, alias = "out-dir")]
        download_dir: Option<PathBuf>,

        /// Fetch up to N episodes concurrently (1 = sequential).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// Show the export's episodes and their archive state without fetching.
    List {
        /// Path to the OPML export file.
        opml_path: PathBuf,

        /// Archive root ("audiofiles" unless the config says otherwise).
        #[arg(long, alias = "out-dir")]
        download_dir: Option<PathBuf>,
    },

    /// Refresh the archived RSS snapshot of every feed in the export.
    Feeds {
        /// Path to the OPML export file.
        opml_path: PathBuf,

        /// Archive root ("audiofiles" unless the config says otherwise).
        #[arg(long, alias = "out-dir")]
        download_dir: Option<PathBuf>,
    },

    /// Download episodes listed in saved feed snapshots but absent on disk.
    Backfill {
        /// Archive root ("audiofiles" unless the config says otherwise).
        #[arg(long, alias = "out-dir")]
        download_dir: Option<PathBuf>,

        /// Fetch up to N episodes concurrently (1 = sequential).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                opml_path,
                download_dir,
                jobs,
            } => {
                let layout = layout_for(&cfg, download_dir);
                run_archive(
                    &opml_path,
                    &layout,
                    &cfg.fetch_options(),
                    jobs.unwrap_or(cfg.jobs),
                )
            }
            CliCommand::List {
                opml_path,
                download_dir,
            } => run_list(&opml_path, &layout_for(&cfg, download_dir)),
            CliCommand::Feeds {
                opml_path,
                download_dir,
            } => run_feeds(&opml_path, &layout_for(&cfg, download_dir), &cfg.fetch_options()),
            CliCommand::Backfill { download_dir, jobs } => run_backfill(
                &layout_for(&cfg, download_dir),
                &cfg.fetch_options(),
                jobs.unwrap_or(cfg.jobs),
            ),
        }
    }
}

fn layout_for(cfg: &PodarcConfig, flag: Option<PathBuf>) -> ArchiveLayout {
    ArchiveLayout::new(flag.unwrap_or_else(|| cfg.download_dir.clone()))
}

#[cfg(test)]
mod tests;
