//! Bounded worker pool over a shared record queue.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::archive::ArchiveLayout;
use crate::fetch::FetchOptions;
use crate::opml::EpisodeRecord;

use super::{process_episode, Claims, RunSummary};

/// Runs records through `jobs` worker threads pulling from one queue.
/// Workers keep local counts; a failing fetch only costs its own record.
pub(super) fn run_pool(
    layout: &ArchiveLayout,
    episodes: &[EpisodeRecord],
    opts: &FetchOptions,
    jobs: usize,
    claims: &Claims,
) -> RunSummary {
    let work: Mutex<VecDeque<usize>> = Mutex::new((0..episodes.len()).collect());
    let workers = jobs.min(episodes.len()).max(1);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                scope.spawn(|| {
                    let mut local = RunSummary::default();
                    loop {
                        let next = work.lock().unwrap().pop_front();
                        let Some(index) = next else { break };
                        local.record(process_episode(layout, &episodes[index], opts, claims));
                    }
                    local
                })
            })
            .collect();

        let mut summary = RunSummary::default();
        for handle in handles {
            match handle.join() {
                Ok(local) => summary.absorb(local),
                Err(_) => tracing::warn!("archive worker panicked"),
            }
        }
        summary
    })
}
