//! HTTP(S) GET of a single resource to an archive path.
//!
//! Uses the curl crate (libcurl): follows redirects, enforces connect and
//! low-speed timeouts, and streams the body through a [`StorageWriter`] so
//! the final path only ever holds a complete body.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::storage::StorageWriter;

/// Transfer limits for a single GET. Built from config; passed explicitly.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    /// Upper bound on the whole transfer.
    pub request_timeout: Duration,
    /// Abort when throughput stays below this many bytes/sec...
    pub low_speed_limit: u32,
    /// ...for this long.
    pub low_speed_time: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(3600),
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
        }
    }
}

/// Failure of one fetch. Never fatal to a run; the archiver logs it and
/// moves on to the next record.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl-level failure (DNS, connect, timeout, TLS, aborted transfer).
    #[error(transparent)]
    Curl(#[from] curl::Error),
    /// Transfer completed but the final status was not 2xx.
    #[error("GET returned HTTP {0}")]
    Http(u32),
    /// Creating, writing, or promoting the local file failed.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}

/// Downloads `url` to `final_path` via a `.part` temp file.
///
/// On success the temp file is renamed into place and the byte count is
/// returned. On any failure the temp file is removed and `final_path` is
/// left untouched.
pub fn fetch_to_path(
    url: &str,
    final_path: &std::path::Path,
    opts: &FetchOptions,
) -> Result<u64, FetchError> {
    let writer = StorageWriter::create(final_path)?;
    match perform_get(url, opts, &writer) {
        Ok(bytes) => {
            if let Err(e) = writer.sync() {
                writer.discard();
                return Err(e.into());
            }
            writer.finalize()?;
            Ok(bytes)
        }
        Err(e) => {
            writer.discard();
            Err(e)
        }
    }
}

fn perform_get(url: &str, opts: &FetchOptions, storage: &StorageWriter) -> Result<u64, FetchError> {
    let offset = Arc::new(AtomicU64::new(0));
    let write_error: Arc<Mutex<Option<std::io::Error>>> = Arc::new(Mutex::new(None));

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.request_timeout)?;
    easy.low_speed_limit(opts.low_speed_limit)?;
    easy.low_speed_time(opts.low_speed_time)?;
    easy.fail_on_error(false)?;

    {
        let mut transfer = easy.transfer();
        let storage = storage.clone();
        let offset_cb = Arc::clone(&offset);
        let error_cb = Arc::clone(&write_error);
        transfer.write_function(move |data| {
            let off = offset_cb.fetch_add(data.len() as u64, Ordering::Relaxed);
            match storage.write_at(off, data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    *error_cb.lock().unwrap() = Some(e);
                    Ok(0) // abort transfer
                }
            }
        })?;
        if let Err(e) = transfer.perform() {
            // A write abort surfaces as a curl error; report the disk cause.
            if let Some(io_err) = write_error.lock().unwrap().take() {
                return Err(FetchError::Storage(io_err));
            }
            return Err(FetchError::Curl(e));
        }
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    Ok(offset.load(Ordering::Relaxed))
}
