//! Batch URL checking with progress tracking for both CLI and GUI use.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::detector::Detector;
use crate::error::Result;
use crate::inference::Classifier;
use crate::report::CheckResult;

/// Atomic progress counters, readable from the GUI thread without locking.
pub struct ScanProgress {
    pub total_urls: AtomicUsize,
    pub checked_urls: AtomicUsize,
    pub phishing_count: AtomicUsize,
    pub error_count: AtomicUsize,
    pub cancel: AtomicBool,
}

impl ScanProgress {
    pub fn new() -> Self {
        Self {
            total_urls: AtomicUsize::new(0),
            checked_urls: AtomicUsize::new(0),
            phishing_count: AtomicUsize::new(0),
            error_count: AtomicUsize::new(0),
            cancel: AtomicBool::new(false),
        }
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a URL list: one URL per line, blank lines and `#` comments skipped.
pub fn load_url_list(path: &Path) -> Result<Vec<String>> {
    let data = fs::read_to_string(path)?;
    Ok(parse_url_list(&data))
}

pub fn parse_url_list(data: &str) -> Vec<String> {
    data.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Check every URL in parallel. Blocking; call from a background thread in
/// interactive front ends.
///
/// Each URL gets its own feature vector; the detector is only read. Results
/// keep input order; URLs not reached before cancellation are left out.
pub fn run_scan<C: Classifier>(
    detector: &Detector<C>,
    urls: &[String],
    progress: &ScanProgress,
) -> Vec<CheckResult> {
    progress.total_urls.store(urls.len(), Ordering::Relaxed);

    urls.par_iter()
        .filter_map(|url| {
            if progress.is_cancelled() {
                return None;
            }

            let result = CheckResult::new(url.as_str(), detector.check(url));
            if result.is_phishing() {
                progress.phishing_count.fetch_add(1, Ordering::Relaxed);
            }
            if result.is_error() {
                progress.error_count.fetch_add(1, Ordering::Relaxed);
            }

            progress.checked_urls.fetch_add(1, Ordering::Relaxed);
            Some(result)
        })
        .collect()
}
