//! Live progress for an in-flight timed loop.
//!
//! The loop publishes the index of its last completed iteration with a relaxed
//! store; a reporter thread samples it on a fixed interval and hands snapshots
//! to a [`ProgressSink`]. The reporter never writes to the state and never
//! takes a lock the loop could contend on.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct ProgressState {
    lib_name: Arc<str>,
    total: u64,
    completed: AtomicU64,
    finished: AtomicBool,
    start: Instant,
}

impl ProgressState {
    pub fn new(lib_name: &str, total: u64) -> Self {
        Self {
            lib_name: Arc::from(lib_name),
            total,
            completed: AtomicU64::new(0),
            finished: AtomicBool::new(false),
            start: Instant::now(),
        }
    }

    /// Publish the index of the iteration that just completed.
    pub fn record(&self, iteration: u64) {
        self.completed.store(iteration, Ordering::Relaxed);
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Signal that the loop is over, whether it ran to the end or bailed out.
    pub fn finish(&self) {
        self.finished.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire) || self.completed() >= self.total.saturating_sub(1)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            lib_name: self.lib_name.clone(),
            completed: self.completed(),
            total: self.total,
            elapsed: self.start.elapsed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub lib_name: Arc<str>,
    pub completed: u64,
    pub total: u64,
    pub elapsed: Duration,
}

impl Snapshot {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.completed as f64 / self.total as f64).min(1.0)
    }

    /// Linear extrapolation from the rate observed so far.
    pub fn estimated_remaining(&self) -> Option<Duration> {
        if self.completed == 0 {
            return None;
        }
        let left = self.total.saturating_sub(self.completed) as f64;
        Some(self.elapsed.mul_f64(left / self.completed as f64))
    }
}

/// Destination for progress snapshots. Runs on the reporter thread.
pub trait ProgressSink: Send {
    fn report(&mut self, snapshot: &Snapshot);

    /// Called once after the loop signals completion.
    fn finish(&mut self, _snapshot: &Snapshot) {}
}

/// Rewrites a single status line on stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    dirty: bool,
}

impl ProgressSink for ConsoleSink {
    fn report(&mut self, s: &Snapshot) {
        let remaining = s
            .estimated_remaining()
            .map(|d| format!("~{:.2}s remaining", d.as_secs_f64()))
            .unwrap_or_else(|| "estimating".to_string());
        let mut out = io::stdout().lock();
        let _ = write!(
            out,
            "\r[{}] {:6.2}% | elapsed {:.2}s | {:<24}",
            s.lib_name,
            s.fraction() * 100.0,
            s.elapsed.as_secs_f64(),
            remaining
        );
        let _ = out.flush();
        self.dirty = true;
    }

    fn finish(&mut self, s: &Snapshot) {
        if !self.dirty {
            return;
        }
        let mut out = io::stdout().lock();
        let _ = writeln!(
            out,
            "\r[{}] 100.00% | elapsed {:.2}s{:<28}",
            s.lib_name,
            s.elapsed.as_secs_f64(),
            ""
        );
        let _ = out.flush();
        self.dirty = false;
    }
}

/// Handle to a running reporter thread.
pub struct Reporter {
    state: Arc<ProgressState>,
    handle: JoinHandle<()>,
}

impl Reporter {
    pub fn spawn(
        state: Arc<ProgressState>,
        interval: Duration,
        mut sink: Box<dyn ProgressSink>,
    ) -> io::Result<Self> {
        let shared = Arc::clone(&state);
        let handle = thread::Builder::new()
            .name("progress".into())
            .spawn(move || {
                while !shared.is_finished() {
                    sink.report(&shared.snapshot());
                    thread::park_timeout(interval);
                }
                sink.finish(&shared.snapshot());
            })?;
        Ok(Self { state, handle })
    }

    /// Mark the loop finished, wake the reporter and wait for it to exit.
    pub fn stop(self) {
        self.state.finish();
        self.handle.thread().unpark();
        if self.handle.join().is_err() {
            tracing::warn!("progress reporter panicked");
        }
    }
}
