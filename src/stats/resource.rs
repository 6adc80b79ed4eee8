//! Process resource sampling.
//!
//! Reads `/proc/self/stat`, `/proc/self/status` and `/proc/self/fd` on Linux.
//! Elsewhere, or when a file cannot be read, the affected values are zero.

use std::fs;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// Clock ticks per second assumed for `/proc/self/stat` (USER_HZ).
const TICKS_PER_SEC: u64 = 100;

/// Raw reading of the process counters.
#[derive(Debug, Clone, Copy)]
pub struct ResourceSnapshot {
    /// CPU time in user + kernel mode (microseconds).
    pub cpu_time_us: u64,
    /// Wall-clock time when snapshot was taken.
    pub timestamp: Instant,
    /// Resident Set Size (RSS) in bytes.
    pub memory_rss_bytes: u64,
    /// Number of OS threads.
    pub threads: u64,
    /// Number of open file descriptors.
    pub open_files: u64,
}

impl ResourceSnapshot {
    /// Take a snapshot of current resource utilization.
    pub fn take() -> Self {
        let (memory_rss_bytes, threads) = read_status().unwrap_or((0, 0));
        Self {
            cpu_time_us: read_cpu_time().unwrap_or(0),
            timestamp: Instant::now(),
            memory_rss_bytes,
            threads,
            open_files: count_open_files().unwrap_or(0),
        }
    }

    /// CPU utilization between two snapshots (100.0 = one full core).
    pub fn cpu_percent_since(&self, earlier: &ResourceSnapshot) -> f64 {
        let wall_time_us = self.timestamp.duration_since(earlier.timestamp).as_micros() as u64;
        if wall_time_us == 0 {
            return 0.0;
        }
        let cpu_time_us = self.cpu_time_us.saturating_sub(earlier.cpu_time_us);
        (cpu_time_us as f64 / wall_time_us as f64) * 100.0
    }
}

/// Read CPU time from /proc/self/stat.
///
/// Fields 14 (utime) and 15 (stime), in clock ticks, follow the
/// parenthesised command name which may itself contain spaces.
fn read_cpu_time() -> Option<u64> {
    let stat = fs::read_to_string("/proc/self/stat").ok()?;
    let after_comm = &stat[stat.rfind(')')? + 1..];
    let fields: Vec<&str> = after_comm.split_whitespace().collect();
    // after_comm starts at field 3 (state)
    let utime: u64 = fields.get(11)?.parse().ok()?;
    let stime: u64 = fields.get(12)?.parse().ok()?;
    Some((utime + stime) * 1_000_000 / TICKS_PER_SEC)
}

/// Read (rss_bytes, threads) from /proc/self/status.
fn read_status() -> Option<(u64, u64)> {
    let status = fs::read_to_string("/proc/self/status").ok()?;
    let mut rss_kb = None;
    let mut threads = None;

    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("VmRSS:") {
            rss_kb = rest.split_whitespace().next().and_then(|v| v.parse::<u64>().ok());
        } else if let Some(rest) = line.strip_prefix("Threads:") {
            threads = rest.trim().parse::<u64>().ok();
        }
        if rss_kb.is_some() && threads.is_some() {
            break;
        }
    }

    Some((rss_kb? * 1024, threads?))
}

fn count_open_files() -> Option<u64> {
    let entries = fs::read_dir("/proc/self/fd").ok()?;
    Some(entries.filter_map(Result::ok).count() as u64)
}

/// Derived process metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceUsage {
    pub memory_usage_mb: f64,
    pub cpu_percent: f64,
    pub threads: u64,
    pub open_files: u64,
}

/// Samples process resources, remembering the previous reading so CPU
/// usage covers the interval between calls.
#[derive(Debug)]
pub struct ResourceSampler {
    last: Mutex<Option<ResourceSnapshot>>,
}

impl ResourceSampler {
    pub fn new() -> Self {
        Self {
            last: Mutex::new(None),
        }
    }

    /// Take a new reading. The first call has no baseline and reports
    /// 0.0 CPU.
    pub fn sample(&self) -> ResourceUsage {
        let current = ResourceSnapshot::take();
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let cpu_percent = last
            .as_ref()
            .map_or(0.0, |previous| current.cpu_percent_since(previous));
        *last = Some(current);

        ResourceUsage {
            memory_usage_mb: round2(current.memory_rss_bytes as f64 / 1024.0 / 1024.0),
            cpu_percent: round2(cpu_percent),
            threads: current.threads,
            open_files: current.open_files,
        }
    }
}

impl Default for ResourceSampler {
    fn default() -> Self {
        Self::new()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
