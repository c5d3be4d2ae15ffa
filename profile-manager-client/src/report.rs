use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckCount {
    pub passes: usize,
    pub fails: usize,
}

/// Latency statistics over every recorded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencySummary {
    pub count: usize,
    pub min: Duration,
    pub avg: Duration,
    pub max: Duration,
    pub p95: Duration,
}

/// Outcome of one or more scenario runs.
#[derive(Debug, Clone, Default)]
pub struct Report {
    checks: BTreeMap<String, CheckCount>,
    latencies: Vec<Duration>,
    errors: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a named check; returns `passed` so callers can chain on it.
    pub fn check(&mut self, name: &str, passed: bool) -> bool {
        let count = self.checks.entry(name.to_string()).or_default();
        if passed {
            count.passes += 1;
        } else {
            count.fails += 1;
        }
        passed
    }

    pub fn record_latency(&mut self, latency: Duration) {
        self.latencies.push(latency);
    }

    pub fn record_error(&mut self, error: String) {
        self.errors.push(error);
    }

    pub fn merge(&mut self, other: Report) {
        for (name, count) in other.checks {
            let entry = self.checks.entry(name).or_default();
            entry.passes += count.passes;
            entry.fails += count.fails;
        }
        self.latencies.extend(other.latencies);
        self.errors.extend(other.errors);
    }

    pub fn checks(&self) -> &BTreeMap<String, CheckCount> {
        &self.checks
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn all_passed(&self) -> bool {
        self.errors.is_empty() && self.checks.values().all(|count| count.fails == 0)
    }

    pub fn latency_summary(&self) -> Option<LatencySummary> {
        if self.latencies.is_empty() {
            return None;
        }
        let mut sorted = self.latencies.clone();
        sorted.sort();
        let count = sorted.len();
        let total: Duration = sorted.iter().sum();
        let avg = match u32::try_from(count) {
            Ok(count) => total / count,
            Err(_) => total.div_f64(count as f64),
        };
        // Nearest-rank percentile
        let p95_rank = (count * 95).div_ceil(100).max(1);
        Some(LatencySummary {
            count,
            min: sorted[0],
            avg,
            max: sorted[count - 1],
            p95: sorted[p95_rank - 1],
        })
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Checks ===")?;
        for (name, count) in &self.checks {
            let mark = if count.fails == 0 { "✓" } else { "✗" };
            writeln!(
                f,
                "  {} {:<22} {} passed, {} failed",
                mark, name, count.passes, count.fails
            )?;
        }
        if !self.errors.is_empty() {
            writeln!(f, "=== Request errors ({}) ===", self.errors.len())?;
            for error in self.errors.iter().take(10) {
                writeln!(f, "  {}", error)?;
            }
        }
        match self.latency_summary() {
            Some(summary) => writeln!(
                f,
                "=== Latency ({} requests) ===\n  min={:.2}ms avg={:.2}ms max={:.2}ms p95={:.2}ms",
                summary.count,
                millis(summary.min),
                millis(summary.avg),
                millis(summary.max),
                millis(summary.p95)
            ),
            None => writeln!(f, "=== Latency ===\n  no requests recorded"),
        }
    }
}
