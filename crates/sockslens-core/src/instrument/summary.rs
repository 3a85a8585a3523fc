//! Rolling-window summary keyed by a single label dimension.
//!
//! Quantiles are computed over the observations recorded within `max_age` of
//! "now"; older samples age out of the quantile view. `_count` and `_sum`
//! stay cumulative over the process lifetime, matching summary semantics in
//! the text exposition format.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use std::fmt::Write;

use super::escape_label;

/// Quantiles exported for every label series.
const QUANTILES: [f64; 3] = [0.5, 0.9, 0.99];

/// Distinct-label count at which a one-time cardinality warning is logged.
/// Log-only; the instrument never refuses a new label value.
const LABEL_SOFT_LIMIT: usize = 1000;

struct Window {
    /// Timestamped samples inside the rolling window, oldest first.
    samples: VecDeque<(Instant, f64)>,
    /// Cumulative observation count (never pruned).
    count: u64,
    /// Cumulative observation sum (never pruned).
    sum: f64,
}

impl Window {
    fn new() -> Self {
        Self { samples: VecDeque::new(), count: 0, sum: 0.0 }
    }

    fn prune(&mut self, cutoff: Option<Instant>) {
        if let Some(cutoff) = cutoff {
            while let Some(&(t, _)) = self.samples.front() {
                if t >= cutoff {
                    break;
                }
                self.samples.pop_front();
            }
        }
    }
}

/// Summary vec over one variable label, with time-based quantile aging.
pub struct RollingSummary {
    name: String,
    help: String,
    label_key: String,
    max_age: Duration,
    shards: DashMap<String, Mutex<Window>>,
    cardinality_warned: AtomicBool,
}

impl RollingSummary {
    pub fn new(name: impl Into<String>, help: impl Into<String>, label_key: impl Into<String>, max_age: Duration) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            label_key: label_key.into(),
            max_age,
            shards: DashMap::new(),
            cardinality_warned: AtomicBool::new(false),
        }
    }

    /// Record one observation under `label`.
    pub fn observe(&self, label: &str, value: f64) {
        let now = Instant::now();
        if !self.shards.contains_key(label)
            && self.shards.len() >= LABEL_SOFT_LIMIT
            && !self.cardinality_warned.swap(true, Ordering::Relaxed)
        {
            tracing::warn!(
                metric = %self.name,
                labels = self.shards.len(),
                "summary label cardinality crossed soft limit; memory grows with distinct labels"
            );
        }

        let shard = self.shards.entry(label.to_string()).or_insert_with(|| Mutex::new(Window::new()));
        let mut w = match shard.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        w.prune(now.checked_sub(self.max_age));
        w.samples.push_back((now, value));
        w.count += 1;
        w.sum += value;
    }

    /// Cumulative observation count for `label` (0 if never observed).
    pub fn count(&self, label: &str) -> u64 {
        self.shards
            .get(label)
            .map(|shard| match shard.lock() {
                Ok(g) => g.count,
                Err(poisoned) => poisoned.into_inner().count,
            })
            .unwrap_or(0)
    }

    /// Quantile over the current window for `label`; `None` when the window
    /// is empty or the label was never observed.
    pub fn quantile(&self, label: &str, q: f64) -> Option<f64> {
        let shard = self.shards.get(label)?;
        let mut w = match shard.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        w.prune(Instant::now().checked_sub(self.max_age));
        let mut values: Vec<f64> = w.samples.iter().map(|&(_, v)| v).collect();
        drop(w);
        if values.is_empty() {
            return None;
        }
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        Some(values[rank(q, values.len())])
    }

    /// Render in Prometheus text exposition format.
    pub fn render_into(&self, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", self.name, self.help);
        let _ = writeln!(out, "# TYPE {} summary", self.name);
        let cutoff = Instant::now().checked_sub(self.max_age);
        for r in self.shards.iter() {
            let label = r.key();
            let mut w = match r.value().lock() {
                Ok(g) => g,
                Err(poisoned) => poisoned.into_inner(),
            };
            w.prune(cutoff);
            let mut values: Vec<f64> = w.samples.iter().map(|&(_, v)| v).collect();
            let (count, sum) = (w.count, w.sum);
            drop(w);
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

            let series = format!("{}=\"{}\"", self.label_key, escape_label(label));
            for q in QUANTILES {
                let v = if values.is_empty() {
                    f64::NAN
                } else {
                    values[rank(q, values.len())]
                };
                let _ = writeln!(out, "{}{{{},quantile=\"{}\"}} {}", self.name, series, q, v);
            }
            let _ = writeln!(out, "{}_sum{{{}}} {}", self.name, series, sum);
            let _ = writeln!(out, "{}_count{{{}}} {}", self.name, series, count);
        }
    }
}

/// Nearest-rank index into a sorted sample vec of length `n` (n > 0).
fn rank(q: f64, n: usize) -> usize {
    let idx = (q * (n as f64 - 1.0)).round();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(n - 1)
    }
}
