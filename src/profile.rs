// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A lightweight kernel-timing accumulator, enabled by `--profile`.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Accumulates wall-clock time spent in each named kernel across a run.
/// When disabled, `time` is a plain passthrough with no timer overhead.
pub struct Profiler {
    enabled: bool,
    totals: BTreeMap<&'static str, Duration>,
}

impl Profiler {
    /// Create a profiler; when `enabled` is false, `time` costs nothing
    /// beyond the closure call itself.
    pub fn new(enabled: bool) -> Self {
        Profiler {
            enabled,
            totals: BTreeMap::new(),
        }
    }

    /// Run `f`, crediting its wall-clock time to `kernel` if profiling is
    /// enabled.
    pub fn time<T>(&mut self, kernel: &'static str, f: impl FnOnce() -> T) -> T {
        if !self.enabled {
            return f();
        }
        let start = Instant::now();
        let result = f();
        *self.totals.entry(kernel).or_insert_with(Duration::default) += start.elapsed();
        result
    }

    /// A human-readable per-kernel timing report, in declaration order.
    pub fn report(&self) -> String {
        if !self.enabled {
            return String::new();
        }
        self.totals
            .iter()
            .map(|(kernel, total)| format!("{kernel}: {total:?}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_profiler_still_runs_the_closure() {
        let mut p = Profiler::new(false);
        let r = p.time("energy", || 2 + 2);
        assert_eq!(r, 4);
        assert!(p.report().is_empty());
    }

    #[test]
    fn enabled_profiler_accumulates_across_calls() {
        let mut p = Profiler::new(true);
        p.time("energy", || std::thread::sleep(Duration::from_millis(1)));
        p.time("energy", || std::thread::sleep(Duration::from_millis(1)));
        let report = p.report();
        assert!(report.contains("energy"));
    }
}
