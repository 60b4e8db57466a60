// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The shot-boundary heuristic: a 256-bin luminance histogram distance
//! between consecutive (undecimated) frames, deciding when temporal
//! coherence should be discarded.

use crate::frame::Frame;

/// A 256-bin luminance histogram.
#[derive(Debug, Clone)]
pub struct Histogram {
    bins: [u32; 256],
}

impl Histogram {
    /// Histogram the raw byte values of a frame; no smoothing.
    pub fn of(frame: &Frame) -> Self {
        let mut bins = [0u32; 256];
        for &b in frame.as_bytes() {
            bins[b as usize] += 1;
        }
        Histogram { bins }
    }

    /// L1 distance normalized by the maximum possible distance between two
    /// histograms over the same pixel count, giving a value in `[0, 1]`.
    pub fn distance(&self, other: &Histogram, pixel_count: u64) -> f64 {
        let l1: u64 = self
            .bins
            .iter()
            .zip(other.bins.iter())
            .map(|(&a, &b)| (a as i64 - b as i64).unsigned_abs())
            .sum();
        l1 as f64 / (2.0 * pixel_count as f64)
    }

    /// Sum of all bins -- should equal the pixel count of the frame that
    /// produced this histogram.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&b| b as u64).sum()
    }
}

/// Decides, per frame, whether temporal coherence should be reset.
pub struct ShotDetector {
    threshold: f64,
    prev_hist: Option<Histogram>,
    seen_first: bool,
}

impl ShotDetector {
    /// `threshold` is the normalized histogram-distance trigger, in
    /// `[0, 1]`. `0.0` permanently disables coherence; `1.0` permanently
    /// enables it (after the mandatory first-frame reset).
    pub fn new(threshold: f64) -> Self {
        ShotDetector {
            threshold,
            prev_hist: None,
            seen_first: false,
        }
    }

    /// Observe the next (undecimated) frame, returning whether temporal
    /// coherence should be reset for it.
    pub fn observe(&mut self, frame: &Frame) -> bool {
        if !self.seen_first {
            self.seen_first = true;
            if self.threshold > 0.0 && self.threshold < 1.0 {
                self.prev_hist = Some(Histogram::of(frame));
            }
            return true;
        }

        if self.threshold <= 0.0 {
            return true;
        }
        if self.threshold >= 1.0 {
            return false;
        }

        let hist = Histogram::of(frame);
        let pixel_count = frame.width() as u64 * frame.height() as u64;
        let d = self
            .prev_hist
            .as_ref()
            .expect("non-degenerate threshold always tracks a previous histogram")
            .distance(&hist, pixel_count);
        self.prev_hist = Some(hist);
        d >= self.threshold
    }
}
