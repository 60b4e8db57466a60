// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The per-frame orchestrator: wires the shot detector, energy engine,
//! cost/backtrack engine, seam selector, and resizer into the per-frame
//! carving loop, and owns the one piece of state that survives across
//! frames: `prev_seams`.

use crate::config::CarveConfig;
use crate::cost::cost_and_backtrack;
use crate::energy::{energy, energy_first};
use crate::error::CarveError;
use crate::frame::Frame;
use crate::histogram::ShotDetector;
use crate::profile::Profiler;
use crate::resize::resize;
use crate::select::{select_and_extract, SeamRng};

/// Runs the carving pipeline across a sequence of frames, maintaining
/// temporal coherence between them.
pub struct CarveEngine {
    config: CarveConfig,
    declared_width: u32,
    declared_height: u32,
    detector: ShotDetector,
    prev_seams: Vec<Vec<u32>>,
    frame_index: usize,
    /// Accumulated kernel timings, populated when `config.profile` is set.
    pub profiler: Profiler,
}

impl CarveEngine {
    /// Build an engine for a video whose frames are declared to be
    /// `declared_width` x `declared_height`. Fails with
    /// [`CarveError::Configuration`] if `config.pixels >= declared_width`.
    pub fn new(config: CarveConfig, declared_width: u32, declared_height: u32) -> Result<Self, CarveError> {
        config.validate_against_width(declared_width)?;
        let profiler = Profiler::new(config.profile);
        let detector = ShotDetector::new(config.threshold);
        let prev_seams = vec![Vec::new(); config.pixels as usize];
        Ok(CarveEngine {
            config,
            declared_width,
            declared_height,
            detector,
            prev_seams,
            frame_index: 0,
            profiler,
        })
    }

    /// Process one input frame, returning the width-reduced output frame.
    pub fn process_frame(&mut self, frame: Frame, rng: &mut dyn SeamRng) -> Result<Frame, CarveError> {
        if frame.height() != self.declared_height {
            return Err(CarveError::ShapeMismatch {
                frame: self.frame_index,
                expected_h: self.declared_height,
                got_h: frame.height(),
            });
        }
        if frame.width() <= self.config.pixels {
            return Err(CarveError::ShapeMismatch {
                frame: self.frame_index,
                expected_h: self.declared_height,
                got_h: frame.height(),
            });
        }

        let reset = self.profiler.time("histogram", || self.detector.observe(&frame));
        log::debug!(
            "frame {}: shot-reset={} (threshold={})",
            self.frame_index,
            reset,
            self.config.threshold
        );
        let use_coherence = !reset && self.frame_index > 0;

        let mut working = frame;
        for p in 0..self.config.pixels as usize {
            let field = if use_coherence && !self.prev_seams[p].is_empty() {
                self.profiler.time("energy", || energy(&working, &self.prev_seams[p]))
            } else {
                self.profiler.time("energy", || energy_first(&working))
            };

            let (cost, parents) = self.profiler.time("cost", || cost_and_backtrack(&field));
            let seam = self.profiler.time("select", || select_and_extract(&cost, &parents, rng));
            self.prev_seams[p] = seam.clone();
            working = self.profiler.time("resize", || resize(&working, &seam));
        }

        self.frame_index += 1;
        Ok(working)
    }

    /// Declared output width for every emitted frame.
    pub fn output_width(&self) -> u32 {
        self.declared_width - self.config.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::StubRng;

    #[test]
    fn emits_frames_narrower_by_exactly_pixels() {
        let config = CarveConfig::new(1, 0.3, false, None).unwrap();
        let mut engine = CarveEngine::new(config, 4, 3).unwrap();
        let mut rng = StubRng::always(0);
        let frame = Frame::from_rows(4, 3, vec![0, 10, 0, 0, 0, 10, 0, 0, 0, 10, 0, 0]);
        let out = engine.process_frame(frame, &mut rng).unwrap();
        assert_eq!(out.width(), 3);
        assert_eq!(out.height(), 3);
    }

    #[test]
    fn shape_mismatch_on_height_change() {
        let config = CarveConfig::new(1, 0.3, false, None).unwrap();
        let mut engine = CarveEngine::new(config, 4, 3).unwrap();
        let mut rng = StubRng::always(0);
        let bad = Frame::blank(4, 2);
        assert!(matches!(
            engine.process_frame(bad, &mut rng),
            Err(CarveError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn shape_mismatch_when_width_is_not_greater_than_pixels() {
        let config = CarveConfig::new(3, 0.3, false, None).unwrap();
        // declared_width 5 passes config validation (5 > 3), but a
        // misbehaving source frame arrives with width 3 (== pixels).
        let mut engine = CarveEngine::new(config, 5, 2).unwrap();
        let mut rng = StubRng::always(0);
        let narrow = Frame::blank(3, 2);
        assert!(matches!(
            engine.process_frame(narrow, &mut rng),
            Err(CarveError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn second_frame_reuses_first_frames_seam_when_coherent() {
        // Identical frames with a bright vertical line, threshold high
        // enough that coherence stays on.
        let config = CarveConfig::new(1, 0.5, false, None).unwrap();
        let mut engine = CarveEngine::new(config, 4, 4).unwrap();
        let mut rng = StubRng::always(0);

        let rows = vec![
            0, 0, 10, 0, //
            0, 0, 10, 0, //
            0, 0, 10, 0, //
            0, 0, 10, 0,
        ];
        let frame0 = Frame::from_rows(4, 4, rows.clone());
        let frame1 = Frame::from_rows(4, 4, rows);

        engine.process_frame(frame0, &mut rng).unwrap();
        let first_seam = engine.prev_seams[0].clone();
        engine.process_frame(frame1, &mut rng).unwrap();
        let second_seam = engine.prev_seams[0].clone();
        assert_eq!(first_seam, second_seam);
    }
}
