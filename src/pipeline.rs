// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The three-stage concurrency model: decode, carve, and encode run as
//! independent worker threads connected by bounded queues. The carve
//! thread is single-threaded with respect to frames (each frame depends on
//! `prev_seams` written during the one before it); within a frame its
//! kernels may still run tile-parallel, which `CarveEngine` already does.
//!
//! Closing the decode queue's sender causes the carve thread to drain and
//! exit; the carve thread closing its own sender likewise drains the
//! encode thread. There is no cancellation or timeout beyond that.

use crossbeam_channel::bounded;

use crate::config::CarveConfig;
use crate::error::CarveError;
use crate::frame::Frame;
use crate::orchestrator::CarveEngine;
use crate::select::{SeamRng, SystemRng};

/// Default depth of the bounded decode->carve and carve->encode queues,
/// sized the same way the cost engine sizes its per-row thread split:
/// one slot per available core.
pub fn default_queue_depth() -> usize {
    num_cpus::get().max(1)
}

/// Run the full decode -> carve -> encode pipeline.
///
/// `decode` is called repeatedly on its own thread until it returns `None`
/// (source exhaustion) or `Some(Err(_))` (decode failure, which aborts the
/// run). `encode` is called once per carved frame, in presentation order,
/// on its own thread.
///
/// Returns the carve engine's profiler report (empty unless
/// `config.profile` is set).
pub fn run_pipeline<D, K>(
    config: CarveConfig,
    declared_width: u32,
    declared_height: u32,
    queue_depth: usize,
    mut decode: D,
    mut encode: K,
) -> Result<String, CarveError>
where
    D: FnMut() -> Option<Result<Frame, CarveError>> + Send,
    K: FnMut(Frame) -> Result<(), CarveError> + Send,
{
    let (decode_tx, decode_rx) = bounded::<Result<Frame, CarveError>>(queue_depth);
    let (encode_tx, encode_rx) = bounded::<Result<Frame, CarveError>>(queue_depth);
    let (report_tx, report_rx) = bounded::<String>(1);

    let seed = config.seed;
    let mut engine = CarveEngine::new(config, declared_width, declared_height)?;

    let result = crossbeam::scope(|nursery| {
        nursery.spawn(move |_| {
            while let Some(item) = decode() {
                let is_err = item.is_err();
                if decode_tx.send(item).is_err() || is_err {
                    break;
                }
            }
        });

        nursery.spawn(move |_| {
            let mut rng: Box<dyn SeamRng> = match seed {
                Some(s) => Box::new(SystemRng::seeded(s)),
                None => Box::new(SystemRng::new()),
            };
            for item in decode_rx.iter() {
                match item {
                    Ok(frame) => {
                        let result = engine.process_frame(frame, rng.as_mut());
                        let stop = result.is_err();
                        if encode_tx.send(result).is_err() || stop {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = encode_tx.send(Err(e));
                        break;
                    }
                }
            }
            let _ = report_tx.send(engine.profiler.report());
        });

        let mut first_error = None;
        for item in encode_rx.iter() {
            match item {
                Ok(frame) => {
                    if let Err(e) = encode(frame) {
                        first_error.get_or_insert(e);
                        break;
                    }
                }
                Err(e) => {
                    first_error.get_or_insert(e);
                    break;
                }
            }
        }
        // On early exit above, the carve thread may still be blocked
        // sending into `encode_tx`; drop our receiver so that send
        // disconnects instead of blocking forever, letting the carve
        // thread unwind and reach `report_tx.send` below.
        drop(encode_rx);
        let report = report_rx.recv().unwrap_or_default();
        match first_error {
            Some(e) => Err(e),
            None => Ok(report),
        }
    })
    .expect("pipeline worker thread panicked");

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn empty_source_yields_empty_output() {
        let config = CarveConfig::new(1, 0.3, false, Some(1)).unwrap();
        let collected = Arc::new(Mutex::new(Vec::<Frame>::new()));
        let sink_collected = collected.clone();
        let mut frames: std::vec::IntoIter<Frame> = Vec::new().into_iter();

        let result = run_pipeline(
            config,
            4,
            3,
            2,
            move || frames.next().map(Ok),
            move |f| {
                sink_collected.lock().unwrap().push(f);
                Ok(())
            },
        );

        assert!(result.is_ok());
        assert!(result.unwrap().is_empty());
        assert!(collected.lock().unwrap().is_empty());
    }

    #[test]
    fn every_frame_is_narrowed_by_pixels_and_order_is_preserved() {
        let config = CarveConfig::new(1, 0.3, false, Some(7)).unwrap();
        let collected = Arc::new(Mutex::new(Vec::<Frame>::new()));
        let sink_collected = collected.clone();

        let rows = vec![0u8, 0, 10, 0, 0, 0, 10, 0, 0, 0, 10, 0];
        let frames = vec![
            Frame::from_rows(4, 3, rows.clone()),
            Frame::from_rows(4, 3, rows),
        ];
        let mut frames = frames.into_iter();

        let result = run_pipeline(
            config,
            4,
            3,
            2,
            move || frames.next().map(Ok),
            move |f| {
                sink_collected.lock().unwrap().push(f);
                Ok(())
            },
        );

        assert!(result.is_ok());
        let out = collected.lock().unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|f| f.width() == 3 && f.height() == 3));
    }

    #[test]
    fn shape_mismatch_aborts_the_run() {
        let config = CarveConfig::new(1, 0.3, false, Some(1)).unwrap();
        let collected = Arc::new(Mutex::new(Vec::<Frame>::new()));
        let sink_collected = collected.clone();

        let frames = vec![Frame::blank(4, 3), Frame::blank(4, 2)];
        let mut frames = frames.into_iter();

        let result = run_pipeline(
            config,
            4,
            3,
            2,
            move || frames.next().map(Ok),
            move |f| {
                sink_collected.lock().unwrap().push(f);
                Ok(())
            },
        );

        assert!(matches!(result, Err(CarveError::ShapeMismatch { .. })));
    }

    #[test]
    fn encoder_failure_does_not_deadlock_once_queues_fill() {
        // More frames than the queue depth, so the carve thread is still
        // producing well after the encoder gives up; regression test for
        // the encode_rx/encode_tx deadlock this module used to have.
        let config = CarveConfig::new(1, 0.3, false, Some(1)).unwrap();
        let queue_depth = 2;
        let frame_count = queue_depth * 4;

        let rows = vec![0u8, 0, 10, 0, 0, 0, 10, 0, 0, 0, 10, 0];
        let frames: Vec<Frame> = (0..frame_count)
            .map(|_| Frame::from_rows(4, 3, rows.clone()))
            .collect();
        let mut frames = frames.into_iter();

        let result = run_pipeline(
            config,
            4,
            3,
            queue_depth,
            move || frames.next().map(Ok),
            move |_| Err(CarveError::Io(std::io::Error::new(std::io::ErrorKind::Other, "sink closed"))),
        );

        assert!(matches!(result, Err(CarveError::Io(_))));
    }

    #[test]
    fn profiling_report_is_empty_unless_enabled() {
        let config = CarveConfig::new(1, 0.3, false, Some(1)).unwrap();
        let frames = vec![Frame::blank(4, 3)];
        let mut frames = frames.into_iter();
        let result = run_pipeline(config, 4, 3, 2, move || frames.next().map(Ok), move |_| Ok(()));
        assert_eq!(result.unwrap(), "");
    }

    #[test]
    fn profiling_report_lists_kernels_when_enabled() {
        let config = CarveConfig::new(1, 0.3, true, Some(1)).unwrap();
        let frames = vec![Frame::blank(4, 3)];
        let mut frames = frames.into_iter();
        let result = run_pipeline(config, 4, 3, 2, move || frames.next().map(Ok), move |_| Ok(()));
        let report = result.unwrap();
        assert!(report.contains("energy"));
        assert!(report.contains("resize"));
        assert!(report.contains("histogram"));
    }
}
