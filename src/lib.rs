#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Temporally coherent video seam carving.
//!
//! Seam carving shrinks an image by repeatedly removing the
//! lowest-importance top-to-bottom path of pixels, a "seam". Run frame by
//! frame on a video, naive seam carving flickers: each frame picks its own
//! independent seam, so the removed column wanders even on a static scene.
//! This crate biases each frame's seam search toward the column band the
//! previous frame used at the same inner iteration, which keeps consecutive
//! frames' seams close together and the result visually stable, except
//! across a detected shot boundary, where coherence is deliberately reset.
//!
//! The engine operates on single-channel (luminance) frames and only ever
//! narrows width; height is fixed for a whole video. Decoding, encoding,
//! and CLI argument parsing are external concerns -- this crate ships
//! minimal, swappable implementations of them (see [`codec`]) so the
//! engine is runnable end to end, but the core algorithms in
//! [`energy`], [`cost`], [`select`], [`resize`], [`histogram`], and
//! [`orchestrator`] never depend on those collaborators.

// Some simple macros, used throughout the border-handling logic.
mod ternary;

// A generic two-dimensional map, used to hold frames, energy fields, and
// cost fields.
mod twodmap;

/// The working unit of the pipeline: an H×W luminance matrix.
pub mod frame;

/// The shot-boundary heuristic that decides when temporal coherence
/// should be reset.
pub mod histogram;

/// The energy engine: spatial gradient energy, with an optional temporal
/// bias term.
pub mod energy;

/// The cost & backtrack engine (the "index map").
pub mod cost;

/// The seam selector and extractor, with an injectable source of
/// randomness for the top-row tie-break.
pub mod select;

/// The frame resizer: seam removal.
pub mod resize;

/// Validated run configuration.
pub mod config;

/// Crate-wide error type.
pub mod error;

/// Per-kernel timing, enabled by `--profile`.
pub mod profile;

/// The per-frame orchestrator tying the kernels above into the full
/// carving loop, and owning `prev_seams` across frames.
pub mod orchestrator;

/// The three-stage decode/carve/encode concurrency model.
pub mod pipeline;

/// A minimal PGM frame source/sink, standing in for a real video codec.
pub mod codec;

pub use config::CarveConfig;
pub use error::CarveError;
pub use frame::Frame;
pub use orchestrator::CarveEngine;
