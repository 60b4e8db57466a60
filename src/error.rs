// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error kinds the core distinguishes, positionally where possible so a
//! failure can be traced back to a specific frame and inner iteration.

use thiserror::Error;

/// Errors surfaced by the carving engine.
#[derive(Debug, Error)]
pub enum CarveError {
    /// `pixels < 1`, `threshold` outside `[0, 1]`, or `pixels >= input width`.
    /// Reported before decoding begins.
    #[error("invalid configuration: {reason}")]
    Configuration { reason: String },

    /// A frame arrived with a height differing from the declared height, or
    /// a width too small to carve `pixels` columns from.
    #[error("frame {frame}: shape mismatch (expected height {expected_h}, got {got_h})")]
    ShapeMismatch {
        frame: usize,
        expected_h: u32,
        got_h: u32,
    },

    /// A kernel refused to run or returned an error.
    #[error("frame {frame}, inner iteration {iteration}: kernel '{kernel}' failed")]
    KernelFailure {
        kernel: &'static str,
        frame: usize,
        iteration: usize,
    },

    /// I/O failure while decoding or encoding.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
