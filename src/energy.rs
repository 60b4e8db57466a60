// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of a frame.
//!
//! Two variants: `energy_first` is pure spatial gradient energy, used on
//! the very first frame of a run and whenever the shot detector fires.
//! `energy` adds a temporal-bias term that pulls the DP toward re-selecting
//! the column band the previous frame's seam occupied at the same inner
//! iteration, which is what keeps consecutive frames' seams from jumping.

use crate::cq;
use crate::frame::Frame;
use crate::twodmap::TwoDimensionalMap;

/// H×W field of energies (non-negative before bias is added).
pub type EnergyField = TwoDimensionalMap<i32>;

/// Weight of the temporal-bias penalty, in "grayscale levels per pixel of
/// horizontal distance from the previous seam." Chosen to be comparable in
/// magnitude to the spatial gradient term on typical frames; see
/// DESIGN.md for the reasoning behind this specific constant.
pub const TEMPORAL_BIAS_ALPHA: i32 = 3;

#[inline]
fn pixel_diff(a: u8, b: u8) -> i32 {
    let (a, b) = (a as i32, b as i32);
    (a - b).abs()
}

/// Spatial-only gradient-magnitude energy: at each cell, the sum of the
/// horizontal and vertical finite differences against the 4-neighborhood,
/// clamping to the nearest in-bounds neighbor at the borders.
pub fn energy_first(frame: &Frame) -> EnergyField {
    let (width, height) = (frame.width(), frame.height());
    let (mw, mh) = (width - 1, height - 1);

    let mut field = EnergyField::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let left = frame.get(cq!(x == 0, x, x - 1), y);
            let right = frame.get(cq!(x == mw, x, x + 1), y);
            let up = frame.get(x, cq!(y == 0, y, y - 1));
            let down = frame.get(x, cq!(y == mh, y, y + 1));
            field[(x, y)] = pixel_diff(left, right) + pixel_diff(up, down);
        }
    }
    field
}

/// Spatial energy plus a temporal bias derived from the previous frame's
/// seam at the same inner-iteration index. `prev_seam_col` is a length-H
/// vector of column indices in the *current* (possibly already carved)
/// frame's coordinate space.
pub fn energy(frame: &Frame, prev_seam_col: &[u32]) -> EnergyField {
    debug_assert_eq!(prev_seam_col.len(), frame.height() as usize);
    let mut field = energy_first(frame);
    let max_dist = (frame.width() - 1) as i64;
    for y in 0..frame.height() {
        let target = prev_seam_col[y as usize] as i64;
        for x in 0..frame.width() {
            let dist = ((x as i64 - target).abs()).min(max_dist) as i32;
            field[(x, y)] += TEMPORAL_BIAS_ALPHA * dist;
        }
    }
    field
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spatial_energy_highlights_a_bright_column() {
        // A bright stripe on an otherwise flat frame.
        let frame = Frame::from_rows(
            4,
            3,
            vec![
                0, 10, 0, 0, //
                0, 10, 0, 0, //
                0, 10, 0, 0,
            ],
        );
        let e = energy_first(&frame);
        // The bright column and its immediate neighbors carry energy; the
        // untouched columns at the far edge do not.
        assert!(e[(1, 1)] > 0);
        assert_eq!(e[(3, 1)], 0);
    }

    #[test]
    fn temporal_bias_grows_with_distance_from_previous_seam() {
        let frame = Frame::blank(5, 1);
        let prev_seam = vec![2u32];
        let e = energy(&frame, &prev_seam);
        assert_eq!(e[(2, 0)], 0);
        assert_eq!(e[(0, 0)], TEMPORAL_BIAS_ALPHA * 2);
        assert_eq!(e[(4, 0)], TEMPORAL_BIAS_ALPHA * 2);
    }

    #[test]
    fn temporal_bias_never_overflows_for_wide_frames() {
        let frame = Frame::blank(u16::MAX as u32, 1);
        let prev_seam = vec![0u32];
        let e = energy(&frame, &prev_seam);
        // Must not panic/overflow; the clamp keeps the product in range.
        assert!(e[(frame.width() - 1, 0)] > 0);
    }
}
