// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The frame resizer: deletes one seam's worth of pixels from a frame, one
//! column per row, with no blending at the seam boundary.

use crate::frame::Frame;

/// Remove `seam` (one column index per row) from `frame`, producing a
/// frame exactly one column narrower. `seam[r]` must be `< frame.width()`
/// for every row `r`.
pub fn resize(frame: &Frame, seam: &[u32]) -> Frame {
    debug_assert_eq!(seam.len(), frame.height() as usize);
    let (width, height) = (frame.width(), frame.height());
    debug_assert!(width > 0, "cannot carve a zero-width frame");

    let mut data = Vec::with_capacity((width as usize - 1) * height as usize);
    for y in 0..height {
        let cut = seam[y as usize];
        debug_assert!(cut < width);
        for x in 0..cut {
            data.push(frame.get(x, y));
        }
        for x in (cut + 1)..width {
            data.push(frame.get(x, y));
        }
    }
    Frame::from_rows(width - 1, height, data)
}
