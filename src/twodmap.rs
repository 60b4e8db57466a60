// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A generic two-dimensional map, used to hold intermediate data: frames,
//! energy fields, and cost fields. Every per-frame kernel in this crate
//! addresses its working storage through this one indexing scheme, so the
//! row/column math lives in exactly one place.

use std::ops::{Index, IndexMut};

/// An addressable two-dimensional field of `width * height` elements, stored
/// row-major.
#[derive(Debug, Clone)]
pub struct TwoDimensionalMap<P: Default + Copy> {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    data: Vec<P>,
}

impl<P: Default + Copy> TwoDimensionalMap<P> {
    /// Define a new (abstract) two-dimensional map. The content type must
    /// implement the Default trait.
    pub fn new(width: u32, height: u32) -> Self {
        TwoDimensionalMap {
            width,
            height,
            data: vec![P::default(); width as usize * height as usize],
        }
    }

    /// Build a map directly from already-computed row-major data.
    pub fn from_vec(width: u32, height: u32, data: Vec<P>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        TwoDimensionalMap { width, height, data }
    }

    // Absolutely, the number one name of this game is keep the index
    // math in a singular location and never, ever mess with it.  This
    // particular variant is the same one used in image.rs.
    fn get_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Get the value at a single pixel's address.
    pub fn get_pt(&self, x: u32, y: u32) -> P {
        self.data[self.get_index(x, y)]
    }

    /// Set a value at a single pixel's address.
    pub fn put_pt(&mut self, x: u32, y: u32, v: P) {
        let i = self.get_index(x, y);
        self.data[i] = v;
    }

    /// Borrow an entire row as a contiguous slice.
    pub fn row(&self, y: u32) -> &[P] {
        let start = self.get_index(0, y);
        &self.data[start..start + self.width as usize]
    }

    /// Replace an entire row from a contiguous slice.
    pub fn set_row(&mut self, y: u32, row: &[P]) {
        let start = self.get_index(0, y);
        self.data[start..start + self.width as usize].copy_from_slice(row);
    }

    /// Raw row-major backing storage.
    pub fn as_slice(&self) -> &[P] {
        &self.data
    }
}

impl<P: Default + Copy> Index<(u32, u32)> for TwoDimensionalMap<P> {
    type Output = P;

    /// A convenience addressing mode for getting values.
    fn index(&self, (x, y): (u32, u32)) -> &P {
        let index = self.get_index(x, y);
        &self.data[index]
    }
}

impl<P: Default + Copy> IndexMut<(u32, u32)> for TwoDimensionalMap<P> {
    /// A convenience addressing mode for setting values.
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.data[index]
    }
}
