// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A minimal grayscale PGM frame source/sink, standing in for a real
//! video demultiplexer/encoder. The core carving engine never imports
//! this module; it only consumes
//! [`crate::frame::Frame`] values, however they were produced.
//!
//! A "video" on disk here is a directory of sequentially numbered `.pgm`
//! files (`0000.pgm`, `0001.pgm`, ...), read/written in presentation order.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::GrayImage;

use crate::error::CarveError;
use crate::frame::Frame;

fn to_carve_error(e: image::ImageError) -> CarveError {
    CarveError::Io(io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Reads a directory of `.pgm` frames in filename order.
pub struct PgmFrameSource {
    paths: std::vec::IntoIter<PathBuf>,
    /// Declared width, taken from the first frame on disk.
    pub width: u32,
    /// Declared height, taken from the first frame on disk.
    pub height: u32,
}

impl PgmFrameSource {
    /// Open `dir` and read the first frame eagerly to establish the
    /// declared width/height metadata that must be known before the first
    /// frame is emitted.
    pub fn open(dir: &Path) -> io::Result<Self> {
        let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map(|ext| ext == "pgm").unwrap_or(false))
            .collect();
        entries.sort();

        let (width, height) = match entries.first() {
            Some(first) => {
                let img = image::open(first).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                let gray = img.into_luma8();
                gray.dimensions()
            }
            None => (0, 0),
        };

        Ok(PgmFrameSource {
            paths: entries.into_iter(),
            width,
            height,
        })
    }
}

impl Iterator for PgmFrameSource {
    type Item = Result<Frame, CarveError>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.paths.next()?;
        Some(
            image::open(&path)
                .map(|img| {
                    let gray = img.into_luma8();
                    let (w, h) = gray.dimensions();
                    Frame::from_rows(w, h, gray.into_raw())
                })
                .map_err(to_carve_error),
        )
    }
}

/// Writes carved frames out as sequentially numbered `.pgm` files.
pub struct PgmFrameSink {
    dir: PathBuf,
    next_index: usize,
}

impl PgmFrameSink {
    /// Create (or reuse) `dir` as the destination for numbered `.pgm` frames.
    pub fn create(dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(PgmFrameSink {
            dir: dir.to_path_buf(),
            next_index: 0,
        })
    }

    /// Write the next frame in presentation order.
    pub fn write(&mut self, frame: Frame) -> Result<(), CarveError> {
        let path = self.dir.join(format!("{:04}.pgm", self.next_index));
        let img = GrayImage::from_raw(frame.width(), frame.height(), frame.as_bytes().to_vec())
            .expect("Frame's buffer length always matches its declared dimensions");
        img.save(&path).map_err(to_carve_error)?;
        self.next_index += 1;
        Ok(())
    }
}
