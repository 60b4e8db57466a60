// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Validated run configuration. Nothing downstream of `CarveConfig::new`
//! trusts raw CLI or caller input again.

use crate::error::CarveError;

/// A validated request to shrink a video's width by `pixels` columns.
#[derive(Debug, Clone)]
pub struct CarveConfig {
    /// Number of columns `P` to remove from every frame.
    pub pixels: u32,
    /// Shot-boundary trigger in `[0, 1]`.
    pub threshold: f64,
    /// Whether to accumulate and report per-kernel timings.
    pub profile: bool,
    /// Explicit PRNG seed, for reproducible runs.
    pub seed: Option<u64>,
}

impl CarveConfig {
    /// Validate `pixels` and `threshold`. Does not yet know the input
    /// frame's width, so it cannot check `pixels < width`; call
    /// [`CarveConfig::validate_against_width`] once that is known.
    pub fn new(pixels: u32, threshold: f64, profile: bool, seed: Option<u64>) -> Result<Self, CarveError> {
        if pixels < 1 {
            return Err(CarveError::Configuration {
                reason: "pixels must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CarveError::Configuration {
                reason: format!("threshold must be within [0, 1], got {threshold}"),
            });
        }
        Ok(CarveConfig {
            pixels,
            threshold,
            profile,
            seed,
        })
    }

    /// Check `pixels < width`, once the source's declared width is known.
    pub fn validate_against_width(&self, width: u32) -> Result<(), CarveError> {
        if self.pixels >= width {
            return Err(CarveError::Configuration {
                reason: format!(
                    "pixels ({}) must be less than the input width ({width})",
                    self.pixels
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_pixels() {
        assert!(CarveConfig::new(0, 0.3, false, None).is_err());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        assert!(CarveConfig::new(1, 1.5, false, None).is_err());
        assert!(CarveConfig::new(1, -0.1, false, None).is_err());
    }

    #[test]
    fn accepts_boundary_thresholds() {
        assert!(CarveConfig::new(1, 0.0, false, None).is_ok());
        assert!(CarveConfig::new(1, 1.0, false, None).is_ok());
    }

    #[test]
    fn rejects_pixels_not_smaller_than_width() {
        let cfg = CarveConfig::new(5, 0.3, false, None).unwrap();
        assert!(cfg.validate_against_width(5).is_err());
        assert!(cfg.validate_against_width(4).is_err());
        assert!(cfg.validate_against_width(6).is_ok());
    }
}
