//! Tank bounds: the rectangle the jellyfish sprite may occupy.

/// Errors that can occur constructing tank geometry.
#[derive(Debug, thiserror::Error)]
pub enum TankError {
    /// Invalid tank geometry (non-finite or non-positive dimensions).
    #[error("invalid tank bounds: {reason}")]
    InvalidBounds {
        /// Explanation of what is wrong with the geometry.
        reason: String,
    },
}

/// The tank rectangle, inset by the sprite size.
///
/// Positions refer to the sprite's top-left corner, so the reachable
/// area is `[0, width - sprite_size] x [0, height - sprite_size]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankBounds {
    /// Tank width in pixels.
    width: f64,

    /// Tank height in pixels.
    height: f64,

    /// Sprite edge length in pixels.
    sprite_size: f64,
}

impl TankBounds {
    /// Create tank bounds.
    ///
    /// # Errors
    ///
    /// Returns [`TankError::InvalidBounds`] if any dimension is
    /// non-finite, the sprite size is negative, or the sprite does not
    /// fit inside the tank.
    pub fn new(width: f64, height: f64, sprite_size: f64) -> Result<Self, TankError> {
        if !width.is_finite() || !height.is_finite() || !sprite_size.is_finite() {
            return Err(TankError::InvalidBounds {
                reason: "dimensions must be finite".to_owned(),
            });
        }
        if sprite_size < 0.0 {
            return Err(TankError::InvalidBounds {
                reason: "sprite size must be non-negative".to_owned(),
            });
        }
        if width <= sprite_size || height <= sprite_size {
            return Err(TankError::InvalidBounds {
                reason: format!(
                    "tank {width}x{height} cannot fit a sprite of size {sprite_size}"
                ),
            });
        }
        Ok(Self {
            width,
            height,
            sprite_size,
        })
    }

    /// Largest reachable x position.
    pub fn max_x(&self) -> f64 {
        self.width - self.sprite_size
    }

    /// Largest reachable y position.
    pub fn max_y(&self) -> f64 {
        self.height - self.sprite_size
    }

    /// Center of the reachable area.
    pub fn center(&self) -> (f64, f64) {
        (self.max_x() / 2.0, self.max_y() / 2.0)
    }

    /// Whether a position lies inside the reachable area.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.max_x()).contains(&x) && (0.0..=self.max_y()).contains(&y)
    }

    /// Tank width in pixels.
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Tank height in pixels.
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Sprite edge length in pixels.
    pub const fn sprite_size(&self) -> f64 {
        self.sprite_size
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn reachable_area_is_inset_by_sprite_size() {
        let bounds = TankBounds::new(1280.0, 720.0, 32.0).unwrap();
        assert!((bounds.max_x() - 1248.0).abs() < 1e-9);
        assert!((bounds.max_y() - 688.0).abs() < 1e-9);
        assert!(bounds.contains(0.0, 0.0));
        assert!(bounds.contains(1248.0, 688.0));
        assert!(!bounds.contains(1249.0, 0.0));
        assert!(!bounds.contains(0.0, -1.0));
    }

    #[test]
    fn center_is_inside() {
        let bounds = TankBounds::new(100.0, 80.0, 10.0).unwrap();
        let (cx, cy) = bounds.center();
        assert!(bounds.contains(cx, cy));
    }

    #[test]
    fn sprite_larger_than_tank_is_rejected() {
        assert!(TankBounds::new(20.0, 80.0, 32.0).is_err());
        assert!(TankBounds::new(80.0, 20.0, 32.0).is_err());
    }

    #[test]
    fn non_finite_dimensions_are_rejected() {
        assert!(TankBounds::new(f64::NAN, 80.0, 10.0).is_err());
        assert!(TankBounds::new(100.0, f64::INFINITY, 10.0).is_err());
    }

    #[test]
    fn negative_sprite_size_is_rejected() {
        assert!(TankBounds::new(100.0, 80.0, -1.0).is_err());
    }
}
