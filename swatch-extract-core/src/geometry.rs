//! Geometric primitives and the square-swatch plausibility filter.
//!
//! Coordinates are `f32` in page units, matching what the document
//! parser reports for word boxes and image placements.

/// A point in 2D page space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle defined by two corner points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge
    pub x0: f32,
    /// Bottom edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
}

impl Rect {
    /// Create a rectangle from its corner coordinates, normalizing
    /// the corner order
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Get the width
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Get the height
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Get the center point
    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }
}

/// Thresholds deciding whether pixel dimensions look like a square
/// swatch tile rather than an icon, banner, or photo.
#[derive(Debug, Clone)]
pub struct GeometryOptions {
    /// Minimum width and height in pixels
    pub min_side: u32,
    /// Lower bound of the accepted width/height ratio (inclusive)
    pub min_aspect: f32,
    /// Upper bound of the accepted width/height ratio (inclusive)
    pub max_aspect: f32,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            min_side: 180,
            min_aspect: 0.85,
            max_aspect: 1.18,
        }
    }
}

impl GeometryOptions {
    /// Check whether decoded pixel dimensions plausibly belong to a
    /// square swatch tile.
    ///
    /// Rejects anything with a side below `min_side` and anything
    /// whose aspect ratio falls outside the inclusive
    /// `[min_aspect, max_aspect]` band.
    pub fn is_plausible_swatch(&self, width: u32, height: u32) -> bool {
        if width < self.min_side || height < self.min_side {
            return false;
        }
        let aspect = width as f32 / height as f32;
        aspect >= self.min_aspect && aspect <= self.max_aspect
    }
}
