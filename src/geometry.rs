//! Geometric primitives for widget placement.

use crate::object::Object;

/// A rectangle in page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// X coordinate of the lower-left corner
    pub x: f32,
    /// Y coordinate of the lower-left corner
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from two corner points, normalizing so that width
    /// and height are non-negative (PDF `/Rect` corners may come in any order).
    pub fn from_points(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    /// Decode a `/Rect` array `[x1 y1 x2 y2]`.
    pub fn from_array(arr: &[Object]) -> Option<Self> {
        if arr.len() != 4 {
            return None;
        }
        let mut coords = [0.0f32; 4];
        for (i, item) in arr.iter().enumerate() {
            coords[i] = item.as_number()? as f32;
        }
        Some(Self::from_points(coords[0], coords[1], coords[2], coords[3]))
    }

    /// Encode as a `/Rect` array object.
    pub fn to_array(&self) -> Object {
        Object::Array(vec![
            Object::Real(self.x as f64),
            Object::Real(self.y as f64),
            Object::Real((self.x + self.width) as f64),
            Object::Real((self.y + self.height) as f64),
        ])
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// A rectangle with zero (or negative) extent draws nothing.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}
