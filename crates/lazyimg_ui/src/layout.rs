//! Geometry used for viewport intersection.

use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle defined by position and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Move the rectangle to a new origin, keeping its size.
    pub fn moved_to(&self, x: f32, y: f32) -> Rectangle {
        Rectangle::new(x, y, self.width, self.height)
    }

    /// Grow (or shrink, for negative values) each edge independently.
    pub fn expand(&self, top: f32, right: f32, bottom: f32, left: f32) -> Rectangle {
        Rectangle::new(
            self.x - left,
            self.y - top,
            (self.width + left + right).max(0.0),
            (self.height + top + bottom).max(0.0),
        )
    }

    /// Compute the intersection of two rectangles.
    /// If there's no overlap, the result has zero width and/or height.
    pub fn intersect(&self, other: &Rectangle) -> Rectangle {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        let width = (x2 - x1).max(0.0);
        let height = (y2 - y1).max(0.0);

        Rectangle::new(x1, y1, width, height)
    }

    /// Fraction of this rectangle's area that lies inside `root`.
    ///
    /// Degenerate (zero-area) rectangles report 1.0 when their origin lies inside
    /// `root`, so collapsed elements still become visible.
    pub fn intersection_ratio(&self, root: &Rectangle) -> f32 {
        let area = self.area();
        if area <= 0.0 {
            return if root.contains(self.position()) { 1.0 } else { 0.0 };
        }
        (self.intersect(root).area() / area).clamp(0.0, 1.0)
    }
}
