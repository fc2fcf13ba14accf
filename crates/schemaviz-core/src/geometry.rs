//! Geometric primitives for diagram layout and positioning.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate (or displacement vector) in canvas units
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Schemaviz uses a coordinate system consistent with SVG and draw.io:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Node positions refer to the *center* of the node. Renderers that need a
//! top-left corner derive it through [`Bounds::new_from_center`].

use serde::{Deserialize, Serialize};

/// A 2D point in canvas space.
///
/// Coordinates are `f64`; the force simulation accumulates many small
/// displacements and benefits from the extra precision.
///
/// # Examples
///
/// ```
/// # use schemaviz_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let delta = p1.sub_point(p2);
/// assert_eq!(delta.x(), 5.0);
/// assert_eq!(delta.y(), 15.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate.
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate.
    pub fn y(self) -> f64 {
        self.y
    }

    /// Returns `true` when both coordinates are exactly zero.
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Returns `true` when neither coordinate is NaN or infinite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Adds another point to this point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point.
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Returns the midpoint between this point and another.
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Euclidean length of the point treated as a vector from the origin.
    pub fn hypot(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        self.sub_point(other).hypot()
    }

    /// Multiplies both coordinates by `factor`.
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Shortens the vector to `max_length` if it is longer, keeping its direction.
    pub fn clamp_length(self, max_length: f64) -> Self {
        let length = self.hypot();
        if length > max_length && length > 0.0 {
            self.scale(max_length / length)
        } else {
            self
        }
    }
}

/// Width and height of a diagram element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f64 {
        self.width
    }

    pub fn height(self) -> f64 {
        self.height
    }

    /// Area covered by the size.
    pub fn area(self) -> f64 {
        self.width * self.height
    }

    /// Returns `true` when both dimensions are finite and strictly positive.
    pub fn is_positive(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Grows both dimensions by `padding` on every side.
    pub fn add_padding(self, padding: f64) -> Self {
        Self {
            width: self.width + padding * 2.0,
            height: self.height + padding * 2.0,
        }
    }
}

/// A rectangular bounding box with minimum and maximum coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    /// Creates bounds of `size` centered on `center`.
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width() / 2.0;
        let half_height = size.height() / 2.0;
        Self {
            min_x: center.x() - half_width,
            min_y: center.y() - half_height,
            max_x: center.x() + half_width,
            max_y: center.y() + half_height,
        }
    }

    /// Creates bounds of `size` whose top-left corner is `top_left`.
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x(),
            min_y: top_left.y(),
            max_x: top_left.x() + size.width(),
            max_y: top_left.y() + size.height(),
        }
    }

    pub fn min_x(self) -> f64 {
        self.min_x
    }

    pub fn min_y(self) -> f64 {
        self.min_y
    }

    pub fn max_x(self) -> f64 {
        self.max_x
    }

    pub fn max_y(self) -> f64 {
        self.max_y
    }

    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner.
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Returns the smallest bounds containing both `self` and `other`.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by `offset`.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x(),
            min_y: self.min_y + offset.y(),
            max_x: self.max_x + offset.x(),
            max_y: self.max_y + offset.y(),
        }
    }

    /// Expands the bounds by `padding` on every side.
    pub fn add_padding(&self, padding: f64) -> Self {
        Self {
            min_x: self.min_x - padding,
            min_y: self.min_y - padding,
            max_x: self.max_x + padding,
            max_y: self.max_y + padding,
        }
    }

    /// Point where the segment from the center toward `target` leaves the box.
    ///
    /// Returns the center itself when `target` coincides with it.
    pub fn boundary_toward(&self, target: Point) -> Point {
        let center = self.center();
        let delta = target.sub_point(center);
        if delta.is_zero() {
            return center;
        }

        let half_width = self.width() / 2.0;
        let half_height = self.height() / 2.0;
        let scale_x = if delta.x() != 0.0 {
            half_width / delta.x().abs()
        } else {
            f64::INFINITY
        };
        let scale_y = if delta.y() != 0.0 {
            half_height / delta.y().abs()
        } else {
            f64::INFINITY
        };
        let scale = scale_x.min(scale_y).min(1.0);
        center.add_point(delta.scale(scale))
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f64..1000.0, -1000.0f64..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (point_strategy(), 1.0f64..500.0, 1.0f64..500.0)
            .prop_map(|(center, w, h)| Bounds::new_from_center(center, Size::new(w, h)))
    }

    proptest! {
        #[test]
        fn add_sub_is_inverse(p1 in point_strategy(), p2 in point_strategy()) {
            let back = p1.add_point(p2).sub_point(p2);
            prop_assert!(approx_eq!(f64, back.x(), p1.x(), epsilon = 1e-9));
            prop_assert!(approx_eq!(f64, back.y(), p1.y(), epsilon = 1e-9));
        }

        #[test]
        fn clamp_never_exceeds_limit(p in point_strategy(), limit in 0.1f64..100.0) {
            let clamped = p.clamp_length(limit);
            prop_assert!(clamped.hypot() <= limit + 1e-9);
        }

        #[test]
        fn merge_contains_both(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            let merged = b1.merge(&b2);
            prop_assert!(merged.min_x() <= b1.min_x() && merged.min_x() <= b2.min_x());
            prop_assert!(merged.max_y() >= b1.max_y() && merged.max_y() >= b2.max_y());
        }

        #[test]
        fn boundary_point_stays_within_bounds(b in bounds_strategy(), target in point_strategy()) {
            let p = b.boundary_toward(target);
            prop_assert!(p.x() >= b.min_x() - 1e-6 && p.x() <= b.max_x() + 1e-6);
            prop_assert!(p.y() >= b.min_y() - 1e-6 && p.y() <= b.max_y() + 1e-6);
        }
    }
}
