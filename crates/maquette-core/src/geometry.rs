//! Geometric primitives for floor plan layout and validation.
//!
//! This module provides the planar types used throughout Maquette for
//! positioning rooms, testing overlap, and measuring adjacency.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in plan space
//! - [`Size`] - Width and depth dimensions
//! - [`Bounds`] - An axis-aligned rectangle defined by minimum and maximum coordinates
//! - [`Segment`] - A line segment between two points, used for walls and shared boundaries
//! - [`Polygon`] - A convex quadrilateral footprint supporting rotation
//!
//! # Coordinate System
//!
//! Maquette plans use a coordinate system consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner of the site at `(0, 0)`
//! - **X-axis**: Increases rightward (positive to the right)
//! - **Y-axis**: Increases downward (positive downward)
//! - **Units**: Meters
//!
//! Rotation angles are expressed in degrees and turn +X toward +Y.

use serde::{Deserialize, Serialize};

/// A 2D point representing a position in plan coordinate space.
///
/// Points use `f32` coordinates in meters and provide operations for basic
/// vector math. The coordinate system has origin at top-left with Y increasing
/// downward (see [module documentation](self) for details).
///
/// # Examples
///
/// ```
/// # use maquette_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// // Vector addition
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// // Midpoint calculation
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Calculates the Euclidean distance to another point
    pub fn distance(self, other: Point) -> f32 {
        self.sub_point(other).hypot()
    }

    /// Multiplies both coordinates by the given factor.
    ///
    /// # Examples
    ///
    /// ```
    /// # use maquette_core::geometry::Point;
    /// let point = Point::new(10.0, 20.0);
    ///
    /// let doubled = point.scale(2.0);
    /// assert_eq!(doubled.x(), 20.0);
    /// assert_eq!(doubled.y(), 40.0);
    /// ```
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns the dot product of this point and another, treated as vectors
    pub fn dot(self, other: Point) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Returns the 2D cross product of this point and another, treated as vectors.
    ///
    /// Positive when `other` lies counter-clockwise of `self` in the y-down
    /// plan convention.
    pub fn cross(self, other: Point) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Returns the perpendicular vector, rotated a quarter turn toward +Y
    pub fn perpendicular(self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    /// Returns this vector scaled to unit length, or zero if it has no length
    pub fn normalized(self) -> Self {
        let length = self.hypot();
        if length == 0.0 {
            Self::default()
        } else {
            self.scale(1.0 / length)
        }
    }

    /// Rotates the vector around the origin by the given angle in degrees
    pub fn rotated(self, degrees: f32) -> Self {
        let radians = degrees.to_radians();
        let (sin, cos) = radians.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Converts a point and size into a bounds rectangle.
    ///
    /// The point is treated as the center of the bounds, and the size
    /// is distributed equally in all directions around that center.
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_center(self, size)
    }
}

/// Represents the dimensions of a room or site with width and depth
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the area covered by this size
    pub fn area(self) -> f32 {
        self.width * self.height
    }

    /// Returns the width-to-height aspect ratio, or zero for a degenerate size
    pub fn aspect_ratio(self) -> f32 {
        if self.height == 0.0 {
            0.0
        } else {
            self.width / self.height
        }
    }

    /// Multiplies both dimensions by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Returns a new Size with width and height swapped
    pub fn transpose(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Returns true if both width and height are zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Represents an axis-aligned rectangle with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the covered area
    pub fn area(self) -> f32 {
        self.width() * self.height()
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Merges two bounds to create a larger bounds that contains both
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by the specified offset
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Grows the bounds outward by the given margin on every side
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Checks whether a point lies inside the bounds, edges included
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Checks whether another bounds lies entirely inside this one
    pub fn contains_bounds(&self, other: &Self) -> bool {
        other.min_x >= self.min_x
            && other.min_y >= self.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }

    /// Checks whether the interiors of two bounds overlap
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }

    /// Returns the overlapping region of two bounds, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// # use maquette_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(4.0, 4.0));
    /// let b = Bounds::new_from_top_left(Point::new(2.0, 2.0), Size::new(4.0, 4.0));
    ///
    /// let overlap = a.intersection(&b).unwrap();
    /// assert_eq!(overlap.width(), 2.0);
    /// assert_eq!(overlap.height(), 2.0);
    /// ```
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        Some(Self {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        })
    }

    /// Returns the area shared by two bounds, zero when they do not overlap
    pub fn overlap_area(&self, other: &Self) -> f32 {
        self.intersection(other).map_or(0.0, Bounds::area)
    }

    /// Finds the boundary interval along which two bounds touch.
    ///
    /// Two rectangles share a boundary when opposing edges coincide within
    /// `tolerance` and their projections onto that edge overlap by more than
    /// `tolerance`. Returns the overlapping interval on the common edge line.
    pub fn shared_boundary(&self, other: &Self, tolerance: f32) -> Option<Segment> {
        let y_lo = self.min_y.max(other.min_y);
        let y_hi = self.max_y.min(other.max_y);
        if y_hi - y_lo > tolerance {
            if (self.max_x - other.min_x).abs() <= tolerance {
                let x = (self.max_x + other.min_x) / 2.0;
                return Some(Segment::new(Point::new(x, y_lo), Point::new(x, y_hi)));
            }
            if (other.max_x - self.min_x).abs() <= tolerance {
                let x = (other.max_x + self.min_x) / 2.0;
                return Some(Segment::new(Point::new(x, y_lo), Point::new(x, y_hi)));
            }
        }

        let x_lo = self.min_x.max(other.min_x);
        let x_hi = self.max_x.min(other.max_x);
        if x_hi - x_lo > tolerance {
            if (self.max_y - other.min_y).abs() <= tolerance {
                let y = (self.max_y + other.min_y) / 2.0;
                return Some(Segment::new(Point::new(x_lo, y), Point::new(x_hi, y)));
            }
            if (other.max_y - self.min_y).abs() <= tolerance {
                let y = (other.max_y + self.min_y) / 2.0;
                return Some(Segment::new(Point::new(x_lo, y), Point::new(x_hi, y)));
            }
        }

        None
    }
}

/// A line segment between two points, used for wall runs and shared
/// boundaries between rooms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    start: Point,
    end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Returns the start point of the segment
    pub fn start(self) -> Point {
        self.start
    }

    /// Returns the end point of the segment
    pub fn end(self) -> Point {
        self.end
    }

    /// Returns the length of the segment
    pub fn length(self) -> f32 {
        self.start.distance(self.end)
    }

    /// Returns the midpoint of the segment
    pub fn midpoint(self) -> Point {
        self.start.midpoint(self.end)
    }

    /// Returns the point at parameter `t`, where 0 is the start and 1 the end
    pub fn point_at(self, t: f32) -> Point {
        self.start.add_point(self.end.sub_point(self.start).scale(t))
    }

    /// Returns the unit direction from start to end
    pub fn direction(self) -> Point {
        self.end.sub_point(self.start).normalized()
    }

    /// True when the segment runs parallel to the x-axis
    pub fn is_horizontal(self) -> bool {
        (self.start.y - self.end.y).abs() <= f32::EPSILON * self.length().max(1.0)
    }

    /// True when the segment runs parallel to the y-axis
    pub fn is_vertical(self) -> bool {
        (self.start.x - self.end.x).abs() <= f32::EPSILON * self.length().max(1.0)
    }

    /// Returns the sub-segment of the given length centered at the midpoint.
    ///
    /// The requested length is clipped to the segment itself.
    pub fn centered_subsegment(self, length: f32) -> Self {
        let total = self.length();
        if total == 0.0 || length >= total {
            return self;
        }
        let half = (length / total) / 2.0;
        Self {
            start: self.point_at(0.5 - half),
            end: self.point_at(0.5 + half),
        }
    }
}

/// A convex quadrilateral footprint in plan space.
///
/// Room footprints are rectangles that may carry a rotation, so overlap
/// testing uses the separating axis theorem rather than axis-aligned
/// comparisons. Corners are stored in counter-clockwise order for the y-down
/// plan convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polygon {
    corners: [Point; 4],
}

impl Polygon {
    /// Creates a rectangle footprint from a center, size, and rotation in degrees
    pub fn new_from_rect(center: Point, size: Size, rotation: f32) -> Self {
        let half_w = size.width / 2.0;
        let half_h = size.height / 2.0;
        let local = [
            Point::new(-half_w, -half_h),
            Point::new(half_w, -half_h),
            Point::new(half_w, half_h),
            Point::new(-half_w, half_h),
        ];
        let mut corners = [Point::default(); 4];
        for (corner, local) in corners.iter_mut().zip(local) {
            *corner = local.rotated(rotation).add_point(center);
        }
        Self { corners }
    }

    /// Returns the four corner points
    pub fn corners(&self) -> [Point; 4] {
        self.corners
    }

    /// Returns the centroid of the corners
    pub fn center(&self) -> Point {
        let mut sum = Point::default();
        for corner in self.corners {
            sum = sum.add_point(corner);
        }
        sum.scale(0.25)
    }

    /// Returns the enclosed area, computed with the shoelace formula
    pub fn area(&self) -> f32 {
        shoelace_area(&self.corners)
    }

    /// Moves every corner by the given offset
    pub fn translate(&self, offset: Point) -> Self {
        let mut corners = self.corners;
        for corner in &mut corners {
            *corner = corner.add_point(offset);
        }
        Self { corners }
    }

    /// Returns the axis-aligned bounds enclosing the polygon
    pub fn bounds(&self) -> Bounds {
        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for corner in self.corners {
            min_x = min_x.min(corner.x);
            min_y = min_y.min(corner.y);
            max_x = max_x.max(corner.x);
            max_y = max_y.max(corner.y);
        }
        Bounds::new_from_top_left(
            Point::new(min_x, min_y),
            Size::new(max_x - min_x, max_y - min_y),
        )
    }

    /// Checks whether a point lies inside the polygon, edges included
    pub fn contains_point(&self, point: Point) -> bool {
        for i in 0..4 {
            let a = self.corners[i];
            let b = self.corners[(i + 1) % 4];
            let edge = b.sub_point(a);
            let to_point = point.sub_point(a);
            if edge.cross(to_point) < -1e-4 {
                return false;
            }
        }
        true
    }

    /// Checks whether another polygon lies entirely inside this one
    pub fn contains_polygon(&self, other: &Polygon) -> bool {
        other.corners.iter().all(|&c| self.contains_point(c))
    }

    /// Tests overlap using the separating axis theorem.
    ///
    /// Returns the minimum translation vector that moves `self` out of
    /// `other`, or `None` when the interiors do not overlap. The vector
    /// points away from `other`.
    pub fn separation_vector(&self, other: &Polygon) -> Option<Point> {
        let mut min_depth = f32::INFINITY;
        let mut min_axis = Point::default();

        for axis in self.axes().into_iter().chain(other.axes()) {
            let (self_min, self_max) = project(&self.corners, axis);
            let (other_min, other_max) = project(&other.corners, axis);
            let depth = self_max.min(other_max) - self_min.max(other_min);
            if depth <= 0.0 {
                return None;
            }
            if depth < min_depth {
                min_depth = depth;
                min_axis = axis;
            }
        }

        let away = self.center().sub_point(other.center());
        if away.dot(min_axis) < 0.0 {
            min_axis = min_axis.scale(-1.0);
        }
        Some(min_axis.scale(min_depth))
    }

    /// Returns the area shared with another polygon.
    ///
    /// Clips `self` against each edge of `other` (Sutherland-Hodgman) and
    /// measures the remaining region.
    pub fn intersection_area(&self, other: &Polygon) -> f32 {
        let mut region: Vec<Point> = self.corners.to_vec();
        for i in 0..4 {
            let a = other.corners[i];
            let b = other.corners[(i + 1) % 4];
            region = clip_against_edge(&region, a, b);
            if region.is_empty() {
                return 0.0;
            }
        }
        shoelace_area(&region)
    }

    fn axes(&self) -> [Point; 2] {
        let edge_a = self.corners[1].sub_point(self.corners[0]);
        let edge_b = self.corners[2].sub_point(self.corners[1]);
        [
            edge_a.perpendicular().normalized(),
            edge_b.perpendicular().normalized(),
        ]
    }
}

fn shoelace_area(points: &[Point]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    (sum / 2.0).abs()
}

fn project(corners: &[Point; 4], axis: Point) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for corner in corners {
        let value = corner.dot(axis);
        min = min.min(value);
        max = max.max(value);
    }
    (min, max)
}

/// Keeps the part of `region` on the interior side of the directed edge
/// `a -> b`, where the interior is the counter-clockwise side.
fn clip_against_edge(region: &[Point], a: Point, b: Point) -> Vec<Point> {
    let edge = b.sub_point(a);
    let inside = |p: Point| edge.cross(p.sub_point(a)) >= 0.0;

    let mut result = Vec::with_capacity(region.len() + 1);
    for i in 0..region.len() {
        let current = region[i];
        let next = region[(i + 1) % region.len()];
        let current_in = inside(current);
        let next_in = inside(next);

        if current_in {
            result.push(current);
        }
        if current_in != next_in {
            let denom = edge.cross(next.sub_point(current));
            if denom.abs() > f32::EPSILON {
                let t = edge.cross(a.sub_point(current)) / -denom;
                let t = t.clamp(0.0, 1.0);
                result.push(current.add_point(next.sub_point(current).scale(t)));
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_new() {
        let point = Point::new(3.5, 4.2);
        assert_eq!(point.x(), 3.5);
        assert_eq!(point.y(), 4.2);
    }

    #[test]
    fn test_point_default() {
        let point = Point::default();
        assert_eq!(point.x(), 0.0);
        assert_eq!(point.y(), 0.0);
        assert!(point.is_zero());
    }

    #[test]
    fn test_point_add_sub() {
        let p1 = Point::new(1.0, 2.0);
        let p2 = Point::new(3.0, 4.0);
        let sum = p1.add_point(p2);
        assert_eq!(sum.x(), 4.0);
        assert_eq!(sum.y(), 6.0);

        let diff = sum.sub_point(p2);
        assert_eq!(diff.x(), 1.0);
        assert_eq!(diff.y(), 2.0);
    }

    #[test]
    fn test_point_midpoint() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(4.0, 6.0);
        let midpoint = p1.midpoint(p2);
        assert_eq!(midpoint.x(), 2.0);
        assert_eq!(midpoint.y(), 3.0);
    }

    #[test]
    fn test_point_hypot_and_distance() {
        let point = Point::new(3.0, 4.0);
        assert_eq!(point.hypot(), 5.0);
        assert_eq!(Point::new(1.0, 1.0).distance(Point::new(4.0, 5.0)), 5.0);
    }

    #[test]
    fn test_point_dot_and_cross() {
        let a = Point::new(1.0, 0.0);
        let b = Point::new(0.0, 1.0);
        assert_eq!(a.dot(b), 0.0);
        assert_eq!(a.cross(b), 1.0);
        assert_eq!(b.cross(a), -1.0);
        assert_eq!(a.dot(a), 1.0);
    }

    #[test]
    fn test_point_perpendicular() {
        let v = Point::new(2.0, 0.0);
        let perp = v.perpendicular();
        assert_eq!(perp.x(), 0.0);
        assert_eq!(perp.y(), 2.0);
        assert_eq!(v.dot(perp), 0.0);
    }

    #[test]
    fn test_point_normalized() {
        let v = Point::new(3.0, 4.0).normalized();
        assert_approx_eq!(f32, v.hypot(), 1.0, epsilon = 1e-6);
        assert!(Point::default().normalized().is_zero());
    }

    #[test]
    fn test_point_rotated_quarter_turn() {
        let v = Point::new(1.0, 0.0).rotated(90.0);
        assert_approx_eq!(f32, v.x(), 0.0, epsilon = 1e-6);
        assert_approx_eq!(f32, v.y(), 1.0, epsilon = 1e-6);

        let back = v.rotated(-90.0);
        assert_approx_eq!(f32, back.x(), 1.0, epsilon = 1e-6);
        assert_approx_eq!(f32, back.y(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_size_area_and_aspect() {
        let size = Size::new(6.0, 4.0);
        assert_eq!(size.area(), 24.0);
        assert_eq!(size.aspect_ratio(), 1.5);
        assert_eq!(Size::new(5.0, 0.0).aspect_ratio(), 0.0);
    }

    #[test]
    fn test_size_transpose() {
        let size = Size::new(6.0, 4.0).transpose();
        assert_eq!(size.width(), 4.0);
        assert_eq!(size.height(), 6.0);
    }

    #[test]
    fn test_bounds_new_from_center() {
        let center = Point::new(50.0, 60.0);
        let size = Size::new(20.0, 30.0);
        let bounds = Bounds::new_from_center(center, size);

        assert_eq!(bounds.min_x(), 40.0);
        assert_eq!(bounds.min_y(), 45.0);
        assert_eq!(bounds.max_x(), 60.0);
        assert_eq!(bounds.max_y(), 75.0);
        assert_eq!(bounds.width(), 20.0);
        assert_eq!(bounds.height(), 30.0);
        assert_eq!(bounds.center(), center);
    }

    #[test]
    fn test_bounds_new_from_top_left() {
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 20.0), Size::new(30.0, 40.0));

        assert_eq!(bounds.min_x(), 10.0);
        assert_eq!(bounds.min_y(), 20.0);
        assert_eq!(bounds.max_x(), 40.0);
        assert_eq!(bounds.max_y(), 60.0);
        assert_eq!(bounds.area(), 1200.0);
    }

    #[test]
    fn test_bounds_merge() {
        let bounds1 = Bounds::new_from_top_left(Point::new(1.0, 2.0), Size::new(4.0, 4.0));
        let bounds2 = Bounds::new_from_top_left(Point::new(3.0, 0.0), Size::new(5.0, 4.0));

        let merged = bounds1.merge(&bounds2);
        assert_eq!(merged.min_x(), 1.0);
        assert_eq!(merged.min_y(), 0.0);
        assert_eq!(merged.max_x(), 8.0);
        assert_eq!(merged.max_y(), 6.0);
    }

    #[test]
    fn test_bounds_translate() {
        let bounds = Bounds::new_from_top_left(Point::new(1.0, 2.0), Size::new(4.0, 4.0));
        let moved = bounds.translate(Point::new(3.0, -1.0));

        assert_eq!(moved.min_x(), 4.0);
        assert_eq!(moved.min_y(), 1.0);
        assert_eq!(moved.width(), 4.0);
        assert_eq!(moved.height(), 4.0);
    }

    #[test]
    fn test_bounds_expand() {
        let bounds = Bounds::new_from_top_left(Point::new(2.0, 2.0), Size::new(4.0, 4.0));
        let expanded = bounds.expand(1.0);

        assert_eq!(expanded.min_x(), 1.0);
        assert_eq!(expanded.min_y(), 1.0);
        assert_eq!(expanded.max_x(), 7.0);
        assert_eq!(expanded.max_y(), 7.0);
    }

    #[test]
    fn test_bounds_contains_point() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(4.0, 4.0));
        assert!(bounds.contains_point(Point::new(2.0, 2.0)));
        assert!(bounds.contains_point(Point::new(0.0, 0.0)));
        assert!(bounds.contains_point(Point::new(4.0, 4.0)));
        assert!(!bounds.contains_point(Point::new(4.1, 2.0)));
    }

    #[test]
    fn test_bounds_contains_bounds() {
        let outer = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let inner = Bounds::new_from_top_left(Point::new(2.0, 2.0), Size::new(4.0, 4.0));
        assert!(outer.contains_bounds(&inner));
        assert!(!inner.contains_bounds(&outer));
    }

    #[test]
    fn test_bounds_intersection() {
        let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(4.0, 4.0));
        let b = Bounds::new_from_top_left(Point::new(2.0, 2.0), Size::new(4.0, 4.0));

        assert!(a.intersects(&b));
        let overlap = a.intersection(&b).unwrap();
        assert_eq!(overlap.min_x(), 2.0);
        assert_eq!(overlap.min_y(), 2.0);
        assert_eq!(overlap.max_x(), 4.0);
        assert_eq!(overlap.max_y(), 4.0);
        assert_eq!(a.overlap_area(&b), 4.0);
    }

    #[test]
    fn test_bounds_touching_edges_do_not_intersect() {
        let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(4.0, 4.0));
        let b = Bounds::new_from_top_left(Point::new(4.0, 0.0), Size::new(4.0, 4.0));

        assert!(!a.intersects(&b));
        assert_eq!(a.overlap_area(&b), 0.0);
    }

    #[test]
    fn test_shared_boundary_vertical() {
        let left = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(4.0, 4.0));
        let right = Bounds::new_from_top_left(Point::new(4.0, 1.0), Size::new(4.0, 4.0));

        let boundary = left.shared_boundary(&right, 0.05).unwrap();
        assert!(boundary.is_vertical());
        assert_eq!(boundary.start().x(), 4.0);
        assert_eq!(boundary.start().y(), 1.0);
        assert_eq!(boundary.end().y(), 4.0);
        assert_eq!(boundary.length(), 3.0);
    }

    #[test]
    fn test_shared_boundary_horizontal() {
        let top = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(4.0, 3.0));
        let bottom = Bounds::new_from_top_left(Point::new(1.0, 3.0), Size::new(5.0, 3.0));

        let boundary = top.shared_boundary(&bottom, 0.05).unwrap();
        assert!(boundary.is_horizontal());
        assert_eq!(boundary.start().y(), 3.0);
        assert_eq!(boundary.length(), 3.0);
    }

    #[test]
    fn test_shared_boundary_is_symmetric() {
        let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(4.0, 4.0));
        let b = Bounds::new_from_top_left(Point::new(4.0, 0.0), Size::new(4.0, 4.0));

        let forward = a.shared_boundary(&b, 0.05).unwrap();
        let backward = b.shared_boundary(&a, 0.05).unwrap();
        assert_eq!(forward.length(), backward.length());
        assert_eq!(forward.midpoint(), backward.midpoint());
    }

    #[test]
    fn test_shared_boundary_requires_contact() {
        let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(4.0, 4.0));
        let apart = Bounds::new_from_top_left(Point::new(5.0, 0.0), Size::new(4.0, 4.0));
        assert!(a.shared_boundary(&apart, 0.05).is_none());

        // Corner-only contact has no usable interval.
        let corner = Bounds::new_from_top_left(Point::new(4.0, 4.0), Size::new(4.0, 4.0));
        assert!(a.shared_boundary(&corner, 0.05).is_none());
    }

    #[test]
    fn test_segment_length_and_midpoint() {
        let segment = Segment::new(Point::new(0.0, 0.0), Point::new(6.0, 8.0));
        assert_eq!(segment.length(), 10.0);
        assert_eq!(segment.midpoint(), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_segment_point_at() {
        let segment = Segment::new(Point::new(2.0, 0.0), Point::new(6.0, 0.0));
        assert_eq!(segment.point_at(0.0), Point::new(2.0, 0.0));
        assert_eq!(segment.point_at(0.5), Point::new(4.0, 0.0));
        assert_eq!(segment.point_at(1.0), Point::new(6.0, 0.0));
    }

    #[test]
    fn test_segment_orientation() {
        let horizontal = Segment::new(Point::new(0.0, 2.0), Point::new(5.0, 2.0));
        assert!(horizontal.is_horizontal());
        assert!(!horizontal.is_vertical());

        let vertical = Segment::new(Point::new(1.0, 0.0), Point::new(1.0, 5.0));
        assert!(vertical.is_vertical());
        assert!(!vertical.is_horizontal());
    }

    #[test]
    fn test_segment_centered_subsegment() {
        let segment = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let door = segment.centered_subsegment(2.0);
        assert_approx_eq!(f32, door.length(), 2.0, epsilon = 1e-5);
        assert_eq!(door.midpoint(), segment.midpoint());

        // Requests longer than the segment return the segment unchanged.
        let clipped = segment.centered_subsegment(20.0);
        assert_eq!(clipped, segment);
    }

    #[test]
    fn test_polygon_axis_aligned_area() {
        let polygon = Polygon::new_from_rect(Point::new(5.0, 5.0), Size::new(4.0, 3.0), 0.0);
        assert_approx_eq!(f32, polygon.area(), 12.0, epsilon = 1e-4);
    }

    #[test]
    fn test_polygon_rotation_preserves_area() {
        let size = Size::new(4.0, 3.0);
        let flat = Polygon::new_from_rect(Point::new(0.0, 0.0), size, 0.0);
        let tilted = Polygon::new_from_rect(Point::new(0.0, 0.0), size, 37.0);
        assert_approx_eq!(f32, flat.area(), tilted.area(), epsilon = 1e-3);
    }

    #[test]
    fn test_polygon_quarter_turn_swaps_bounds() {
        let polygon = Polygon::new_from_rect(Point::new(0.0, 0.0), Size::new(6.0, 2.0), 90.0);
        let bounds = polygon.bounds();
        assert_approx_eq!(f32, bounds.width(), 2.0, epsilon = 1e-4);
        assert_approx_eq!(f32, bounds.height(), 6.0, epsilon = 1e-4);
    }

    #[test]
    fn test_polygon_center() {
        let polygon = Polygon::new_from_rect(Point::new(3.0, 7.0), Size::new(4.0, 2.0), 45.0);
        let center = polygon.center();
        assert_approx_eq!(f32, center.x(), 3.0, epsilon = 1e-5);
        assert_approx_eq!(f32, center.y(), 7.0, epsilon = 1e-5);
    }

    #[test]
    fn test_polygon_contains_point() {
        let polygon = Polygon::new_from_rect(Point::new(0.0, 0.0), Size::new(4.0, 4.0), 0.0);
        assert!(polygon.contains_point(Point::new(0.0, 0.0)));
        assert!(polygon.contains_point(Point::new(2.0, 2.0)));
        assert!(!polygon.contains_point(Point::new(2.1, 0.0)));

        let tilted = Polygon::new_from_rect(Point::new(0.0, 0.0), Size::new(4.0, 4.0), 45.0);
        // The old corner is outside after rotation, the center stays inside.
        assert!(tilted.contains_point(Point::new(0.0, 0.0)));
        assert!(!tilted.contains_point(Point::new(1.9, 1.9)));
    }

    #[test]
    fn test_polygon_contains_polygon() {
        let outer = Polygon::new_from_rect(Point::new(0.0, 0.0), Size::new(10.0, 10.0), 0.0);
        let inner = Polygon::new_from_rect(Point::new(1.0, 1.0), Size::new(3.0, 3.0), 30.0);
        assert!(outer.contains_polygon(&inner));
        assert!(!inner.contains_polygon(&outer));
    }

    #[test]
    fn test_separation_vector_disjoint() {
        let a = Polygon::new_from_rect(Point::new(0.0, 0.0), Size::new(2.0, 2.0), 0.0);
        let b = Polygon::new_from_rect(Point::new(5.0, 0.0), Size::new(2.0, 2.0), 0.0);
        assert!(a.separation_vector(&b).is_none());
    }

    #[test]
    fn test_separation_vector_pushes_apart() {
        let a = Polygon::new_from_rect(Point::new(0.0, 0.0), Size::new(4.0, 4.0), 0.0);
        let b = Polygon::new_from_rect(Point::new(3.0, 0.0), Size::new(4.0, 4.0), 0.0);

        let mtv = a.separation_vector(&b).unwrap();
        // Overlap is 1.0 along x, and the push moves `a` away from `b`.
        assert_approx_eq!(f32, mtv.x(), -1.0, epsilon = 1e-4);
        assert_approx_eq!(f32, mtv.y(), 0.0, epsilon = 1e-4);

        let moved = a.translate(mtv);
        assert!(moved.intersection_area(&b) < 1e-3);
    }

    #[test]
    fn test_separation_vector_rotated() {
        let a = Polygon::new_from_rect(Point::new(0.0, 0.0), Size::new(4.0, 4.0), 45.0);
        let b = Polygon::new_from_rect(Point::new(2.0, 0.0), Size::new(4.0, 4.0), 0.0);

        let mtv = a.separation_vector(&b).unwrap();
        let moved = a.translate(mtv);
        assert!(moved.intersection_area(&b) < 1e-2);
    }

    #[test]
    fn test_intersection_area_partial_overlap() {
        let a = Polygon::new_from_rect(Point::new(0.0, 0.0), Size::new(4.0, 4.0), 0.0);
        let b = Polygon::new_from_rect(Point::new(2.0, 2.0), Size::new(4.0, 4.0), 0.0);
        assert_approx_eq!(f32, a.intersection_area(&b), 4.0, epsilon = 1e-3);
    }

    #[test]
    fn test_intersection_area_identical() {
        let a = Polygon::new_from_rect(Point::new(1.0, 1.0), Size::new(3.0, 5.0), 0.0);
        assert_approx_eq!(f32, a.intersection_area(&a), 15.0, epsilon = 1e-3);
    }

    #[test]
    fn test_intersection_area_disjoint() {
        let a = Polygon::new_from_rect(Point::new(0.0, 0.0), Size::new(2.0, 2.0), 0.0);
        let b = Polygon::new_from_rect(Point::new(10.0, 10.0), Size::new(2.0, 2.0), 0.0);
        assert_eq!(a.intersection_area(&b), 0.0);
    }
}
