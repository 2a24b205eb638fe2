#![warn(missing_docs)]

//! Geometry primitives for the strata slicer.
//!
//! Thin wrappers around nalgebra plus the planar types exchanged between
//! the layer slicer, the contour stitcher, and the extrusion planner:
//! facets, slice segments, and closed paths.

use std::hash::{Hash, Hasher};

use nalgebra::Vector3;

/// A vector (or vertex position) in mesh space.
pub type Vec3 = Vector3<f32>;

/// A triangular facet of the input mesh.
///
/// Immutable after construction. The attribute word is carried through
/// untouched from the source record.
#[derive(Debug, Clone, Copy)]
pub struct Facet {
    /// Unit outward normal.
    pub normal: Vec3,
    /// The three vertices, in the winding order of the source mesh.
    pub vertices: [Vec3; 3],
    /// Opaque 16-bit attribute from the binary STL record.
    pub attribute: u16,
}

impl Facet {
    /// Create a facet from its normal and vertices, with a zero attribute.
    pub fn new(normal: Vec3, vertices: [Vec3; 3]) -> Self {
        Self {
            normal,
            vertices,
            attribute: 0,
        }
    }
}

/// A point in the slicing plane.
///
/// Equality and hashing are bit-exact: two points compare equal iff both
/// components have identical bit patterns. This is what makes `Point2`
/// usable as a lookup key during stitching: every key and every queried
/// endpoint comes out of the same interpolation, never recomputed along a
/// different arithmetic path.
#[derive(Debug, Clone, Copy)]
pub struct Point2 {
    /// X coordinate (mm).
    pub x: f32,
    /// Y coordinate (mm).
    pub y: f32,
}

impl Point2 {
    /// Create a point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl PartialEq for Point2 {
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits()
    }
}

impl Eq for Point2 {}

impl Hash for Point2 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
    }
}

/// One facet/plane intersection segment.
///
/// The normal is a copy of the owning facet's normal, so segments carry no
/// lifetime coupling to the facet table. Start and end are distinct for
/// every segment the slicer keeps; degenerate intersections are dropped at
/// creation.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    /// Where walking the contour enters this segment.
    pub start: Point2,
    /// Where walking the contour leaves this segment.
    pub end: Point2,
    /// Outward normal of the facet this segment was cut from.
    pub normal: Vec3,
}

impl Segment {
    /// True when both endpoints are bit-identical.
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

/// A closed 2D contour.
///
/// Closure is implicit: the last point is adjacent to the first, and the
/// first point is not repeated at the end.
#[derive(Debug, Clone, Default)]
pub struct Path {
    /// Vertices of the contour in walk order.
    pub points: Vec<Point2>,
}

impl Path {
    /// Create a path from points.
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Check if the path has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Total length of the contour, closing edge included.
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        let mut length = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            length += f64::from(self.points[i].distance(&self.points[j]));
        }
        length
    }

    /// Signed area of the contour.
    /// Positive for counter-clockwise winding, negative for clockwise.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            area += f64::from(self.points[i].x) * f64::from(self.points[j].y);
            area -= f64::from(self.points[j].x) * f64::from(self.points[i].y);
        }
        area / 2.0
    }

    /// Is the contour counter-clockwise?
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }
}

/// Intersect one wedge of a facet with the horizontal plane at `layer_z`.
///
/// `origin` is the wedge apex (the bottom vertex for the lower wedge, the
/// top vertex for the upper wedge); the plane cuts the two edges leaving
/// it. The segment start lies on the (origin → right) edge and the end on
/// (origin → left), which is what keeps the solid interior on the left of
/// the walk direction when viewed from +z.
///
/// The interpolation parameter is not clamped; callers guarantee that the
/// plane actually crosses both edges and that neither edge is horizontal
/// (`origin.z != right.z`, `origin.z != left.z`).
pub fn wedge_slice(origin: &Vec3, right: &Vec3, left: &Vec3, normal: &Vec3, layer_z: f32) -> Segment {
    let dz = layer_z - origin.z;

    let tr = dz / (right.z - origin.z);
    let start = Point2::new(
        tr * (right.x - origin.x) + origin.x,
        tr * (right.y - origin.y) + origin.y,
    );

    let tl = dz / (left.z - origin.z);
    let end = Point2::new(
        tl * (left.x - origin.x) + origin.x,
        tl * (left.y - origin.y) + origin.y,
    );

    Segment {
        start,
        end,
        normal: *normal,
    }
}
