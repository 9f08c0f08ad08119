//! Build-time convex polygon representation.

use bitflags::bitflags;
use nalgebra::{Point3, Vector3};

use crate::{Classification, Plane3D, PlaneSide, Triangle};

bitflags! {
    /// Splitting strategies that have already been attempted with a polygon.
    ///
    /// A polygon whose flag is set is no longer eligible for that strategy,
    /// which keeps the builder from selecting the same candidate forever.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Exhausted: u8 {
        /// The polygon's own plane was used as a splitter.
        const FACE      = 0b0000_0001;
        /// Diagonal decomposition was attempted.
        const DECOMPOSE = 0b0000_0010;
        /// One of the polygon's edges was used for an edge split.
        const EDGE      = 0b0000_0100;
    }
}

/// A convex polygon in 3D space, defined by an ordered list of vertices.
///
/// Vertices should be coplanar and in counter-clockwise winding order
/// when viewed from the front (the direction the normal points).
/// The supporting plane is fitted once and inherited by every piece
/// produced when the polygon is split.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point3<f32>>,
    plane: Plane3D,
    exhausted: Exhausted,
}

impl Polygon {
    /// Creates a new polygon from a list of vertices, fitting its plane.
    ///
    /// Returns `None` if fewer than 3 vertices are given or the vertices
    /// enclose no area.
    pub fn new(vertices: Vec<Point3<f32>>) -> Option<Self> {
        let plane = Plane3D::from_polygon(&vertices)?;
        Some(Self {
            vertices,
            plane,
            exhausted: Exhausted::empty(),
        })
    }

    /// Creates a piece of a larger polygon that shares its plane and flags.
    pub(crate) fn fragment(&self, vertices: Vec<Point3<f32>>) -> Self {
        debug_assert!(vertices.len() >= 3, "Polygon must have at least 3 vertices");
        Self {
            vertices,
            plane: self.plane,
            exhausted: self.exhausted,
        }
    }

    /// Returns the vertices of the polygon.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the polygon has no vertices (always false for valid polygons).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the plane that this polygon lies on.
    #[inline]
    pub fn plane(&self) -> &Plane3D {
        &self.plane
    }

    /// Returns the unit normal of the polygon's plane.
    #[inline]
    pub fn normal(&self) -> Vector3<f32> {
        self.plane.normal()
    }

    /// Returns the strategies already attempted with this polygon.
    #[inline]
    pub fn exhausted(&self) -> Exhausted {
        self.exhausted
    }

    /// Returns true if `strategy` has not been attempted yet.
    #[inline]
    pub fn is_eligible(&self, strategy: Exhausted) -> bool {
        !self.exhausted.contains(strategy)
    }

    /// Marks `strategy` as attempted.
    #[inline]
    pub fn mark_exhausted(&mut self, strategy: Exhausted) {
        self.exhausted.insert(strategy);
    }

    /// Number of triangles produced by fan triangulation.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.vertices.len().saturating_sub(2)
    }

    /// Fan-triangulates the polygon: `(v0, vi, vi+1)` for `i` in `1..n-1`.
    pub fn triangulate(&self) -> impl Iterator<Item = Triangle> + '_ {
        let v0 = self.vertices[0];
        self.vertices[1..]
            .windows(2)
            .map(move |pair| Triangle::new(v0, pair[0], pair[1]))
    }

    /// Iterates over the edges as `(start, end)` pairs, closing the loop.
    pub fn edges(&self) -> impl Iterator<Item = (Point3<f32>, Point3<f32>)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Length of the shortest edge.
    pub fn min_edge_length(&self) -> f32 {
        self.edges()
            .map(|(a, b)| (b - a).norm())
            .fold(f32::INFINITY, f32::min)
    }

    /// Computes the area of the polygon.
    pub fn area(&self) -> f32 {
        self.triangulate().map(|t| t.area()).sum()
    }

    /// Computes the centroid (vertex average) of the polygon.
    pub fn centroid(&self) -> Point3<f32> {
        let sum: Vector3<f32> = self.vertices.iter().map(|p| p.coords).sum();
        Point3::from(sum / self.vertices.len() as f32)
    }

    /// Classifies this polygon relative to a plane with a custom epsilon.
    ///
    /// Returns:
    /// - `Coplanar` if all vertices lie within the epsilon band
    /// - `Front` if no vertex is behind the band
    /// - `Back` if no vertex is in front of the band
    /// - `Straddling` if vertices are on both sides
    pub fn classify_with_epsilon(&self, plane: &Plane3D, epsilon: f32) -> Classification {
        let mut front = 0;
        let mut back = 0;

        for vertex in &self.vertices {
            match plane.classify_point_with_epsilon(vertex, epsilon) {
                PlaneSide::Front => front += 1,
                PlaneSide::Back => back += 1,
                PlaneSide::OnPlane => {}
            }
        }

        match (front, back) {
            (0, 0) => Classification::Coplanar,
            (_, 0) => Classification::Front,
            (0, _) => Classification::Back,
            _ => Classification::Straddling,
        }
    }

    /// Classifies this polygon relative to a plane using `PLANE_EPSILON`.
    #[inline]
    pub fn classify(&self, plane: &Plane3D) -> Classification {
        self.classify_with_epsilon(plane, crate::PLANE_EPSILON)
    }
}
