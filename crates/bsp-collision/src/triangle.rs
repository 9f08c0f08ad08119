//! Triangle representation and the primitive intersection tests run at leaves.

use nalgebra::{Point3, Vector3};

use crate::Plane3D;

/// Determinants smaller than this mean the ray runs parallel to the triangle.
const PARALLEL_EPSILON: f32 = 1e-12;

/// Barycentric slack so rays through a shared edge hit at least one of its triangles.
const BARYCENTRIC_EPSILON: f32 = 1e-6;

/// A triangle in 3D space, defined by three vertices.
///
/// This is the only geometry stored in a finished tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    vertices: [Point3<f32>; 3],
}

impl Triangle {
    /// Creates a new triangle from three points.
    ///
    /// The winding order determines the normal direction via the right-hand rule:
    /// normal = (b - a) × (c - a)
    pub fn new(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Returns the three vertices of the triangle.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f32>; 3] {
        &self.vertices
    }

    /// Computes the (unnormalized) normal vector of the triangle.
    ///
    /// Its length is twice the triangle's area.
    pub fn normal(&self) -> Vector3<f32> {
        let [a, b, c] = &self.vertices;
        (b - a).cross(&(c - a))
    }

    /// Computes the area of the triangle.
    #[inline]
    pub fn area(&self) -> f32 {
        self.normal().norm() * 0.5
    }

    /// Returns the plane that this triangle lies on, or `None` if it is degenerate.
    pub fn plane(&self) -> Option<Plane3D> {
        Plane3D::from_point_and_normal(self.vertices[0], self.normal())
    }

    /// Computes the centroid (center of mass) of the triangle.
    pub fn centroid(&self) -> Point3<f32> {
        let [a, b, c] = &self.vertices;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    /// Intersects the ray `origin + t * direction` with this triangle
    /// (Möller–Trumbore), accepting only `t` within `[t_min, t_max]`.
    ///
    /// Both faces are hit; returns the ray parameter of the hit.
    pub fn intersect_ray(
        &self,
        origin: &Point3<f32>,
        direction: &Vector3<f32>,
        t_min: f32,
        t_max: f32,
    ) -> Option<f32> {
        let [v0, v1, v2] = &self.vertices;
        let e1 = v1 - v0;
        let e2 = v2 - v0;

        let pvec = direction.cross(&e2);
        let det = e1.dot(&pvec);
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = origin - v0;
        let u = tvec.dot(&pvec) * inv_det;
        if !(-BARYCENTRIC_EPSILON..=1.0 + BARYCENTRIC_EPSILON).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(&e1);
        let v = direction.dot(&qvec) * inv_det;
        if v < -BARYCENTRIC_EPSILON || u + v > 1.0 + BARYCENTRIC_EPSILON {
            return None;
        }

        let t = e2.dot(&qvec) * inv_det;
        (t_min..=t_max).contains(&t).then_some(t)
    }

    /// Returns the point of the triangle closest to `p`.
    ///
    /// Walks the Voronoi regions of the vertices, then the edges, then the face.
    pub fn closest_point(&self, p: &Point3<f32>) -> Point3<f32> {
        let [a, b, c] = &self.vertices;
        let ab = b - a;
        let ac = c - a;

        let ap = p - a;
        let d1 = ab.dot(&ap);
        let d2 = ac.dot(&ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return *a;
        }

        let bp = p - b;
        let d3 = ab.dot(&bp);
        let d4 = ac.dot(&bp);
        if d3 >= 0.0 && d4 <= d3 {
            return *b;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            return a + ab * (d1 / (d1 - d3));
        }

        let cp = p - c;
        let d5 = ab.dot(&cp);
        let d6 = ac.dot(&cp);
        if d6 >= 0.0 && d5 <= d6 {
            return *c;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            return a + ac * (d2 / (d2 - d6));
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return b + (c - b) * w;
        }

        let denom = 1.0 / (va + vb + vc);
        a + ab * (vb * denom) + ac * (vc * denom)
    }

    /// Tests the sphere at `center` against this triangle.
    ///
    /// The sphere touches when the closest point of the triangle lies within
    /// `radius + tolerance` of the center; that closest point is returned.
    pub fn intersect_sphere(
        &self,
        center: &Point3<f32>,
        radius: f32,
        tolerance: f32,
    ) -> Option<Point3<f32>> {
        let closest = self.closest_point(center);
        let reach = radius + tolerance;
        ((closest - center).norm_squared() <= reach * reach).then_some(closest)
    }
}
