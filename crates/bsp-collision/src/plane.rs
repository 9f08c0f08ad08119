//! Plane representation and point/segment classification.

use nalgebra::{Point3, Vector3};

/// Default thickness of a plane.
/// Points within this distance of the plane are considered "on" the plane.
pub const PLANE_EPSILON: f32 = 1e-4;

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Point is in front of the plane (positive side of normal)
    Front,
    /// Point is behind the plane (negative side of normal)
    Back,
    /// Point lies on the plane (within epsilon tolerance)
    OnPlane,
}

/// Classification of a polygon relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No vertex is behind the plane and at least one is in front
    Front,
    /// No vertex is in front of the plane and at least one is behind
    Back,
    /// All vertices are on the plane
    Coplanar,
    /// Vertices are on both sides of the epsilon band
    Straddling,
}

/// A plane in 3D space, represented as `normal · point = offset` with a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane3D {
    normal: Vector3<f32>,
    offset: f32,
}

impl Plane3D {
    /// Creates a new plane from a normal vector and offset.
    /// The normal will be normalized automatically.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    pub fn new(normal: Vector3<f32>, offset: f32) -> Self {
        let norm = normal.norm();
        assert!(norm > f32::EPSILON, "Plane normal cannot be zero");
        Self {
            normal: normal / norm,
            offset: offset / norm,
        }
    }

    /// Creates a plane from a point on the plane and a normal vector.
    ///
    /// Returns `None` if the normal is (nearly) zero.
    pub fn from_point_and_normal(point: Point3<f32>, normal: Vector3<f32>) -> Option<Self> {
        let unit_normal = normal.try_normalize(f32::EPSILON)?;
        Some(Self {
            normal: unit_normal,
            offset: unit_normal.dot(&point.coords),
        })
    }

    /// Fits a plane to a closed loop of vertices using Newell's method.
    ///
    /// The normal follows the right-hand rule for the vertex winding, and the
    /// plane passes through the vertex centroid. Returns `None` for fewer
    /// than three vertices or a loop with no area.
    pub fn from_polygon(vertices: &[Point3<f32>]) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }

        let mut normal = Vector3::zeros();
        let mut centroid = Vector3::zeros();
        for (i, current) in vertices.iter().enumerate() {
            let next = vertices[(i + 1) % vertices.len()];
            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
            centroid += current.coords;
        }
        centroid /= vertices.len() as f32;

        Self::from_point_and_normal(Point3::from(centroid), normal)
    }

    /// Returns the unit normal vector of the plane.
    #[inline]
    pub fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    /// Returns the signed distance from the origin to the plane along the normal.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Computes the signed distance from a point to the plane.
    /// - Positive: point is in front (same side as normal)
    /// - Negative: point is behind (opposite side from normal)
    /// - Zero: point is on the plane
    #[inline]
    pub fn signed_distance(&self, point: &Point3<f32>) -> f32 {
        self.normal.dot(&point.coords) - self.offset
    }

    /// Classifies which side of the plane a point lies on.
    /// Uses the default `PLANE_EPSILON` tolerance.
    #[inline]
    pub fn classify_point(&self, point: &Point3<f32>) -> PlaneSide {
        self.classify_point_with_epsilon(point, PLANE_EPSILON)
    }

    /// Classifies which side of the plane a point lies on, with a custom epsilon.
    pub fn classify_point_with_epsilon(&self, point: &Point3<f32>, epsilon: f32) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist > epsilon {
            PlaneSide::Front
        } else if dist < -epsilon {
            PlaneSide::Back
        } else {
            PlaneSide::OnPlane
        }
    }

    /// Computes the intersection of a line segment with the plane.
    ///
    /// Returns `Some((t, point))` where:
    /// - `t` is the interpolation parameter (0.0 = start, 1.0 = end)
    /// - `point` is the intersection point
    ///
    /// Returns `None` if the segment is parallel to the plane or doesn't intersect.
    pub fn intersect_segment(
        &self,
        start: &Point3<f32>,
        end: &Point3<f32>,
    ) -> Option<(f32, Point3<f32>)> {
        let direction = end - start;
        let denom = self.normal.dot(&direction);

        // Segment is parallel to plane
        if denom.abs() < f32::EPSILON {
            return None;
        }

        let t = (self.offset - self.normal.dot(&start.coords)) / denom;

        if !(0.0..=1.0).contains(&t) {
            return None;
        }

        Some((t, start + direction * t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_normalizes_normal_and_offset() {
        let plane = Plane3D::new(Vector3::new(0.0, 0.0, 2.0), 4.0);
        assert_relative_eq!(plane.normal(), Vector3::z());
        assert_relative_eq!(plane.offset(), 2.0);
    }

    #[test]
    fn newell_fit_follows_winding() {
        let ccw = [
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let plane = Plane3D::from_polygon(&ccw).unwrap();
        assert_relative_eq!(plane.normal(), Vector3::z(), epsilon = 1e-6);
        assert_relative_eq!(plane.offset(), 1.0, epsilon = 1e-6);

        let mut cw = ccw;
        cw.reverse();
        let flipped = Plane3D::from_polygon(&cw).unwrap();
        assert_relative_eq!(flipped.normal(), -Vector3::z(), epsilon = 1e-6);
    }

    #[test]
    fn newell_fit_rejects_degenerate_loops() {
        let collinear = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert!(Plane3D::from_polygon(&collinear).is_none());
        assert!(Plane3D::from_polygon(&collinear[..2]).is_none());
    }

    #[test]
    fn classify_point_uses_epsilon_band() {
        let plane = Plane3D::new(Vector3::y(), 0.0);
        assert_eq!(plane.classify_point(&Point3::new(0.0, 1.0, 0.0)), PlaneSide::Front);
        assert_eq!(plane.classify_point(&Point3::new(0.0, -1.0, 0.0)), PlaneSide::Back);
        assert_eq!(
            plane.classify_point(&Point3::new(0.0, PLANE_EPSILON * 0.5, 0.0)),
            PlaneSide::OnPlane
        );
        assert_eq!(
            plane.classify_point_with_epsilon(&Point3::new(0.0, 0.05, 0.0), 0.1),
            PlaneSide::OnPlane
        );
    }

    #[test]
    fn intersect_segment_reports_parameter() {
        let plane = Plane3D::new(Vector3::x(), 1.0);
        let (t, point) = plane
            .intersect_segment(&Point3::new(0.0, 0.0, 0.0), &Point3::new(4.0, 0.0, 0.0))
            .unwrap();
        assert_relative_eq!(t, 0.25);
        assert_relative_eq!(point, Point3::new(1.0, 0.0, 0.0));

        assert!(plane
            .intersect_segment(&Point3::new(2.0, 0.0, 0.0), &Point3::new(4.0, 0.0, 0.0))
            .is_none());
        assert!(plane
            .intersect_segment(&Point3::new(0.0, 0.0, 0.0), &Point3::new(0.0, 4.0, 0.0))
            .is_none());
    }
}
