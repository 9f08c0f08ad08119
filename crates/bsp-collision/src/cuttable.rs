//! Polygon cutting/splitting operations for BSP construction.

use crate::{Classification, Plane3D, PlaneSide, Polygon};

/// Edges shorter than this fraction of epsilon make a split degenerate.
pub const SLIVER_FACTOR: f32 = 0.75;

/// Outcome of a safe split.
#[derive(Debug, Clone, PartialEq)]
pub enum SafeSplit {
    /// The polygon was cut into a front and a back piece.
    Split { front: Polygon, back: Polygon },
    /// Cutting would have produced a sliver; the unsplit polygon belongs to both sides.
    Duplicated,
}

/// Trait for geometry that can be cut by a plane.
pub trait Cuttable {
    /// Cuts the geometry by a plane.
    ///
    /// Returns `(front, back)` where:
    /// - `front`: `Some(polygon)` containing the part on the front side of the plane
    /// - `back`: `Some(polygon)` containing the part on the back side of the plane
    ///
    /// # Return values by classification
    ///
    /// - **Front**: `(Some(self), None)` - entire geometry is in front
    /// - **Back**: `(None, Some(self))` - entire geometry is behind
    /// - **Coplanar**: `(None, Some(self))` - treated as back
    /// - **Straddling**: `(Some(front_part), Some(back_part))` - split into two pieces
    fn split(&self, plane: &Plane3D, epsilon: f32) -> (Option<Polygon>, Option<Polygon>);

    /// Cuts a straddling polygon, refusing to produce slivers.
    ///
    /// If either piece has an edge shorter than `SLIVER_FACTOR * epsilon`
    /// (or a piece is missing), returns [`SafeSplit::Duplicated`].
    fn split_safe(&self, plane: &Plane3D, epsilon: f32) -> SafeSplit;
}

impl Cuttable for Polygon {
    fn split(&self, plane: &Plane3D, epsilon: f32) -> (Option<Polygon>, Option<Polygon>) {
        match self.classify_with_epsilon(plane, epsilon) {
            Classification::Front => (Some(self.clone()), None),
            Classification::Back | Classification::Coplanar => (None, Some(self.clone())),
            Classification::Straddling => split_polygon(self, plane, epsilon),
        }
    }

    fn split_safe(&self, plane: &Plane3D, epsilon: f32) -> SafeSplit {
        let min_edge = SLIVER_FACTOR * epsilon;
        match self.split(plane, epsilon) {
            (Some(front), Some(back))
                if front.min_edge_length() >= min_edge && back.min_edge_length() >= min_edge =>
            {
                SafeSplit::Split { front, back }
            }
            _ => SafeSplit::Duplicated,
        }
    }
}

/// Splits a straddling polygon into front and back parts.
///
/// Uses a variant of the Sutherland-Hodgman algorithm:
/// walks the polygon edges and builds two vertex lists,
/// adding intersection points when edges cross the plane.
fn split_polygon(
    polygon: &Polygon,
    plane: &Plane3D,
    epsilon: f32,
) -> (Option<Polygon>, Option<Polygon>) {
    let vertices = polygon.vertices();
    let n = vertices.len();

    let mut front_verts = Vec::with_capacity(n + 1);
    let mut back_verts = Vec::with_capacity(n + 1);

    let sides: Vec<PlaneSide> = vertices
        .iter()
        .map(|v| plane.classify_point_with_epsilon(v, epsilon))
        .collect();

    for i in 0..n {
        let current = vertices[i];
        let current_side = sides[i];
        let next_idx = (i + 1) % n;
        let next = vertices[next_idx];
        let next_side = sides[next_idx];

        match current_side {
            PlaneSide::Front => front_verts.push(current),
            PlaneSide::Back => back_verts.push(current),
            PlaneSide::OnPlane => {
                // On-plane vertices go to both sides
                front_verts.push(current);
                back_verts.push(current);
            }
        }

        let crosses = matches!(
            (current_side, next_side),
            (PlaneSide::Front, PlaneSide::Back) | (PlaneSide::Back, PlaneSide::Front)
        );

        if crosses {
            if let Some((_, intersection)) = plane.intersect_segment(&current, &next) {
                front_verts.push(intersection);
                back_verts.push(intersection);
            }
        }
    }

    let front = (front_verts.len() >= 3).then(|| polygon.fragment(front_verts));
    let back = (back_verts.len() >= 3).then(|| polygon.fragment(back_verts));

    (front, back)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PLANE_EPSILON;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    fn make_square() -> Polygon {
        Polygon::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn split_straddling_square() {
        let square = make_square();
        let plane = Plane3D::new(Vector3::x(), 1.0);

        let (front, back) = square.split(&plane, PLANE_EPSILON);
        let front = front.unwrap();
        let back = back.unwrap();

        assert_eq!(front.len(), 4);
        assert_eq!(back.len(), 4);
        assert_relative_eq!(front.area() + back.area(), square.area(), epsilon = 1e-5);
        assert!(front.vertices().iter().all(|v| v.x >= 1.0 - 1e-6));
        assert!(back.vertices().iter().all(|v| v.x <= 1.0 + 1e-6));
        assert_eq!(front.plane(), square.plane());
    }

    #[test]
    fn split_through_vertices_keeps_them_on_both_sides() {
        let square = make_square();
        // Diagonal from (0, 0) to (2, 2)
        let plane = Plane3D::new(Vector3::new(1.0, -1.0, 0.0), 0.0);

        let (front, back) = square.split(&plane, PLANE_EPSILON);
        assert_eq!(front.unwrap().len(), 3);
        assert_eq!(back.unwrap().len(), 3);
    }

    #[test]
    fn coplanar_goes_to_back() {
        let square = make_square();
        let (front, back) = square.split(square.plane(), PLANE_EPSILON);
        assert!(front.is_none());
        assert_eq!(back.unwrap(), square);
    }

    #[test]
    fn one_sided_polygons_are_not_cut() {
        let square = make_square();
        let (front, back) = square.split(&Plane3D::new(Vector3::x(), -1.0), PLANE_EPSILON);
        assert_eq!(front.unwrap(), square);
        assert!(back.is_none());
    }

    #[test]
    fn safe_split_accepts_clean_cut() {
        let square = make_square();
        match square.split_safe(&Plane3D::new(Vector3::x(), 1.0), PLANE_EPSILON) {
            SafeSplit::Split { front, back } => {
                assert_relative_eq!(front.area(), 2.0, epsilon = 1e-5);
                assert_relative_eq!(back.area(), 2.0, epsilon = 1e-5);
            }
            SafeSplit::Duplicated => panic!("expected a clean split"),
        }
    }

    #[test]
    fn safe_split_rejects_slivers() {
        let epsilon = 0.01;
        // The top edge carries a 0.005 long segment, below 0.75 * epsilon
        let notched = Polygon::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(0.005, 2.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ])
        .unwrap();
        let plane = Plane3D::new(Vector3::x(), 1.0);

        assert_eq!(notched.split_safe(&plane, epsilon), SafeSplit::Duplicated);
        assert!(matches!(
            make_square().split_safe(&plane, epsilon),
            SafeSplit::Split { .. }
        ));
    }
}
