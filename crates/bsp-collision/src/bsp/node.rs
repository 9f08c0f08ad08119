//! Transient build-tree node.

use crate::{Plane3D, Polygon};

/// A node of the tree while it is being built.
///
/// Leaves keep their polygons until flattening; internal nodes own both
/// children. The whole tree is consumed by the flattener.
#[derive(Debug, Clone)]
pub(crate) enum BuildNode {
    /// Terminal node holding zero or more convex polygons.
    Leaf { polygons: Vec<Polygon> },

    /// Splitting node. Coplanar geometry lives in the back subtree.
    Internal {
        plane: Plane3D,
        back: Box<BuildNode>,
        front: Box<BuildNode>,
    },
}

impl BuildNode {
    /// Creates a leaf holding `polygons`.
    #[inline]
    pub fn leaf(polygons: Vec<Polygon>) -> Self {
        Self::Leaf { polygons }
    }

    /// Creates an internal node.
    #[inline]
    pub fn internal(plane: Plane3D, back: BuildNode, front: BuildNode) -> Self {
        Self::Internal {
            plane,
            back: Box::new(back),
            front: Box::new(front),
        }
    }

    /// Number of internal nodes in this subtree.
    pub fn internal_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 0,
            Self::Internal { back, front, .. } => {
                1 + back.internal_count() + front.internal_count()
            }
        }
    }

    /// Number of triangles the leaves of this subtree triangulate into.
    pub fn triangle_count(&self) -> usize {
        match self {
            Self::Leaf { polygons } => polygons.iter().map(Polygon::triangle_count).sum(),
            Self::Internal { back, front, .. } => back.triangle_count() + front.triangle_count(),
        }
    }

    /// Returns the depth of this subtree (1 for a leaf node).
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Internal { back, front, .. } => 1 + back.depth().max(front.depth()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};

    fn make_polygon(points: &[[f32; 3]]) -> Polygon {
        Polygon::new(points.iter().map(|p| Point3::new(p[0], p[1], p[2])).collect()).unwrap()
    }

    #[test]
    fn empty_leaf() {
        let node = BuildNode::leaf(vec![]);
        assert_eq!(node.internal_count(), 0);
        assert_eq!(node.triangle_count(), 0);
        assert_eq!(node.depth(), 1);
    }

    #[test]
    fn counts_are_recursive() {
        let quad = make_polygon(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ]);
        let tri = make_polygon(&[[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]]);
        let plane = Plane3D::new(Vector3::z(), 0.5);

        let inner = BuildNode::internal(
            plane,
            BuildNode::leaf(vec![quad.clone()]),
            BuildNode::leaf(vec![]),
        );
        let root = BuildNode::internal(plane, inner, BuildNode::leaf(vec![tri, quad]));

        assert_eq!(root.internal_count(), 2);
        assert_eq!(root.triangle_count(), 2 + 1 + 2);
        // root -> inner -> leaf (depth 3)
        assert_eq!(root.depth(), 3);
    }
}
