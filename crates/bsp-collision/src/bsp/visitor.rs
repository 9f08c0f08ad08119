//! Visitor pattern for walking the leaves of a tree.
//!
//! Visitors allow custom processing of leaf triangles without coupling the
//! walk to specific use cases such as debug drawing or statistics.

use crate::Triangle;

use super::flat::NodeRef;

/// Visitor for processing leaves during [`BspTree::visit_leaves`](super::BspTree::visit_leaves).
pub trait BspVisitor {
    /// Called once per leaf reference, including empty leaves.
    fn visit_leaf(&mut self, leaf: NodeRef, triangles: &[Triangle]);
}

/// A simple visitor that collects every visited triangle.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    collected: Vec<Triangle>,
    leaves: usize,
}

impl CollectingVisitor {
    /// Creates a new empty collecting visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected triangles.
    pub fn into_triangles(self) -> Vec<Triangle> {
        self.collected
    }

    /// Returns a reference to the collected triangles.
    pub fn triangles(&self) -> &[Triangle] {
        &self.collected
    }

    /// Number of leaves visited so far.
    pub fn leaf_count(&self) -> usize {
        self.leaves
    }
}

impl BspVisitor for CollectingVisitor {
    fn visit_leaf(&mut self, _leaf: NodeRef, triangles: &[Triangle]) {
        self.leaves += 1;
        self.collected.extend_from_slice(triangles);
    }
}

/// A visitor that calls a closure for each leaf.
pub struct FnVisitor<F>
where
    F: FnMut(NodeRef, &[Triangle]),
{
    func: F,
}

impl<F> FnVisitor<F>
where
    F: FnMut(NodeRef, &[Triangle]),
{
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> BspVisitor for FnVisitor<F>
where
    F: FnMut(NodeRef, &[Triangle]),
{
    fn visit_leaf(&mut self, leaf: NodeRef, triangles: &[Triangle]) {
        (self.func)(leaf, triangles);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn make_triangle(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Triangle {
        Triangle::new(
            Point3::new(a[0], a[1], a[2]),
            Point3::new(b[0], b[1], b[2]),
            Point3::new(c[0], c[1], c[2]),
        )
    }

    #[test]
    fn collecting_visitor_empty() {
        let visitor = CollectingVisitor::new();
        assert!(visitor.triangles().is_empty());
        assert_eq!(visitor.leaf_count(), 0);
    }

    #[test]
    fn collecting_visitor_collects() {
        let mut visitor = CollectingVisitor::new();
        let tri1 = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let tri2 = make_triangle([0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]);

        visitor.visit_leaf(NodeRef::leaf(0, 1), &[tri1]);
        visitor.visit_leaf(NodeRef::EMPTY_LEAF, &[]);
        visitor.visit_leaf(NodeRef::leaf(1, 1), &[tri2]);

        assert_eq!(visitor.leaf_count(), 3);
        let collected = visitor.into_triangles();
        assert_eq!(collected, vec![tri1, tri2]);
    }

    #[test]
    fn fn_visitor_calls_closure() {
        let mut count = 0;
        let mut empty = 0;
        {
            let mut visitor = FnVisitor::new(|leaf: NodeRef, tris: &[Triangle]| {
                count += tris.len();
                if leaf.is_empty_leaf() {
                    empty += 1;
                }
            });

            let tri = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
            visitor.visit_leaf(NodeRef::leaf(0, 2), &[tri, tri]);
            visitor.visit_leaf(NodeRef::EMPTY_LEAF, &[]);
        }
        assert_eq!(count, 2);
        assert_eq!(empty, 1);
    }
}
