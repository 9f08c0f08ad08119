//! Compact array representation of a finished tree.

use crate::{Plane3D, Triangle};

use super::builder::BuildStats;
use super::node::BuildNode;

/// Reference to a node of a flattened tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// Internal node at this index of the node array.
    Internal(u32),
    /// `count` triangles starting at `offset` in the triangle array.
    Leaf { offset: u32, count: u32 },
}

impl NodeRef {
    /// The single reference shared by every leaf without triangles.
    pub const EMPTY_LEAF: NodeRef = NodeRef::Leaf { offset: 0, count: 0 };

    /// Creates a leaf reference.
    ///
    /// # Panics
    /// Panics if the leaf's triangle range ends past `u32::MAX`, which the
    /// triangle array of a tree never does.
    pub fn leaf(offset: usize, count: usize) -> Self {
        if count == 0 {
            return Self::EMPTY_LEAF;
        }
        let end = offset.checked_add(count).and_then(|end| u32::try_from(end).ok());
        assert!(end.is_some(), "leaf range {offset}+{count} exceeds the u32 triangle index");
        Self::Leaf {
            offset: offset as u32,
            count: count as u32,
        }
    }

    /// Returns true for leaf references, including the empty leaf.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Returns true for leaves without triangles.
    #[inline]
    pub fn is_empty_leaf(&self) -> bool {
        matches!(self, Self::Leaf { count: 0, .. })
    }

    /// Index into the node array for internal nodes.
    #[inline]
    pub fn internal_index(&self) -> Option<usize> {
        match *self {
            Self::Internal(index) => Some(index as usize),
            Self::Leaf { .. } => None,
        }
    }

    /// Triangle array range for leaves.
    #[inline]
    pub fn triangle_range(&self) -> Option<std::ops::Range<usize>> {
        match *self {
            Self::Internal(_) => None,
            Self::Leaf { offset, count } => {
                let start = offset as usize;
                Some(start..start + count as usize)
            }
        }
    }
}

/// An internal node: splitting plane plus its two children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatNode {
    plane: Plane3D,
    back: NodeRef,
    front: NodeRef,
}

impl FlatNode {
    /// Returns the splitting plane.
    #[inline]
    pub fn plane(&self) -> &Plane3D {
        &self.plane
    }

    /// Returns the child behind the plane (including coplanar geometry).
    #[inline]
    pub fn back(&self) -> NodeRef {
        self.back
    }

    /// Returns the child in front of the plane.
    #[inline]
    pub fn front(&self) -> NodeRef {
        self.front
    }
}

/// Output of [`flatten`].
pub(crate) struct Flattened {
    pub root: NodeRef,
    pub nodes: Box<[FlatNode]>,
    pub triangles: Box<[Triangle]>,
}

/// Converts a build tree into node and triangle arrays, consuming it.
///
/// Both arrays are sized exactly up front. Nodes are numbered depth first,
/// so every child index is larger than its parent's.
pub(crate) fn flatten(root: BuildNode, stats: &mut BuildStats) -> Flattened {
    debug_assert_eq!(root.depth() - 1, stats.max_depth);

    let mut flattener = Flattener {
        nodes: Vec::with_capacity(root.internal_count()),
        triangles: Vec::with_capacity(root.triangle_count()),
        stats,
    };
    let node_capacity = flattener.nodes.capacity();
    let triangle_capacity = flattener.triangles.capacity();

    let root = flattener.flatten_node(root);
    let Flattener {
        nodes,
        triangles,
        stats,
    } = flattener;
    debug_assert_eq!(nodes.capacity(), node_capacity);
    debug_assert_eq!(triangles.capacity(), triangle_capacity);

    stats.internal_nodes = nodes.len();
    stats.output_triangles = triangles.len();
    Flattened {
        root,
        nodes: nodes.into_boxed_slice(),
        triangles: triangles.into_boxed_slice(),
    }
}

struct Flattener<'s> {
    nodes: Vec<FlatNode>,
    triangles: Vec<Triangle>,
    stats: &'s mut BuildStats,
}

impl Flattener<'_> {
    fn flatten_node(&mut self, node: BuildNode) -> NodeRef {
        match node {
            BuildNode::Leaf { polygons } if polygons.is_empty() => {
                self.stats.empty_leaves += 1;
                NodeRef::EMPTY_LEAF
            }
            BuildNode::Leaf { polygons } => {
                self.stats.leaves += 1;
                let offset = self.triangles.len();
                for polygon in &polygons {
                    self.triangles.extend(polygon.triangulate());
                }
                NodeRef::leaf(offset, self.triangles.len() - offset)
            }
            BuildNode::Internal { plane, back, front } => {
                // Reserve the slot first so children get larger indices
                let index = self.nodes.len();
                self.nodes.push(FlatNode {
                    plane,
                    back: NodeRef::EMPTY_LEAF,
                    front: NodeRef::EMPTY_LEAF,
                });
                let back = self.flatten_node(*back);
                let front = self.flatten_node(*front);

                let slot = &mut self.nodes[index];
                slot.back = back;
                slot.front = front;
                NodeRef::Internal(u32::try_from(index).expect("node index exceeds u32"))
            }
        }
    }
}
