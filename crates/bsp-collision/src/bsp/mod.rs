//! Binary Space Partitioning tree for static triangle meshes.
//!
//! Construction recursively partitions the mesh with planes chosen by a
//! [`PlaneSelector`], then flattens the result into two fixed arrays. The
//! finished tree answers:
//!
//! - Closest-hit ray and line segment queries
//! - Sphere contact queries
//! - Leaf walks for debugging and statistics
//!
//! # Example
//!
//! ```ignore
//! use bsp_collision::{BspTree, BuildConfig, Ray, TriangleMesh};
//! use nalgebra::{Point3, Vector3};
//!
//! let mesh = TriangleMesh::cuboid(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
//! let tree = BspTree::create(&mesh, &BuildConfig::default())?;
//!
//! let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), -Vector3::z());
//! assert_eq!(tree.intersect_ray(&ray).map(|hit| hit.t), Some(4.0));
//! ```
//!
//! # Architecture
//!
//! - [`BspTree`]: The immutable tree and its queries
//! - [`NodeRef`]: Reference to an internal node or a leaf's triangle range
//! - [`FlatNode`]: Internal node storing a splitting plane and two children
//! - [`PlaneSelector`]: Strategy trait for choosing splitting planes
//! - [`BspVisitor`]: Visitor trait for walking leaves

mod builder;
mod flat;
mod node;
mod selector;
mod tree;
mod visitor;

// Re-export main types
pub use builder::BuildStats;
pub use flat::{FlatNode, NodeRef};
pub use selector::{
    balance_factor, FirstPolygon, HeuristicSelector, PlaneSelector, Selection, SplitCounts,
    SplitKind,
};
pub use tree::BspTree;
pub use visitor::{BspVisitor, CollectingVisitor, FnVisitor};
