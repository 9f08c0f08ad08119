//! BSP (Binary Space Partitioning) tree collision queries over static triangle meshes.

pub mod bsp;
mod config;
mod cuttable;
mod error;
mod mesh;
mod plane;
mod polygon;
mod query;
mod triangle;

pub use bsp::{BspTree, BuildStats, NodeRef};
pub use config::{BuildConfig, MeshValidation, MAX_LEAF_THRESHOLD};
pub use cuttable::{Cuttable, SafeSplit, SLIVER_FACTOR};
pub use error::{BspError, MeshError};
pub use mesh::TriangleMesh;
pub use plane::{Classification, Plane3D, PlaneSide, PLANE_EPSILON};
pub use polygon::{Exhausted, Polygon};
pub use query::{LineSegment, Ray, RayHit, SegmentHit, Sphere, SphereHit};
pub use triangle::Triangle;
