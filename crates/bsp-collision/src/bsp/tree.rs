//! Immutable flattened tree and its queries.

use log::debug;
use smallvec::SmallVec;

use crate::{
    BspError, BuildConfig, LineSegment, Polygon, Ray, RayHit, SegmentHit, Sphere, SphereHit,
    Triangle, TriangleMesh,
};

use super::builder::{BuildStats, Builder};
use super::flat::{flatten, FlatNode, NodeRef};
use super::selector::{HeuristicSelector, PlaneSelector};
use super::visitor::BspVisitor;

/// Work list entries kept inline before spilling to the heap.
const INLINE_STACK: usize = 32;

/// A Binary Space Partitioning tree over a static triangle mesh.
///
/// The tree is built once and never modified. Internal nodes live in one
/// array and leaf triangles in another; a [`NodeRef`] addresses either.
/// Queries only read the tree, so it can be shared between threads.
///
/// # Construction
///
/// ```ignore
/// use bsp_collision::{BspTree, BuildConfig, TriangleMesh};
/// use nalgebra::Point3;
///
/// let mesh = TriangleMesh::cuboid(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
/// let tree = BspTree::create(&mesh, &BuildConfig::default())?;
/// ```
///
/// # Queries
///
/// ```ignore
/// let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), -Vector3::z());
/// let hit = tree.intersect_ray(&ray).unwrap();
/// assert_eq!(hit.t, 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct BspTree {
    root: NodeRef,
    nodes: Box<[FlatNode]>,
    triangles: Box<[Triangle]>,
    epsilon: f32,
    stats: BuildStats,
}

#[derive(Debug, Clone, Copy)]
struct RayEntry {
    node: NodeRef,
    t_min: f32,
    t_max: f32,
    depth: usize,
}

impl BspTree {
    /// Builds a tree from `mesh` using the heuristic plane selector.
    pub fn create(mesh: &TriangleMesh, config: &BuildConfig) -> Result<Self, BspError> {
        config.validate()?;
        let polygons = mesh.to_polygons(config.validation)?;
        Ok(Self::build_unchecked(polygons, HeuristicSelector::new(config), config))
    }

    /// Builds a tree from polygons using a custom [`PlaneSelector`].
    ///
    /// Polygons must be convex and planar; [`Polygon::new`] only accepts
    /// input with a well defined plane.
    pub fn build<S: PlaneSelector>(
        polygons: Vec<Polygon>,
        selector: S,
        config: &BuildConfig,
    ) -> Result<Self, BspError> {
        config.validate()?;
        Ok(Self::build_unchecked(polygons, selector, config))
    }

    fn build_unchecked<S: PlaneSelector>(
        polygons: Vec<Polygon>,
        selector: S,
        config: &BuildConfig,
    ) -> Self {
        let (root, mut stats) = Builder::new(selector, config).build(polygons);
        let flat = flatten(root, &mut stats);

        debug!(
            "Built BSP tree: {} internal nodes, {} leaves ({} empty, {} oversized), \
             {} -> {} triangles, depth {}",
            stats.internal_nodes,
            stats.leaves,
            stats.empty_leaves,
            stats.oversized_leaves,
            stats.input_triangles,
            stats.output_triangles,
            stats.max_depth
        );
        debug!(
            "Splits: {} face, {} decomposition, {} edge; {} polygons cut, {} duplicated",
            stats.face_splits,
            stats.decompositions,
            stats.edge_splits,
            stats.split_polygons,
            stats.duplicated_polygons
        );

        Self {
            root: flat.root,
            nodes: flat.nodes,
            triangles: flat.triangles,
            epsilon: config.epsilon,
            stats,
        }
    }

    /// Returns the root reference. A tree with few triangles is a single leaf.
    #[inline]
    pub fn root(&self) -> NodeRef {
        self.root
    }

    /// Returns all internal nodes.
    #[inline]
    pub fn nodes(&self) -> &[FlatNode] {
        &self.nodes
    }

    /// Returns the internal node at `index`, if any.
    #[inline]
    pub fn node(&self, index: usize) -> Option<&FlatNode> {
        self.nodes.get(index)
    }

    /// Returns all stored triangles, grouped by leaf.
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Returns the triangles of a leaf; empty for internal references.
    pub fn leaf_triangles(&self, leaf: NodeRef) -> &[Triangle] {
        leaf.triangle_range()
            .and_then(|range| self.triangles.get(range))
            .unwrap_or(&[])
    }

    /// Returns the plane thickness used for queries.
    #[inline]
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Returns the statistics collected while building.
    #[inline]
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Returns `true` if the tree contains no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Returns the number of levels of the tree (0 for an empty tree).
    pub fn depth(&self) -> usize {
        if self.is_empty() { 0 } else { self.stats.max_depth + 1 }
    }

    /// Finds the parent of the internal node at `index`.
    ///
    /// Children are always stored after their parent, so only earlier
    /// nodes are searched. Intended for debugging.
    pub fn parent_of(&self, index: usize) -> Option<usize> {
        let child = NodeRef::Internal(u32::try_from(index).ok()?);
        self.nodes
            .get(..index)?
            .iter()
            .rposition(|node| node.back() == child || node.front() == child)
    }

    /// Visits every leaf reference depth first, back before front.
    pub fn visit_leaves<V: BspVisitor>(&self, visitor: &mut V) {
        let mut stack: SmallVec<[NodeRef; INLINE_STACK]> = SmallVec::new();
        stack.push(self.root);

        while let Some(current) = stack.pop() {
            match current {
                NodeRef::Internal(index) => {
                    let node = &self.nodes[index as usize];
                    stack.push(node.front());
                    stack.push(node.back());
                }
                NodeRef::Leaf { .. } => visitor.visit_leaf(current, self.leaf_triangles(current)),
            }
        }
    }

    /// Finds the closest triangle hit by `ray` within its interval.
    ///
    /// Subtrees are visited front to back with the ray interval clipped at
    /// every plane, so the first leaf with a hit holds the closest one.
    /// A zero-length direction never hits.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<RayHit> {
        let length = ray.direction.norm();
        if !(length > 0.0 && length.is_finite()) || ray.t_min > ray.t_max {
            return None;
        }
        // Plane thickness in ray parameter units
        let eps_t = self.epsilon / length;

        let mut stack: SmallVec<[RayEntry; INLINE_STACK]> = SmallVec::new();
        let mut current = RayEntry {
            node: self.root,
            t_min: ray.t_min,
            t_max: ray.t_max,
            depth: 0,
        };

        loop {
            debug_assert!(current.depth <= self.stats.max_depth);
            match current.node {
                NodeRef::Internal(index) => {
                    let node = &self.nodes[index as usize];
                    let plane = node.plane();
                    let dist = plane.signed_distance(&ray.origin);
                    let denom = -plane.normal().dot(&ray.direction);
                    let (near, far) = if dist >= 0.0 {
                        (node.front(), node.back())
                    } else {
                        (node.back(), node.front())
                    };
                    current.depth += 1;

                    if denom != 0.0 {
                        let t = dist / denom;
                        if t - eps_t > current.t_max {
                            current.node = near;
                        } else if t + eps_t < current.t_min {
                            // Already past the plane for the whole interval
                            current.node = if denom < 0.0 { node.front() } else { node.back() };
                        } else {
                            stack.push(RayEntry {
                                node: far,
                                t_min: (t - eps_t).max(current.t_min),
                                ..current
                            });
                            current.node = near;
                            current.t_max = (t + eps_t).min(current.t_max);
                        }
                    } else {
                        if dist.abs() < self.epsilon {
                            stack.push(RayEntry { node: far, ..current });
                        }
                        current.node = near;
                    }
                }
                NodeRef::Leaf { .. } => {
                    let mut closest: Option<(f32, &Triangle)> = None;
                    for triangle in self.leaf_triangles(current.node) {
                        let Some(t) = triangle.intersect_ray(
                            &ray.origin,
                            &ray.direction,
                            current.t_min,
                            current.t_max,
                        ) else {
                            continue;
                        };
                        if closest.is_none_or(|(best, _)| t < best) {
                            closest = Some((t, triangle));
                        }
                    }

                    if let Some((t, triangle)) = closest {
                        return Some(RayHit {
                            t,
                            point: ray.at(t),
                            triangle: *triangle,
                        });
                    }
                    current = stack.pop()?;
                }
            }
        }
    }

    /// Finds the triangle hit by `segment` closest to its start.
    ///
    /// Runs [`BspTree::intersect_ray`] on the ray from start to end over
    /// `[0, 1]`. A segment with coincident ends never hits.
    pub fn intersect_line_segment(&self, segment: &LineSegment) -> Option<SegmentHit> {
        let ray = segment.to_ray();
        self.intersect_ray(&ray).map(|hit| SegmentHit {
            t: hit.t,
            point: hit.point,
            triangle: hit.triangle,
        })
    }

    /// Finds a triangle touching `sphere`.
    ///
    /// Returns the first contact found, which is not necessarily the one
    /// closest to the center; see [`BspTree::closest_sphere_contact`].
    pub fn intersect_sphere(&self, sphere: &Sphere) -> Option<SphereHit> {
        let reach = self.sphere_reach(sphere)?;

        let mut stack: SmallVec<[(NodeRef, usize); INLINE_STACK]> = SmallVec::new();
        let mut current = (self.root, 0);

        loop {
            let (node_ref, depth) = current;
            debug_assert!(depth <= self.stats.max_depth);
            match node_ref {
                NodeRef::Internal(index) => {
                    let node = &self.nodes[index as usize];
                    let dist = node.plane().signed_distance(&sphere.center);
                    if dist > reach {
                        current = (node.front(), depth + 1);
                    } else if dist < -reach {
                        current = (node.back(), depth + 1);
                    } else {
                        stack.push((node.back(), depth + 1));
                        current = (node.front(), depth + 1);
                    }
                }
                NodeRef::Leaf { .. } => {
                    let contact = self.leaf_triangles(node_ref).iter().find_map(|triangle| {
                        triangle
                            .intersect_sphere(&sphere.center, sphere.radius, self.epsilon)
                            .map(|point| SphereHit {
                                point,
                                triangle: *triangle,
                            })
                    });
                    if contact.is_some() {
                        return contact;
                    }
                    current = stack.pop()?;
                }
            }
        }
    }

    /// Finds the contact point closest to the center of `sphere`.
    ///
    /// Unlike [`BspTree::intersect_sphere`] this visits every subtree the
    /// sphere reaches.
    pub fn closest_sphere_contact(&self, sphere: &Sphere) -> Option<SphereHit> {
        let reach = self.sphere_reach(sphere)?;

        let mut stack: SmallVec<[NodeRef; INLINE_STACK]> = SmallVec::new();
        stack.push(self.root);
        let mut closest: Option<(f32, SphereHit)> = None;

        while let Some(node_ref) = stack.pop() {
            match node_ref {
                NodeRef::Internal(index) => {
                    let node = &self.nodes[index as usize];
                    let dist = node.plane().signed_distance(&sphere.center);
                    if dist >= -reach {
                        stack.push(node.front());
                    }
                    if dist <= reach {
                        stack.push(node.back());
                    }
                }
                NodeRef::Leaf { .. } => {
                    for triangle in self.leaf_triangles(node_ref) {
                        let Some(point) =
                            triangle.intersect_sphere(&sphere.center, sphere.radius, self.epsilon)
                        else {
                            continue;
                        };
                        let distance = (point - sphere.center).norm_squared();
                        if closest.is_none_or(|(best, _)| distance < best) {
                            closest = Some((
                                distance,
                                SphereHit {
                                    point,
                                    triangle: *triangle,
                                },
                            ));
                        }
                    }
                }
            }
        }

        closest.map(|(_, hit)| hit)
    }

    /// Reach of a sphere across a thick plane, or `None` if it cannot hit anything.
    fn sphere_reach(&self, sphere: &Sphere) -> Option<f32> {
        let valid = sphere.radius >= 0.0 && sphere.center.coords.iter().all(|c| c.is_finite());
        valid.then_some(sphere.radius + self.epsilon)
    }
}
