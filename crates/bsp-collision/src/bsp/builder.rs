//! Recursive construction of the transient build tree.

use log::warn;

use crate::{BuildConfig, Classification, Cuttable, Exhausted, Plane3D, Polygon, SafeSplit};

use super::node::BuildNode;
use super::selector::{PlaneSelector, SplitKind};

/// Counters collected while building and flattening a tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildStats {
    /// Triangles accepted from the input mesh.
    pub input_triangles: usize,
    /// Triangles stored in the finished tree.
    pub output_triangles: usize,
    pub internal_nodes: usize,
    /// Leaves holding at least one triangle.
    pub leaves: usize,
    /// References to the shared empty leaf.
    pub empty_leaves: usize,
    /// Leaves above the configured threshold.
    pub oversized_leaves: usize,
    /// Running average of triangles above the threshold in oversized leaves.
    pub average_oversize: f32,
    /// Polygons cut in two by a splitting plane.
    pub split_polygons: usize,
    /// Polygons sent whole to both sides because cutting would leave a sliver.
    pub duplicated_polygons: usize,
    pub face_splits: usize,
    pub decompositions: usize,
    pub edge_splits: usize,
    /// Deepest node depth (root = 0).
    pub max_depth: usize,
}

impl BuildStats {
    fn record_oversized(&mut self, excess: usize) {
        self.oversized_leaves += 1;
        self.average_oversize +=
            (excess as f32 - self.average_oversize) / self.oversized_leaves as f32;
    }
}

/// Builds a tree by recursively splitting polygon lists.
pub(crate) struct Builder<'a, S> {
    selector: S,
    config: &'a BuildConfig,
    stats: BuildStats,
}

impl<'a, S: PlaneSelector> Builder<'a, S> {
    pub fn new(selector: S, config: &'a BuildConfig) -> Self {
        Self {
            selector,
            config,
            stats: BuildStats::default(),
        }
    }

    /// Builds the tree for `polygons` and returns it with the statistics so far.
    pub fn build(mut self, polygons: Vec<Polygon>) -> (BuildNode, BuildStats) {
        self.stats.input_triangles = total_triangles(&polygons);
        let root = self.build_node(polygons, 0);
        (root, self.stats)
    }

    /// Consumes `polygons`, turning them into a leaf or a split subtree.
    fn build_node(&mut self, mut polygons: Vec<Polygon>, depth: usize) -> BuildNode {
        self.stats.max_depth = self.stats.max_depth.max(depth);

        let triangles = total_triangles(&polygons);
        if triangles <= self.config.leaf_threshold {
            return BuildNode::leaf(polygons);
        }

        if depth >= self.config.max_depth {
            warn!("Depth limit {} reached with {} triangles", self.config.max_depth, triangles);
            return self.oversized_leaf(polygons, triangles);
        }

        let Some(selection) = self.selector.select(&mut polygons, depth) else {
            return self.oversized_leaf(polygons, triangles);
        };
        match selection.kind {
            SplitKind::Face => self.stats.face_splits += 1,
            SplitKind::Decompose => self.stats.decompositions += 1,
            SplitKind::Edge => self.stats.edge_splits += 1,
        }

        let (back, front) = self.partition(polygons, &selection.plane);
        let back = self.build_node(back, depth + 1);
        let front = self.build_node(front, depth + 1);
        BuildNode::internal(selection.plane, back, front)
    }

    /// Distributes polygons to the back and front of `plane`.
    ///
    /// Coplanar polygons go to the back and can no longer be face splitters.
    fn partition(
        &mut self,
        polygons: Vec<Polygon>,
        plane: &Plane3D,
    ) -> (Vec<Polygon>, Vec<Polygon>) {
        let epsilon = self.config.epsilon;
        let mut back = Vec::with_capacity(polygons.len());
        let mut front = Vec::with_capacity(polygons.len());

        for mut polygon in polygons {
            match polygon.classify_with_epsilon(plane, epsilon) {
                Classification::Front => front.push(polygon),
                Classification::Back => back.push(polygon),
                Classification::Coplanar => {
                    polygon.mark_exhausted(Exhausted::FACE);
                    back.push(polygon);
                }
                Classification::Straddling => match polygon.split_safe(plane, epsilon) {
                    SafeSplit::Split {
                        front: front_part,
                        back: back_part,
                    } => {
                        self.stats.split_polygons += 1;
                        front.push(front_part);
                        back.push(back_part);
                    }
                    SafeSplit::Duplicated => {
                        self.stats.duplicated_polygons += 1;
                        front.push(polygon.clone());
                        back.push(polygon);
                    }
                },
            }
        }

        (back, front)
    }

    fn oversized_leaf(&mut self, polygons: Vec<Polygon>, triangles: usize) -> BuildNode {
        self.stats.record_oversized(triangles - self.config.leaf_threshold);
        warn!(
            "Oversized leaf with {} triangles (threshold {}, average excess {:.1})",
            triangles, self.config.leaf_threshold, self.stats.average_oversize
        );
        BuildNode::leaf(polygons)
    }
}

fn total_triangles(polygons: &[Polygon]) -> usize {
    polygons.iter().map(Polygon::triangle_count).sum()
}
