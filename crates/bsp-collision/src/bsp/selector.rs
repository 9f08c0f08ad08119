//! Plane selection strategies for BSP tree construction.
//!
//! The choice of splitting plane decides how many triangles get cut and
//! how balanced the tree ends up. [`HeuristicSelector`] scores randomly
//! sampled candidates and trades the two off by depth: shallow nodes
//! avoid cuts, deep nodes favor balance. When no face plane is left it
//! falls back to diagonal decomposition and then to edge planes.

use log::trace;
use nalgebra::Point3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{BuildConfig, Classification, Cuttable, Exhausted, Plane3D, Polygon, SafeSplit};

/// Depth up to which the shallow balance factor applies.
const SHALLOW_DEPTH: usize = 100;
/// Depth from which the deep balance factor applies.
const DEEP_DEPTH: usize = 1000;
/// Straddle weight for shallow nodes.
const SHALLOW_BALANCE: f32 = 0.85;
/// Straddle weight for deep nodes.
const DEEP_BALANCE: f32 = 0.25;

/// How a splitting plane was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitKind {
    /// The supporting plane of one of the node's polygons.
    Face,
    /// A plane through a diagonal of a polygon, orthogonal to it.
    Decompose,
    /// A plane through a polygon edge, orthogonal to the polygon.
    Edge,
}

/// A chosen splitting plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub plane: Plane3D,
    pub kind: SplitKind,
}

/// Strategy for choosing the splitting plane of a node.
///
/// Selectors may mark polygons as [`Exhausted`] so that later calls on
/// the same (or inherited) polygons do not pick the same candidate again.
pub trait PlaneSelector {
    /// Chooses a plane for a node holding `polygons` at `depth` (root = 0).
    ///
    /// Returns `None` when no acceptable plane exists; the node then stays a leaf.
    fn select(&mut self, polygons: &mut [Polygon], depth: usize) -> Option<Selection>;
}

/// Selects the plane of the first polygon that has not been used yet.
///
/// This is the simplest and fastest selector, but may produce unbalanced
/// trees depending on input order, and it has no fallbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPolygon;

impl PlaneSelector for FirstPolygon {
    fn select(&mut self, polygons: &mut [Polygon], _depth: usize) -> Option<Selection> {
        let polygon = polygons.iter_mut().find(|p| p.is_eligible(Exhausted::FACE))?;
        polygon.mark_exhausted(Exhausted::FACE);
        Some(Selection {
            plane: *polygon.plane(),
            kind: SplitKind::Face,
        })
    }
}

/// Polygon counts on each side of a candidate plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitCounts {
    pub front: usize,
    /// Includes coplanar polygons.
    pub back: usize,
    pub straddling: usize,
}

impl SplitCounts {
    /// Classifies every polygon against `plane`.
    pub fn measure(polygons: &[Polygon], plane: &Plane3D, epsilon: f32) -> Self {
        let mut counts = Self::default();
        for polygon in polygons {
            match polygon.classify_with_epsilon(plane, epsilon) {
                Classification::Front => counts.front += 1,
                Classification::Back | Classification::Coplanar => counts.back += 1,
                Classification::Straddling => counts.straddling += 1,
            }
        }
        counts
    }

    /// `lerp(|front - back|, straddling, balance)`; lower is better.
    pub fn score(&self, balance: f32) -> f32 {
        let imbalance = (self.front as f32 - self.back as f32).abs();
        imbalance + (self.straddling as f32 - imbalance) * balance
    }

    /// True if both children would receive geometry.
    pub fn separates(&self) -> bool {
        self.front + self.straddling > 0 && self.back + self.straddling > 0
    }
}

/// Straddle weight for a node at `depth`: 0.85 down to 0.25 between depth 100 and 1000.
pub fn balance_factor(depth: usize) -> f32 {
    let t = depth.saturating_sub(SHALLOW_DEPTH) as f32 / (DEEP_DEPTH - SHALLOW_DEPTH) as f32;
    SHALLOW_BALANCE + (DEEP_BALANCE - SHALLOW_BALANCE) * t.min(1.0)
}

/// Randomized, scored plane selection with decomposition and edge fallbacks.
#[derive(Debug, Clone)]
pub struct HeuristicSelector {
    rng: ChaCha8Rng,
    plane_candidates: usize,
    edge_candidates: usize,
    epsilon: f32,
}

impl HeuristicSelector {
    /// Creates a selector seeded and sized from `config`.
    pub fn new(config: &BuildConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            plane_candidates: config.plane_candidates,
            edge_candidates: config.edge_candidates,
            epsilon: config.epsilon,
        }
    }

    /// Best of up to `plane_candidates` sampled face planes that separate the node.
    ///
    /// A face plane with every polygon on one side separates no subset of
    /// them either, so its polygon is marked `FACE` and skipped.
    fn select_face(&mut self, polygons: &mut [Polygon], balance: f32) -> Option<Plane3D> {
        let mut pool = Sampler::new(
            (0..polygons.len())
                .filter(|&i| polygons[i].is_eligible(Exhausted::FACE))
                .collect::<Vec<_>>(),
        );

        let mut best: Option<(usize, f32)> = None;
        let mut scored = 0;
        while scored < self.plane_candidates {
            let Some(index) = pool.draw(&mut self.rng) else {
                break;
            };
            let plane = *polygons[index].plane();
            let counts = SplitCounts::measure(polygons, &plane, self.epsilon);
            if !counts.separates() {
                polygons[index].mark_exhausted(Exhausted::FACE);
                continue;
            }
            scored += 1;
            let score = counts.score(balance);
            if best.is_none_or(|(_, best_score)| score < best_score) {
                best = Some((index, score));
            }
        }

        let (index, _) = best?;
        polygons[index].mark_exhausted(Exhausted::FACE);
        Some(*polygons[index].plane())
    }

    /// Plane through the first diagonal that cleanly splits a polygon with more than 3 vertices.
    fn select_decomposition(&mut self, polygons: &mut [Polygon]) -> Option<Plane3D> {
        for polygon in polygons
            .iter_mut()
            .filter(|p| p.len() > 3 && p.is_eligible(Exhausted::DECOMPOSE))
        {
            polygon.mark_exhausted(Exhausted::DECOMPOSE);

            let vertices = polygon.vertices();
            let apex = vertices[0];
            for &corner in &vertices[2..vertices.len() - 1] {
                let Some(plane) = orthogonal_plane(polygon, apex, corner) else {
                    continue;
                };
                if let SafeSplit::Split { .. } = polygon.split_safe(&plane, self.epsilon) {
                    return Some(plane);
                }
            }
        }
        None
    }

    /// Best of up to `edge_candidates` sampled edge planes, scored on balance alone.
    fn select_edge(&mut self, polygons: &mut [Polygon]) -> Option<Plane3D> {
        let mut pool = Sampler::new(
            polygons
                .iter()
                .enumerate()
                .filter(|(_, p)| p.is_eligible(Exhausted::EDGE))
                .flat_map(|(i, p)| (0..p.len()).map(move |e| (i, e)))
                .collect::<Vec<_>>(),
        );

        let mut best: Option<(usize, Plane3D, f32)> = None;
        let mut scored = 0;
        while scored < self.edge_candidates {
            let Some((index, edge)) = pool.draw(&mut self.rng) else {
                break;
            };

            let polygon = &polygons[index];
            let start = polygon.vertices()[edge];
            let end = polygon.vertices()[(edge + 1) % polygon.len()];
            if (end - start).norm() < self.epsilon {
                continue;
            }
            let Some(plane) = orthogonal_plane(polygon, start, end) else {
                continue;
            };

            // Scored on balance alone; it must put polygons on both sides.
            let counts = SplitCounts::measure(polygons, &plane, self.epsilon);
            if !counts.separates() {
                continue;
            }
            scored += 1;
            let score = counts.score(0.0);
            if best.is_none_or(|(_, _, best_score)| score < best_score) {
                best = Some((index, plane, score));
            }
        }

        let (index, plane, _) = best?;
        polygons[index].mark_exhausted(Exhausted::EDGE);
        Some(plane)
    }
}

impl PlaneSelector for HeuristicSelector {
    fn select(&mut self, polygons: &mut [Polygon], depth: usize) -> Option<Selection> {
        let balance = balance_factor(depth);
        if let Some(plane) = self.select_face(polygons, balance) {
            return Some(Selection {
                plane,
                kind: SplitKind::Face,
            });
        }

        if let Some(plane) = self.select_decomposition(polygons) {
            trace!("Decomposing polygon at depth {depth}");
            return Some(Selection {
                plane,
                kind: SplitKind::Decompose,
            });
        }

        if let Some(plane) = self.select_edge(polygons) {
            trace!("Edge split at depth {depth}");
            return Some(Selection {
                plane,
                kind: SplitKind::Edge,
            });
        }

        None
    }
}

/// Plane containing the line `a`-`b` and orthogonal to `polygon`'s plane.
fn orthogonal_plane(polygon: &Polygon, a: Point3<f32>, b: Point3<f32>) -> Option<Plane3D> {
    let normal = (b - a).cross(&polygon.normal());
    Plane3D::from_point_and_normal(nalgebra::center(&a, &b), normal)
}

/// Draws pool entries uniformly without replacement, one at a time
/// (lazy partial Fisher-Yates).
struct Sampler<T> {
    pool: Vec<T>,
    drawn: usize,
}

impl<T: Copy> Sampler<T> {
    fn new(pool: Vec<T>) -> Self {
        Self { pool, drawn: 0 }
    }

    fn draw<R: Rng>(&mut self, rng: &mut R) -> Option<T> {
        if self.drawn == self.pool.len() {
            return None;
        }
        let pick = rng.random_range(self.drawn..self.pool.len());
        self.pool.swap(self.drawn, pick);
        self.drawn += 1;
        Some(self.pool[self.drawn - 1])
    }
}
