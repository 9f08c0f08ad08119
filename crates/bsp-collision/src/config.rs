//! Build configuration.

use crate::{BspError, PLANE_EPSILON};

/// Largest accepted `leaf_threshold`.
///
/// Leaves are scanned linearly, so the target stays small. Oversized leaves
/// past it are still representable.
pub const MAX_LEAF_THRESHOLD: usize = 255;

/// How strictly the input mesh is checked before building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeshValidation {
    /// Non-finite positions and degenerate triangles are errors.
    #[default]
    Strict,
    /// Non-finite and degenerate triangles are dropped with a warning.
    Lenient,
}

/// Configuration for tree construction.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    /// Target maximum triangles per leaf (`1..=255`).
    pub leaf_threshold: usize,

    /// Face planes sampled per node when choosing a splitter.
    pub plane_candidates: usize,

    /// Edges sampled per node by the edge-split fallback.
    pub edge_candidates: usize,

    /// Half-thickness of every plane, for both building and queries.
    pub epsilon: f32,

    /// Seed for candidate sampling. Same mesh and seed give the same tree.
    pub seed: u64,

    /// Nodes deeper than this become leaves regardless of size.
    pub max_depth: usize,

    /// Input mesh checks.
    pub validation: MeshValidation,
}

impl BuildConfig {
    /// Seed used unless configured otherwise.
    pub const DEFAULT_SEED: u64 = 0x5EED_B5B7;

    /// Sets the leaf threshold.
    pub fn with_leaf_threshold(mut self, leaf_threshold: usize) -> Self {
        self.leaf_threshold = leaf_threshold;
        self
    }

    /// Sets the sampling seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the plane thickness.
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the mesh validation mode.
    pub fn with_validation(mut self, validation: MeshValidation) -> Self {
        self.validation = validation;
        self
    }

    /// Checks that every parameter is usable.
    pub fn validate(&self) -> Result<(), BspError> {
        if !(1..=MAX_LEAF_THRESHOLD).contains(&self.leaf_threshold) {
            return Err(BspError::InvalidConfig {
                field: "leaf_threshold",
                reason: format!(
                    "must be within 1..={MAX_LEAF_THRESHOLD}, got {}",
                    self.leaf_threshold
                ),
            });
        }
        if self.plane_candidates == 0 {
            return Err(BspError::InvalidConfig {
                field: "plane_candidates",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.edge_candidates == 0 {
            return Err(BspError::InvalidConfig {
                field: "edge_candidates",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(BspError::InvalidConfig {
                field: "epsilon",
                reason: format!("must be positive and finite, got {}", self.epsilon),
            });
        }
        Ok(())
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            leaf_threshold: 12,
            plane_candidates: 10,
            edge_candidates: 10,
            epsilon: PLANE_EPSILON,
            seed: Self::DEFAULT_SEED,
            max_depth: 1024,
            validation: MeshValidation::Strict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = BuildConfig::default();
        assert_eq!(config.leaf_threshold, 12);
        assert_eq!(config.plane_candidates, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn leaf_threshold_is_bounded() {
        let too_big = BuildConfig::default().with_leaf_threshold(256);
        assert!(matches!(
            too_big.validate(),
            Err(BspError::InvalidConfig { field: "leaf_threshold", .. })
        ));
        let zero = BuildConfig::default().with_leaf_threshold(0);
        assert!(zero.validate().is_err());
        assert!(BuildConfig::default().with_leaf_threshold(255).validate().is_ok());
    }

    #[test]
    fn epsilon_must_be_positive() {
        assert!(BuildConfig::default().with_epsilon(0.0).validate().is_err());
        assert!(BuildConfig::default().with_epsilon(f32::NAN).validate().is_err());
    }
}
