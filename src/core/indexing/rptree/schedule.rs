// src/core/indexing/rptree/schedule.rs

//! Per-depth random projection directions.

use rand::Rng;
use rand_distr::StandardNormal;
use tracing::trace;

use super::error::{RpTreeError, RpTreeResult};

/// One sparse projection direction per tree depth, shared by every node at
/// that depth.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionSchedule {
    directions: Vec<Vec<f64>>,
    dim: usize,
}

impl ProjectionSchedule {
    /// Draws `levels` directions of length `dim`.
    ///
    /// Each coordinate is, independently, a standard normal draw with
    /// probability `alpha` and exactly zero otherwise. A candidate with no
    /// non-zero coordinate is discarded and redrawn in full.
    pub fn generate<R: Rng + ?Sized>(
        levels: usize,
        dim: usize,
        alpha: f64,
        rng: &mut R,
    ) -> RpTreeResult<Self> {
        if dim == 0 {
            return Err(RpTreeError::InvalidShape(
                "projection directions need at least one dimension".to_string(),
            ));
        }
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(RpTreeError::Configuration(format!(
                "alpha must be greater than 0, got {alpha}"
            )));
        }

        let mut directions = Vec::with_capacity(levels);
        for depth in 0..levels {
            let mut attempts = 1_usize;
            let direction = loop {
                let candidate: Vec<f64> = (0..dim)
                    .map(|_| {
                        if rng.gen::<f64>() < alpha {
                            rng.sample::<f64, _>(StandardNormal)
                        } else {
                            0.0
                        }
                    })
                    .collect();
                if candidate.iter().any(|&c| c != 0.0) {
                    break candidate;
                }
                attempts += 1;
            };
            trace!(depth, attempts, "drew projection direction");
            directions.push(direction);
        }

        Ok(Self { directions, dim })
    }

    /// Builds a schedule from caller-chosen directions.
    ///
    /// Every direction must have the same non-zero length and at least one
    /// non-zero coordinate.
    pub fn from_directions(directions: Vec<Vec<f64>>) -> RpTreeResult<Self> {
        let dim = directions.first().map_or(0, Vec::len);
        if dim == 0 {
            return Err(RpTreeError::InvalidShape(
                "projection directions need at least one dimension".to_string(),
            ));
        }
        for (depth, direction) in directions.iter().enumerate() {
            if direction.len() != dim {
                return Err(RpTreeError::DimensionMismatch {
                    expected: dim,
                    actual: direction.len(),
                });
            }
            if direction.iter().all(|&c| c == 0.0) {
                return Err(RpTreeError::Configuration(format!(
                    "projection direction at depth {depth} is all zeros"
                )));
            }
        }
        Ok(Self { directions, dim })
    }

    /// Direction used by every node at `depth`.
    pub fn direction(&self, depth: usize) -> Option<&[f64]> {
        self.directions.get(depth).map(Vec::as_slice)
    }

    /// Number of depth levels covered.
    pub fn levels(&self) -> usize {
        self.directions.len()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}
