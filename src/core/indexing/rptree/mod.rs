// src/core/indexing/rptree/mod.rs

//! Random-projection partition tree for approximate nearest-neighbour search.
//!
//! The index draws one sparse random direction per tree depth, then
//! recursively splits the vector set at the median projection magnitude
//! along that depth's direction. Queries follow a single root-to-leaf path and
//! linearly scan the leaf bucket they land in, so results are approximate:
//! the true nearest neighbour may sit in a different leaf.
//!
//! Splits compare the *norm* of each vector's projection onto the direction,
//! not the signed scalar projection. Points mirrored through the origin along
//! a direction are indistinguishable at that level.

pub use self::builder::{projection_magnitude, SplitLimits};
pub use self::error::{RpTreeError, RpTreeResult};
pub use self::schedule::ProjectionSchedule;
pub use self::search::brute_force_nearest;
pub use self::tree::{BucketEntry, RpNode, RpTree, TreeStats};

use ndarray::{ArrayView, ArrayView1, Dimension, Ix2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::core::config::RpTreeConfig;
use crate::Result;

mod builder;
mod error;
mod schedule;
mod search;
mod tree;


/// `RpTreeIndex`: a single random-projection tree over a fixed vector set.
///
/// Created uninitialized from a validated [`RpTreeConfig`]; `initialize`
/// builds the projection schedule and the tree exactly once. The built index
/// is immutable, so `&RpTreeIndex` can be shared across threads for queries.
#[derive(Debug)]
pub struct RpTreeIndex {
    config: RpTreeConfig,
    tree: Option<RpTree>,
}

impl RpTreeIndex {
    /// Creates an uninitialized index.
    ///
    /// # Errors
    /// Returns `MrptError::Configuration` when `alpha <= 0` or `min_split == 0`.
    pub fn new(config: RpTreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, tree: None })
    }

    /// Builds the projection schedule and the tree over the rows of `data`.
    ///
    /// `data` must be a two-dimensional `size × dim` array with `size > 0`
    /// and `dim > 0`. Row `i` is reported as index `i` by queries. The random
    /// source is seeded from `config.seed` when set.
    pub fn initialize<D: Dimension>(&mut self, data: ArrayView<'_, f64, D>) -> Result<()> {
        let (size, dim) = self.check_input(&data)?;
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let levels = self.split_limits().reachable_levels(size);
        let schedule = ProjectionSchedule::generate(levels, dim, self.config.alpha, &mut rng)?;
        debug!(levels = schedule.levels(), dim, "generated projection schedule");
        self.build(data, size, schedule)
    }

    /// Like [`initialize`](Self::initialize) but with a caller-supplied schedule.
    ///
    /// The schedule must cover every reachable depth, `min(max_depth, size - 1) + 1`
    /// levels, and match the column count of `data`.
    pub fn initialize_with_schedule<D: Dimension>(
        &mut self,
        data: ArrayView<'_, f64, D>,
        schedule: ProjectionSchedule,
    ) -> Result<()> {
        let (size, _) = self.check_input(&data)?;
        self.build(data, size, schedule)
    }

    fn split_limits(&self) -> SplitLimits {
        SplitLimits { max_depth: self.config.max_depth, min_split: self.config.min_split }
    }

    fn check_input<D: Dimension>(&self, data: &ArrayView<'_, f64, D>) -> Result<(usize, usize)> {
        if self.tree.is_some() {
            return Err(RpTreeError::AlreadyInitialized.into());
        }
        let shape = data.shape();
        if shape.len() != 2 {
            return Err(RpTreeError::InvalidShape(format!(
                "expected a two-dimensional array, got {} dimension(s)",
                shape.len()
            ))
            .into());
        }
        let (size, dim) = (shape[0], shape[1]);
        if dim == 0 {
            return Err(RpTreeError::InvalidShape("vectors must have at least one column".to_string()).into());
        }
        if size == 0 {
            return Err(RpTreeError::EmptyInput("no vectors to index".to_string()).into());
        }
        Ok((size, dim))
    }

    fn build<D: Dimension>(
        &mut self,
        data: ArrayView<'_, f64, D>,
        size: usize,
        schedule: ProjectionSchedule,
    ) -> Result<()> {
        let matrix = data.into_dyn().into_dimensionality::<Ix2>().map_err(|e| {
            RpTreeError::InvalidShape(format!("expected a two-dimensional array: {e}"))
        })?;
        let rows: Vec<Vec<f64>> = matrix.outer_iter().map(|row| row.to_vec()).collect();
        let tree = builder::build_rptree(rows, schedule, self.split_limits())?;
        let stats = tree.stats();
        info!(
            size,
            dim = tree.dimension,
            leaves = stats.leaf_count,
            depth = stats.max_depth_reached,
            "random projection index initialized"
        );
        self.tree = Some(tree);
        Ok(())
    }

    /// Original index of the approximate nearest neighbour of `query`.
    ///
    /// # Errors
    /// * `NotInitialized` before `initialize` has succeeded.
    /// * `DimensionMismatch` if `query.len() != dim`.
    pub fn find_nearest(&self, query: ArrayView1<'_, f64>) -> Result<usize> {
        self.find_nearest_with_distance(query).map(|(idx, _)| idx)
    }

    /// Original index and Euclidean distance of the approximate nearest neighbour.
    pub fn find_nearest_with_distance(&self, query: ArrayView1<'_, f64>) -> Result<(usize, f64)> {
        let tree = self.tree.as_ref().ok_or(RpTreeError::NotInitialized)?;
        let query = query.to_vec();
        Ok(search::find_nearest(tree, &query)?)
    }

    pub fn is_initialized(&self) -> bool {
        self.tree.is_some()
    }

    pub fn config(&self) -> &RpTreeConfig {
        &self.config
    }

    /// Number of indexed vectors, or `None` before initialization.
    pub fn size(&self) -> Option<usize> {
        self.tree.as_ref().map(|t| t.size)
    }

    /// Dimensionality of indexed vectors, or `None` before initialization.
    pub fn dim(&self) -> Option<usize> {
        self.tree.as_ref().map(|t| t.dimension)
    }

    /// The built tree, if any.
    pub fn tree(&self) -> Option<&RpTree> {
        self.tree.as_ref()
    }

    pub fn stats(&self) -> Result<TreeStats> {
        Ok(self.tree.as_ref().ok_or(RpTreeError::NotInitialized)?.stats())
    }

    /// Original indices held by each leaf, in left-to-right order.
    pub fn leaf_indices(&self) -> Result<Vec<Vec<usize>>> {
        Ok(self.tree.as_ref().ok_or(RpTreeError::NotInitialized)?.leaf_indices())
    }
}
