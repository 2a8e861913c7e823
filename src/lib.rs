#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]
#![forbid(unsafe_code)]

//! # mrpt: approximate nearest-neighbour search with a random-projection tree
//!
//! `mrpt` indexes a fixed set of equal-length `f64` vectors in a single
//! binary partition tree and answers nearest-neighbour queries by descending
//! one root-to-leaf path and scanning the leaf it reaches.
//! It features:
//! - Sparse Gaussian projection directions, one per tree depth
//! - Median splits on projection magnitude with degenerate-split detection
//! - Seedable construction for reproducible trees
//! - TOML-loadable configuration with validated defaults
//!
//! ```no_run
//! use mrpt::{RpTreeConfig, RpTreeIndex};
//! use ndarray::array;
//!
//! let config = RpTreeConfig::builder().alpha(0.9).min_split(2).seed(7).build()?;
//! let mut index = RpTreeIndex::new(config)?;
//! index.initialize(array![[0.5, 0.5], [0.5, 0.6], [-1.0, 0.5]].view())?;
//! let nearest = index.find_nearest(array![-0.9, 0.4].view())?;
//! # Ok::<(), mrpt::MrptError>(())
//! ```

pub mod core;

// Re-export key types for easier use by library consumers
pub use crate::core::common::MrptError;
pub use crate::core::config::{RpTreeConfig, RpTreeConfigBuilder};
pub use crate::core::indexing::rptree::{
    brute_force_nearest, ProjectionSchedule, RpTreeError, RpTreeIndex, TreeStats,
};

/// Core result type for the library
pub type Result<T> = std::result::Result<T, MrptError>;
