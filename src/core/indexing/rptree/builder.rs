// src/core/indexing/rptree/builder.rs

//! Logic for building a random-projection tree from a set of vectors.

use tracing::debug;

use super::error::{RpTreeError, RpTreeResult};
use super::schedule::ProjectionSchedule;
use super::tree::{BucketEntry, RpNode, RpTree};

/// Limits that decide when a node stops splitting.
#[derive(Debug, Clone, Copy)]
pub struct SplitLimits {
    pub max_depth: usize,
    pub min_split: usize,
}

impl SplitLimits {
    /// Number of schedule levels a tree over `size` vectors can consult.
    ///
    /// Every split leaves both children strictly smaller than the parent, so
    /// no node sits deeper than `size - 1` regardless of `max_depth`.
    pub fn reachable_levels(&self, size: usize) -> usize {
        self.max_depth.min(size.saturating_sub(1)) + 1
    }
}

/// Euclidean norm of `point` projected orthogonally onto the line through
/// the origin spanned by `direction`.
///
/// The sign of the projection is discarded: two points mirrored through the
/// origin along `direction` get the same magnitude. Splits therefore separate
/// points by their distance from the origin along the line, not by which side
/// of a hyperplane they fall on.
pub fn projection_magnitude(point: &[f64], direction: &[f64]) -> f64 {
    let scale = dot(point, direction) / dot(direction, direction);
    direction
        .iter()
        .map(|d| (scale * d).powi(2))
        .sum::<f64>()
        .sqrt()
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Median of `values`; the mean of the two middle values for even counts.
pub(crate) fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Builds a tree over `rows`, taking ownership of the vectors.
///
/// Row `i` of the input is reported as original index `i` by the leaf that
/// ends up holding it.
///
/// # Errors
/// * `EmptyInput` if `rows` is empty.
/// * `DimensionMismatch` if any row's length differs from the schedule's.
/// * `Configuration` if the schedule covers fewer levels than
///   [`SplitLimits::reachable_levels`] requires.
pub fn build_rptree(
    rows: Vec<Vec<f64>>,
    schedule: ProjectionSchedule,
    limits: SplitLimits,
) -> RpTreeResult<RpTree> {
    if rows.is_empty() {
        return Err(RpTreeError::EmptyInput(
            "cannot build a tree from an empty vector set".to_string(),
        ));
    }
    let dimension = schedule.dim();
    if let Some(row) = rows.iter().find(|row| row.len() != dimension) {
        return Err(RpTreeError::DimensionMismatch { expected: dimension, actual: row.len() });
    }
    let size = rows.len();
    let required = limits.reachable_levels(size);
    if schedule.levels() < required {
        return Err(RpTreeError::Configuration(format!(
            "schedule covers {} levels but max_depth {} over {} vectors needs {}",
            schedule.levels(),
            limits.max_depth,
            size,
            required
        )));
    }

    let bucket: Vec<BucketEntry> = rows.into_iter().enumerate().map(|(idx, v)| (v, idx)).collect();
    let root = build_recursive(bucket, 0, &schedule, limits)?;

    let tree = RpTree { root, schedule, dimension, size };
    let stats = tree.stats();
    debug!(
        size,
        dimension,
        nodes = stats.node_count,
        leaves = stats.leaf_count,
        depth = stats.max_depth_reached,
        "built random projection tree"
    );
    Ok(tree)
}

/// Recursively builds the node for `bucket` at `depth`, consuming the bucket.
fn build_recursive(
    bucket: Vec<BucketEntry>,
    depth: usize,
    schedule: &ProjectionSchedule,
    limits: SplitLimits,
) -> RpTreeResult<RpNode> {
    if bucket.is_empty() {
        return Err(RpTreeError::EmptyInput(format!(
            "attempted to build node at depth {depth} from an empty bucket"
        )));
    }

    if bucket.len() < limits.min_split || depth == limits.max_depth {
        return Ok(RpNode::Leaf { bucket });
    }

    let direction = schedule.direction(depth).ok_or_else(|| {
        RpTreeError::Configuration(format!("no projection direction for depth {depth}"))
    })?;

    let magnitudes: Vec<f64> =
        bucket.iter().map(|(v, _)| projection_magnitude(v, direction)).collect();
    let split_median = median(&magnitudes);

    let left_len = magnitudes.iter().filter(|&&m| m < split_median).count();
    if left_len == 0 || left_len == bucket.len() {
        // Everything landed on one side; keep the bucket unsplit.
        return Ok(RpNode::Leaf { bucket });
    }

    let mut left = Vec::with_capacity(left_len);
    let mut right = Vec::with_capacity(bucket.len() - left_len);
    for (entry, magnitude) in bucket.into_iter().zip(magnitudes) {
        if magnitude < split_median {
            left.push(entry);
        } else {
            right.push(entry);
        }
    }

    let left_child = build_recursive(left, depth + 1, schedule, limits)?;
    let right_child = build_recursive(right, depth + 1, schedule, limits)?;

    Ok(RpNode::Internal {
        split_median,
        left_child: Box::new(left_child),
        right_child: Box::new(right_child),
    })
}
