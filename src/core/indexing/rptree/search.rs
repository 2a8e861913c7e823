// src/core/indexing/rptree/search.rs

//! Single-path query descent and leaf-level linear scan.

use ndarray::{ArrayView1, ArrayView2};

use super::builder::projection_magnitude;
use super::error::{RpTreeError, RpTreeResult};
use super::tree::{BucketEntry, RpNode, RpTree};

/// Follows the query from the root to the single leaf it falls into.
///
/// At each internal node the query goes left when its projection magnitude is
/// strictly below the node's split median, right otherwise. There is no
/// backtracking.
pub fn descend<'a>(tree: &'a RpTree, query: &[f64]) -> RpTreeResult<&'a [BucketEntry]> {
    if query.len() != tree.dimension {
        return Err(RpTreeError::DimensionMismatch {
            expected: tree.dimension,
            actual: query.len(),
        });
    }

    let mut node = &tree.root;
    let mut depth = 0_usize;
    loop {
        match node {
            RpNode::Leaf { bucket } => return Ok(bucket.as_slice()),
            RpNode::Internal { split_median, left_child, right_child } => {
                let direction = tree.schedule.direction(depth).ok_or_else(|| {
                    RpTreeError::Configuration(format!(
                        "no projection direction for depth {depth}"
                    ))
                })?;
                node = if projection_magnitude(query, direction) < *split_median {
                    &**left_child
                } else {
                    &**right_child
                };
                depth += 1;
            }
        }
    }
}

/// Approximate nearest neighbour of `query`.
///
/// Returns `(original_index, euclidean_distance)` of the closest vector in
/// the leaf the query descends into.
pub fn find_nearest(tree: &RpTree, query: &[f64]) -> RpTreeResult<(usize, f64)> {
    let bucket = descend(tree, query)?;
    scan_bucket(bucket.iter().map(|(v, idx)| (v.as_slice(), *idx)), query)
        .ok_or_else(|| RpTreeError::EmptyInput("query reached an empty leaf".to_string()))
}

/// Exact nearest neighbour of `query` among all rows of `data`, by linear scan.
///
/// Ties go to the lowest row index, matching the leaf scan.
pub fn brute_force_nearest(
    data: ArrayView2<'_, f64>,
    query: ArrayView1<'_, f64>,
) -> RpTreeResult<(usize, f64)> {
    if data.ncols() != query.len() {
        return Err(RpTreeError::DimensionMismatch { expected: data.ncols(), actual: query.len() });
    }
    let mut best: Option<(usize, f64)> = None;
    for (idx, row) in data.outer_iter().enumerate() {
        let distance = row
            .iter()
            .zip(query.iter())
            .map(|(p, q)| (p - q).powi(2))
            .sum::<f64>()
            .sqrt();
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((idx, distance));
        }
    }
    best.ok_or_else(|| RpTreeError::EmptyInput("no vectors to search".to_string()))
}

/// Linear scan keeping the first entry with the smallest distance.
fn scan_bucket<'a, I>(entries: I, query: &[f64]) -> Option<(usize, f64)>
where
    I: Iterator<Item = (&'a [f64], usize)>,
{
    let mut best: Option<(usize, f64)> = None;
    for (stored, idx) in entries {
        let distance = euclidean_distance(stored, query);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((idx, distance));
        }
    }
    best
}

pub(crate) fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt()
}
