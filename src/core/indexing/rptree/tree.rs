// src/core/indexing/rptree/tree.rs

//! Defines the core tree structures: `RpNode` and `RpTree`.

use super::schedule::ProjectionSchedule;

/// A stored vector paired with its row index in the original input.
pub type BucketEntry = (Vec<f64>, usize);

/// A node in the random-projection tree.
///
/// Internal nodes carry the median projection magnitude of the bucket they
/// were built from; the direction itself lives in the schedule, indexed by
/// the node's depth. Leaves own their bucket outright.
#[derive(Debug, Clone, PartialEq)]
pub enum RpNode {
    Internal {
        split_median: f64,
        left_child: Box<RpNode>,
        right_child: Box<RpNode>,
    },
    Leaf {
        bucket: Vec<BucketEntry>,
    },
}

impl RpNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }
}

/// A fully built tree together with the schedule it was built against.
#[derive(Debug, Clone, PartialEq)]
pub struct RpTree {
    pub root: RpNode,
    pub schedule: ProjectionSchedule,
    pub dimension: usize,
    pub size: usize,
}

/// Shape summary of a built tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub node_count: usize,
    pub leaf_count: usize,
    /// Depth of the deepest leaf (root = 0).
    pub max_depth_reached: usize,
    pub min_leaf_size: usize,
    pub max_leaf_size: usize,
}

impl RpTree {
    /// Walks the tree and summarises its shape.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            node_count: 0,
            leaf_count: 0,
            max_depth_reached: 0,
            min_leaf_size: usize::MAX,
            max_leaf_size: 0,
        };
        let mut stack = vec![(&self.root, 0_usize)];
        while let Some((node, depth)) = stack.pop() {
            stats.node_count += 1;
            match node {
                RpNode::Internal { left_child, right_child, .. } => {
                    stack.push((&**right_child, depth + 1));
                    stack.push((&**left_child, depth + 1));
                }
                RpNode::Leaf { bucket } => {
                    stats.leaf_count += 1;
                    stats.max_depth_reached = stats.max_depth_reached.max(depth);
                    stats.min_leaf_size = stats.min_leaf_size.min(bucket.len());
                    stats.max_leaf_size = stats.max_leaf_size.max(bucket.len());
                }
            }
        }
        stats
    }

    /// Original indices held by each leaf, leaves in left-to-right order.
    pub fn leaf_indices(&self) -> Vec<Vec<usize>> {
        let mut leaves = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                RpNode::Internal { left_child, right_child, .. } => {
                    stack.push(&**right_child);
                    stack.push(&**left_child);
                }
                RpNode::Leaf { bucket } => {
                    leaves.push(bucket.iter().map(|(_, idx)| *idx).collect());
                }
            }
        }
        leaves
    }
}
