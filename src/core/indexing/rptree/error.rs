// src/core/indexing/rptree/error.rs

use std::fmt;

/// Errors raised while building or querying a random-projection tree.
#[derive(Debug, Clone, PartialEq)]
pub enum RpTreeError {
    /// Invalid index parameters, e.g. a non-positive `alpha`.
    Configuration(String),
    /// The input array is not two-dimensional or has zero columns.
    InvalidShape(String),
    /// A vector's length does not match the index dimensionality.
    DimensionMismatch { expected: usize, actual: usize },
    /// A node (including the root) was asked to hold no vectors.
    EmptyInput(String),
    /// A query was issued before `initialize` completed.
    NotInitialized,
    /// `initialize` was called on an index that already holds a tree.
    AlreadyInitialized,
}

impl fmt::Display for RpTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "RP-Tree Configuration: {msg}"),
            Self::InvalidShape(msg) => write!(f, "RP-Tree Invalid Shape: {msg}"),
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "RP-Tree Dimension Mismatch: expected {expected}, got {actual}")
            }
            Self::EmptyInput(msg) => write!(f, "RP-Tree Empty Input: {msg}"),
            Self::NotInitialized => write!(f, "RP-Tree Not Initialized"),
            Self::AlreadyInitialized => write!(f, "RP-Tree Already Initialized"),
        }
    }
}

impl std::error::Error for RpTreeError {}

pub type RpTreeResult<T> = Result<T, RpTreeError>;
