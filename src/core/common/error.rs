use std::fmt;

use crate::core::indexing::rptree::RpTreeError;

#[derive(Debug)]
pub enum MrptError {
    Io(std::io::Error),
    Configuration(String),
    Index(RpTreeError),
}

impl fmt::Display for MrptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO Error: {}", e),
            Self::Configuration(s) => write!(f, "Configuration error: {}", s),
            Self::Index(e) => write!(f, "Index Error: {}", e),
        }
    }
}

impl std::error::Error for MrptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Index(e) => Some(e),
            Self::Configuration(_) => None,
        }
    }
}

impl From<std::io::Error> for MrptError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

// Configuration problems detected by the tree itself surface as the
// crate-level configuration error so callers only match one variant.
impl From<RpTreeError> for MrptError {
    fn from(err: RpTreeError) -> Self {
        match err {
            RpTreeError::Configuration(s) => Self::Configuration(s),
            other => Self::Index(other),
        }
    }
}
