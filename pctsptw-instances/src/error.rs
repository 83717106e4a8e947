use std::{fmt, io};

use thiserror::Error;

/// Part of an instance file a token was expected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    NodeCount,
    Quota,
    DistanceMatrix,
    TimeWindows,
    Rewards,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::NodeCount => "node count",
            Section::Quota => "quota",
            Section::DistanceMatrix => "distance matrix",
            Section::TimeWindows => "time windows",
            Section::Rewards => "rewards",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("empty instance file")]
    Empty,
    #[error("not enough tokens for {section}: expected {expected}, found {found}")]
    Truncated {
        section: Section,
        expected: usize,
        found: usize,
    },
    #[error("invalid token '{token}' in {section}")]
    InvalidToken { section: Section, token: String },
    #[error("node count {0} is out of range")]
    InvalidNodeCount(usize),
    #[error("negative cycle through node {node}, distances cannot be made metric")]
    NegativeCycle { node: usize },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("instance violates {0}")]
    Violation(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl InstanceError {
    /// True for errors caused by the shape of the token stream.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            InstanceError::Empty
                | InstanceError::Truncated { .. }
                | InstanceError::InvalidToken { .. }
                | InstanceError::InvalidNodeCount(_)
        )
    }
}
