use crate::{
    tokens::{decode_dropping_invalid, Tokens},
    InstanceError, Section,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, str::FromStr};

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub earliest: i64,
    pub latest: i64,
}

/// A TSPTW instance as found in the Rifki-Solnon style benchmark files:
///
/// ```text
/// n
/// n*n distances, row-major
/// n pairs of (earliest, latest)
/// ```
///
/// Node 0 is the depot. Values are taken as-is; trailing tokens are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TsptwInstance {
    pub num_nodes: usize,
    pub distance_matrix: Vec<Vec<i64>>,
    pub time_windows: Vec<TimeWindow>,
}

impl TsptwInstance {
    pub fn read_from_file(path: &Path) -> Result<Self, InstanceError> {
        let bytes = fs::read(path)?;
        decode_dropping_invalid(&bytes).parse()
    }
}

impl FromStr for TsptwInstance {
    type Err = InstanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = Tokens::new(s)?;
        let num_nodes = tokens.node_count()?;
        let distance_matrix = tokens.rows(Section::DistanceMatrix, num_nodes, num_nodes)?;
        let time_windows = read_time_windows(&mut tokens, num_nodes)?;
        Ok(Self {
            num_nodes,
            distance_matrix,
            time_windows,
        })
    }
}

pub(crate) fn read_time_windows(
    tokens: &mut Tokens,
    num_nodes: usize,
) -> Result<Vec<TimeWindow>, InstanceError> {
    Ok(tokens
        .rows(Section::TimeWindows, num_nodes, 2)?
        .into_iter()
        .map(|pair| TimeWindow {
            earliest: pair[0],
            latest: pair[1],
        })
        .collect())
}
