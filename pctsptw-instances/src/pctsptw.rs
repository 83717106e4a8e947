use crate::{
    metric::{ensure_metric, violates_triangle_inequality},
    quota::{compute_quota, total_reward},
    rewards::{sample_rewards, RewardParams},
    tokens::{decode_dropping_invalid, Tokens},
    tsptw::{read_time_windows, TimeWindow, TsptwInstance},
    InstanceError, Section,
};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path, str::FromStr};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GenerationParams {
    pub rewards: RewardParams,
    pub quota_fraction: f64,
    /// Run the metric closure even when the matrix is already metric.
    pub enforce_metric: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            rewards: RewardParams::default(),
            quota_fraction: 0.65,
            enforce_metric: false,
        }
    }
}

/// Prize-collecting TSPTW instance.
///
/// Written as:
///
/// ```text
/// n
/// quota
/// n lines of space separated distances
/// n lines of "earliest latest"
/// n lines of a single reward, depot first (always 0)
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PctsptwInstance {
    pub num_nodes: usize,
    pub quota: i64,
    pub distance_matrix: Vec<Vec<i64>>,
    pub time_windows: Vec<TimeWindow>,
    pub rewards: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub instance: PctsptwInstance,
    pub metric_closure_applied: bool,
}

impl PctsptwInstance {
    /// Attaches rewards and a quota to `tsptw`. Every random draw comes from `seed`.
    pub fn generate_instance(
        tsptw: TsptwInstance,
        seed: u64,
        params: &GenerationParams,
    ) -> Result<Generated, InstanceError> {
        let TsptwInstance {
            num_nodes,
            distance_matrix,
            time_windows,
        } = tsptw;
        let (distance_matrix, metric_closure_applied) =
            ensure_metric(distance_matrix, params.enforce_metric)?;

        let mut rng = StdRng::seed_from_u64(seed);
        let rewards = sample_rewards(num_nodes, &mut rng, &params.rewards)?;
        let quota = compute_quota(&rewards, params.quota_fraction);

        Ok(Generated {
            instance: Self {
                num_nodes,
                quota,
                distance_matrix,
                time_windows,
                rewards,
            },
            metric_closure_applied,
        })
    }

    pub fn read_from_file(path: &Path) -> Result<Self, InstanceError> {
        let bytes = fs::read(path)?;
        decode_dropping_invalid(&bytes).parse()
    }

    /// Writes the instance, creating missing parent directories.
    pub fn write_to_file(&self, path: &Path) -> Result<(), InstanceError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_string())?;
        Ok(())
    }

    pub fn total_reward(&self) -> i64 {
        total_reward(&self.rewards)
    }

    /// Sum over rows of the largest entry; no tour can be longer.
    pub fn distance_upper_bound(&self) -> i64 {
        self.distance_matrix
            .iter()
            .map(|row| row.iter().copied().max().unwrap_or(0).max(0))
            .fold(0i64, i64::saturating_add)
    }

    pub fn horizon(&self) -> i64 {
        self.time_windows
            .iter()
            .map(|tw| tw.latest.saturating_add(1))
            .max()
            .unwrap_or(0)
    }

    /// Checks the guarantees every generated instance gives to its consumers.
    pub fn verify(&self) -> Result<(), InstanceError> {
        let n = self.num_nodes;
        if self.distance_matrix.len() != n || self.distance_matrix.iter().any(|r| r.len() != n) {
            return Err(InstanceError::Violation(format!(
                "a square {}x{} distance matrix",
                n, n
            )));
        }
        if self.time_windows.len() != n || self.rewards.len() != n {
            return Err(InstanceError::Violation(format!(
                "one time window and one reward per node ({} nodes, {} windows, {} rewards)",
                n,
                self.time_windows.len(),
                self.rewards.len()
            )));
        }
        if violates_triangle_inequality(&self.distance_matrix) {
            return Err(InstanceError::Violation(
                "the triangle inequality".to_string(),
            ));
        }
        if self.rewards.first().copied().unwrap_or(0) != 0 {
            return Err(InstanceError::Violation(format!(
                "a zero depot reward (got {})",
                self.rewards[0]
            )));
        }
        let total = self.total_reward();
        let quota_ok = if total > 0 {
            (1..=total).contains(&self.quota)
        } else {
            self.quota == 0
        };
        if !quota_ok {
            return Err(InstanceError::Violation(format!(
                "the quota bounds (quota {}, total reward {})",
                self.quota, total
            )));
        }
        Ok(())
    }
}

impl fmt::Display for PctsptwInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.num_nodes)?;
        writeln!(f, "{}", self.quota)?;
        for row in &self.distance_matrix {
            let line = row
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<String>>()
                .join(" ");
            writeln!(f, "{}", line)?;
        }
        for tw in &self.time_windows {
            writeln!(f, "{} {}", tw.earliest, tw.latest)?;
        }
        for reward in &self.rewards {
            writeln!(f, "{}", reward)?;
        }
        Ok(())
    }
}

impl FromStr for PctsptwInstance {
    type Err = InstanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = Tokens::new(s)?;
        let num_nodes = tokens.node_count()?;
        let quota = tokens.int(Section::Quota)?;
        let distance_matrix = tokens.rows(Section::DistanceMatrix, num_nodes, num_nodes)?;
        let time_windows = read_time_windows(&mut tokens, num_nodes)?;
        let rewards = tokens.ints(Section::Rewards, num_nodes)?;
        Ok(Self {
            num_nodes,
            quota,
            distance_matrix,
            time_windows,
            rewards,
        })
    }
}
