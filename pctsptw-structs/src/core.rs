use crate::{config::ConversionConfig, serializable_struct};
use pctsptw_utils::jsonify_pretty;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

serializable_struct! {
    ConvertedInstance {
        rel_path: String,
        out_path: PathBuf,
        seed: u64,
        num_nodes: usize,
        metric_closure_applied: bool,
        total_reward: i64,
        quota: i64,
    }
}

/// What happened to one input file.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Converted(ConvertedInstance),
    Skipped { rel_path: String, reason: String },
}

impl FileOutcome {
    pub fn rel_path(&self) -> &str {
        match self {
            FileOutcome::Converted(converted) => &converted.rel_path,
            FileOutcome::Skipped { rel_path, .. } => rel_path,
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, FileOutcome::Converted(_))
    }
}

serializable_struct! {
    ConversionReport {
        config: ConversionConfig,
        num_files: usize,
        num_converted: usize,
        outcomes: Vec<FileOutcome>,
    }
}

impl ConversionReport {
    pub fn new(config: ConversionConfig, outcomes: Vec<FileOutcome>) -> Self {
        Self {
            config,
            num_files: outcomes.len(),
            num_converted: outcomes.iter().filter(|o| o.is_converted()).count(),
            outcomes,
        }
    }

    pub fn num_skipped(&self) -> usize {
        self.num_files - self.num_converted
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        jsonify_pretty(self)
    }
}
