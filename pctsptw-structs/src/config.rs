use crate::serializable_struct;
use anyhow::{anyhow, Result};
use pctsptw_instances::{
    pctsptw::GenerationParams,
    rewards::{BetaSampler, RewardParams},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

serializable_struct! {
    #[serde(default)]
    RewardConfig {
        r_min: i64,
        r_max: i64,
        alpha: f64,
        beta: f64,
        /// Target mean of the non-depot rewards. Negative disables the rescaling.
        normalize_mean_to: f64,
        beta_sampler: BetaSampler,
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            r_min: 10,
            r_max: 100,
            alpha: 2.0,
            beta: 2.0,
            normalize_mean_to: 50.0,
            beta_sampler: BetaSampler::GammaRatio,
        }
    }
}

impl RewardConfig {
    pub fn target_mean(&self) -> Option<f64> {
        if self.normalize_mean_to >= 0.0 && self.normalize_mean_to.is_finite() {
            Some(self.normalize_mean_to)
        } else {
            None
        }
    }

    pub fn params(&self) -> RewardParams {
        RewardParams {
            r_min: self.r_min,
            r_max: self.r_max,
            alpha: self.alpha,
            beta: self.beta,
            target_mean: self.target_mean(),
            sampler: self.beta_sampler,
        }
    }
}

serializable_struct! {
    #[serde(default)]
    QuotaConfig {
        /// Quota is `ceil(fraction * total_reward)`.
        fraction: f64,
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self { fraction: 0.65 }
    }
}

serializable_struct! {
    #[serde(default)]
    ConversionConfig {
        in_dir: PathBuf,
        out_dir: PathBuf,
        /// Inserted between file stem and extension of every output file.
        output_suffix: String,
        enforce_metric: bool,
        global_seed: u64,
        rewards: RewardConfig,
        quota: QuotaConfig,
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            in_dir: PathBuf::from("data/TSPTW/RifkiSolnon"),
            out_dir: PathBuf::from("data/PCTSPTW/RifkiSolnon"),
            output_suffix: "_pctsptw".to_string(),
            enforce_metric: false,
            global_seed: 12345,
            rewards: RewardConfig::default(),
            quota: QuotaConfig::default(),
        }
    }
}

impl ConversionConfig {
    pub fn validate(&self) -> Result<()> {
        let rewards = &self.rewards;
        if rewards.r_min > rewards.r_max {
            return Err(anyhow!(
                "r_min ({}) must not exceed r_max ({})",
                rewards.r_min,
                rewards.r_max
            ));
        }
        if !(rewards.alpha > 0.0 && rewards.alpha.is_finite()) {
            return Err(anyhow!("alpha must be positive, got {}", rewards.alpha));
        }
        if !(rewards.beta > 0.0 && rewards.beta.is_finite()) {
            return Err(anyhow!("beta must be positive, got {}", rewards.beta));
        }
        if !(self.quota.fraction >= 0.0 && self.quota.fraction.is_finite()) {
            return Err(anyhow!(
                "quota fraction must be a non-negative number, got {}",
                self.quota.fraction
            ));
        }
        if self.output_suffix.is_empty() {
            return Err(anyhow!("output suffix must not be empty"));
        }
        Ok(())
    }

    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            rewards: self.rewards.params(),
            quota_fraction: self.quota.fraction,
            enforce_metric: self.enforce_metric,
        }
    }
}
