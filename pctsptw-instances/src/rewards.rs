//! Bounded i.i.d. node rewards drawn from a Beta distribution.
//!
//! Sampling runs as four separate stages (draw, scale, normalize, round and clip) so
//! each stage can be checked on its own.
use crate::InstanceError;
use rand::{distributions::Distribution, Rng};
use rand_distr::Gamma;
use serde::{Deserialize, Serialize};

/// Algorithm used to draw Beta(alpha, beta) variates.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BetaSampler {
    /// `x / (x + y)` with `x ~ Gamma(alpha, 1)` and `y ~ Gamma(beta, 1)`, drawn in that
    /// order for every node. Runs in bounded expected time for any positive shape.
    #[default]
    GammaRatio,
    /// `rand_distr::Beta` (Cheng's BB/BC). Reproducible within one `rand_distr` release.
    RandDistr,
}

impl BetaSampler {
    pub fn sample_n<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        alpha: f64,
        beta: f64,
        count: usize,
    ) -> Result<Vec<f64>, InstanceError> {
        if !(alpha > 0.0 && beta > 0.0 && alpha.is_finite() && beta.is_finite()) {
            return Err(InstanceError::InvalidParameter(format!(
                "beta shape parameters must be positive and finite (alpha: {}, beta: {})",
                alpha, beta
            )));
        }
        match self {
            BetaSampler::GammaRatio => {
                let x_dist = Gamma::new(alpha, 1.0)
                    .map_err(|e| InstanceError::InvalidParameter(e.to_string()))?;
                let y_dist = Gamma::new(beta, 1.0)
                    .map_err(|e| InstanceError::InvalidParameter(e.to_string()))?;
                Ok((0..count)
                    .map(|_| gamma_ratio_sample(rng, &x_dist, &y_dist, alpha, beta))
                    .collect())
            }
            BetaSampler::RandDistr => {
                let dist = rand_distr::Beta::new(alpha, beta)
                    .map_err(|e| InstanceError::InvalidParameter(e.to_string()))?;
                Ok((0..count).map(|_| dist.sample(rng)).collect())
            }
        }
    }
}

fn gamma_ratio_sample<R: Rng + ?Sized>(
    rng: &mut R,
    x_dist: &Gamma<f64>,
    y_dist: &Gamma<f64>,
    alpha: f64,
    beta: f64,
) -> f64 {
    let x = x_dist.sample(rng);
    let y = y_dist.sample(rng);
    let sum = x + y;
    if sum > 0.0 {
        return x / sum;
    }
    // Both draws underflowed, only possible for tiny shapes where Beta(alpha, beta)
    // degenerates to Bernoulli(alpha / (alpha + beta)) on {0, 1}.
    if rng.gen_bool(alpha / (alpha + beta)) {
        1.0
    } else {
        0.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RewardParams {
    pub r_min: i64,
    pub r_max: i64,
    pub alpha: f64,
    pub beta: f64,
    /// Mean the non-depot rewards are rescaled towards before rounding.
    pub target_mean: Option<f64>,
    pub sampler: BetaSampler,
}

impl Default for RewardParams {
    fn default() -> Self {
        Self {
            r_min: 10,
            r_max: 100,
            alpha: 2.0,
            beta: 2.0,
            target_mean: Some(50.0),
            sampler: BetaSampler::default(),
        }
    }
}

/// Reward vector of length `num_nodes`. The depot (node 0) always gets 0 and no
/// draws are made when there is no other node.
pub fn sample_rewards<R: Rng + ?Sized>(
    num_nodes: usize,
    rng: &mut R,
    params: &RewardParams,
) -> Result<Vec<i64>, InstanceError> {
    if params.r_min > params.r_max {
        return Err(InstanceError::InvalidParameter(format!(
            "r_min ({}) is greater than r_max ({})",
            params.r_min, params.r_max
        )));
    }
    let mut rewards = vec![0; num_nodes];
    if num_nodes <= 1 {
        return Ok(rewards);
    }

    let raw = params
        .sampler
        .sample_n(rng, params.alpha, params.beta, num_nodes - 1)?;
    let mut scaled = scale_to_range(&raw, params.r_min, params.r_max);
    if let Some(target_mean) = params.target_mean {
        normalize_mean(&mut scaled, target_mean);
    }
    for (reward, &value) in rewards[1..].iter_mut().zip(scaled.iter()) {
        *reward = round_and_clip(value, params.r_min, params.r_max);
    }

    rewards[0] = 0;
    Ok(rewards)
}

/// Affine map of `[0, 1]` onto `[r_min, r_max]`.
pub fn scale_to_range(raw: &[f64], r_min: i64, r_max: i64) -> Vec<f64> {
    let span = r_max as f64 - r_min as f64;
    raw.iter().map(|&x| r_min as f64 + x * span).collect()
}

/// Multiplies every value by `target_mean / mean`. Values with a (near) zero mean are
/// left alone.
pub fn normalize_mean(values: &mut [f64], target_mean: f64) {
    if values.is_empty() {
        return;
    }
    let current_mean = values.iter().sum::<f64>() / values.len() as f64;
    if current_mean > 1e-9 {
        let factor = target_mean / current_mean;
        values.iter_mut().for_each(|v| *v *= factor);
    }
}

/// Rounds half to even, then clamps into `[r_min, r_max]`.
pub fn round_and_clip(value: f64, r_min: i64, r_max: i64) -> i64 {
    (value.round_ties_even() as i64).clamp(r_min, r_max)
}
