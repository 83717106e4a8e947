use pctsptw_instances::rewards::*;
use rand::{rngs::StdRng, SeedableRng};
use statrs::distribution::{Beta, ContinuousCDF};
use statrs::statistics::Distribution;

fn ks_distance(samples: &mut Vec<f64>, alpha: f64, beta: f64) -> f64 {
    let dist = Beta::new(alpha, beta).unwrap();
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = samples.len() as f64;
    samples
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let cdf = dist.cdf(x);
            (cdf - i as f64 / n).abs().max((cdf - (i + 1) as f64 / n).abs())
        })
        .fold(0.0, f64::max)
}

#[test]
fn test_gamma_ratio_matches_beta_distribution() {
    for &(alpha, beta) in &[(2.0, 2.0), (0.5, 3.0), (5.0, 1.5)] {
        let mut rng = StdRng::seed_from_u64(42);
        let mut samples = BetaSampler::GammaRatio
            .sample_n(&mut rng, alpha, beta, 20_000)
            .unwrap();
        assert!(samples.iter().all(|&x| (0.0..=1.0).contains(&x)));

        let dist = Beta::new(alpha, beta).unwrap();
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        assert!((mean - dist.mean().unwrap()).abs() < 0.01);
        assert!(ks_distance(&mut samples, alpha, beta) < 0.02);
    }
}

#[test]
fn test_large_shapes_complete() {
    for sampler in [BetaSampler::GammaRatio, BetaSampler::RandDistr] {
        let mut rng = StdRng::seed_from_u64(11);
        let samples = sampler.sample_n(&mut rng, 50.0, 50.0, 5_000).unwrap();
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        assert!((mean - 0.5).abs() < 0.01);
        assert!(samples.iter().all(|&x| (0.0..=1.0).contains(&x)));
    }
    let params = RewardParams {
        alpha: 20.0,
        beta: 20.0,
        ..RewardParams::default()
    };
    let mut rng = StdRng::seed_from_u64(5);
    let rewards = sample_rewards(3, &mut rng, &params).unwrap();
    assert_eq!(rewards.len(), 3);
    assert_eq!(rewards[0], 0);
}

#[test]
fn test_tiny_shapes_stay_in_unit_interval() {
    let mut rng = StdRng::seed_from_u64(9);
    let samples = BetaSampler::GammaRatio
        .sample_n(&mut rng, 1e-4, 1e-4, 2_000)
        .unwrap();
    assert!(samples.iter().all(|&x| (0.0..=1.0).contains(&x)));
}

#[test]
fn test_rand_distr_matches_beta_distribution() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut samples = BetaSampler::RandDistr
        .sample_n(&mut rng, 2.0, 2.0, 20_000)
        .unwrap();
    let dist = Beta::new(2.0, 2.0).unwrap();
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let variance =
        samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / samples.len() as f64;
    assert!((mean - 0.5).abs() < 0.01);
    assert!((variance - dist.variance().unwrap()).abs() < 0.005);
    assert!(ks_distance(&mut samples, 2.0, 2.0) < 0.02);
}

#[test]
fn test_sampler_rejects_bad_shape() {
    let mut rng = StdRng::seed_from_u64(0);
    for sampler in [BetaSampler::GammaRatio, BetaSampler::RandDistr] {
        assert!(sampler.sample_n(&mut rng, 0.0, 2.0, 3).is_err());
        assert!(sampler.sample_n(&mut rng, 2.0, -1.0, 3).is_err());
        assert!(sampler.sample_n(&mut rng, f64::NAN, 2.0, 3).is_err());
    }
}

#[test]
fn test_sample_rewards_depot_only() {
    let mut rng = StdRng::seed_from_u64(1);
    let rewards = sample_rewards(1, &mut rng, &RewardParams::default()).unwrap();
    assert_eq!(rewards, vec![0]);
    let rewards = sample_rewards(0, &mut rng, &RewardParams::default()).unwrap();
    assert!(rewards.is_empty());
}

#[test]
fn test_sample_rewards_depot_only_makes_no_draws() {
    let mut a = StdRng::seed_from_u64(3);
    let mut b = StdRng::seed_from_u64(3);
    sample_rewards(1, &mut a, &RewardParams::default()).unwrap();
    let params = RewardParams::default();
    assert_eq!(
        sample_rewards(10, &mut a, &params).unwrap(),
        sample_rewards(10, &mut b, &params).unwrap()
    );
}

#[test]
fn test_sample_rewards_bounds() {
    let configs = [
        RewardParams::default(),
        RewardParams {
            target_mean: None,
            ..RewardParams::default()
        },
        RewardParams {
            target_mean: Some(95.0),
            ..RewardParams::default()
        },
        RewardParams {
            r_min: 1,
            r_max: 5,
            alpha: 0.5,
            beta: 0.5,
            target_mean: Some(2.0),
            sampler: BetaSampler::RandDistr,
        },
        RewardParams {
            r_min: 7,
            r_max: 7,
            ..RewardParams::default()
        },
    ];
    for params in &configs {
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let rewards = sample_rewards(25, &mut rng, params).unwrap();
            assert_eq!(rewards.len(), 25);
            assert_eq!(rewards[0], 0);
            assert!(rewards[1..]
                .iter()
                .all(|r| (params.r_min..=params.r_max).contains(r)));
        }
    }
}

#[test]
fn test_sample_rewards_deterministic() {
    let params = RewardParams::default();
    let a = sample_rewards(50, &mut StdRng::seed_from_u64(99), &params).unwrap();
    let b = sample_rewards(50, &mut StdRng::seed_from_u64(99), &params).unwrap();
    let c = sample_rewards(50, &mut StdRng::seed_from_u64(100), &params).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_sample_rewards_mean_normalization() {
    let params = RewardParams::default();
    let rewards = sample_rewards(401, &mut StdRng::seed_from_u64(5), &params).unwrap();
    let mean = rewards[1..].iter().sum::<i64>() as f64 / 400.0;
    // only rounding and clipping at r_min move the mean away from the target
    assert!((mean - 50.0).abs() < 3.0, "mean {}", mean);
}

#[test]
fn test_sample_rewards_rejects_inverted_bounds() {
    let params = RewardParams {
        r_min: 100,
        r_max: 10,
        ..RewardParams::default()
    };
    assert!(sample_rewards(5, &mut StdRng::seed_from_u64(0), &params).is_err());
}

#[test]
fn test_scale_to_range() {
    assert_eq!(
        scale_to_range(&[0.0, 0.5, 1.0], 10, 100),
        vec![10.0, 55.0, 100.0]
    );
}

#[test]
fn test_normalize_mean() {
    let mut values = vec![10.0, 20.0, 30.0];
    normalize_mean(&mut values, 40.0);
    assert_eq!(values, vec![20.0, 40.0, 60.0]);

    let mut zeros = vec![0.0, 0.0];
    normalize_mean(&mut zeros, 40.0);
    assert_eq!(zeros, vec![0.0, 0.0]);

    let mut empty: Vec<f64> = Vec::new();
    normalize_mean(&mut empty, 40.0);
    assert!(empty.is_empty());
}

#[test]
fn test_round_then_clip() {
    assert_eq!(round_and_clip(42.5, 10, 100), 42);
    assert_eq!(round_and_clip(43.5, 10, 100), 44);
    assert_eq!(round_and_clip(100.4, 10, 100), 100);
    assert_eq!(round_and_clip(100.6, 10, 100), 100);
    assert_eq!(round_and_clip(9.5, 10, 100), 10);
    assert_eq!(round_and_clip(-3.0, 10, 100), 10);
    assert_eq!(round_and_clip(f64::NAN, 10, 100), 10);
}
