/// Sum of rewards over non-depot nodes.
pub fn total_reward(rewards: &[i64]) -> i64 {
    rewards.iter().skip(1).fold(0, |total, &r| total.saturating_add(r))
}

/// `ceil(fraction * total)` clipped into `[1, total]`, or 0 when no reward exists.
pub fn compute_quota(rewards: &[i64], fraction: f64) -> i64 {
    let total = total_reward(rewards);
    if total <= 0 {
        return 0;
    }
    let quota = (fraction * total as f64).ceil() as i64;
    quota.clamp(1, total)
}
