use soroban_sdk::{Env, I256};

/// One whole reward unit per staked unit, in accumulator terms (10^18).
///
/// `rate × elapsed × SCALE` passes `i128::MAX` within a day at realistic
/// rates, hence the `I256` accumulator.
pub const SCALE: i128 = 1_000_000_000_000_000_000;

fn scale(env: &Env) -> I256 {
    I256::from_i128(env, SCALE)
}

/// `min(now, finish_at)`.
pub fn last_time_reward_applicable(now: u64, finish_at: u64) -> u64 {
    now.min(finish_at)
}

/// Advance the accumulator by `elapsed` seconds of emission at `reward_rate`,
/// shared across `total_supply` staked units:
///
/// ```text
/// stored + reward_rate * elapsed * SCALE / total_supply
/// ```
///
/// An empty pool leaves `stored` as it is; emission over that span is never
/// attributed to anyone.
pub fn compute_reward_per_token(
    env: &Env,
    stored: &I256,
    reward_rate: i128,
    elapsed: u64,
    total_supply: i128,
) -> I256 {
    if total_supply <= 0 || elapsed == 0 || reward_rate == 0 {
        return stored.clone();
    }

    let delta = I256::from_i128(env, reward_rate)
        .mul(&I256::from_i128(env, i128::from(elapsed)))
        .mul(&scale(env))
        .div(&I256::from_i128(env, total_supply));

    stored.add(&delta)
}

/// `owed` plus what `balance` picked up while the accumulator moved from
/// `rpt_paid` to `current_rpt`, i.e. `balance * (current_rpt - rpt_paid) / SCALE`.
///
/// `None` when the total does not fit in `i128`.
pub fn earned(
    env: &Env,
    balance: i128,
    current_rpt: &I256,
    rpt_paid: &I256,
    owed: i128,
) -> Option<i128> {
    let new_rewards = I256::from_i128(env, balance)
        .mul(&current_rpt.sub(rpt_paid))
        .div(&scale(env))
        .to_i128()?;

    owed.checked_add(new_rewards)
}

/// Reward units a schedule ending at `finish_at` has yet to emit. Zero once
/// it has ended.
pub fn remaining_rewards(reward_rate: i128, finish_at: u64, now: u64) -> Option<i128> {
    if now >= finish_at {
        return Some(0);
    }
    reward_rate.checked_mul(i128::from(finish_at - now))
}

/// Per-second rate for a new schedule of `duration` seconds that must emit
/// `amount` plus the `leftover` of the schedule it replaces.
///
/// Integer division truncates; the dust stays in the contract. Returns `None`
/// on overflow or a zero duration.
pub fn schedule_rate(amount: i128, leftover: i128, duration: u64) -> Option<i128> {
    leftover
        .checked_add(amount)?
        .checked_div(i128::from(duration))
}
