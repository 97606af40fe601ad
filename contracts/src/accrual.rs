//! Allocation and reward-stream arithmetic.
//!
//! Pure functions shared by LiquidityOps and StakingPool:
//! - deposit split between the external lock and the market pool
//! - fee split on harvested yield
//! - Synthetix-style streamed reward accounting (reward-per-token, earned,
//!   period rollover)
//! - worst-acceptable pool-share output under a slippage tolerance

use odra::casper_types::U256;
use crate::types::{Ratio, RewardData};

/// Internal fixed-point scale (1e18)
pub const PRECISION: u64 = 1_000_000_000_000_000_000;

/// Basis points scale (100% = 10000 bps)
pub const BPS_SCALE: u64 = 10_000;

/// Market pool swap/deposit fee in basis points (0.04%)
pub const POOL_FEE_BPS: u64 = 4;

/// Split a deposit into (locked, pooled) portions by the configured lock rate.
///
/// `locked = floor(amount * num / denom)`; the truncation remainder goes to
/// the pooled side so the two portions always sum to the full amount.
pub fn split_deposit(amount: U256, lock_rate: &Ratio) -> (U256, U256) {
    let locked = amount
        .checked_mul(lock_rate.numerator)
        .and_then(|v| v.checked_div(lock_rate.denominator))
        .unwrap_or(U256::zero());
    (locked, amount - locked)
}

/// Split a harvested reward balance into (fee, remainder) by the fee rate.
pub fn fee_split(amount: U256, fee_rate: &Ratio) -> (U256, U256) {
    let fee = amount
        .checked_mul(fee_rate.numerator)
        .and_then(|v| v.checked_div(fee_rate.denominator))
        .unwrap_or(U256::zero());
    (fee, amount - fee)
}

/// Latest timestamp at which the current emission period still accrues.
pub fn last_time_reward_applicable(data: &RewardData, now: u64) -> u64 {
    core::cmp::min(now, data.period_finish)
}

/// Cumulative reward per staked token, 1e18 scale.
///
/// Returns the stored value unchanged while nothing is staked; otherwise
/// extends it by `rate * elapsed * 1e18 / total_supply`.
pub fn reward_per_token(data: &RewardData, total_supply: U256, now: u64) -> U256 {
    if total_supply.is_zero() {
        return data.reward_per_token_stored;
    }

    let elapsed = last_time_reward_applicable(data, now).saturating_sub(data.last_update_time);
    let accrued = data
        .reward_rate
        .checked_mul(U256::from(elapsed))
        .and_then(|v| v.checked_mul(U256::from(PRECISION)))
        .and_then(|v| v.checked_div(total_supply))
        .unwrap_or(U256::zero());

    data.reward_per_token_stored + accrued
}

/// Reward owed to an account: its stake times the reward-per-token delta
/// since its last settlement, plus anything already settled but unclaimed.
pub fn earned(
    balance: U256,
    current_reward_per_token: U256,
    user_reward_per_token_paid: U256,
    settled: U256,
) -> U256 {
    let delta = current_reward_per_token.saturating_sub(user_reward_per_token_paid);
    let fresh = balance
        .checked_mul(delta)
        .and_then(|v| v.checked_div(U256::from(PRECISION)))
        .unwrap_or(U256::zero());
    settled + fresh
}

/// New emission rate when `amount` is notified: any undistributed remainder
/// of an in-flight period is folded into a fresh period of `duration`.
pub fn rollover_rate(amount: U256, data: &RewardData, now: u64, duration: u64) -> U256 {
    let remaining = if now < data.period_finish {
        data.reward_rate * U256::from(data.period_finish - now)
    } else {
        U256::zero()
    };
    (amount + remaining) / U256::from(duration)
}

/// Whether a requested slippage tolerance is representable: it must leave
/// room for the pool's own fee below 100%.
pub fn slippage_within_bounds(slippage_bps: u64) -> bool {
    slippage_bps + POOL_FEE_BPS <= BPS_SCALE
}

/// Worst acceptable pool-share output for supplying `(amount, amount)` into
/// the pool, modeled off the pool's virtual price.
pub fn pool_tokens_floor(amount: U256, virtual_price: U256, slippage_bps: u64) -> U256 {
    let expected = amount
        .checked_mul(U256::from(2u64))
        .and_then(|v| v.checked_mul(U256::from(PRECISION)))
        .and_then(|v| v.checked_div(virtual_price))
        .unwrap_or(U256::zero());

    expected
        .checked_mul(U256::from(BPS_SCALE - slippage_bps))
        .and_then(|v| v.checked_div(U256::from(BPS_SCALE)))
        .unwrap_or(U256::zero())
}
