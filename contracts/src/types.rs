//! Common types used across the liquid locker protocol.

use odra::prelude::*;
use odra::casper_types::U256;

/// Opaque handle for a lock held in the external yield farm.
///
/// The farm assigns ids; this protocol stores and echoes them back without
/// assuming anything beyond equality.
pub type LockId = u64;

/// A rational configuration parameter (e.g. 80/100 lock rate).
#[odra::odra_type]
#[derive(Copy)]
pub struct Ratio {
    /// Numerator
    pub numerator: U256,
    /// Denominator (non-zero)
    pub denominator: U256,
}

impl Ratio {
    pub fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator: U256::from(numerator),
            denominator: U256::from(denominator),
        }
    }

    /// A valid ratio has a non-zero denominator and is at most 1.
    pub fn is_valid(&self) -> bool {
        !self.denominator.is_zero() && self.numerator <= self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }
}

/// Mirror of the single consolidated lock held in the external farm.
#[odra::odra_type]
#[derive(Copy, Default)]
pub struct LockedPosition {
    /// Farm-assigned opaque lock handle
    pub lock_id: LockId,
    /// Liquidity committed to the lock
    pub liquidity: U256,
    /// Lock start time (seconds)
    pub start_time: u64,
    /// Lock end time (seconds)
    pub end_time: u64,
    /// Farm boost multiplier at lock time (1e18 scale)
    pub multiplier: U256,
}

impl LockedPosition {
    /// An expired lock can be withdrawn or relocked but no longer added to.
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.end_time
    }
}

/// Per-reward-token emission schedule state.
#[odra::odra_type]
#[derive(Copy, Default)]
pub struct RewardData {
    /// Emission rate, tokens per second
    pub reward_rate: U256,
    /// End of the current emission period (seconds)
    pub period_finish: u64,
    /// Last global checkpoint time (seconds)
    pub last_update_time: u64,
    /// Cumulative reward per staked token, 1e18 scale
    pub reward_per_token_stored: U256,
}
