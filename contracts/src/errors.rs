//! Protocol error definitions.

use odra::prelude::*;

/// Liquid locker protocol errors
#[odra::odra_error]
pub enum LockerError {
    // Authorization errors (1xx)
    NotOwner = 100,
    NotPegDefender = 101,
    NotMinter = 102,
    NotRewardDistributor = 103,
    NotMigrator = 104,
    NotOperator = 105,

    // Balance errors (2xx)
    InsufficientLiquidity = 200,
    InsufficientBalance = 201,
    InsufficientStake = 202,

    // Slippage errors (3xx)
    Slippage = 300,

    // Configuration errors (4xx)
    InvalidRatio = 400,
    LockTimeOutOfBounds = 401,
    SlippageOutOfBounds = 402,
    AddressNotSet = 403,
    InvalidAmount = 404,

    // Lock / reward state errors (5xx)
    NothingToWithdraw = 500,
    LockNotExpired = 501,
    LockExpired = 502,
    UnknownToken = 503,
    UnknownRewardToken = 504,
    NoReward = 505,
    RewardTokenExists = 506,
}

impl LockerError {
    pub const fn message(&self) -> &'static str {
        match self {
            // Authorization
            LockerError::NotOwner => "caller is not the owner",
            LockerError::NotPegDefender => "caller is not the peg defender",
            LockerError::NotMinter => "caller is not a minter",
            LockerError::NotRewardDistributor => "caller is not the reward distributor",
            LockerError::NotMigrator => "caller is not the migrator",
            LockerError::NotOperator => "caller is not the operator",

            // Balances
            LockerError::InsufficientLiquidity => "not enough liquidity",
            LockerError::InsufficientBalance => "not enough tokens",
            LockerError::InsufficientStake => "amount exceeds staked balance",

            // Slippage
            LockerError::Slippage => "exchange resulted in fewer coins than expected",

            // Configuration
            LockerError::InvalidRatio => "ratio numerator exceeds denominator or denominator is zero",
            LockerError::LockTimeOutOfBounds => "farm lock duration outside protocol bounds",
            LockerError::SlippageOutOfBounds => "slippage tolerance exceeds 100% net of pool fee",
            LockerError::AddressNotSet => "required address not configured",
            LockerError::InvalidAmount => "amount must be non-zero",

            // State
            LockerError::NothingToWithdraw => "nothing to withdraw",
            LockerError::LockNotExpired => "lock has not expired yet",
            LockerError::LockExpired => "lock expired; withdraw and relock first",
            LockerError::UnknownToken => "token is not one of the pool coins",
            LockerError::UnknownRewardToken => "unknown reward token",
            LockerError::NoReward => "no reward",
            LockerError::RewardTokenExists => "reward token already exists",
        }
    }
}

impl core::fmt::Display for LockerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}
