//! Liquid LP Locker Contracts
//!
//! Casper-native liquid-locker protocol: pooled LP deposits are split
//! between a fixed-duration external yield-farm lock and a two-coin market
//! pool, a liquid receipt token represents the backed claim, and harvested
//! farm yield streams to receipt-token stakers.
//!
//! ## Architecture
//!
//! - **DepositRouter**: User entry point; 1:1 mint path and AMM buy path
//! - **LiquidityOps**: Custody, deterministic split, single consolidated
//!   farm lock, harvest, peg defense
//! - **ReceiptToken**: CEP-18 token with a minter allow-list
//! - **StakingPool**: Multi-reward streamed staking of the receipt token
//! - **RewardsDistributor**: Forwards harvested yield into the pool's
//!   emission schedule
//!
//! The market pool and the yield farm are external collaborators; only the
//! narrow surface in `interfaces` is consumed.

#![cfg_attr(target_arch = "wasm32", no_std)]

#[cfg(target_arch = "wasm32")]
extern crate alloc;

// Re-export odra for downstream usage
pub use odra;

// Core module declarations
pub mod types;
pub mod errors;
pub mod interfaces;
pub mod accrual;

// Contract modules
pub mod receipt_token;
pub mod staking_pool;
pub mod rewards_distributor;
pub mod liquidity_ops;
pub mod deposit_router;
