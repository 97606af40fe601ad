//! External collaborator interfaces.
//!
//! The market pool and the yield farm are consumed, not implemented: these
//! traits pin down exactly the surface this protocol relies on, nothing more.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::types::{LockId, LockedPosition};

/// CEP-18 token surface used for LP, receipt and reward tokens.
#[odra::external_contract]
pub trait Cep18Token {
    fn transfer(&mut self, recipient: Address, amount: U256) -> bool;
    fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool;
    fn approve(&mut self, spender: Address, amount: U256) -> bool;
    fn balance_of(&self, account: Address) -> U256;
    fn total_supply(&self) -> U256;
}

/// Two-coin market pool (receipt token vs. LP token).
///
/// The pool is itself a share token; `balance_of`/`total_supply` refer to
/// pool shares.
#[odra::external_contract]
pub trait MarketPool {
    fn coins(&self, i: u8) -> Address;
    fn get_balances(&self) -> Vec<U256>;
    fn get_virtual_price(&self) -> U256;
    fn get_dy(&self, i: u8, j: u8, dx: U256) -> U256;
    fn add_liquidity(&mut self, amounts: Vec<U256>, min_mint_amount: U256, receiver: Address)
        -> U256;
    fn remove_liquidity(&mut self, amount: U256, min_amounts: Vec<U256>, receiver: Address)
        -> Vec<U256>;
    fn remove_liquidity_imbalance(
        &mut self,
        amounts: Vec<U256>,
        max_burn_amount: U256,
        receiver: Address,
    ) -> U256;
    fn exchange(&mut self, i: u8, j: u8, dx: U256, min_dy: U256, receiver: Address) -> U256;
    fn balance_of(&self, account: Address) -> U256;
    fn total_supply(&self) -> U256;
}

/// External fixed-duration yield farm holding the consolidated lock.
#[odra::external_contract]
pub trait YieldFarm {
    fn stake_locked(&mut self, liquidity: U256, lock_secs: u64) -> LockId;
    fn lock_additional(&mut self, lock_id: LockId, liquidity: U256);
    fn withdraw_locked(&mut self, lock_id: LockId, destination: Address) -> U256;
    fn locked_stakes_of(&self, account: Address) -> Vec<LockedPosition>;
    fn locked_liquidity_of(&self, account: Address) -> U256;
    fn get_reward(&mut self, destination: Address) -> Vec<U256>;
    fn get_all_reward_tokens(&self) -> Vec<Address>;
    fn staker_toggle_migrator(&mut self, migrator: Address);
    fn staker_set_escrow_proxy(&mut self, proxy: Address);
}
