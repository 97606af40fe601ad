//! Mock collaborator contracts for integration tests.
//!
//! These stand in for the two external systems the protocol consumes: the
//! two-coin market pool and the fixed-duration yield farm. They implement
//! exactly the entry points declared in `interfaces`, with deliberately
//! simple internals:
//!
//! - The pool quotes a constant-product swap (`dy = bal_j * dx / (bal_i +
//!   dx)`), which reproduces above-parity and below-parity pricing when one
//!   side is over-supplied, and mints shares proportionally to deposits.
//!   Minimum-output arguments are recorded but not enforced, so tests
//!   observe the protocol's own slippage errors rather than the mock's.
//! - The farm keeps per-staker lock records (zeroed in place on withdrawal,
//!   the way the real farm leaves tombstones) and pays out test-injected
//!   pending rewards.

use odra::prelude::*;
use odra::casper_types::{runtime_args, U256};
use odra::CallDef;
use liquid_locker_contracts::types::{LockId, LockedPosition};

use liquid_locker_contracts::accrual::PRECISION;

/// Mock-internal failures
#[odra::odra_error]
pub enum MockError {
    InsufficientShares = 1,
    UnknownCoin = 2,
    UnknownLock = 3,
    StakeStillLocked = 4,
    NotLockOwner = 5,
}

// ========== Market Pool ==========

/// Two-coin pool that is itself a share token.
#[odra::module]
pub struct MockMarketPool {
    coin0: Var<Address>,
    coin1: Var<Address>,
    bal0: Var<U256>,
    bal1: Var<U256>,
    share_total: Var<U256>,
    share_balances: Mapping<Address, U256>,
}

#[odra::module]
impl MockMarketPool {
    pub fn init(&mut self, coin0: Address, coin1: Address) {
        self.coin0.set(coin0);
        self.coin1.set(coin1);
        self.bal0.set(U256::zero());
        self.bal1.set(U256::zero());
        self.share_total.set(U256::zero());
    }

    pub fn coins(&self, i: u8) -> Address {
        match i {
            0 => self.coin0.get().unwrap(),
            1 => self.coin1.get().unwrap(),
            _ => self.env().revert(MockError::UnknownCoin),
        }
    }

    pub fn get_balances(&self) -> Vec<U256> {
        Vec::from([self.bal0(), self.bal1()])
    }

    pub fn get_virtual_price(&self) -> U256 {
        let total = self.share_total();
        if total.is_zero() {
            return U256::from(PRECISION);
        }
        (self.bal0() + self.bal1()) * U256::from(PRECISION) / total
    }

    pub fn get_dy(&self, i: u8, j: u8, dx: U256) -> U256 {
        let (bal_i, bal_j) = (self.coin_balance(i), self.coin_balance(j));
        bal_j * dx / (bal_i + dx)
    }

    pub fn add_liquidity(
        &mut self,
        amounts: Vec<U256>,
        min_mint_amount: U256,
        receiver: Address,
    ) -> U256 {
        let _ = min_mint_amount;
        let caller = self.env().caller();
        let this = self.env().self_address();

        self.pull(self.coins(0), caller, this, amounts[0]);
        self.pull(self.coins(1), caller, this, amounts[1]);

        let deposited = amounts[0] + amounts[1];
        let total = self.share_total();
        let minted = if total.is_zero() {
            deposited
        } else {
            deposited * total / (self.bal0() + self.bal1())
        };

        self.bal0.set(self.bal0() + amounts[0]);
        self.bal1.set(self.bal1() + amounts[1]);
        self.share_total.set(total + minted);
        let shares = self.share_balances.get(&receiver).unwrap_or_default();
        self.share_balances.set(&receiver, shares + minted);

        minted
    }

    pub fn remove_liquidity(
        &mut self,
        amount: U256,
        min_amounts: Vec<U256>,
        receiver: Address,
    ) -> Vec<U256> {
        let _ = min_amounts;
        let caller = self.env().caller();
        let shares = self.share_balances.get(&caller).unwrap_or_default();
        if shares < amount {
            self.env().revert(MockError::InsufficientShares);
        }

        let total = self.share_total();
        let out0 = self.bal0() * amount / total;
        let out1 = self.bal1() * amount / total;

        self.share_balances.set(&caller, shares - amount);
        self.share_total.set(total - amount);
        self.bal0.set(self.bal0() - out0);
        self.bal1.set(self.bal1() - out1);

        self.push(self.coins(0), receiver, out0);
        self.push(self.coins(1), receiver, out1);

        Vec::from([out0, out1])
    }

    pub fn remove_liquidity_imbalance(
        &mut self,
        amounts: Vec<U256>,
        max_burn_amount: U256,
        receiver: Address,
    ) -> U256 {
        let _ = max_burn_amount;
        let caller = self.env().caller();
        let total = self.share_total();
        let burned = (amounts[0] + amounts[1]) * total / (self.bal0() + self.bal1());

        let shares = self.share_balances.get(&caller).unwrap_or_default();
        if shares < burned {
            self.env().revert(MockError::InsufficientShares);
        }

        self.share_balances.set(&caller, shares - burned);
        self.share_total.set(total - burned);
        self.bal0.set(self.bal0() - amounts[0]);
        self.bal1.set(self.bal1() - amounts[1]);

        self.push(self.coins(0), receiver, amounts[0]);
        self.push(self.coins(1), receiver, amounts[1]);

        burned
    }

    pub fn exchange(
        &mut self,
        i: u8,
        j: u8,
        dx: U256,
        min_dy: U256,
        receiver: Address,
    ) -> U256 {
        let _ = min_dy;
        let caller = self.env().caller();
        let this = self.env().self_address();

        let dy = self.get_dy(i, j, dx);

        self.pull(self.coins(i), caller, this, dx);
        self.set_coin_balance(i, self.coin_balance(i) + dx);
        self.set_coin_balance(j, self.coin_balance(j) - dy);
        self.push(self.coins(j), receiver, dy);

        dy
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.share_balances.get(&account).unwrap_or_default()
    }

    pub fn total_supply(&self) -> U256 {
        self.share_total()
    }

    pub fn transfer(&mut self, recipient: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        let shares = self.share_balances.get(&caller).unwrap_or_default();
        if shares < amount {
            self.env().revert(MockError::InsufficientShares);
        }
        self.share_balances.set(&caller, shares - amount);
        let to = self.share_balances.get(&recipient).unwrap_or_default();
        self.share_balances.set(&recipient, to + amount);
        true
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let _ = (spender, amount);
        true
    }

    fn bal0(&self) -> U256 {
        self.bal0.get().unwrap_or_default()
    }

    fn bal1(&self) -> U256 {
        self.bal1.get().unwrap_or_default()
    }

    fn share_total(&self) -> U256 {
        self.share_total.get().unwrap_or_default()
    }

    fn coin_balance(&self, i: u8) -> U256 {
        match i {
            0 => self.bal0(),
            1 => self.bal1(),
            _ => self.env().revert(MockError::UnknownCoin),
        }
    }

    fn set_coin_balance(&mut self, i: u8, amount: U256) {
        match i {
            0 => self.bal0.set(amount),
            1 => self.bal1.set(amount),
            _ => self.env().revert(MockError::UnknownCoin),
        }
    }

    fn pull(&mut self, token: Address, from: Address, to: Address, amount: U256) {
        if amount.is_zero() {
            return;
        }
        let args = runtime_args! {
            "owner" => from,
            "recipient" => to,
            "amount" => amount,
        };
        self.env()
            .call_contract::<bool>(token, CallDef::new("transfer_from", true, args));
    }

    fn push(&mut self, token: Address, to: Address, amount: U256) {
        if amount.is_zero() {
            return;
        }
        let args = runtime_args! {
            "recipient" => to,
            "amount" => amount,
        };
        self.env()
            .call_contract::<bool>(token, CallDef::new("transfer", true, args));
    }
}

// ========== Yield Farm ==========

/// Fixed-duration locking farm with test-injected rewards.
#[odra::module]
pub struct MockYieldFarm {
    lp_token: Var<Address>,
    reward_tokens: Var<Vec<Address>>,
    next_lock_id: Var<LockId>,
    /// (staker, slot) -> lock record; withdrawn locks stay as zeroed slots
    stakes: Mapping<(Address, u64), LockedPosition>,
    stake_counts: Mapping<Address, u64>,
    lock_owners: Mapping<LockId, Address>,
    locked_liquidity: Mapping<Address, U256>,
    /// Pending rewards per staker, aligned with `reward_tokens`
    pending: Mapping<Address, Vec<U256>>,
    migrator_toggles: Mapping<(Address, Address), bool>,
    escrow_proxies: Mapping<Address, Address>,
}

#[odra::module]
impl MockYieldFarm {
    pub fn init(&mut self, lp_token: Address) {
        self.lp_token.set(lp_token);
        self.reward_tokens.set(Vec::new());
        self.next_lock_id.set(1);
    }

    // ===== Test hooks =====

    pub fn set_reward_tokens(&mut self, tokens: Vec<Address>) {
        self.reward_tokens.set(tokens);
    }

    pub fn set_pending_reward(&mut self, staker: Address, amounts: Vec<U256>) {
        self.pending.set(&staker, amounts);
    }

    // ===== Farm surface =====

    pub fn stake_locked(&mut self, liquidity: U256, lock_secs: u64) -> LockId {
        let staker = self.env().caller();
        let now = self.env().get_block_time();

        self.pull_lp(staker, liquidity);

        let lock_id = self.next_lock_id.get().unwrap_or(1);
        self.next_lock_id.set(lock_id + 1);

        let record = LockedPosition {
            lock_id,
            liquidity,
            start_time: now,
            end_time: now + lock_secs,
            multiplier: self.lock_multiplier(lock_secs),
        };

        let count = self.stake_counts.get(&staker).unwrap_or_default();
        self.stakes.set(&(staker, count), record);
        self.stake_counts.set(&staker, count + 1);
        self.lock_owners.set(&lock_id, staker);

        let locked = self.locked_liquidity.get(&staker).unwrap_or_default();
        self.locked_liquidity.set(&staker, locked + liquidity);

        lock_id
    }

    pub fn lock_additional(&mut self, lock_id: LockId, liquidity: U256) {
        let staker = self.env().caller();
        let (slot, mut record) = self.find_lock(staker, lock_id);

        self.pull_lp(staker, liquidity);

        record.liquidity = record.liquidity + liquidity;
        self.stakes.set(&(staker, slot), record);

        let locked = self.locked_liquidity.get(&staker).unwrap_or_default();
        self.locked_liquidity.set(&staker, locked + liquidity);
    }

    pub fn withdraw_locked(&mut self, lock_id: LockId, destination: Address) -> U256 {
        let staker = self.env().caller();
        let (slot, record) = self.find_lock(staker, lock_id);

        let now = self.env().get_block_time();
        if now < record.end_time {
            self.env().revert(MockError::StakeStillLocked);
        }

        let amount = record.liquidity;
        self.stakes.set(&(staker, slot), LockedPosition::default());

        let locked = self.locked_liquidity.get(&staker).unwrap_or_default();
        self.locked_liquidity.set(&staker, locked - amount);

        self.push_token(self.lp_token.get().unwrap(), destination, amount);
        amount
    }

    pub fn locked_stakes_of(&self, account: Address) -> Vec<LockedPosition> {
        let count = self.stake_counts.get(&account).unwrap_or_default();
        let mut stakes = Vec::new();
        for slot in 0..count {
            stakes.push(self.stakes.get(&(account, slot)).unwrap_or_default());
        }
        stakes
    }

    pub fn locked_liquidity_of(&self, account: Address) -> U256 {
        self.locked_liquidity.get(&account).unwrap_or_default()
    }

    pub fn get_reward(&mut self, destination: Address) -> Vec<U256> {
        let staker = self.env().caller();
        let tokens = self.reward_tokens.get().unwrap_or_default();

        let mut amounts = self.pending.get(&staker).unwrap_or_default();
        amounts.resize(tokens.len(), U256::zero());

        for (token, amount) in tokens.iter().zip(amounts.iter()) {
            if !amount.is_zero() {
                self.push_token(*token, destination, *amount);
            }
        }

        let mut cleared = Vec::new();
        cleared.resize(tokens.len(), U256::zero());
        self.pending.set(&staker, cleared);

        amounts
    }

    pub fn get_all_reward_tokens(&self) -> Vec<Address> {
        self.reward_tokens.get().unwrap_or_default()
    }

    pub fn staker_toggle_migrator(&mut self, migrator: Address) {
        let staker = self.env().caller();
        let current = self
            .migrator_toggles
            .get(&(staker, migrator))
            .unwrap_or_default();
        self.migrator_toggles.set(&(staker, migrator), !current);
    }

    pub fn staker_set_escrow_proxy(&mut self, proxy: Address) {
        let staker = self.env().caller();
        self.escrow_proxies.set(&staker, proxy);
    }

    // ===== Test views =====

    pub fn migrator_toggled(&self, staker: Address, migrator: Address) -> bool {
        self.migrator_toggles
            .get(&(staker, migrator))
            .unwrap_or_default()
    }

    pub fn escrow_proxy_of(&self, staker: Address) -> Option<Address> {
        self.escrow_proxies.get(&staker)
    }

    // ===== Internals =====

    /// Max-duration locks earn 2x; shorter locks scale linearly above 1x.
    fn lock_multiplier(&self, lock_secs: u64) -> U256 {
        const MAX_LOCK_SECS: u64 = 94_608_000;
        let capped = core::cmp::min(lock_secs, MAX_LOCK_SECS);
        U256::from(PRECISION)
            + U256::from(PRECISION) * U256::from(capped) / U256::from(MAX_LOCK_SECS)
    }

    fn find_lock(&self, staker: Address, lock_id: LockId) -> (u64, LockedPosition) {
        if self.lock_owners.get(&lock_id) != Some(staker) {
            self.env().revert(MockError::NotLockOwner);
        }
        let count = self.stake_counts.get(&staker).unwrap_or_default();
        for slot in 0..count {
            let record = self.stakes.get(&(staker, slot)).unwrap_or_default();
            if record.lock_id == lock_id && !record.liquidity.is_zero() {
                return (slot, record);
            }
        }
        self.env().revert(MockError::UnknownLock)
    }

    fn pull_lp(&mut self, from: Address, amount: U256) {
        let token = self.lp_token.get().unwrap();
        let args = runtime_args! {
            "owner" => from,
            "recipient" => self.env().self_address(),
            "amount" => amount,
        };
        self.env()
            .call_contract::<bool>(token, CallDef::new("transfer_from", true, args));
    }

    fn push_token(&mut self, token: Address, to: Address, amount: U256) {
        let args = runtime_args! {
            "recipient" => to,
            "amount" => amount,
        };
        self.env()
            .call_contract::<bool>(token, CallDef::new("transfer", true, args));
    }
}
