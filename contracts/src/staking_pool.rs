//! Staking Pool Contract
//!
//! Multi-reward, time-weighted staking ledger for the receipt token.
//!
//! Key mechanics:
//! - Users stake receipt tokens; rewards stream at a fixed rate per token
//! - Accounting is pull-based: every balance-mutating call checkpoints the
//!   global reward-per-token and the caller's settled rewards first, so the
//!   cost of an operation is independent of the staker count
//! - New reward notifications fold any undistributed remainder of the
//!   current period into a fresh period of `REWARD_DURATION`
//! - Stake migration to a successor pool settles and pays pending rewards
//!   in the same operation, so nothing is stranded on the old pool

use odra::prelude::*;
use odra::casper_types::{runtime_args, U256};
use odra::CallDef;
use crate::accrual;
use crate::errors::LockerError;
use crate::types::RewardData;

/// Emission period for each reward notification (7 days)
pub const REWARD_DURATION: u64 = 604_800;

/// Receipt tokens staked into the pool
#[odra::event]
pub struct Staked {
    /// Account credited with the stake
    pub account: Address,
    /// Amount staked
    pub amount: U256,
}

/// Receipt tokens withdrawn from the pool
#[odra::event]
pub struct Withdrawn {
    /// Account debited
    pub account: Address,
    /// Amount withdrawn
    pub amount: U256,
}

/// Accrued rewards paid out to an account
#[odra::event]
pub struct RewardPaid {
    /// Account the rewards accrued to
    pub account: Address,
    /// Reward token
    pub token: Address,
    /// Amount paid
    pub amount: U256,
}

/// A reward notification started or extended an emission period
#[odra::event]
pub struct RewardAdded {
    /// Reward token
    pub token: Address,
    /// Newly notified amount (excludes rolled-over remainder)
    pub amount: U256,
}

/// Migrator role assigned
#[odra::event]
pub struct MigratorSet {
    /// New migrator (successor pool)
    pub migrator: Address,
}

/// Staking Pool Contract
#[odra::module]
pub struct StakingPool {
    /// Contract owner
    owner: Var<Address>,
    /// Receipt token being staked
    staking_token: Var<Address>,
    /// Only address allowed to notify rewards
    reward_distributor: Var<Address>,
    /// Successor pool allowed to pull stakes out (migration)
    migrator: Var<Option<Address>>,
    /// Configured reward tokens, in registration order
    reward_tokens: Var<Vec<Address>>,
    /// Reward-token membership
    is_reward: Mapping<Address, bool>,
    /// Per-token emission schedule state
    reward_data: Mapping<Address, RewardData>,
    /// Total staked supply
    total_supply: Var<U256>,
    /// Per-account staked balance
    balances: Mapping<Address, U256>,
    /// (account, token) -> reward-per-token snapshot at last settlement
    user_reward_per_token_paid: Mapping<(Address, Address), U256>,
    /// (account, token) -> settled-but-unclaimed rewards
    claimable: Mapping<(Address, Address), U256>,
}

#[odra::module]
impl StakingPool {
    /// Initialize the pool; the deployer becomes owner.
    pub fn init(&mut self, staking_token: Address, reward_distributor: Address) {
        self.owner.set(self.env().caller());
        self.staking_token.set(staking_token);
        self.reward_distributor.set(reward_distributor);
        self.reward_tokens.set(Vec::new());
        self.total_supply.set(U256::zero());
        self.migrator.set(None);
    }

    // ========== Staking Functions ==========

    /// Stake receipt tokens. Caller must have approved the pool.
    pub fn stake(&mut self, amount: U256) {
        let caller = self.env().caller();
        self.pull_staking_token(caller, amount);
        self.apply_stake(caller, amount);
    }

    /// Stake receipt tokens pulled from the caller, credited to `account`.
    pub fn stake_for(&mut self, account: Address, amount: U256) {
        let caller = self.env().caller();
        self.pull_staking_token(caller, amount);
        self.apply_stake(account, amount);
    }

    /// Stake the caller's entire receipt token balance.
    pub fn stake_all(&mut self) {
        let caller = self.env().caller();
        let amount = self.token_balance_of(self.staking_token_address(), caller);
        self.pull_staking_token(caller, amount);
        self.apply_stake(caller, amount);
    }

    /// Withdraw staked receipt tokens; optionally claim pending rewards.
    pub fn withdraw(&mut self, amount: U256, claim: bool) {
        let caller = self.env().caller();
        self.apply_withdraw(caller, caller, amount);
        if claim {
            self.pay_rewards(caller);
        }
    }

    /// Withdraw the caller's full stake; optionally claim pending rewards.
    pub fn withdraw_all(&mut self, claim: bool) {
        let caller = self.env().caller();
        let amount = self.balances.get(&caller).unwrap_or(U256::zero());
        self.apply_withdraw(caller, caller, amount);
        if claim {
            self.pay_rewards(caller);
        }
    }

    /// Settle and pay out all accrued rewards for `account`.
    pub fn get_rewards(&mut self, account: Address) {
        self.checkpoint(Some(account));
        self.pay_rewards(account);
    }

    // ========== Reward Notification ==========

    /// Start (or extend) the emission of `amount` of `token` over
    /// `REWARD_DURATION`. Reward-distributor only; the tokens must already
    /// have been transferred to the pool.
    pub fn distribute(&mut self, token: Address, amount: U256) {
        if self.reward_distributor.get() != Some(self.env().caller()) {
            self.env().revert(LockerError::NotRewardDistributor);
        }
        if !self.is_reward_token(token) {
            self.env().revert(LockerError::UnknownRewardToken);
        }
        if amount.is_zero() {
            self.env().revert(LockerError::NoReward);
        }

        self.checkpoint(None);

        let now = self.env().get_block_time();
        let mut data = self.reward_data.get(&token).unwrap_or_default();
        data.reward_rate = accrual::rollover_rate(amount, &data, now, REWARD_DURATION);
        data.last_update_time = now;
        data.period_finish = now + REWARD_DURATION;
        self.reward_data.set(&token, data);

        self.env().emit_event(RewardAdded { token, amount });
    }

    // ========== Migration ==========

    /// Pull `amount` of `staker`'s stake out to the caller (the successor
    /// pool). Migrator only. Pending rewards are settled and paid directly
    /// to the staker so nothing remains owed here.
    pub fn migrate_withdraw(&mut self, staker: Address, amount: U256) {
        let caller = self.env().caller();
        if self.migrator.get().flatten() != Some(caller) {
            self.env().revert(LockerError::NotMigrator);
        }

        self.apply_withdraw(staker, caller, amount);
        self.pay_rewards(staker);
    }

    /// Migrate `amount` of the caller's stake from `old_pool` into this
    /// pool. This pool must be set as the old pool's migrator.
    pub fn migrate_stake(&mut self, old_pool: Address, amount: U256) {
        let caller = self.env().caller();

        let args = runtime_args! {
            "staker" => caller,
            "amount" => amount,
        };
        self.env()
            .call_contract::<()>(old_pool, CallDef::new("migrate_withdraw", true, args));

        self.apply_stake(caller, amount);
    }

    // ========== Query Functions ==========

    /// Cumulative reward per staked token at the current block time.
    pub fn reward_per_token(&self, token: Address) -> U256 {
        let data = self.reward_data.get(&token).unwrap_or_default();
        let total = self.total_supply.get().unwrap_or(U256::zero());
        accrual::reward_per_token(&data, total, self.env().get_block_time())
    }

    /// Rewards accrued and not yet paid to `account` for `token`.
    pub fn earned(&self, account: Address, token: Address) -> U256 {
        let balance = self.balances.get(&account).unwrap_or(U256::zero());
        let paid = self
            .user_reward_per_token_paid
            .get(&(account, token))
            .unwrap_or(U256::zero());
        let settled = self.claimable.get(&(account, token)).unwrap_or(U256::zero());
        accrual::earned(balance, self.reward_per_token(token), paid, settled)
    }

    /// Alias of `earned`, kept as the claim-preview entry point.
    pub fn claimable_rewards(&self, account: Address, token: Address) -> U256 {
        self.earned(account, token)
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).unwrap_or(U256::zero())
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply.get().unwrap_or(U256::zero())
    }

    pub fn reward_tokens(&self) -> Vec<Address> {
        self.reward_tokens.get().unwrap_or_default()
    }

    pub fn is_reward_token(&self, token: Address) -> bool {
        self.is_reward.get(&token).unwrap_or(false)
    }

    pub fn reward_data(&self, token: Address) -> RewardData {
        self.reward_data.get(&token).unwrap_or_default()
    }

    pub fn migrator(&self) -> Option<Address> {
        self.migrator.get().flatten()
    }

    // ========== Admin Functions ==========

    /// Register a reward token (owner only). Duplicate registration fails.
    pub fn add_reward_token(&mut self, token: Address) {
        self.require_owner();
        if self.is_reward_token(token) {
            self.env().revert(LockerError::RewardTokenExists);
        }

        let mut tokens = self.reward_tokens.get().unwrap_or_default();
        tokens.push(token);
        self.reward_tokens.set(tokens);
        self.is_reward.set(&token, true);
        self.reward_data.set(&token, RewardData::default());
    }

    /// Set the reward distributor (owner only)
    pub fn set_reward_distributor(&mut self, distributor: Address) {
        self.require_owner();
        self.reward_distributor.set(distributor);
    }

    /// Set the migrator, the successor pool allowed to pull stakes (owner only)
    pub fn set_migrator(&mut self, migrator: Address) {
        self.require_owner();
        self.migrator.set(Some(migrator));
        self.env().emit_event(MigratorSet { migrator });
    }

    /// Transfer contract ownership (owner only)
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.require_owner();
        self.owner.set(new_owner);
    }

    pub fn staking_token(&self) -> Option<Address> {
        self.staking_token.get()
    }

    pub fn reward_distributor(&self) -> Option<Address> {
        self.reward_distributor.get()
    }

    // ========== Internal Functions ==========

    /// Update the global reward-per-token for every configured token, then
    /// settle `account`'s rewards against the new value. Must run before any
    /// balance mutation.
    fn checkpoint(&mut self, account: Option<Address>) {
        let now = self.env().get_block_time();
        let total = self.total_supply.get().unwrap_or(U256::zero());

        for token in self.reward_tokens.get().unwrap_or_default() {
            let mut data = self.reward_data.get(&token).unwrap_or_default();
            data.reward_per_token_stored = accrual::reward_per_token(&data, total, now);
            data.last_update_time = accrual::last_time_reward_applicable(&data, now);
            self.reward_data.set(&token, data);

            if let Some(acct) = account {
                let balance = self.balances.get(&acct).unwrap_or(U256::zero());
                let paid = self
                    .user_reward_per_token_paid
                    .get(&(acct, token))
                    .unwrap_or(U256::zero());
                let settled = self.claimable.get(&(acct, token)).unwrap_or(U256::zero());
                let owed =
                    accrual::earned(balance, data.reward_per_token_stored, paid, settled);
                self.claimable.set(&(acct, token), owed);
                self.user_reward_per_token_paid
                    .set(&(acct, token), data.reward_per_token_stored);
            }
        }
    }

    fn apply_stake(&mut self, account: Address, amount: U256) {
        if amount.is_zero() {
            self.env().revert(LockerError::InvalidAmount);
        }
        self.checkpoint(Some(account));

        let total = self.total_supply.get().unwrap_or(U256::zero());
        self.total_supply.set(total + amount);
        let balance = self.balances.get(&account).unwrap_or(U256::zero());
        self.balances.set(&account, balance + amount);

        self.env().emit_event(Staked { account, amount });
    }

    /// Debit `account`'s stake and send the receipt tokens to `recipient`.
    fn apply_withdraw(&mut self, account: Address, recipient: Address, amount: U256) {
        if amount.is_zero() {
            self.env().revert(LockerError::InvalidAmount);
        }
        self.checkpoint(Some(account));

        let balance = self.balances.get(&account).unwrap_or(U256::zero());
        if balance < amount {
            self.env().revert(LockerError::InsufficientStake);
        }

        self.balances.set(&account, balance - amount);
        let total = self.total_supply.get().unwrap_or(U256::zero());
        self.total_supply.set(total - amount);

        self.push_token(self.staking_token_address(), recipient, amount);

        self.env().emit_event(Withdrawn { account, amount });
    }

    /// Pay every settled reward to `account`. Assumes a fresh checkpoint.
    fn pay_rewards(&mut self, account: Address) {
        for token in self.reward_tokens.get().unwrap_or_default() {
            let amount = self.claimable.get(&(account, token)).unwrap_or(U256::zero());
            if amount.is_zero() {
                continue;
            }
            self.claimable.set(&(account, token), U256::zero());
            self.push_token(token, account, amount);
            self.env().emit_event(RewardPaid { account, token, amount });
        }
    }

    fn pull_staking_token(&mut self, from: Address, amount: U256) {
        let token = self.staking_token_address();
        let args = runtime_args! {
            "owner" => from,
            "recipient" => self.env().self_address(),
            "amount" => amount,
        };
        self.env()
            .call_contract::<bool>(token, CallDef::new("transfer_from", true, args));
    }

    fn push_token(&mut self, token: Address, recipient: Address, amount: U256) {
        let args = runtime_args! {
            "recipient" => recipient,
            "amount" => amount,
        };
        self.env()
            .call_contract::<bool>(token, CallDef::new("transfer", true, args));
    }

    fn token_balance_of(&self, token: Address, account: Address) -> U256 {
        let args = runtime_args! { "account" => account };
        self.env()
            .call_contract(token, CallDef::new("balance_of", false, args))
    }

    fn staking_token_address(&self) -> Address {
        match self.staking_token.get() {
            Some(addr) => addr,
            None => self.env().revert(LockerError::AddressNotSet),
        }
    }

    fn require_owner(&self) {
        if self.owner.get() != Some(self.env().caller()) {
            self.env().revert(LockerError::NotOwner);
        }
    }
}
