//! Rewards Distributor Contract
//!
//! Thin conduit between harvested yield and the staking pool's emission
//! schedule: whatever reward-token balance it holds is forwarded in full and
//! notified to the pool in one operation.

use odra::prelude::*;
use odra::casper_types::{runtime_args, U256};
use odra::CallDef;
use crate::errors::LockerError;

/// A reward balance was forwarded into the staking pool's schedule
#[odra::event]
pub struct RewardDistributed {
    /// Receiving staking pool
    pub staking_pool: Address,
    /// Reward token
    pub token: Address,
    /// Amount forwarded
    pub amount: U256,
}

/// Stray tokens recovered by the owner
#[odra::event]
pub struct TokenRecovered {
    /// Recipient
    pub to: Address,
    /// Amount recovered
    pub amount: U256,
}

/// Rewards Distributor Contract
#[odra::module]
pub struct RewardsDistributor {
    /// Contract owner
    owner: Var<Address>,
    /// Optional operator allowed to trigger distributions
    operator: Var<Option<Address>>,
    /// Target staking pool
    staking_pool: Var<Address>,
}

#[odra::module]
impl RewardsDistributor {
    /// Initialize the distributor; the deployer becomes owner.
    pub fn init(&mut self, staking_pool: Address) {
        self.owner.set(self.env().caller());
        self.staking_pool.set(staking_pool);
        self.operator.set(None);
    }

    /// Forward the full held balance of `token` into the staking pool and
    /// notify its emission schedule. Owner or operator only.
    pub fn distribute(&mut self, token: Address) {
        self.require_owner_or_operator();

        let pool = self.staking_pool_address();

        let known: bool = self.env().call_contract(
            pool,
            CallDef::new("is_reward_token", false, runtime_args! { "token" => token }),
        );
        if !known {
            self.env().revert(LockerError::UnknownRewardToken);
        }

        let amount = self.token_balance_of(token, self.env().self_address());
        if amount.is_zero() {
            self.env().revert(LockerError::NoReward);
        }

        // Fund first, then notify: the pool streams only what it holds.
        let transfer_args = runtime_args! {
            "recipient" => pool,
            "amount" => amount,
        };
        self.env()
            .call_contract::<bool>(token, CallDef::new("transfer", true, transfer_args));

        let notify_args = runtime_args! {
            "token" => token,
            "amount" => amount,
        };
        self.env()
            .call_contract::<()>(pool, CallDef::new("distribute", true, notify_args));

        self.env().emit_event(RewardDistributed {
            staking_pool: pool,
            token,
            amount,
        });
    }

    // ========== Admin Functions ==========

    /// Set the operator allowed to trigger distributions (owner only)
    pub fn set_operator(&mut self, operator: Address) {
        self.require_owner();
        self.operator.set(Some(operator));
    }

    /// Retarget the staking pool (owner only)
    pub fn set_staking_pool(&mut self, staking_pool: Address) {
        self.require_owner();
        self.staking_pool.set(staking_pool);
    }

    /// Transfer contract ownership, e.g. to a governance multisig (owner only)
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.require_owner();
        self.owner.set(new_owner);
    }

    /// Recover stray tokens sent to this contract (owner only)
    pub fn recover_token(&mut self, token: Address, to: Address, amount: U256) {
        self.require_owner();

        let held = self.token_balance_of(token, self.env().self_address());
        if held < amount {
            self.env().revert(LockerError::InsufficientBalance);
        }

        let args = runtime_args! {
            "recipient" => to,
            "amount" => amount,
        };
        self.env()
            .call_contract::<bool>(token, CallDef::new("transfer", true, args));

        self.env().emit_event(TokenRecovered { to, amount });
    }

    // ========== Query Functions ==========

    pub fn owner(&self) -> Option<Address> {
        self.owner.get()
    }

    pub fn operator(&self) -> Option<Address> {
        self.operator.get().flatten()
    }

    pub fn staking_pool(&self) -> Option<Address> {
        self.staking_pool.get()
    }

    // ========== Internal Functions ==========

    fn token_balance_of(&self, token: Address, account: Address) -> U256 {
        let args = runtime_args! { "account" => account };
        self.env()
            .call_contract(token, CallDef::new("balance_of", false, args))
    }

    fn staking_pool_address(&self) -> Address {
        match self.staking_pool.get() {
            Some(addr) => addr,
            None => self.env().revert(LockerError::AddressNotSet),
        }
    }

    fn require_owner(&self) {
        if self.owner.get() != Some(self.env().caller()) {
            self.env().revert(LockerError::NotOwner);
        }
    }

    fn require_owner_or_operator(&self) {
        let caller = self.env().caller();
        if self.owner.get() == Some(caller) {
            return;
        }
        if self.operator.get().flatten() == Some(caller) {
            return;
        }
        self.env().revert(LockerError::NotOperator);
    }
}
