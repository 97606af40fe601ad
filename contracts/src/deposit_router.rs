//! Deposit Router Contract
//!
//! User-facing entry point. A deposit either mints receipt tokens 1:1
//! against LP forwarded to LiquidityOps custody (`lock`), or buys receipt
//! tokens on the market pool when they trade above parity (`buy_from_amm`).
//! Either path can stake the proceeds directly into the staking pool.

use odra::prelude::*;
use odra::casper_types::{runtime_args, U256};
use odra::CallDef;
use crate::errors::LockerError;

/// LP accepted and receipt tokens minted 1:1
#[odra::event]
pub struct Locked {
    /// Depositor
    pub account: Address,
    /// LP amount deposited
    pub amount: U256,
}

/// Receipt tokens bought on the market pool instead of minted
#[odra::event]
pub struct Bought {
    /// Depositor
    pub account: Address,
    /// LP paid in
    pub lp_amount: U256,
    /// Receipt tokens received
    pub receipt_amount: U256,
}

/// LiquidityOps target updated
#[odra::event]
pub struct LiquidityOpsSet {
    /// New custody target
    pub liquidity_ops: Address,
}

/// Staking pool target updated
#[odra::event]
pub struct StakingPoolSet {
    /// New staking pool
    pub staking_pool: Address,
}

/// Stray tokens recovered
#[odra::event]
pub struct TokenRecovered {
    /// Recipient
    pub to: Address,
    /// Amount recovered
    pub amount: U256,
}

/// Deposit Router Contract
#[odra::module]
pub struct DepositRouter {
    /// Contract owner
    owner: Var<Address>,
    /// Custody target for deposited LP
    liquidity_ops: Var<Address>,
    /// LP token accepted from depositors
    lp_token: Var<Address>,
    /// Receipt token (this contract needs mint rights)
    receipt_token: Var<Address>,
    /// Two-coin market pool (receipt vs. LP)
    market_pool: Var<Address>,
    /// Staking pool for the auto-stake path
    staking_pool: Var<Address>,
}

#[odra::module]
impl DepositRouter {
    /// Initialize the router; the deployer becomes owner.
    pub fn init(
        &mut self,
        liquidity_ops: Address,
        lp_token: Address,
        receipt_token: Address,
        market_pool: Address,
        staking_pool: Address,
    ) {
        self.owner.set(self.env().caller());
        self.liquidity_ops.set(liquidity_ops);
        self.lp_token.set(lp_token);
        self.receipt_token.set(receipt_token);
        self.market_pool.set(market_pool);
        self.staking_pool.set(staking_pool);
    }

    // ========== Deposit Paths ==========

    /// Pull `amount` LP from the caller into LiquidityOps custody and mint
    /// receipt tokens 1:1 — to the caller, or straight into the staking
    /// pool when `auto_stake` is set.
    pub fn lock(&mut self, amount: U256, auto_stake: bool) {
        if amount.is_zero() {
            self.env().revert(LockerError::InvalidAmount);
        }

        let caller = self.env().caller();
        let lp = self.lp_token_address();
        if self.token_balance_of(lp, caller) < amount {
            self.env().revert(LockerError::InsufficientBalance);
        }

        let ops = self.liquidity_ops_address();
        self.token_transfer_from(lp, caller, ops, amount);

        let receipt = self.receipt_token_address();
        if auto_stake {
            let this = self.env().self_address();
            self.receipt_mint(receipt, this, amount);
            self.stake_for(receipt, caller, amount);
        } else {
            self.receipt_mint(receipt, caller, amount);
        }

        self.env().emit_event(Locked {
            account: caller,
            amount,
        });
    }

    /// Swap `amount` LP for receipt tokens on the market pool. Worth taking
    /// when the receipt trades above parity; reverts on any output below
    /// `min_receipt_out` instead of falling back to a 1:1 mint.
    pub fn buy_from_amm(&mut self, amount: U256, auto_stake: bool, min_receipt_out: U256) {
        if amount.is_zero() {
            self.env().revert(LockerError::InvalidAmount);
        }

        let caller = self.env().caller();
        let lp = self.lp_token_address();
        if self.token_balance_of(lp, caller) < amount {
            self.env().revert(LockerError::InsufficientBalance);
        }

        let this = self.env().self_address();
        let pool = self.market_pool_address();
        self.token_transfer_from(lp, caller, this, amount);
        self.token_approve(lp, pool, amount);

        let (lp_idx, receipt_idx) = self.coin_indices();
        let receiver = if auto_stake { this } else { caller };
        let args = runtime_args! {
            "i" => lp_idx,
            "j" => receipt_idx,
            "dx" => amount,
            "min_dy" => min_receipt_out,
            "receiver" => receiver,
        };
        let bought: U256 = self
            .env()
            .call_contract(pool, CallDef::new("exchange", true, args));
        if bought < min_receipt_out {
            self.env().revert(LockerError::Slippage);
        }

        if auto_stake {
            let receipt = self.receipt_token_address();
            self.stake_for(receipt, caller, bought);
        }

        self.env().emit_event(Bought {
            account: caller,
            lp_amount: amount,
            receipt_amount: bought,
        });
    }

    /// The pool's current quote for swapping `amount` LP into receipt
    /// tokens. Callers use it to choose `min_receipt_out`.
    pub fn buy_from_amm_quote(&self, amount: U256) -> U256 {
        let pool = self.market_pool_address();
        let (lp_idx, receipt_idx) = self.coin_indices();
        let args = runtime_args! {
            "i" => lp_idx,
            "j" => receipt_idx,
            "dx" => amount,
        };
        self.env()
            .call_contract(pool, CallDef::new("get_dy", false, args))
    }

    // ========== Admin Functions ==========

    /// Retarget LiquidityOps custody (owner only)
    pub fn set_liquidity_ops(&mut self, liquidity_ops: Address) {
        self.require_owner();
        self.liquidity_ops.set(liquidity_ops);
        self.env().emit_event(LiquidityOpsSet { liquidity_ops });
    }

    /// Retarget the staking pool (owner only)
    pub fn set_staking_pool(&mut self, staking_pool: Address) {
        self.require_owner();
        self.staking_pool.set(staking_pool);
        self.env().emit_event(StakingPoolSet { staking_pool });
    }

    /// Transfer contract ownership (owner only)
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.require_owner();
        self.owner.set(new_owner);
    }

    /// Recover stray tokens (owner only)
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

    pub fn liquidity_ops(&self) -> Option<Address> {
        self.liquidity_ops.get()
    }

    pub fn staking_pool(&self) -> Option<Address> {
        self.staking_pool.get()
    }

    // ========== Internal Functions ==========

    /// (lp coin index, receipt coin index), read from the pool each time so
    /// the router carries no coin-order state.
    fn coin_indices(&self) -> (u8, u8) {
        let pool = self.market_pool_address();
        let args = runtime_args! { "i" => 0u8 };
        let coin0: Address = self
            .env()
            .call_contract(pool, CallDef::new("coins", false, args));
        if coin0 == self.receipt_token_address() {
            (1, 0)
        } else {
            (0, 1)
        }
    }

    /// Approve and stake `amount` of receipt held by the router on behalf
    /// of `account`.
    fn stake_for(&mut self, receipt: Address, account: Address, amount: U256) {
        let staking = self.staking_pool_address();
        self.token_approve(receipt, staking, amount);
        let args = runtime_args! {
            "account" => account,
            "amount" => amount,
        };
        self.env()
            .call_contract::<()>(staking, CallDef::new("stake_for", true, args));
    }

    fn receipt_mint(&mut self, receipt: Address, to: Address, amount: U256) {
        let args = runtime_args! { "to" => to, "amount" => amount };
        self.env()
            .call_contract::<()>(receipt, CallDef::new("mint", true, args));
    }

    fn token_transfer_from(&mut self, token: Address, from: Address, to: Address, amount: U256) {
        let args = runtime_args! {
            "owner" => from,
            "recipient" => to,
            "amount" => amount,
        };
        self.env()
            .call_contract::<bool>(token, CallDef::new("transfer_from", true, args));
    }

    fn token_approve(&mut self, token: Address, spender: Address, amount: U256) {
        let args = runtime_args! {
            "spender" => spender,
            "amount" => amount,
        };
        self.env()
            .call_contract::<bool>(token, CallDef::new("approve", true, args));
    }

    fn token_balance_of(&self, token: Address, account: Address) -> U256 {
        let args = runtime_args! { "account" => account };
        self.env()
            .call_contract(token, CallDef::new("balance_of", false, args))
    }

    fn liquidity_ops_address(&self) -> Address {
        match self.liquidity_ops.get() {
            Some(addr) => addr,
            None => self.env().revert(LockerError::AddressNotSet),
        }
    }

    fn lp_token_address(&self) -> Address {
        match self.lp_token.get() {
            Some(addr) => addr,
            None => self.env().revert(LockerError::AddressNotSet),
        }
    }

    fn receipt_token_address(&self) -> Address {
        match self.receipt_token.get() {
            Some(addr) => addr,
            None => self.env().revert(LockerError::AddressNotSet),
        }
    }

    fn market_pool_address(&self) -> Address {
        match self.market_pool.get() {
            Some(addr) => addr,
            None => self.env().revert(LockerError::AddressNotSet),
        }
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
}
