//! Receipt Token Contract
//!
//! CEP-18 compatible liquid token representing a depositor's backed claim on
//! locked + pooled liquidity. Minting and burning are restricted to an
//! allow-list of protocol contracts; the allow-list itself is owner-only.
//!
//! Which contracts hold mint rights (DepositRouter, LiquidityOps, both) is
//! deployment wiring, not a property of this contract.

use odra::prelude::*;
use odra::casper_types::{Key, U256};
use odra::casper_types::bytesrepr::ToBytes;
use crate::errors::LockerError;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

const CEP18_NAME_KEY: &str = "name";
const CEP18_SYMBOL_KEY: &str = "symbol";
const CEP18_DECIMALS_KEY: &str = "decimals";
const CEP18_TOTAL_SUPPLY_KEY: &str = "total_supply";
const CEP18_BALANCES_DICT: &str = "balances";
const CEP18_ALLOWANCES_DICT: &str = "allowances";

/// Receipt Token Contract
#[odra::module]
pub struct ReceiptToken {
    /// Token name
    name: Var<String>,
    /// Token symbol
    symbol: Var<String>,
    /// Decimals (18)
    decimals: Var<u8>,
    /// Total supply
    total_supply: Var<U256>,
    /// Balance mapping
    balances: Mapping<Address, U256>,
    /// Allowance mapping (owner -> spender -> amount)
    allowances: Mapping<(Address, Address), U256>,
    /// Contract owner (administers the minter allow-list)
    owner: Var<Address>,
    /// Minter allow-list
    minters: Mapping<Address, bool>,
}

#[odra::module]
impl ReceiptToken {
    /// Initialize the token; the deployer becomes owner.
    pub fn init(&mut self, name: String, symbol: String) {
        self.owner.set(self.env().caller());
        self.name.set(name.clone());
        self.symbol.set(symbol.clone());
        self.decimals.set(18);
        self.total_supply.set(U256::zero());
        self.env().init_dictionary(CEP18_BALANCES_DICT);
        self.env().init_dictionary(CEP18_ALLOWANCES_DICT);
        self.env().set_named_value(CEP18_NAME_KEY, name);
        self.env().set_named_value(CEP18_SYMBOL_KEY, symbol);
        self.env().set_named_value(CEP18_DECIMALS_KEY, 18u8);
        self.env().set_named_value(CEP18_TOTAL_SUPPLY_KEY, U256::zero());
    }

    // ========== CEP-18 Standard Functions ==========

    pub fn name(&self) -> String {
        self.name.get().unwrap_or_default()
    }

    pub fn symbol(&self) -> String {
        self.symbol.get().unwrap_or_default()
    }

    pub fn decimals(&self) -> u8 {
        self.decimals.get().unwrap_or(18)
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply.get().unwrap_or(U256::zero())
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).unwrap_or(U256::zero())
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances.get(&(owner, spender)).unwrap_or(U256::zero())
    }

    /// Transfer tokens to recipient
    pub fn transfer(&mut self, recipient: Address, amount: U256) -> bool {
        let sender = self.env().caller();
        self.transfer_internal(sender, recipient, amount);
        true
    }

    /// Approve spender to spend tokens
    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let owner = self.env().caller();
        self.approve_internal(owner, spender, amount);
        true
    }

    /// Transfer tokens from owner to recipient (requires allowance)
    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool {
        let spender = self.env().caller();

        let current_allowance = self.allowance(owner, spender);
        if current_allowance < amount {
            self.env().revert(LockerError::InsufficientBalance);
        }

        self.transfer_internal(owner, recipient, amount);
        self.approve_internal(owner, spender, current_allowance - amount);
        true
    }

    // ========== Protocol Functions (Minter Only) ==========

    /// Mint new tokens (only allow-listed minters)
    pub fn mint(&mut self, to: Address, amount: U256) {
        self.require_minter();

        self.write_balance(to, self.balance_of(to) + amount);
        self.write_total_supply(self.total_supply() + amount);
    }

    /// Burn tokens from caller
    pub fn burn(&mut self, amount: U256) {
        let caller = self.env().caller();
        self.burn_internal(caller, amount);
    }

    /// Burn tokens from an account (only allow-listed minters)
    pub fn burn_from(&mut self, from: Address, amount: U256) {
        self.require_minter();
        self.burn_internal(from, amount);
    }

    // ========== Admin Functions ==========

    /// Add a minter to the allow-list (owner only)
    pub fn add_minter(&mut self, minter: Address) {
        self.require_owner();
        self.minters.set(&minter, true);
    }

    /// Remove a minter from the allow-list (owner only)
    pub fn remove_minter(&mut self, minter: Address) {
        self.require_owner();
        self.minters.set(&minter, false);
    }

    pub fn is_minter(&self, account: Address) -> bool {
        self.minters.get(&account).unwrap_or(false)
    }

    /// Transfer contract ownership (owner only)
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.require_owner();
        self.owner.set(new_owner);
    }

    pub fn owner(&self) -> Option<Address> {
        self.owner.get()
    }

    // ========== Internal Functions ==========

    fn transfer_internal(&mut self, from: Address, to: Address, amount: U256) {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            self.env().revert(LockerError::InsufficientBalance);
        }

        self.write_balance(from, from_balance - amount);
        self.write_balance(to, self.balance_of(to) + amount);
    }

    fn approve_internal(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.set(&(owner, spender), amount);
        let key = Self::cep18_allowance_key(owner, spender);
        self.env()
            .set_dictionary_value(CEP18_ALLOWANCES_DICT, key.as_bytes(), amount);
    }

    fn burn_internal(&mut self, from: Address, amount: U256) {
        let balance = self.balance_of(from);
        if balance < amount {
            self.env().revert(LockerError::InsufficientBalance);
        }

        self.write_balance(from, balance - amount);
        self.write_total_supply(self.total_supply() - amount);
    }

    /// Writes both the odra mapping and the CEP-18 dictionary so external
    /// CEP-18 tooling can read balances.
    fn write_balance(&mut self, account: Address, amount: U256) {
        self.balances.set(&account, amount);
        let key = Self::cep18_balance_key(account);
        self.env()
            .set_dictionary_value(CEP18_BALANCES_DICT, key.as_bytes(), amount);
    }

    fn write_total_supply(&mut self, amount: U256) {
        self.total_supply.set(amount);
        self.env().set_named_value(CEP18_TOTAL_SUPPLY_KEY, amount);
    }

    fn cep18_balance_key(account: Address) -> String {
        let key = Key::from(account);
        BASE64_STANDARD.encode(key.to_bytes().unwrap_or_default())
    }

    fn cep18_allowance_key(owner: Address, spender: Address) -> String {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&Key::from(owner).to_bytes().unwrap_or_default());
        bytes.extend_from_slice(&Key::from(spender).to_bytes().unwrap_or_default());
        BASE64_STANDARD.encode(bytes)
    }

    fn require_minter(&self) {
        if !self.is_minter(self.env().caller()) {
            self.env().revert(LockerError::NotMinter);
        }
    }

    fn require_owner(&self) {
        if self.owner.get() != Some(self.env().caller()) {
            self.env().revert(LockerError::NotOwner);
        }
    }
}
