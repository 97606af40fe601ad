//! Liquidity Ops Contract
//!
//! The position manager at the center of the protocol. It custodies
//! undeployed LP, deterministically splits each applied amount between the
//! external yield-farm lock and the market pool, maintains exactly one
//! consolidated farm lock over time, harvests and forwards farm yield, and
//! executes peg-defense trades.
//!
//! Lock lifecycle: no lock -> locked (first apply) -> locked (amount
//! increases while unexpired) -> expired -> relocked (withdraw_and_relock
//! zeroes the old record and creates exactly one new one).

use odra::prelude::*;
use odra::casper_types::{runtime_args, U256};
use odra::CallDef;
use crate::accrual;
use crate::errors::LockerError;
use crate::types::{LockId, LockedPosition, Ratio};

/// Protocol lower bound for the farm lock duration (1 day)
pub const MIN_FARM_LOCK_SECS: u64 = 86_400;

/// Protocol upper bound for the farm lock duration (3 years)
pub const MAX_FARM_LOCK_SECS: u64 = 94_608_000;

/// Default farm lock duration (7 days)
pub const DEFAULT_FARM_LOCK_SECS: u64 = 604_800;

/// Default pool-supply slippage tolerance (1%)
pub const DEFAULT_POOL_SLIPPAGE_BPS: u64 = 100;

/// Liquidity committed to the external farm lock
#[odra::event]
pub struct Locked {
    /// LP amount locked
    pub amount: U256,
}

/// Receipt + LP supplied to the market pool
#[odra::event]
pub struct LiquidityAdded {
    /// Receipt tokens minted and supplied
    pub receipt_amount: U256,
    /// LP tokens supplied
    pub lp_amount: U256,
    /// Pool share tokens received
    pub pool_tokens: U256,
}

/// Liquidity pulled back out of the market pool (peg defense)
#[odra::event]
pub struct LiquidityRemoved {
    /// Receipt tokens received and burned
    pub receipt_amount: U256,
    /// LP tokens returned to custody
    pub lp_amount: U256,
    /// Pool share tokens burned
    pub pool_tokens: U256,
}

/// Farm rewards pulled into contract custody
#[odra::event]
pub struct RewardClaimed {
    /// Claimed amounts, aligned with the farm's reward-token order
    pub amounts: Vec<U256>,
}

/// Held reward balance split between the fee collector and the distributor
#[odra::event]
pub struct RewardHarvested {
    /// Reward token
    pub token: Address,
    /// Amount forwarded to the rewards distributor
    pub amount: U256,
    /// Fee retained for the fee collector
    pub fee: U256,
}

/// Expired lock withdrawn and immediately recreated
#[odra::event]
pub struct WithdrawAndReLock {
    /// Old (zeroed) lock handle
    pub lock_id: LockId,
    /// Liquidity carried into the new lock
    pub liquidity: U256,
}

/// Stray tokens recovered
#[odra::event]
pub struct TokenRecovered {
    /// Recipient
    pub to: Address,
    /// Amount recovered
    pub amount: U256,
}

/// Liquidity Ops Contract
#[odra::module]
pub struct LiquidityOps {
    /// Contract owner
    owner: Var<Address>,
    /// Role allowed to execute bounded rebalancing trades
    peg_defender: Var<Option<Address>>,
    /// External yield farm
    yield_farm: Var<Address>,
    /// LP token under custody
    lp_token: Var<Address>,
    /// Receipt token (this contract needs mint rights)
    receipt_token: Var<Address>,
    /// Two-coin market pool (receipt vs. LP)
    market_pool: Var<Address>,
    /// Rewards distributor receiving the harvested remainder
    rewards_distributor: Var<Address>,
    /// Fee collector receiving the harvest fee cut
    fee_collector: Var<Option<Address>>,

    // === Allocation configuration ===
    /// Fraction of each applied amount routed to the farm lock
    lock_rate: Var<Ratio>,
    /// Fraction of harvested rewards retained as protocol fee
    fee_rate: Var<Ratio>,
    /// Slippage tolerance for pool supplies, basis points
    pool_slippage_bps: Var<u64>,
    /// Farm lock duration for new locks, seconds
    farm_lock_secs: Var<u64>,
    /// Farm reward tokens, synced from the farm
    reward_tokens: Var<Vec<Address>>,
    /// Whether pool coin 0 is the receipt token
    receipt_is_coin0: Var<bool>,

    // === Position state ===
    /// The single consolidated farm lock; None means no active lock
    active_lock: Var<Option<LockedPosition>>,
    /// Cumulative liquidity ever locked
    total_locked: Var<U256>,
    /// Cumulative liquidity ever pooled
    total_pooled: Var<U256>,
}

#[odra::module]
impl LiquidityOps {
    /// Initialize; the deployer becomes owner. Defaults: everything locked
    /// (100/100), no fee, 1% pool slippage, 7 day farm locks.
    pub fn init(
        &mut self,
        yield_farm: Address,
        lp_token: Address,
        receipt_token: Address,
        market_pool: Address,
        rewards_distributor: Address,
    ) {
        self.owner.set(self.env().caller());
        self.peg_defender.set(None);
        self.yield_farm.set(yield_farm);
        self.lp_token.set(lp_token);
        self.receipt_token.set(receipt_token);
        self.market_pool.set(market_pool);
        self.rewards_distributor.set(rewards_distributor);
        self.fee_collector.set(None);

        self.lock_rate.set(Ratio::new(100, 100));
        self.fee_rate.set(Ratio::new(0, 100));
        self.pool_slippage_bps.set(DEFAULT_POOL_SLIPPAGE_BPS);
        self.farm_lock_secs.set(DEFAULT_FARM_LOCK_SECS);
        self.reward_tokens.set(Vec::new());

        self.active_lock.set(None);
        self.total_locked.set(U256::zero());
        self.total_pooled.set(U256::zero());

        self.sync_coin_order(market_pool, receipt_token);
    }

    // ========== Liquidity Deployment ==========

    /// Deploy `amount` of undeployed LP custody: the lock-rate share goes
    /// into the farm lock, the remainder is paired with freshly minted
    /// receipt tokens and supplied to the market pool.
    pub fn apply_liquidity(&mut self, amount: U256, min_pool_tokens_out: U256) {
        let custody = self.undeployed_liquidity();
        if amount.is_zero() || amount > custody {
            self.env().revert(LockerError::InsufficientLiquidity);
        }

        let lock_rate = self.lock_rate();
        let (locked, pooled) = accrual::split_deposit(amount, &lock_rate);

        if !locked.is_zero() {
            self.lock_in_farm(locked);
            let total = self.total_locked.get().unwrap_or(U256::zero());
            self.total_locked.set(total + locked);
        }

        if !pooled.is_zero() {
            self.supply_to_pool(pooled, min_pool_tokens_out);
            let total = self.total_pooled.get().unwrap_or(U256::zero());
            self.total_pooled.set(total + pooled);
        }
    }

    /// Withdraw an expired lock in full and immediately recreate it for the
    /// configured duration. Keeper-callable; liquidity never changes.
    pub fn withdraw_and_relock(&mut self, lock_id: LockId) {
        let lock = self.require_active_lock(lock_id);
        let now = self.env().get_block_time();
        if !lock.is_expired(now) {
            self.env().revert(LockerError::LockNotExpired);
        }

        let farm = self.yield_farm_address();
        let lp = self.lp_token_address();
        let this = self.env().self_address();
        let lock_secs = self.farm_lock_secs();

        self.farm_withdraw_locked(farm, lock_id, this);
        self.token_approve(lp, farm, lock.liquidity);
        let new_id = self.farm_stake_locked(farm, lock.liquidity, lock_secs);

        let record = self
            .read_farm_lock(new_id)
            .unwrap_or(LockedPosition {
                lock_id: new_id,
                liquidity: lock.liquidity,
                start_time: now,
                end_time: now + lock_secs,
                multiplier: U256::zero(),
            });
        self.active_lock.set(Some(record));

        self.env().emit_event(WithdrawAndReLock {
            lock_id,
            liquidity: lock.liquidity,
        });
    }

    /// Full exit of a matured lock to `recipient`, claiming pending farm
    /// rewards first. Owner only; used for migration or emergency unwind.
    pub fn withdraw_locked(&mut self, lock_id: LockId, recipient: Address) {
        self.require_owner();

        let lock = self.require_active_lock(lock_id);
        let now = self.env().get_block_time();
        if !lock.is_expired(now) {
            self.env().revert(LockerError::LockNotExpired);
        }

        let farm = self.yield_farm_address();
        self.claim_farm_rewards(farm);
        self.farm_withdraw_locked(farm, lock_id, recipient);
        self.active_lock.set(None);
    }

    // ========== Reward Flow ==========

    /// Pull accrued farm rewards into contract custody.
    pub fn get_reward(&mut self) {
        let farm = self.yield_farm_address();
        self.claim_farm_rewards(farm);
    }

    /// Split currently held reward balances by the fee rate: fee to the fee
    /// collector, remainder to the rewards distributor. A zero balance is a
    /// silent no-op per token.
    pub fn harvest_rewards(&mut self) {
        let distributor = self.rewards_distributor_address();
        let fee_rate = self.fee_rate();
        let this = self.env().self_address();

        for token in self.reward_tokens() {
            let balance = self.token_balance_of(token, this);
            if balance.is_zero() {
                continue;
            }

            let (fee, remainder) = accrual::fee_split(balance, &fee_rate);
            if !fee.is_zero() {
                let collector = match self.fee_collector.get().flatten() {
                    Some(addr) => addr,
                    None => self.env().revert(LockerError::AddressNotSet),
                };
                self.token_transfer(token, collector, fee);
            }
            if !remainder.is_zero() {
                self.token_transfer(token, distributor, remainder);
            }

            self.env().emit_event(RewardHarvested {
                token,
                amount: remainder,
                fee,
            });
        }
    }

    // ========== Peg Defense (Defender Only) ==========

    /// Burn `pool_tokens` pool shares for both coins. Received receipt
    /// tokens are burned out of supply; LP returns to undeployed custody.
    pub fn remove_liquidity(&mut self, pool_tokens: U256, min_out0: U256, min_out1: U256) {
        self.require_peg_defender();

        let pool = self.market_pool_address();
        let this = self.env().self_address();

        let held = self.token_balance_of(pool, this);
        if held < pool_tokens {
            self.env().revert(LockerError::InsufficientBalance);
        }

        let args = runtime_args! {
            "amount" => pool_tokens,
            "min_amounts" => Vec::from([min_out0, min_out1]),
            "receiver" => this,
        };
        let outs: Vec<U256> = self
            .env()
            .call_contract(pool, CallDef::new("remove_liquidity", true, args));
        if outs.len() != 2 || outs[0] < min_out0 || outs[1] < min_out1 {
            self.env().revert(LockerError::Slippage);
        }

        self.retire_removed_liquidity(&outs, pool_tokens);
    }

    /// Burn at most `max_pool_tokens_burned` pool shares for an exact
    /// `amounts` pair out of the pool.
    pub fn remove_liquidity_imbalance(
        &mut self,
        amounts: Vec<U256>,
        max_pool_tokens_burned: U256,
    ) {
        self.require_peg_defender();
        if amounts.len() != 2 {
            self.env().revert(LockerError::InvalidAmount);
        }

        let pool = self.market_pool_address();
        let this = self.env().self_address();

        let args = runtime_args! {
            "amounts" => amounts.clone(),
            "max_burn_amount" => max_pool_tokens_burned,
            "receiver" => this,
        };
        let burned: U256 = self.env().call_contract(
            pool,
            CallDef::new("remove_liquidity_imbalance", true, args),
        );
        if burned > max_pool_tokens_burned {
            self.env().revert(LockerError::Slippage);
        }

        self.retire_removed_liquidity(&amounts, burned);
    }

    /// Swap one pool coin for the other to push the price toward parity.
    /// `token` must be one of the two pool coins; proceeds stay in custody.
    pub fn exchange(&mut self, token: Address, amount_in: U256, min_out: U256) {
        self.require_peg_defender();
        if amount_in.is_zero() {
            self.env().revert(LockerError::InvalidAmount);
        }

        let receipt = self.receipt_token_address();
        let lp = self.lp_token_address();
        let (receipt_idx, lp_idx) = self.coin_indices();

        let (i, j) = if token == receipt {
            (receipt_idx, lp_idx)
        } else if token == lp {
            (lp_idx, receipt_idx)
        } else {
            self.env().revert(LockerError::UnknownToken)
        };

        let this = self.env().self_address();
        let held = self.token_balance_of(token, this);
        if held < amount_in {
            self.env().revert(LockerError::InsufficientBalance);
        }

        let pool = self.market_pool_address();
        self.token_approve(token, pool, amount_in);

        let args = runtime_args! {
            "i" => i,
            "j" => j,
            "dx" => amount_in,
            "min_dy" => min_out,
            "receiver" => this,
        };
        let dy: U256 = self
            .env()
            .call_contract(pool, CallDef::new("exchange", true, args));
        if dy < min_out {
            self.env().revert(LockerError::Slippage);
        }
    }

    /// Worst acceptable pool-share output for supplying `(amount, amount)`
    /// at the given slippage tolerance, modeled off the pool virtual price.
    pub fn min_pool_tokens_out(&self, amount: U256, slippage_bps: u64) -> U256 {
        if !accrual::slippage_within_bounds(slippage_bps) {
            self.env().revert(LockerError::SlippageOutOfBounds);
        }
        let virtual_price = self.pool_virtual_price();
        accrual::pool_tokens_floor(amount, virtual_price, slippage_bps)
    }

    // ========== Query Functions ==========

    /// LP held by this contract and not yet deployed
    pub fn undeployed_liquidity(&self) -> U256 {
        self.token_balance_of(self.lp_token_address(), self.env().self_address())
    }

    /// The active consolidated lock, if any
    pub fn locked_position(&self) -> Option<LockedPosition> {
        self.active_lock.get().flatten()
    }

    /// Liquidity in the active lock (zero when none)
    pub fn locked_liquidity(&self) -> U256 {
        self.locked_position()
            .map(|lock| lock.liquidity)
            .unwrap_or(U256::zero())
    }

    pub fn lock_rate(&self) -> Ratio {
        self.lock_rate.get().unwrap_or(Ratio::new(100, 100))
    }

    pub fn fee_rate(&self) -> Ratio {
        self.fee_rate.get().unwrap_or(Ratio::new(0, 100))
    }

    pub fn pool_slippage_bps(&self) -> u64 {
        self.pool_slippage_bps.get().unwrap_or(DEFAULT_POOL_SLIPPAGE_BPS)
    }

    pub fn farm_lock_secs(&self) -> u64 {
        self.farm_lock_secs.get().unwrap_or(DEFAULT_FARM_LOCK_SECS)
    }

    pub fn reward_tokens(&self) -> Vec<Address> {
        self.reward_tokens.get().unwrap_or_default()
    }

    pub fn receipt_is_coin0(&self) -> bool {
        self.receipt_is_coin0.get().unwrap_or(true)
    }

    pub fn peg_defender(&self) -> Option<Address> {
        self.peg_defender.get().flatten()
    }

    pub fn fee_collector(&self) -> Option<Address> {
        self.fee_collector.get().flatten()
    }

    pub fn owner(&self) -> Option<Address> {
        self.owner.get()
    }

    /// Cumulative liquidity ever routed to the farm lock
    pub fn total_locked(&self) -> U256 {
        self.total_locked.get().unwrap_or(U256::zero())
    }

    /// Cumulative liquidity ever routed to the market pool
    pub fn total_pooled(&self) -> U256 {
        self.total_pooled.get().unwrap_or(U256::zero())
    }

    // ========== Admin Functions ==========

    /// Set the lock-rate split (owner only)
    pub fn set_lock_params(&mut self, numerator: u64, denominator: u64) {
        self.require_owner();
        let ratio = Ratio::new(numerator, denominator);
        if !ratio.is_valid() {
            self.env().revert(LockerError::InvalidRatio);
        }
        self.lock_rate.set(ratio);
    }

    /// Set the harvest fee cut (owner only)
    pub fn set_fee_params(&mut self, numerator: u64, denominator: u64) {
        self.require_owner();
        let ratio = Ratio::new(numerator, denominator);
        if !ratio.is_valid() {
            self.env().revert(LockerError::InvalidRatio);
        }
        self.fee_rate.set(ratio);
    }

    /// Set the pool-supply slippage tolerance (owner only)
    pub fn set_pool_slippage(&mut self, slippage_bps: u64) {
        self.require_owner();
        if !accrual::slippage_within_bounds(slippage_bps) {
            self.env().revert(LockerError::SlippageOutOfBounds);
        }
        self.pool_slippage_bps.set(slippage_bps);
    }

    /// Set the duration for new farm locks (owner only, bounded)
    pub fn set_farm_lock_time(&mut self, lock_secs: u64) {
        self.require_owner();
        if !(MIN_FARM_LOCK_SECS..=MAX_FARM_LOCK_SECS).contains(&lock_secs) {
            self.env().revert(LockerError::LockTimeOutOfBounds);
        }
        self.farm_lock_secs.set(lock_secs);
    }

    /// Sync the reward-token set from the farm (owner only)
    pub fn set_reward_tokens(&mut self) {
        self.require_owner();
        let farm = self.yield_farm_address();
        let tokens: Vec<Address> = self.env().call_contract(
            farm,
            CallDef::new("get_all_reward_tokens", false, runtime_args! {}),
        );
        self.reward_tokens.set(tokens);
    }

    /// Re-read which pool coin index holds the receipt token (owner only)
    pub fn sync_pool_coin_order(&mut self) {
        self.require_owner();
        let pool = self.market_pool_address();
        let receipt = self.receipt_token_address();
        self.sync_coin_order(pool, receipt);
    }

    /// Set the peg defender role (owner only)
    pub fn set_peg_defender(&mut self, defender: Address) {
        self.require_owner();
        self.peg_defender.set(Some(defender));
    }

    /// Set the rewards distributor (owner only)
    pub fn set_rewards_distributor(&mut self, distributor: Address) {
        self.require_owner();
        self.rewards_distributor.set(distributor);
    }

    /// Set the fee collector (owner only)
    pub fn set_fee_collector(&mut self, collector: Address) {
        self.require_owner();
        self.fee_collector.set(Some(collector));
    }

    /// Toggle a migrator on the farm for this staker (owner only)
    pub fn staker_toggle_migrator(&mut self, migrator: Address) {
        self.require_owner();
        let farm = self.yield_farm_address();
        let args = runtime_args! { "migrator" => migrator };
        self.env()
            .call_contract::<()>(farm, CallDef::new("staker_toggle_migrator", true, args));
    }

    /// Point the farm at an external voting-escrow proxy (owner only)
    pub fn set_voting_escrow_proxy(&mut self, proxy: Address) {
        self.require_owner();
        let farm = self.yield_farm_address();
        let args = runtime_args! { "proxy" => proxy };
        self.env()
            .call_contract::<()>(farm, CallDef::new("staker_set_escrow_proxy", true, args));
    }

    /// Transfer contract ownership (owner only)
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.require_owner();
        self.owner.set(new_owner);
    }

    /// Recover stray tokens (owner or peg defender)
    pub fn recover_token(&mut self, token: Address, to: Address, amount: U256) {
        let caller = self.env().caller();
        let is_owner = self.owner.get() == Some(caller);
        let is_defender = self.peg_defender.get().flatten() == Some(caller);
        if !is_owner && !is_defender {
            self.env().revert(LockerError::NotOwner);
        }

        let held = self.token_balance_of(token, self.env().self_address());
        if held < amount {
            self.env().revert(LockerError::InsufficientBalance);
        }

        self.token_transfer(token, to, amount);
        self.env().emit_event(TokenRecovered { to, amount });
    }

    // ========== Internal: Lock Management ==========

    /// Route `locked` into the farm: create the lock if none exists,
    /// increase it while unexpired, refuse once expired.
    fn lock_in_farm(&mut self, locked: U256) {
        let farm = self.yield_farm_address();
        let lp = self.lp_token_address();
        let now = self.env().get_block_time();

        match self.active_lock.get().flatten() {
            None => {
                let lock_secs = self.farm_lock_secs();
                self.token_approve(lp, farm, locked);
                let lock_id = self.farm_stake_locked(farm, locked, lock_secs);

                let record = self
                    .read_farm_lock(lock_id)
                    .unwrap_or(LockedPosition {
                        lock_id,
                        liquidity: locked,
                        start_time: now,
                        end_time: now + lock_secs,
                        multiplier: U256::zero(),
                    });
                self.active_lock.set(Some(record));
            }
            Some(mut lock) => {
                if lock.is_expired(now) {
                    self.env().revert(LockerError::LockExpired);
                }

                self.token_approve(lp, farm, locked);
                let args = runtime_args! {
                    "lock_id" => lock.lock_id,
                    "liquidity" => locked,
                };
                self.env()
                    .call_contract::<()>(farm, CallDef::new("lock_additional", true, args));

                lock.liquidity = lock.liquidity + locked;
                self.active_lock.set(Some(lock));
            }
        }

        self.env().emit_event(Locked { amount: locked });
    }

    /// Mint `pooled` receipt tokens and supply `(pooled, pooled)` to the
    /// market pool, enforcing both the caller's floor and the configured
    /// slippage model.
    fn supply_to_pool(&mut self, pooled: U256, min_pool_tokens_out: U256) {
        let pool = self.market_pool_address();
        let receipt = self.receipt_token_address();
        let lp = self.lp_token_address();
        let this = self.env().self_address();

        let mint_args = runtime_args! { "to" => this, "amount" => pooled };
        self.env()
            .call_contract::<()>(receipt, CallDef::new("mint", true, mint_args));

        self.token_approve(receipt, pool, pooled);
        self.token_approve(lp, pool, pooled);

        let floor = accrual::pool_tokens_floor(
            pooled,
            self.pool_virtual_price(),
            self.pool_slippage_bps(),
        );
        let min_mint = core::cmp::max(min_pool_tokens_out, floor);

        let args = runtime_args! {
            "amounts" => Vec::from([pooled, pooled]),
            "min_mint_amount" => min_mint,
            "receiver" => this,
        };
        let pool_tokens: U256 = self
            .env()
            .call_contract(pool, CallDef::new("add_liquidity", true, args));
        if pool_tokens < min_mint {
            self.env().revert(LockerError::Slippage);
        }

        self.env().emit_event(LiquidityAdded {
            receipt_amount: pooled,
            lp_amount: pooled,
            pool_tokens,
        });
    }

    /// Burn the receipt side of a pool withdrawal and report the result.
    fn retire_removed_liquidity(&mut self, outs: &[U256], pool_tokens: U256) {
        let (receipt_idx, lp_idx) = self.coin_indices();
        let receipt_amount = outs[receipt_idx as usize];
        let lp_amount = outs[lp_idx as usize];

        if !receipt_amount.is_zero() {
            let receipt = self.receipt_token_address();
            let args = runtime_args! { "amount" => receipt_amount };
            self.env()
                .call_contract::<()>(receipt, CallDef::new("burn", true, args));
        }

        self.env().emit_event(LiquidityRemoved {
            receipt_amount,
            lp_amount,
            pool_tokens,
        });
    }

    fn require_active_lock(&self, lock_id: LockId) -> LockedPosition {
        match self.active_lock.get().flatten() {
            Some(lock) if lock.lock_id == lock_id => lock,
            _ => self.env().revert(LockerError::NothingToWithdraw),
        }
    }

    /// Mirror the farm's record for `lock_id`, if the farm reports one.
    fn read_farm_lock(&self, lock_id: LockId) -> Option<LockedPosition> {
        let farm = self.yield_farm_address();
        let args = runtime_args! { "account" => self.env().self_address() };
        let stakes: Vec<LockedPosition> = self
            .env()
            .call_contract(farm, CallDef::new("locked_stakes_of", false, args));
        stakes.into_iter().find(|stake| stake.lock_id == lock_id)
    }

    fn farm_stake_locked(&mut self, farm: Address, liquidity: U256, lock_secs: u64) -> LockId {
        let args = runtime_args! {
            "liquidity" => liquidity,
            "lock_secs" => lock_secs,
        };
        self.env()
            .call_contract(farm, CallDef::new("stake_locked", true, args))
    }

    fn farm_withdraw_locked(&mut self, farm: Address, lock_id: LockId, destination: Address) {
        let args = runtime_args! {
            "lock_id" => lock_id,
            "destination" => destination,
        };
        self.env()
            .call_contract::<U256>(farm, CallDef::new("withdraw_locked", true, args));
    }

    fn claim_farm_rewards(&mut self, farm: Address) {
        let args = runtime_args! { "destination" => self.env().self_address() };
        let amounts: Vec<U256> = self
            .env()
            .call_contract(farm, CallDef::new("get_reward", true, args));
        self.env().emit_event(RewardClaimed { amounts });
    }

    // ========== Internal: Collaborator Plumbing ==========

    fn sync_coin_order(&mut self, pool: Address, receipt: Address) {
        let args = runtime_args! { "i" => 0u8 };
        let coin0: Address = self
            .env()
            .call_contract(pool, CallDef::new("coins", false, args));
        self.receipt_is_coin0.set(coin0 == receipt);
    }

    /// (receipt coin index, lp coin index)
    fn coin_indices(&self) -> (u8, u8) {
        if self.receipt_is_coin0() {
            (0, 1)
        } else {
            (1, 0)
        }
    }

    fn pool_virtual_price(&self) -> U256 {
        let pool = self.market_pool_address();
        self.env()
            .call_contract(pool, CallDef::new("get_virtual_price", false, runtime_args! {}))
    }

    fn token_transfer(&mut self, token: Address, recipient: Address, amount: U256) {
        let args = runtime_args! {
            "recipient" => recipient,
            "amount" => amount,
        };
        self.env()
            .call_contract::<bool>(token, CallDef::new("transfer", true, args));
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

    fn yield_farm_address(&self) -> Address {
        match self.yield_farm.get() {
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

    fn rewards_distributor_address(&self) -> Address {
        match self.rewards_distributor.get() {
            Some(addr) => addr,
            None => self.env().revert(LockerError::AddressNotSet),
        }
    }

    fn require_owner(&self) {
        if self.owner.get() != Some(self.env().caller()) {
            self.env().revert(LockerError::NotOwner);
        }
    }

    fn require_peg_defender(&self) {
        if self.peg_defender.get().flatten() != Some(self.env().caller()) {
            self.env().revert(LockerError::NotPegDefender);
        }
    }
}
