#![no_std]

pub mod events;
pub mod rewards;
pub mod storage;

use soroban_sdk::{contract, contractimpl, log, panic_with_error, token, Address, Env, I256};

use storage::{AccrualState, Schedule};

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    Unauthorized = 2,
    ScheduleActive = 3,
    InvalidAmount = 4,
    InsufficientStake = 5,
    ZeroRate = 6,
    InsufficientBalance = 7,
    TransferFailed = 8,
    InvalidDuration = 9,
    ArithmeticOverflow = 10,
    TokensIdentical = 11,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingRewardsContract;

#[contractimpl]
impl StakingRewardsContract {
    // ── Construction ────────────────────────────────────────────────────────

    /// Deploy a pool.
    ///
    /// * `owner`         – the only address allowed to manage the schedule.
    /// * `staking_token` – SAC address of the token users stake.
    /// * `reward_token`  – SAC address of the token paid out as rewards.
    ///
    /// All three are fixed for the lifetime of the pool.
    pub fn __constructor(env: Env, owner: Address, staking_token: Address, reward_token: Address) {
        if staking_token == reward_token {
            panic_with_error!(&env, ContractError::TokensIdentical);
        }

        storage::set_config(&env, &owner, &staking_token, &reward_token);
        storage::extend_instance_ttl(&env);

        events::publish_initialized(&env, owner, staking_token, reward_token);
    }

    // ── Schedule administration ─────────────────────────────────────────────

    /// Set the length of the next reward schedule.
    ///
    /// Only allowed once the current schedule has finished, i.e. strictly
    /// after `finish_at`.
    pub fn set_reward_duration(
        env: Env,
        caller: Address,
        duration: u64,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let now = env.ledger().timestamp();
        Self::update_reward(&env, None, now)?;

        let mut schedule = storage::get_schedule(&env);
        if schedule.finish_at >= now {
            return Err(ContractError::ScheduleActive);
        }
        if duration == 0 {
            return Err(ContractError::InvalidDuration);
        }

        schedule.duration = duration;
        storage::set_schedule(&env, &schedule);
        storage::extend_instance_ttl(&env);

        events::publish_duration_set(&env, duration);

        Ok(())
    }

    /// Start a new reward schedule emitting `amount` over `duration` seconds.
    ///
    /// If the previous schedule is still running, whatever it has not yet
    /// emitted is folded into the new rate rather than forfeited. The reward
    /// tokens must already be held by the contract; this only commits them.
    pub fn notify_reward_amount(
        env: Env,
        caller: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        if amount < 0 {
            return Err(ContractError::InvalidAmount);
        }

        let now = env.ledger().timestamp();
        let mut accrual = Self::update_reward(&env, None, now)?;

        let mut schedule = storage::get_schedule(&env);
        if schedule.duration == 0 {
            return Err(ContractError::InvalidDuration);
        }

        let leftover = rewards::remaining_rewards(schedule.reward_rate, schedule.finish_at, now)
            .ok_or(ContractError::ArithmeticOverflow)?;
        let reward_rate = rewards::schedule_rate(amount, leftover, schedule.duration)
            .ok_or(ContractError::ArithmeticOverflow)?;
        if reward_rate == 0 {
            return Err(ContractError::ZeroRate);
        }

        // Solvency: the full schedule must be covered by tokens already held.
        let committed = reward_rate
            .checked_mul(i128::from(schedule.duration))
            .ok_or(ContractError::ArithmeticOverflow)?;
        let reward_token = Self::reward_token_address(&env)?;
        let held = token::Client::new(&env, &reward_token).balance(&env.current_contract_address());
        if committed > held {
            return Err(ContractError::InsufficientBalance);
        }

        schedule.reward_rate = reward_rate;
        schedule.finish_at = now
            .checked_add(schedule.duration)
            .ok_or(ContractError::ArithmeticOverflow)?;
        storage::set_schedule(&env, &schedule);

        accrual.updated_at = now;
        storage::set_accrual(&env, &accrual);
        storage::extend_instance_ttl(&env);

        log!(
            &env,
            "reward schedule: rate {}, leftover {}, finish_at {}",
            reward_rate,
            leftover,
            schedule.finish_at
        );
        events::publish_reward_added(&env, amount, reward_rate, schedule.finish_at);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` staking tokens.
    ///
    /// The staker is settled first so the new deposit never earns
    /// retroactively.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        staker.require_auth();

        let now = env.ledger().timestamp();
        Self::update_reward(&env, Some(&staker), now)?;

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        let staking_token = Self::staking_token_address(&env)?;
        Self::transfer(
            &env,
            &staking_token,
            &staker,
            &env.current_contract_address(),
            amount,
        )?;

        let new_balance = storage::get_balance(&env, &staker)
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        storage::set_balance(&env, &staker, new_balance);

        let new_total = storage::get_total_supply(&env)
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        storage::set_total_supply(&env, new_total);
        storage::extend_instance_ttl(&env);

        events::publish_staked(&env, staker, amount, new_total);

        Ok(())
    }

    /// Return `amount` staked tokens to the staker. Owed rewards are kept.
    pub fn withdraw(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        staker.require_auth();

        let now = env.ledger().timestamp();
        Self::update_reward(&env, Some(&staker), now)?;

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        Self::withdraw_stake(&env, &staker, amount)?;
        storage::extend_instance_ttl(&env);

        Ok(())
    }

    /// Pay out everything owed to `staker`, returning the amount paid.
    ///
    /// Claiming with nothing owed is not an error; it pays 0.
    pub fn claim_reward(env: Env, staker: Address) -> Result<i128, ContractError> {
        staker.require_auth();

        let now = env.ledger().timestamp();
        Self::update_reward(&env, Some(&staker), now)?;

        let paid = Self::pay_reward(&env, &staker)?;
        storage::extend_instance_ttl(&env);

        Ok(paid)
    }

    /// Withdraw the whole balance and claim all rewards in one call.
    pub fn exit(env: Env, staker: Address) -> Result<i128, ContractError> {
        staker.require_auth();

        let now = env.ledger().timestamp();
        Self::update_reward(&env, Some(&staker), now)?;

        let balance = storage::get_balance(&env, &staker);
        if balance > 0 {
            Self::withdraw_stake(&env, &staker, balance)?;
        }

        let paid = Self::pay_reward(&env, &staker)?;
        storage::extend_instance_ttl(&env);

        Ok(paid)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// `min(now, finish_at)`: accrual never counts time past the schedule end.
    pub fn last_time_reward_applicable(env: Env) -> u64 {
        let schedule = storage::get_schedule(&env);
        rewards::last_time_reward_applicable(env.ledger().timestamp(), schedule.finish_at)
    }

    /// Live reward-per-token, scaled by `rewards::SCALE`.
    pub fn reward_per_token(env: Env) -> I256 {
        Self::current_reward_per_token(
            &env,
            &storage::get_schedule(&env),
            &storage::get_accrual(&env),
            env.ledger().timestamp(),
        )
    }

    /// Rewards `staker` could claim right now, settled or not.
    pub fn earned(env: Env, staker: Address) -> Result<i128, ContractError> {
        let rpt = Self::reward_per_token(env.clone());
        Self::earned_at(&env, &staker, &rpt)
    }

    pub fn total_supply(env: Env) -> i128 {
        storage::get_total_supply(&env)
    }

    pub fn balance_of(env: Env, staker: Address) -> i128 {
        storage::get_balance(&env, &staker)
    }

    pub fn duration(env: Env) -> u64 {
        storage::get_schedule(&env).duration
    }

    pub fn finish_at(env: Env) -> u64 {
        storage::get_schedule(&env).finish_at
    }

    pub fn reward_rate(env: Env) -> i128 {
        storage::get_schedule(&env).reward_rate
    }

    pub fn updated_at(env: Env) -> u64 {
        storage::get_accrual(&env).updated_at
    }

    /// The accumulator as of the last refresh, without live accrual.
    pub fn reward_per_token_stored(env: Env) -> I256 {
        storage::get_accrual(&env).reward_per_token_stored
    }

    pub fn user_reward_per_token_paid(env: Env, staker: Address) -> I256 {
        storage::get_reward_account(&env, &staker).reward_per_token_paid
    }

    /// Rewards credited to `staker` at their last settlement and not yet claimed.
    pub fn rewards(env: Env, staker: Address) -> i128 {
        storage::get_reward_account(&env, &staker).owed_rewards
    }

    /// Total emission of a full schedule at the current rate.
    pub fn reward_for_duration(env: Env) -> Result<i128, ContractError> {
        let schedule = storage::get_schedule(&env);
        schedule
            .reward_rate
            .checked_mul(i128::from(schedule.duration))
            .ok_or(ContractError::ArithmeticOverflow)
    }

    pub fn owner(env: Env) -> Result<Address, ContractError> {
        storage::get_owner(&env).ok_or(ContractError::NotInitialized)
    }

    pub fn staking_token(env: Env) -> Result<Address, ContractError> {
        Self::staking_token_address(&env)
    }

    pub fn reward_token(env: Env) -> Result<Address, ContractError> {
        Self::reward_token_address(&env)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if `caller` is not the pool owner.
    fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
        let owner = storage::get_owner(env).ok_or(ContractError::NotInitialized)?;
        if *caller != owner {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn staking_token_address(env: &Env) -> Result<Address, ContractError> {
        storage::get_staking_token(env).ok_or(ContractError::NotInitialized)
    }

    fn reward_token_address(env: &Env) -> Result<Address, ContractError> {
        storage::get_reward_token(env).ok_or(ContractError::NotInitialized)
    }

    fn current_reward_per_token(
        env: &Env,
        schedule: &Schedule,
        accrual: &AccrualState,
        now: u64,
    ) -> I256 {
        let applicable = rewards::last_time_reward_applicable(now, schedule.finish_at);
        rewards::compute_reward_per_token(
            env,
            &accrual.reward_per_token_stored,
            schedule.reward_rate,
            applicable.saturating_sub(accrual.updated_at),
            storage::get_total_supply(env),
        )
    }

    fn earned_at(env: &Env, staker: &Address, rpt: &I256) -> Result<i128, ContractError> {
        let account = storage::get_reward_account(env, staker);
        rewards::earned(
            env,
            storage::get_balance(env, staker),
            rpt,
            &account.reward_per_token_paid,
            account.owed_rewards,
        )
        .ok_or(ContractError::ArithmeticOverflow)
    }

    /// Accrual refresh, run first by every mutating entry point.
    ///
    /// 1. Fold the accrual since `updated_at` into the global accumulator.
    /// 2. Move `updated_at` up to `min(now, finish_at)`.
    /// 3. If a staker is named, credit what they earned since their last
    ///    settlement and snapshot the accumulator for them.
    fn update_reward(
        env: &Env,
        staker: Option<&Address>,
        now: u64,
    ) -> Result<AccrualState, ContractError> {
        let schedule = storage::get_schedule(env);
        let mut accrual = storage::get_accrual(env);

        accrual.reward_per_token_stored =
            Self::current_reward_per_token(env, &schedule, &accrual, now);
        accrual.updated_at = rewards::last_time_reward_applicable(now, schedule.finish_at);
        storage::set_accrual(env, &accrual);

        if let Some(staker) = staker {
            let mut account = storage::get_reward_account(env, staker);
            account.owed_rewards = rewards::earned(
                env,
                storage::get_balance(env, staker),
                &accrual.reward_per_token_stored,
                &account.reward_per_token_paid,
                account.owed_rewards,
            )
            .ok_or(ContractError::ArithmeticOverflow)?;
            account.reward_per_token_paid = accrual.reward_per_token_stored.clone();
            storage::set_reward_account(env, staker, &account);
        }

        Ok(accrual)
    }

    /// Debit `amount` from the staker's balance and send the tokens back.
    /// The caller has already refreshed the staker.
    fn withdraw_stake(env: &Env, staker: &Address, amount: i128) -> Result<(), ContractError> {
        let balance = storage::get_balance(env, staker);
        if amount > balance {
            return Err(ContractError::InsufficientStake);
        }

        storage::set_balance(env, staker, balance - amount);

        let new_total = storage::get_total_supply(env)
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        storage::set_total_supply(env, new_total);

        let staking_token = Self::staking_token_address(env)?;
        Self::transfer(
            env,
            &staking_token,
            &env.current_contract_address(),
            staker,
            amount,
        )?;

        events::publish_withdrawn(env, staker.clone(), amount, new_total);

        Ok(())
    }

    /// Zero the staker's owed rewards and transfer them out.
    /// The caller has already refreshed the staker.
    fn pay_reward(env: &Env, staker: &Address) -> Result<i128, ContractError> {
        let mut account = storage::get_reward_account(env, staker);
        let reward = account.owed_rewards;
        if reward <= 0 {
            return Ok(0);
        }

        account.owed_rewards = 0;
        storage::set_reward_account(env, staker, &account);

        let reward_token = Self::reward_token_address(env)?;
        Self::transfer(
            env,
            &reward_token,
            &env.current_contract_address(),
            staker,
            reward,
        )?;

        events::publish_reward_paid(env, staker.clone(), reward);

        Ok(reward)
    }

    /// Move tokens through the SEP-41 interface; any rejection by the token
    /// contract surfaces as `TransferFailed`.
    fn transfer(
        env: &Env,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        match token::Client::new(env, token).try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::TransferFailed),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
