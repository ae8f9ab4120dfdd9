use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, I256};

// ── Storage key constants ───────────────────────────────────────────────────

const OWNER: Symbol = symbol_short!("OWNER");
const STAKE_TOKEN: Symbol = symbol_short!("STK_TOK");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const SCHEDULE: Symbol = symbol_short!("SCHEDULE");
const ACCRUAL: Symbol = symbol_short!("ACCRUAL");
const TOTAL_SUPPLY: Symbol = symbol_short!("TOT_SUP");

// Per-staker persistent storage uses tuple keys: (prefix, staker_address)
const BALANCE: Symbol = symbol_short!("BAL");
const REWARD_ACCOUNT: Symbol = symbol_short!("RWD_ACCT");

// TTLs are counted in ledgers, roughly 5 seconds each.
const DAY_IN_LEDGERS: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
const ACCOUNT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const ACCOUNT_LIFETIME_THRESHOLD: u32 = ACCOUNT_BUMP_AMOUNT - DAY_IN_LEDGERS;

// ── Types ───────────────────────────────────────────────────────────────────

/// The reward emission schedule.
///
/// Only `set_reward_duration` and `notify_reward_amount` write this.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Schedule {
    /// Length in seconds of the next schedule started by `notify_reward_amount`.
    pub duration: u64,
    /// Timestamp at which the current schedule stops emitting.
    pub finish_at: u64,
    /// Reward units emitted per second while the schedule runs.
    pub reward_rate: i128,
}

/// Global accrual snapshot, rewritten by every accrual refresh.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccrualState {
    /// Cumulative reward per staked unit, scaled by `rewards::SCALE`.
    pub reward_per_token_stored: I256,
    pub updated_at: u64,
}

impl AccrualState {
    pub fn genesis(env: &Env) -> Self {
        Self {
            reward_per_token_stored: I256::from_i32(env, 0),
            updated_at: 0,
        }
    }
}

/// A staker's settlement record.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardAccount {
    /// `reward_per_token_stored` as of the staker's last settlement.
    pub reward_per_token_paid: I256,
    /// Rewards credited but not yet claimed.
    pub owed_rewards: i128,
}

impl RewardAccount {
    pub fn empty(env: &Env) -> Self {
        Self {
            reward_per_token_paid: I256::from_i32(env, 0),
            owed_rewards: 0,
        }
    }
}

// ── TTL ─────────────────────────────────────────────────────────────────────

/// Keep the contract instance (and all instance-scoped keys) alive.
pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn extend_account_ttl(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, ACCOUNT_LIFETIME_THRESHOLD, ACCOUNT_BUMP_AMOUNT);
}

// ── Immutable configuration ─────────────────────────────────────────────────

/// Persist the owner and token addresses. Called once, from the constructor.
pub fn set_config(env: &Env, owner: &Address, staking_token: &Address, reward_token: &Address) {
    let instance = env.storage().instance();
    instance.set(&OWNER, owner);
    instance.set(&STAKE_TOKEN, staking_token);
    instance.set(&REWARD_TOKEN, reward_token);
}

pub fn get_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&OWNER)
}

pub fn get_staking_token(env: &Env) -> Option<Address> {
    env.storage().instance().get(&STAKE_TOKEN)
}

pub fn get_reward_token(env: &Env) -> Option<Address> {
    env.storage().instance().get(&REWARD_TOKEN)
}

// ── Pool state ──────────────────────────────────────────────────────────────

pub fn get_schedule(env: &Env) -> Schedule {
    env.storage().instance().get(&SCHEDULE).unwrap_or_default()
}

pub fn set_schedule(env: &Env, schedule: &Schedule) {
    env.storage().instance().set(&SCHEDULE, schedule);
}

pub fn get_accrual(env: &Env) -> AccrualState {
    env.storage()
        .instance()
        .get(&ACCRUAL)
        .unwrap_or_else(|| AccrualState::genesis(env))
}

pub fn set_accrual(env: &Env, accrual: &AccrualState) {
    env.storage().instance().set(&ACCRUAL, accrual);
}

pub fn get_total_supply(env: &Env) -> i128 {
    env.storage().instance().get(&TOTAL_SUPPLY).unwrap_or(0)
}

pub fn set_total_supply(env: &Env, total_supply: i128) {
    env.storage().instance().set(&TOTAL_SUPPLY, &total_supply);
}

// ── Per-staker state ────────────────────────────────────────────────────────

/// Staked principal; zero for addresses that never staked.
pub fn get_balance(env: &Env, staker: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&(BALANCE, staker.clone()))
        .unwrap_or(0)
}

/// Balances are overwritten, never removed, so a fully withdrawn staker
/// reads back as an explicit zero.
pub fn set_balance(env: &Env, staker: &Address, amount: i128) {
    let key = (BALANCE, staker.clone());
    env.storage().persistent().set(&key, &amount);
    extend_account_ttl(env, &key);
}

pub fn get_reward_account(env: &Env, staker: &Address) -> RewardAccount {
    env.storage()
        .persistent()
        .get(&(REWARD_ACCOUNT, staker.clone()))
        .unwrap_or_else(|| RewardAccount::empty(env))
}

pub fn set_reward_account(env: &Env, staker: &Address, account: &RewardAccount) {
    let key = (REWARD_ACCOUNT, staker.clone());
    env.storage().persistent().set(&key, account);
    extend_account_ttl(env, &key);
}
