use soroban_sdk::{contracttype, symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub staking_token: Address,
    pub reward_token: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DurationSetEvent {
    pub duration: u64,
}

/// Published when the owner starts or tops up a reward schedule.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardAddedEvent {
    pub amount: i128,
    pub reward_rate: i128,
    pub finish_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub amount: i128,
    /// Pool total after the deposit.
    pub total_supply: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub staker: Address,
    pub amount: i128,
    /// Pool total after the withdrawal.
    pub total_supply: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPaidEvent {
    pub staker: Address,
    pub reward: i128,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    owner: Address,
    staking_token: Address,
    reward_token: Address,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            staking_token,
            reward_token,
        },
    );
}

pub fn publish_duration_set(env: &Env, duration: u64) {
    env.events()
        .publish((symbol_short!("DUR_SET"),), DurationSetEvent { duration });
}

pub fn publish_reward_added(env: &Env, amount: i128, reward_rate: i128, finish_at: u64) {
    env.events().publish(
        (symbol_short!("RWD_ADD"),),
        RewardAddedEvent {
            amount,
            reward_rate,
            finish_at,
        },
    );
}

pub fn publish_staked(env: &Env, staker: Address, amount: i128, total_supply: i128) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            amount,
            total_supply,
        },
    );
}

pub fn publish_withdrawn(env: &Env, staker: Address, amount: i128, total_supply: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), staker.clone()),
        WithdrawnEvent {
            staker,
            amount,
            total_supply,
        },
    );
}

pub fn publish_reward_paid(env: &Env, staker: Address, reward: i128) {
    env.events().publish(
        (symbol_short!("RWD_PAID"), staker.clone()),
        RewardPaidEvent { staker, reward },
    );
}
