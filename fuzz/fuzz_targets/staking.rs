#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env,
};
use staking_rewards::{StakingRewardsContract, StakingRewardsContractClient};

const STAKERS: usize = 4;

#[derive(Arbitrary, Debug)]
enum Op {
    Stake { who: u8, amount: u32 },
    Withdraw { who: u8, amount: u32 },
    Claim { who: u8 },
    Exit { who: u8 },
    Advance { seconds: u16 },
    Notify { amount: u32 },
    SetDuration { duration: u16 },
}

#[derive(Arbitrary, Debug)]
struct Input {
    duration: u16,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_000);

    let issuer = Address::generate(&env);
    let staking_sac = env.register_stellar_asset_contract_v2(issuer.clone());
    let reward_sac = env.register_stellar_asset_contract_v2(issuer);
    let staking_admin = token::StellarAssetClient::new(&env, &staking_sac.address());
    let reward_admin = token::StellarAssetClient::new(&env, &reward_sac.address());
    let reward = token::Client::new(&env, &reward_sac.address());

    let owner = Address::generate(&env);
    let contract_id = env.register(
        StakingRewardsContract,
        (owner.clone(), staking_sac.address(), reward_sac.address()),
    );
    let client = StakingRewardsContractClient::new(&env, &contract_id);

    let stakers: Vec<Address> = (0..STAKERS)
        .map(|_| {
            let staker = Address::generate(&env);
            staking_admin.mint(&staker, &i128::from(u32::MAX));
            staker
        })
        .collect();

    let _ = client.try_set_reward_duration(&owner, &u64::from(input.duration));

    let mut funded: i128 = 0;
    let mut last_rpt = client.reward_per_token_stored();

    for op in input.ops.iter().take(64) {
        match *op {
            Op::Stake { who, amount } => {
                let staker = &stakers[usize::from(who) % STAKERS];
                let _ = client.try_stake(staker, &i128::from(amount));
            }
            Op::Withdraw { who, amount } => {
                let staker = &stakers[usize::from(who) % STAKERS];
                let _ = client.try_withdraw(staker, &i128::from(amount));
            }
            Op::Claim { who } => {
                let _ = client.try_claim_reward(&stakers[usize::from(who) % STAKERS]);
            }
            Op::Exit { who } => {
                let _ = client.try_exit(&stakers[usize::from(who) % STAKERS]);
            }
            Op::Advance { seconds } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now + u64::from(seconds));
            }
            Op::Notify { amount } => {
                reward_admin.mint(&contract_id, &i128::from(amount));
                funded += i128::from(amount);
                let _ = client.try_notify_reward_amount(&owner, &i128::from(amount));
            }
            Op::SetDuration { duration } => {
                let _ = client.try_set_reward_duration(&owner, &u64::from(duration));
            }
        }

        let sum: i128 = stakers.iter().map(|s| client.balance_of(s)).sum();
        assert_eq!(client.total_supply(), sum, "total supply drifted");

        let rpt = client.reward_per_token_stored();
        assert!(rpt >= last_rpt, "reward per token decreased");
        last_rpt = rpt;

        let paid: i128 = stakers.iter().map(|s| reward.balance(s)).sum();
        let claimable: i128 = stakers.iter().map(|s| client.earned(s)).sum();
        assert!(paid + claimable <= funded, "rewards exceed funding");
    }
});
