use settlement_engine::{
    params::ParamName,
    types::{ModuleAccount, ValidatorStatus},
};

use crate::support::{DENOM, Harness, operator, params, subscription, validator};

fn staked_harness(harness: Harness, reserve: u64) -> Harness {
    harness
        .ledger
        .set_module_balance(ModuleAccount::Reserve, DENOM, reserve);
    harness.ledger.set_validators(vec![
        validator(1, 300, ValidatorStatus::Bonded),
        validator(2, 700, ValidatorStatus::Bonded),
        validator(3, 5_000, ValidatorStatus::Unbonded),
    ]);
    harness
}

#[test]
fn given_height_off_payout_cycle_when_block_ends_then_no_rewards_are_paid() {
    let harness = staked_harness(Harness::with_defaults(), 365_000);

    let report = harness.manager.end_block(150);

    assert_eq!(report.rewards, None);
    assert_eq!(harness.module_balance(ModuleAccount::Reserve), 365_000);
    assert!(harness.events.events().is_empty());
}

#[test]
fn given_payout_height_when_block_ends_then_cycle_pool_goes_to_bonded_validators() {
    let harness = staked_harness(Harness::with_defaults(), 365_000);

    let report = harness.manager.end_block(200);

    let rewards = report.rewards.expect("200 is a payout height");
    assert_eq!(rewards.pool, 1_000);
    assert_eq!(rewards.total_bonded, 1_000);
    assert_eq!(rewards.distributed(), 1_000);
    assert_eq!(harness.balance_of(&operator(1)), 300);
    assert_eq!(harness.balance_of(&operator(2)), 700);
    assert_eq!(harness.balance_of(&operator(3)), 0);
    assert_eq!(harness.module_balance(ModuleAccount::Reserve), 364_000);
}

#[test]
fn given_zero_payout_cycle_when_block_ends_then_rewards_are_disabled() {
    let harness = staked_harness(
        Harness::new(params().with_value(ParamName::ValidatorPayoutCycle, 0)),
        365_000,
    );

    let report = harness.manager.end_block(200);

    assert_eq!(report.rewards, None);
    assert_eq!(harness.module_balance(ModuleAccount::Reserve), 365_000);
}

#[test]
fn given_empty_reserve_when_payout_height_ends_then_report_shows_an_empty_pool() {
    let harness = staked_harness(Harness::with_defaults(), 0);

    let report = harness.manager.end_block(300);

    let rewards = report.rewards.expect("300 is a payout height");
    assert_eq!(rewards.pool, 0);
    assert!(rewards.payouts.is_empty());
    assert!(harness.events.events().is_empty());
}

#[test]
fn given_contract_expiring_on_payout_height_when_block_ends_then_its_tax_feeds_the_pool() {
    // expires at 190 + 10 = 200; tax of 10 lands in reserve before the pool is sized
    let harness = staked_harness(Harness::with_defaults(), 364_990);
    let contract = harness.open(subscription(20, 10, 190, 500));

    let report = harness.manager.end_block(200);

    assert_eq!(report.settled, vec![contract.key()]);
    let rewards = report.rewards.expect("200 is a payout height");
    assert_eq!(rewards.pool, 1_000);
    assert_eq!(harness.balance_of_key(&contract.provider), 90);
    assert_eq!(harness.balance_of_key(&contract.client), 400);
}
