use settlement_engine::{
    params::ParamName,
    rewards::{cycle_reward_pool, distribute_rewards},
    settlement::{SettlementErrorKind, SettlementEvent},
    types::{Address, ModuleAccount, ValidatorStatus},
};

use crate::support::{DENOM, Harness, operator, params, validator};

fn funded_harness(reserve: u64) -> Harness {
    let harness = Harness::with_defaults();
    harness
        .ledger
        .set_module_balance(ModuleAccount::Reserve, DENOM, reserve);
    harness
}

#[test]
fn given_two_bonded_validators_when_distributing_then_shares_follow_stake_exactly() {
    let harness = funded_harness(5_000);
    let validators = vec![
        validator(1, 300, ValidatorStatus::Bonded),
        validator(2, 700, ValidatorStatus::Bonded),
    ];

    let report = distribute_rewards(&harness.manager.context(200), &validators, 1_000);

    assert_eq!(report.total_bonded, 1_000);
    assert_eq!(report.distributed(), 1_000);
    assert!(report.failures.is_empty());
    assert_eq!(harness.balance_of(&operator(1)), 300);
    assert_eq!(harness.balance_of(&operator(2)), 700);
    assert_eq!(harness.module_balance(ModuleAccount::Reserve), 4_000);
}

#[test]
fn given_unbonded_validators_when_distributing_then_they_neither_count_nor_get_paid() {
    let harness = funded_harness(5_000);
    let validators = vec![
        validator(1, 500, ValidatorStatus::Bonded),
        validator(2, 9_000, ValidatorStatus::Unbonding),
        validator(3, 9_000, ValidatorStatus::Unbonded),
        validator(4, 500, ValidatorStatus::Bonded),
    ];

    let report = distribute_rewards(&harness.manager.context(200), &validators, 1_000);

    assert_eq!(report.total_bonded, 1_000);
    assert_eq!(report.payouts.len(), 2);
    assert_eq!(harness.balance_of(&operator(1)), 500);
    assert_eq!(harness.balance_of(&operator(2)), 0);
    assert_eq!(harness.balance_of(&operator(3)), 0);
    assert_eq!(harness.balance_of(&operator(4)), 500);
}

#[test]
fn given_indivisible_pool_when_distributing_then_dust_stays_in_reserve() {
    let harness = funded_harness(100);
    let validators = vec![
        validator(1, 1, ValidatorStatus::Bonded),
        validator(2, 1, ValidatorStatus::Bonded),
        validator(3, 1, ValidatorStatus::Bonded),
    ];

    let report = distribute_rewards(&harness.manager.context(200), &validators, 100);

    assert!(report.payouts.iter().all(|payout| payout.amount == 33));
    assert_eq!(report.distributed(), 99);
    assert_eq!(report.dust(), 1);
    assert_eq!(harness.module_balance(ModuleAccount::Reserve), 1);
}

#[test]
fn given_malformed_operator_when_distributing_then_only_that_validator_is_skipped() {
    let harness = funded_harness(1_000);
    let mut broken = validator(2, 500, ValidatorStatus::Bonded);
    broken.operator_address = "garbage".to_string();
    let validators = vec![validator(1, 500, ValidatorStatus::Bonded), broken];

    let report = distribute_rewards(&harness.manager.context(200), &validators, 1_000);

    assert_eq!(report.payouts.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].operator_address, "garbage");
    assert_eq!(
        report.failures[0].error.kind,
        SettlementErrorKind::AddressResolutionFailure
    );
    assert_eq!(harness.balance_of(&operator(1)), 500);
    assert_eq!(harness.module_balance(ModuleAccount::Reserve), 500);
}

#[test]
fn given_rejected_payout_when_distributing_then_remaining_validators_are_still_paid() {
    let harness = funded_harness(1_000);
    harness.ledger.reject_transfers_to(Address::new(operator(1)));
    let validators = vec![
        validator(1, 250, ValidatorStatus::Bonded),
        validator(2, 250, ValidatorStatus::Bonded),
        validator(3, 500, ValidatorStatus::Bonded),
    ];

    let report = distribute_rewards(&harness.manager.context(200), &validators, 1_000);

    assert_eq!(report.failures.len(), 1);
    assert_eq!(
        report.failures[0].error.kind,
        SettlementErrorKind::TransferFailure
    );
    assert_eq!(harness.balance_of(&operator(2)), 250);
    assert_eq!(harness.balance_of(&operator(3)), 500);

    let payout_events = harness
        .events
        .events()
        .into_iter()
        .filter(|event| matches!(event, SettlementEvent::ValidatorPayout { .. }))
        .count();
    assert_eq!(payout_events, 2);
}

#[test]
fn given_empty_pool_when_distributing_then_nothing_is_paid() {
    let harness = funded_harness(1_000);
    let validators = vec![validator(1, 500, ValidatorStatus::Bonded)];

    let report = distribute_rewards(&harness.manager.context(200), &validators, 0);

    assert!(report.payouts.is_empty());
    assert!(harness.events.events().is_empty());
    assert_eq!(harness.module_balance(ModuleAccount::Reserve), 1_000);
}

#[test]
fn given_reserve_and_emission_curve_when_computing_pool_then_annual_cycles_divide_it() {
    // 7_300 blocks per year / 100 block cycle = 73 cycles
    let harness = funded_harness(365_000);
    let ctx = harness.manager.context(200);
    assert_eq!(ctx.param(ParamName::BlocksPerYear), 7_300);
    assert_eq!(cycle_reward_pool(&ctx, 100), 1_000);
    assert_eq!(cycle_reward_pool(&ctx, 0), 0);
}

#[test]
fn given_non_exact_reserve_when_computing_pool_then_result_is_rounded_once() {
    let harness = Harness::new(
        params()
            .with_value(ParamName::EmissionCurve, 3)
            .with_value(ParamName::BlocksPerYear, 700),
    );
    harness
        .ledger
        .set_module_balance(ModuleAccount::Reserve, DENOM, 1_000);

    // 1000 / 3 / 7 = 47.6..
    assert_eq!(cycle_reward_pool(&harness.manager.context(100), 100), 48);
}
