use crate::{
    math::{block_reward, safe_share},
    params::ParamName,
    rewards::types::{RewardReport, ValidatorFailure, ValidatorPayout},
    settlement::{SettlementContext, SettlementEvent},
    types::{Amount, Coin, ModuleAccount, Validator},
};

/// Reward pool for one payout cycle, funded from the current reserve balance.
pub fn cycle_reward_pool(ctx: &SettlementContext<'_>, payout_cycle: i64) -> Amount {
    if payout_cycle <= 0 {
        return 0;
    }
    let reserve = ctx
        .ports
        .bank
        .module_balance(ModuleAccount::Reserve, ctx.denom());
    let cycles_per_year = ctx.param(ParamName::BlocksPerYear) / payout_cycle;
    block_reward(
        reserve,
        ctx.param(ParamName::EmissionCurve),
        cycles_per_year,
    )
}

/// Pays `pool` out of the reserve to bonded validators in proportion to their
/// stake. A validator that cannot be paid is recorded and skipped.
pub fn distribute_rewards(
    ctx: &SettlementContext<'_>,
    validators: &[Validator],
    pool: Amount,
) -> RewardReport {
    let total_bonded = validators
        .iter()
        .filter(|validator| validator.is_bonded())
        .fold(0, |sum: Amount, validator| sum.saturating_add(validator.tokens));

    let mut report = RewardReport {
        height: ctx.height,
        pool,
        total_bonded,
        ..RewardReport::default()
    };

    if pool == 0 {
        tracing::info!(target: "rewards", height = ctx.height, "no_validator_rewards");
        return report;
    }

    for validator in validators.iter().filter(|validator| validator.is_bonded()) {
        let address = match ctx
            .ports
            .addresses
            .resolve_operator(&validator.operator_address)
        {
            Ok(address) => address,
            Err(err) => {
                tracing::error!(
                    target: "rewards",
                    height = ctx.height,
                    validator = %validator.operator_address,
                    error = %err,
                    "validator_address_unresolved"
                );
                report.failures.push(ValidatorFailure {
                    operator_address: validator.operator_address.clone(),
                    error: err,
                });
                continue;
            }
        };

        let amount = safe_share(validator.tokens, total_bonded, pool);
        if let Err(err) = ctx.ports.bank.send_from_module_to_account(
            ModuleAccount::Reserve,
            &address,
            &Coin::new(ctx.denom(), amount),
        ) {
            tracing::error!(
                target: "rewards",
                height = ctx.height,
                validator = %validator.operator_address,
                amount,
                error = %err,
                "validator_payout_failed"
            );
            report.failures.push(ValidatorFailure {
                operator_address: validator.operator_address.clone(),
                error: err,
            });
            continue;
        }

        tracing::info!(
            target: "rewards",
            height = ctx.height,
            validator = %address,
            amount,
            "validator_rewarded"
        );
        ctx.ports.events.emit(SettlementEvent::ValidatorPayout {
            height: ctx.height,
            validator: address.clone(),
            amount,
        });
        report.payouts.push(ValidatorPayout {
            operator_address: validator.operator_address.clone(),
            address,
            tokens: validator.tokens,
            amount,
        });
    }

    report
}
