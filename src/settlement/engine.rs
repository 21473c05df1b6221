use crate::{
    math::safe_share,
    params::ParamName,
    settlement::{
        context::SettlementContext,
        debt::contract_debt,
        error::{SettlementError, SettlementErrorKind, arithmetic_error, persistence_failure},
        events::SettlementEvent,
    },
    types::{Amount, Coin, Contract, ModuleAccount, TransferOutput},
};

/// How a settled debt is split, plus the refund owed on closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DebtSplit {
    pub total_debt: Amount,
    pub provider_income: Amount,
    pub reserve_tax: Amount,
    pub refund: Amount,
}

pub fn split_debt(
    contract: &Contract,
    total_debt: Amount,
    reserve_tax_bps: i64,
    max_basis_points: i64,
    closing: bool,
) -> Result<DebtSplit, SettlementError> {
    let reserve_tax = safe_share(
        reserve_tax_bps.max(0) as Amount,
        max_basis_points.max(0) as Amount,
        total_debt,
    )
    .min(total_debt);

    let paid_after = contract
        .paid
        .checked_add(total_debt)
        .ok_or_else(|| arithmetic_error(format!("paid overflow on contract {}", contract.key())))?;

    Ok(DebtSplit {
        total_debt,
        provider_income: total_debt - reserve_tax,
        reserve_tax,
        refund: if closing {
            contract.deposit.saturating_sub(paid_after)
        } else {
            0
        },
    })
}

/// Pays the provider what it is owed and, when `closing`, refunds the rest of
/// the deposit to the client and closes the contract.
///
/// The updated record is written before funds move. If the transfer is
/// rejected, the record the store held beforehand is written back (or the
/// untouched input when the store had none). All payouts of one settlement go
/// out as a single multi-output transfer.
pub fn settle_contract(
    ctx: &SettlementContext<'_>,
    mut contract: Contract,
    nonce: i64,
    closing: bool,
) -> Result<Contract, SettlementError> {
    if !contract.is_open() {
        tracing::debug!(
            target: "settlement",
            contract = %contract.key(),
            closed_height = ?contract.closed_height,
            "contract_already_closed"
        );
        return Ok(contract);
    }

    let input = contract.clone();
    if nonce > contract.nonce {
        contract.nonce = nonce;
    }

    let total_debt = contract_debt(ctx.height, &contract)?;
    let split = split_debt(
        &contract,
        total_debt,
        ctx.param(ParamName::ReserveTax),
        ctx.param(ParamName::MaxBasisPoints),
        closing,
    )?;
    let outputs = payout_outputs(ctx, &contract, &split)?;

    contract.paid += split.total_debt;
    if closing {
        contract.closed_height = Some(ctx.height);
    }

    let previous = rollback_image(ctx, input)?;
    ctx.ports.contracts.set_contract(&contract)?;

    if !outputs.is_empty()
        && let Err(err) = ctx
            .ports
            .bank
            .send_from_module_multi(ModuleAccount::Contract, &outputs)
    {
        if let Err(rollback_err) = ctx.ports.contracts.set_contract(&previous) {
            tracing::error!(
                target: "settlement",
                contract = %contract.key(),
                error = %rollback_err,
                "contract_rollback_failed"
            );
            return Err(persistence_failure(format!(
                "transfer failed ({err}) and contract {} could not be restored: {rollback_err}",
                contract.key()
            )));
        }
        return Err(err);
    }

    tracing::info!(
        target: "settlement",
        height = ctx.height,
        contract = %contract.key(),
        total_debt = split.total_debt,
        provider_income = split.provider_income,
        reserve_tax = split.reserve_tax,
        refund = split.refund,
        closed = closing,
        "contract_settled"
    );

    ctx.ports.events.emit(SettlementEvent::ContractSettlement {
        height: ctx.height,
        provider_income: split.provider_income,
        reserve_tax: split.reserve_tax,
        refund: split.refund,
        contract: contract.clone(),
    });

    Ok(contract)
}

fn rollback_image(
    ctx: &SettlementContext<'_>,
    input: Contract,
) -> Result<Contract, SettlementError> {
    match ctx.ports.contracts.contract(&input.key()) {
        Ok(stored) => Ok(stored),
        Err(err) if err.kind == SettlementErrorKind::NotFound => Ok(input),
        Err(err) => Err(err),
    }
}

fn payout_outputs(
    ctx: &SettlementContext<'_>,
    contract: &Contract,
    split: &DebtSplit,
) -> Result<Vec<TransferOutput>, SettlementError> {
    let denom = ctx.denom();
    let mut outputs = Vec::with_capacity(3);

    if split.provider_income > 0 {
        let provider = ctx.ports.addresses.resolve_pubkey(&contract.provider)?;
        outputs.push(TransferOutput::to_account(
            provider,
            Coin::new(denom, split.provider_income),
        ));
    }
    if split.reserve_tax > 0 {
        outputs.push(TransferOutput::to_module(
            ModuleAccount::Reserve,
            Coin::new(denom, split.reserve_tax),
        ));
    }
    if split.refund > 0 {
        let client = ctx.ports.addresses.resolve_pubkey(&contract.client)?;
        outputs.push(TransferOutput::to_account(
            client,
            Coin::new(denom, split.refund),
        ));
    }

    Ok(outputs)
}
