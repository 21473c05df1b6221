use crate::{
    settlement::error::{SettlementError, arithmetic_error, invalid_contract_type},
    types::{Amount, BlockHeight, Contract, ContractType},
};

/// Debt owed to the provider at `height`, never more than what is left of the deposit.
pub fn contract_debt(height: BlockHeight, contract: &Contract) -> Result<Amount, SettlementError> {
    let accrued: i128 = match contract.contract_type {
        ContractType::Subscription => {
            (contract.rate as i128) * ((height as i128) - (contract.height as i128))
        }
        ContractType::PayAsYouGo => (contract.rate as i128) * (contract.nonce as i128),
        ContractType::Unrecognized(code) => {
            return Err(invalid_contract_type(format!(
                "contract {} has unrecognized type code {}",
                contract.key(),
                code
            )));
        }
    };

    let debt = accrued - contract.paid as i128;
    if debt <= 0 {
        return Ok(0);
    }

    let remaining = contract.remaining_deposit() as i128;
    let debt = debt.min(remaining);
    Amount::try_from(debt)
        .map_err(|_| arithmetic_error(format!("debt {} does not fit an amount", debt)))
}
