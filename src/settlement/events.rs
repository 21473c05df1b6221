use serde::{Deserialize, Serialize};

use crate::types::{Address, Amount, BlockHeight, Contract};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SettlementEvent {
    ContractSettlement {
        height: BlockHeight,
        provider_income: Amount,
        reserve_tax: Amount,
        refund: Amount,
        contract: Contract,
    },
    ValidatorPayout {
        height: BlockHeight,
        validator: Address,
        amount: Amount,
    },
}

impl SettlementEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SettlementEvent::ContractSettlement { .. } => "contract_settlement",
            SettlementEvent::ValidatorPayout { .. } => "validator_payout",
        }
    }
}
