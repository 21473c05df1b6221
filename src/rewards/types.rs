use serde::{Deserialize, Serialize};

use crate::{
    settlement::SettlementError,
    types::{Address, Amount, BlockHeight},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorPayout {
    pub operator_address: String,
    pub address: Address,
    pub tokens: Amount,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorFailure {
    pub operator_address: String,
    pub error: SettlementError,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RewardReport {
    pub height: BlockHeight,
    pub pool: Amount,
    pub total_bonded: Amount,
    pub payouts: Vec<ValidatorPayout>,
    pub failures: Vec<ValidatorFailure>,
}

impl RewardReport {
    pub fn distributed(&self) -> Amount {
        self.payouts
            .iter()
            .fold(0, |sum: Amount, payout| sum.saturating_add(payout.amount))
    }

    /// Part of the pool left in the reserve: rounding residue plus failed payouts.
    pub fn dust(&self) -> Amount {
        self.pool.saturating_sub(self.distributed())
    }
}
