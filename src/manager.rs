use serde::{Deserialize, Serialize};

use crate::{
    params::{ParamName, ParamSnapshot, ParamSourcePort},
    rewards::{RewardReport, cycle_reward_pool, distribute_rewards},
    settlement::{LedgerPorts, SettlementContext, SettlementError, settle_contract},
    types::{BlockHeight, Contract, ContractKey},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FailureSubject {
    ExpirationSet { height: BlockHeight },
    Contract { key: ContractKey },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub subject: FailureSubject,
    pub error: SettlementError,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockEndReport {
    pub height: BlockHeight,
    pub settled: Vec<ContractKey>,
    pub failures: Vec<ItemFailure>,
    /// Present only on payout-cycle heights.
    #[serde(default)]
    pub rewards: Option<RewardReport>,
}

impl BlockEndReport {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
            + self
                .rewards
                .as_ref()
                .map(|rewards| rewards.failures.len())
                .unwrap_or(0)
    }
}

/// Block-end entry point: closes expired contracts and pays validator rewards.
pub struct Manager {
    ports: LedgerPorts,
    params: ParamSnapshot,
}

impl Manager {
    pub fn new(ports: LedgerPorts, params: &dyn ParamSourcePort) -> Self {
        Self {
            ports,
            params: ParamSnapshot::resolve(params),
        }
    }

    pub fn params(&self) -> &ParamSnapshot {
        &self.params
    }

    pub fn context(&self, height: BlockHeight) -> SettlementContext<'_> {
        SettlementContext::new(height, &self.ports, &self.params)
    }

    /// Never fails: every per-item problem is logged and reported instead.
    #[tracing::instrument(name = "end_block", target = "manager", skip(self))]
    pub fn end_block(&self, height: BlockHeight) -> BlockEndReport {
        let ctx = self.context(height);
        let report = BlockEndReport {
            height,
            ..BlockEndReport::default()
        };

        let mut report = self.contract_end_block(&ctx, report);
        report.rewards = self.validator_end_block(&ctx);

        if report.failure_count() > 0 {
            tracing::warn!(
                target: "manager",
                height,
                failures = report.failure_count(),
                "end_block_completed_with_failures"
            );
        }
        report
    }

    /// Settles one contract outside of expiry, e.g. when a usage claim is filed.
    pub fn settle_contract(
        &self,
        height: BlockHeight,
        contract: Contract,
        nonce: i64,
        closing: bool,
    ) -> Result<Contract, SettlementError> {
        settle_contract(&self.context(height), contract, nonce, closing)
    }

    fn contract_end_block(
        &self,
        ctx: &SettlementContext<'_>,
        report: BlockEndReport,
    ) -> BlockEndReport {
        let expiring = match self.ports.contracts.contract_expiration_set(ctx.height) {
            Ok(set) => set,
            Err(err) => {
                tracing::error!(
                    target: "manager",
                    height = ctx.height,
                    error = %err,
                    "expiration_set_unavailable"
                );
                let mut report = report;
                report.failures.push(ItemFailure {
                    subject: FailureSubject::ExpirationSet { height: ctx.height },
                    error: err,
                });
                return report;
            }
        };

        expiring
            .contracts
            .into_iter()
            .fold(report, |mut report, key| {
                let settled = self
                    .ports
                    .contracts
                    .contract(&key)
                    .inspect_err(|err| {
                        tracing::error!(
                            target: "manager",
                            provider = %key.provider,
                            chain = %key.chain,
                            client = %key.client,
                            error = %err,
                            "contract_fetch_failed"
                        );
                    })
                    .and_then(|contract| {
                        settle_contract(ctx, contract, 0, true).inspect_err(|err| {
                            tracing::error!(
                                target: "manager",
                                provider = %key.provider,
                                chain = %key.chain,
                                client = %key.client,
                                error = %err,
                                "contract_settlement_failed"
                            );
                        })
                    });

                match settled {
                    Ok(_) => report.settled.push(key),
                    Err(error) => report.failures.push(ItemFailure {
                        subject: FailureSubject::Contract { key },
                        error,
                    }),
                }
                report
            })
    }

    fn validator_end_block(&self, ctx: &SettlementContext<'_>) -> Option<RewardReport> {
        let payout_cycle = ctx.param(ParamName::ValidatorPayoutCycle);
        if payout_cycle <= 0 || ctx.height % payout_cycle != 0 {
            return None;
        }

        let pool = cycle_reward_pool(ctx, payout_cycle);
        if pool == 0 {
            tracing::info!(target: "manager", height = ctx.height, "no_validator_rewards");
            return Some(RewardReport {
                height: ctx.height,
                ..RewardReport::default()
            });
        }

        let validators = self.ports.validators.active_validators();
        Some(distribute_rewards(ctx, &validators, pool))
    }
}
