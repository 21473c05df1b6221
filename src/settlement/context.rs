use std::sync::Arc;

use crate::{
    params::{ParamName, ParamSnapshot},
    settlement::ports::{
        AddressResolverPort, BankPort, ContractStorePort, EventSinkPort, ValidatorSetPort,
    },
    types::BlockHeight,
};

/// Handles to every external collaborator the engine talks to.
#[derive(Clone)]
pub struct LedgerPorts {
    pub contracts: Arc<dyn ContractStorePort>,
    pub bank: Arc<dyn BankPort>,
    pub validators: Arc<dyn ValidatorSetPort>,
    pub addresses: Arc<dyn AddressResolverPort>,
    pub events: Arc<dyn EventSinkPort>,
}

/// Everything one block's settlement work needs; built once per block.
#[derive(Clone, Copy)]
pub struct SettlementContext<'a> {
    pub height: BlockHeight,
    pub ports: &'a LedgerPorts,
    pub params: &'a ParamSnapshot,
}

impl<'a> SettlementContext<'a> {
    pub fn new(height: BlockHeight, ports: &'a LedgerPorts, params: &'a ParamSnapshot) -> Self {
        Self {
            height,
            ports,
            params,
        }
    }

    pub fn param(&self, name: ParamName) -> i64 {
        self.params.get(name)
    }

    pub fn denom(&self) -> &str {
        &self.params.denom
    }
}
