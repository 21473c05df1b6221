pub mod context;
pub mod debt;
pub mod engine;
pub mod error;
pub mod events;
pub mod ports;

pub use context::{LedgerPorts, SettlementContext};
pub use debt::contract_debt;
pub use engine::{DebtSplit, settle_contract, split_debt};
pub use error::{SettlementError, SettlementErrorKind};
pub use events::SettlementEvent;
pub use ports::{
    AddressResolverPort, BankPort, ContractStorePort, EventSinkPort, ValidatorSetPort,
};
