use crate::{
    settlement::{error::SettlementError, events::SettlementEvent},
    types::{
        Address, Amount, BlockHeight, Coin, Contract, ContractExpirationSet, ContractKey,
        ModuleAccount, PubKey, TransferOutput, Validator,
    },
};

pub trait ContractStorePort: Send + Sync {
    fn contract_expiration_set(
        &self,
        height: BlockHeight,
    ) -> Result<ContractExpirationSet, SettlementError>;

    fn contract(&self, key: &ContractKey) -> Result<Contract, SettlementError>;

    /// Upserts the full record.
    fn set_contract(&self, contract: &Contract) -> Result<(), SettlementError>;
}

pub trait BankPort: Send + Sync {
    fn module_balance(&self, module: ModuleAccount, denom: &str) -> Amount;

    fn send_from_module_to_account(
        &self,
        module: ModuleAccount,
        to: &Address,
        coin: &Coin,
    ) -> Result<(), SettlementError>;

    /// All outputs are applied or none are.
    fn send_from_module_multi(
        &self,
        from: ModuleAccount,
        outputs: &[TransferOutput],
    ) -> Result<(), SettlementError>;
}

pub trait ValidatorSetPort: Send + Sync {
    /// Ordering must be identical on every replica.
    fn active_validators(&self) -> Vec<Validator>;
}

pub trait AddressResolverPort: Send + Sync {
    fn resolve_pubkey(&self, key: &PubKey) -> Result<Address, SettlementError>;

    fn resolve_operator(&self, operator_address: &str) -> Result<Address, SettlementError>;
}

pub trait EventSinkPort: Send + Sync {
    fn emit(&self, event: SettlementEvent);
}
