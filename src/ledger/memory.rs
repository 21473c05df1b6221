use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Mutex, MutexGuard},
};

use crate::{
    ledger::snapshot::{AccountBalance, LedgerSnapshot, ModuleBalance},
    settlement::{
        BankPort, ContractStorePort, SettlementError, ValidatorSetPort,
        error::{not_found, persistence_failure, transfer_failure},
    },
    types::{
        Address, Amount, BlockHeight, Coin, Contract, ContractExpirationSet, ContractKey,
        ModuleAccount, TransferOutput, TransferTarget, Validator,
    },
};

#[derive(Debug, Default)]
struct LedgerState {
    contracts: BTreeMap<ContractKey, Contract>,
    expirations: BTreeMap<BlockHeight, Vec<ContractKey>>,
    modules: BTreeMap<(ModuleAccount, String), Amount>,
    accounts: BTreeMap<(Address, String), Amount>,
    validators: Vec<Validator>,
    /// Writes still accepted per key before the store starts rejecting them.
    write_budgets: BTreeMap<ContractKey, usize>,
    rejected_recipients: BTreeSet<Address>,
    unavailable_expirations: BTreeSet<BlockHeight>,
}

impl LedgerState {
    fn index_expiration(&mut self, height: BlockHeight, key: ContractKey) {
        let entries = self.expirations.entry(height).or_default();
        if !entries.contains(&key) {
            entries.push(key);
        }
    }

    fn module_balance(&self, module: ModuleAccount, denom: &str) -> Amount {
        self.modules
            .get(&(module, denom.to_string()))
            .copied()
            .unwrap_or(0)
    }

    fn debit_module(
        &mut self,
        module: ModuleAccount,
        coin: &Coin,
    ) -> Result<(), SettlementError> {
        let available = self.module_balance(module, &coin.denom);
        let remaining = available.checked_sub(coin.amount).ok_or_else(|| {
            transfer_failure(format!(
                "insufficient funds in module '{}': required={}{}, available={}{}",
                module, coin.amount, coin.denom, available, coin.denom
            ))
        })?;
        self.modules.insert((module, coin.denom.clone()), remaining);
        Ok(())
    }

    fn credit(&mut self, target: &TransferTarget, coin: &Coin) -> Result<(), SettlementError> {
        let balance = match target {
            TransferTarget::Account { address } => self
                .accounts
                .entry((address.clone(), coin.denom.clone()))
                .or_insert(0),
            TransferTarget::Module { module } => self
                .modules
                .entry((*module, coin.denom.clone()))
                .or_insert(0),
        };
        *balance = balance
            .checked_add(coin.amount)
            .ok_or_else(|| transfer_failure(format!("balance overflow crediting {target:?}")))?;
        Ok(())
    }

    fn check_recipient(&self, target: &TransferTarget) -> Result<(), SettlementError> {
        match target {
            TransferTarget::Account { address } if self.rejected_recipients.contains(address) => {
                Err(transfer_failure(format!(
                    "recipient '{}' is not allowed to receive funds",
                    address
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Single-writer in-memory ledger backing every collaborator port.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        let ledger = Self::new();
        {
            let mut state = ledger.lock_state();
            for contract in snapshot.contracts {
                let key = contract.key();
                if contract.is_open() {
                    state.index_expiration(contract.expires_at(), key.clone());
                }
                state.contracts.insert(key, contract);
            }
            for set in snapshot.expirations {
                for key in set.contracts {
                    state.index_expiration(set.height, key);
                }
            }
            for balance in snapshot.module_balances {
                state
                    .modules
                    .insert((balance.module, balance.denom), balance.amount);
            }
            for balance in snapshot.account_balances {
                state
                    .accounts
                    .insert((balance.address, balance.denom), balance.amount);
            }
            state.validators = snapshot.validators;
        }
        ledger
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        let state = self.lock_state();
        LedgerSnapshot {
            contracts: state.contracts.values().cloned().collect(),
            expirations: state
                .expirations
                .iter()
                .map(|(height, keys)| ContractExpirationSet {
                    height: *height,
                    contracts: keys.clone(),
                })
                .collect(),
            module_balances: state
                .modules
                .iter()
                .map(|((module, denom), amount)| ModuleBalance {
                    module: *module,
                    denom: denom.clone(),
                    amount: *amount,
                })
                .collect(),
            account_balances: state
                .accounts
                .iter()
                .map(|((address, denom), amount)| AccountBalance {
                    address: address.clone(),
                    denom: denom.clone(),
                    amount: *amount,
                })
                .collect(),
            validators: state.validators.clone(),
        }
    }

    /// Stores the contract and indexes it under its expiry height while open.
    pub fn insert_contract(&self, contract: Contract) {
        let mut state = self.lock_state();
        let key = contract.key();
        if contract.is_open() {
            state.index_expiration(contract.expires_at(), key.clone());
        }
        state.contracts.insert(key, contract);
    }

    pub fn index_expiration(&self, height: BlockHeight, key: ContractKey) {
        self.lock_state().index_expiration(height, key);
    }

    pub fn stored_contract(&self, key: &ContractKey) -> Option<Contract> {
        self.lock_state().contracts.get(key).cloned()
    }

    pub fn set_module_balance(&self, module: ModuleAccount, denom: &str, amount: Amount) {
        self.lock_state()
            .modules
            .insert((module, denom.to_string()), amount);
    }

    pub fn account_balance(&self, address: &Address, denom: &str) -> Amount {
        self.lock_state()
            .accounts
            .get(&(address.clone(), denom.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn set_validators(&self, validators: Vec<Validator>) {
        self.lock_state().validators = validators;
    }

    pub fn reject_contract_writes(&self, key: ContractKey) {
        self.reject_contract_writes_after(key, 0);
    }

    /// Accepts `allowed` more writes for `key`, then rejects every later one.
    pub fn reject_contract_writes_after(&self, key: ContractKey, allowed: usize) {
        self.lock_state().write_budgets.insert(key, allowed);
    }

    pub fn reject_transfers_to(&self, address: Address) {
        self.lock_state().rejected_recipients.insert(address);
    }

    pub fn fail_expiration_set(&self, height: BlockHeight) {
        self.lock_state().unavailable_expirations.insert(height);
    }

    fn lock_state(&self) -> MutexGuard<'_, LedgerState> {
        // a panic while holding the lock cannot leave a half-applied transfer behind,
        // every mutation is validated before it is written
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ContractStorePort for InMemoryLedger {
    fn contract_expiration_set(
        &self,
        height: BlockHeight,
    ) -> Result<ContractExpirationSet, SettlementError> {
        let state = self.lock_state();
        if state.unavailable_expirations.contains(&height) {
            return Err(not_found(format!(
                "expiration index for height {} is unavailable",
                height
            )));
        }
        Ok(ContractExpirationSet {
            height,
            contracts: state.expirations.get(&height).cloned().unwrap_or_default(),
        })
    }

    fn contract(&self, key: &ContractKey) -> Result<Contract, SettlementError> {
        self.lock_state()
            .contracts
            .get(key)
            .cloned()
            .ok_or_else(|| not_found(format!("contract {} does not exist", key)))
    }

    fn set_contract(&self, contract: &Contract) -> Result<(), SettlementError> {
        let mut state = self.lock_state();
        let key = contract.key();
        if let Some(remaining) = state.write_budgets.get_mut(&key) {
            if *remaining == 0 {
                return Err(persistence_failure(format!(
                    "store rejected write for contract {}",
                    key
                )));
            }
            *remaining -= 1;
        }
        state.contracts.insert(key, contract.clone());
        Ok(())
    }
}

impl BankPort for InMemoryLedger {
    fn module_balance(&self, module: ModuleAccount, denom: &str) -> Amount {
        self.lock_state().module_balance(module, denom)
    }

    fn send_from_module_to_account(
        &self,
        module: ModuleAccount,
        to: &Address,
        coin: &Coin,
    ) -> Result<(), SettlementError> {
        self.send_from_module_multi(
            module,
            &[TransferOutput::to_account(to.clone(), coin.clone())],
        )
    }

    fn send_from_module_multi(
        &self,
        from: ModuleAccount,
        outputs: &[TransferOutput],
    ) -> Result<(), SettlementError> {
        let mut state = self.lock_state();

        let mut required: BTreeMap<&str, Amount> = BTreeMap::new();
        for output in outputs {
            state.check_recipient(&output.to)?;
            let total = required.entry(output.coin.denom.as_str()).or_insert(0);
            *total = total.checked_add(output.coin.amount).ok_or_else(|| {
                transfer_failure(format!("transfer total overflow in {}", output.coin.denom))
            })?;
        }
        for (denom, amount) in &required {
            let available = state.module_balance(from, denom);
            if available < *amount {
                return Err(transfer_failure(format!(
                    "insufficient funds in module '{}': required={}{}, available={}{}",
                    from, amount, denom, available, denom
                )));
            }
        }

        for output in outputs {
            state.debit_module(from, &output.coin)?;
            state.credit(&output.to, &output.coin)?;
        }
        Ok(())
    }
}

impl ValidatorSetPort for InMemoryLedger {
    fn active_validators(&self) -> Vec<Validator> {
        self.lock_state().validators.clone()
    }
}
