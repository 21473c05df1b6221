use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::{Address, Amount, Contract, ContractExpirationSet, ModuleAccount, Validator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleBalance {
    pub module: ModuleAccount,
    pub denom: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub address: Address,
    pub denom: String,
    pub amount: Amount,
}

/// Serializable image of an in-memory ledger.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub contracts: Vec<Contract>,
    #[serde(default)]
    pub expirations: Vec<ContractExpirationSet>,
    #[serde(default)]
    pub module_balances: Vec<ModuleBalance>,
    #[serde(default)]
    pub account_balances: Vec<AccountBalance>,
    #[serde(default)]
    pub validators: Vec<Validator>,
}

impl LedgerSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read ledger snapshot {}", path.display()))?;
        json5::from_str(&content)
            .with_context(|| format!("failed to parse ledger snapshot {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content =
            serde_json::to_string_pretty(self).context("failed to serialize ledger snapshot")?;
        fs::write(path, content)
            .with_context(|| format!("failed to write ledger snapshot {}", path.display()))
    }
}
