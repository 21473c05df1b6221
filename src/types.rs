use std::fmt;

use serde::{Deserialize, Serialize};

pub type BlockHeight = i64;
pub type Nonce = i64;
pub type Rate = i64;
pub type Amount = u64;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PubKey(pub String);

impl PubKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Billing basis of a contract.
///
/// Records written by a newer build can carry a tag this build does not know;
/// those deserialize into `Unrecognized` and are rejected by the debt policy
/// instead of failing the whole snapshot load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractType {
    Subscription,
    PayAsYouGo,
    Unrecognized(i32),
}

impl ContractType {
    pub fn code(&self) -> i32 {
        match self {
            ContractType::Subscription => 0,
            ContractType::PayAsYouGo => 1,
            ContractType::Unrecognized(code) => *code,
        }
    }

    pub fn from_code(code: i32) -> Self {
        match code {
            0 => ContractType::Subscription,
            1 => ContractType::PayAsYouGo,
            other => ContractType::Unrecognized(other),
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractType::Subscription => f.write_str("subscription"),
            ContractType::PayAsYouGo => f.write_str("pay_as_you_go"),
            ContractType::Unrecognized(code) => write!(f, "unrecognized({code})"),
        }
    }
}

impl Serialize for ContractType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            ContractType::Subscription => serializer.serialize_str("subscription"),
            ContractType::PayAsYouGo => serializer.serialize_str("pay_as_you_go"),
            ContractType::Unrecognized(code) => serializer.serialize_i32(*code),
        }
    }
}

impl<'de> Deserialize<'de> for ContractType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Name(String),
            Code(i32),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Code(code) => Ok(ContractType::from_code(code)),
            Repr::Name(name) => match name.as_str() {
                "subscription" => Ok(ContractType::Subscription),
                "pay_as_you_go" => Ok(ContractType::PayAsYouGo),
                other => Err(serde::de::Error::custom(format!(
                    "unknown contract type name '{other}'"
                ))),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContractKey {
    pub provider: PubKey,
    pub chain: String,
    pub client: PubKey,
}

impl fmt::Display for ContractKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.provider, self.chain, self.client)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub provider: PubKey,
    pub chain: String,
    pub client: PubKey,
    pub contract_type: ContractType,
    pub rate: Rate,
    /// Height the contract became active; subscription debt accrues from here.
    pub height: BlockHeight,
    #[serde(default)]
    pub nonce: Nonce,
    #[serde(default)]
    pub paid: Amount,
    pub deposit: Amount,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub closed_height: Option<BlockHeight>,
}

impl Contract {
    pub fn key(&self) -> ContractKey {
        ContractKey {
            provider: self.provider.clone(),
            chain: self.chain.clone(),
            client: self.client.clone(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.closed_height.is_none()
    }

    pub fn expires_at(&self) -> BlockHeight {
        self.height.saturating_add(self.duration)
    }

    pub fn remaining_deposit(&self) -> Amount {
        self.deposit.saturating_sub(self.paid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContractExpirationSet {
    pub height: BlockHeight,
    #[serde(default)]
    pub contracts: Vec<ContractKey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorStatus {
    Unbonded,
    Unbonding,
    Bonded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub operator_address: String,
    pub tokens: Amount,
    pub status: ValidatorStatus,
}

impl Validator {
    pub fn is_bonded(&self) -> bool {
        self.status == ValidatorStatus::Bonded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleAccount {
    /// Escrow holding client deposits.
    Contract,
    /// Funds reserve-tax income and validator rewards.
    Reserve,
}

impl ModuleAccount {
    pub fn name(&self) -> &'static str {
        match self {
            ModuleAccount::Contract => "contract",
            ModuleAccount::Reserve => "reserve",
        }
    }
}

impl fmt::Display for ModuleAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: Amount,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: Amount) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransferTarget {
    Account { address: Address },
    Module { module: ModuleAccount },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOutput {
    pub to: TransferTarget,
    pub coin: Coin,
}

impl TransferOutput {
    pub fn to_account(address: Address, coin: Coin) -> Self {
        Self {
            to: TransferTarget::Account { address },
            coin,
        }
    }

    pub fn to_module(module: ModuleAccount, coin: Coin) -> Self {
        Self {
            to: TransferTarget::Module { module },
            coin,
        }
    }
}
