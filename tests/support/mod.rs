#![allow(dead_code)]

use std::sync::Arc;

use settlement_engine::{
    ledger::{HexAddressResolver, InMemoryLedger, RecordingEventSink, in_memory_ports},
    manager::Manager,
    params::{ParamName, ParamSnapshot},
    settlement::{AddressResolverPort, BankPort},
    types::{
        Address, Amount, BlockHeight, Contract, ContractType, ModuleAccount, PubKey, Validator,
        ValidatorStatus,
    },
};

pub const DENOM: &str = "umtr";

pub struct Harness {
    pub ledger: Arc<InMemoryLedger>,
    pub events: Arc<RecordingEventSink>,
    pub resolver: HexAddressResolver,
    pub manager: Manager,
}

impl Harness {
    pub fn new(params: ParamSnapshot) -> Self {
        let ledger = Arc::new(InMemoryLedger::new());
        let events = Arc::new(RecordingEventSink::default());
        let resolver = HexAddressResolver::default();
        let ports = in_memory_ports(Arc::clone(&ledger), resolver.clone(), events.clone());
        let manager = Manager::new(ports, &params);
        Self {
            ledger,
            events,
            resolver,
            manager,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(params())
    }

    /// Stores the contract and escrows its unpaid deposit in the contract pool.
    pub fn open(&self, contract: Contract) -> Contract {
        let escrow = self.module_balance(ModuleAccount::Contract) + contract.remaining_deposit();
        self.ledger
            .set_module_balance(ModuleAccount::Contract, DENOM, escrow);
        self.ledger.insert_contract(contract.clone());
        contract
    }

    pub fn module_balance(&self, module: ModuleAccount) -> Amount {
        self.ledger.module_balance(module, DENOM)
    }

    pub fn address_of(&self, key: &PubKey) -> Address {
        self.resolver
            .resolve_pubkey(key)
            .expect("test keys are well formed")
    }

    pub fn balance_of_key(&self, key: &PubKey) -> Amount {
        self.ledger.account_balance(&self.address_of(key), DENOM)
    }

    pub fn balance_of(&self, address: &str) -> Amount {
        self.ledger.account_balance(&Address::new(address), DENOM)
    }

    pub fn stored(&self, contract: &Contract) -> Contract {
        self.ledger
            .stored_contract(&contract.key())
            .expect("contract should be stored")
    }
}

pub fn params() -> ParamSnapshot {
    ParamSnapshot::defaults_for(1)
        .with_value(ParamName::ValidatorPayoutCycle, 100)
        .with_value(ParamName::EmissionCurve, 5)
        .with_value(ParamName::BlocksPerYear, 7_300)
        .with_value(ParamName::ReserveTax, 1_000)
        .with_denom(DENOM)
}

pub fn pubkey(seed: u8) -> PubKey {
    PubKey::new(format!("02{}", hex_byte(seed).repeat(32)))
}

pub fn operator(seed: u8) -> String {
    HexAddressResolver::default()
        .address_for_bytes(&[seed; 20])
        .0
}

pub fn validator(seed: u8, tokens: Amount, status: ValidatorStatus) -> Validator {
    Validator {
        operator_address: operator(seed),
        tokens,
        status,
    }
}

pub fn subscription(seed: u8, rate: i64, height: BlockHeight, deposit: Amount) -> Contract {
    Contract {
        provider: pubkey(seed),
        chain: "btc-mainnet".to_string(),
        client: pubkey(seed.wrapping_add(100)),
        contract_type: ContractType::Subscription,
        rate,
        height,
        nonce: 0,
        paid: 0,
        deposit,
        duration: 10,
        closed_height: None,
    }
}

pub fn pay_as_you_go(seed: u8, rate: i64, height: BlockHeight, deposit: Amount) -> Contract {
    Contract {
        contract_type: ContractType::PayAsYouGo,
        chain: "eth-mainnet".to_string(),
        ..subscription(seed, rate, height, deposit)
    }
}

fn hex_byte(seed: u8) -> String {
    format!("{:02x}", seed)
}
