use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementErrorKind {
    InvalidContractType,
    TransferFailure,
    AddressResolutionFailure,
    PersistenceFailure,
    NotFound,
    Arithmetic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementError {
    pub kind: SettlementErrorKind,
    pub message: String,
}

impl SettlementError {
    pub fn new(kind: SettlementErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for SettlementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SettlementError {}

pub fn invalid_contract_type(message: impl Into<String>) -> SettlementError {
    SettlementError::new(SettlementErrorKind::InvalidContractType, message)
}

pub fn transfer_failure(message: impl Into<String>) -> SettlementError {
    SettlementError::new(SettlementErrorKind::TransferFailure, message)
}

pub fn address_resolution_failure(message: impl Into<String>) -> SettlementError {
    SettlementError::new(SettlementErrorKind::AddressResolutionFailure, message)
}

pub fn persistence_failure(message: impl Into<String>) -> SettlementError {
    SettlementError::new(SettlementErrorKind::PersistenceFailure, message)
}

pub fn not_found(message: impl Into<String>) -> SettlementError {
    SettlementError::new(SettlementErrorKind::NotFound, message)
}

pub fn arithmetic_error(message: impl Into<String>) -> SettlementError {
    SettlementError::new(SettlementErrorKind::Arithmetic, message)
}
