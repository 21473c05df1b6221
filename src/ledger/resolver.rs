use sha2::{Digest, Sha256};

use crate::{
    settlement::{AddressResolverPort, SettlementError, error::address_resolution_failure},
    types::{Address, PubKey},
};

pub const DEFAULT_ADDRESS_PREFIX: &str = "mtr";
const ADDRESS_BYTES: usize = 20;

/// Derives account addresses as `<prefix>1<hex(sha256(key)[..20])>` from
/// hex-encoded 32 or 33 byte public keys.
#[derive(Debug, Clone)]
pub struct HexAddressResolver {
    prefix: String,
}

impl HexAddressResolver {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn address_for_bytes(&self, key_bytes: &[u8]) -> Address {
        let digest = Sha256::digest(key_bytes);
        Address::new(format!(
            "{}1{}",
            self.prefix,
            hex::encode(&digest[..ADDRESS_BYTES])
        ))
    }
}

impl Default for HexAddressResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS_PREFIX)
    }
}

impl AddressResolverPort for HexAddressResolver {
    fn resolve_pubkey(&self, key: &PubKey) -> Result<Address, SettlementError> {
        let bytes = hex::decode(key.as_str()).map_err(|err| {
            address_resolution_failure(format!("public key '{}' is not hex: {}", key, err))
        })?;
        if bytes.len() != 32 && bytes.len() != 33 {
            return Err(address_resolution_failure(format!(
                "public key '{}' has {} bytes, expected 32 or 33",
                key,
                bytes.len()
            )));
        }
        Ok(self.address_for_bytes(&bytes))
    }

    fn resolve_operator(&self, operator_address: &str) -> Result<Address, SettlementError> {
        let Some(body) = operator_address
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('1'))
        else {
            return Err(address_resolution_failure(format!(
                "operator address '{}' does not carry prefix '{}'",
                operator_address, self.prefix
            )));
        };

        match hex::decode(body) {
            Ok(bytes) if bytes.len() == ADDRESS_BYTES => Ok(Address::new(operator_address)),
            _ => Err(address_resolution_failure(format!(
                "operator address '{}' is malformed",
                operator_address
            ))),
        }
    }
}
