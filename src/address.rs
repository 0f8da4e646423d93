//! Pay-to-public-key-hash addresses

use crate::base58;
use crate::constants::HASH160_LEN;
use crate::error::{Result, SignError};
use crate::keys::KeyPair;
use crate::network::Network;
use crate::script;
use crate::types::ByteString;
use std::fmt;

/// A P2PKH address: base58check(pubkey_address_prefix || HASH160(pubkey))
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    network: Network,
    pubkey_hash: [u8; HASH160_LEN],
}

impl Address {
    pub fn from_pubkey_hash(pubkey_hash: [u8; HASH160_LEN], network: Network) -> Self {
        Self {
            network,
            pubkey_hash,
        }
    }

    /// Address paying to the public key encoding `key` signs with
    pub fn p2pkh(key: &KeyPair, network: Network) -> Self {
        Self::from_pubkey_hash(key.public_key_hash(), network)
    }

    /// Parse an address string, requiring it to belong to `network`
    pub fn parse(s: &str, network: Network) -> Result<Self> {
        let payload =
            base58::check_decode(s.trim()).map_err(|e| SignError::InvalidAddress(e.to_string()))?;
        if payload.len() != 1 + HASH160_LEN {
            return Err(SignError::InvalidAddress(format!(
                "invalid payload length {}",
                payload.len()
            )));
        }
        let params = network.params();
        if payload[0] == params.script_address_prefix {
            return Err(SignError::InvalidAddress(
                "pay-to-script-hash addresses are not supported".to_string(),
            ));
        }
        if payload[0] != params.pubkey_address_prefix {
            return Err(SignError::InvalidAddress(format!(
                "version byte {:#04x} does not belong to {}",
                payload[0], network
            )));
        }
        let mut pubkey_hash = [0u8; HASH160_LEN];
        pubkey_hash.copy_from_slice(&payload[1..]);
        Ok(Self::from_pubkey_hash(pubkey_hash, network))
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn pubkey_hash(&self) -> &[u8; HASH160_LEN] {
        &self.pubkey_hash
    }

    /// Locking script paying to this address
    pub fn script_pubkey(&self) -> ByteString {
        script::p2pkh_script_pubkey(&self.pubkey_hash)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut payload = Vec::with_capacity(1 + HASH160_LEN);
        payload.push(self.network.params().pubkey_address_prefix);
        payload.extend_from_slice(&self.pubkey_hash);
        f.write_str(&base58::check_encode(&payload))
    }
}
