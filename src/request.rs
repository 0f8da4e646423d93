//! JSON transport model for sign requests
//!
//! Requests carry hex-encoded bytes and WIF keys; `SignRequest::decode` turns
//! them into the engine's inputs after `validate` has checked every field.

use crate::error::{FieldError, Result, SignError};
use crate::keys::KeyPair;
use crate::network::Network;
use crate::sighash::SighashType;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// A previous output as sent by callers. `tx_id` is display (reversed) hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinDto {
    pub tx_id: String,
    pub index: u32,
    pub value: i64,
    pub script_pub_key: String,
}

impl CoinDto {
    pub fn from_coin(coin: &Coin) -> Self {
        let mut display = coin.outpoint.hash;
        display.reverse();
        Self {
            tx_id: hex::encode(display),
            index: coin.outpoint.index,
            value: coin.output.value,
            script_pub_key: hex::encode(coin.script_pubkey()),
        }
    }

    pub fn to_coin(&self) -> Result<Coin> {
        let mut hash = decode_tx_id(&self.tx_id)?;
        hash.reverse();
        let script = hex::decode(self.script_pub_key.trim())
            .map_err(|e| SignError::MalformedData(format!("scriptPubKey: {}", e)))?;
        Ok(Coin::new(OutPoint::new(hash, self.index), self.value, script))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    pub transaction_hex: String,
    pub coins: Vec<CoinDto>,
    pub private_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sighash_type: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignResponse {
    pub signed_transaction: String,
}

/// Engine inputs decoded from a `SignRequest`
#[derive(Debug)]
pub struct DecodedRequest {
    pub unsigned: Vec<u8>,
    pub coins: Vec<Coin>,
    pub keys: Vec<KeyPair>,
    pub sighash_type: SighashType,
}

impl SignRequest {
    /// Field-level checks; an empty result means `decode` can only fail in the engine
    pub fn validate(&self, network: Network) -> Vec<FieldError> {
        let mut errors = Vec::new();

        let tx_hex = self.transaction_hex.trim();
        if tx_hex.is_empty() {
            errors.push(FieldError::new("transactionHex", "must not be empty"));
        } else if let Err(e) = hex::decode(tx_hex) {
            errors.push(FieldError::new("transactionHex", format!("invalid hex: {}", e)));
        }

        if self.coins.is_empty() {
            errors.push(FieldError::new("coins", "must contain at least one coin"));
        }
        for (i, coin) in self.coins.iter().enumerate() {
            if let Err(e) = decode_tx_id(&coin.tx_id) {
                errors.push(FieldError::new(format!("coins[{}].txId", i), e.to_string()));
            }
            if hex::decode(coin.script_pub_key.trim()).is_err() {
                errors.push(FieldError::new(
                    format!("coins[{}].scriptPubKey", i),
                    "invalid hex",
                ));
            }
            if coin.value < 0 {
                errors.push(FieldError::new(
                    format!("coins[{}].value", i),
                    "must not be negative",
                ));
            }
        }

        if self.private_keys.is_empty() {
            errors.push(FieldError::new("privateKeys", "must contain at least one key"));
        }
        for (i, wif) in self.private_keys.iter().enumerate() {
            if wif.trim().is_empty() {
                errors.push(FieldError::new(format!("privateKeys[{}]", i), "must not be empty"));
            } else if let Err(e) = KeyPair::from_wif(wif, network) {
                errors.push(FieldError::new(format!("privateKeys[{}]", i), e.to_string()));
            }
        }

        if let Some(ty) = self.sighash_type {
            if let Err(e) = SighashType::from_u32(ty) {
                errors.push(FieldError::new("sighashType", e.to_string()));
            }
        }

        errors
    }

    pub fn decode(&self, network: Network) -> Result<DecodedRequest> {
        let unsigned = hex::decode(self.transaction_hex.trim())
            .map_err(|e| SignError::MalformedData(format!("transactionHex: {}", e)))?;
        let coins = self
            .coins
            .iter()
            .map(CoinDto::to_coin)
            .collect::<Result<Vec<_>>>()?;
        let keys = self
            .private_keys
            .iter()
            .map(|wif| KeyPair::from_wif(wif, network))
            .collect::<Result<Vec<_>>>()?;
        let sighash_type = match self.sighash_type {
            Some(ty) => SighashType::from_u32(ty)?,
            None => SighashType::default(),
        };

        Ok(DecodedRequest {
            unsigned,
            coins,
            keys,
            sighash_type,
        })
    }
}

fn decode_tx_id(tx_id: &str) -> Result<Hash> {
    let bytes = hex::decode(tx_id.trim())
        .map_err(|e| SignError::MalformedData(format!("txId: {}", e)))?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| SignError::MalformedData(format!("txId: expected 32 bytes, got {}", len)))
}
