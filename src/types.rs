//! Core transaction types for signing

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hash type: 256-bit hash, internal byte order
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// OutPoint: 𝒪 = ℍ × 𝕌32
///
/// Identifies a previous transaction output. `hash` is kept in internal
/// (serialization) byte order; `Display` prints the conventional reversed hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub hash: Hash,
    pub index: u32,
}

impl OutPoint {
    pub fn new(hash: Hash, index: u32) -> Self {
        Self { hash, index }
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut display = self.hash;
        display.reverse();
        write!(f, "{}:{}", hex::encode(display), self.index)
    }
}

/// Transaction Input: ℐ = 𝒪 × 𝕊 × 𝕌32
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub prevout: OutPoint,
    pub script_sig: ByteString,
    pub sequence: u32,
}

/// Transaction Output: 𝒯 = ℤ64 × 𝕊
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub value: i64,
    pub script_pubkey: ByteString,
}

/// Transaction: 𝒯𝒳 = ℤ32 × ℐ* × 𝒯* × 𝕌32
///
/// Input and output order is bound into every signature hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,
}

/// Coin: 𝒞 = 𝒪 × 𝒯
///
/// A previous output supplied by the caller for an input being signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub outpoint: OutPoint,
    pub output: TransactionOutput,
}

impl Coin {
    pub fn new(outpoint: OutPoint, value: i64, script_pubkey: ByteString) -> Self {
        Self {
            outpoint,
            output: TransactionOutput {
                value,
                script_pubkey,
            },
        }
    }

    /// Locking script of the spent output
    pub fn script_pubkey(&self) -> &[u8] {
        &self.output.script_pubkey
    }
}
