//! Legacy signature hash computation
//!
//! The digest for input `i` covers a copy of the transaction in which every
//! unlocking script is empty except input `i`'s, which is replaced by the
//! locking script of the coin it spends; the 4-byte sighash type is appended
//! and the result is hashed with SHA256d. Other inputs' unlocking scripts do
//! not affect the digest, so inputs can be signed in any order.

use crate::constants::SIGHASH_ALL;
use crate::error::{Result, SignError};
use crate::hash::sha256d;
use crate::serialization::write_transaction;
use crate::types::*;

/// Supported signature hash types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SighashType {
    #[default]
    All,
}

impl SighashType {
    pub fn from_u32(value: u32) -> Result<Self> {
        match value {
            SIGHASH_ALL => Ok(SighashType::All),
            other => Err(SignError::UnsupportedSighashType(other)),
        }
    }

    pub fn to_u32(self) -> u32 {
        match self {
            SighashType::All => SIGHASH_ALL,
        }
    }

    /// Byte appended to a DER signature inside an unlocking script
    pub fn to_byte(self) -> u8 {
        self.to_u32() as u8
    }
}

/// Digest signed for input `input_index` spending an output locked by `script_code`
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    sighash_type: SighashType,
) -> Result<Hash> {
    Ok(sha256d(&signature_preimage(
        tx,
        input_index,
        script_code,
        sighash_type,
    )?))
}

/// Bytes hashed by `signature_hash`
pub fn signature_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    sighash_type: SighashType,
) -> Result<Vec<u8>> {
    if input_index >= tx.inputs.len() {
        return Err(SignError::MalformedData(format!(
            "input index {} out of range (tx has {} inputs)",
            input_index,
            tx.inputs.len()
        )));
    }

    let transient = Transaction {
        version: tx.version,
        inputs: tx
            .inputs
            .iter()
            .enumerate()
            .map(|(i, input)| TransactionInput {
                prevout: input.prevout,
                script_sig: if i == input_index {
                    script_code.to_vec()
                } else {
                    Vec::new()
                },
                sequence: input.sequence,
            })
            .collect(),
        outputs: tx.outputs.clone(),
        lock_time: tx.lock_time,
    };

    let mut preimage = Vec::new();
    write_transaction(&transient, &mut preimage);
    preimage.extend_from_slice(&sighash_type.to_u32().to_le_bytes());
    Ok(preimage)
}
