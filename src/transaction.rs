//! Transaction signing and verification
//!
//! A signing request moves through
//! `Parsed → CoinsMatched → {KeyResolved → DigestComputed → Signed → ScriptBuilt}* → Reassembled`.
//! Unlocking scripts are collected for every input before any of them is
//! written into the signed copy, so a failure at any step leaves no partially
//! signed transaction behind.

use crate::coins::match_coins;
use crate::error::{Result, SignError};
use crate::keys::KeyPair;
use crate::resolver::resolve_key;
use crate::script::{verify_script, SignatureChecker};
use crate::serialization::{parse_transaction, serialize_transaction};
use crate::sighash::{signature_hash, SighashType};
use crate::signer::{sign_digest, verify_digest};
use crate::types::*;
use log::{debug, error, info};

/// Per-request signing options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignOptions {
    pub sighash_type: SighashType,
    /// Evaluate every produced unlocking script before returning
    pub verify_signatures: bool,
}

impl Default for SignOptions {
    fn default() -> Self {
        Self {
            sighash_type: SighashType::All,
            verify_signatures: true,
        }
    }
}

/// Checks OP_CHECKSIG against the legacy signature hash of one input
pub struct TransactionSignatureChecker<'a> {
    tx: &'a Transaction,
    input_index: usize,
}

impl<'a> TransactionSignatureChecker<'a> {
    pub fn new(tx: &'a Transaction, input_index: usize) -> Self {
        Self { tx, input_index }
    }
}

impl SignatureChecker for TransactionSignatureChecker<'_> {
    fn check_signature(&self, signature: &[u8], pubkey: &[u8], script_code: &[u8]) -> bool {
        let Some((&hash_type, der)) = signature.split_last() else {
            return false;
        };
        let Ok(sighash_type) = SighashType::from_u32(hash_type as u32) else {
            return false;
        };
        match signature_hash(self.tx, self.input_index, script_code, sighash_type) {
            Ok(digest) => verify_digest(&digest, der, pubkey),
            Err(_) => false,
        }
    }
}

/// Build the unlocking script for input `input_index` spending `coin`.
///
/// The digest depends only on `tx`'s non-script fields and the coin's locking
/// script, so inputs may be signed in any order or in parallel.
pub fn sign_input(
    tx: &Transaction,
    input_index: usize,
    coin: &Coin,
    keys: &[KeyPair],
    sighash_type: SighashType,
) -> Result<ByteString> {
    let resolved = resolve_key(input_index, coin.script_pubkey(), keys)?;
    let digest = signature_hash(tx, input_index, coin.script_pubkey(), sighash_type)?;
    debug!("input {}: digest {}", input_index, hex::encode(digest));

    let signature = sign_digest(&digest, resolved.key).map_err(|e| e.for_input(input_index))?;
    debug!("input {}: signed", input_index);

    Ok(resolved
        .pattern
        .unlocking_script(&signature.to_script_bytes(sighash_type), resolved.key))
}

/// Sign every input of `tx`, returning the signed copy.
///
/// The signed transaction differs from `tx` only in its unlocking scripts.
pub fn sign_transaction(
    tx: &Transaction,
    coins: &[Coin],
    keys: &[KeyPair],
    options: SignOptions,
) -> Result<Transaction> {
    if tx.inputs.is_empty() {
        return Err(SignError::MalformedData(
            "transaction has no inputs to sign".to_string(),
        ));
    }

    let matched = match_coins(&tx.inputs, coins)?;
    debug!("matched {} inputs to coins", matched.len());

    let script_sigs = matched
        .iter()
        .enumerate()
        .map(|(i, coin)| sign_input(tx, i, coin, keys, options.sighash_type))
        .collect::<Result<Vec<_>>>()?;

    let mut signed = tx.clone();
    for (input, script_sig) in signed.inputs.iter_mut().zip(script_sigs) {
        input.script_sig = script_sig;
    }

    if options.verify_signatures {
        for (i, coin) in matched.iter().enumerate() {
            if !verify_input(&signed, i, coin)? {
                let err = SignError::SigningFailure {
                    input_index: Some(i),
                    reason: "produced unlocking script does not verify".to_string(),
                };
                error!("{}", err);
                return Err(err);
            }
        }
    }

    info!("signed transaction with {} inputs", signed.inputs.len());
    Ok(signed)
}

/// Parse, sign and re-serialize an unsigned transaction, returning hex
pub fn sign_raw_transaction(
    unsigned: &[u8],
    coins: &[Coin],
    keys: &[KeyPair],
    options: SignOptions,
) -> Result<String> {
    let tx = parse_transaction(unsigned)?;
    debug!(
        "parsed transaction: {} inputs, {} outputs",
        tx.inputs.len(),
        tx.outputs.len()
    );

    match sign_transaction(&tx, coins, keys, options) {
        Ok(signed) => Ok(hex::encode(serialize_transaction(&signed))),
        Err(e) => {
            if e.is_client_error() {
                debug!("signing rejected: {}", e);
            } else {
                error!("signing failed: {}", e);
            }
            Err(e)
        }
    }
}

/// Evaluate input `input_index`'s unlocking script against `coin`'s locking script
pub fn verify_input(tx: &Transaction, input_index: usize, coin: &Coin) -> Result<bool> {
    let input = tx.inputs.get(input_index).ok_or_else(|| {
        SignError::MalformedData(format!(
            "input index {} out of range (tx has {} inputs)",
            input_index,
            tx.inputs.len()
        ))
    })?;
    let checker = TransactionSignatureChecker::new(tx, input_index);
    verify_script(&input.script_sig, coin.script_pubkey(), &checker)
}

/// Verify every input of a signed transaction against the supplied coins
pub fn verify_transaction(tx: &Transaction, coins: &[Coin]) -> Result<bool> {
    let matched = match_coins(&tx.inputs, coins)?;
    for (i, coin) in matched.iter().enumerate() {
        if !verify_input(tx, i, coin)? {
            debug!("input {} failed verification", i);
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SEQUENCE_FINAL;
    use crate::script::p2pkh_script_pubkey;

    fn key(byte: u8) -> KeyPair {
        KeyPair::from_secret_bytes(&[byte; 32], true).unwrap()
    }

    fn coin_for(key: &KeyPair, hash: u8, value: i64) -> Coin {
        Coin::new(
            OutPoint::new([hash; 32], 0),
            value,
            p2pkh_script_pubkey(&key.public_key_hash()),
        )
    }

    fn unsigned_spending(coins: &[Coin]) -> Transaction {
        Transaction {
            version: 1,
            inputs: coins
                .iter()
                .map(|c| TransactionInput {
                    prevout: c.outpoint,
                    script_sig: vec![],
                    sequence: SEQUENCE_FINAL,
                })
                .collect(),
            outputs: vec![TransactionOutput {
                value: 1000,
                script_pubkey: p2pkh_script_pubkey(&[0x77; 20]),
            }],
            lock_time: 0,
        }
    }

    #[test]
    fn test_sign_transaction_two_keys() {
        let (a, b) = (key(0x11), key(0x22));
        let coins = vec![coin_for(&a, 1, 700), coin_for(&b, 2, 800)];
        let tx = unsigned_spending(&coins);

        let signed = sign_transaction(&tx, &coins, &[b, a], SignOptions::default()).unwrap();

        assert_eq!(signed.inputs.len(), 2);
        assert_eq!(signed.outputs, tx.outputs);
        for (before, after) in tx.inputs.iter().zip(&signed.inputs) {
            assert_eq!(before.prevout, after.prevout);
            assert_eq!(before.sequence, after.sequence);
            assert!(!after.script_sig.is_empty());
        }
        assert!(verify_transaction(&signed, &coins).unwrap());
    }

    #[test]
    fn test_sign_transaction_missing_key_signs_nothing() {
        let (a, b) = (key(0x11), key(0x22));
        let coins = vec![coin_for(&a, 1, 700), coin_for(&b, 2, 800)];
        let tx = unsigned_spending(&coins);

        let result = sign_transaction(&tx, &coins, &[a], SignOptions::default());
        assert!(matches!(result, Err(SignError::NoMatchingKey { input_index: 1 })));
    }

    #[test]
    fn test_sign_transaction_no_inputs() {
        let tx = Transaction {
            version: 1,
            inputs: vec![],
            outputs: vec![],
            lock_time: 0,
        };
        assert!(matches!(
            sign_transaction(&tx, &[], &[key(1)], SignOptions::default()),
            Err(SignError::MalformedData(_))
        ));
    }

    #[test]
    fn test_verify_input_detects_tampering() {
        let a = key(0x11);
        let coins = vec![coin_for(&a, 1, 700)];
        let tx = unsigned_spending(&coins);
        let mut signed = sign_transaction(&tx, &coins, &[a], SignOptions::default()).unwrap();
        assert!(verify_input(&signed, 0, &coins[0]).unwrap());

        signed.outputs[0].value += 1;
        assert!(!verify_input(&signed, 0, &coins[0]).unwrap());
    }

    #[test]
    fn test_verify_input_out_of_range() {
        let a = key(0x11);
        let coins = vec![coin_for(&a, 1, 700)];
        let tx = unsigned_spending(&coins);
        assert!(verify_input(&tx, 3, &coins[0]).is_err());
    }

    #[test]
    fn test_checker_rejects_unsupported_hash_type() {
        let a = key(0x11);
        let coins = vec![coin_for(&a, 1, 700)];
        let tx = unsigned_spending(&coins);
        let mut signed = sign_transaction(&tx, &coins, &[a], SignOptions::default()).unwrap();

        // Flip the sighash byte (last byte of the signature push) to SIGHASH_NONE
        let sig_len = signed.inputs[0].script_sig[0] as usize;
        signed.inputs[0].script_sig[sig_len] = 0x02;
        assert!(!verify_input(&signed, 0, &coins[0]).unwrap());
    }

    #[test]
    fn test_sign_raw_transaction_roundtrips() {
        let a = key(0x11);
        let coins = vec![coin_for(&a, 1, 700)];
        let tx = unsigned_spending(&coins);
        let raw = serialize_transaction(&tx);

        let signed_hex = sign_raw_transaction(&raw, &coins, &[a], SignOptions::default()).unwrap();
        let signed = parse_transaction(&hex::decode(signed_hex).unwrap()).unwrap();
        assert!(verify_transaction(&signed, &coins).unwrap());
    }
}
