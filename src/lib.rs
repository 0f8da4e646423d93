//! # dash-sign
//!
//! Signing engine for Dash legacy (pay-to-public-key-hash) transactions.
//!
//! Given an unsigned transaction, the coins it spends and a set of private
//! keys, the engine produces a fully signed, serialized transaction.
//!
//! ## Architecture
//!
//! A request flows through these stages:
//! - Binary codec (`serialization`): bytes to `Transaction` and back
//! - Coin matcher (`coins`): one coin per input, by outpoint
//! - Key resolver (`resolver`): the key whose public key hash the locking script names
//! - Sighash computation (`sighash`): the legacy SIGHASH_ALL digest per input
//! - Signer (`signer`): deterministic low-s ECDSA over secp256k1
//! - Assembler (`transaction`): unlocking scripts, reassembly, verification
//!
//! ## Design Principles
//!
//! 1. **All or nothing**: a request either signs every input or fails
//! 2. **Deterministic**: RFC 6979 nonces, so identical requests give identical bytes
//! 3. **Stateless**: nothing is cached between calls; keys never outlive a call
//! 4. **Exact Version Pinning**: cryptographic dependencies pinned to exact versions
//!
//! ## Usage
//!
//! ```rust
//! use dash_sign::TransactionSigner;
//!
//! let signer = TransactionSigner::default();
//! let wif = signer.generate_private_key();
//! let address = signer.public_address(&wif).unwrap();
//! assert!(address.starts_with('y'));
//! ```

pub mod types;
pub mod constants;
pub mod error;
pub mod hash;
pub mod base58;
pub mod serialization;
pub mod coins;
pub mod network;
pub mod keys;
pub mod address;
pub mod script;
pub mod resolver;
pub mod sighash;
pub mod signer;
pub mod transaction;
pub mod config;
pub mod request;

// Re-export commonly used types
pub use types::*;
pub use address::Address;
pub use config::Settings;
pub use error::{FieldError, Result, SignError};
pub use keys::KeyPair;
pub use network::Network;
pub use request::{SignRequest, SignResponse};
pub use sighash::SighashType;
pub use transaction::SignOptions;

use log::debug;

/// Transaction signing facade
///
/// # Examples
///
/// ```
/// use dash_sign::{Network, Settings, TransactionSigner};
///
/// let signer = TransactionSigner::new(Settings::new(Network::DashTestnet));
/// let address = signer
///     .public_address("cV9nTtEJwgLe7pmSALvzrtQbjtP7zg8phhzDqgEURvWTEmSAVGjH")
///     .unwrap();
/// assert_eq!(address, "ygFX7C2QGD5YQG6EE9wGFddTxqMdUwELuB");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionSigner {
    settings: Settings,
}

impl TransactionSigner {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn network(&self) -> Network {
        self.settings.network
    }

    /// Sign every input of a serialized unsigned transaction with SIGHASH_ALL
    ///
    /// Returns the signed transaction as lowercase hex.
    ///
    /// # Examples
    ///
    /// ```
    /// use dash_sign::{SignError, TransactionSigner};
    ///
    /// let signer = TransactionSigner::default();
    /// // Version, zero inputs, zero outputs, lock time
    /// let unsigned = [1, 0, 0, 0, 0, 0, 0, 0, 0, 0];
    /// let result = signer.sign(&unsigned, &[], &[]);
    /// assert!(matches!(result, Err(SignError::MalformedData(_))));
    /// ```
    pub fn sign(&self, unsigned: &[u8], coins: &[Coin], keys: &[KeyPair]) -> Result<String> {
        transaction::sign_raw_transaction(unsigned, coins, keys, self.settings.sign_options())
    }

    /// Like `sign`, with an explicit sighash type
    pub fn sign_with_sighash(
        &self,
        unsigned: &[u8],
        coins: &[Coin],
        keys: &[KeyPair],
        sighash_type: u32,
    ) -> Result<String> {
        let options = SignOptions {
            sighash_type: SighashType::from_u32(sighash_type)?,
            ..self.settings.sign_options()
        };
        transaction::sign_raw_transaction(unsigned, coins, keys, options)
    }

    /// Validate, decode and sign a transport request
    pub fn sign_request(&self, request: &SignRequest) -> Result<SignResponse> {
        let errors = request.validate(self.network());
        if !errors.is_empty() {
            debug!("request rejected with {} field errors", errors.len());
            return Err(SignError::InvalidRequest(errors));
        }

        let decoded = request.decode(self.network())?;
        let options = SignOptions {
            sighash_type: decoded.sighash_type,
            ..self.settings.sign_options()
        };
        let signed_transaction = transaction::sign_raw_transaction(
            &decoded.unsigned,
            &decoded.coins,
            &decoded.keys,
            options,
        )?;
        Ok(SignResponse { signed_transaction })
    }

    /// Decode a WIF private key for the configured network
    pub fn parse_private_key(&self, wif: &str) -> Result<KeyPair> {
        KeyPair::from_wif(wif, self.network())
    }

    /// A fresh random compressed key, WIF-encoded for the configured network
    pub fn generate_private_key(&self) -> String {
        KeyPair::generate().to_wif(self.network())
    }

    /// P2PKH address of a WIF private key
    pub fn public_address(&self, wif: &str) -> Result<String> {
        let key = self.parse_private_key(wif)?;
        Ok(Address::p2pkh(&key, self.network()).to_string())
    }
}
