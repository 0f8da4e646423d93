//! secp256k1 key pairs and WIF private key encoding
//!
//! A `KeyPair` lives only as long as the caller keeps it; the engine borrows
//! key pairs for the duration of one signing call and never stores them. The
//! secret scalar is overwritten when the key pair is dropped.

use crate::base58;
use crate::constants::{HASH160_LEN, SECRET_KEY_LEN, WIF_COMPRESSED_FLAG};
use crate::error::{Result, SignError};
use crate::hash::hash160;
use crate::network::Network;
use secp256k1::{PublicKey, SecretKey, SECP256K1};
use std::fmt;

#[derive(Clone)]
pub struct KeyPair {
    secret: SecretKey,
    public: PublicKey,
    compressed: bool,
}

impl KeyPair {
    /// Build a key pair from a raw 32-byte scalar
    pub fn from_secret_bytes(bytes: &[u8], compressed: bool) -> Result<Self> {
        if bytes.len() != SECRET_KEY_LEN {
            return Err(SignError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                SECRET_KEY_LEN,
                bytes.len()
            )));
        }
        let secret = SecretKey::from_slice(bytes)
            .map_err(|_| SignError::InvalidPrivateKey("scalar out of range".to_string()))?;
        Ok(Self::from_secret_key(secret, compressed))
    }

    pub fn from_secret_key(secret: SecretKey, compressed: bool) -> Self {
        let public = PublicKey::from_secret_key(SECP256K1, &secret);
        Self {
            secret,
            public,
            compressed,
        }
    }

    /// Generate a fresh random key with a compressed public key
    pub fn generate() -> Self {
        let (secret, public) = SECP256K1.generate_keypair(&mut secp256k1::rand::thread_rng());
        Self {
            secret,
            public,
            compressed: true,
        }
    }

    /// Decode a WIF string: base58check(prefix || secret [|| 0x01]).
    ///
    /// The prefix must be the secret key prefix of `network`.
    pub fn from_wif(wif: &str, network: Network) -> Result<Self> {
        let payload = base58::check_decode(wif.trim())
            .map_err(|e| SignError::InvalidPrivateKey(e.to_string()))?;

        let compressed = match payload.len() {
            len if len == 1 + SECRET_KEY_LEN => false,
            len if len == 2 + SECRET_KEY_LEN => {
                if payload[1 + SECRET_KEY_LEN] != WIF_COMPRESSED_FLAG {
                    return Err(SignError::InvalidPrivateKey(
                        "invalid compression flag".to_string(),
                    ));
                }
                true
            }
            len => {
                return Err(SignError::InvalidPrivateKey(format!(
                    "invalid payload length {}",
                    len
                )));
            }
        };

        let expected_prefix = network.params().secret_key_prefix;
        if payload[0] != expected_prefix {
            return Err(SignError::InvalidPrivateKey(format!(
                "version byte {:#04x} does not belong to {}",
                payload[0], network
            )));
        }

        Self::from_secret_bytes(&payload[1..1 + SECRET_KEY_LEN], compressed)
    }

    /// Encode as WIF for `network`, keeping this key's compression flag
    pub fn to_wif(&self, network: Network) -> String {
        let mut payload = Vec::with_capacity(2 + SECRET_KEY_LEN);
        payload.push(network.params().secret_key_prefix);
        payload.extend_from_slice(&self.secret.secret_bytes());
        if self.compressed {
            payload.push(WIF_COMPRESSED_FLAG);
        }
        base58::check_encode(&payload)
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Public key in the encoding this key pair signs with
    pub fn public_key_bytes(&self) -> Vec<u8> {
        if self.compressed {
            self.public.serialize().to_vec()
        } else {
            self.public.serialize_uncompressed().to_vec()
        }
    }

    /// HASH160 of `public_key_bytes()`
    pub fn public_key_hash(&self) -> [u8; HASH160_LEN] {
        hash160(&self.public_key_bytes())
    }

    pub(crate) fn secret_key(&self) -> &SecretKey {
        &self.secret
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &hex::encode(self.public_key_bytes()))
            .field("compressed", &self.compressed)
            .finish_non_exhaustive()
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.secret.non_secure_erase();
    }
}
