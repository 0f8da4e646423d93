//! ECDSA signing over signature-hash digests
//!
//! Nonces are derived deterministically (RFC 6979) from the digest and the
//! secret scalar, and every signature is normalized to low-s form. All curve
//! operations go through the read-only global secp256k1 context.

use crate::error::{Result, SignError};
use crate::keys::KeyPair;
use crate::sighash::SighashType;
use crate::types::Hash;
use secp256k1::{ecdsa, Message, PublicKey, SECP256K1};

/// secp256k1 group order divided by two, big-endian
pub const HALF_CURVE_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d,
    0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

/// An ECDSA (r, s) signature in canonical low-s form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    inner: ecdsa::Signature,
}

impl Signature {
    /// Parse a strict DER signature (without sighash byte)
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = ecdsa::Signature::from_der(der)
            .map_err(|e| SignError::MalformedData(format!("signature: {}", e)))?;
        Ok(Self { inner })
    }

    /// Big-endian r component
    pub fn r(&self) -> [u8; 32] {
        let mut r = [0u8; 32];
        r.copy_from_slice(&self.inner.serialize_compact()[..32]);
        r
    }

    /// Big-endian s component
    pub fn s(&self) -> [u8; 32] {
        let mut s = [0u8; 32];
        s.copy_from_slice(&self.inner.serialize_compact()[32..]);
        s
    }

    pub fn is_low_s(&self) -> bool {
        self.s() <= HALF_CURVE_ORDER
    }

    pub fn to_der(&self) -> Vec<u8> {
        self.inner.serialize_der().to_vec()
    }

    /// DER encoding followed by the sighash-type byte, as pushed in an unlocking script
    pub fn to_script_bytes(&self, sighash_type: SighashType) -> Vec<u8> {
        let mut bytes = self.to_der();
        bytes.push(sighash_type.to_byte());
        bytes
    }
}

/// Sign a 32-byte digest with `key`
pub fn sign_digest(digest: &Hash, key: &KeyPair) -> Result<Signature> {
    let message = Message::from_digest_slice(digest)
        .map_err(|e| SignError::signing_failure(e.to_string()))?;
    let mut inner = SECP256K1.sign_ecdsa(&message, key.secret_key());
    inner.normalize_s();
    Ok(Signature { inner })
}

/// Check a strict-DER, low-s signature over `digest` against a SEC1 public key
pub fn verify_digest(digest: &Hash, der: &[u8], pubkey: &[u8]) -> bool {
    let Ok(message) = Message::from_digest_slice(digest) else {
        return false;
    };
    let Ok(signature) = ecdsa::Signature::from_der(der) else {
        return false;
    };
    let mut normalized = signature;
    normalized.normalize_s();
    if normalized != signature {
        return false;
    }
    let Ok(pubkey) = PublicKey::from_slice(pubkey) else {
        return false;
    };
    SECP256K1.verify_ecdsa(&message, &signature, &pubkey).is_ok()
}
