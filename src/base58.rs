//! Base58Check encoding for WIF keys and addresses
//!
//! Payloads carry a 4-byte checksum: the first four bytes of SHA256d(payload).

use crate::hash::sha256d;

const CHECKSUM_LEN: usize = 4;

/// Errors raised while decoding a Base58Check string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Base58Error {
    #[error("invalid base58 encoding: {0}")]
    Encoding(String),

    #[error("data too short for checksum")]
    TooShort,

    #[error("checksum mismatch")]
    ChecksumMismatch,
}

/// Encode `data || checksum` with the Bitcoin alphabet
pub fn check_encode(data: &[u8]) -> String {
    let checksum = sha256d(data);
    let mut payload = Vec::with_capacity(data.len() + CHECKSUM_LEN);
    payload.extend_from_slice(data);
    payload.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    bs58::encode(payload)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_string()
}

/// Decode a Base58Check string and return the payload without its checksum
pub fn check_decode(s: &str) -> Result<Vec<u8>, Base58Error> {
    let decoded = bs58::decode(s)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|e| Base58Error::Encoding(e.to_string()))?;
    if decoded.len() < CHECKSUM_LEN {
        return Err(Base58Error::TooShort);
    }
    let (payload, checksum) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
    if checksum != &sha256d(payload)[..CHECKSUM_LEN] {
        return Err(Base58Error::ChecksumMismatch);
    }
    Ok(payload.to_vec())
}
