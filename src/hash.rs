//! Hash functions used by addresses, keys and signature hashes

use crate::constants::HASH160_LEN;
use crate::types::Hash;
use bitcoin_hashes::{sha256d as bitcoin_sha256d, Hash as BitcoinHash};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// SHA256(SHA256(x))
pub fn sha256d(data: &[u8]) -> Hash {
    bitcoin_sha256d::Hash::hash(data).into_inner()
}

/// RIPEMD160(SHA256(x))
pub fn hash160(data: &[u8]) -> [u8; HASH160_LEN] {
    let sha256_hash = Sha256::digest(data);
    let ripemd160_hash = Ripemd160::digest(sha256_hash);
    let mut out = [0u8; HASH160_LEN];
    out.copy_from_slice(&ripemd160_hash);
    out
}
