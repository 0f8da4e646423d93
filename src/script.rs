//! Script patterns, script construction and a small script verifier
//!
//! Locking scripts are matched against a closed set of `ScriptPattern`s; a
//! match yields the `KeyLookup` that decides which supplied key may sign.
//! The verifier executes the subset of opcodes that standard
//! pay-to-public-key-hash spends need and is used to check signed inputs.

use crate::constants::*;
use crate::error::{Result, SignError};
use crate::hash::hash160;
use crate::keys::KeyPair;
use crate::types::ByteString;
use log::debug;

/// Recognized locking-script shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptPattern {
    /// OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
    PayToPubkeyHash,
}

impl ScriptPattern {
    pub const ALL: [ScriptPattern; 1] = [ScriptPattern::PayToPubkeyHash];

    /// If `script` has this pattern's shape, return how to find its signing key
    pub fn matches(&self, script: &[u8]) -> Option<KeyLookup> {
        match self {
            ScriptPattern::PayToPubkeyHash => {
                if script.len() == 25
                    && script[0] == OP_DUP
                    && script[1] == OP_HASH160
                    && script[2] == HASH160_LEN as u8
                    && script[23] == OP_EQUALVERIFY
                    && script[24] == OP_CHECKSIG
                {
                    let mut hash = [0u8; HASH160_LEN];
                    hash.copy_from_slice(&script[3..23]);
                    Some(KeyLookup::PubkeyHash(hash))
                } else {
                    None
                }
            }
        }
    }

    /// Unlocking script spending this pattern with `signature` (sighash byte included)
    pub fn unlocking_script(&self, signature: &[u8], key: &KeyPair) -> ByteString {
        match self {
            ScriptPattern::PayToPubkeyHash => p2pkh_script_sig(signature, &key.public_key_bytes()),
        }
    }

    /// First pattern matching `script`
    pub fn classify(script: &[u8]) -> Option<(ScriptPattern, KeyLookup)> {
        Self::ALL
            .iter()
            .find_map(|pattern| pattern.matches(script).map(|lookup| (*pattern, lookup)))
    }
}

/// How to recognize the key eligible to sign a matched script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLookup {
    /// HASH160 of the signing key's public key encoding
    PubkeyHash([u8; HASH160_LEN]),
}

impl KeyLookup {
    pub fn is_satisfied_by(&self, key: &KeyPair) -> bool {
        match self {
            KeyLookup::PubkeyHash(hash) => key.public_key_hash() == *hash,
        }
    }

    /// First key in `keys` that satisfies this lookup
    pub fn find<'k>(&self, keys: &'k [KeyPair]) -> Option<&'k KeyPair> {
        keys.iter().find(|key| self.is_satisfied_by(key))
    }
}

/// OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG
pub fn p2pkh_script_pubkey(pubkey_hash: &[u8; HASH160_LEN]) -> ByteString {
    let mut script = Vec::with_capacity(25);
    script.push(OP_DUP);
    script.push(OP_HASH160);
    push_data(pubkey_hash, &mut script);
    script.push(OP_EQUALVERIFY);
    script.push(OP_CHECKSIG);
    script
}

/// <signature || sighash byte> <public key>
pub fn p2pkh_script_sig(signature: &[u8], pubkey: &[u8]) -> ByteString {
    let mut script = Vec::with_capacity(signature.len() + pubkey.len() + 2);
    push_data(signature, &mut script);
    push_data(pubkey, &mut script);
    script
}

/// Append the minimal push of `data` to `out`
pub fn push_data(data: &[u8], out: &mut Vec<u8>) {
    let len = data.len();
    if len <= OP_PUSHBYTES_75 as usize {
        out.push(len as u8);
    } else if len <= 0xff {
        out.push(OP_PUSHDATA1);
        out.push(len as u8);
    } else if len <= 0xffff {
        out.push(OP_PUSHDATA2);
        out.extend_from_slice(&(len as u16).to_le_bytes());
    } else {
        out.push(OP_PUSHDATA4);
        out.extend_from_slice(&(len as u32).to_le_bytes());
    }
    out.extend_from_slice(data);
}

/// One decoded script element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction<'a> {
    Push(&'a [u8]),
    Op(u8),
}

/// Decode a script into instructions; truncated pushes are malformed
pub fn parse_script(script: &[u8]) -> Result<Vec<Instruction<'_>>> {
    let mut instructions = Vec::new();
    let mut pos = 0;
    while pos < script.len() {
        let opcode = script[pos];
        pos += 1;
        let len = match opcode {
            0x01..=OP_PUSHBYTES_75 => opcode as usize,
            OP_PUSHDATA1 => read_push_len(script, &mut pos, 1)?,
            OP_PUSHDATA2 => read_push_len(script, &mut pos, 2)?,
            OP_PUSHDATA4 => read_push_len(script, &mut pos, 4)?,
            _ => {
                instructions.push(Instruction::Op(opcode));
                continue;
            }
        };
        if len > script.len() - pos {
            return Err(SignError::MalformedData(format!(
                "push of {} bytes at offset {} runs past end of script",
                len,
                pos - 1
            )));
        }
        instructions.push(Instruction::Push(&script[pos..pos + len]));
        pos += len;
    }
    Ok(instructions)
}

fn read_push_len(script: &[u8], pos: &mut usize, width: usize) -> Result<usize> {
    if *pos + width > script.len() {
        return Err(SignError::MalformedData(
            "truncated push length in script".to_string(),
        ));
    }
    let mut buf = [0u8; 4];
    buf[..width].copy_from_slice(&script[*pos..*pos + width]);
    *pos += width;
    Ok(u32::from_le_bytes(buf) as usize)
}

/// Checks signatures on behalf of OP_CHECKSIG
pub trait SignatureChecker {
    /// `signature` includes the trailing sighash-type byte; `script_code`
    /// is the script being executed.
    fn check_signature(&self, signature: &[u8], pubkey: &[u8], script_code: &[u8]) -> bool;
}

/// Stack truthiness: any non-zero byte, excluding negative zero
pub fn cast_to_bool(item: &[u8]) -> bool {
    for (i, byte) in item.iter().enumerate() {
        if *byte != 0 {
            return !(i == item.len() - 1 && *byte == 0x80);
        }
    }
    false
}

/// EvalScript: 𝒮𝒞 × 𝒮𝒯 → {true, false}
///
/// Executes `script` against `stack`. Returns `Ok(false)` when execution
/// fails and `Err` only when the script cannot be decoded.
pub fn eval_script<C: SignatureChecker>(
    script: &[u8],
    stack: &mut Vec<ByteString>,
    checker: &C,
) -> Result<bool> {
    if script.len() > MAX_SCRIPT_SIZE {
        return Ok(false);
    }

    let mut op_count = 0;
    for instruction in parse_script(script)? {
        if stack.len() > MAX_STACK_SIZE {
            return Ok(false);
        }
        match instruction {
            Instruction::Push(data) => {
                if data.len() > MAX_SCRIPT_ELEMENT_SIZE {
                    return Ok(false);
                }
                stack.push(data.to_vec());
            }
            Instruction::Op(opcode) => {
                if opcode > OP_16 {
                    op_count += 1;
                    if op_count > MAX_SCRIPT_OPS {
                        return Ok(false);
                    }
                }
                if !execute_opcode(opcode, stack, script, checker) {
                    debug!("script failed at opcode {:#04x}", opcode);
                    return Ok(false);
                }
            }
        }
    }
    Ok(true)
}

/// Execute a single non-push opcode
fn execute_opcode<C: SignatureChecker>(
    opcode: u8,
    stack: &mut Vec<ByteString>,
    script_code: &[u8],
    checker: &C,
) -> bool {
    match opcode {
        OP_0 => {
            stack.push(vec![]);
            true
        }

        OP_1NEGATE => {
            stack.push(vec![0x81]);
            true
        }

        OP_1..=OP_16 => {
            stack.push(vec![opcode - (OP_1 - 1)]);
            true
        }

        OP_DUP => match stack.last().cloned() {
            Some(item) => {
                stack.push(item);
                true
            }
            None => false,
        },

        OP_HASH160 => match stack.pop() {
            Some(item) => {
                stack.push(hash160(&item).to_vec());
                true
            }
            None => false,
        },

        OP_EQUAL | OP_EQUALVERIFY => {
            let (Some(a), Some(b)) = (stack.pop(), stack.pop()) else {
                return false;
            };
            if opcode == OP_EQUALVERIFY {
                a == b
            } else {
                stack.push(if a == b { vec![1] } else { vec![] });
                true
            }
        }

        OP_VERIFY => matches!(stack.pop(), Some(item) if cast_to_bool(&item)),

        OP_CHECKSIG | OP_CHECKSIGVERIFY => {
            let (Some(pubkey), Some(signature)) = (stack.pop(), stack.pop()) else {
                return false;
            };
            let valid = checker.check_signature(&signature, &pubkey, script_code);
            if opcode == OP_CHECKSIGVERIFY {
                valid
            } else {
                stack.push(if valid { vec![1] } else { vec![] });
                true
            }
        }

        OP_RETURN => false,

        // Anything else is outside the supported subset
        _ => false,
    }
}

/// VerifyScript: 𝒮𝒞 × 𝒮𝒞 → {true, false}
///
/// 1. `script_sig` must be push-only
/// 2. Execute `script_sig` on an empty stack
/// 3. Execute `script_pubkey` on the resulting stack
/// 4. Succeed if the top of the final stack is true
pub fn verify_script<C: SignatureChecker>(
    script_sig: &[u8],
    script_pubkey: &[u8],
    checker: &C,
) -> Result<bool> {
    let push_only = parse_script(script_sig)?
        .iter()
        .all(|i| matches!(i, Instruction::Push(_) | Instruction::Op(OP_0..=OP_16)));
    if !push_only {
        return Ok(false);
    }

    let mut stack = Vec::new();
    if !eval_script(script_sig, &mut stack, checker)? {
        return Ok(false);
    }
    if !eval_script(script_pubkey, &mut stack, checker)? {
        return Ok(false);
    }

    Ok(matches!(stack.last(), Some(top) if cast_to_bool(top)))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts exactly one (signature, pubkey) pair
    struct FixedChecker {
        signature: Vec<u8>,
        pubkey: Vec<u8>,
    }

    impl SignatureChecker for FixedChecker {
        fn check_signature(&self, signature: &[u8], pubkey: &[u8], _script_code: &[u8]) -> bool {
            signature == self.signature.as_slice() && pubkey == self.pubkey.as_slice()
        }
    }

    fn no_sigs() -> FixedChecker {
        FixedChecker {
            signature: vec![0xde, 0xad],
            pubkey: vec![0xbe, 0xef],
        }
    }

    #[test]
    fn test_p2pkh_pattern_matches() {
        let hash = [0x42; 20];
        let script = p2pkh_script_pubkey(&hash);
        assert_eq!(script.len(), 25);
        assert_eq!(
            ScriptPattern::PayToPubkeyHash.matches(&script),
            Some(KeyLookup::PubkeyHash(hash))
        );
        assert_eq!(
            ScriptPattern::classify(&script),
            Some((ScriptPattern::PayToPubkeyHash, KeyLookup::PubkeyHash(hash)))
        );
    }

    #[test]
    fn test_p2pkh_pattern_rejects_other_scripts() {
        let mut script = p2pkh_script_pubkey(&[0x42; 20]);
        script[24] = OP_CHECKSIGVERIFY;
        assert_eq!(ScriptPattern::classify(&script), None);

        // Pay-to-script-hash
        let mut p2sh = vec![OP_HASH160, 20];
        p2sh.extend_from_slice(&[0u8; 20]);
        p2sh.push(OP_EQUAL);
        assert_eq!(ScriptPattern::classify(&p2sh), None);

        assert_eq!(ScriptPattern::classify(&[]), None);
        assert_eq!(ScriptPattern::classify(&[OP_1]), None);
    }

    #[test]
    fn test_key_lookup_find() {
        let a = KeyPair::from_secret_bytes(&[0x11; 32], true).unwrap();
        let b = KeyPair::from_secret_bytes(&[0x22; 32], true).unwrap();
        let keys = vec![a, b];
        let lookup = KeyLookup::PubkeyHash(keys[1].public_key_hash());

        let found = lookup.find(&keys).unwrap();
        assert_eq!(found.public_key(), keys[1].public_key());
        assert!(KeyLookup::PubkeyHash([0; 20]).find(&keys).is_none());
    }

    #[test]
    fn test_key_lookup_respects_compression() {
        let compressed = KeyPair::from_secret_bytes(&[0x11; 32], true).unwrap();
        let uncompressed = KeyPair::from_secret_bytes(&[0x11; 32], false).unwrap();
        let lookup = KeyLookup::PubkeyHash(uncompressed.public_key_hash());

        assert!(!lookup.is_satisfied_by(&compressed));
        assert!(lookup.is_satisfied_by(&uncompressed));
    }

    #[test]
    fn test_push_data_sizes() {
        let mut out = Vec::new();
        push_data(&[0xaa; 75], &mut out);
        assert_eq!(out[0], 75);
        assert_eq!(out.len(), 76);

        let mut out = Vec::new();
        push_data(&[0xaa; 76], &mut out);
        assert_eq!(&out[..2], &[OP_PUSHDATA1, 76]);

        let mut out = Vec::new();
        push_data(&[0xaa; 256], &mut out);
        assert_eq!(&out[..3], &[OP_PUSHDATA2, 0x00, 0x01]);

        let mut out = Vec::new();
        push_data(&[], &mut out);
        assert_eq!(out, vec![0x00]);
    }

    #[test]
    fn test_parse_script_pushes() {
        let script = p2pkh_script_sig(&[0x30; 72], &[0x02; 33]);
        let instructions = parse_script(&script).unwrap();
        assert_eq!(
            instructions,
            vec![Instruction::Push(&[0x30; 72]), Instruction::Push(&[0x02; 33])]
        );
    }

    #[test]
    fn test_parse_script_truncated() {
        assert!(parse_script(&[0x05, 0x01]).is_err());
        assert!(parse_script(&[OP_PUSHDATA1]).is_err());
        assert!(parse_script(&[OP_PUSHDATA2, 0x01]).is_err());
    }

    #[test]
    fn test_cast_to_bool() {
        assert!(!cast_to_bool(&[]));
        assert!(!cast_to_bool(&[0x00, 0x00]));
        assert!(!cast_to_bool(&[0x00, 0x80]));
        assert!(cast_to_bool(&[0x80, 0x00]));
        assert!(cast_to_bool(&[0x01]));
    }

    #[test]
    fn test_eval_small_numbers_and_equal() {
        let mut stack = Vec::new();
        assert!(eval_script(&[OP_1, OP_1, OP_EQUAL], &mut stack, &no_sigs()).unwrap());
        assert_eq!(stack, vec![vec![1]]);

        let mut stack = Vec::new();
        assert!(eval_script(&[OP_16, OP_1NEGATE], &mut stack, &no_sigs()).unwrap());
        assert_eq!(stack, vec![vec![16], vec![0x81]]);
    }

    #[test]
    fn test_eval_stack_underflow() {
        for script in [[OP_DUP], [OP_HASH160], [OP_EQUAL], [OP_VERIFY], [OP_CHECKSIG]] {
            let mut stack = Vec::new();
            assert!(!eval_script(&script, &mut stack, &no_sigs()).unwrap());
        }
    }

    #[test]
    fn test_eval_unsupported_opcode_fails() {
        let mut stack = Vec::new();
        assert!(!eval_script(&[OP_1, 0x7c], &mut stack, &no_sigs()).unwrap());
        assert!(!eval_script(&[OP_RETURN], &mut Vec::new(), &no_sigs()).unwrap());
    }

    #[test]
    fn test_eval_operation_limit() {
        let mut script = vec![OP_1];
        script.extend(std::iter::repeat(OP_DUP).take(MAX_SCRIPT_OPS + 1));
        let mut stack = Vec::new();
        assert!(!eval_script(&script, &mut stack, &no_sigs()).unwrap());
    }

    #[test]
    fn test_verify_p2pkh_with_checker() {
        let pubkey = vec![0x02; 33];
        let signature = vec![0x30, 0x01, 0x01];
        let checker = FixedChecker {
            signature: signature.clone(),
            pubkey: pubkey.clone(),
        };
        let script_pubkey = p2pkh_script_pubkey(&hash160(&pubkey));

        let script_sig = p2pkh_script_sig(&signature, &pubkey);
        assert!(verify_script(&script_sig, &script_pubkey, &checker).unwrap());

        let wrong_sig = p2pkh_script_sig(&[0x30, 0x01, 0x02], &pubkey);
        assert!(!verify_script(&wrong_sig, &script_pubkey, &checker).unwrap());

        let wrong_key = p2pkh_script_sig(&signature, &[0x03; 33]);
        assert!(!verify_script(&wrong_key, &script_pubkey, &checker).unwrap());
    }

    #[test]
    fn test_verify_rejects_non_push_script_sig() {
        let checker = no_sigs();
        assert!(!verify_script(&[OP_1, OP_DUP], &[OP_EQUAL], &checker).unwrap());
    }

    #[test]
    fn test_verify_empty_final_stack() {
        assert!(!verify_script(&[], &[], &no_sigs()).unwrap());
    }
}
