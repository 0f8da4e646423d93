//! Script, sighash and encoding constants

/// OP_0 / OP_FALSE - push empty array
pub const OP_0: u8 = 0x00;

/// Largest opcode that pushes its own value as a byte count
pub const OP_PUSHBYTES_75: u8 = 0x4b;

pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;

/// OP_1NEGATE, OP_1 .. OP_16 push small numbers
pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_1: u8 = 0x51;
pub const OP_16: u8 = 0x60;

pub const OP_VERIFY: u8 = 0x69;
pub const OP_RETURN: u8 = 0x6a;
pub const OP_DUP: u8 = 0x76;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKSIGVERIFY: u8 = 0xad;

/// Sign all inputs and all outputs
pub const SIGHASH_ALL: u32 = 0x01;

/// Sequence number for final transaction input
pub const SEQUENCE_FINAL: u32 = 0xffffffff;

/// Length of a HASH160 digest (RIPEMD160(SHA256(x)))
pub const HASH160_LEN: usize = 20;

/// SEC1 compressed public key length
pub const COMPRESSED_PUBKEY_LEN: usize = 33;

/// SEC1 uncompressed public key length
pub const UNCOMPRESSED_PUBKEY_LEN: usize = 65;

/// Private key scalar length
pub const SECRET_KEY_LEN: usize = 32;

/// Trailing WIF byte marking a compressed public key
pub const WIF_COMPRESSED_FLAG: u8 = 0x01;

/// Maximum script length evaluated by the verifier
pub const MAX_SCRIPT_SIZE: usize = 10_000;

/// Maximum stack size during script execution
pub const MAX_STACK_SIZE: usize = 1000;

/// Maximum number of non-push operations in a script
pub const MAX_SCRIPT_OPS: usize = 201;

/// Maximum size of a single pushed element
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;

/// Smallest serialized input: outpoint(36) + script length(1) + sequence(4)
pub const MIN_INPUT_SIZE: usize = 41;

/// Smallest serialized output: value(8) + script length(1)
pub const MIN_OUTPUT_SIZE: usize = 9;
