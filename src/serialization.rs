//! Binary transaction codec
//!
//! Little-endian fixed-width integers with CompactSize varints for counts and
//! script lengths. `parse_transaction` accepts only canonical encodings, so
//! `serialize_transaction(parse_transaction(b)?) == b` holds for every accepted `b`.

use crate::constants::{MIN_INPUT_SIZE, MIN_OUTPUT_SIZE};
use crate::error::{Result, SignError};
use crate::hash::sha256d;
use crate::types::*;

/// Bounds-checked cursor over a byte slice
pub struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    pub fn read_bytes(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(SignError::MalformedData(format!(
                "unexpected end of data reading {} at offset {} ({} bytes needed, {} left)",
                what,
                self.offset,
                n,
                self.remaining()
            )));
        }
        let slice = &self.bytes[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self, what: &str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N, what)?);
        Ok(out)
    }

    pub fn read_u8(&mut self, what: &str) -> Result<u8> {
        Ok(self.read_array::<1>(what)?[0])
    }

    pub fn read_u16_le(&mut self, what: &str) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array(what)?))
    }

    pub fn read_u32_le(&mut self, what: &str) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array(what)?))
    }

    pub fn read_i32_le(&mut self, what: &str) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array(what)?))
    }

    pub fn read_u64_le(&mut self, what: &str) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array(what)?))
    }

    pub fn read_i64_le(&mut self, what: &str) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array(what)?))
    }

    pub fn read_hash(&mut self, what: &str) -> Result<Hash> {
        self.read_array(what)
    }

    /// Read a CompactSize integer, rejecting non-minimal encodings
    pub fn read_varint(&mut self, what: &str) -> Result<u64> {
        let start = self.offset();
        let tag = self.read_u8(what)?;
        let (value, minimal) = match tag {
            0x00..=0xfc => (tag as u64, true),
            0xfd => {
                let v = self.read_u16_le(what)? as u64;
                (v, v >= 0xfd)
            }
            0xfe => {
                let v = self.read_u32_le(what)? as u64;
                (v, v > 0xffff)
            }
            0xff => {
                let v = self.read_u64_le(what)?;
                (v, v > 0xffff_ffff)
            }
        };
        if !minimal {
            return Err(SignError::MalformedData(format!(
                "non-minimal varint for {} at offset {}",
                what, start
            )));
        }
        Ok(value)
    }

    /// Read a varint length prefix followed by that many bytes
    pub fn read_var_bytes(&mut self, what: &str) -> Result<ByteString> {
        let len = self.read_varint(what)?;
        if len > self.remaining() as u64 {
            return Err(SignError::MalformedData(format!(
                "{} length {} exceeds remaining {} bytes",
                what,
                len,
                self.remaining()
            )));
        }
        Ok(self.read_bytes(len as usize, what)?.to_vec())
    }

    /// Read an element count, bounded by how many minimum-size elements still fit
    fn read_count(&mut self, what: &str, min_element_size: usize) -> Result<usize> {
        let count = self.read_varint(what)?;
        let max_fit = (self.remaining() / min_element_size) as u64;
        if count > max_fit {
            return Err(SignError::MalformedData(format!(
                "{} {} exceeds what the remaining {} bytes can hold",
                what,
                count,
                self.remaining()
            )));
        }
        Ok(count as usize)
    }
}

/// Encode a number as a CompactSize varint
pub fn encode_varint(value: u64, out: &mut Vec<u8>) {
    match value {
        0x00..=0xfc => out.push(value as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(value as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
}

/// Number of bytes `encode_varint` writes for `value`
pub fn varint_size(value: u64) -> usize {
    match value {
        0x00..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

fn encode_var_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    encode_varint(bytes.len() as u64, out);
    out.extend_from_slice(bytes);
}

/// Parse a transaction, requiring the input to be consumed exactly
pub fn parse_transaction(bytes: &[u8]) -> Result<Transaction> {
    let mut reader = Reader::new(bytes);
    let tx = read_transaction(&mut reader)?;
    if reader.remaining() != 0 {
        return Err(SignError::MalformedData(format!(
            "{} trailing bytes after lock time at offset {}",
            reader.remaining(),
            reader.offset()
        )));
    }
    Ok(tx)
}

/// Parse a hex-encoded transaction
pub fn parse_transaction_hex(tx_hex: &str) -> Result<Transaction> {
    let bytes = hex::decode(tx_hex.trim())
        .map_err(|e| SignError::MalformedData(format!("transaction hex: {}", e)))?;
    parse_transaction(&bytes)
}

/// Read one transaction from the reader's current position
pub fn read_transaction(reader: &mut Reader<'_>) -> Result<Transaction> {
    let version = reader.read_i32_le("version")?;

    let input_count = reader.read_count("input count", MIN_INPUT_SIZE)?;
    let mut inputs = Vec::with_capacity(input_count);
    for _ in 0..input_count {
        let hash = reader.read_hash("outpoint hash")?;
        let index = reader.read_u32_le("outpoint index")?;
        let script_sig = reader.read_var_bytes("script_sig")?;
        let sequence = reader.read_u32_le("sequence")?;
        inputs.push(TransactionInput {
            prevout: OutPoint { hash, index },
            script_sig,
            sequence,
        });
    }

    let output_count = reader.read_count("output count", MIN_OUTPUT_SIZE)?;
    let mut outputs = Vec::with_capacity(output_count);
    for _ in 0..output_count {
        let value = reader.read_i64_le("output value")?;
        let script_pubkey = reader.read_var_bytes("script_pubkey")?;
        outputs.push(TransactionOutput {
            value,
            script_pubkey,
        });
    }

    let lock_time = reader.read_u32_le("lock time")?;

    Ok(Transaction {
        version,
        inputs,
        outputs,
        lock_time,
    })
}

/// Serialize a transaction to its wire form
pub fn serialize_transaction(tx: &Transaction) -> Vec<u8> {
    let mut data = Vec::with_capacity(serialized_size(tx));
    write_transaction(tx, &mut data);
    data
}

/// Append the wire form of a transaction to `data`
pub fn write_transaction(tx: &Transaction, data: &mut Vec<u8>) {
    // Version (4 bytes, little-endian)
    data.extend_from_slice(&tx.version.to_le_bytes());

    encode_varint(tx.inputs.len() as u64, data);
    for input in &tx.inputs {
        // Previous output hash (32 bytes) and index (4 bytes, little-endian)
        data.extend_from_slice(&input.prevout.hash);
        data.extend_from_slice(&input.prevout.index.to_le_bytes());
        encode_var_bytes(&input.script_sig, data);
        data.extend_from_slice(&input.sequence.to_le_bytes());
    }

    encode_varint(tx.outputs.len() as u64, data);
    for output in &tx.outputs {
        // Value (8 bytes, little-endian)
        data.extend_from_slice(&output.value.to_le_bytes());
        encode_var_bytes(&output.script_pubkey, data);
    }

    // Lock time (4 bytes, little-endian)
    data.extend_from_slice(&tx.lock_time.to_le_bytes());
}

/// Exact length of `serialize_transaction(tx)`
pub fn serialized_size(tx: &Transaction) -> usize {
    let inputs: usize = tx
        .inputs
        .iter()
        .map(|i| 36 + varint_size(i.script_sig.len() as u64) + i.script_sig.len() + 4)
        .sum();
    let outputs: usize = tx
        .outputs
        .iter()
        .map(|o| 8 + varint_size(o.script_pubkey.len() as u64) + o.script_pubkey.len())
        .sum();
    4 + varint_size(tx.inputs.len() as u64)
        + inputs
        + varint_size(tx.outputs.len() as u64)
        + outputs
        + 4
}

/// Transaction id: SHA256d of the serialization, internal byte order
pub fn transaction_id(tx: &Transaction) -> Hash {
    sha256d(&serialize_transaction(tx))
}
