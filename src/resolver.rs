//! Key resolution: choose the supplied key that can satisfy a locking script

use crate::error::{Result, SignError};
use crate::keys::KeyPair;
use crate::script::ScriptPattern;
use log::debug;

/// A key chosen for an input, with the pattern its locking script matched
#[derive(Debug, Clone, Copy)]
pub struct ResolvedKey<'k> {
    pub pattern: ScriptPattern,
    pub key: &'k KeyPair,
}

/// Find the key able to sign input `input_index`, whose coin is locked by `script_pubkey`.
///
/// Fails with `NoMatchingKey` when the script has no recognized pattern or no
/// key in `keys` satisfies it. The first satisfying key wins.
pub fn resolve_key<'k>(
    input_index: usize,
    script_pubkey: &[u8],
    keys: &'k [KeyPair],
) -> Result<ResolvedKey<'k>> {
    let Some((pattern, lookup)) = ScriptPattern::classify(script_pubkey) else {
        debug!("input {}: locking script matches no known pattern", input_index);
        return Err(SignError::NoMatchingKey { input_index });
    };

    match lookup.find(keys) {
        Some(key) => {
            debug!("input {}: key resolved for {:?}", input_index, pattern);
            Ok(ResolvedKey { pattern, key })
        }
        None => {
            debug!(
                "input {}: none of {} keys satisfies {:?}",
                input_index,
                keys.len(),
                pattern
            );
            Err(SignError::NoMatchingKey { input_index })
        }
    }
}
