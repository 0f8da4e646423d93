//! Coin matching: pair every transaction input with the coin it spends

use crate::error::{Result, SignError};
use crate::types::*;
use std::collections::HashMap;

/// Map each input position to its coin, in input order.
///
/// Fails with `CoinNotFound` for the first input whose outpoint has no coin.
/// Two coins for the same outpoint are accepted only when they are identical.
pub fn match_coins<'a>(inputs: &[TransactionInput], coins: &'a [Coin]) -> Result<Vec<&'a Coin>> {
    let mut by_outpoint: HashMap<&OutPoint, &'a Coin> = HashMap::with_capacity(coins.len());
    for coin in coins {
        if let Some(existing) = by_outpoint.insert(&coin.outpoint, coin) {
            if existing.output != coin.output {
                return Err(SignError::MalformedData(format!(
                    "conflicting coins supplied for outpoint {}",
                    coin.outpoint
                )));
            }
        }
    }

    inputs
        .iter()
        .map(|input| {
            by_outpoint
                .get(&input.prevout)
                .copied()
                .ok_or(SignError::CoinNotFound(input.prevout))
        })
        .collect()
}
