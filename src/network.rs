//! Dash chain parameters relevant to key and address encoding

use crate::error::{Result, SignError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Version bytes used by base58check encodings on a network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkParams {
    pub name: &'static str,
    pub pubkey_address_prefix: u8,
    pub script_address_prefix: u8,
    pub secret_key_prefix: u8,
}

pub const DASH_MAINNET: NetworkParams = NetworkParams {
    name: "dash-mainnet",
    pubkey_address_prefix: 0x4c,
    script_address_prefix: 0x10,
    secret_key_prefix: 0xcc,
};

pub const DASH_TESTNET: NetworkParams = NetworkParams {
    name: "dash-testnet",
    pubkey_address_prefix: 0x8c,
    script_address_prefix: 0x13,
    secret_key_prefix: 0xef,
};

pub const DASH_REGTEST: NetworkParams = NetworkParams {
    name: "dash-regtest",
    pubkey_address_prefix: 0x8c,
    script_address_prefix: 0x13,
    secret_key_prefix: 0xef,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Network {
    #[serde(rename = "dash-mainnet")]
    DashMainnet,
    #[default]
    #[serde(rename = "dash-testnet")]
    DashTestnet,
    #[serde(rename = "dash-regtest")]
    DashRegtest,
}

impl Network {
    pub fn params(&self) -> &'static NetworkParams {
        match self {
            Network::DashMainnet => &DASH_MAINNET,
            Network::DashTestnet => &DASH_TESTNET,
            Network::DashRegtest => &DASH_REGTEST,
        }
    }

    pub fn name(&self) -> &'static str {
        self.params().name
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = SignError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dash-mainnet" | "mainnet" => Ok(Network::DashMainnet),
            "dash-testnet" | "testnet" => Ok(Network::DashTestnet),
            "dash-regtest" | "regtest" => Ok(Network::DashRegtest),
            other => Err(SignError::Config(format!("unknown network '{}'", other))),
        }
    }
}
