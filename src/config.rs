//! Signer settings

use crate::error::{Result, SignError};
use crate::network::Network;
use crate::transaction::SignOptions;
use serde::{Deserialize, Serialize};
use std::env;

pub const NETWORK_ENV: &str = "DASH_SIGN_NETWORK";
pub const VERIFY_ENV: &str = "DASH_SIGN_VERIFY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Network whose WIF and address version bytes are accepted
    pub network: Network,
    /// Run the script verifier over every signed input
    pub verify_signatures: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            network: Network::default(),
            verify_signatures: true,
        }
    }
}

impl Settings {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SignError::Config(e.to_string()))
    }

    /// Read settings from `DASH_SIGN_NETWORK` and `DASH_SIGN_VERIFY`, defaulting unset values
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        if let Some(network) = lookup(NETWORK_ENV) {
            settings.network = network.parse()?;
        }
        if let Some(verify) = lookup(VERIFY_ENV) {
            settings.verify_signatures = parse_bool(VERIFY_ENV, &verify)?;
        }
        Ok(settings)
    }

    pub fn sign_options(&self) -> SignOptions {
        SignOptions {
            verify_signatures: self.verify_signatures,
            ..SignOptions::default()
        }
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SignError::Config(format!(
            "{} must be a boolean, got '{}'",
            name, other
        ))),
    }
}
