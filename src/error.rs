//! Error types for transaction signing

use crate::types::OutPoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A request field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug)]
pub enum SignError {
    #[error("Malformed data: {0}")]
    MalformedData(String),

    #[error("Coin not found for outpoint {0}")]
    CoinNotFound(OutPoint),

    #[error("No matching key for input {input_index}")]
    NoMatchingKey { input_index: usize },

    #[error("Unsupported sighash type: {0:#04x}")]
    UnsupportedSighashType(u32),

    #[error("Signing failed{}: {reason}", describe_input(.input_index))]
    SigningFailure {
        input_index: Option<usize>,
        reason: String,
    },

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid request: {}", join_fields(.0))]
    InvalidRequest(Vec<FieldError>),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SignError {
    pub fn signing_failure(reason: impl Into<String>) -> Self {
        SignError::SigningFailure {
            input_index: None,
            reason: reason.into(),
        }
    }

    /// Attach the input index to a signing failure raised below the engine
    pub fn for_input(self, index: usize) -> Self {
        match self {
            SignError::SigningFailure { reason, .. } => SignError::SigningFailure {
                input_index: Some(index),
                reason,
            },
            other => other,
        }
    }

    /// Whether the failure was caused by caller-supplied data
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            SignError::SigningFailure { .. } | SignError::Config(_)
        )
    }

    /// Stable name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            SignError::MalformedData(_) => "MalformedData",
            SignError::CoinNotFound(_) => "CoinNotFound",
            SignError::NoMatchingKey { .. } => "NoMatchingKey",
            SignError::UnsupportedSighashType(_) => "UnsupportedSighashType",
            SignError::SigningFailure { .. } => "SigningFailure",
            SignError::InvalidPrivateKey(_) => "InvalidPrivateKey",
            SignError::InvalidAddress(_) => "InvalidAddress",
            SignError::InvalidRequest(_) => "InvalidRequest",
            SignError::Config(_) => "Config",
        }
    }
}

fn describe_input(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" for input {}", i),
        None => String::new(),
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, SignError>;
