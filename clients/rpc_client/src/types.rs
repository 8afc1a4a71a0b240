//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use conclave_transaction::TxHash;

/// The account state needed to build an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub sequence: u64,
}

/// What the node reported back for a dry-run of an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationOutcome {
    Error {
        message: String,
    },
    Success {
        /// The would-be return value of the invocation, in wire form.
        return_value: Option<Vec<u8>>,
        /// The priced resource section to attach before signing.
        transaction_data: Vec<u8>,
        min_resource_fee: u64,
        /// Present when ledger entries have expired and must be restored
        /// before the invocation can succeed.
        restore: Option<RestorePreamble>,
    },
}

/// The footprint and fee needed to restore expired ledger entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestorePreamble {
    pub transaction_data: Vec<u8>,
    pub min_resource_fee: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendStatus {
    Pending,
    Duplicate,
    TryAgainLater,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTransactionResponse {
    pub status: SendStatus,
    pub hash: TxHash,
    pub error_message: Option<String>,
}

/// The lifecycle status of a submitted transaction as reported by the node.
///
/// Anything outside the four known states decodes as `Other` and is treated
/// as a terminal failure by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    NotFound,
    Success,
    Failed,
    Other(String),
}

impl TransactionStatus {
    pub fn from_wire(status: &str) -> Self {
        match status {
            "PENDING" => Self::Pending,
            "NOT_FOUND" => Self::NotFound,
            "SUCCESS" => Self::Success,
            "FAILED" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether polling should stop at this status.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::NotFound)
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Success => write!(f, "SUCCESS"),
            Self::Failed => write!(f, "FAILED"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTransactionResponse {
    pub status: TransactionStatus,
    /// The return value of a successful invocation, in wire form.
    pub result_payload: Option<Vec<u8>>,
    /// The diagnostic payload of a failed invocation, in wire form.
    pub error_payload: Option<Vec<u8>>,
}
