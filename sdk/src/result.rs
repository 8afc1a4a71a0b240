//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

use std::fmt::{Display, Formatter};

use conclave_rpc_client::RestorePreamble;
use conclave_transaction::{ResourceEstimate, TransactionEnvelope, TxHash};

/// Which stage of the pipeline a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The node rejected the dry-run (invalid account, invalid arguments,
    /// contract-level rejection during simulation).
    Simulation,
    /// The wallet declined or failed to produce a signature.
    Signing,
    /// The node rejected the send.
    Submission,
    /// The transaction was included on-chain but the contract call failed.
    Execution,
    /// Poll deadline expiry, unrecognized terminal statuses and undecodable
    /// result payloads.
    Unknown,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Simulation => "simulation error",
            Self::Signing => "signing error",
            Self::Submission => "submission error",
            Self::Execution => "execution error",
            Self::Unknown => "unknown error",
        };
        write!(f, "{name}")
    }
}

/// The normalized outcome of one contract invocation.
///
/// Constructed exactly once at the end of
/// [`crate::OperationInvoker::invoke`]; every arm carries the transaction
/// hash when it is known and the resource estimate computed up to that
/// point, so failed calls still report cost information.
#[derive(Debug, Clone)]
pub enum ContractResult<T> {
    /// The invocation succeeded (on-chain, or as a dry-run).
    Ok {
        value: T,
        hash: Option<TxHash>,
        resources: ResourceEstimate,
    },
    /// A dry-run whose simulation flagged expired ledger entries. The
    /// assembled envelope and restore footprint let the caller offer a
    /// "Restore" action and retry.
    RestoreRequired {
        envelope: TransactionEnvelope,
        restore: RestorePreamble,
        resources: ResourceEstimate,
    },
    /// The chain or contract rejected the invocation.
    ContractErr {
        kind: ErrorKind,
        message: String,
        hash: Option<TxHash>,
        resources: ResourceEstimate,
    },
}

impl<T> ContractResult<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    pub fn is_err(&self) -> bool {
        matches!(self, Self::ContractErr { .. })
    }

    pub fn is_restore_required(&self) -> bool {
        matches!(self, Self::RestoreRequired { .. })
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn err_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::ContractErr { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn err_message(&self) -> Option<&str> {
        match self {
            Self::ContractErr { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn hash(&self) -> Option<&TxHash> {
        match self {
            Self::Ok { hash, .. } | Self::ContractErr { hash, .. } => hash.as_ref(),
            Self::RestoreRequired { .. } => None,
        }
    }

    pub fn resources(&self) -> &ResourceEstimate {
        match self {
            Self::Ok { resources, .. } | Self::RestoreRequired { resources, .. } | Self::ContractErr { resources, .. } => {
                resources
            },
        }
    }

    /// Maps the success value, leaving the other arms untouched.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ContractResult<U> {
        match self {
            Self::Ok { value, hash, resources } => ContractResult::Ok {
                value: f(value),
                hash,
                resources,
            },
            Self::RestoreRequired {
                envelope,
                restore,
                resources,
            } => ContractResult::RestoreRequired {
                envelope,
                restore,
                resources,
            },
            Self::ContractErr {
                kind,
                message,
                hash,
                resources,
            } => ContractResult::ContractErr {
                kind,
                message,
                hash,
                resources,
            },
        }
    }
}
