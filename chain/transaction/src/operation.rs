//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use conclave_codec::{action::Calldata, value::LedgerValue, Address};

use crate::footprint::LedgerFootprint;

/// The single operation carried by a transaction envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Invoke a contract function.
    InvokeContract {
        contract: Address,
        function: String,
        args: Vec<LedgerValue>,
        /// Sub-invocations the source pre-authorizes alongside the call.
        auths: Vec<Calldata>,
    },
    /// Restore expired ledger entries so a subsequent call can access them.
    RestoreFootprint { footprint: LedgerFootprint },
}

impl Operation {
    pub fn invoked_contract(&self) -> Option<&Address> {
        match self {
            Self::InvokeContract { contract, .. } => Some(contract),
            Self::RestoreFootprint { .. } => None,
        }
    }

    pub fn is_restore(&self) -> bool {
        matches!(self, Self::RestoreFootprint { .. })
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvokeContract {
                contract,
                function,
                args,
                auths,
            } => write!(
                f,
                "InvokeContract {{ contract: {}, function: {}, args: {}, auths: {} }}",
                contract,
                function,
                args.len(),
                auths.len()
            ),
            Self::RestoreFootprint { footprint } => write!(
                f,
                "RestoreFootprint {{ read_only: {}, read_write: {} }}",
                footprint.read_only.len(),
                footprint.read_write.len()
            ),
        }
    }
}
