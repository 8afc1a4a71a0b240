//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

use serde::{Deserialize, Serialize};

use conclave_codec::{serde_with, Address, CodecError, value::LedgerValue};

/// Identifies a single ledger entry touched by a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerKey {
    Account {
        owner: Address,
    },
    ContractData {
        contract: Address,
        key: LedgerValue,
    },
    ContractCode {
        #[serde(with = "serde_with::hex")]
        hash: Vec<u8>,
    },
}

/// The ledger entries a transaction reads and writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFootprint {
    pub read_only: Vec<LedgerKey>,
    pub read_write: Vec<LedgerKey>,
}

/// The resource section attached to an envelope once simulation has priced
/// the invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SorobanData {
    pub footprint: LedgerFootprint,
    pub cpu_instructions: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub resource_fee: u64,
    pub refundable_fee: u64,
}

impl SorobanData {
    /// Decodes the resource section from the simulation's `transaction_data`
    /// bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        conclave_codec::decode(bytes)
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        conclave_codec::encode(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = "CDVQVKOY2YSXS2IC7KN6MLLX4Q32W2QW2W2DLQWG75BF6YXNVQX6IONC";

    #[test]
    fn it_round_trips_the_resource_section() {
        let data = SorobanData {
            footprint: LedgerFootprint {
                read_only: vec![LedgerKey::ContractCode { hash: vec![9; 32] }],
                read_write: vec![LedgerKey::ContractData {
                    contract: CONTRACT.parse().unwrap(),
                    key: LedgerValue::Symbol("Proposal".to_string()),
                }],
            },
            cpu_instructions: 1_000_000,
            bytes_read: 2_048,
            bytes_written: 512,
            resource_fee: 75_000,
            refundable_fee: 15_000,
        };
        let bytes = data.encode().unwrap();
        assert_eq!(SorobanData::decode(&bytes).unwrap(), data);
    }

    #[test]
    fn it_fails_on_malformed_bytes() {
        SorobanData::decode(&[0x01, 0x02]).unwrap_err();
    }
}
