//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

use serde::{Deserialize, Serialize};

use crate::envelope::TransactionEnvelope;

/// The resource cost of an invocation, derived from an envelope.
///
/// `fee` is the full fee the envelope carries (base fee plus resource fee).
/// An envelope that was never priced by simulation yields zero in every
/// resource lane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEstimate {
    pub fee: u64,
    pub refundable_fee: u64,
    pub cpu_instructions: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub read_only_entries: u32,
    pub read_write_entries: u32,
}

impl ResourceEstimate {
    /// The all-zero estimate, used when no envelope was ever priced.
    pub const fn empty() -> Self {
        Self {
            fee: 0,
            refundable_fee: 0,
            cpu_instructions: 0,
            bytes_read: 0,
            bytes_written: 0,
            read_only_entries: 0,
            read_write_entries: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }

    /// Derives the estimate from an envelope. Never fails; an envelope with
    /// no resource section reports only its fee.
    pub fn from_envelope(envelope: &TransactionEnvelope) -> Self {
        match envelope.soroban_data() {
            Some(data) => Self {
                fee: envelope.fee(),
                refundable_fee: data.refundable_fee,
                cpu_instructions: data.cpu_instructions,
                bytes_read: data.bytes_read,
                bytes_written: data.bytes_written,
                read_only_entries: data.footprint.read_only.len() as u32,
                read_write_entries: data.footprint.read_write.len() as u32,
            },
            None => Self {
                fee: envelope.fee(),
                ..Self::empty()
            },
        }
    }

    /// Derives the estimate from a serialized envelope. Bytes that do not
    /// decode degrade to [`ResourceEstimate::empty`].
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match TransactionEnvelope::from_bytes(bytes) {
            Ok(envelope) => Self::from_envelope(&envelope),
            Err(_) => Self::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use conclave_codec::value::LedgerValue;

    use super::*;
    use crate::{
        envelope::{TimeBounds, TransactionEnvelope},
        footprint::{LedgerFootprint, LedgerKey, SorobanData},
        operation::Operation,
    };

    const SOURCE: &str = "GA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ";
    const CONTRACT: &str = "CDVQVKOY2YSXS2IC7KN6MLLX4Q32W2QW2W2DLQWG75BF6YXNVQX6IONC";

    fn priced_envelope() -> TransactionEnvelope {
        TransactionEnvelope::builder()
            .with_source(SOURCE.parse().unwrap())
            .with_sequence(3)
            .with_fee(40_100)
            .with_time_bounds(TimeBounds::none())
            .for_network("testnet")
            .with_operation(Operation::InvokeContract {
                contract: CONTRACT.parse().unwrap(),
                function: "balance".to_string(),
                args: vec![LedgerValue::Address(SOURCE.parse().unwrap())],
                auths: vec![],
            })
            .build()
            .unwrap()
            .with_soroban_data(SorobanData {
                footprint: LedgerFootprint {
                    read_only: vec![
                        LedgerKey::ContractCode { hash: vec![1; 32] },
                        LedgerKey::ContractData {
                            contract: CONTRACT.parse().unwrap(),
                            key: LedgerValue::Symbol("Balance".to_string()),
                        },
                    ],
                    read_write: vec![LedgerKey::Account {
                        owner: SOURCE.parse().unwrap(),
                    }],
                },
                cpu_instructions: 250_000,
                bytes_read: 640,
                bytes_written: 128,
                resource_fee: 40_000,
                refundable_fee: 4_000,
            })
    }

    #[test]
    fn it_reads_every_resource_lane_from_the_envelope() {
        let estimate = ResourceEstimate::from_envelope(&priced_envelope());
        assert_eq!(estimate, ResourceEstimate {
            fee: 40_100,
            refundable_fee: 4_000,
            cpu_instructions: 250_000,
            bytes_read: 640,
            bytes_written: 128,
            read_only_entries: 2,
            read_write_entries: 1,
        });
        assert!(!estimate.is_empty());
    }

    #[test]
    fn it_is_idempotent_over_the_same_bytes() {
        let bytes = priced_envelope().to_bytes().unwrap();
        assert_eq!(ResourceEstimate::from_bytes(&bytes), ResourceEstimate::from_bytes(&bytes));
    }

    #[test]
    fn it_degrades_to_empty_for_unpriced_or_undecodable_input() {
        assert_eq!(ResourceEstimate::from_bytes(&[0xde, 0xad]), ResourceEstimate::empty());
        let unpriced = TransactionEnvelope::builder()
            .with_source(SOURCE.parse().unwrap())
            .for_network("testnet")
            .with_operation(Operation::RestoreFootprint {
                footprint: LedgerFootprint::default(),
            })
            .build()
            .unwrap();
        let estimate = ResourceEstimate::from_envelope(&unpriced);
        assert_eq!(estimate.cpu_instructions, 0);
        assert_eq!(estimate.read_only_entries, 0);
    }
}
