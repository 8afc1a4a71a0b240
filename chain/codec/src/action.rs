//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

//! Governance proposal actions.
//!
//! On the ledger an action is a two-element vector `(tag symbol, payload)`.
//! The tag selects the payload shape. Unknown tags fail the decode rather
//! than being coerced into a known variant.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{
    error::CodecError,
    typed::Val,
    value::LedgerValue,
    Address,
};

const WASM_HASH_LENGTH: usize = 32;

/// What a governance proposal does once it passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalAction {
    /// Invoke an arbitrary contract function with pre-approved arguments.
    Calldata(Calldata),
    /// Upgrade the governor to new contract code.
    Upgrade(Vec<u8>),
    /// Replace the governor's settings wholesale.
    Settings(GovernorSettings),
    /// Appoint a new security council.
    Council(Address),
    /// A vote with no on-chain effect beyond the recorded tally.
    Snapshot,
}

/// A contract invocation carried by a `Calldata` proposal, including the
/// sub-invocations the governor must authorize on the proposal's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calldata {
    pub contract_id: Address,
    pub function: String,
    pub args: Vec<Val>,
    pub auths: Vec<Calldata>,
}

/// The governor's full settings object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorSettings {
    pub counting_type: u32,
    pub grace_period: u32,
    pub proposal_threshold: i128,
    pub quorum: u32,
    pub timelock: u32,
    pub vote_delay: u32,
    pub vote_period: u32,
    pub vote_threshold: u32,
}

impl ProposalAction {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Calldata(_) => "Calldata",
            Self::Upgrade(_) => "Upgrade",
            Self::Settings(_) => "Settings",
            Self::Council(_) => "Council",
            Self::Snapshot => "Snapshot",
        }
    }

    /// Decodes an action from a `(tag, payload)` ledger value.
    pub fn from_value(value: &LedgerValue) -> Result<Self, CodecError> {
        let entries = value.as_vec().ok_or(CodecError::UnexpectedShape {
            expected: "a (tag, payload) vector",
            got: value.shape(),
        })?;
        let tag = entries
            .first()
            .and_then(LedgerValue::as_symbol)
            .ok_or(CodecError::UnexpectedShape {
                expected: "a symbol action tag",
                got: "missing or non-symbol first element",
            })?;
        let payload = entries.get(1);
        match tag {
            "Calldata" => {
                let payload = require_payload(payload)?;
                Ok(Self::Calldata(Calldata::from_value(payload)?))
            },
            "Upgrade" => {
                let payload = require_payload(payload)?;
                let hash = payload.as_bytes().ok_or(CodecError::UnexpectedShape {
                    expected: "wasm hash bytes",
                    got: payload.shape(),
                })?;
                if hash.len() != WASM_HASH_LENGTH {
                    return Err(CodecError::UnexpectedShape {
                        expected: "a 32-byte wasm hash",
                        got: "bytes of the wrong length",
                    });
                }
                Ok(Self::Upgrade(hash.to_vec()))
            },
            "Settings" => {
                let payload = require_payload(payload)?;
                Ok(Self::Settings(GovernorSettings::from_value(payload)?))
            },
            "Council" => {
                let payload = require_payload(payload)?;
                let address = payload.as_address().ok_or(CodecError::UnexpectedShape {
                    expected: "a council address",
                    got: payload.shape(),
                })?;
                Ok(Self::Council(address.clone()))
            },
            "Snapshot" => match payload {
                None => Ok(Self::Snapshot),
                Some(value) if value.is_void() => Ok(Self::Snapshot),
                Some(value) => Err(CodecError::UnexpectedShape {
                    expected: "no payload",
                    got: value.shape(),
                }),
            },
            other => Err(CodecError::UnknownActionTag { tag: other.to_string() }),
        }
    }

    /// Encodes an action into its `(tag, payload)` ledger value.
    pub fn to_value(&self) -> Result<LedgerValue, CodecError> {
        let tag = LedgerValue::Symbol(self.tag().to_string());
        let entries = match self {
            Self::Calldata(calldata) => vec![tag, calldata.to_value()?],
            Self::Upgrade(hash) => vec![tag, LedgerValue::Bytes(hash.clone())],
            Self::Settings(settings) => vec![tag, settings.to_value()],
            Self::Council(address) => vec![tag, LedgerValue::Address(address.clone())],
            Self::Snapshot => vec![tag],
        };
        Ok(LedgerValue::Vec(entries))
    }
}

impl Display for ProposalAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Calldata(calldata) => write!(f, "Calldata {{ {}.{} }}", calldata.contract_id, calldata.function),
            Self::Upgrade(hash) => write!(f, "Upgrade {{ {} }}", hex::encode(hash)),
            Self::Settings(_) => write!(f, "Settings"),
            Self::Council(address) => write!(f, "Council {{ {address} }}"),
            Self::Snapshot => write!(f, "Snapshot"),
        }
    }
}

impl Calldata {
    fn from_value(value: &LedgerValue) -> Result<Self, CodecError> {
        let contract_id = get_field(value, "contract_id")?
            .as_address()
            .ok_or(CodecError::UnexpectedShape {
                expected: "a contract address",
                got: "non-address contract_id",
            })?
            .clone();
        let function = match get_field(value, "function")? {
            LedgerValue::Symbol(s) | LedgerValue::Str(s) => s.clone(),
            other => {
                return Err(CodecError::UnexpectedShape {
                    expected: "a function symbol",
                    got: other.shape(),
                })
            },
        };
        let args = get_field(value, "args")?
            .as_vec()
            .ok_or(CodecError::UnexpectedShape {
                expected: "an argument vector",
                got: "non-vec args",
            })?
            .iter()
            .map(Val::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        let auths = get_field(value, "auths")?
            .as_vec()
            .ok_or(CodecError::UnexpectedShape {
                expected: "an authorization vector",
                got: "non-vec auths",
            })?
            .iter()
            .map(Calldata::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            contract_id,
            function,
            args,
            auths,
        })
    }

    fn to_value(&self) -> Result<LedgerValue, CodecError> {
        let args = self
            .args
            .iter()
            .map(Val::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        let auths = self
            .auths
            .iter()
            .map(Calldata::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LedgerValue::Map(vec![
            (symbol("args"), LedgerValue::Vec(args)),
            (symbol("auths"), LedgerValue::Vec(auths)),
            (symbol("contract_id"), LedgerValue::Address(self.contract_id.clone())),
            (symbol("function"), LedgerValue::Symbol(self.function.clone())),
        ]))
    }
}

impl GovernorSettings {
    fn from_value(value: &LedgerValue) -> Result<Self, CodecError> {
        Ok(Self {
            counting_type: get_u32(value, "counting_type")?,
            grace_period: get_u32(value, "grace_period")?,
            proposal_threshold: get_field(value, "proposal_threshold")?
                .as_i128()
                .ok_or(CodecError::UnexpectedShape {
                    expected: "an i128 proposal threshold",
                    got: "non-integer proposal_threshold",
                })?,
            quorum: get_u32(value, "quorum")?,
            timelock: get_u32(value, "timelock")?,
            vote_delay: get_u32(value, "vote_delay")?,
            vote_period: get_u32(value, "vote_period")?,
            vote_threshold: get_u32(value, "vote_threshold")?,
        })
    }

    fn to_value(&self) -> LedgerValue {
        LedgerValue::Map(vec![
            (symbol("counting_type"), LedgerValue::U32(self.counting_type)),
            (symbol("grace_period"), LedgerValue::U32(self.grace_period)),
            (symbol("proposal_threshold"), LedgerValue::I128(self.proposal_threshold)),
            (symbol("quorum"), LedgerValue::U32(self.quorum)),
            (symbol("timelock"), LedgerValue::U32(self.timelock)),
            (symbol("vote_delay"), LedgerValue::U32(self.vote_delay)),
            (symbol("vote_period"), LedgerValue::U32(self.vote_period)),
            (symbol("vote_threshold"), LedgerValue::U32(self.vote_threshold)),
        ])
    }
}

/// Decodes a proposal action from its binary wire form.
pub fn decode_proposal_action(bytes: &[u8]) -> Result<ProposalAction, CodecError> {
    let value = crate::decode::<LedgerValue>(bytes)?;
    ProposalAction::from_value(&value)
}

fn symbol(s: &str) -> LedgerValue {
    LedgerValue::Symbol(s.to_string())
}

fn require_payload(payload: Option<&LedgerValue>) -> Result<&LedgerValue, CodecError> {
    payload.ok_or(CodecError::UnexpectedShape {
        expected: "an action payload",
        got: "missing payload",
    })
}

fn get_field<'a>(value: &'a LedgerValue, key: &'static str) -> Result<&'a LedgerValue, CodecError> {
    value.map_get(key).ok_or(CodecError::UnexpectedShape {
        expected: "a payload map with the required keys",
        got: "a map missing a required key",
    })
}

fn get_u32(value: &LedgerValue, key: &'static str) -> Result<u32, CodecError> {
    get_field(value, key)?.as_u32().ok_or(CodecError::UnexpectedShape {
        expected: "a u32 settings field",
        got: "non-u32 settings field",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed::ValType;

    const CONTRACT: &str = "CDVQVKOY2YSXS2IC7KN6MLLX4Q32W2QW2W2DLQWG75BF6YXNVQX6IONC";
    const COUNCIL: &str = "GA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ";

    fn calldata() -> Calldata {
        Calldata {
            contract_id: CONTRACT.parse().unwrap(),
            function: "transfer".to_string(),
            args: vec![Val::new("42", ValType::I128)],
            auths: vec![Calldata {
                contract_id: CONTRACT.parse().unwrap(),
                function: "approve".to_string(),
                args: vec![],
                auths: vec![],
            }],
        }
    }

    #[test]
    fn it_decodes_a_snapshot_action_without_payload() {
        let bytes = crate::encode(&LedgerValue::Vec(vec![symbol("Snapshot")])).unwrap();
        assert_eq!(decode_proposal_action(&bytes).unwrap(), ProposalAction::Snapshot);

        let bytes = crate::encode(&LedgerValue::Vec(vec![symbol("Snapshot"), LedgerValue::Void])).unwrap();
        assert_eq!(decode_proposal_action(&bytes).unwrap(), ProposalAction::Snapshot);
    }

    #[test]
    fn it_round_trips_every_action_variant() {
        let actions = [
            ProposalAction::Calldata(calldata()),
            ProposalAction::Upgrade(vec![7u8; 32]),
            ProposalAction::Settings(GovernorSettings {
                counting_type: 2,
                grace_period: 17_280,
                proposal_threshold: 1_000_0000000,
                quorum: 500,
                timelock: 4_320,
                vote_delay: 4_320,
                vote_period: 17_280,
                vote_threshold: 5_100,
            }),
            ProposalAction::Council(COUNCIL.parse().unwrap()),
            ProposalAction::Snapshot,
        ];
        for action in actions {
            let bytes = crate::encode(&action.to_value().unwrap()).unwrap();
            assert_eq!(decode_proposal_action(&bytes).unwrap(), action);
        }
    }

    #[test]
    fn it_preserves_empty_calldata_vectors() {
        let mut empty = calldata();
        empty.args = vec![];
        empty.auths = vec![];
        let bytes = crate::encode(&ProposalAction::Calldata(empty.clone()).to_value().unwrap()).unwrap();
        let decoded = decode_proposal_action(&bytes).unwrap();
        match decoded {
            ProposalAction::Calldata(calldata) => {
                assert!(calldata.args.is_empty());
                assert!(calldata.auths.is_empty());
            },
            other => panic!("expected Calldata, got {other}"),
        }
    }

    #[test]
    fn it_fails_loudly_on_unknown_tags() {
        let bytes = crate::encode(&LedgerValue::Vec(vec![symbol("SelfDestruct"), LedgerValue::Void])).unwrap();
        let err = decode_proposal_action(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::UnknownActionTag { tag } if tag == "SelfDestruct"));
    }

    #[test]
    fn it_rejects_wrong_length_upgrade_hashes() {
        let bytes = crate::encode(&LedgerValue::Vec(vec![
            symbol("Upgrade"),
            LedgerValue::Bytes(vec![1, 2, 3]),
        ]))
        .unwrap();
        decode_proposal_action(&bytes).unwrap_err();
    }

    #[test]
    fn it_rejects_payload_shapes_that_do_not_match_the_tag() {
        let bytes = crate::encode(&LedgerValue::Vec(vec![symbol("Council"), LedgerValue::U32(7)])).unwrap();
        decode_proposal_action(&bytes).unwrap_err();
        let bytes = crate::encode(&LedgerValue::U32(7)).unwrap();
        decode_proposal_action(&bytes).unwrap_err();
    }
}
