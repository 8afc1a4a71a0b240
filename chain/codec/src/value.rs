//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

use ethnum::{I256, U256};
use serde::{Deserialize, Serialize};

use crate::{serde_with, Address};

/// The native structured form of a binary-encoded ledger value.
///
/// Contract call returns, call arguments and proposal action payloads all
/// decode into this type. Map entries preserve ledger order; integers wider
/// than 64 bits travel as decimal strings on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerValue {
    Address(Address),
    Bool(bool),
    #[serde(with = "serde_with::hex")]
    Bytes(Vec<u8>),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    #[serde(with = "serde_with::dec_string")]
    I128(i128),
    #[serde(with = "serde_with::dec_string")]
    U128(u128),
    #[serde(with = "serde_with::dec_string")]
    I256(I256),
    #[serde(with = "serde_with::dec_string")]
    U256(U256),
    Map(Vec<(LedgerValue, LedgerValue)>),
    Str(String),
    Symbol(String),
    Vec(Vec<LedgerValue>),
    Void,
}

impl LedgerValue {
    /// The shape name used in decode error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Address(_) => "address",
            Self::Bool(_) => "bool",
            Self::Bytes(_) => "bytes",
            Self::I32(_) => "i32",
            Self::U32(_) => "u32",
            Self::I64(_) => "i64",
            Self::U64(_) => "u64",
            Self::I128(_) => "i128",
            Self::U128(_) => "u128",
            Self::I256(_) => "i256",
            Self::U256(_) => "u256",
            Self::Map(_) => "map",
            Self::Str(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Vec(_) => "vec",
            Self::Void => "void",
        }
    }

    pub fn as_address(&self) -> Option<&Address> {
        match self {
            Self::Address(address) => Some(address),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::U32(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U64(n) => Some(*n),
            _ => None,
        }
    }

    /// Widens any signed lane that fits into an i128.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Self::I32(n) => Some(i128::from(*n)),
            Self::I64(n) => Some(i128::from(*n)),
            Self::I128(n) => Some(*n),
            Self::U32(n) => Some(i128::from(*n)),
            Self::U64(n) => Some(i128::from(*n)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vec(&self) -> Option<&[LedgerValue]> {
        match self {
            Self::Vec(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(LedgerValue, LedgerValue)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    /// Looks a key up in a map value. Symbol and string keys compare by text.
    pub fn map_get(&self, key: &str) -> Option<&LedgerValue> {
        self.as_map()?.iter().find_map(|(k, v)| match k {
            Self::Symbol(s) | Self::Str(s) if s == key => Some(v),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_widens_integer_lanes_to_i128() {
        assert_eq!(LedgerValue::I32(-5).as_i128(), Some(-5));
        assert_eq!(LedgerValue::U64(7).as_i128(), Some(7));
        assert_eq!(LedgerValue::I128(i128::MIN).as_i128(), Some(i128::MIN));
        assert_eq!(LedgerValue::Str("5".to_string()).as_i128(), None);
    }

    #[test]
    fn it_looks_up_map_entries_by_symbol_or_string_key() {
        let map = LedgerValue::Map(vec![
            (LedgerValue::Symbol("quorum".to_string()), LedgerValue::U32(100)),
            (LedgerValue::Str("timelock".to_string()), LedgerValue::U32(7200)),
        ]);
        assert_eq!(map.map_get("quorum"), Some(&LedgerValue::U32(100)));
        assert_eq!(map.map_get("timelock"), Some(&LedgerValue::U32(7200)));
        assert_eq!(map.map_get("missing"), None);
        assert_eq!(LedgerValue::Void.map_get("quorum"), None);
    }
}
