//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

//! Textual typed arguments.
//!
//! Arguments that originate from user input arrive as text paired with a
//! declared type tag. [`Val::to_value`] parses the text under the tag and
//! fails when the text is not lexically valid for it; [`Val::from_value`] is
//! the inverse and always renders the canonical form (no leading zeros,
//! lowercase hex).

use std::fmt::{Display, Formatter};

use ethnum::{I256, U256};
use serde::{Deserialize, Serialize};

use crate::{error::CodecError, value::LedgerValue, Address};

const MAX_SYMBOL_LENGTH: usize = 32;

/// The closed enumeration of argument type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValType {
    Address,
    Bool,
    Bytes,
    I32,
    U32,
    I64,
    U64,
    I128,
    U128,
    I256,
    U256,
    Map,
    String,
    Symbol,
    Vec,
}

impl Display for ValType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Address => "address",
            Self::Bool => "bool",
            Self::Bytes => "bytes",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::I128 => "i128",
            Self::U128 => "u128",
            Self::I256 => "i256",
            Self::U256 => "u256",
            Self::Map => "map",
            Self::String => "string",
            Self::Symbol => "symbol",
            Self::Vec => "vec",
        };
        write!(f, "{name}")
    }
}

/// A raw textual value paired with its declared type tag.
///
/// For the `map` and `vec` tags the text is a JSON document of nested
/// [`Val`]s (`vec`: an array of vals, `map`: an array of key/value entries).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Val {
    pub value: String,
    #[serde(rename = "type")]
    pub value_type: ValType,
}

/// One entry of a `map`-tagged value's JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: Val,
    pub value: Val,
}

impl Val {
    pub fn new<V: Into<String>>(value: V, value_type: ValType) -> Self {
        Self {
            value: value.into(),
            value_type,
        }
    }

    /// Parses the text under the declared tag into a ledger value.
    pub fn to_value(&self) -> Result<LedgerValue, CodecError> {
        let text = self.value.as_str();
        let invalid = |reason: &str| CodecError::invalid_typed_value(self.value_type, text, reason);
        match self.value_type {
            ValType::Address => Ok(LedgerValue::Address(text.parse::<Address>()?)),
            ValType::Bool => match text {
                "true" => Ok(LedgerValue::Bool(true)),
                "false" => Ok(LedgerValue::Bool(false)),
                _ => Err(invalid("expected 'true' or 'false'")),
            },
            ValType::Bytes => hex::decode(text)
                .map(LedgerValue::Bytes)
                .map_err(|e| invalid(&e.to_string())),
            ValType::I32 => text.parse().map(LedgerValue::I32).map_err(|e| invalid(&e.to_string())),
            ValType::U32 => text.parse().map(LedgerValue::U32).map_err(|e| invalid(&e.to_string())),
            ValType::I64 => text.parse().map(LedgerValue::I64).map_err(|e| invalid(&e.to_string())),
            ValType::U64 => text.parse().map(LedgerValue::U64).map_err(|e| invalid(&e.to_string())),
            ValType::I128 => text.parse().map(LedgerValue::I128).map_err(|e| invalid(&e.to_string())),
            ValType::U128 => text.parse().map(LedgerValue::U128).map_err(|e| invalid(&e.to_string())),
            ValType::I256 => text
                .parse::<I256>()
                .map(LedgerValue::I256)
                .map_err(|e| invalid(&e.to_string())),
            ValType::U256 => text
                .parse::<U256>()
                .map(LedgerValue::U256)
                .map_err(|e| invalid(&e.to_string())),
            ValType::Map => {
                let entries: Vec<MapEntry> = serde_json::from_str(text).map_err(|e| invalid(&e.to_string()))?;
                let mut out = Vec::with_capacity(entries.len());
                for entry in &entries {
                    out.push((entry.key.to_value()?, entry.value.to_value()?));
                }
                Ok(LedgerValue::Map(out))
            },
            ValType::String => Ok(LedgerValue::Str(text.to_string())),
            ValType::Symbol => {
                if text.is_empty() || text.len() > MAX_SYMBOL_LENGTH {
                    return Err(invalid("symbols must be 1-32 characters"));
                }
                if !text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    return Err(invalid("symbols may only contain [a-zA-Z0-9_]"));
                }
                Ok(LedgerValue::Symbol(text.to_string()))
            },
            ValType::Vec => {
                let vals: Vec<Val> = serde_json::from_str(text).map_err(|e| invalid(&e.to_string()))?;
                let mut out = Vec::with_capacity(vals.len());
                for val in &vals {
                    out.push(val.to_value()?);
                }
                Ok(LedgerValue::Vec(out))
            },
        }
    }

    /// Renders a ledger value back into its canonical typed textual form.
    ///
    /// Fails for `void`, which has no tag in the argument enumeration.
    pub fn from_value(value: &LedgerValue) -> Result<Val, CodecError> {
        let val = match value {
            LedgerValue::Address(address) => Self::new(address.to_string(), ValType::Address),
            LedgerValue::Bool(b) => Self::new(b.to_string(), ValType::Bool),
            LedgerValue::Bytes(bytes) => Self::new(hex::encode(bytes), ValType::Bytes),
            LedgerValue::I32(n) => Self::new(n.to_string(), ValType::I32),
            LedgerValue::U32(n) => Self::new(n.to_string(), ValType::U32),
            LedgerValue::I64(n) => Self::new(n.to_string(), ValType::I64),
            LedgerValue::U64(n) => Self::new(n.to_string(), ValType::U64),
            LedgerValue::I128(n) => Self::new(n.to_string(), ValType::I128),
            LedgerValue::U128(n) => Self::new(n.to_string(), ValType::U128),
            LedgerValue::I256(n) => Self::new(n.to_string(), ValType::I256),
            LedgerValue::U256(n) => Self::new(n.to_string(), ValType::U256),
            LedgerValue::Map(entries) => {
                let mut out = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    out.push(MapEntry {
                        key: Self::from_value(key)?,
                        value: Self::from_value(value)?,
                    });
                }
                let text = serde_json::to_string(&out).map_err(|e| CodecError::Encode(e.to_string()))?;
                Self::new(text, ValType::Map)
            },
            LedgerValue::Str(s) => Self::new(s.clone(), ValType::String),
            LedgerValue::Symbol(s) => Self::new(s.clone(), ValType::Symbol),
            LedgerValue::Vec(values) => {
                let vals = values.iter().map(Self::from_value).collect::<Result<Vec<_>, _>>()?;
                let text = serde_json::to_string(&vals).map_err(|e| CodecError::Encode(e.to_string()))?;
                Self::new(text, ValType::Vec)
            },
            LedgerValue::Void => {
                return Err(CodecError::UnexpectedShape {
                    expected: "a typed argument value",
                    got: "void",
                })
            },
        };
        Ok(val)
    }
}

impl Display for Val {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.value, self.value_type)
    }
}
