//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

use thiserror::Error;

use crate::typed::ValType;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode value: {0}")]
    Encode(String),
    #[error("failed to decode value: {0}")]
    Decode(String),
    #[error("invalid {value_type} value '{value}': {reason}")]
    InvalidTypedValue {
        value_type: ValType,
        value: String,
        reason: String,
    },
    #[error("unexpected value shape: expected {expected}, got {got}")]
    UnexpectedShape {
        expected: &'static str,
        got: &'static str,
    },
    #[error("unknown proposal action tag '{tag}'")]
    UnknownActionTag { tag: String },
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: &'static str },
}

impl CodecError {
    pub fn invalid_typed_value<V: Into<String>, R: Into<String>>(value_type: ValType, value: V, reason: R) -> Self {
        Self::InvalidTypedValue {
            value_type,
            value: value.into(),
            reason: reason.into(),
        }
    }
}
