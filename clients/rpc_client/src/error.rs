//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

use thiserror::Error;

use conclave_codec::{Address, CodecError};

use crate::optional::IsNotFoundError;

/// JSON-RPC error code the node uses for entities that do not exist.
pub(crate) const ERR_CODE_NOT_FOUND: i64 = -32001;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("node returned error {code}: {message}")]
    Node { code: i64, message: String },
    #[error("malformed node response: {0}")]
    MalformedResponse(String),
    #[error("account {0} does not exist")]
    AccountNotFound(Address),
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

impl IsNotFoundError for RpcError {
    fn is_not_found_error(&self) -> bool {
        matches!(self, Self::AccountNotFound(_)) ||
            matches!(self, Self::Node { code, .. } if *code == ERR_CODE_NOT_FOUND)
    }
}
