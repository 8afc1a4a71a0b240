//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

//! Codec for binary-encoded ledger values.
//!
//! Values travel over the wire and on the ledger in CBOR form. This crate
//! provides the native [`LedgerValue`] model, the typed textual argument
//! representation ([`Val`]) used when arguments originate from user input,
//! and the decoder for governance proposal actions.

mod address;
mod error;
pub mod serde_with;

pub mod action;
pub mod typed;
pub mod value;

pub use address::Address;
pub use error::CodecError;

use serde::{de::DeserializeOwned, Serialize};

/// Encodes a value into its binary (CBOR) wire form.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::with_capacity(512);
    ciborium::ser::into_writer(value, &mut buf).map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Decodes a value from its binary (CBOR) wire form.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    ciborium::de::from_reader(bytes).map_err(|e| CodecError::Decode(e.to_string()))
}
