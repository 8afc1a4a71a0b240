//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

use std::fmt::{Display, Formatter};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use conclave_codec::{Address, CodecError};

use crate::{footprint::SorobanData, hash::TxHash, operation::Operation};

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("envelope is missing a source account")]
    MissingSource,
    #[error("envelope is missing an operation")]
    MissingOperation,
    #[error("envelope is missing a network passphrase")]
    MissingNetwork,
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

/// The validity window of an envelope, in unix seconds. Zero means
/// unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBounds {
    pub min_time: u64,
    pub max_time: u64,
}

impl TimeBounds {
    pub const fn none() -> Self {
        Self {
            min_time: 0,
            max_time: 0,
        }
    }

    pub const fn until(max_time: u64) -> Self {
        Self { min_time: 0, max_time }
    }
}

/// A signable container for exactly one operation.
///
/// Envelopes are immutable: [`TransactionEnvelope::with_soroban_data`],
/// [`TransactionEnvelope::with_fee`] and
/// [`TransactionEnvelope::with_signature`] all return a new envelope.
/// The transaction hash covers everything except the signatures, so it is
/// stable across signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    source: Address,
    sequence: u64,
    fee: u64,
    time_bounds: TimeBounds,
    network_passphrase: String,
    operation: Operation,
    soroban_data: Option<SorobanData>,
    signatures: Vec<String>,
}

/// The signature-free view of an envelope that the transaction hash covers.
#[derive(Serialize)]
struct SignablePayload<'a> {
    source: &'a Address,
    sequence: u64,
    fee: u64,
    time_bounds: TimeBounds,
    network_passphrase: &'a str,
    operation: &'a Operation,
    soroban_data: Option<&'a SorobanData>,
}

impl TransactionEnvelope {
    pub fn builder() -> EnvelopeBuilder {
        EnvelopeBuilder::new()
    }

    pub fn source(&self) -> &Address {
        &self.source
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn fee(&self) -> u64 {
        self.fee
    }

    pub fn time_bounds(&self) -> TimeBounds {
        self.time_bounds
    }

    pub fn network_passphrase(&self) -> &str {
        &self.network_passphrase
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn soroban_data(&self) -> Option<&SorobanData> {
        self.soroban_data.as_ref()
    }

    pub fn signatures(&self) -> &[String] {
        &self.signatures
    }

    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }

    /// Attaches a simulated resource section. Existing signatures are
    /// dropped: they no longer cover the envelope.
    pub fn with_soroban_data(self, soroban_data: SorobanData) -> Self {
        Self {
            soroban_data: Some(soroban_data),
            signatures: vec![],
            ..self
        }
    }

    /// Replaces the total fee. Existing signatures are dropped.
    pub fn with_fee(self, fee: u64) -> Self {
        Self {
            fee,
            signatures: vec![],
            ..self
        }
    }

    pub fn with_signature<S: Into<String>>(self, signature: S) -> Self {
        let mut signatures = self.signatures;
        signatures.push(signature.into());
        Self { signatures, ..self }
    }

    /// The transaction hash. Stable across signature attachment.
    pub fn hash(&self) -> Result<TxHash, CodecError> {
        let payload = SignablePayload {
            source: &self.source,
            sequence: self.sequence,
            fee: self.fee,
            time_bounds: self.time_bounds,
            network_passphrase: &self.network_passphrase,
            operation: &self.operation,
            soroban_data: self.soroban_data.as_ref(),
        };
        Ok(TxHash::of_payload(&conclave_codec::encode(&payload)?))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        conclave_codec::encode(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        conclave_codec::decode(bytes)
    }

    /// The base64 form handed to signers and sent over the wire.
    pub fn to_base64(&self) -> Result<String, CodecError> {
        Ok(BASE64.encode(self.to_bytes()?))
    }

    pub fn from_base64(s: &str) -> Result<Self, CodecError> {
        let bytes = BASE64
            .decode(s)
            .map_err(|e| CodecError::Decode(format!("invalid base64 envelope: {e}")))?;
        Self::from_bytes(&bytes)
    }
}

impl Display for TransactionEnvelope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TransactionEnvelope[source: {}, seq: {}, fee: {}, op: {}, priced: {}, signatures: {}]",
            self.source,
            self.sequence,
            self.fee,
            self.operation,
            self.soroban_data.is_some(),
            self.signatures.len(),
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct EnvelopeBuilder {
    source: Option<Address>,
    sequence: u64,
    fee: u64,
    time_bounds: TimeBounds,
    network_passphrase: Option<String>,
    operation: Option<Operation>,
}

impl EnvelopeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: Address) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self
    }

    pub fn with_time_bounds(mut self, time_bounds: TimeBounds) -> Self {
        self.time_bounds = time_bounds;
        self
    }

    pub fn for_network<N: Into<String>>(mut self, network_passphrase: N) -> Self {
        self.network_passphrase = Some(network_passphrase.into());
        self
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn build(self) -> Result<TransactionEnvelope, EnvelopeError> {
        Ok(TransactionEnvelope {
            source: self.source.ok_or(EnvelopeError::MissingSource)?,
            sequence: self.sequence,
            fee: self.fee,
            time_bounds: self.time_bounds,
            network_passphrase: self.network_passphrase.ok_or(EnvelopeError::MissingNetwork)?,
            operation: self.operation.ok_or(EnvelopeError::MissingOperation)?,
            soroban_data: None,
            signatures: vec![],
        })
    }
}
