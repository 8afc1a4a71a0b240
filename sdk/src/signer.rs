//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

use async_trait::async_trait;
use thiserror::Error;

use conclave_codec::Address;

/// The signer declined or failed to produce a signature.
#[derive(Debug, Clone, Error)]
#[error("signer rejected the transaction: {reason}")]
pub struct SignerRejected {
    pub reason: String,
}

impl SignerRejected {
    pub fn new<R: Into<String>>(reason: R) -> Self {
        Self { reason: reason.into() }
    }
}

/// An external signing capability, typically backed by a wallet.
///
/// The capability receives the unsigned envelope in its base64 wire form
/// and returns the signed envelope in the same form. It may reject; the
/// pipeline never retries a rejected signature.
#[async_trait]
pub trait EnvelopeSigner: Send + Sync {
    async fn sign(
        &self,
        unsigned_envelope: &str,
        identities: &[Address],
        network_passphrase: &str,
    ) -> Result<String, SignerRejected>;
}
