//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

use async_trait::async_trait;

use conclave_codec::Address;
use conclave_transaction::{TransactionEnvelope, TxHash};

use crate::{
    optional::IsNotFoundError,
    types::{AccountRecord, GetTransactionResponse, SendTransactionResponse, SimulationOutcome},
};

/// The network seam of the invocation pipeline.
///
/// Implementations are stateless per call and may be shared by reference
/// across concurrent invocations.
#[async_trait]
pub trait ChainRpcClient: Send + Sync {
    type Error: std::error::Error + IsNotFoundError + Send + Sync + 'static;

    /// Fetches the live account record for an envelope source.
    async fn get_account(&self, address: &Address) -> Result<AccountRecord, Self::Error>;

    /// Dry-runs an envelope against the node, pricing its resources.
    async fn simulate_transaction(&self, envelope: &TransactionEnvelope) -> Result<SimulationOutcome, Self::Error>;

    /// Submits a signed envelope.
    async fn send_transaction(&self, envelope: &TransactionEnvelope) -> Result<SendTransactionResponse, Self::Error>;

    /// Fetches the lifecycle status of a submitted transaction.
    async fn get_transaction(&self, hash: &TxHash) -> Result<GetTransactionResponse, Self::Error>;
}
