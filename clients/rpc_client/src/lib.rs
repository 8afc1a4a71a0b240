//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

//! Client for a chain node's JSON-RPC interface.
//!
//! The [`ChainRpcClient`] trait is the seam the rest of the SDK talks
//! through; [`HttpRpcClient`] is the production implementation.

mod error;
mod http;
pub mod optional;
mod traits;
mod types;

pub use error::RpcError;
pub use http::HttpRpcClient;
pub use traits::ChainRpcClient;
pub use types::{
    AccountRecord,
    GetTransactionResponse,
    RestorePreamble,
    SendStatus,
    SendTransactionResponse,
    SimulationOutcome,
    TransactionStatus,
};
