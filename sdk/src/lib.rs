//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

//! Governance client SDK.
//!
//! [`OperationInvoker`] drives a contract invocation from construction
//! through simulation, signing, submission and polling, folding every
//! response shape into a [`ContractResult`]. [`VotingClient`] wraps the
//! governor and votes contracts with typed calls that delegate to the
//! invoker.

pub mod errors;
mod invoker;
mod options;
mod result;
mod signer;
mod voting;

pub use invoker::{OperationInvoker, TransportError};
pub use options::{BuilderOptions, TxOptions, DEFAULT_FEE, DEFAULT_POLLING_INTERVAL, DEFAULT_TIMEOUT};
pub use result::{ContractResult, ErrorKind};
pub use signer::{EnvelopeSigner, SignerRejected};
pub use voting::{VoteSupport, VotingClient, VotingContext};
