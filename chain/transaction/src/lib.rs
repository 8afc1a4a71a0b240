//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

//! Transaction envelopes for contract invocations.
//!
//! An envelope wraps exactly one operation together with the source account,
//! sequence number, fee and validity window. Envelopes are immutable values:
//! attaching simulated resources or a signature produces a new envelope.

mod envelope;
mod footprint;
mod hash;
mod operation;
mod resources;

pub use envelope::{EnvelopeBuilder, EnvelopeError, TimeBounds, TransactionEnvelope};
pub use footprint::{LedgerFootprint, LedgerKey, SorobanData};
pub use hash::TxHash;
pub use operation::Operation;
pub use resources::ResourceEstimate;
