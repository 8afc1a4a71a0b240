//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

use std::time::Duration;

use conclave_transaction::TimeBounds;

pub const DEFAULT_FEE: u64 = 100;
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Envelope construction parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderOptions {
    /// Base fee before the simulated resource fee is added.
    pub fee: u64,
    pub time_bounds: TimeBounds,
    pub network_passphrase: String,
}

impl BuilderOptions {
    pub fn for_network<N: Into<String>>(network_passphrase: N) -> Self {
        Self {
            fee: DEFAULT_FEE,
            time_bounds: TimeBounds::none(),
            network_passphrase: network_passphrase.into(),
        }
    }
}

/// Per-invocation pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOptions {
    /// Stop after simulation and return a dry-run result.
    pub sim: bool,
    /// Delay between terminal-status polls.
    pub polling_interval: Duration,
    /// Deadline for the whole poll phase.
    pub timeout: Duration,
    pub builder: BuilderOptions,
}

impl TxOptions {
    /// Options for a dry-run invocation (previews and reads).
    pub fn simulation<N: Into<String>>(network_passphrase: N) -> Self {
        Self {
            sim: true,
            ..Self::submission(network_passphrase)
        }
    }

    /// Options for a signed, submitted invocation.
    pub fn submission<N: Into<String>>(network_passphrase: N) -> Self {
        Self {
            sim: false,
            polling_interval: DEFAULT_POLLING_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            builder: BuilderOptions::for_network(network_passphrase),
        }
    }
}
