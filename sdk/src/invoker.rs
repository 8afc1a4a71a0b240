//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

use log::*;
use thiserror::Error;
use tokio::time::{self, Instant};

use conclave_codec::{value::LedgerValue, Address, CodecError};
use conclave_rpc_client::{
    optional::Optional,
    ChainRpcClient,
    SendStatus,
    SimulationOutcome,
    TransactionStatus,
};
use conclave_transaction::{Operation, ResourceEstimate, SorobanData, TransactionEnvelope};

use crate::{
    errors::describe_chain_error,
    options::TxOptions,
    result::{ContractResult, ErrorKind},
    signer::EnvelopeSigner,
};

const LOG_TARGET: &str = "conclave::sdk::invoker";

/// Throwaway sequence number used for the placeholder source of a dry-run.
const SIMULATION_SEQUENCE: u64 = 0;

/// The fixed user-facing message for a declined signature. The wallet's raw
/// rejection string is logged, never displayed.
pub(crate) const WALLET_REJECTED_MESSAGE: &str = "Transaction rejected by wallet.";

/// A failure outside the modeled protocol (DNS down, unreadable wire data).
///
/// Everything classifiable within the pipeline's state machine is folded
/// into [`ContractResult`] instead; this is the only error
/// [`OperationInvoker::invoke`] returns.
#[derive(Debug, Error)]
#[error("network transport failure: {0}")]
pub struct TransportError(#[from] anyhow::Error);

fn transport<E: std::error::Error + Send + Sync + 'static>(e: E) -> TransportError {
    TransportError(anyhow::Error::new(e))
}

/// Drives one contract invocation through the pipeline:
/// build → simulate → (sign → submit → poll).
///
/// All per-invocation state lives in locals of [`OperationInvoker::invoke`];
/// the shared client is stateless per call, so concurrent invocations need
/// no coordination.
pub struct OperationInvoker<'a, TClient> {
    client: &'a TClient,
}

impl<'a, TClient: ChainRpcClient> OperationInvoker<'a, TClient> {
    pub fn new(client: &'a TClient) -> Self {
        Self { client }
    }

    /// Invokes one operation and resolves to a [`ContractResult`].
    ///
    /// With `options.sim` set the pipeline stops after simulation and the
    /// signer is never consulted. The caller-supplied `parse` maps the raw
    /// return payload (absent for void-returning calls) to the typed value.
    pub async fn invoke<T, P>(
        &self,
        source: &Address,
        signer: &dyn EnvelopeSigner,
        options: &TxOptions,
        parse: P,
        operation: Operation,
    ) -> Result<ContractResult<T>, TransportError>
    where
        P: Fn(Option<&LedgerValue>) -> Result<T, CodecError>,
    {
        // BUILDING
        let sequence = if options.sim {
            SIMULATION_SEQUENCE
        } else {
            match self.client.get_account(source).await.optional().map_err(transport)? {
                Some(account) => account.sequence + 1,
                None => {
                    debug!(target: LOG_TARGET, "Source account {} does not exist", source);
                    return Ok(ContractResult::ContractErr {
                        kind: ErrorKind::Simulation,
                        message: format!("source account {source} does not exist"),
                        hash: None,
                        resources: ResourceEstimate::empty(),
                    });
                },
            }
        };
        let envelope = TransactionEnvelope::builder()
            .with_source(source.clone())
            .with_sequence(sequence)
            .with_fee(options.builder.fee)
            .with_time_bounds(options.builder.time_bounds)
            .for_network(options.builder.network_passphrase.clone())
            .with_operation(operation)
            .build()
            .map_err(transport)?;

        // SIMULATING
        debug!(target: LOG_TARGET, "Simulating {}", envelope);
        let outcome = self.client.simulate_transaction(&envelope).await.map_err(transport)?;
        let (return_value, transaction_data, min_resource_fee, restore) = match outcome {
            SimulationOutcome::Error { message } => {
                info!(target: LOG_TARGET, "Simulation rejected: {}", message);
                return Ok(ContractResult::ContractErr {
                    kind: ErrorKind::Simulation,
                    message: describe_chain_error(&message),
                    hash: envelope.hash().ok(),
                    resources: ResourceEstimate::empty(),
                });
            },
            SimulationOutcome::Success {
                return_value,
                transaction_data,
                min_resource_fee,
                restore,
            } => (return_value, transaction_data, min_resource_fee, restore),
        };

        // Attach the priced resource section; the envelope's fee becomes
        // base fee plus the simulated resource fee.
        let soroban_data = SorobanData::decode(&transaction_data).map_err(transport)?;
        let assembled = envelope
            .with_soroban_data(soroban_data)
            .with_fee(options.builder.fee + min_resource_fee);
        let resources = ResourceEstimate::from_envelope(&assembled);

        if let Some(restore) = restore {
            info!(
                target: LOG_TARGET,
                "Simulation flagged expired ledger entries for {}", assembled
            );
            return Ok(ContractResult::RestoreRequired {
                envelope: assembled,
                restore,
                resources,
            });
        }

        if options.sim {
            // SIM_ONLY_DONE: dry-run result for previews and reads.
            let decoded = match return_value.as_deref().map(conclave_codec::decode::<LedgerValue>).transpose() {
                Ok(value) => value,
                Err(e) => return Ok(unparsable(e, &assembled, resources)),
            };
            return Ok(match parse(decoded.as_ref()) {
                Ok(value) => ContractResult::Ok {
                    value,
                    hash: assembled.hash().ok(),
                    resources,
                },
                Err(e) => unparsable(e, &assembled, resources),
            });
        }

        // SIGNING
        let unsigned = assembled.to_base64().map_err(transport)?;
        let signed = match signer
            .sign(&unsigned, &[source.clone()], &options.builder.network_passphrase)
            .await
        {
            Ok(signed) => signed,
            Err(rejected) => {
                debug!(target: LOG_TARGET, "Signer rejected transaction: {}", rejected.reason);
                return Ok(ContractResult::ContractErr {
                    kind: ErrorKind::Signing,
                    message: WALLET_REJECTED_MESSAGE.to_string(),
                    hash: assembled.hash().ok(),
                    resources,
                });
            },
        };
        let signed = match TransactionEnvelope::from_base64(&signed) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!(target: LOG_TARGET, "Signer returned an unreadable envelope: {}", e);
                return Ok(ContractResult::ContractErr {
                    kind: ErrorKind::Signing,
                    message: "Wallet returned an unreadable signed envelope.".to_string(),
                    hash: assembled.hash().ok(),
                    resources,
                });
            },
        };

        // SUBMITTING
        info!(target: LOG_TARGET, "Submitting {}", signed);
        let sent = self.client.send_transaction(&signed).await.map_err(transport)?;
        let hash = sent.hash;
        if matches!(sent.status, SendStatus::Error | SendStatus::TryAgainLater) {
            let message = sent
                .error_message
                .as_deref()
                .map(describe_chain_error)
                .unwrap_or_else(|| "the node rejected the transaction".to_string());
            info!(target: LOG_TARGET, "Send of {} rejected: {}", hash, message);
            return Ok(ContractResult::ContractErr {
                kind: ErrorKind::Submission,
                message,
                hash: Some(hash),
                resources,
            });
        }

        // POLLING: fixed interval, bounded by a deadline. The loop runs
        // inside this future; abandoning the future abandons the poll but
        // never the submitted transaction.
        let deadline = Instant::now() + options.timeout;
        let mut last_status = TransactionStatus::Pending;
        loop {
            if Instant::now() >= deadline {
                info!(
                    target: LOG_TARGET,
                    "Transaction {} still {} at the polling deadline", hash, last_status
                );
                return Ok(ContractResult::ContractErr {
                    kind: ErrorKind::Unknown,
                    message: format!(
                        "transaction {hash} was still {last_status} when the {}ms polling deadline expired",
                        options.timeout.as_millis()
                    ),
                    hash: Some(hash),
                    resources,
                });
            }
            time::sleep(options.polling_interval).await;
            let response = self.client.get_transaction(&hash).await.map_err(transport)?;
            match response.status {
                TransactionStatus::Pending | TransactionStatus::NotFound => {
                    last_status = response.status;
                },
                TransactionStatus::Success => {
                    let decoded = match response
                        .result_payload
                        .as_deref()
                        .map(conclave_codec::decode::<LedgerValue>)
                        .transpose()
                    {
                        Ok(value) => value,
                        Err(e) => return Ok(unparsable_at(e, Some(hash), resources)),
                    };
                    return Ok(match parse(decoded.as_ref()) {
                        Ok(value) => ContractResult::Ok {
                            value,
                            hash: Some(hash),
                            resources,
                        },
                        Err(e) => unparsable_at(e, Some(hash), resources),
                    });
                },
                TransactionStatus::Failed => {
                    let message = match response.error_payload.as_deref() {
                        Some(bytes) => describe_chain_error(&render_error_payload(bytes)),
                        None => "transaction failed without a diagnostic payload".to_string(),
                    };
                    info!(target: LOG_TARGET, "Transaction {} failed: {}", hash, message);
                    return Ok(ContractResult::ContractErr {
                        kind: ErrorKind::Execution,
                        message,
                        hash: Some(hash),
                        resources,
                    });
                },
                TransactionStatus::Other(status) => {
                    return Ok(ContractResult::ContractErr {
                        kind: ErrorKind::Unknown,
                        message: format!("transaction {hash} reached unrecognized status {status}"),
                        hash: Some(hash),
                        resources,
                    });
                },
            }
        }
    }
}

fn unparsable<T>(e: CodecError, envelope: &TransactionEnvelope, resources: ResourceEstimate) -> ContractResult<T> {
    unparsable_at(e, envelope.hash().ok(), resources)
}

fn unparsable_at<T>(
    e: CodecError,
    hash: Option<conclave_transaction::TxHash>,
    resources: ResourceEstimate,
) -> ContractResult<T> {
    ContractResult::ContractErr {
        kind: ErrorKind::Unknown,
        message: format!("could not parse the invocation's return value: {e}"),
        hash,
        resources,
    }
}

/// Renders a failed transaction's diagnostic payload as text.
fn render_error_payload(bytes: &[u8]) -> String {
    match conclave_codec::decode::<LedgerValue>(bytes) {
        Ok(LedgerValue::Str(s)) | Ok(LedgerValue::Symbol(s)) => s,
        Ok(other) => format!("{other:?}"),
        Err(_) => "transaction failed with an undecodable diagnostic payload".to_string(),
    }
}
