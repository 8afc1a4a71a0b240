//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use log::*;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use conclave_codec::Address;
use conclave_transaction::{TransactionEnvelope, TxHash};

use crate::{
    error::{RpcError, ERR_CODE_NOT_FOUND},
    traits::ChainRpcClient,
    types::{
        AccountRecord,
        GetTransactionResponse,
        RestorePreamble,
        SendStatus,
        SendTransactionResponse,
        SimulationOutcome,
        TransactionStatus,
    },
};

const LOG_TARGET: &str = "conclave::rpc_client::http";

/// JSON-RPC 2.0 client for a chain node.
pub struct HttpRpcClient {
    client: reqwest::Client,
    url: Url,
    next_id: AtomicU64,
}

impl HttpRpcClient {
    pub fn new(url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: Url) -> Self {
        Self {
            client,
            url,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn call<P: Serialize, R: DeserializeOwned>(&self, method: &str, params: P) -> Result<R, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(target: LOG_TARGET, "Calling {} (id = {}) on {}", method, id, self.url);
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        let response = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?
            .json::<JsonRpcResponse<R>>()
            .await?;
        if let Some(error) = response.error {
            debug!(
                target: LOG_TARGET,
                "Node returned error {} for {}: {}", error.code, method, error.message
            );
            return Err(RpcError::Node {
                code: error.code,
                message: error.message,
            });
        }
        response
            .result
            .ok_or_else(|| RpcError::MalformedResponse(format!("{method} response carried neither result nor error")))
    }
}

#[async_trait]
impl ChainRpcClient for HttpRpcClient {
    type Error = RpcError;

    async fn get_account(&self, address: &Address) -> Result<AccountRecord, Self::Error> {
        let raw: RawAccount = self
            .call("getAccount", AddressParams { address })
            .await
            .map_err(|e| match e {
                RpcError::Node { code, .. } if code == ERR_CODE_NOT_FOUND => RpcError::AccountNotFound(address.clone()),
                other => other,
            })?;
        Ok(AccountRecord {
            sequence: parse_u64(&raw.sequence, "sequence")?,
        })
    }

    async fn simulate_transaction(&self, envelope: &TransactionEnvelope) -> Result<SimulationOutcome, Self::Error> {
        let transaction = envelope.to_base64()?;
        let raw: RawSimulation = self
            .call("simulateTransaction", TransactionParams { transaction })
            .await?;
        if let Some(message) = raw.error {
            return Ok(SimulationOutcome::Error { message });
        }
        let transaction_data = raw
            .transaction_data
            .ok_or_else(|| RpcError::MalformedResponse("simulation success without transactionData".to_string()))?;
        let min_resource_fee = raw
            .min_resource_fee
            .ok_or_else(|| RpcError::MalformedResponse("simulation success without minResourceFee".to_string()))?;
        Ok(SimulationOutcome::Success {
            return_value: raw.return_value.as_deref().map(decode_base64).transpose()?,
            transaction_data: decode_base64(&transaction_data)?,
            min_resource_fee: parse_u64(&min_resource_fee, "minResourceFee")?,
            restore: raw
                .restore_preamble
                .map(|raw| {
                    Ok::<_, RpcError>(RestorePreamble {
                        transaction_data: decode_base64(&raw.transaction_data)?,
                        min_resource_fee: parse_u64(&raw.min_resource_fee, "restore minResourceFee")?,
                    })
                })
                .transpose()?,
        })
    }

    async fn send_transaction(&self, envelope: &TransactionEnvelope) -> Result<SendTransactionResponse, Self::Error> {
        let transaction = envelope.to_base64()?;
        let raw: RawSendResponse = self.call("sendTransaction", TransactionParams { transaction }).await?;
        let status = match raw.status.as_str() {
            "PENDING" => SendStatus::Pending,
            "DUPLICATE" => SendStatus::Duplicate,
            "TRY_AGAIN_LATER" => SendStatus::TryAgainLater,
            "ERROR" => SendStatus::Error,
            other => {
                return Err(RpcError::MalformedResponse(format!(
                    "unrecognized send status '{other}'"
                )))
            },
        };
        Ok(SendTransactionResponse {
            status,
            hash: raw
                .hash
                .parse()
                .map_err(|_| RpcError::MalformedResponse(format!("invalid transaction hash '{}'", raw.hash)))?,
            error_message: raw.error_message,
        })
    }

    async fn get_transaction(&self, hash: &TxHash) -> Result<GetTransactionResponse, Self::Error> {
        let raw: RawGetTransaction = self
            .call("getTransaction", HashParams {
                hash: hash.to_string(),
            })
            .await?;
        Ok(GetTransactionResponse {
            status: TransactionStatus::from_wire(&raw.status),
            result_payload: raw.result_payload.as_deref().map(decode_base64).transpose()?,
            error_payload: raw.error_payload.as_deref().map(decode_base64).transpose()?,
        })
    }
}

fn decode_base64(s: &str) -> Result<Vec<u8>, RpcError> {
    BASE64
        .decode(s)
        .map_err(|e| RpcError::MalformedResponse(format!("invalid base64 payload: {e}")))
}

fn parse_u64(s: &str, field: &str) -> Result<u64, RpcError> {
    s.parse()
        .map_err(|_| RpcError::MalformedResponse(format!("non-numeric {field} '{s}'")))
}

#[derive(Serialize)]
struct JsonRpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct JsonRpcResponse<R> {
    result: Option<R>,
    error: Option<JsonRpcErrorObject>,
}

#[derive(Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Serialize)]
struct AddressParams<'a> {
    address: &'a Address,
}

#[derive(Serialize)]
struct TransactionParams {
    transaction: String,
}

#[derive(Serialize)]
struct HashParams {
    hash: String,
}

#[derive(Deserialize)]
struct RawAccount {
    sequence: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSimulation {
    error: Option<String>,
    return_value: Option<String>,
    transaction_data: Option<String>,
    min_resource_fee: Option<String>,
    restore_preamble: Option<RawRestorePreamble>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRestorePreamble {
    transaction_data: String,
    min_resource_fee: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSendResponse {
    status: String,
    hash: String,
    error_message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGetTransaction {
    status: String,
    result_payload: Option<String>,
    error_payload: Option<String>,
}
