//! Solana JSON-RPC ledger client.
//!
//! Implements only the methods a launch needs, over plain `reqwest`.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::collaborators::LedgerClient;
use crate::config::LaunchpadConfig;
use crate::error::LedgerError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// `{ context, value }` wrapper used by most read methods.
#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestBlockhash {
    blockhash: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignatureStatus {
    err: Option<Value>,
    confirmation_status: Option<String>,
}

/// Ledger client backed by a Solana JSON-RPC endpoint.
pub struct RpcLedgerClient {
    url: String,
    commitment: String,
    poll_interval: Duration,
    confirm_timeout: Duration,
    http: reqwest::Client,
}

impl RpcLedgerClient {
    pub fn new(url: impl Into<String>, commitment: impl Into<String>) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            url: url.into(),
            commitment: commitment.into(),
            poll_interval: Duration::from_millis(500),
            confirm_timeout: Duration::from_secs(60),
            http,
        })
    }

    pub fn from_config(config: &LaunchpadConfig) -> Result<Self, LedgerError> {
        Ok(Self::new(&config.rpc_url, &config.commitment)?
            .with_confirmation(config.confirmation.poll_interval(), config.confirmation.timeout()))
    }

    pub fn with_confirmation(mut self, poll_interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.confirm_timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, LedgerError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        debug!(%method, "RPC call");

        let response: RpcResponse<T> = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| LedgerError::MalformedResponse(format!("{method}: {e}")))?;

        if let Some(error) = response.error {
            return Err(LedgerError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        response
            .result
            .ok_or_else(|| LedgerError::MalformedResponse(format!("{method}: no result")))
    }

    /// Whether `status` has reached this client's commitment level.
    fn reaches_commitment(&self, status: &str) -> bool {
        let rank = |level: &str| match level {
            "processed" => 0,
            "confirmed" => 1,
            "finalized" => 2,
            _ => 3,
        };
        rank(status) >= rank(&self.commitment) && rank(status) < 3
    }

    async fn signature_status(&self, signature: &str) -> Result<Option<SignatureStatus>, LedgerError> {
        let response: WithContext<Vec<Option<SignatureStatus>>> = self
            .call("getSignatureStatuses", json!([[signature]]))
            .await?;
        Ok(response.value.into_iter().next().flatten())
    }

    /// Poll `fetch` until the status reaches commitment, fails, or the
    /// confirmation timeout elapses.
    async fn poll_confirmation<F, Fut>(&self, signature: &str, mut fetch: F) -> Result<(), LedgerError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<SignatureStatus>, LedgerError>>,
    {
        let deadline = tokio::time::Instant::now() + self.confirm_timeout;

        loop {
            if self.is_confirmed(signature, fetch().await?.as_ref())? {
                debug!(%signature, "transaction confirmed");
                return Ok(());
            }

            if tokio::time::Instant::now() >= deadline {
                warn!(%signature, "gave up waiting for confirmation");
                return Err(LedgerError::ConfirmationTimeout(signature.to_string()));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// `Ok(true)` once `status` reaches commitment, `Ok(false)` while pending
    /// or unknown to the node, `Err` if the transaction failed on chain.
    fn is_confirmed(
        &self,
        signature: &str,
        status: Option<&SignatureStatus>,
    ) -> Result<bool, LedgerError> {
        let Some(status) = status else {
            return Ok(false);
        };

        if let Some(err) = &status.err {
            return Err(LedgerError::TransactionFailed {
                signature: signature.to_string(),
                reason: err.to_string(),
            });
        }

        Ok(status
            .confirmation_status
            .as_deref()
            .is_some_and(|s| self.reaches_commitment(s)))
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, LedgerError> {
        self.call("getMinimumBalanceForRentExemption", json!([data_len]))
            .await
    }

    async fn latest_blockhash(&self) -> Result<[u8; 32], LedgerError> {
        let response: WithContext<LatestBlockhash> = self
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": self.commitment }]),
            )
            .await?;

        decode_blockhash(&response.value.blockhash)
    }

    async fn send_transaction(&self, wire: &[u8]) -> Result<String, LedgerError> {
        let encoded = BASE64.encode(wire);
        self.call(
            "sendTransaction",
            json!([
                encoded,
                {
                    "encoding": "base64",
                    "preflightCommitment": self.commitment,
                }
            ]),
        )
        .await
    }

    async fn confirm_transaction(&self, signature: &str) -> Result<(), LedgerError> {
        self.poll_confirmation(signature, || self.signature_status(signature))
            .await
    }
}

fn decode_blockhash(blockhash: &str) -> Result<[u8; 32], LedgerError> {
    let bytes = bs58::decode(blockhash)
        .into_vec()
        .map_err(|e| LedgerError::MalformedResponse(format!("blockhash {blockhash}: {e}")))?;

    bytes.try_into().map_err(|b: Vec<u8>| {
        LedgerError::MalformedResponse(format!("blockhash is {} bytes, expected 32", b.len()))
    })
}
