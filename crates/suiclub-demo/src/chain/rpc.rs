//! JSON-RPC chain reader and HTTP faucet client.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use suiclub_core::error::{Result, SuiClubError};
use suiclub_core::protocol::shapes::{Balance, CoinPage, DynamicFieldName, DynamicFieldPage};

use super::{ChainReader, Faucet};

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// JSON-RPC 2.0 request envelope.
pub fn rpc_request(id: u64, method: &str, params: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params })
}

/// Faucet `/gas` body asking for the fixed drip amount.
pub fn faucet_request(recipient: &str) -> Value {
    json!({ "FixedAmountRequest": { "recipient": recipient } })
}

/// Fullnode JSON-RPC 2.0 client.
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SuiClubError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self {
            http,
            url: url.to_owned(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let result = self.call_value(method, params).await?;
        serde_json::from_value(result)
            .map_err(|e| SuiClubError::UnexpectedShape(format!("{method}: {e}")))
    }

    async fn call_value(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = rpc_request(id, method, params);
        tracing::debug!(method, id, "rpc call");

        let resp: RpcResponse = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| SuiClubError::Rpc(format!("{method}: {e}")))?
            .json()
            .await
            .map_err(|e| SuiClubError::Rpc(format!("{method}: invalid response body: {e}")))?;

        if let Some(err) = resp.error {
            return Err(SuiClubError::Rpc(format!(
                "{method}: {} (code {})",
                err.message, err.code
            )));
        }
        resp.result
            .ok_or_else(|| SuiClubError::Rpc(format!("{method}: response has neither result nor error")))
    }

    /// Object lookups report "not found" inside `result` rather than as an
    /// RPC error; surface that as an error too.
    async fn call_object(&self, method: &str, params: Value) -> Result<Value> {
        let v = self.call_value(method, params).await?;
        if v.get("data").map_or(true, Value::is_null) {
            let reason = v.get("error").cloned().unwrap_or(Value::Null);
            return Err(SuiClubError::Rpc(format!("{method}: object not available: {reason}")));
        }
        Ok(v)
    }
}

#[async_trait]
impl ChainReader for RpcClient {
    async fn get_balance(&self, owner: &str, coin_type: Option<&str>) -> Result<Balance> {
        self.call("suix_getBalance", json!([owner, coin_type])).await
    }

    async fn get_coins(&self, owner: &str, coin_type: &str, cursor: Option<&str>) -> Result<CoinPage> {
        self.call("suix_getCoins", json!([owner, coin_type, cursor, null]))
            .await
    }

    async fn get_object(&self, id: &str) -> Result<Value> {
        self.call_object("sui_getObject", json!([id, { "showContent": true }]))
            .await
    }

    async fn get_dynamic_field_object(&self, parent_id: &str, name: &DynamicFieldName) -> Result<Value> {
        self.call_object("suix_getDynamicFieldObject", json!([parent_id, name]))
            .await
    }

    async fn get_dynamic_fields(
        &self,
        parent_id: &str,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> Result<DynamicFieldPage> {
        self.call("suix_getDynamicFields", json!([parent_id, cursor, limit]))
            .await
    }
}

/// Faucet `/gas` endpoint client.
pub struct HttpFaucet {
    http: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct FaucetResponse {
    #[serde(default)]
    error: Option<String>,
}

impl HttpFaucet {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            url: format!("{}/gas", base_url.trim_end_matches('/')),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Faucet for HttpFaucet {
    async fn request(&self, recipient: &str) -> Result<()> {
        let body = faucet_request(recipient);
        let resp: FaucetResponse = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| SuiClubError::Rpc(format!("faucet: {e}")))?
            .json()
            .await
            .map_err(|e| SuiClubError::Rpc(format!("faucet: invalid response body: {e}")))?;

        if let Some(err) = resp.error {
            return Err(SuiClubError::Rpc(format!("faucet: {err}")));
        }
        tracing::info!(recipient, "faucet request accepted");
        Ok(())
    }
}
