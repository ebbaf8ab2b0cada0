//! Chain access seams.
//!
//! Reads go through [`ChainReader`] (JSON-RPC in production), signing and
//! submission through [`TxExecutor`] (the `sui` CLI in production). Both are
//! object-safe so tests can swap in an in-memory chain.

pub mod cli;
pub mod ptb;
pub mod rpc;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use suiclub_core::error::{Result, SuiClubError};
use suiclub_core::protocol::shapes::{
    check_execution, Balance, CoinPage, DynamicFieldName, DynamicFieldPage,
};

use crate::config::DemoConfig;

pub use cli::SuiCli;
pub use ptb::{Arg, Command, TxPlan};
pub use rpc::{HttpFaucet, RpcClient};

/// Read-only chain queries.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Balance of `coin_type` (native SUI when `None`).
    async fn get_balance(&self, owner: &str, coin_type: Option<&str>) -> Result<Balance>;
    async fn get_coins(&self, owner: &str, coin_type: &str, cursor: Option<&str>) -> Result<CoinPage>;
    /// Object with its Move content.
    async fn get_object(&self, id: &str) -> Result<Value>;
    async fn get_dynamic_field_object(&self, parent_id: &str, name: &DynamicFieldName) -> Result<Value>;
    async fn get_dynamic_fields(
        &self,
        parent_id: &str,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> Result<DynamicFieldPage>;
}

/// Signs and submits transactions on behalf of an address.
#[async_trait]
pub trait TxExecutor: Send + Sync {
    /// Execute `plan` signed by `signer`; returns the raw response.
    async fn execute(&self, plan: &TxPlan, signer: &str) -> Result<Value>;
    /// Run `plan` without committing. `None` uses whatever sender is active.
    async fn dev_inspect(&self, plan: &TxPlan, sender: Option<&str>) -> Result<Value>;
    /// Build and publish the Move package at `path`.
    async fn publish(&self, path: &Path, signer: &str) -> Result<Value>;
}

/// Funds addresses on dev/test networks.
#[async_trait]
pub trait Faucet: Send + Sync {
    async fn request(&self, recipient: &str) -> Result<()>;
}

/// Reader + executor (+ optional faucet) handle shared by all flows.
#[derive(Clone)]
pub struct Chain {
    reader: Arc<dyn ChainReader>,
    executor: Arc<dyn TxExecutor>,
    faucet: Option<Arc<dyn Faucet>>,
}

impl Chain {
    pub fn new(reader: Arc<dyn ChainReader>, executor: Arc<dyn TxExecutor>) -> Self {
        Self {
            reader,
            executor,
            faucet: None,
        }
    }

    pub fn with_faucet(mut self, faucet: Arc<dyn Faucet>) -> Self {
        self.faucet = Some(faucet);
        self
    }

    /// Production wiring: JSON-RPC reader, CLI executor, HTTP faucet.
    pub fn from_config(cfg: &DemoConfig) -> Result<Self> {
        let net = &cfg.network;
        let rpc = RpcClient::new(&net.rpc_url, net.timeout())?;
        let faucet = net
            .faucet_url
            .as_deref()
            .map(|url| HttpFaucet::new(rpc.http().clone(), url));

        let chain = Chain::new(
            Arc::new(rpc),
            Arc::new(SuiCli::new(net.sui_bin.clone(), net.gas_budget)),
        );
        Ok(match faucet {
            Some(f) => chain.with_faucet(Arc::new(f)),
            None => chain,
        })
    }

    pub fn reader(&self) -> &dyn ChainReader {
        self.reader.as_ref()
    }

    pub fn faucet(&self) -> Result<&dyn Faucet> {
        self.faucet
            .as_deref()
            .ok_or_else(|| SuiClubError::Config("no faucet configured".into()))
    }

    /// Execute and fail unless the effects report success.
    pub async fn send_tx(&self, plan: &TxPlan, signer: &str) -> Result<Value> {
        let res = self.executor.execute(plan, signer).await?;
        if let Err(e) = check_execution(&res) {
            tracing::error!(signer, response = %res, "transaction failed");
            return Err(e);
        }
        tracing::debug!(signer, digest = ?res.get("digest"), "transaction executed");
        Ok(res)
    }

    pub async fn dev_inspect(&self, plan: &TxPlan, sender: Option<&str>) -> Result<Value> {
        self.executor.dev_inspect(plan, sender).await
    }

    pub async fn publish(&self, path: &Path, signer: &str) -> Result<Value> {
        let res = self.executor.publish(path, signer).await?;
        check_execution(&res)?;
        Ok(res)
    }
}
