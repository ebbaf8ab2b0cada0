//! `sui` CLI transaction executor.
//!
//! The CLI owns the keystore: signing happens there, and the signer is
//! selected by switching the CLI's active address. Switching is global CLI
//! state, so every switch + command pair runs under one async mutex.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::process::Command as Process;
use tokio::sync::Mutex;

use suiclub_core::error::{Result, SuiClubError};

use super::ptb::TxPlan;
use super::TxExecutor;

/// Output of `sui move build --dump-bytecode-as-base64`.
#[derive(Debug, Clone, Deserialize)]
pub struct CompiledPackage {
    /// Base64 module bytecode.
    pub modules: Vec<String>,
    /// Dependency package ids.
    pub dependencies: Vec<String>,
}

pub struct SuiCli {
    bin: String,
    gas_budget: u64,
    /// Last address we switched to (None until the first switch).
    active: Mutex<Option<String>>,
}

impl SuiCli {
    pub fn new(bin: impl Into<String>, gas_budget: u64) -> Self {
        Self {
            bin: bin.into(),
            gas_budget,
            active: Mutex::new(None),
        }
    }

    async fn run(&self, args: &[String]) -> Result<String> {
        tracing::debug!(bin = %self.bin, ?args, "spawning sui cli");
        let out = Process::new(&self.bin)
            .args(args)
            .output()
            .await
            .map_err(|e| SuiClubError::Internal(format!("spawn {} failed: {e}", self.bin)))?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(SuiClubError::Internal(format!(
                "{} {} exited with {}: {}",
                self.bin,
                args.iter().take(2).cloned().collect::<Vec<_>>().join(" "),
                out.status,
                stderr.trim()
            )));
        }

        String::from_utf8(out.stdout)
            .map_err(|e| SuiClubError::Internal(format!("sui cli output is not utf-8: {e}")))
    }

    async fn run_json(&self, args: &[String]) -> Result<Value> {
        let stdout = self.run(args).await?;
        serde_json::from_str(&stdout).map_err(|e| {
            SuiClubError::UnexpectedShape(format!("sui cli did not print json: {e}"))
        })
    }

    async fn switch_to(&self, active: &mut Option<String>, addr: &str) -> Result<()> {
        if active.as_deref() == Some(addr) {
            return Ok(());
        }
        self.run(&[
            "client".into(),
            "switch".into(),
            "--address".into(),
            addr.to_owned(),
        ])
        .await?;
        tracing::debug!(addr, "switched active address");
        *active = Some(addr.to_owned());
        Ok(())
    }

    fn ptb_args(&self, plan: &TxPlan) -> Vec<String> {
        let mut args = vec!["client".to_owned(), "ptb".to_owned()];
        args.extend(plan.to_ptb_args());
        args.push("--gas-budget".into());
        args.push(self.gas_budget.to_string());
        args.push("--json".into());
        args
    }

    /// Compile the package to base64 bytecode without publishing.
    pub async fn build_package(&self, path: &Path) -> Result<CompiledPackage> {
        let v = self
            .run_json(&[
                "move".into(),
                "build".into(),
                "--dump-bytecode-as-base64".into(),
                "--path".into(),
                path.display().to_string(),
            ])
            .await?;
        serde_json::from_value(v)
            .map_err(|e| SuiClubError::UnexpectedShape(format!("move build output: {e}")))
    }
}

#[async_trait]
impl TxExecutor for SuiCli {
    async fn execute(&self, plan: &TxPlan, signer: &str) -> Result<Value> {
        if plan.is_empty() {
            return Err(SuiClubError::InvalidArgument("empty transaction plan".into()));
        }
        let mut active = self.active.lock().await;
        self.switch_to(&mut active, signer).await?;
        tracing::info!(signer, targets = ?plan.targets(), "executing transaction");
        self.run_json(&self.ptb_args(plan)).await
    }

    async fn dev_inspect(&self, plan: &TxPlan, sender: Option<&str>) -> Result<Value> {
        let mut active = self.active.lock().await;
        if let Some(sender) = sender {
            self.switch_to(&mut active, sender).await?;
        }
        let mut args = self.ptb_args(plan);
        args.push("--dev-inspect".into());
        self.run_json(&args).await
    }

    /// Builds first so compile errors surface before the signer is switched
    /// and gas is spent; `client publish` compiles again from `path`.
    async fn publish(&self, path: &Path, signer: &str) -> Result<Value> {
        let compiled = self.build_package(path).await?;
        tracing::info!(
            path = %path.display(),
            modules = compiled.modules.len(),
            dependencies = compiled.dependencies.len(),
            "package built"
        );

        let mut active = self.active.lock().await;
        self.switch_to(&mut active, signer).await?;
        self.run_json(&[
            "client".into(),
            "publish".into(),
            path.display().to_string(),
            "--gas-budget".into(),
            self.gas_budget.to_string(),
            "--json".into(),
        ])
        .await
    }
}
