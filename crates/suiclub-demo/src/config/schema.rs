use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use suiclub_core::error::{Result, SuiClubError};
use suiclub_core::protocol::message::MessageType;
use suiclub_core::protocol::shapes::AppMeta;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DemoConfig {
    pub version: u32,

    #[serde(default)]
    pub network: NetworkSection,

    #[serde(default)]
    pub accounts: AccountsSection,

    #[serde(default)]
    pub package: PackageSection,

    #[serde(default)]
    pub club: ClubSection,
}

impl DemoConfig {
    /// Overlay `SUI_RPC_URL`, `FAUCET_URL`, `REQUEST_SUI`, `ADMIN_ADDRESS`
    /// and `USER_ADDRESS` onto the parsed file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SUI_RPC_URL") {
            self.network.rpc_url = v;
        }
        if let Some(v) = lookup("FAUCET_URL") {
            self.network.faucet_url = Some(v);
        }
        if let Some(v) = lookup("REQUEST_SUI") {
            self.network.request_faucet = !v.is_empty();
        }
        if let Some(v) = lookup("ADMIN_ADDRESS") {
            self.accounts.admin = v;
        }
        if let Some(v) = lookup("USER_ADDRESS") {
            self.accounts.user = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SuiClubError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.network.validate()?;
        self.accounts.validate()?;
        self.club.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkSection {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    #[serde(default)]
    pub faucet_url: Option<String>,

    #[serde(default)]
    pub request_faucet: bool,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_sui_bin")]
    pub sui_bin: String,

    #[serde(default = "default_gas_budget")]
    pub gas_budget: u64,
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            faucet_url: None,
            request_faucet: false,
            timeout_ms: default_timeout_ms(),
            sui_bin: default_sui_bin(),
            gas_budget: default_gas_budget(),
        }
    }
}

impl NetworkSection {
    pub fn validate(&self) -> Result<()> {
        if !is_http_url(&self.rpc_url) {
            return Err(SuiClubError::Config(format!(
                "network.rpc_url must be an http(s) url: {}",
                self.rpc_url
            )));
        }
        if let Some(faucet) = &self.faucet_url {
            if !is_http_url(faucet) {
                return Err(SuiClubError::Config(format!(
                    "network.faucet_url must be an http(s) url: {faucet}"
                )));
            }
        }
        if self.request_faucet && self.faucet_url.is_none() {
            return Err(SuiClubError::Config(
                "network.request_faucet requires network.faucet_url".into(),
            ));
        }
        if !(1000..=300000).contains(&self.timeout_ms) {
            return Err(SuiClubError::Config(
                "network.timeout_ms must be between 1000 and 300000".into(),
            ));
        }
        if self.sui_bin.trim().is_empty() {
            return Err(SuiClubError::Config("network.sui_bin must not be empty".into()));
        }
        if self.gas_budget == 0 {
            return Err(SuiClubError::Config("network.gas_budget must be positive".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_rpc_url() -> String {
    "https://fullnode.devnet.sui.io:443".into()
}
fn default_timeout_ms() -> u64 {
    30000
}
fn default_sui_bin() -> String {
    "sui".into()
}
fn default_gas_budget() -> u64 {
    100_000_000
}

fn is_http_url(s: &str) -> bool {
    match url::Url::parse(s) {
        Ok(u) => (u.scheme() == "http" || u.scheme() == "https") && u.host().is_some(),
        Err(_) => false,
    }
}

/// Signing accounts. Keys live in the `sui` CLI keystore; only addresses here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountsSection {
    #[serde(default)]
    pub admin: String,
    #[serde(default)]
    pub user: String,
}

impl AccountsSection {
    pub fn validate(&self) -> Result<()> {
        for (name, addr) in [("admin", &self.admin), ("user", &self.user)] {
            if !is_sui_address(addr) {
                return Err(SuiClubError::Config(format!(
                    "accounts.{name} must be a 0x-prefixed hex address, got {addr:?}"
                )));
            }
        }
        if self.admin == self.user {
            return Err(SuiClubError::Config(
                "accounts.admin and accounts.user must differ".into(),
            ));
        }
        Ok(())
    }
}

/// `0x` followed by 1..=64 hex digits.
pub fn is_sui_address(s: &str) -> bool {
    match s.strip_prefix("0x") {
        Some(hex) => (1..=64).contains(&hex.len()) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSection {
    #[serde(default = "default_package_path")]
    pub path: PathBuf,

    /// Reuse an existing deployment instead of publishing.
    #[serde(default)]
    pub deployed: Option<AppMeta>,
}

impl Default for PackageSection {
    fn default() -> Self {
        Self {
            path: default_package_path(),
            deployed: None,
        }
    }
}

fn default_package_path() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClubSection {
    #[serde(default = "default_message")]
    pub message: String,

    /// `raw` or `xor`, any case.
    #[serde(default = "default_message_type", deserialize_with = "de_message_type")]
    pub message_type: MessageType,

    #[serde(default = "default_post_count")]
    pub post_count: usize,

    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    #[serde(default = "default_latest_window")]
    pub latest_window: u64,
}

impl Default for ClubSection {
    fn default() -> Self {
        Self {
            message: default_message(),
            message_type: default_message_type(),
            post_count: default_post_count(),
            settle_delay_ms: default_settle_delay_ms(),
            latest_window: default_latest_window(),
        }
    }
}

impl ClubSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=64).contains(&self.post_count) {
            return Err(SuiClubError::Config(
                "club.post_count must be between 1 and 64".into(),
            ));
        }
        if self.settle_delay_ms > 60000 {
            return Err(SuiClubError::Config(
                "club.settle_delay_ms must be at most 60000".into(),
            ));
        }
        if self.latest_window == 0 {
            return Err(SuiClubError::Config("club.latest_window must be positive".into()));
        }
        Ok(())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

fn default_message() -> String {
    "suia to da moon".into()
}
fn default_message_type() -> MessageType {
    MessageType::Xor
}
fn de_message_type<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<MessageType, D::Error> {
    let s = String::deserialize(d)?;
    s.parse().map_err(serde::de::Error::custom)
}
fn default_post_count() -> usize {
    10
}
fn default_settle_delay_ms() -> u64 {
    3000
}
fn default_latest_window() -> u64 {
    5
}
