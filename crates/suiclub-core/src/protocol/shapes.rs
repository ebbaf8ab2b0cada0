//! Typed views over chain JSON responses.
//!
//! Objects are addressed with JSON pointers rather than full serde models:
//! the Move structs behind them (`socialcoin::Global`, `club::Global`, the
//! per-subject tables) are owned by the contract and only a handful of
//! fields matter here. RPC envelopes that are stable (coins, balances,
//! dynamic field pages) get plain serde models instead.
//!
//! Move `u64` fields are rendered as decimal strings by the RPC; every
//! numeric accessor accepts both strings and JSON numbers.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Result, SuiClubError};
use crate::protocol::message;

/// Denominator of the contract's fee percentages (1e9 == 100%).
pub const FEE_DENOMINATOR: u128 = 1_000_000_000;

/// Native coin type. Splits for it come straight from the gas coin.
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

fn at<'a>(v: &'a Value, ptr: &str) -> Result<&'a Value> {
    v.pointer(ptr)
        .ok_or_else(|| SuiClubError::UnexpectedShape(format!("missing {ptr}")))
}

fn str_at(v: &Value, ptr: &str) -> Result<String> {
    at(v, ptr)?
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| SuiClubError::UnexpectedShape(format!("{ptr} is not a string")))
}

fn u64_at(v: &Value, ptr: &str) -> Result<u64> {
    value_u64(at(v, ptr)?)
        .ok_or_else(|| SuiClubError::UnexpectedShape(format!("{ptr} is not a u64")))
}

fn bool_at(v: &Value, ptr: &str) -> Result<bool> {
    at(v, ptr)?
        .as_bool()
        .ok_or_else(|| SuiClubError::UnexpectedShape(format!("{ptr} is not a bool")))
}

fn bytes_at(v: &Value, ptr: &str) -> Result<Vec<u8>> {
    let arr = at(v, ptr)?
        .as_array()
        .ok_or_else(|| SuiClubError::UnexpectedShape(format!("{ptr} is not a byte array")))?;
    arr.iter()
        .map(|b| {
            b.as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| SuiClubError::UnexpectedShape(format!("{ptr} holds a non-byte value")))
        })
        .collect()
}

/// Read a u64 rendered either as a JSON number or a decimal string.
pub fn value_u64(v: &Value) -> Option<u64> {
    v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum U64Repr {
    Num(u64),
    Str(String),
}

fn de_u64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u64, D::Error> {
    match U64Repr::deserialize(d)? {
        U64Repr::Num(n) => Ok(n),
        U64Repr::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// Ids of a published socialcoin package and its shared objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppMeta {
    pub package_id: String,
    pub global_id: String,
    #[serde(default)]
    pub admin_cap_id: Option<String>,
    #[serde(default)]
    pub club_global_id: Option<String>,
}

impl AppMeta {
    /// Extract ids from a publish transaction's `objectChanges`.
    pub fn from_publish(response: &Value) -> Result<Self> {
        let changes = at(response, "/objectChanges")?
            .as_array()
            .ok_or_else(|| SuiClubError::UnexpectedShape("objectChanges is not an array".into()))?;

        let package_id = changes
            .iter()
            .find(|c| c["type"] == "published")
            .and_then(|c| c["packageId"].as_str())
            .map(str::to_owned)
            .ok_or_else(|| SuiClubError::UnexpectedShape("no published package in objectChanges".into()))?;

        let global_id = created_with_suffix(changes, "::socialcoin::Global").ok_or_else(|| {
            SuiClubError::UnexpectedShape("no socialcoin::Global created".into())
        })?;

        Ok(Self {
            package_id,
            global_id,
            admin_cap_id: created_with_suffix(changes, "::socialcoin::AdminCap"),
            club_global_id: created_with_suffix(changes, "::club::Global"),
        })
    }

    /// Club global id, which only publishes of the full package create.
    pub fn club_global(&self) -> Result<&str> {
        self.club_global_id
            .as_deref()
            .ok_or_else(|| SuiClubError::UnexpectedShape("app meta has no club global id".into()))
    }
}

fn created_with_suffix(changes: &[Value], suffix: &str) -> Option<String> {
    changes
        .iter()
        .find(|c| {
            c["type"] == "created"
                && c["objectType"].as_str().is_some_and(|t| t.ends_with(suffix))
        })
        .and_then(|c| c["objectId"].as_str())
        .map(str::to_owned)
}

/// Fail unless an executed transaction's effects report success.
pub fn check_execution(response: &Value) -> Result<()> {
    match response.pointer("/effects/status/status").and_then(Value::as_str) {
        Some("success") => Ok(()),
        _ => {
            let err = response
                .pointer("/effects/status/error")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            Err(SuiClubError::TxFailed(err.to_owned()))
        }
    }
}

/// Trade fee percentages stored on the socialcoin Global object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeConfig {
    pub protocol_fee_percent: u64,
    pub subject_fee_percent: u64,
}

impl FeeConfig {
    pub fn from_global(global: &Value) -> Result<Self> {
        Ok(Self {
            protocol_fee_percent: u64_at(
                global,
                "/data/content/fields/config/fields/protocol_fee_percent",
            )?,
            subject_fee_percent: u64_at(
                global,
                "/data/content/fields/config/fields/subject_fee_percent",
            )?,
        })
    }

    /// `price` plus both fees, each rounded down independently.
    pub fn price_after_fee(&self, price: u64) -> Result<u64> {
        let p = u128::from(price);
        let protocol_fee = p * u128::from(self.protocol_fee_percent) / FEE_DENOMINATOR;
        let subject_fee = p * u128::from(self.subject_fee_percent) / FEE_DENOMINATOR;
        u64::try_from(p + protocol_fee + subject_fee)
            .map_err(|_| SuiClubError::InvalidArgument(format!("price after fee overflows u64 (price={price})")))
    }
}

/// Id of the `shares` table inside the socialcoin Global object.
pub fn shares_table_id(global: &Value) -> Result<String> {
    str_at(global, "/data/content/fields/shares/fields/id/id")
}

/// Id of the `clubs` table inside the club Global object.
pub fn clubs_table_id(club_global: &Value) -> Result<String> {
    str_at(club_global, "/data/content/fields/clubs/fields/id/id")
}

/// A subject's share profile (value of the shares table entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub supply: u64,
    pub holding_num: u64,
    pub holding_table_id: String,
    pub holder_num: u64,
    pub holder_table_id: String,
}

impl Profile {
    pub fn from_dynamic_field(obj: &Value) -> Result<Self> {
        let base = at(obj, "/data/content/fields/value/fields")?;
        Ok(Self {
            supply: u64_at(base, "/supply")?,
            holding_num: u64_at(base, "/holding/fields/size")?,
            holding_table_id: str_at(base, "/holding/fields/id/id")?,
            holder_num: u64_at(base, "/holders/fields/size")?,
            holder_table_id: str_at(base, "/holders/fields/id/id")?,
        })
    }
}

/// Message table of one subject's club.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClubInfo {
    pub message_count: u64,
    pub message_table_id: String,
}

impl ClubInfo {
    pub fn from_dynamic_field(obj: &Value) -> Result<Self> {
        let contents = at(obj, "/data/content/fields/value/fields/messages/fields/contents/fields")?;
        Ok(Self {
            message_count: u64_at(contents, "/size")?,
            message_table_id: str_at(contents, "/id/id")?,
        })
    }
}

/// A club message as shown to readers. Deleted messages keep their
/// metadata but carry empty content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClubMsg {
    pub content: String,
    pub sender: String,
    pub timestamp: u64,
    pub deleted: bool,
}

impl ClubMsg {
    pub fn from_dynamic_field(obj: &Value) -> Result<Self> {
        let base = at(obj, "/data/content/fields/value/fields")?;
        let deleted = bool_at(base, "/deleted")?;
        let content = if deleted {
            String::new()
        } else {
            message::decode_slice(&bytes_at(base, "/content")?)?
        };
        Ok(Self {
            content,
            sender: str_at(base, "/sender")?,
            timestamp: u64_at(base, "/timestamp")?,
            deleted,
        })
    }
}

/// Trade event emitted by `buy_shares` / `sell_shares`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub is_buy: bool,
    pub subject: String,
    pub trader: String,
    #[serde(deserialize_with = "de_u64")]
    pub share_amount: u64,
    /// Supply after the trade.
    #[serde(deserialize_with = "de_u64")]
    pub supply: u64,
    #[serde(deserialize_with = "de_u64")]
    pub sui_amount: u64,
    #[serde(deserialize_with = "de_u64")]
    pub protocol_sui_amount: u64,
    #[serde(deserialize_with = "de_u64")]
    pub subject_sui_amount: u64,
}

/// Trade events in a dev-inspect or execution response. Events of other
/// shapes are skipped.
pub fn trade_events(response: &Value) -> Vec<TradeEvent> {
    response
        .get("events")
        .and_then(Value::as_array)
        .map(|events| {
            events
                .iter()
                .filter_map(|e| e.get("parsedJson"))
                .filter_map(|j| TradeEvent::deserialize(j).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// First return value of the first command of a dev-inspect run, as a BCS u64.
pub fn first_return_u64(dev_inspect: &Value) -> Result<u64> {
    if let Some(err) = dev_inspect.get("error").and_then(Value::as_str) {
        return Err(SuiClubError::TxFailed(err.to_owned()));
    }
    let raw = bytes_at(dev_inspect, "/results/0/returnValues/0/0")?;
    bcs::from_bytes::<u64>(&raw)
        .map_err(|e| SuiClubError::UnexpectedShape(format!("return value is not a bcs u64: {e}")))
}

/// One coin object as listed by `suix_getCoins`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    pub coin_type: String,
    pub coin_object_id: String,
    #[serde(deserialize_with = "de_u64")]
    pub balance: u64,
}

/// One page of `suix_getCoins`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinPage {
    pub data: Vec<Coin>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    pub has_next_page: bool,
}

/// `suix_getBalance` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub coin_type: String,
    pub coin_object_count: u64,
    #[serde(deserialize_with = "de_u64")]
    pub total_balance: u64,
}

/// Key of a dynamic field (`{ "type": "address", "value": "0x.." }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DynamicFieldName {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub value: Value,
}

impl DynamicFieldName {
    pub fn address(addr: &str) -> Self {
        Self {
            type_tag: "address".into(),
            value: Value::String(addr.to_owned()),
        }
    }

    pub fn u64(index: u64) -> Self {
        Self {
            type_tag: "u64".into(),
            value: Value::String(index.to_string()),
        }
    }
}

/// Entry of a `suix_getDynamicFields` page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicFieldInfo {
    pub name: Value,
    pub object_id: String,
    #[serde(default)]
    pub object_type: Option<String>,
}

/// One page of `suix_getDynamicFields`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicFieldPage {
    pub data: Vec<DynamicFieldInfo>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    pub has_next_page: bool,
}
