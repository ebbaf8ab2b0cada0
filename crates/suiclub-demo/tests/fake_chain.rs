//! In-memory chain shared by flow tests.
//!
//! Serves the Global/club objects and dynamic fields the clients read,
//! records every plan it is asked to run, and applies club side effects
//! (`new_message`, `delete_message`) so reads after writes observe them.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use suiclub_core::error::{Result, SuiClubError};
use suiclub_core::protocol::shapes::{
    Balance, Coin, CoinPage, DynamicFieldInfo, DynamicFieldName, DynamicFieldPage, SUI_COIN_TYPE,
};
use suiclub_demo::chain::{Arg, Chain, ChainReader, Command, TxExecutor, TxPlan};

pub const PACKAGE: &str = "0xpkg";
pub const GLOBAL: &str = "0xglobal";
pub const CLUB_GLOBAL: &str = "0xclubglobal";
pub const SHARES_TABLE: &str = "0xshares";
pub const CLUBS_TABLE: &str = "0xclubs";
pub const MSG_TABLE: &str = "0xmsgs";
pub const ADMIN: &str = "0xa11ce";
pub const USER: &str = "0xb0b";

/// Price every dev-inspected view function returns.
pub const PRICE: u64 = 400_000_000;

#[derive(Default)]
pub struct FakeChain {
    pub coins: Vec<Coin>,
    pub page_size: usize,
    /// Move call target suffix that makes execution fail.
    pub fail_target: Option<String>,
    pub executed: Mutex<Vec<(String, TxPlan)>>,
    pub inspected: Mutex<Vec<(Option<String>, TxPlan)>>,
    pub published: Mutex<Vec<String>>,
    pub coin_requests: Mutex<Vec<Option<String>>>,
    /// (content bytes, deleted, sender)
    pub messages: Mutex<Vec<(Vec<u8>, bool, String)>>,
    pub object_reads: Mutex<Vec<String>>,
    /// Parent ids of every dynamic field object read.
    pub field_reads: Mutex<Vec<String>>,
}

impl FakeChain {
    pub fn new() -> Self {
        Self {
            page_size: 2,
            ..Self::default()
        }
    }

    pub fn with_coins(mut self, balances: &[u64]) -> Self {
        self.coins = balances
            .iter()
            .enumerate()
            .map(|(i, b)| Coin {
                coin_type: "0xcafe::token::TOKEN".into(),
                coin_object_id: format!("0xcoin{i}"),
                balance: *b,
            })
            .collect();
        self
    }

    pub fn into_chain(self) -> (Arc<FakeChain>, Chain) {
        let fake = Arc::new(self);
        let chain = Chain::new(fake.clone(), fake.clone());
        (fake, chain)
    }

    pub fn executed_targets(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .flat_map(|(_, plan)| plan.targets().into_iter().map(str::to_owned).collect::<Vec<_>>())
            .collect()
    }

    pub fn field_reads_of(&self, parent_id: &str) -> usize {
        self.field_reads
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_str() == parent_id)
            .count()
    }

    fn global_object() -> Value {
        json!({ "data": { "objectId": GLOBAL, "content": { "fields": {
            "config": { "fields": { "protocol_fee_percent": "30000000", "subject_fee_percent": "20000000" } },
            "shares": { "fields": { "id": { "id": SHARES_TABLE }, "size": "2" } }
        } } } })
    }

    fn club_global_object() -> Value {
        json!({ "data": { "objectId": CLUB_GLOBAL, "content": { "fields": {
            "clubs": { "fields": { "id": { "id": CLUBS_TABLE }, "size": "1" } }
        } } } })
    }

    fn apply_club_effects(&self, signer: &str, plan: &TxPlan) {
        let mut messages = self.messages.lock().unwrap();
        for cmd in plan.commands() {
            let Command::MoveCall { target, args } = cmd else { continue };
            if target.ends_with("::club::new_message") {
                if let Some(Arg::Bytes(content)) = args.last() {
                    messages.push((content.clone(), false, signer.to_owned()));
                }
            } else if target.ends_with("::club::delete_message") {
                if let Some(Arg::U64(index)) = args.last() {
                    if let Some(m) = messages.get_mut(*index as usize) {
                        m.0.clear();
                        m.1 = true;
                    }
                }
            }
        }
    }
}

fn not_found(what: &str) -> SuiClubError {
    SuiClubError::Rpc(format!("object not available: {what}"))
}

#[async_trait]
impl ChainReader for FakeChain {
    async fn get_balance(&self, _owner: &str, coin_type: Option<&str>) -> Result<Balance> {
        Ok(Balance {
            coin_type: coin_type.unwrap_or(SUI_COIN_TYPE).to_owned(),
            coin_object_count: 1,
            total_balance: 10_000_000_000,
        })
    }

    async fn get_coins(&self, _owner: &str, coin_type: &str, cursor: Option<&str>) -> Result<CoinPage> {
        self.coin_requests.lock().unwrap().push(cursor.map(str::to_owned));
        let start: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        let end = (start + self.page_size).min(self.coins.len());
        let data = self.coins[start..end]
            .iter()
            .filter(|c| c.coin_type == coin_type)
            .cloned()
            .collect();
        let has_next_page = end < self.coins.len();
        Ok(CoinPage {
            data,
            next_cursor: has_next_page.then(|| end.to_string()),
            has_next_page,
        })
    }

    async fn get_object(&self, id: &str) -> Result<Value> {
        self.object_reads.lock().unwrap().push(id.to_owned());
        match id {
            GLOBAL => Ok(Self::global_object()),
            CLUB_GLOBAL => Ok(Self::club_global_object()),
            other => Err(not_found(other)),
        }
    }

    async fn get_dynamic_field_object(&self, parent_id: &str, name: &DynamicFieldName) -> Result<Value> {
        self.field_reads.lock().unwrap().push(parent_id.to_owned());
        match parent_id {
            SHARES_TABLE => Ok(json!({ "data": { "content": { "fields": { "value": { "fields": {
                "supply": "2",
                "holding": { "fields": { "id": { "id": "0xholding" }, "size": "1" } },
                "holders": { "fields": { "id": { "id": "0xholders" }, "size": "2" } }
            } } } } } })),
            CLUBS_TABLE => {
                let size = self.messages.lock().unwrap().len();
                Ok(json!({ "data": { "content": { "fields": { "name": name.value, "value": { "fields": {
                    "messages": { "fields": { "contents": { "fields": { "id": { "id": MSG_TABLE }, "size": size.to_string() } } } }
                } } } } } }))
            }
            MSG_TABLE => {
                let index: usize = name.value.as_str().unwrap().parse().unwrap();
                let messages = self.messages.lock().unwrap();
                let (content, deleted, sender) =
                    messages.get(index).ok_or_else(|| not_found("dynamicFieldNotFound"))?;
                Ok(json!({ "data": { "content": { "fields": { "name": index.to_string(), "value": { "fields": {
                    "content": content,
                    "sender": sender,
                    "timestamp": (1_700_000_000_000u64 + index as u64).to_string(),
                    "deleted": deleted
                } } } } } }))
            }
            other => Err(not_found(other)),
        }
    }

    async fn get_dynamic_fields(
        &self,
        parent_id: &str,
        _cursor: Option<&str>,
        _limit: Option<u32>,
    ) -> Result<DynamicFieldPage> {
        Ok(DynamicFieldPage {
            data: vec![DynamicFieldInfo {
                name: json!({ "type": "address", "value": ADMIN }),
                object_id: format!("{parent_id}-entry"),
                object_type: None,
            }],
            next_cursor: None,
            has_next_page: false,
        })
    }
}

#[async_trait]
impl TxExecutor for FakeChain {
    async fn execute(&self, plan: &TxPlan, signer: &str) -> Result<Value> {
        self.executed
            .lock()
            .unwrap()
            .push((signer.to_owned(), plan.clone()));

        let failing = self
            .fail_target
            .as_deref()
            .is_some_and(|f| plan.targets().iter().any(|t| t.ends_with(f)));
        if failing {
            return Ok(json!({ "effects": { "status": { "status": "failure", "error": "MoveAbort(3)" } } }));
        }

        self.apply_club_effects(signer, plan);
        Ok(json!({ "digest": "fake", "effects": { "status": { "status": "success" } } }))
    }

    async fn dev_inspect(&self, plan: &TxPlan, sender: Option<&str>) -> Result<Value> {
        self.inspected
            .lock()
            .unwrap()
            .push((sender.map(str::to_owned), plan.clone()));

        let buys = plan.targets().iter().any(|t| t.ends_with("::buy_shares"));
        let events = if buys {
            json!([{ "type": format!("{PACKAGE}::socialcoin::Trade"), "parsedJson": {
                "is_buy": true, "subject": ADMIN, "trader": sender.unwrap_or_default(),
                "share_amount": "1", "supply": "3", "sui_amount": PRICE.to_string(),
                "protocol_sui_amount": "12000000", "subject_sui_amount": "8000000"
            } }])
        } else {
            json!([])
        };
        Ok(json!({
            "effects": { "status": { "status": "success" } },
            "events": events,
            "results": [ { "returnValues": [ [ PRICE.to_le_bytes().to_vec(), "u64" ] ] } ]
        }))
    }

    async fn publish(&self, path: &Path, signer: &str) -> Result<Value> {
        self.published
            .lock()
            .unwrap()
            .push(format!("{}@{signer}", path.display()));
        Ok(json!({
            "effects": { "status": { "status": "success" } },
            "objectChanges": [
                { "type": "published", "packageId": PACKAGE },
                { "type": "created", "objectType": "0x2::package::UpgradeCap", "objectId": "0xcap" },
                { "type": "created", "objectType": format!("{PACKAGE}::socialcoin::Global"), "objectId": GLOBAL },
                { "type": "created", "objectType": format!("{PACKAGE}::socialcoin::AdminCap"), "objectId": "0xadmincap" },
                { "type": "created", "objectType": format!("{PACKAGE}::club::Global"), "objectId": CLUB_GLOBAL }
            ]
        }))
    }
}
