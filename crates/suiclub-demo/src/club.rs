//! Subject clubs: message boards gated by share ownership.

use dashmap::DashMap;
use futures_util::future::try_join_all;
use serde_json::Value;
use tokio::sync::OnceCell;

use suiclub_core::error::{Result, SuiClubError};
use suiclub_core::protocol::shapes::{clubs_table_id, AppMeta, ClubInfo, ClubMsg, DynamicFieldName};

use crate::chain::{Arg, Chain, TxPlan};

/// Shared `0x2::clock::Clock` object.
pub const CLOCK_ID: &str = "0x6";

pub struct Club {
    meta: AppMeta,
    club_global_id: String,
    chain: Chain,
    clubs_table: OnceCell<String>,
    /// subject -> message table id; a club's table never moves once created.
    message_tables: DashMap<String, String>,
}

impl Club {
    pub fn new(meta: AppMeta, chain: Chain) -> Result<Self> {
        let club_global_id = meta.club_global()?.to_owned();
        Ok(Self {
            meta,
            club_global_id,
            chain,
            clubs_table: OnceCell::new(),
            message_tables: DashMap::new(),
        })
    }

    fn target(&self, function: &str) -> String {
        format!("{}::club::{function}", self.meta.package_id)
    }

    /// Post `encoded` to `subject`'s club `count` times in one transaction.
    pub async fn post_messages(
        &self,
        signer: &str,
        subject: &str,
        encoded: &[u8],
        count: usize,
    ) -> Result<Value> {
        if count == 0 {
            return Err(SuiClubError::InvalidArgument("count must be greater than 0".into()));
        }
        let mut plan = TxPlan::new();
        for _ in 0..count {
            plan.move_call(
                self.target("new_message"),
                vec![
                    Arg::Object(CLOCK_ID.into()),
                    Arg::Object(self.meta.global_id.clone()),
                    Arg::Object(self.club_global_id.clone()),
                    Arg::Address(subject.to_owned()),
                    Arg::Bytes(encoded.to_vec()),
                ],
            );
        }
        tracing::info!(signer, subject, count, bytes = encoded.len(), "posting club messages");
        self.chain.send_tx(&plan, signer).await
    }

    pub async fn delete_message(&self, signer: &str, subject: &str, index: u64) -> Result<Value> {
        let mut plan = TxPlan::new();
        plan.move_call(
            self.target("delete_message"),
            vec![
                Arg::Object(self.club_global_id.clone()),
                Arg::Address(subject.to_owned()),
                Arg::U64(index),
            ],
        );
        tracing::info!(signer, subject, index, "deleting club message");
        self.chain.send_tx(&plan, signer).await
    }

    pub async fn clubs_table_id(&self) -> Result<String> {
        self.clubs_table
            .get_or_try_init(|| async {
                let obj = self.chain.reader().get_object(&self.club_global_id).await?;
                clubs_table_id(&obj)
            })
            .await
            .cloned()
    }

    /// Current message count and table of `subject`'s club.
    pub async fn club_info(&self, subject: &str) -> Result<ClubInfo> {
        let table = self.clubs_table_id().await?;
        let obj = self
            .chain
            .reader()
            .get_dynamic_field_object(&table, &DynamicFieldName::address(subject))
            .await?;
        let info = ClubInfo::from_dynamic_field(&obj)?;
        self.message_tables
            .insert(subject.to_owned(), info.message_table_id.clone());
        Ok(info)
    }

    /// Message table id from an earlier [`Club::club_info`] call.
    pub fn cached_message_table(&self, subject: &str) -> Option<String> {
        self.message_tables.get(subject).map(|e| e.value().clone())
    }

    /// `subject`'s message table id, read from the chain only on a cache miss.
    pub async fn message_table(&self, subject: &str) -> Result<String> {
        if let Some(id) = self.cached_message_table(subject) {
            return Ok(id);
        }
        Ok(self.club_info(subject).await?.message_table_id)
    }

    pub async fn get_msg(&self, message_table_id: &str, index: u64) -> Result<ClubMsg> {
        let obj = self
            .chain
            .reader()
            .get_dynamic_field_object(message_table_id, &DynamicFieldName::u64(index))
            .await?;
        ClubMsg::from_dynamic_field(&obj)
    }

    /// Messages `offset..offset + limit`, fetched concurrently, in index order.
    pub async fn get_msgs(&self, message_table_id: &str, offset: u64, limit: u64) -> Result<Vec<ClubMsg>> {
        let end = offset.saturating_add(limit);
        try_join_all((offset..end).map(|i| self.get_msg(message_table_id, i))).await
    }
}
