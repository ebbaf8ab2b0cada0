//! Social coin (bonding-curve shares) client.
//!
//! Pricing lives on chain; read-only prices come from dev-inspecting the
//! contract's view functions, so nothing here duplicates the curve.

use serde_json::Value;
use tokio::sync::OnceCell;

use suiclub_core::error::{Result, SuiClubError};
use suiclub_core::protocol::shapes::{
    first_return_u64, shares_table_id, trade_events, AppMeta, DynamicFieldName, DynamicFieldPage,
    FeeConfig, Profile, SUI_COIN_TYPE,
};

use crate::chain::{Arg, Chain, TxPlan};
use crate::coins::prepare_amount;

pub struct SocialCoin {
    meta: AppMeta,
    chain: Chain,
    /// Never changes once the Global object exists.
    shares_table: OnceCell<String>,
}

impl SocialCoin {
    pub fn new(meta: AppMeta, chain: Chain) -> Self {
        Self {
            meta,
            chain,
            shares_table: OnceCell::new(),
        }
    }

    fn target(&self, function: &str) -> String {
        format!("{}::socialcoin::{function}", self.meta.package_id)
    }

    fn global(&self) -> Arg {
        Arg::Object(self.meta.global_id.clone())
    }

    /// Cost for `trader` to buy `amount` shares of `subject`, fees included.
    pub async fn buy_price_after_fee(&self, subject: &str, amount: u64, trader: &str) -> Result<u64> {
        let mut plan = TxPlan::new();
        plan.move_call(
            self.target("get_buy_price_after_fee"),
            vec![self.global(), Arg::Address(subject.to_owned()), Arg::U64(amount)],
        );
        let res = self.chain.dev_inspect(&plan, Some(trader)).await?;
        first_return_u64(&res)
    }

    /// Cost for a subject to issue `issue_amount` of their own shares. The
    /// first share is free, so only `issue_amount - 1` are priced.
    pub async fn issue_price_after_fee(&self, issue_amount: u64) -> Result<u64> {
        match issue_amount {
            0 => Err(SuiClubError::InvalidArgument(
                "issue amount must be greater than 0".into(),
            )),
            1 => Ok(0),
            n => {
                let mut plan = TxPlan::new();
                plan.move_call(self.target("get_price"), vec![Arg::U64(1), Arg::U64(n - 1)]);
                let res = self.chain.dev_inspect(&plan, None).await?;
                let price = first_return_u64(&res)?;

                let fees = FeeConfig::from_global(&self.global_object().await?)?;
                tracing::debug!(price, ?fees, "issue price");
                fees.price_after_fee(price)
            }
        }
    }

    pub async fn global_object(&self) -> Result<Value> {
        self.chain.reader().get_object(&self.meta.global_id).await
    }

    pub async fn shares_table_id(&self) -> Result<String> {
        self.shares_table
            .get_or_try_init(|| async { shares_table_id(&self.global_object().await?) })
            .await
            .cloned()
    }

    pub async fn profile(&self, subject: &str) -> Result<Profile> {
        let table = self.shares_table_id().await?;
        let obj = self
            .chain
            .reader()
            .get_dynamic_field_object(&table, &DynamicFieldName::address(subject))
            .await?;
        Profile::from_dynamic_field(&obj)
    }

    /// Addresses holding `subject`'s shares.
    pub async fn holders(
        &self,
        subject: &str,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> Result<DynamicFieldPage> {
        let profile = self.profile(subject).await?;
        self.chain
            .reader()
            .get_dynamic_fields(&profile.holder_table_id, cursor, limit)
            .await
    }

    /// Subjects whose shares `subject` holds.
    pub async fn holding(
        &self,
        subject: &str,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> Result<DynamicFieldPage> {
        let profile = self.profile(subject).await?;
        self.chain
            .reader()
            .get_dynamic_fields(&profile.holding_table_id, cursor, limit)
            .await
    }

    /// Issue the signer's own shares and buy `buy_amount` of them.
    pub async fn issue(&self, signer: &str, buy_amount: u64) -> Result<Value> {
        if buy_amount == 0 {
            return Err(SuiClubError::InvalidArgument(
                "buy amount must be greater than 0".into(),
            ));
        }
        let coin_amount = self.issue_price_after_fee(buy_amount).await?;
        let balance = self.chain.reader().get_balance(signer, None).await?;
        tracing::info!(signer, buy_amount, coin_amount, balance = balance.total_balance, "issuing shares");

        let subject = Arg::Address(signer.to_owned());
        let mut plan = TxPlan::new();
        if buy_amount == 1 {
            let zero = plan.split_coin(Arg::Gas, 0);
            plan.move_call(
                self.target("buy_shares"),
                vec![self.global(), subject, Arg::U64(1), zero],
            );
        } else {
            let mut coins = plan.split_coins(Arg::Gas, &[0, coin_amount]).into_iter();
            let (zero, issue_coin) = match (coins.next(), coins.next()) {
                (Some(z), Some(i)) => (z, i),
                _ => return Err(SuiClubError::Internal("split_coins returned too few handles".into())),
            };
            plan.move_call(
                self.target("buy_shares"),
                vec![self.global(), subject.clone(), Arg::U64(1), zero],
            );
            plan.move_call(
                self.target("buy_shares"),
                vec![self.global(), subject, Arg::U64(buy_amount - 1), issue_coin],
            );
        }
        self.chain.send_tx(&plan, signer).await
    }

    pub async fn buy_shares(&self, signer: &str, subject: &str, amount: u64) -> Result<Value> {
        let coin_amount = self.buy_price_after_fee(subject, amount, signer).await?;
        let balance = self.chain.reader().get_balance(signer, None).await?;
        tracing::info!(signer, subject, amount, coin_amount, balance = balance.total_balance, "buying shares");

        let (mut plan, coin) =
            prepare_amount(self.chain.reader(), SUI_COIN_TYPE, coin_amount, signer).await?;
        plan.move_call(
            self.target("buy_shares"),
            vec![self.global(), Arg::Address(subject.to_owned()), Arg::U64(amount), coin],
        );

        let preview = self.chain.dev_inspect(&plan, Some(signer)).await?;
        let events = trade_events(&preview);
        if events.is_empty() {
            tracing::warn!(signer, subject, "buy preview emitted no trade event");
        }
        for e in &events {
            tracing::info!(
                supply_after = e.supply,
                sui_amount = e.sui_amount,
                protocol_fee = e.protocol_sui_amount,
                subject_fee = e.subject_sui_amount,
                "buy preview"
            );
        }

        self.chain.send_tx(&plan, signer).await
    }

    pub async fn sell_shares(&self, signer: &str, subject: &str, amount: u64) -> Result<Value> {
        let mut plan = TxPlan::new();
        plan.move_call(
            self.target("sell_shares"),
            vec![self.global(), Arg::Address(subject.to_owned()), Arg::U64(amount)],
        );
        tracing::info!(signer, subject, amount, "selling shares");
        self.chain.send_tx(&plan, signer).await
    }
}
