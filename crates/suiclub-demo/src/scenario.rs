//! The scripted end-to-end run: fund, publish, trade, query, chat.

use serde::Serialize;

use suiclub_core::error::Result;
use suiclub_core::protocol::message;
use suiclub_core::protocol::shapes::{AppMeta, ClubMsg, Profile};

use crate::chain::Chain;
use crate::club::Club;
use crate::config::DemoConfig;
use crate::socialcoin::SocialCoin;

/// What the club round observed.
#[derive(Debug, Clone, Serialize)]
pub struct ClubReport {
    pub message_count: u64,
    pub message_table_id: String,
    pub first: ClubMsg,
    pub latest: Vec<ClubMsg>,
    pub first_after_delete: ClubMsg,
}

/// What the whole run observed.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub meta: AppMeta,
    pub admin_profile: Profile,
    pub admin_buy_price: u64,
    pub club: ClubReport,
}

fn pretty<T: Serialize>(v: &T) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|e| format!("<unprintable: {e}>"))
}

pub async fn run(cfg: &DemoConfig, chain: &Chain) -> Result<ScenarioReport> {
    let admin = cfg.accounts.admin.as_str();
    let user = cfg.accounts.user.as_str();
    tracing::info!(admin, user, "scenario start");

    if cfg.network.request_faucet {
        let faucet = chain.faucet()?;
        faucet.request(admin).await?;
        faucet.request(user).await?;
    }

    let balance = chain.reader().get_balance(admin, None).await?;
    tracing::info!(admin, total = balance.total_balance, coins = balance.coin_object_count, "admin balance");

    let meta = deploy(cfg, chain).await?;
    tracing::info!(meta = %pretty(&meta), "app meta");

    let coin = SocialCoin::new(meta.clone(), chain.clone());
    trade(&coin, admin, user).await?;
    let (admin_profile, admin_buy_price) = queries(&coin, admin).await?;

    let club = Club::new(meta.clone(), chain.clone())?;
    let club_report = club_round(cfg, &club, admin, user).await?;

    tracing::info!("scenario end");
    Ok(ScenarioReport {
        meta,
        admin_profile,
        admin_buy_price,
        club: club_report,
    })
}

/// Publish the package, or reuse `package.deployed`.
pub async fn deploy(cfg: &DemoConfig, chain: &Chain) -> Result<AppMeta> {
    if let Some(meta) = &cfg.package.deployed {
        tracing::info!(package = %meta.package_id, "reusing deployed package");
        return Ok(meta.clone());
    }
    let res = chain.publish(&cfg.package.path, &cfg.accounts.admin).await?;
    tracing::debug!(response = %pretty(&res), "publish response");
    AppMeta::from_publish(&res)
}

/// Each side issues, the user buys the admin's shares twice and sells one back.
pub async fn trade(coin: &SocialCoin, admin: &str, user: &str) -> Result<()> {
    coin.issue(admin, 1).await?;
    coin.issue(user, 3).await?;
    coin.buy_shares(admin, admin, 1).await?;
    coin.buy_shares(user, admin, 1).await?;
    coin.buy_shares(user, admin, 1).await?;
    coin.sell_shares(user, admin, 1).await?;
    Ok(())
}

pub async fn queries(coin: &SocialCoin, admin: &str) -> Result<(Profile, u64)> {
    let profile = coin.profile(admin).await?;
    tracing::info!(profile = %pretty(&profile), "admin profile");

    let holders = coin.holders(admin, None, None).await?;
    tracing::info!(holders = %pretty(&holders), "admin holders");

    let holding = coin.holding(admin, None, None).await?;
    tracing::info!(holding = %pretty(&holding), "admin holding");

    let price = coin.buy_price_after_fee(admin, 1, admin).await?;
    tracing::info!(price, "admin buy price");
    Ok((profile, price))
}

/// The user posts to the admin's club, reads back, deletes the first message.
pub async fn club_round(cfg: &DemoConfig, club: &Club, admin: &str, user: &str) -> Result<ClubReport> {
    let settings = &cfg.club;
    let encoded = message::encode(&settings.message, settings.message_type);
    tracing::info!(raw = %settings.message, encoded = ?&encoded[..], "encoded club message");

    club.post_messages(user, admin, &encoded, settings.post_count)
        .await?;

    // give the fullnode time to index the new dynamic fields
    tokio::time::sleep(settings.settle_delay()).await;

    let info = club.club_info(admin).await?;
    tracing::info!(count = info.message_count, table = %info.message_table_id, "admin club");

    let first = club.get_msg(&info.message_table_id, 0).await?;
    tracing::info!(first = %pretty(&first), "first message");

    let window = settings.latest_window.min(info.message_count);
    let offset = info.message_count - window;
    let latest = club.get_msgs(&info.message_table_id, offset, window).await?;
    tracing::info!(latest = %pretty(&latest), offset, "latest messages");

    club.delete_message(user, admin, 0).await?;
    let table = club.message_table(admin).await?;
    let first_after_delete = club.get_msg(&table, 0).await?;
    tracing::info!(first = %pretty(&first_after_delete), "first message after delete");

    Ok(ClubReport {
        message_count: info.message_count,
        message_table_id: info.message_table_id,
        first,
        latest,
        first_after_delete,
    })
}
