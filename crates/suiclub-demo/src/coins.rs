//! Coin selection and payment preparation.

use suiclub_core::error::{Result, SuiClubError};
use suiclub_core::protocol::shapes::SUI_COIN_TYPE;

use crate::chain::{Arg, ChainReader, TxPlan};

/// Coins picked to cover an amount, in listing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinSelection {
    pub success: bool,
    pub coins: Vec<String>,
    pub total: u64,
}

/// Walk the owner's coins page by page until their balances cover `amount`.
/// `success == false` means every coin was listed and the total still fell short.
pub async fn coins_by_amount(
    reader: &dyn ChainReader,
    owner: &str,
    coin_type: &str,
    amount: u64,
) -> Result<CoinSelection> {
    if amount == 0 {
        return Err(SuiClubError::InvalidArgument(
            "amount must be greater than 0".into(),
        ));
    }

    let mut coins = Vec::new();
    let mut total: u64 = 0;
    let mut cursor: Option<String> = None;

    loop {
        let page = reader.get_coins(owner, coin_type, cursor.as_deref()).await?;
        for coin in page.data {
            coins.push(coin.coin_object_id);
            total = total.saturating_add(coin.balance);
            if total >= amount {
                return Ok(CoinSelection { success: true, coins, total });
            }
        }
        match page.next_cursor {
            Some(next) if page.has_next_page => cursor = Some(next),
            _ => return Ok(CoinSelection { success: false, coins, total }),
        }
    }
}

/// Start a plan that yields a coin worth exactly `amount` of `coin_type`.
///
/// Native SUI is split off the gas coin. Other types merge the selected
/// coins into the first one and split from it.
pub async fn prepare_amount(
    reader: &dyn ChainReader,
    coin_type: &str,
    amount: u64,
    sender: &str,
) -> Result<(TxPlan, Arg)> {
    let mut plan = TxPlan::new();
    if coin_type == SUI_COIN_TYPE {
        let coin = plan.split_coin(Arg::Gas, amount);
        return Ok((plan, coin));
    }

    let selection = coins_by_amount(reader, sender, coin_type, amount).await?;
    tracing::debug!(
        coin_type,
        amount,
        coins = selection.coins.len(),
        total = selection.total,
        success = selection.success,
        "coin selection"
    );
    if !selection.success {
        return Err(SuiClubError::InsufficientFunds(format!(
            "not enough {coin_type}: have {}, need {amount}",
            selection.total
        )));
    }

    let mut ids = selection.coins.into_iter().map(Arg::Object);
    let primary = ids
        .next()
        .ok_or_else(|| SuiClubError::Internal("coin selection succeeded without coins".into()))?;
    let rest: Vec<Arg> = ids.collect();
    if !rest.is_empty() {
        plan.merge_coins(primary.clone(), rest);
    }
    let coin = plan.split_coin(primary, amount);
    Ok((plan, coin))
}
