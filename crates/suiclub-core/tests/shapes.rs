//! Chain response view tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;

use suiclub_core::error::ErrorCode;
use suiclub_core::protocol::message::{encode, MessageType};
use suiclub_core::protocol::shapes::{
    check_execution, clubs_table_id, first_return_u64, shares_table_id, trade_events, AppMeta,
    Balance, ClubInfo, ClubMsg, CoinPage, DynamicFieldName, FeeConfig, Profile,
};

#[test]
fn app_meta_from_publish() {
    let publish = json!({
        "objectChanges": [
            { "type": "mutated", "objectType": "0x2::coin::Coin<0x2::sui::SUI>", "objectId": "0xgas" },
            { "type": "published", "packageId": "0xpkg", "modules": ["club", "socialcoin"] },
            { "type": "created", "objectType": "0x2::package::UpgradeCap", "objectId": "0xcap" },
            { "type": "created", "objectType": "0xpkg::socialcoin::Global", "objectId": "0xglobal" },
            { "type": "created", "objectType": "0xpkg::socialcoin::AdminCap", "objectId": "0xadmin" },
            { "type": "created", "objectType": "0xpkg::club::Global", "objectId": "0xclub" }
        ]
    });
    let meta = AppMeta::from_publish(&publish).unwrap();
    assert_eq!(meta.package_id, "0xpkg");
    assert_eq!(meta.global_id, "0xglobal");
    assert_eq!(meta.admin_cap_id.as_deref(), Some("0xadmin"));
    assert_eq!(meta.club_global().unwrap(), "0xclub");
}

#[test]
fn app_meta_requires_package() {
    let publish = json!({ "objectChanges": [] });
    let err = AppMeta::from_publish(&publish).expect_err("no package");
    assert_eq!(err.code(), ErrorCode::UnexpectedShape);
}

#[test]
fn execution_status() {
    let ok = json!({ "effects": { "status": { "status": "success" } } });
    assert!(check_execution(&ok).is_ok());

    let failed = json!({ "effects": { "status": { "status": "failure", "error": "MoveAbort(.., 3)" } } });
    let err = check_execution(&failed).expect_err("failure status");
    assert_eq!(err.code(), ErrorCode::TxFailed);
    assert!(err.to_string().contains("MoveAbort"));

    let err = check_execution(&json!({})).expect_err("no effects");
    assert_eq!(err.code(), ErrorCode::TxFailed);
}

fn global_object() -> serde_json::Value {
    json!({
        "data": {
            "objectId": "0xglobal",
            "content": {
                "dataType": "moveObject",
                "fields": {
                    "config": { "fields": {
                        "protocol_fee_percent": "30000000",
                        "subject_fee_percent": 20000000
                    } },
                    "shares": { "fields": { "id": { "id": "0xshares" }, "size": "2" } }
                }
            }
        }
    })
}

#[test]
fn fee_config_and_price() {
    let fees = FeeConfig::from_global(&global_object()).unwrap();
    assert_eq!(fees.protocol_fee_percent, 30_000_000);
    assert_eq!(fees.subject_fee_percent, 20_000_000);
    // 400_000_000 + 3% + 2%
    assert_eq!(fees.price_after_fee(400_000_000).unwrap(), 420_000_000);
    assert_eq!(fees.price_after_fee(0).unwrap(), 0);
    // each fee rounds down on its own
    assert_eq!(fees.price_after_fee(99).unwrap(), 102);
}

#[test]
fn fee_overflow_is_an_error() {
    let fees = FeeConfig { protocol_fee_percent: 1_000_000_000, subject_fee_percent: 0 };
    let err = fees.price_after_fee(u64::MAX).expect_err("doubles u64::MAX");
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
}

#[test]
fn table_ids() {
    assert_eq!(shares_table_id(&global_object()).unwrap(), "0xshares");

    let club = json!({ "data": { "content": { "fields": { "clubs": { "fields": { "id": { "id": "0xclubs" } } } } } } });
    assert_eq!(clubs_table_id(&club).unwrap(), "0xclubs");
    assert!(clubs_table_id(&global_object()).is_err());
}

#[test]
fn profile_from_dynamic_field() {
    let obj = json!({ "data": { "content": { "fields": { "value": { "fields": {
        "supply": "3",
        "holding": { "fields": { "id": { "id": "0xholding" }, "size": "1" } },
        "holders": { "fields": { "id": { "id": "0xholders" }, "size": "2" } }
    } } } } } });
    let p = Profile::from_dynamic_field(&obj).unwrap();
    assert_eq!(
        p,
        Profile {
            supply: 3,
            holding_num: 1,
            holding_table_id: "0xholding".into(),
            holder_num: 2,
            holder_table_id: "0xholders".into(),
        }
    );
}

#[test]
fn club_info_from_dynamic_field() {
    let obj = json!({ "data": { "content": { "fields": { "value": { "fields": {
        "messages": { "fields": { "contents": { "fields": { "id": { "id": "0xmsgs" }, "size": "10" } } } }
    } } } } } });
    let info = ClubInfo::from_dynamic_field(&obj).unwrap();
    assert_eq!(info.message_count, 10);
    assert_eq!(info.message_table_id, "0xmsgs");
}

fn msg_object(content: &[u8], deleted: bool) -> serde_json::Value {
    json!({ "data": { "content": { "fields": { "name": "0", "value": { "fields": {
        "content": content,
        "sender": "0xuser",
        "timestamp": "1700000000000",
        "deleted": deleted
    } } } } } })
}

#[test]
fn club_msg_decodes_content() {
    let encoded = encode("suia to da moon", MessageType::Xor);
    let msg = ClubMsg::from_dynamic_field(&msg_object(&encoded, false)).unwrap();
    assert_eq!(msg.content, "suia to da moon");
    assert_eq!(msg.sender, "0xuser");
    assert_eq!(msg.timestamp, 1_700_000_000_000);
    assert!(!msg.deleted);
}

#[test]
fn club_msg_deleted_has_empty_content() {
    // deleted messages are not decoded, even if the stored bytes are garbage
    let msg = ClubMsg::from_dynamic_field(&msg_object(&[9, 9], true)).unwrap();
    assert!(msg.deleted);
    assert_eq!(msg.content, "");
}

#[test]
fn club_msg_propagates_codec_errors() {
    let err = ClubMsg::from_dynamic_field(&msg_object(&[2, 65], false)).expect_err("type 2");
    assert_eq!(err.code(), ErrorCode::UnsupportedType);
}

#[test]
fn dev_inspect_u64_return() {
    let le = 420_000_000u64.to_le_bytes().to_vec();
    let res = json!({ "results": [ { "returnValues": [ [ le, "u64" ] ] } ] });
    assert_eq!(first_return_u64(&res).unwrap(), 420_000_000);

    let aborted = json!({ "error": "MoveAbort in get_price", "results": [] });
    assert_eq!(first_return_u64(&aborted).unwrap_err().code(), ErrorCode::TxFailed);

    let short = json!({ "results": [ { "returnValues": [ [ [1, 2, 3], "u64" ] ] } ] });
    assert_eq!(first_return_u64(&short).unwrap_err().code(), ErrorCode::UnexpectedShape);
}

#[test]
fn trade_events_skip_other_shapes() {
    let res = json!({ "events": [
        { "type": "0xpkg::other::Event", "parsedJson": { "foo": 1 } },
        { "type": "0xpkg::socialcoin::Trade", "parsedJson": {
            "is_buy": true,
            "protocol_sui_amount": "12000000",
            "share_amount": "1",
            "subject": "0xsubject",
            "subject_sui_amount": "8000000",
            "sui_amount": "400000000",
            "supply": "3",
            "trader": "0xtrader"
        } }
    ] });
    let events = trade_events(&res);
    assert_eq!(events.len(), 1);
    assert!(events[0].is_buy);
    assert_eq!(events[0].supply, 3);
    assert_eq!(events[0].sui_amount, 400_000_000);
    assert!(trade_events(&json!({})).is_empty());
}

#[test]
fn rpc_models() {
    let page: CoinPage = serde_json::from_value(json!({
        "data": [ { "coinType": "0x2::sui::SUI", "coinObjectId": "0xc1", "version": "5", "digest": "d", "balance": "750", "previousTransaction": "t" } ],
        "nextCursor": "0xc1",
        "hasNextPage": true
    }))
    .unwrap();
    assert_eq!(page.data[0].balance, 750);
    assert_eq!(page.next_cursor.as_deref(), Some("0xc1"));

    let bal: Balance = serde_json::from_value(json!({
        "coinType": "0x2::sui::SUI", "coinObjectCount": 2, "totalBalance": "1000", "lockedBalance": {}
    }))
    .unwrap();
    assert_eq!(bal.total_balance, 1000);

    let name = serde_json::to_value(DynamicFieldName::u64(7)).unwrap();
    assert_eq!(name, json!({ "type": "u64", "value": "7" }));
}
