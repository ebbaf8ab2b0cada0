//! `sui client ptb` rendering of transaction plans.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use suiclub_demo::chain::{Arg, TxPlan};

#[test]
fn renders_split_and_move_call() {
    let mut plan = TxPlan::new();
    let coins = plan.split_coins(Arg::Gas, &[0, 1000]);
    plan.move_call(
        "0xpkg::socialcoin::buy_shares",
        vec![
            Arg::Object("0xglobal".into()),
            Arg::Address("0xsubject".into()),
            Arg::U64(2),
            coins[1].clone(),
        ],
    );

    assert_eq!(
        plan.to_ptb_args(),
        vec![
            "--split-coins", "gas", "[0,1000]", "--assign", "split0",
            "--move-call", "0xpkg::socialcoin::buy_shares", "@0xglobal", "@0xsubject", "2", "split0.1",
        ]
    );
}

#[test]
fn split_handles_are_distinct() {
    let mut plan = TxPlan::new();
    let a = plan.split_coin(Arg::Gas, 1);
    let b = plan.split_coin(Arg::Gas, 2);
    assert_eq!(a, Arg::Result { name: "split0".into(), index: 0 });
    assert_eq!(b, Arg::Result { name: "split1".into(), index: 0 });
    assert_eq!(plan.commands().len(), 2);
}

#[test]
fn renders_merge_and_bytes() {
    let mut plan = TxPlan::new();
    plan.merge_coins(
        Arg::Object("0xc0".into()),
        vec![Arg::Object("0xc1".into()), Arg::Object("0xc2".into())],
    );
    plan.move_call("0xpkg::club::new_message", vec![Arg::Bytes(vec![1, 0, 255])]);

    assert_eq!(
        plan.to_ptb_args(),
        vec![
            "--merge-coins", "@0xc0", "[@0xc1,@0xc2]",
            "--move-call", "0xpkg::club::new_message", "vector[1u8,0u8,255u8]",
        ]
    );
    assert_eq!(plan.targets(), vec!["0xpkg::club::new_message"]);
}

#[test]
fn empty_plan() {
    let plan = TxPlan::new();
    assert!(plan.is_empty());
    assert!(plan.to_ptb_args().is_empty());
}
