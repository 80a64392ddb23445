//! End-to-end runs of the order chains from `demos/order_chain.rs` and
//! `demos/async_chain.rs`.

use motifs::demos::order::{
    DEPOSIT_200, DEPOSIT_500, NORMAL, OUT_OF_STOCK, Order, async_counting_chain, order_chain,
};
use motifs::prelude::*;
use std::time::Duration;

fn run(order: Order) -> Vec<String> {
    let out = Transcript::new();
    let orders = order_chain(&out).unwrap();
    let resolution = orders.pass_request(&order).unwrap();
    assert!(resolution.is_handled());
    out.lines()
}

#[test]
fn test_order_chain_prints_one_line_per_order() {
    assert_eq!(run(Order::new(1, true, 500)), vec![DEPOSIT_500]);
    assert_eq!(run(Order::new(1, false, 500)), vec![NORMAL]);
    assert_eq!(run(Order::new(2, true, 500)), vec![DEPOSIT_200]);
    assert_eq!(run(Order::new(3, false, 500)), vec![NORMAL]);
    assert_eq!(run(Order::new(3, false, 0)), vec![OUT_OF_STOCK]);
}

#[test]
fn test_order_chain_entered_mid_way() {
    let out = Transcript::new();
    let orders = order_chain(&out).unwrap();

    let resolution = orders
        .chain
        .pass_request(orders.order_normal, &Order::new(1, true, 500))
        .unwrap();

    assert_eq!(resolution.handled_by(), Some(orders.order_normal));
    assert_eq!(out.lines(), vec![NORMAL]);
}

#[test]
fn test_order_chain_relinked_without_the_200_tier() {
    let out = Transcript::new();
    let mut orders = order_chain(&out).unwrap();
    orders
        .chain
        .set_next_successor(orders.order500, orders.order_normal)
        .unwrap();

    orders.pass_request(&Order::new(2, true, 500)).unwrap();

    assert_eq!(out.lines(), vec![NORMAL]);
    assert_eq!(
        orders.chain.path(orders.order500).unwrap(),
        vec![orders.order500, orders.order_normal]
    );
}

#[test]
fn test_unknown_order_type_falls_through_under_fail_policy() {
    let out = Transcript::new();
    let mut chain: Chain<Order, ()> = Chain::with_policy(UnhandledPolicy::Fail);
    let picky = chain.add("picky", |_: &Order| Outcome::PassToNext);

    let err = chain.pass_request(picky, &Order::new(9, true, 1)).unwrap_err();

    assert_eq!(
        err,
        ChainError::Unhandled {
            last: picky,
            label: "picky".to_string()
        }
    );
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_async_chain_prints_three_after_the_timer() {
    let out = Transcript::new();
    let (chain, head) = async_counting_chain(&out, Duration::from_millis(50)).unwrap();

    let running = tokio::spawn(async move { chain.pass_request(head, ()).await });

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(out.lines(), vec!["1", "2"]);

    let resolution = running.await.unwrap().unwrap();
    assert!(resolution.is_handled());
    assert_eq!(out.lines(), vec!["1", "2", "3"]);
}
