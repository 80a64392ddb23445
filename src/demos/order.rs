//! Phone-shop order discounts as a chain of responsibility.
//!
//! Customers who paid a 500 deposit get a 100 coupon, a 200 deposit gets a 50
//! coupon, everyone else buys normally while stock lasts. A deposit order that
//! was never paid falls back to a normal purchase.

use crate::core::NodeId;
use crate::core::async_impl::async_chain::AsyncChain;
use crate::core::async_impl::async_handler::{AsyncOutcome, NextHandle};
use crate::core::error::ChainError;
use crate::core::sync_impl::chain::{Chain, Resolution};
use crate::core::sync_impl::handler::{HandlerLogic, Outcome};
use crate::core::transcript::Transcript;
use futures::FutureExt;
use std::time::Duration;

pub const DEPOSIT_500: &str = "500 元定金预购，得到 100 优惠券";
pub const DEPOSIT_200: &str = "200 元定金预购，得到 50 优惠券";
pub const NORMAL: &str = "普通购买，无优惠券";
pub const OUT_OF_STOCK: &str = "手机库存不足";

/// The monolithic version's wording, punctuated with an ASCII comma.
pub const PLAIN_DEPOSIT_500: &str = "500 元定金预购, 得到 100 优惠券";
pub const PLAIN_DEPOSIT_200: &str = "200 元定金预购, 得到 50 优惠券";
pub const PLAIN_NORMAL: &str = "普通购买, 无优惠券";

/// The fields the order page hands over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    /// 1: 500 deposit, 2: 200 deposit, 3: normal purchase.
    pub order_type: u8,
    /// Whether the deposit was actually paid.
    pub pay: bool,
    /// Phones left for normal purchases.
    pub stock: u32,
}

impl Order {
    pub fn new(order_type: u8, pay: bool, stock: u32) -> Self {
        Order {
            order_type,
            pay,
            stock,
        }
    }
}

/// The single function every case used to go through.
pub fn order_monolithic(order: &Order, out: &Transcript) {
    match (order.order_type, order.pay) {
        (1, true) => out.line(PLAIN_DEPOSIT_500),
        (2, true) => out.line(PLAIN_DEPOSIT_200),
        (1..=3, _) if order.stock > 0 => out.line(PLAIN_NORMAL),
        (1..=3, _) => out.line(OUT_OF_STOCK),
        _ => {}
    }
}

pub fn order500(out: Transcript) -> impl HandlerLogic<Order, ()> {
    move |order: &Order| {
        if order.order_type == 1 && order.pay {
            out.line(DEPOSIT_500);
            Outcome::Resolved(())
        } else {
            Outcome::PassToNext
        }
    }
}

pub fn order200(out: Transcript) -> impl HandlerLogic<Order, ()> {
    move |order: &Order| {
        if order.order_type == 2 && order.pay {
            out.line(DEPOSIT_200);
            Outcome::Resolved(())
        } else {
            Outcome::PassToNext
        }
    }
}

/// Placeholder for a 300 deposit tier with an empty body: it resolves every
/// request it sees and prints nothing.
pub fn order300() -> impl HandlerLogic<Order, ()> {
    |_: &Order| Outcome::Resolved(())
}

pub fn order_normal(out: Transcript) -> impl HandlerLogic<Order, ()> {
    move |order: &Order| {
        if order.stock > 0 {
            out.line(NORMAL);
        } else {
            out.line(OUT_OF_STOCK);
        }
        Outcome::Resolved(())
    }
}

/// The order chain and its nodes.
pub struct OrderChain {
    pub chain: Chain<Order, ()>,
    pub order500: NodeId,
    pub order200: NodeId,
    pub order_normal: NodeId,
}

impl OrderChain {
    /// Evaluates from the head.
    pub fn pass_request(&self, order: &Order) -> Result<Resolution<()>, ChainError> {
        self.chain.pass_request(self.order500, order)
    }
}

/// `order500 -> order200 -> order_normal`.
pub fn order_chain(out: &Transcript) -> Result<OrderChain, ChainError> {
    let mut chain = Chain::new();
    let order500 = chain.add("order500", order500(out.clone()));
    let order200 = chain.add("order200", order200(out.clone()));
    let order_normal = chain.add("orderNormal", order_normal(out.clone()));

    let tail = chain.set_next_successor(order500, order200)?;
    chain.set_next_successor(tail, order_normal)?;

    Ok(OrderChain {
        chain,
        order500,
        order200,
        order_normal,
    })
}

/// The three-step async chain: prints `1` and passes, prints `2` and resumes
/// after `delay`, prints `3`.
pub fn async_counting_chain(
    out: &Transcript,
    delay: Duration,
) -> Result<(AsyncChain<(), ()>, NodeId), ChainError> {
    let mut chain: AsyncChain<(), ()> = AsyncChain::new();

    let one = out.clone();
    let fn1 = chain.add_sync("fn1", move |_: &()| {
        one.line("1");
        Outcome::PassToNext
    });

    let two = out.clone();
    let fn2 = chain.add("fn2", move |_: (), next: NextHandle<()>| {
        let two = two.clone();
        async move {
            two.line("2");
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                next.next();
            });
            AsyncOutcome::Deferred
        }
        .boxed()
    });

    let three = out.clone();
    let fn3 = chain.add_sync("fn3", move |_: &()| {
        three.line("3");
        Outcome::Resolved(())
    });

    let tail = chain.set_next_successor(fn1, fn2)?;
    chain.set_next_successor(tail, fn3)?;

    Ok((chain, fn1))
}
