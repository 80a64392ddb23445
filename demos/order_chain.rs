//! Phone-shop discounts, first as one function and then as a request chain.
//!
//! Run with `cargo run --example order_chain`; set `RUST_LOG=debug` to watch
//! the request travel from node to node.

use motifs::demos::order::{Order, order_chain, order_monolithic};
use motifs::prelude::*;

fn main() -> Result<(), ChainError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let out = Transcript::echoing();

    // ========================================================================
    // One function for every case
    // ========================================================================

    order_monolithic(&Order::new(1, true, 500), &out);

    // ========================================================================
    // The same rules as a chain: order500 -> order200 -> orderNormal
    // ========================================================================

    let orders = order_chain(&out)?;

    for order in [
        Order::new(1, true, 500),
        Order::new(1, false, 500),
        Order::new(2, true, 500),
        Order::new(3, false, 500),
        Order::new(3, false, 0),
    ] {
        orders.pass_request(&order)?;
    }

    // Any node can be the entry point.
    orders
        .chain
        .pass_request(orders.order_normal, &Order::new(1, false, 500))?;

    Ok(())
}
