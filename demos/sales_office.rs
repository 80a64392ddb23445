//! Buyers register for a flat size and hear only that size's price.

use motifs::demos::sales_office::{SQUARE_METER_88, announce_prices};
use motifs::prelude::*;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let out = Transcript::echoing();
    let office = announce_prices(&out);

    // Nobody registered for 140 square meters, so this one is silent.
    let delivery = office.trigger("squareMeter140", 4_000_000);
    log::info!(
        "{} listener(s) on {}, unregistered flat delivered: {}",
        office.roster().subscriber_count(SQUARE_METER_88),
        SQUARE_METER_88,
        delivery.is_delivered()
    );
}
