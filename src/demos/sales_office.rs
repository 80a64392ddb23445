//! A housing sales office that texts buyers when prices for the flat size they
//! registered for are announced.

use crate::core::registry::{Delivery, Payload, TopicRegistry};
use crate::core::transcript::Transcript;
use serde_json::json;

pub const SQUARE_METER_88: &str = "squareMeter88";
pub const SQUARE_METER_110: &str = "squareMeter110";

/// The sales office and its roster of buyers.
pub struct SalesOffice {
    roster: TopicRegistry<Payload>,
}

impl Default for SalesOffice {
    fn default() -> Self {
        Self::new()
    }
}

impl SalesOffice {
    pub fn new() -> Self {
        SalesOffice {
            roster: TopicRegistry::new(),
        }
    }

    /// Registers a buyer for `flat`; they print `价格= <price>` when told.
    pub fn listen(&mut self, flat: &str, buyer: &Transcript) {
        let buyer = buyer.clone();
        self.roster.subscribe(flat, move |price: &Payload| {
            buyer.line(format!("价格= {}", price));
        });
    }

    /// Announces `price` to everyone registered for `flat`.
    pub fn trigger(&self, flat: &str, price: u64) -> Delivery {
        self.roster.publish(flat, &json!(price))
    }

    pub fn roster(&self) -> &TopicRegistry<Payload> {
        &self.roster
    }
}

/// One buyer on each flat size, then both prices announced.
pub fn announce_prices(out: &Transcript) -> SalesOffice {
    let mut office = SalesOffice::new();
    office.listen(SQUARE_METER_88, out);
    office.listen(SQUARE_METER_110, out);
    office.trigger(SQUARE_METER_88, 2_000_000);
    office.trigger(SQUARE_METER_110, 3_000_000);
    office
}
