//! Worked examples, each printing a fixed transcript.
//!
//! - [`order`]: discount rules for a phone shop as a request chain, plus the
//!   deferred 1/2/3 chain
//! - [`sales_office`]: price announcements over a topic registry
//! - [`beverage`]: coffee and tea from one template skeleton

pub mod beverage;
pub mod order;
pub mod sales_office;
