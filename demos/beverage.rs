//! Coffee and tea from one brewing skeleton.
//!
//! Each drink is run twice: once as a type implementing the skeleton's slots,
//! once composed from closures. Both print the same lines.

use motifs::demos::beverage::{COFFEE, Drink, TEA, composed};
use motifs::prelude::*;

fn main() -> Result<(), TemplateError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut out = Transcript::echoing();

    // ========================================================================
    // Drinks that fill in the skeleton themselves
    // ========================================================================

    Drink::new(COFFEE)?.init(&mut out)?;
    Drink::new(TEA)?.init(&mut out)?;

    // The customer says no to sugar and milk.
    let report = Drink::new(COFFEE)?.with_condiments(false).init(&mut out)?;
    log::info!("skipped: {:?}", report.skipped);

    // ========================================================================
    // The same drinks, composed
    // ========================================================================

    composed(COFFEE, None)?.init(&mut out)?;
    composed(TEA, None)?.init(&mut out)?;

    Ok(())
}
