//! A chain whose middle node hands control back and resumes a second later.
//!
//! Prints `1` and `2` straight away and `3` once the timer fires.

use motifs::demos::order::async_counting_chain;
use motifs::prelude::*;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), ChainError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let out = Transcript::echoing();
    let (chain, head) = async_counting_chain(&out, Duration::from_millis(1000))?;

    let resolution = chain.pass_request(head, ()).await?;
    log::info!("chain finished: {:?}", resolution);

    Ok(())
}
