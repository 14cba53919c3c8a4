//! Locate command implementation.

use super::SourceArgs;
use anyhow::Result;
use tickfill_lib::prelude::*;

/// Print the first day a market published a trade archive.
pub(crate) async fn locate(market: &str, args: &SourceArgs) -> Result<()> {
    let source = args.open()?;
    let backfiller = Backfiller::new(&*source, args.backfill_config());

    match backfiller.locate_start(market).await {
        Some(date) => println!("{market}: first archive on {date}"),
        None => println!("{market}: no data"),
    }

    Ok(())
}
