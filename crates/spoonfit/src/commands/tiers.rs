//! Show the loaded tier table

use anyhow::Result;
use spoonfit_tiers::{TierTable, format_tier_table};

pub async fn tiers(table: &TierTable) -> Result<()> {
    println!("{}", format_tier_table(table));
    Ok(())
}
