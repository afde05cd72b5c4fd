//! Group statistics and distribution plot for a measurement table

use anyhow::{Context, Result};
use spoonfit_stats::{
    Table, TableSchema, format_summary, render_distribution, summarize as summarize_table,
};
use std::path::Path;
use tracing::warn;

pub async fn summarize(
    file: &Path,
    group_by: &str,
    schema: &TableSchema,
    plot: Option<&Path>,
) -> Result<()> {
    let table = Table::load(file, schema)?;
    let summaries = summarize_table(&table, group_by);

    if summaries.is_empty() {
        warn!(group_by, "No valid measurements carry a group value");
    }

    println!("{}", format_summary(group_by, &summaries));

    if let Some(path) = plot {
        render_distribution(&table, group_by, path)
            .with_context(|| format!("Failed to render plot {:?}", path))?;
        println!();
        println!("Plot written to {:?}", path);
    }

    Ok(())
}
