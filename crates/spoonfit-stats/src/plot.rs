//! Box-plot rendering of measurement distributions.
//!
//! Charts are written as SVG with [`plotters`], which keeps rendering free of
//! system font dependencies so it works in headless environments.

use crate::table::Table;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

const CHART_SIZE: (u32, u32) = (1200, 800);

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

/// Draw one vertical box per group of `group_key` and save the chart to `output_path`.
///
/// Groups are placed left to right in name order. Records without a group
/// value are not drawn.
pub fn render_distribution(table: &Table, group_key: &str, output_path: &Path) -> Result<()> {
    let groups = table.group_values(group_key);
    if groups.is_empty() {
        return Err(PlotError::InvalidData(format!(
            "no measurements with a '{}' value",
            group_key
        )));
    }

    let labels: Vec<String> = groups.keys().cloned().collect();

    let (lo, hi) = groups
        .values()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let pad = ((hi - lo) * 0.1).max(1.0);
    let y_range = (lo - pad).max(0.0) as f32..(hi + pad) as f32;

    let root = SVGBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Measurement distribution by {}", group_key),
            ("sans-serif", 28),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(labels[..].into_segmented(), y_range)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(name) | SegmentValue::Exact(name) => name.to_string(),
            SegmentValue::Last => String::new(),
        })
        .x_desc(group_key)
        .y_desc("Diameter (mm)")
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(labels.iter().zip(groups.values()).enumerate().map(
            |(i, (label, values))| {
                Boxplot::new_vertical(
                    SegmentValue::CenterOf(label),
                    &Quartiles::new(values.as_slice()),
                )
                .width(40)
                .style(Palette99::pick(i).stroke_width(2))
            },
        ))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    info!(path = ?output_path, groups = labels.len(), "Rendered distribution plot");
    Ok(())
}
