//! SVG line chart of a comparison, one line per city

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::{Duration, NaiveDate};
use plotters::prelude::*;

use crate::models::ComparisonTable;

const CITY_A_COLOR: RGBColor = RGBColor(0x00, 0xE5, 0xFF);
const CITY_B_COLOR: RGBColor = RGBColor(0xFF, 0x45, 0x00);

fn points(
    table: &ComparisonTable,
    column: impl Fn(&crate::models::ComparisonRow) -> Option<f64>,
) -> Vec<(NaiveDate, f64)> {
    table
        .rows
        .iter()
        .filter_map(|row| column(row).map(|v| (row.date, v)))
        .collect()
}

/// Write `table` as an SVG chart to `path`
pub fn write_svg(table: &ComparisonTable, path: &Path, size: (u32, u32)) -> Result<()> {
    let (first, last) = match (table.rows.first(), table.rows.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => return Err(anyhow!("Cannot chart an empty comparison")),
    };
    let (low, high) = table
        .temperature_range()
        .ok_or_else(|| anyhow!("Comparison has no temperature values to chart"))?;
    // pad so flat or single-day data still gets a visible axis
    let x_range = first..(last + Duration::days(1));
    let y_range = (low - 2.0)..(high + 2.0);

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| anyhow!("{e:?}"))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Max Daily Temperature: {} vs {}",
                table.label_a, table.label_b
            ),
            ("sans-serif", 28).into_font(),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| anyhow!("{e:?}"))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Temperature (°C)")
        .x_label_formatter(&|d: &NaiveDate| d.format("%m-%d").to_string())
        .draw()
        .map_err(|e| anyhow!("{e:?}"))?;

    for (label, color, data) in [
        (&table.label_a, CITY_A_COLOR, points(table, |r| r.city_a)),
        (&table.label_b, CITY_B_COLOR, points(table, |r| r.city_b)),
    ] {
        chart
            .draw_series(LineSeries::new(data.iter().copied(), color.stroke_width(2)))
            .map_err(|e| anyhow!("{e:?}"))?
            .label(label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart
            .draw_series(data.iter().map(|&p| Circle::new(p, 3, color.filled())))
            .map_err(|e| anyhow!("{e:?}"))?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| anyhow!("{e:?}"))?;

    root.present()
        .with_context(|| format!("Failed to write chart to {}", path.display()))?;
    Ok(())
}
