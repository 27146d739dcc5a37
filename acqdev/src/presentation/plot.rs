use plotters::prelude::*;
use std::path::Path;

pub type DynError = Box<dyn std::error::Error>;

/// Plot one calibrated channel against the time column.
pub fn plot_channel(
    times: &[f64],
    values: &[f64],
    channel: &str,
    source: &str,
    out: &Path,
) -> Result<(), DynError> {
    if times.len() != values.len() {
        return Err("time column and channel length differ".into());
    }
    if times.is_empty() {
        return Err("no records to plot".into());
    }

    let x_max = times[times.len() - 1].max(f64::EPSILON);
    let (mut y_min, mut y_max) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if !y_min.is_finite() {
        return Err(format!("channel {channel} has no finite samples").into());
    }
    if y_max - y_min < f64::EPSILON {
        y_min -= 1.0;
        y_max += 1.0;
    }

    let root = BitMapBackend::new(out, (1200, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{channel} read from '{source}'"), ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Time (s)")
        .y_desc(channel)
        .draw()?;

    let firebrick = RGBColor(178, 34, 34);
    chart.draw_series(LineSeries::new(
        times
            .iter()
            .copied()
            .zip(values.iter().copied())
            .filter(|(_, v)| v.is_finite()),
        &firebrick,
    ))?;

    root.present()?;
    Ok(())
}
