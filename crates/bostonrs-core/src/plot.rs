use crate::dataset::Dataset;

use itertools::Itertools;
use plotters::prelude::*;
use std::error::Error;
use std::ops::Range;
use std::path::Path;

pub const HIST_FIGURE: &str = "boston-housing-hist.png";
pub const SCATTER_FIGURE: &str = "boston-housing-scatter.png";
pub const PREDICT_FIGURE: &str = "boston-housing-predict.png";

pub const HIST_BINS: usize = 10;
pub const SCATTER_GRID: (usize, usize) = (3, 4);

const GRID_SIZE: (u32, u32) = (1500, 1000);
const PREDICT_SIZE: (u32, u32) = (800, 600);

/// Equal-width bins over the finite values as `(lo, hi, count)`.
/// The maximum lands in the last bin.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<(f64, f64, usize)> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let Some((lo, hi)) = finite.iter().copied().minmax_by(|a, b| a.total_cmp(b)).into_option()
    else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    // a constant column still gets a unit-wide range around its value
    let (lo, hi) = if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) };
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in finite {
        let i = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[i] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, c)| (lo + i as f64 * width, lo + (i + 1) as f64 * width, c))
        .collect()
}

/// Min..max of the finite values padded by 5% on each side.
pub fn padded_range(values: &[f64]) -> Range<f64> {
    match values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .minmax_by(|a, b| a.total_cmp(b))
        .into_option()
    {
        Some((lo, hi)) if hi > lo => {
            let pad = (hi - lo) * 0.05;
            (lo - pad)..(hi + pad)
        },
        Some((v, _)) => (v - 1.0)..(v + 1.0),
        None => 0.0..1.0,
    }
}

/// Grid shape with `cols` columns holding at least `n` panels.
fn grid_for(n: usize, cols: usize) -> (usize, usize) {
    (n.div_ceil(cols).max(1), cols)
}

/// One histogram per column, laid out in a grid.
pub fn draw_histograms(path: &Path, columns: &[(&str, &[f64])]) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, GRID_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_evenly(grid_for(columns.len(), 4));
    for (panel, (name, values)) in panels.iter().zip(columns) {
        let bins = histogram_bins(values, HIST_BINS);
        let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
            continue;
        };
        let ymax = bins.iter().map(|b| b.2).max().unwrap_or(0) as f64;

        let mut chart = ChartBuilder::on(panel)
            .caption(*name, ("sans-serif", 16))
            .margin(5)
            .x_label_area_size(20)
            .y_label_area_size(35)
            .build_cartesian_2d(first.0..last.1, 0.0..(ymax * 1.05).max(1.0))?;

        chart.configure_mesh().x_labels(4).y_labels(4).draw()?;

        chart.draw_series(bins.iter().map(|&(lo, hi, c)| {
            Rectangle::new([(lo, 0.0), (hi, c as f64)], BLUE.mix(0.6).filled())
        }))?;
    }

    root.present()?;
    log::info!("Saved {}", path.display());
    Ok(())
}

/// Scatter of the first `rows * cols` features against the target.
pub fn draw_feature_scatter(path: &Path, ds: &Dataset) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, GRID_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let target = ds.target_values();
    let y_range = padded_range(&target);

    let panels = root.split_evenly(SCATTER_GRID);
    for (j, panel) in panels.iter().enumerate().take(ds.n_features()) {
        let x = ds.column(j);

        let mut chart = ChartBuilder::on(panel)
            .margin(5)
            .x_label_area_size(35)
            .y_label_area_size(45)
            .build_cartesian_2d(padded_range(&x), y_range.clone())?;

        chart
            .configure_mesh()
            .x_desc(ds.feature_names()[j].as_str())
            .y_desc("house price")
            .x_labels(5)
            .y_labels(5)
            .draw()?;

        chart.draw_series(
            x.iter()
                .zip(&target)
                .map(|(&xi, &yi)| Circle::new((xi, yi), 2, BLUE.mix(0.6).filled())),
        )?;
    }

    root.present()?;
    log::info!("Saved {}", path.display());
    Ok(())
}

/// True vs predicted scatter with the identity line over `line`.
pub fn draw_prediction_plot(
    path: &Path,
    truth: &[f64],
    predicted: &[f64],
    line: (f64, f64),
    rmse: f64,
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, PREDICT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let all: Vec<f64> = truth.iter().chain(predicted).copied().chain([line.0, line.1]).collect();
    let range = padded_range(&all);

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Boston housing, rmse {rmse:.2}"), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(range.clone(), range)?;

    chart.configure_mesh().x_desc("true price").y_desc("predicted price").draw()?;

    chart.draw_series(
        truth
            .iter()
            .zip(predicted)
            .map(|(&t, &p)| Circle::new((t, p), 3, BLUE.mix(0.6).filled())),
    )?;

    // 100 points along the diagonal
    let step = (line.1 - line.0) / 99.0;
    chart.draw_series(LineSeries::new(
        (0..100).map(|i| {
            let v = line.0 + step * i as f64;
            (v, v)
        }),
        &RED,
    ))?;

    root.present()?;
    log::info!("Saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bins_cover_all_values() {
        let values = [0., 1., 2., 3., 4., 5., 6., 7., 8., 9., 10.];
        let bins = histogram_bins(&values, 5);

        assert_eq!(bins.len(), 5);
        assert_eq!(bins.iter().map(|b| b.2).sum::<usize>(), values.len());
        assert_eq!(bins[0].0, 0.);
        assert!((bins[4].1 - 10.).abs() < 1e-12);
        // max goes in the last bin
        assert_eq!(bins[4].2, 3);
    }

    #[test]
    fn test_bins_constant_column() {
        let bins = histogram_bins(&[2., 2., 2.], 4);

        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.2).sum::<usize>(), 3);
        assert!((bins[0].0 - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_bins_skip_non_finite() {
        let bins = histogram_bins(&[1., f64::NAN, 3., f64::INFINITY], 2);

        assert_eq!(bins.iter().map(|b| b.2).sum::<usize>(), 2);
        assert!(histogram_bins(&[], 3).is_empty());
        assert!(histogram_bins(&[1.], 0).is_empty());
    }

    #[test]
    fn test_padded_range() {
        let r = padded_range(&[0., 10.]);
        assert!((r.start + 0.5).abs() < 1e-12);
        assert!((r.end - 10.5).abs() < 1e-12);

        assert_eq!(padded_range(&[3., 3.]), 2.0..4.0);
        assert_eq!(padded_range(&[]), 0.0..1.0);
    }

    #[test]
    fn test_grid_for() {
        assert_eq!(grid_for(14, 4), (4, 4));
        assert_eq!(grid_for(12, 4), (3, 4));
        assert_eq!(grid_for(0, 4), (1, 4));
    }
}
