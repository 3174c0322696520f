//! # Line Chart Geometry
//!
//! Projects a numeric series onto a padded canvas and produces everything a
//! renderer needs to draw it: marker positions, the polyline, an optional
//! filled area and the grid/label decoration.
//!
//! ## Coordinate system
//!
//! - Origin at the top-left corner, y grows downwards
//! - Plot area: `width - left_pad - right_pad` by `height - bottom_pad`
//! - The top edge is unpadded, so the axis maximum sits at `y = 0`
//! - The baseline (axis minimum) sits at `y = height - bottom_pad`
//!
//! ## Zero values
//!
//! A sample of exactly `0.0` after the first one is left out of the polyline
//! (its marker is still placed). Series coming from the balance history use
//! `0.0` for "no entry that day". `LineStyle::skip_zero_values` turns this off.

use crate::domain::axis_scaler;
use crate::domain::numeric_formatter::NumericFormatter;
use serde::{Deserialize, Serialize};
use shared::{
    AxisBounds, ChartCanvas, ChartDecoration, ChartGeometry, ChartPath, ChartPoint, GridLine,
    GridOrientation, NumericSample, PathCommand,
};

/// Chart appearance settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    /// Fraction of the data span added above the max and below the min
    pub vertical_padding_fraction: f64,
    /// Number of horizontal grid lines (value labels)
    pub trend_label_count: usize,
    /// Number of vertical grid lines (timeline labels)
    pub timeline_label_count: usize,
    pub canvas: ChartCanvas,
    pub style: LineStyle,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            vertical_padding_fraction: 0.1,
            trend_label_count: 5,
            timeline_label_count: 4,
            canvas: ChartCanvas::default(),
            style: LineStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LineStyle {
    pub skip_zero_values: bool,
    /// Produce the area-under-the-line path
    pub fill: bool,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            skip_zero_values: true,
            fill: false,
        }
    }
}

/// Bounds with a non-zero span; equal bounds are widened by one on each side
pub fn widen_degenerate(bounds: AxisBounds) -> AxisBounds {
    if bounds.max == bounds.min {
        AxisBounds::new(bounds.max + 1.0, bounds.min - 1.0)
    } else {
        bounds
    }
}

/// Project `samples` onto `canvas` using `bounds` for the value axis
pub fn project(
    samples: &[NumericSample],
    bounds: AxisBounds,
    canvas: &ChartCanvas,
    style: &LineStyle,
) -> ChartGeometry {
    let bounds = widen_degenerate(bounds);
    let plot_height = canvas.plot_height();
    let count = samples.len();

    let points: Vec<ChartPoint> = samples
        .iter()
        .enumerate()
        .map(|(index, sample)| {
            ChartPoint::new(
                x_for_index(index, count, canvas),
                y_for_value(sample.value, &bounds, plot_height),
            )
        })
        .collect();

    let line_points: Vec<ChartPoint> = points
        .iter()
        .zip(samples)
        .enumerate()
        .filter(|(index, (_, sample))| !(style.skip_zero_values && *index > 0 && sample.value == 0.0))
        .map(|(_, (point, _))| *point)
        .collect();

    let line_path = polyline(&line_points);
    let fill_path = if style.fill {
        fill_area(&line_points, plot_height)
    } else {
        None
    };

    ChartGeometry {
        points,
        line_path,
        fill_path,
    }
}

/// Grid lines and labels for the value axis and the timeline
pub fn decorate(
    samples: &[NumericSample],
    bounds: AxisBounds,
    canvas: &ChartCanvas,
    trend_label_count: usize,
    timeline_label_count: usize,
    formatter: &NumericFormatter,
) -> ChartDecoration {
    let bounds = widen_degenerate(bounds);
    let plot_width = canvas.plot_width();
    let plot_height = canvas.plot_height();

    let horizontal = label_fractions(trend_label_count)
        .into_iter()
        .map(|fraction| GridLine {
            orientation: GridOrientation::Horizontal,
            position: fraction * plot_height,
            label: formatter.format_axis_value(bounds.max - fraction * bounds.span()),
        })
        .collect();

    let vertical = if samples.is_empty() {
        Vec::new()
    } else {
        let last_index = samples.len() - 1;
        label_fractions(timeline_label_count)
            .into_iter()
            .map(|fraction| {
                let index = ((fraction * last_index as f64).round() as usize).min(last_index);
                GridLine {
                    orientation: GridOrientation::Vertical,
                    position: canvas.left_pad + fraction * plot_width,
                    label: samples[index].key.clone(),
                }
            })
            .collect()
    };

    ChartDecoration {
        horizontal,
        vertical,
    }
}

/// Everything needed to draw one chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedChart {
    pub bounds: AxisBounds,
    pub geometry: ChartGeometry,
    pub decoration: ChartDecoration,
}

/// Scales, projects and decorates a series in one call
#[derive(Debug, Clone, Default)]
pub struct LineChart {
    config: ChartConfig,
    formatter: NumericFormatter,
}

impl LineChart {
    pub fn new(config: ChartConfig, formatter: NumericFormatter) -> Self {
        Self { config, formatter }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// `None` when the series has no finite value to scale against
    pub fn render(&self, samples: &[NumericSample]) -> Option<RenderedChart> {
        let values: Vec<f64> = samples.iter().map(|sample| sample.value).collect();
        let bounds = axis_scaler::compute_bounds(&values, self.config.vertical_padding_fraction)?;

        let geometry = project(samples, bounds, &self.config.canvas, &self.config.style);
        let decoration = decorate(
            samples,
            bounds,
            &self.config.canvas,
            self.config.trend_label_count,
            self.config.timeline_label_count,
            &self.formatter,
        );

        Some(RenderedChart {
            bounds,
            geometry,
            decoration,
        })
    }
}

fn x_for_index(index: usize, count: usize, canvas: &ChartCanvas) -> f64 {
    let plot_width = canvas.plot_width();
    if count <= 1 {
        canvas.left_pad + plot_width / 2.0
    } else {
        canvas.left_pad + index as f64 * (plot_width / (count - 1) as f64)
    }
}

/// Values below the floor are clamped to it; non-finite values sit on the floor
fn y_for_value(value: f64, bounds: &AxisBounds, plot_height: f64) -> f64 {
    let clamped = if value.is_finite() {
        value.max(bounds.min)
    } else {
        bounds.min
    };
    let normalized = (clamped - bounds.min) / bounds.span();
    plot_height - normalized * plot_height
}

/// Evenly spaced fractions in `[0, 1]`; a single label sits at the start
fn label_fractions(count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..count).map(|i| i as f64 / (count - 1) as f64).collect(),
    }
}

fn polyline(points: &[ChartPoint]) -> ChartPath {
    let commands = points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            if i == 0 {
                PathCommand::MoveTo(*point)
            } else {
                PathCommand::LineTo(*point)
            }
        })
        .collect();
    ChartPath { commands }
}

fn fill_area(points: &[ChartPoint], baseline_y: f64) -> Option<ChartPath> {
    let first = points.first()?;
    let last = points.last()?;

    let mut path = polyline(points);
    path.commands.push(PathCommand::LineTo(ChartPoint::new(last.x, baseline_y)));
    path.commands.push(PathCommand::LineTo(ChartPoint::new(first.x, baseline_y)));
    path.commands.push(PathCommand::Close);
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> ChartCanvas {
        ChartCanvas {
            width: 300.0,
            height: 220.0,
            left_pad: 40.0,
            right_pad: 10.0,
            bottom_pad: 20.0,
        }
    }

    fn samples(values: &[f64]) -> Vec<NumericSample> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| NumericSample::new(format!("d{}", i + 1), *v))
            .collect()
    }

    fn line_points(path: &ChartPath) -> Vec<ChartPoint> {
        path.commands
            .iter()
            .filter_map(|command| match command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(*p),
                PathCommand::Close => None,
            })
            .collect()
    }

    #[test]
    fn test_single_sample_is_centered() {
        let geometry = project(&samples(&[50.0]), AxisBounds::new(100.0, 0.0), &canvas(), &LineStyle::default());

        assert_eq!(geometry.points.len(), 1);
        // plot width 250, starting at 40
        assert_eq!(geometry.points[0].x, 165.0);
        assert_eq!(geometry.points[0].y, 100.0);
        assert_eq!(geometry.line_path.commands, vec![PathCommand::MoveTo(geometry.points[0])]);
    }

    #[test]
    fn test_samples_spread_across_plot_width() {
        let geometry = project(
            &samples(&[0.0, 50.0, 100.0]),
            AxisBounds::new(100.0, 0.0),
            &canvas(),
            &LineStyle::default(),
        );

        let xs: Vec<f64> = geometry.points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = geometry.points.iter().map(|p| p.y).collect();
        assert_eq!(xs, vec![40.0, 165.0, 290.0]);
        assert_eq!(ys, vec![200.0, 100.0, 0.0]);
    }

    #[test]
    fn test_values_below_floor_are_clamped_to_baseline() {
        let geometry = project(
            &samples(&[-500.0, f64::NAN]),
            AxisBounds::new(100.0, 0.0),
            &canvas(),
            &LineStyle::default(),
        );
        assert!(geometry.points.iter().all(|p| p.y == 200.0));
    }

    #[test]
    fn test_degenerate_bounds_are_widened() {
        let bounds = axis_scaler::compute_bounds(&[100.0, 100.0, 100.0], 0.1).unwrap();
        let widened = widen_degenerate(bounds);
        assert_ne!(widened.max, widened.min);
        assert_eq!(widened, AxisBounds::new(101.0, 99.0));

        let geometry = project(&samples(&[100.0, 100.0, 100.0]), bounds, &canvas(), &LineStyle::default());
        assert!(geometry.points.iter().all(|p| p.y.is_finite()));
        assert!(geometry.points.iter().all(|p| p.y == 100.0));
    }

    #[test]
    fn test_zero_values_after_first_are_skipped_from_line() {
        let data = samples(&[0.0, 40.0, 0.0, 80.0]);
        let bounds = AxisBounds::new(100.0, 0.0);

        let geometry = project(&data, bounds, &canvas(), &LineStyle::default());
        assert_eq!(geometry.points.len(), 4);
        let plotted = line_points(&geometry.line_path);
        assert_eq!(plotted, vec![geometry.points[0], geometry.points[1], geometry.points[3]]);

        let keep_zeros = LineStyle {
            skip_zero_values: false,
            ..LineStyle::default()
        };
        let geometry = project(&data, bounds, &canvas(), &keep_zeros);
        assert_eq!(line_points(&geometry.line_path).len(), 4);
    }

    #[test]
    fn test_fill_path_closes_to_baseline() {
        let style = LineStyle {
            fill: true,
            ..LineStyle::default()
        };
        let geometry = project(&samples(&[20.0, 60.0]), AxisBounds::new(100.0, 0.0), &canvas(), &style);

        let fill = geometry.fill_path.expect("fill requested");
        assert_eq!(fill.len(), 5);
        assert_eq!(fill.commands[2], PathCommand::LineTo(ChartPoint::new(290.0, 200.0)));
        assert_eq!(fill.commands[3], PathCommand::LineTo(ChartPoint::new(40.0, 200.0)));
        assert_eq!(fill.commands[4], PathCommand::Close);
    }

    #[test]
    fn test_no_fill_unless_requested_or_for_empty_series() {
        let bounds = AxisBounds::new(100.0, 0.0);
        let geometry = project(&samples(&[20.0, 60.0]), bounds, &canvas(), &LineStyle::default());
        assert!(geometry.fill_path.is_none());

        let style = LineStyle {
            fill: true,
            ..LineStyle::default()
        };
        let geometry = project(&[], bounds, &canvas(), &style);
        assert!(geometry.points.is_empty());
        assert!(geometry.line_path.is_empty());
        assert!(geometry.fill_path.is_none());
    }

    #[test]
    fn test_decoration_value_labels() {
        let formatter = NumericFormatter::new();
        let decoration = decorate(
            &samples(&[1500.0, 2500.0]),
            AxisBounds::new(2600.0, 1400.0),
            &canvas(),
            5,
            0,
            &formatter,
        );

        let labels: Vec<&str> = decoration.horizontal.iter().map(|l| l.label.as_str()).collect();
        let positions: Vec<f64> = decoration.horizontal.iter().map(|l| l.position).collect();
        assert_eq!(labels, vec!["2,600", "2,300", "2,000", "1,700", "1,400"]);
        assert_eq!(positions, vec![0.0, 50.0, 100.0, 150.0, 200.0]);
        assert!(decoration.vertical.is_empty());
    }

    #[test]
    fn test_decoration_fractional_value_labels() {
        let formatter = NumericFormatter::new();
        let decoration = decorate(&samples(&[1.0]), AxisBounds::new(10.0, 0.0), &canvas(), 4, 0, &formatter);
        let labels: Vec<&str> = decoration.horizontal.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["10", "6.67", "3.33", "0"]);
    }

    #[test]
    fn test_decoration_timeline_labels() {
        let formatter = NumericFormatter::new();
        let data = samples(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let decoration = decorate(&data, AxisBounds::new(10.0, 0.0), &canvas(), 0, 3, &formatter);

        let labels: Vec<&str> = decoration.vertical.iter().map(|l| l.label.as_str()).collect();
        let positions: Vec<f64> = decoration.vertical.iter().map(|l| l.position).collect();
        assert_eq!(labels, vec!["d1", "d4", "d7"]);
        assert_eq!(positions, vec![40.0, 165.0, 290.0]);
    }

    #[test]
    fn test_decoration_more_labels_than_samples() {
        let formatter = NumericFormatter::new();
        let data = samples(&[1.0, 2.0]);
        let decoration = decorate(&data, AxisBounds::new(10.0, 0.0), &canvas(), 0, 5, &formatter);

        let labels: Vec<&str> = decoration.vertical.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["d1", "d1", "d2", "d2", "d2"]);
    }

    #[test]
    fn test_line_chart_render() {
        let chart = LineChart::new(ChartConfig::default(), NumericFormatter::new());
        let rendered = chart.render(&samples(&[1500.0, 2500.0, 2000.0])).unwrap();

        assert_eq!(rendered.bounds, AxisBounds::new(2600.0, 1400.0));
        assert_eq!(rendered.geometry.points.len(), 3);
        assert_eq!(rendered.decoration.horizontal.len(), 5);
        assert_eq!(rendered.decoration.vertical.len(), 4);

        assert!(chart.render(&[]).is_none());
        assert!(chart.render(&samples(&[f64::NAN])).is_none());
    }
}
