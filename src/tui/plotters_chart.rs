//! Plotters-powered premium chart widget for Ratatui.
//!
//! Shows the estimate across the year-of-birth range for the current form
//! values, with the selected year highlighted. Rendered into the Ratatui
//! buffer through `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only chart description; all series and bounds are computed by
/// the caller.
pub struct PremiumChart<'a> {
    /// Estimate by year of birth.
    pub curve: &'a [(f64, f64)],
    /// The year currently selected in the form.
    pub marker: Option<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl Widget for PremiumChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(6)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let curve_color = RGBColor(0, 255, 255); // cyan
            let marker_color = RGBColor(0, 255, 0); // green

            chart.draw_series(LineSeries::new(self.curve.iter().copied(), &curve_color))?;

            // `Pixel` rather than `Circle`: the backend maps circle radii to
            // canvas units and draws them far too large.
            if let Some((x, y)) = self.marker {
                chart.draw_series(std::iter::once(Pixel::new((x, y), marker_color)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Chart bounds for a curve, padded 5% vertically.
///
/// Falls back to unit bounds when the curve is empty or flat-degenerate.
pub fn curve_bounds(curve: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in curve {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if !x_min.is_finite() || !x_max.is_finite() || x_max <= x_min {
        x_min = 0.0;
        x_max = 1.0;
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1.0);
    ([x_min, x_max], [y_min - pad, y_max + pad])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_pad_vertically() {
        let (x, y) = curve_bounds(&[(1960.0, 100.0), (2015.0, 300.0)]);
        assert_eq!(x, [1960.0, 2015.0]);
        assert_eq!(y, [90.0, 310.0]);
    }

    #[test]
    fn flat_and_empty_curves_get_usable_bounds() {
        let (_, y) = curve_bounds(&[(1960.0, 50.0), (2015.0, 50.0)]);
        assert!(y[1] > y[0]);

        let (x, y) = curve_bounds(&[]);
        assert!(x[1] > x[0] && y[1] > y[0]);
    }
}
