use std::ops::RangeInclusive;

use chrono::{DateTime, NaiveDateTime};
use eframe::egui::{Color32, Ui};
use egui_plot::{GridMark, Legend, Line, LineStyle, Plot, PlotPoint, PlotPoints};

use crate::color::channel_colors;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Time axis helpers
// ---------------------------------------------------------------------------

fn to_x(ts: NaiveDateTime) -> f64 {
    ts.and_utc().timestamp() as f64
}

fn from_x(x: f64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(x.round() as i64, 0).map(|dt| dt.naive_utc())
}

fn format_date_mark(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    from_x(mark.value)
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn format_hover(name: &str, point: &PlotPoint) -> String {
    let when = from_x(point.x)
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();
    if name.is_empty() {
        format!("{when}\n{:.2} °C", point.y)
    } else {
        format!("{name}\n{when}\n{:.2} °C", point.y)
    }
}

fn dashed(points: Vec<[f64; 2]>, name: &str, color: Color32) -> Line<'static> {
    Line::new(PlotPoints::from(points))
        .name(name)
        .color(color.gamma_multiply(0.5))
        .style(LineStyle::dashed_loose())
}

// ---------------------------------------------------------------------------
// Time-series chart
// ---------------------------------------------------------------------------

/// One line per channel over the selected window. Hovering moves the
/// depth-profile instant.
pub fn time_series_plot(ui: &mut Ui, state: &mut AppState, height: f32) {
    let Some(window) = &state.window else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Load a dataset to view readings  (File → Open CSV…)");
        });
        return;
    };

    let colors = channel_colors(window.channels().len());
    let reference = ui.visuals().text_color();

    let response = Plot::new("time_series")
        .legend(Legend::default())
        .height(height)
        .x_axis_formatter(format_date_mark)
        .label_formatter(format_hover)
        .y_axis_label("Temperature (°C)")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (ch, channel) in window.channels().iter().enumerate() {
                let points: PlotPoints = window
                    .records()
                    .iter()
                    .map(|r| [to_x(r.timestamp), r.values[ch]])
                    .collect();
                plot_ui.line(Line::new(points).name(&channel.name).color(colors[ch]).width(1.5));
            }

            if let Some((first, last)) = window.time_span() {
                plot_ui.line(dashed(
                    vec![[to_x(first), 0.0], [to_x(last), 0.0]],
                    "Freezing Point",
                    reference,
                ));
            }

            plot_ui.pointer_coordinate().map(|p| p.x)
        });

    if response.response.hovered() {
        if let Some(at) = response.inner.and_then(from_x) {
            state.hover(at);
        }
    }
}

// ---------------------------------------------------------------------------
// Depth-profile (trumpet curve) chart
// ---------------------------------------------------------------------------

/// Temperature against depth at the selected instant, bounded by the
/// envelope records.
pub fn depth_profile_plot(ui: &mut Ui, state: &AppState) {
    let Some(session) = &state.session else {
        return;
    };
    let channels = session.table.channels();
    let depths: Vec<f64> = channels
        .iter()
        .enumerate()
        .map(|(i, ch)| ch.plot_depth(i))
        .collect();
    let (shallowest, deepest) = depths
        .iter()
        .fold((f64::NEG_INFINITY, f64::INFINITY), |(hi, lo), &d| (hi.max(d), lo.min(d)));

    let record = state.selected_record();
    match record {
        Some(r) => ui.label(format!("Ground depth profile at {}", r.timestamp.format("%Y-%m-%d %H:%M:%S"))),
        None => ui.label("Hover the time series to pick an instant"),
    };

    let profile = |values: &[f64]| -> Vec<[f64; 2]> {
        values.iter().zip(&depths).map(|(&v, &d)| [v, d]).collect()
    };

    let reference = ui.visuals().text_color();
    let line_color = channel_colors(1).first().copied().unwrap_or(Color32::LIGHT_BLUE);
    let [x_min, x_max] = state.config.profile_range;

    Plot::new("depth_profile")
        .legend(Legend::default())
        .include_x(x_min)
        .include_x(x_max)
        .x_axis_label("Temperature (°C)")
        .y_axis_label("Depth (m)")
        .show(ui, |plot_ui| {
            if let Some(r) = record {
                plot_ui.line(
                    Line::new(PlotPoints::from(profile(&r.values)))
                        .name("Ground Depth")
                        .color(line_color)
                        .width(2.0),
                );
            }

            plot_ui.line(dashed(
                vec![[0.0, deepest], [0.0, shallowest]],
                "Freezing Point",
                reference,
            ));

            if let Some(env) = &session.envelope {
                let max_name = format!("Max ({:.1} °C)", env.max_value());
                let min_name = format!("Min ({:.1} °C)", env.min_value());
                plot_ui.line(dashed(profile(&env.max_record.values), &max_name, reference));
                plot_ui.line(dashed(profile(&env.min_record.values), &min_name, reference));
            }
        });
}
