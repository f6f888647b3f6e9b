use std::collections::BTreeMap;

use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, Text};

use deputy_viewer::data::model::Metric;

use crate::color::metric_color;
use crate::state::AppState;

/// One horizontal bar of a ranking chart.
struct RankedBar {
    label: String,
    value: u64,
    /// Legend entry the bar belongs to.
    series: String,
    color: Color32,
}

// ---------------------------------------------------------------------------
// Deputies: one chart per metric
// ---------------------------------------------------------------------------

/// Three side-by-side top-N charts of the filtered deputies.
pub fn metric_charts(ui: &mut Ui, state: &AppState) {
    ui.heading("📈 Visualização de Engajamento por Plataforma");
    if state.visible.is_empty() {
        return;
    }

    ui.columns(Metric::ALL.len(), |cols: &mut [Ui]| {
        for (i, metric) in Metric::ALL.into_iter().enumerate() {
            let ui = &mut cols[i];
            ui.strong(metric.platform());

            let bars: Vec<RankedBar> = state
                .top(metric)
                .into_iter()
                .map(|row| {
                    let d = &state.deputies.rows[row];
                    RankedBar {
                        label: d.display_name().to_string(),
                        value: d.metric(metric),
                        series: metric.platform().to_string(),
                        color: metric_color(i),
                    }
                })
                .collect();

            ranking_chart(
                ui,
                &format!("chart_{metric}"),
                &format!("Top {} por {}", state.top_n, metric.caption()),
                metric.caption(),
                &bars,
                false,
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Posts: one chart coloured by network
// ---------------------------------------------------------------------------

pub fn posts_chart(ui: &mut Ui, state: &AppState) {
    if state.posts.is_empty() {
        return;
    }
    let top = state.top_posts();
    if top.is_empty() {
        ui.label("Nenhum post encontrado.");
        return;
    }

    let bars: Vec<RankedBar> = top
        .into_iter()
        .map(|row| {
            let p = &state.posts.rows[row];
            RankedBar {
                label: p.parliamentarian.clone().unwrap_or_default(),
                value: p.total_engagement,
                series: p.network.clone().unwrap_or_else(|| "—".to_string()),
                color: state.network_colors.color_for(p.network.as_deref()),
            }
        })
        .collect();

    ranking_chart(
        ui,
        "posts_chart",
        &format!("Top {} Posts por Engajamento", state.top_posts_n),
        "Engajamento Total",
        &bars,
        true,
    );
}

// ---------------------------------------------------------------------------
// Shared horizontal ranking chart
// ---------------------------------------------------------------------------

/// Largest bar on top; each bar is labelled with its name at the axis.
fn ranking_chart(
    ui: &mut Ui,
    id: &str,
    title: &str,
    x_label: &str,
    bars: &[RankedBar],
    legend: bool,
) {
    ui.label(RichText::new(title).strong());
    if bars.is_empty() {
        return;
    }

    let n = bars.len();
    let position = |rank: usize| (n - rank) as f64;

    let mut series: BTreeMap<&str, (Color32, Vec<Bar>)> = BTreeMap::new();
    for (rank, b) in bars.iter().enumerate() {
        let bar = Bar::new(position(rank), b.value as f64)
            .name(&b.label)
            .width(0.7);
        series
            .entry(b.series.as_str())
            .or_insert_with(|| (b.color, Vec::new()))
            .1
            .push(bar);
    }

    let mut plot = Plot::new(id)
        .height(22.0 * n as f32 + 50.0)
        .x_axis_label(x_label)
        .show_axes([true, false])
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false);
    if legend {
        plot = plot.legend(Legend::default());
    }

    plot.show(ui, |plot_ui| {
        for (name, (color, group)) in series {
            plot_ui.bar_chart(BarChart::new(group).horizontal().color(color).name(name));
        }
        for (rank, b) in bars.iter().enumerate() {
            plot_ui.text(
                Text::new(PlotPoint::new(0.0, position(rank)), format!(" {}", b.label))
                    .anchor(Align2::LEFT_CENTER)
                    .color(Color32::BLACK),
            );
        }
    });
}
