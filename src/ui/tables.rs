use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use deputy_viewer::data::export::deputy_header;
use deputy_viewer::data::model::{group_thousands, Metric};

use crate::color::HIGHLIGHT;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 20.0;
const MAX_TABLE_HEIGHT: f32 = 340.0;

/// Filtered deputies, with the largest value of every metric highlighted.
pub fn deputies_table(ui: &mut Ui, state: &AppState) {
    ui.heading(format!(
        "📋 Lista de Deputados ({} encontrados)",
        state.visible.len()
    ));
    if state.deputies.is_empty() {
        ui.label("Nenhum dado de deputado carregado.");
        return;
    }
    if state.visible.is_empty() {
        ui.label("Nenhum resultado com os filtros aplicados.");
        return;
    }

    let rows = &state.deputies.rows;
    let visible = &state.visible;
    let maxima = Metric::ALL.map(|m| {
        visible
            .iter()
            .map(|&i| rows[i].metric(m))
            .max()
            .unwrap_or(0)
    });

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::remainder().at_least(200.0))
        .columns(Column::auto().at_least(60.0), 2)
        .columns(Column::auto().at_least(110.0), Metric::ALL.len())
        .max_scroll_height(MAX_TABLE_HEIGHT)
        .header(ROW_HEIGHT, |mut header| {
            for title in deputy_header() {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, visible.len(), |mut row| {
                let d = &rows[visible[row.index()]];
                row.col(|ui| {
                    ui.label(d.display_name());
                });
                row.col(|ui| {
                    ui.label(d.party.as_deref().unwrap_or(""));
                });
                row.col(|ui| {
                    ui.label(d.state.as_deref().unwrap_or(""));
                });
                for (k, metric) in Metric::ALL.into_iter().enumerate() {
                    let value = d.metric(metric);
                    row.col(|ui| {
                        let text = RichText::new(group_thousands(value));
                        if value == maxima[k] {
                            ui.painter().rect_filled(ui.max_rect(), 0.0, HIGHLIGHT);
                            ui.label(text.color(Color32::BLACK));
                        } else {
                            ui.label(text);
                        }
                    });
                }
            });
        });
}

/// The top posts of the current selection.
pub fn posts_table(ui: &mut Ui, state: &AppState) {
    let top = state.top_posts();
    if top.is_empty() {
        return;
    }
    let posts = &state.posts.rows;

    ui.add_space(8.0);
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(160.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::remainder().clip(true))
        .max_scroll_height(MAX_TABLE_HEIGHT)
        .header(ROW_HEIGHT, |mut header| {
            for title in [
                "Date",
                "Parlamentar",
                "Rede",
                "Engajamento total",
                "Top 50 posts",
                "Message",
            ] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, top.len(), |mut row| {
                let p = &posts[top[row.index()]];
                row.col(|ui| {
                    match p.date {
                        Some(d) => ui.label(d.format("%Y-%m-%d %H:%M").to_string()),
                        None => ui.weak("—"),
                    };
                });
                row.col(|ui| {
                    ui.label(p.parliamentarian.as_deref().unwrap_or(""));
                });
                row.col(|ui| {
                    ui.label(p.network.as_deref().unwrap_or(""));
                });
                row.col(|ui| {
                    ui.label(group_thousands(p.total_engagement));
                });
                row.col(|ui| {
                    ui.label(p.rank.as_str());
                });
                row.col(|ui| {
                    ui.label(p.message.as_str()).on_hover_text(p.message.as_str());
                });
            });
        });
}
