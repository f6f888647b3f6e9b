use std::collections::BTreeSet;

use chrono::{Duration, Local};
use eframe::egui::{self, Color32, RichText, Ui};

use deputy_viewer::data::export::EXPORT_FILE_NAME;
use deputy_viewer::data::filter::Choice;
use deputy_viewer::data::source::Upload;

use crate::state::{AppState, Tab, UploadSlot, TOP_N_RANGE, TOP_POSTS_RANGE};

const ALL_STATES: &str = "Todas";
const ALL_PARTIES: &str = "Todos";
const ALL_NETWORKS: &str = "Todas";

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Arquivo", |ui: &mut Ui| {
            if ui.button("CSV de Deputados…").clicked() {
                open_upload_dialog(state, UploadSlot::Deputies);
                ui.close_menu();
            }
            if ui.button("CSV de Engajamento (junção)…").clicked() {
                open_upload_dialog(state, UploadSlot::Engagement);
                ui.close_menu();
            }
            if ui.button("CSV de Posts…").clicked() {
                open_upload_dialog(state, UploadSlot::Posts);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Recarregar arquivos padrão").clicked() {
                state.reset_sources();
                state.status_message = None;
                ui.close_menu();
            }
            ui.separator();
            let can_export = !state.visible.is_empty();
            if ui
                .add_enabled(can_export, egui::Button::new("📥 Baixar dados filtrados…"))
                .clicked()
            {
                save_export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} deputados carregados, {} visíveis · {} posts",
            state.deputies.len(),
            state.visible.len(),
            state.posts.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, Tab::Deputies, "📋 Deputados");
        ui.selectable_value(&mut state.tab, Tab::Posts, "📱 Posts");
        ui.selectable_value(&mut state.tab, Tab::Lookup, "🔍 Buscar na Câmara");
    });
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔽 Arquivos");
    upload_line(ui, state, UploadSlot::Deputies, "Deputados");
    upload_line(ui, state, UploadSlot::Engagement, "Engajamento");
    upload_line(ui, state, UploadSlot::Posts, "Posts");

    ui.add_space(6.0);
    ui.heading("📋 Filtros");
    ui.separator();

    if let Some(err) = &state.deputies_error {
        ui.label(RichText::new(err).color(Color32::RED));
    }
    if state.deputies.is_empty() {
        ui.label("Nenhum dado de deputado carregado.");
        return;
    }

    let before = state.filters.clone();
    let states = state.deputies.states.clone();
    let parties = state.deputies.parties.clone();

    choice_combo(ui, "UF:", "uf", &mut state.filters.state, ALL_STATES, &states);
    choice_combo(
        ui,
        "Partido:",
        "partido",
        &mut state.filters.party,
        ALL_PARTIES,
        &parties,
    );

    ui.label("🔍 Nome do Deputado:");
    ui.text_edit_singleline(&mut state.filters.name_substring);

    if state.filters != before {
        state.refilter();
    }

    ui.add_space(6.0);
    ui.add(egui::Slider::new(&mut state.top_n, TOP_N_RANGE).text("Top N"));
}

fn upload_line(ui: &mut Ui, state: &mut AppState, slot: UploadSlot, label: &str) {
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("📂").clicked() {
            open_upload_dialog(state, slot);
        }
        let origin = if state.has_upload(slot) {
            "upload"
        } else {
            "padrão"
        };
        ui.label(format!("{label} ({origin})"));
    });
}

/// Dropdown with the "all" entry first, then every value of `domain`.
fn choice_combo(
    ui: &mut Ui,
    label: &str,
    id: &str,
    choice: &mut Choice,
    all_label: &str,
    domain: &BTreeSet<String>,
) {
    ui.label(label);
    let selected = choice.label(all_label).to_string();
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected)
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(choice, Choice::All, all_label);
            for value in domain {
                ui.selectable_value(choice, Choice::Only(value.clone()), value.as_str());
            }
        });
}

// ---------------------------------------------------------------------------
// Posts controls
// ---------------------------------------------------------------------------

pub fn posts_controls(ui: &mut Ui, state: &mut AppState) {
    ui.heading("📱 Top N Posts por Engajamento");

    if let Some(err) = &state.posts_error {
        ui.label(RichText::new(err).color(Color32::RED));
    }
    if state.posts.is_empty() {
        return;
    }

    let before = state.post_filter.clone();
    let networks = state.posts.networks.clone();

    ui.horizontal(|ui: &mut Ui| {
        choice_combo(
            ui,
            "Filtrar por Rede Social:",
            "rede",
            &mut state.post_filter.network,
            ALL_NETWORKS,
            &networks,
        );
    });

    ui.horizontal(|ui: &mut Ui| {
        let mut ranged = state.post_filter.from.is_some() || state.post_filter.to.is_some();
        if ui.checkbox(&mut ranged, "Período").changed() {
            if ranged {
                let today = Local::now().date_naive();
                state.post_filter.from = Some(today - Duration::days(30));
                state.post_filter.to = Some(today);
            } else {
                state.post_filter.from = None;
                state.post_filter.to = None;
            }
        }
        if let Some(from) = state.post_filter.from.as_mut() {
            ui.label("de");
            ui.add(egui_extras::DatePickerButton::new(from).id_salt("posts_from"));
        }
        if let Some(to) = state.post_filter.to.as_mut() {
            ui.label("até");
            ui.add(egui_extras::DatePickerButton::new(to).id_salt("posts_to"));
        }
    });

    if state.post_filter != before {
        state.refilter_posts();
    }

    ui.add(
        egui::Slider::new(&mut state.top_posts_n, TOP_POSTS_RANGE)
            .text("Número de Posts no Gráfico"),
    );
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_upload_dialog(state: &mut AppState, slot: UploadSlot) {
    let title = match slot {
        UploadSlot::Deputies => "CSV de Deputados",
        UploadSlot::Engagement => "CSV de Engajamento",
        UploadSlot::Posts => "CSV de Posts",
    };
    let Some(path) = rfd::FileDialog::new()
        .set_title(title)
        .add_filter("CSV", &["csv"])
        .pick_file()
    else {
        return;
    };

    match Upload::read(&path) {
        Ok(upload) => {
            log::info!("Uploaded {} ({} bytes)", upload.name, upload.bytes.len());
            state.set_upload(slot, upload);
            state.status_message = None;
        }
        Err(e) => {
            log::error!("Failed to read {}: {e}", path.display());
            state.status_message = Some(format!("Erro ao ler {}: {e}", path.display()));
        }
    }
}

pub fn save_export_dialog(state: &mut AppState) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Baixar dados filtrados")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return;
    };

    match state.export_visible(&path) {
        Ok(()) => state.status_message = None,
        Err(e) => {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Erro: {e:#}"));
        }
    }
}
