use eframe::egui::{self, Color32, ScrollArea, Ui};

use deputy_viewer::api::{PARTIES, UFS};

use crate::state::{AppState, LookupState};

/// Search form for the open-data API and its results.
pub fn lookup_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Buscar Deputados Federais");

    ui.label("Nome do Deputado (opcional):");
    ui.text_edit_singleline(&mut state.lookup_query.nome);

    ui.horizontal(|ui: &mut Ui| {
        code_combo(ui, "UF (Estado)", "lookup_uf", &mut state.lookup_query.sigla_uf, &UFS);
        code_combo(
            ui,
            "Partido",
            "lookup_partido",
            &mut state.lookup_query.sigla_partido,
            &PARTIES,
        );
    });

    if ui.button("Buscar").clicked() {
        state.run_lookup();
    }
    ui.separator();

    match &state.lookup {
        LookupState::Idle => {}
        LookupState::NoResults => {
            ui.colored_label(
                Color32::from_rgb(0xc0, 0x8a, 0x00),
                "Nenhum deputado encontrado com os filtros selecionados.",
            );
        }
        LookupState::Failed(msg) => {
            ui.colored_label(Color32::RED, msg.as_str());
        }
        LookupState::Found(cards) => {
            ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                for card in cards {
                    ui.horizontal(|ui: &mut Ui| {
                        ui.add(egui::Image::new(card.url_foto.as_str()).max_width(100.0));
                        ui.vertical(|ui: &mut Ui| {
                            ui.heading(card.nome.as_str());
                            ui.label(format!("- Partido: {}", card.sigla_partido));
                            ui.label(format!("- UF: {}", card.sigla_uf));
                            if let Some(email) = &card.email {
                                ui.label(format!("- E-mail: {email}"));
                            }
                        });
                    });
                    ui.separator();
                }
            });
        }
    }
}

/// Dropdown over fixed codes; the empty string means "any".
fn code_combo(ui: &mut Ui, label: &str, id: &str, value: &mut String, codes: &[&str]) {
    ui.label(label);
    let shown = if value.is_empty() { "—" } else { value.as_str() };
    egui::ComboBox::from_id_salt(id)
        .selected_text(shown.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(value, String::new(), "—");
            for code in codes {
                ui.selectable_value(value, code.to_string(), *code);
            }
        });
}
