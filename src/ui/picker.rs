//! Cascading selector rendering
//!
//! Layout follows the widget's gating rules: nothing but a spinner during
//! the initial load, a blocking error label if that load failed, otherwise
//! the three selects with each child disabled until its ancestor is chosen.

use eframe::egui::{self, RichText};

use crate::app::GazetteerApp;
use crate::state::CountryLoad;

/// Render the location picker panel
pub fn render_picker(app: &mut GazetteerApp, ui: &mut egui::Ui) {
    let theme = app.theme.clone();

    ui.vertical_centered(|ui| {
        ui.add_space(12.0);
        ui.heading("Select Location");
    });
    ui.add_space(16.0);

    match app.location.countries() {
        CountryLoad::Uninitialized | CountryLoad::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("Loading...").color(theme.text_muted));
            });
            return;
        }
        CountryLoad::Failed(message) => {
            ui.colored_label(theme.error, message);
            return;
        }
        CountryLoad::Ready(_) => {}
    }

    let mut picked_country: Option<String> = None;
    let mut picked_state: Option<String> = None;
    let mut picked_city: Option<String> = None;

    ui.horizontal(|ui| {
        let selection = app.location.selection();

        if let CountryLoad::Ready(countries) = app.location.countries() {
            let selected_text = selection.country().unwrap_or("Select Country").to_string();
            egui::ComboBox::from_id_salt("country_select")
                .selected_text(&selected_text)
                .width(150.0)
                .show_ui(ui, |ui| {
                    for country in countries {
                        let is_selected = selection.country() == Some(country.as_str());
                        if ui.selectable_label(is_selected, country).clicked() {
                            picked_country = Some(country.clone());
                        }
                    }
                });
        }

        let selected_text = selection.state().unwrap_or("Select State").to_string();
        ui.add_enabled_ui(app.location.state_select_enabled(), |ui| {
            egui::ComboBox::from_id_salt("state_select")
                .selected_text(&selected_text)
                .width(150.0)
                .show_ui(ui, |ui| {
                    for state in app.location.state_options() {
                        let is_selected = selection.state() == Some(state.as_str());
                        if ui.selectable_label(is_selected, state).clicked() {
                            picked_state = Some(state.clone());
                        }
                    }
                });
        });

        let selected_text = selection.city().unwrap_or("Select City").to_string();
        ui.add_enabled_ui(app.location.city_select_enabled(), |ui| {
            egui::ComboBox::from_id_salt("city_select")
                .selected_text(&selected_text)
                .width(150.0)
                .show_ui(ui, |ui| {
                    for city in app.location.city_options() {
                        let is_selected = selection.city() == Some(city.as_str());
                        if ui.selectable_label(is_selected, city).clicked() {
                            picked_city = Some(city.clone());
                        }
                    }
                });
        });
    });

    // Apply clicks after the combo boxes release their borrows
    if let Some(country) = picked_country {
        let event = app.location.select_country(country, &app.client);
        app.handle_events(event);
    }
    if let Some(state) = picked_state {
        let event = app.location.select_state(state, &app.client);
        app.handle_events(event);
    }
    if let Some(city) = picked_city {
        let event = app.location.select_city(city);
        app.handle_events(event);
    }

    if let Some(summary) = app.location.selection().summary() {
        ui.add_space(20.0);
        ui.label(
            RichText::new(summary)
                .color(theme.text_primary)
                .size(15.0)
                .strong(),
        );
    }
}
