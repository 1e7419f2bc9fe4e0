use eframe::egui;

use crate::api::LocationClient;
use crate::config::Config;
use crate::state::{LocationState, StateEvent};
use crate::ui;
use crate::ui::theme::Theme;

/// Main application state
pub struct GazetteerApp {
    /// Application configuration
    pub(crate) config: Config,
    /// Location service client
    pub(crate) client: LocationClient,
    /// Cascading selector state
    pub(crate) location: LocationState,
    /// Current theme
    pub(crate) theme: Theme,
    /// Whether theme needs to be applied
    theme_dirty: bool,
    /// Status message for the status bar
    status_message: String,
}

impl GazetteerApp {
    /// Create a new application instance
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config, client: LocationClient) -> Self {
        let theme = config.launcher.theme.theme();

        let mut app = Self {
            config,
            client,
            location: LocationState::default(),
            theme,
            theme_dirty: true, // Apply theme on first frame
            status_message: "Ready".to_string(),
        };

        // Fetch the country list on startup; the widget shows a spinner
        // until it completes
        let event = app.location.begin(&app.client);
        app.handle_events(event);

        app
    }

    /// Route state events to the status bar and the log
    pub(crate) fn handle_events(&mut self, events: impl IntoIterator<Item = StateEvent>) {
        for event in events {
            match event {
                StateEvent::StatusMessage(msg) => self.status_message = msg,
                StateEvent::LogInfo(msg) => tracing::info!("{}", msg),
                StateEvent::LogError(msg) => tracing::error!("{}", msg),
            }
        }
    }
}

impl eframe::App for GazetteerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.theme_dirty {
            self.theme.apply(ctx);
            self.theme_dirty = false;
        }

        // Poll async fetches
        let events = self.location.poll(ctx);
        self.handle_events(events);

        // Status bar at bottom
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(&self.config.service.base_url)
                            .color(self.theme.text_muted)
                            .size(11.0),
                    );
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui::render_picker(self, ui);
        });
    }
}
