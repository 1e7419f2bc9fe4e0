use eframe::egui::{self, Color32, Stroke, Visuals};
use serde::{Deserialize, Serialize};

/// Available theme presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreset {
    #[default]
    Slate,
    Harbor,
}

impl ThemePreset {
    /// Get the theme colors for this preset
    pub fn theme(&self) -> Theme {
        match self {
            ThemePreset::Slate => Theme::slate(),
            ThemePreset::Harbor => Theme::harbor(),
        }
    }
}

/// Theme color definitions
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg_darkest: Color32,
    pub bg_dark: Color32,
    pub bg_medium: Color32,
    pub bg_light: Color32,

    pub text_primary: Color32,
    pub text_muted: Color32,

    pub accent: Color32,
    pub accent_hover: Color32,
    pub accent_muted: Color32,

    pub success: Color32,
    pub error: Color32,

    pub border: Color32,
    pub selection: Color32,
}

impl Theme {
    /// Slate theme - neutral dark default
    pub fn slate() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(15, 17, 21),
            bg_dark: Color32::from_rgb(22, 25, 30),
            bg_medium: Color32::from_rgb(31, 35, 42),
            bg_light: Color32::from_rgb(45, 51, 61),

            text_primary: Color32::from_rgb(248, 250, 252),
            text_muted: Color32::from_rgb(140, 150, 165),

            accent: Color32::from_rgb(99, 160, 255),
            accent_hover: Color32::from_rgb(141, 186, 255),
            accent_muted: Color32::from_rgb(70, 118, 195),

            success: Color32::from_rgb(74, 222, 128),
            error: Color32::from_rgb(248, 113, 113),

            border: Color32::from_rgb(58, 64, 75),
            selection: Color32::from_rgb(99, 160, 255).gamma_multiply(0.3),
        }
    }

    /// Harbor theme - teal accent
    pub fn harbor() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(11, 18, 21),
            bg_dark: Color32::from_rgb(17, 26, 30),
            bg_medium: Color32::from_rgb(24, 36, 41),
            bg_light: Color32::from_rgb(36, 52, 59),

            text_primary: Color32::from_rgb(240, 250, 250),
            text_muted: Color32::from_rgb(125, 150, 155),

            accent: Color32::from_rgb(45, 212, 191),
            accent_hover: Color32::from_rgb(94, 234, 212),
            accent_muted: Color32::from_rgb(30, 150, 135),

            success: Color32::from_rgb(134, 239, 172),
            error: Color32::from_rgb(251, 113, 133),

            border: Color32::from_rgb(45, 65, 72),
            selection: Color32::from_rgb(45, 212, 191).gamma_multiply(0.3),
        }
    }

    /// Apply this theme to egui's visuals
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();

        visuals.window_fill = self.bg_dark;
        visuals.panel_fill = self.bg_dark;
        visuals.faint_bg_color = self.bg_medium;
        visuals.extreme_bg_color = self.bg_darkest;

        visuals.widgets.noninteractive.bg_fill = self.bg_medium;
        visuals.widgets.noninteractive.weak_bg_fill = self.bg_light;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_muted);

        visuals.widgets.inactive.bg_fill = self.bg_medium;
        visuals.widgets.inactive.weak_bg_fill = self.bg_light;
        visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.hovered.bg_fill = self.bg_light;
        visuals.widgets.hovered.weak_bg_fill = self.bg_light;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.active.bg_fill = self.accent_muted;
        visuals.widgets.active.weak_bg_fill = self.accent_muted;
        visuals.widgets.active.bg_stroke = Stroke::new(1.0, self.accent_hover);
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.open.bg_fill = self.bg_light;
        visuals.widgets.open.weak_bg_fill = self.bg_light;
        visuals.widgets.open.bg_stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.open.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.selection.bg_fill = self.selection;
        visuals.selection.stroke = Stroke::new(1.0, self.accent);

        visuals.window_stroke = Stroke::new(1.0, self.border);
        visuals.window_shadow = egui::epaint::Shadow::NONE;
        visuals.popup_shadow = egui::epaint::Shadow::NONE;

        ctx.set_visuals(visuals);
    }
}
