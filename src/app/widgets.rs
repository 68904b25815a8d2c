use crate::theme::Theme;
use eframe::egui::{self, Widget};

/// 툴바에서 쓰는 단색 버튼 위젯.
pub(super) struct PrimaryButton<'a> {
    theme: &'a Theme,
    label: &'a str,
    icon: &'a str,
}

impl<'a> PrimaryButton<'a> {
    pub(super) fn new(theme: &'a Theme, label: &'a str) -> Self {
        Self {
            theme,
            label,
            icon: "",
        }
    }

    pub(super) fn icon(mut self, icon: &'a str) -> Self {
        self.icon = icon;
        self
    }
}

impl<'a> Widget for PrimaryButton<'a> {
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        let colors = self.theme.colors();
        let enabled = ui.is_enabled();
        let text = if self.icon.is_empty() {
            self.label.to_string()
        } else {
            format!("{}  {}", self.icon, self.label)
        };
        let rich = egui::RichText::new(text).strong().color(if enabled {
            egui::Color32::WHITE
        } else {
            colors.text_secondary
        });
        let fill = if enabled {
            colors.accent
        } else {
            colors.accent.linear_multiply(0.4)
        };
        let response = ui.add(
            egui::Button::new(rich)
                .min_size(egui::vec2(88.0, 28.0))
                .rounding(egui::Rounding::same(6.0))
                .fill(fill),
        );
        if enabled && response.hovered() {
            ui.output_mut(|o| {
                o.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }
        response
    }
}
