use super::WorkflowCanvasApp;
use super::widgets::PrimaryButton;
use crate::editor::interaction::InteractionState;
use eframe::egui::{self, RichText};

impl WorkflowCanvasApp {
    /// Ctrl+S / Ctrl+O 단축키를 처리한다.
    pub(super) fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let save = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S);
        let open = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
        if ctx.input_mut(|i| i.consume_shortcut(&save)) {
            self.save();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&open)) {
            self.open_dialog();
        }
    }

    /// 상단 툴바를 그린다.
    pub(super) fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        let colors = *self.theme.colors();
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label(
                RichText::new("🛠 Workflow Canvas")
                    .size(20.0)
                    .color(colors.text_primary)
                    .strong(),
            );
            ui.add_space(16.0);
            if ui.add(PrimaryButton::new(&self.theme, "새로 만들기").icon("📄")).clicked() {
                self.new_document();
            }
            if ui.add(PrimaryButton::new(&self.theme, "열기").icon("📂")).clicked() {
                self.open_dialog();
            }
            if ui.add(PrimaryButton::new(&self.theme, "저장").icon("💾")).clicked() {
                self.save();
            }
            if ui
                .add(PrimaryButton::new(&self.theme, "다른 이름으로").icon("💾"))
                .clicked()
            {
                self.save_as();
            }
        });
        let dirty = if self.dirty { " (수정됨)" } else { "" };
        let file = match &self.document_path {
            Some(path) => format!("파일 · {}{}", path.display(), dirty),
            None => format!("저장되지 않은 문서 · {}{}", self.document.name, dirty),
        };
        ui.label(RichText::new(file).color(colors.text_secondary));
        if let Some(err) = &self.last_error {
            ui.label(RichText::new(err).color(colors.error).strong());
        }
        ui.add_space(4.0);
    }

    /// 하단 상태 표시줄을 그린다.
    pub(super) fn render_status(&mut self, ui: &mut egui::Ui) {
        let colors = *self.theme.colors();
        let dangling = self.document.dangling_connections();
        let mode = match self.canvas.controller.state() {
            InteractionState::Idle => "대기".to_string(),
            InteractionState::Dragging(session) => format!("이동 중 · {}", session.node_id()),
            InteractionState::Connecting { source } => format!("연결 중 · {source} → 입력 핸들을 클릭하세요"),
        };
        ui.horizontal(|ui| {
            ui.label(format!("노드 {}", self.document.nodes.len()));
            ui.separator();
            ui.label(format!("연결 {}", self.document.connections.len()));
            if dangling > 0 {
                ui.label(RichText::new(format!("(그려지지 않는 연결 {dangling})")).color(colors.error));
            }
            ui.separator();
            ui.label(format!("줌 {:.0}%", self.canvas.viewport.zoom() * 100.0));
            ui.separator();
            ui.label(RichText::new(mode).color(colors.text_secondary));
            if let Some(id) = self.canvas.selected_node_id() {
                ui.separator();
                ui.label(format!("선택 · {id}"));
            }
        });
    }
}
