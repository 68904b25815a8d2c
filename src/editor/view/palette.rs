use super::*;

impl<'a> WorkflowCanvasUi<'a> {
    /// 노드 팔레트와 줌 컨트롤을 렌더링한다.
    pub(super) fn render_palette(&mut self, ui: &mut egui::Ui) -> Option<NodeType> {
        let colors = self.colors();
        let mut picked = None;
        ui.heading("🧱 노드 팔레트");
        ui.separator();
        ui.label(egui::RichText::new("추가할 노드 유형을 선택하세요.").color(colors.text_secondary));
        ui.add_space(8.0);
        egui::ScrollArea::vertical()
            .id_source("palette_scroll")
            .max_height((ui.available_height() - 90.0).max(120.0))
            .show(ui, |ui| {
                for node_type in NodeType::KNOWN {
                    let entry = NodeTypeRegistry::entry(&node_type);
                    let label = egui::RichText::new(format!("{}  {}", entry.icon, entry.label)).color(entry.color);
                    if ui
                        .add(egui::Button::new(label).min_size(egui::vec2(ui.available_width(), 26.0)))
                        .clicked()
                    {
                        picked = Some(node_type);
                    }
                }
            });
        ui.separator();
        ui.label("🔍 보기");
        ui.horizontal(|ui| {
            let viewport = &mut self.state.viewport;
            if ui.button("−").clicked() {
                viewport.zoom_out();
            }
            ui.label(format!("{:.0}%", viewport.zoom() * 100.0));
            if ui.button("+").clicked() {
                viewport.zoom_in();
            }
            if ui.button("초기화").clicked() {
                viewport.reset();
            }
        });
        picked
    }
}
