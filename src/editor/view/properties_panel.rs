use super::*;

use crate::editor::registry::FieldSpec;

impl<'a> WorkflowCanvasUi<'a> {
    /// 우측 속성 패널을 렌더링한다.
    ///
    /// 입력값은 매 프레임 스냅샷에서 다시 채우고, 바뀐 값은 패치로만 내보낸다.
    pub(super) fn render_properties<C: CanvasCallbacks + ?Sized>(
        &mut self,
        ui: &mut egui::Ui,
        callbacks: &mut C,
    ) {
        let colors = self.colors();
        let graph = self.graph;
        ui.heading("⚙ 노드 속성");
        ui.separator();
        let Some(node) = self.state.selected_node_id().and_then(|id| graph.node(id)) else {
            self.state.properties.bind(None);
            ui.label(egui::RichText::new("노드를 선택하면 설정을 편집할 수 있습니다.").color(colors.text_secondary));
            return;
        };
        self.state.properties.bind(Some(&node.id));
        let entry = NodeTypeRegistry::entry(&node.node_type);

        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!("{} {}", entry.icon, entry.label))
                    .color(entry.color)
                    .strong(),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("✖").on_hover_text("닫기").clicked() {
                    callbacks.on_close_properties();
                }
            });
        });
        ui.label(egui::RichText::new(format!("ID: {}", node.id)).color(colors.text_secondary));
        ui.label(egui::RichText::new(format!("유형: {}", node.node_type)).color(colors.text_secondary));
        ui.add_space(6.0);

        ui.label("이름");
        let mut name = node.name.clone();
        if ui.text_edit_singleline(&mut name).changed() {
            callbacks.on_update(&node.id, NodePatch::Rename(name));
        }
        ui.separator();

        for field in properties::visible_fields(entry.fields, &node.config) {
            ui.label(field.label);
            if let Some(patch) = self.render_field(ui, node, field) {
                callbacks.on_update(&node.id, patch);
            }
            ui.add_space(4.0);
        }

        ui.separator();
        if ui
            .add(egui::Button::new(egui::RichText::new("🗑 노드 삭제").color(colors.error)))
            .clicked()
        {
            callbacks.on_delete_node(&node.id);
        }
    }

    /// 필드 하나를 그리고 값이 바뀌었으면 패치를 돌려준다.
    fn render_field(&mut self, ui: &mut egui::Ui, node: &Node, field: &FieldSpec) -> Option<NodePatch> {
        let set = |value: serde_yaml::Value| NodePatch::SetConfig {
            key: field.key.to_string(),
            value,
        };
        match field.kind {
            FieldKind::Text => {
                let mut buf = properties::text_value(&node.config, field.key);
                ui.text_edit_singleline(&mut buf)
                    .changed()
                    .then(|| set(buf.into()))
            }
            FieldKind::MultilineText => {
                let mut buf = properties::text_value(&node.config, field.key);
                ui.add(
                    egui::TextEdit::multiline(&mut buf)
                        .desired_rows(4)
                        .code_editor(),
                )
                .changed()
                .then(|| set(buf.into()))
            }
            FieldKind::Choice { options, .. } => {
                let current = properties::choice_value(&node.config, field);
                let selected_text = options
                    .iter()
                    .find(|opt| Some(opt.value) == current.as_deref())
                    .map(|opt| opt.label)
                    .unwrap_or("선택하세요");
                let mut picked = None;
                egui::ComboBox::from_id_source(("node_field", node.id.as_str(), field.key))
                    .selected_text(selected_text)
                    .show_ui(ui, |ui| {
                        for opt in options {
                            let is_current = Some(opt.value) == current.as_deref();
                            if ui.selectable_label(is_current, opt.label).clicked() && !is_current {
                                picked = Some(opt.value);
                            }
                        }
                    });
                picked.map(|value| set(value.into()))
            }
            FieldKind::Number { .. } => {
                let current = properties::number_field_value(&node.config, field);
                let buf = self.state.properties.number_buffer(field.key, current);
                if ui.text_edit_singleline(buf).changed() {
                    self.state.properties.parse_number(field.key)
                } else {
                    None
                }
            }
        }
    }
}
