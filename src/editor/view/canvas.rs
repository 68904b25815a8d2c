use super::*;

use crate::editor::geometry::ConnectionPath;
use crate::editor::viewport::ScreenFrame;

/// 연결선 hover 판정과 미리보기에 쓰는 분할 수.
const CURVE_SEGMENTS: usize = 24;
/// 연결 삭제 버튼 반지름(화면 픽셀).
const DELETE_BUTTON_RADIUS: f32 = 9.0;
/// 화살표 머리 길이(줌 1.0 기준).
const ARROW_LENGTH: f32 = 10.0;

impl<'a> WorkflowCanvasUi<'a> {
    /// 캔버스를 렌더링하고 노드/연결 상호작용을 처리한다.
    pub(super) fn render_canvas<C: CanvasCallbacks + ?Sized>(
        &mut self,
        ui: &mut egui::Ui,
        callbacks: &mut C,
    ) {
        let colors = self.colors();
        let graph = self.graph;
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, colors.canvas_fill);

        self.handle_keys(ui, rect, callbacks);
        let frame = self.state.viewport.frame(rect.min);
        self.draw_grid(&painter, rect, colors);

        let paths = self.connection_paths(frame);
        self.state.hovered_connection = if self.state.scope.is_listening() {
            None
        } else {
            response
                .hover_pos()
                .and_then(|pos| self.pick_connection(&paths, pos))
        };
        self.draw_connections(&painter, &paths, frame, colors);
        for node in graph.nodes() {
            self.draw_node(&painter, frame, node, colors);
        }
        self.draw_connection_preview(ui, &painter, frame, colors);

        self.route_pointer(ui, &response, rect, &paths, callbacks);
    }

    /// egui 포인터 입력을 상태 기계 이벤트로 바꿔 전달한다.
    ///
    /// 누름은 캔버스 위에서만 받고, 리스너가 등록된 동안에는 창 전체의 이동/해제를 받는다.
    fn route_pointer<C: CanvasCallbacks + ?Sized>(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        rect: egui::Rect,
        paths: &[(usize, ConnectionPath)],
        callbacks: &mut C,
    ) {
        let graph = self.graph;
        let frame = self.state.viewport.frame(rect.min);
        let (pressed, press_pos) =
            ui.input(|i| (i.pointer.primary_pressed(), i.pointer.interact_pos()));
        if pressed {
            if let Some(pos) = press_pos.filter(|pos| response.hovered() && rect.contains(*pos)) {
                if let Some(index) = self.delete_button_hit(paths, pos) {
                    callbacks.on_delete_connection(index);
                    self.state.hovered_connection = None;
                } else {
                    let target = self.settings.node.hit_test(graph, frame.to_graph(pos));
                    self.state.handle(
                        PointerEvent::Down {
                            target,
                            screen: pos,
                        },
                        graph,
                        rect.min,
                        callbacks,
                    );
                }
            }
        }

        if !self.state.scope.is_listening() {
            return;
        }
        let (latest, delta, down, released) = ui.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.delta(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
            )
        });
        let Some(screen) = latest else {
            return;
        };
        if !pressed && delta != egui::Vec2::ZERO {
            self.state
                .handle(PointerEvent::Move { screen }, graph, rect.min, callbacks);
        }
        if released || !down {
            self.state
                .handle(PointerEvent::Up { screen }, graph, rect.min, callbacks);
        }
    }

    /// Escape/포커스 상실은 제스처를 취소하고, 방향키는 화면을 이동한다.
    fn handle_keys<C: CanvasCallbacks + ?Sized>(
        &mut self,
        ui: &egui::Ui,
        rect: egui::Rect,
        callbacks: &mut C,
    ) {
        let (escape, focused) = ui.input(|i| (i.key_pressed(egui::Key::Escape), i.focused));
        let busy = self.state.scope.is_listening() || self.state.controller.connecting_from().is_some();
        if busy && (escape || !focused) {
            self.state
                .handle(PointerEvent::Cancel, self.graph, rect.min, callbacks);
        }

        if ui.ctx().wants_keyboard_input() {
            return;
        }
        let step = self.settings.pan_step;
        let delta = ui.input(|i| {
            [
                (egui::Key::ArrowLeft, egui::vec2(step, 0.0)),
                (egui::Key::ArrowRight, egui::vec2(-step, 0.0)),
                (egui::Key::ArrowUp, egui::vec2(0.0, step)),
                (egui::Key::ArrowDown, egui::vec2(0.0, -step)),
            ]
            .into_iter()
            .filter(|(key, _)| i.key_pressed(*key))
            .fold(egui::Vec2::ZERO, |acc, (_, d)| acc + d)
        });
        if delta != egui::Vec2::ZERO {
            self.state.viewport.pan_by(delta);
        }
    }

    /// 팬/줌을 따라가는 배경 격자를 그린다.
    fn draw_grid(&self, painter: &egui::Painter, rect: egui::Rect, colors: CanvasColors) {
        let grid = self.state.viewport.grid(self.settings.grid_spacing);
        let stroke = Stroke::new(1.0, colors.grid_line);
        for x in grid.vertical_lines(rect) {
            painter.line_segment([egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())], stroke);
        }
        for y in grid.horizontal_lines(rect) {
            painter.line_segment([egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)], stroke);
        }
    }

    /// 그릴 수 있는 연결의 화면 좌표 곡선. 인덱스는 문서 연결 배열 기준이다.
    fn connection_paths(&self, frame: ScreenFrame) -> Vec<(usize, ConnectionPath)> {
        let metrics = self.settings.node;
        self.graph
            .resolved_connections()
            .iter()
            .filter_map(|conn| {
                let (from, to) = metrics.connection_endpoints(conn)?;
                let path = geometry::curve(from.into(), to.into()).map(|p| frame.to_screen(p.into()));
                Some((conn.index, path))
            })
            .collect()
    }

    /// 포인터에 가장 가까운 연결. 허용 거리 밖이면 None.
    fn pick_connection(&self, paths: &[(usize, ConnectionPath)], pointer: egui::Pos2) -> Option<usize> {
        let tolerance = self.settings.hover_tolerance;
        paths
            .iter()
            .filter_map(|(index, path)| {
                let on_button = self.state.hovered_connection == Some(*index)
                    && pointer.distance(Self::delete_button_center(path)) <= DELETE_BUTTON_RADIUS;
                let distance = path.distance_to(pointer, CURVE_SEGMENTS);
                (on_button || distance <= tolerance).then_some((*index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    fn delete_button_center(path: &ConnectionPath) -> egui::Pos2 {
        geometry::midpoint(path.start, path.end)
    }

    fn delete_button_hit(&self, paths: &[(usize, ConnectionPath)], pointer: egui::Pos2) -> Option<usize> {
        let hovered = self.state.hovered_connection?;
        paths
            .iter()
            .find(|(index, _)| *index == hovered)
            .filter(|(_, path)| pointer.distance(Self::delete_button_center(path)) <= DELETE_BUTTON_RADIUS)
            .map(|(index, _)| *index)
    }

    /// 연결선과 화살표, hover된 연결의 삭제 버튼을 그린다.
    fn draw_connections(
        &self,
        painter: &egui::Painter,
        paths: &[(usize, ConnectionPath)],
        frame: ScreenFrame,
        colors: CanvasColors,
    ) {
        let width = frame.viewport.scale(2.0).max(1.0);
        for (index, path) in paths {
            let hovered = self.state.hovered_connection == Some(*index);
            let color = if hovered {
                colors.connection_hover
            } else {
                colors.connection
            };
            painter.add(CubicBezierShape::from_points_stroke(
                path.points(),
                false,
                egui::Color32::TRANSPARENT,
                Stroke::new(if hovered { width * 1.5 } else { width }, color),
            ));
            Self::draw_arrow_head(painter, path, frame.viewport.scale(ARROW_LENGTH), color);
            if hovered {
                let center = Self::delete_button_center(path);
                painter.circle_filled(center, DELETE_BUTTON_RADIUS, colors.delete_button);
                painter.text(
                    center,
                    egui::Align2::CENTER_CENTER,
                    "×",
                    egui::FontId::proportional(14.0),
                    egui::Color32::WHITE,
                );
            }
        }
    }

    fn draw_arrow_head(painter: &egui::Painter, path: &ConnectionPath, length: f32, color: egui::Color32) {
        let dir = path.end_direction();
        let normal = egui::vec2(-dir.y, dir.x);
        let tip = path.end;
        let base = tip - dir * length;
        painter.add(egui::Shape::convex_polygon(
            vec![tip, base + normal * length * 0.5, base - normal * length * 0.5],
            color,
            Stroke::NONE,
        ));
    }

    /// 개별 노드를 드로잉한다.
    fn draw_node(&self, painter: &egui::Painter, frame: ScreenFrame, node: &Node, colors: CanvasColors) {
        let metrics = self.settings.node;
        let viewport = frame.viewport;
        let rect = frame.rect_to_screen(metrics.rect(node));
        let entry = NodeTypeRegistry::entry(&node.node_type);
        let selected = self.state.selected_node_id() == Some(&node.id);
        let fill = if self.state.controller.is_dragging(&node.id) {
            colors.node_dragging
        } else {
            colors.node_fill
        };
        let rounding = viewport.scale(8.0);
        painter.rect_filled(rect, rounding, fill);
        let border = if selected {
            Stroke::new(viewport.scale(2.5), entry.color)
        } else {
            Stroke::new(viewport.scale(1.2), colors.node_border)
        };
        painter.rect_stroke(rect, rounding, border);
        painter.rect_filled(
            egui::Rect::from_min_size(rect.min, egui::vec2(viewport.scale(4.0), rect.height())),
            rounding,
            entry.color,
        );

        painter.text(
            rect.min + egui::vec2(viewport.scale(14.0), viewport.scale(12.0)),
            egui::Align2::LEFT_TOP,
            format!("{} {}", entry.icon, node.name),
            egui::FontId::proportional(viewport.scale(15.0)),
            colors.text_primary,
        );
        painter.text(
            rect.min + egui::vec2(viewport.scale(14.0), viewport.scale(40.0)),
            egui::Align2::LEFT_TOP,
            entry.label,
            egui::FontId::proportional(viewport.scale(12.0)),
            colors.text_secondary,
        );

        let radius = viewport.scale(metrics.handle_radius);
        let connecting = self.state.controller.connecting_from();
        if let Some(input) = metrics.input_anchor(node) {
            let candidate = connecting
                .is_some_and(|source| self.graph.validate_connection(source, &node.id).is_ok());
            let color = if candidate {
                colors.handle_target
            } else {
                colors.handle_fill
            };
            painter.circle_filled(frame.to_screen(input), radius, color);
        }
        let output_color = if connecting == Some(&node.id) {
            entry.color
        } else {
            colors.handle_fill
        };
        painter.circle_filled(frame.to_screen(metrics.output_anchor(node)), radius, output_color);
    }

    /// 연결 중이면 출발 핸들에서 포인터까지 점선 곡선을 그린다.
    fn draw_connection_preview(
        &self,
        ui: &egui::Ui,
        painter: &egui::Painter,
        frame: ScreenFrame,
        colors: CanvasColors,
    ) {
        let Some(source) = self
            .state
            .controller
            .connecting_from()
            .and_then(|id| self.graph.node(id))
        else {
            return;
        };
        let Some(pointer) = ui.input(|i| i.pointer.latest_pos()) else {
            return;
        };
        let start = frame.to_screen(self.settings.node.output_anchor(source));
        let path = geometry::curve(start, pointer);
        painter.extend(egui::Shape::dashed_line(
            &path.sample(CURVE_SEGMENTS),
            Stroke::new(frame.viewport.scale(2.0).max(1.0), colors.connection_hover),
            6.0,
            4.0,
        ));
    }
}
