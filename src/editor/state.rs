use eframe::egui;

use super::interaction::{NodeInteractionController, PointerEvent, WindowPointerScope};
use super::model::{CanvasCallbacks, GraphSnapshot, NodeId};
use super::properties::PropertyEditorState;
use super::viewport::Viewport;

/// 캔버스가 소유하는 일시적 UI 상태이다. 저장되지 않는다.
#[derive(Debug, Default)]
pub struct CanvasState {
    /// 선택/드래그/연결 상태 기계.
    pub controller: NodeInteractionController,
    /// 줌과 팬.
    pub viewport: Viewport,
    /// 드래그 중 창 단위 포인터 리스너.
    pub scope: WindowPointerScope,
    /// 속성 패널 입력 버퍼.
    pub properties: PropertyEditorState,
    /// 포인터가 올라간 연결의 인덱스.
    pub hovered_connection: Option<usize>,
}

impl CanvasState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_node_id(&self) -> Option<&NodeId> {
        self.controller.selected_node_id()
    }

    /// 선택을 바꾼다.
    pub fn select<C: CanvasCallbacks + ?Sized>(&mut self, id: Option<NodeId>, callbacks: &mut C) {
        self.controller.select(id, callbacks);
    }

    /// 화면 좌표 이벤트 하나를 상태 기계에 전달한다.
    pub fn handle<C: CanvasCallbacks + ?Sized>(
        &mut self,
        event: PointerEvent,
        graph: GraphSnapshot<'_>,
        origin: egui::Pos2,
        callbacks: &mut C,
    ) {
        let frame = self.viewport.frame(origin);
        self.controller
            .handle(event, graph, frame, &mut self.scope, callbacks);
    }

    /// 호스트가 갱신한 스냅샷에 맞춰 사라진 노드/연결을 가리키는 상태를 지운다.
    pub fn sync<C: CanvasCallbacks + ?Sized>(&mut self, graph: GraphSnapshot<'_>, callbacks: &mut C) {
        self.controller.sync(graph, &mut self.scope, callbacks);
        if self
            .hovered_connection
            .is_some_and(|index| index >= graph.connections().len())
        {
            self.hovered_connection = None;
        }
        self.properties.bind(self.controller.selected_node_id());
    }
}
