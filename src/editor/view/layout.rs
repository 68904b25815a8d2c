use super::*;

/// 워크플로 캔버스 화면(팔레트/캔버스/속성 패널)을 그리는 뷰이다.
///
/// 그래프는 읽기 전용 스냅샷으로만 받고, 변경은 모두 `CanvasCallbacks`로 내보낸다.
pub struct WorkflowCanvasUi<'a> {
    /// 테마 참조.
    pub(super) theme: &'a Theme,
    /// 캔버스 설정.
    pub(super) settings: &'a CanvasSettings,
    /// 캔버스가 소유하는 일시적 상태.
    pub(super) state: &'a mut CanvasState,
    /// 호스트 문서의 스냅샷.
    pub(super) graph: GraphSnapshot<'a>,
}

impl<'a> WorkflowCanvasUi<'a> {
    /// 뷰 인스턴스를 생성한다.
    pub fn new(
        theme: &'a Theme,
        settings: &'a CanvasSettings,
        state: &'a mut CanvasState,
        graph: GraphSnapshot<'a>,
    ) -> Self {
        Self {
            theme,
            settings,
            state,
            graph,
        }
    }

    pub(super) fn colors(&self) -> CanvasColors {
        *self.theme.colors()
    }

    /// 좌측 팔레트를 그리고 고른 유형을 돌려준다.
    pub fn show_palette(&mut self, ui: &mut egui::Ui) -> Option<NodeType> {
        self.render_palette(ui)
    }

    /// 중앙 캔버스를 그리고 포인터/키 입력을 처리한다.
    pub fn show_canvas<C: CanvasCallbacks + ?Sized>(&mut self, ui: &mut egui::Ui, callbacks: &mut C) {
        self.render_canvas(ui, callbacks);
    }

    /// 선택된 노드의 속성 패널을 그린다.
    pub fn show_properties<C: CanvasCallbacks + ?Sized>(
        &mut self,
        ui: &mut egui::Ui,
        callbacks: &mut C,
    ) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.render_properties(ui, callbacks);
            });
    }
}
