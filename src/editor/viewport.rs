//! 화면 좌표와 그래프 좌표 사이의 변환, 줌/팬 상태를 관리한다.

use eframe::egui;
use tracing::debug;

use super::model::Position;

/// 허용되는 최소 줌 배율.
pub const MIN_ZOOM: f32 = 0.5;
/// 허용되는 최대 줌 배율.
pub const MAX_ZOOM: f32 = 2.0;
/// 줌 버튼 한 번의 증감량.
pub const ZOOM_STEP: f32 = 0.1;

/// 캔버스 뷰포트 상태이다.
///
/// `screen = origin + pan + graph * zoom` 관계를 유지한다. `origin`은 매 프레임
/// 캔버스 영역의 좌상단이며 상태로 보관하지 않는다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f32,
    pan: egui::Vec2,
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            pan: egui::Vec2::ZERO,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> egui::Vec2 {
        self.pan
    }

    /// 줌을 한 단계 올린다.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    /// 줌을 한 단계 내린다.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    /// 줌을 범위 안으로 고정해 설정한다. 누적 오차를 막기 위해 0.01 단위로 반올림한다.
    pub fn set_zoom(&mut self, zoom: f32) {
        let rounded = (zoom * 100.0).round() / 100.0;
        self.zoom = rounded.clamp(MIN_ZOOM, MAX_ZOOM);
        debug!(zoom = self.zoom, "뷰포트 줌 변경");
    }

    /// 화면 픽셀 단위로 이동한다.
    pub fn pan_by(&mut self, delta: egui::Vec2) {
        self.pan += delta;
    }

    /// 줌 1.0, 이동 없음으로 되돌린다.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// 그래프 좌표를 화면 좌표로 바꾼다.
    pub fn graph_to_screen(&self, origin: egui::Pos2, point: Position) -> egui::Pos2 {
        origin + self.pan + egui::vec2(point.x, point.y) * self.zoom
    }

    /// 화면 좌표를 그래프 좌표로 바꾼다.
    pub fn screen_to_graph(&self, origin: egui::Pos2, screen: egui::Pos2) -> Position {
        let local = (screen - origin - self.pan) / self.zoom;
        Position::new(local.x, local.y)
    }

    /// 그래프 단위 길이를 화면 길이로 바꾼다.
    pub fn scale(&self, length: f32) -> f32 {
        length * self.zoom
    }

    /// 이번 프레임의 캔버스 원점과 묶는다.
    pub fn frame(&self, origin: egui::Pos2) -> ScreenFrame {
        ScreenFrame {
            viewport: *self,
            origin,
        }
    }

    /// 배경 격자 패턴 파라미터를 계산한다.
    pub fn grid(&self, spacing: f32) -> GridPattern {
        let cell = (spacing * self.zoom).max(1.0);
        GridPattern {
            cell,
            offset: egui::vec2(self.pan.x.rem_euclid(cell), self.pan.y.rem_euclid(cell)),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

/// 한 프레임 동안 고정된 뷰포트와 캔버스 원점이다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenFrame {
    pub viewport: Viewport,
    pub origin: egui::Pos2,
}

impl ScreenFrame {
    pub fn to_graph(&self, screen: egui::Pos2) -> Position {
        self.viewport.screen_to_graph(self.origin, screen)
    }

    pub fn to_screen(&self, point: Position) -> egui::Pos2 {
        self.viewport.graph_to_screen(self.origin, point)
    }

    /// 그래프 좌표의 사각형을 화면 좌표로 옮긴다.
    pub fn rect_to_screen(&self, rect: egui::Rect) -> egui::Rect {
        egui::Rect::from_min_max(
            self.to_screen(rect.min.into()),
            self.to_screen(rect.max.into()),
        )
    }
}

/// 반복 격자 배경이다. 데이터 모델과 무관한 장식이다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPattern {
    /// 화면상의 격자 간격.
    pub cell: f32,
    /// 첫 격자선의 캔버스 내 오프셋.
    pub offset: egui::Vec2,
}

impl GridPattern {
    /// 영역 안의 세로선 x 좌표 목록.
    pub fn vertical_lines(&self, rect: egui::Rect) -> Vec<f32> {
        Self::lines(rect.min.x + self.offset.x, rect.max.x, self.cell)
    }

    /// 영역 안의 가로선 y 좌표 목록.
    pub fn horizontal_lines(&self, rect: egui::Rect) -> Vec<f32> {
        Self::lines(rect.min.y + self.offset.y, rect.max.y, self.cell)
    }

    fn lines(start: f32, end: f32, cell: f32) -> Vec<f32> {
        let count = ((end - start) / cell).floor().max(-1.0) as i64 + 1;
        (0..count.max(0)).map(|i| start + i as f32 * cell).collect()
    }
}
