use eframe::egui::{self, Color32};

include!(concat!(env!("OUT_DIR"), "/custom_font.rs"));

/// 캔버스와 노드를 그릴 때 쓰는 색상 모음이다.
#[derive(Debug, Clone, Copy)]
pub struct CanvasColors {
    /// 캔버스 배경.
    pub canvas_fill: Color32,
    /// 격자선.
    pub grid_line: Color32,
    /// 노드 배경.
    pub node_fill: Color32,
    /// 드래그 중인 노드 배경.
    pub node_dragging: Color32,
    /// 노드 테두리.
    pub node_border: Color32,
    /// 핸들 채움색.
    pub handle_fill: Color32,
    /// 연결 대상으로 강조된 입력 핸들.
    pub handle_target: Color32,
    /// 연결선.
    pub connection: Color32,
    /// hover된 연결선.
    pub connection_hover: Color32,
    /// 연결 삭제 버튼.
    pub delete_button: Color32,
    /// 주 텍스트.
    pub text_primary: Color32,
    /// 보조 텍스트.
    pub text_secondary: Color32,
    /// 오류 메시지.
    pub error: Color32,
    /// 툴바 버튼 강조색.
    pub accent: Color32,
}

/// UI 전체에서 참조할 공통 테마 정보.
pub struct Theme {
    colors: CanvasColors,
}

impl Default for Theme {
    /// 어두운 캔버스 기본 색상을 정의한다.
    fn default() -> Self {
        Self {
            colors: CanvasColors {
                canvas_fill: Color32::from_rgb(22, 24, 29),
                grid_line: Color32::from_rgb(36, 39, 46),
                node_fill: Color32::from_rgb(38, 42, 51),
                node_dragging: Color32::from_rgb(48, 53, 64),
                node_border: Color32::from_rgb(70, 76, 90),
                handle_fill: Color32::from_rgb(150, 160, 180),
                handle_target: Color32::from_rgb(80, 200, 140),
                connection: Color32::from_rgb(120, 130, 150),
                connection_hover: Color32::from_rgb(90, 170, 255),
                delete_button: Color32::from_rgb(220, 80, 80),
                text_primary: Color32::from_rgb(230, 232, 238),
                text_secondary: Color32::from_rgb(150, 156, 170),
                error: Color32::from_rgb(235, 100, 100),
                accent: Color32::from_rgb(59, 110, 220),
            },
        }
    }
}

impl Theme {
    /// egui Context에 테마 기반 스타일을 적용한다.
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.window_rounding = egui::Rounding::same(6.0);
        visuals.panel_fill = Color32::from_rgb(27, 29, 35);
        ctx.set_visuals(visuals);
        install_custom_font(ctx);
    }

    pub fn colors(&self) -> &CanvasColors {
        &self.colors
    }
}

/// build.rs에서 찾은 폰트를 egui에 등록한다.
pub fn install_custom_font(ctx: &egui::Context) {
    let Some(bytes) = embedded_font_bytes() else {
        return;
    };
    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("custom".into(), egui::FontData::from_static(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .insert(0, "custom".into());
    }
    ctx.set_fonts(fonts);
}
