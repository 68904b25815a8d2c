use crate::document::WorkflowDocument;
use crate::editor::model::{CanvasIntent, NodeType};
use crate::editor::{CanvasState, WorkflowCanvasUi};
use crate::settings::CanvasSettings;
use crate::theme::Theme;
use eframe::egui;
use std::path::PathBuf;
use tracing::{info, warn};

mod ui;
mod widgets;

const UNTITLED: &str = "새 워크플로";

/// egui 애플리케이션의 전체 상태를 보관한다.
pub struct WorkflowCanvasApp {
    /// UI 테마 정보.
    theme: Theme,
    /// 캔버스 설정.
    settings: CanvasSettings,
    /// 편집 중인 문서. 노드/연결의 유일한 소유자이다.
    document: WorkflowDocument,
    /// 문서 파일 경로.
    document_path: Option<PathBuf>,
    /// 캔버스의 일시적 상태.
    canvas: CanvasState,
    /// 저장 이후 변경 여부.
    dirty: bool,
    /// 마지막 오류 메시지.
    last_error: Option<String>,
}

impl WorkflowCanvasApp {
    /// egui Context를 받아 초기 상태를 구성한다.
    pub fn new(cc: &eframe::CreationContext<'_>, settings: CanvasSettings) -> Self {
        let theme = Theme::default();
        theme.apply(&cc.egui_ctx);
        let mut app = Self::with_settings(theme, settings);
        if let Some(path) = app.settings.startup_document.clone() {
            app.open_path(path);
        }
        app
    }

    fn with_settings(theme: Theme, settings: CanvasSettings) -> Self {
        Self {
            theme,
            settings,
            document: WorkflowDocument::new(UNTITLED),
            document_path: None,
            canvas: CanvasState::new(),
            dirty: false,
            last_error: None,
        }
    }

    /// 빈 문서로 교체한다.
    fn new_document(&mut self) {
        self.document = WorkflowDocument::new(UNTITLED);
        self.document_path = None;
        self.canvas = CanvasState::new();
        self.dirty = false;
        self.last_error = None;
    }

    /// 파일 다이얼로그로 워크플로를 연다.
    fn open_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("YAML", &["yaml", "yml"])
            .pick_file()
        {
            self.open_path(path);
        }
    }

    /// 주어진 경로의 YAML을 문서로 읽는다. 실패하면 현재 문서를 유지한다.
    fn open_path(&mut self, path: PathBuf) {
        match WorkflowDocument::load(&path) {
            Ok(document) => {
                info!(path = %path.display(), nodes = document.nodes.len(), "워크플로 열기");
                self.document = document;
                self.document_path = Some(path);
                self.canvas = CanvasState::new();
                self.dirty = false;
                self.last_error = None;
            }
            Err(err) => {
                warn!(path = %path.display(), error = %format!("{err:#}"), "워크플로 열기 실패");
                self.last_error = Some(format!("{err:#}"));
            }
        }
    }

    /// 현재 경로에 저장한다. 경로가 없으면 다른 이름으로 저장한다.
    fn save(&mut self) {
        match self.document_path.clone() {
            Some(path) => self.save_to(path),
            None => self.save_as(),
        }
    }

    fn save_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("YAML", &["yaml", "yml"])
            .set_file_name("workflow.yaml")
            .save_file()
        {
            self.save_to(path);
        }
    }

    fn save_to(&mut self, path: PathBuf) {
        match self.document.save(&path) {
            Ok(()) => {
                self.document_path = Some(path);
                self.dirty = false;
                self.last_error = None;
            }
            Err(err) => {
                warn!(path = %path.display(), error = %format!("{err:#}"), "워크플로 저장 실패");
                self.last_error = Some(format!("{err:#}"));
            }
        }
    }

    /// 팔레트에서 고른 노드를 추가하고 선택한다.
    fn add_node(&mut self, node_type: NodeType) {
        let id = self.document.add_node(node_type);
        self.dirty = true;
        self.canvas.select(Some(id), &mut Vec::<CanvasIntent>::new());
    }

    /// 캔버스가 보낸 의도를 문서에 반영하고 캔버스 상태를 새 스냅샷에 맞춘다.
    fn apply_intents(&mut self, intents: Vec<CanvasIntent>) {
        for intent in intents {
            if matches!(intent, CanvasIntent::CloseProperties) {
                self.canvas.select(None, &mut Vec::<CanvasIntent>::new());
                continue;
            }
            match self.document.apply(intent) {
                Ok(changed) => self.dirty |= changed,
                Err(err) => {
                    warn!(error = %err, "캔버스 요청을 반영하지 않았습니다");
                    self.last_error = Some(err.to_string());
                }
            }
        }
        self.canvas.sync(self.document.snapshot(), &mut Vec::<CanvasIntent>::new());
    }
}

impl eframe::App for WorkflowCanvasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);
        let colors = *self.theme.colors();
        let mut intents: Vec<CanvasIntent> = Vec::new();
        let mut picked = None;

        egui::TopBottomPanel::top("workflow_toolbar").show(ctx, |ui| {
            self.render_toolbar(ui);
        });
        egui::TopBottomPanel::bottom("workflow_status").show(ctx, |ui| {
            self.render_status(ui);
        });
        egui::SidePanel::left("workflow_palette")
            .resizable(false)
            .default_width(200.0)
            .show(ctx, |ui| {
                picked = WorkflowCanvasUi::new(
                    &self.theme,
                    &self.settings,
                    &mut self.canvas,
                    self.document.snapshot(),
                )
                .show_palette(ui);
            });
        egui::SidePanel::right("workflow_properties")
            .resizable(false)
            .default_width(300.0)
            .show(ctx, |ui| {
                WorkflowCanvasUi::new(
                    &self.theme,
                    &self.settings,
                    &mut self.canvas,
                    self.document.snapshot(),
                )
                .show_properties(ui, &mut intents);
            });
        egui::CentralPanel::default()
            .frame(egui::Frame {
                fill: colors.canvas_fill,
                ..Default::default()
            })
            .show(ctx, |ui| {
                WorkflowCanvasUi::new(
                    &self.theme,
                    &self.settings,
                    &mut self.canvas,
                    self.document.snapshot(),
                )
                .show_canvas(ui, &mut intents);
            });

        if let Some(node_type) = picked {
            self.add_node(node_type);
        }
        self.apply_intents(intents);
        if self.canvas.scope.is_listening() || self.canvas.controller.connecting_from().is_some() {
            ctx.request_repaint();
        }
    }
}
