#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod document;
mod editor;
mod settings;
mod theme;

use app::WorkflowCanvasApp;
use eframe::egui;
use settings::CanvasSettings;

/// egui 애플리케이션을 초기화하고 실행하는 진입점입니다.
fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    let settings = CanvasSettings::load();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_app_id("workflow-canvas")
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Workflow Canvas",
        native_options,
        Box::new(move |cc| Box::new(WorkflowCanvasApp::new(cc, settings))),
    )
}
