use anyhow::Context;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::editor::NodeMetrics;

/// 설정 파일 경로를 지정하는 환경 변수.
pub const CONFIG_ENV: &str = "WORKFLOW_CANVAS_CONFIG";
/// 환경 변수가 없을 때 작업 디렉터리에서 찾는 설정 파일.
pub const DEFAULT_CONFIG_FILE: &str = "workflow-canvas.yaml";

/// 캔버스 실행 설정이다. 빠진 항목은 기본값을 쓴다.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// 줌 1.0 기준 격자 간격.
    pub grid_spacing: f32,
    /// 노드 상자 치수.
    pub node: NodeMetrics,
    /// 연결선 hover 판정 거리(화면 픽셀).
    pub hover_tolerance: f32,
    /// 방향키 한 번의 이동량(화면 픽셀).
    pub pan_step: f32,
    /// 시작 시 열 워크플로 파일.
    pub startup_document: Option<PathBuf>,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            grid_spacing: 20.0,
            node: NodeMetrics::default(),
            hover_tolerance: 8.0,
            pan_step: 40.0,
            startup_document: None,
        }
    }
}

impl CanvasSettings {
    /// 환경 변수 → 기본 파일 → 내장 기본값 순서로 설정을 읽는다.
    ///
    /// 파일이 없으면 조용히 기본값을 쓰고, 읽기에 실패하면 경고만 남긴다.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        if !path.exists() {
            info!(path = %path.display(), "설정 파일이 없어 기본값을 사용합니다");
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(settings) => {
                info!(path = %path.display(), "설정 파일을 읽었습니다");
                settings
            }
            Err(err) => {
                warn!(path = %path.display(), error = %format!("{err:#}"), "설정 파일을 읽지 못해 기본값을 사용합니다");
                Self::default()
            }
        }
    }

    /// YAML 파일에서 설정을 읽는다.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let mut file = File::open(path)
            .with_context(|| format!("설정 파일 열기 실패: {}", path.display()))?;
        Self::from_reader(&mut file)
    }

    /// Reader에서 YAML을 읽어 설정으로 파싱한다.
    pub fn from_reader<R: Read>(reader: &mut R) -> anyhow::Result<Self> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        if buf.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings = serde_yaml::from_str(&buf).context("설정 YAML 파싱 실패")?;
        Ok(settings)
    }
}
