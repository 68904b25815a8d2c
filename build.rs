use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 폰트 경로를 직접 지정할 때 사용하는 환경 변수이다.
const FONT_OVERRIDE_ENV: &str = "WORKFLOW_CANVAS_FONT";

/// 노드 라벨에 쓰일 한글 폰트를 찾아 include_bytes! 스텁을 만든다.
fn main() {
    println!("cargo:rerun-if-env-changed={FONT_OVERRIDE_ENV}");
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR은 cargo가 항상 설정한다"));
    let font = env::var_os(FONT_OVERRIDE_ENV)
        .map(PathBuf::from)
        .filter(|path| path.is_file())
        .or_else(find_system_font);
    write_font_stub(&out_dir.join("custom_font.rs"), font.as_deref()).expect("폰트 스텁 생성 실패");
}

/// 찾은 폰트 경로로 embedded_font_bytes() 정의를 기록한다.
fn write_font_stub(dest: &Path, font: Option<&Path>) -> std::io::Result<()> {
    let body = match font {
        Some(path) => {
            println!("cargo:rerun-if-changed={}", path.display());
            let escaped = path.to_string_lossy().replace('\\', "\\\\");
            format!("Some(include_bytes!(\"{escaped}\"))")
        }
        None => {
            println!("cargo:warning=한글 폰트를 찾지 못했습니다. egui 기본 폰트만 사용합니다.");
            "None".to_string()
        }
    };
    fs::write(
        dest,
        format!("pub fn embedded_font_bytes() -> Option<&'static [u8]> {{\n    {body}\n}}\n"),
    )
}

/// 플랫폼별 폰트 디렉터리를 순회하며 한글 폰트 파일을 찾는다.
fn find_system_font() -> Option<PathBuf> {
    let mut roots = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/System/Library/Fonts"),
        PathBuf::from("/Library/Fonts"),
    ];
    if let Some(home) = env::var_os("HOME") {
        roots.push(Path::new(&home).join(".fonts"));
    }
    if let Some(windir) = env::var_os("WINDIR") {
        roots.push(Path::new(&windir).join("Fonts"));
    }
    let keywords = ["noto", "nanum", "malgun", "applegothic", "pretendard"];
    roots
        .into_iter()
        .filter(|root| root.exists())
        .flat_map(|root| WalkDir::new(root).into_iter().filter_map(Result::ok))
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .find(|path| {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_ascii_lowercase)
                .unwrap_or_default();
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase)
                .unwrap_or_default();
            keywords.iter().any(|k| name.contains(k)) && matches!(ext.as_str(), "ttf" | "otf" | "ttc")
        })
}
