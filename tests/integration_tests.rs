use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Helper function to run tabchart in `dir` with the given arguments
fn run_tabchart(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tabchart"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to spawn tabchart")
}

/// Fresh scratch directory holding a copy of one fixture
fn scratch_dir(name: &str, fixture: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tabchart-it-{}-{}", std::process::id(), name));
    fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    let source = Path::new(env!("CARGO_MANIFEST_DIR")).join("test").join(fixture);
    fs::copy(&source, dir.join(fixture)).expect("Failed to copy fixture");
    dir
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

fn is_valid_svg(path: &Path) -> bool {
    fs::read_to_string(path)
        .map(|text| text.contains("<svg") && text.contains("</svg>"))
        .unwrap_or(false)
}

fn is_valid_png(path: &Path) -> bool {
    fs::read(path)
        .map(|bytes| bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10])
        .unwrap_or(false)
}

const SMALL: &str = r#"{"width": 4, "height": 3, "dpi": 50}"#;

#[test]
fn test_end_to_end_series_to_svg() {
    let dir = scratch_dir("series-svg", "series.csv");
    let out = run_tabchart(&dir, &["--options", SMALL, "series", "series.csv", "plot.svg"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(is_valid_svg(&dir.join("plot.svg")));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_end_to_end_series_without_target() {
    let dir = scratch_dir("series-no-target", "series_no_target.csv");
    let out = run_tabchart(
        &dir,
        &["--options", SMALL, "series", "series_no_target.csv", "plot.svg"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(is_valid_svg(&dir.join("plot.svg")));
    fs::remove_dir_all(&dir).ok();
}

#[cfg(unix)]
#[test]
fn test_end_to_end_display_writes_no_output_file() {
    let dir = scratch_dir("series-display", "series.csv");
    let options = r#"{"width": 4, "height": 3, "display_dpi": 50, "viewer": ["true"]}"#;
    let out = run_tabchart(&dir, &["--options", options, "series", "series.csv"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(entries(&dir), vec!["series.csv"]);
    fs::remove_dir_all(&dir).ok();
}

#[cfg(unix)]
#[test]
fn test_end_to_end_viewer_failure() {
    let dir = scratch_dir("series-viewer-fail", "series.csv");
    let options = r#"{"width": 4, "height": 3, "display_dpi": 50, "viewer": ["false"]}"#;
    let out = run_tabchart(&dir, &["--options", options, "series", "series.csv"]);
    assert!(!out.status.success());
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_end_to_end_explicit_png_output() {
    let dir = scratch_dir("freq-png", "series.csv");
    let out = run_tabchart(&dir, &["--options", SMALL, "freq", "series.csv", "freq.png"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(is_valid_png(&dir.join("freq.png")));
    fs::remove_dir_all(&dir).ok();
}

#[cfg(unix)]
#[test]
fn test_end_to_end_default_input_path() {
    let dir = scratch_dir("freq-default", "series.csv");
    fs::rename(dir.join("series.csv"), dir.join("out.csv")).unwrap();
    let options = r#"{"width": 4, "height": 3, "display_dpi": 50, "viewer": ["true"]}"#;
    let out = run_tabchart(&dir, &["--options", options, "freq"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(entries(&dir), vec!["out.csv"]);
    fs::remove_dir_all(&dir).ok();
}

#[cfg(unix)]
#[test]
fn test_end_to_end_default_input_missing() {
    let dir = scratch_dir("freq-default-missing", "series.csv");
    let options = r#"{"viewer": ["true"]}"#;
    let out = run_tabchart(&dir, &["--options", options, "freq"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("out.csv"));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_end_to_end_oversized_render() {
    let dir = scratch_dir("series-huge", "series.csv");
    let out = run_tabchart(
        &dir,
        &["--options", r#"{"dpi": 5000}"#, "series", "series.csv", "plot.png"],
    );
    assert!(!out.status.success());
    assert!(!dir.join("plot.png").exists());
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_end_to_end_sweep_png() {
    let dir = scratch_dir("sweep", "sweep.csv");
    let out = run_tabchart(&dir, &["--options", SMALL, "sweep", "sweep.csv", "sweep.png"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(is_valid_png(&dir.join("sweep.png")));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_end_to_end_sweep_custom_filter() {
    let dir = scratch_dir("sweep-filter", "sweep.csv");
    let out = run_tabchart(
        &dir,
        &["--options", SMALL, "sweep", "--filter", "beat_time <= 0.3", "sweep.csv", "s.svg"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(is_valid_svg(&dir.join("s.svg")));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_end_to_end_sweep_invalid_filter() {
    let dir = scratch_dir("sweep-bad-filter", "sweep.csv");
    let out = run_tabchart(
        &dir,
        &["sweep", "--filter", "beat_time <", "sweep.csv", "s.svg"],
    );
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid predicate"));
    assert!(!dir.join("s.svg").exists());
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_end_to_end_waves_svg() {
    let dir = scratch_dir("waves", "waves.csv");
    let out = run_tabchart(&dir, &["--options", SMALL, "waves", "waves.csv", "waves.svg"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(is_valid_svg(&dir.join("waves.svg")));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_end_to_end_freq_svg() {
    let dir = scratch_dir("freq", "freq.csv");
    let out = run_tabchart(&dir, &["--options", SMALL, "freq", "freq.csv", "freq.svg"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(is_valid_svg(&dir.join("freq.svg")));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_end_to_end_missing_file() {
    let dir = scratch_dir("missing", "series.csv");
    let out = run_tabchart(&dir, &["series", "nope.csv", "plot.svg"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("file not found"));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_end_to_end_malformed_csv() {
    let dir = scratch_dir("malformed", "malformed.csv");
    let out = run_tabchart(&dir, &["series", "malformed.csv", "plot.svg"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to parse CSV"));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_end_to_end_missing_index_column() {
    let dir = scratch_dir("no-index", "waves.csv");
    let out = run_tabchart(&dir, &["series", "waves.csv", "plot.svg"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("column 't' not found"));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_end_to_end_invalid_options() {
    let dir = scratch_dir("bad-options", "series.csv");
    let out = run_tabchart(&dir, &["--options", "{", "series", "series.csv", "plot.svg"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("render options"));
    fs::remove_dir_all(&dir).ok();
}
