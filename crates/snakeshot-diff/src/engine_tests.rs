use super::*;

use image::Rgba;
use tempfile::TempDir;

fn write_frame(dir: &Path, step: usize, img: &RgbaImage) {
    img.save_with_format(dir.join(format!("{}.png", step)), ImageFormat::Png)
        .unwrap();
}

fn solid(rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(8, 8, Rgba(rgba))
}

/// Create `<root>/<name>` holding the given frames.
fn session(root: &Path, name: &str, frames: &[RgbaImage]) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for (i, img) in frames.iter().enumerate() {
        write_frame(&dir, i, img);
    }
    dir
}

#[test]
fn test_identical_sessions_report_zero() {
    let tmp = TempDir::new().unwrap();
    let frames = vec![solid([10, 20, 30, 255]); 3];
    let a = session(tmp.path(), "a", &frames);
    let b = session(tmp.path(), "b", &frames);
    let diff_dir = tmp.path().join("diff");

    let comparison = VisualDiffEngine::default().compare(&a, &b, &diff_dir).unwrap();
    let report = &comparison.report;
    assert_eq!(report.each_step, vec!["0.00%", "0.00%", "0.00%"]);
    assert_eq!(report.total_step, 3);
    assert_eq!(report.each_player.player1, vec!["0.00%", "0.00%"]);
    assert_eq!(report.each_player.player2, vec!["0.00%", "0.00%"]);
    report.validate().unwrap();
}

#[test]
fn test_artifacts_are_written() {
    let tmp = TempDir::new().unwrap();
    let frames = vec![solid([0, 0, 0, 255]), solid([255, 255, 255, 255])];
    let a = session(tmp.path(), "sess-a", &frames);
    let b = session(tmp.path(), "sess-b", &frames);
    let diff_dir = tmp.path().join("diff");

    let comparison = VisualDiffEngine::default().compare(&a, &b, &diff_dir).unwrap();
    let layout = &comparison.layout;

    assert!(diff_dir.join("each-step/0.png").is_file());
    assert!(diff_dir.join("each-step/1.png").is_file());
    assert!(diff_dir.join("sess-a/0.png").is_file());
    assert!(!diff_dir.join("sess-a/1.png").exists());
    assert!(diff_dir.join("sess-b/0.png").is_file());
    assert_eq!(layout.player1_dir, diff_dir.join("sess-a"));

    let logged = DiffReport::load(&diff_dir.join(DIFF_LOG_FILE)).unwrap();
    assert_eq!(logged, comparison.report);
    // Black to white within each session.
    assert_eq!(logged.each_player.player1, vec!["100%"]);
}

#[test]
fn test_cross_session_difference() {
    let tmp = TempDir::new().unwrap();
    let a = session(tmp.path(), "a", &[solid([0, 0, 0, 255]), solid([0, 0, 0, 255])]);

    // Second frame of B has a 4x4 white block in an 8x8 black frame.
    let mut changed = solid([0, 0, 0, 255]);
    for y in 0..4 {
        for x in 0..4 {
            changed.put_pixel(x, y, Rgba([255, 255, 255, 255]));
        }
    }
    let b = session(tmp.path(), "b", &[solid([0, 0, 0, 255]), changed]);

    let comparison = VisualDiffEngine::default()
        .compare(&a, &b, &tmp.path().join("diff"))
        .unwrap();
    assert_eq!(comparison.report.each_step, vec!["0.00%", "25.0%"]);
    assert_eq!(comparison.report.each_player.player1, vec!["0.00%"]);
    assert_eq!(comparison.report.each_player.player2, vec!["25.0%"]);
}

#[test]
fn test_single_frame_sessions() {
    let tmp = TempDir::new().unwrap();
    let a = session(tmp.path(), "a", &[solid([0, 0, 0, 255])]);
    let b = session(tmp.path(), "b", &[solid([255, 255, 255, 255])]);

    let comparison = VisualDiffEngine::default()
        .compare(&a, &b, &tmp.path().join("diff"))
        .unwrap();
    assert_eq!(comparison.report.each_step, vec!["100%"]);
    assert!(comparison.report.each_player.player1.is_empty());
}

#[test]
fn test_stale_output_is_rejected_before_writing() {
    let tmp = TempDir::new().unwrap();
    let frames = vec![solid([0, 0, 0, 255])];
    let a = session(tmp.path(), "a", &frames);
    let b = session(tmp.path(), "b", &frames);
    let diff_dir = tmp.path().join("diff");
    fs::create_dir(&diff_dir).unwrap();

    let err = VisualDiffEngine::default().compare(&a, &b, &diff_dir).unwrap_err();
    assert!(matches!(err, DiffError::StaleOutput(ref p) if p == &diff_dir));
    assert_eq!(fs::read_dir(&diff_dir).unwrap().count(), 0);
}

#[test]
fn test_second_run_hits_stale_guard() {
    let tmp = TempDir::new().unwrap();
    let frames = vec![solid([0, 0, 0, 255])];
    let a = session(tmp.path(), "a", &frames);
    let b = session(tmp.path(), "b", &frames);
    let diff_dir = tmp.path().join("diff");

    let engine = VisualDiffEngine::default();
    engine.compare(&a, &b, &diff_dir).unwrap();
    assert!(matches!(
        engine.compare(&a, &b, &diff_dir),
        Err(DiffError::StaleOutput(_))
    ));
}

#[test]
fn test_frame_count_mismatch() {
    let tmp = TempDir::new().unwrap();
    let a = session(tmp.path(), "a", &vec![solid([0, 0, 0, 255]); 3]);
    let b = session(tmp.path(), "b", &vec![solid([0, 0, 0, 255]); 2]);
    let diff_dir = tmp.path().join("diff");

    let err = VisualDiffEngine::default().compare(&a, &b, &diff_dir).unwrap_err();
    assert!(matches!(
        err,
        DiffError::FrameCountMismatch { left: 3, right: 2, .. }
    ));
    assert!(!diff_dir.exists());
}

#[test]
fn test_dimension_mismatch() {
    let tmp = TempDir::new().unwrap();
    let a = session(tmp.path(), "a", &[solid([0, 0, 0, 255])]);
    let b = session(
        tmp.path(),
        "b",
        &[RgbaImage::from_pixel(8, 9, Rgba([0, 0, 0, 255]))],
    );

    let err = VisualDiffEngine::default()
        .compare(&a, &b, &tmp.path().join("diff"))
        .unwrap_err();
    match err {
        DiffError::DimensionMismatch {
            left_size,
            right_size,
            ..
        } => {
            assert_eq!(left_size, (8, 8));
            assert_eq!(right_size, (8, 9));
        }
        other => panic!("expected dimension mismatch, got {other:?}"),
    }
}

#[test]
fn test_undecodable_frame() {
    let tmp = TempDir::new().unwrap();
    let a = session(tmp.path(), "a", &[solid([0, 0, 0, 255])]);
    let b = tmp.path().join("b");
    fs::create_dir(&b).unwrap();
    fs::write(b.join("0.png"), b"not a png").unwrap();

    let err = VisualDiffEngine::default()
        .compare(&a, &b, &tmp.path().join("diff"))
        .unwrap_err();
    assert!(matches!(err, DiffError::Decode { .. }));
}

#[test]
fn test_count_frames_ignores_other_files() {
    let tmp = TempDir::new().unwrap();
    let dir = session(tmp.path(), "a", &vec![solid([0, 0, 0, 255]); 2]);
    fs::write(dir.join("session.json"), "{}").unwrap();
    fs::write(dir.join("notes.png.bak"), "").unwrap();
    fs::write(dir.join("thumb.png"), "").unwrap();
    assert_eq!(count_frames(&dir).unwrap(), 2);
}

#[test]
fn test_count_frames_gap_and_empty() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("gappy");
    fs::create_dir(&dir).unwrap();
    assert!(matches!(count_frames(&dir), Err(DiffError::NoFrames(_))));

    write_frame(&dir, 0, &solid([0, 0, 0, 255]));
    write_frame(&dir, 2, &solid([0, 0, 0, 255]));
    match count_frames(&dir) {
        Err(DiffError::MissingFrame(path)) => assert_eq!(path, dir.join("1.png")),
        other => panic!("expected missing frame, got {other:?}"),
    }
}

#[test]
fn test_layout_falls_back_on_name_collision() {
    let layout = DiffLayout::new(
        Path::new("/x/run/temp"),
        Path::new("/y/run/temp"),
        Path::new("/out/diff"),
    );
    assert_eq!(layout.player1_dir, Path::new("/out/diff/player1"));
    assert_eq!(layout.player2_dir, Path::new("/out/diff/player2"));

    let layout = DiffLayout::new(
        Path::new("/t/each-step"),
        Path::new("/t/b"),
        Path::new("/out/diff"),
    );
    assert_eq!(layout.player1_dir, Path::new("/out/diff/player1"));
}

#[test]
fn test_write_report_links_relative_to_report() {
    let tmp = TempDir::new().unwrap();
    let frames = vec![solid([0, 0, 0, 255]); 2];
    let temp = tmp.path().join("temp");
    let a = session(&temp, "a", &frames);
    let b = session(&temp, "b", &frames);

    let engine = VisualDiffEngine::default();
    let comparison = engine.compare(&a, &b, &temp.join("diff")).unwrap();
    let report_path = tmp.path().join("result").join("report.html");
    engine.write_report(&comparison, &report_path).unwrap();

    let html = fs::read_to_string(&report_path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("src=\"../temp/a/0.png\""));
    assert!(html.contains("src=\"../temp/b/1.png\""));
    assert!(html.contains("src=\"../temp/diff/each-step/1.png\""));
    assert!(html.contains("src=\"../temp/diff/a/0.png\""));
    assert!(html.contains("src=\"../temp/diff/b/0.png\""));
    assert_eq!(html.matches("<tr>").count(), 1 + 2);
}
