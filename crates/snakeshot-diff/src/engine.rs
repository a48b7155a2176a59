//! Offline comparison of two frame directories.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use tracing::{debug, info};

use crate::error::{DiffError, DiffResult};
use crate::format::percentage;
use crate::html;
use crate::pixel::{self, DiffOptions};
use crate::report::{DiffReport, EachPlayer};

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

/// Sub-directory of the diff output holding cross-session diffs.
pub const EACH_STEP_DIR: &str = "each-step";

/// File name of the persisted diff log.
pub const DIFF_LOG_FILE: &str = "diff-log.json";

/// Where the inputs live and where every artifact of a comparison goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLayout {
    pub frames_a: PathBuf,
    pub frames_b: PathBuf,
    pub diff_dir: PathBuf,
    pub each_step_dir: PathBuf,
    pub player1_dir: PathBuf,
    pub player2_dir: PathBuf,
    pub log_path: PathBuf,
}

impl DiffLayout {
    /// Lay out artifacts for `frames_a` vs `frames_b` under `diff_dir`.
    ///
    /// Per-session diffs go in directories named after the inputs, or
    /// `player1`/`player2` when the two names collide.
    pub fn new(frames_a: &Path, frames_b: &Path, diff_dir: &Path) -> Self {
        let name_a = dir_name(frames_a);
        let name_b = dir_name(frames_b);
        let usable = |name: &Option<String>| {
            name.as_deref()
                .is_some_and(|n| n != EACH_STEP_DIR && n != DIFF_LOG_FILE)
        };
        let (name_a, name_b) = match (&name_a, &name_b) {
            (Some(a), Some(b)) if a != b && usable(&name_a) && usable(&name_b) => {
                (a.clone(), b.clone())
            }
            _ => ("player1".to_string(), "player2".to_string()),
        };

        Self {
            frames_a: frames_a.to_path_buf(),
            frames_b: frames_b.to_path_buf(),
            diff_dir: diff_dir.to_path_buf(),
            each_step_dir: diff_dir.join(EACH_STEP_DIR),
            player1_dir: diff_dir.join(name_a),
            player2_dir: diff_dir.join(name_b),
            log_path: diff_dir.join(DIFF_LOG_FILE),
        }
    }

    pub fn frame_a(&self, step: usize) -> PathBuf {
        frame_file(&self.frames_a, step)
    }

    pub fn frame_b(&self, step: usize) -> PathBuf {
        frame_file(&self.frames_b, step)
    }

    pub fn each_step_image(&self, step: usize) -> PathBuf {
        frame_file(&self.each_step_dir, step)
    }

    /// Diff of session A's frames `step` and `step + 1`.
    pub fn player1_image(&self, step: usize) -> PathBuf {
        frame_file(&self.player1_dir, step)
    }

    /// Diff of session B's frames `step` and `step + 1`.
    pub fn player2_image(&self, step: usize) -> PathBuf {
        frame_file(&self.player2_dir, step)
    }
}

/// A finished comparison: the numbers and where the images are.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub report: DiffReport,
    pub layout: DiffLayout,
}

/// Compares two recorded sessions frame by frame.
#[derive(Debug, Clone, Default)]
pub struct VisualDiffEngine {
    options: DiffOptions,
}

impl VisualDiffEngine {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Diff `dir_a` against `dir_b`, writing every artifact under `diff_dir`.
    ///
    /// `diff_dir` must not exist yet and both directories must hold the same
    /// contiguous run of frames `0.png..N-1.png`.
    pub fn compare(&self, dir_a: &Path, dir_b: &Path, diff_dir: &Path) -> DiffResult<Comparison> {
        if diff_dir.exists() {
            return Err(DiffError::StaleOutput(diff_dir.to_path_buf()));
        }

        let total = count_frames(dir_a)?;
        let total_b = count_frames(dir_b)?;
        if total != total_b {
            return Err(DiffError::FrameCountMismatch {
                left_dir: dir_a.to_path_buf(),
                left: total,
                right_dir: dir_b.to_path_buf(),
                right: total_b,
            });
        }

        let layout = DiffLayout::new(dir_a, dir_b, diff_dir);
        info!(
            "Comparing {} and {} ({} frames) into {}",
            dir_a.display(),
            dir_b.display(),
            total,
            diff_dir.display()
        );

        fs::create_dir_all(diff_dir).map_err(|e| DiffError::io(diff_dir, e))?;
        for dir in [&layout.each_step_dir, &layout.player1_dir, &layout.player2_dir] {
            fs::create_dir(dir).map_err(|e| DiffError::io(dir, e))?;
        }

        let mut report = DiffReport {
            each_player: EachPlayer::default(),
            each_step: Vec::with_capacity(total),
            total_step: total,
        };
        let mut previous: Option<(RgbaImage, RgbaImage)> = None;

        for step in 0..total {
            let frame_a = layout.frame_a(step);
            let frame_b = layout.frame_b(step);
            let img_a = decode(&frame_a)?;
            let img_b = decode(&frame_b)?;

            let cross = self.diff_pair(&frame_a, &img_a, &frame_b, &img_b, &layout.each_step_image(step))?;
            debug!("Step {}: cross-session diff {}", step, cross);
            report.each_step.push(cross);

            if let Some((prev_a, prev_b)) = &previous {
                let prev = step - 1;
                let own_a = self.diff_pair(
                    &layout.frame_a(prev),
                    prev_a,
                    &frame_a,
                    &img_a,
                    &layout.player1_image(prev),
                )?;
                let own_b = self.diff_pair(
                    &layout.frame_b(prev),
                    prev_b,
                    &frame_b,
                    &img_b,
                    &layout.player2_image(prev),
                )?;
                debug!("Step {}: session diffs {} / {}", step, own_a, own_b);
                report.each_player.player1.push(own_a);
                report.each_player.player2.push(own_b);
            }

            previous = Some((img_a, img_b));
        }

        report.save(&layout.log_path)?;
        info!("Wrote {}", layout.log_path.display());

        Ok(Comparison { report, layout })
    }

    /// Render the HTML report for `comparison` at `report_path`.
    ///
    /// The parent directory is created if needed; an existing report is
    /// replaced.
    pub fn write_report(&self, comparison: &Comparison, report_path: &Path) -> DiffResult<PathBuf> {
        if let Some(parent) = report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| DiffError::io(parent, e))?;
        }
        let document = html::render(comparison, report_path);
        fs::write(report_path, document).map_err(|e| DiffError::io(report_path, e))?;
        info!("Report saved to {}", report_path.display());
        Ok(report_path.to_path_buf())
    }

    /// Diff two decoded frames, save the visualisation, return the percentage.
    fn diff_pair(
        &self,
        left_path: &Path,
        left: &RgbaImage,
        right_path: &Path,
        right: &RgbaImage,
        output: &Path,
    ) -> DiffResult<String> {
        let diff = pixel::compare(left, right, &self.options).map_err(|m| {
            DiffError::DimensionMismatch {
                left: left_path.to_path_buf(),
                left_size: m.left,
                right: right_path.to_path_buf(),
                right_size: m.right,
            }
        })?;
        diff.image
            .save_with_format(output, ImageFormat::Png)
            .map_err(|source| DiffError::Encode {
                path: output.to_path_buf(),
                source,
            })?;
        Ok(percentage(diff.differing, diff.total_pixels()))
    }
}

/// Number of frames in `dir`, requiring `0.png..N-1.png` without gaps.
///
/// Files not named `<n>.png` are ignored.
pub fn count_frames(dir: &Path) -> DiffResult<usize> {
    let entries = fs::read_dir(dir).map_err(|e| DiffError::io(dir, e))?;
    let mut indices = BTreeSet::new();
    for entry in entries {
        let entry = entry.map_err(|e| DiffError::io(dir, e))?;
        let name = entry.file_name();
        if let Some(index) = name
            .to_str()
            .and_then(|n| n.strip_suffix(".png"))
            .filter(|stem| !stem.is_empty() && stem.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|stem| stem.parse::<usize>().ok())
        {
            indices.insert(index);
        }
    }

    if indices.is_empty() {
        return Err(DiffError::NoFrames(dir.to_path_buf()));
    }
    for (expected, index) in indices.iter().enumerate() {
        if *index != expected {
            return Err(DiffError::MissingFrame(frame_file(dir, expected)));
        }
    }
    Ok(indices.len())
}

fn decode(path: &Path) -> DiffResult<RgbaImage> {
    let img = image::open(path).map_err(|source| DiffError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

fn frame_file(dir: &Path, step: usize) -> PathBuf {
    dir.join(format!("{}.png", step))
}

fn dir_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}
