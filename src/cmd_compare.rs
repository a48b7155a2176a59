//! `compare` command: diff two recordings and render the report.

use std::path::{Path, PathBuf};

use snakeshot_config::Config;
use snakeshot_diff::VisualDiffEngine;
use tracing::info;

use crate::adapters::{self, BoxError};

/// Compare `dirs`, or the two recordings found under the frames directory.
pub(crate) async fn handle_compare_command(
    config: &Config,
    dirs: Option<(PathBuf, PathBuf)>,
) -> Result<(), BoxError> {
    let frames_root = adapters::frames_root(config);
    let diff_dir = frames_root.join(&config.output.diff_dir_name);
    let (dir_a, dir_b) = match dirs {
        Some(dirs) => dirs,
        None => discover_recordings(&frames_root, &config.output.diff_dir_name)?,
    };
    let report_path = adapters::report_path(config);

    info!("Comparing {} with {}", dir_a.display(), dir_b.display());

    let engine = VisualDiffEngine::new(adapters::diff_options(config));
    let (comparison, written) = tokio::task::spawn_blocking(move || {
        let comparison = engine.compare(&dir_a, &dir_b, &diff_dir)?;
        let written = engine.write_report(&comparison, &report_path)?;
        Ok::<_, snakeshot_diff::DiffError>((comparison, written))
    })
    .await??;

    let report = &comparison.report;
    println!("Steps compared: {}", report.total_step);
    println!("Diff log:       {}", comparison.layout.log_path.display());
    println!("Report:         {}", written.display());
    Ok(())
}

/// The two recording directories under `frames_root`, ordered by name.
///
/// The diff output directory is skipped. Anything other than exactly two
/// candidates is an error, since picking an arbitrary pair would compare
/// unrelated sessions.
pub(crate) fn discover_recordings(
    frames_root: &Path,
    diff_dir_name: &str,
) -> Result<(PathBuf, PathBuf), BoxError> {
    let entries = std::fs::read_dir(frames_root)
        .map_err(|e| format!("Cannot read {}: {}", frames_root.display(), e))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() || entry.file_name() == diff_dir_name {
            continue;
        }
        dirs.push(entry.path());
    }
    dirs.sort();

    match <[PathBuf; 2]>::try_from(dirs) {
        Ok([a, b]) => Ok((a, b)),
        Err(dirs) => Err(format!(
            "Expected 2 recordings under {}, found {}",
            frames_root.display(),
            dirs.len()
        )
        .into()),
    }
}
