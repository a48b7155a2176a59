//! HTML report rendering.

use std::path::{Component, Path, PathBuf};

use crate::engine::Comparison;

/// Render a self-contained report page for `comparison`.
///
/// Image links are made relative to the directory of `report_path` when
/// both locations can be resolved, otherwise absolute.
pub fn render(comparison: &Comparison, report_path: &Path) -> String {
    let report = &comparison.report;
    let layout = &comparison.layout;
    let base = report_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();
    let link = |target: PathBuf| escape_html(&relative_link(&base, &target));

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n");
    html.push_str("<html lang=\"en\">\n");
    html.push_str("<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str("    <title>Snakeshot diff report</title>\n");
    html.push_str("    <style>\n");
    html.push_str("        body { font-family: sans-serif; margin: 24px; }\n");
    html.push_str("        table { border-collapse: collapse; }\n");
    html.push_str("        th, td { border: 1px solid #ccc; padding: 6px; text-align: center; vertical-align: top; }\n");
    html.push_str("        img { max-width: 240px; display: block; margin: 0 auto 4px; }\n");
    html.push_str("        .pct { font-weight: bold; }\n");
    html.push_str("    </style>\n");
    html.push_str("</head>\n");
    html.push_str("<body>\n");
    html.push_str("    <h1>Snakeshot diff report</h1>\n");
    html.push_str(&format!(
        "    <p>Session A: <code>{}</code><br>Session B: <code>{}</code><br>Steps: {}</p>\n",
        escape_html(&layout.frames_a.display().to_string()),
        escape_html(&layout.frames_b.display().to_string()),
        report.total_step
    ));
    html.push_str("    <table>\n");
    html.push_str("        <tr><th>Step</th><th>Session A</th><th>Session B</th><th>A vs B</th><th>A vs previous</th><th>B vs previous</th></tr>\n");

    for step in 0..report.total_step {
        html.push_str("        <tr>\n");
        html.push_str(&format!("            <td>{}</td>\n", step));
        html.push_str(&image_cell(&link(layout.frame_a(step)), None));
        html.push_str(&image_cell(&link(layout.frame_b(step)), None));
        html.push_str(&image_cell(
            &link(layout.each_step_image(step)),
            report.each_step.get(step).map(String::as_str),
        ));
        if step == 0 {
            html.push_str("            <td>-</td>\n");
            html.push_str("            <td>-</td>\n");
        } else {
            html.push_str(&image_cell(
                &link(layout.player1_image(step - 1)),
                report.each_player.player1.get(step - 1).map(String::as_str),
            ));
            html.push_str(&image_cell(
                &link(layout.player2_image(step - 1)),
                report.each_player.player2.get(step - 1).map(String::as_str),
            ));
        }
        html.push_str("        </tr>\n");
    }

    html.push_str("    </table>\n");
    html.push_str("</body>\n");
    html.push_str("</html>\n");
    html
}

fn image_cell(src: &str, percentage: Option<&str>) -> String {
    let mut cell = format!("            <td><img src=\"{}\" alt=\"{}\">", src, src);
    if let Some(pct) = percentage {
        cell.push_str(&format!("<span class=\"pct\">{}</span>", escape_html(pct)));
    }
    cell.push_str("</td>\n");
    cell
}

/// Link from directory `base` to `target`, using `/` separators.
///
/// Falls back to the absolute target when either path cannot be resolved
/// or the two share no root.
pub fn relative_link(base: &Path, target: &Path) -> String {
    match (std::path::absolute(base), std::path::absolute(target)) {
        (Ok(base), Ok(target)) => match relative_path(&normalize(&base), &normalize(&target)) {
            Some(rel) => to_link(&rel),
            None => to_link(&target),
        },
        _ => to_link(target),
    }
}

/// Path from `base` to `target`; both must be absolute and normalized.
fn relative_path(base: &Path, target: &Path) -> Option<PathBuf> {
    let base: Vec<Component> = base.components().collect();
    let target: Vec<Component> = target.components().collect();

    // Different roots (e.g. drive prefixes) cannot be bridged.
    if base.first() != target.first() {
        return None;
    }

    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base.len() {
        rel.push("..");
    }
    for part in &target[common..] {
        rel.push(part.as_os_str());
    }
    Some(rel)
}

/// Resolve `.` and `..` lexically.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn to_link(path: &Path) -> String {
    path.components()
        .map(|c| match c {
            Component::RootDir => String::new(),
            other => other.as_os_str().to_string_lossy().into_owned(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
