//! CLI output formatting.
//!
//! Each report has a `format_*` function returning `Vec<String>` (pure, no
//! I/O, unit testable) and a `print_*` wrapper that writes to stdout.

use crate::cache::{ResizeOutcome, ResizeReport};
use crate::layout::{Layout, MigrationOutcome};

/// 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Path summary for the managed roots.
///
/// ```text
/// base:      /home/me/assets
/// images:    /home/me/assets/images
/// videos:    /home/me/assets/videos
/// generated: /home/me/assets/generated
/// ```
pub fn format_paths(layout: &Layout) -> Vec<String> {
    vec![
        format!("base:      {}", layout.base().display()),
        format!("images:    {}", layout.images().display()),
        format!("videos:    {}", layout.videos().display()),
        format!("generated: {}", layout.generated().display()),
    ]
}

pub fn print_paths(layout: &Layout) {
    for line in format_paths(layout) {
        println!("{}", line);
    }
}

/// One line per migrated (or skipped) file.
pub fn format_migrations(outcomes: &[MigrationOutcome]) -> Vec<String> {
    outcomes
        .iter()
        .map(|outcome| match outcome {
            MigrationOutcome::Moved { from, to } => {
                format!("moved {} -> {}", from.display(), to.display())
            }
            MigrationOutcome::Copied { from, to } => {
                format!("added {} -> {}", from.display(), to.display())
            }
            MigrationOutcome::SkippedExisting { source, existing } => format!(
                "not clobbering {} (kept {})",
                source.display(),
                existing.display()
            ),
            MigrationOutcome::Ignored { path } => {
                format!("ignoring unsupported file: {}", path.display())
            }
        })
        .collect()
}

pub fn print_migrations(outcomes: &[MigrationOutcome]) {
    for line in format_migrations(outcomes) {
        println!("{}", line);
    }
}

/// Per-asset outcome lines plus a stats summary.
///
/// ```text
/// Resize 128x128
///     harbor: created harbor-128x128.png
///     pano: skipped (600x200 has a different aspect ratio)
///     sunset: cached
/// 1 created, 1 cached, 1 skipped (3 assets)
/// ```
pub fn format_resize_report(report: &ResizeReport) -> Vec<String> {
    let mut lines = vec![format!("Resize {}x{}", report.width, report.height)];
    for (asset, outcome) in &report.entries {
        let detail = match outcome {
            ResizeOutcome::Created { path } => format!(
                "created {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            ),
            ResizeOutcome::Cached => "cached".to_string(),
            ResizeOutcome::SkippedAspect {
                source_width,
                source_height,
            } => format!(
                "skipped ({}x{} has a different aspect ratio)",
                source_width, source_height
            ),
        };
        lines.push(format!("{}{}: {}", indent(1), asset, detail));
    }
    lines.push(report.stats().to_string());
    lines
}

pub fn print_resize_report(report: &ResizeReport) {
    for line in format_resize_report(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ResizeOutcome;
    use crate::layout::Layout;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn paths_lists_all_roots() {
        let tmp = TempDir::new().unwrap();
        let layout = Layout::open(&tmp.path().join("shelf")).unwrap();
        let lines = format_paths(&layout);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("base:"));
        assert!(lines[1].ends_with("/images"));
    }

    #[test]
    fn migrations_format_each_outcome() {
        let outcomes = vec![
            MigrationOutcome::Moved {
                from: PathBuf::from("/s/images/a.png"),
                to: PathBuf::from("/s/images/a/a-orig.png"),
            },
            MigrationOutcome::SkippedExisting {
                source: PathBuf::from("/s/images/a.png"),
                existing: PathBuf::from("/s/images/a/a-orig.png"),
            },
            MigrationOutcome::Ignored {
                path: PathBuf::from("/s/images/clip.mp4"),
            },
        ];
        let lines = format_migrations(&outcomes);
        assert!(lines[0].starts_with("moved "));
        assert!(lines[1].starts_with("not clobbering "));
        assert!(lines[2].contains("unsupported"));
    }

    #[test]
    fn resize_report_lines_and_summary() {
        let report = ResizeReport {
            width: 128,
            height: 128,
            entries: vec![
                (
                    "harbor".to_string(),
                    ResizeOutcome::Created {
                        path: PathBuf::from("/s/images/harbor/harbor-128x128.png"),
                    },
                ),
                (
                    "pano".to_string(),
                    ResizeOutcome::SkippedAspect {
                        source_width: 600,
                        source_height: 200,
                    },
                ),
                ("sunset".to_string(), ResizeOutcome::Cached),
            ],
        };
        let lines = format_resize_report(&report);
        assert_eq!(lines[0], "Resize 128x128");
        assert_eq!(lines[1], "    harbor: created harbor-128x128.png");
        assert_eq!(lines[2], "    pano: skipped (600x200 has a different aspect ratio)");
        assert_eq!(lines[3], "    sunset: cached");
        assert_eq!(lines[4], "1 created, 1 cached, 1 skipped (3 assets)");
    }
}
