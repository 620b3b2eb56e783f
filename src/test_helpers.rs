//! Shared test utilities for the pixshelf test suite.
//!
//! Fixture builders write real (tiny) PNGs so tests exercise the production
//! codec end to end; colors let assertions trace which source a generated
//! variant came from.

use crate::layout::Layout;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a solid-color RGB PNG at the given path, creating parent dirs.
pub fn write_solid_png(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    image::RgbImage::from_pixel(width, height, image::Rgb(rgb))
        .save(path)
        .unwrap();
}

/// Build an initialized shelf under `tmp` with one asset directory per
/// entry, each holding a solid-color PNG original at the given dimensions.
pub fn shelf_with_assets(tmp: &TempDir, assets: &[(&str, u32, u32, [u8; 3])]) -> Layout {
    let layout = Layout::open(&tmp.path().join("shelf")).unwrap();
    layout.initialize(false).unwrap();
    for &(name, width, height, color) in assets {
        let orig = layout
            .images()
            .join(name)
            .join(format!("{name}-orig.png"));
        write_solid_png(&orig, width, height, color);
    }
    layout
}

/// All file paths under `root`, sorted. Used for "file set unchanged"
/// assertions.
pub fn list_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}
