//! Managed directory layout: discovery, migration, and path resolution.
//!
//! A shelf is a base directory with three managed roots:
//!
//! ```text
//! {base}/
//! ├── images/
//! │   ├── sunset/                  # one directory per asset
//! │   │   ├── sunset-orig.jpg      # untouched source (exactly one)
//! │   │   └── sunset-128x128.jpg   # generated variants
//! │   └── harbor/
//! │       └── harbor-orig.png
//! ├── videos/                      # recognized, not yet handled
//! └── generated/                   # reserved for derived outputs
//! ```
//!
//! [`Layout`] is immutable configuration: paths are computed once at
//! construction and borrowed by every operation. There is no locking —
//! concurrent processes racing on the same asset can interleave existence
//! checks with writes. Single-caller usage is the supported pattern.

use crate::naming::{self, NamingError, SizeTag, VariantName};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Source extensions accepted into the images root. Lowercase only; the
/// filename grammar is case-sensitive.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Recognized but unhandled. Files with these extensions are left alone.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4"];

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Naming(#[from] NamingError),
    #[error("not an allowed image type: {0}")]
    NotAnImage(PathBuf),
}

/// The three managed roots under a base path.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    base: PathBuf,
    images: PathBuf,
    videos: PathBuf,
    generated: PathBuf,
}

/// Result of moving or admitting one file into the managed layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Flat file moved into its asset directory.
    Moved { from: PathBuf, to: PathBuf },
    /// External file copied in as a new asset's original.
    Copied { from: PathBuf, to: PathBuf },
    /// Destination already present and clobbering was not requested.
    SkippedExisting { source: PathBuf, existing: PathBuf },
    /// Extension not in [`IMAGE_EXTENSIONS`]; file left in place.
    Ignored { path: PathBuf },
}

impl Layout {
    /// Open a layout over `base`, creating the base directory if absent.
    ///
    /// The managed roots themselves are created by [`initialize`](Self::initialize).
    pub fn open(base: &Path) -> Result<Self, LayoutError> {
        if !base.exists() {
            fs::create_dir_all(base)?;
        }
        Ok(Self {
            base: base.to_path_buf(),
            images: base.join("images"),
            videos: base.join("videos"),
            generated: base.join("generated"),
        })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn images(&self) -> &Path {
        &self.images
    }

    pub fn videos(&self) -> &Path {
        &self.videos
    }

    pub fn generated(&self) -> &Path {
        &self.generated
    }

    /// Create all managed roots and migrate any flat files under `images/`.
    pub fn initialize(&self, clobber: bool) -> Result<Vec<MigrationOutcome>, LayoutError> {
        let outcomes = self.init_images(clobber)?;
        self.init_videos()?;
        self.init_generated()?;
        Ok(outcomes)
    }

    /// Create `images/` if absent, then migrate loose image files into
    /// per-asset subdirectories. Non-image files are reported as ignored
    /// and left where they are.
    pub fn init_images(&self, clobber: bool) -> Result<Vec<MigrationOutcome>, LayoutError> {
        fs::create_dir_all(&self.images)?;

        let mut outcomes = Vec::new();
        for path in sorted_entries(&self.images)? {
            if !path.is_file() {
                continue;
            }
            if extension_of(&path).is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str())) {
                outcomes.push(self.migrate_flat_file(&path, clobber)?);
            } else {
                outcomes.push(MigrationOutcome::Ignored { path });
            }
        }
        Ok(outcomes)
    }

    /// Video handling is a placeholder: the directory is created, nothing
    /// inside it is touched.
    pub fn init_videos(&self) -> Result<(), LayoutError> {
        fs::create_dir_all(&self.videos)?;
        Ok(())
    }

    pub fn init_generated(&self) -> Result<(), LayoutError> {
        fs::create_dir_all(&self.generated)?;
        Ok(())
    }

    /// Move a loose file from the images root to `{stem}/{stem}-orig.{ext}`.
    ///
    /// If the destination exists and `clobber` is false this is a no-op: the
    /// original stays in place and a [`MigrationOutcome::SkippedExisting`]
    /// notice is returned. Not safe against concurrent callers.
    pub fn migrate_flat_file(
        &self,
        path: &Path,
        clobber: bool,
    ) -> Result<MigrationOutcome, LayoutError> {
        let (stem, ext) = split_image_name(path)?;
        let dest = self.admit_destination(&stem, &ext)?;

        if dest.exists() && !clobber {
            return Ok(MigrationOutcome::SkippedExisting {
                source: path.to_path_buf(),
                existing: dest,
            });
        }
        fs::rename(path, &dest)?;
        Ok(MigrationOutcome::Moved {
            from: path.to_path_buf(),
            to: dest,
        })
    }

    /// Copy an image from an arbitrary path into the managed layout as a new
    /// asset's original. Same clobber semantics as flat-file migration; the
    /// source file is never modified.
    pub fn add_image(&self, source: &Path, clobber: bool) -> Result<MigrationOutcome, LayoutError> {
        let (stem, ext) = split_image_name(source)?;
        let dest = self.admit_destination(&stem, &ext)?;

        if dest.exists() && !clobber {
            return Ok(MigrationOutcome::SkippedExisting {
                source: source.to_path_buf(),
                existing: dest,
            });
        }
        fs::copy(source, &dest)?;
        Ok(MigrationOutcome::Copied {
            from: source.to_path_buf(),
            to: dest,
        })
    }

    /// Asset directories directly under the images root, sorted by name.
    /// Loose files at the top level are silently skipped.
    pub fn asset_dirs(&self) -> Result<Vec<PathBuf>, LayoutError> {
        Ok(sorted_entries(&self.images)?
            .into_iter()
            .filter(|p| p.is_dir())
            .collect())
    }

    /// The directory an asset's variants live in (existing or prospective).
    pub fn asset_dir(&self, base_name: &str) -> PathBuf {
        self.images.join(base_name)
    }

    /// Create the asset directory and return the destination path for its
    /// original variant.
    fn admit_destination(&self, stem: &str, ext: &str) -> Result<PathBuf, LayoutError> {
        let dir = self.asset_dir(stem);
        fs::create_dir_all(&dir)?;
        Ok(dir.join(naming::variant_file_name(stem, SizeTag::Orig, ext)))
    }
}

/// Map every file in an asset directory to its size tag.
///
/// Tags are unique per directory by convention; if duplicates exist (same
/// tag, different extension) the precedence is undefined — enumeration is
/// sorted, so in practice the lexicographically last filename wins. A file
/// that does not match the variant grammar is an error carrying its name.
pub fn variant_map(asset_dir: &Path) -> Result<BTreeMap<SizeTag, PathBuf>, LayoutError> {
    let mut map = BTreeMap::new();
    for path in sorted_entries(asset_dir)? {
        if !path.is_file() {
            continue;
        }
        let name = file_name_of(&path);
        let parsed = VariantName::parse(&name)?;
        map.insert(parsed.tag, path);
    }
    Ok(map)
}

/// Find an existing variant of `base_name` with the given tag, any extension.
///
/// Files that don't parse as variant names are ignored (glob semantics).
/// With multiple matching extensions the lexicographically first wins.
pub fn find_variant(
    asset_dir: &Path,
    base_name: &str,
    tag: SizeTag,
) -> Result<Option<PathBuf>, LayoutError> {
    if !asset_dir.is_dir() {
        return Ok(None);
    }
    for path in sorted_entries(asset_dir)? {
        if !path.is_file() {
            continue;
        }
        if let Ok(parsed) = VariantName::parse(&file_name_of(&path))
            && parsed.stem == base_name
            && parsed.tag == tag
        {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

/// Prospective path for a variant, no existence check.
pub fn variant_path(asset_dir: &Path, stem: &str, tag: SizeTag, ext: &str) -> PathBuf {
    asset_dir.join(naming::variant_file_name(stem, tag, ext))
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    entries.sort();
    Ok(entries)
}

fn file_name_of(path: &Path) -> String {
    path.file_name().unwrap_or_default().to_string_lossy().to_string()
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_string())
}

/// Split a candidate source file into (stem, ext), requiring an allowed
/// image extension. The match is case-sensitive: `photo.PNG` is rejected.
fn split_image_name(path: &Path) -> Result<(String, String), LayoutError> {
    let ext = extension_of(path)
        .filter(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
        .ok_or_else(|| LayoutError::NotAnImage(path.to_path_buf()))?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| LayoutError::NotAnImage(path.to_path_buf()))?;
    Ok((stem, ext))
}
