//! Disk-backed variant cache: reuse-or-create for resized images.
//!
//! [`VariantCache`] composes the layout resolver with an [`ImageCodec`].
//! Every operation follows the same shape: look for an on-disk variant
//! matching the request, and only when none exists decode a source, resize,
//! and persist the result. Re-running any operation over an unchanged tree
//! performs no additional writes.
//!
//! ## Source preference (batch path)
//!
//! When a batch resize must generate a variant, it prefers the highest
//! resolution cached variant among the standard sizes 512, 256, 128 (in that
//! order) over the original: downscaling an existing variant is cheaper and
//! usually visually sufficient. Only the original is guaranteed present —
//! its absence is a hard error.
//!
//! ## Aspect-ratio gate
//!
//! The batch path only resizes assets whose source has exactly the requested
//! aspect ratio, compared by integer cross-multiplication
//! (`sw * rh == rw * sh`) — the same acceptance set as exact float equality,
//! without the floats. No tolerance: a 1999×1000 source does not match a
//! 2:1 request and is skipped with a diagnostic. Dimensions come from the
//! decoded pixel buffer, so width and height are the real ones.
//!
//! ## Persistence
//!
//! Single-asset generation persists its result next to the original before
//! returning it, so the next request for the same size is a cache hit.

use crate::codec::{CodecError, ImageCodec};
use crate::layout::{self, Layout, LayoutError};
use crate::naming::{SizeTag, VariantName};
use image::RgbImage;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Standard variant edge sizes, highest first. Batch resize prefers these
/// (square) variants as resize sources before falling back to the original.
pub const STANDARD_SIZES: &[u32] = &[512, 256, 128];

/// Thumbnail convention: 128×128.
pub const THUMBNAIL_EDGE: u32 = 128;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("no asset directory for '{0}'")]
    UnknownAsset(String),
    #[error("asset '{0}' has no original variant (*-orig.*)")]
    MissingOriginal(String),
}

/// What happened to one asset during a batch resize.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResizeOutcome {
    /// A new variant was generated and written.
    Created { path: PathBuf },
    /// A variant at the requested size already existed; nothing to do.
    Cached,
    /// Source aspect ratio differs from the request; asset left unresized.
    SkippedAspect { source_width: u32, source_height: u32 },
}

/// Per-asset outcomes of one batch resize run.
#[derive(Debug, Serialize)]
pub struct ResizeReport {
    pub width: u32,
    pub height: u32,
    pub entries: Vec<(String, ResizeOutcome)>,
}

impl ResizeReport {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            entries: Vec::new(),
        }
    }

    pub fn stats(&self) -> ResizeStats {
        let mut stats = ResizeStats::default();
        for (_, outcome) in &self.entries {
            match outcome {
                ResizeOutcome::Created { .. } => stats.created += 1,
                ResizeOutcome::Cached => stats.cached += 1,
                ResizeOutcome::SkippedAspect { .. } => stats.skipped += 1,
            }
        }
        stats
    }
}

/// Aggregate counts for a batch resize run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ResizeStats {
    pub created: u32,
    pub cached: u32,
    pub skipped: u32,
}

impl ResizeStats {
    pub fn total(&self) -> u32 {
        self.created + self.cached + self.skipped
    }
}

impl fmt::Display for ResizeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cached > 0 || self.skipped > 0 {
            if self.skipped > 0 {
                write!(
                    f,
                    "{} created, {} cached, {} skipped ({} assets)",
                    self.created,
                    self.cached,
                    self.skipped,
                    self.total()
                )
            } else {
                write!(
                    f,
                    "{} created, {} cached ({} assets)",
                    self.created,
                    self.cached,
                    self.total()
                )
            }
        } else {
            write!(f, "{} created", self.created)
        }
    }
}

/// The cache itself: a [`Layout`] plus a codec.
pub struct VariantCache<C> {
    layout: Layout,
    codec: C,
}

impl<C: ImageCodec> VariantCache<C> {
    pub fn new(layout: Layout, codec: C) -> Self {
        Self { layout, codec }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Fetch an asset's pixels at the requested size, generating and
    /// persisting the variant on first request.
    ///
    /// Cache hit: any-extension match on `{base}-{W}x{H}.*`. Miss: the
    /// original is decoded, stretched to exactly (width, height), written
    /// next to the original with its extension, and returned.
    pub fn get_image(
        &self,
        base_name: &str,
        width: u32,
        height: u32,
    ) -> Result<RgbImage, CacheError> {
        let dir = self.layout.asset_dir(base_name);
        if !dir.is_dir() {
            return Err(CacheError::UnknownAsset(base_name.to_string()));
        }

        let tag = SizeTag::size(width, height);
        if let Some(hit) = layout::find_variant(&dir, base_name, tag)? {
            return Ok(self.codec.decode(&hit)?);
        }

        let orig = layout::find_variant(&dir, base_name, SizeTag::Orig)?
            .ok_or_else(|| CacheError::MissingOriginal(base_name.to_string()))?;
        let source = self.codec.decode(&orig)?;
        let resized = self.codec.resize(&source, width, height);

        let ext = orig
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        let dest = layout::variant_path(&dir, base_name, tag, &ext);
        self.codec.encode(&dest, &resized)?;
        Ok(resized)
    }

    /// Fetch an asset's 128×128 thumbnail (cache-or-generate).
    pub fn get_thumbnail(&self, base_name: &str) -> Result<RgbImage, CacheError> {
        self.get_image(base_name, THUMBNAIL_EDGE, THUMBNAIL_EDGE)
    }

    /// Generate a (width, height) variant for every asset whose source
    /// matches the requested aspect ratio. Assets with a matching variant
    /// already on disk are skipped; idempotent over an unchanged tree.
    pub fn resize_all(&self, width: u32, height: u32) -> Result<ResizeReport, CacheError> {
        let requested = SizeTag::size(width, height);
        let mut report = ResizeReport::new(width, height);

        for dir in self.layout.asset_dirs()? {
            let asset = dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            let variants = layout::variant_map(&dir)?;
            if variants.contains_key(&requested) {
                report.entries.push((asset, ResizeOutcome::Cached));
                continue;
            }

            let source_path = STANDARD_SIZES
                .iter()
                .find_map(|&edge| variants.get(&SizeTag::size(edge, edge)))
                .or_else(|| variants.get(&SizeTag::Orig))
                .ok_or_else(|| CacheError::MissingOriginal(asset.clone()))?;

            let source = self.codec.decode(source_path)?;
            let (sw, sh) = source.dimensions();
            if u64::from(sw) * u64::from(height) != u64::from(width) * u64::from(sh) {
                report.entries.push((
                    asset,
                    ResizeOutcome::SkippedAspect {
                        source_width: sw,
                        source_height: sh,
                    },
                ));
                continue;
            }

            // Destination stem is the asset directory name, extension that
            // of the chosen source.
            let ext = source_path
                .extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_default();
            let dest = layout::variant_path(&dir, &asset, requested, &ext);
            if dest.exists() {
                report.entries.push((asset, ResizeOutcome::Cached));
                continue;
            }

            let resized = self.codec.resize(&source, width, height);
            self.codec.encode(&dest, &resized)?;
            report
                .entries
                .push((asset, ResizeOutcome::Created { path: dest }));
        }

        Ok(report)
    }

    /// Batch-generate the 128×128 thumbnail variant for all eligible assets.
    pub fn create_thumbnails(&self) -> Result<ResizeReport, CacheError> {
        self.resize_all(THUMBNAIL_EDGE, THUMBNAIL_EDGE)
    }

    /// All on-disk 128×128 thumbnails, keyed by asset base name.
    ///
    /// Keys are exactly the assets that have a `-128x128` variant; nothing
    /// is generated here.
    pub fn thumbnails(&self) -> Result<BTreeMap<String, RgbImage>, CacheError> {
        let mut thumbs = BTreeMap::new();
        if !self.layout.images().is_dir() {
            return Ok(thumbs);
        }
        let tag = SizeTag::size(THUMBNAIL_EDGE, THUMBNAIL_EDGE);
        for entry in walkdir::WalkDir::new(self.layout.images())
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
        {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(parsed) = VariantName::parse(&entry.file_name().to_string_lossy()) else {
                continue;
            };
            if parsed.tag != tag {
                continue;
            }
            let asset = entry
                .path()
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            thumbs.insert(asset, self.codec.decode(entry.path())?);
        }
        Ok(thumbs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::RustCodec;
    use crate::codec::tests::{MockCodec, RecordedOp};
    use crate::test_helpers::{list_files, shelf_with_assets, write_solid_png};
    use image::RgbImage;
    use tempfile::TempDir;

    fn cache(layout: Layout) -> VariantCache<RustCodec> {
        VariantCache::new(layout, RustCodec::new())
    }

    // =========================================================================
    // Batch resize
    // =========================================================================

    #[test]
    fn resize_all_creates_matching_aspect_variant() {
        let tmp = TempDir::new().unwrap();
        let layout = shelf_with_assets(&tmp, &[("sunset", 200, 100, [0, 0, 255])]);
        let cache = cache(layout);

        let report = cache.resize_all(50, 25).unwrap();

        assert_eq!(report.stats().created, 1);
        let out = cache.layout().images().join("sunset/sunset-50x25.png");
        assert!(out.is_file());
        let pixels = RustCodec::new().decode(&out).unwrap();
        assert_eq!(pixels.dimensions(), (50, 25));
    }

    #[test]
    fn resize_all_skips_mismatched_aspect() {
        let tmp = TempDir::new().unwrap();
        let layout = shelf_with_assets(&tmp, &[("pano", 300, 100, [9, 9, 9])]);
        let cache = cache(layout);

        let before = list_files(cache.layout().images());
        let report = cache.resize_all(100, 100).unwrap();

        assert_eq!(
            report.entries[0].1,
            ResizeOutcome::SkippedAspect {
                source_width: 300,
                source_height: 100
            }
        );
        // File set unchanged.
        assert_eq!(list_files(cache.layout().images()), before);
    }

    #[test]
    fn resize_all_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let layout = shelf_with_assets(
            &tmp,
            &[
                ("square", 200, 200, [10, 10, 10]),
                ("wide", 300, 100, [20, 20, 20]),
            ],
        );
        let cache = cache(layout);

        let first = cache.resize_all(100, 100).unwrap();
        assert_eq!(first.stats().created, 1);
        let after_first = list_files(cache.layout().images());

        let second = cache.resize_all(100, 100).unwrap();
        assert_eq!(second.stats().created, 0);
        assert_eq!(second.stats().cached, 1);
        assert_eq!(second.stats().skipped, 1);
        assert_eq!(list_files(cache.layout().images()), after_first);
    }

    #[test]
    fn resize_all_prefers_standard_size_over_orig() {
        let tmp = TempDir::new().unwrap();
        // orig is blue; the 256x256 cached variant is red. The generated
        // variant must come from the red one.
        let layout = shelf_with_assets(&tmp, &[("tagged", 256, 256, [0, 0, 255])]);
        write_solid_png(
            &layout.images().join("tagged/tagged-256x256.png"),
            256,
            256,
            [255, 0, 0],
        );
        let cache = cache(layout);

        cache.resize_all(64, 64).unwrap();

        let out = RustCodec::new()
            .decode(&cache.layout().images().join("tagged/tagged-64x64.png"))
            .unwrap();
        let px = out.get_pixel(32, 32);
        assert!(px.0[0] > 200, "expected red provenance, got {:?}", px);
        assert!(px.0[2] < 50, "expected red provenance, got {:?}", px);
    }

    #[test]
    fn resize_all_prefers_higher_standard_size_first() {
        let tmp = TempDir::new().unwrap();
        let layout = shelf_with_assets(&tmp, &[("tagged", 512, 512, [0, 0, 255])]);
        // 512 is red, 128 is green; 512 must win.
        write_solid_png(
            &layout.images().join("tagged/tagged-512x512.png"),
            512,
            512,
            [255, 0, 0],
        );
        write_solid_png(
            &layout.images().join("tagged/tagged-128x128.png"),
            128,
            128,
            [0, 255, 0],
        );
        let cache = cache(layout);

        cache.resize_all(64, 64).unwrap();

        let out = RustCodec::new()
            .decode(&cache.layout().images().join("tagged/tagged-64x64.png"))
            .unwrap();
        let px = out.get_pixel(32, 32);
        assert!(px.0[0] > 200 && px.0[1] < 50, "expected red, got {:?}", px);
    }

    #[test]
    fn resize_all_missing_orig_is_hard_error() {
        let tmp = TempDir::new().unwrap();
        let layout = shelf_with_assets(&tmp, &[]);
        std::fs::create_dir_all(layout.images().join("empty")).unwrap();
        let cache = cache(layout);

        let err = cache.resize_all(64, 64).unwrap_err();
        assert!(matches!(err, CacheError::MissingOriginal(name) if name == "empty"));
    }

    // =========================================================================
    // Single-asset fetch
    // =========================================================================

    #[test]
    fn get_image_generates_and_persists() {
        let tmp = TempDir::new().unwrap();
        let layout = shelf_with_assets(&tmp, &[("sunset", 100, 50, [0, 200, 0])]);
        let cache = cache(layout);

        let pixels = cache.get_image("sunset", 10, 10).unwrap();

        // Stretched to the exact request, aspect be damned.
        assert_eq!(pixels.dimensions(), (10, 10));
        // Persisted for the next caller.
        assert!(cache
            .layout()
            .images()
            .join("sunset/sunset-10x10.png")
            .is_file());
    }

    #[test]
    fn get_image_hit_decodes_without_regenerating() {
        let tmp = TempDir::new().unwrap();
        let layout = shelf_with_assets(&tmp, &[("sunset", 100, 100, [0, 0, 255])]);
        write_solid_png(
            &layout.images().join("sunset/sunset-32x32.png"),
            32,
            32,
            [255, 0, 0],
        );

        // Mock codec: a decode of the existing variant, nothing else.
        let mock = MockCodec::new()
            .with_image("sunset-32x32.png", RgbImage::from_pixel(32, 32, image::Rgb([255, 0, 0])));
        let cache = VariantCache::new(layout, mock);

        let pixels = cache.get_image("sunset", 32, 32).unwrap();
        assert_eq!(pixels.dimensions(), (32, 32));

        let ops = cache.codec.ops();
        assert_eq!(ops, vec![RecordedOp::Decode("sunset-32x32.png".to_string())]);
    }

    #[test]
    fn get_image_missing_orig_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let layout = shelf_with_assets(&tmp, &[]);
        std::fs::create_dir_all(layout.images().join("ghost")).unwrap();
        let cache = cache(layout);

        let err = cache.get_image("ghost", 10, 10).unwrap_err();
        assert!(matches!(err, CacheError::MissingOriginal(_)));
    }

    #[test]
    fn get_image_unknown_asset_errors() {
        let tmp = TempDir::new().unwrap();
        let layout = shelf_with_assets(&tmp, &[]);
        let cache = cache(layout);

        let err = cache.get_image("nobody", 10, 10).unwrap_err();
        assert!(matches!(err, CacheError::UnknownAsset(_)));
    }

    // =========================================================================
    // Thumbnails
    // =========================================================================

    #[test]
    fn create_thumbnails_uses_128_convention() {
        let tmp = TempDir::new().unwrap();
        let layout = shelf_with_assets(&tmp, &[("square", 256, 256, [1, 2, 3])]);
        let cache = cache(layout);

        cache.create_thumbnails().unwrap();

        assert!(cache
            .layout()
            .images()
            .join("square/square-128x128.png")
            .is_file());
    }

    #[test]
    fn thumbnails_keys_match_assets_with_128_variant() {
        let tmp = TempDir::new().unwrap();
        let layout = shelf_with_assets(
            &tmp,
            &[
                ("square", 256, 256, [1, 2, 3]),
                ("wide", 300, 100, [4, 5, 6]),
            ],
        );
        let cache = cache(layout);

        // Only `square` passes the aspect gate at 128x128.
        cache.create_thumbnails().unwrap();
        let thumbs = cache.thumbnails().unwrap();

        assert_eq!(thumbs.keys().collect::<Vec<_>>(), vec!["square"]);
        assert_eq!(thumbs["square"].dimensions(), (128, 128));
    }

    #[test]
    fn thumbnails_empty_without_images_root() {
        let tmp = TempDir::new().unwrap();
        let layout = Layout::open(&tmp.path().join("bare")).unwrap();
        let cache = cache(layout);
        assert!(cache.thumbnails().unwrap().is_empty());
    }

    #[test]
    fn get_thumbnail_generates_at_128() {
        let tmp = TempDir::new().unwrap();
        let layout = shelf_with_assets(&tmp, &[("square", 256, 256, [7, 7, 7])]);
        let cache = cache(layout);

        let thumb = cache.get_thumbnail("square").unwrap();
        assert_eq!(thumb.dimensions(), (128, 128));
    }

    // =========================================================================
    // Stats display
    // =========================================================================

    #[test]
    fn stats_display_created_only() {
        let stats = ResizeStats {
            created: 3,
            cached: 0,
            skipped: 0,
        };
        assert_eq!(stats.to_string(), "3 created");
    }

    #[test]
    fn stats_display_with_cached() {
        let stats = ResizeStats {
            created: 2,
            cached: 5,
            skipped: 0,
        };
        assert_eq!(stats.to_string(), "2 created, 5 cached (7 assets)");
    }

    #[test]
    fn stats_display_with_skipped() {
        let stats = ResizeStats {
            created: 1,
            cached: 2,
            skipped: 3,
        };
        assert_eq!(stats.to_string(), "1 created, 2 cached, 3 skipped (6 assets)");
    }
}
