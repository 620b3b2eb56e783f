//! Centralized filename parsing for the variant naming convention.
//!
//! Every file inside an asset directory follows the same pattern: the asset
//! base name, a size tag, and an extension — `{stem}-{tag}.{ext}` where the
//! tag is either `orig` (the untouched source) or `WxH` (a generated variant
//! at width×height pixels). This module is the single place that grammar is
//! parsed and formatted.
//!
//! ## Canonical form
//!
//! The size separator is a literal `x` between the dimensions and a single
//! hyphen between stem and tag:
//!
//! - `sunset-orig.jpg` → stem `sunset`, original source
//! - `sunset-256x256.jpg` → stem `sunset`, 256×256 variant
//!
//! Extensions are one lowercase alphabetic run; `Sunset-ORIG.JPG` does not
//! parse. Parsing and formatting round-trip: for any parsed name,
//! `parse(format(n)) == n`.

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NamingError {
    #[error("filename does not follow the variant convention: {0}")]
    Unrecognized(String),
}

/// The size portion of a variant filename: `orig` or `WxH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SizeTag {
    /// The untouched source file.
    Orig,
    /// A generated variant at exactly width×height pixels.
    Size { width: u32, height: u32 },
}

impl SizeTag {
    /// Convenience constructor for the `WxH` form.
    pub fn size(width: u32, height: u32) -> Self {
        Self::Size { width, height }
    }

    /// Parse the tag portion of a filename (`orig` or `WxH`).
    pub fn parse(s: &str) -> Option<Self> {
        if s == "orig" {
            return Some(Self::Orig);
        }
        let (w, h) = s.split_once('x')?;
        if !is_digits(w) || !is_digits(h) {
            return None;
        }
        Some(Self::Size {
            width: w.parse().ok()?,
            height: h.parse().ok()?,
        })
    }
}

impl fmt::Display for SizeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Orig => write!(f, "orig"),
            Self::Size { width, height } => write!(f, "{}x{}", width, height),
        }
    }
}

/// A fully parsed variant filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantName {
    /// Asset base name (everything before the final `-{tag}`).
    pub stem: String,
    pub tag: SizeTag,
    /// Extension without the dot, lowercase alphabetic.
    pub ext: String,
}

impl VariantName {
    /// Parse a filename following `^<stem>-(orig|\d+x\d+)\.<ext>$`.
    ///
    /// The stem may itself contain hyphens; the tag is taken from the last
    /// hyphen-separated component before the extension.
    pub fn parse(filename: &str) -> Result<Self, NamingError> {
        let unrecognized = || NamingError::Unrecognized(filename.to_string());

        let (before_ext, ext) = filename.rsplit_once('.').ok_or_else(unrecognized)?;
        if ext.is_empty() || !ext.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(unrecognized());
        }

        let (stem, tag_str) = before_ext.rsplit_once('-').ok_or_else(unrecognized)?;
        if stem.is_empty() {
            return Err(unrecognized());
        }
        let tag = SizeTag::parse(tag_str).ok_or_else(unrecognized)?;

        Ok(Self {
            stem: stem.to_string(),
            tag,
            ext: ext.to_string(),
        })
    }
}

impl fmt::Display for VariantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}.{}", self.stem, self.tag, self.ext)
    }
}

/// Format the filename for a given stem, tag, and extension.
pub fn variant_file_name(stem: &str, tag: SizeTag, ext: &str) -> String {
    format!("{}-{}.{}", stem, tag, ext)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
