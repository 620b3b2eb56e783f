//! # Pixshelf
//!
//! A disk-backed cache for resized image variants. Given a source image,
//! pixshelf ensures a resized version at a requested resolution exists under
//! a standardized directory layout, generating it on first request and
//! reusing it thereafter — so repeated consumers never pay for the same
//! resize twice.
//!
//! # Architecture: Resolve, Then Generate
//!
//! Every operation composes the same two pieces sequentially:
//!
//! ```text
//! caller → layout (find candidates) → cache (reuse-or-create) → file + pixels
//! ```
//!
//! 1. **Layout resolver** ([`layout`]) — locates the canonical source file
//!    and any already-generated variants by filename convention.
//! 2. **Variant generator** ([`cache`]) — decides whether an existing
//!    variant satisfies the request or synthesizes one (preferring a cached
//!    standard-size variant over the original as the resize source), and
//!    persists the result.
//!
//! # Directory Contract
//!
//! ```text
//! {base}/
//! ├── images/
//! │   └── {asset}/
//! │       ├── {asset}-orig.{ext}       # untouched source
//! │       └── {asset}-{W}x{H}.{ext}    # generated variants
//! ├── videos/                          # placeholder, unimplemented
//! └── generated/                       # placeholder, unimplemented
//! ```
//!
//! Allowed source extensions: jpg, jpeg, png, gif (lowercase). The layout is
//! compatible bit-for-bit with trees produced by earlier tooling.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | `{stem}-{orig\|WxH}.{ext}` grammar — the one place filenames are parsed |
//! | [`layout`] | Managed roots, flat-file migration, variant discovery |
//! | [`codec`] | `ImageCodec` seam: decode / resize / encode over the `image` crate |
//! | [`cache`] | Reuse-or-create policy, batch resize, thumbnail convention |
//! | [`output`] | CLI report formatting |
//!
//! # Design Decisions
//!
//! ## One Canonical Size Tag
//!
//! Variants are always named `{stem}-{W}x{H}.{ext}` — a hyphen before the
//! tag, a literal `x` between the dimensions. Historical trees mixed a
//! `{W}-{H}` form on one code path; only the `WxH` form ever reached disk,
//! so it is the one the grammar accepts.
//!
//! ## Every Generation Persists
//!
//! Single-asset fetches write the variant they generate before returning it.
//! A cache that forgets what it just computed isn't a cache.
//!
//! ## Exact Aspect Gate, Stretching Resize
//!
//! Batch resizing only touches assets whose source aspect ratio equals the
//! request exactly (integer cross-multiplication, no tolerance). The resize
//! itself stretches to the exact requested dimensions rather than cropping —
//! callers asking for a mismatched ratio via the single-asset path get
//! deformed pixels, documented and intentional.
//!
//! ## Single-Threaded, No Locking
//!
//! All operations are blocking, sequential filesystem and codec calls. The
//! tree is mutated in place without locks; concurrent processes racing on
//! one asset can produce duplicate or partial writes. The supported pattern
//! is a single interactive caller.

pub mod cache;
pub mod codec;
pub mod layout;
pub mod naming;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
