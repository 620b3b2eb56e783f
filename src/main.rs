use clap::{Parser, Subcommand};
use pixshelf::cache::VariantCache;
use pixshelf::codec::{ImageCodec, RustCodec};
use pixshelf::layout::Layout;
use pixshelf::output;
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "pixshelf")]
#[command(about = "Disk-backed cache for resized image variants")]
#[command(long_about = "\
Disk-backed cache for resized image variants

Point pixshelf at a base directory and it maintains this layout:

  assets/
  ├── images/
  │   └── sunset/
  │       ├── sunset-orig.jpg          # untouched source
  │       ├── sunset-128x128.jpg       # generated thumbnail
  │       └── sunset-512x512.jpg       # generated variant
  ├── videos/                          # recognized, not yet handled
  └── generated/                       # reserved

Variants are generated on first request and reused thereafter. Batch
resizing only touches assets whose aspect ratio matches the request
exactly; everything else is skipped with a notice.

Allowed source extensions: jpg, jpeg, png, gif (lowercase).")]
#[command(version = version_string())]
struct Cli {
    /// Base directory of the managed tree (created if absent)
    #[arg(long, default_value = "assets", global = true)]
    base: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the managed roots and migrate loose files under images/
    Init {
        /// Overwrite an existing original when migrating a flat file
        #[arg(long)]
        clobber: bool,
    },
    /// Copy an image from anywhere into the shelf as a new asset
    Add {
        /// Source image file
        file: PathBuf,
        /// Overwrite the asset's original if it already exists
        #[arg(long)]
        clobber: bool,
    },
    /// Generate a WxH variant for every asset with a matching aspect ratio
    Resize { width: u32, height: u32 },
    /// Generate 128x128 thumbnails for all eligible assets
    Thumbnails,
    /// Fetch one asset at a given size, generating the variant if missing
    Get {
        /// Asset base name
        name: String,
        width: u32,
        height: u32,
        /// Also write the pixels to this path (format from extension)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the managed directory paths
    Paths {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let layout = Layout::open(&cli.base)?;

    match cli.command {
        Command::Init { clobber } => {
            let outcomes = layout.initialize(clobber)?;
            output::print_migrations(&outcomes);
            println!("initialized {}", layout.base().display());
        }
        Command::Add { file, clobber } => {
            layout.initialize(false)?;
            let outcome = layout.add_image(&file, clobber)?;
            output::print_migrations(std::slice::from_ref(&outcome));
        }
        Command::Resize { width, height } => {
            let cache = VariantCache::new(layout, RustCodec::new());
            let report = cache.resize_all(width, height)?;
            output::print_resize_report(&report);
        }
        Command::Thumbnails => {
            let cache = VariantCache::new(layout, RustCodec::new());
            let report = cache.create_thumbnails()?;
            output::print_resize_report(&report);
        }
        Command::Get {
            name,
            width,
            height,
            out,
        } => {
            let codec = RustCodec::new();
            let cache = VariantCache::new(layout, RustCodec::new());
            let pixels = cache.get_image(&name, width, height)?;
            println!("{}: {}x{} rgb", name, pixels.width(), pixels.height());
            if let Some(out) = out {
                codec.encode(&out, &pixels)?;
                println!("wrote {}", out.display());
            }
        }
        Command::Paths { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&layout)?);
            } else {
                output::print_paths(&layout);
            }
        }
    }

    Ok(())
}
