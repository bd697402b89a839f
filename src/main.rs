//! # Recuerdo CLI
//!
//! Command-line calling layer for the receipt renderer.
//!
//! ## Usage
//!
//! ```bash
//! # Render a text-only memory
//! recuerdo render --text "Coffee afternoon"
//!
//! # Render with a photo, display variant with ink bleed
//! recuerdo render --text "Beach" --photo beach.jpg --ink-bleed --out display.png
//!
//! # Tune the dithering threshold
//! recuerdo render --text "Night walk" --photo walk.jpg --intensity 0.5
//!
//! # Standalone codes
//! recuerdo barcode 581234567890
//! recuerdo qr "https://example.invalid/recuerdo"
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use recuerdo::{Entry, RecuerdoError, codes, effect, render};

/// Recuerdo - render personal memories as thermal receipts
#[derive(Parser, Debug)]
#[command(name = "recuerdo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a memory as a receipt PNG
    Render {
        /// Memo text
        #[arg(long, default_value = "")]
        text: String,

        /// Source photo file
        #[arg(long)]
        photo: Option<PathBuf>,

        /// Output PNG path
        #[arg(long, default_value = "receipt.png")]
        out: PathBuf,

        /// Apply the cosmetic ink-bleed blur (display variant; the archival
        /// artifact is always rendered without it)
        #[arg(long)]
        ink_bleed: bool,

        /// Dithering threshold for the photo effect
        #[arg(long, default_value_t = effect::DEFAULT_INTENSITY)]
        intensity: f32,

        /// Also write the entry record as JSON next to the PNG
        #[arg(long)]
        record: bool,
    },

    /// Render a Code128 barcode PNG
    Barcode {
        /// ASCII payload
        payload: String,

        #[arg(long, default_value = "barcode.png")]
        out: PathBuf,
    },

    /// Render a QR code PNG
    Qr {
        /// UTF-8 payload
        payload: String,

        #[arg(long, default_value = "qr.png")]
        out: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), RecuerdoError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            text,
            photo,
            out,
            ink_bleed,
            intensity,
            record,
        } => {
            let photo_bytes = match &photo {
                Some(path) => Some(std::fs::read(path)?),
                None => None,
            };
            if text.is_empty() && photo_bytes.is_none() {
                eprintln!("Error: a memory needs text or a photo");
                std::process::exit(2);
            }

            let processed = photo_bytes.as_deref().and_then(|bytes| {
                match effect::decode(bytes) {
                    Ok(img) => effect::process_with_intensity(&img, intensity),
                    Err(e) => {
                        eprintln!("warning: photo ignored: {}", e);
                        None
                    }
                }
            });

            let mut entry = Entry::new(text, photo_bytes);
            let png = render::render_png(&entry, processed.as_ref(), ink_bleed)?;
            std::fs::write(&out, &png)?;
            println!(
                "wrote {} ({} | {})",
                out.display(),
                entry.transaction_id,
                if ink_bleed { "display" } else { "archival" }
            );

            if !ink_bleed {
                entry.attach_rendered(png);
            }
            if record {
                let json =
                    serde_json::to_string_pretty(&entry).map_err(std::io::Error::other)?;
                let record_path = out.with_extension("json");
                std::fs::write(&record_path, json)?;
                println!("wrote {}", record_path.display());
            }
        }

        Commands::Barcode { payload, out } => {
            let img = codes::barcode(&payload)?;
            img.save(&out)?;
            println!("wrote {}", out.display());
        }

        Commands::Qr { payload, out } => {
            let img = codes::qr(&payload)?;
            img.save(&out)?;
            println!("wrote {}", out.display());
        }
    }

    Ok(())
}
