//! # Recuerdo - Synthetic Thermal Receipt Renderer
//!
//! Recuerdo turns a personal memory (short text plus an optional photo)
//! into the image of a thermal-printer receipt: a grayscale, high-contrast
//! composite with a Code128 barcode, fixed boilerplate lines and a
//! torn-paper silhouette. It provides:
//!
//! - **Thermal effect**: noise-dithered binary photo processing with a
//!   deterministic high-contrast fallback
//! - **Codes**: Code128 barcode and QR rasterization
//! - **Layout**: fixed-width receipt composition with bitmap fonts
//! - **Torn edge**: procedural torn-paper clipping
//!
//! ## Quick Start
//!
//! ```no_run
//! use recuerdo::{Entry, effect, render};
//!
//! let photo_bytes = std::fs::read("photo.jpg")?;
//! let entry = Entry::new("Coffee afternoon", Some(photo_bytes.clone()));
//!
//! // Simulate the thermal print head. Falls back to a plain high-contrast
//! // conversion, then degrades to a text-only receipt.
//! let processed = effect::process_bytes(&photo_bytes);
//!
//! // The archival render (no ink bleed) is what gets persisted.
//! let png = render::render_png(&entry, processed.as_ref(), false)?;
//! std::fs::write("receipt.png", png)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`entry`] | Memory records and generated receipt metadata |
//! | [`effect`] | Thermal photo effects and the fallback chain |
//! | [`codes`] | Code128 and QR raster generation |
//! | [`render`] | Receipt layout composition and PNG encoding |
//! | [`tear`] | Procedural torn-edge mask |
//! | [`shader`] | Intensity adjustment helpers |
//! | [`error`] | Error types |
//!
//! All components are synchronous and stateless; concurrent renders for
//! different entries are safe. Offloading the CPU-bound filter work off any
//! interactive path is the caller's job.

pub mod codes;
pub mod effect;
pub mod entry;
pub mod error;
pub mod render;
pub mod shader;
pub mod tear;

// Re-exports for convenience
pub use entry::Entry;
pub use error::RecuerdoError;
