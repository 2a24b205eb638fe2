#![warn(missing_docs)]

//! G-code generation for the strata slicer.
//!
//! This crate walks stitched layer contours and emits an absolute-
//! coordinate motion stream with per-segment filament advance: travel
//! and print moves, retraction bracketing, priming skirt, and the
//! machine preamble/postamble.
//!
//! # Example
//!
//! ```ignore
//! use strata_gcode::{generate, Bounds, PrinterConfig};
//! use strata_slicer::{slice_mesh, SliceSettings};
//!
//! let layers = slice_mesh(&model.facets, &SliceSettings::default())?;
//! let bounds = Bounds { min_x, min_y, max_x, max_y };
//! generate(&mut out, PrinterConfig::default(), &layers, &bounds, 1.0, 10.0)?;
//! ```

pub mod config;
pub mod error;
pub mod printer;

pub use config::PrinterConfig;
pub use error::{GcodeError, Result};
pub use printer::{linear_distance, Printer};

use std::io::Write;

use strata_slicer::SliceLayer;

/// The model's XY extent in logical coordinates, supplied by the host
/// for skirt placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Smallest x over all vertices (mm).
    pub min_x: f64,
    /// Smallest y over all vertices (mm).
    pub min_y: f64,
    /// Largest x over all vertices (mm).
    pub max_x: f64,
    /// Largest y over all vertices (mm).
    pub max_y: f64,
}

/// Emit the complete program for a sliced model.
///
/// Preamble, initial raise onto the first layer plane, priming skirt,
/// then one pass per layer (section comment, contours, raise), and the
/// postamble. Layers must arrive in ascending z.
pub fn generate<W: Write>(
    out: W,
    config: PrinterConfig,
    layers: &[SliceLayer],
    bounds: &Bounds,
    spread: f64,
    skirt_distance: f64,
) -> Result<()> {
    config.validate()?;

    let mut printer = Printer::new(config, out);
    printer.preamble()?;
    printer.raise()?;
    printer.skirt(
        bounds.min_x,
        bounds.min_y,
        bounds.max_x,
        bounds.max_y,
        skirt_distance,
    )?;

    for layer in layers {
        printer.comment(&format!("layer: {}", layer.index))?;
        printer.print_layer(&layer.paths, spread)?;
        printer.raise()?;
    }

    printer.postamble()
}
