//! Printer configuration.

use serde::{Deserialize, Serialize};

use crate::error::{GcodeError, Result};

/// Machine and material parameters for the extrusion planner.
///
/// All logical coordinates handed to the planner are translated by
/// (`center_x`, `center_y`) before emission, so a model built around the
/// origin prints at the configured bed center. Speeds are in mm/s and are
/// converted to mm/min on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterConfig {
    /// Vertical rise per layer (mm).
    pub layer_height: f64,
    /// Linear scale on computed filament advance.
    pub flow_correction: f64,
    /// Extrusion temperature (°C), set once at startup.
    pub temperature: f64,
    /// Bed-frame X offset applied to every logical coordinate (mm).
    pub center_x: f64,
    /// Bed-frame Y offset applied to every logical coordinate (mm).
    pub center_y: f64,
    /// Source filament diameter (mm).
    pub filament_diameter: f64,
    /// Head speed for non-extruding moves (mm/s).
    pub travel_speed: f64,
    /// Head speed while extruding (mm/s).
    pub print_speed: f64,
    /// Filament speed during retraction (mm/s).
    pub retraction_speed: f64,
    /// Filament pullback before travel across empty space (mm).
    pub retraction_length: f64,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            layer_height: 0.2,
            flow_correction: 1.0,
            temperature: 210.0,
            center_x: 175.0,
            center_y: 100.0,
            filament_diameter: 2.85,
            travel_speed: 150.0,
            print_speed: 20.0,
            retraction_speed: 20.0,
            retraction_length: 2.0,
        }
    }
}

impl PrinterConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.layer_height <= 0.0 {
            return Err(GcodeError::InvalidConfig(
                "layer_height must be positive".into(),
            ));
        }
        if self.filament_diameter <= 0.0 {
            return Err(GcodeError::InvalidConfig(
                "filament_diameter must be positive".into(),
            ));
        }
        if self.travel_speed <= 0.0 || self.print_speed <= 0.0 {
            return Err(GcodeError::InvalidConfig(
                "speeds must be positive".into(),
            ));
        }
        Ok(())
    }
}
