//! Extrusion planning - walk contours and emit the motion command stream.

use std::f64::consts::PI;
use std::io::Write;

use strata_geom::Path;

use crate::config::PrinterConfig;
use crate::error::Result;

/// The extrusion planner.
///
/// Owns the command sink and the machine state: the current absolute
/// (x, y, z) position and the cumulative filament advance `e` since the
/// last `G92 E0`. Every operation appends newline-terminated commands;
/// the stream is strictly sequential, since absolute extrusion
/// accumulation makes reordering meaningless.
pub struct Printer<W: Write> {
    config: PrinterConfig,
    out: W,
    x: f64,
    y: f64,
    z: f64,
    e: f64,
}

impl<W: Write> Printer<W> {
    /// Create a planner over a command sink.
    pub fn new(config: PrinterConfig, out: W) -> Self {
        Self {
            config,
            out,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            e: 0.0,
        }
    }

    /// Consume the planner, returning the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Homing, units, coordinate modes, and the blocking temperature set.
    pub fn preamble(&mut self) -> Result<()> {
        writeln!(self.out, "G28       ; home all axis")?;
        writeln!(self.out, "G21       ; set units to millimeters")?;
        writeln!(self.out, "G90       ; set absolute coordinates")?;
        writeln!(self.out, "M82       ; use absolute distances for extrusion")?;
        self.set_temp_and_wait(self.config.temperature)?;
        writeln!(self.out)?;
        Ok(())
    }

    /// Retract, shut the heater off, park the head, release the motors.
    pub fn postamble(&mut self) -> Result<()> {
        self.retract()?;
        writeln!(self.out)?;
        writeln!(self.out, "M104 S0 ; turn off temperature")?;
        writeln!(self.out, "G28 X0  ; home X axis")?;
        writeln!(self.out, "M84     ; turn off motors")?;
        Ok(())
    }

    /// Emit a section marker comment.
    pub fn comment(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "\n; ------- {text} ------")?;
        Ok(())
    }

    /// Reset the extrusion accumulator to zero.
    pub fn zero_extrusion(&mut self) -> Result<()> {
        writeln!(self.out, "G92 E0    ; zero extrusion")?;
        self.e = 0.0;
        Ok(())
    }

    /// Set the hotend temperature and block until it is reached.
    pub fn set_temp_and_wait(&mut self, temp: f64) -> Result<()> {
        writeln!(self.out, "M109 S{temp:.3} ; set and wait head temperature")?;
        Ok(())
    }

    /// Advance to the next layer plane and zero the accumulator.
    pub fn raise(&mut self) -> Result<()> {
        self.z += self.config.layer_height;
        writeln!(
            self.out,
            "G0 Z{:.3} F{:.3} ; raise",
            self.z,
            60.0 * self.config.travel_speed
        )?;
        self.zero_extrusion()
    }

    /// Travel to a logical (x, y) without extruding.
    ///
    /// Always emits, even when the target equals the current position.
    pub fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.x = x + self.config.center_x;
        self.y = y + self.config.center_y;
        writeln!(
            self.out,
            "G0 X{:.3} Y{:.3} F{:.3} ; move",
            self.x,
            self.y,
            60.0 * self.config.travel_speed
        )?;
        Ok(())
    }

    /// Travel bracketed by a retract/unretract pair, for crossing empty
    /// space between contours without oozing.
    pub fn move_and_retract(&mut self, x: f64, y: f64) -> Result<()> {
        self.retract()?;
        self.move_to(x, y)?;
        self.unretract()
    }

    /// Extrude along a straight line to a logical (x, y).
    ///
    /// A zero-length target is dropped: no print move may have both
    /// displacements zero.
    pub fn print_to(&mut self, x: f64, y: f64, spread: f64) -> Result<()> {
        let tx = x + self.config.center_x;
        let ty = y + self.config.center_y;
        let dx = tx - self.x;
        let dy = ty - self.y;
        if dx == 0.0 && dy == 0.0 {
            return Ok(());
        }
        self.x = tx;
        self.y = ty;
        self.e += self.extrusion_length(linear_distance(dx, dy), spread);
        writeln!(
            self.out,
            "G0 X{:.3} Y{:.3} E{:.3} F{:.3} ; print",
            self.x,
            self.y,
            self.e,
            60.0 * self.config.print_speed
        )?;
        Ok(())
    }

    /// Filament advance for a planar move of length `d`.
    ///
    /// Models the extrudate cross-section as a stadium: a rectangle of
    /// width `spread` capped by two half circles, all in units of the
    /// layer height, normalized to the filament's cross-sectional area.
    fn extrusion_length(&self, d: f64, spread: f64) -> f64 {
        4.0 * self.config.flow_correction
            * self.config.layer_height
            * self.config.layer_height
            * d
            * (spread + PI / 2.0)
            / (PI * self.config.filament_diameter * self.config.filament_diameter)
    }

    fn retract(&mut self) -> Result<()> {
        self.e -= self.config.retraction_length;
        writeln!(
            self.out,
            "G0 E{:.3} F{:.3} ; retract",
            self.e,
            60.0 * self.config.retraction_speed
        )?;
        Ok(())
    }

    fn unretract(&mut self) -> Result<()> {
        self.e += self.config.retraction_length;
        writeln!(
            self.out,
            "G0 E{:.3} F{:.3} ; unretract",
            self.e,
            60.0 * self.config.retraction_speed
        )?;
        Ok(())
    }

    /// Prime the nozzle with two concentric rectangles around the model's
    /// bounding box, spaced one layer height apart.
    ///
    /// The planner does not know the model; the host supplies the XY
    /// bounds. Eight print moves, nothing else extrudes before them.
    pub fn skirt(
        &mut self,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        distance: f64,
    ) -> Result<()> {
        self.comment("skirt")?;

        let outer = distance + self.config.layer_height;
        self.move_to(min_x - outer, min_y - outer)?;
        self.print_to(max_x + outer, min_y - outer, 1.0)?;
        self.print_to(max_x + outer, max_y + outer, 1.0)?;
        self.print_to(min_x - outer, max_y + outer, 1.0)?;
        self.print_to(min_x - outer, min_y - outer, 1.0)?;

        self.move_to(min_x - distance, min_y - distance)?;
        self.print_to(max_x + distance, min_y - distance, 1.0)?;
        self.print_to(max_x + distance, max_y + distance, 1.0)?;
        self.print_to(min_x - distance, max_y + distance, 1.0)?;
        self.print_to(min_x - distance, min_y - distance, 1.0)?;

        Ok(())
    }

    /// Trace one layer's contours.
    ///
    /// Each contour gets a retracted travel to its first vertex, prints
    /// through the remaining vertices, and closes with a final print back
    /// to the first, since the closing edge is implicit in the path.
    pub fn print_layer(&mut self, paths: &[Path], spread: f64) -> Result<()> {
        for path in paths {
            let Some(first) = path.points.first() else {
                continue;
            };
            self.move_and_retract(f64::from(first.x), f64::from(first.y))?;
            for point in &path.points[1..] {
                self.print_to(f64::from(point.x), f64::from(point.y), spread)?;
            }
            self.print_to(f64::from(first.x), f64::from(first.y), spread)?;
        }
        Ok(())
    }

    /// Current cumulative filament advance (mm).
    pub fn extrusion(&self) -> f64 {
        self.e
    }
}

/// Length of the planar displacement (dx, dy).
pub fn linear_distance(dx: f64, dy: f64) -> f64 {
    (dx * dx + dy * dy).sqrt()
}
