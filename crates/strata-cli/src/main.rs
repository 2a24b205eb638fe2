//! strata CLI - slice STL meshes into extruder G-code.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use strata_gcode::{generate, Bounds, PrinterConfig};
use strata_slicer::{slice_facets, stitch_layer, SliceLayer, SliceSettings};

mod svg;

/// How far outside the model's bounding box the priming skirt runs (mm).
const SKIRT_DISTANCE: f64 = 10.0;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Slice an STL mesh into extruder G-code", long_about = None)]
struct Cli {
    /// The STL file to slice.
    #[arg(long)]
    file: PathBuf,

    /// Uniform scale applied to the model before slicing.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// The extrusion spread factor.
    #[arg(long, default_value_t = 1.0)]
    spread: f64,

    /// The head movement speed when extruding (mm/s).
    #[arg(long, default_value_t = 20.0)]
    speed: f64,

    /// The temperature of extrusion (°C).
    #[arg(long, default_value_t = 210.0)]
    temp: f64,

    /// The layer height to use for slicing (mm).
    #[arg(long = "layerHeight", default_value_t = 0.2)]
    layer_height: f64,

    /// Re-emit the parsed model as ASCII STL on stdout and exit.
    #[arg(long = "exportAscii")]
    export_ascii: bool,

    /// Write a `<file>.<layer>.svg` preview per layer.
    #[arg(long = "exportSvg")]
    export_svg: bool,

    /// Write G-code here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let file = File::open(&cli.file)
        .with_context(|| format!("opening {}", cli.file.display()))?;
    let mut model = strata_stl::parse(file)
        .with_context(|| format!("parsing {}", cli.file.display()))?;

    if cli.scale != 1.0 {
        for facet in &mut model.facets {
            for vertex in &mut facet.vertices {
                *vertex *= cli.scale;
            }
        }
    }

    if cli.export_ascii {
        let name = cli
            .file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".into());
        strata_stl::write_ascii(io::stdout().lock(), &name, &model)?;
        return Ok(());
    }

    let settings = SliceSettings {
        layer_height: cli.layer_height,
    };
    let map = slice_facets(&model.facets, &settings)?;
    info!(
        "sliced {} facets into layers {}..{}",
        model.facets.len(),
        map.min_layer,
        map.max_layer
    );

    let mut layers = Vec::new();
    for index in map.min_layer..=map.max_layer {
        let Some(segments) = map.layers.get(&index) else {
            continue;
        };
        if cli.export_svg {
            svg::write_layer(&cli.file, index, &segments.ordered)
                .with_context(|| format!("writing preview for layer {index}"))?;
        }
        layers.push(SliceLayer {
            index,
            z: f64::from(index) * settings.layer_height,
            paths: stitch_layer(segments),
        });
    }

    let bounds = xy_bounds(&model.facets);
    let config = PrinterConfig {
        layer_height: cli.layer_height,
        temperature: cli.temp,
        print_speed: cli.speed,
        ..Default::default()
    };

    match cli.output {
        Some(path) => {
            let out = BufWriter::new(
                File::create(&path).with_context(|| format!("creating {}", path.display()))?,
            );
            write_gcode(out, config, &layers, &bounds, cli.spread)?;
        }
        None => {
            write_gcode(io::stdout().lock(), config, &layers, &bounds, cli.spread)?;
        }
    }

    Ok(())
}

fn write_gcode<W: Write>(
    out: W,
    config: PrinterConfig,
    layers: &[SliceLayer],
    bounds: &Bounds,
    spread: f64,
) -> Result<()> {
    generate(out, config, layers, bounds, spread, SKIRT_DISTANCE)?;
    Ok(())
}

/// XY extent of the facet table, for skirt placement.
fn xy_bounds(facets: &[strata_geom::Facet]) -> Bounds {
    let mut bounds = Bounds {
        min_x: f64::MAX,
        min_y: f64::MAX,
        max_x: f64::MIN,
        max_y: f64::MIN,
    };
    for facet in facets {
        for vertex in &facet.vertices {
            bounds.min_x = bounds.min_x.min(f64::from(vertex.x));
            bounds.min_y = bounds.min_y.min(f64::from(vertex.y));
            bounds.max_x = bounds.max_x.max(f64::from(vertex.x));
            bounds.max_y = bounds.max_y.max(f64::from(vertex.y));
        }
    }
    if facets.is_empty() {
        bounds = Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 0.0,
            max_y: 0.0,
        };
    }
    bounds
}
