//! Per-layer SVG previews for inspecting slices.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use strata_geom::Segment;

/// Write one layer's segments as `<stem>.<layer>.svg`.
///
/// Debug artifact only: every segment becomes a `<line>` inside a group
/// translated away from the viewport edge.
pub fn write_layer(stem: &Path, layer: i32, segments: &[Segment]) -> io::Result<()> {
    let name = format!("{}.{}.svg", stem.display(), layer);
    let mut out = BufWriter::new(File::create(name)?);

    writeln!(out, "<svg xmlns=\"http://www.w3.org/2000/svg\">")?;
    writeln!(out, " <g transform=\"translate(400,200)\">")?;
    for segment in segments {
        writeln!(
            out,
            "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"black\" stroke-width=\"1\" />",
            segment.start.x, segment.start.y, segment.end.x, segment.end.y
        )?;
    }
    writeln!(out, " </g>")?;
    writeln!(out, "</svg>")?;
    out.flush()
}
