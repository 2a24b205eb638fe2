//! ASCII serialization of parsed models.

use std::io::{self, Write};

use crate::parser::Model;

/// Write a model as ASCII STL.
///
/// Floats are emitted in uppercase scientific notation, which the parser
/// reads back unchanged.
pub fn write_ascii<W: Write>(mut writer: W, name: &str, model: &Model) -> io::Result<()> {
    writeln!(writer, "solid {name}")?;
    for facet in &model.facets {
        writeln!(
            writer,
            "  facet normal {:E} {:E} {:E}",
            facet.normal.x, facet.normal.y, facet.normal.z
        )?;
        writeln!(writer, "    outer loop")?;
        for vertex in &facet.vertices {
            writeln!(writer, "      vertex {:E} {:E} {:E}", vertex.x, vertex.y, vertex.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_geom::{Facet, Vec3};

    #[test]
    fn test_write_ascii_shape() {
        let model = Model {
            header: [0; 80],
            facets: vec![Facet::new(
                Vec3::new(0.0, 0.0, 1.0),
                [
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(10.0, 0.0, 0.0),
                    Vec3::new(0.0, 10.0, 0.0),
                ],
            )],
        };

        let mut out = Vec::new();
        write_ascii(&mut out, "part", &model).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("solid part\n"));
        assert!(text.contains("facet normal"));
        assert!(text.contains("vertex 1E1 0E0 0E0"));
        assert!(text.ends_with("endsolid part\n"));
    }
}
