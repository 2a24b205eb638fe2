//! STL parsing: binary records and the ASCII grammar.

use std::io::Read;

use strata_geom::{Facet, Vec3};

use crate::error::{Result, StlError};
use crate::scanner::{Scanner, Token};

/// A parsed mesh: the raw header plus the flat facet table.
///
/// Facets live here for the whole pipeline; the slicer borrows them and
/// copies what it needs into segments.
#[derive(Debug, Clone)]
pub struct Model {
    /// The 80-byte header (binary) or the first 80 bytes of the ASCII
    /// stream. Carried for diagnostics, never interpreted further.
    pub header: [u8; 80],
    /// The facet table.
    pub facets: Vec<Facet>,
}

/// Read and parse an STL stream.
///
/// The whole stream is buffered first; format detection follows the
/// classic convention that an ASCII file opens with exactly `solid `.
pub fn parse<R: Read>(mut reader: R) -> Result<Model> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    parse_bytes(&data)
}

/// Parse an STL byte buffer.
pub fn parse_bytes(data: &[u8]) -> Result<Model> {
    if data.len() < 80 {
        return Err(StlError::BadHeader(
            "stream shorter than the 80-byte header".into(),
        ));
    }

    let mut header = [0u8; 80];
    header.copy_from_slice(&data[..80]);

    if data.starts_with(b"solid ") {
        parse_ascii(data, header)
    } else {
        parse_binary(data, header)
    }
}

fn f32_at(data: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

fn parse_binary(data: &[u8], header: [u8; 80]) -> Result<Model> {
    if data.len() < 84 {
        return Err(StlError::BadHeader("missing facet count".into()));
    }
    let count = u32::from_le_bytes([data[80], data[81], data[82], data[83]]);

    let mut facets = Vec::with_capacity(count as usize);
    let mut offset = 84;
    for index in 0..count {
        if offset + 50 > data.len() {
            return Err(StlError::BadRecord(format!(
                "facet {index} of {count} truncated"
            )));
        }

        let normal = Vec3::new(
            f32_at(data, offset),
            f32_at(data, offset + 4),
            f32_at(data, offset + 8),
        );
        let mut vertices = [Vec3::zeros(); 3];
        for (j, vertex) in vertices.iter_mut().enumerate() {
            let base = offset + 12 + j * 12;
            *vertex = Vec3::new(f32_at(data, base), f32_at(data, base + 4), f32_at(data, base + 8));
        }
        let attribute = u16::from_le_bytes([data[offset + 48], data[offset + 49]]);

        facets.push(Facet {
            normal,
            vertices,
            attribute,
        });
        offset += 50;
    }

    Ok(Model { header, facets })
}

/// Recursive-descent parser over the token stream.
struct AsciiParser<'a> {
    scanner: Scanner<'a>,
}

impl<'a> AsciiParser<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            scanner: Scanner::new(input),
        }
    }

    /// Next token that is not whitespace. The scanner collapses runs, so
    /// skipping once is enough.
    fn scan_ignore_whitespace(&mut self) -> (Token, String) {
        let (tok, lit) = self.scanner.scan();
        if tok == Token::Whitespace {
            return self.scanner.scan();
        }
        (tok, lit)
    }

    fn expect(&mut self, want: Token, expected: &'static str) -> Result<String> {
        let (tok, lit) = self.scan_ignore_whitespace();
        if tok != want {
            return Err(StlError::UnexpectedToken {
                found: lit,
                expected,
            });
        }
        Ok(lit)
    }

    fn number(&mut self) -> Result<f32> {
        let lit = self.expect(Token::Number, "number")?;
        lit.parse::<f32>()
            .map_err(|_| StlError::BadRecord(format!("invalid number {lit:?}")))
    }
}

fn parse_ascii(data: &[u8], header: [u8; 80]) -> Result<Model> {
    let mut parser = AsciiParser::new(data);

    parser.expect(Token::Solid, "'solid'")?;
    // The solid's name; nothing downstream wants it.
    parser.scan_ignore_whitespace();

    let mut facets = Vec::new();
    loop {
        let (tok, lit) = parser.scan_ignore_whitespace();
        match tok {
            Token::EndSolid => break,
            Token::Facet => {}
            _ => {
                return Err(StlError::UnexpectedToken {
                    found: lit,
                    expected: "'facet' or 'endsolid'",
                })
            }
        }

        parser.expect(Token::Normal, "'normal'")?;
        let normal = Vec3::new(parser.number()?, parser.number()?, parser.number()?);

        parser.expect(Token::Outer, "'outer'")?;
        parser.expect(Token::Loop, "'loop'")?;

        let mut vertices = [Vec3::zeros(); 3];
        for vertex in &mut vertices {
            parser.expect(Token::Vertex, "'vertex'")?;
            *vertex = Vec3::new(parser.number()?, parser.number()?, parser.number()?);
        }

        parser.expect(Token::EndLoop, "'endloop'")?;
        parser.expect(Token::EndFacet, "'endfacet'")?;

        facets.push(Facet {
            normal,
            vertices,
            attribute: 0,
        });
    }

    // Whatever trails `endsolid` (usually the name again) is ignored.
    Ok(Model { header, facets })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TETRA_ASCII: &str = "\
solid tetra
  facet normal 0 0 -1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
  facet normal 0.577 0.577 0.577
    outer loop
      vertex 1 0 0
      vertex 0 1 0
      vertex 0 0 1
    endloop
  endfacet
endsolid tetra
";

    #[test]
    fn test_parse_ascii() {
        let model = parse_bytes(TETRA_ASCII.as_bytes()).unwrap();
        assert_eq!(model.facets.len(), 2);
        assert_eq!(model.facets[0].vertices[1], Vec3::new(1.0, 0.0, 0.0));
        assert!((model.facets[1].normal.x - 0.577).abs() < 1e-6);
        assert_eq!(model.facets[0].attribute, 0);
    }

    #[test]
    fn test_parse_ascii_scientific_notation() {
        let input = "\
solid s
  facet normal 0.000000E+00 0.000000E+00 -1.000000E+00
    outer loop
      vertex 0.000000E+00 0.000000E+00 0.000000E+00
      vertex 1.000000E+01 0.000000E+00 0.000000E+00
      vertex 0.000000E+00 1.000000E+01 0.000000E+00
    endloop
  endfacet
endsolid s
";
        let model = parse_bytes(input.as_bytes()).unwrap();
        assert_eq!(model.facets.len(), 1);
        assert_eq!(model.facets[0].vertices[1].x, 10.0);
    }

    #[test]
    fn test_parse_ascii_bad_keyword() {
        // Padded past the 80-byte header so format sniffing sees ASCII.
        let input = format!("{:<100}", "solid s\n  facet nrml 0 0 1");
        let err = parse_bytes(input.as_bytes()).unwrap_err();
        assert!(matches!(err, StlError::UnexpectedToken { .. }));
    }

    fn binary_fixture(count: u32, records: usize) -> Vec<u8> {
        let mut data = vec![0u8; 80];
        data.extend_from_slice(&count.to_le_bytes());
        for i in 0..records {
            let base = 1.0 + i as f32;
            // Normal.
            for value in [0.0f32, 1.0, 0.0] {
                data.extend_from_slice(&value.to_le_bytes());
            }
            // Vertices.
            for value in [
                base, 0.0, 0.0, //
                base + 1.0, 0.0, 0.0, //
                base, 1.0, 1.0,
            ] {
                data.extend_from_slice(&value.to_le_bytes());
            }
            data.extend_from_slice(&(7u16 + i as u16).to_le_bytes());
        }
        data
    }

    #[test]
    fn test_parse_binary() {
        let model = parse_bytes(&binary_fixture(2, 2)).unwrap();
        assert_eq!(model.facets.len(), 2);
        assert_eq!(model.facets[0].normal, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(model.facets[1].vertices[0], Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(model.facets[0].attribute, 7);
        assert_eq!(model.facets[1].attribute, 8);
    }

    #[test]
    fn test_parse_binary_truncated_record() {
        let err = parse_bytes(&binary_fixture(3, 2)).unwrap_err();
        assert!(matches!(err, StlError::BadRecord(_)));
    }

    #[test]
    fn test_too_short_for_header() {
        let err = parse_bytes(b"tiny").unwrap_err();
        assert!(matches!(err, StlError::BadHeader(_)));
    }
}
