//! Layer slicing - group facet/plane intersections by layer index.

use std::collections::HashMap;

use log::{debug, warn};
use strata_geom::{wedge_slice, Facet, Point2, Segment, Vec3};

use crate::error::Result;
use crate::SliceSettings;

/// Segments collected for one layer, in both projections used downstream.
///
/// The ordered list preserves insertion order for deterministic traversal
/// and for the SVG preview; the start-keyed map is what the stitcher
/// follows. Both are filled simultaneously as facets are sliced.
#[derive(Debug, Clone, Default)]
pub struct LayerSegments {
    /// Segments in the order they were produced.
    pub ordered: Vec<Segment>,
    /// Segment lookup keyed by start point.
    pub by_start: HashMap<Point2, Segment>,
}

/// Everything the slicer produced: per-layer segments plus the global
/// layer extent.
///
/// Layer `k` corresponds to the plane z = k * layer_height; indices are
/// negative for geometry below the origin. Both extremes start at zero
/// and are only widened, so a mesh floating above the plate still reports
/// a minimum layer of 0.
#[derive(Debug, Clone, Default)]
pub struct LayerMap {
    /// Segments grouped by layer index. Layers where every intersection
    /// degenerated to a point have no entry.
    pub layers: HashMap<i32, LayerSegments>,
    /// Lowest layer index reached by any lower wedge.
    pub min_layer: i32,
    /// Highest layer index reached by any upper wedge.
    pub max_layer: i32,
}

impl LayerMap {
    fn insert(&mut self, layer: i32, segment: Segment) {
        let entry = self.layers.entry(layer).or_default();
        entry.by_start.insert(segment.start, segment);
        entry.ordered.push(segment);
    }
}

/// How a facet sits relative to the layer planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FacetKind {
    /// The plane can cross both wedges.
    General,
    /// The two lowest vertices share a z: the facet rests on its bottom
    /// edge and has no lower wedge.
    RestingTop,
    /// The two highest vertices share a z: no upper wedge.
    RestingBottom,
}

/// Sort a facet's vertex indices by z, keeping the original positions so
/// the winding rule can tell which neighbor follows which.
fn sort_by_z(vertices: &[Vec3; 3]) -> (usize, usize, usize) {
    let (mut max_i, mut mid_i) = if vertices[0].z > vertices[1].z {
        (0, 1)
    } else {
        (1, 0)
    };

    let min_i;
    if vertices[2].z > vertices[max_i].z {
        min_i = mid_i;
        mid_i = max_i;
        max_i = 2;
    } else if vertices[2].z > vertices[mid_i].z {
        min_i = mid_i;
        mid_i = 2;
    } else {
        min_i = 2;
    }

    (min_i, mid_i, max_i)
}

/// Slice every facet into per-layer segments.
///
/// Facets whose normal lies in the slicing plane's z = 0 plane (zero x
/// and y components) are horizontal and contribute no interior segment;
/// they are skipped with a warning. Segments whose endpoints coincide
/// bit-for-bit are dropped silently.
pub fn slice_facets(facets: &[Facet], settings: &SliceSettings) -> Result<LayerMap> {
    settings.validate()?;

    let h = settings.layer_height;
    let mut map = LayerMap::default();

    for facet in facets {
        if facet.normal.x == 0.0 && facet.normal.y == 0.0 {
            // Horizontal top/bottom skin. Its role in roof generation is
            // not handled yet.
            warn!(
                "skipping facet parallel to the slicing plane (normal {:?})",
                facet.normal
            );
            continue;
        }

        let (min_i, mid_i, max_i) = sort_by_z(&facet.vertices);
        let vmin = &facet.vertices[min_i];
        let vmid = &facet.vertices[mid_i];
        let vmax = &facet.vertices[max_i];

        let kind = if vmin.z == vmid.z {
            FacetKind::RestingTop
        } else if vmax.z == vmid.z {
            FacetKind::RestingBottom
        } else {
            FacetKind::General
        };

        // Lower wedge: planes between min and mid cut the two edges
        // leaving min.
        if kind != FacetKind::RestingTop {
            let first = (f64::from(vmin.z) / h).ceil() as i32;
            let last = (f64::from(vmid.z) / h).floor() as i32;

            if first < map.min_layer {
                map.min_layer = first;
            }

            // Walking up from min, the edge toward min's successor in the
            // facet's winding runs along the contour's left side.
            let (right, left) = if mid_i == (min_i + 1) % 3 {
                (vmax, vmid)
            } else {
                (vmid, vmax)
            };

            for layer in first..=last {
                let z = layer as f32 * h as f32;
                let segment = wedge_slice(vmin, right, left, &facet.normal, z);
                if segment.is_degenerate() {
                    debug!("dropping degenerate segment at layer {layer}");
                    continue;
                }
                map.insert(layer, segment);
            }
        }

        // Upper wedge: planes between mid and max cut the two edges
        // leaving max.
        if kind != FacetKind::RestingBottom {
            let first = (f64::from(vmid.z) / h).ceil() as i32;
            let last = (f64::from(vmax.z) / h).floor() as i32;

            if last > map.max_layer {
                map.max_layer = last;
            }

            // Mirrored at the top: max's winding successor is the right
            // neighbor.
            let (right, left) = if mid_i == (max_i + 1) % 3 {
                (vmid, vmin)
            } else {
                (vmin, vmid)
            };

            for layer in first..=last {
                let z = layer as f32 * h as f32;
                let segment = wedge_slice(vmax, right, left, &facet.normal, z);
                if segment.is_degenerate() {
                    debug!("dropping degenerate segment at layer {layer}");
                    continue;
                }
                map.insert(layer, segment);
            }
        }
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn facet(normal: (f32, f32, f32), a: (f32, f32, f32), b: (f32, f32, f32), c: (f32, f32, f32)) -> Facet {
        Facet::new(
            Vec3::new(normal.0, normal.1, normal.2),
            [
                Vec3::new(a.0, a.1, a.2),
                Vec3::new(b.0, b.1, b.2),
                Vec3::new(c.0, c.1, c.2),
            ],
        )
    }

    fn settings(h: f64) -> SliceSettings {
        SliceSettings { layer_height: h }
    }

    #[test]
    fn test_sort_by_z_keeps_original_indices() {
        let v = [
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 3.0),
        ];
        assert_eq!(sort_by_z(&v), (1, 2, 0));

        let flat = [
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(1.0, 0.0, 2.0),
            Vec3::new(0.0, 1.0, 2.0),
        ];
        // Ties keep the comparison chain's ordering.
        assert_eq!(sort_by_z(&flat), (2, 0, 1));
    }

    #[test]
    fn test_horizontal_facet_is_skipped() {
        let f = facet((0.0, 0.0, 1.0), (0.0, 0.0, 2.0), (1.0, 0.0, 2.0), (0.0, 1.0, 2.0));
        let map = slice_facets(&[f], &settings(1.0)).unwrap();
        assert!(map.layers.is_empty());
        assert_eq!(map.min_layer, 0);
        assert_eq!(map.max_layer, 0);
    }

    #[test]
    fn test_single_facet_interior_layers() {
        // Rests on the bottom edge (0,0,0)-(10,0,0); apex at (0,10,5).
        let inv_sqrt2 = std::f32::consts::FRAC_1_SQRT_2;
        let f = facet(
            (inv_sqrt2, inv_sqrt2, 0.0),
            (0.0, 0.0, 0.0),
            (10.0, 0.0, 0.0),
            (0.0, 10.0, 5.0),
        );
        let map = slice_facets(&[f], &settings(1.0)).unwrap();

        assert_eq!(map.min_layer, 0);
        assert_eq!(map.max_layer, 5);

        // Interior layers: exactly one segment each, walking the plane cut
        // from the steep edge to the slanted one.
        for k in 1..=4 {
            let layer = map.layers.get(&k).unwrap();
            assert_eq!(layer.ordered.len(), 1);
            let seg = layer.ordered[0];
            assert_relative_eq!(seg.start.x, 0.0);
            assert_relative_eq!(seg.start.y, 2.0 * k as f32);
            assert_relative_eq!(seg.end.x, 10.0 - 2.0 * k as f32);
            assert_relative_eq!(seg.end.y, 2.0 * k as f32);
        }

        // The apex layer degenerates to the point (0, 10) and is dropped.
        assert!(map.layers.get(&5).is_none());

        // The resting edge itself is emitted at layer 0.
        let bottom = map.layers.get(&0).unwrap();
        assert_eq!(bottom.ordered.len(), 1);
        assert_eq!(bottom.ordered[0].start, Point2::new(0.0, 0.0));
        assert_eq!(bottom.ordered[0].end, Point2::new(10.0, 0.0));
    }

    #[test]
    fn test_tangent_vertices_are_dropped() {
        // General facet whose min and max vertices land exactly on layer
        // planes; both tangent layers must yield nothing.
        let f = facet(
            (-2.0, -4.0, 4.0),
            (0.0, 0.0, 0.0),
            (2.0, 0.0, 1.5),
            (0.0, 2.0, 3.0),
        );
        let map = slice_facets(&[f], &settings(1.0)).unwrap();

        assert!(map.layers.get(&0).is_none());
        assert!(map.layers.get(&3).is_none());
        assert_eq!(map.layers.get(&1).unwrap().ordered.len(), 1);
        assert_eq!(map.layers.get(&2).unwrap().ordered.len(), 1);
        assert_eq!(map.max_layer, 3);
    }

    #[test]
    fn test_mid_vertex_on_plane_shares_one_lookup_entry() {
        // mid.z sits exactly on layer 1, so both wedge ranges include it
        // and produce the identical segment through the mid vertex. The
        // lookup map keeps a single copy; the stitcher skips the echo.
        let f = facet(
            (-1.0, -2.0, 2.0),
            (0.0, 0.0, 0.0),
            (2.0, 0.0, 1.0),
            (0.0, 2.0, 2.0),
        );
        let map = slice_facets(&[f], &settings(1.0)).unwrap();

        let layer = map.layers.get(&1).unwrap();
        assert_eq!(layer.ordered.len(), 2);
        assert_eq!(layer.by_start.len(), 1);
        assert_eq!(layer.ordered[0].start, layer.ordered[1].start);
        assert_eq!(layer.ordered[0].end, layer.ordered[1].end);
    }

    #[test]
    fn test_negative_layers_below_origin() {
        let f = facet(
            (1.0, 0.0, 0.0),
            (0.0, 0.0, -3.0),
            (0.0, 4.0, 0.0),
            (0.0, 0.0, 3.0),
        );
        let map = slice_facets(&[f], &settings(1.0)).unwrap();
        assert_eq!(map.min_layer, -3);
        assert_eq!(map.max_layer, 3);
        assert!(map.layers.contains_key(&-2));
    }

    #[test]
    fn test_invalid_settings() {
        let err = slice_facets(&[], &settings(0.0));
        assert!(err.is_err());
    }
}
