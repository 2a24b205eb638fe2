#![warn(missing_docs)]

//! Layer slicing and contour stitching for triangle meshes.
//!
//! This crate turns a flat sequence of facets into per-layer closed
//! contours: `slice_facets` intersects every facet with the horizontal
//! planes at multiples of the layer height, and `stitch_layer` joins each
//! layer's segments endpoint-to-endpoint into closed paths ready for the
//! extrusion planner.
//!
//! # Example
//!
//! ```ignore
//! use strata_slicer::{slice_mesh, SliceSettings};
//!
//! let layers = slice_mesh(&model.facets, &SliceSettings::default())?;
//! for layer in &layers {
//!     println!("layer {}: {} contours", layer.index, layer.paths.len());
//! }
//! ```

pub mod error;
pub mod slice;
pub mod stitch;

pub use error::{Result, SlicerError};
pub use slice::{slice_facets, LayerMap, LayerSegments};
pub use stitch::stitch_layer;

use serde::{Deserialize, Serialize};
use strata_geom::{Facet, Path};

/// Slicing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliceSettings {
    /// Vertical distance between layer planes (mm).
    pub layer_height: f64,
}

impl Default for SliceSettings {
    fn default() -> Self {
        Self { layer_height: 0.2 }
    }
}

impl SliceSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.layer_height <= 0.0 {
            return Err(SlicerError::InvalidSettings(
                "layer_height must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// One stitched layer: the closed contours found at its plane.
#[derive(Debug, Clone)]
pub struct SliceLayer {
    /// Layer index; the plane sits at z = index * layer_height.
    pub index: i32,
    /// Z height of the plane (mm).
    pub z: f64,
    /// Closed contours at this plane.
    pub paths: Vec<Path>,
}

/// Slice a mesh and stitch every populated layer, bottom to top.
pub fn slice_mesh(facets: &[Facet], settings: &SliceSettings) -> Result<Vec<SliceLayer>> {
    let map = slice_facets(facets, settings)?;

    let mut layers = Vec::new();
    for index in map.min_layer..=map.max_layer {
        let Some(segments) = map.layers.get(&index) else {
            continue;
        };
        layers.push(SliceLayer {
            index,
            z: f64::from(index) * settings.layer_height,
            paths: stitch_layer(segments),
        });
    }

    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashSet;
    use strata_geom::{Point2, Vec3};

    /// 10mm axis-aligned cube as 12 consistently wound facets.
    fn cube_facets() -> Vec<Facet> {
        let p = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(10.0, 0.0, 10.0),
            Vec3::new(10.0, 10.0, 10.0),
            Vec3::new(0.0, 10.0, 10.0),
        ];
        let tri = |n: (f32, f32, f32), a: usize, b: usize, c: usize| {
            Facet::new(Vec3::new(n.0, n.1, n.2), [p[a], p[b], p[c]])
        };
        vec![
            // Bottom and top skins; the slicer skips both.
            tri((0.0, 0.0, -1.0), 0, 2, 1),
            tri((0.0, 0.0, -1.0), 0, 3, 2),
            tri((0.0, 0.0, 1.0), 4, 5, 6),
            tri((0.0, 0.0, 1.0), 4, 6, 7),
            // Front (y = 0).
            tri((0.0, -1.0, 0.0), 0, 1, 5),
            tri((0.0, -1.0, 0.0), 0, 5, 4),
            // Back (y = 10).
            tri((0.0, 1.0, 0.0), 2, 3, 7),
            tri((0.0, 1.0, 0.0), 2, 7, 6),
            // Left (x = 0).
            tri((-1.0, 0.0, 0.0), 0, 4, 7),
            tri((-1.0, 0.0, 0.0), 0, 7, 3),
            // Right (x = 10).
            tri((1.0, 0.0, 0.0), 1, 2, 6),
            tri((1.0, 0.0, 0.0), 1, 6, 5),
        ]
    }

    #[test]
    fn test_cube_interior_layers_are_single_squares() {
        let settings = SliceSettings { layer_height: 1.0 };
        let layers = slice_mesh(&cube_facets(), &settings).unwrap();

        for layer in layers.iter().filter(|l| l.index >= 1 && l.index <= 9) {
            assert_eq!(layer.paths.len(), 1, "layer {}", layer.index);
            let path = &layer.paths[0];
            // Four corners plus the four face-diagonal crossings.
            assert_eq!(path.len(), 8, "layer {}", layer.index);
            assert_relative_eq!(path.perimeter(), 40.0, epsilon = 1e-4);
            assert!(path.is_ccw(), "layer {}", layer.index);
        }
    }

    #[test]
    fn test_cube_layer_endpoints_pair_up() {
        // In a well-formed layer every point appears exactly once as a
        // start and once as an end.
        let settings = SliceSettings { layer_height: 1.0 };
        let map = slice_facets(&cube_facets(), &settings).unwrap();

        for k in 1..=9 {
            let layer = map.layers.get(&k).unwrap();
            assert_eq!(layer.ordered.len(), 8);
            assert_eq!(layer.by_start.len(), 8);
            let starts: HashSet<Point2> = layer.ordered.iter().map(|s| s.start).collect();
            let ends: HashSet<Point2> = layer.ordered.iter().map(|s| s.end).collect();
            assert_eq!(starts, ends);
        }
    }

    #[test]
    fn test_cube_layer_extent() {
        let settings = SliceSettings { layer_height: 1.0 };
        let map = slice_facets(&cube_facets(), &settings).unwrap();
        assert_eq!(map.min_layer, 0);
        assert_eq!(map.max_layer, 10);
    }

    #[test]
    fn test_default_settings_are_valid() {
        assert!(SliceSettings::default().validate().is_ok());
    }
}
