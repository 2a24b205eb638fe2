//! Contour stitching - join one layer's segments into closed paths.

use std::collections::HashSet;

use log::warn;
use strata_geom::{Path, Point2};

use crate::slice::LayerSegments;

/// Stitch a layer's segments into closed contours.
///
/// Within a well-formed layer every segment's end is the start of exactly
/// one other segment, so the traversal just follows the start-keyed lookup
/// until it returns to its anchor. A traversal that cannot find a
/// successor is an open contour, the symptom of a crack or non-manifold
/// edge in the mesh; it is discarded with a warning and the remaining
/// segments still produce their paths.
///
/// Each returned path holds the start point of every segment it walked;
/// the closing edge back to the first point is implicit.
pub fn stitch_layer(segments: &LayerSegments) -> Vec<Path> {
    let mut paths = Vec::new();
    let mut visited: HashSet<Point2> = HashSet::with_capacity(segments.by_start.len());

    for segment in &segments.ordered {
        if visited.contains(&segment.start) {
            continue;
        }

        let anchor = segment.start;
        visited.insert(anchor);

        let mut points = vec![segment.start];
        let mut current = *segment;
        let mut closed = false;

        while points.len() <= segments.ordered.len() {
            let Some(next) = segments.by_start.get(&current.end) else {
                warn!(
                    "open contour: no segment starts at ({}, {})",
                    current.end.x, current.end.y
                );
                break;
            };
            visited.insert(next.start);
            points.push(next.start);
            current = *next;
            if current.end == anchor {
                closed = true;
                break;
            }
        }

        if closed {
            paths.push(Path::new(points));
        } else if points.len() > segments.ordered.len() {
            // The walk consumed more steps than there are segments, so the
            // adjacency loops somewhere that never returns to the anchor.
            warn!(
                "open contour: walk from ({}, {}) never returns",
                anchor.x, anchor.y
            );
        }
    }

    paths
}
