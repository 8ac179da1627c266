// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar queries on paths built from shared arcs.

use nalgebra::Point2;

use crate::arcs::{ArcCollection, ArcRef};
use crate::bounds::Bounds;
use crate::error::Result;

/// Concatenates the arcs of a path into one vertex sequence.
///
/// The shared vertex where one arc ends and the next begins is emitted once.
pub fn path_points(path: &[ArcRef], arcs: &ArcCollection) -> Result<Vec<Point2<f64>>> {
    let mut points: Vec<Point2<f64>> = Vec::new();
    for &reference in path {
        let arc = arcs.arc_points(reference)?;
        let skip = match (points.last(), arc.first()) {
            (Some(last), Some(first)) if last == first => 1,
            _ => 0,
        };
        points.extend(arc.into_iter().skip(skip));
    }
    Ok(points)
}

/// Planar area of a closed ring, positive when the ring runs clockwise
/// (y axis pointing up) and negative when it runs counter-clockwise.
pub fn ring_area(points: &[Point2<f64>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for pair in points.windows(2) {
        sum += pair[0].x * pair[1].y - pair[1].x * pair[0].y;
    }
    // Close the ring if the last vertex does not repeat the first
    let (first, last) = (points[0], points[points.len() - 1]);
    if first != last {
        sum += last.x * first.y - first.x * last.y;
    }
    -sum / 2.0
}

/// Signed area of a ring given as arc references.
pub fn path_area(path: &[ArcRef], arcs: &ArcCollection) -> Result<f64> {
    Ok(ring_area(&path_points(path, arcs)?))
}

/// Bounding box of all arcs referenced by a path.
pub fn path_bounds(path: &[ArcRef], arcs: &ArcCollection) -> Result<Bounds> {
    let mut bounds = Bounds::empty();
    for &reference in path {
        bounds.merge_bounds(&arcs.arc_bounds(reference.arc_id())?);
    }
    Ok(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    //       e
    //      / \
    //     /   \
    //    /  a  \
    //   /  / \  \
    //  h  d   b  f
    //   \  \ /  /
    //    \  c  /
    //     \   /
    //      \ /
    //       g
    fn diamonds() -> ArcCollection {
        ArcCollection::new(&[
            vec![[3.0, 4.0], [4.0, 3.0], [3.0, 2.0], [2.0, 3.0], [3.0, 4.0]],
            vec![[3.0, 5.0], [5.0, 3.0], [3.0, 1.0], [1.0, 3.0], [3.0, 5.0]],
        ])
    }

    #[test]
    fn clockwise_rings_have_positive_area() {
        let arcs = diamonds();
        assert_eq!(path_area(&[ArcRef::Forward(0)], &arcs).unwrap(), 2.0);
        assert_eq!(path_area(&[ArcRef::Forward(1)], &arcs).unwrap(), 8.0);
        assert_eq!(path_area(&[ArcRef::Reversed(0)], &arcs).unwrap(), -2.0);
    }

    #[test]
    fn joins_share_one_vertex() {
        let arcs = ArcCollection::new(&[
            vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0]],
            vec![[1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
        ]);
        let pts = path_points(&[ArcRef::Forward(0), ArcRef::Forward(1)], &arcs).unwrap();
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], pts[4]);
        assert_eq!(ring_area(&pts), 1.0);
    }

    #[test]
    fn unclosed_and_short_rings() {
        let open = [Point2::new(0.0, 0.0), Point2::new(0.0, 2.0), Point2::new(2.0, 2.0)];
        assert_eq!(ring_area(&open), 2.0);
        assert_eq!(ring_area(&open[..2]), 0.0);
    }

    #[test]
    fn bounds_of_path() {
        let arcs = diamonds();
        let b = path_bounds(&[ArcRef::Reversed(0), ArcRef::Forward(1)], &arcs).unwrap();
        assert_eq!(b.to_array(), [1.0, 1.0, 5.0, 5.0]);
    }
}
