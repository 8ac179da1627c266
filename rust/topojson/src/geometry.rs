// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape to TopoJSON geometry conversion.

use mapkit_core::{path_area, ArcCollection, GeometryType, Path, Shape};

use crate::document::Geometry;
use crate::error::{Error, Result};

/// Encodes one feature's shape as a TopoJSON geometry.
///
/// Point coordinates are written as given, so callers quantize them first.
/// Polygon rings are grouped by orientation: a clockwise ring starts a new
/// polygon and a counter-clockwise ring is a hole of the polygon before it.
/// Rings with zero area are skipped.
pub fn export_geometry(
    shape: Option<&Shape>,
    geometry_type: GeometryType,
    arcs: Option<&ArcCollection>,
) -> Result<Geometry> {
    let Some(shape) = shape else {
        return Ok(Geometry::Null);
    };
    match (geometry_type, shape) {
        (GeometryType::Point, Shape::Points(points)) => Ok(match points.as_slice() {
            [] => Geometry::Null,
            [p] => Geometry::Point([p.x, p.y]),
            many => Geometry::MultiPoint(many.iter().map(|p| [p.x, p.y]).collect()),
        }),
        (GeometryType::Polyline, Shape::Paths(paths)) => {
            let mut lines: Vec<Vec<i64>> = paths
                .iter()
                .filter(|p| !p.is_empty())
                .map(|p| encode_path(p))
                .collect();
            Ok(match lines.len() {
                0 => Geometry::Null,
                1 => Geometry::LineString(lines.remove(0)),
                _ => Geometry::MultiLineString(lines),
            })
        }
        (GeometryType::Polygon, Shape::Paths(paths)) => {
            let arcs = arcs.ok_or(Error::MissingArcs)?;
            export_polygon(paths, arcs)
        }
        (expected, _) => Err(Error::ShapeMismatch { expected }),
    }
}

fn encode_path(path: &Path) -> Vec<i64> {
    path.iter().map(|r| r.to_signed()).collect()
}

fn export_polygon(paths: &[Path], arcs: &ArcCollection) -> Result<Geometry> {
    let mut groups: Vec<Vec<Vec<i64>>> = Vec::new();
    for path in paths {
        let area = path_area(path, arcs)?;
        if area == 0.0 {
            continue;
        }
        let ring = encode_path(path);
        match groups.last_mut() {
            Some(group) if area < 0.0 => group.push(ring),
            _ => groups.push(vec![ring]),
        }
    }
    Ok(match groups.len() {
        0 => Geometry::Null,
        1 => Geometry::Polygon(groups.remove(0)),
        _ => Geometry::MultiPolygon(groups),
    })
}
