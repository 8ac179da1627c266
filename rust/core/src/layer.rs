// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layers: named lists of shapes paired with an attribute table.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::arcs::{ArcCollection, Path};
use crate::bounds::Bounds;
use crate::error::{Error, Result};
use crate::geom::path_bounds;
use crate::table::DataTable;

/// Geometry class shared by every shape in a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryType {
    Point,
    Polyline,
    Polygon,
}

impl GeometryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Point => "point",
            GeometryType::Polyline => "polyline",
            GeometryType::Polygon => "polygon",
        }
    }
}

impl std::fmt::Display for GeometryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geometry of one feature.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Raw coordinates of a point feature (one or more points).
    Points(Vec<Point2<f64>>),
    /// Rings of a polygon or parts of a polyline, as arc references.
    Paths(Vec<Path>),
}

impl Shape {
    pub fn paths(&self) -> Option<&[Path]> {
        match self {
            Shape::Paths(paths) => Some(paths),
            Shape::Points(_) => None,
        }
    }

    pub fn points(&self) -> Option<&[Point2<f64>]> {
        match self {
            Shape::Points(points) => Some(points),
            Shape::Paths(_) => None,
        }
    }
}

/// A named collection of shapes of one geometry class.
///
/// `shapes` and `data` are paired index-for-index; a feature without
/// geometry has a `None` entry in `shapes`. A layer without `shapes` is a
/// plain attribute table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    pub name: Option<String>,
    pub geometry_type: Option<GeometryType>,
    pub shapes: Option<Vec<Option<Shape>>>,
    pub data: Option<DataTable>,
}

impl Layer {
    /// Creates a layer with geometry.
    pub fn new(
        name: impl Into<String>,
        geometry_type: GeometryType,
        shapes: Vec<Option<Shape>>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            geometry_type: Some(geometry_type),
            shapes: Some(shapes),
            data: None,
        }
    }

    /// Creates a layer with attributes only.
    pub fn table(name: impl Into<String>, data: DataTable) -> Self {
        Self {
            name: Some(name.into()),
            geometry_type: None,
            shapes: None,
            data: Some(data),
        }
    }

    pub fn with_data(mut self, data: DataTable) -> Self {
        self.data = Some(data);
        self
    }

    pub fn has_geometry(&self) -> bool {
        self.geometry_type.is_some() && self.shapes.is_some()
    }

    /// Number of features, counted from shapes or, failing that, records.
    pub fn feature_count(&self) -> usize {
        match (&self.shapes, &self.data) {
            (Some(shapes), _) => shapes.len(),
            (None, Some(data)) => data.len(),
            (None, None) => 0,
        }
    }

    pub fn shape(&self, i: usize) -> Option<&Shape> {
        self.shapes.as_ref()?.get(i)?.as_ref()
    }

    /// Checks that the table has one record per shape.
    pub fn validate(&self) -> Result<()> {
        if let (Some(shapes), Some(data)) = (&self.shapes, &self.data) {
            if shapes.len() != data.len() {
                return Err(Error::TableLengthMismatch {
                    shapes: shapes.len(),
                    records: data.len(),
                });
            }
        }
        Ok(())
    }

    /// Bounding box of one feature's geometry.
    pub fn shape_bounds(&self, i: usize, arcs: Option<&ArcCollection>) -> Result<Bounds> {
        match self.shape(i) {
            Some(shape) => shape_bounds(shape, arcs),
            None => Ok(Bounds::empty()),
        }
    }

    /// Bounding box of every shape in the layer.
    pub fn bounds(&self, arcs: Option<&ArcCollection>) -> Result<Bounds> {
        let mut bounds = Bounds::empty();
        for i in 0..self.feature_count() {
            bounds.merge_bounds(&self.shape_bounds(i, arcs)?);
        }
        Ok(bounds)
    }
}

fn shape_bounds(shape: &Shape, arcs: Option<&ArcCollection>) -> Result<Bounds> {
    match (shape, arcs) {
        (Shape::Points(points), _) => Ok(Bounds::from_points(points)),
        (Shape::Paths(paths), Some(arcs)) => {
            let mut bounds = Bounds::empty();
            for path in paths {
                bounds.merge_bounds(&path_bounds(path, arcs)?);
            }
            Ok(bounds)
        }
        (Shape::Paths(_), None) => Ok(Bounds::empty()),
    }
}
