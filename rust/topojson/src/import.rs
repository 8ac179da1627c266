// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TopoJSON Topology to dataset.

use mapkit_core::{
    ArcCollection, ArcRef, DataTable, Dataset, DatasetInfo, GeometryType, Layer, Path, Point2,
    Record, Shape, Transform,
};

use crate::document::{Geometry, GeometryObject, Position, TopologyDocument};
use crate::error::{Error, Result};
use crate::options::TopoJsonOptions;
use crate::quantize::delta_decode;

/// Parses and imports a TopoJSON document from JSON text.
pub fn import_topojson_str(json: &str, options: &TopoJsonOptions) -> Result<Dataset> {
    let doc = TopologyDocument::from_json(json)?;
    import_topojson(&doc, options)
}

/// Converts a Topology into a dataset with one layer per named object.
///
/// Quantized arcs are delta-decoded and transformed back to coordinates. The
/// document's transform is kept in [`DatasetInfo::input_transform`] so a
/// re-export can reproduce the same grid.
pub fn import_topojson(doc: &TopologyDocument, options: &TopoJsonOptions) -> Result<Dataset> {
    let arcs = decode_arcs(&doc.arcs, doc.transform.as_ref());
    let importer = Importer::new(arcs.as_ref(), doc.transform, options);

    let mut layers = Vec::with_capacity(doc.objects.len());
    for (name, object) in &doc.objects {
        let mut layer = importer.import_object(name, object)?;
        layer.name = Some(name.clone());
        tracing::debug!(
            layer = name.as_str(),
            features = layer.feature_count(),
            geometry_type = layer.geometry_type.map_or("none", |t| t.as_str()),
            "Imported object"
        );
        layers.push(layer);
    }

    tracing::info!(
        layers = layers.len(),
        arcs = doc.arcs.len(),
        quantized = doc.transform.is_some(),
        "Imported topology"
    );

    Ok(Dataset {
        arcs,
        layers,
        info: DatasetInfo {
            crs: doc.crs.clone(),
            input_transform: doc.transform,
        },
    })
}

/// Converts a single TopoJSON object into a layer.
///
/// `arcs` must already be decoded; `transform` is applied to point
/// coordinates. The returned layer is unnamed.
pub fn import_object(
    object: &GeometryObject,
    arcs: Option<&ArcCollection>,
    transform: Option<Transform>,
    options: &TopoJsonOptions,
) -> Result<Layer> {
    Importer::new(arcs, transform, options).import_object("", object)
}

fn decode_arcs(arcs: &[Vec<Position>], transform: Option<&Transform>) -> Option<ArcCollection> {
    if arcs.is_empty() {
        return None;
    }
    Some(match transform {
        Some(t) => {
            let decoded: Vec<Vec<Position>> = arcs.iter().map(|arc| delta_decode(arc)).collect();
            ArcCollection::new(&decoded).transformed(t, false)
        }
        None => ArcCollection::new(arcs),
    })
}

/// Shared state for converting the objects of one document.
pub struct Importer<'a> {
    arcs: Option<&'a ArcCollection>,
    transform: Option<Transform>,
    options: &'a TopoJsonOptions,
}

impl<'a> Importer<'a> {
    pub fn new(
        arcs: Option<&'a ArcCollection>,
        transform: Option<Transform>,
        options: &'a TopoJsonOptions,
    ) -> Self {
        Self {
            arcs,
            transform,
            options,
        }
    }

    fn arc_count(&self) -> usize {
        self.arcs.map_or(0, ArcCollection::size)
    }

    /// Converts one named object. A GeometryCollection yields one feature per
    /// member; any other object yields a single feature.
    pub fn import_object(&self, name: &str, object: &GeometryObject) -> Result<Layer> {
        let members: &[GeometryObject] = match &object.geometry {
            Geometry::GeometryCollection(members) => members,
            _ => std::slice::from_ref(object),
        };

        let mut geometry_type: Option<GeometryType> = None;
        let mut shapes = Vec::with_capacity(members.len());
        let mut records = Vec::with_capacity(members.len());
        for member in members {
            let shape = self.import_shape(name, &member.geometry)?;
            if let Some((class, _)) = &shape {
                match geometry_type {
                    None => geometry_type = Some(*class),
                    Some(first) if first != *class => {
                        return Err(Error::MixedGeometryTypes {
                            object: name.to_string(),
                            first,
                            second: *class,
                        })
                    }
                    Some(_) => {}
                }
            }
            shapes.push(shape.map(|(_, shape)| shape));
            records.push(self.import_record(member));
        }

        let data = DataTable::from_records(records);
        Ok(match geometry_type {
            Some(geometry_type) => Layer {
                name: None,
                geometry_type: Some(geometry_type),
                shapes: Some(shapes),
                data: Some(data),
            },
            // Every member is null: an attribute table
            None => Layer {
                name: None,
                geometry_type: None,
                shapes: None,
                data: Some(data),
            },
        })
    }

    /// Record = properties, plus the geometry id under the id field.
    fn import_record(&self, member: &GeometryObject) -> Record {
        let mut record = member.properties.clone().unwrap_or_default();
        if let Some(id) = &member.id {
            record.insert(self.options.import_id_field().to_string(), id.clone());
        }
        record
    }

    fn import_shape(&self, name: &str, geometry: &Geometry) -> Result<Option<(GeometryType, Shape)>> {
        let imported = match geometry {
            Geometry::Null => return Ok(None),
            Geometry::Point(p) => (GeometryType::Point, Shape::Points(vec![self.decode_point(p)])),
            Geometry::MultiPoint(points) => (
                GeometryType::Point,
                Shape::Points(points.iter().map(|p| self.decode_point(p)).collect()),
            ),
            Geometry::LineString(arcs) => (
                GeometryType::Polyline,
                Shape::Paths(vec![self.decode_path(name, arcs)?]),
            ),
            Geometry::MultiLineString(parts) => {
                (GeometryType::Polyline, Shape::Paths(self.decode_paths(name, parts)?))
            }
            Geometry::Polygon(rings) => {
                (GeometryType::Polygon, Shape::Paths(self.decode_paths(name, rings)?))
            }
            Geometry::MultiPolygon(polygons) => {
                let mut rings = Vec::new();
                for polygon in polygons {
                    rings.extend(self.decode_paths(name, polygon)?);
                }
                (GeometryType::Polygon, Shape::Paths(rings))
            }
            Geometry::GeometryCollection(_) => {
                return Err(Error::NestedCollection {
                    object: name.to_string(),
                })
            }
        };
        Ok(Some(imported))
    }

    fn decode_point(&self, p: &Position) -> Point2<f64> {
        match &self.transform {
            Some(t) => {
                let (x, y) = t.apply(p[0], p[1]);
                Point2::new(x, y)
            }
            None => Point2::new(p[0], p[1]),
        }
    }

    fn decode_paths(&self, name: &str, paths: &[Vec<i64>]) -> Result<Vec<Path>> {
        paths.iter().map(|p| self.decode_path(name, p)).collect()
    }

    fn decode_path(&self, name: &str, refs: &[i64]) -> Result<Path> {
        let count = self.arc_count();
        refs.iter()
            .map(|&signed| {
                let reference = ArcRef::from_signed(signed);
                if reference.arc_id() < count {
                    Ok(reference)
                } else {
                    Err(Error::ArcOutOfRange {
                        object: name.to_string(),
                        reference: signed,
                        count,
                    })
                }
            })
            .collect()
    }
}
