// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TopoJSON wire types.
//!
//! The structs here mirror the document layout one-to-one. Arc references
//! stay signed integers (`~i` for reversed arcs) at this level; the exporter
//! and importer convert them to [`mapkit_core::ArcRef`].
//!
//! Serialization writes integral coordinates as JSON integers, so quantized
//! documents contain `[120,-4]` rather than `[120.0,-4.0]`. Parsing is strict:
//! any member with the wrong shape rejects the whole document.

use indexmap::IndexMap;
use mapkit_core::{Record, Transform, Value};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// A coordinate pair on the wire.
pub type Position = [f64; 2];

/// A parsed or generated TopoJSON Topology.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopologyDocument {
    /// Quantization transform: `x = q * scale + translate`.
    pub transform: Option<Transform>,
    /// Arcs, delta-encoded when `transform` is present.
    pub arcs: Vec<Vec<Position>>,
    pub objects: IndexMap<String, GeometryObject>,
    /// Passed through verbatim.
    pub crs: Option<Value>,
}

/// The geometry part of a TopoJSON object.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// `{"type": null}`: a feature without geometry.
    Null,
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<i64>),
    MultiLineString(Vec<Vec<i64>>),
    Polygon(Vec<Vec<i64>>),
    MultiPolygon(Vec<Vec<Vec<i64>>>),
    GeometryCollection(Vec<GeometryObject>),
}

impl Geometry {
    /// The `type` string, or `None` for null geometries.
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Geometry::Null => None,
            Geometry::Point(_) => Some("Point"),
            Geometry::MultiPoint(_) => Some("MultiPoint"),
            Geometry::LineString(_) => Some("LineString"),
            Geometry::MultiLineString(_) => Some("MultiLineString"),
            Geometry::Polygon(_) => Some("Polygon"),
            Geometry::MultiPolygon(_) => Some("MultiPolygon"),
            Geometry::GeometryCollection(_) => Some("GeometryCollection"),
        }
    }
}

/// A geometry together with its feature id and properties.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryObject {
    pub geometry: Geometry,
    pub id: Option<Value>,
    pub properties: Option<Record>,
}

impl GeometryObject {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            id: None,
            properties: None,
        }
    }

    pub fn null() -> Self {
        Self::new(Geometry::Null)
    }

    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_properties(mut self, properties: Record) -> Self {
        self.properties = Some(properties);
        self
    }
}

impl TopologyDocument {
    /// Parses a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Parses a document from a JSON value.
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::malformed("document", "a JSON object"))?;
        match obj.get("type") {
            None => {
                return Err(Error::MissingType {
                    context: "document".into(),
                })
            }
            Some(Value::String(t)) if t == "Topology" => {}
            Some(Value::String(t)) => return Err(Error::NotTopology(t.clone())),
            Some(_) => return Err(Error::malformed("document.type", "a string")),
        }

        let transform = match obj.get("transform") {
            None | Some(Value::Null) => None,
            Some(t) => Some(parse_transform(t)?),
        };

        let arcs = match obj.get("arcs") {
            None => Vec::new(),
            Some(arcs) => expect_array(arcs, "arcs")?
                .iter()
                .enumerate()
                .map(|(i, arc)| parse_arc(arc, &format!("arcs[{i}]")))
                .collect::<Result<Vec<_>>>()?,
        };

        let objects_value = obj
            .get("objects")
            .ok_or_else(|| Error::malformed("objects", "an object of named geometries"))?;
        let objects_map = objects_value
            .as_object()
            .ok_or_else(|| Error::malformed("objects", "an object of named geometries"))?;
        let mut objects = IndexMap::with_capacity(objects_map.len());
        for (name, geom) in objects_map {
            objects.insert(name.clone(), parse_object(geom, &format!("objects.{name}"))?);
        }

        Ok(Self {
            transform,
            arcs,
            objects,
            crs: obj.get("crs").cloned(),
        })
    }

    /// Serializes to compact JSON text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes to indented JSON text.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

// --- Parsing ---

fn expect_array<'a>(value: &'a Value, context: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| Error::malformed(context, "an array"))
}

fn expect_f64(value: &Value, context: &str) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| Error::malformed(context, "a number"))
}

fn expect_i64(value: &Value, context: &str) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| Error::malformed(context, "an integer arc reference"))
}

fn expect_member<'a>(
    obj: &'a serde_json::Map<String, Value>,
    name: &str,
    context: &str,
) -> Result<&'a Value> {
    obj.get(name)
        .ok_or_else(|| Error::malformed(format!("{context}.{name}"), "a required member"))
}

fn parse_pair(value: &Value, context: &str) -> Result<Position> {
    let items = expect_array(value, context)?;
    if items.len() < 2 {
        return Err(Error::malformed(context, "at least two numbers"));
    }
    Ok([expect_f64(&items[0], context)?, expect_f64(&items[1], context)?])
}

fn parse_transform(value: &Value) -> Result<Transform> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::malformed("transform", "an object"))?;
    let scale = parse_pair(expect_member(obj, "scale", "transform")?, "transform.scale")?;
    let translate = parse_pair(
        expect_member(obj, "translate", "transform")?,
        "transform.translate",
    )?;
    Ok(Transform::new(scale[0], scale[1], translate[0], translate[1]))
}

fn parse_arc(value: &Value, context: &str) -> Result<Vec<Position>> {
    let points = expect_array(value, context)?;
    if points.len() < 2 {
        return Err(Error::malformed(context, "an arc with at least two positions"));
    }
    points
        .iter()
        .enumerate()
        .map(|(i, p)| parse_pair(p, &format!("{context}[{i}]")))
        .collect()
}

fn parse_positions(value: &Value, context: &str) -> Result<Vec<Position>> {
    expect_array(value, context)?
        .iter()
        .enumerate()
        .map(|(i, p)| parse_pair(p, &format!("{context}[{i}]")))
        .collect()
}

fn parse_refs(value: &Value, context: &str) -> Result<Vec<i64>> {
    expect_array(value, context)?
        .iter()
        .map(|v| expect_i64(v, context))
        .collect()
}

fn parse_ref_lists(value: &Value, context: &str) -> Result<Vec<Vec<i64>>> {
    expect_array(value, context)?
        .iter()
        .enumerate()
        .map(|(i, v)| parse_refs(v, &format!("{context}[{i}]")))
        .collect()
}

fn parse_object(value: &Value, context: &str) -> Result<GeometryObject> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::malformed(context, "a geometry object"))?;

    let type_name = match obj.get("type") {
        None => {
            return Err(Error::MissingType {
                context: context.to_string(),
            })
        }
        Some(Value::Null) => None,
        Some(Value::String(t)) => Some(t.as_str()),
        Some(_) => return Err(Error::malformed(format!("{context}.type"), "a string or null")),
    };

    let arcs_ctx = format!("{context}.arcs");
    let coords_ctx = format!("{context}.coordinates");
    let geometry = match type_name {
        None => Geometry::Null,
        Some("Point") => Geometry::Point(parse_pair(
            expect_member(obj, "coordinates", context)?,
            &coords_ctx,
        )?),
        Some("MultiPoint") => Geometry::MultiPoint(parse_positions(
            expect_member(obj, "coordinates", context)?,
            &coords_ctx,
        )?),
        Some("LineString") => {
            Geometry::LineString(parse_refs(expect_member(obj, "arcs", context)?, &arcs_ctx)?)
        }
        Some("MultiLineString") => Geometry::MultiLineString(parse_ref_lists(
            expect_member(obj, "arcs", context)?,
            &arcs_ctx,
        )?),
        Some("Polygon") => Geometry::Polygon(parse_ref_lists(
            expect_member(obj, "arcs", context)?,
            &arcs_ctx,
        )?),
        Some("MultiPolygon") => {
            let polygons = expect_array(expect_member(obj, "arcs", context)?, &arcs_ctx)?
                .iter()
                .enumerate()
                .map(|(i, p)| parse_ref_lists(p, &format!("{arcs_ctx}[{i}]")))
                .collect::<Result<Vec<_>>>()?;
            Geometry::MultiPolygon(polygons)
        }
        Some("GeometryCollection") => {
            let geoms_ctx = format!("{context}.geometries");
            let geometries = expect_array(expect_member(obj, "geometries", context)?, &geoms_ctx)?
                .iter()
                .enumerate()
                .map(|(i, g)| parse_object(g, &format!("{geoms_ctx}[{i}]")))
                .collect::<Result<Vec<_>>>()?;
            Geometry::GeometryCollection(geometries)
        }
        Some(other) => {
            return Err(Error::UnknownGeometryType {
                context: context.to_string(),
                found: other.to_string(),
            })
        }
    };

    let properties = match obj.get("properties") {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map.clone()),
        Some(_) => {
            return Err(Error::malformed(
                format!("{context}.properties"),
                "an object or null",
            ))
        }
    };

    let id = match obj.get("id") {
        None | Some(Value::Null) => None,
        Some(id) => Some(id.clone()),
    };

    Ok(GeometryObject {
        geometry,
        id,
        properties,
    })
}

// --- Serialization ---

/// A coordinate that serializes as an integer when it holds one.
struct Num(f64);

impl Serialize for Num {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        // Largest magnitude where every integer is exactly representable
        const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
        let v = self.0;
        if v.fract() == 0.0 && v.abs() < MAX_EXACT {
            serializer.serialize_i64(v as i64)
        } else {
            serializer.serialize_f64(v)
        }
    }
}

struct Pos<'a>(&'a Position);

impl Serialize for Pos<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&Num(self.0[0]))?;
        seq.serialize_element(&Num(self.0[1]))?;
        seq.end()
    }
}

struct PosList<'a>(&'a [Position]);

impl Serialize for PosList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(Pos))
    }
}

struct TransformJson<'a>(&'a Transform);

impl Serialize for TransformJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let t = self.0;
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("scale", &[Num(t.sx), Num(t.sy)])?;
        map.serialize_entry("translate", &[Num(t.tx), Num(t.ty)])?;
        map.end()
    }
}

impl Serialize for TopologyDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "Topology")?;
        if let Some(crs) = &self.crs {
            map.serialize_entry("crs", crs)?;
        }
        if let Some(t) = &self.transform {
            map.serialize_entry("transform", &TransformJson(t))?;
        }
        let arcs: Vec<PosList<'_>> = self.arcs.iter().map(|a| PosList(a)).collect();
        map.serialize_entry("arcs", &arcs)?;
        map.serialize_entry("objects", &self.objects)?;
        map.end()
    }
}

impl Serialize for GeometryObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", &self.geometry.type_name())?;
        match &self.geometry {
            Geometry::Null => {}
            Geometry::Point(p) => map.serialize_entry("coordinates", &Pos(p))?,
            Geometry::MultiPoint(points) => map.serialize_entry("coordinates", &PosList(points))?,
            Geometry::LineString(arcs) => map.serialize_entry("arcs", arcs)?,
            Geometry::MultiLineString(arcs) | Geometry::Polygon(arcs) => {
                map.serialize_entry("arcs", arcs)?
            }
            Geometry::MultiPolygon(arcs) => map.serialize_entry("arcs", arcs)?,
            Geometry::GeometryCollection(geometries) => {
                map.serialize_entry("geometries", geometries)?
            }
        }
        if let Some(properties) = &self.properties {
            map.serialize_entry("properties", properties)?;
        }
        if let Some(id) = &self.id {
            map.serialize_entry("id", id)?;
        }
        map.end()
    }
}
