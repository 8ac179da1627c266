// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # MapKit TopoJSON
//!
//! Import and export of [TopoJSON](https://github.com/topojson/topojson-specification)
//! Topology documents for shared-arc datasets.
//!
//! Export quantizes arc coordinates onto an integer grid chosen from the
//! dataset extent, removes arcs that collapse to a single grid cell,
//! delta-encodes the rest and writes one `GeometryCollection` per layer.
//! Import reverses each step and records the document's transform, so an
//! imported dataset re-exports to the same bytes.
//!
//! ## Quantization
//!
//! The grid is picked from [`TopoJsonOptions`], first match wins:
//!
//! - `quantization = Q`: `Q` positions per axis
//! - `precision = p`: cells of `p` coordinate units
//! - `topojson_precision = f`: cells of `f` times the average segment extent
//! - otherwise `topojson_precision = 0.02`
//!
//! `no_quantization` writes raw coordinates without a transform.
//!
//! ```
//! use mapkit_topojson::{import_topojson_str, export_topology, TopoJsonOptions};
//!
//! let json = r#"{
//!     "type": "Topology",
//!     "arcs": [[[0, 0], [10, 0], [0, 10], [-10, -10]]],
//!     "transform": {"scale": [0.5, 0.5], "translate": [100, 200]},
//!     "objects": {"area": {"type": "Polygon", "arcs": [[-1]], "id": 7}}
//! }"#;
//!
//! let options = TopoJsonOptions::default().with_quantization(11);
//! let dataset = import_topojson_str(json, &options).unwrap();
//! assert_eq!(dataset.layers[0].name.as_deref(), Some("area"));
//!
//! let doc = export_topology(&dataset, &options).unwrap();
//! assert_eq!(doc.transform, dataset.info.input_transform);
//! ```

pub mod document;
pub mod error;
pub mod export;
pub mod filter;
pub mod geometry;
pub mod import;
pub mod options;
pub mod properties;
pub mod quantize;

pub use document::{Geometry, GeometryObject, Position, TopologyDocument};
pub use error::{Error, Result};
pub use export::export_topology;
pub use filter::{filter_empty_arcs, ArcIndexMap};
pub use geometry::export_geometry;
pub use import::{import_object, import_topojson, import_topojson_str, Importer};
pub use options::{IdField, QuantizationPolicy, TopoJsonOptions, DEFAULT_ID_FIELD, DEFAULT_TOPOJSON_PRECISION};
pub use properties::export_properties;
pub use quantize::{calc_export_bounds, delta_decode, delta_encode, Quantizer};
