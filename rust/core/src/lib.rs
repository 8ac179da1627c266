// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # MapKit Core
//!
//! Shared-arc data model for vector map data.
//!
//! Polygons and polylines are stored as lists of [`ArcRef`]s into a single
//! [`ArcCollection`] per [`Dataset`]. Two features that share a boundary
//! reference the same arc, one of them usually in reverse, so the boundary's
//! vertices exist exactly once.
//!
//! ## Overview
//!
//! - **Arcs**: flat coordinate storage, per-arc bounds, segment statistics and
//!   simplification thresholds
//! - **Bounds / Transform**: extents and the scale + translate transforms used
//!   for quantization
//! - **Layers / Tables**: shapes paired index-for-index with attribute records
//! - **Display**: the read contract map renderers consume
//!
//! ```
//! use mapkit_core::{ArcCollection, ArcRef, GeometryType, Layer, Shape, Dataset};
//!
//! let arcs = ArcCollection::new(&[vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.0, 0.0]]]);
//! let layer = Layer::new(
//!     "triangles",
//!     GeometryType::Polygon,
//!     vec![Some(Shape::Paths(vec![vec![ArcRef::Forward(0)]]))],
//! );
//! let dataset = Dataset::new(Some(arcs), vec![layer]);
//! assert_eq!(dataset.bounds().unwrap().to_array(), [0.0, 0.0, 1.0, 1.0]);
//! ```

pub mod arcs;
pub mod bounds;
pub mod dataset;
pub mod display;
pub mod error;
pub mod geom;
pub mod layer;
pub mod table;
pub mod transform;

pub use arcs::{ArcCollection, ArcRef, Path};
pub use bounds::Bounds;
pub use dataset::{Dataset, DatasetInfo};
pub use display::{bounds_overlap, map_needs_reset, Canvas, DisplayLayer, Style};
pub use error::{Error, Result};
pub use geom::{path_area, path_bounds, path_points, ring_area};
pub use layer::{GeometryType, Layer, Shape};
pub use table::{record_from_json, DataTable, Record, Value};
pub use transform::Transform;

pub use nalgebra::Point2;
