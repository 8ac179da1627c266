// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dataset to TopoJSON Topology.
//!
//! Export runs in three phases:
//!
//! 1. **Arcs**: apply the retained simplification level, fit the quantization
//!    grid to the arcs that survive it, quantize, drop arcs that collapsed to
//!    a point and renumber the rest.
//! 2. **Layers**: encode every layer's shapes and records into one
//!    `GeometryCollection` per layer. Layers are independent and encoded in
//!    parallel.
//! 3. **Document**: delta-encode arcs and assemble the Topology.

use indexmap::IndexMap;
use mapkit_core::{ArcCollection, Bounds, Dataset, GeometryType, Layer, Point2, Shape};
use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::document::{Geometry, GeometryObject, Position, TopologyDocument};
use crate::error::{Error, Result};
use crate::filter::{filter_empty_arcs, ArcIndexMap};
use crate::geometry::export_geometry;
use crate::options::{QuantizationPolicy, TopoJsonOptions};
use crate::properties::export_properties;
use crate::quantize::{calc_export_bounds, delta_encode, Quantizer};

/// Relative tolerance within which an imported transform is reused.
const TRANSFORM_REUSE_TOLERANCE: f64 = 1e-9;

/// Arcs prepared for export, shared read-only by every layer encoder.
struct ExportArcs {
    /// Quantized (or raw) arcs before degenerate arcs are removed
    work: ArcCollection,
    index: ArcIndexMap,
    /// Arcs that are written to the document, after renumbering
    kept: ArcCollection,
    kept_coords: Vec<Vec<Position>>,
}

impl ExportArcs {
    fn new(coords: Vec<Vec<Position>>) -> Result<Self> {
        let work = ArcCollection::new(&coords);
        let index = ArcIndexMap::new(&work)?;
        let kept_coords = if index.is_identity() {
            coords
        } else {
            index.compact(&coords)
        };
        Ok(Self {
            work,
            index,
            kept: ArcCollection::new(&kept_coords),
            kept_coords,
        })
    }
}

/// Converts a dataset into a TopoJSON Topology.
///
/// # Example
///
/// ```
/// use mapkit_core::{ArcCollection, ArcRef, Dataset, GeometryType, Layer, Shape};
/// use mapkit_topojson::{export_topology, TopoJsonOptions};
///
/// let arcs = ArcCollection::new(&[vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.0, 0.0]]]);
/// let layer = Layer::new(
///     "shapes",
///     GeometryType::Polygon,
///     vec![Some(Shape::Paths(vec![vec![ArcRef::Forward(0)]]))],
/// );
/// let dataset = Dataset::new(Some(arcs), vec![layer]);
///
/// let doc = export_topology(&dataset, &TopoJsonOptions::default().with_quantization(100)).unwrap();
/// assert_eq!(doc.arcs[0], vec![[0.0, 0.0], [0.0, 99.0], [99.0, 0.0], [-99.0, -99.0]]);
/// ```
pub fn export_topology(dataset: &Dataset, options: &TopoJsonOptions) -> Result<TopologyDocument> {
    let start = std::time::Instant::now();
    let policy = options.quantization_policy()?;
    for layer in &dataset.layers {
        layer
            .validate()
            .map_err(|e| layer_error(layer, Error::from(e)))?;
    }

    // Pruned vertices are not exported
    let source_arcs = dataset.arcs.as_ref().map(|arcs| {
        if arcs.has_thresholds() {
            arcs.filtered_copy()
        } else {
            arcs.clone()
        }
    });

    let (quantizer, coords) = match (&policy, &source_arcs) {
        (Some(policy), Some(arcs)) if !arcs.is_empty() => fit_grid(dataset, arcs, policy)?,
        (_, Some(arcs)) => (None, raw_coords(arcs)),
        (_, None) => (None, Vec::new()),
    };
    let arcs = ExportArcs::new(coords)?;
    tracing::debug!(
        arcs = arcs.work.size(),
        kept = arcs.index.kept(),
        quantized = quantizer.is_some(),
        "Prepared arcs"
    );

    let names = layer_names(&dataset.layers);
    let collections: Vec<GeometryObject> = dataset
        .layers
        .par_iter()
        .map(|layer| encode_layer(layer, &arcs, quantizer.as_ref(), options))
        .collect::<Result<Vec<_>>>()?;

    let mut objects = IndexMap::with_capacity(collections.len());
    for (name, object) in names.into_iter().zip(collections) {
        objects.insert(name, object);
    }

    let doc_arcs = match quantizer {
        Some(_) => arcs.kept_coords.iter().map(|arc| delta_encode(arc)).collect(),
        None => arcs.kept_coords,
    };

    tracing::info!(
        layers = objects.len(),
        arcs = doc_arcs.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Exported topology"
    );

    Ok(TopologyDocument {
        transform: quantizer.map(|q| q.transform()),
        arcs: doc_arcs,
        objects,
        crs: dataset.info.crs.clone(),
    })
}

/// Picks the quantization grid and quantizes the arcs onto it.
///
/// The grid must span exactly the arcs that are written plus all point
/// layers. An arc that collapses on the grid is dropped, and if it set an
/// edge of the extent the grid is refitted to the survivors. Arcs dropped in
/// an earlier pass stay dropped (reduced to a single position), so the loop
/// ends once the surviving extent stops changing.
fn fit_grid(
    dataset: &Dataset,
    arcs: &ArcCollection,
    policy: &QuantizationPolicy,
) -> Result<(Option<Quantizer>, Vec<Vec<Position>>)> {
    let point_bounds = point_layer_bounds(dataset)?;
    let mut live = vec![true; arcs.size()];
    let mut bounds = extent_of(arcs, &live, &point_bounds)?;
    if !bounds.has_bounds() {
        return Ok((None, raw_coords(arcs)));
    }

    loop {
        let grid = calc_export_bounds(&bounds, arcs, policy);
        let quantizer = choose_quantizer(dataset, &bounds, &grid);
        let mut coords = quantizer.quantize_arcs(arcs);
        for (arc, live) in coords.iter_mut().zip(live.iter_mut()) {
            if arc.len() < 2 {
                *live = false;
            }
            if !*live {
                arc.truncate(1);
            }
        }

        let survivors = extent_of(arcs, &live, &point_bounds)?;
        if !survivors.has_bounds() {
            // Every arc collapsed and there are no points to place
            return Ok((None, coords));
        }
        if survivors == bounds {
            return Ok((Some(quantizer), coords));
        }
        tracing::debug!(
            from = ?bounds.to_array(),
            to = ?survivors.to_array(),
            "Refitting grid to surviving arcs"
        );
        bounds = survivors;
    }
}

/// Extent of the arcs flagged in `live`, merged with `extra`.
fn extent_of(arcs: &ArcCollection, live: &[bool], extra: &Bounds) -> Result<Bounds> {
    let mut bounds = *extra;
    for (id, _) in live.iter().enumerate().filter(|(_, live)| **live) {
        bounds.merge_bounds(&arcs.arc_bounds(id)?);
    }
    Ok(bounds)
}

fn point_layer_bounds(dataset: &Dataset) -> Result<Bounds> {
    let mut bounds = Bounds::empty();
    for layer in &dataset.layers {
        if layer.geometry_type == Some(GeometryType::Point) {
            bounds.merge_bounds(&layer.bounds(None)?);
        }
    }
    Ok(bounds)
}

/// Builds the quantizer for `bounds`, keeping the dataset's imported
/// transform when it describes the same grid.
fn choose_quantizer(dataset: &Dataset, bounds: &Bounds, grid: &Bounds) -> Quantizer {
    let computed = Quantizer::new(bounds, grid);
    match &dataset.info.input_transform {
        Some(input) if computed.transform().approx_eq(input, TRANSFORM_REUSE_TOLERANCE) => {
            tracing::debug!("Reusing imported quantization transform");
            Quantizer::from_transform(*input)
        }
        _ => computed,
    }
}

fn raw_coords(arcs: &ArcCollection) -> Vec<Vec<Position>> {
    arcs.iter()
        .map(|(xs, ys)| xs.iter().zip(ys).map(|(&x, &y)| [x, y]).collect())
        .collect()
}

/// Output names: unnamed layers become `layer<N>` (N = position + 1);
/// repeated names get a numeric suffix starting at 2.
fn layer_names(layers: &[Layer]) -> Vec<String> {
    let mut used: FxHashSet<String> = FxHashSet::default();
    layers
        .iter()
        .enumerate()
        .map(|(i, layer)| {
            let base = match layer.name.as_deref() {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => format!("layer{}", i + 1),
            };
            let mut name = base.clone();
            let mut suffix = 2;
            while used.contains(&name) {
                name = format!("{base}{suffix}");
                suffix += 1;
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

fn layer_error(layer: &Layer, source: Error) -> Error {
    Error::Layer {
        layer: layer.name.clone().unwrap_or_default(),
        source: Box::new(source),
    }
}

/// Encodes one layer as a GeometryCollection.
fn encode_layer(
    layer: &Layer,
    arcs: &ExportArcs,
    quantizer: Option<&Quantizer>,
    options: &TopoJsonOptions,
) -> Result<GeometryObject> {
    let geometries = (0..layer.feature_count())
        .map(|i| encode_shape(layer, i, arcs, quantizer).map(GeometryObject::new))
        .collect::<Result<Vec<_>>>()
        .map_err(|e| layer_error(layer, e))?;
    let geometries = export_properties(geometries, layer.data.as_ref(), options);
    tracing::debug!(
        layer = layer.name.as_deref().unwrap_or(""),
        features = geometries.len(),
        "Encoded layer"
    );
    Ok(GeometryObject::new(Geometry::GeometryCollection(geometries)))
}

fn encode_shape(
    layer: &Layer,
    i: usize,
    arcs: &ExportArcs,
    quantizer: Option<&Quantizer>,
) -> Result<Geometry> {
    let Some(geometry_type) = layer.geometry_type else {
        return Ok(Geometry::Null);
    };
    let shape = match layer.shape(i) {
        None => None,
        Some(Shape::Paths(paths)) => filter_empty_arcs(paths, &arcs.work)?
            .map(|paths| Shape::Paths(arcs.index.renumber_paths(&paths))),
        Some(Shape::Points(points)) => Some(Shape::Points(match quantizer {
            Some(q) => points
                .iter()
                .map(|p| {
                    let [x, y] = q.quantize_point(p);
                    Point2::new(x, y)
                })
                .collect(),
            None => points.clone(),
        })),
    };
    export_geometry(shape.as_ref(), geometry_type, Some(&arcs.kept))
}
