// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Quantization grid and delta coding.
//!
//! A quantized document stores integer grid positions. The grid is chosen
//! by [`calc_export_bounds`] from the dataset extent and the resolved
//! [`QuantizationPolicy`]; [`Quantizer`] then maps coordinates onto it.
//! Arcs are additionally delta-encoded: the first position is absolute and
//! every following position is the offset from its predecessor.

use mapkit_core::{ArcCollection, Bounds, Point2, Transform};

use crate::document::Position;
use crate::options::QuantizationPolicy;

/// Number of grid cells needed to cover `extent` with cells of size `unit`.
///
/// Non-finite or non-positive results collapse to zero cells.
fn grid_cells(extent: f64, unit: f64) -> f64 {
    let cells = (extent / unit).ceil();
    if cells.is_finite() && cells > 0.0 {
        cells
    } else {
        0.0
    }
}

/// Computes the integer grid extent `[0, 0, cx, cy]` for a dataset.
///
/// `source` is the extent of every exported coordinate; `arcs` supplies the
/// average segment extent used by [`QuantizationPolicy::RelativePrecision`].
pub fn calc_export_bounds(
    source: &Bounds,
    arcs: &ArcCollection,
    policy: &QuantizationPolicy,
) -> Bounds {
    let (width, height) = (source.width(), source.height());
    let (cx, cy) = match *policy {
        QuantizationPolicy::Grid(q) => {
            let max = f64::from(q.saturating_sub(1));
            let axis = |extent: f64| if extent > 0.0 { max } else { 0.0 };
            (axis(width), axis(height))
        }
        QuantizationPolicy::Precision(unit) => {
            (grid_cells(width, unit), grid_cells(height, unit))
        }
        QuantizationPolicy::RelativePrecision(fraction) => {
            let (avg_dx, avg_dy) = arcs.avg_segment2();
            // An axis no segment moves along (parallel axis-aligned arcs)
            // still has extent; size its cells from the mean segment length
            let fallback = arcs.avg_segment_length();
            let unit = |avg: f64| (if avg > 0.0 { avg } else { fallback }) * fraction;
            (
                grid_cells(width, unit(avg_dx)),
                grid_cells(height, unit(avg_dy)),
            )
        }
    };
    Bounds::new(0.0, 0.0, cx, cy)
}

/// Maps coordinates onto an integer grid and back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    transform: Transform,
}

impl Quantizer {
    /// Builds the quantizer that spreads `source` over `grid`.
    pub fn new(source: &Bounds, grid: &Bounds) -> Self {
        fn scale(extent: f64, cells: f64) -> f64 {
            let s = extent / cells;
            if s.is_finite() && s > 0.0 {
                s
            } else {
                1.0
            }
        }
        Self::from_transform(Transform::new(
            scale(source.width(), grid.width()),
            scale(source.height(), grid.height()),
            source.xmin,
            source.ymin,
        ))
    }

    /// Wraps an existing decode transform (`x = q * scale + translate`).
    pub fn from_transform(transform: Transform) -> Self {
        Self { transform }
    }

    /// The decode transform written to the document.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Grid position of a coordinate.
    #[inline]
    pub fn quantize(&self, x: f64, y: f64) -> Position {
        let t = &self.transform;
        [((x - t.tx) / t.sx).round(), ((y - t.ty) / t.sy).round()]
    }

    pub fn quantize_point(&self, p: &Point2<f64>) -> Position {
        self.quantize(p.x, p.y)
    }

    /// Quantizes every arc, dropping consecutive positions that land on the
    /// same grid cell.
    pub fn quantize_arcs(&self, arcs: &ArcCollection) -> Vec<Vec<Position>> {
        arcs.iter()
            .map(|(xs, ys)| {
                let mut out: Vec<Position> = Vec::with_capacity(xs.len());
                for (&x, &y) in xs.iter().zip(ys) {
                    let q = self.quantize(x, y);
                    if out.last() != Some(&q) {
                        out.push(q);
                    }
                }
                out
            })
            .collect()
    }
}

/// Replaces every position after the first with its offset from the
/// previous position.
pub fn delta_encode(arc: &[Position]) -> Vec<Position> {
    let mut prev = [0.0, 0.0];
    arc.iter()
        .map(|&[x, y]| {
            let delta = [x - prev[0], y - prev[1]];
            prev = [x, y];
            delta
        })
        .collect()
}

/// Inverse of [`delta_encode`]: cumulative sums of the offsets.
pub fn delta_decode(arc: &[Position]) -> Vec<Position> {
    let mut acc = [0.0, 0.0];
    arc.iter()
        .map(|&[dx, dy]| {
            acc = [acc[0] + dx, acc[1] + dy];
            acc
        })
        .collect()
}
