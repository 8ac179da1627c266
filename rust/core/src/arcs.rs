// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared arc storage.
//!
//! An [`ArcCollection`] owns every polyline that layers in a dataset refer
//! to. Coordinates live in flat `x`/`y` arrays with a per-arc offset and
//! length, so an arc shared by two polygons is stored exactly once. Shapes
//! reference arcs through [`ArcRef`], which carries the traversal direction.
//!
//! Stored coordinates are never modified after construction. Simplification
//! attaches per-vertex thresholds and a retained interval; pruned vertices
//! stay in the store and are only skipped by [`ArcCollection::filtered_copy`].

use nalgebra::Point2;

use crate::bounds::Bounds;
use crate::error::{Error, Result};
use crate::transform::Transform;

/// A directed reference to an arc in an [`ArcCollection`].
///
/// On the wire a reference is a signed integer: `i >= 0` is arc `i` traversed
/// forward, `i < 0` is arc `!i` (`-i - 1`) traversed in reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArcRef {
    Forward(usize),
    Reversed(usize),
}

impl ArcRef {
    /// Decodes a signed wire reference.
    pub fn from_signed(value: i64) -> Self {
        if value >= 0 {
            ArcRef::Forward(value as usize)
        } else {
            ArcRef::Reversed(!value as usize)
        }
    }

    /// Encodes this reference as a signed wire integer.
    pub fn to_signed(self) -> i64 {
        match self {
            ArcRef::Forward(id) => id as i64,
            ArcRef::Reversed(id) => !(id as i64),
        }
    }

    /// Index of the referenced arc, independent of direction.
    #[inline]
    pub fn arc_id(self) -> usize {
        match self {
            ArcRef::Forward(id) | ArcRef::Reversed(id) => id,
        }
    }

    #[inline]
    pub fn is_reversed(self) -> bool {
        matches!(self, ArcRef::Reversed(_))
    }

    /// Same arc, opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            ArcRef::Forward(id) => ArcRef::Reversed(id),
            ArcRef::Reversed(id) => ArcRef::Forward(id),
        }
    }

    /// Same direction, different arc. Used when arcs are renumbered.
    pub fn with_arc_id(self, id: usize) -> Self {
        match self {
            ArcRef::Forward(_) => ArcRef::Forward(id),
            ArcRef::Reversed(_) => ArcRef::Reversed(id),
        }
    }
}

/// An ordered chain of arc references forming one ring or one line.
pub type Path = Vec<ArcRef>;

/// Flat storage for a set of polylines shared between layers.
///
/// # Example
///
/// ```
/// use mapkit_core::{ArcCollection, ArcRef};
///
/// let arcs = ArcCollection::new(&[vec![[0.0, 0.0], [2.0, 1.0]]]);
/// let pts = arcs.arc_points(ArcRef::Reversed(0)).unwrap();
///
/// assert_eq!(arcs.size(), 1);
/// assert_eq!((pts[0].x, pts[0].y), (2.0, 1.0));
/// ```
#[derive(Debug, Clone)]
pub struct ArcCollection {
    xx: Vec<f64>,
    yy: Vec<f64>,
    // Offset of each arc's first vertex in `xx`/`yy`
    ii: Vec<usize>,
    // Vertex count of each arc
    nn: Vec<usize>,
    arc_bounds: Vec<Bounds>,
    bounds: Bounds,

    // Simplification state (parallel to `xx`)
    thresholds: Option<Vec<f64>>,
    retained_interval: f64,
    retained_pct: f64,
}

impl ArcCollection {
    /// Builds a collection from coordinate sequences, one per arc.
    pub fn new<A: AsRef<[[f64; 2]]>>(arcs: &[A]) -> Self {
        let total: usize = arcs.iter().map(|a| a.as_ref().len()).sum();
        let mut xx = Vec::with_capacity(total);
        let mut yy = Vec::with_capacity(total);
        let mut nn = Vec::with_capacity(arcs.len());
        for arc in arcs {
            let arc = arc.as_ref();
            nn.push(arc.len());
            for &[x, y] in arc {
                xx.push(x);
                yy.push(y);
            }
        }
        Self::from_flat(xx, yy, nn)
    }

    fn from_flat(xx: Vec<f64>, yy: Vec<f64>, nn: Vec<usize>) -> Self {
        let mut ii = Vec::with_capacity(nn.len());
        let mut arc_bounds = Vec::with_capacity(nn.len());
        let mut bounds = Bounds::empty();
        let mut offset = 0;
        for &n in &nn {
            ii.push(offset);
            let mut b = Bounds::empty();
            for j in offset..offset + n {
                b.merge_point(xx[j], yy[j]);
            }
            bounds.merge_bounds(&b);
            arc_bounds.push(b);
            offset += n;
        }
        Self {
            xx,
            yy,
            ii,
            nn,
            arc_bounds,
            bounds,
            thresholds: None,
            retained_interval: 0.0,
            retained_pct: 1.0,
        }
    }

    /// Returns the number of arcs.
    pub fn size(&self) -> usize {
        self.nn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nn.is_empty()
    }

    /// Returns the number of stored vertices across all arcs.
    pub fn point_count(&self) -> usize {
        self.xx.len()
    }

    /// Returns the combined bounding box of every arc.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn arc_bounds(&self, id: usize) -> Result<Bounds> {
        self.check_id(id)?;
        Ok(self.arc_bounds[id])
    }

    /// Returns the vertex count of an arc.
    pub fn arc_len(&self, id: usize) -> Result<usize> {
        self.check_id(id)?;
        Ok(self.nn[id])
    }

    /// Fails unless `reference` points at an arc in this collection.
    pub fn check_ref(&self, reference: ArcRef) -> Result<()> {
        if reference.arc_id() < self.size() {
            Ok(())
        } else {
            Err(Error::ArcOutOfRange {
                reference,
                count: self.size(),
            })
        }
    }

    fn check_id(&self, id: usize) -> Result<()> {
        if id < self.size() {
            Ok(())
        } else {
            Err(Error::ArcIdOutOfRange {
                id,
                count: self.size(),
            })
        }
    }

    /// Returns the vertices of an arc in the direction given by `reference`.
    pub fn arc_points(&self, reference: ArcRef) -> Result<Vec<Point2<f64>>> {
        self.check_ref(reference)?;
        let id = reference.arc_id();
        let start = self.ii[id];
        let mut points: Vec<Point2<f64>> = (start..start + self.nn[id])
            .map(|j| Point2::new(self.xx[j], self.yy[j]))
            .collect();
        if reference.is_reversed() {
            points.reverse();
        }
        Ok(points)
    }

    /// Iterates over arcs as coordinate slices pairs `(xs, ys)`.
    pub fn iter(&self) -> impl Iterator<Item = (&[f64], &[f64])> + '_ {
        self.ii.iter().zip(&self.nn).map(move |(&start, &n)| {
            (&self.xx[start..start + n], &self.yy[start..start + n])
        })
    }

    /// True when the arc has fewer than two distinct vertices.
    pub fn arc_is_degenerate(&self, id: usize) -> Result<bool> {
        self.check_id(id)?;
        let start = self.ii[id];
        let n = self.nn[id];
        if n < 2 {
            return Ok(true);
        }
        let (x0, y0) = (self.xx[start], self.yy[start]);
        let distinct = (start + 1..start + n).any(|j| self.xx[j] != x0 || self.yy[j] != y0);
        Ok(!distinct)
    }

    /// Average segment length (sum of segment lengths / segment count).
    pub fn avg_segment_length(&self) -> f64 {
        let mut sum = 0.0;
        let mut count = 0usize;
        self.for_each_segment(|dx, dy| {
            sum += (dx * dx + dy * dy).sqrt();
            count += 1;
        });
        if count > 0 {
            sum / count as f64
        } else {
            0.0
        }
    }

    /// Average absolute x and y extent of a segment, `(mean |dx|, mean |dy|)`.
    pub fn avg_segment2(&self) -> (f64, f64) {
        let mut sx = 0.0;
        let mut sy = 0.0;
        let mut count = 0usize;
        self.for_each_segment(|dx, dy| {
            sx += dx.abs();
            sy += dy.abs();
            count += 1;
        });
        if count > 0 {
            (sx / count as f64, sy / count as f64)
        } else {
            (0.0, 0.0)
        }
    }

    fn for_each_segment<F: FnMut(f64, f64)>(&self, mut f: F) {
        for (&start, &n) in self.ii.iter().zip(&self.nn) {
            for j in start + 1..start + n {
                f(self.xx[j] - self.xx[j - 1], self.yy[j] - self.yy[j - 1]);
            }
        }
    }

    // --- Simplification ---

    /// Attaches per-vertex removal thresholds, one vector per arc.
    ///
    /// A vertex is kept while its threshold is at least the retained interval.
    /// Arc endpoints are kept regardless of their threshold.
    pub fn set_thresholds(&mut self, thresholds: Vec<Vec<f64>>) -> Result<()> {
        if thresholds.len() != self.size() {
            return Err(Error::ThresholdArcCount {
                expected: self.size(),
                found: thresholds.len(),
            });
        }
        let mut flat = Vec::with_capacity(self.point_count());
        for (arc, values) in thresholds.into_iter().enumerate() {
            if values.len() != self.nn[arc] {
                return Err(Error::ThresholdMismatch {
                    arc,
                    expected: self.nn[arc],
                    found: values.len(),
                });
            }
            flat.extend(values);
        }
        self.thresholds = Some(flat);
        self.set_retained_pct(self.retained_pct);
        Ok(())
    }

    pub fn has_thresholds(&self) -> bool {
        self.thresholds.is_some()
    }

    /// Sets the share of removable vertices to keep, clamped to `[0, 1]`.
    pub fn set_retained_pct(&mut self, pct: f64) {
        let pct = if pct.is_nan() { 1.0 } else { pct.clamp(0.0, 1.0) };
        self.retained_pct = pct;
        self.retained_interval = match &self.thresholds {
            Some(thresholds) if pct < 1.0 => threshold_for_pct(thresholds, pct),
            _ => 0.0,
        };
    }

    pub fn retained_pct(&self) -> f64 {
        self.retained_pct
    }

    pub fn retained_interval(&self) -> f64 {
        self.retained_interval
    }

    fn is_retained(&self, arc: usize, j: usize) -> bool {
        let start = self.ii[arc];
        if j == start || j + 1 == start + self.nn[arc] {
            return true;
        }
        match &self.thresholds {
            Some(t) => t[j] >= self.retained_interval,
            None => true,
        }
    }

    /// Returns a new collection containing only retained vertices.
    pub fn filtered_copy(&self) -> ArcCollection {
        let mut xx = Vec::with_capacity(self.point_count());
        let mut yy = Vec::with_capacity(self.point_count());
        let mut nn = Vec::with_capacity(self.size());
        for arc in 0..self.size() {
            let start = self.ii[arc];
            let mut n = 0;
            for j in start..start + self.nn[arc] {
                if self.is_retained(arc, j) {
                    xx.push(self.xx[j]);
                    yy.push(self.yy[j]);
                    n += 1;
                }
            }
            nn.push(n);
        }
        Self::from_flat(xx, yy, nn)
    }

    /// Returns a transformed copy; with `round`, coordinates snap to integers.
    pub fn transformed(&self, transform: &Transform, round: bool) -> ArcCollection {
        let mut xx = Vec::with_capacity(self.point_count());
        let mut yy = Vec::with_capacity(self.point_count());
        for (&x, &y) in self.xx.iter().zip(&self.yy) {
            let (mut x, mut y) = transform.apply(x, y);
            if round {
                x = x.round();
                y = y.round();
            }
            xx.push(x);
            yy.push(y);
        }
        let mut copy = Self::from_flat(xx, yy, self.nn.clone());
        copy.thresholds = self.thresholds.clone();
        copy.set_retained_pct(self.retained_pct);
        copy
    }
}

/// Picks the threshold that keeps roughly `pct` of the removable vertices.
fn threshold_for_pct(thresholds: &[f64], pct: f64) -> f64 {
    let mut removable: Vec<f64> = thresholds.iter().copied().filter(|z| z.is_finite()).collect();
    if removable.is_empty() {
        return 0.0;
    }
    removable.sort_by(|a, b| a.total_cmp(b));
    let remove = ((1.0 - pct) * removable.len() as f64).round() as usize;
    if remove == 0 {
        0.0
    } else if remove >= removable.len() {
        f64::INFINITY
    } else {
        removable[remove]
    }
}
