// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned 2D bounding boxes.
//!
//! A fresh [`Bounds`] starts in an invalid state and becomes valid after the
//! first point is merged in, the same way map layers, arcs and view extents
//! accumulate their extent.

use nalgebra::Point2;

use crate::transform::Transform;

/// Bounding box in f64 precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Bounds {
    /// Creates bounds from explicit corners. Corners are normalized so that
    /// `xmin <= xmax` and `ymin <= ymax`.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            xmin: x0.min(x1),
            ymin: y0.min(y1),
            xmax: x0.max(x1),
            ymax: y0.max(y1),
        }
    }

    /// Creates bounds in the invalid (empty) state.
    pub fn empty() -> Self {
        Self {
            xmin: f64::MAX,
            ymin: f64::MAX,
            xmax: f64::MIN,
            ymax: f64::MIN,
        }
    }

    /// Check if at least one point has been merged in.
    #[inline]
    pub fn has_bounds(&self) -> bool {
        self.xmin <= self.xmax && self.ymin <= self.ymax
    }

    #[inline]
    pub fn width(&self) -> f64 {
        if self.has_bounds() {
            self.xmax - self.xmin
        } else {
            0.0
        }
    }

    #[inline]
    pub fn height(&self) -> f64 {
        if self.has_bounds() {
            self.ymax - self.ymin
        } else {
            0.0
        }
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Expand bounds to include a point.
    #[inline]
    pub fn merge_point(&mut self, x: f64, y: f64) {
        self.xmin = self.xmin.min(x);
        self.ymin = self.ymin.min(y);
        self.xmax = self.xmax.max(x);
        self.ymax = self.ymax.max(y);
    }

    /// Expand bounds to include another bounding box. Empty boxes are ignored.
    pub fn merge_bounds(&mut self, other: &Bounds) {
        if other.has_bounds() {
            self.merge_point(other.xmin, other.ymin);
            self.merge_point(other.xmax, other.ymax);
        }
    }

    /// Builds bounds around a sequence of points.
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point2<f64>>,
    {
        let mut bounds = Self::empty();
        for p in points {
            bounds.merge_point(p.x, p.y);
        }
        bounds
    }

    /// Tests for overlap; touching edges count as intersecting.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.has_bounds()
            && other.has_bounds()
            && self.xmin <= other.xmax
            && self.xmax >= other.xmin
            && self.ymin <= other.ymax
            && self.ymax >= other.ymin
    }

    /// Returns `[xmin, ymin, xmax, ymax]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }

    /// Returns the transform that maps these bounds onto `dest`.
    ///
    /// An axis with zero extent on either side gets a scale of 1, so the
    /// result never contains NaN or infinite factors.
    pub fn transform_to(&self, dest: &Bounds) -> Transform {
        let kx = axis_scale(dest.width(), self.width());
        let ky = axis_scale(dest.height(), self.height());
        Transform::new(kx, ky, dest.xmin - self.xmin * kx, dest.ymin - self.ymin * ky)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

fn axis_scale(dest_extent: f64, src_extent: f64) -> f64 {
    let k = dest_extent / src_extent;
    if k.is_finite() && k > 0.0 {
        k
    } else {
        1.0
    }
}
