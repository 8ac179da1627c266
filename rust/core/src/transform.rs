// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned scale + translate transforms.
//!
//! Quantization only ever needs `x' = x * sx + tx` per axis, so the transform
//! is kept as four scalars rather than a full affine matrix.

use nalgebra::Point2;

/// Per-axis scale followed by translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub sx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Transform {
    pub fn new(sx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        Self { sx, sy, tx, ty }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 1.0, 0.0, 0.0)
    }

    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.sx + self.tx, y * self.sy + self.ty)
    }

    #[inline]
    pub fn apply_point(&self, p: &Point2<f64>) -> Point2<f64> {
        let (x, y) = self.apply(p.x, p.y);
        Point2::new(x, y)
    }

    /// Returns the inverse transform. Scales are never zero for transforms
    /// built by [`crate::Bounds::transform_to`].
    pub fn invert(&self) -> Self {
        Self::new(
            1.0 / self.sx,
            1.0 / self.sy,
            -self.tx / self.sx,
            -self.ty / self.sy,
        )
    }

    /// Compares two transforms with a tolerance relative to their scales.
    ///
    /// Translations are compared in units of the scale, which is how far
    /// apart two grids can drift before a rounded coordinate changes.
    pub fn approx_eq(&self, other: &Transform, rel_tol: f64) -> bool {
        fn close(a: f64, b: f64, tol: f64) -> bool {
            (a - b).abs() <= tol
        }
        close(self.sx, other.sx, self.sx.abs() * rel_tol)
            && close(self.sy, other.sy, self.sy.abs() * rel_tol)
            && close(self.tx, other.tx, self.sx.abs() * rel_tol)
            && close(self.ty, other.ty, self.sy.abs() * rel_tol)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn apply_and_invert() {
        let t = Transform::new(0.5, 2.0, 10.0, -3.0);
        let (x, y) = t.apply(4.0, 1.0);
        assert_eq!((x, y), (12.0, -1.0));

        let (bx, by) = t.invert().apply(x, y);
        assert_relative_eq!(bx, 4.0);
        assert_relative_eq!(by, 1.0);
    }

    #[test]
    fn apply_point_matches_apply() {
        let t = Transform::new(3.0, 3.0, 1.0, 1.0);
        let p = t.apply_point(&Point2::new(1.0, 2.0));
        assert_eq!((p.x, p.y), (4.0, 7.0));
    }

    #[test]
    fn approx_eq_uses_relative_tolerance() {
        let a = Transform::new(0.001, 0.001, 100.0, 50.0);
        let b = Transform::new(0.001 * (1.0 + 1e-13), 0.001, 100.0 + 1e-15, 50.0);
        assert!(a.approx_eq(&b, 1e-9));

        let c = Transform::new(0.0011, 0.001, 100.0, 50.0);
        assert!(!a.approx_eq(&c, 1e-9));
    }
}
