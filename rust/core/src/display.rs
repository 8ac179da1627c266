// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only view of a layer for map renderers.
//!
//! Renderers receive a [`DisplayLayer`] and a view extent. The layer reports
//! its bounds, which features touch the extent, and replays its geometry as
//! path commands on a [`Canvas`]. Pixel output, hit-testing and navigation
//! belong to the renderer.

use crate::arcs::ArcCollection;
use crate::bounds::Bounds;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::geom::path_points;
use crate::layer::{GeometryType, Layer, Shape};

/// Drawing style handed through to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub stroke_color: Option<String>,
    pub fill_color: Option<String>,
    pub line_width: f64,
    pub dot_size: f64,
    /// Restrict drawing to these feature ids (hover/highlight styles).
    pub ids: Option<Vec<usize>>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke_color: Some("#000".to_string()),
            fill_color: None,
            line_width: 1.0,
            dot_size: 3.0,
            ids: None,
        }
    }
}

/// Sink for path commands in map coordinates.
pub trait Canvas {
    fn begin_path(&mut self, style: &Style);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    fn end_path(&mut self);
    fn draw_point(&mut self, x: f64, y: f64, style: &Style);
}

/// A layer together with the arcs its shapes reference.
#[derive(Debug, Clone, Copy)]
pub struct DisplayLayer<'a> {
    layer: &'a Layer,
    arcs: Option<&'a ArcCollection>,
}

impl<'a> DisplayLayer<'a> {
    pub fn new(layer: &'a Layer, dataset: &'a Dataset) -> Self {
        Self {
            layer,
            arcs: dataset.arcs.as_ref(),
        }
    }

    pub fn layer(&self) -> &'a Layer {
        self.layer
    }

    /// Bounds of the layer's geometry; empty for attribute-only layers.
    pub fn bounds(&self) -> Result<Bounds> {
        self.layer.bounds(self.arcs)
    }

    /// Ids of features whose bounds touch the view extent.
    pub fn visible_features(&self, extent: &Bounds) -> Result<Vec<usize>> {
        let mut ids = Vec::new();
        for i in 0..self.layer.feature_count() {
            if self.layer.shape_bounds(i, self.arcs)?.intersects(extent) {
                ids.push(i);
            }
        }
        Ok(ids)
    }

    /// Replays visible geometry on `canvas`, honouring the arcs' retained
    /// simplification level.
    pub fn draw(&self, canvas: &mut dyn Canvas, style: &Style, extent: &Bounds) -> Result<()> {
        let filtered;
        let arcs = match self.arcs {
            Some(arcs) if arcs.has_thresholds() => {
                filtered = arcs.filtered_copy();
                Some(&filtered)
            }
            other => other,
        };
        let closed = self.layer.geometry_type == Some(GeometryType::Polygon);

        for id in self.visible_features(extent)? {
            if let Some(ids) = &style.ids {
                if !ids.contains(&id) {
                    continue;
                }
            }
            match (self.layer.shape(id), arcs) {
                (Some(Shape::Points(points)), _) => {
                    for p in points {
                        canvas.draw_point(p.x, p.y, style);
                    }
                }
                (Some(Shape::Paths(paths)), Some(arcs)) => {
                    canvas.begin_path(style);
                    for path in paths {
                        let points = path_points(path, arcs)?;
                        let mut iter = points.iter();
                        if let Some(first) = iter.next() {
                            canvas.move_to(first.x, first.y);
                        }
                        for p in iter {
                            canvas.line_to(p.x, p.y);
                        }
                        if closed {
                            canvas.close_path();
                        }
                    }
                    canvas.end_path();
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Area shared by two bounding boxes.
pub fn bounds_overlap(a: &Bounds, b: &Bounds) -> f64 {
    if !a.intersects(b) {
        return 0.0;
    }
    (a.xmax.min(b.xmax) - a.xmin.max(b.xmin)) * (a.ymax.min(b.ymax) - a.ymin.max(b.ymin))
}

/// Decides whether the map should re-frame to show an updated layer.
///
/// Re-frames when there is no previous extent, when either extent is empty
/// (attribute tables), when the layer moved out of view, or when the layer is
/// far from a viewable scale relative to the current map extent.
pub fn map_needs_reset(new_bounds: &Bounds, prev_bounds: Option<&Bounds>, map_bounds: &Bounds) -> bool {
    let prev = match prev_bounds {
        Some(prev) => prev,
        None => return true,
    };
    if !prev.has_bounds() || !new_bounds.has_bounds() {
        return true;
    }
    if prev == new_bounds {
        return false;
    }
    if !new_bounds.intersects(map_bounds) {
        return true;
    }
    let area_ratio = new_bounds.area() / map_bounds.area();
    area_ratio > 500.0 || area_ratio < 0.05
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arcs::ArcRef;
    use crate::table::DataTable;
    use nalgebra::Point2;

    #[derive(Default)]
    struct Recorder {
        ops: Vec<String>,
    }

    impl Canvas for Recorder {
        fn begin_path(&mut self, _style: &Style) {
            self.ops.push("begin".into());
        }
        fn move_to(&mut self, x: f64, y: f64) {
            self.ops.push(format!("M{x},{y}"));
        }
        fn line_to(&mut self, x: f64, y: f64) {
            self.ops.push(format!("L{x},{y}"));
        }
        fn close_path(&mut self) {
            self.ops.push("Z".into());
        }
        fn end_path(&mut self) {
            self.ops.push("end".into());
        }
        fn draw_point(&mut self, x: f64, y: f64, _style: &Style) {
            self.ops.push(format!("P{x},{y}"));
        }
    }

    fn squares() -> Dataset {
        let arcs = ArcCollection::new(&[
            vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
            vec![[10.0, 10.0], [10.0, 11.0], [11.0, 11.0], [11.0, 10.0], [10.0, 10.0]],
        ]);
        let layer = Layer::new(
            "squares",
            GeometryType::Polygon,
            vec![
                Some(Shape::Paths(vec![vec![ArcRef::Forward(0)]])),
                Some(Shape::Paths(vec![vec![ArcRef::Forward(1)]])),
                None,
            ],
        );
        Dataset::new(Some(arcs), vec![layer])
    }

    #[test]
    fn visible_features_follow_extent() {
        let dataset = squares();
        let display = DisplayLayer::new(&dataset.layers[0], &dataset);
        assert_eq!(display.bounds().unwrap().to_array(), [0.0, 0.0, 11.0, 11.0]);
        let view = Bounds::new(-1.0, -1.0, 2.0, 2.0);
        assert_eq!(display.visible_features(&view).unwrap(), vec![0]);
    }

    #[test]
    fn draw_replays_rings() {
        let dataset = squares();
        let display = DisplayLayer::new(&dataset.layers[0], &dataset);
        let mut canvas = Recorder::default();
        display
            .draw(&mut canvas, &Style::default(), &Bounds::new(-1.0, -1.0, 2.0, 2.0))
            .unwrap();
        assert_eq!(
            canvas.ops,
            vec!["begin", "M0,0", "L0,1", "L1,1", "L1,0", "L0,0", "Z", "end"]
        );
    }

    #[test]
    fn draw_respects_style_ids() {
        let dataset = squares();
        let display = DisplayLayer::new(&dataset.layers[0], &dataset);
        let mut canvas = Recorder::default();
        let style = Style {
            ids: Some(vec![1]),
            ..Style::default()
        };
        display
            .draw(&mut canvas, &style, &Bounds::new(-100.0, -100.0, 100.0, 100.0))
            .unwrap();
        assert_eq!(canvas.ops[1], "M10,10");
        assert_eq!(canvas.ops.len(), 8);
    }

    #[test]
    fn draw_points_and_tables() {
        let layer = Layer::new(
            "pts",
            GeometryType::Point,
            vec![Some(Shape::Points(vec![Point2::new(1.0, 2.0)]))],
        );
        let dataset = Dataset::new(None, vec![layer, Layer::table("t", DataTable::with_len(2))]);
        let mut canvas = Recorder::default();
        let view = Bounds::new(0.0, 0.0, 5.0, 5.0);
        DisplayLayer::new(&dataset.layers[0], &dataset)
            .draw(&mut canvas, &Style::default(), &view)
            .unwrap();
        assert_eq!(canvas.ops, vec!["P1,2"]);

        let table = DisplayLayer::new(&dataset.layers[1], &dataset);
        assert!(!table.bounds().unwrap().has_bounds());
        assert!(table.visible_features(&view).unwrap().is_empty());
    }

    #[test]
    fn overlap_area() {
        let a = Bounds::new(0.0, 0.0, 2.0, 2.0);
        let b = Bounds::new(1.0, 1.0, 3.0, 3.0);
        assert_eq!(bounds_overlap(&a, &b), 1.0);
        assert_eq!(bounds_overlap(&a, &Bounds::new(5.0, 5.0, 6.0, 6.0)), 0.0);
    }

    #[test]
    fn reset_policy() {
        let map = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let layer = Bounds::new(1.0, 1.0, 9.0, 9.0);
        assert!(map_needs_reset(&layer, None, &map));
        assert!(!map_needs_reset(&layer, Some(&layer), &map));
        assert!(map_needs_reset(&layer, Some(&Bounds::empty()), &map));
        // Moved out of view
        let far = Bounds::new(100.0, 100.0, 101.0, 101.0);
        assert!(map_needs_reset(&far, Some(&layer), &map));
        // Similar scale, still in view
        let nearby = Bounds::new(2.0, 2.0, 8.0, 8.0);
        assert!(!map_needs_reset(&nearby, Some(&layer), &map));
        // Much smaller than the view
        let tiny = Bounds::new(1.0, 1.0, 1.5, 1.5);
        assert!(map_needs_reset(&tiny, Some(&layer), &map));
    }
}
