// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A dataset: one shared arc collection plus the layers that reference it.

use crate::arcs::ArcCollection;
use crate::bounds::Bounds;
use crate::error::Result;
use crate::layer::Layer;
use crate::table::Value;
use crate::transform::Transform;

/// Metadata carried alongside a dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetInfo {
    /// Coordinate reference system object, passed through verbatim.
    pub crs: Option<Value>,
    /// Quantization transform of the document this dataset was imported from.
    pub input_transform: Option<Transform>,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub arcs: Option<ArcCollection>,
    pub layers: Vec<Layer>,
    pub info: DatasetInfo,
}

impl Dataset {
    pub fn new(arcs: Option<ArcCollection>, layers: Vec<Layer>) -> Self {
        Self {
            arcs,
            layers,
            info: DatasetInfo::default(),
        }
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.as_ref().map_or(0, ArcCollection::size)
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name.as_deref() == Some(name))
    }

    /// Combined bounds of every layer's geometry.
    pub fn bounds(&self) -> Result<Bounds> {
        let mut bounds = Bounds::empty();
        for layer in &self.layers {
            bounds.merge_bounds(&layer.bounds(self.arcs.as_ref())?);
        }
        Ok(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{GeometryType, Shape};
    use crate::table::DataTable;
    use nalgebra::Point2;

    #[test]
    fn lookup_and_bounds() {
        let dataset = Dataset::new(
            None,
            vec![
                Layer::table("attrs", DataTable::with_len(1)),
                Layer::new(
                    "pts",
                    GeometryType::Point,
                    vec![Some(Shape::Points(vec![
                        Point2::new(0.0, 0.0),
                        Point2::new(2.0, 3.0),
                    ]))],
                ),
            ],
        );
        assert_eq!(dataset.arc_count(), 0);
        assert!(dataset.layer("pts").is_some());
        assert!(dataset.layer("nope").is_none());
        assert_eq!(dataset.bounds().unwrap().to_array(), [0.0, 0.0, 2.0, 3.0]);
    }
}
