// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use mapkit_core::{
    record_from_json, ArcCollection, ArcRef, DataTable, Dataset, GeometryType, Layer, Shape,
};
use mapkit_processing::{export_file_content, import_file_content, ExportOptions};
use serde_json::json;

/// Six squares in a 3 x 2 grid, one arc each, plus two features without
/// geometry.
fn counties() -> Dataset {
    let mut arcs: Vec<Vec<[f64; 2]>> = Vec::new();
    let mut shapes = Vec::new();
    let origin = [-88.25, 41.5];
    let size = 0.173;
    for row in 0..2 {
        for col in 0..3 {
            let x0 = origin[0] + col as f64 * size;
            let y0 = origin[1] + row as f64 * size;
            // Clockwise ring: up the west side, east along the top, down, back west
            arcs.push(vec![
                [x0, y0],
                [x0, y0 + size],
                [x0 + size, y0 + size],
                [x0 + size, y0],
                [x0, y0],
            ]);
            shapes.push(Some(Shape::Paths(vec![vec![ArcRef::Forward(arcs.len() - 1)]])));
        }
    }
    shapes.push(None);
    shapes.push(None);
    let records = (0..shapes.len())
        .map(|i| record_from_json(json!({"FID": i, "NAME": format!("County {i}"), "AREA": 0.03})))
        .collect();
    let layer = Layer::new("counties", GeometryType::Polygon, shapes)
        .with_data(DataTable::from_records(records));
    Dataset::new(Some(ArcCollection::new(&arcs)), vec![layer])
}

fn quantized(q: u32) -> ExportOptions {
    ExportOptions::from_json(&format!(r#"{{"format": "topojson", "quantization": {q}}}"#)).unwrap()
}

#[test]
fn file_round_trip_is_byte_identical() {
    let opts = quantized(10000);
    let files = export_file_content(&counties(), &opts).unwrap();
    let imported = import_file_content(&files[0].content, &opts.topojson).unwrap();
    let files2 = export_file_content(&imported, &opts).unwrap();
    assert_eq!(files[0].content, files2[0].content);
    assert_eq!(files2[0].filename, "counties.json");
}

#[test]
fn imported_coordinates_are_within_half_a_cell() {
    let opts = quantized(1000);
    let source = counties();
    let files = export_file_content(&source, &opts).unwrap();
    let imported = import_file_content(&files[0].content, &opts.topojson).unwrap();

    let original = source.arcs.as_ref().unwrap();
    let decoded = imported.arcs.as_ref().unwrap();
    assert_eq!(decoded.size(), original.size());

    let bounds = original.bounds();
    let half_cell_x = bounds.width() / 999.0 / 2.0;
    let half_cell_y = bounds.height() / 999.0 / 2.0;
    for id in 0..original.size() {
        let a = original.arc_points(ArcRef::Forward(id)).unwrap();
        let b = decoded.arc_points(ArcRef::Forward(id)).unwrap();
        assert_eq!(a.len(), b.len());
        for (p, q) in a.iter().zip(&b) {
            assert_abs_diff_eq!(p.x, q.x, epsilon = half_cell_x + 1e-12);
            assert_abs_diff_eq!(p.y, q.y, epsilon = half_cell_y + 1e-12);
        }
    }
}

#[test]
fn null_features_keep_their_records() {
    let opts = quantized(10000);
    let files = export_file_content(&counties(), &opts).unwrap();
    let imported = import_file_content(&files[0].content, &opts.topojson).unwrap();

    let layer = &imported.layers[0];
    assert_eq!(layer.feature_count(), 8);
    assert!(layer.shape(6).is_none());
    let record = layer.data.as_ref().unwrap().record(7).unwrap();
    assert_eq!(record.get("FID"), Some(&json!(7)));
    assert_eq!(record.get("NAME"), Some(&json!("County 7")));
}

#[test]
fn cut_table_output_has_ids_only() {
    let opts = ExportOptions::from_json(r#"{"cut_table": true, "no_quantization": true}"#).unwrap();
    let files = export_file_content(&counties(), &opts).unwrap();
    let value: serde_json::Value = serde_json::from_str(&files[0].content).unwrap();
    let geometries = value["objects"]["counties"]["geometries"].as_array().unwrap();
    assert_eq!(geometries.len(), 8);
    assert!(geometries.iter().all(|g| g.get("properties").is_none()));
    assert_eq!(geometries[7], json!({"type": null, "id": 7}));
}
