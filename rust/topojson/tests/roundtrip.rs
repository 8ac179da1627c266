// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export → import → export must reproduce the first export byte for byte.

use approx::assert_abs_diff_eq;
use mapkit_core::{
    record_from_json, ArcCollection, ArcRef, DataTable, Dataset, GeometryType, Layer, Point2, Shape,
};
use mapkit_topojson::{export_topology, import_topojson_str, TopoJsonOptions};
use proptest::prelude::*;
use serde_json::json;

fn to_geo(x: f64, y: f64) -> [f64; 2] {
    [-100.123 + x * 1.37, 35.2 + y * 0.91]
}

/// Two states sharing a border, a state with no geometry, the border as a
/// polyline layer and a capital as a point layer.
fn two_states() -> Dataset {
    let shared = [(5.0, 0.0), (5.2, 3.0), (4.9, 7.0), (5.0, 10.0)];
    let west = [(5.0, 10.0), (2.5, 10.3), (0.0, 10.0), (-0.4, 5.0), (0.0, 0.0), (5.0, 0.0)];
    let east = [(5.0, 0.0), (10.0, 0.0), (10.6, 4.4), (10.0, 10.0), (7.5, 10.2), (5.0, 10.0)];
    let arcs: Vec<Vec<[f64; 2]>> = [&shared[..], &west[..], &east[..]]
        .iter()
        .map(|arc| arc.iter().map(|&(x, y)| to_geo(x, y)).collect())
        .collect();

    let states = Layer::new(
        "states",
        GeometryType::Polygon,
        vec![
            Some(Shape::Paths(vec![vec![ArcRef::Reversed(0), ArcRef::Reversed(1)]])),
            Some(Shape::Paths(vec![vec![ArcRef::Forward(0), ArcRef::Reversed(2)]])),
            None,
        ],
    )
    .with_data(DataTable::from_records(vec![
        record_from_json(json!({"FID": 0, "NAME": "West", "POP": 1.25e6})),
        record_from_json(json!({"FID": 1, "NAME": "East", "POP": 830_000})),
        record_from_json(json!({"FID": 2, "NAME": "Nowhere", "POP": null})),
    ]));

    let border = Layer::new(
        "border",
        GeometryType::Polyline,
        vec![Some(Shape::Paths(vec![vec![ArcRef::Forward(0)]]))],
    );

    let [cx, cy] = to_geo(2.2, 6.1);
    let capitals = Layer::new(
        "capitals",
        GeometryType::Point,
        vec![Some(Shape::Points(vec![Point2::new(cx, cy)]))],
    )
    .with_data(DataTable::from_records(vec![record_from_json(json!({"name": "Westville"}))]));

    Dataset::new(Some(ArcCollection::new(&arcs)), vec![states, border, capitals])
}

fn round_trip(dataset: &Dataset, options: &TopoJsonOptions) -> (String, String) {
    let first = export_topology(dataset, options).unwrap().to_json().unwrap();
    let imported = import_topojson_str(&first, options).unwrap();
    let second = export_topology(&imported, options).unwrap().to_json().unwrap();
    (first, second)
}

#[test]
fn two_states_round_trip_is_byte_identical() {
    let options = TopoJsonOptions::default().with_quantization(10000);
    let (first, second) = round_trip(&two_states(), &options);
    assert_eq!(first, second);
}

#[test]
fn two_states_export_shape() {
    let options = TopoJsonOptions::default().with_quantization(10000);
    let doc = export_topology(&two_states(), &options).unwrap();
    let value = doc.to_value().unwrap();

    assert_eq!(value["arcs"].as_array().unwrap().len(), 3);
    let states = &value["objects"]["states"]["geometries"];
    assert_eq!(states[0]["type"], "Polygon");
    assert_eq!(states[0]["arcs"], json!([[-1, -2]]));
    assert_eq!(states[0]["id"], 0);
    assert_eq!(states[0]["properties"], json!({"NAME": "West", "POP": 1.25e6}));
    assert_eq!(states[1]["arcs"], json!([[0, -3]]));
    assert_eq!(states[2], json!({"type": null, "properties": {"NAME": "Nowhere", "POP": null}, "id": 2}));
    assert_eq!(value["objects"]["border"]["geometries"][0], json!({"type": "LineString", "arcs": [0]}));

    // Grid positions stay within 0..=9999
    let capital = &value["objects"]["capitals"]["geometries"][0]["coordinates"];
    for axis in 0..2 {
        let q = capital[axis].as_i64().unwrap();
        assert!((0..=9999).contains(&q));
    }
}

#[test]
fn unquantized_round_trip_keeps_coordinates() {
    let options = TopoJsonOptions {
        no_quantization: true,
        ..Default::default()
    };
    let (first, second) = round_trip(&two_states(), &options);
    assert_eq!(first, second);
    assert!(!first.contains("transform"));
}

#[test]
fn repeated_round_trips_are_stable() {
    let options = TopoJsonOptions::default().with_quantization(5000);
    let mut json = export_topology(&two_states(), &options).unwrap().to_json().unwrap();
    for _ in 0..3 {
        let dataset = import_topojson_str(&json, &options).unwrap();
        let next = export_topology(&dataset, &options).unwrap().to_json().unwrap();
        assert_eq!(next, json);
        json = next;
    }
}

fn polyline_dataset(arcs: &[Vec<[f64; 2]>]) -> Dataset {
    let shapes = (0..arcs.len())
        .map(|i| Some(Shape::Paths(vec![vec![ArcRef::Forward(i)]])))
        .collect();
    Dataset::new(
        Some(ArcCollection::new(arcs)),
        vec![Layer::new("lines", GeometryType::Polyline, shapes)],
    )
}

#[test]
fn collapsed_arc_on_the_edge_of_the_extent_round_trips() {
    let dataset = polyline_dataset(&[
        vec![[0.0, 0.0], [0.0001, 0.0]],
        vec![[1.0, 1.0], [1.0, 10.0], [10.0, 10.0], [10.0, 1.0]],
    ]);
    let options = TopoJsonOptions::default().with_quantization(11);
    let (first, second) = round_trip(&dataset, &options);
    assert_eq!(first, second);
    assert!(first.contains(r#""arcs":[[[0,0],[0,10],[10,0],[0,-10]]]"#));
}

#[test]
fn default_precision_keeps_parallel_lines_apart() {
    let dataset = polyline_dataset(&[
        vec![[0.0, 0.0], [10.0, 0.0]],
        vec![[0.0, 0.4], [10.0, 0.4]],
    ]);
    let options = TopoJsonOptions::default();
    let json = export_topology(&dataset, &options).unwrap().to_json().unwrap();
    let imported = import_topojson_str(&json, &options).unwrap();

    let arcs = imported.arcs.as_ref().unwrap();
    assert_eq!(arcs.size(), 2);
    for (id, y) in [(0, 0.0), (1, 0.4)] {
        for p in arcs.arc_points(ArcRef::Forward(id)).unwrap() {
            assert_abs_diff_eq!(p.y, y, epsilon = 0.1);
        }
    }
}

/// Polylines with integer vertices where consecutive vertices differ.
fn polylines() -> impl Strategy<Value = Vec<Vec<(i32, i32)>>> {
    let vertex = (0..100i32, 0..100i32);
    let arc = proptest::collection::vec(vertex, 2..6).prop_filter("consecutive duplicates", |arc| {
        arc.windows(2).all(|w| w[0] != w[1])
    });
    proptest::collection::vec(arc, 1..8)
}

/// Short arcs far below the grid resolution, placed anywhere around the
/// polylines so that some of them set an edge of the extent.
fn specks() -> impl Strategy<Value = Vec<(i32, i32)>> {
    proptest::collection::vec((-20..120i32, -20..120i32), 0..4)
}

fn scaled(x: i32, y: i32) -> [f64; 2] {
    [f64::from(x) * 0.37, f64::from(y) * 0.11]
}

proptest! {
    #[test]
    fn quantized_polylines_round_trip(
        lines in polylines(),
        specks in specks(),
        q in 1000u32..=10000,
    ) {
        // The diagonal keeps both axes wide, so specks never define a whole axis
        let mut arcs: Vec<Vec<[f64; 2]>> = vec![vec![scaled(0, 0), scaled(99, 99)]];
        arcs.extend(
            lines
                .iter()
                .map(|arc| arc.iter().map(|&(x, y)| scaled(x, y)).collect::<Vec<_>>()),
        );
        for &(x, y) in &specks {
            let [x, y] = scaled(x, y);
            arcs.push(vec![[x, y], [x + 1e-7, y - 1e-7]]);
        }

        let options = TopoJsonOptions::default().with_quantization(q);
        let (first, second) = round_trip(&polyline_dataset(&arcs), &options);
        prop_assert_eq!(first, second);
    }
}
