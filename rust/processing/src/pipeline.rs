// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dataset ⇄ file content.

use mapkit_core::Dataset;
use mapkit_topojson::{export_topology, import_topojson_str, TopoJsonOptions};
use serde::Serialize;

use crate::error::Result;
use crate::options::ExportOptions;

const DEFAULT_OUTPUT_NAME: &str = "output";
const OUTPUT_EXTENSION: &str = "json";

/// One generated output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFile {
    pub filename: String,
    pub content: String,
}

/// Serializes a dataset into output files.
pub fn export_file_content(dataset: &Dataset, options: &ExportOptions) -> Result<Vec<OutputFile>> {
    let start = std::time::Instant::now();
    options.validate()?;

    let doc = export_topology(dataset, &options.topojson)?;
    let content = if options.pretty {
        doc.to_json_pretty()?
    } else {
        doc.to_json()?
    };
    let filename = output_filename(dataset, options);

    tracing::info!(
        filename = %filename,
        size = content.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Exported file content"
    );
    Ok(vec![OutputFile { filename, content }])
}

/// Parses file content into a dataset. Only TopoJSON Topology documents are
/// accepted.
pub fn import_file_content(content: &str, options: &TopoJsonOptions) -> Result<Dataset> {
    let start = std::time::Instant::now();
    tracing::info!(content_size = content.len(), "Importing file content");
    let dataset = import_topojson_str(content, options)?;
    tracing::info!(
        layers = dataset.layers.len(),
        arcs = dataset.arc_count(),
        elapsed_ms = start.elapsed().as_millis(),
        "Imported file content"
    );
    Ok(dataset)
}

fn output_filename(dataset: &Dataset, options: &ExportOptions) -> String {
    if let Some(name) = options.output_name.as_deref().filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    let base = dataset
        .layers
        .first()
        .and_then(|l| l.name.as_deref())
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_OUTPUT_NAME);
    format!("{base}.{OUTPUT_EXTENSION}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use mapkit_core::{DataTable, Layer};

    fn table_dataset(name: Option<&str>) -> Dataset {
        let mut layer = Layer::table("t", DataTable::with_len(1));
        layer.name = name.map(str::to_string);
        Dataset::new(None, vec![layer])
    }

    #[test]
    fn filename_from_layer_or_option() {
        let files = export_file_content(&table_dataset(Some("counties")), &ExportOptions::default())
            .unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, "counties.json");

        let files = export_file_content(&table_dataset(None), &ExportOptions::default()).unwrap();
        assert_eq!(files[0].filename, "output.json");

        let opts = ExportOptions {
            output_name: Some("topo.json".into()),
            ..Default::default()
        };
        let files = export_file_content(&table_dataset(Some("a")), &opts).unwrap();
        assert_eq!(files[0].filename, "topo.json");
    }

    #[test]
    fn pretty_output() {
        let opts = ExportOptions {
            pretty: true,
            ..Default::default()
        };
        let files = export_file_content(&table_dataset(Some("a")), &opts).unwrap();
        assert!(files[0].content.starts_with("{\n  \"type\": \"Topology\""));
    }

    #[test]
    fn rejects_other_formats() {
        let opts = ExportOptions {
            format: "geojson".into(),
            ..Default::default()
        };
        assert!(matches!(
            export_file_content(&table_dataset(Some("a")), &opts),
            Err(Error::UnsupportedFormat(_))
        ));
        let err = import_file_content(r#"{"type": "FeatureCollection", "features": []}"#, &TopoJsonOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TopoJson(mapkit_topojson::Error::NotTopology(_))
        ));
    }
}
