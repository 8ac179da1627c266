// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export options for the file-content pipeline.

use mapkit_topojson::TopoJsonOptions;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Output format name accepted by [`ExportOptions::format`].
pub const TOPOJSON_FORMAT: &str = "topojson";

/// Options for [`crate::export_file_content`].
///
/// Codec options sit at the same level as the pipeline options:
///
/// ```
/// use mapkit_processing::ExportOptions;
///
/// let opts = ExportOptions::from_json(r#"{"format": "topojson", "quantization": 10000}"#).unwrap();
/// assert_eq!(opts.topojson.quantization, Some(10000));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Output format; only `"topojson"` is supported.
    pub format: String,

    /// Output file name. Defaults to the first layer's name plus `.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,

    /// Indent the JSON output.
    pub pretty: bool,

    #[serde(flatten)]
    pub topojson: TopoJsonOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: TOPOJSON_FORMAT.to_string(),
            output_name: None,
            pretty: false,
            topojson: TopoJsonOptions::default(),
        }
    }
}

impl ExportOptions {
    /// Parses options from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_topojson(mut self, topojson: TopoJsonOptions) -> Self {
        self.topojson = topojson;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.format.eq_ignore_ascii_case(TOPOJSON_FORMAT) {
            Ok(())
        } else {
            Err(Error::UnsupportedFormat(self.format.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapkit_topojson::IdField;

    #[test]
    fn defaults() {
        let opts = ExportOptions::from_json("{}").unwrap();
        assert_eq!(opts, ExportOptions::default());
        assert_eq!(opts.format, "topojson");
        assert!(!opts.pretty);
    }

    #[test]
    fn flattened_codec_options() {
        let opts = ExportOptions::from_json(
            r#"{"format": "TopoJSON", "output_name": "out.json", "pretty": true, "id_field": "GEOID", "cut_table": true}"#,
        )
        .unwrap();
        assert_eq!(opts.output_name.as_deref(), Some("out.json"));
        assert!(opts.pretty);
        assert_eq!(opts.topojson.id_field, Some(IdField::Single("GEOID".into())));
        assert!(opts.topojson.cut_table);
    }

    #[test]
    fn unsupported_format() {
        let err = ExportOptions::from_json(r#"{"format": "shapefile"}"#).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ref f) if f == "shapefile"));
        assert!(matches!(
            ExportOptions::from_json(r#"{"pretty": "yes"}"#),
            Err(Error::Options(_))
        ));
    }
}
