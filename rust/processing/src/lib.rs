// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # MapKit Processing
//!
//! File-content pipeline shared by command-line and web front ends: turns a
//! dataset into named output files and file content back into a dataset.
//!
//! ```
//! use mapkit_processing::{export_file_content, import_file_content, ExportOptions};
//!
//! let input = r#"{"type": "Topology", "arcs": [], "objects": {
//!     "cities": {"type": "Point", "coordinates": [4.9, 52.4], "id": "ams"}}}"#;
//!
//! let opts = ExportOptions::default();
//! let dataset = import_file_content(input, &opts.topojson).unwrap();
//! let files = export_file_content(&dataset, &opts).unwrap();
//!
//! assert_eq!(files[0].filename, "cities.json");
//! assert!(files[0].content.contains(r#""id":"ams""#));
//! ```

pub mod error;
pub mod options;
pub mod pipeline;

pub use error::{Error, Result};
pub use options::{ExportOptions, TOPOJSON_FORMAT};
pub use pipeline::{export_file_content, import_file_content, OutputFile};
