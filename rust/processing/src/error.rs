// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid options: {0}")]
    Options(#[from] serde_json::Error),

    #[error("TopoJSON error: {0}")]
    TopoJson(#[from] mapkit_topojson::Error),
}
