// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for TopoJSON encoding and decoding.

use mapkit_core::GeometryType;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading or writing topology documents.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document's `type` member is something other than `"Topology"`.
    #[error("expected a TopoJSON Topology, found type {0:?}")]
    NotTopology(String),

    /// An object or geometry has no `type` member.
    #[error("{context}: missing \"type\" member")]
    MissingType { context: String },

    /// A geometry `type` string is not part of TopoJSON.
    #[error("{context}: unknown geometry type {found:?}")]
    UnknownGeometryType { context: String, found: String },

    /// A member has the wrong JSON shape.
    #[error("{context}: expected {expected}")]
    Malformed {
        context: String,
        expected: &'static str,
    },

    /// A geometry references an arc the document does not contain.
    #[error("object {object:?}: arc reference {reference} is out of range ({count} arcs)")]
    ArcOutOfRange {
        object: String,
        reference: i64,
        count: usize,
    },

    /// One object holds geometries of different classes.
    #[error("object {object:?} mixes {first} and {second} geometries")]
    MixedGeometryTypes {
        object: String,
        first: GeometryType,
        second: GeometryType,
    },

    /// A GeometryCollection contains another GeometryCollection.
    #[error("object {object:?}: nested GeometryCollection is not supported")]
    NestedCollection { object: String },

    /// A shape does not match its layer's geometry class.
    #[error("shape does not match geometry type {expected}")]
    ShapeMismatch { expected: GeometryType },

    /// Arc-based shapes were given without an arc collection.
    #[error("shape references arcs but the dataset has none")]
    MissingArcs,

    /// An error raised while encoding one layer.
    #[error("layer {layer:?}: {source}")]
    Layer {
        layer: String,
        #[source]
        source: Box<Error>,
    },

    /// An export option is outside its valid range.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error(transparent)]
    Core(#[from] mapkit_core::Error),
}

impl Error {
    pub(crate) fn malformed(context: impl Into<String>, expected: &'static str) -> Self {
        Error::Malformed {
            context: context.into(),
            expected,
        }
    }
}
