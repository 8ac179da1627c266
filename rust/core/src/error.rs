// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the shared-arc data model.

use crate::arcs::ArcRef;

/// Result type alias for data model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or reading arcs, layers and tables.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An arc reference points past the end of the arc collection.
    #[error("arc reference {reference:?} is out of range (collection holds {count} arcs)")]
    ArcOutOfRange { reference: ArcRef, count: usize },

    /// A plain arc id points past the end of the arc collection.
    #[error("arc id {id} is out of range (collection holds {count} arcs)")]
    ArcIdOutOfRange { id: usize, count: usize },

    /// Simplification thresholds do not line up with the stored vertices.
    #[error("threshold array for arc {arc} has {found} values, expected {expected}")]
    ThresholdMismatch {
        arc: usize,
        expected: usize,
        found: usize,
    },

    /// Threshold arrays were supplied for a different number of arcs.
    #[error("thresholds given for {found} arcs, collection holds {expected}")]
    ThresholdArcCount { expected: usize, found: usize },

    /// Shape list and attribute table of a layer have different lengths.
    #[error("layer has {shapes} shapes but {records} attribute records")]
    TableLengthMismatch { shapes: usize, records: usize },
}
