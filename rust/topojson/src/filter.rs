// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Removal of collapsed arcs.
//!
//! After quantization some arcs shrink to a single grid position. Paths drop
//! their references to such arcs, and the arcs themselves are left out of the
//! exported `arcs` array with the remaining arcs renumbered.

use mapkit_core::{ArcCollection, ArcRef, Path};

use crate::error::Result;

/// Drops references to degenerate arcs from every path of a shape.
///
/// Order and direction of the surviving references are kept. Paths left
/// empty are dropped; `None` means no path survived.
pub fn filter_empty_arcs(paths: &[Path], arcs: &ArcCollection) -> Result<Option<Vec<Path>>> {
    let mut filtered = Vec::with_capacity(paths.len());
    for path in paths {
        let mut kept = Vec::with_capacity(path.len());
        for &reference in path {
            arcs.check_ref(reference)?;
            if !arcs.arc_is_degenerate(reference.arc_id())? {
                kept.push(reference);
            }
        }
        if !kept.is_empty() {
            filtered.push(kept);
        }
    }
    Ok(if filtered.is_empty() { None } else { Some(filtered) })
}

/// Old-to-new arc ids after degenerate arcs are removed.
#[derive(Debug, Clone)]
pub struct ArcIndexMap {
    // New id of each old arc; `None` for removed arcs
    ids: Vec<Option<usize>>,
    kept: usize,
}

impl ArcIndexMap {
    /// Keeps every non-degenerate arc of `arcs`.
    pub fn new(arcs: &ArcCollection) -> Result<Self> {
        let mut ids = Vec::with_capacity(arcs.size());
        let mut kept = 0;
        for id in 0..arcs.size() {
            if arcs.arc_is_degenerate(id)? {
                ids.push(None);
            } else {
                ids.push(Some(kept));
                kept += 1;
            }
        }
        Ok(Self { ids, kept })
    }

    /// Number of arcs that survive.
    pub fn kept(&self) -> usize {
        self.kept
    }

    pub fn is_identity(&self) -> bool {
        self.kept == self.ids.len()
    }

    /// New reference for `reference`, or `None` when its arc was removed.
    pub fn map_ref(&self, reference: ArcRef) -> Option<ArcRef> {
        let id = (*self.ids.get(reference.arc_id())?)?;
        Some(reference.with_arc_id(id))
    }

    /// Renumbers filtered paths; references to removed arcs are skipped.
    pub fn renumber_paths(&self, paths: &[Path]) -> Vec<Path> {
        paths
            .iter()
            .map(|path| path.iter().filter_map(|&r| self.map_ref(r)).collect())
            .collect()
    }

    /// Keeps the entries of `items` whose arc survived, in order.
    pub fn compact<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .zip(&self.ids)
            .filter(|(_, id)| id.is_some())
            .map(|(item, _)| item.clone())
            .collect()
    }
}
