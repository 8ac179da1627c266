// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attribute records to TopoJSON `properties` and `id`.

use mapkit_core::{DataTable, Record};

use crate::document::GeometryObject;
use crate::options::{TopoJsonOptions, DEFAULT_ID_FIELD};

/// Field chosen to supply geometry ids.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IdSource<'a> {
    name: &'a str,
    /// The field was picked by the `FID` fallback and leaves the properties.
    implicit: bool,
}

/// Picks the id field once per table: the first `id_field` candidate present
/// in the table, else `FID` if present.
fn find_id_field<'a>(table: &DataTable, options: &'a TopoJsonOptions) -> Option<IdSource<'a>> {
    let fields = table.fields();
    let has = |name: &str| fields.iter().any(|f| f == name);
    if let Some(id_field) = &options.id_field {
        if let Some(name) = id_field.candidates().iter().find(|n| has(n.as_str())) {
            return Some(IdSource {
                name: name.as_str(),
                implicit: false,
            });
        }
    }
    has(DEFAULT_ID_FIELD).then_some(IdSource {
        name: DEFAULT_ID_FIELD,
        implicit: true,
    })
}

/// Attaches properties and ids from `table` to `geometries`, index for index.
///
/// Records are copied; the table is left untouched.
pub fn export_properties(
    geometries: Vec<GeometryObject>,
    table: Option<&DataTable>,
    options: &TopoJsonOptions,
) -> Vec<GeometryObject> {
    let Some(table) = table else {
        return geometries;
    };
    let id_source = find_id_field(table, options);
    geometries
        .into_iter()
        .enumerate()
        .map(|(i, mut geom)| {
            let Some(record) = table.record(i) else {
                return geom;
            };
            if let Some(source) = &id_source {
                if let Some(id) = record.get(source.name).filter(|v| !v.is_null()) {
                    geom.id = Some(id.clone());
                }
            }
            if !options.cut_table {
                let properties: Record = record
                    .iter()
                    .filter(|(k, _)| {
                        !matches!(&id_source, Some(s) if s.implicit && s.name == k.as_str())
                    })
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                if !properties.is_empty() {
                    geom.properties = Some(properties);
                }
            }
            geom
        })
        .collect()
}
