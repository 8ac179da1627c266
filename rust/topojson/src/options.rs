// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Codec options.
//!
//! Options arrive as a loosely shaped JSON object (`{"quantization": 10000}`)
//! and are resolved once, at the start of an export, into a
//! [`QuantizationPolicy`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Precision used when no quantization option is given, as a fraction of the
/// average segment extent.
pub const DEFAULT_TOPOJSON_PRECISION: f64 = 0.02;

/// Field that supplies feature ids when no `id_field` option matches.
pub const DEFAULT_ID_FIELD: &str = "FID";

/// One or more candidate names for the feature id field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdField {
    Single(String),
    List(Vec<String>),
}

impl IdField {
    /// Candidate names in priority order.
    pub fn candidates(&self) -> &[String] {
        match self {
            IdField::Single(name) => std::slice::from_ref(name),
            IdField::List(names) => names,
        }
    }

    pub fn first(&self) -> Option<&str> {
        self.candidates().first().map(String::as_str)
    }
}

impl From<&str> for IdField {
    fn from(name: &str) -> Self {
        IdField::Single(name.to_string())
    }
}

impl From<Vec<&str>> for IdField {
    fn from(names: Vec<&str>) -> Self {
        IdField::List(names.into_iter().map(str::to_string).collect())
    }
}

/// Options shared by the exporter and the importer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopoJsonOptions {
    /// Target grid size per axis (`Q` cells span `0..=Q-1`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantization: Option<u32>,
    /// Absolute grid cell size in coordinate units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<f64>,
    /// Grid cell size as a fraction of the average segment extent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topojson_precision: Option<f64>,
    /// Write raw coordinates without a transform.
    pub no_quantization: bool,
    /// Candidate field(s) for geometry ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_field: Option<IdField>,
    /// Drop `properties`, keeping only ids.
    pub cut_table: bool,
}

/// How the integer grid is sized, in priority order of the options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuantizationPolicy {
    /// Fixed number of grid positions per axis.
    Grid(u32),
    /// Fixed cell size in coordinate units.
    Precision(f64),
    /// Cell size as a fraction of the average segment extent per axis.
    RelativePrecision(f64),
}

impl TopoJsonOptions {
    /// Parses options from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_quantization(mut self, quantization: u32) -> Self {
        self.quantization = Some(quantization);
        self
    }

    pub fn with_id_field(mut self, id_field: impl Into<IdField>) -> Self {
        self.id_field = Some(id_field.into());
        self
    }

    /// Resolves the quantization options; `None` means raw coordinates.
    pub fn quantization_policy(&self) -> Result<Option<QuantizationPolicy>> {
        if self.no_quantization {
            return Ok(None);
        }
        if let Some(q) = self.quantization {
            if q < 2 {
                return Err(Error::InvalidOption(format!(
                    "quantization must be at least 2, got {q}"
                )));
            }
            return Ok(Some(QuantizationPolicy::Grid(q)));
        }
        if let Some(p) = self.precision {
            return Ok(Some(QuantizationPolicy::Precision(positive("precision", p)?)));
        }
        let relative = match self.topojson_precision {
            Some(p) => positive("topojson_precision", p)?,
            None => DEFAULT_TOPOJSON_PRECISION,
        };
        Ok(Some(QuantizationPolicy::RelativePrecision(relative)))
    }

    /// Field name the importer writes geometry ids into.
    pub fn import_id_field(&self) -> &str {
        self.id_field
            .as_ref()
            .and_then(IdField::first)
            .unwrap_or(DEFAULT_ID_FIELD)
    }
}

fn positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidOption(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}
