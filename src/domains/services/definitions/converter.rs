//! Table-driven unit converter.
//!
//! Each category has a base unit with factor 1. A value is converted by
//! scaling it to the base unit and then down to the target unit.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::instrument;

use crate::core::PortalServer;
use crate::domains::services::error::{ServiceError, ServiceResult};
use crate::domains::services::validation::query_param;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Unit {
    pub id: &'static str,
    pub name: &'static str,
    /// Size of one unit expressed in the category's base unit.
    #[serde(skip)]
    pub factor: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub id: &'static str,
    pub display_name: &'static str,
    pub units: &'static [Unit],
}

impl Category {
    pub fn unit(&self, id: &str) -> Option<&'static Unit> {
        self.units.iter().find(|unit| unit.id == id)
    }
}

const fn unit(id: &'static str, name: &'static str, factor: f64) -> Unit {
    Unit { id, name, factor }
}

const KIB: f64 = 1024.0;
const KB: f64 = 1000.0;

static CATEGORIES: &[Category] = &[
    Category {
        id: "length",
        display_name: "Length",
        units: &[
            unit("meter", "Meter (m)", 1.0),
            unit("millimeter", "Millimeter (mm)", 0.001),
            unit("centimeter", "Centimeter (cm)", 0.01),
            unit("decimeter", "Decimeter (dm)", 0.1),
            unit("kilometer", "Kilometer (km)", 1000.0),
            unit("inch", "Inch (in)", 0.0254),
            unit("foot", "Foot (ft)", 0.3048),
            unit("yard", "Yard (yd)", 0.9144),
            unit("mile", "Mile (mi)", 1609.344),
        ],
    },
    Category {
        id: "volume_metric",
        display_name: "Volume (metric)",
        units: &[
            unit("cubic_meter", "Cubic meter (m³)", 1.0),
            unit("cubic_centimeter", "Cubic centimeter (cm³)", 1e-6),
            unit("milliliter", "Milliliter (ml)", 1e-6),
            unit("liter", "Liter (l)", 1e-3),
            unit("cubic_decimeter", "Cubic decimeter (dm³)", 1e-3),
            unit("cubic_millimeter", "Cubic millimeter (mm³)", 1e-9),
        ],
    },
    Category {
        id: "data_storage_binary",
        display_name: "Data size (binary)",
        units: &[
            unit("byte", "Byte (B)", 1.0),
            unit("bit", "Bit (bit)", 1.0 / 8.0),
            unit("kibibyte", "Kibibyte (KiB)", KIB),
            unit("mebibyte", "Mebibyte (MiB)", KIB * KIB),
            unit("gibibyte", "Gibibyte (GiB)", KIB * KIB * KIB),
            unit("tebibyte", "Tebibyte (TiB)", KIB * KIB * KIB * KIB),
            unit("pebibyte", "Pebibyte (PiB)", KIB * KIB * KIB * KIB * KIB),
        ],
    },
    Category {
        id: "data_storage_decimal",
        display_name: "Data size (decimal)",
        units: &[
            unit("byte_decimal", "Byte (B, decimal)", 1.0),
            unit("kilobyte", "Kilobyte (KB)", KB),
            unit("megabyte", "Megabyte (MB)", KB * KB),
            unit("gigabyte", "Gigabyte (GB)", KB * KB * KB),
            unit("terabyte", "Terabyte (TB)", KB * KB * KB * KB),
            unit("petabyte", "Petabyte (PB)", KB * KB * KB * KB * KB),
        ],
    },
];

/// Round to six decimal places.
pub fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Outcome of a conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub original_value: f64,
    pub original_unit_id: &'static str,
    pub original_unit_name: &'static str,
    pub converted_value: f64,
    pub converted_unit_id: &'static str,
    pub converted_unit_name: &'static str,
    pub category: &'static str,
}

/// Unit converter over the built-in category tables.
#[derive(Debug, Clone, Copy)]
pub struct Converter {
    categories: &'static [Category],
}

impl Converter {
    pub fn new() -> Self {
        Self {
            categories: CATEGORIES,
        }
    }

    pub fn categories(&self) -> &'static [Category] {
        self.categories
    }

    pub fn category(&self, id: &str) -> Option<&'static Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn convert(
        &self,
        category: &str,
        from: &str,
        to: &str,
        value: f64,
    ) -> ServiceResult<Conversion> {
        let category = self
            .category(category)
            .ok_or_else(|| ServiceError::validation(format!("Unknown category: {category}.")))?;

        let (Some(from_unit), Some(to_unit)) = (category.unit(from), category.unit(to)) else {
            return Err(ServiceError::validation(format!(
                "One of the units ({from} or {to}) was not found in category {}.",
                category.id
            )));
        };

        Ok(Conversion {
            original_value: value,
            original_unit_id: from_unit.id,
            original_unit_name: from_unit.name,
            converted_value: round6(value * from_unit.factor / to_unit.factor),
            converted_unit_id: to_unit.id,
            converted_unit_name: to_unit.name,
            category: category.id,
        })
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

/// `GET /api/converter/units`
#[instrument(skip_all)]
pub async fn list_units(State(server): State<PortalServer>) -> impl IntoResponse {
    let mut names = Map::new();
    let mut units = Map::new();
    for category in server.converter().categories() {
        names.insert(category.id.to_string(), json!(category.display_name));
        units.insert(category.id.to_string(), json!(category.units));
    }

    Json(json!({
        "category_names": Value::Object(names),
        "units_by_category": Value::Object(units),
    }))
}

/// `GET /api/converter/convert`
#[instrument(skip(server))]
pub async fn convert_units(
    State(server): State<PortalServer>,
    Query(query): Query<HashMap<String, String>>,
) -> ServiceResult<impl IntoResponse> {
    let params = (
        query_param(&query, "category"),
        query_param(&query, "from_unit"),
        query_param(&query, "to_unit"),
        query_param(&query, "value"),
    );
    let (Some(category), Some(from), Some(to), Some(raw_value)) = params else {
        return Err(ServiceError::validation(
            "All parameters are required: category, from_unit, to_unit, value.",
        ));
    };

    let value = raw_value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ServiceError::validation("Parameter 'value' must be a number."))?;

    Ok(Json(server.converter().convert(category, from, to, value)?))
}
