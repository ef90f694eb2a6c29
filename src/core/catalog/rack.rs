// src/core/catalog/rack.rs

use std::collections::BTreeMap;

use super::csv::CsvRecord;
use crate::core::error::CatalogError;

#[derive(Debug, Clone, PartialEq)]
pub struct RackDefinition {
    pub name: String,
    // Flat bonus added to the global bonus percentage while the rack is placed
    pub bonus_percent: Option<f64>,
    pub set_name: Option<String>,
}

impl RackDefinition {
    pub fn from_record(location: &str, record: &CsvRecord) -> Result<Self, CatalogError> {
        let invalid = |field: &str, value: &str| CatalogError::InvalidField {
            location: location.to_string(),
            row: record.row,
            field: field.to_string(),
            value: value.to_string(),
        };

        let name = record
            .get("name")
            .ok_or_else(|| invalid("name", ""))?
            .to_string();
        let bonus_percent = record
            .get("bonus_power")
            .map(|v| {
                v.parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| invalid("bonus_power", v))
            })
            .transpose()?;

        Ok(RackDefinition {
            name,
            bonus_percent,
            set_name: record.get("set_name").map(str::to_string),
        })
    }
}

// A row of Sets.csv; the columns aren't interpreted yet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SetDefinition {
    pub name: String,
    pub fields: BTreeMap<String, String>,
}

impl SetDefinition {
    pub fn from_record(location: &str, record: &CsvRecord) -> Result<Self, CatalogError> {
        let name = record
            .get("set_name")
            .ok_or_else(|| CatalogError::InvalidField {
                location: location.to_string(),
                row: record.row,
                field: "set_name".to_string(),
                value: String::new(),
            })?
            .to_string();
        let fields = record
            .iter()
            .filter(|(k, _)| *k != "set_name")
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Ok(SetDefinition { name, fields })
    }
}
