// src/core/catalog/csv.rs
//
// Minimal reader for the catalog spreadsheets: header row, comma separated,
// no quoting. Rows shorter than the header simply lack the trailing fields.

use std::collections::HashMap;

use crate::core::error::CatalogError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvRecord {
    // 1-based data row number, for error messages
    pub row: usize,
    fields: HashMap<String, String>,
}

impl CsvRecord {
    // Returns the trimmed value, treating empty cells as absent
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .get(header)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub records: Vec<CsvRecord>,
}

pub fn parse(location: &str, text: &str) -> Result<CsvTable, CatalogError> {
    let mut lines = text
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty());

    let headers: Vec<String> = lines
        .next()
        .ok_or_else(|| CatalogError::Csv {
            location: location.to_string(),
            message: "missing header row".to_string(),
        })?
        .split(',')
        .map(|h| h.trim().to_string())
        .collect();

    let records = lines
        .enumerate()
        .map(|(i, line)| {
            let fields = headers
                .iter()
                .zip(line.split(',').map(str::trim))
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect();
            CsvRecord { row: i + 1, fields }
        })
        .collect();

    Ok(CsvTable { headers, records })
}
