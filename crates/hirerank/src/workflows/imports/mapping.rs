use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use super::normalizer::normalize_key;
use super::ImportError;

pub const REQUIRED_FIELDS: [&str; 2] = ["name", "email"];
pub const SUPPORTED_FIELDS: [&str; 8] = [
    "name",
    "email",
    "github_url",
    "resume_url",
    "skills",
    "status",
    "experience_years",
    "required_experience_years",
];

/// Candidate field -> CSV column.
pub type FieldMapping = BTreeMap<String, String>;

/// Parse a JSON object payload into a field mapping. An empty payload is an
/// empty mapping.
pub fn parse_mapping(payload: &str) -> Result<FieldMapping, ImportError> {
    if payload.trim().is_empty() {
        return Ok(FieldMapping::new());
    }
    let value: Value = serde_json::from_str(payload)
        .map_err(|err| ImportError::InvalidMapping(format!("Mapping payload is not valid JSON: {err}")))?;
    mapping_from_value(&value)
}

pub fn mapping_from_value(value: &Value) -> Result<FieldMapping, ImportError> {
    let object = value.as_object().ok_or_else(|| {
        ImportError::InvalidMapping("Mapping payload must be a JSON object.".to_string())
    })?;

    Ok(object
        .iter()
        .filter(|(_, column)| !column.is_null())
        .map(|(field, column)| {
            let column = match column {
                Value::String(text) => text.trim().to_string(),
                other => other.to_string(),
            };
            (normalize_key(field), column)
        })
        .collect())
}

/// Check a mapping against the CSV headers, resolving each column to the
/// header's exact spelling.
pub fn validate_mapping(
    mapping: &FieldMapping,
    headers: &[String],
) -> Result<FieldMapping, ImportError> {
    if let Some(field) = mapping
        .keys()
        .find(|field| !SUPPORTED_FIELDS.contains(&field.as_str()))
    {
        return Err(ImportError::InvalidMapping(format!(
            "Unsupported mapping field: {field}"
        )));
    }
    if let Some(field) = REQUIRED_FIELDS
        .iter()
        .find(|field| !mapping.contains_key(**field))
    {
        return Err(ImportError::InvalidMapping(format!(
            "Missing required mapping for field: {field}"
        )));
    }

    let header_lookup: HashMap<String, &String> = headers
        .iter()
        .map(|header| (normalize_key(header), header))
        .collect();

    mapping
        .iter()
        .map(|(field, column)| {
            header_lookup
                .get(&normalize_key(column))
                .map(|header| (field.clone(), (*header).clone()))
                .ok_or_else(|| {
                    ImportError::InvalidMapping(format!(
                        "CSV column not found for field '{field}': {column}"
                    ))
                })
        })
        .collect()
}
