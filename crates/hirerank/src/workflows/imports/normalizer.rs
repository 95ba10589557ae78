use crate::workflows::dashboard::ApplicationStatus;

/// Trim a header or cell, dropping a leading byte-order mark.
pub(crate) fn clean_cell(value: &str) -> String {
    value.trim_start_matches('\u{feff}').trim().to_string()
}

pub(crate) fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Split a skills cell on commas or semicolons, discarding empty entries.
pub(crate) fn parse_skills(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split([',', ';'])
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lenient year count; anything unparseable counts as zero.
pub(crate) fn parse_years(value: Option<&str>) -> f64 {
    value
        .map(str::trim)
        .and_then(|text| text.parse::<f64>().ok())
        .filter(|years| years.is_finite())
        .unwrap_or(0.0)
}

/// Unknown or blank statuses import as `new`.
pub(crate) fn parse_status(value: Option<&str>) -> ApplicationStatus {
    value
        .and_then(ApplicationStatus::parse)
        .unwrap_or_default()
}

