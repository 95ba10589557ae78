use std::collections::BTreeMap;

use super::normalizer::clean_cell;

/// One CSV data row keyed by its (trimmed) header.
pub type CsvRow = BTreeMap<String, String>;

/// Parse a CSV document with a header row into headers and keyed rows.
///
/// Short rows are padded with empty cells; cells beyond the header row are
/// dropped.
pub(crate) fn parse_table(data: &str) -> Result<(Vec<String>, Vec<CsvRow>), csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(clean_cell).collect();
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        let row: CsvRow = headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                let value = record.get(index).map(clean_cell).unwrap_or_default();
                (header.clone(), value)
            })
            .collect();
        rows.push(row);
    }

    Ok((headers, rows))
}
