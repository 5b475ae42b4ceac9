// Delimited text (.csv / .tsv) via the csv crate.

use csv::ReaderBuilder;

use crate::error::InputError;

/// Read a delimited table into a header row and string records.
///
/// Ragged rows are accepted; missing cells read as absent.
pub fn read_table(bytes: &[u8], delimiter: u8) -> Result<(Vec<String>, Vec<Vec<String>>), InputError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| InputError::Malformed(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| InputError::Malformed(e.to_string()))?;
        records.push(record.iter().map(str::to_string).collect());
    }

    Ok((headers, records))
}
