use crate::domain::model::ResultRow;
use crate::utils::error::{EtlError, Result};
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Header of the output file.
pub const OUTPUT_HEADERS: [&str; 2] = ["zipcode", "rate"];

/// 依標題列名稱反序列化 CSV，多出的欄位會被忽略
pub fn read_records<T: DeserializeOwned>(data: &[u8], source: &str) -> Result<Vec<T>> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: T = result.map_err(|e| {
            tracing::error!("Error reading {}: {}", source, e);
            EtlError::CsvError(e)
        })?;
        records.push(record);
    }

    tracing::debug!("Parsed {} rows from {}", records.len(), source);
    Ok(records)
}

/// Header row names of a CSV document, used by dry runs.
pub fn read_headers(data: &[u8]) -> Result<Vec<String>> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(data);
    Ok(reader.headers()?.iter().map(str::to_string).collect())
}

/// Data rows of a CSV document, counted the way `read_records` would see them.
pub fn count_records(data: &[u8]) -> Result<usize> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let mut count = 0;
    for record in reader.byte_records() {
        record?;
        count += 1;
    }
    Ok(count)
}

pub fn write_results(rows: &[ResultRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(OUTPUT_HEADERS)?;

    for row in rows {
        writer.write_record([row.zipcode.as_str(), row.rate_field().as_str()])?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}
