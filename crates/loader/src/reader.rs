use crate::error::LoaderError;
use core_types::{RawTable, TextEncoding};
use csv::{ByteRecord, ReaderBuilder, Trim};
use std::path::Path;
use tracing::{debug, info, warn};

/// How a single source file should be read.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub encoding: TextEncoding,
    /// Drop malformed rows instead of failing.
    pub skip_malformed_rows: bool,
    /// CSV delimiter character.
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::Utf8,
            skip_malformed_rows: true,
            delimiter: b',',
        }
    }
}

impl LoadOptions {
    pub fn new(encoding: TextEncoding, skip_malformed_rows: bool) -> Self {
        Self {
            encoding,
            skip_malformed_rows,
            ..Self::default()
        }
    }
}

/// Loads a delimited file into a `RawTable`.
///
/// The first record is the header. A data row is malformed when its width
/// differs from the header's (checked by `RawTable::push_row`) or when one of
/// its fields cannot be decoded.
pub fn load_table(path: impl AsRef<Path>, options: &LoadOptions) -> Result<RawTable, LoaderError> {
    let path = path.as_ref();
    let file_name = path.display().to_string();
    info!("Loading data from: {}", file_name);

    if !path.is_file() {
        return Err(LoaderError::FileNotFound(file_name));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(options.delimiter)
        .from_path(path)?;

    let mut record = ByteRecord::new();
    if !reader.read_byte_record(&mut record)? {
        return Err(LoaderError::EmptyFile(file_name));
    }
    let headers = decode_header(&record, options.encoding)
        .ok_or_else(|| LoaderError::EmptyFile(file_name.clone()))?;
    let mut table = RawTable::new(headers);

    let mut skipped = 0usize;
    loop {
        let (line, outcome) = match reader.read_byte_record(&mut record) {
            Ok(false) => break,
            Ok(true) => (
                record.position().map_or(0, |p| p.line()),
                decode_row(&record, options.encoding)
                    .and_then(|row| table.push_row(row).map_err(|e| e.to_string())),
            ),
            Err(e) if e.is_io_error() => return Err(LoaderError::Csv(e)),
            Err(e) => (e.position().map_or(0, |p| p.line()), Err(e.to_string())),
        };

        if let Err(reason) = outcome {
            if !options.skip_malformed_rows {
                return Err(LoaderError::MalformedRow { line, reason });
            }
            debug!("Skipping line {}: {}", line, reason);
            skipped += 1;
        }
    }

    if skipped > 0 {
        warn!("Skipped {} malformed rows in {}", skipped, file_name);
    }
    if table.is_empty() {
        return Err(LoaderError::NoValidRows(file_name));
    }

    info!(
        "Loaded {} rows with columns {:?} from {}",
        table.len(),
        table.headers,
        file_name
    );
    Ok(table)
}

fn decode_header(record: &ByteRecord, encoding: TextEncoding) -> Option<Vec<String>> {
    let mut headers = Vec::with_capacity(record.len());
    for (i, field) in record.iter().enumerate() {
        let mut name = encoding.decode(field)?;
        if i == 0 {
            name = name.trim_start_matches('\u{feff}').to_string();
        }
        headers.push(name);
    }
    if headers.iter().all(|h| h.is_empty()) {
        return None;
    }
    Some(headers)
}

fn decode_row(record: &ByteRecord, encoding: TextEncoding) -> Result<Vec<String>, String> {
    record
        .iter()
        .enumerate()
        .map(|(i, field)| {
            encoding
                .decode(field)
                .ok_or_else(|| format!("field {} is not valid {:?}", i + 1, encoding))
        })
        .collect()
}
