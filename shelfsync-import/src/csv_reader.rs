//! CSV batch reader.
//!
//! Reads one inbox file into validated rows. Header problems reject the whole
//! file; problems with individual rows are collected as [`RowError`]s so the
//! rest of the batch can still be applied.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use shelfsync_catalog::types::{RowError, RowErrorKind};
use thiserror::Error;

/// Columns every batch must have.
pub const REQUIRED_COLUMNS: [&str; 3] = ["category", "sku", "name"];

/// Columns a batch may have.
pub const OPTIONAL_COLUMNS: [&str; 4] = ["category_slug", "price", "in_stock", "product_slug"];

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// A validated CSV row.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    /// 1-based line in the source file.
    pub line: u64,
    pub category: String,
    pub category_slug: Option<String>,
    pub sku: String,
    pub name: String,
    pub price: Option<f64>,
    pub in_stock: bool,
    pub product_slug: Option<String>,
}

/// A non-fatal oddity in an otherwise usable row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowWarning {
    pub line: u64,
    pub message: String,
}

/// Parsed contents of one batch file.
#[derive(Debug, Default)]
pub struct Batch {
    /// Usable rows in file order.
    pub rows: Vec<BatchRow>,
    pub errors: Vec<RowError>,
    pub warnings: Vec<RowWarning>,
    /// Non-blank data records seen, usable or not.
    pub total_rows: u64,
}

/// Read and validate a batch file.
pub fn read_batch(path: &Path) -> Result<Batch, CsvError> {
    read_batch_from(File::open(path)?)
}

/// Read and validate a batch from any byte source.
pub fn read_batch_from<R: Read>(source: R) -> Result<Batch, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let columns = ColumnMap::from_headers(reader.headers()?)?;
    let mut batch = Batch::default();
    let mut seen_skus = HashSet::new();

    for (index, result) in reader.records().enumerate() {
        // Header is line 1; used only when the reader has no position.
        let fallback_line = index as u64 + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                let line = e.position().map_or(fallback_line, |p| p.line());
                log::warn!("Skipping malformed CSV record at line {line}: {e}");
                batch.total_rows += 1;
                batch.errors.push(RowError {
                    line,
                    sku: None,
                    kind: RowErrorKind::Malformed(e.to_string()),
                });
                continue;
            }
        };

        if record.iter().all(str::is_empty) {
            continue;
        }
        batch.total_rows += 1;
        let line = record.position().map_or(fallback_line, |p| p.line());

        match parse_row(&columns, &record, line, &mut batch.warnings) {
            Ok(row) => {
                if seen_skus.insert(row.sku.clone()) {
                    batch.rows.push(row);
                } else {
                    batch.errors.push(RowError {
                        line,
                        sku: Some(row.sku),
                        kind: RowErrorKind::DuplicateSku,
                    });
                }
            }
            Err(error) => batch.errors.push(error),
        }
    }

    Ok(batch)
}

/// Header name to column index, after trimming and lowercasing.
struct ColumnMap {
    indices: HashMap<String, usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, CsvError> {
        let mut indices = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            let key = header.trim_start_matches('\u{feff}').trim().to_lowercase();
            indices.entry(key).or_insert(i);
        }

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| !indices.contains_key(**c))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(CsvError::MissingColumns(missing));
        }

        Ok(Self { indices })
    }

    /// Trimmed cell value, `None` when the column is absent or the cell empty.
    fn get<'r>(&self, record: &'r csv::StringRecord, column: &str) -> Option<&'r str> {
        let index = *self.indices.get(column)?;
        record.get(index).map(str::trim).filter(|v| !v.is_empty())
    }
}

fn parse_row(
    columns: &ColumnMap,
    record: &csv::StringRecord,
    line: u64,
    warnings: &mut Vec<RowWarning>,
) -> Result<BatchRow, RowError> {
    let sku = columns.get(record, "sku").map(str::to_string);
    let required = |field: &'static str| {
        columns.get(record, field).ok_or_else(|| RowError {
            line,
            sku: sku.clone(),
            kind: RowErrorKind::MissingField(field),
        })
    };

    let category = required("category")?.to_string();
    let sku = required("sku")?.to_string();
    let name = required("name")?.to_string();

    let mut warn = |message: String| {
        log::warn!("Line {line}: {message}");
        warnings.push(RowWarning { line, message });
    };

    let price = match columns.get(record, "price").map(parse_price) {
        None => None,
        Some(Ok(price)) => Some(price),
        Some(Err(raw)) => {
            warn(format!("ignoring invalid price {raw:?} for {sku}"));
            None
        }
    };

    let in_stock = match columns.get(record, "in_stock") {
        None => true,
        Some(raw) => parse_in_stock(raw).unwrap_or_else(|| {
            warn(format!("unrecognized in_stock value {raw:?} for {sku}, treating as false"));
            false
        }),
    };

    Ok(BatchRow {
        line,
        category,
        category_slug: columns.get(record, "category_slug").map(str::to_string),
        sku,
        name,
        price,
        in_stock,
        product_slug: columns.get(record, "product_slug").map(str::to_string),
    })
}

/// Parse a non-negative price. Accepts `,` as the decimal separator and
/// ignores spaces used as thousands separators.
pub fn parse_price(raw: &str) -> Result<f64, String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    match cleaned.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(raw.to_string()),
    }
}

/// Parse a stock flag. Returns `None` for values that are not recognizably
/// true or false.
pub fn parse_in_stock(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "да" => Some(true),
        "false" | "0" | "no" | "n" | "нет" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_formats() {
        assert_eq!(parse_price("59990"), Ok(59990.0));
        assert_eq!(parse_price("59 990,50"), Ok(59990.5));
        assert_eq!(parse_price("12.5"), Ok(12.5));
        assert!(parse_price("-1").is_err());
        assert!(parse_price("abc").is_err());
        assert!(parse_price("inf").is_err());
    }

    #[test]
    fn stock_flags() {
        assert_eq!(parse_in_stock("TRUE"), Some(true));
        assert_eq!(parse_in_stock("Да"), Some(true));
        assert_eq!(parse_in_stock("0"), Some(false));
        assert_eq!(parse_in_stock("нет"), Some(false));
        assert_eq!(parse_in_stock("maybe"), None);
    }
}
