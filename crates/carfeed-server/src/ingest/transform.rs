//! CSV to canonical record transformation
//!
//! Parses an uploaded file against its provider layout and maps every row to
//! a [`CanonicalRecord`]. Validation is structural and happens up front:
//! a file with zero data rows, or whose first row lacks a required column,
//! produces no records at all. Column presence is checked once against the
//! first row (the header when the layout declares one); individual rows may
//! still be short, and any field missing or empty in a row maps to null.

use csv::StringRecord;
use thiserror::Error;

use super::models::CanonicalRecord;
use crate::layouts::ProviderLayout;

/// Source column names for each canonical field.
const COL_UUID: &str = "uuid";
const COL_VIN: &str = "vin";
const COL_MAKE: &str = "make";
const COL_MODEL: &str = "model";
const COL_MILEAGE: &str = "mileage";
const COL_YEAR: &str = "year";
const COL_PRICE: &str = "price";
const COL_ZIP_CODE: &str = "zipCode";
const COL_CREATE_DATE: &str = "createDate";
const COL_UPDATE_DATE: &str = "updateDate";

/// Validation failures that abort a parse before any record is produced
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("File contained no data rows")]
    EmptyInput,

    #[error("Missing required columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Parse raw CSV bytes into the full, ordered record sequence.
///
/// When the layout declares a header, the first row names the columns and
/// every required column must appear in it by exact, case-sensitive match.
/// Headerless layouts address fields positionally in the layout's declared
/// column order. Numeric-looking fields are passed through as raw text.
pub fn parse(bytes: &[u8], layout: &ProviderLayout) -> Result<Vec<CanonicalRecord>, TransformError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(layout.has_header)
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = if layout.has_header {
        reader.headers()?.iter().map(str::to_string).collect()
    } else {
        layout.columns.clone()
    };

    let rows = reader
        .records()
        .collect::<Result<Vec<StringRecord>, _>>()?;
    if rows.is_empty() {
        return Err(TransformError::EmptyInput);
    }

    let missing = missing_columns(layout, &columns, &rows[0]);
    if !missing.is_empty() {
        return Err(TransformError::MissingColumns { columns: missing });
    }

    let index = FieldIndex::new(&columns);
    Ok(rows.iter().map(|row| index.to_record(row)).collect())
}

/// Required columns absent from the first parsed row.
fn missing_columns(
    layout: &ProviderLayout,
    columns: &[String],
    first_row: &StringRecord,
) -> Vec<String> {
    if layout.has_header {
        layout
            .columns
            .iter()
            .filter(|required| !columns.iter().any(|col| col == *required))
            .cloned()
            .collect()
    } else {
        // Positional layout: the first row must carry a field for every
        // declared column.
        layout
            .columns
            .iter()
            .enumerate()
            .filter(|(position, _)| *position >= first_row.len())
            .map(|(_, name)| name.clone())
            .collect()
    }
}

/// Pre-resolved column positions for the canonical fields
struct FieldIndex {
    uuid: Option<usize>,
    vin: Option<usize>,
    make: Option<usize>,
    model: Option<usize>,
    mileage: Option<usize>,
    year: Option<usize>,
    price: Option<usize>,
    zip_code: Option<usize>,
    create_date: Option<usize>,
    update_date: Option<usize>,
}

impl FieldIndex {
    fn new(columns: &[String]) -> Self {
        let position = |name: &str| columns.iter().position(|col| col == name);
        Self {
            uuid: position(COL_UUID),
            vin: position(COL_VIN),
            make: position(COL_MAKE),
            model: position(COL_MODEL),
            mileage: position(COL_MILEAGE),
            year: position(COL_YEAR),
            price: position(COL_PRICE),
            zip_code: position(COL_ZIP_CODE),
            create_date: position(COL_CREATE_DATE),
            update_date: position(COL_UPDATE_DATE),
        }
    }

    fn to_record(&self, row: &StringRecord) -> CanonicalRecord {
        CanonicalRecord {
            uuid: field(row, self.uuid),
            vin: field(row, self.vin),
            make: field(row, self.make),
            model: field(row, self.model),
            mileage: field(row, self.mileage),
            year: field(row, self.year),
            price: field(row, self.price),
            zip_code: field(row, self.zip_code),
            create_date: field(row, self.create_date),
            update_date: field(row, self.update_date),
        }
    }
}

/// Absent column or empty value → None
fn field(row: &StringRecord, position: Option<usize>) -> Option<String> {
    position
        .and_then(|i| row.get(i))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
