//! Spreadsheet loading through `calamine` and `.xlsx` writing through
//! `rust_xlsxwriter`.
//!
//! The first worksheet is read; its first row holds the column names. Each
//! column becomes the narrowest Arrow type that fits every non-empty cell:
//! Boolean, Int64, Float64, millisecond Timestamp, and Utf8 otherwise.
//!
//! Writing produces one worksheet with a header row. Booleans and numbers
//! keep their cell types, dates and timestamps become date cells, anything
//! else is written as text. Missing values are left blank.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float64Array, Int64Array, NullArray, StringArray,
    TimestampMillisecondArray,
};
use arrow::compute::cast;
use arrow::datatypes::{DataType as ArrowType, Float64Type, TimeUnit, TimestampMillisecondType};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tracing::debug;

use crate::dataset::{Column, Dataset, StorageKind};
use crate::prelude::*;

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Empty,
    Bool,
    Int,
    Float,
    DateTime,
    Text,
}

fn cell_kind(cell: &Data) -> CellKind {
    match cell {
        Data::Empty | Data::Error(_) => CellKind::Empty,
        Data::Bool(_) => CellKind::Bool,
        Data::Int(_) => CellKind::Int,
        Data::Float(_) => CellKind::Float,
        Data::DateTime(_) | Data::DateTimeIso(_) => CellKind::DateTime,
        Data::String(_) | Data::DurationIso(_) => CellKind::Text,
    }
}

/// Widest kind needed to hold both `a` and `b`.
fn unify(a: CellKind, b: CellKind) -> CellKind {
    use CellKind::*;
    match (a, b) {
        (Empty, k) | (k, Empty) => k,
        (x, y) if x == y => x,
        (Int, Float) | (Float, Int) => Float,
        _ => Text,
    }
}

pub(super) fn read_first_sheet(path: &Path) -> Result<Dataset> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| PrepError::Excel(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PrepError::Excel("No worksheet found".to_string()))?
        .map_err(|e| PrepError::Excel(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Err(PrepError::Excel("First worksheet is empty".to_string()));
    };
    let names: Vec<String> = header.iter().map(|cell| cell.to_string()).collect();
    let body: Vec<&[Data]> = rows.collect();

    let mut columns = Vec::with_capacity(names.len());
    for (position, name) in names.into_iter().enumerate() {
        let cells: Vec<&Data> = body
            .iter()
            .map(|row| row.get(position).unwrap_or(&Data::Empty))
            .collect();
        let kind = cells
            .iter()
            .map(|c| cell_kind(c))
            .fold(CellKind::Empty, unify);
        debug!(column = %name, ?kind, "Excel column kind");
        columns.push((name, build_array(&cells, kind)));
    }

    Dataset::try_from_columns(columns)
}

fn build_array(cells: &[&Data], kind: CellKind) -> ArrayRef {
    let present = |c: &&Data| cell_kind(c) != CellKind::Empty;
    match kind {
        CellKind::Empty => Arc::new(NullArray::new(cells.len())),
        CellKind::Bool => Arc::new(BooleanArray::from(
            cells.iter().map(|c| c.get_bool()).collect::<Vec<_>>(),
        )),
        CellKind::Int => Arc::new(Int64Array::from(
            cells.iter().map(|c| c.get_int()).collect::<Vec<_>>(),
        )),
        CellKind::Float => Arc::new(Float64Array::from(
            cells.iter().map(|c| c.as_f64()).collect::<Vec<_>>(),
        )),
        CellKind::DateTime => Arc::new(TimestampMillisecondArray::from(
            cells
                .iter()
                .map(|c| c.as_datetime().map(|dt| dt.and_utc().timestamp_millis()))
                .collect::<Vec<_>>(),
        )),
        CellKind::Text => Arc::new(StringArray::from(
            cells
                .iter()
                .map(|c| present(c).then(|| c.to_string()))
                .collect::<Vec<_>>(),
        )),
    }
}

fn xlsx_error(e: XlsxError) -> PrepError {
    PrepError::Excel(e.to_string())
}

pub(super) fn write_workbook(path: &Path, dataset: &Dataset) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);

    for (position, column) in dataset.columns().enumerate() {
        let col = u16::try_from(position).map_err(|_| {
            PrepError::Excel(format!(
                "{} columns do not fit in a worksheet",
                dataset.num_columns()
            ))
        })?;
        worksheet
            .write_string(0, col, column.name())
            .map_err(xlsx_error)?;
        write_column(worksheet, col, column, &datetime_format)?;
    }

    workbook.save(path).map_err(xlsx_error)
}

fn write_column(
    worksheet: &mut Worksheet,
    col: u16,
    column: Column<'_>,
    datetime_format: &Format,
) -> Result<()> {
    let missing = column.missing_mask();
    let present = missing
        .iter()
        .enumerate()
        .filter(|(_, m)| !**m)
        .map(|(i, _)| i);

    match column.storage_kind() {
        StorageKind::Temporal => {
            let millis = cast(
                column.array(),
                &ArrowType::Timestamp(TimeUnit::Millisecond, None),
            )?;
            let millis = millis.as_primitive::<TimestampMillisecondType>();
            for i in present {
                if let Some(datetime) = millis.value_as_datetime(i) {
                    worksheet
                        .write_datetime_with_format(cell_row(i)?, col, &datetime, datetime_format)
                        .map_err(xlsx_error)?;
                }
            }
        }
        StorageKind::Numeric if column.data_type() == &ArrowType::Boolean => {
            let flags = column.array().as_boolean();
            for i in present {
                worksheet
                    .write_boolean(cell_row(i)?, col, flags.value(i))
                    .map_err(xlsx_error)?;
            }
        }
        StorageKind::Numeric => {
            let numbers = cast(column.array(), &ArrowType::Float64)?;
            let numbers = numbers.as_primitive::<Float64Type>();
            for i in present {
                if numbers.is_valid(i) {
                    worksheet
                        .write_number(cell_row(i)?, col, numbers.value(i))
                        .map_err(xlsx_error)?;
                }
            }
        }
        StorageKind::Object | StorageKind::Other => {
            for (i, value) in column.display_values()?.into_iter().enumerate() {
                if let Some(value) = value {
                    worksheet
                        .write_string(cell_row(i)?, col, &value)
                        .map_err(xlsx_error)?;
                }
            }
        }
    }
    Ok(())
}

/// Worksheet row of data row `i`; row 0 is the header.
fn cell_row(i: usize) -> Result<u32> {
    u32::try_from(i + 1)
        .map_err(|_| PrepError::Excel(format!("Row {i} does not fit in a worksheet")))
}
