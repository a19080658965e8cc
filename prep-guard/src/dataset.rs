//! In-memory tabular dataset used by every analyzer.
//!
//! A [`Dataset`] is an Arrow [`RecordBatch`] paired with a [`RowIndex`]. The
//! index identifies logical rows and may repeat: several physical rows can
//! belong to the same entity, which is what the MECE checker groups on.
//!
//! A value counts as *missing* when it is null or when it is a floating-point
//! NaN.
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Int64Array, StringArray};
//! use prep_guard::dataset::Dataset;
//!
//! let dataset = Dataset::try_from_columns(vec![
//!     ("id", Arc::new(Int64Array::from(vec![1, 1, 2])) as ArrayRef),
//!     ("label", Arc::new(StringArray::from(vec!["a", "a", "b"])) as ArrayRef),
//! ])
//! .unwrap()
//! .set_index("id")
//! .unwrap();
//!
//! assert_eq!(dataset.column_names(), vec!["label"]);
//! assert_eq!(dataset.num_rows(), 3);
//! ```

use std::collections::HashSet;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::concat_batches;
use arrow::datatypes::{DataType, Float16Type, Float32Type, Float64Type, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Raw storage classification of a column, derived from its Arrow type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Calendar dates and timestamps.
    Temporal,
    /// Integers, floats, decimals and booleans.
    Numeric,
    /// Generic storage: strings, binary blobs, time-of-day and untyped nulls.
    Object,
    /// Anything else (dictionary-encoded categories, durations, nested types).
    Other,
}

impl StorageKind {
    /// Classifies an Arrow data type.
    pub fn of(data_type: &DataType) -> Self {
        match data_type {
            DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => Self::Temporal,
            DataType::Boolean
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64
            | DataType::Decimal128(_, _)
            | DataType::Decimal256(_, _) => Self::Numeric,
            DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Utf8View
            | DataType::Binary
            | DataType::LargeBinary
            | DataType::BinaryView
            | DataType::FixedSizeBinary(_)
            | DataType::Time32(_)
            | DataType::Time64(_)
            | DataType::Null => Self::Object,
            _ => Self::Other,
        }
    }
}

/// Row labels of a dataset.
#[derive(Debug, Clone)]
pub enum RowIndex {
    /// Rows are labelled `0..n` by position.
    Positional,
    /// Rows are labelled by the values of an Arrow array (duplicates allowed).
    Labels(ArrayRef),
}

/// A borrowed view of one named column.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    name: &'a str,
    array: &'a ArrayRef,
}

impl<'a> Column<'a> {
    /// Returns the column name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Returns the underlying Arrow array.
    pub fn array(&self) -> &'a ArrayRef {
        self.array
    }

    /// Returns the Arrow data type of the column.
    pub fn data_type(&self) -> &'a DataType {
        self.array.data_type()
    }

    /// Returns the storage classification of the column.
    pub fn storage_kind(&self) -> StorageKind {
        StorageKind::of(self.array.data_type())
    }

    /// Number of values in the column.
    pub fn len(&self) -> usize {
        self.array.len()
    }

    /// Returns true if the column holds no values.
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Per-row missing flags (null or NaN).
    pub fn missing_mask(&self) -> Vec<bool> {
        missing_mask(self.array.as_ref())
    }

    /// Number of missing values.
    pub fn missing_count(&self) -> usize {
        self.missing_mask().iter().filter(|m| **m).count()
    }

    /// Number of distinct non-missing values.
    ///
    /// Floats compare by value, so `0.0` and `-0.0` are the same value.
    /// Everything else compares by its rendered text.
    pub fn distinct_count(&self) -> std::result::Result<usize, ArrowError> {
        let array = self.array.as_ref();
        if let Some(values) = float_values(array) {
            let distinct: HashSet<u64> = values
                .into_iter()
                .zip(missing_mask(array))
                .filter(|(_, missing)| !missing)
                .filter_map(|(value, _)| value)
                .map(|v| if v == 0.0 { 0.0_f64 } else { v }.to_bits())
                .collect();
            return Ok(distinct.len());
        }

        let distinct: HashSet<String> = value_keys(array)?.into_iter().flatten().collect();
        Ok(distinct.len())
    }

    /// Textual form of every value, `None` where the value is missing.
    pub fn display_values(&self) -> std::result::Result<Vec<Option<String>>, ArrowError> {
        value_keys(self.array.as_ref())
    }
}

/// An Arrow record batch plus its row index.
#[derive(Debug, Clone)]
pub struct Dataset {
    batch: RecordBatch,
    index: RowIndex,
}

impl Dataset {
    /// Wraps a record batch with a positional index.
    pub fn new(batch: RecordBatch) -> Self {
        Self {
            batch,
            index: RowIndex::Positional,
        }
    }

    /// Concatenates record batches sharing `schema` into one dataset.
    pub fn from_batches(schema: SchemaRef, batches: &[RecordBatch]) -> Result<Self> {
        let batch = concat_batches(&schema, batches)?;
        Ok(Self::new(batch))
    }

    /// Builds a dataset from named arrays of equal length.
    pub fn try_from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ArrayRef)>,
        S: AsRef<str>,
    {
        let batch = RecordBatch::try_from_iter(columns)?;
        Ok(Self::new(batch))
    }

    /// Replaces the row index with explicit labels.
    pub fn with_index(mut self, labels: ArrayRef) -> Result<Self> {
        if labels.len() != self.batch.num_rows() {
            return Err(PrepError::invalid_argument(
                "index",
                format!(
                    "index has {} labels but dataset has {} rows",
                    labels.len(),
                    self.batch.num_rows()
                ),
            ));
        }
        self.index = RowIndex::Labels(labels);
        Ok(self)
    }

    /// Promotes a column to the row index, removing it from the columns.
    pub fn set_index(mut self, column: &str) -> Result<Self> {
        let position = self
            .batch
            .schema()
            .index_of(column)
            .map_err(|_| PrepError::column_not_found(column))?;
        let labels = self.batch.remove_column(position);
        self.index = RowIndex::Labels(labels);
        Ok(self)
    }

    /// Drops explicit labels and returns to a positional index.
    pub fn reset_index(mut self) -> Self {
        self.index = RowIndex::Positional;
        self
    }

    /// Returns the row index.
    pub fn index(&self) -> &RowIndex {
        &self.index
    }

    /// Returns the underlying record batch.
    pub fn record_batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Returns the schema of the data columns.
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<&str> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<Column<'_>> {
        self.columns().find(|c| c.name() == name)
    }

    /// Iterates over all columns in schema order.
    pub fn columns(&self) -> impl Iterator<Item = Column<'_>> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .zip(self.batch.columns())
            .map(|(field, array)| Column {
                name: field.name().as_str(),
                array,
            })
    }

    /// Textual row-index label of every row; `None` where the label is missing.
    pub fn index_keys(&self) -> std::result::Result<Vec<Option<String>>, ArrowError> {
        match &self.index {
            RowIndex::Positional => Ok((0..self.num_rows()).map(|i| Some(i.to_string())).collect()),
            RowIndex::Labels(labels) => value_keys(labels.as_ref()),
        }
    }
}

impl From<RecordBatch> for Dataset {
    fn from(batch: RecordBatch) -> Self {
        Self::new(batch)
    }
}

/// Null or NaN flags for each slot of `array`.
pub(crate) fn missing_mask(array: &dyn Array) -> Vec<bool> {
    let nulls = array.logical_nulls();
    (0..array.len())
        .map(|i| nulls.as_ref().is_some_and(|n| n.is_null(i)) || is_nan(array, i))
        .collect()
}

fn is_nan(array: &dyn Array, i: usize) -> bool {
    match array.data_type() {
        DataType::Float16 => array.as_primitive::<Float16Type>().value(i).is_nan(),
        DataType::Float32 => array.as_primitive::<Float32Type>().value(i).is_nan(),
        DataType::Float64 => array.as_primitive::<Float64Type>().value(i).is_nan(),
        _ => false,
    }
}

/// Widens a float array to `f64` values, `None` for other types.
fn float_values(array: &dyn Array) -> Option<Vec<Option<f64>>> {
    match array.data_type() {
        DataType::Float16 => Some(
            array
                .as_primitive::<Float16Type>()
                .iter()
                .map(|v| v.map(|v| v.to_f64()))
                .collect(),
        ),
        DataType::Float32 => Some(
            array
                .as_primitive::<Float32Type>()
                .iter()
                .map(|v| v.map(f64::from))
                .collect(),
        ),
        DataType::Float64 => Some(array.as_primitive::<Float64Type>().iter().collect()),
        _ => None,
    }
}

/// Renders every non-missing value of `array` to its display string.
pub(crate) fn value_keys(
    array: &dyn Array,
) -> std::result::Result<Vec<Option<String>>, ArrowError> {
    if array.data_type() == &DataType::Null {
        return Ok(vec![None; array.len()]);
    }
    let options = FormatOptions::default();
    let formatter = ArrayFormatter::try_new(array, &options)?;
    Ok(missing_mask(array)
        .into_iter()
        .enumerate()
        .map(|(i, missing)| (!missing).then(|| formatter.value(i).to_string()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{
        Date32Array, DictionaryArray, Float32Array, Float64Array, Int32Array, Int64Array,
        NullArray, StringArray,
    };
    use arrow::datatypes::Int8Type;
    use std::sync::Arc;

    fn sample() -> Dataset {
        Dataset::try_from_columns(vec![
            ("id", Arc::new(Int64Array::from(vec![10, 10, 20])) as ArrayRef),
            (
                "score",
                Arc::new(Float64Array::from(vec![Some(1.5), Some(f64::NAN), None])) as ArrayRef,
            ),
            (
                "city",
                Arc::new(StringArray::from(vec![Some("Rome"), Some("Rome"), None])) as ArrayRef,
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_storage_kind_mapping() {
        assert_eq!(StorageKind::of(&DataType::Int32), StorageKind::Numeric);
        assert_eq!(StorageKind::of(&DataType::Boolean), StorageKind::Numeric);
        assert_eq!(StorageKind::of(&DataType::Date32), StorageKind::Temporal);
        assert_eq!(StorageKind::of(&DataType::Utf8), StorageKind::Object);
        assert_eq!(StorageKind::of(&DataType::Null), StorageKind::Object);
        assert_eq!(
            StorageKind::of(&DataType::Dictionary(
                Box::new(DataType::Int8),
                Box::new(DataType::Utf8)
            )),
            StorageKind::Other
        );
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let dataset = sample();
        let score = dataset.column("score").unwrap();
        assert_eq!(score.missing_mask(), vec![false, true, true]);
        assert_eq!(score.missing_count(), 2);
        assert_eq!(score.distinct_count().unwrap(), 1);
    }

    #[test]
    fn test_negative_zero_is_not_distinct() {
        let dataset = Dataset::try_from_columns(vec![
            (
                "f64",
                Arc::new(Float64Array::from(vec![Some(0.0), Some(-0.0), Some(1.0), None]))
                    as ArrayRef,
            ),
            (
                "f32",
                Arc::new(Float32Array::from(vec![-0.0_f32, 0.0, f32::NAN])) as ArrayRef,
            ),
        ])
        .unwrap();
        assert_eq!(dataset.column("f64").unwrap().distinct_count().unwrap(), 2);
        assert_eq!(dataset.column("f32").unwrap().distinct_count().unwrap(), 1);
    }

    #[test]
    fn test_distinct_count_ignores_nulls() {
        let dataset = sample();
        let city = dataset.column("city").unwrap();
        assert_eq!(city.distinct_count().unwrap(), 1);
        assert_eq!(
            city.display_values().unwrap(),
            vec![Some("Rome".to_string()), Some("Rome".to_string()), None]
        );
    }

    #[test]
    fn test_null_array_is_all_missing() {
        let dataset =
            Dataset::try_from_columns(vec![("empty", Arc::new(NullArray::new(3)) as ArrayRef)])
                .unwrap();
        let column = dataset.column("empty").unwrap();
        assert_eq!(column.missing_count(), 3);
        assert_eq!(column.distinct_count().unwrap(), 0);
    }

    #[test]
    fn test_dictionary_column_distinct_values() {
        let dict: DictionaryArray<Int8Type> = vec!["a", "b", "a"].into_iter().collect();
        let dataset =
            Dataset::try_from_columns(vec![("cat", Arc::new(dict) as ArrayRef)]).unwrap();
        let column = dataset.column("cat").unwrap();
        assert_eq!(column.storage_kind(), StorageKind::Other);
        assert_eq!(column.distinct_count().unwrap(), 2);
    }

    #[test]
    fn test_set_index_moves_column() {
        let dataset = sample().set_index("id").unwrap();
        assert_eq!(dataset.column_names(), vec!["score", "city"]);
        assert_eq!(
            dataset.index_keys().unwrap(),
            vec![
                Some("10".to_string()),
                Some("10".to_string()),
                Some("20".to_string())
            ]
        );
    }

    #[test]
    fn test_set_index_unknown_column() {
        let err = sample().set_index("missing").unwrap_err();
        assert!(matches!(err, PrepError::ColumnNotFound { .. }));
    }

    #[test]
    fn test_positional_index() {
        let dataset = sample();
        assert_eq!(
            dataset.index_keys().unwrap(),
            vec![Some("0".to_string()), Some("1".to_string()), Some("2".to_string())]
        );
    }

    #[test]
    fn test_with_index_length_mismatch() {
        let err = sample()
            .with_index(Arc::new(Int32Array::from(vec![1, 2])))
            .unwrap_err();
        assert!(matches!(err, PrepError::InvalidArgument { .. }));
    }

    #[test]
    fn test_temporal_column_kind() {
        let dataset = Dataset::try_from_columns(vec![(
            "day",
            Arc::new(Date32Array::from(vec![19_000, 19_001])) as ArrayRef,
        )])
        .unwrap();
        assert_eq!(
            dataset.column("day").unwrap().storage_kind(),
            StorageKind::Temporal
        );
    }
}
