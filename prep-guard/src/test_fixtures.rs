//! Common test fixtures for profiling and label validation scenarios.

use std::sync::Arc;

use arrow::array::{ArrayRef, Date32Array, Int64Array, StringArray};

use crate::dataset::Dataset;

/// A small student-outcome table.
///
/// | column        | storage | notes                              |
/// |---------------|---------|------------------------------------|
/// | `Age`         | Int64   | one missing value                  |
/// | `Gender_Code` | Utf8    | one missing value                  |
/// | `Enrolled_On` | Date32  |                                    |
/// | `Scholarship` | Int64   | 0/1 flag                           |
/// | `Target`      | Utf8    | Dropout / Graduate / Enrolled      |
pub fn student_records() -> Dataset {
    Dataset::try_from_columns(vec![
        (
            "Age",
            Arc::new(Int64Array::from(vec![
                Some(19),
                Some(22),
                None,
                Some(20),
                Some(31),
                Some(19),
            ])) as ArrayRef,
        ),
        (
            "Gender_Code",
            Arc::new(StringArray::from(vec![
                Some("F"),
                Some("M"),
                Some("F"),
                None,
                Some("M"),
                Some("F"),
            ])) as ArrayRef,
        ),
        (
            "Enrolled_On",
            Arc::new(Date32Array::from(vec![
                19_236, 19_236, 19_601, 19_601, 19_966, 19_966,
            ])) as ArrayRef,
        ),
        (
            "Scholarship",
            Arc::new(Int64Array::from(vec![0, 1, 0, 0, 1, 0])) as ArrayRef,
        ),
        (
            "Target",
            Arc::new(StringArray::from(vec![
                "Dropout", "Graduate", "Enrolled", "Graduate", "Dropout", "Graduate",
            ])) as ArrayRef,
        ),
    ])
    .expect("student fixture columns have equal length")
}

/// Multi-assignment records keyed by `record_id`, where record 3 carries two
/// different labels and one row is unlabelled.
pub fn conflicting_labels() -> Dataset {
    Dataset::try_from_columns(vec![
        (
            "record_id",
            Arc::new(Int64Array::from(vec![1, 2, 3, 3, 4])) as ArrayRef,
        ),
        (
            "label",
            Arc::new(StringArray::from(vec![
                Some("A"),
                Some("B"),
                Some("A"),
                Some("B"),
                None,
            ])) as ArrayRef,
        ),
    ])
    .and_then(|d| d.set_index("record_id"))
    .expect("label fixture is well formed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_fixture_shape() {
        let dataset = student_records();
        assert_eq!(dataset.num_rows(), 6);
        assert_eq!(dataset.num_columns(), 5);
    }

    #[test]
    fn test_conflicting_fixture_index() {
        let dataset = conflicting_labels();
        assert_eq!(dataset.column_names(), vec!["label"]);
        assert_eq!(dataset.index_keys().unwrap()[3], Some("3".to_string()));
    }
}
