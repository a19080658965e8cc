//! Loading and saving datasets.
//!
//! Files are read through DataFusion (CSV, Parquet) or `calamine` (Excel,
//! behind the `excel` feature) and collected into an in-memory [`Dataset`]
//! with a positional index. Saving always happens under a project's data
//! root, see [`ProjectLayout`]. `.xlsx` output goes through `rust_xlsxwriter`
//! and also needs the `excel` feature.
//!
//! ```rust,no_run
//! use prep_guard::sources::{load_dataset, save_dataset, ProjectLayout};
//!
//! # async fn example() -> prep_guard::error::Result<()> {
//! let layout = ProjectLayout::new("/srv/project");
//! let dataset = load_dataset(layout.data_root().join("raw/students.csv")).await?;
//! let written = save_dataset(&layout, &dataset, "processed/students.csv")?;
//! println!("saved to {}", written.display());
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};

use datafusion::prelude::{CsvReadOptions, DataFrame, ParquetReadOptions, SessionContext};
use tracing::{info, instrument};

use crate::dataset::Dataset;
use crate::prelude::*;

mod checksum;
#[cfg(feature = "excel")]
mod excel;
mod layout;

pub use checksum::{checksum_path, sha256_file, verify_checksum, write_checksum};
pub use layout::{ProjectLayout, DEFAULT_MARKERS, ROOT_ENV_VAR};

/// Tabular file formats recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Parquet,
    Excel,
}

impl FileFormat {
    /// Detects the format from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "csv" => Some(Self::Csv),
            "parquet" => Some(Self::Parquet),
            "xlsx" | "xls" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Whether `save_dataset` can produce this file. Legacy `.xls` is
    /// read-only.
    fn is_writable(path: &Path) -> bool {
        match Self::from_path(path) {
            Some(Self::Csv | Self::Parquet) => true,
            Some(Self::Excel) => path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("xlsx")),
            None => false,
        }
    }

    fn extension_of(path: &Path) -> String {
        path.extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()
    }
}

/// Options for configuring CSV file reading.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Whether the CSV file has a header row
    pub has_header: bool,
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Maximum records to read for schema inference
    pub schema_infer_max_records: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            schema_infer_max_records: 1000,
        }
    }
}

/// Loads a CSV, Parquet or Excel file into memory.
pub async fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    load_dataset_with_options(path, CsvOptions::default()).await
}

/// Loads a dataset, using `options` when the file is CSV.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn load_dataset_with_options(
    path: impl AsRef<Path>,
    options: CsvOptions,
) -> Result<Dataset> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PrepError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let dataset = match FileFormat::from_path(path) {
        Some(FileFormat::Csv) => read_csv(path, &options).await?,
        Some(FileFormat::Parquet) => read_parquet(path).await?,
        Some(FileFormat::Excel) => read_excel(path)?,
        None => {
            return Err(PrepError::unsupported_format(
                FileFormat::extension_of(path),
                &[".csv", ".parquet", ".xlsx", ".xls"],
            ))
        }
    };

    info!(
        rows = dataset.num_rows(),
        columns = dataset.num_columns(),
        "Data loaded"
    );
    Ok(dataset)
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| PrepError::Configuration("Path contains invalid UTF-8".to_string()))
}

async fn read_csv(path: &Path, options: &CsvOptions) -> Result<Dataset> {
    let extension = FileFormat::extension_of(path);
    let read_options = CsvReadOptions::new()
        .has_header(options.has_header)
        .delimiter(options.delimiter)
        .schema_infer_max_records(options.schema_infer_max_records)
        .file_extension(&extension);

    let ctx = SessionContext::new();
    let df = ctx.read_csv(path_str(path)?, read_options).await?;
    collect(df).await
}

async fn read_parquet(path: &Path) -> Result<Dataset> {
    let ctx = SessionContext::new();
    let df = ctx
        .read_parquet(path_str(path)?, ParquetReadOptions::default())
        .await?;
    collect(df).await
}

async fn collect(df: DataFrame) -> Result<Dataset> {
    let schema = df.schema().inner().clone();
    let batches = df.collect().await?;
    let schema = batches.first().map(|b| b.schema()).unwrap_or(schema);
    Dataset::from_batches(schema, &batches)
}

#[cfg(feature = "excel")]
fn read_excel(path: &Path) -> Result<Dataset> {
    excel::read_first_sheet(path)
}

#[cfg(not(feature = "excel"))]
fn read_excel(path: &Path) -> Result<Dataset> {
    Err(PrepError::Configuration(format!(
        "Reading {} requires the `excel` feature",
        path.display()
    )))
}

/// Writes `dataset` to `<data root>/<relative_path>` without its index,
/// creating missing directories. Returns the written path.
#[instrument(skip_all, fields(relative_path = %relative_path.as_ref().display()))]
pub fn save_dataset(
    layout: &ProjectLayout,
    dataset: &Dataset,
    relative_path: impl AsRef<Path>,
) -> Result<PathBuf> {
    let path = layout.resolve_data_path(relative_path.as_ref())?;

    if !FileFormat::is_writable(&path) {
        return Err(PrepError::unsupported_format(
            FileFormat::extension_of(&path),
            &[".csv", ".parquet", ".xlsx"],
        ));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    match FileFormat::from_path(&path) {
        Some(FileFormat::Parquet) => write_parquet(&path, dataset)?,
        Some(FileFormat::Excel) => write_excel(&path, dataset)?,
        _ => write_csv(&path, dataset)?,
    }

    info!(path = %path.display(), rows = dataset.num_rows(), "File saved");
    Ok(path)
}

fn write_csv(path: &Path, dataset: &Dataset) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = arrow::csv::WriterBuilder::new()
        .with_header(true)
        .build(file);
    writer.write(dataset.record_batch())?;
    Ok(())
}

#[cfg(feature = "excel")]
fn write_excel(path: &Path, dataset: &Dataset) -> Result<()> {
    excel::write_workbook(path, dataset)
}

#[cfg(not(feature = "excel"))]
fn write_excel(path: &Path, _dataset: &Dataset) -> Result<()> {
    Err(PrepError::Configuration(format!(
        "Writing {} requires the `excel` feature",
        path.display()
    )))
}

#[cfg(feature = "parquet")]
fn write_parquet(path: &Path, dataset: &Dataset) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = parquet::arrow::ArrowWriter::try_new(file, dataset.schema(), None)?;
    writer.write(dataset.record_batch())?;
    writer.close()?;
    Ok(())
}

#[cfg(not(feature = "parquet"))]
fn write_parquet(path: &Path, _dataset: &Dataset) -> Result<()> {
    Err(PrepError::Configuration(format!(
        "Writing {} requires the `parquet` feature",
        path.display()
    )))
}
