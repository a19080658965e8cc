//! Prelude for commonly used types and traits in prep-guard.

pub use crate::dataset::Dataset;
pub use crate::error::{ErrorContext, PrepError, Result};
pub use crate::formatters::{FormatterConfig, HumanFormatter, JsonFormatter, Report, ReportFormatter};
pub use crate::logging::LogConfig;
