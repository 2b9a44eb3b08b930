//! Data module - CSV loading, pipeline processing and export

pub mod export;
mod loader;
mod processor;
pub mod schema;

pub use export::ExportError;
pub use loader::{unrecognized_columns, DataLoader, LoaderError};
pub use processor::{DataProcessor, ProcessorError, StageOutcome, FOR_PROFIT};
