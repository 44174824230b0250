//! Export orchestration.
//!
//! - [`ExporterBuilder`]: configures font sources, output format and location
//! - [`LabelExporter`]: composes and renders requests, writing files atomically
//! - [`ExportRequest`] / [`BatchExportRequest`]: the JSON inputs

mod builder;
pub mod config;
mod exporter;
mod request;

pub use builder::ExporterBuilder;
pub use config::ExportConfig;
pub use exporter::{ExportOutcome, LabelExporter};
pub use request::{BatchExportRequest, ExportRequest};
