use crate::error::PipelineError;
use labelpress_layout::VariableValues;
use labelpress_types::LabelDocument;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

/// One label to export, with the variable values for this order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExportRequest {
    #[serde(flatten)]
    pub document: LabelDocument,
    #[serde(default)]
    pub variables: VariableValues,
}

impl ExportRequest {
    pub fn new(document: LabelDocument) -> Self {
        Self { document, variables: VariableValues::new() }
    }

    pub fn with_variables(mut self, variables: VariableValues) -> Self {
        self.variables = variables;
        self
    }

    pub fn from_json(source: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        Self::from_json(&read_source(path.as_ref())?)
    }
}

/// Several labels exported as the pages of one file. The batch flags apply
/// to every page, overriding the pages' own.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchExportRequest {
    pub pages: Vec<ExportRequest>,
    #[serde(default)]
    pub outlined: bool,
    #[serde(default)]
    pub separate_invisible: bool,
}

impl BatchExportRequest {
    pub fn from_json(source: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        Self::from_json(&read_source(path.as_ref())?)
    }
}

fn read_source(path: &Path) -> Result<String, PipelineError> {
    fs::read_to_string(path).map_err(|e| {
        PipelineError::Io(io::Error::new(e.kind(), format!("Failed to read request from '{}': {}", path.display(), e)))
    })
}
