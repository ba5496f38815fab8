//! # Run Metadata
//!
//! Provenance for a boxplot run: where the data came from, which parameters
//! shaped the long-form table, and the processing steps applied. Serialized
//! as JSON and embedded in exported Parquet footers.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::pipeline::{Operator, PipelineConfig};

/// Footer key holding the JSON-serialized [`RunMetadata`]
pub const RUN_METADATA_KEY: &str = "enrichment:run_metadata";

/// Footer key holding the crate version that wrote the file
pub const VERSION_KEY: &str = "enrichment:version";

/// Errors that can occur during metadata processing
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Data processing history for audit trail
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingHistory {
    /// List of processing steps applied
    pub steps: Vec<ProcessingStep>,
}

/// A single data processing step in the processing history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStep {
    /// Step order (1-indexed)
    pub order: i32,

    /// Software name
    pub software: String,

    /// Software version
    pub version: Option<String>,

    /// Processing type (e.g., "log2 transform", "pairwise difference")
    pub processing_type: String,

    /// Timestamp when processing was performed (RFC 3339)
    pub timestamp: Option<String>,

    /// Processing parameters
    pub parameters: HashMap<String, String>,
}

impl ProcessingStep {
    /// New step stamped with the current time and this crate's name and version
    pub fn now(processing_type: impl Into<String>) -> Self {
        Self {
            order: 0,
            software: env!("CARGO_PKG_NAME").to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
            processing_type: processing_type.into(),
            timestamp: Some(Utc::now().to_rfc3339()),
            parameters: HashMap::new(),
        }
    }

    /// Add a parameter
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.parameters.insert(key.into(), value.to_string());
        self
    }
}

impl ProcessingHistory {
    /// Create a new empty processing history
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a processing step, numbering it after the existing ones
    pub fn add_step(&mut self, mut step: ProcessingStep) {
        step.order = self.steps.len() as i32 + 1;
        self.steps.push(step);
    }
}

/// Parameters and provenance of one boxplot run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Input table path
    pub source_file: Option<String>,

    /// Allowed sample types
    pub sample_types: Vec<String>,

    /// Threshold as supplied by the user
    pub threshold: f64,

    /// Threshold actually compared against (after any log2 transform)
    pub effective_threshold: f64,

    /// Whether values were log2(x+1)-transformed
    pub log2: bool,

    /// Pairwise operator
    pub operator: Operator,

    /// Whether operand order was reversed
    pub reverse: bool,

    /// Processing steps applied
    pub processing_history: ProcessingHistory,
}

impl RunMetadata {
    /// Record a run of `config`; `threshold` is the untransformed user value
    pub fn new(
        source_file: Option<String>,
        config: &PipelineConfig,
        threshold: f64,
        log2: bool,
    ) -> Self {
        let mut history = ProcessingHistory::new();
        if log2 {
            history.add_step(ProcessingStep::now("log2(x+1) transform"));
        }
        history.add_step(
            ProcessingStep::now("enrichment filter")
                .with_parameter("threshold", config.threshold)
                .with_parameter("sample_types", config.sample_types.join(",")),
        );
        history.add_step(
            ProcessingStep::now("pairwise operation")
                .with_parameter("operator", config.operator)
                .with_parameter("reverse", config.reverse),
        );

        Self {
            source_file,
            sample_types: config.sample_types.clone(),
            threshold,
            effective_threshold: config.threshold,
            log2,
            operator: config.operator,
            reverse: config.reverse,
            processing_history: history,
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, MetadataError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Key-value pairs for a Parquet footer
    pub fn to_parquet_metadata(&self) -> Result<HashMap<String, String>, MetadataError> {
        let mut metadata = HashMap::new();
        metadata.insert(
            VERSION_KEY.to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        );
        metadata.insert(RUN_METADATA_KEY.to_string(), self.to_json()?);
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_numbering() {
        let config = PipelineConfig::default();
        let metadata = RunMetadata::new(Some("in.tsv".to_string()), &config, 10.0, true);

        let steps = &metadata.processing_history.steps;
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].processing_type, "log2(x+1) transform");
        assert_eq!(
            steps.iter().map(|s| s.order).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(steps[2].parameters.get("operator"), Some(&"minus".to_string()));
        assert!(steps[0].timestamp.is_some());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = PipelineConfig {
            threshold: 3.5,
            operator: Operator::Ratio,
            reverse: true,
            ..Default::default()
        };
        let metadata = RunMetadata::new(None, &config, 10.0, true);

        let json = metadata.to_json().unwrap();
        assert!(json.contains("\"operator\":\"division\""));
        let restored = RunMetadata::from_json(&json).unwrap();
        assert_eq!(restored, metadata);
    }

    #[test]
    fn test_parquet_metadata_keys() {
        let metadata = RunMetadata::new(None, &PipelineConfig::default(), 10.0, false);
        let kv = metadata.to_parquet_metadata().unwrap();

        assert_eq!(metadata.processing_history.steps.len(), 2);
        assert!(kv.contains_key(RUN_METADATA_KEY));
        assert_eq!(kv.get(VERSION_KEY).map(String::as_str), Some(env!("CARGO_PKG_VERSION")));
    }
}
