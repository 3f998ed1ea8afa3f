//! Waste classification payloads
//!
//! Two backend routes classify images. `/classify` answers with a nested
//! `classification` object; `/ai/predict` answers with a flat
//! `predicted_category`/`probability` pair. [`ClassificationResult::from_response`]
//! accepts either.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::serde::option_id_string;
use crate::{Result, WasteWiseError};

/// Image handed over by the camera or file picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self { file_name: file_name.into(), content_type: content_type.into(), bytes }
    }

    /// # Errors
    /// Returns `WasteWiseError::Validation` for an empty image.
    pub fn validate(&self) -> Result<()> {
        if self.bytes.is_empty() {
            return Err(WasteWiseError::Validation("Image is empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub waste_type: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environmental_impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_predictions: Option<BTreeMap<String, f64>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub classification: Classification,
    #[serde(default, deserialize_with = "option_id_string")]
    pub classification_id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub suggestions: Option<Value>,
}

#[derive(Deserialize)]
struct Prediction {
    predicted_category: String,
    #[serde(default)]
    probability: f64,
}

impl ClassificationResult {
    /// Decode either classification response shape.
    ///
    /// # Errors
    /// Returns `WasteWiseError::Serialization` when the body matches neither.
    pub fn from_response(body: Value) -> Result<Self> {
        if body.get("classification").is_some() {
            return Ok(serde_json::from_value(body)?);
        }

        let prediction: Prediction = serde_json::from_value(body)?;
        Ok(Self {
            classification: Classification {
                waste_type: prediction.predicted_category,
                confidence: prediction.probability,
                recommendations: Vec::new(),
                environmental_impact: None,
                all_predictions: None,
                extra: Map::new(),
            },
            classification_id: None,
            filename: None,
            suggestions: None,
        })
    }
}
