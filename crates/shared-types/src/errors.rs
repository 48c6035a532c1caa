//! Common error types used across all widget wizard crates
//! Provides consistent error handling and reporting

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base error type for all wizard operations
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum WizardError {
    // Wizard state machine errors
    #[error("Invalid wizard action: {action}")]
    InvalidAction { action: String },

    #[error("Cannot {transition} from step {step}")]
    StepOutOfRange { step: u8, transition: String },

    #[error("Wizard session is closed")]
    SessionClosed,

    // Attribute selection errors
    #[error("Attribute not found: {attribute_id}")]
    AttributeNotFound { attribute_id: String },

    #[error("Attribute cannot be selected: {attribute_id}")]
    AttributeNotSelectable { attribute_id: String },

    #[error("Attribute is not selected: {attribute_id}")]
    AttributeNotSelected { attribute_id: String },

    #[error("Invalid color: {value:?}")]
    InvalidColor { value: String },

    // Pagination and remote listing errors
    #[error("Fetch failed: {message}")]
    Fetch { message: String },

    #[error("Paginator error: {message}")]
    Paginator { message: String },

    // Configuration errors
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Unknown chart type: {value}")]
    UnknownChartType { value: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Result type alias for wizard operations
pub type WizardResult<T> = Result<T, WizardError>;

/// Error response structure for JavaScript interop
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: WizardError,
    pub timestamp: u64,
    pub context: Option<ErrorContext>,
}

/// Additional context for error reporting
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorContext {
    pub component: String,
    pub operation: String,
    pub metadata: serde_json::Value,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: WizardError) -> Self {
        Self {
            success: false,
            error,
            timestamp: chrono::Utc::now().timestamp_millis() as u64,
            context: None,
        }
    }

    /// Add context to the error response
    pub fn with_context(mut self, component: &str, operation: &str) -> Self {
        self.context = Some(ErrorContext {
            component: component.to_string(),
            operation: operation.to_string(),
            metadata: serde_json::Value::Null,
        });
        self
    }

    /// Add metadata to the error context
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        if let Some(ref mut ctx) = self.context {
            ctx.metadata = metadata;
        }
        self
    }

    /// Convert to JSON string for JavaScript
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"error":{"type":"Serialization","details":{"message":"Failed to serialize error"}}}"#.to_string()
        })
    }
}

impl From<serde_json::Error> for WizardError {
    fn from(err: serde_json::Error) -> Self {
        WizardError::Serialization {
            message: err.to_string(),
        }
    }
}
