//! Error handling for facetq.
//!
//! This module provides:
//! - [`FacetError`]: The main error enum for all facetq operations
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Rich error type with suggestions and context
//! - Suggestion helpers for context-aware error recovery hints

mod codes;
mod suggestions;

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;
pub use suggestions::{suggest_for_error, suggest_similar_parameters};

/// Main error type for facetq operations.
#[derive(Error, Debug)]
pub enum FacetError {
    #[error("Invalid value {value:?} for parameter '{parameter}': {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    #[error("Parameters '{first}' and '{second}' cannot be used together")]
    ConflictingParameters { first: String, second: String },

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Unknown sort order: {0}")]
    UnknownSortOrder(String),

    #[error("Cycle detected in {kind} hierarchy at '{node}': {}", .cycle.join(" -> "))]
    HierarchyCycle {
        kind: String,
        node: String,
        cycle: Vec<String>,
    },

    #[error("{kind} '{node}' references unknown parent '{parent}'")]
    DanglingParent {
        kind: String,
        node: String,
        parent: String,
    },

    #[error("{kind} '{node}' is declared more than once")]
    DuplicateNode { kind: String, node: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search index returned {status}: {body}")]
    SearchIndex { status: u16, body: String },

    #[error("Unexpected search index response: {0}")]
    InvalidSearchResponse(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl FacetError {
    /// Shorthand for a parameter validation failure.
    pub fn invalid_parameter(
        parameter: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Get the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidParameter { .. } => ErrorCode::ParameterInvalid,
            Self::ConflictingParameters { .. } => ErrorCode::ParameterConflict,
            Self::InvalidPagination(_) => ErrorCode::PaginationInvalid,
            Self::UnknownSortOrder(_) => ErrorCode::SortOrderUnknown,
            Self::HierarchyCycle { .. } => ErrorCode::HierarchyCycle,
            Self::DanglingParent { .. } => ErrorCode::HierarchyDanglingParent,
            Self::DuplicateNode { .. } => ErrorCode::HierarchyDuplicateNode,
            Self::Database(_) | Self::Migration(_) => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::SerializationError,
            Self::Toml(_) => ErrorCode::ConfigInvalid,
            Self::Http(_) => ErrorCode::NetworkError,
            Self::SearchIndex { .. } => ErrorCode::SearchIndexRejected,
            Self::InvalidSearchResponse(_) => ErrorCode::SearchResponseInvalid,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::MissingConfig(_) => ErrorCode::ConfigMissingRequired,
            Self::NotFound(_) => ErrorCode::NotFound,
        }
    }

    /// Whether the caller sent a malformed request (400-equivalent).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.code().http_status() == 400
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => Some(serde_json::json!({
                "parameter": parameter,
                "value": value,
                "reason": reason,
            })),
            Self::ConflictingParameters { first, second } => {
                Some(serde_json::json!({ "parameters": [first, second] }))
            }
            Self::UnknownSortOrder(value) => Some(serde_json::json!({ "sort_by": value })),
            Self::HierarchyCycle { kind, node, cycle } => {
                Some(serde_json::json!({ "kind": kind, "node": node, "cycle": cycle }))
            }
            Self::DanglingParent { kind, node, parent } => {
                Some(serde_json::json!({ "kind": kind, "node": node, "parent": parent }))
            }
            Self::SearchIndex { status, .. } => Some(serde_json::json!({ "status": status })),
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_facet_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
///
/// This is what an API layer serialises into its error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "PARAMETER_INVALID")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 101)
    pub numeric_code: u16,

    /// HTTP status the error maps to
    pub http_status: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether this error is potentially recoverable by the caller
    pub recoverable: bool,

    /// Error category (e.g., "parameter", "hierarchy")
    pub category: String,
}

impl StructuredError {
    /// Create a new structured error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            numeric_code: code.numeric(),
            http_status: code.http_status(),
            suggestion: code.suggestion().to_string(),
            context: None,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
            code,
            message: message.into(),
        }
    }

    /// Create a structured error from a [`FacetError`].
    #[must_use]
    pub fn from_facet_error(err: &FacetError) -> Self {
        let code = err.code();
        let context = err.context();
        let suggestion = suggest_for_error(code, context.as_ref());

        Self {
            code,
            numeric_code: code.numeric(),
            http_status: code.http_status(),
            message: err.to_string(),
            suggestion,
            context,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
        }
    }

    /// Add context to this error.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self.suggestion = suggest_for_error(self.code, self.context.as_ref());
        self
    }

    /// Set a custom suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = suggestion.into();
        self
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<FacetError> for StructuredError {
    fn from(err: FacetError) -> Self {
        Self::from_facet_error(&err)
    }
}

impl From<&FacetError> for StructuredError {
    fn from(err: &FacetError) -> Self {
        Self::from_facet_error(err)
    }
}

/// Result type alias using [`FacetError`].
pub type Result<T> = std::result::Result<T, FacetError>;
