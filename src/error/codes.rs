//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Request parameter errors
//! - 2xx: Hierarchy errors
//! - 3xx: Config errors
//! - 4xx: Search index errors
//! - 5xx: Network errors
//! - 6xx: Storage errors
//! - 9xx: Internal errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for structured output.
///
/// Each variant maps to a numeric code (e.g., `ParameterInvalid` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Parameter errors (1xx)
    // ========================================
    /// E101: A query parameter value could not be parsed
    ParameterInvalid,
    /// E102: Two mutually exclusive parameters were supplied together
    ParameterConflict,
    /// E103: Pagination offset/length out of range
    PaginationInvalid,
    /// E104: Unknown sort order requested
    SortOrderUnknown,

    // ========================================
    // Hierarchy errors (2xx)
    // ========================================
    /// E201: Parent links form a cycle
    HierarchyCycle,
    /// E202: A node references a parent that does not exist
    HierarchyDanglingParent,
    /// E203: The same identifier was declared twice
    HierarchyDuplicateNode,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E301: Config file has invalid syntax or values
    ConfigInvalid,
    /// E302: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // Search index errors (4xx)
    // ========================================
    /// E401: The search index rejected the query
    SearchIndexRejected,
    /// E402: The search index answered with an unreadable payload
    SearchResponseInvalid,

    // ========================================
    // Network errors (5xx)
    // ========================================
    /// E501: Request to the search index failed in transit
    NetworkError,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E601: Database operation failed
    DatabaseError,
    /// E602: Serialization/deserialization failed
    SerializationError,
    /// E603: IO operation failed
    IoError,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E901: Generic not found (catch-all)
    NotFound,
    /// E902: Unexpected internal error
    InternalError,
}

impl ErrorCode {
    /// Get the numeric error code (e.g., `ParameterInvalid` -> 101).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::ParameterInvalid => 101,
            Self::ParameterConflict => 102,
            Self::PaginationInvalid => 103,
            Self::SortOrderUnknown => 104,

            Self::HierarchyCycle => 201,
            Self::HierarchyDanglingParent => 202,
            Self::HierarchyDuplicateNode => 203,

            Self::ConfigInvalid => 301,
            Self::ConfigMissingRequired => 302,

            Self::SearchIndexRejected => 401,
            Self::SearchResponseInvalid => 402,

            Self::NetworkError => 501,

            Self::DatabaseError => 601,
            Self::SerializationError => 602,
            Self::IoError => 603,

            Self::NotFound => 901,
            Self::InternalError => 902,
        }
    }

    /// Get the error code as a formatted string (e.g., "E101").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Get the default suggestion for this error code.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::ParameterInvalid => "Check the parameter value. Id parameters take comma-separated integers or identifiers",
            Self::ParameterConflict => "Pass only one of the conflicting parameters",
            Self::PaginationInvalid => "Use a non-negative offset and a length between 1 and the configured maximum",
            Self::SortOrderUnknown => "Use `relevant`, `recent`, or a sort order configured under [search.replicas]",

            Self::HierarchyCycle => "Fix the parent links in the hierarchy data so that every chain ends at a root",
            Self::HierarchyDanglingParent => "Import the missing parent node or clear the parent reference",
            Self::HierarchyDuplicateNode => "Remove the duplicate node from the hierarchy data",

            Self::ConfigInvalid => "Run `facetq config` to see current values. Check TOML syntax in config file",
            Self::ConfigMissingRequired => "Set the required value in config.toml or through its FACETQ_* environment variable",

            Self::SearchIndexRejected => "Inspect the rendered filters with `facetq query` and check the index settings",
            Self::SearchResponseInvalid => "The search index answered with an unexpected payload. Check the index name and API version",

            Self::NetworkError => "Check network connectivity and the configured search base URL",

            Self::DatabaseError => "Check the hierarchy database path. Re-run `facetq import` to rebuild it",
            Self::SerializationError => "The data format may be corrupted. Check input data for validity",
            Self::IoError => "File operation failed. Check path exists and permissions are correct",

            Self::NotFound => "The requested resource was not found. Check the path or identifier",
            Self::InternalError => "An unexpected error occurred. Please report this issue with full error output",
        }
    }

    /// Check if this error is potentially recoverable by the caller.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::ParameterInvalid
            | Self::ParameterConflict
            | Self::PaginationInvalid
            | Self::SortOrderUnknown
            | Self::ConfigInvalid
            | Self::ConfigMissingRequired
            | Self::NetworkError
            | Self::IoError
            | Self::NotFound => true,

            Self::HierarchyCycle
            | Self::HierarchyDanglingParent
            | Self::HierarchyDuplicateNode
            | Self::SearchIndexRejected
            | Self::SearchResponseInvalid
            | Self::DatabaseError
            | Self::SerializationError
            | Self::InternalError => false,
        }
    }

    /// HTTP status an API layer should answer with.
    ///
    /// Request-shaped errors are the caller's fault (400); everything else is a
    /// server-side failure.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::ParameterInvalid
            | Self::ParameterConflict
            | Self::PaginationInvalid
            | Self::SortOrderUnknown => 400,
            Self::NotFound => 404,
            Self::SearchIndexRejected | Self::SearchResponseInvalid | Self::NetworkError => 502,
            _ => 500,
        }
    }

    /// Get the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "parameter",
            2 => "hierarchy",
            3 => "config",
            4 => "search",
            5 => "network",
            6 => "storage",
            9 => "internal",
            _ => "unknown",
        }
    }

    /// Iterate over all error codes.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::ParameterInvalid,
            Self::ParameterConflict,
            Self::PaginationInvalid,
            Self::SortOrderUnknown,
            Self::HierarchyCycle,
            Self::HierarchyDanglingParent,
            Self::HierarchyDuplicateNode,
            Self::ConfigInvalid,
            Self::ConfigMissingRequired,
            Self::SearchIndexRejected,
            Self::SearchResponseInvalid,
            Self::NetworkError,
            Self::DatabaseError,
            Self::SerializationError,
            Self::IoError,
            Self::NotFound,
            Self::InternalError,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
