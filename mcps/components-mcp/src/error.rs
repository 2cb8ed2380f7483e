//! Error types for loading and querying the component catalog

use std::path::PathBuf;

use mcp_common::ToolFailure;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal load failure: the corpus root itself cannot be read
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("corpus unavailable at {}: {reason}", root.display())]
    CorpusUnavailable { root: PathBuf, reason: String },
}

impl ToolFailure for LoadError {
    fn kind(&self) -> &'static str {
        "corpus_unavailable"
    }

    fn retryable(&self) -> bool {
        true
    }
}

/// A file that was skipped during load
///
/// Warnings never abort a load; they accumulate in the catalog diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadWarning {
    /// File path relative to the corpus root
    pub source: String,
    pub reason: String,
}

impl LoadWarning {
    pub fn new(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source, self.reason)
    }
}

/// Errors returned by catalog queries
///
/// These are always recoverable and are surfaced to callers as typed results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("catalog is still loading, retry shortly")]
    CatalogNotReady,

    #[error("unknown framework: {0}")]
    UnknownFramework(String),

    #[error("component not found: {0}")]
    NotFound(String),

    #[error("malformed component path {path:?}: {reason}")]
    MalformedPath { path: String, reason: String },

    #[error("query {0:?} contains no searchable tokens")]
    EmptyQuery(String),

    #[error("search cancelled before completion")]
    Cancelled,
}

impl QueryError {
    /// Exit code used by the `components` CLI
    ///
    /// `1` unknown framework/component or not ready, `3` malformed query. Corpus
    /// load failures (`2`) are [`LoadError`]s, not query errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            QueryError::CatalogNotReady
            | QueryError::UnknownFramework(_)
            | QueryError::NotFound(_)
            | QueryError::Cancelled => 1,
            QueryError::MalformedPath { .. } | QueryError::EmptyQuery(_) => 3,
        }
    }
}

impl ToolFailure for QueryError {
    fn kind(&self) -> &'static str {
        match self {
            QueryError::CatalogNotReady => "catalog_not_ready",
            QueryError::UnknownFramework(_) => "unknown_framework",
            QueryError::NotFound(_) => "not_found",
            QueryError::MalformedPath { .. } => "malformed_path",
            QueryError::EmptyQuery(_) => "empty_query",
            QueryError::Cancelled => "cancelled",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, QueryError::CatalogNotReady | QueryError::Cancelled)
    }
}
