use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt::Display};
use uuid::Uuid;

// ============================================================================
// Databases
// ============================================================================

/// Wrapper for the list databases response
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseList {
    pub databases: Vec<Database>,
}

/// Identifying information for a database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseId {
    pub id: Uuid,
    /// Fully-qualified name, `owner/name`
    pub name: String,
}

/// Metadata about a database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    #[serde(flatten)]
    pub id: DatabaseId,
    pub date_created: DateTime<Utc>,
    pub is_private: bool,
    pub role: String,
    pub storage_limit_bytes: i64,
    pub storage_usage_bytes: i64,
    #[serde(default)]
    pub usage_current: Option<Usage>,
    #[serde(default)]
    pub usage_previous: Option<Usage>,
}

/// Rows queried during a billing period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub rows_queried: i64,
    pub period_start: String,
    pub period_end: String,
}

/// Body for create and update database requests
///
/// `is_private` has no default on purpose: a public database must be asked
/// for explicitly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub is_private: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_limit_bytes: Option<i64>,
}

impl DatabaseConfig {
    pub fn private(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            is_private: true,
            storage_limit_bytes: None,
        }
    }
}

// ============================================================================
// Credentials & service accounts
// ============================================================================

/// Credentials for a personal or service account
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountList {
    pub service_accounts: Vec<ServiceAccount>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceAccount {
    pub id: Uuid,
    pub name: String,
    pub date_created: DateTime<Utc>,
    pub role: String,
    #[serde(default)]
    pub databases: Vec<DatabaseId>,
    pub token_count: i64,
    pub active_token_count: i64,
}

// ============================================================================
// Import / export jobs
// ============================================================================

/// Fields shared by import and export jobs
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransferJob {
    pub id: Uuid,
    pub date_created: DateTime<Utc>,
    #[serde(default)]
    pub date_finished: Option<DateTime<Utc>>,
    pub state: String,
    #[serde(default)]
    pub retries: i64,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error_id: Option<String>,
    pub status_url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImportJob {
    #[serde(flatten)]
    pub job: TransferJob,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExportJob {
    #[serde(flatten)]
    pub job: TransferJob,
    pub export_format: ExportFormat,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// How an import job locates the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferHeader {
    Auto,
    FirstRow,
    Header,
}

impl Display for InferHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferHeader::Auto => write!(f, "auto"),
            InferHeader::FirstRow => write!(f, "first_row"),
            InferHeader::Header => write!(f, "header"),
        }
    }
}

/// In-memory file uploaded with an import job
#[derive(Debug, Clone, PartialEq)]
pub struct ImportFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

/// Configuration for a new import job; set exactly one of `file` or `file_url`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportJobConfig {
    pub schema_name: Option<String>,
    pub infer_header: Option<InferHeader>,
    pub file_url: Option<String>,
    pub file: Option<ImportFile>,
}

/// Supported export file formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Xls,
    Parquet,
}

/// Configuration for a new export job; set exactly one of `query_string` or
/// `table_name`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportJobConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub export_format: ExportFormat,
}

// ============================================================================
// HTTP queries
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    pub database_name: String,
    pub query_string: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryResult {
    pub query_string: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub data: Vec<Vec<serde_json::Value>>,
}
