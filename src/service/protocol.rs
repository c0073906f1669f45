use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::storage::{ColumnType, EngineError, ErrorKind};

/// One column descriptor as it crosses the wire, matching the field
/// names the desktop client serializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ColumnInfo {
    pub column_name: String,
    pub column_type: ColumnType,
}

/// Every operation the service accepts, tagged by an `op` field.
///
/// Encoded as one JSON object per line on the TCP transport. Field
/// names are camelCase to match the original client traffic
/// (`tableName`, `columnInfo`, `rowIndex`, `colName`). Row indices are
/// 0-based everywhere; see DESIGN.md for the convention decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Request {
    CreateDatabase,
    #[serde(rename_all = "camelCase")]
    AddTable {
        table_name: String,
        column_info: Vec<ColumnInfo>,
    },
    #[serde(rename_all = "camelCase")]
    RemoveTable { table_name: String },
    #[serde(rename_all = "camelCase")]
    AddColumn {
        table_name: String,
        column_info: ColumnInfo,
    },
    #[serde(rename_all = "camelCase")]
    DeleteColumn {
        table_name: String,
        column_name: String,
    },
    #[serde(rename_all = "camelCase")]
    AddRow {
        table_name: String,
        values: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    AddNewRow { table_name: String },
    #[serde(rename_all = "camelCase")]
    DeleteRow {
        table_name: String,
        row_index: usize,
    },
    #[serde(rename_all = "camelCase")]
    RemoveDuplicates { table_name: String },
    #[serde(rename_all = "camelCase")]
    GetColumnsInfo { table_name: String },
    GetTables,
    #[serde(rename_all = "camelCase")]
    DisplayTable { table_name: String },
    #[serde(rename_all = "camelCase")]
    UpdateTableCell {
        table_name: String,
        row_index: usize,
        col_name: String,
        value: String,
    },
}

impl Request {
    pub fn operation(&self) -> &'static str {
        //! The operation name, for log lines.

        match self {
            Request::CreateDatabase => "CreateDatabase",
            Request::AddTable { .. } => "AddTable",
            Request::RemoveTable { .. } => "RemoveTable",
            Request::AddColumn { .. } => "AddColumn",
            Request::DeleteColumn { .. } => "DeleteColumn",
            Request::AddRow { .. } => "AddRow",
            Request::AddNewRow { .. } => "AddNewRow",
            Request::DeleteRow { .. } => "DeleteRow",
            Request::RemoveDuplicates { .. } => "RemoveDuplicates",
            Request::GetColumnsInfo { .. } => "GetColumnsInfo",
            Request::GetTables => "GetTables",
            Request::DisplayTable { .. } => "DisplayTable",
            Request::UpdateTableCell { .. } => "UpdateTableCell",
        }
    }
}

/// Every shape a reply can take, tagged by a `result` field.
///
/// `CellUpdate` is the one soft-failure carrier: a cell value the
/// column type rejected comes back as `success: false` rather than an
/// `Error`, because a bad edit from a grid is routine, not a protocol
/// fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum Reply {
    Ok,
    Tables {
        tables: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    ColumnsInfo {
        columns_info: Vec<ColumnInfo>,
    },
    Rows {
        rows: Vec<IndexMap<String, String>>,
    },
    CellUpdate {
        success: bool,
    },
    Error {
        kind: ErrorKind,
        message: String,
    },
}

impl Reply {
    pub fn failure(error: EngineError) -> Reply {
        Reply::Error {
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    pub fn bad_request(message: String) -> Reply {
        //! The transport-level reply for a line that never parsed into
        //! a [`Request`] at all.

        Reply::Error {
            kind: ErrorKind::BadRequest,
            message,
        }
    }
}
