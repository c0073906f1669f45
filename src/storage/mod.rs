//! In-memory storage is made of the following components
//! - Schema (ordered mapping of column names to declared types)
//! - Row (fixed-order tuple of typed values, aligned with the Schema)
//! - DynamicTable (one Schema and many Rows, multi-threadable)
//! - TableRegistry (every table of the running service)
//!

//  All modules of this lib
mod error;
mod registry;
mod row;
mod schema;
mod table;

//  External API
pub use error::{EngineError, ErrorKind};
pub use registry::TableRegistry;
pub use row::{Row, Value};
pub use schema::{ColumnType, Schema};
pub use table::DynamicTable;
