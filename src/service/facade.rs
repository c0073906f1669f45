use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use log::{debug, info, warn};

use crate::service::protocol::{ColumnInfo, Reply, Request};
use crate::storage::{DynamicTable, EngineError, TableRegistry};

/// The executor class that runs the operations.
///
/// Every transport gets a clone of this facade and calls
/// [`TableService::dispatch`] with each inbound request. The facade
/// owns the registry it was built around; there is no process-global
/// state, so two services in one process are two independent stores
/// (handy for tests, mostly).
///
/// Locking discipline, the same in every per-table branch: take the
/// registry read lock just long enough to clone the table handle out,
/// then take that table's own lock for the actual work. Structural
/// calls (create database, add/remove table) take the registry write
/// lock instead. Nothing does I/O while holding either lock.
#[derive(Clone)]
pub struct TableService {
    registry: Arc<RwLock<TableRegistry>>,
}

impl TableService {
    pub fn new() -> TableService {
        //! A service over a fresh, empty registry.

        TableService {
            registry: Arc::new(RwLock::new(TableRegistry::new())),
        }
    }

    fn _get_table(&self, table_name: &str) -> Result<Arc<RwLock<DynamicTable>>, EngineError> {
        let registry = self.registry.read().unwrap();
        registry.get(table_name)
    }

    pub fn create_database(&self) {
        //! Reset the store, dropping every table. Cannot fail.

        let mut registry = self.registry.write().unwrap();
        registry.clear();
        info!("store cleared");
    }

    pub fn add_table(
        &self,
        table_name: &str,
        column_info: &[ColumnInfo],
    ) -> Result<(), EngineError> {
        let columns = column_info
            .iter()
            .map(|info| (info.column_name.clone(), info.column_type))
            .collect();

        let mut registry = self.registry.write().unwrap();
        registry.add_table(table_name, columns)?;
        info!("table created: {}", table_name);
        Ok(())
    }

    pub fn remove_table(&self, table_name: &str) -> Result<(), EngineError> {
        let mut registry = self.registry.write().unwrap();
        registry.remove_table(table_name)?;
        info!("table dropped: {}", table_name);
        Ok(())
    }

    pub fn add_column(&self, table_name: &str, column_info: &ColumnInfo) -> Result<(), EngineError> {
        let table = self._get_table(table_name)?;
        let mut table = table.write().unwrap();
        table.add_column(&column_info.column_name, column_info.column_type)
    }

    pub fn delete_column(&self, table_name: &str, column_name: &str) -> Result<(), EngineError> {
        let table = self._get_table(table_name)?;
        let mut table = table.write().unwrap();
        table.delete_column(column_name)
    }

    pub fn add_row(&self, table_name: &str, values: &[String]) -> Result<(), EngineError> {
        let table = self._get_table(table_name)?;
        let mut table = table.write().unwrap();
        table.add_row(values)
    }

    pub fn add_new_row(&self, table_name: &str) -> Result<(), EngineError> {
        let table = self._get_table(table_name)?;
        let mut table = table.write().unwrap();
        table.add_default_row();
        Ok(())
    }

    pub fn delete_row(&self, table_name: &str, row_index: usize) -> Result<(), EngineError> {
        let table = self._get_table(table_name)?;
        let mut table = table.write().unwrap();
        table.remove_row(row_index).map(|_| ())
    }

    pub fn remove_duplicates(&self, table_name: &str) -> Result<usize, EngineError> {
        let table = self._get_table(table_name)?;
        let mut table = table.write().unwrap();
        Ok(table.remove_duplicates())
    }

    pub fn get_columns_info(&self, table_name: &str) -> Result<Vec<ColumnInfo>, EngineError> {
        //! Read-only projection of the table's column layout.

        let table = self._get_table(table_name)?;
        let table = table.read().unwrap();
        Ok(table
            .columns_info()
            .into_iter()
            .map(|(column_name, column_type)| ColumnInfo {
                column_name,
                column_type,
            })
            .collect())
    }

    pub fn get_tables(&self) -> Vec<String> {
        let registry = self.registry.read().unwrap();
        registry.table_names()
    }

    pub fn display_table(
        &self,
        table_name: &str,
    ) -> Result<Vec<IndexMap<String, String>>, EngineError> {
        //! Read-only projection of every row, rendered to text.

        let table = self._get_table(table_name)?;
        let table = table.read().unwrap();
        Ok(table.render_rows())
    }

    pub fn update_table_cell(
        &self,
        table_name: &str,
        row_index: usize,
        column_name: &str,
        value: &str,
    ) -> Result<bool, EngineError> {
        let table = self._get_table(table_name)?;
        let mut table = table.write().unwrap();
        table.update_cell(row_index, column_name, value)
    }

    pub fn dispatch(&self, request: Request) -> Reply {
        //! Run one request and fold its outcome into a wire reply.
        //!
        //! This is the single place engine errors become the (kind,
        //! message) envelope, so transports stay dumb.

        debug!("dispatching {}", request.operation());

        let reply = match request {
            Request::CreateDatabase => {
                self.create_database();
                Reply::Ok
            }
            Request::AddTable {
                table_name,
                column_info,
            } => Self::_unit(self.add_table(&table_name, &column_info)),
            Request::RemoveTable { table_name } => Self::_unit(self.remove_table(&table_name)),
            Request::AddColumn {
                table_name,
                column_info,
            } => Self::_unit(self.add_column(&table_name, &column_info)),
            Request::DeleteColumn {
                table_name,
                column_name,
            } => Self::_unit(self.delete_column(&table_name, &column_name)),
            Request::AddRow { table_name, values } => Self::_unit(self.add_row(&table_name, &values)),
            Request::AddNewRow { table_name } => Self::_unit(self.add_new_row(&table_name)),
            Request::DeleteRow {
                table_name,
                row_index,
            } => Self::_unit(self.delete_row(&table_name, row_index)),
            Request::RemoveDuplicates { table_name } => {
                Self::_unit(self.remove_duplicates(&table_name).map(|_| ()))
            }
            Request::GetColumnsInfo { table_name } => match self.get_columns_info(&table_name) {
                Ok(columns_info) => Reply::ColumnsInfo { columns_info },
                Err(error) => Reply::failure(error),
            },
            Request::GetTables => Reply::Tables {
                tables: self.get_tables(),
            },
            Request::DisplayTable { table_name } => match self.display_table(&table_name) {
                Ok(rows) => Reply::Rows { rows },
                Err(error) => Reply::failure(error),
            },
            Request::UpdateTableCell {
                table_name,
                row_index,
                col_name,
                value,
            } => match self.update_table_cell(&table_name, row_index, &col_name, &value) {
                Ok(success) => Reply::CellUpdate { success },
                Err(error) => Reply::failure(error),
            },
        };

        if let Reply::Error { kind, message } = &reply {
            warn!("request failed ({:?}): {}", kind, message);
        }

        reply
    }

    fn _unit(result: Result<(), EngineError>) -> Reply {
        match result {
            Ok(()) => Reply::Ok,
            Err(error) => Reply::failure(error),
        }
    }
}
