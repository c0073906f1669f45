use std::sync::{Arc, RwLock};

use indexmap::IndexMap;

use super::error::EngineError;
use super::schema::ColumnType;
use super::table::DynamicTable;

/// A single place to store every table of the running service.
///
/// Simply an [`IndexMap`] based registry pattern. The order prevails
/// and table names will always come back in the order they were
/// created.
///
/// Each table sits behind its own [`RwLock`] guarding schema and rows
/// together, so a column mutation and a row mutation on the same table
/// can never interleave. The registry itself is wrapped in one more
/// lock by the service facade; structural changes (create, drop, clear)
/// take that outer lock exclusively, while per-table calls only hold it
/// long enough to clone the table handle out.
///
/// The registry exclusively owns its tables: once a table is dropped
/// here, no handle to it is ever given out again.
pub struct TableRegistry {
    tables: IndexMap<String, Arc<RwLock<DynamicTable>>>,
}

impl TableRegistry {
    pub fn new() -> TableRegistry {
        TableRegistry {
            tables: IndexMap::new(),
        }
    }

    pub fn clear(&mut self) {
        //! Drop every table unconditionally. Backs the create-database
        //! call, which resets the whole store.

        self.tables = IndexMap::new();
    }

    pub fn add_table(
        &mut self,
        table_name: &str,
        columns: Vec<(String, ColumnType)>,
    ) -> Result<(), EngineError> {
        //! Create a new empty table under `table_name` with the given
        //! initial columns (possibly none).

        if self.tables.contains_key(table_name) {
            return Err(EngineError::TableAlreadyExists {
                table: table_name.to_string(),
            });
        }

        let table = DynamicTable::new(table_name.to_string(), columns)?;
        self.tables
            .insert(table_name.to_string(), Arc::new(RwLock::new(table)));

        Ok(())
    }

    pub fn remove_table(&mut self, table_name: &str) -> Result<(), EngineError> {
        //! Delete the named table and all its rows.

        if self.tables.shift_remove(table_name).is_none() {
            return Err(EngineError::TableNotFound {
                table: table_name.to_string(),
            });
        }

        Ok(())
    }

    pub fn get(&self, table_name: &str) -> Result<Arc<RwLock<DynamicTable>>, EngineError> {
        //! Get a shared handle to the named table. Every per-table
        //! operation goes through here first, so a missing table is
        //! reported before any further validation happens.

        self.tables
            .get(table_name)
            .map(Arc::clone)
            .ok_or_else(|| EngineError::TableNotFound {
                table: table_name.to_string(),
            })
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub fn contains(&self, table_name: &str) -> bool {
        self.tables.contains_key(table_name)
    }
}
