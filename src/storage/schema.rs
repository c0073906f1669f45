use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of types a column can be declared with.
///
/// The names are the ones clients see on the wire and in the grid
/// header, so they serialize verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    String,
    Char,
    Integer,
    Real,
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ColumnType::String => "String",
            ColumnType::Char => "Char",
            ColumnType::Integer => "Integer",
            ColumnType::Real => "Real",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(raw: &str) -> Result<ColumnType, String> {
        match raw {
            "String" => Ok(ColumnType::String),
            "Char" => Ok(ColumnType::Char),
            "Integer" => Ok(ColumnType::Integer),
            "Real" => Ok(ColumnType::Real),
            other => Err(format!("invalid datatype {}: not supported", other)),
        }
    }
}

/// An ordered list of (column name, declared type) pairs.
///
/// Order is significant: it defines the tuple layout of every row in the
/// owning table and the order columns appear in on the wire. The schema
/// itself is a dumb container; uniqueness of names is enforced by
/// [`super::DynamicTable`], which knows the table name for error reporting.
pub struct Schema(Vec<(String, ColumnType)>);

impl Schema {
    pub fn new() -> Schema {
        Schema(Vec::new())
    }

    pub fn position(&self, column_name: &str) -> Option<usize> {
        //! Find the tuple position of the named column, if present.

        self.0.iter().position(|(name, _)| name == column_name)
    }

    pub fn push(&mut self, column_name: String, declared: ColumnType) {
        self.0.push((column_name, declared));
    }

    pub fn remove(&mut self, position: usize) -> (String, ColumnType) {
        self.0.remove(position)
    }

    pub fn columns(&self) -> &[(String, ColumnType)] {
        //! Get the column list as a read-only slice, in declaration order.

        self.0.as_slice()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let columns: Vec<String> = self
            .0
            .iter()
            .map(|(name, declared)| format!("{} ({})", name.as_str(), declared))
            .collect();
        write!(f, "{}", columns.join(" | "))
    }
}
