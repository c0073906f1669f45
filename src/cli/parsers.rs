//! The place where the CLI argument parser and the REPL command parser
//! are defined.
//!
//! The REPL speaks a small keyword language rather than SQL; each line
//! is one command, tokenized on whitespace.

use clap::{Parser, ValueEnum, arg, command};

use crate::storage::ColumnType;

#[derive(Parser)]
#[command(name = "slate")]
#[command(about = "A Rust-powered remote table store", long_about = None)]
pub struct CliParser {
    // Either operate in the client or server mode.
    #[arg(required = true)]
    pub mode: Option<CliMode>,
}

#[derive(Clone, ValueEnum)]
pub enum CliMode {
    // Start a deployment that listens for requests.
    Server,

    // Start a REPL client instance (no-remote).
    Client,
}

/// One parsed REPL line, ready for execution against the service.
pub enum ReplCommand {
    Tables,
    Columns { table: String },
    Show { table: String },
    CreateDb,
    AddTable { table: String, columns: Vec<(String, ColumnType)> },
    DropTable { table: String },
    AddColumn { table: String, column: (String, ColumnType) },
    DropColumn { table: String, column: String },
    AddRow { table: String, values: Vec<String> },
    NewRow { table: String },
    DelRow { table: String, index: usize },
    Dedup { table: String },
    Set { table: String, row: usize, column: String, value: String },
}

/// The keyword parser for REPL lines.
pub struct CommandParser;

impl CommandParser {
    fn _parse_column_def(definition: &str) -> Result<(String, ColumnType), String> {
        //! Parse a `name:type` column definition. The type accepts the short
        //! forms str/char/int/real as well as the wire names.

        let (name, raw_type) = definition
            .split_once(':')
            .ok_or_else(|| format!("invalid column definition '{}': expected name:type", definition))?;

        if name.is_empty() {
            return Err(format!(
                "invalid column definition '{}': empty column name",
                definition
            ));
        }

        let declared = match raw_type {
            "str" | "string" | "String" => ColumnType::String,
            "char" | "Char" => ColumnType::Char,
            "int" | "integer" | "Integer" => ColumnType::Integer,
            "real" | "Real" => ColumnType::Real,
            other => {
                return Err(format!(
                    "invalid datatype {}: not supported, on column {}",
                    other, name
                ));
            }
        };

        Ok((name.to_string(), declared))
    }

    fn _parse_row_index(raw: &str) -> Result<usize, String> {
        raw.parse::<usize>()
            .map_err(|_| format!("invalid row index '{}': expected a 0-based number", raw))
    }

    pub fn parse(input: &str) -> Result<ReplCommand, String> {
        //! Parse one REPL line into a [`ReplCommand`].
        //!
        //! Returns a usage string as the error for anything malformed.

        let tokens: Vec<&str> = input.split_whitespace().collect();
        let (keyword, args) = tokens
            .split_first()
            .ok_or_else(|| "empty command".to_string())?;

        match (*keyword, args) {
            ("tables", []) => Ok(ReplCommand::Tables),
            ("columns", [table]) => Ok(ReplCommand::Columns {
                table: table.to_string(),
            }),
            ("show", [table]) => Ok(ReplCommand::Show {
                table: table.to_string(),
            }),
            ("create-db", []) => Ok(ReplCommand::CreateDb),
            ("add-table", [table, definitions @ ..]) => {
                let columns = definitions
                    .iter()
                    .map(|definition| Self::_parse_column_def(definition))
                    .collect::<Result<Vec<_>, String>>()?;
                Ok(ReplCommand::AddTable {
                    table: table.to_string(),
                    columns,
                })
            }
            ("drop-table", [table]) => Ok(ReplCommand::DropTable {
                table: table.to_string(),
            }),
            ("add-column", [table, definition]) => Ok(ReplCommand::AddColumn {
                table: table.to_string(),
                column: Self::_parse_column_def(definition)?,
            }),
            ("drop-column", [table, column]) => Ok(ReplCommand::DropColumn {
                table: table.to_string(),
                column: column.to_string(),
            }),
            ("add-row", [table, values @ ..]) => Ok(ReplCommand::AddRow {
                table: table.to_string(),
                values: values.iter().map(|value| value.to_string()).collect(),
            }),
            ("new-row", [table]) => Ok(ReplCommand::NewRow {
                table: table.to_string(),
            }),
            ("del-row", [table, index]) => Ok(ReplCommand::DelRow {
                table: table.to_string(),
                index: Self::_parse_row_index(index)?,
            }),
            ("dedup", [table]) => Ok(ReplCommand::Dedup {
                table: table.to_string(),
            }),
            ("set", [table, row, column, value @ ..]) => Ok(ReplCommand::Set {
                table: table.to_string(),
                row: Self::_parse_row_index(row)?,
                column: column.to_string(),
                value: value.join(" "),
            }),
            ("tables" | "create-db", _) => Err(format!("usage: {}", keyword)),
            ("columns" | "show" | "drop-table" | "new-row" | "dedup", _) => {
                Err(format!("usage: {} <table>", keyword))
            }
            ("add-table", _) => Err("usage: add-table <name> [col:type ...]".to_string()),
            ("add-column", _) => Err("usage: add-column <table> <col:type>".to_string()),
            ("drop-column", _) => Err("usage: drop-column <table> <col>".to_string()),
            ("add-row", _) => Err("usage: add-row <table> [value ...]".to_string()),
            ("del-row", _) => Err("usage: del-row <table> <index>".to_string()),
            ("set", _) => Err("usage: set <table> <row> <col> <value>".to_string()),
            (other, _) => Err(format!("unknown command '{}', try 'help'", other)),
        }
    }
}
