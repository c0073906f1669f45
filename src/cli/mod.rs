use std::io::{self, Write};

use colored::Colorize;
use indexmap::IndexMap;

use crate::{
    cli::{
        colors::SLATE_BLUE,
        messages::{highlight_argument, system_message},
        parsers::{CommandParser, ReplCommand},
    },
    server::{Server, ServerConfig},
    service::{ColumnInfo, TableService},
    sessions::session::Session,
    storage::EngineError,
};

mod colors;
mod messages;
pub mod parsers;
mod splash_screen;

const DEFAULT_LAST_COMMAND_DELIMITER: &str = "!";

const SLATE_ENGINE_COMMANDS_LIST: [(&str, &str); 17] = [
    ("!", "execute the last command, add more to go further back"),
    ("help", "list all available commands"),
    ("history", "list command history for this session"),
    ("tables", "list all tables"),
    ("columns <table>", "show the column layout of a table"),
    ("show <table>", "print the whole table as a grid"),
    ("create-db", "reset the store, dropping every table"),
    (
        "add-table <name> [col:type ...]",
        "create a table; types are str, char, int, real",
    ),
    ("drop-table <name>", "delete a table and all its rows"),
    ("add-column <table> <col:type>", "append a column"),
    ("drop-column <table> <col>", "remove a column"),
    ("add-row <table> [value ...]", "append a row, one value per column"),
    ("new-row <table>", "append an empty row"),
    ("del-row <table> <index>", "delete a row by 0-based index"),
    ("dedup <table>", "remove duplicate rows"),
    ("set <table> <row> <col> <value>", "update one cell"),
    (
        "erode",
        "slate weathers away and so does this session when you exit",
    ),
];

pub fn run_client() {
    splash_screen::splash_screen();

    let service = TableService::new();
    let session = Session::client(&service);

    println!(
        "{}",
        system_message(
            "info",
            format!("A fresh table store was created at the session level.")
        )
    );

    start_repl(session);
}

pub fn run_server() {
    let config = ServerConfig::from_env();

    println!(
        "{}",
        system_message(
            "system",
            format!(
                "Listening on '{}' with {} worker(s). Stop with Ctrl-C.",
                highlight_argument(&config.bind),
                config.workers
            ),
        )
    );

    let server = Server::new(config, TableService::new());
    if let Err(error) = server.run() {
        eprintln!(
            "{}",
            system_message("error", format!("Server stopped: {}", error))
        );
    }
}

pub fn show_help() {
    println!();
    println!("{:34} {}", "COMMAND".color(SLATE_BLUE), "DETAILS");
    for (command, details) in SLATE_ENGINE_COMMANDS_LIST {
        println!("{:34} {}", command.color(SLATE_BLUE), details)
    }
}

fn start_repl(mut session: Session) {
    println!(
        "{}",
        system_message(
            "system",
            format!(
                "Use '{}' to quit and '{}' to know all commands available.",
                highlight_argument("erode"),
                highlight_argument("help"),
            ),
        )
    );

    println!(
        "{}",
        system_message(
            "system",
            format!(
                "New session initiated at '{}'.",
                highlight_argument(&session.start_time_string())
            ),
        )
    );

    loop {
        println!();
        print!("{:6} > ", "slate".color(SLATE_BLUE).bold());
        io::stdout().flush().unwrap();

        let mut buffer = String::new();
        io::stdin().read_line(&mut buffer).unwrap();

        if buffer.starts_with(DEFAULT_LAST_COMMAND_DELIMITER) {
            let last = buffer.matches(DEFAULT_LAST_COMMAND_DELIMITER).count();
            let last_command = session.get_last_command(last);

            if last_command.is_none() {
                println!(
                    "{}",
                    system_message(
                        "system",
                        format!(
                            "No command {} steps back.",
                            highlight_argument(&last.to_string())
                        ),
                    )
                );
                continue;
            } else {
                buffer = last_command.unwrap().to_string();
            }
        }

        session.add_to_command_history(buffer.clone().trim());

        match buffer.trim() {
            "" => {}
            "history" => session.show_command_history(None),
            "help" => show_help(),
            "exit" => println!("did you mean '{}'?", "erode".color(SLATE_BLUE)),
            "erode" => break,
            command => match CommandParser::parse(command) {
                Ok(command) => {
                    let service = session.service();
                    match execute_command(&service, command) {
                        Ok(output) => println!("{}", output),
                        Err(error) => {
                            println!("{}", system_message("error", format!("{}", error)))
                        }
                    }
                }
                Err(parse_error) => {
                    println!("{}", system_message("parser", parse_error));
                }
            },
        }
    }

    println!("Goodbye!")
}

fn execute_command(service: &TableService, command: ReplCommand) -> Result<String, EngineError> {
    //! Run one parsed command against the service and build the text
    //! that the REPL prints for it.

    match command {
        ReplCommand::Tables => {
            let tables = service.get_tables();
            if tables.is_empty() {
                Ok(system_message("slate", "No tables yet.".to_string()))
            } else {
                Ok(tables.join("\n"))
            }
        }
        ReplCommand::Columns { table } => {
            let columns = service.get_columns_info(&table)?;
            if columns.is_empty() {
                Ok(system_message("slate", "No columns yet.".to_string()))
            } else {
                Ok(columns
                    .iter()
                    .map(|column| format!("{} ({})", column.column_name, column.column_type))
                    .collect::<Vec<String>>()
                    .join("\n"))
            }
        }
        ReplCommand::Show { table } => {
            let columns = service.get_columns_info(&table)?;
            let rows = service.display_table(&table)?;
            Ok(render_grid(&columns, &rows))
        }
        ReplCommand::CreateDb => {
            service.create_database();
            Ok(system_message("slate", "Store cleared.".to_string()))
        }
        ReplCommand::AddTable { table, columns } => {
            let column_info: Vec<ColumnInfo> = columns
                .into_iter()
                .map(|(column_name, column_type)| ColumnInfo {
                    column_name,
                    column_type,
                })
                .collect();
            service.add_table(&table, &column_info)?;
            Ok(system_message(
                "slate",
                format!("Table '{}' created.", highlight_argument(&table)),
            ))
        }
        ReplCommand::DropTable { table } => {
            service.remove_table(&table)?;
            Ok(system_message(
                "slate",
                format!("Table '{}' dropped.", highlight_argument(&table)),
            ))
        }
        ReplCommand::AddColumn { table, column } => {
            let (column_name, column_type) = column;
            service.add_column(
                &table,
                &ColumnInfo {
                    column_name,
                    column_type,
                },
            )?;
            Ok(system_message("slate", "Column added.".to_string()))
        }
        ReplCommand::DropColumn { table, column } => {
            service.delete_column(&table, &column)?;
            Ok(system_message("slate", "Column removed.".to_string()))
        }
        ReplCommand::AddRow { table, values } => {
            service.add_row(&table, &values)?;
            Ok(system_message("slate", "1 row(s) processed!".to_string()))
        }
        ReplCommand::NewRow { table } => {
            service.add_new_row(&table)?;
            Ok(system_message("slate", "1 row(s) processed!".to_string()))
        }
        ReplCommand::DelRow { table, index } => {
            service.delete_row(&table, index)?;
            Ok(system_message("slate", "1 row(s) processed!".to_string()))
        }
        ReplCommand::Dedup { table } => {
            let removed = service.remove_duplicates(&table)?;
            Ok(system_message(
                "slate",
                format!("{} duplicate row(s) removed.", removed),
            ))
        }
        ReplCommand::Set {
            table,
            row,
            column,
            value,
        } => {
            if service.update_table_cell(&table, row, &column, &value)? {
                Ok(system_message("slate", "Cell updated.".to_string()))
            } else {
                Ok(system_message(
                    "slate",
                    "Value rejected: it does not fit the column type.".to_string(),
                ))
            }
        }
    }
}

fn render_grid(columns: &[ColumnInfo], rows: &[IndexMap<String, String>]) -> String {
    //! Render a table as an aligned text grid, headers first, the way
    //! the desktop client would show it.

    if columns.is_empty() {
        return system_message("slate", "(table has no columns)".to_string());
    }

    let headers: Vec<String> = columns
        .iter()
        .map(|column| format!("{} ({})", column.column_name, column.column_type))
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|header| header.len()).collect();
    for row in rows {
        for (index, column) in columns.iter().enumerate() {
            let cell = row
                .get(&column.column_name)
                .map(String::as_str)
                .unwrap_or("");
            widths[index] = widths[index].max(cell.len());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        headers
            .iter()
            .zip(&widths)
            .map(|(header, width)| format!("{:width$}", header, width = width))
            .collect::<Vec<String>>()
            .join(" | "),
    );

    for row in rows {
        lines.push(
            columns
                .iter()
                .zip(&widths)
                .map(|(column, width)| {
                    let cell = row
                        .get(&column.column_name)
                        .map(String::as_str)
                        .unwrap_or("");
                    format!("{:width$}", cell, width = width)
                })
                .collect::<Vec<String>>()
                .join(" | "),
        );
    }

    lines.join("\n")
}
