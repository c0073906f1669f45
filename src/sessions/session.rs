//! The only point of truth for all information that is related to the
//! current user session in the engine. A session contains the command
//! history of the REPL user, the session start time, and the handle to
//! the table service the commands run against.
//!
//! A session is discarded when the REPL exits; nothing about it is
//! persisted anywhere.

use std::{fmt::Display, time::SystemTime};

use chrono::{DateTime, Local};

use crate::service::TableService;

struct CommandHistory {
    command: String,
    command_time: SystemTime,
}

impl CommandHistory {
    pub fn command_time_string(&self) -> String {
        let datetime: DateTime<Local> = self.command_time.into();
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

impl Display for CommandHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.command_time_string(), self.command)
    }
}

pub struct Session {
    command_history: Vec<CommandHistory>,
    start_time: SystemTime,
    service: TableService,
}

impl Session {
    pub fn client(service: &TableService) -> Session {
        //! Returns a new client session over the given service.

        Session {
            command_history: vec![],
            start_time: SystemTime::now(),
            service: service.clone(),
        }
    }

    pub fn service(&self) -> TableService {
        //! Get a handle to the table service this session talks to.

        self.service.clone()
    }

    pub fn add_to_command_history(&mut self, command: &str) {
        self.command_history.push(CommandHistory {
            command: command.to_string(),
            command_time: SystemTime::now(),
        });
    }

    pub fn start_time_string(&self) -> String {
        //! Convert the [`SystemTime`] object into a string representation
        //! to be more readable.

        let datetime: DateTime<Local> = self.start_time.into();
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn show_command_history(&self, n_prev: Option<usize>) {
        //! Show the list of previously invoked commands.
        //! Use `n_prev` to limit the number of commands you see.

        let limit = n_prev.unwrap_or(self.command_history.len());

        for (index, command) in self.command_history.iter().rev().enumerate() {
            if index < limit {
                println!("{:3} | {}", index, command);
            }
        }
    }

    pub fn get_last_command(&self, nth_back: usize) -> Option<&str> {
        //! Gets the `nth_back` last command from the history.

        self.command_history
            .iter()
            .nth_back(nth_back - 1)
            .map(|cmd| cmd.command.as_str())
    }
}
