//! The synchronous operation surface of the engine.
//!
//! Transports (the TCP listener, the local REPL) never touch the
//! storage layer directly. They build a [`Request`], hand it to the
//! [`TableService`] facade, and get a [`Reply`] back; the facade does
//! the existence checks, takes the locks, and turns engine failures
//! into the structured error envelope.

mod facade;
mod protocol;

pub use facade::TableService;
pub use protocol::{ColumnInfo, Reply, Request};
