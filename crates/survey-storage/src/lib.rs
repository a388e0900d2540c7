//! # survey-storage
//!
//! SQLite persistence for uploaded workbooks, question catalogs, responses,
//! and narratives. One serialized writer plus a round-robin read pool,
//! schema versioned through `PRAGMA user_version`.

pub mod connection;
pub mod migrations;
pub mod queries;
pub mod retention;

pub use connection::writer::with_immediate_transaction;
pub use connection::DatabaseManager;
pub use queries::util::{now_secs, sqlite_error};
