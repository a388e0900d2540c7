//! Query modules, one per table.

pub mod files;
pub mod history;
pub mod narratives;
pub mod questions;
pub mod respondents;
pub mod responses;
pub mod util;
