use std::path::Path;

use chrono::{DateTime, FixedOffset};

use crate::ClientResult;
use crate::store::SqliteStore;

/// Evaluation instant for a command: the local wall clock unless a fixed
/// instant is supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reference {
    #[default]
    Now,
    At(DateTime<FixedOffset>),
}

pub(crate) fn open_store(home_override: Option<&Path>) -> ClientResult<SqliteStore> {
    SqliteStore::open(home_override)
}
