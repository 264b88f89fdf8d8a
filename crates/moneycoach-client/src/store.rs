//! Key-value persistence for the credential, the monthly budget and the
//! expense list.
//!
//! The layout is three named entries:
//!
//! - `moneyCoach_apiKey`: the credential string
//! - `moneyCoach_budget`: the monthly budget as decimal text
//! - `moneyCoach_expenses`: a JSON array of expense records, newest first
//!
//! [`Store::save`] is a partial update: only fields set on the
//! [`StoreUpdate`] are written.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::expense::ExpenseRecord;
use crate::migrations::run_pending;
use crate::state::{
    ensure_store_directory, map_sqlite_error, open_connection, resolve_store_home, store_db_path,
};
use crate::{ClientError, ClientResult};

pub const CREDENTIAL_KEY: &str = "moneyCoach_apiKey";
pub const BUDGET_KEY: &str = "moneyCoach_budget";
pub const EXPENSES_KEY: &str = "moneyCoach_expenses";
pub const STORE_KEYS: [&str; 3] = [CREDENTIAL_KEY, BUDGET_KEY, EXPENSES_KEY];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    pub credential: String,
    pub monthly_budget: u64,
    pub expenses: Vec<ExpenseRecord>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreUpdate {
    pub credential: Option<String>,
    pub monthly_budget: Option<u64>,
    pub expenses: Option<Vec<ExpenseRecord>>,
}

impl StoreUpdate {
    pub fn profile(credential: String, monthly_budget: u64) -> Self {
        Self {
            credential: Some(credential),
            monthly_budget: Some(monthly_budget),
            expenses: None,
        }
    }

    pub fn expenses(expenses: Vec<ExpenseRecord>) -> Self {
        Self {
            expenses: Some(expenses),
            ..Self::default()
        }
    }
}

pub trait Store {
    fn load(&self) -> ClientResult<StoreSnapshot>;

    fn save(&mut self, update: StoreUpdate) -> ClientResult<()>;

    /// Erases every entry unconditionally.
    fn reset(&mut self) -> ClientResult<()>;
}

pub struct SqliteStore {
    connection: Connection,
    db_path: PathBuf,
}

impl SqliteStore {
    pub fn open(home_override: Option<&Path>) -> ClientResult<Self> {
        let home = resolve_store_home(home_override)?;
        ensure_store_directory(&home)?;

        let db_path = store_db_path(&home);
        let mut connection = open_connection(&db_path)?;
        run_pending(&mut connection).map_err(|error| map_migration_error(&db_path, &error))?;
        debug!(db_path = %db_path.display(), "opened expense store");

        Ok(Self {
            connection,
            db_path,
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn read_value(&self, key: &str) -> ClientResult<Option<String>> {
        self.connection
            .query_row(
                "SELECT value FROM internal_store WHERE key = ?1 LIMIT 1",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|error| map_sqlite_error(&self.db_path, &error))
    }
}

impl Store for SqliteStore {
    fn load(&self) -> ClientResult<StoreSnapshot> {
        decode_snapshot(
            self.read_value(CREDENTIAL_KEY)?,
            self.read_value(BUDGET_KEY)?,
            self.read_value(EXPENSES_KEY)?,
        )
    }

    fn save(&mut self, update: StoreUpdate) -> ClientResult<()> {
        let entries = encode_update(&update)?;
        if entries.is_empty() {
            return Ok(());
        }

        let db_path = self.db_path.clone();
        let transaction = self
            .connection
            .transaction()
            .map_err(|error| map_sqlite_error(&db_path, &error))?;
        for (key, value) in &entries {
            transaction
                .execute(
                    "INSERT INTO internal_store (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                    params![key, value],
                )
                .map_err(|error| map_sqlite_error(&db_path, &error))?;
        }
        transaction
            .commit()
            .map_err(|error| map_sqlite_error(&db_path, &error))?;

        debug!(
            keys = ?entries.iter().map(|(key, _)| *key).collect::<Vec<&str>>(),
            "saved store entries"
        );
        Ok(())
    }

    fn reset(&mut self) -> ClientResult<()> {
        let removed = self
            .connection
            .execute(
                "DELETE FROM internal_store WHERE key IN (?1, ?2, ?3)",
                params![CREDENTIAL_KEY, BUDGET_KEY, EXPENSES_KEY],
            )
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
        debug!(removed, "reset expense store");
        Ok(())
    }
}

/// In-memory store with the same encoding as [`SqliteStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a raw entry, bypassing encoding. Useful for seeding corrupt data.
    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> ClientResult<StoreSnapshot> {
        decode_snapshot(
            self.entries.get(CREDENTIAL_KEY).cloned(),
            self.entries.get(BUDGET_KEY).cloned(),
            self.entries.get(EXPENSES_KEY).cloned(),
        )
    }

    fn save(&mut self, update: StoreUpdate) -> ClientResult<()> {
        for (key, value) in encode_update(&update)? {
            self.entries.insert(key.to_string(), value);
        }
        Ok(())
    }

    fn reset(&mut self) -> ClientResult<()> {
        for key in STORE_KEYS {
            self.entries.remove(key);
        }
        Ok(())
    }
}

fn decode_snapshot(
    credential: Option<String>,
    budget: Option<String>,
    expenses: Option<String>,
) -> ClientResult<StoreSnapshot> {
    let monthly_budget = match budget.as_deref().map(str::trim) {
        None | Some("") => 0,
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|error| ClientError::store_corrupt(BUDGET_KEY, &error.to_string()))?,
    };

    let expenses = match expenses.as_deref() {
        None => Vec::new(),
        Some(raw) => serde_json::from_str::<Vec<ExpenseRecord>>(raw)
            .map_err(|error| ClientError::store_corrupt(EXPENSES_KEY, &error.to_string()))?,
    };

    Ok(StoreSnapshot {
        credential: credential.unwrap_or_default(),
        monthly_budget,
        expenses,
    })
}

fn encode_update(update: &StoreUpdate) -> ClientResult<Vec<(&'static str, String)>> {
    let mut entries = Vec::with_capacity(STORE_KEYS.len());
    if let Some(credential) = &update.credential {
        entries.push((CREDENTIAL_KEY, credential.clone()));
    }
    if let Some(budget) = update.monthly_budget {
        entries.push((BUDGET_KEY, budget.to_string()));
    }
    if let Some(expenses) = &update.expenses {
        let encoded = serde_json::to_string(expenses)
            .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
        entries.push((EXPENSES_KEY, encoded));
    }
    Ok(entries)
}

fn map_migration_error(db_path: &Path, error: &rusqlite_migration::Error) -> ClientError {
    match error {
        rusqlite_migration::Error::RusqliteError { query: _, err } => {
            map_sqlite_error(db_path, err)
        }
        _ => ClientError::store_init_failed(db_path, &error.to_string()),
    }
}
