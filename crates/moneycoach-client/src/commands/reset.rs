use std::path::Path;

use tracing::warn;

use crate::commands::common::open_store;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::ResetData;
use crate::store::{STORE_KEYS, Store};
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct ResetRunOptions<'a> {
    pub confirmed: bool,
    pub home_override: Option<&'a Path>,
}

pub fn run(confirmed: bool) -> ClientResult<SuccessEnvelope> {
    run_with_options(ResetRunOptions {
        confirmed,
        home_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ResetRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    if !options.confirmed {
        return Err(ClientError::confirmation_required());
    }
    let mut store = open_store(options.home_override)?;
    let mut data = reset_in(&mut store)?;
    data.store_path = Some(store.db_path().display().to_string());
    success("reset", data)
}

/// Erases the credential, the budget and every expense.
pub fn reset_in(store: &mut dyn Store) -> ClientResult<ResetData> {
    store.reset()?;
    warn!("all stored data erased");
    Ok(ResetData {
        cleared_keys: STORE_KEYS.iter().map(|key| (*key).to_string()).collect(),
        store_path: None,
    })
}
