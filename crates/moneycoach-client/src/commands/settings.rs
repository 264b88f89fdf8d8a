use std::path::Path;

use chrono::{DateTime, Local, TimeZone};
use tracing::info;

use crate::commands::common::{Reference, open_store};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::ProfileData;
use crate::profile::{BudgetProfile, ProfileSummary};
use crate::store::{Store, StoreUpdate};
use crate::view::build_dashboard;
use crate::{ClientError, ClientResult};

const UPDATE_COMMAND: &str = "settings update";

#[derive(Debug, Default)]
pub struct SettingsUpdateOptions<'a> {
    pub api_key: Option<String>,
    pub budget: Option<String>,
    pub home_override: Option<&'a Path>,
    pub reference: Reference,
}

pub fn show() -> ClientResult<SuccessEnvelope> {
    show_with_home_override(None)
}

#[doc(hidden)]
pub fn show_with_home_override(home_override: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    let store = open_store(home_override)?;
    success("settings show", show_in(&store)?)
}

pub fn show_in(store: &dyn Store) -> ClientResult<ProfileSummary> {
    let snapshot = store.load()?;
    Ok(ProfileSummary::from_snapshot(&snapshot))
}

pub fn update(api_key: Option<&str>, budget: Option<&str>) -> ClientResult<SuccessEnvelope> {
    update_with_options(SettingsUpdateOptions {
        api_key: api_key.map(std::string::ToString::to_string),
        budget: budget.map(std::string::ToString::to_string),
        ..SettingsUpdateOptions::default()
    })
}

#[doc(hidden)]
pub fn update_with_options(options: SettingsUpdateOptions<'_>) -> ClientResult<SuccessEnvelope> {
    if options.api_key.is_none() && options.budget.is_none() {
        return Err(ClientError::invalid_argument_for_command(
            "Provide `--api-key`, `--budget`, or both.",
            Some(UPDATE_COMMAND),
        ));
    }

    let mut store = open_store(options.home_override)?;
    let api_key = options.api_key.as_deref();
    let budget = options.budget.as_deref();
    let data = match options.reference {
        Reference::Now => update_in(&mut store, api_key, budget, &Local::now())?,
        Reference::At(instant) => update_in(&mut store, api_key, budget, &instant)?,
    };
    success("settings update", data)
}

/// Applies the given fields over the stored profile. The merged profile is
/// validated as a whole before anything is written.
pub fn update_in<Tz: TimeZone>(
    store: &mut dyn Store,
    api_key: Option<&str>,
    budget: Option<&str>,
    now: &DateTime<Tz>,
) -> ClientResult<ProfileData> {
    let current = store.load()?;
    let stored_budget = current.monthly_budget.to_string();
    let profile = BudgetProfile::parse(
        api_key.unwrap_or(&current.credential),
        budget.unwrap_or(&stored_budget),
        UPDATE_COMMAND,
    )?;

    store.save(StoreUpdate::profile(
        profile.credential.clone(),
        profile.monthly_budget,
    ))?;
    info!(monthly_budget = profile.monthly_budget, "settings updated");

    let snapshot = store.load()?;
    Ok(ProfileData {
        profile: ProfileSummary::from_snapshot(&snapshot),
        dashboard: build_dashboard(&snapshot.expenses, profile.monthly_budget, now),
    })
}
