use std::path::Path;

use chrono::{DateTime, Local, TimeZone};
use tracing::info;

use crate::ClientResult;
use crate::commands::common::{Reference, open_store};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::ProfileData;
use crate::profile::{BudgetProfile, ProfileSummary};
use crate::store::{Store, StoreUpdate};
use crate::view::build_dashboard;

#[derive(Debug, Default)]
pub struct SetupRunOptions<'a> {
    pub api_key: String,
    pub budget: String,
    pub home_override: Option<&'a Path>,
    pub reference: Reference,
}

pub fn run(api_key: &str, budget: &str) -> ClientResult<SuccessEnvelope> {
    run_with_options(SetupRunOptions {
        api_key: api_key.to_string(),
        budget: budget.to_string(),
        ..SetupRunOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: SetupRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    // Validate before touching the filesystem so bad input never creates a store.
    let profile = BudgetProfile::parse(&options.api_key, &options.budget, "setup")?;
    let mut store = open_store(options.home_override)?;
    let data = match options.reference {
        Reference::Now => setup_in(&mut store, profile, &Local::now())?,
        Reference::At(instant) => setup_in(&mut store, profile, &instant)?,
    };
    success("setup", data)
}

pub fn setup_in<Tz: TimeZone>(
    store: &mut dyn Store,
    profile: BudgetProfile,
    now: &DateTime<Tz>,
) -> ClientResult<ProfileData> {
    store.save(StoreUpdate::profile(
        profile.credential.clone(),
        profile.monthly_budget,
    ))?;
    info!(monthly_budget = profile.monthly_budget, "profile saved");

    let snapshot = store.load()?;
    Ok(ProfileData {
        profile: ProfileSummary::from_snapshot(&snapshot),
        dashboard: build_dashboard(&snapshot.expenses, profile.monthly_budget, now),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::setup_in;
    use crate::profile::BudgetProfile;
    use crate::store::{MemoryStore, Store};

    #[test]
    fn setup_persists_profile_and_returns_dashboard() {
        let mut store = MemoryStore::new();
        let profile = BudgetProfile::parse("sk-setup-key-0001", "25000", "setup");
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).single();
        assert!(profile.is_ok() && now.is_some());
        if let (Ok(profile), Some(now)) = (profile, now) {
            let result = setup_in(&mut store, profile, &now);
            assert!(result.is_ok());
            if let Ok(data) = result {
                assert!(data.profile.configured);
                assert_eq!(data.profile.api_key, "sk-****0001");
                assert_eq!(data.dashboard.budget_display, "25,000");
            }
            assert!(matches!(store.load(), Ok(ref snapshot) if snapshot.monthly_budget == 25000));
        }
    }
}
