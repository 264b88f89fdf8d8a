use std::path::Path;

use chrono::{DateTime, Local, TimeZone};
use tracing::info;

use crate::ClientResult;
use crate::commands::common::{Reference, open_store};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::profile::BudgetProfile;
use crate::store::Store;
use crate::view::{DashboardView, build_dashboard};

#[derive(Debug, Default)]
pub struct DashRunOptions<'a> {
    pub home_override: Option<&'a Path>,
    pub reference: Reference,
}

pub fn run() -> ClientResult<SuccessEnvelope> {
    run_with_options(DashRunOptions::default())
}

#[doc(hidden)]
pub fn run_with_options(options: DashRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let store = open_store(options.home_override)?;
    let dashboard = match options.reference {
        Reference::Now => dashboard_in(&store, &Local::now())?,
        Reference::At(instant) => dashboard_in(&store, &instant)?,
    };
    success("dash", dashboard)
}

/// Re-reads the store and recomputes the whole dashboard.
pub fn dashboard_in<Tz: TimeZone>(
    store: &dyn Store,
    now: &DateTime<Tz>,
) -> ClientResult<DashboardView> {
    let snapshot = store.load()?;
    let profile = BudgetProfile::from_snapshot(&snapshot)?;
    info!(expenses = snapshot.expenses.len(), "rendering dashboard");
    Ok(build_dashboard(
        &snapshot.expenses,
        profile.monthly_budget,
        now,
    ))
}
