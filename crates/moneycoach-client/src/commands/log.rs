use std::path::Path;

use chrono::{DateTime, Local, TimeZone, Utc};
use tracing::{error, info, warn};

use crate::ClientResult;
use crate::aggregate::{SpendingSnapshot, analyze_spending};
use crate::coach::{CoachClient, CoachReply};
use crate::commands::common::{Reference, open_store};
use crate::config::CoachConfig;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{CoachData, LogData};
use crate::expense::{ExpenseRecord, NewExpense, next_record_id};
use crate::profile::BudgetProfile;
use crate::store::{Store, StoreUpdate};
use crate::view::{DashboardView, build_dashboard};

#[derive(Debug, Default)]
pub struct LogRunOptions<'a> {
    pub description: String,
    pub amount: String,
    pub category: Option<String>,
    pub home_override: Option<&'a Path>,
    pub reference: Reference,
    /// `None` records the expense without asking the coach. An unusable
    /// config still records the expense and resolves to the fallback reply.
    pub coach: Option<ClientResult<CoachConfig>>,
}

/// A persisted expense together with everything derived from the list it
/// was added to.
#[derive(Debug, Clone)]
pub struct LoggedExpense {
    pub record: ExpenseRecord,
    pub profile: BudgetProfile,
    pub snapshot: SpendingSnapshot,
    pub dashboard: DashboardView,
}

impl LoggedExpense {
    pub fn into_data(self, coach: Option<CoachReply>) -> LogData {
        LogData {
            expense: self.record,
            snapshot: self.snapshot,
            dashboard: self.dashboard,
            coach: coach.map(CoachData::from_reply),
        }
    }
}

pub fn run(description: &str, amount: &str, category: Option<&str>) -> ClientResult<SuccessEnvelope> {
    run_with_options(LogRunOptions {
        description: description.to_string(),
        amount: amount.to_string(),
        category: category.map(std::string::ToString::to_string),
        coach: Some(CoachConfig::from_env()),
        ..LogRunOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: LogRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let logged = record_with_options(&options)?;
    let reply = options
        .coach
        .map(|config| coach_blocking(&logged, config));
    success("log", logged.into_data(reply))
}

/// Validates and persists the expense without contacting the coach.
#[doc(hidden)]
pub fn record_with_options(options: &LogRunOptions<'_>) -> ClientResult<LoggedExpense> {
    let input = NewExpense::parse(
        &options.description,
        &options.amount,
        options.category.as_deref(),
    )?;
    let mut store = open_store(options.home_override)?;
    match options.reference {
        Reference::Now => record_in(&mut store, input, &Local::now()),
        Reference::At(instant) => record_in(&mut store, input, &instant),
    }
}

/// Prepends the expense to the stored list and recomputes the weekly
/// figures. Nothing is written unless setup is complete.
pub fn record_in<Tz: TimeZone>(
    store: &mut dyn Store,
    input: NewExpense,
    now: &DateTime<Tz>,
) -> ClientResult<LoggedExpense> {
    let snapshot = store.load()?;
    let profile = BudgetProfile::from_snapshot(&snapshot)?;

    let newest_id = snapshot.expenses.iter().map(|expense| expense.id).max();
    let id = next_record_id(&now.with_timezone(&Utc), newest_id);
    let record = ExpenseRecord::new(id, input.description, input.amount, input.category, now);

    let mut expenses = snapshot.expenses;
    expenses.insert(0, record.clone());
    store.save(StoreUpdate::expenses(expenses.clone()))?;
    info!(
        expense_id = record.id,
        category = %record.category,
        total = expenses.len(),
        "expense recorded"
    );

    let spending = analyze_spending(&expenses, record.category, now);
    let dashboard = build_dashboard(&expenses, profile.monthly_budget, now);
    Ok(LoggedExpense {
        record,
        profile,
        snapshot: spending,
        dashboard,
    })
}

/// Asks the coach about `logged` and blocks until the reply arrives or the
/// user interrupts with Ctrl-C. Never fails: every problem, including a
/// config that could not be resolved, becomes a [`CoachReply::Failure`].
pub fn coach_blocking(logged: &LoggedExpense, config: ClientResult<CoachConfig>) -> CoachReply {
    let config = match config {
        Ok(config) => config,
        Err(config_error) => {
            error!(
                expense_id = logged.record.id,
                error = %config_error,
                "coach config is unusable"
            );
            return CoachReply::Failure {
                reason: config_error.message,
            };
        }
    };
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(build_error) => {
            error!(error = %build_error, "failed to start coach runtime");
            return CoachReply::Failure {
                reason: build_error.to_string(),
            };
        }
    };
    runtime.block_on(request_until_interrupted(logged, config))
}

async fn request_until_interrupted(logged: &LoggedExpense, config: CoachConfig) -> CoachReply {
    let client = match CoachClient::new(config) {
        Ok(client) => client,
        Err(client_error) => {
            error!(error = %client_error, "failed to build coach client");
            return CoachReply::Failure {
                reason: client_error.message,
            };
        }
    };

    let task = client.spawn(
        logged.record.clone(),
        logged.profile.clone(),
        logged.snapshot.clone(),
    );
    let token = task.cancellation_token();
    let reply = task.wait();
    tokio::pin!(reply);

    tokio::select! {
        settled = &mut reply => settled,
        Ok(()) = tokio::signal::ctrl_c() => {
            warn!(expense_id = logged.record.id, "coach request interrupted");
            token.cancel();
            reply.await
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, FixedOffset, TimeZone};

    use super::record_in;
    use crate::expense::{Category, NewExpense};
    use crate::prompt::build_coach_prompt;
    use crate::store::{MemoryStore, Store, StoreUpdate};

    fn ist() -> Option<FixedOffset> {
        FixedOffset::east_opt(5 * 3600 + 1800)
    }

    fn configured_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        assert!(
            store
                .save(StoreUpdate::profile("sk-log-flow".to_string(), 20000))
                .is_ok()
        );
        store
    }

    #[test]
    fn coffee_entry_counts_itself() {
        let mut store = configured_store();
        let input = NewExpense::parse("Latte", "150", Some("coffee"));
        let now = ist().and_then(|tz| tz.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).single());
        assert!(input.is_ok() && now.is_some());
        if let (Ok(input), Some(now)) = (input, now) {
            let result = record_in(&mut store, input, &now);
            assert!(result.is_ok());
            if let Ok(logged) = result {
                assert_eq!(logged.snapshot.category, Category::Coffee);
                assert_eq!(logged.snapshot.category_count, 1);
                assert_eq!(logged.snapshot.coffee_count, 1);
                assert!((logged.snapshot.week_total - 150.0).abs() < f64::EPSILON);
                assert_eq!(logged.record.date, "14/10/2026");
                let prompt = build_coach_prompt(
                    &logged.record,
                    &logged.snapshot,
                    logged.profile.monthly_budget,
                );
                assert!(prompt.contains("- Coffee/drinks count this week: 1"));
            }
        }
    }

    #[test]
    fn newest_expense_is_first_and_ids_increase() {
        let mut store = configured_store();
        let now = ist().and_then(|tz| tz.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).single());
        assert!(now.is_some());
        if let Some(now) = now {
            for description in ["Bus", "Lunch", "Movie"] {
                let input = NewExpense::parse(description, "80", None);
                assert!(input.is_ok());
                if let Ok(input) = input {
                    // Same instant every time: ids must still be distinct.
                    assert!(record_in(&mut store, input, &now).is_ok());
                }
            }
            let loaded = store.load();
            assert!(loaded.is_ok());
            if let Ok(snapshot) = loaded {
                let names = snapshot
                    .expenses
                    .iter()
                    .map(|expense| expense.description.as_str())
                    .collect::<Vec<&str>>();
                assert_eq!(names, ["Movie", "Lunch", "Bus"]);
                assert!(
                    snapshot
                        .expenses
                        .windows(2)
                        .all(|pair| pair[0].id > pair[1].id)
                );
                assert!(
                    snapshot
                        .expenses
                        .iter()
                        .all(|expense| expense.category == Category::Food)
                );
            }
        }
    }

    #[test]
    fn expenses_before_sunday_do_not_count() {
        let mut store = configured_store();
        let last_week = ist().and_then(|tz| tz.with_ymd_and_hms(2026, 10, 10, 20, 0, 0).single());
        assert!(last_week.is_some());
        if let Some(last_week) = last_week {
            let old = NewExpense::parse("Groceries", "900", None);
            assert!(old.is_ok());
            if let Ok(old) = old {
                assert!(record_in(&mut store, old, &last_week).is_ok());
            }

            let now = last_week + Duration::days(4);
            let fresh = NewExpense::parse("Dinner", "300", None);
            assert!(fresh.is_ok());
            if let Ok(fresh) = fresh {
                let result = record_in(&mut store, fresh, &now);
                assert!(result.is_ok());
                if let Ok(logged) = result {
                    assert_eq!(logged.snapshot.transaction_count, 1);
                    assert!((logged.snapshot.week_total - 300.0).abs() < f64::EPSILON);
                    assert_eq!(logged.dashboard.history_total, 2);
                }
            }
        }
    }

    #[test]
    fn logging_requires_setup_and_writes_nothing() {
        let mut store = MemoryStore::new();
        let input = NewExpense::parse("Latte", "150", Some("coffee"));
        let now = ist().and_then(|tz| tz.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).single());
        assert!(input.is_ok() && now.is_some());
        if let (Ok(input), Some(now)) = (input, now) {
            let result = record_in(&mut store, input, &now);
            assert!(matches!(result, Err(ref error) if error.code == "setup_required"));
            assert!(store.is_empty());
        }
    }
}
