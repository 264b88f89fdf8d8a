use std::path::Path;

use chrono::{DateTime, FixedOffset, TimeZone};
use moneycoach_client::coach::COACH_FALLBACK_MESSAGE;
use moneycoach_client::commands::common::Reference;
use moneycoach_client::commands::{dash, log, setup};
use moneycoach_client::config::CoachConfig;
use moneycoach_client::store::{SqliteStore, Store};
use moneycoach_client::view::HISTORY_LIMIT;
use tempfile::tempdir;

fn ist_at(day: u32, hour: u32, minute: u32) -> Option<DateTime<FixedOffset>> {
    FixedOffset::east_opt(5 * 3600 + 1800)?
        .with_ymd_and_hms(2026, 10, day, hour, minute, 0)
        .single()
}

fn configure(home: &Path) -> bool {
    setup::run_with_options(setup::SetupRunOptions {
        api_key: "sk-flow-test-key".to_string(),
        budget: "20000".to_string(),
        home_override: Some(home),
        ..setup::SetupRunOptions::default()
    })
    .is_ok()
}

fn log_at(
    home: &Path,
    description: &str,
    amount: &str,
    category: Option<&str>,
    instant: DateTime<FixedOffset>,
) -> moneycoach_client::ClientResult<moneycoach_client::SuccessEnvelope> {
    log::run_with_options(log::LogRunOptions {
        description: description.to_string(),
        amount: amount.to_string(),
        category: category.map(str::to_string),
        home_override: Some(home),
        reference: Reference::At(instant),
        coach: None,
    })
}

#[test]
fn latte_is_counted_as_coffee_in_its_own_snapshot() {
    let temp = tempdir();
    let now = ist_at(14, 9, 30);
    assert!(temp.is_ok() && now.is_some());
    if let (Ok(temp_dir), Some(now)) = (temp, now) {
        assert!(configure(temp_dir.path()));

        let result = log_at(temp_dir.path(), "Latte", "150", Some("coffee"), now);
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            assert_eq!(envelope.command, "log");
            assert_eq!(envelope.data["expense"]["category"], "coffee");
            assert_eq!(envelope.data["expense"]["date"], "14/10/2026");
            assert_eq!(envelope.data["snapshot"]["coffee_count"], 1);
            assert_eq!(envelope.data["snapshot"]["category_count"], 1);
            assert_eq!(envelope.data["dashboard"]["stats"]["coffee_count"], 1);
            assert!(envelope.data.get("coach").is_none());
        }
    }
}

#[test]
fn invalid_input_is_rejected_before_the_store_is_touched() {
    let temp = tempdir();
    let now = ist_at(14, 9, 30);
    assert!(temp.is_ok() && now.is_some());
    if let (Ok(temp_dir), Some(now)) = (temp, now) {
        let home = temp_dir.path().join("untouched");

        let blank = log_at(&home, "   ", "150", None, now);
        assert!(matches!(blank, Err(ref error) if error.message == "Please enter a description"));

        for amount in ["0", "-5", "abc", "NaN"] {
            let bad = log_at(&home, "Lunch", amount, None, now);
            assert!(matches!(bad, Err(ref error) if error.message == "Please enter a valid amount"));
        }

        let unknown = log_at(&home, "Lunch", "100", Some("gadgets"), now);
        assert!(matches!(unknown, Err(ref error) if error.code == "invalid_argument"));

        assert!(!home.exists());
    }
}

#[test]
fn logging_before_setup_leaves_the_list_empty() {
    let temp = tempdir();
    let now = ist_at(14, 9, 30);
    assert!(temp.is_ok() && now.is_some());
    if let (Ok(temp_dir), Some(now)) = (temp, now) {
        let result = log_at(temp_dir.path(), "Lunch", "100", None, now);
        assert!(matches!(result, Err(ref error) if error.code == "setup_required"));

        let store = SqliteStore::open(Some(temp_dir.path()));
        assert!(matches!(
            store.and_then(|opened| opened.load()),
            Ok(ref snapshot) if snapshot.expenses.is_empty()
        ));
    }
}

#[test]
fn dashboard_history_is_capped_newest_first() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        assert!(configure(temp_dir.path()));

        for minute in 0..25 {
            let instant = ist_at(14, 10, minute);
            assert!(instant.is_some());
            if let Some(instant) = instant {
                let description = format!("Snack {minute}");
                assert!(log_at(temp_dir.path(), &description, "20", None, instant).is_ok());
            }
        }

        let now = ist_at(14, 11, 0);
        assert!(now.is_some());
        if let Some(now) = now {
            let result = dash::run_with_options(dash::DashRunOptions {
                home_override: Some(temp_dir.path()),
                reference: Reference::At(now),
            });
            assert!(result.is_ok());
            if let Ok(envelope) = result {
                let history = envelope.data["history"].as_array().cloned().unwrap_or_default();
                assert_eq!(history.len(), HISTORY_LIMIT);
                assert_eq!(history[0]["description"], "Snack 24");
                assert_eq!(history[0]["age"], "36 mins ago");
                assert_eq!(envelope.data["history_total"], 25);
                assert_eq!(envelope.data["stats"]["transaction_count"], 25);
                assert_eq!(envelope.data["stats"]["week_total_display"], "500");
            }
        }
    }
}

#[test]
fn unreachable_coach_falls_back_but_keeps_the_expense() {
    let temp = tempdir();
    let now = ist_at(14, 9, 30);
    assert!(temp.is_ok() && now.is_some());
    if let (Ok(temp_dir), Some(now)) = (temp, now) {
        assert!(configure(temp_dir.path()));

        let result = log::run_with_options(log::LogRunOptions {
            description: "Dinner".to_string(),
            amount: "450".to_string(),
            category: None,
            home_override: Some(temp_dir.path()),
            reference: Reference::At(now),
            coach: Some(Ok(
                CoachConfig::default().with_endpoint("http://127.0.0.1:1/v1/chat/completions"),
            )),
        });
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            assert_eq!(envelope.data["coach"]["reply"]["status"], "failure");
            assert_eq!(envelope.data["coach"]["message"], COACH_FALLBACK_MESSAGE);
        }

        let store = SqliteStore::open(Some(temp_dir.path()));
        assert!(matches!(
            store.and_then(|opened| opened.load()),
            Ok(ref snapshot) if snapshot.expenses.len() == 1
        ));
    }
}

#[test]
fn unusable_coach_config_still_records_the_expense() {
    let temp = tempdir();
    let now = ist_at(14, 9, 30);
    assert!(temp.is_ok() && now.is_some());
    if let (Ok(temp_dir), Some(now)) = (temp, now) {
        assert!(configure(temp_dir.path()));

        let config = CoachConfig::from_lookup(|name| {
            (name == "MONEYCOACH_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert!(matches!(config, Err(ref error) if error.code == "invalid_config"));

        let result = log::run_with_options(log::LogRunOptions {
            description: "Latte".to_string(),
            amount: "150".to_string(),
            category: Some("coffee".to_string()),
            home_override: Some(temp_dir.path()),
            reference: Reference::At(now),
            coach: Some(config),
        });
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            assert_eq!(envelope.data["expense"]["description"], "Latte");
            assert_eq!(envelope.data["coach"]["reply"]["status"], "failure");
            assert_eq!(envelope.data["coach"]["message"], COACH_FALLBACK_MESSAGE);
        }

        let dashboard = dash::run_with_options(dash::DashRunOptions {
            home_override: Some(temp_dir.path()),
            reference: Reference::At(now),
        });
        assert!(matches!(
            dashboard,
            Ok(ref envelope) if envelope.data["history_total"] == 1
        ));
    }
}
