use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::aggregate::weekly_stats;
use crate::expense::{Category, ExpenseRecord};
use crate::locale::{format_en_in, format_en_in_whole, time_ago};

pub const HISTORY_LIMIT: usize = 20;
pub const EMPTY_HISTORY_MESSAGE: &str = "No expenses logged yet. Start tracking!";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub monthly_budget: u64,
    pub budget_display: String,
    pub stats: WeeklyStatsView,
    pub history: Vec<HistoryEntry>,
    pub history_total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyStatsView {
    pub week_total: f64,
    pub week_total_display: String,
    pub transaction_count: usize,
    pub coffee_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub emoji: String,
    pub category: Category,
    pub description: String,
    pub amount: f64,
    pub amount_display: String,
    pub age: String,
}

/// Computes everything the dashboard shows; painting is left to the caller.
pub fn build_dashboard<Tz: TimeZone>(
    expenses: &[ExpenseRecord],
    monthly_budget: u64,
    now: &DateTime<Tz>,
) -> DashboardView {
    DashboardView {
        monthly_budget,
        budget_display: format_budget(monthly_budget),
        stats: build_weekly_stats(expenses, now),
        history: build_history(expenses, now),
        history_total: expenses.len(),
    }
}

pub fn build_weekly_stats<Tz: TimeZone>(
    expenses: &[ExpenseRecord],
    now: &DateTime<Tz>,
) -> WeeklyStatsView {
    let stats = weekly_stats(expenses, now);
    WeeklyStatsView {
        week_total: stats.week_total,
        week_total_display: format_en_in(stats.week_total),
        transaction_count: stats.transaction_count,
        coffee_count: stats.coffee_count,
    }
}

/// Newest entries first, capped at [`HISTORY_LIMIT`].
pub fn build_history<Tz: TimeZone>(
    expenses: &[ExpenseRecord],
    now: &DateTime<Tz>,
) -> Vec<HistoryEntry> {
    expenses
        .iter()
        .take(HISTORY_LIMIT)
        .map(|expense| HistoryEntry {
            id: expense.id,
            emoji: expense.category.emoji().to_string(),
            category: expense.category,
            description: expense.description.clone(),
            amount: expense.amount,
            amount_display: format!("₹{}", format_en_in(expense.amount)),
            age: time_ago(&expense.timestamp, now),
        })
        .collect()
}

pub fn format_budget(monthly_budget: u64) -> String {
    format_en_in_whole(monthly_budget)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::{HISTORY_LIMIT, build_dashboard, build_history};
    use crate::expense::{Category, ExpenseRecord};

    fn newest_first(count: usize) -> Vec<ExpenseRecord> {
        let base = Utc.with_ymd_and_hms(2026, 10, 12, 8, 0, 0).single();
        let Some(base) = base else {
            return Vec::new();
        };
        let mut records = (0..count)
            .map(|index| {
                let created = base + Duration::minutes(i64::try_from(index).unwrap_or(0));
                ExpenseRecord::new(
                    created.timestamp_millis(),
                    format!("entry {index}"),
                    100.0,
                    Category::Other,
                    &created,
                )
            })
            .collect::<Vec<ExpenseRecord>>();
        records.reverse();
        records
    }

    #[test]
    fn history_is_capped_and_newest_first() {
        let expenses = newest_first(35);
        assert_eq!(expenses.len(), 35);
        let now = Utc.with_ymd_and_hms(2026, 10, 13, 8, 0, 0).single();
        assert!(now.is_some());
        if let Some(now) = now {
            let history = build_history(&expenses, &now);
            assert_eq!(history.len(), HISTORY_LIMIT);
            assert_eq!(history[0].description, "entry 34");
            assert!(history.windows(2).all(|pair| pair[0].id > pair[1].id));
        }
    }

    #[test]
    fn dashboard_formats_budget_and_amounts() {
        let created = Utc.with_ymd_and_hms(2026, 10, 13, 7, 0, 0).single();
        let now = Utc.with_ymd_and_hms(2026, 10, 13, 9, 0, 0).single();
        assert!(created.is_some() && now.is_some());
        if let (Some(created), Some(now)) = (created, now) {
            let expenses = vec![ExpenseRecord::new(
                created.timestamp_millis(),
                "Headphones".to_string(),
                125000.0,
                Category::Shopping,
                &created,
            )];
            let view = build_dashboard(&expenses, 250000, &now);
            assert_eq!(view.budget_display, "2,50,000");
            assert_eq!(view.history[0].amount_display, "₹1,25,000");
            assert_eq!(view.history[0].emoji, "🛍️");
            assert_eq!(view.history[0].age, "2 hours ago");
            assert_eq!(view.stats.week_total_display, "1,25,000");
            assert_eq!(view.stats.transaction_count, 1);
            assert_eq!(view.stats.coffee_count, 0);
        }
    }

    #[test]
    fn empty_store_renders_empty_history() {
        let now = Utc.with_ymd_and_hms(2026, 10, 13, 9, 0, 0).single();
        assert!(now.is_some());
        if let Some(now) = now {
            let view = build_dashboard(&[], 1000, &now);
            assert!(view.history.is_empty());
            assert_eq!(view.history_total, 0);
            assert_eq!(view.stats.week_total_display, "0");
        }
    }
}
