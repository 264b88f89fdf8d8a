use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::expense::{Category, ExpenseRecord};

const PROJECTION_DAYS: f64 = 30.0;

/// Week-to-date figures derived from the expense list. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSnapshot {
    pub week_start: DateTime<Utc>,
    pub week_total: f64,
    pub transaction_count: usize,
    pub category: Category,
    pub category_count: usize,
    pub category_total: f64,
    pub coffee_count: usize,
    pub monthly_projection: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyStats {
    pub week_total: f64,
    pub transaction_count: usize,
    pub coffee_count: usize,
}

/// Most recent Sunday at local midnight, at or before `reference`.
pub fn week_start<Tz: TimeZone>(reference: &DateTime<Tz>) -> DateTime<Utc> {
    let today = reference.date_naive();
    let days_since_sunday = i64::from(today.weekday().num_days_from_sunday());
    let sunday = today - Duration::days(days_since_sunday);
    let midnight = sunday.and_time(NaiveTime::MIN);

    match reference.timezone().from_local_datetime(&midnight) {
        LocalResult::Single(value) => value.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        // Midnight skipped by a DST jump: take the first instant that exists that day.
        LocalResult::None => first_valid_instant(reference, midnight),
    }
}

/// Records stamped at or after the week boundary, in stored order.
pub fn this_week<'a, Tz: TimeZone>(
    expenses: &'a [ExpenseRecord],
    reference: &DateTime<Tz>,
) -> Vec<&'a ExpenseRecord> {
    let boundary = week_start(reference);
    expenses
        .iter()
        .filter(|expense| expense.timestamp >= boundary)
        .collect()
}

pub fn weekly_stats<Tz: TimeZone>(
    expenses: &[ExpenseRecord],
    reference: &DateTime<Tz>,
) -> WeeklyStats {
    let week = this_week(expenses, reference);
    WeeklyStats {
        week_total: week.iter().map(|expense| expense.amount).sum(),
        transaction_count: week.len(),
        coffee_count: count_in_category(&week, Category::Coffee),
    }
}

pub fn analyze_spending<Tz: TimeZone>(
    expenses: &[ExpenseRecord],
    category: Category,
    reference: &DateTime<Tz>,
) -> SpendingSnapshot {
    let week = this_week(expenses, reference);
    let week_total = week.iter().map(|expense| expense.amount).sum::<f64>();
    let category_total = week
        .iter()
        .filter(|expense| expense.category == category)
        .map(|expense| expense.amount)
        .sum::<f64>();

    SpendingSnapshot {
        week_start: week_start(reference),
        week_total,
        transaction_count: week.len(),
        category,
        category_count: count_in_category(&week, category),
        category_total,
        coffee_count: count_in_category(&week, Category::Coffee),
        monthly_projection: monthly_projection(week_total, reference),
    }
}

/// Linear extrapolation of the week-to-date total to 30 days.
///
/// The divisor is the weekday index with Sunday as 0, except that Sunday
/// itself counts as 7.
pub fn monthly_projection<Tz: TimeZone>(week_total: f64, reference: &DateTime<Tz>) -> f64 {
    week_total / f64::from(projection_divisor(reference)) * PROJECTION_DAYS
}

pub fn projection_divisor<Tz: TimeZone>(reference: &DateTime<Tz>) -> u32 {
    match reference.weekday().num_days_from_sunday() {
        0 => 7,
        day => day,
    }
}

fn count_in_category(week: &[&ExpenseRecord], category: Category) -> usize {
    week.iter()
        .filter(|expense| expense.category == category)
        .count()
}

fn first_valid_instant<Tz: TimeZone>(
    reference: &DateTime<Tz>,
    midnight: chrono::NaiveDateTime,
) -> DateTime<Utc> {
    let timezone = reference.timezone();
    for minutes in (15..=24 * 60).step_by(15) {
        let candidate = midnight + Duration::minutes(minutes);
        if let Some(value) = timezone.from_local_datetime(&candidate).earliest() {
            return value.with_timezone(&Utc);
        }
    }
    midnight.and_utc()
}
