use std::io;

use moneycoach_client::coach::COACH_THINKING_MESSAGE;
use moneycoach_client::view::EMPTY_HISTORY_MESSAGE;
use serde_json::Value;

use super::format::{HistoryRow, history_table, key_value_rows, terminal_width};

pub fn render_dash(data: &Value) -> io::Result<String> {
    Ok(dashboard_lines(data)?.join("\n"))
}

/// Confirmation line followed by the refreshed dashboard and, when the
/// coach already answered, its reply.
pub fn render_log(data: &Value) -> io::Result<String> {
    let expense = data
        .get("expense")
        .ok_or_else(|| io::Error::other("log output requires expense"))?;
    let dashboard = data
        .get("dashboard")
        .ok_or_else(|| io::Error::other("log output requires dashboard"))?;

    let mut lines = vec![logged_line(expense), String::new()];
    lines.extend(dashboard_lines(dashboard)?);

    if let Some(coach) = data.get("coach") {
        lines.push(String::new());
        lines.extend(coach_lines(coach));
    }

    Ok(lines.join("\n"))
}

pub fn render_coach(data: &Value) -> io::Result<String> {
    if data.get("message").is_none() {
        return Err(io::Error::other("coach output requires message"));
    }
    Ok(coach_lines(data).join("\n"))
}

pub fn thinking_line() -> String {
    format!("\n{COACH_THINKING_MESSAGE}")
}

pub(super) fn dashboard_lines(data: &Value) -> io::Result<Vec<String>> {
    let stats = data
        .get("stats")
        .ok_or_else(|| io::Error::other("dashboard output requires stats"))?;
    let history = data
        .get("history")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("dashboard output requires history"))?;

    let mut lines = vec![
        "Money Coach 💰".to_string(),
        String::new(),
        format!("Monthly budget: ₹{}", value_str(data, "budget_display")),
        String::new(),
        "This week:".to_string(),
    ];
    lines.extend(key_value_rows(
        &[
            (
                "Total spent:",
                format!("₹{}", value_str(stats, "week_total_display")),
            ),
            ("Transactions:", value_count(stats, "transaction_count")),
            ("Coffee runs:", value_count(stats, "coffee_count")),
        ],
        2,
    ));

    lines.push(String::new());
    if history.is_empty() {
        lines.push(EMPTY_HISTORY_MESSAGE.to_string());
        return Ok(lines);
    }

    let total = data
        .get("history_total")
        .and_then(Value::as_u64)
        .unwrap_or(history.len() as u64);
    if total > history.len() as u64 {
        lines.push(format!(
            "Recent expenses ({} of {total}):",
            history.len()
        ));
    } else {
        lines.push("Recent expenses:".to_string());
    }

    let rows = history
        .iter()
        .map(|entry| HistoryRow {
            expense: format!(
                "{} {}",
                value_str(entry, "emoji"),
                value_str(entry, "description")
            ),
            amount: value_str(entry, "amount_display"),
            when: value_str(entry, "age"),
        })
        .collect::<Vec<HistoryRow>>();
    lines.extend(history_table(&rows, terminal_width()));

    Ok(lines)
}

fn logged_line(expense: &Value) -> String {
    let amount = expense
        .get("amount")
        .and_then(Value::as_f64)
        .map(moneycoach_client::locale::format_en_in)
        .unwrap_or_default();
    format!(
        "Logged {} ₹{amount} ({})",
        value_str(expense, "description"),
        value_str(expense, "category")
    )
}

fn coach_lines(coach: &Value) -> Vec<String> {
    vec![
        "Your coach says:".to_string(),
        format!("  {}", value_str(coach, "message")),
    ]
}

fn value_str(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn value_count(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_u64)
        .unwrap_or(0)
        .to_string()
}
