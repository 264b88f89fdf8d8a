use crate::aggregate::SpendingSnapshot;
use crate::expense::{Category, ExpenseRecord};
use crate::locale::format_plain;

pub const COACH_SYSTEM_PROMPT: &str = "You are a warm, witty, and supportive money coach. \
Your job is to respond to expense entries with insight and humor. \
Keep responses short (max 2-3 sentences), conversational, and never judgmental. \
Combine practical financial reflection with empathy or encouragement. \
Use Indian Rupee (₹) for all amounts.";

const CLOSING_INSTRUCTION: &str =
    "Respond with a witty, warm, and insightful message (2-3 sentences max).";

/// Renders the user-role message sent to the coach for a freshly logged expense.
pub fn build_coach_prompt(
    expense: &ExpenseRecord,
    snapshot: &SpendingSnapshot,
    monthly_budget: u64,
) -> String {
    let category = expense.category.as_str();
    let mut lines = vec![
        format!(
            "User entry: \"{} ₹{}\"",
            expense.description,
            format_plain(expense.amount)
        ),
        format!("Category: {category}"),
        format!("Monthly budget: ₹{monthly_budget}"),
        "This week so far:".to_string(),
        format!("- Total spent: ₹{}", format_plain(snapshot.week_total)),
        format!(
            "- Number of {category} purchases: {}",
            snapshot.category_count
        ),
        format!(
            "- Total {category} spending: ₹{}",
            format_plain(snapshot.category_total)
        ),
    ];

    if includes_coffee_line(expense.category, snapshot.coffee_count) {
        lines.push(format!(
            "- Coffee/drinks count this week: {}",
            snapshot.coffee_count
        ));
    }

    lines.push(format!(
        "- Monthly projection: ₹{}",
        format_plain(snapshot.monthly_projection.round())
    ));
    lines.push(String::new());
    lines.push(CLOSING_INSTRUCTION.to_string());

    lines.join("\n")
}

pub fn includes_coffee_line(category: Category, coffee_count: usize) -> bool {
    category == Category::Coffee || coffee_count > 0
}
