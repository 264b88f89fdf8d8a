use std::cmp;

const INDENT: &str = "  ";
const GAP: &str = "  ";
const MIN_EXPENSE_WIDTH: usize = 6;
const DEFAULT_TERMINAL_WIDTH: usize = 80;

const EXPENSE_HEADER: &str = "Expense";
const AMOUNT_HEADER: &str = "Amount";
const WHEN_HEADER: &str = "When";

/// One line of the recent-expenses table, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub expense: String,
    pub amount: String,
    pub when: String,
}

pub fn terminal_width() -> usize {
    let from_env = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(DEFAULT_TERMINAL_WIDTH);
    cmp::max(from_env, 40)
}

/// Printed width of `value`, counted in chars so `₹` and emoji pad the same
/// way `format!` does.
pub fn display_width(value: &str) -> usize {
    value.chars().count()
}

pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    let label_width = entries
        .iter()
        .map(|(label, _)| display_width(label))
        .max()
        .unwrap_or(0);
    let padding = " ".repeat(indent);

    entries
        .iter()
        .map(|(label, value)| format!("{padding}{label:<label_width$}  {value}"))
        .collect()
}

/// Expense column wraps to whatever `max_width` leaves after the amount and
/// age columns; below [`MIN_EXPENSE_WIDTH`] each row becomes a labelled block.
pub fn history_table(rows: &[HistoryRow], max_width: usize) -> Vec<String> {
    if rows.is_empty() {
        return Vec::new();
    }

    let amount_width = column_width(AMOUNT_HEADER, rows.iter().map(|row| row.amount.as_str()));
    let when_width = column_width(WHEN_HEADER, rows.iter().map(|row| row.when.as_str()));
    let natural_expense =
        column_width(EXPENSE_HEADER, rows.iter().map(|row| row.expense.as_str()));

    let fixed = INDENT.len() + amount_width + when_width + 2 * GAP.len();
    let expense_width = cmp::min(natural_expense, max_width.saturating_sub(fixed));
    if expense_width < MIN_EXPENSE_WIDTH {
        return history_blocks(rows);
    }

    let line = |expense: &str, amount: &str, when: &str| {
        format!("{INDENT}{expense:<expense_width$}{GAP}{amount:>amount_width$}{GAP}{when}")
            .trim_end()
            .to_string()
    };

    let mut output = vec![line(EXPENSE_HEADER, AMOUNT_HEADER, WHEN_HEADER)];
    for row in rows {
        let wrapped = wrap_text(&row.expense, expense_width);
        for (index, chunk) in wrapped.iter().enumerate() {
            if index == 0 {
                output.push(line(chunk.as_str(), row.amount.as_str(), row.when.as_str()));
            } else {
                output.push(line(chunk.as_str(), "", ""));
            }
        }
    }
    output
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(display_width)
        .fold(display_width(header), cmp::max)
}

fn history_blocks(rows: &[HistoryRow]) -> Vec<String> {
    let mut output = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        if index > 0 {
            output.push(String::new());
        }
        output.push(format!("{INDENT}{EXPENSE_HEADER} {}:", index + 1));
        output.extend(key_value_rows(
            &[
                ("Expense:", row.expense.clone()),
                ("Amount:", row.amount.clone()),
                ("When:", row.when.clone()),
            ],
            4,
        ));
    }
    output
}

/// Word wrap that never drops text: a word longer than `width` is split
/// on char boundaries.
fn wrap_text(value: &str, width: usize) -> Vec<String> {
    if display_width(value) <= width {
        return vec![value.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in value.split_whitespace() {
        let needed = display_width(&current) + 1 + display_width(word);
        if !current.is_empty() && needed <= width {
            current.push(' ');
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        let mut chars = word.chars().collect::<Vec<char>>();
        while chars.len() > width {
            lines.push(chars.drain(..width).collect());
        }
        current = chars.into_iter().collect();
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
