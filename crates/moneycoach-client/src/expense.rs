use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Food,
    Coffee,
    Shopping,
    Transport,
    Entertainment,
    Bills,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Self::Food,
        Self::Coffee,
        Self::Shopping,
        Self::Transport,
        Self::Entertainment,
        Self::Bills,
        Self::Other,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Coffee => "coffee",
            Self::Shopping => "shopping",
            Self::Transport => "transport",
            Self::Entertainment => "entertainment",
            Self::Bills => "bills",
            Self::Other => "other",
        }
    }

    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Food => "🍔",
            Self::Coffee => "☕",
            Self::Shopping => "🛍️",
            Self::Transport => "🚗",
            Self::Entertainment => "🎬",
            Self::Bills => "💡",
            Self::Other => "📦",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| ClientError::invalid_category(value))
    }
}

/// One logged expense. Records are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: i64,
    pub description: String,
    pub amount: f64,
    pub category: Category,
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    pub date: String,
}

impl ExpenseRecord {
    /// Builds a record stamped at `created_at`; `date` is rendered in the
    /// caller's time zone.
    pub fn new<Tz: TimeZone>(
        id: i64,
        description: String,
        amount: f64,
        category: Category,
        created_at: &DateTime<Tz>,
    ) -> Self {
        Self {
            id,
            description,
            amount,
            category,
            timestamp: created_at.with_timezone(&Utc),
            date: format_locale_date(created_at),
        }
    }
}

/// Validated input for a new expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub category: Category,
}

impl NewExpense {
    pub fn parse(description: &str, amount: &str, category: Option<&str>) -> ClientResult<Self> {
        let description = validate_description(description)?;
        let amount = parse_amount(amount)?;
        let category = match category {
            Some(value) => value.parse::<Category>()?,
            None => Category::default(),
        };
        Ok(Self {
            description,
            amount,
            category,
        })
    }
}

pub fn validate_description(raw: &str) -> ClientResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ClientError::invalid_description());
    }
    Ok(trimmed.to_string())
}

pub fn parse_amount(raw: &str) -> ClientResult<f64> {
    let parsed = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ClientError::invalid_amount())?;
    if !parsed.is_finite() || parsed <= 0.0 {
        return Err(ClientError::invalid_amount());
    }
    Ok(parsed)
}

/// Next record id: the creation instant in epoch milliseconds, bumped past
/// the newest stored id so ids stay strictly increasing.
pub fn next_record_id(created_at: &DateTime<Utc>, newest_existing: Option<i64>) -> i64 {
    let candidate = created_at.timestamp_millis();
    match newest_existing {
        Some(newest) if candidate <= newest => newest.saturating_add(1),
        _ => candidate,
    }
}

/// `D/M/YYYY`, the en-IN short date layout.
pub fn format_locale_date<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    let date = instant.date_naive();
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|value| value.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone, Utc};

    use super::{
        Category, ExpenseRecord, NewExpense, format_locale_date, next_record_id, parse_amount,
    };

    #[test]
    fn category_parsing_is_case_insensitive_and_closed() {
        assert!(matches!("Coffee".parse::<Category>(), Ok(Category::Coffee)));
        assert!(matches!(" bills ".parse::<Category>(), Ok(Category::Bills)));
        let unknown = "groceries".parse::<Category>();
        assert!(unknown.is_err());
        if let Err(error) = unknown {
            assert_eq!(error.code, "invalid_argument");
        }
    }

    #[test]
    fn amount_must_be_positive_and_finite() {
        assert!(matches!(parse_amount("150"), Ok(value) if value == 150.0));
        assert!(matches!(parse_amount(" 99.5 "), Ok(value) if value == 99.5));
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("inf").is_err());
    }

    #[test]
    fn new_expense_trims_description_and_defaults_category() {
        let parsed = NewExpense::parse("  Thali  ", "240", None);
        assert!(parsed.is_ok());
        if let Ok(expense) = parsed {
            assert_eq!(expense.description, "Thali");
            assert_eq!(expense.category, Category::Food);
        }

        let blank = NewExpense::parse("   ", "240", None);
        assert!(blank.is_err());
        if let Err(error) = blank {
            assert_eq!(error.message, "Please enter a description");
        }
    }

    #[test]
    fn record_ids_stay_strictly_increasing() {
        let instant = Utc.timestamp_millis_opt(1_700_000_000_000).single();
        assert!(instant.is_some());
        if let Some(now) = instant {
            assert_eq!(next_record_id(&now, None), 1_700_000_000_000);
            assert_eq!(
                next_record_id(&now, Some(1_699_999_999_999)),
                1_700_000_000_000
            );
            assert_eq!(
                next_record_id(&now, Some(1_700_000_000_000)),
                1_700_000_000_001
            );
        }
    }

    #[test]
    fn locale_date_uses_local_calendar_day() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800);
        assert!(ist.is_some());
        if let Some(offset) = ist {
            let late_utc = Utc.with_ymd_and_hms(2026, 1, 4, 20, 0, 0).single();
            assert!(late_utc.is_some());
            if let Some(instant) = late_utc {
                assert_eq!(format_locale_date(&instant), "4/1/2026");
                assert_eq!(format_locale_date(&instant.with_timezone(&offset)), "5/1/2026");
            }
        }
    }

    #[test]
    fn records_serialize_with_browser_compatible_fields() {
        let created = Utc.with_ymd_and_hms(2026, 3, 2, 9, 15, 0).single();
        assert!(created.is_some());
        if let Some(instant) = created {
            let record = ExpenseRecord::new(
                instant.timestamp_millis(),
                "Latte".to_string(),
                150.0,
                Category::Coffee,
                &instant,
            );
            let encoded = serde_json::to_value(&record);
            assert!(encoded.is_ok());
            if let Ok(value) = encoded {
                assert_eq!(value["category"], "coffee");
                assert_eq!(value["timestamp"], "2026-03-02T09:15:00.000Z");
                assert_eq!(value["date"], "2/3/2026");
                assert_eq!(value["amount"], 150.0);
            }
        }
    }

    #[test]
    fn records_decode_from_stored_browser_json() {
        let raw = r#"{"id":1767225600000,"description":"Auto","amount":80,"category":"transport","timestamp":"2026-01-01T00:00:00.000Z","date":"1/1/2026"}"#;
        let decoded = serde_json::from_str::<ExpenseRecord>(raw);
        assert!(decoded.is_ok());
        if let Ok(record) = decoded {
            assert_eq!(record.category, Category::Transport);
            assert_eq!(record.amount, 80.0);
            assert_eq!(record.timestamp.timestamp_millis(), 1_767_225_600_000);
        }
    }
}
