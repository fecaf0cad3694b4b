use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// The four drillable operations. `Mixed` is a session-level choice, not an
/// attempt-level one: every logged attempt records the concrete operation it
/// actually exercised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

pub const ALL_OPERATIONS: [Operation; 4] = [
    Operation::Addition,
    Operation::Subtraction,
    Operation::Multiplication,
    Operation::Division,
];

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Addition => "Addition",
            Operation::Subtraction => "Subtraction",
            Operation::Multiplication => "Multiplication",
            Operation::Division => "Division",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operation::Addition => '+',
            Operation::Subtraction => '-',
            Operation::Multiplication => '×',
            Operation::Division => '÷',
        }
    }
}

/// One answered practice question. Immutable once logged; the only delete
/// path is a bulk clear of the whole log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    #[serde(default)]
    pub id: u64,
    pub operation: Operation,
    pub digits: u8,
    pub correct: bool,
    /// Seconds from question posed to answer submitted.
    pub time_taken: f64,
    pub question_text: String,
    pub user_answer: String,
    pub correct_answer: i64,
    /// Accepts epoch seconds or an ISO-8601 string on load; anything
    /// unparseable becomes `None` and is skipped by date aggregation.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Attempt {
    /// Calendar date of this attempt in the local timezone, if known.
    pub fn local_date(&self) -> Option<NaiveDate> {
        self.timestamp
            .map(|ts| ts.with_timezone(&chrono::Local).date_naive())
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(parse_timestamp(&value))
}

/// Lenient timestamp parsing: epoch seconds (integer or float), RFC 3339,
/// bare `YYYY-MM-DDTHH:MM:SS`, or a plain date. Everything else is `None`.
pub fn parse_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::Number(n) => {
            let secs = n.as_f64()?;
            if !secs.is_finite() || secs < 0.0 {
                return None;
            }
            DateTime::from_timestamp(secs as i64, ((secs.fract()) * 1e9) as u32)
        }
        serde_json::Value::String(s) => parse_timestamp_str(s),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}
