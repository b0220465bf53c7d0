use std::fmt;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Date as found in server responses. Depending on its serializer settings
/// the server writes either epoch milliseconds or an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiDate {
    Millis(i64),
    Text(String),
}

impl fmt::Display for ApiDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiDate::Millis(millis) => match Local.timestamp_millis_opt(*millis).single() {
                Some(time) => write!(f, "{}", time.format("%Y-%m-%d %H:%M")),
                None => write!(f, "{millis}"),
            },
            ApiDate::Text(text) => match DateTime::parse_from_rfc3339(text) {
                Ok(time) => write!(f, "{}", time.with_timezone(&Local).format("%Y-%m-%d %H:%M")),
                Err(_) => write!(f, "{text}"),
            },
        }
    }
}

pub fn format_optional_date(date: &Option<ApiDate>) -> String {
    match date {
        Some(date) => date.to_string(),
        None => String::from("-"),
    }
}

/// Midnight UTC of the given day, the instant a browser date input yields.
pub fn start_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}
