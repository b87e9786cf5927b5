//! Overdue computation
//!
//! Overdue days are always derived from the due date and the current time;
//! the stored lending status plays no part in the count.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::LendingPopulated;

pub const MILLIS_PER_DAY: i64 = 1000 * 60 * 60 * 24;

/// Highest day count still shown in the `late` band
pub const LATE_BAND_MAX_DAYS: u32 = 5;

/// Display severity derived from days past due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OverdueBand {
    /// Not yet due
    Current,
    /// 1 to 5 days past due
    Late,
    /// More than 5 days past due
    Severe,
}

impl OverdueBand {
    pub fn from_days(days: u32) -> Self {
        match days {
            0 => OverdueBand::Current,
            1..=LATE_BAND_MAX_DAYS => OverdueBand::Late,
            _ => OverdueBand::Severe,
        }
    }
}

/// Parse a due date as sent by the API: `YYYY-MM-DD` (midnight UTC) or RFC 3339.
pub fn parse_due_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Whole days elapsed since `due`, floored; 0 when `now` is not past `due`.
pub fn days_overdue(due: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let elapsed = (now - due).num_milliseconds();
    if elapsed <= 0 {
        return 0;
    }
    u32::try_from(elapsed / MILLIS_PER_DAY).unwrap_or(u32::MAX)
}

/// Days overdue for a due-date string; unparseable dates count as not overdue.
pub fn days_overdue_str(due: &str, now: DateTime<Utc>) -> u32 {
    match parse_due_date(due) {
        Some(due) => days_overdue(due, now),
        None => {
            tracing::warn!("Unparseable due date: {:?}", due);
            0
        }
    }
}

/// Lending annotated with its derived overdue state
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedLending {
    #[serde(flatten)]
    pub lending: LendingPopulated,
    pub days_overdue: u32,
    pub band: OverdueBand,
}

impl AnnotatedLending {
    pub fn new(lending: LendingPopulated, now: DateTime<Utc>) -> Self {
        let days = if lending.is_open() {
            days_overdue_str(&lending.due_date, now)
        } else {
            0
        };

        Self {
            lending,
            days_overdue: days,
            band: OverdueBand::from_days(days),
        }
    }

    pub fn is_overdue(&self) -> bool {
        self.days_overdue > 0
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverdueBook {
    pub title: String,
    pub due_date: String,
    pub days_overdue: u32,
}

/// Overdue lendings of one reader
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverdueRecord {
    pub reader_id: String,
    pub reader_name: String,
    pub books: Vec<OverdueBook>,
}

/// Figures shown on the overdue page
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverdueSummary {
    pub total_overdue_books: usize,
    pub readers_affected: usize,
    pub average_days_overdue: u32,
    pub by_reader: Vec<OverdueRecord>,
}

impl OverdueSummary {
    pub fn from_lendings(lendings: &[AnnotatedLending]) -> Self {
        let overdue: Vec<&AnnotatedLending> = lendings.iter().filter(|l| l.is_overdue()).collect();

        let mut by_reader: IndexMap<String, OverdueRecord> = IndexMap::new();
        for entry in &overdue {
            let (reader_id, reader_name) = match &entry.lending.reader {
                Some(reader) => (reader.id.clone(), reader.name.clone()),
                None => (String::new(), "Unknown reader".to_string()),
            };

            by_reader
                .entry(reader_id.clone())
                .or_insert_with(|| OverdueRecord {
                    reader_id,
                    reader_name,
                    books: Vec::new(),
                })
                .books
                .push(OverdueBook {
                    title: entry
                        .lending
                        .book
                        .as_ref()
                        .map(|b| b.title.clone())
                        .unwrap_or_else(|| "Unknown book".to_string()),
                    due_date: entry.lending.due_date.clone(),
                    days_overdue: entry.days_overdue,
                });
        }

        let average_days_overdue = if overdue.is_empty() {
            0
        } else {
            let total: u64 = overdue.iter().map(|l| u64::from(l.days_overdue)).sum();
            (total as f64 / overdue.len() as f64).round() as u32
        };

        Self {
            total_overdue_books: overdue.len(),
            readers_affected: by_reader.len(),
            average_days_overdue,
            by_reader: by_reader.into_values().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lending::{BookSummary, LendingStatus, ReaderSummary};

    fn at(value: &str) -> DateTime<Utc> {
        parse_due_date(value).unwrap()
    }

    fn lending(id: &str, reader: &str, due: &str, status: LendingStatus) -> LendingPopulated {
        LendingPopulated {
            id: id.to_string(),
            book: Some(BookSummary {
                id: format!("book-{}", id),
                title: format!("Title {}", id),
                author: "Author".to_string(),
            }),
            reader: Some(ReaderSummary {
                id: reader.to_string(),
                name: format!("Reader {}", reader),
                email: format!("{}@club.org", reader),
            }),
            borrowed_date: "2024-01-01".to_string(),
            due_date: due.to_string(),
            returned_date: None,
            status,
        }
    }

    #[test]
    fn test_reference_scenarios() {
        let due = at("2024-01-15");

        let days = days_overdue(due, at("2024-01-20"));
        assert_eq!(days, 5);
        assert_eq!(OverdueBand::from_days(days), OverdueBand::Late);

        let days = days_overdue(due, at("2024-01-22"));
        assert_eq!(days, 7);
        assert_eq!(OverdueBand::from_days(days), OverdueBand::Severe);

        let days = days_overdue(due, at("2024-01-10"));
        assert_eq!(days, 0);
        assert_eq!(OverdueBand::from_days(days), OverdueBand::Current);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(OverdueBand::from_days(0), OverdueBand::Current);
        assert_eq!(OverdueBand::from_days(1), OverdueBand::Late);
        assert_eq!(OverdueBand::from_days(5), OverdueBand::Late);
        assert_eq!(OverdueBand::from_days(6), OverdueBand::Severe);
    }

    #[test]
    fn test_partial_days_are_floored() {
        let due = at("2024-01-15");
        assert_eq!(days_overdue(due, at("2024-01-15T23:59:59Z")), 0);
        assert_eq!(days_overdue(due, at("2024-01-16T00:00:00Z")), 1);
        assert_eq!(days_overdue(due, at("2024-01-17T12:30:00Z")), 2);
    }

    #[test]
    fn test_not_yet_due_is_zero() {
        let due = at("2024-03-01T10:00:00Z");
        assert_eq!(days_overdue(due, due), 0);
        assert_eq!(days_overdue(due, at("2024-02-01")), 0);
    }

    #[test]
    fn test_parse_due_date_formats() {
        assert_eq!(at("2024-01-15"), at("2024-01-15T00:00:00.000Z"));
        assert_eq!(at("2024-01-15T02:00:00+02:00"), at("2024-01-15"));
        assert!(parse_due_date("15/01/2024").is_none());
        assert_eq!(days_overdue_str("not a date", at("2030-01-01")), 0);
    }

    #[test]
    fn test_returned_lending_is_never_overdue() {
        let now = at("2024-02-01");
        let mut returned = lending("1", "r1", "2024-01-01", LendingStatus::Returned);
        assert_eq!(AnnotatedLending::new(returned.clone(), now).days_overdue, 0);

        returned.status = LendingStatus::Borrowed;
        returned.returned_date = Some("2024-01-20".to_string());
        assert_eq!(AnnotatedLending::new(returned, now).band, OverdueBand::Current);
    }

    #[test]
    fn test_summary_groups_by_reader() {
        let now = at("2024-01-20");
        let lendings: Vec<AnnotatedLending> = vec![
            lending("1", "r1", "2024-01-15", LendingStatus::Borrowed), // 5 days
            lending("2", "r2", "2024-01-10", LendingStatus::Overdue),  // 10 days
            lending("3", "r1", "2024-01-18", LendingStatus::Borrowed), // 2 days
            lending("4", "r3", "2024-02-01", LendingStatus::Borrowed), // not due
            lending("5", "r3", "2024-01-01", LendingStatus::Returned),
        ]
        .into_iter()
        .map(|l| AnnotatedLending::new(l, now))
        .collect();

        let summary = OverdueSummary::from_lendings(&lendings);
        assert_eq!(summary.total_overdue_books, 3);
        assert_eq!(summary.readers_affected, 2);
        // (5 + 10 + 2) / 3 = 5.67
        assert_eq!(summary.average_days_overdue, 6);

        assert_eq!(summary.by_reader[0].reader_id, "r1");
        assert_eq!(summary.by_reader[0].books.len(), 2);
        assert_eq!(summary.by_reader[1].reader_name, "Reader r2");
        assert_eq!(summary.by_reader[1].books[0].days_overdue, 10);
    }

    #[test]
    fn test_empty_summary() {
        let summary = OverdueSummary::from_lendings(&[]);
        assert_eq!(summary.total_overdue_books, 0);
        assert_eq!(summary.readers_affected, 0);
        assert_eq!(summary.average_days_overdue, 0);
        assert!(summary.by_reader.is_empty());
    }
}
