//! Lending (loan) model and the lending status lifecycle

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stored status of a lending record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LendingStatus {
    Pending,
    Borrowed,
    Returned,
    Overdue,
}

impl LendingStatus {
    /// Menu order offered by the status editor
    pub const ALL: [LendingStatus; 4] = [
        LendingStatus::Borrowed,
        LendingStatus::Returned,
        LendingStatus::Overdue,
        LendingStatus::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LendingStatus::Pending => "pending",
            LendingStatus::Borrowed => "borrowed",
            LendingStatus::Returned => "returned",
            LendingStatus::Overdue => "overdue",
        }
    }

    /// Transition table. `overdue` is only ever assigned by the server, so the
    /// console never moves a record into it.
    pub fn can_transition_to(self, next: LendingStatus) -> bool {
        use LendingStatus::*;

        matches!(
            (self, next),
            (Pending, Borrowed)
                | (Pending, Returned)
                | (Borrowed, Returned)
                | (Overdue, Borrowed)
                | (Overdue, Returned)
        )
    }

    /// Statuses reachable from this one, in menu order
    pub fn next_statuses(self) -> Vec<LendingStatus> {
        Self::ALL
            .into_iter()
            .filter(|next| self.can_transition_to(*next))
            .collect()
    }

    pub fn is_returned(self) -> bool {
        self == LendingStatus::Returned
    }
}

impl std::fmt::Display for LendingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LendingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(LendingStatus::Pending),
            "borrowed" => Ok(LendingStatus::Borrowed),
            "returned" => Ok(LendingStatus::Returned),
            "overdue" => Ok(LendingStatus::Overdue),
            _ => Err(format!("Invalid lending status: {}", s)),
        }
    }
}

/// Lending record with plain references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LendingRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub book_id: String,
    pub reader_id: String,
    pub borrowed_date: String,
    pub due_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned_date: Option<String>,
    pub status: LendingStatus,
}

/// Lending payload for create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewLending {
    pub book_id: String,
    pub reader_id: String,
    pub borrowed_date: String,
    pub due_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned_date: Option<String>,
    pub status: LendingStatus,
}

impl From<LendingRecord> for NewLending {
    fn from(record: LendingRecord) -> Self {
        Self {
            book_id: record.book_id,
            reader_id: record.reader_id,
            borrowed_date: record.borrowed_date,
            due_date: record.due_date,
            returned_date: record.returned_date,
            status: record.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReaderSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Lending record with book and reader expanded by the server (read-only).
///
/// A reference is `None` when the book or reader was deleted after lending;
/// deletes do not cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LendingPopulated {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "bookId", default)]
    pub book: Option<BookSummary>,
    #[serde(rename = "readerId", default)]
    pub reader: Option<ReaderSummary>,
    pub borrowed_date: String,
    pub due_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned_date: Option<String>,
    pub status: LendingStatus,
}

impl LendingPopulated {
    /// Returned lendings are never overdue, whatever their due date
    pub fn is_open(&self) -> bool {
        !self.status.is_returned() && self.returned_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LendingStatus::*;

    #[test]
    fn test_transition_table() {
        assert!(Pending.can_transition_to(Borrowed));
        assert!(Pending.can_transition_to(Returned));
        assert!(Borrowed.can_transition_to(Returned));
        assert!(Overdue.can_transition_to(Returned));
        assert!(Overdue.can_transition_to(Borrowed));

        assert!(!Borrowed.can_transition_to(Pending));
        assert!(!Borrowed.can_transition_to(Overdue));
        assert!(!Pending.can_transition_to(Overdue));
        for next in LendingStatus::ALL {
            assert!(!Returned.can_transition_to(next));
            assert!(!next.can_transition_to(next));
        }
    }

    #[test]
    fn test_next_statuses_follow_menu_order() {
        assert_eq!(Pending.next_statuses(), vec![Borrowed, Returned]);
        assert_eq!(Borrowed.next_statuses(), vec![Returned]);
        assert!(Returned.next_statuses().is_empty());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Borrowed".parse::<LendingStatus>(), Ok(Borrowed));
        assert!("lost".parse::<LendingStatus>().is_err());
        assert_eq!(serde_json::to_string(&Overdue).unwrap(), "\"overdue\"");
    }

    #[test]
    fn test_populated_record_wire_format() {
        let record: LendingPopulated = serde_json::from_str(
            r#"{
                "_id": "l1",
                "bookId": {"_id": "b1", "title": "Dune", "author": "Frank Herbert"},
                "readerId": {"_id": "r1", "name": "Ada", "email": "ada@club.org"},
                "borrowedDate": "2024-01-01",
                "dueDate": "2024-01-15",
                "status": "borrowed"
            }"#,
        )
        .unwrap();

        assert_eq!(record.book.as_ref().map(|b| b.title.as_str()), Some("Dune"));
        assert_eq!(record.reader.as_ref().map(|r| r.id.as_str()), Some("r1"));
        assert!(record.is_open());
    }

    #[test]
    fn test_deleted_reference_decodes_as_none() {
        let record: LendingPopulated = serde_json::from_str(
            r#"{"_id":"l2","bookId":null,"readerId":null,"borrowedDate":"2024-01-01",
                "dueDate":"2024-01-15","returnedDate":"2024-01-10","status":"returned"}"#,
        )
        .unwrap();

        assert!(record.book.is_none());
        assert!(!record.is_open());
    }
}
