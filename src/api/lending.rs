//! Lending page: lend books and move lendings through their lifecycle

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Book, LendingRecord, LendingStatus, NewLending, Reader},
    overdue::{parse_due_date, AnnotatedLending},
    session::Session,
    AppState,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Loan period offered by the lend form's auto-calculated due date
pub const DEFAULT_LOAN_DAYS: u64 = 14;

/// One row of the lending table
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LendingRow {
    #[serde(flatten)]
    pub lending: AnnotatedLending,
    /// Statuses the row can be moved to
    pub next_statuses: Vec<LendingStatus>,
}

/// Quick stats card of the lending page
#[derive(Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LendingStats {
    /// Records with status `borrowed`
    pub currently_lent: usize,
    pub total_records: usize,
    /// Records with status `returned`
    pub returned: usize,
}

impl LendingStats {
    pub fn from_statuses(statuses: impl IntoIterator<Item = LendingStatus>) -> Self {
        statuses
            .into_iter()
            .fold(Self::default(), |mut stats, status| {
                stats.total_records += 1;
                match status {
                    LendingStatus::Borrowed => stats.currently_lent += 1,
                    LendingStatus::Returned => stats.returned += 1,
                    _ => {}
                }
                stats
            })
    }
}

/// Due date proposed to the lend form: today plus the default loan period
pub fn suggested_due_date(today: NaiveDate) -> String {
    today
        .checked_add_days(Days::new(DEFAULT_LOAN_DAYS))
        .unwrap_or(today)
        .format(DATE_FORMAT)
        .to_string()
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LendingPage {
    pub records: Vec<LendingRow>,
    pub stats: LendingStats,
    /// `YYYY-MM-DD`, today plus 14 days
    pub suggested_due_date: String,
    /// Pick list for the lend form
    pub books: Vec<Book>,
    /// Pick list for the lend form
    pub readers: Vec<Reader>,
    /// Status menu, in display order
    pub statuses: Vec<LendingStatus>,
}

/// Lend form
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LendRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Please fill in all fields"))]
    pub book_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Please fill in all fields"))]
    pub reader_id: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    #[validate(length(min = 1, message = "Please fill in all fields"))]
    pub due_date: String,
}

impl LendRequest {
    /// Check the form and build the lending it creates. The due date may be
    /// today but not earlier.
    pub fn into_lending(self, today: NaiveDate) -> AppResult<NewLending> {
        self.validate()?;

        let due = parse_due_date(&self.due_date)
            .map(|due| due.date_naive())
            .ok_or_else(|| AppError::Validation(format!("Invalid due date: {}", self.due_date)))?;

        if due < today {
            return Err(AppError::Validation(
                "Due date cannot be before borrowed date!".to_string(),
            ));
        }

        Ok(NewLending {
            book_id: self.book_id,
            reader_id: self.reader_id,
            borrowed_date: today.format(DATE_FORMAT).to_string(),
            due_date: due.format(DATE_FORMAT).to_string(),
            returned_date: None,
            status: LendingStatus::Borrowed,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: LendingStatus,
}

/// Apply a status change to a stored record, stamping the return date when
/// the book comes back
pub fn apply_status(
    record: LendingRecord,
    next: LendingStatus,
    today: NaiveDate,
) -> AppResult<NewLending> {
    if !record.status.can_transition_to(next) {
        return Err(AppError::InvalidTransition {
            from: record.status,
            to: next,
        });
    }

    let mut lending = NewLending::from(record);
    lending.status = next;
    if next.is_returned() {
        lending.returned_date = Some(today.format(DATE_FORMAT).to_string());
    }
    Ok(lending)
}

/// Lending table with the lend form pick lists
#[utoipa::path(
    get,
    path = "/dashboard/lending",
    tag = "lending",
    responses(
        (status = 200, description = "Lending page", body = LendingPage),
        (status = 303, description = "No session, redirect to sign-in")
    )
)]
pub async fn lending_page(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<LendingPage>> {
    let (lendings, books, readers) = tokio::try_join!(
        state.services.lendings.get_all_populated(&session),
        state.services.books.get_all(&session),
        state.services.readers.get_all(&session),
    )?;

    let now = Utc::now();
    let stats = LendingStats::from_statuses(lendings.iter().map(|l| l.status));
    let records = lendings
        .into_iter()
        .map(|lending| {
            let next_statuses = lending.status.next_statuses();
            LendingRow {
                lending: AnnotatedLending::new(lending, now),
                next_statuses,
            }
        })
        .collect();

    Ok(Json(LendingPage {
        records,
        stats,
        suggested_due_date: suggested_due_date(now.date_naive()),
        books,
        readers,
        statuses: LendingStatus::ALL.to_vec(),
    }))
}

/// Lend a book to a reader, starting today
#[utoipa::path(
    post,
    path = "/dashboard/lending",
    tag = "lending",
    request_body = LendRequest,
    responses(
        (status = 201, description = "Lending created", body = LendingRecord),
        (status = 400, description = "Missing field or due date in the past", body = crate::error::ErrorResponse),
        (status = 409, description = "Same form already submitted", body = crate::error::ErrorResponse)
    )
)]
pub async fn lend_book(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LendRequest>,
) -> AppResult<(StatusCode, Json<LendingRecord>)> {
    let lending = request.into_lending(Utc::now().date_naive())?;
    let _permit = state.in_flight.begin(&session, "lending.create")?;

    let created = state.services.lendings.create(&session, &lending).await?;
    tracing::info!(
        "Lent book {} to reader {} until {}",
        created.book_id,
        created.reader_id,
        created.due_date
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// Change the status of a lending
#[utoipa::path(
    put,
    path = "/dashboard/lending/{id}/status",
    tag = "lending",
    params(("id" = String, Path, description = "Lending ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = LendingRecord),
        (status = 404, description = "Lending not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Transition not allowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> AppResult<Json<LendingRecord>> {
    let _permit = state.in_flight.begin(&session, format!("lending.status.{}", id))?;

    let record = state.services.lendings.get_by_id(&session, &id).await?;
    let from = record.status;
    let lending = apply_status(record, request.status, Utc::now().date_naive())?;

    let updated = state.services.lendings.update(&session, &id, &lending).await?;
    tracing::info!("Lending {} moved from {} to {}", id, from, updated.status);
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn lend(due_date: &str) -> LendRequest {
        LendRequest {
            book_id: "b1".into(),
            reader_id: "r1".into(),
            due_date: due_date.into(),
        }
    }

    fn record(status: LendingStatus) -> LendingRecord {
        LendingRecord {
            id: "l1".into(),
            book_id: "b1".into(),
            reader_id: "r1".into(),
            borrowed_date: "2024-01-01".into(),
            due_date: "2024-01-10".into(),
            returned_date: None,
            status,
        }
    }

    #[test]
    fn test_lend_starts_today_as_borrowed() {
        let lending = lend("2024-01-29").into_lending(today()).unwrap();

        assert_eq!(lending.borrowed_date, "2024-01-15");
        assert_eq!(lending.due_date, "2024-01-29");
        assert_eq!(lending.status, LendingStatus::Borrowed);
        assert!(lending.returned_date.is_none());
    }

    #[test]
    fn test_lend_due_today_is_allowed() {
        assert!(lend("2024-01-15").into_lending(today()).is_ok());
    }

    #[test]
    fn test_lend_due_in_the_past_is_rejected() {
        match lend("2024-01-14").into_lending(today()) {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "Due date cannot be before borrowed date!")
            }
            other => panic!("unexpected result: {:?}", other.map(|l| l.due_date)),
        }
    }

    #[test]
    fn test_lend_requires_every_field() {
        let request = LendRequest {
            book_id: "b1".into(),
            ..Default::default()
        };
        match request.into_lending(today()) {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "Please fill in all fields"),
            other => panic!("unexpected result: {:?}", other.map(|l| l.due_date)),
        }
    }

    #[test]
    fn test_returning_stamps_the_return_date() {
        let lending = apply_status(record(LendingStatus::Borrowed), LendingStatus::Returned, today()).unwrap();

        assert_eq!(lending.status, LendingStatus::Returned);
        assert_eq!(lending.returned_date.as_deref(), Some("2024-01-15"));
        assert_eq!(lending.borrowed_date, "2024-01-01");
    }

    #[test]
    fn test_pending_can_be_borrowed_without_return_date() {
        let lending = apply_status(record(LendingStatus::Pending), LendingStatus::Borrowed, today()).unwrap();
        assert_eq!(lending.status, LendingStatus::Borrowed);
        assert!(lending.returned_date.is_none());
    }

    #[test]
    fn test_quick_stats_count_by_status() {
        use LendingStatus::*;

        let stats = LendingStats::from_statuses([Borrowed, Returned, Overdue, Borrowed, Pending]);
        assert_eq!(
            stats,
            LendingStats {
                currently_lent: 2,
                total_records: 5,
                returned: 1,
            }
        );
        assert_eq!(LendingStats::from_statuses(Vec::new()), LendingStats::default());
    }

    #[test]
    fn test_suggested_due_date_is_two_weeks_out() {
        assert_eq!(suggested_due_date(today()), "2024-01-29");
        let new_year = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        assert_eq!(suggested_due_date(new_year), "2025-01-08");
        assert!(lend(&suggested_due_date(today())).into_lending(today()).is_ok());
    }

    #[test]
    fn test_returned_is_terminal() {
        let result = apply_status(record(LendingStatus::Returned), LendingStatus::Borrowed, today());
        assert!(matches!(
            result,
            Err(AppError::InvalidTransition {
                from: LendingStatus::Returned,
                to: LendingStatus::Borrowed
            })
        ));
    }
}
