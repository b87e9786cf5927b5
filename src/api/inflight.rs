//! Per-form submission guard
//!
//! A form may have at most one submission in flight per session. A second
//! submission arriving before the first settles is rejected instead of
//! reaching the remote API.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::{error::AppError, session::Session};

type FormKey = (u64, String);

#[derive(Clone, Default)]
pub struct InFlight {
    active: Arc<Mutex<HashSet<FormKey>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `form` for this session until the returned permit is dropped
    pub fn begin(&self, session: &Session, form: impl Into<String>) -> Result<InFlightPermit, AppError> {
        let key = (session.fingerprint(), form.into());

        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if !active.insert(key.clone()) {
            tracing::info!("Duplicate submission of {} rejected", key.1);
            return Err(AppError::Conflict(format!(
                "A submission of {} is already in progress",
                key.1
            )));
        }

        Ok(InFlightPermit {
            active: Arc::clone(&self.active),
            key,
        })
    }
}

/// Released when dropped, whether the submission succeeded or failed
pub struct InFlightPermit {
    active: Arc<Mutex<HashSet<FormKey>>>,
    key: FormKey,
}

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        active.remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_submission_is_rejected_until_release() {
        let guard = InFlight::new();
        let session = Session::new(Some("token".into()), None);

        let permit = guard.begin(&session, "books.create").unwrap();
        assert!(matches!(
            guard.begin(&session, "books.create"),
            Err(AppError::Conflict(_))
        ));

        drop(permit);
        assert!(guard.begin(&session, "books.create").is_ok());
    }

    #[test]
    fn test_forms_and_sessions_are_independent() {
        let guard = InFlight::new();
        let alice = Session::new(Some("alice".into()), None);
        let bob = Session::new(Some("bob".into()), None);

        let _a = guard.begin(&alice, "readers.create").unwrap();
        assert!(guard.begin(&alice, "books.create").is_ok());
        assert!(guard.begin(&bob, "readers.create").is_ok());
    }
}
