use chrono::{DateTime, Timelike, Utc};
use std::fmt;

pub const SUBJECT_MAX_LENGTH: usize = 300;

pub const SUBJECT_BLANK: &str = "This field may not be blank.";
pub const SUBJECT_NUL: &str = "Null characters are not allowed.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub id: i32,
    pub subject: String,
    pub vote_taken: DateTime<Utc>,
    pub ayes: Option<i32>,
    pub nays: Option<i32>,
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}/{} on {}",
            self.subject,
            Tally(self.ayes),
            Tally(self.nays),
            self.vote_taken.format("%c")
        )
    }
}

struct Tally(Option<i32>);

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(count) => write!(f, "{count}"),
            None => f.write_str("-"),
        }
    }
}

/// Fields for a vote that has not been stored yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewVote {
    pub subject: String,
    /// Defaults to the time of insertion.
    pub vote_taken: Option<DateTime<Utc>>,
    pub ayes: Option<i32>,
    pub nays: Option<i32>,
}

impl NewVote {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    pub fn with_vote_taken(mut self, vote_taken: DateTime<Utc>) -> Self {
        self.vote_taken = Some(vote_taken);
        self
    }

    pub fn with_ayes(mut self, ayes: Option<i32>) -> Self {
        self.ayes = ayes;
        self
    }

    pub fn with_nays(mut self, nays: Option<i32>) -> Self {
        self.nays = nays;
        self
    }
}

/// Partial update. `None` leaves a column untouched; for the tallies
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteChanges {
    pub subject: Option<String>,
    pub vote_taken: Option<DateTime<Utc>>,
    pub ayes: Option<Option<i32>>,
    pub nays: Option<Option<i32>>,
}

impl VoteChanges {
    pub fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.vote_taken.is_none()
            && self.ayes.is_none()
            && self.nays.is_none()
    }
}

/// Checks a subject that has already been trimmed.
pub fn validate_subject(subject: &str) -> Result<(), String> {
    if subject.trim().is_empty() {
        return Err(SUBJECT_BLANK.to_string());
    }
    if subject.contains('\0') {
        return Err(SUBJECT_NUL.to_string());
    }
    if subject.chars().count() > SUBJECT_MAX_LENGTH {
        return Err(subject_too_long());
    }
    Ok(())
}

pub fn subject_too_long() -> String {
    format!("Ensure this field has no more than {SUBJECT_MAX_LENGTH} characters.")
}

/// Drops sub-microsecond precision so timestamps round-trip through every backend.
pub fn truncate_to_micros(ts: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = ts.nanosecond() / 1_000 * 1_000;
    ts.with_nanosecond(nanos).unwrap_or(ts)
}
