use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use votes_errors::{AppError, FieldErrors};

use super::input::{EmptyForm, RawField, VoteInput};
use super::timestamp::{format_timestamp, parse_timestamp, DATETIME_FORMAT_ERROR};
use crate::domain::{validate_subject, NewVote, Vote, VoteChanges, SUBJECT_MAX_LENGTH};

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const NOT_AN_INTEGER: &str = "A valid integer is required.";

const MAX_INTEGER_STRING_LENGTH: usize = 1000;

/// The flat form of a vote at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRepresentation {
    pub id: i32,
    pub subject: String,
    pub vote_taken: String,
    pub ayes: Option<i32>,
    pub nays: Option<i32>,
}

impl From<&Vote> for VoteRepresentation {
    fn from(vote: &Vote) -> Self {
        Self {
            id: vote.id,
            subject: vote.subject.clone(),
            vote_taken: format_timestamp(&vote.vote_taken),
            ayes: vote.ayes,
            nays: vote.nays,
        }
    }
}

#[derive(Default)]
struct ParsedFields {
    subject: Option<String>,
    vote_taken: Option<DateTime<Utc>>,
    ayes: Option<Option<i32>>,
    nays: Option<Option<i32>>,
}

pub struct VoteSerializer;

impl VoteSerializer {
    pub const FIELDS: [&'static str; 5] = ["id", "subject", "vote_taken", "ayes", "nays"];

    pub fn to_representation(vote: &Vote) -> VoteRepresentation {
        VoteRepresentation::from(vote)
    }

    pub fn to_value(vote: &Vote) -> Value {
        serde_json::to_value(Self::to_representation(vote)).unwrap_or(Value::Null)
    }

    pub fn to_values(votes: &[Vote]) -> Value {
        Value::Array(votes.iter().map(Self::to_value).collect())
    }

    pub fn parse_create(input: &VoteInput) -> Result<NewVote, AppError> {
        let fields = Self::parse_fields(input, true)?;
        Ok(NewVote {
            subject: fields.subject.unwrap_or_default(),
            vote_taken: fields.vote_taken,
            ayes: fields.ayes.flatten(),
            nays: fields.nays.flatten(),
        })
    }

    /// `partial` is PATCH semantics: nothing is required.
    pub fn parse_update(input: &VoteInput, partial: bool) -> Result<VoteChanges, AppError> {
        let fields = Self::parse_fields(input, !partial)?;
        Ok(VoteChanges {
            subject: fields.subject,
            vote_taken: fields.vote_taken,
            ayes: fields.ayes,
            nays: fields.nays,
        })
    }

    /// Field descriptions for OPTIONS responses.
    pub fn describe() -> Value {
        let integer = |label: &str| {
            json!({
                "type": "integer",
                "required": false,
                "read_only": false,
                "label": label,
                "min_value": i32::MIN,
                "max_value": i32::MAX,
            })
        };
        json!({
            "id": { "type": "integer", "required": false, "read_only": true, "label": "ID" },
            "subject": {
                "type": "string",
                "required": true,
                "read_only": false,
                "label": "Subject",
                "max_length": SUBJECT_MAX_LENGTH,
            },
            "vote_taken": {
                "type": "datetime",
                "required": false,
                "read_only": false,
                "label": "Vote taken",
            },
            "ayes": integer("Ayes"),
            "nays": integer("Nays"),
        })
    }

    fn parse_fields(input: &VoteInput, require_subject: bool) -> Result<ParsedFields, AppError> {
        let mut errors = FieldErrors::new();
        let mut fields = ParsedFields::default();

        match input.field("subject", EmptyForm::Keep) {
            RawField::Missing if require_subject => errors.add("subject", REQUIRED),
            RawField::Missing => {}
            RawField::Null => errors.add("subject", NOT_NULL),
            RawField::Present(value) => match parse_subject(value) {
                Ok(subject) => fields.subject = Some(subject),
                Err(message) => errors.add("subject", message),
            },
        }

        match input.field("vote_taken", EmptyForm::Missing) {
            RawField::Missing => {}
            RawField::Null => errors.add("vote_taken", NOT_NULL),
            RawField::Present(value) => {
                match value.as_str().and_then(parse_timestamp) {
                    Some(ts) => fields.vote_taken = Some(ts),
                    None => errors.add("vote_taken", DATETIME_FORMAT_ERROR),
                }
            }
        }

        fields.ayes = parse_tally(input, "ayes", &mut errors);
        fields.nays = parse_tally(input, "nays", &mut errors);

        errors.into_result()?;
        Ok(fields)
    }
}

fn parse_subject(value: &Value) -> Result<String, String> {
    let subject = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(NOT_A_STRING.to_string()),
    };
    validate_subject(&subject)?;
    Ok(subject)
}

fn parse_tally(input: &VoteInput, name: &str, errors: &mut FieldErrors) -> Option<Option<i32>> {
    match input.field(name, EmptyForm::Null) {
        RawField::Missing => None,
        RawField::Null => Some(None),
        RawField::Present(value) => match parse_integer(value) {
            Ok(count) => Some(Some(count)),
            Err(message) => {
                errors.add(name, message);
                None
            }
        },
    }
}

fn parse_integer(value: &Value) -> Result<i32, String> {
    let wide: i128 = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i128::from(i)
            } else if let Some(u) = n.as_u64() {
                i128::from(u)
            } else {
                integral_float(n.as_f64())?
            }
        }
        Value::String(s) => {
            if s.len() > MAX_INTEGER_STRING_LENGTH {
                return Err("String value too large.".to_string());
            }
            parse_integer_str(s.trim())?
        }
        _ => return Err(NOT_AN_INTEGER.to_string()),
    };

    if wide > i128::from(i32::MAX) {
        return Err(format!(
            "Ensure this value is less than or equal to {}.",
            i32::MAX
        ));
    }
    if wide < i128::from(i32::MIN) {
        return Err(format!(
            "Ensure this value is greater than or equal to {}.",
            i32::MIN
        ));
    }
    Ok(wide as i32)
}

/// Integers, optionally written with a zero fraction such as `"12.0"`.
fn parse_integer_str(s: &str) -> Result<i128, String> {
    let digits = match s.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        Some(_) => return Err(NOT_AN_INTEGER.to_string()),
        None => s,
    };
    digits
        .parse::<i128>()
        .map_err(|_| NOT_AN_INTEGER.to_string())
}

fn integral_float(value: Option<f64>) -> Result<i128, String> {
    match value {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e30 => Ok(f as i128),
        _ => Err(NOT_AN_INTEGER.to_string()),
    }
}
