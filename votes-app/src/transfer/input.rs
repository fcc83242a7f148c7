use serde_json::{Map, Value};
use votes_errors::{AppError, FieldErrors};

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputSource {
    #[default]
    Json,
    Form,
}

/// How an empty form value is read for a given field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EmptyForm {
    Keep,
    Null,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum RawField<'a> {
    Missing,
    Null,
    Present(&'a Value),
}

/// A flat key/value payload as submitted by a client.
#[derive(Debug, Clone, Default)]
pub struct VoteInput {
    fields: Map<String, Value>,
    source: InputSource,
}

impl VoteInput {
    pub fn empty(source: InputSource) -> Self {
        Self {
            fields: Map::new(),
            source,
        }
    }

    pub fn from_json(value: Value) -> Result<Self, AppError> {
        match value {
            Value::Object(fields) => Ok(Self {
                fields,
                source: InputSource::Json,
            }),
            other => Err(FieldErrors::single(
                NON_FIELD_ERRORS,
                format!(
                    "Invalid data. Expected an object, but got {}.",
                    json_kind(&other)
                ),
            )
            .into()),
        }
    }

    pub fn from_json_slice(body: &[u8]) -> Result<Self, AppError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| AppError::ParseError(format!("JSON parse error - {e}")))?;
        Self::from_json(value)
    }

    /// Repeated keys keep the last value.
    pub fn from_form<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect();
        Self {
            fields,
            source: InputSource::Form,
        }
    }

    pub fn source(&self) -> InputSource {
        self.source
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn field(&self, name: &str, empty_form: EmptyForm) -> RawField<'_> {
        match self.fields.get(name) {
            None => RawField::Missing,
            Some(Value::Null) => RawField::Null,
            Some(value @ Value::String(s)) if self.source == InputSource::Form && s.is_empty() => {
                match empty_form {
                    EmptyForm::Keep => RawField::Present(value),
                    EmptyForm::Null => RawField::Null,
                    EmptyForm::Missing => RawField::Missing,
                }
            }
            Some(value) => RawField::Present(value),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_object_json_is_rejected() {
        let err = VoteInput::from_json(json!([1, 2])).unwrap_err();
        match err {
            AppError::Validation(errors) => assert_eq!(
                errors.get(NON_FIELD_ERRORS).unwrap()[0],
                "Invalid data. Expected an object, but got array."
            ),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = VoteInput::from_json_slice(b"{\"subject\": ").unwrap_err();
        assert!(matches!(err, AppError::ParseError(msg) if msg.starts_with("JSON parse error - ")));
    }

    #[test]
    fn test_empty_form_values() {
        let input = VoteInput::from_form([("subject", ""), ("ayes", ""), ("vote_taken", "")]);
        assert!(matches!(input.field("subject", EmptyForm::Keep), RawField::Present(_)));
        assert_eq!(input.field("ayes", EmptyForm::Null), RawField::Null);
        assert_eq!(input.field("vote_taken", EmptyForm::Missing), RawField::Missing);
        assert_eq!(input.field("nays", EmptyForm::Null), RawField::Missing);
    }

    #[test]
    fn test_empty_json_string_is_kept() {
        let input = VoteInput::from_json(json!({ "ayes": "" })).unwrap();
        assert_eq!(input.field("ayes", EmptyForm::Null), RawField::Present(&json!("")));
    }

    #[test]
    fn test_form_last_value_wins() {
        let input = VoteInput::from_form([("subject", "first"), ("subject", "second")]);
        assert_eq!(
            input.field("subject", EmptyForm::Keep),
            RawField::Present(&json!("second"))
        );
    }
}
