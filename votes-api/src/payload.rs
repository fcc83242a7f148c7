use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use votes_app::transfer::{InputSource, VoteInput};
use votes_errors::AppError;

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

/// Parsed request body. JSON and urlencoded forms are supported; an empty
/// body yields empty input whatever its content type.
#[derive(Debug)]
pub struct Payload(pub VoteInput);

impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let media_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(media_type_of)
            .unwrap_or_default();

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::ParseError(e.body_text()))?;

        let input = match media_type.as_str() {
            FORM if body.is_empty() => VoteInput::empty(InputSource::Form),
            FORM => VoteInput::from_form(url::form_urlencoded::parse(&body).into_owned()),
            _ if body.is_empty() => VoteInput::empty(InputSource::Json),
            json if is_json(json) => VoteInput::from_json_slice(&body)?,
            other => {
                tracing::warn!("Rejected request body with content type {}", other);
                return Err(AppError::UnsupportedMediaType(other.to_string()));
            }
        };
        Ok(Self(input))
    }
}

fn media_type_of(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn is_json(media_type: &str) -> bool {
    media_type == JSON || media_type.ends_with("+json")
}
