use axum::extract::{FromRequestParts, MatchedPath};
use axum::http::header::{ACCEPT, ALLOW, VARY};
use axum::http::request::Parts;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use tera::Context;
use votes_app::domain::Vote;
use votes_app::transfer::VoteSerializer;
use votes_errors::{AppError, FieldErrors};

use crate::negotiation::{negotiate, Format};
use crate::state::AppState;
use crate::templates::{Templates, VoteView};

pub const COLLECTION_PATH: &str = "/votes/";

const PARSES: [&str; 2] = ["application/json", "application/x-www-form-urlencoded"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Collection,
    Item,
}

impl Endpoint {
    fn from_route(route: Option<&str>) -> Self {
        match route {
            Some(route) if route.contains("{id}") => Self::Item,
            _ => Self::Collection,
        }
    }

    pub fn allow(self) -> &'static str {
        match self {
            Self::Collection => "GET, POST, HEAD, OPTIONS",
            Self::Item => "GET, PUT, PATCH, DELETE, HEAD, OPTIONS",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Collection => "Vote List",
            Self::Item => "Vote Detail",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::Item => "item",
        }
    }
}

/// Renders handler results in the format the client negotiated.
#[derive(Clone)]
pub struct Renderer {
    format: Format,
    endpoint: Endpoint,
    method: Method,
    path: String,
    templates: Arc<Templates>,
}

impl FromRequestParts<AppState> for Renderer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let format_param = parts.uri.query().and_then(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == "format")
                .map(|(_, value)| value.into_owned())
        });
        let accept = parts
            .headers
            .get_all(ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect::<Vec<_>>()
            .join(",");
        let accept = (!accept.is_empty()).then_some(accept);

        let format = negotiate(format_param.as_deref(), accept.as_deref())?;
        let endpoint = Endpoint::from_route(parts.extensions.get::<MatchedPath>().map(MatchedPath::as_str));

        Ok(Self {
            format,
            endpoint,
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            templates: state.templates.clone(),
        })
    }
}

/// An error that renders itself in the negotiated format.
pub struct ApiError {
    error: AppError,
    renderer: Renderer,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.renderer.error(&self.error)
    }
}

impl Renderer {
    pub fn check<T>(&self, result: Result<T, AppError>) -> Result<T, ApiError> {
        result.map_err(|error| ApiError {
            error,
            renderer: self.clone(),
        })
    }

    pub fn fail(&self, error: AppError) -> ApiError {
        ApiError {
            error,
            renderer: self.clone(),
        }
    }

    pub fn list(&self, votes: &[Vote]) -> Response {
        match self.format {
            Format::Html => {
                let views: Vec<VoteView> = votes.iter().map(VoteView::from).collect();
                let mut context = Context::new();
                context.insert("votes", &views);
                self.page(StatusCode::OK, "vote_list.html", &context)
            }
            _ => self.data(StatusCode::OK, VoteSerializer::to_values(votes)),
        }
    }

    /// Browsers that submitted the HTML form are sent back to the listing
    /// so a refresh does not repeat the POST.
    pub fn created(&self, vote: &Vote) -> Response {
        match self.format {
            Format::Html => self.finish(Redirect::to(COLLECTION_PATH).into_response()),
            _ => self.data(StatusCode::CREATED, VoteSerializer::to_value(vote)),
        }
    }

    pub fn detail(&self, vote: &Vote) -> Response {
        match self.format {
            Format::Html => {
                let mut context = Context::new();
                context.insert("vote", &VoteView::from(vote));
                self.page(StatusCode::OK, "vote.html", &context)
            }
            _ => self.data(StatusCode::OK, VoteSerializer::to_value(vote)),
        }
    }

    pub fn deleted(&self) -> Response {
        self.finish(StatusCode::NO_CONTENT.into_response())
    }

    pub fn options(&self) -> Response {
        let action = match self.endpoint {
            Endpoint::Collection => "POST",
            Endpoint::Item => "PUT",
        };
        let mut renders: Vec<&str> = Format::ALL.iter().map(|f| f.media_type()).collect();
        renders.dedup();
        let metadata = json!({
            "name": self.endpoint.name(),
            "description": "",
            "renders": renders,
            "parses": PARSES,
            "actions": { action: VoteSerializer::describe() },
        });
        self.data(StatusCode::OK, metadata)
    }

    pub fn error(&self, error: &AppError) -> Response {
        if error.is_server_error() {
            tracing::error!("{} {} failed: {}", self.method, self.path, error);
        } else {
            tracing::debug!("{} {} rejected: {}", self.method, self.path, error);
        }

        let status = error.status_code();
        match self.format {
            Format::Html => {
                let empty = FieldErrors::new();
                let (detail, errors) = match error {
                    AppError::Validation(errors) => (None, errors),
                    other => (Some(other.detail()), &empty),
                };
                let mut context = Context::new();
                context.insert("status", &status.as_u16());
                context.insert("reason", status.canonical_reason().unwrap_or_default());
                context.insert("detail", &detail);
                context.insert("errors", errors);
                self.page(status, "error.html", &context)
            }
            _ => self.data(status, error.body()),
        }
    }

    /// JSON for API clients, the browsable page for `format=api`.
    fn data(&self, status: StatusCode, body: Value) -> Response {
        match self.format {
            Format::Api => self.api_page(status, &body),
            Format::Json | Format::Html => self.finish((status, Json(body)).into_response()),
        }
    }

    fn api_page(&self, status: StatusCode, body: &Value) -> Response {
        let content = serde_json::to_string_pretty(body).unwrap_or_default();
        let mut context = Context::new();
        context.insert("name", self.endpoint.name());
        context.insert("method", self.method.as_str());
        context.insert("path", &self.path);
        context.insert("status", &status.as_u16());
        context.insert("reason", status.canonical_reason().unwrap_or_default());
        context.insert("allow", self.endpoint.allow());
        context.insert("endpoint", self.endpoint.key());
        context.insert("content", &content);
        self.page(status, "api.html", &context)
    }

    fn page(&self, status: StatusCode, template: &str, context: &Context) -> Response {
        match self.templates.render(template, context) {
            Ok(html) => self.finish((status, Html(html)).into_response()),
            Err(e) => {
                tracing::error!("Failed to render {}: {:?}", template, e);
                let error = AppError::Internal(e.to_string());
                self.finish((error.status_code(), Json(error.body())).into_response())
            }
        }
    }

    fn finish(&self, mut response: Response) -> Response {
        let headers = response.headers_mut();
        headers.insert(ALLOW, HeaderValue::from_static(self.endpoint.allow()));
        headers.insert(VARY, HeaderValue::from_static("Accept"));
        response
    }
}
