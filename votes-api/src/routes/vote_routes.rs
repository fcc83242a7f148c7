use axum::{
    extract::{Path, State},
    http::Method,
    response::Response,
    routing::get,
    Router,
};
use votes_app::transfer::VoteSerializer;
use votes_errors::AppError;

use crate::payload::Payload;
use crate::renderer::{ApiError, Renderer};
use crate::state::AppState;

// --- Collection ---

async fn list_votes(
    State(state): State<AppState>,
    renderer: Renderer,
) -> Result<Response, ApiError> {
    let votes = renderer.check(state.ctx.votes.list().await)?;
    Ok(renderer.list(&votes))
}

async fn create_vote(
    State(state): State<AppState>,
    renderer: Renderer,
    payload: Result<Payload, AppError>,
) -> Result<Response, ApiError> {
    let Payload(input) = renderer.check(payload)?;
    let new_vote = renderer.check(VoteSerializer::parse_create(&input))?;
    let vote = renderer.check(state.ctx.votes.create(new_vote).await)?;
    Ok(renderer.created(&vote))
}

// --- Item ---

async fn get_vote(
    State(state): State<AppState>,
    renderer: Renderer,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = renderer.check(parse_id(&id))?;
    let vote = renderer.check(state.ctx.votes.get(id).await)?;
    Ok(renderer.detail(&vote))
}

async fn replace_vote(
    state: State<AppState>,
    renderer: Renderer,
    id: Path<String>,
    payload: Result<Payload, AppError>,
) -> Result<Response, ApiError> {
    update_vote(state, renderer, id, payload, false).await
}

async fn patch_vote(
    state: State<AppState>,
    renderer: Renderer,
    id: Path<String>,
    payload: Result<Payload, AppError>,
) -> Result<Response, ApiError> {
    update_vote(state, renderer, id, payload, true).await
}

async fn update_vote(
    State(state): State<AppState>,
    renderer: Renderer,
    Path(id): Path<String>,
    payload: Result<Payload, AppError>,
    partial: bool,
) -> Result<Response, ApiError> {
    let id = renderer.check(parse_id(&id))?;
    // Unknown ids are reported before anything about the body.
    renderer.check(state.ctx.votes.get(id).await)?;

    let Payload(input) = renderer.check(payload)?;
    let changes = renderer.check(VoteSerializer::parse_update(&input, partial))?;
    let vote = renderer.check(state.ctx.votes.update(id, changes).await)?;
    Ok(renderer.detail(&vote))
}

async fn delete_vote(
    State(state): State<AppState>,
    renderer: Renderer,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = renderer.check(parse_id(&id))?;
    renderer.check(state.ctx.votes.delete(id).await)?;
    Ok(renderer.deleted())
}

// --- Shared ---

async fn describe_votes(renderer: Renderer) -> Response {
    renderer.options()
}

async fn method_not_allowed(method: Method, renderer: Renderer) -> ApiError {
    renderer.fail(AppError::MethodNotAllowed(method.to_string()))
}

fn parse_id(raw: &str) -> Result<i32, AppError> {
    raw.parse().map_err(|_| AppError::NotFound)
}

pub fn create_votes_router() -> Router<AppState> {
    Router::new()
        .route(
            "/votes/",
            get(list_votes)
                .post(create_vote)
                .options(describe_votes)
                .fallback(method_not_allowed),
        )
        .route(
            "/votes/{id}/",
            get(get_vote)
                .put(replace_vote)
                .patch(patch_vote)
                .delete(delete_vote)
                .options(describe_votes)
                .fallback(method_not_allowed),
        )
}
