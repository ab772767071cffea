//! JSON endpoints for the rotating components and the consent banner

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::AppState;
use crate::render::{select_posts, PostCard};
use crate::rotation::RotationSnapshot;
use crate::router::{Location, STORIES_PAGE};

/// Name of the cookie recording that the visitor accepted cookies
pub const CONSENT_COOKIE: &str = "cookieConsent";

/// One year, in seconds
const CONSENT_MAX_AGE: u64 = 365 * 24 * 60 * 60;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/rotation", get(rotation))
        .route("/api/slider/pause", post(pause_slider))
        .route("/api/slider/resume", post(resume_slider))
        .route("/api/slider/next", post(next_slide))
        .route("/api/slider/prev", post(prev_slide))
        .route("/api/testimonials/next", post(next_testimonial))
        .route("/api/testimonials/prev", post(prev_testimonial))
        .route("/api/consent", post(accept_consent))
}

#[derive(Debug, Deserialize)]
pub struct PostsQuery {
    category: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostList {
    posts: Vec<PostCard>,
    has_more: bool,
}

#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
}

async fn list_posts(State(state): State<Arc<AppState>>, Query(query): Query<PostsQuery>) -> Response {
    let store = state.store();
    if let Some(reason) = store.posts.error() {
        tracing::debug!("Posts unavailable: {}", reason);
        let error = ApiError {
            error: state.renderer.i18n().get("error.load_failed"),
        };
        return (StatusCode::SERVICE_UNAVAILABLE, Json(error)).into_response();
    }

    let category = query.category.as_deref().filter(|c| !c.is_empty());
    let (selected, has_more) = select_posts(store.posts.items(), category, query.limit);
    let stories = Location::bare(STORIES_PAGE);
    Json(PostList {
        posts: selected
            .into_iter()
            .map(|post| PostCard::new(post, &stories))
            .collect(),
        has_more,
    })
    .into_response()
}

async fn rotation(State(state): State<Arc<AppState>>) -> Json<RotationSnapshot> {
    Json(state.hub.snapshot())
}

#[derive(Debug, Serialize)]
struct SlideState {
    index: usize,
    running: bool,
}

fn slide_state(state: &AppState) -> Json<SlideState> {
    let snapshot = state.hub.snapshot();
    Json(SlideState {
        index: snapshot.slider.current(),
        running: snapshot.slider_running,
    })
}

async fn pause_slider(State(state): State<Arc<AppState>>) -> Json<SlideState> {
    state.hub.pause_slider();
    slide_state(&state)
}

async fn resume_slider(State(state): State<Arc<AppState>>) -> Json<SlideState> {
    state.hub.resume_slider();
    slide_state(&state)
}

async fn next_slide(State(state): State<Arc<AppState>>) -> Json<SlideState> {
    state.hub.next_slide();
    slide_state(&state)
}

async fn prev_slide(State(state): State<Arc<AppState>>) -> Json<SlideState> {
    state.hub.prev_slide();
    slide_state(&state)
}

#[derive(Debug, Serialize)]
struct TestimonialState {
    index: usize,
}

async fn next_testimonial(State(state): State<Arc<AppState>>) -> Json<TestimonialState> {
    Json(TestimonialState {
        index: state.hub.next_testimonial(),
    })
}

async fn prev_testimonial(State(state): State<Arc<AppState>>) -> Json<TestimonialState> {
    Json(TestimonialState {
        index: state.hub.prev_testimonial(),
    })
}

async fn accept_consent() -> impl IntoResponse {
    let cookie = format!(
        "{}=true; Max-Age={}; Path=/; SameSite=Lax",
        CONSENT_COOKIE, CONSENT_MAX_AGE
    );
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)])
}

/// Whether the request carries the consent cookie
pub fn consent_given(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, value)| name == CONSENT_COOKIE && value == "true")
}
