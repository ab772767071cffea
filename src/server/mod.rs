//! Site server: rendered pages, rotation socket and static files

mod api;
mod files;

pub use api::{consent_given, CONSENT_COOKIE};
pub use files::mime_type;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Method, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::content::loader::site_path;
use crate::content::ContentStore;
use crate::render::PageRenderer;
use crate::rotation::RotationHub;
use crate::router::Location;
use crate::Studio;

/// Shared server state
pub struct AppState {
    pub studio: Studio,
    pub renderer: PageRenderer,
    pub hub: Arc<RotationHub>,
    store: RwLock<Arc<ContentStore>>,
}

impl AppState {
    /// Load content and build the rotators. Timers are not started.
    pub fn new(studio: &Studio) -> Result<Self> {
        let store = studio.load_store();
        Self::with_store(studio, store)
    }

    pub fn with_store(studio: &Studio, store: ContentStore) -> Result<Self> {
        let hub = Arc::new(RotationHub::new(&studio.config, &store));
        Ok(Self {
            studio: studio.clone(),
            renderer: PageRenderer::new(studio)?,
            hub,
            store: RwLock::new(Arc::new(store)),
        })
    }

    /// The current content; requests render against this snapshot
    pub fn store(&self) -> Arc<ContentStore> {
        let guard = self.store.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Re-read every collection, rebuild the rotators and tell open pages
    pub fn reload(&self) {
        let store = self.studio.load_store();
        self.hub.reload(&self.studio.config, &store);
        *self.store.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = Arc::new(store);
        self.hub.notify_reload();
        tracing::info!("Content reloaded");
    }

    /// Render a page, or `None` if the location is not a page
    fn render_page(&self, location: &Location, consent: bool) -> Result<Option<String>> {
        let store = self.store();
        let snapshot = self.hub.snapshot();
        let page = self
            .renderer
            .render(&store, &snapshot, location, consent)
            .with_context(|| format!("rendering {}", location.to_url()))?;
        Ok(page.map(|page| page.html))
    }
}

/// Build the application router
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/__rotation", get(rotation_handler))
        .merge(api::routes())
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(studio: &Studio, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let state = Arc::new(AppState::new(studio)?);
    state.hub.start();

    let app = app(Arc::clone(&state));

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Watching content for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let state = Arc::clone(&state);
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(state) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    state.hub.stop();
    Ok(())
}

/// Directories and files whose changes reload the content
fn watched_paths(studio: &Studio) -> Vec<(PathBuf, RecursiveMode)> {
    let mut paths = vec![
        (studio.base_dir.join("content"), RecursiveMode::Recursive),
        (studio.base_dir.join("data"), RecursiveMode::Recursive),
        (studio.base_dir.join("languages"), RecursiveMode::Recursive),
    ];

    let content = &studio.config.content;
    for file in [
        &content.posts,
        &content.students,
        &content.activities,
        &content.testimonials,
        &content.gallery,
    ] {
        let Ok(path) = site_path(&studio.base_dir, file) else {
            continue;
        };
        if !paths.iter().any(|(dir, _)| path.starts_with(dir)) {
            paths.push((path, RecursiveMode::NonRecursive));
        }
    }
    paths
}

/// Watch the collections and reload on change. Blocks the calling thread.
fn watch_and_reload(state: Arc<AppState>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Debounce editors that write several times per save
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for (path, mode) in watched_paths(&state.studio) {
        if path.exists() {
            debouncer.watcher().watch(&path, mode)?;
            tracing::debug!("Watching: {:?}", path);
        }
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant: Vec<_> = events
                    .iter()
                    .filter(|e| {
                        let path_str = e.path.to_string_lossy();
                        !path_str.contains(".git")
                            && !path_str.contains(".DS_Store")
                            && !path_str.ends_with('~')
                    })
                    .collect();

                if relevant.is_empty() {
                    continue;
                }

                for event in &relevant {
                    tracing::info!("File changed: {}", event.path.display());
                }
                state.reload();
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// WebSocket handler streaming rotation events
async fn rotation_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let hub = Arc::clone(&state.hub);
    ws.on_upgrade(move |socket| handle_rotation_socket(socket, hub))
}

/// Streams events to one page. The page reports hover over the slider as
/// `pause`/`resume` text frames; a hover still held when the page goes away
/// is released.
async fn handle_rotation_socket(mut socket: WebSocket, hub: Arc<RotationHub>) {
    tracing::debug!("Rotation client connected");
    let mut events = hub.subscribe();
    let mut hovering = false;

    loop {
        tokio::select! {
            result = events.recv() => {
                match result {
                    Ok(event) => {
                        let text = match serde_json::to_string(&event) {
                            Ok(text) => text,
                            Err(e) => {
                                tracing::warn!("Failed to encode {:?}: {}", event, e);
                                continue;
                            }
                        };
                        if socket.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Text(text))) => {
                        hovering = apply_hover(&hub, hovering, text.trim());
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    if hovering {
        hub.resume_slider();
    }
    tracing::debug!("Rotation client disconnected");
}

/// Apply a hover message from one page; repeated messages are ignored
fn apply_hover(hub: &Arc<RotationHub>, hovering: bool, message: &str) -> bool {
    match (message, hovering) {
        ("pause", false) => {
            hub.pause_slider();
            true
        }
        ("resume", true) => {
            hub.resume_slider();
            false
        }
        ("pause", true) | ("resume", false) => hovering,
        (other, _) => {
            tracing::debug!("Ignoring rotation message {:?}", other);
            hovering
        }
    }
}

/// Pages are rendered; every other path is a static file
async fn fallback_handler(State(state): State<Arc<AppState>>, request: Request<Body>) -> Response {
    if matches!(*request.method(), Method::GET | Method::HEAD) {
        let path = request.uri().path();
        let url = match request.uri().query() {
            Some(query) => format!("{}?{}", path, query),
            None => path.to_string(),
        };
        let location = Location::parse(&url);

        if location.page().is_some() {
            let consent = consent_given(request.headers());
            let state = Arc::clone(&state);
            let rendered =
                tokio::task::spawn_blocking(move || state.render_page(&location, consent)).await;

            match rendered {
                Ok(Ok(Some(html))) => return Html(html).into_response(),
                Ok(Ok(None)) => {}
                Ok(Err(e)) => {
                    tracing::error!("{:#}", e);
                    return (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response();
                }
                Err(e) => {
                    tracing::error!("Render task failed: {}", e);
                    return (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response();
                }
            }
        }
    }

    files::serve(&state.studio.base_dir, request).await
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fixtures;
    use crate::rotation::RotationEvent;
    use axum::body::to_bytes;
    use axum::http::header;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_app() -> (TempDir, Arc<AppState>) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("css")).unwrap();
        fs::write(dir.path().join("css/style.css"), "body{}").unwrap();

        let studio = Studio::new(dir.path()).unwrap();
        let state = Arc::new(AppState::with_store(&studio, fixtures::store()).unwrap());
        (dir, state)
    }

    async fn send(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, String) {
        let response = app(Arc::clone(state)).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_pages_are_rendered() {
        let (_dir, state) = test_app();
        let (status, html) = send(&state, get("/stories.html?category=Cooking")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(html.matches("class=\"post-card\"").count(), 2);

        let (status, html) = send(&state, get("/index.html")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("hero-slider"));
    }

    #[tokio::test]
    async fn test_consent_cookie_hides_banner() {
        let (_dir, state) = test_app();
        let (_, html) = send(&state, get("/portfolio.html")).await;
        assert!(html.contains("cookie-consent"));

        let request = Request::builder()
            .uri("/portfolio.html")
            .header(header::COOKIE, "cookieConsent=true")
            .body(Body::empty())
            .unwrap();
        let (_, html) = send(&state, request).await;
        assert!(!html.contains("cookie-consent"));

        let response = app(Arc::clone(&state))
            .oneshot(post("/api/consent"))
            .await
            .unwrap();
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("cookieConsent=true; Max-Age=31536000; Path=/"));
    }

    #[tokio::test]
    async fn test_static_files_and_not_found() {
        let (_dir, state) = test_app();
        let (status, body) = send(&state, get("/css/style.css")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "body{}");

        let (status, body) = send(&state, get("/img/missing.png")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "File /img/missing.png not found!");
    }

    #[tokio::test]
    async fn test_nested_directories_are_static() {
        let (dir, state) = test_app();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/index.html"), "<h1>handbook</h1>").unwrap();

        for uri in ["/docs/", "/docs/index.html"] {
            let (status, body) = send(&state, get(uri)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, "<h1>handbook</h1>");
        }

        let (status, html) = send(&state, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("hero-slider"));
    }

    #[tokio::test]
    async fn test_posts_api() {
        let (_dir, state) = test_app();
        let (status, body) = send(&state, get("/api/posts?category=Knowledge&limit=2")).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        let ids: Vec<_> = json["posts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, ["p5", "p3"]);
        assert_eq!(json["hasMore"], true);
    }

    #[tokio::test]
    async fn test_rotation_api() {
        let (_dir, state) = test_app();
        let (_, body) = send(&state, post("/api/testimonials/prev")).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["index"], 2);

        let (_, body) = send(&state, post("/api/slider/next")).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["index"], 1);
        assert_eq!(json["running"], false);

        let (_, body) = send(&state, post("/api/slider/resume")).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["running"], true);
        send(&state, post("/api/slider/pause")).await;
        assert!(!state.hub.slider_running());

        let (_, body) = send(&state, get("/api/rotation")).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["testimonial_index"], 2);
        assert_eq!(json["home_gallery"].as_array().unwrap().len(), 8);
        state.hub.stop();
    }

    #[tokio::test]
    async fn test_hover_messages_count_once_per_page() {
        let (_dir, state) = test_app();
        let hub = &state.hub;
        hub.start();

        let first = apply_hover(hub, false, "pause");
        let first = apply_hover(hub, first, "pause");
        assert!(first);
        let second = apply_hover(hub, false, "pause");
        assert!(!hub.slider_running());

        // The first page leaving does not restart the slider for the second
        apply_hover(hub, first, "resume");
        assert!(!hub.slider_running());
        apply_hover(hub, second, "resume");
        assert!(hub.slider_running());
        hub.stop();
    }

    #[tokio::test]
    async fn test_reload_picks_up_new_content() {
        let (dir, state) = test_app();
        fs::create_dir_all(dir.path().join("content")).unwrap();
        fs::write(
            dir.path().join("content/posts.json"),
            r#"[{"id":"fresh","title":"Fresh","category":"Video","date":"2024-06-01"}]"#,
        )
        .unwrap();

        let mut events = state.hub.subscribe();
        state.reload();
        assert_eq!(events.try_recv().unwrap(), RotationEvent::Reload);
        assert_eq!(state.store().posts.items().len(), 1);
        assert!(state.store().students.is_failed());
    }
}
