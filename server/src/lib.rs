pub mod render;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Html,
    routing::{get, post},
    Form, Json, Router,
};
use parking_lot::RwLock;
use pubsearch_core::store::load_documents;
use pubsearch_core::{CorpusSnapshot, Hit};
use render::Pages;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

type HandlerError = (StatusCode, String);

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Paper store CSV loaded at startup and on reload
    pub store_path: PathBuf,
    /// Render zero-score papers too
    pub show_unmatched: bool,
    /// Cap on rendered results; `None` shows every ranked paper
    pub max_results: Option<usize>,
    pub admin_token: Option<String>,
}

impl AppConfig {
    pub fn new<P: AsRef<Path>>(store_path: P) -> Self {
        Self { store_path: store_path.as_ref().to_path_buf(), show_unmatched: false, max_results: None, admin_token: None }
    }
}

#[derive(Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub query: String,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub k: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub rank: usize,
    pub score: u32,
    pub title: String,
    pub title_link: String,
    pub year: String,
    pub authors: Vec<String>,
    pub author_links: Vec<String>,
}

#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    snapshot: Arc<RwLock<Arc<CorpusSnapshot>>>,
    pages: Arc<Pages>,
}

impl AppState {
    /// The snapshot current at call time; later reloads do not affect it.
    fn current(&self) -> Arc<CorpusSnapshot> {
        self.snapshot.read().clone()
    }

    /// Apply the presentation policy: drop zero scores unless configured, then cap.
    fn visible<'a>(&self, hits: Vec<Hit<'a>>, k: Option<usize>) -> Vec<Hit<'a>> {
        let limit = k.or(self.config.max_results).unwrap_or(usize::MAX);
        hits.into_iter()
            .filter(|h| self.config.show_unmatched || h.score > 0)
            .take(limit)
            .collect()
    }
}

pub fn load_snapshot(store_path: &Path) -> Result<CorpusSnapshot> {
    let docs = load_documents(store_path)?;
    Ok(CorpusSnapshot::build(docs))
}

pub fn build_app(config: AppConfig) -> Result<Router> {
    let snapshot = load_snapshot(&config.store_path)?;
    let app_state = AppState {
        config: Arc::new(config),
        snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
        pages: Arc::new(Pages::new()?),
    };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/", get(home_handler))
        .route("/search", get(search_page_get).post(search_page_post))
        .route("/api/search", get(api_search_handler))
        .route("/health", get(|| async { "ok" }))
        .route("/admin/reload", post(reload_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

fn internal(e: anyhow::Error) -> HandlerError {
    tracing::error!(error = %e, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

async fn home_handler(State(state): State<AppState>) -> Result<Html<String>, HandlerError> {
    let num_docs = state.current().len();
    state.pages.home(num_docs).map(Html).map_err(internal)
}

async fn search_page_get(State(state): State<AppState>, Query(form): Query<SearchForm>) -> Result<Html<String>, HandlerError> {
    render_results(&state, &form.query)
}

async fn search_page_post(State(state): State<AppState>, Form(form): Form<SearchForm>) -> Result<Html<String>, HandlerError> {
    render_results(&state, &form.query)
}

fn render_results(state: &AppState, query: &str) -> Result<Html<String>, HandlerError> {
    let snapshot = state.current();
    let hits = state.visible(snapshot.search(query), None);
    tracing::debug!(query, shown = hits.len(), "search page");
    state.pages.results(query, &hits).map(Html).map_err(internal)
}

pub async fn api_search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let snapshot = state.current();
    let ranked = snapshot.search(&params.q);
    let total_hits = ranked.iter().filter(|h| h.score > 0).count();
    let results = state
        .visible(ranked, params.k)
        .into_iter()
        .enumerate()
        .map(|(i, hit)| {
            let d = hit.document;
            SearchHit {
                rank: i + 1,
                score: hit.score,
                title: d.title.clone(),
                title_link: d.title_link.clone(),
                year: d.year.clone(),
                authors: d.authors.clone(),
                author_links: d.author_links.clone(),
            }
        })
        .collect();
    let elapsed = start.elapsed();
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results })
}

async fn reload_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<serde_json::Value>, HandlerError> {
    authorize(&state, &headers)?;
    let path = state.config.store_path.clone();
    let snapshot = tokio::task::spawn_blocking(move || load_snapshot(&path))
        .await
        .map_err(|e| internal(e.into()))?
        .map_err(internal)?;
    let num_docs = snapshot.len();
    *state.snapshot.write() = Arc::new(snapshot);
    tracing::info!(num_docs, "snapshot reloaded");
    Ok(Json(serde_json::json!({ "num_docs": num_docs })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), HandlerError> {
    let required = match &state.config.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
