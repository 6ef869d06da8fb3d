use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pubsearch_core::store::save_documents;
use pubsearch_core::Document;
use pubsearch_server::{build_app, AppConfig};
use serde_json::Value;
use std::path::Path;
use tempfile::tempdir;
use tower::ServiceExt;

fn paper(title: &str, authors: &[&str]) -> Document {
    Document::new(
        title,
        format!("https://portal.example/p/{}", title.replace(' ', "-").to_lowercase()),
        "2021",
        authors.iter().map(|a| a.to_string()).collect(),
        vec!["https://portal.example/a/1".to_string()],
    )
}

fn write_store(path: &Path) {
    let docs = vec![
        paper("Graph Algorithms", &["alice smith"]),
        paper("Network Graph Theory", &["bob lee"]),
        paper("Fluid Dynamics", &["carol jones"]),
    ];
    save_documents(path, &docs).unwrap();
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, String) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

#[tokio::test]
async fn api_search_ranks_matches_in_corpus_order() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("papers.csv");
    write_store(&store);
    let app = build_app(AppConfig::new(&store)).unwrap();

    let (status, body) = get(&app, "/api/search?q=graph").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["total_hits"], 2);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["title"], "Graph Algorithms");
    assert_eq!(arr[1]["title"], "Network Graph Theory");
    assert_eq!(arr[0]["score"], 1);
    assert_eq!(arr[0]["authors"][0], "alice smith");
}

#[tokio::test]
async fn api_search_k_caps_results() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("papers.csv");
    write_store(&store);
    let config = AppConfig { show_unmatched: true, ..AppConfig::new(&store) };
    let app = build_app(config).unwrap();

    let (_, body) = get(&app, "/api/search?q=bob%20network&k=2").await;
    let json: Value = serde_json::from_str(&body).unwrap();
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["title"], "Network Graph Theory");
    assert_eq!(arr[0]["score"], 2);
    assert_eq!(arr[1]["score"], 0);
}

#[tokio::test]
async fn empty_query_with_unmatched_keeps_corpus_order() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("papers.csv");
    write_store(&store);
    let config = AppConfig { show_unmatched: true, ..AppConfig::new(&store) };
    let app = build_app(config).unwrap();

    let (_, body) = get(&app, "/api/search?q=").await;
    let json: Value = serde_json::from_str(&body).unwrap();
    let titles: Vec<&str> = json["results"].as_array().unwrap().iter().map(|r| r["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Graph Algorithms", "Network Graph Theory", "Fluid Dynamics"]);
    assert_eq!(json["total_hits"], 0);
}

#[tokio::test]
async fn home_page_has_search_form() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("papers.csv");
    write_store(&store);
    let app = build_app(AppConfig::new(&store)).unwrap();

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<form action="/search" method="post">"#));
    assert!(body.contains("3 papers indexed."));
}

#[tokio::test]
async fn posted_query_renders_results_page() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("papers.csv");
    write_store(&store);
    let app = build_app(AppConfig::new(&store)).unwrap();

    let req = Request::post("/search")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("query=fluid"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<mark>Fluid</mark> Dynamics"));
    assert!(body.contains("carol jones"));
    assert!(!body.contains("Graph Algorithms"));
}

#[tokio::test]
async fn unmatched_query_renders_empty_page() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("papers.csv");
    write_store(&store);
    let app = build_app(AppConfig::new(&store)).unwrap();

    let (status, body) = get(&app, "/search?query=quantum").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No papers matched."));
}

#[tokio::test]
async fn reload_requires_token_and_swaps_snapshot() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("papers.csv");
    write_store(&store);
    let config = AppConfig { admin_token: Some("secret".into()), ..AppConfig::new(&store) };
    let app = build_app(config).unwrap();

    let (status, _) = send(&app, Request::post("/admin/reload").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    save_documents(&store, &[paper("Quantum Computing", &["dave moss"])]).unwrap();
    let req = Request::post("/admin/reload").header("X-ADMIN-TOKEN", "secret").body(Body::empty()).unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["num_docs"], 1);

    let (_, body) = get(&app, "/api/search?q=quantum").await;
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["results"][0]["title"], "Quantum Computing");
}

#[test]
fn missing_store_fails_startup() {
    let dir = tempdir().unwrap();
    assert!(build_app(AppConfig::new(dir.path().join("missing.csv"))).is_err());
}
