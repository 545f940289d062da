//! Integration tests for Folio

mod common {
    use folio::config::StoreConfig;
    use folio::FsDocumentStore;
    use std::path::Path;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};
    use tempfile::TempDir;

    pub fn store(dir: &TempDir) -> FsDocumentStore {
        FsDocumentStore::new(&StoreConfig {
            data_dir: dir.path().to_path_buf(),
            ..StoreConfig::default()
        })
    }

    /// Write a file and pin its mtime so identity changes are deterministic
    pub fn write_file(dir: &Path, name: &str, content: &str, mtime_secs: u64) {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        let file = std::fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(UNIX_EPOCH + Duration::from_secs(mtime_secs))
            .unwrap();
    }

    pub fn mtime(dir: &Path, name: &str) -> SystemTime {
        std::fs::metadata(dir.join(name)).unwrap().modified().unwrap()
    }
}

mod http_tests {
    use super::common::{store, write_file};
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use folio::server::{router, AppState};
    use folio::{FreshnessCache, Portfolio};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(dir: &TempDir) -> Router {
        router(AppState::new(FreshnessCache::new(store(dir))), None)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn get_without_files_returns_default_document() {
        let temp = TempDir::new().unwrap();
        let app = app(&temp);

        let (status, body) = send(&app, Method::GET, "/api/portfolio", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::to_value(Portfolio::default()).unwrap());
    }

    #[tokio::test]
    async fn post_then_get_returns_saved_document() {
        let temp = TempDir::new().unwrap();
        let app = app(&temp);
        let document = json!({
            "funds": [{
                "name": "CDB",
                "enabled": true,
                "target": "30",
                "expanded": false,
                "id": "f1",
                "aportes": [{"value": "1000", "return": "0.9", "date": "2024-03-01"}],
                "balances": [{"date": "2024-04-01", "value": "1010"}]
            }],
            "capital": "10000",
            "cdi": "10.65",
            "strategy": "balanced"
        });

        let (status, body) =
            send(&app, Method::POST, "/api/portfolio", &document.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "saved"}));
        assert!(temp.path().join("portfolio-current.json").exists());

        let (status, body) = send(&app, Method::GET, "/api/portfolio", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, document);
    }

    #[tokio::test]
    async fn malformed_post_is_rejected_before_storage() {
        let temp = TempDir::new().unwrap();
        let app = app(&temp);

        let (status, body) = send(&app, Method::POST, "/api/portfolio", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_input");
        assert!(!temp.path().join("portfolio-current.json").exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_server_error() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "portfolio.json", "{oops", 100);
        let app = app(&temp);

        let (status, body) = send(&app, Method::GET, "/api/portfolio", "").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "parse_error");
    }

    #[tokio::test]
    async fn get_serves_latest_dated_snapshot() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "portfolio-2024-01-01.json", r#"{"capital":"old"}"#, 100);
        write_file(temp.path(), "portfolio-2024-06-15.json", r#"{"capital":"new"}"#, 50);
        write_file(temp.path(), "portfolio.json", r#"{"capital":"legacy"}"#, 200);
        let app = app(&temp);

        let (status, body) = send(&app, Method::GET, "/api/portfolio", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["capital"], "new");
    }

    #[tokio::test]
    async fn unsupported_method_is_rejected() {
        let temp = TempDir::new().unwrap();
        let app = app(&temp);

        let (status, _) = send(&app, Method::PUT, "/api/portfolio", "{}").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn health_reports_cached_snapshot() {
        let temp = TempDir::new().unwrap();
        let app = app(&temp);

        let (status, body) = send(&app, Method::GET, "/health", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body.get("snapshot").is_none());

        send(&app, Method::POST, "/api/portfolio", r#"{"capital":"1"}"#).await;
        let (_, body) = send(&app, Method::GET, "/health", "").await;
        assert_eq!(body["snapshot"]["file"], "portfolio-current.json");
    }

    #[tokio::test]
    async fn static_dir_serves_index() {
        let temp = TempDir::new().unwrap();
        let assets = TempDir::new().unwrap();
        std::fs::write(assets.path().join("index.html"), "<h1>folio</h1>").unwrap();
        std::fs::write(assets.path().join("app.js"), "console.log(1)").unwrap();

        let app = router(
            AppState::new(FreshnessCache::new(store(&temp))),
            Some(assets.path()),
        );

        for uri in ["/", "/static/app.js"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }
}

mod cache_tests {
    use super::common::{mtime, store, write_file};
    use folio::{FreshnessCache, FsDocumentStore, Portfolio};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn uncapped(dir: &TempDir) -> FreshnessCache<FsDocumentStore, Portfolio> {
        FreshnessCache::with_window(store(dir), Duration::ZERO)
    }

    #[tokio::test]
    async fn external_rewrite_is_picked_up() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "portfolio-2024-01-01.json", r#"{"capital":"one"}"#, 1_000);
        let cache = uncapped(&temp);

        let first = cache.get().await.unwrap();
        let again = cache.get().await.unwrap();
        assert_eq!(first.capital, "one");
        assert!(Arc::ptr_eq(&first, &again));

        write_file(temp.path(), "portfolio-2024-01-01.json", r#"{"capital":"two"}"#, 2_000);
        assert_eq!(cache.get().await.unwrap().capital, "two");

        write_file(temp.path(), "portfolio-2024-02-01.json", r#"{"capital":"three"}"#, 2_000);
        assert_eq!(cache.get().await.unwrap().capital, "three");
    }

    #[tokio::test]
    async fn put_identity_matches_disk() {
        let temp = TempDir::new().unwrap();
        let cache = uncapped(&temp);

        let written = cache
            .put(Portfolio {
                capital: "42".to_string(),
                ..Portfolio::default()
            })
            .await
            .unwrap();

        let identity = cache.identity().await.unwrap();
        assert_eq!(identity.file.name(), "portfolio-current.json");
        assert_eq!(identity.modified, mtime(temp.path(), "portfolio-current.json"));

        // Unchanged identity means the written instance is served as is
        assert!(Arc::ptr_eq(&written, &cache.get().await.unwrap()));

        let raw = std::fs::read_to_string(temp.path().join("portfolio-current.json")).unwrap();
        assert!(raw.starts_with("{\n  \"funds\""));
        assert!(raw.ends_with("}\n"));
    }

    #[tokio::test]
    async fn failed_reload_keeps_last_good_document() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "portfolio.json", r#"{"capital":"good"}"#, 1_000);
        let cache = uncapped(&temp);
        assert_eq!(cache.get().await.unwrap().capital, "good");

        write_file(temp.path(), "portfolio.json", "{broken", 2_000);
        assert!(cache.get().await.is_err());
        assert_eq!(cache.identity().await.unwrap().file.name(), "portfolio.json");

        write_file(temp.path(), "portfolio.json", r#"{"capital":"good"}"#, 1_000);
        assert_eq!(cache.get().await.unwrap().capital, "good");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_gets_and_puts_see_whole_documents() {
        let temp = TempDir::new().unwrap();
        let cache = Arc::new(uncapped(&temp));
        cache
            .put(Portfolio {
                capital: "seed".to_string(),
                ..Portfolio::default()
            })
            .await
            .unwrap();

        let mut allowed: HashSet<String> = HashSet::from(["seed".to_string()]);
        let mut handles = Vec::new();

        for writer in 0..8 {
            let capital = format!("writer-{writer}");
            allowed.insert(capital.clone());
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                let written = cache
                    .put(Portfolio {
                        capital: capital.clone(),
                        strategy: capital,
                        ..Portfolio::default()
                    })
                    .await
                    .unwrap();
                vec![written.capital.clone()]
            }));
        }

        for _ in 0..16 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                let mut seen = Vec::new();
                for _ in 0..8 {
                    let doc = cache.get().await.unwrap();
                    if doc.capital != "seed" {
                        assert_eq!(doc.capital, doc.strategy);
                    }
                    seen.push(doc.capital.clone());
                }
                seen
            }));
        }

        for handle in handles {
            for capital in handle.await.unwrap() {
                assert!(allowed.contains(&capital), "unexpected document {capital}");
            }
        }

        let last = cache.get().await.unwrap();
        assert!(last.capital.starts_with("writer-"));
    }
}

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn folio(config_dir: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("folio");
        cmd.arg("--config")
            .arg(config_dir.path().join("config.toml"));
        cmd
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        folio(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("portfolio document server"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        folio(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("folio"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        folio(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        folio(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[store]"));
    }

    #[test]
    fn config_init_creates_file() {
        let temp = TempDir::new().unwrap();
        folio(&temp).args(["config", "init"]).assert().success();
        assert!(temp.path().join("config.toml").exists());
    }

    #[test]
    fn serve_with_bad_address_fails() {
        let temp = TempDir::new().unwrap();
        folio(&temp)
            .args(["serve", "--bind", "not-an-address", "--data-dir"])
            .arg(temp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to bind"));
    }
}
